//! Export file writer.

use anyhow::{Context, Result};
use backbone_common::ExportArtifact;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// Write an export artifact into `dir`, creating it if needed
pub async fn write_artifact(dir: &Path, artifact: &ExportArtifact) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;

    let path = dir.join(&artifact.filename);
    fs::write(&path, &artifact.bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(
        "Exported {} bytes ({}) to {}",
        artifact.bytes.len(),
        artifact.mime_type,
        path.display()
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_artifact_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exports");
        let artifact = ExportArtifact {
            filename: "system_logs_1.csv".to_string(),
            mime_type: "text/csv;charset=utf-8;",
            bytes: b"Time,Severity,Source,Message\n".to_vec(),
        };

        let path = write_artifact(&target, &artifact).await.unwrap();
        assert_eq!(path, target.join("system_logs_1.csv"));
        assert_eq!(std::fs::read(&path).unwrap(), artifact.bytes);
    }
}
