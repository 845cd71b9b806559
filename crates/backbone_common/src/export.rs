//! Export serializer
//!
//! Renders a filtered log view into CSV or pretty JSON. Produces bytes plus a
//! filename and MIME hint; writing to disk is the caller's job.

use crate::error::{BackboneError, Result};
use crate::event_log::LogEvent;
use std::fmt;
use std::str::FromStr;

/// CSV header row
pub const CSV_HEADER: &str = "Time,Severity,Source,Message";

/// Filename prefix for exported logs
const FILE_PREFIX: &str = "system_logs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Delimited text
    Csv,
    /// Structured text
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8;",
            ExportFormat::Json => "application/json;charset=utf-8;",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = BackboneError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(BackboneError::UnknownFormat(other.to_string())),
        }
    }
}

/// Serialized log ready for the I/O layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// `system_logs_<epoch-millis>.<ext>`
pub fn export_filename(format: ExportFormat, epoch_millis: i64) -> String {
    format!("{}_{}.{}", FILE_PREFIX, epoch_millis, format.extension())
}

/// Serialize events in their current order
pub fn serialize(events: &[LogEvent], format: ExportFormat) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Csv => Ok(to_csv(events).into_bytes()),
        ExportFormat::Json => Ok(serde_json::to_vec_pretty(events)?),
    }
}

/// Build the export artifact, or `None` when there is nothing to export
pub fn prepare(
    events: &[LogEvent],
    format: ExportFormat,
    epoch_millis: i64,
) -> Result<Option<ExportArtifact>> {
    if events.is_empty() {
        return Ok(None);
    }

    Ok(Some(ExportArtifact {
        filename: export_filename(format, epoch_millis),
        mime_type: format.mime_type(),
        bytes: serialize(events, format)?,
    }))
}

fn to_csv(events: &[LogEvent]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + events.len() * 64);
    out.push_str(CSV_HEADER);
    out.push('\n');

    for event in events {
        // commas would shift columns; lossy but deterministic
        let message = event.message().replace(',', " ");
        out.push_str(&format!(
            "{},{},{},{}\n",
            event.timestamp(),
            event.severity().label(),
            event.source(),
            message
        ));
    }

    out
}
