//! Scheduler end-to-end: commands, ticks and exports through a temp directory

use backbone_common::config::BackboneConfig;
use backbone_common::{Dashboard, ProviderStatus, ScriptedSource};
use backboned::commands::Command;
use backboned::render;
use backboned::scheduler::Scheduler;
use std::fs;
use tokio::sync::mpsc;

fn config_with_dir(dir: &std::path::Path) -> BackboneConfig {
    let mut config = BackboneConfig::default();
    config.export.directory = dir.to_path_buf();
    config
}

fn exported_files(dir: &std::path::Path) -> Vec<String> {
    match fs::read_dir(dir) {
        Ok(entries) => entries
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    }
}

#[tokio::test(start_paused = true)]
async fn test_outage_tick_exports_filtered_csv() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_dir(dir.path());
    let dashboard = Dashboard::from_config(&config).unwrap();
    // every region goes down on the startup tick
    let random = ScriptedSource::new().repeat(0.999, 0, 18);

    let (tx, rx) = mpsc::channel(8);
    tx.send(Command::parse("severity error").unwrap()).await.unwrap();
    tx.send(Command::parse("export csv").unwrap()).await.unwrap();
    tx.send(Command::Quit).await.unwrap();

    let mut renders = 0;
    let dashboard = Scheduler::new(dashboard, random, &config)
        .run(rx, |_| renders += 1)
        .await;

    assert!(renders >= 2);
    assert_eq!(dashboard.ticks(), 1);
    assert!(dashboard
        .providers()
        .iter()
        .all(|p| p.status() == ProviderStatus::Down));

    let files = exported_files(dir.path());
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("system_logs_"));
    assert!(files[0].ends_with(".csv"));

    let content = fs::read_to_string(dir.path().join(&files[0])).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "Time,Severity,Source,Message");
    assert_eq!(lines.len(), 19);
    assert!(lines[1..].iter().all(|l| l.contains(",CRITICAL,")));
    // newest first: the last region processed heads the export
    assert!(lines[1].ends_with("APJ entered critical outage"));
}

#[tokio::test(start_paused = true)]
async fn test_export_with_no_matches_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_dir(&dir.path().join("out"));
    let dashboard = Dashboard::from_config(&config).unwrap();

    let (tx, rx) = mpsc::channel(8);
    tx.send(Command::parse("source Nobody").unwrap()).await.unwrap();
    tx.send(Command::parse("export json").unwrap()).await.unwrap();
    tx.send(Command::Quit).await.unwrap();

    let dashboard = Scheduler::new(dashboard, ScriptedSource::new(), &config)
        .run(rx, |_| {})
        .await;

    assert!(exported_files(&dir.path().join("out")).is_empty());
    let text = render::render_log(&dashboard.filtered(), dashboard.filter());
    assert!(text.contains("No entries match the current filter."));
    assert!(text.contains("Showing 0 / Total 1"));
}
