//! Backboned - Global Backbone Monitor
//!
//! Live dashboard over simulated provider telemetry, or a headless run that
//! prints the final state and optionally exports the filtered log.

use anyhow::{Context, Result};
use backbone_common::config::BackboneConfig;
use backbone_common::{Dashboard, ExportFormat, SeededSource, SeverityFilter, SourceFilter};
use backboned::commands::{self, Command, HELP};
use backboned::{render, scheduler::Scheduler, writer};
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "backboned")]
#[command(about = "Global Backbone Monitor - simulated provider status dashboard", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (default: /etc/backbone/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Live dashboard; reads commands from stdin
    Run,

    /// Headless run without delays
    Simulate {
        /// Number of ticks to run
        #[arg(long, default_value_t = 20)]
        ticks: u64,

        /// Seed for the random source (overrides config)
        #[arg(long)]
        seed: Option<u64>,

        /// Severity filter: all, error, warning, success, info
        #[arg(long, default_value = "all")]
        severity: String,

        /// Source filter: all or an exact provider name
        #[arg(long, default_value = "all")]
        source: String,

        /// Export the filtered log as csv or json
        #[arg(long)]
        export: Option<String>,

        /// Export directory (overrides config)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Backbone Monitor v{} starting", env!("CARGO_PKG_VERSION"));

    let config = BackboneConfig::load(cli.config.as_deref());

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_live(config).await,
        Commands::Simulate {
            ticks,
            seed,
            severity,
            source,
            export,
            out,
        } => simulate(config, ticks, seed, &severity, &source, export.as_deref(), out).await,
    }
}

fn random_source(seed: Option<u64>) -> SeededSource {
    match seed {
        Some(seed) => {
            info!("Using fixed seed {}", seed);
            SeededSource::new(seed)
        }
        None => SeededSource::from_entropy(),
    }
}

async fn run_live(config: BackboneConfig) -> Result<()> {
    let dashboard = Dashboard::from_config(&config).context("Invalid provider catalog")?;
    let random = random_source(config.monitor.seed);
    let scheduler = Scheduler::new(dashboard, random, &config);

    let (tx, rx) = mpsc::channel(32);

    tokio::spawn(commands::read_commands(
        BufReader::new(tokio::io::stdin()),
        tx.clone(),
    ));

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, shutting down");
            let _ = tx.send(Command::Quit).await;
        }
    });

    eprintln!("{}", HELP);
    scheduler
        .run(rx, |dashboard| {
            // clear screen, cursor home
            print!("\x1B[2J\x1B[H");
            println!("{}", render::render_dashboard(dashboard));
        })
        .await;

    info!("Shutting down gracefully");
    Ok(())
}

async fn simulate(
    config: BackboneConfig,
    ticks: u64,
    seed: Option<u64>,
    severity: &str,
    source: &str,
    export: Option<&str>,
    out: Option<PathBuf>,
) -> Result<()> {
    let severity: SeverityFilter = severity.parse()?;
    let format: Option<ExportFormat> = export.map(str::parse::<ExportFormat>).transpose()?;

    let mut dashboard = Dashboard::from_config(&config).context("Invalid provider catalog")?;
    let mut random = random_source(seed.or(config.monitor.seed));

    dashboard.record_startup(&Local::now());
    for _ in 0..ticks {
        dashboard.tick(&mut random, Local::now());
    }

    dashboard.set_severity_filter(severity);
    dashboard.set_source_filter(SourceFilter::from(source));

    println!("{}", render::render_dashboard(&dashboard));

    let Some(format) = format else {
        return Ok(());
    };

    match dashboard.export(format, Utc::now().timestamp_millis())? {
        Some(artifact) => {
            let dir = out.unwrap_or(config.export.directory);
            let path = writer::write_artifact(&dir, &artifact).await?;
            println!("Exported {} events to {}", dashboard.filtered().shown(), path.display());
        }
        None => println!("Nothing to export: filtered log is empty"),
    }

    Ok(())
}
