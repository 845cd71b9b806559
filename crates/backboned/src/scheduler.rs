//! Tick scheduler for the live dashboard
//!
//! One immediate refresh at startup, then one every tick interval while live.
//! Each refresh computes the next state, waits the settle delay and publishes.
//! Commands arriving during a refresh queue up behind it, so ticks never
//! overlap.

use crate::commands::{Action, Command};
use crate::writer;
use backbone_common::config::BackboneConfig;
use backbone_common::{Dashboard, ExportFormat, RandomSource};
use chrono::{Local, Utc};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

pub struct Scheduler<R> {
    dashboard: Dashboard,
    random: R,
    tick_interval: Duration,
    settle_delay: Duration,
    export_dir: PathBuf,
}

impl<R: RandomSource + Send> Scheduler<R> {
    pub fn new(dashboard: Dashboard, random: R, config: &BackboneConfig) -> Self {
        Self {
            dashboard,
            random,
            tick_interval: config.monitor.tick_interval(),
            settle_delay: config.monitor.settle_delay(),
            export_dir: config.export.directory.clone(),
        }
    }

    /// Run until `quit` or until every command sender is dropped.
    ///
    /// `on_update` sees the dashboard after every visible change.
    pub async fn run<F>(mut self, mut commands: mpsc::Receiver<Command>, mut on_update: F) -> Dashboard
    where
        F: FnMut(&Dashboard) + Send,
    {
        info!(
            "Scheduler starting: tick {:?}, settle {:?}, live {}",
            self.tick_interval,
            self.settle_delay,
            self.dashboard.is_live()
        );

        self.dashboard.record_startup(&Local::now());
        self.refresh(&mut on_update).await;

        let mut ticker = interval_at(Instant::now() + self.tick_interval, self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if self.dashboard.is_live() {
                        self.refresh(&mut on_update).await;
                    } else {
                        debug!("Paused, skipping tick");
                    }
                }
                command = commands.recv() => {
                    let Some(command) = command else {
                        info!("Command channel closed");
                        break;
                    };
                    match command.apply(&mut self.dashboard) {
                        Action::None => on_update(&self.dashboard),
                        Action::Refresh => self.refresh(&mut on_update).await,
                        Action::Export(format) => self.export(format).await,
                        Action::Quit => break,
                    }
                }
            }
        }

        info!("Scheduler stopped after {} ticks", self.dashboard.ticks());
        self.dashboard
    }

    async fn refresh<F>(&mut self, on_update: &mut F)
    where
        F: FnMut(&Dashboard) + Send,
    {
        let outcome = self.dashboard.begin_refresh(&mut self.random);
        on_update(&self.dashboard);

        sleep(self.settle_delay).await;

        let report = self.dashboard.publish(outcome, Local::now());
        if report.has_changes() {
            debug!(
                "Tick {}: {} transitions, {} events logged",
                report.tick,
                report.transitions.len(),
                report.events.len()
            );
        }
        on_update(&self.dashboard);
    }

    async fn export(&self, format: ExportFormat) {
        let artifact = match self.dashboard.export(format, Utc::now().timestamp_millis()) {
            Ok(Some(artifact)) => artifact,
            Ok(None) => {
                info!("Nothing to export: filtered log is empty");
                return;
            }
            Err(e) => {
                warn!("Failed to serialize {} export: {}", format, e);
                return;
            }
        };

        if let Err(e) = writer::write_artifact(&self.export_dir, &artifact).await {
            warn!("Export failed: {:#}", e);
        }
    }
}
