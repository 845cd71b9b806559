//! Dashboard state
//!
//! Explicit application state threaded through tick, filter and export:
//! the catalog snapshot, the event log, the filter selection, the live flag
//! and the last publish time. A tick is computed from a snapshot and published
//! by replacing the whole provider collection at once.

use crate::catalog;
use crate::config::BackboneConfig;
use crate::engine::{self, TickOutcome, Transition};
use crate::error::Result;
use crate::event_log::{EventLog, LogEvent, Severity, SYSTEM_SOURCE};
use crate::export::{self, ExportArtifact, ExportFormat};
use crate::filter::{FilteredLog, LogFilter, SeverityFilter, SourceFilter};
use crate::model::{Provider, ProviderStatus};
use crate::random::RandomSource;
use chrono::{DateTime, Local};
use tracing::info;

/// Message recorded when monitoring starts
pub const STARTUP_MESSAGE: &str = "System started. All services are being monitored.";

/// What one published tick changed
#[derive(Debug, Clone)]
pub struct TickReport {
    /// 1-based tick counter
    pub tick: u64,
    /// Provider collection as published
    pub providers: Vec<Provider>,
    /// Every status change, logged or not
    pub transitions: Vec<Transition>,
    /// Log entries created by this tick, oldest first
    pub events: Vec<LogEvent>,
}

impl TickReport {
    pub fn has_changes(&self) -> bool {
        !self.transitions.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    providers: Vec<Provider>,
    log: EventLog,
    filter: LogFilter,
    live: bool,
    refreshing: bool,
    last_updated: Option<DateTime<Local>>,
    ticks: u64,
}

impl Dashboard {
    pub fn new(providers: Vec<Provider>, log_capacity: usize, live: bool) -> Self {
        Self {
            providers,
            log: EventLog::new(log_capacity),
            filter: LogFilter::default(),
            live,
            refreshing: false,
            last_updated: None,
            ticks: 0,
        }
    }

    /// Built-in catalog with default capacity, live
    pub fn with_default_catalog() -> Self {
        Self::new(catalog::default_catalog(), crate::event_log::DEFAULT_CAPACITY, true)
    }

    pub fn from_config(config: &BackboneConfig) -> Result<Self> {
        Ok(Self::new(
            config.catalog()?,
            config.monitor.log_capacity,
            config.monitor.live_on_start,
        ))
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    pub fn provider(&self, name: &str) -> Option<&Provider> {
        self.providers.iter().find(|p| p.name == name)
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn last_updated(&self) -> Option<&DateTime<Local>> {
        self.last_updated.as_ref()
    }

    // --- live flag ---------------------------------------------------------

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn set_live(&mut self, live: bool) {
        self.live = live;
    }

    /// Flip the live flag, returning the new value
    pub fn toggle_live(&mut self) -> bool {
        self.live = !self.live;
        self.live
    }

    /// True between `begin_refresh` and `publish`
    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    // --- tick cycle --------------------------------------------------------

    /// Record the startup event in the log
    pub fn record_startup(&mut self, now: &DateTime<Local>) {
        self.log
            .record(now, STARTUP_MESSAGE, Severity::Info, SYSTEM_SOURCE);
    }

    /// Mark a refresh in flight and compute the next state from the current
    /// snapshot. Nothing is visible until `publish`.
    pub fn begin_refresh<R: RandomSource + ?Sized>(&mut self, random: &mut R) -> TickOutcome {
        self.refreshing = true;
        engine::advance(&self.providers, random)
    }

    /// Replace the provider collection and log the outcome's transitions
    pub fn publish(&mut self, outcome: TickOutcome, now: DateTime<Local>) -> TickReport {
        let TickOutcome {
            providers,
            transitions,
        } = outcome;

        let mut events = Vec::new();
        for transition in &transitions {
            if let Some((severity, message)) = transition.log_entry() {
                self.log
                    .record(&now, message, severity, transition.provider.clone());
                if let Some(event) = self.log.latest() {
                    events.push(event.clone());
                }
            }
        }

        self.providers = providers;
        self.refreshing = false;
        self.last_updated = Some(now);
        self.ticks += 1;

        info!(
            "Tick {} published: {} transitions, {} logged, {}",
            self.ticks,
            transitions.len(),
            events.len(),
            self.status_summary()
        );

        TickReport {
            tick: self.ticks,
            providers: self.providers.clone(),
            transitions,
            events,
        }
    }

    /// Compute and publish in one step, without a settle delay
    pub fn tick<R: RandomSource + ?Sized>(
        &mut self,
        random: &mut R,
        now: DateTime<Local>,
    ) -> TickReport {
        let outcome = self.begin_refresh(random);
        self.publish(outcome, now)
    }

    /// Compact per-status provider counts, e.g. `5 online, 1 partial`
    pub fn status_summary(&self) -> String {
        let count = |status: ProviderStatus| {
            self.providers
                .iter()
                .filter(|p| p.status() == status)
                .count()
        };

        [
            ProviderStatus::Online,
            ProviderStatus::Degraded,
            ProviderStatus::Partial,
            ProviderStatus::Down,
        ]
        .iter()
        .filter_map(|status| {
            let n = count(*status);
            (n > 0).then(|| format!("{} {}", n, status))
        })
        .collect::<Vec<_>>()
        .join(", ")
    }

    // --- filter ------------------------------------------------------------

    pub fn filter(&self) -> &LogFilter {
        &self.filter
    }

    pub fn set_severity_filter(&mut self, severity: SeverityFilter) {
        self.filter.severity = severity;
    }

    pub fn set_source_filter(&mut self, source: SourceFilter) {
        self.filter.source = source;
    }

    pub fn clear_filters(&mut self) {
        self.filter = LogFilter::default();
    }

    /// Source choices offered to the filter
    pub fn source_names(&self) -> Vec<String> {
        catalog::source_names(&self.providers)
    }

    /// Current filtered view of the log
    pub fn filtered(&self) -> FilteredLog {
        FilteredLog {
            events: self.filter.apply(self.log.all()),
            total: self.log.len(),
        }
    }

    // --- export ------------------------------------------------------------

    /// Serialize the filtered view; `None` when it is empty
    pub fn export(&self, format: ExportFormat, epoch_millis: i64) -> Result<Option<ExportArtifact>> {
        export::prepare(&self.filtered().events, format, epoch_millis)
    }
}
