//! Log filter: severity AND source, order preserving.

use crate::error::BackboneError;
use crate::event_log::{LogEvent, Severity};
use std::fmt;
use std::str::FromStr;

/// Sentinel accepted by both filters
pub const ALL: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeverityFilter {
    #[default]
    All,
    Only(Severity),
}

impl SeverityFilter {
    pub fn matches(&self, severity: Severity) -> bool {
        match self {
            SeverityFilter::All => true,
            SeverityFilter::Only(wanted) => *wanted == severity,
        }
    }
}

impl FromStr for SeverityFilter {
    type Err = BackboneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case(ALL) {
            Ok(SeverityFilter::All)
        } else {
            Ok(SeverityFilter::Only(s.parse()?))
        }
    }
}

/// Source filter; `Only` compares exactly and case-sensitively
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SourceFilter {
    #[default]
    All,
    Only(String),
}

impl SourceFilter {
    pub fn matches(&self, source: &str) -> bool {
        match self {
            SourceFilter::All => true,
            SourceFilter::Only(wanted) => wanted == source,
        }
    }
}

impl From<&str> for SourceFilter {
    fn from(s: &str) -> Self {
        if s.eq_ignore_ascii_case(ALL) {
            SourceFilter::All
        } else {
            SourceFilter::Only(s.to_string())
        }
    }
}

/// Current filter selection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogFilter {
    pub severity: SeverityFilter,
    pub source: SourceFilter,
}

impl LogFilter {
    pub fn new(severity: SeverityFilter, source: SourceFilter) -> Self {
        Self { severity, source }
    }

    pub fn is_active(&self) -> bool {
        *self != LogFilter::default()
    }

    pub fn matches(&self, event: &LogEvent) -> bool {
        event_matches(self.severity, &self.source, event)
    }

    /// Matching subsequence of `events`, order preserved
    pub fn apply(&self, events: &[LogEvent]) -> Vec<LogEvent> {
        filter(events, self.severity, &self.source)
    }
}

/// Active-filter summary, e.g. `ERROR / AWS (AMAZON)` or `ALL / ALL`
impl fmt::Display for LogFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            SeverityFilter::All => "ALL".to_string(),
            SeverityFilter::Only(s) => s.as_str().to_uppercase(),
        };
        let source = match &self.source {
            SourceFilter::All => "ALL".to_string(),
            SourceFilter::Only(s) => s.to_uppercase(),
        };
        write!(f, "{} / {}", severity, source)
    }
}

/// Pure filter over a log snapshot
pub fn filter(events: &[LogEvent], severity: SeverityFilter, source: &SourceFilter) -> Vec<LogEvent> {
    events
        .iter()
        .filter(|e| event_matches(severity, source, e))
        .cloned()
        .collect()
}

fn event_matches(severity: SeverityFilter, source: &SourceFilter, event: &LogEvent) -> bool {
    severity.matches(event.severity()) && source.matches(event.source())
}

/// Why a filtered view has nothing to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// The log itself has no entries
    LogEmpty,
    /// Entries exist but none match the filter
    NoMatches,
}

/// Filtered view plus the size of the log it was taken from
#[derive(Debug, Clone)]
pub struct FilteredLog {
    pub events: Vec<LogEvent>,
    pub total: usize,
}

impl FilteredLog {
    pub fn shown(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        if !self.events.is_empty() {
            None
        } else if self.total == 0 {
            Some(EmptyState::LogEmpty)
        } else {
            Some(EmptyState::NoMatches)
        }
    }
}
