//! Bounded in-memory event log.
//!
//! Newest-first; insertion at the head evicts from the tail once the log
//! exceeds its capacity. Entries are immutable once created.

use crate::error::BackboneError;
use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum entries retained by default
pub const DEFAULT_CAPACITY: usize = 50;

/// Source recorded for startup and other meta events
pub const SYSTEM_SOURCE: &str = "System";

/// Timestamp format for log entries (local wall clock)
const TIME_FORMAT: &str = "%H:%M:%S";

/// Event severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Success,
    Info,
}

impl Severity {
    /// External label used by the log table and CSV export
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Error => "CRITICAL",
            Severity::Warning => "WARNING",
            _ => "INFO",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Success => "success",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = BackboneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" | "critical" => Ok(Severity::Error),
            "warning" | "warn" => Ok(Severity::Warning),
            "success" => Ok(Severity::Success),
            "info" => Ok(Severity::Info),
            other => Err(BackboneError::UnknownSeverity(other.to_string())),
        }
    }
}

/// Event identity: epoch milliseconds scaled by 1000 plus a tiebreak.
///
/// Used for list identity only; ordering comes from insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl EventId {
    pub fn millis(&self) -> u64 {
        self.0 / 1000
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out strictly increasing ids, even when the clock stalls
#[derive(Debug, Clone, Default)]
struct EventIdGen {
    last: u64,
}

impl EventIdGen {
    fn next(&mut self, epoch_millis: i64) -> EventId {
        let base = (epoch_millis.max(0) as u64).saturating_mul(1000);
        self.last = base.max(self.last + 1);
        EventId(self.last)
    }
}

/// One log entry.
///
/// Serialized field names (`id`, `time`, `message`, `type`, `serviceName`)
/// are the export contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    id: EventId,
    #[serde(rename = "time")]
    timestamp: String,
    message: String,
    #[serde(rename = "type")]
    severity: Severity,
    #[serde(rename = "serviceName")]
    source: String,
}

impl LogEvent {
    pub fn new(
        id: EventId,
        timestamp: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id,
            timestamp: timestamp.into(),
            message: message.into(),
            severity,
            source: source.into(),
        }
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Capacity-bounded, newest-first event log
#[derive(Debug, Clone)]
pub struct EventLog {
    events: Vec<LogEvent>,
    capacity: usize,
    ids: EventIdGen,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: Vec::with_capacity(capacity + 1),
            capacity,
            ids: EventIdGen::default(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Insert at the head, dropping tail entries beyond capacity
    pub fn append(&mut self, event: LogEvent) {
        self.events.insert(0, event);
        self.events.truncate(self.capacity);
    }

    /// Create an event stamped with `now` and append it
    pub fn record<Tz: TimeZone>(
        &mut self,
        now: &DateTime<Tz>,
        message: impl Into<String>,
        severity: Severity,
        source: impl Into<String>,
    ) -> EventId
    where
        Tz::Offset: fmt::Display,
    {
        let id = self.ids.next(now.timestamp_millis());
        let timestamp = now.format(TIME_FORMAT).to_string();
        self.append(LogEvent::new(id, timestamp, message, severity, source));
        id
    }

    /// Every entry, newest first
    pub fn all(&self) -> &[LogEvent] {
        &self.events
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEvent> {
        self.events.iter()
    }

    pub fn latest(&self) -> Option<&LogEvent> {
        self.events.first()
    }
}

/// Local wall-clock stamp, as recorded on new events
pub fn local_time_string(now: &DateTime<Local>) -> String {
    now.format(TIME_FORMAT).to_string()
}
