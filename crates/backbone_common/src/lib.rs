//! Backbone Common - shared engine for the Global Backbone Monitor
//!
//! Region/provider model, the simulated transition engine, the bounded
//! event log with its filter, and the export serializer.

pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod event_log;
pub mod export;
pub mod filter;
pub mod model;
pub mod random;

pub use dashboard::{Dashboard, TickReport};
pub use error::{BackboneError, Result};
pub use event_log::{EventId, EventLog, LogEvent, Severity, SYSTEM_SOURCE};
pub use export::{ExportArtifact, ExportFormat};
pub use filter::{EmptyState, FilteredLog, LogFilter, SeverityFilter, SourceFilter};
pub use model::{Provider, ProviderStatus, Region, RegionCode, RegionStatus};
pub use random::{RandomSource, ScriptedSource, SeededSource};
