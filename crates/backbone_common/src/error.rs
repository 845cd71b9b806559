//! Error types for the backbone monitor.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackboneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Unknown severity: {0}")]
    UnknownSeverity(String),

    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

pub type Result<T> = std::result::Result<T, BackboneError>;
