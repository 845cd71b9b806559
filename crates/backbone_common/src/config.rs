//! Configuration management for the backbone monitor.
//!
//! Loads settings from /etc/backbone/config.toml or uses defaults.
//! An optional `[[providers]]` table replaces the built-in catalog.

use crate::catalog;
use crate::error::Result;
use crate::event_log::DEFAULT_CAPACITY;
use crate::model::{Provider, Region, RegionCode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Config file path
pub const CONFIG_PATH: &str = "/etc/backbone/config.toml";

/// Longest accepted tick interval or settle delay (one day)
pub const MAX_DELAY_MS: u64 = 86_400_000;

/// Tick loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Interval between live ticks
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,

    /// Artificial refresh latency before a tick is published
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,

    /// Whether live refresh starts enabled
    #[serde(default = "default_live_on_start")]
    pub live_on_start: bool,

    /// Event log capacity
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,

    /// Fixed seed for reproducible runs; entropy when unset
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_tick_interval() -> u64 {
    4_000
}

fn default_settle_delay() -> u64 {
    600
}

fn default_live_on_start() -> bool {
    true
}

fn default_log_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            settle_delay_ms: default_settle_delay(),
            live_on_start: default_live_on_start(),
            log_capacity: default_log_capacity(),
            seed: None,
        }
    }
}

impl MonitorConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.clamp(1, MAX_DELAY_MS))
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms.min(MAX_DELAY_MS))
    }
}

/// Export destination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_dir")]
    pub directory: PathBuf,
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: default_export_dir(),
        }
    }
}

/// Catalog override entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderEntry {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub url: String,
    pub regions: Vec<RegionEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionEntry {
    pub id: RegionCode,
    pub name: String,
    #[serde(default)]
    pub latency: u32,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackboneConfig {
    #[serde(default)]
    pub monitor: MonitorConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub providers: Vec<ProviderEntry>,
}

impl BackboneConfig {
    /// Load from `path`, or the default location when `None`.
    ///
    /// A missing or malformed file falls back to defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.unwrap_or_else(|| Path::new(CONFIG_PATH));

        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::from_file(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Strict load; errors on unreadable or malformed files
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Catalog to monitor: the override when present, else the built-in set
    pub fn catalog(&self) -> Result<Vec<Provider>> {
        if self.providers.is_empty() {
            return Ok(catalog::default_catalog());
        }

        let providers: Vec<Provider> = self
            .providers
            .iter()
            .map(|entry| {
                let regions = entry
                    .regions
                    .iter()
                    .map(|r| {
                        Region::new(r.id, r.name.clone(), r.latency.max(r.id.latency_floor_ms()))
                    })
                    .collect();
                Provider::new(
                    entry.id,
                    entry.name.clone(),
                    entry.category.clone(),
                    entry.url.clone(),
                    regions,
                )
            })
            .collect();

        catalog::validate(&providers)?;
        Ok(providers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackboneError;

    #[test]
    fn test_defaults() {
        let config = BackboneConfig::default();
        assert_eq!(config.monitor.tick_interval_ms, 4_000);
        assert_eq!(config.monitor.settle_delay_ms, 600);
        assert_eq!(config.monitor.log_capacity, 50);
        assert!(config.monitor.live_on_start);
        assert_eq!(config.catalog().unwrap().len(), 6);
    }

    #[test]
    fn test_delays_are_clamped() {
        let config = BackboneConfig::parse(
            "[monitor]\ntick_interval_ms = 18446744073709551615\nsettle_delay_ms = 18446744073709551615\n",
        )
        .unwrap();
        assert_eq!(config.monitor.tick_interval(), Duration::from_millis(MAX_DELAY_MS));
        assert_eq!(config.monitor.settle_delay(), Duration::from_millis(MAX_DELAY_MS));

        let zero = BackboneConfig::parse("[monitor]\ntick_interval_ms = 0\n").unwrap();
        assert_eq!(zero.monitor.tick_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = BackboneConfig::parse(
            r#"
            [monitor]
            seed = 9
            live_on_start = false
            "#,
        )
        .unwrap();
        assert_eq!(config.monitor.seed, Some(9));
        assert!(!config.monitor.live_on_start);
        assert_eq!(config.monitor.tick_interval_ms, 4_000);
        assert_eq!(config.export.directory, PathBuf::from("."));
    }

    #[test]
    fn test_catalog_override() {
        let config = BackboneConfig::parse(
            r#"
            [[providers]]
            id = 1
            name = "Fastly"
            category = "Edge Cloud"
            url = "https://www.fastlystatus.com/"

            [[providers.regions]]
            id = "us"
            name = "North America"
            latency = 14

            [[providers.regions]]
            id = "asia"
            name = "APAC"
            latency = 40
            "#,
        )
        .unwrap();

        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].name, "Fastly");
        // configured latency below the floor is raised to it
        assert_eq!(catalog[0].regions()[1].latency, 90);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let config = BackboneConfig::parse(
            r#"
            [[providers]]
            id = 1
            name = "Hollow"
            regions = []
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.catalog(),
            Err(BackboneError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        assert!(matches!(
            BackboneConfig::parse("[monitor\nseed ="),
            Err(BackboneError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_load_falls_back_on_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "not = [valid").unwrap();

        let config = BackboneConfig::load(Some(&path));
        assert_eq!(config.monitor.tick_interval_ms, 4_000);

        let missing = dir.path().join("missing.toml");
        let config = BackboneConfig::load(Some(&missing));
        assert!(config.providers.is_empty());
    }
}
