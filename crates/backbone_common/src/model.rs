//! Region and provider model.
//!
//! A provider owns an ordered, non-empty list of regions. Only region
//! status/latency and the derived provider status change over time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Latency above this reads as high (ms)
const HIGH_LATENCY_MS: u32 = 150;

/// Latency above this reads as elevated (ms)
const ELEVATED_LATENCY_MS: u32 = 80;

/// Geographic region code, unique within a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionCode {
    Us,
    Eu,
    Asia,
}

impl RegionCode {
    /// Minimum realistic round-trip time for this geography
    pub fn latency_floor_ms(&self) -> u32 {
        match self {
            RegionCode::Asia => 90,
            RegionCode::Eu => 20,
            _ => 10,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RegionCode::Us => "us",
            RegionCode::Eu => "eu",
            RegionCode::Asia => "asia",
        }
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Health of a single region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionStatus {
    Online,
    Degraded,
    Down,
}

impl RegionStatus {
    /// Short badge shown next to a non-online region
    pub fn badge(&self) -> Option<&'static str> {
        match self {
            RegionStatus::Online => None,
            RegionStatus::Degraded => Some("SLOW"),
            RegionStatus::Down => Some("DOWN"),
        }
    }
}

impl fmt::Display for RegionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionStatus::Online => write!(f, "online"),
            RegionStatus::Degraded => write!(f, "degraded"),
            RegionStatus::Down => write!(f, "down"),
        }
    }
}

/// Aggregate health of a provider, derived from its regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderStatus {
    Online,
    Degraded,
    Partial,
    Down,
}

impl ProviderStatus {
    /// Derive the aggregate from a region set.
    ///
    /// Checks run in priority order: all down, any down, any degraded.
    pub fn derive(regions: &[Region]) -> Self {
        let down = regions
            .iter()
            .filter(|r| r.status == RegionStatus::Down)
            .count();
        let degraded = regions
            .iter()
            .filter(|r| r.status == RegionStatus::Degraded)
            .count();

        if down == regions.len() {
            ProviderStatus::Down
        } else if down > 0 {
            ProviderStatus::Partial
        } else if degraded > 0 {
            ProviderStatus::Degraded
        } else {
            ProviderStatus::Online
        }
    }

    /// Human-readable status line for a provider tile
    pub fn display_text(&self) -> &'static str {
        match self {
            ProviderStatus::Online => "System Normal",
            ProviderStatus::Degraded => "Performance Issue",
            ProviderStatus::Partial => "Partial Outage",
            ProviderStatus::Down => "Out of Service",
        }
    }
}

impl fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderStatus::Online => write!(f, "online"),
            ProviderStatus::Degraded => write!(f, "degraded"),
            ProviderStatus::Partial => write!(f, "partial"),
            ProviderStatus::Down => write!(f, "down"),
        }
    }
}

/// Display band for a latency reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyBand {
    Normal,
    Elevated,
    High,
    /// Region is down; latency carries no signal
    NoSignal,
}

/// One geography of one provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionCode,
    /// Display label, not load-bearing
    pub name: String,
    pub status: RegionStatus,
    /// Milliseconds; always 0 while down
    pub latency: u32,
}

impl Region {
    pub fn new(id: RegionCode, name: impl Into<String>, latency: u32) -> Self {
        Self {
            id,
            name: name.into(),
            status: RegionStatus::Online,
            latency,
        }
    }

    /// Latency as a reading, `None` while the region is down
    pub fn latency_reading(&self) -> Option<u32> {
        match self.status {
            RegionStatus::Down => None,
            _ => Some(self.latency),
        }
    }

    pub fn latency_band(&self) -> LatencyBand {
        match self.latency_reading() {
            None => LatencyBand::NoSignal,
            Some(ms) if ms > HIGH_LATENCY_MS => LatencyBand::High,
            Some(ms) if ms > ELEVATED_LATENCY_MS => LatencyBand::Elevated,
            Some(_) => LatencyBand::Normal,
        }
    }
}

/// A monitored external service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provider {
    pub id: u32,
    pub name: String,
    pub category: String,
    pub external_link: String,
    regions: Vec<Region>,
    /// Derived from `regions`; refreshed through `with_regions`
    status: ProviderStatus,
}

impl Provider {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        category: impl Into<String>,
        external_link: impl Into<String>,
        regions: Vec<Region>,
    ) -> Self {
        let status = ProviderStatus::derive(&regions);
        Self {
            id,
            name: name.into(),
            category: category.into(),
            external_link: external_link.into(),
            regions,
            status,
        }
    }

    pub fn status(&self) -> ProviderStatus {
        self.status
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region(&self, id: RegionCode) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    /// Same provider with a replaced region set and re-derived status
    pub fn with_regions(&self, regions: Vec<Region>) -> Self {
        let status = ProviderStatus::derive(&regions);
        Self {
            regions,
            status,
            ..self.clone()
        }
    }
}
