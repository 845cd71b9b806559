//! Transition engine
//!
//! Advances every region one tick and reports status transitions.
//!
//! Per region, in catalog order:
//! 1. status roll: > 0.99 down, > 0.94 degraded, otherwise online
//! 2. latency: previous + jitter in [-7, 7], floored per region code,
//!    +120 ms while degraded, forced to 0 while down
//!
//! The engine is total and pure apart from the injected random source.

use crate::event_log::Severity;
use crate::model::{Provider, Region, RegionCode, RegionStatus};
use crate::random::RandomSource;
use tracing::debug;

/// Roll above this takes the region down
pub const DOWN_THRESHOLD: f64 = 0.99;

/// Roll above this degrades the region
pub const DEGRADED_THRESHOLD: f64 = 0.94;

/// Maximum latency drift per tick, either direction (ms)
pub const LATENCY_JITTER_MS: i32 = 7;

/// Added on top of the floored latency while degraded (ms)
pub const DEGRADED_PENALTY_MS: u32 = 120;

/// A region whose status changed this tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub provider: String,
    pub region_id: RegionCode,
    pub region_name: String,
    pub from: RegionStatus,
    pub to: RegionStatus,
}

impl Transition {
    /// Severity and message for the log, or `None` for silent transitions.
    ///
    /// Degraded -> online stays silent; only recovery from down is announced.
    pub fn log_entry(&self) -> Option<(Severity, String)> {
        match (self.from, self.to) {
            (_, RegionStatus::Down) => Some((
                Severity::Error,
                format!("{} entered critical outage", self.region_name),
            )),
            (_, RegionStatus::Degraded) => Some((
                Severity::Warning,
                format!("{} latency increase detected", self.region_name),
            )),
            (RegionStatus::Down, RegionStatus::Online) => Some((
                Severity::Success,
                format!("{} back online", self.region_name),
            )),
            _ => None,
        }
    }
}

/// Result of one tick: the next catalog state plus detected transitions
#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub providers: Vec<Provider>,
    pub transitions: Vec<Transition>,
}

/// Map a uniform roll onto a candidate status
pub fn status_for_roll(roll: f64) -> RegionStatus {
    if roll > DOWN_THRESHOLD {
        RegionStatus::Down
    } else if roll > DEGRADED_THRESHOLD {
        RegionStatus::Degraded
    } else {
        RegionStatus::Online
    }
}

/// Next latency for a region given its new status and the drawn jitter
pub fn next_latency(region: &Region, status: RegionStatus, jitter: i32) -> u32 {
    let floor = region.id.latency_floor_ms();
    let drifted = (i64::from(region.latency) + i64::from(jitter)).max(i64::from(floor));
    let drifted = u32::try_from(drifted).unwrap_or(u32::MAX);

    match status {
        RegionStatus::Online => drifted,
        RegionStatus::Degraded => drifted.saturating_add(DEGRADED_PENALTY_MS),
        RegionStatus::Down => 0,
    }
}

/// Advance a single region one tick
pub fn next_region<R: RandomSource + ?Sized>(region: &Region, random: &mut R) -> Region {
    let status = status_for_roll(random.roll());
    let jitter = random.jitter(-LATENCY_JITTER_MS, LATENCY_JITTER_MS);

    Region {
        id: region.id,
        name: region.name.clone(),
        status,
        latency: next_latency(region, status, jitter),
    }
}

/// Advance every provider one tick
pub fn advance<R: RandomSource + ?Sized>(providers: &[Provider], random: &mut R) -> TickOutcome {
    let mut transitions = Vec::new();

    let providers = providers
        .iter()
        .map(|provider| {
            let regions = provider
                .regions()
                .iter()
                .map(|region| {
                    let next = next_region(region, random);
                    if next.status != region.status {
                        debug!(
                            "{} / {}: {} -> {}",
                            provider.name, region.name, region.status, next.status
                        );
                        transitions.push(Transition {
                            provider: provider.name.clone(),
                            region_id: region.id,
                            region_name: region.name.clone(),
                            from: region.status,
                            to: next.status,
                        });
                    }
                    next
                })
                .collect();
            provider.with_regions(regions)
        })
        .collect();

    TickOutcome {
        providers,
        transitions,
    }
}
