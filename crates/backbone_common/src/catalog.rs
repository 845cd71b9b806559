//! Static provider catalog.
//!
//! The catalog is fixed for the lifetime of the process. It is the seed state
//! for the first tick and is only ever advanced, never reshaped.

use crate::error::{BackboneError, Result};
use crate::model::{Provider, Region, RegionCode};
use std::collections::HashSet;

/// Built-in catalog: six providers, three regions each, all online
pub fn default_catalog() -> Vec<Provider> {
    use RegionCode::{Asia, Eu, Us};

    vec![
        Provider::new(
            1,
            "Cloudflare",
            "CDN & Security",
            "https://www.cloudflarestatus.com/",
            vec![
                Region::new(Us, "North America", 12),
                Region::new(Eu, "Europe", 18),
                Region::new(Asia, "Asia/Pacific", 85),
            ],
        ),
        Provider::new(
            2,
            "AWS (Amazon)",
            "Cloud Infrastructure",
            "https://health.aws.amazon.com/",
            vec![
                Region::new(Us, "US-East-1", 45),
                Region::new(Eu, "EU-Central", 32),
                Region::new(Asia, "AP-Northeast", 120),
            ],
        ),
        Provider::new(
            3,
            "Google Cloud",
            "Cloud & Compute",
            "https://status.cloud.google.com/",
            vec![
                Region::new(Us, "Americas", 28),
                Region::new(Eu, "Europe", 25),
                Region::new(Asia, "Asia", 90),
            ],
        ),
        Provider::new(
            4,
            "Microsoft Azure",
            "Enterprise Cloud",
            "https://azure.status.microsoft/",
            vec![
                Region::new(Us, "US Regions", 34),
                Region::new(Eu, "Europe", 30),
                Region::new(Asia, "Asia Pacific", 110),
            ],
        ),
        Provider::new(
            5,
            "Lumen (Level 3)",
            "Tier 1 Carrier",
            "https://status.lumen.com/",
            vec![
                Region::new(Us, "North America", 18),
                Region::new(Eu, "Trans-Atlantic", 78),
                Region::new(Asia, "Trans-Pacific", 145),
            ],
        ),
        Provider::new(
            6,
            "Akamai",
            "Enterprise CDN",
            "https://www.akamai.com/system-status",
            vec![
                Region::new(Us, "Americas", 15),
                Region::new(Eu, "EMEA", 22),
                Region::new(Asia, "APJ", 95),
            ],
        ),
    ]
}

/// Check catalog shape: non-empty, unique provider ids and names,
/// every provider has regions with unique codes.
pub fn validate(providers: &[Provider]) -> Result<()> {
    if providers.is_empty() {
        return Err(BackboneError::InvalidCatalog(
            "catalog has no providers".to_string(),
        ));
    }

    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    for provider in providers {
        if !ids.insert(provider.id) {
            return Err(BackboneError::InvalidCatalog(format!(
                "duplicate provider id {}",
                provider.id
            )));
        }
        if !names.insert(provider.name.as_str()) {
            return Err(BackboneError::InvalidCatalog(format!(
                "duplicate provider name '{}'",
                provider.name
            )));
        }
        if provider.regions().is_empty() {
            return Err(BackboneError::InvalidCatalog(format!(
                "provider '{}' has no regions",
                provider.name
            )));
        }

        let mut codes = HashSet::new();
        for region in provider.regions() {
            if !codes.insert(region.id) {
                return Err(BackboneError::InvalidCatalog(format!(
                    "provider '{}' lists region '{}' twice",
                    provider.name, region.id
                )));
            }
        }
    }

    Ok(())
}

/// Source filter choices: the system source followed by every provider
pub fn source_names(providers: &[Provider]) -> Vec<String> {
    std::iter::once(crate::event_log::SYSTEM_SOURCE.to_string())
        .chain(providers.iter().map(|p| p.name.clone()))
        .collect()
}
