//! Terminal renderer - provider tiles and the event log table.
//!
//! Reads the dashboard only; never mutates it. ASCII only.

use backbone_common::event_log::local_time_string;
use backbone_common::filter::{EmptyState, FilteredLog, LogFilter};
use backbone_common::model::{LatencyBand, Provider, ProviderStatus, Region, RegionStatus};
use backbone_common::{Dashboard, LogEvent, Severity};
use owo_colors::OwoColorize;
use std::fmt::Write;

pub const SEPARATOR: &str =
    "------------------------------------------------------------------------";

/// Full screen: header, provider tiles, log panel
pub fn render_dashboard(dashboard: &Dashboard) -> String {
    let mut out = String::new();

    let updated = dashboard
        .last_updated()
        .map(local_time_string)
        .unwrap_or_else(|| "--:--:--".to_string());
    let mode = if dashboard.is_refreshing() {
        "REFRESHING".cyan().to_string()
    } else if dashboard.is_live() {
        "LIVE".bright_green().to_string()
    } else {
        "PAUSED".dimmed().to_string()
    };

    let _ = writeln!(out, "{}", "Global Backbone Monitor".bold());
    let _ = writeln!(out, "Updated {}  [{}]  {}", updated, mode, dashboard.status_summary());
    let _ = writeln!(out, "{}", SEPARATOR.dimmed());

    for provider in dashboard.providers() {
        out.push_str(&render_provider(provider));
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "{}", SEPARATOR.dimmed());
    let _ = writeln!(out, "sources: {}", dashboard.source_names().join(", ").dimmed());
    out.push_str(&render_log(&dashboard.filtered(), dashboard.filter()));
    out
}

pub fn render_provider(provider: &Provider) -> String {
    let mut out = String::new();
    let status = provider.status();
    let text = status.display_text();
    let colored = match status {
        ProviderStatus::Online => text.green().to_string(),
        ProviderStatus::Degraded => text.yellow().to_string(),
        ProviderStatus::Partial => text.bright_yellow().to_string(),
        ProviderStatus::Down => text.bright_red().to_string(),
    };

    let _ = writeln!(
        out,
        "{} ({})  {}",
        provider.name.bold(),
        provider.category.dimmed(),
        colored
    );
    for region in provider.regions() {
        let _ = writeln!(out, "  {}", render_region(region));
    }
    let _ = writeln!(out, "  report: {}", provider.external_link.dimmed());
    out
}

/// One region row; a down region shows `--` instead of a latency
pub fn render_region(region: &Region) -> String {
    let marker = match region.status {
        RegionStatus::Online => "*".green().to_string(),
        RegionStatus::Degraded => "*".yellow().to_string(),
        RegionStatus::Down => "*".red().to_string(),
    };
    // pad before colouring
    let badge = format!("{:>6}", region.status.badge().map(|b| format!("[{}]", b)).unwrap_or_default());
    let badge = match region.status {
        RegionStatus::Down => badge.red().to_string(),
        _ => badge.yellow().to_string(),
    };

    format!("{} {:<16} {} {}", marker, region.name, badge, latency_text(region))
}

fn latency_text(region: &Region) -> String {
    let text = match region.latency_reading() {
        Some(ms) => format!("{:>6}", format!("{}ms", ms)),
        None => format!("{:>6}", "--"),
    };
    match region.latency_band() {
        LatencyBand::Normal => text.green().to_string(),
        LatencyBand::Elevated => text.yellow().to_string(),
        LatencyBand::High => text.bright_red().to_string(),
        LatencyBand::NoSignal => text.red().to_string(),
    }
}

/// Log table for a filtered view, or its empty state
pub fn render_log(view: &FilteredLog, filter: &LogFilter) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  filter: {}", "EVENT LOG".bold(), filter);

    match view.empty_state() {
        Some(EmptyState::LogEmpty) => {
            let _ = writeln!(out, "  {}", "No events recorded yet.".dimmed());
        }
        Some(EmptyState::NoMatches) => {
            let _ = writeln!(
                out,
                "  {}",
                "No entries match the current filter. Type 'clear' to reset.".dimmed()
            );
        }
        None => {
            let _ = writeln!(out, "  {:<8}  {:<8}  {:<18}  {}", "TIME", "LEVEL", "SOURCE", "MESSAGE");
            for event in &view.events {
                let _ = writeln!(out, "  {}", render_event(event));
            }
        }
    }

    let _ = writeln!(out, "Showing {} / Total {}", view.shown(), view.total);
    out
}

fn render_event(event: &LogEvent) -> String {
    let label = format!("{:<8}", event.severity().label());
    let label = match event.severity() {
        Severity::Error => label.bright_red().to_string(),
        Severity::Warning => label.yellow().to_string(),
        _ => label.green().to_string(),
    };
    format!(
        "{:<8}  {}  {:<18}  {}",
        event.timestamp(),
        label,
        event.source(),
        event.message()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use backbone_common::event_log::EventId;
    use backbone_common::model::RegionCode;

    #[test]
    fn test_down_region_never_shows_a_number() {
        let mut region = Region::new(RegionCode::Eu, "EMEA", 22);
        assert!(render_region(&region).contains("22ms"));

        region.status = RegionStatus::Down;
        region.latency = 0;
        let line = render_region(&region);
        assert!(line.contains("--"));
        assert!(line.contains("DOWN"));
        assert!(!line.contains("0ms"));
    }

    #[test]
    fn test_latency_column_is_right_aligned() {
        let short = render_region(&Region::new(RegionCode::Us, "Americas", 15));
        let long = render_region(&Region::new(RegionCode::Asia, "APJ", 145));
        assert!(short.contains("  15ms"));
        assert!(long.contains(" 145ms"));

        let mut down = Region::new(RegionCode::Eu, "EMEA", 22);
        down.status = RegionStatus::Down;
        down.latency = 0;
        assert!(render_region(&down).contains("    --"));
        assert!(render_region(&down).contains("[DOWN]"));
    }

    #[test]
    fn test_degraded_region_badge() {
        let mut region = Region::new(RegionCode::Us, "Americas", 140);
        region.status = RegionStatus::Degraded;
        let line = render_region(&region);
        assert!(line.contains("SLOW"));
        assert!(line.contains("140ms"));
    }

    #[test]
    fn test_log_empty_states_differ() {
        let filter = LogFilter::default();
        let empty = render_log(
            &FilteredLog {
                events: vec![],
                total: 0,
            },
            &filter,
        );
        let no_match = render_log(
            &FilteredLog {
                events: vec![],
                total: 3,
            },
            &filter,
        );

        assert!(empty.contains("No events recorded yet."));
        assert!(no_match.contains("No entries match the current filter."));
        assert!(no_match.contains("Showing 0 / Total 3"));
    }

    #[test]
    fn test_log_rows_use_external_labels() {
        let view = FilteredLog {
            events: vec![LogEvent::new(
                EventId(1),
                "08:15:00",
                "US-East-1 entered critical outage",
                Severity::Error,
                "AWS (Amazon)",
            )],
            total: 1,
        };
        let text = render_log(&view, &LogFilter::default());
        assert!(text.contains("CRITICAL"));
        assert!(text.contains("AWS (Amazon)"));
        assert!(text.contains("filter: ALL / ALL"));
    }

    #[test]
    fn test_dashboard_renders_every_provider() {
        let dashboard = Dashboard::with_default_catalog();
        let text = render_dashboard(&dashboard);
        for provider in dashboard.providers() {
            assert!(text.contains(&provider.name));
        }
        assert!(text.contains("--:--:--"));
        assert!(text.contains("No events recorded yet."));
    }
}
