//! Interactive commands for the live dashboard.
//!
//! One command per stdin line. State-only commands are applied directly to
//! the dashboard; the rest come back as an `Action` for the scheduler.

use backbone_common::error::{BackboneError, Result};
use backbone_common::filter::{SeverityFilter, SourceFilter};
use backbone_common::{Dashboard, ExportFormat};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Help text listing every command
pub const HELP: &str = "\
commands:
  pause | live | toggle        control live refresh
  refresh                      run one tick now
  severity <all|error|warning|success|info>
  source <all|NAME>            exact, case-sensitive provider name
  clear                        reset both filters
  export <csv|json>            write the filtered log to the export directory
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Pause,
    Live,
    Toggle,
    Refresh,
    Severity(SeverityFilter),
    Source(SourceFilter),
    ClearFilters,
    Export(ExportFormat),
    Quit,
}

/// Follow-up the scheduler has to carry out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Refresh,
    Export(ExportFormat),
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match (word.to_ascii_lowercase().as_str(), rest) {
            ("pause", "") => Ok(Command::Pause),
            ("live", "") | ("resume", "") => Ok(Command::Live),
            ("toggle", "") => Ok(Command::Toggle),
            ("refresh", "") => Ok(Command::Refresh),
            ("clear", "") => Ok(Command::ClearFilters),
            ("quit", "") | ("exit", "") => Ok(Command::Quit),
            ("severity", value) if !value.is_empty() => Ok(Command::Severity(value.parse()?)),
            // keep the raw name: source matching is case-sensitive
            ("source", value) if !value.is_empty() => Ok(Command::Source(SourceFilter::from(value))),
            ("export", value) if !value.is_empty() => Ok(Command::Export(value.parse()?)),
            _ => Err(BackboneError::UnknownCommand(line.to_string())),
        }
    }

    /// Apply state changes; returns what is left for the scheduler
    pub fn apply(&self, dashboard: &mut Dashboard) -> Action {
        match self {
            Command::Pause => {
                dashboard.set_live(false);
                info!("Live refresh paused");
                Action::None
            }
            Command::Live => {
                dashboard.set_live(true);
                info!("Live refresh enabled");
                Action::None
            }
            Command::Toggle => {
                let live = dashboard.toggle_live();
                info!("Live refresh {}", if live { "enabled" } else { "paused" });
                Action::None
            }
            Command::Severity(severity) => {
                dashboard.set_severity_filter(*severity);
                Action::None
            }
            Command::Source(source) => {
                if let SourceFilter::Only(name) = source {
                    let choices = dashboard.source_names();
                    if !choices.contains(name) {
                        warn!("No source named '{}'; choices: {}", name, choices.join(", "));
                    }
                }
                dashboard.set_source_filter(source.clone());
                Action::None
            }
            Command::ClearFilters => {
                dashboard.clear_filters();
                Action::None
            }
            Command::Refresh => Action::Refresh,
            Command::Export(format) => Action::Export(*format),
            Command::Quit => Action::Quit,
        }
    }
}

/// Forward one command per input line until EOF, a read error, or the
/// receiver going away. Bytes that are not UTF-8 are replaced, so one bad line
/// never ends the reader.
pub async fn read_commands<R>(mut input: R, commands: mpsc::Sender<Command>)
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match input.read_until(b'\n', &mut buf).await {
            Ok(0) => {
                info!("Command input closed");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Failed to read command input: {}", e);
                break;
            }
        }

        let line = String::from_utf8_lossy(&buf);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match Command::parse(line) {
            Ok(command) => {
                if commands.send(command).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                warn!("{}", e);
                eprintln!("{}", HELP);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backbone_common::Severity;

    async fn read_all(input: &[u8]) -> Vec<Command> {
        let (tx, mut rx) = mpsc::channel(16);
        read_commands(input, tx).await;
        let mut out = Vec::new();
        while let Some(command) = rx.recv().await {
            out.push(command);
        }
        out
    }

    #[tokio::test]
    async fn test_reader_survives_invalid_utf8() {
        let commands = read_all(b"pause\n\xff\xfe bad\nexport csv\nquit\n").await;
        assert_eq!(
            commands,
            vec![
                Command::Pause,
                Command::Export(ExportFormat::Csv),
                Command::Quit
            ]
        );
    }

    #[tokio::test]
    async fn test_reader_skips_blank_and_unknown_lines() {
        let commands = read_all(b"\n  \ndance\r\nsource Akamai\r\nrefresh").await;
        assert_eq!(
            commands,
            vec![
                Command::Source(SourceFilter::Only("Akamai".to_string())),
                Command::Refresh
            ]
        );
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(Command::parse("pause").unwrap(), Command::Pause);
        assert_eq!(Command::parse("  LIVE ").unwrap(), Command::Live);
        assert_eq!(Command::parse("toggle").unwrap(), Command::Toggle);
        assert_eq!(Command::parse("clear").unwrap(), Command::ClearFilters);
        assert_eq!(Command::parse("quit").unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_filters_keep_source_case() {
        assert_eq!(
            Command::parse("severity error").unwrap(),
            Command::Severity(SeverityFilter::Only(Severity::Error))
        );
        assert_eq!(
            Command::parse("source AWS (Amazon)").unwrap(),
            Command::Source(SourceFilter::Only("AWS (Amazon)".to_string()))
        );
        assert_eq!(
            Command::parse("source all").unwrap(),
            Command::Source(SourceFilter::All)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            Command::parse("dance"),
            Err(BackboneError::UnknownCommand(_))
        ));
        assert!(Command::parse("severity").is_err());
        assert!(Command::parse("export xml").is_err());
        assert!(Command::parse("pause now").is_err());
    }

    #[test]
    fn test_apply_updates_dashboard() {
        let mut dashboard = Dashboard::with_default_catalog();

        assert_eq!(Command::Pause.apply(&mut dashboard), Action::None);
        assert!(!dashboard.is_live());
        Command::Toggle.apply(&mut dashboard);
        assert!(dashboard.is_live());

        Command::parse("severity warning")
            .unwrap()
            .apply(&mut dashboard);
        Command::parse("source Akamai").unwrap().apply(&mut dashboard);
        assert_eq!(dashboard.filter().to_string(), "WARNING / AKAMAI");

        Command::ClearFilters.apply(&mut dashboard);
        assert!(!dashboard.filter().is_active());

        assert_eq!(
            Command::Export(ExportFormat::Json).apply(&mut dashboard),
            Action::Export(ExportFormat::Json)
        );
        assert_eq!(Command::Quit.apply(&mut dashboard), Action::Quit);
    }
}
