//! Logger initialization.
//!
//! This module provides functions to initialize the logger with custom formatting.

use std::io::{self, Write};

use crate::config::LogFormat;
use crate::error_handling::InitializationError;
use colored::*;
use log::{LevelFilter, Record};

/// Initializes the logger with the specified level and format.
///
/// Configures `env_logger` with custom formatting. Supports both plain text
/// (with colors and emojis) and JSON formats for structured logging. Output
/// goes to stderr so it never mixes with the rendered page on stdout.
///
/// If `RUST_LOG` is set it decides the filtering and `level` is ignored;
/// otherwise `level` applies to this crate and noisy dependencies are capped.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// # Show the pipeline stages
/// RUST_LOG=plainfetch=debug plainfetch https://example.org/
///
/// # Include the TLS handshake details from rustls
/// RUST_LOG=debug plainfetch https://example.org/
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = env_logger::Builder::from_default_env();

    if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(level);
        builder.filter_module("rustls", LevelFilter::Warn);
        builder.filter_module("plainfetch", level);
    }

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                write_json(buf, record, chrono::Utc::now().timestamp_millis())
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| write_plain(buf, record));
        }
    }

    // try_init() so a second call reports an error instead of panicking
    builder.try_init().map_err(InitializationError::from)?;

    Ok(())
}

/// One JSON object per line: `ts` (Unix millis), `level`, `target`, `msg`.
fn write_json<W: Write>(out: &mut W, record: &Record<'_>, ts_millis: i64) -> io::Result<()> {
    let msg = serde_json::to_string(&record.args().to_string()).unwrap_or_else(|_| "\"\"".into());
    writeln!(
        out,
        "{{\"ts\":{},\"level\":\"{}\",\"target\":\"{}\",\"msg\":{}}}",
        ts_millis,
        record.level(),
        record.target(),
        msg
    )
}

fn write_plain<W: Write>(out: &mut W, record: &Record<'_>) -> io::Result<()> {
    let level = record.level();
    let colored_level = match level {
        log::Level::Error => level.to_string().red(),
        log::Level::Warn => level.to_string().yellow(),
        log::Level::Info => level.to_string().green(),
        log::Level::Debug => level.to_string().blue(),
        log::Level::Trace => level.to_string().purple(),
    };

    let emoji = match level {
        log::Level::Error => "❌",
        log::Level::Warn => "⚠️",
        log::Level::Info => "✔️",
        log::Level::Debug => "🔍",
        log::Level::Trace => "🔬",
    };

    writeln!(
        out,
        "{} {} [{}] {}",
        emoji,
        record.target().cyan(),
        colored_level,
        record.args()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn test_json_line_is_valid_json() {
        let mut out = Vec::new();
        write_json(
            &mut out,
            &Record::builder()
                .args(format_args!("fetched \"page\"\nnext line"))
                .level(Level::Warn)
                .target("plainfetch::fetch")
                .build(),
            1_700_000_000_123,
        )
        .unwrap();

        let line = String::from_utf8(out).unwrap();
        assert!(line.ends_with('\n'));
        assert_eq!(line.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(value["ts"], 1_700_000_000_123i64);
        assert_eq!(value["level"], "WARN");
        assert_eq!(value["target"], "plainfetch::fetch");
        assert_eq!(value["msg"], "fetched \"page\"\nnext line");
    }

    #[test]
    fn test_plain_line_carries_level_target_and_message() {
        let mut out = Vec::new();
        write_plain(
            &mut out,
            &Record::builder()
                .args(format_args!("Connecting to example.org:443"))
                .level(Level::Debug)
                .target("plainfetch::transport")
                .build(),
        )
        .unwrap();

        let line = String::from_utf8(out).unwrap();
        assert!(line.starts_with("🔍 "), "{line}");
        assert!(line.contains("plainfetch::transport"), "{line}");
        assert!(line.contains("DEBUG"), "{line}");
        assert!(line.trim_end().ends_with("Connecting to example.org:443"), "{line}");
    }

    // env_logger can only be installed once per process, so only the first
    // successful call in this test binary returns Ok.
    #[test]
    fn test_second_init_reports_error() {
        let first = init_logger_with(LevelFilter::Info, LogFormat::Plain);
        let second = init_logger_with(LevelFilter::Info, LogFormat::Json);
        assert!(first.is_err() || second.is_err());
        if let Err(e) = second {
            assert!(e.to_string().starts_with("Logger initialization error"));
        }
    }
}
