//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::time::Duration;

use clap::Parser;

use crate::config::constants::{
    DEFAULT_URL, DEFAULT_USER_AGENT, RESPONSE_READ_TIMEOUT_SECS, TCP_CONNECT_TIMEOUT_SECS,
    TLS_HANDSHAKE_TIMEOUT_SECS,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Command-line interface: a single optional URL.
#[derive(Debug, Parser)]
#[command(name = "plainfetch", version, about)]
pub struct Cli {
    /// URL to fetch (http:// or https://)
    #[arg(default_value = DEFAULT_URL)]
    pub url: String,
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```
/// use plainfetch::Config;
/// use std::time::Duration;
///
/// let config = Config {
///     read_timeout: Duration::from_secs(5),
///     ..Default::default()
/// };
/// assert_eq!(config.user_agent, plainfetch::config::DEFAULT_USER_AGENT);
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level (ignored when `RUST_LOG` is set)
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// TCP connect timeout
    pub connect_timeout: Duration,

    /// TLS handshake timeout
    pub handshake_timeout: Duration,

    /// Timeout for reading the whole response once the request is sent
    pub read_timeout: Duration,

    /// HTTP User-Agent header value
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Warn,
            log_format: LogFormat::Plain,
            connect_timeout: Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS),
            handshake_timeout: Duration::from_secs(TLS_HANDSHAKE_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(RESPONSE_READ_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
