//! Error type definitions.
//!
//! This module defines the error types used throughout the application.

use log::SetLoggerError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Errors that abort the fetch pipeline.
///
/// Every variant is terminal for the request: nothing is retried and nothing
/// is rendered once one of these is returned.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The input string is not an `http://` or `https://` URL we can use.
    #[error("malformed URL: {0}")]
    MalformedUrl(String),

    /// DNS, TCP, or TLS failure, a timeout, or a stream that ended too early.
    #[error("connection error: {0}")]
    Connection(String),

    /// The peer sent a status line, header block, or body framing we cannot parse.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The `content-encoding` names a coding we do not implement.
    #[error("unsupported content-encoding: {0}")]
    UnsupportedEncoding(String),

    /// A known content-coding whose payload is corrupt or truncated.
    #[error("decode error: {0}")]
    Decode(String),
}

impl FetchError {
    /// Stable name of the error kind, as reported by the CLI.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::MalformedUrl(_) => "MalformedURL",
            FetchError::Connection(_) => "ConnectionError",
            FetchError::Protocol(_) => "ProtocolError",
            FetchError::UnsupportedEncoding(_) => "UnsupportedEncoding",
            FetchError::Decode(_) => "DecodeError",
        }
    }
}
