//! Configuration constants.
//!
//! This module defines the constants used throughout the fetch pipeline,
//! including default ports, timeouts, size limits, and request header values.

/// URL fetched when the CLI is invoked without an argument.
pub const DEFAULT_URL: &str = "http://example.org/";

/// Default port for the `http` scheme.
pub const HTTP_DEFAULT_PORT: u16 = 80;
/// Default port for the `https` scheme.
pub const HTTPS_DEFAULT_PORT: u16 = 443;

// Network operation timeouts
/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 10;
/// TLS handshake timeout in seconds
pub const TLS_HANDSHAKE_TIMEOUT_SECS: u64 = 10;
/// Time allowed to read the complete response (headers and body) in seconds
pub const RESPONSE_READ_TIMEOUT_SECS: u64 = 30;

/// Content codings advertised in `Accept-Encoding`.
///
/// Must stay in sync with the codings `decode::decode_body` understands.
pub const ACCEPT_ENCODING: &str = "gzip, deflate, br";

/// Default User-Agent string for HTTP requests.
pub const DEFAULT_USER_AGENT: &str = concat!("plainfetch/", env!("CARGO_PKG_VERSION"));

// Response size limits
/// Maximum number of header fields (including chunked trailers) accepted in a response.
pub const MAX_HEADER_COUNT: usize = 256;
/// Maximum length in bytes of the status line or of a single header line.
pub const MAX_HEADER_LINE_LEN: usize = 16 * 1024;
/// Maximum number of interim (1xx) responses skipped before the final one
pub const MAX_INTERIM_RESPONSES: usize = 16;
/// Maximum response body size in bytes (before content decoding)
pub const MAX_BODY_SIZE: usize = 32 * 1024 * 1024;
/// Maximum body size in bytes after each content-decoding step
pub const MAX_DECODED_SIZE: usize = 64 * 1024 * 1024;
