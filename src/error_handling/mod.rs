//! Error handling.
//!
//! Fetch failures fall into five kinds, one per pipeline stage that can fail:
//! - **MalformedURL**: the input string could not be parsed
//! - **ConnectionError**: DNS/TCP/TLS failure or a premature end of stream
//! - **ProtocolError**: an unparsable status line, header block, or body framing
//! - **UnsupportedEncoding**: an unknown `content-encoding` token
//! - **DecodeError**: a corrupt or truncated compressed payload

mod types;

// Re-export public API
pub use types::{FetchError, InitializationError};
