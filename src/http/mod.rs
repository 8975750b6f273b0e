//! HTTP/1.1 wire format: request serialization and response parsing.
//!
//! This module provides:
//! - `Request`: the GET request line and header block we send
//! - `Response`: status, headers, and framed body read back from the stream
//! - `Headers`: response header map with lowercase keys (last value wins)

mod body;
mod headers;
mod request;
mod response;

// Re-export public API
pub use headers::Headers;
pub use request::{build_request, Request};
pub use response::{read_response, Response};
