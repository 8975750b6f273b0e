//! plainfetch library: fetch one URL and render its text
//!
//! The core is a five-stage pipeline over a single connection:
//! URL parsing, transport (TCP or TLS), HTTP/1.1 request and response,
//! content decoding (gzip, deflate, brotli), and tag-stripping rendering.
//!
//! # Example
//!
//! ```no_run
//! use plainfetch::{fetch_text, Config};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! plainfetch::initialization::init_crypto_provider();
//! let text = fetch_text("https://example.org/", &Config::default()).await?;
//! println!("{text}");
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! The pipeline is async and needs a Tokio runtime; a current-thread runtime
//! is enough since only one request is ever in flight.

pub mod config;
pub mod decode;
mod error_handling;
pub mod fetch;
pub mod http;
pub mod initialization;
pub mod render;
pub mod transport;
pub mod url;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{FetchError, InitializationError};
pub use fetch::{fetch_text, Fetcher, Page};
pub use render::{Render, TagStripper};
pub use url::{Scheme, Url};
