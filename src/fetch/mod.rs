//! The fetch pipeline.
//!
//! Runs one request through its stages in order:
//! URL → connect → build/send → read → decode → render.
//!
//! The connection lives only inside [`Fetcher::exchange`]. It is closed once the
//! body has been read, and dropped on every early return, so decoding and
//! rendering never run with a socket open.

use std::time::Instant;

use log::{debug, info, warn};
use tokio::io::AsyncWriteExt;

use crate::config::Config;
use crate::decode::decode_body;
use crate::error_handling::FetchError;
use crate::http::{build_request, read_response, Headers, Response};
use crate::render::{Render, TagStripper};
use crate::transport::connect;
use crate::url::Url;

/// Result of a successful fetch.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: Url,
    pub status: u16,
    pub reason: String,
    pub headers: Headers,
    /// Rendered body text
    pub text: String,
}

/// Runs the pipeline with a fixed configuration and renderer.
#[derive(Debug, Clone)]
pub struct Fetcher<R = TagStripper> {
    config: Config,
    renderer: R,
}

impl Fetcher<TagStripper> {
    /// Creates a fetcher that renders with [`TagStripper`].
    pub fn new(config: Config) -> Self {
        Self::with_renderer(config, TagStripper)
    }
}

impl<R: Render> Fetcher<R> {
    pub fn with_renderer(config: Config, renderer: R) -> Self {
        Self { config, renderer }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetches `input` and renders its body.
    ///
    /// Exactly one attempt is made. The first failing stage aborts the
    /// pipeline; nothing is rendered for a body that failed to decode.
    ///
    /// # Errors
    ///
    /// Returns the `FetchError` of the first stage that failed.
    pub async fn fetch(&self, input: &str) -> Result<Page, FetchError> {
        let url = Url::parse(input)?;
        info!("Fetching {url}");
        let started = Instant::now();

        let response = self.exchange(&url).await?;
        if !response.is_success() {
            warn!(
                "{url} returned {} {}; rendering body anyway",
                response.status, response.reason
            );
        }

        let body = decode_body(&response)?;
        let charset = response.charset();
        let text = self.renderer.render(&body, charset.as_deref());

        info!(
            "Fetched {url}: {} {}, {} body bytes, {} decoded, {} chars of text in {:.2}s",
            response.status,
            response.reason,
            response.body.len(),
            body.len(),
            text.chars().count(),
            started.elapsed().as_secs_f64()
        );

        Ok(Page {
            url,
            status: response.status,
            reason: response.reason,
            headers: response.headers,
            text,
        })
    }

    /// Connect, send the request, and read the whole response.
    async fn exchange(&self, url: &Url) -> Result<Response, FetchError> {
        let mut conn = connect(url, &self.config).await?;

        let request = build_request(url, &self.config.user_agent);
        debug!("Sending {} byte request to {url}", request.len());
        conn.write_all(&request)
            .await
            .map_err(|e| FetchError::Connection(format!("failed to send request: {e}")))?;
        conn.flush()
            .await
            .map_err(|e| FetchError::Connection(format!("failed to send request: {e}")))?;

        let response =
            match tokio::time::timeout(self.config.read_timeout, read_response(&mut conn)).await {
                Ok(result) => result?,
                Err(_) => {
                    return Err(FetchError::Connection(format!(
                        "timed out reading response from {url} after {}s",
                        self.config.read_timeout.as_secs_f64()
                    )));
                }
            };

        conn.close().await;
        debug!("Connection to {url} closed");
        Ok(response)
    }
}

/// Fetches `input` with the default renderer and returns the page text.
///
/// # Errors
///
/// See [`Fetcher::fetch`].
pub async fn fetch_text(input: &str, config: &Config) -> Result<String, FetchError> {
    let page = Fetcher::new(config.clone()).fetch(input).await?;
    Ok(page.text)
}
