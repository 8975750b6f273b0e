//! Content decoder.
//!
//! Reverses the `Content-Encoding` applied by the server. Uses `flate2` for
//! gzip and deflate and `brotli` for br.

use std::io::{self, Read, Write};

use flate2::read::MultiGzDecoder;
use flate2::{Decompress, FlushDecompress, Status};
use log::debug;

use crate::config::MAX_DECODED_SIZE;
use crate::error_handling::FetchError;
use crate::http::Response;

/// A content-coding this client can reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentCoding {
    Identity,
    Gzip,
    Deflate,
    Brotli,
}

impl ContentCoding {
    /// Maps a `Content-Encoding` token (case-insensitive) to a coding.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::UnsupportedEncoding` for any unknown token.
    pub fn from_token(token: &str) -> Result<Self, FetchError> {
        match token.trim().to_ascii_lowercase().as_str() {
            "" | "identity" => Ok(ContentCoding::Identity),
            "gzip" | "x-gzip" => Ok(ContentCoding::Gzip),
            "deflate" => Ok(ContentCoding::Deflate),
            "br" => Ok(ContentCoding::Brotli),
            _ => Err(FetchError::UnsupportedEncoding(token.trim().to_string())),
        }
    }

    /// Reverses this coding.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Decode` if the payload is corrupt or truncated, or
    /// decodes to more than `MAX_DECODED_SIZE` bytes.
    pub fn decode(self, data: &[u8]) -> Result<Vec<u8>, FetchError> {
        self.decode_limited(data, MAX_DECODED_SIZE)
    }

    fn decode_limited(self, data: &[u8], limit: usize) -> Result<Vec<u8>, FetchError> {
        match self {
            ContentCoding::Identity => Ok(data.to_vec()),
            ContentCoding::Gzip => gunzip(data, limit),
            ContentCoding::Deflate => inflate_zlib_or_raw(data, limit),
            ContentCoding::Brotli => unbrotli(data, limit),
        }
    }
}

/// Decodes a response body according to its `content-encoding` header.
///
/// A header listing several codings (`gzip, br`) is undone last-to-first.
/// An absent header means the body is returned unchanged.
///
/// # Errors
///
/// - `FetchError::UnsupportedEncoding` if any listed coding is unknown; checked
///   before any decoding starts
/// - `FetchError::Decode` if a payload is corrupt or truncated, or any step
///   decodes to more than `MAX_DECODED_SIZE` bytes
pub fn decode_body(response: &Response) -> Result<Vec<u8>, FetchError> {
    match response.header("content-encoding") {
        Some(encoding) => decode_with(encoding, &response.body),
        None => Ok(response.body.clone()),
    }
}

/// Decodes `body` given the raw `Content-Encoding` header value.
pub fn decode_with(encoding: &str, body: &[u8]) -> Result<Vec<u8>, FetchError> {
    let codings = encoding
        .split(',')
        .map(ContentCoding::from_token)
        .collect::<Result<Vec<_>, _>>()?;

    let mut data = body.to_vec();
    for coding in codings.into_iter().rev() {
        if coding == ContentCoding::Identity {
            continue;
        }
        let before = data.len();
        data = coding.decode(&data)?;
        debug!("Decoded {coding:?}: {before} -> {} bytes", data.len());
    }
    Ok(data)
}

fn too_large(coding: &str, limit: usize) -> FetchError {
    FetchError::Decode(format!("{coding}: decoded body exceeds {limit} bytes"))
}

fn gunzip(data: &[u8], limit: usize) -> Result<Vec<u8>, FetchError> {
    let mut out = Vec::new();
    MultiGzDecoder::new(data)
        .take(limit as u64 + 1)
        .read_to_end(&mut out)
        .map_err(|e| FetchError::Decode(format!("gzip: {e}")))?;
    if out.len() > limit {
        return Err(too_large("gzip", limit));
    }
    Ok(out)
}

enum InflateError {
    TooLarge,
    Corrupt(String),
}

/// `deflate` is specified as zlib-wrapped, but some servers send raw deflate.
fn inflate_zlib_or_raw(data: &[u8], limit: usize) -> Result<Vec<u8>, FetchError> {
    match inflate(data, true, limit) {
        Ok(out) => Ok(out),
        Err(InflateError::TooLarge) => Err(too_large("deflate", limit)),
        Err(InflateError::Corrupt(zlib_err)) => {
            debug!("zlib inflate failed ({zlib_err}), retrying as raw deflate");
            inflate(data, false, limit).map_err(|e| match e {
                InflateError::TooLarge => too_large("deflate", limit),
                InflateError::Corrupt(_) => FetchError::Decode(format!("deflate: {zlib_err}")),
            })
        }
    }
}

/// Inflates a complete stream; running out of input before the end-of-stream
/// marker is an error.
fn inflate(data: &[u8], zlib_header: bool, limit: usize) -> Result<Vec<u8>, InflateError> {
    let mut decompress = Decompress::new(zlib_header);
    let mut out = Vec::with_capacity(data.len().saturating_mul(4).min(limit + 1).max(64));

    loop {
        if out.len() == out.capacity() {
            out.reserve(out.capacity());
        }
        let consumed = decompress.total_in() as usize;
        let produced = decompress.total_out();
        let status = decompress
            .decompress_vec(&data[consumed..], &mut out, FlushDecompress::Finish)
            .map_err(|e| InflateError::Corrupt(e.to_string()))?;
        if out.len() > limit {
            return Err(InflateError::TooLarge);
        }

        match status {
            Status::StreamEnd => return Ok(out),
            Status::Ok | Status::BufError => {
                let stalled = decompress.total_in() as usize == consumed
                    && decompress.total_out() == produced;
                if stalled && out.len() < out.capacity() {
                    return Err(InflateError::Corrupt("truncated stream".to_string()));
                }
            }
        }
    }
}

/// Collects decoded bytes, failing once more than `limit` have been written.
struct CappedWriter {
    out: Vec<u8>,
    limit: usize,
}

impl Write for CappedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.out.len() + buf.len() > self.limit {
            return Err(io::Error::other(format!(
                "decoded body exceeds {} bytes",
                self.limit
            )));
        }
        self.out.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn unbrotli(data: &[u8], limit: usize) -> Result<Vec<u8>, FetchError> {
    let mut input = data;
    let mut writer = CappedWriter {
        out: Vec::new(),
        limit,
    };
    brotli::BrotliDecompress(&mut input, &mut writer)
        .map_err(|e| FetchError::Decode(format!("brotli: {e}")))?;
    Ok(writer.out)
}
