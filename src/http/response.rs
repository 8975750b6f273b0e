//! Response reader.
//!
//! Parses the status line and header block, then hands the stream to the body
//! reader. Generic over `AsyncRead` so tests can feed it byte slices.

use log::debug;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};

use crate::config::{MAX_HEADER_COUNT, MAX_HEADER_LINE_LEN, MAX_INTERIM_RESPONSES};
use crate::error_handling::FetchError;

use super::body::read_body;
use super::headers::Headers;

/// A fully read response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Protocol version from the status line, e.g. `1.1`
    pub version: String,
    pub status: u16,
    pub reason: String,
    pub headers: Headers,
    /// Body with transfer framing removed but content-coding still applied
    pub body: Vec<u8>,
}

impl Response {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `charset` parameter of `content-type`, lowercased, without quotes.
    pub fn charset(&self) -> Option<String> {
        let content_type = self.header("content-type")?;
        content_type.split(';').skip(1).find_map(|param| {
            let (key, value) = param.split_once('=')?;
            if key.trim().eq_ignore_ascii_case("charset") {
                Some(value.trim().trim_matches('"').to_ascii_lowercase())
            } else {
                None
            }
        })
    }
}

/// Reads one response from `stream`, up to the natural end of its body.
///
/// # Errors
///
/// - `FetchError::Connection` if the stream fails or closes before the header
///   block is complete (or inside a length-delimited or chunked body)
/// - `FetchError::Protocol` if the status line, a header line, or the body
///   framing cannot be parsed, or a size limit is exceeded
pub async fn read_response<R>(stream: R) -> Result<Response, FetchError>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);

    // Interim 1xx heads (100 Continue, 103 Early Hints) precede the real one
    let mut interim = 0usize;
    let (version, status, reason, mut headers) = loop {
        let status_line = read_line(&mut reader)
            .await?
            .ok_or_else(|| FetchError::Connection("connection closed before status line".into()))?;
        let (version, status, reason) = parse_status_line(&status_line)?;
        debug!("Status line: HTTP/{version} {status} {reason}");

        let mut headers = Headers::new();
        read_fields(&mut reader, &mut headers, "header block").await?;
        debug!("Read {} response headers", headers.len());

        if status == 101 {
            return Err(FetchError::Protocol(
                "unexpected 101 Switching Protocols".into(),
            ));
        }
        if (100..200).contains(&status) {
            interim += 1;
            if interim > MAX_INTERIM_RESPONSES {
                return Err(FetchError::Protocol(format!(
                    "more than {MAX_INTERIM_RESPONSES} interim responses"
                )));
            }
            debug!("Skipping interim response {status} {reason}");
            continue;
        }
        break (version, status, reason, headers);
    };

    let body = read_body(&mut reader, status, &mut headers).await?;
    debug!("Read {} body bytes", body.len());

    Ok(Response {
        version,
        status,
        reason,
        headers,
        body,
    })
}

/// Reads `name: value` lines into `headers` until a blank line.
///
/// Shared by the header block and chunked trailers; `what` names the block in
/// error messages.
pub(super) async fn read_fields<R>(
    reader: &mut R,
    headers: &mut Headers,
    what: &str,
) -> Result<(), FetchError>
where
    R: AsyncBufRead + Unpin,
{
    let mut count = 0usize;
    loop {
        let line = read_line(reader).await?.ok_or_else(|| {
            FetchError::Connection(format!("connection closed before end of {what}"))
        })?;
        if line.is_empty() {
            return Ok(());
        }
        count += 1;
        if count > MAX_HEADER_COUNT {
            return Err(FetchError::Protocol(format!(
                "{what} exceeds {MAX_HEADER_COUNT} fields"
            )));
        }
        let (name, value) = parse_header_line(&line)?;
        headers.insert(name, value);
    }
}

/// Reads one line without its line terminator (CRLF or bare LF).
///
/// Returns `Ok(None)` at a clean end of stream (no bytes before EOF).
pub(super) async fn read_line<R>(reader: &mut R) -> Result<Option<String>, FetchError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let limit = MAX_HEADER_LINE_LEN as u64 + 2;
    let n = (&mut *reader)
        .take(limit)
        .read_until(b'\n', &mut buf)
        .await
        .map_err(|e| FetchError::Connection(format!("failed to read from stream: {e}")))?;

    if n == 0 {
        return Ok(None);
    }
    if buf.last() != Some(&b'\n') {
        if buf.len() as u64 >= limit {
            return Err(FetchError::Protocol(format!(
                "line exceeds {MAX_HEADER_LINE_LEN} bytes"
            )));
        }
        return Err(FetchError::Connection(
            "connection closed in the middle of a line".into(),
        ));
    }

    buf.pop();
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

/// Splits `HTTP/<version> <status> <reason>`.
pub(super) fn parse_status_line(line: &str) -> Result<(String, u16, String), FetchError> {
    let bad = || FetchError::Protocol(format!("malformed status line {line:?}"));

    let mut fields = line.splitn(3, ' ');
    let (Some(protocol), Some(status), Some(reason)) = (fields.next(), fields.next(), fields.next())
    else {
        return Err(bad());
    };

    let version = protocol.strip_prefix("HTTP/").ok_or_else(bad)?;
    if version.is_empty() {
        return Err(bad());
    }
    if status.len() != 3 || !status.bytes().all(|b| b.is_ascii_digit()) {
        return Err(bad());
    }
    let status = status.parse::<u16>().map_err(|_| bad())?;

    Ok((version.to_string(), status, reason.trim().to_string()))
}

/// Splits a header line on its first `:`.
pub(super) fn parse_header_line(line: &str) -> Result<(&str, &str), FetchError> {
    let (name, value) = line
        .split_once(':')
        .ok_or_else(|| FetchError::Protocol(format!("malformed header line {line:?}")))?;
    if name.trim().is_empty() {
        return Err(FetchError::Protocol(format!(
            "header line with empty name {line:?}"
        )));
    }
    Ok((name, value))
}
