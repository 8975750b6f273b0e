//! Body framing.
//!
//! Picks the end-of-body rule from the status and headers:
//! - 204 and 304 responses carry no body
//! - `Transfer-Encoding: chunked` is de-chunked, trailers merged into the headers
//! - `Content-Length` bounds the read
//! - otherwise the body runs to end of stream (`Connection: close`)

use std::io;

use log::debug;
use tokio::io::{AsyncBufRead, AsyncReadExt};

use crate::config::MAX_BODY_SIZE;
use crate::error_handling::FetchError;

use super::headers::Headers;
use super::response::{read_fields, read_line};

pub(super) async fn read_body<R>(
    reader: &mut R,
    status: u16,
    headers: &mut Headers,
) -> Result<Vec<u8>, FetchError>
where
    R: AsyncBufRead + Unpin,
{
    if status == 204 || status == 304 {
        debug!("Status {status} carries no body");
        return Ok(Vec::new());
    }

    if is_chunked(headers) {
        debug!("Reading chunked body");
        return read_chunked(reader, headers).await;
    }

    if let Some(length) = headers.get("content-length") {
        let length = parse_content_length(length)?;
        debug!("Reading {length} byte body");
        return read_exact_len(reader, length).await;
    }

    debug!("Reading body until end of stream");
    read_to_close(reader).await
}

fn is_chunked(headers: &Headers) -> bool {
    headers.get("transfer-encoding").is_some_and(|v| {
        v.split(',')
            .any(|coding| coding.trim().eq_ignore_ascii_case("chunked"))
    })
}

fn parse_content_length(value: &str) -> Result<usize, FetchError> {
    let length = value
        .trim()
        .parse::<usize>()
        .map_err(|_| FetchError::Protocol(format!("invalid content-length {value:?}")))?;
    if length > MAX_BODY_SIZE {
        return Err(too_large());
    }
    Ok(length)
}

fn too_large() -> FetchError {
    FetchError::Protocol(format!("body exceeds {MAX_BODY_SIZE} bytes"))
}

async fn read_exact_len<R>(reader: &mut R, length: usize) -> Result<Vec<u8>, FetchError>
where
    R: AsyncBufRead + Unpin,
{
    let mut body = Vec::with_capacity(length);
    (&mut *reader)
        .take(length as u64)
        .read_to_end(&mut body)
        .await
        .map_err(|e| FetchError::Connection(format!("failed to read body: {e}")))?;
    if body.len() < length {
        return Err(FetchError::Connection(format!(
            "connection closed after {} of {length} body bytes",
            body.len()
        )));
    }
    Ok(body)
}

async fn read_to_close<R>(reader: &mut R) -> Result<Vec<u8>, FetchError>
where
    R: AsyncBufRead + Unpin,
{
    let mut body = Vec::new();
    let result = (&mut *reader)
        .take(MAX_BODY_SIZE as u64 + 1)
        .read_to_end(&mut body)
        .await;
    match result {
        Ok(_) => {}
        // Servers often drop TLS without close_notify on close-delimited bodies.
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            debug!("Treating unexpected EOF as end of body: {e}");
        }
        Err(e) => {
            return Err(FetchError::Connection(format!("failed to read body: {e}")));
        }
    }
    if body.len() > MAX_BODY_SIZE {
        return Err(too_large());
    }
    Ok(body)
}

async fn read_chunked<R>(reader: &mut R, headers: &mut Headers) -> Result<Vec<u8>, FetchError>
where
    R: AsyncBufRead + Unpin,
{
    let mut body = Vec::new();
    loop {
        let line = read_line(reader)
            .await?
            .ok_or_else(|| FetchError::Connection("connection closed inside chunked body".into()))?;
        let size_field = line.split(';').next().unwrap_or_default().trim();
        let size = usize::from_str_radix(size_field, 16)
            .map_err(|_| FetchError::Protocol(format!("invalid chunk size {size_field:?}")))?;

        if size == 0 {
            // Trailers may be cut off by the close; anything read so far stands.
            match read_fields(reader, headers, "chunked trailers").await {
                Ok(()) | Err(FetchError::Connection(_)) => {}
                Err(e) => return Err(e),
            }
            return Ok(body);
        }

        if body.len().saturating_add(size) > MAX_BODY_SIZE {
            return Err(too_large());
        }
        let chunk = read_exact_len(reader, size).await?;
        body.extend_from_slice(&chunk);

        match read_line(reader).await? {
            Some(rest) if rest.is_empty() => {}
            Some(rest) => {
                return Err(FetchError::Protocol(format!(
                    "expected CRLF after chunk, found {rest:?}"
                )));
            }
            None => {
                return Err(FetchError::Connection(
                    "connection closed inside chunked body".into(),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::read_response;
    use super::*;

    #[tokio::test]
    async fn test_chunked_body_is_reassembled() {
        let raw = b"HTTP/1.1 200 OK\r\n\
            Transfer-Encoding: chunked\r\n\
            \r\n\
            7\r\n\
            Chunk 1\r\n\
            6;ext=1\r\n\
            -1234!\r\n\
            0\r\n\
            \r\n";
        let response = read_response(&raw[..]).await.unwrap();
        assert_eq!(response.body, b"Chunk 1-1234!");
    }

    #[tokio::test]
    async fn test_chunked_trailers_are_merged() {
        let raw = b"HTTP/1.1 200 OK\r\n\
            Transfer-Encoding: gzip, Chunked\r\n\
            X-Checksum: old\r\n\
            \r\n\
            a\r\n\
            0123456789\r\n\
            0\r\n\
            X-Checksum: new\r\n\
            \r\n";
        let response = read_response(&raw[..]).await.unwrap();
        assert_eq!(response.body, b"0123456789");
        assert_eq!(response.header("x-checksum"), Some("new"));
    }

    #[tokio::test]
    async fn test_chunked_without_final_crlf_is_accepted() {
        let raw = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n3\r\nabc\r\n0\r\n";
        let response = read_response(&raw[..]).await.unwrap();
        assert_eq!(response.body, b"abc");
    }

    #[tokio::test]
    async fn test_bad_chunk_size_is_protocol_error() {
        let raw = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\nzz\r\nabc\r\n0\r\n\r\n";
        let err = read_response(&raw[..]).await.unwrap_err();
        assert!(matches!(err, FetchError::Protocol(_)));
    }

    #[tokio::test]
    async fn test_truncated_chunk_is_connection_error() {
        let raw = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n10\r\nshort";
        let err = read_response(&raw[..]).await.unwrap_err();
        assert!(matches!(err, FetchError::Connection(_)));
    }

    #[tokio::test]
    async fn test_missing_chunk_terminator_is_protocol_error() {
        let raw = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n3\r\nabcdef\r\n0\r\n\r\n";
        let err = read_response(&raw[..]).await.unwrap_err();
        assert!(matches!(err, FetchError::Protocol(_)));
    }

    #[tokio::test]
    async fn test_content_length_stops_at_length() {
        let raw = b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhelloEXTRA";
        let response = read_response(&raw[..]).await.unwrap();
        assert_eq!(response.body, b"hello");
    }

    #[tokio::test]
    async fn test_short_content_length_body_is_connection_error() {
        let raw = b"HTTP/1.1 200 OK\r\nContent-Length: 50\r\n\r\nhello";
        let err = read_response(&raw[..]).await.unwrap_err();
        assert!(matches!(err, FetchError::Connection(_)));
    }

    #[tokio::test]
    async fn test_invalid_content_length_is_protocol_error() {
        let raw = b"HTTP/1.1 200 OK\r\nContent-Length: lots\r\n\r\nhello";
        let err = read_response(&raw[..]).await.unwrap_err();
        assert!(matches!(err, FetchError::Protocol(_)));
    }

    #[tokio::test]
    async fn test_oversized_content_length_is_protocol_error() {
        let raw = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n",
            MAX_BODY_SIZE + 1
        );
        let err = read_response(raw.as_bytes()).await.unwrap_err();
        assert!(matches!(err, FetchError::Protocol(_)));
    }

    #[tokio::test]
    async fn test_chunked_takes_precedence_over_content_length() {
        let raw = b"HTTP/1.1 200 OK\r\n\
            Content-Length: 100\r\n\
            Transfer-Encoding: chunked\r\n\
            \r\n\
            2\r\nok\r\n0\r\n\r\n";
        let response = read_response(&raw[..]).await.unwrap();
        assert_eq!(response.body, b"ok");
    }

    #[tokio::test]
    async fn test_body_runs_to_end_of_stream() {
        let raw = b"HTTP/1.0 200 OK\r\nConnection: close\r\n\r\nline one\r\nline two\r\n";
        let response = read_response(&raw[..]).await.unwrap();
        assert_eq!(response.body, b"line one\r\nline two\r\n");
    }

    #[tokio::test]
    async fn test_bodyless_statuses_ignore_trailing_bytes() {
        for status in [204u16, 304] {
            let raw = format!("HTTP/1.1 {status} X\r\nContent-Length: 4\r\n\r\nabcd");
            let response = read_response(raw.as_bytes()).await.unwrap();
            assert!(response.body.is_empty(), "{status}");
        }
    }
}
