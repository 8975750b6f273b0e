//! Shared helpers for integration tests.
//!
//! Provides a loopback HTTP server that answers exactly one connection with a
//! canned response and hands back the request bytes it received.

#![allow(dead_code)]

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A one-shot server bound to `127.0.0.1` on an ephemeral port.
pub struct MockServer {
    pub port: u16,
    handle: JoinHandle<Vec<u8>>,
}

impl MockServer {
    /// `http://127.0.0.1:<port><path>`
    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }

    /// Waits for the server task and returns the request head it read.
    pub async fn request(self) -> Vec<u8> {
        self.handle.await.expect("mock server task panicked")
    }
}

/// Serves `response` to the first connection, then closes it.
pub async fn serve_once(response: Vec<u8>) -> MockServer {
    serve(response, None).await
}

/// Serves `response`, then keeps the socket open for `hold` before closing.
pub async fn serve_and_hold(response: Vec<u8>, hold: Duration) -> MockServer {
    serve(response, Some(hold)).await
}

async fn serve(response: Vec<u8>, hold: Option<Duration>) -> MockServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind mock server");
    let port = listener.local_addr().expect("no local addr").port();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept failed");

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.expect("read failed");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        // The client may already have given up, so write errors are ignored
        let _ = socket.write_all(&response).await;
        let _ = socket.flush().await;
        if let Some(hold) = hold {
            tokio::time::sleep(hold).await;
        }
        request
    });

    MockServer { port, handle }
}

/// Builds a response with the given extra header lines and a
/// `Content-Length` matching `body`.
pub fn response_with_length(status_line: &str, headers: &[&str], body: &[u8]) -> Vec<u8> {
    let mut out = format!("{status_line}\r\n");
    for header in headers {
        out.push_str(header);
        out.push_str("\r\n");
    }
    out.push_str(&format!("Content-Length: {}\r\n\r\n", body.len()));
    let mut out = out.into_bytes();
    out.extend_from_slice(body);
    out
}

/// Builds a chunked response carrying `body` in chunks of at most `chunk` bytes.
pub fn chunked_response(headers: &[&str], body: &[u8], chunk: usize) -> Vec<u8> {
    let mut out = String::from("HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n");
    for header in headers {
        out.push_str(header);
        out.push_str("\r\n");
    }
    out.push_str("\r\n");
    let mut out = out.into_bytes();
    for piece in body.chunks(chunk) {
        out.extend_from_slice(format!("{:x}\r\n", piece.len()).as_bytes());
        out.extend_from_slice(piece);
        out.extend_from_slice(b"\r\n");
    }
    out.extend_from_slice(b"0\r\n\r\n");
    out
}
