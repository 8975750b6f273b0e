//! Transport connector.
//!
//! Opens the single byte stream a request runs over: plain TCP for `http`,
//! TLS over TCP for `https`. The returned [`Connection`] owns the socket; it is
//! released when the value is dropped.

mod tls;

use std::fmt;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use log::{debug, error};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, ReadBuf};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls::ClientConfig;

use crate::config::Config;
use crate::error_handling::FetchError;
use crate::url::{Scheme, Url};

/// An open, bidirectional byte stream to the origin server.
pub enum Connection {
    /// Unencrypted TCP (`http`)
    Plain(TcpStream),
    /// TLS over TCP (`https`)
    Tls(Box<TlsStream<TcpStream>>),
}

impl Connection {
    pub fn is_secure(&self) -> bool {
        matches!(self, Connection::Tls(_))
    }

    /// Best-effort orderly close: TLS `close_notify` or TCP shutdown.
    ///
    /// Errors are logged and ignored; the socket is released when `self` drops.
    pub async fn close(mut self) {
        if let Err(e) = self.shutdown().await {
            debug!("Ignoring error while closing connection: {e}");
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connection::Plain(s) => f.debug_tuple("Plain").field(s).finish(),
            Connection::Tls(s) => f.debug_tuple("Tls").field(s.get_ref().0).finish(),
        }
    }
}

impl AsyncRead for Connection {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Connection::Plain(s) => Pin::new(s).poll_read(cx, buf),
            Connection::Tls(s) => Pin::new(s).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for Connection {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            Connection::Plain(s) => Pin::new(s).poll_write(cx, buf),
            Connection::Tls(s) => Pin::new(s).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Connection::Plain(s) => Pin::new(s).poll_flush(cx),
            Connection::Tls(s) => Pin::new(s).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Connection::Plain(s) => Pin::new(s).poll_shutdown(cx),
            Connection::Tls(s) => Pin::new(s).poll_shutdown(cx),
        }
    }
}

/// Opens a connection to the URL's host and port.
///
/// For `https` the TLS handshake is completed before returning, verifying the
/// server certificate against `url.host()`.
///
/// # Errors
///
/// Returns `FetchError::Connection` if name resolution or the TCP connect
/// fails, the TLS handshake fails, or either step exceeds its timeout in
/// `config`.
pub async fn connect(url: &Url, config: &Config) -> Result<Connection, FetchError> {
    let sock = open_tcp(url, config).await?;
    match url.scheme() {
        Scheme::Http => Ok(Connection::Plain(sock)),
        Scheme::Https => secure(sock, url, config, tls::client_config()).await,
    }
}

async fn open_tcp(url: &Url, config: &Config) -> Result<TcpStream, FetchError> {
    let host = url.host();
    let port = url.port();

    debug!("Connecting to {host}:{port}");
    match tokio::time::timeout(config.connect_timeout, TcpStream::connect((host, port))).await {
        Ok(Ok(sock)) => Ok(sock),
        Ok(Err(e)) => {
            error!("Failed to connect to {host}:{port} - {e}");
            Err(FetchError::Connection(format!(
                "failed to connect to {host}:{port}: {e}"
            )))
        }
        Err(_) => {
            error!("TCP connection timeout for {host}:{port}");
            Err(FetchError::Connection(format!(
                "TCP connection timeout for {host}:{port} ({}s)",
                config.connect_timeout.as_secs_f64()
            )))
        }
    }
}

async fn secure(
    sock: TcpStream,
    url: &Url,
    config: &Config,
    tls_config: Arc<ClientConfig>,
) -> Result<Connection, FetchError> {
    let stream = tls::handshake(sock, url.host(), tls_config, config.handshake_timeout).await?;
    Ok(Connection::Tls(Box::new(stream)))
}
