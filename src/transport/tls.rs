//! TLS session setup for `https` URLs.
//!
//! Uses `tokio-rustls` for the handshake and the Mozilla root set from
//! `webpki-roots` for server certificate verification.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error};
use rustls::pki_types::ServerName;
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;

use crate::error_handling::FetchError;

/// Builds the client configuration: webpki roots, no client authentication.
pub(crate) fn client_config() -> Arc<ClientConfig> {
    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    client_config_with_roots(root_store)
}

/// Builds a client configuration trusting only `root_store`.
pub(crate) fn client_config_with_roots(root_store: RootCertStore) -> Arc<ClientConfig> {
    let config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();
    Arc::new(config)
}

/// Converts a URL host into the name the certificate must match.
pub(crate) fn server_name(host: &str) -> Result<ServerName<'static>, FetchError> {
    ServerName::try_from(host.to_string()).map_err(|e| {
        error!("Invalid server name {host}: {e}");
        FetchError::Connection(format!("invalid server name {host:?}: {e}"))
    })
}

/// Runs the TLS handshake over an established TCP stream, verifying the
/// server certificate for `host` against the roots in `tls_config`.
///
/// # Errors
///
/// Returns `FetchError::Connection` if the host is not a valid server name, the
/// handshake or certificate verification fails, or the handshake takes longer
/// than `handshake_timeout`.
pub(crate) async fn handshake(
    sock: TcpStream,
    host: &str,
    tls_config: Arc<ClientConfig>,
    handshake_timeout: Duration,
) -> Result<TlsStream<TcpStream>, FetchError> {
    let name = server_name(host)?;
    let connector = TlsConnector::from(tls_config);

    let stream = match tokio::time::timeout(handshake_timeout, connector.connect(name, sock)).await
    {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => {
            error!("TLS connection failed for {host}: {e}");
            return Err(FetchError::Connection(format!(
                "TLS connection failed for {host}: {e}"
            )));
        }
        Err(_) => {
            error!("TLS handshake timeout for {host}");
            return Err(FetchError::Connection(format!(
                "TLS handshake timeout for {host} ({}s)",
                handshake_timeout.as_secs_f64()
            )));
        }
    };

    let session = stream.get_ref().1;
    debug!(
        "TLS established with {host}: version {}, cipher {}",
        session
            .protocol_version()
            .map(|v| format!("{v:?}"))
            .unwrap_or_else(|| "Unknown".to_string()),
        session
            .negotiated_cipher_suite()
            .map(|cs| format!("{:?}", cs.suite()))
            .unwrap_or_else(|| "Unknown".to_string())
    );

    Ok(stream)
}
