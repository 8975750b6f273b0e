//! URL decomposition.
//!
//! Splits an `http://` or `https://` URL into the four parts the rest of the
//! pipeline needs: scheme, host, port, and request path. Only the subset of
//! URL syntax a GET request can use is accepted.

use std::fmt;
use std::str::FromStr;

use crate::config::{HTTPS_DEFAULT_PORT, HTTP_DEFAULT_PORT};
use crate::error_handling::FetchError;

/// Supported URL schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// Plain HTTP over TCP
    Http,
    /// HTTP over TLS
    Https,
}

impl Scheme {
    /// Port used when the URL does not name one.
    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Http => HTTP_DEFAULT_PORT,
            Scheme::Https => HTTPS_DEFAULT_PORT,
        }
    }

    /// Lowercase scheme name as written in a URL.
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed request target. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url {
    scheme: Scheme,
    host: String,
    port: u16,
    path: String,
}

impl Url {
    /// Parses a URL string.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::MalformedUrl` if the `://` separator is missing, the
    /// scheme is not `http`/`https`, the host is empty, userinfo is present, the
    /// port is not a number in `1..=65535`, or the URL contains a space or an
    /// ASCII control character.
    pub fn parse(input: &str) -> Result<Url, FetchError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(malformed("empty URL"));
        }
        // Whitespace or control bytes would corrupt the request line or headers
        if let Some(c) = input.chars().find(|c| c.is_ascii_control() || *c == ' ') {
            return Err(malformed(format!("illegal character {c:?} in {input:?}")));
        }

        let (scheme, rest) = input
            .split_once("://")
            .ok_or_else(|| malformed(format!("missing \"://\" in {input:?}")))?;
        let scheme = match scheme.to_ascii_lowercase().as_str() {
            "http" => Scheme::Http,
            "https" => Scheme::Https,
            other => return Err(malformed(format!("unsupported scheme {other:?}"))),
        };

        // Fragments never go on the wire.
        let rest = rest.split_once('#').map_or(rest, |(before, _)| before);

        let (authority, path) = match rest.find(['/', '?']) {
            Some(idx) => rest.split_at(idx),
            None => (rest, ""),
        };
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        if authority.contains('@') {
            return Err(malformed("userinfo in URL is not supported"));
        }

        let (host, port) = split_authority(authority)?;
        if host.is_empty() {
            return Err(malformed(format!("missing host in {input:?}")));
        }
        let port = match port {
            Some(port) => parse_port(port)?,
            None => scheme.default_port(),
        };

        Ok(Url {
            scheme,
            host: host.to_string(),
            port,
            path,
        })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Host name or IP literal (IPv6 without brackets).
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Request target: path plus any query string, always starting with `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Value for the `Host` request header.
    ///
    /// The port is included only when it differs from the scheme default.
    pub fn authority(&self) -> String {
        let host = if self.host.contains(':') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        if self.port == self.scheme.default_port() {
            host
        } else {
            format!("{host}:{}", self.port)
        }
    }
}

impl FromStr for Url {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Url::parse(s)
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.authority(), self.path)
    }
}

fn malformed(msg: impl Into<String>) -> FetchError {
    FetchError::MalformedUrl(msg.into())
}

/// Splits `host[:port]`, handling bracketed IPv6 literals.
fn split_authority(authority: &str) -> Result<(&str, Option<&str>), FetchError> {
    if let Some(bracketed) = authority.strip_prefix('[') {
        let (host, after) = bracketed
            .split_once(']')
            .ok_or_else(|| malformed(format!("unterminated IPv6 literal in {authority:?}")))?;
        return match after {
            "" => Ok((host, None)),
            _ => match after.strip_prefix(':') {
                Some(port) => Ok((host, Some(port))),
                None => Err(malformed(format!("unexpected {after:?} after IPv6 literal"))),
            },
        };
    }
    Ok(match authority.split_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (authority, None),
    })
}

fn parse_port(port: &str) -> Result<u16, FetchError> {
    if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed(format!("non-numeric port {port:?}")));
    }
    match port.parse::<u16>() {
        Ok(0) | Err(_) => Err(malformed(format!("port out of range: {port}"))),
        Ok(port) => Ok(port),
    }
}
