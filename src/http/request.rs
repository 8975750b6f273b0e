//! Request builder.

use crate::config::ACCEPT_ENCODING;
use crate::url::Url;

/// A GET request for one URL. The header block is fixed apart from `Host`
/// and `User-Agent`.
#[derive(Debug, Clone)]
pub struct Request {
    url: Url,
    headers: Vec<(String, String)>,
}

impl Request {
    /// Builds the request for `url`, with `Connection: close` so the server
    /// ends the stream after the response.
    pub fn get(url: &Url, user_agent: &str) -> Self {
        let headers = vec![
            ("Host".to_string(), url.authority()),
            ("Accept-Encoding".to_string(), ACCEPT_ENCODING.to_string()),
            ("Connection".to_string(), "close".to_string()),
            ("User-Agent".to_string(), user_agent.to_string()),
        ];
        Self {
            url: url.clone(),
            headers,
        }
    }

    pub fn method(&self) -> &'static str {
        "GET"
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Header fields in the order they are sent.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Serializes the request line, headers, and terminating blank line.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = format!("{} {} HTTP/1.1\r\n", self.method(), self.url.path());
        for (name, value) in &self.headers {
            out.push_str(name);
            out.push_str(": ");
            out.push_str(value);
            out.push_str("\r\n");
        }
        out.push_str("\r\n");
        out.into_bytes()
    }
}

/// Serializes the GET request for `url`.
pub fn build_request(url: &Url, user_agent: &str) -> Vec<u8> {
    Request::get(url, user_agent).to_bytes()
}
