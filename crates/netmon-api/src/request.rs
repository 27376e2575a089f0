// Status request encoding
//
// One plaintext request line, Host, optional bearer Authorization,
// Connection: close, blank line. The device closes the socket after
// answering, which is how the reader knows the response is complete.

use std::fmt::Write;

use secrecy::{ExposeSecret, SecretString};

/// Default path of the netmonitor status endpoint.
pub const DEFAULT_STATUS_PATH: &str = "/net/status";

/// A single status request, borrowed from the client that sends it.
#[derive(Debug, Clone, Copy)]
pub struct StatusRequest<'a> {
    pub path: &'a str,
    pub host: &'a str,
    pub token: Option<&'a SecretString>,
}

impl<'a> StatusRequest<'a> {
    pub fn new(path: &'a str, host: &'a str) -> Self {
        Self {
            path,
            host,
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<&'a SecretString>) -> Self {
        self.token = token;
        self
    }

    /// The trimmed bearer token, or `None` if absent or blank.
    fn bearer(&self) -> Option<&'a str> {
        self.token
            .map(|t| t.expose_secret().trim())
            .filter(|t| !t.is_empty())
    }

    /// Render the request bytes exactly as they go on the wire.
    pub fn encode(&self) -> String {
        let mut out = String::with_capacity(128);
        let _ = write!(out, "GET {} HTTP/1.1\r\n", self.path);
        let _ = write!(out, "Host: {}\r\n", self.host);
        if let Some(token) = self.bearer() {
            let _ = write!(out, "Authorization: Bearer {token}\r\n");
        }
        out.push_str("Connection: close\r\n\r\n");
        out
    }
}
