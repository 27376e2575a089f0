// Device client
//
// Opens a fresh TCP connection per fetch, writes one status request and
// reads until the device closes the socket. The whole exchange runs under
// a single deadline.

use secrecy::SecretString;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

use crate::error::Error;
use crate::framing::extract_payload;
use crate::request::{DEFAULT_STATUS_PATH, StatusRequest};
use crate::transport::TransportConfig;

/// Client for a single router's netmonitor endpoint.
#[derive(Debug, Clone)]
pub struct DeviceClient {
    host: String,
    port: u16,
    path: String,
    token: Option<SecretString>,
    transport: TransportConfig,
}

impl DeviceClient {
    pub fn new(host: impl Into<String>, port: u16, transport: TransportConfig) -> Self {
        Self {
            host: host.into(),
            port,
            path: DEFAULT_STATUS_PATH.to_owned(),
            token: None,
            transport,
        }
    }

    /// Attach a bearer token. Blank tokens are dropped when the request is encoded.
    pub fn with_token(mut self, token: Option<SecretString>) -> Self {
        self.token = token;
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// `host:port` as passed to the resolver.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn transport(&self) -> &TransportConfig {
        &self.transport
    }

    /// Perform one exchange and return every byte the device sent.
    pub async fn fetch_raw(&self) -> Result<Vec<u8>, Error> {
        let timeout = self.transport.timeout;
        tokio::time::timeout(timeout, self.exchange())
            .await
            .map_err(|_| Error::Timeout { timeout })?
    }

    /// Fetch and parse the status payload.
    pub async fn fetch_status(&self) -> Result<Value, Error> {
        let raw = self.fetch_raw().await?;
        debug!(bytes = raw.len(), addr = %self.addr(), "status response received");
        extract_payload(&raw)
    }

    async fn exchange(&self) -> Result<Vec<u8>, Error> {
        let addr = self.addr();
        let mut stream = TcpStream::connect(&addr)
            .await
            .map_err(|source| Error::Connect {
                addr: addr.clone(),
                source,
            })?;
        debug!(%addr, "connected");

        let request = StatusRequest::new(&self.path, &self.host)
            .with_token(self.token.as_ref())
            .encode();
        stream.write_all(request.as_bytes()).await?;

        let limit = self.transport.max_response_bytes;
        let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
        let mut buf = Vec::new();
        (&mut stream).take(cap).read_to_end(&mut buf).await?;
        if buf.len() > limit {
            return Err(Error::ResponseTooLarge { limit });
        }
        Ok(buf)
    }
}
