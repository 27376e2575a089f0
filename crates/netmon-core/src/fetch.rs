// ── Transport fetcher ──
//
// Wraps `DeviceClient` with the "payload or nothing" contract the pipeline
// wants. Every failure is logged with its own cause and then collapses to
// `None`; the next scheduled cycle is the retry.

use serde_json::Value;
use tracing::{debug, warn};

use netmon_api::{DeviceClient, Error};

use crate::config::MonitorConfig;

/// One-shot status fetcher for the configured device.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: DeviceClient,
}

impl Fetcher {
    pub fn new(client: DeviceClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &MonitorConfig) -> Self {
        let client = DeviceClient::new(config.host.clone(), config.port, config.transport())
            .with_path(config.status_path.clone())
            .with_token(config.token.clone());
        Self::new(client)
    }

    pub fn client(&self) -> &DeviceClient {
        &self.client
    }

    /// Fetch the status payload, or `None` on any failure.
    pub async fn fetch(&self) -> Option<Value> {
        self.try_fetch().await.ok()
    }

    /// Fetch with the failure cause preserved. Failures are logged with their cause.
    pub async fn try_fetch(&self) -> Result<Value, Error> {
        let addr = self.client.addr();
        let payload = self
            .client
            .fetch_status()
            .await
            .inspect_err(|e| log_failure(&addr, e))?;
        debug!(%addr, "status payload parsed");
        Ok(payload)
    }
}

fn log_failure(addr: &str, err: &Error) {
    match err {
        Error::Connect { source, .. } => {
            warn!(%addr, error = %source, "device connection failed");
        }
        Error::Timeout { timeout } => {
            warn!(%addr, ?timeout, "device timed out");
        }
        Error::Io(e) => warn!(%addr, error = %e, "device I/O error"),
        Error::ResponseTooLarge { limit } => {
            warn!(%addr, limit, "device response too large");
        }
        Error::Framing { bytes } => {
            warn!(%addr, bytes, "no JSON start marker in device response");
        }
        Error::Parse { message, body } => {
            warn!(%addr, error = %message, body = %body, "device JSON parse failed");
        }
    }
}
