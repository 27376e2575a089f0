// Shared transport configuration for device connections.
//
// The device speaks a loose HTTP dialect over plain TCP, so there is no
// HTTP client to configure: only the I/O deadline and a cap on how much
// of the response we are willing to buffer.

use std::time::Duration;

/// Default ceiling for a single status response.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;

/// Transport tuning for a [`DeviceClient`](crate::DeviceClient).
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Deadline for connect + request + read-until-close.
    pub timeout: Duration,
    /// Responses longer than this are rejected.
    pub max_response_bytes: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

impl TransportConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_response_bytes(mut self, limit: usize) -> Self {
        self.max_response_bytes = limit;
        self
    }
}
