// ── Runtime monitor configuration ──
//
// Describes which device to poll and how often. Carries the bearer token
// but never touches disk: netmon-config builds a `MonitorConfig` and hands
// it in.

use std::time::Duration;

use secrecy::SecretString;

use netmon_api::TransportConfig;
use netmon_api::request::DEFAULT_STATUS_PATH;
use netmon_api::transport::DEFAULT_MAX_RESPONSE_BYTES;

use crate::error::CoreError;

/// Configuration for polling a single device.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Device host name or address.
    pub host: String,
    pub port: u16,
    /// Bearer token; blank means no Authorization header.
    pub token: Option<SecretString>,
    pub status_path: String,
    /// Deadline for one whole fetch.
    pub timeout: Duration,
    /// Time between scheduled cycles.
    pub poll_interval: Duration,
    /// Snapshots and ping samples older than this are purged.
    pub retention: Duration,
    pub max_response_bytes: usize,
    /// Compute hourly statistics in the background.
    pub rollup_enabled: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            host: "192.168.1.1".into(),
            port: 8321,
            token: None,
            status_path: DEFAULT_STATUS_PATH.into(),
            timeout: Duration::from_secs(10),
            poll_interval: Duration::from_secs(60),
            retention: Duration::from_secs(30 * 24 * 3600),
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            rollup_enabled: true,
        }
    }
}

impl MonitorConfig {
    pub fn transport(&self) -> TransportConfig {
        TransportConfig::default()
            .with_timeout(self.timeout)
            .with_max_response_bytes(self.max_response_bytes)
    }

    /// Reject values the scheduler cannot run with.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.host.trim().is_empty() {
            return Err(CoreError::Config {
                message: "device host must not be empty".into(),
            });
        }
        if self.port == 0 {
            return Err(CoreError::Config {
                message: "device port must be non-zero".into(),
            });
        }
        if self.poll_interval < Duration::from_secs(1) {
            return Err(CoreError::Config {
                message: "poll interval must be at least 1s".into(),
            });
        }
        if self.timeout < Duration::from_secs(1) {
            return Err(CoreError::Config {
                message: "timeout must be at least 1s".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(MonitorConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_port_is_rejected() {
        let cfg = MonitorConfig {
            port: 0,
            ..MonitorConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(CoreError::Config { .. })));
    }

    #[test]
    fn sub_second_interval_is_rejected() {
        let cfg = MonitorConfig {
            poll_interval: Duration::from_millis(500),
            ..MonitorConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
