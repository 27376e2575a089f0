use std::time::Duration;

use thiserror::Error;

/// Top-level error type for the `netmon-api` crate.
///
/// Covers every way a status fetch can go wrong: reaching the device,
/// reading its response, and locating a JSON payload inside the response.
/// `netmon-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// TCP connect failed (refused, unreachable, DNS failure).
    #[error("Cannot connect to device at {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Read or write failed after the connection was established.
    #[error("I/O error while talking to device: {0}")]
    Io(#[from] std::io::Error),

    /// The whole exchange did not finish within the configured timeout.
    #[error("Device did not respond within {timeout:?}")]
    Timeout { timeout: Duration },

    /// The device kept sending past the configured response limit.
    #[error("Response exceeded {limit} bytes")]
    ResponseTooLarge { limit: usize },

    // ── Payload ─────────────────────────────────────────────────────
    /// No `{` byte anywhere in the response (includes the empty response).
    #[error("No JSON payload in {bytes}-byte response")]
    Framing { bytes: usize },

    /// Bytes from the first `{` onward are not valid JSON.
    #[error("Malformed JSON payload: {message}")]
    Parse { message: String, body: String },
}

impl Error {
    /// Returns `true` for failures that happened before any payload was read.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Connect { .. } | Self::Io(_) | Self::Timeout { .. }
        )
    }

    /// Returns `true` if the device answered but the body was unusable.
    pub fn is_payload_error(&self) -> bool {
        matches!(
            self,
            Self::Framing { .. } | Self::Parse { .. } | Self::ResponseTooLarge { .. }
        )
    }
}
