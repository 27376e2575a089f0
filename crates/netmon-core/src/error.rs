// ── Core error types ──
//
// Errors surfaced by the ingestion pipeline and the query surface. Transport
// and framing failures from netmon-api are folded into `Unavailable`: the
// caller only needs to know the device gave us nothing usable this time.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Ingestion ────────────────────────────────────────────────────
    /// The device could not be reached, or answered with nothing parseable.
    #[error("Device unavailable: {reason}")]
    Unavailable { reason: String },

    /// JSON parsed, but the `realtime` section is missing.
    #[error("Status payload has no realtime section")]
    EmptyPayload,

    // ── Store ────────────────────────────────────────────────────────
    #[error("Record store error: {message}")]
    Store { message: String },

    /// An event with this identity key is already stored.
    #[error("Event already recorded: {event_type} at {event_time}")]
    Conflict {
        event_time: DateTime<Utc>,
        event_type: String,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` if the failure means "no data from the device".
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::EmptyPayload)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<netmon_api::Error> for CoreError {
    fn from(err: netmon_api::Error) -> Self {
        match err {
            netmon_api::Error::Connect { addr, source } => CoreError::Unavailable {
                reason: format!("cannot connect to {addr}: {source}"),
            },
            netmon_api::Error::Io(e) => CoreError::Unavailable {
                reason: format!("I/O error: {e}"),
            },
            netmon_api::Error::Timeout { timeout } => CoreError::Unavailable {
                reason: format!("no response within {}s", timeout.as_secs_f64()),
            },
            netmon_api::Error::ResponseTooLarge { limit } => CoreError::Unavailable {
                reason: format!("response exceeded {limit} bytes"),
            },
            netmon_api::Error::Framing { bytes } => CoreError::Unavailable {
                reason: format!("no JSON payload in {bytes}-byte response"),
            },
            netmon_api::Error::Parse { message, body: _ } => CoreError::Unavailable {
                reason: format!("malformed JSON: {message}"),
            },
        }
    }
}
