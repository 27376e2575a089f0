//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with help text.

use miette::Diagnostic;
use thiserror::Error;

use netmon_config::ConfigError;
use netmon_core::CoreError;

/// Process exit codes. Success is 0.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const UNAVAILABLE: i32 = 7;
    pub const CONFIG: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Device ───────────────────────────────────────────────────────

    #[error("Device unavailable: {reason}")]
    #[diagnostic(
        code(netmon::unavailable),
        help(
            "Check that the router is reachable and the netmonitor service is running.\n\
             Try: netmon status --host <router> --port <port> -v"
        )
    )]
    Unavailable { reason: String },

    #[error("Device answered without a realtime section")]
    #[diagnostic(
        code(netmon::empty_payload),
        help("Run `netmon status` to inspect the raw payload.")
    )]
    EmptyPayload,

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(netmon::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(netmon::config),
        help("Run `netmon config show` to see the effective configuration.")
    )]
    Config(#[from] ConfigError),

    // ── Store / internal ─────────────────────────────────────────────

    #[error("Record store error: {message}")]
    #[diagnostic(code(netmon::store))]
    Store { message: String },

    #[error("Internal error: {0}")]
    #[diagnostic(code(netmon::internal))]
    Internal(String),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Unavailable { .. } | Self::EmptyPayload => exit_code::UNAVAILABLE,
            Self::Config(_) => exit_code::CONFIG,
            Self::Validation { .. } => exit_code::USAGE,
            Self::Store { .. } | Self::Internal(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Unavailable { reason } => CliError::Unavailable { reason },
            CoreError::EmptyPayload => CliError::EmptyPayload,
            CoreError::Store { message } => CliError::Store { message },
            CoreError::Conflict {
                event_time,
                event_type,
            } => CliError::Store {
                message: format!("duplicate event {event_type} at {event_time}"),
            },
            CoreError::Config { message } => CliError::Config(ConfigError::Validation {
                field: "config".into(),
                reason: message,
            }),
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(
            CliError::from(CoreError::Unavailable {
                reason: "refused".into()
            })
            .exit_code(),
            exit_code::UNAVAILABLE
        );
        assert_eq!(CliError::from(CoreError::EmptyPayload).exit_code(), 7);
        assert_eq!(
            CliError::from(CoreError::Config {
                message: "bad".into()
            })
            .exit_code(),
            exit_code::CONFIG
        );
        assert_eq!(
            CliError::Validation {
                field: "x".into(),
                reason: "y".into()
            }
            .exit_code(),
            exit_code::USAGE
        );
    }
}
