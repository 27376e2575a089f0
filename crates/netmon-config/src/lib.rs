//! Shared configuration for netmon.
//!
//! TOML file, `NETMON_` environment overrides, bearer-token resolution
//! (env + keyring + plaintext), and translation to
//! `netmon_core::MonitorConfig`. The CLI layers its flag overrides on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use netmon_core::MonitorConfig;

/// Environment variable consulted for the token after `token_env`.
pub const TOKEN_ENV: &str = "NETMON_TOKEN";

const KEYRING_SERVICE: &str = "netmon";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub device: DeviceSection,

    #[serde(default)]
    pub poll: PollSection,
}

/// The router being polled.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct DeviceSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Status endpoint path.
    #[serde(default = "default_path")]
    pub path: String,

    /// Bearer token (plaintext; prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the token.
    pub token_env: Option<String>,

    /// Fetch timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
}

impl Default for DeviceSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            path: default_path(),
            token: None,
            token_env: None,
            timeout: default_timeout(),
            max_response_bytes: default_max_response_bytes(),
        }
    }
}

fn default_host() -> String {
    "192.168.1.1".into()
}
fn default_port() -> u16 {
    8321
}
fn default_path() -> String {
    "/net/status".into()
}
fn default_timeout() -> u64 {
    10
}
fn default_max_response_bytes() -> usize {
    4 * 1024 * 1024
}

/// Scheduler settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PollSection {
    /// Seconds between scheduled cycles.
    #[serde(default = "default_interval")]
    pub interval: u64,

    #[serde(default = "default_retention_days")]
    pub retention_days: u64,

    /// Compute hourly rollups.
    #[serde(default = "default_rollup")]
    pub rollup: bool,
}

impl Default for PollSection {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            retention_days: default_retention_days(),
            rollup: default_rollup(),
        }
    }
}

fn default_interval() -> u64 {
    60
}
fn default_retention_days() -> u64 {
    30
}
fn default_rollup() -> bool {
    true
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "netmon", "netmon").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("netmon");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the default path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load defaults, then `path` (if it exists), then `NETMON_*` variables.
///
/// Nested keys use a double underscore: `NETMON_DEVICE__HOST`,
/// `NETMON_POLL__INTERVAL`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("NETMON_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`, creating parents.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// TOML rendering with the plaintext token masked.
pub fn render_redacted(cfg: &Config) -> Result<String, ConfigError> {
    let mut shown = cfg.clone();
    if shown.device.token.is_some() {
        shown.device.token = Some("<redacted>".into());
    }
    Ok(toml::to_string_pretty(&shown)?)
}

// ── Token resolution ────────────────────────────────────────────────

/// Resolve the bearer token from the credential chain.
///
/// 1. `device.token_env` → env var lookup
/// 2. `NETMON_TOKEN`
/// 3. System keyring (`netmon` / `<host>/token`)
/// 4. Plaintext `device.token`
///
/// Blank values are skipped at every step. `None` means "send no
/// Authorization header".
pub fn resolve_token(device: &DeviceSection) -> Option<SecretString> {
    resolve_token_with(device, |name| std::env::var(name).ok(), keyring_token)
}

/// [`resolve_token`] with injectable environment and keyring lookups.
pub fn resolve_token_with(
    device: &DeviceSection,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl Fn(&str) -> Option<String>,
) -> Option<SecretString> {
    let from_env_name = device.token_env.as_deref().and_then(&env);
    from_env_name
        .filter(|t| !t.trim().is_empty())
        .or_else(|| env(TOKEN_ENV).filter(|t| !t.trim().is_empty()))
        .or_else(|| keyring(&device.host).filter(|t| !t.trim().is_empty()))
        .or_else(|| device.token.clone().filter(|t| !t.trim().is_empty()))
        .map(SecretString::from)
}

fn keyring_token(host: &str) -> Option<String> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{host}/token"))
        .ok()?
        .get_password()
        .ok()
}

/// Store a token in the system keyring for `host`.
pub fn store_keyring_token(host: &str, token: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{host}/token")).map_err(|e| {
        ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        }
    })?;
    entry.set_password(token).map_err(|e| ConfigError::Validation {
        field: "keyring".into(),
        reason: e.to_string(),
    })
}

// ── Translation ─────────────────────────────────────────────────────

/// Validate and build a `MonitorConfig`, resolving the token.
pub fn to_monitor_config(cfg: &Config) -> Result<MonitorConfig, ConfigError> {
    to_monitor_config_with_token(cfg, resolve_token(&cfg.device))
}

/// Validate and build a `MonitorConfig` with an already-resolved token.
pub fn to_monitor_config_with_token(
    cfg: &Config,
    token: Option<SecretString>,
) -> Result<MonitorConfig, ConfigError> {
    let device = &cfg.device;
    let poll = &cfg.poll;

    if device.host.trim().is_empty() {
        return Err(invalid("device.host", "must not be empty"));
    }
    if device.port == 0 {
        return Err(invalid("device.port", "must be non-zero"));
    }
    if !device.path.starts_with('/') {
        return Err(invalid("device.path", "must start with '/'"));
    }
    if device.timeout == 0 {
        return Err(invalid("device.timeout", "must be at least 1 second"));
    }
    if poll.interval == 0 {
        return Err(invalid("poll.interval", "must be at least 1 second"));
    }

    Ok(MonitorConfig {
        host: device.host.trim().to_owned(),
        port: device.port,
        token,
        status_path: device.path.clone(),
        timeout: Duration::from_secs(device.timeout),
        poll_interval: Duration::from_secs(poll.interval),
        retention: Duration::from_secs(poll.retention_days.saturating_mul(24 * 3600)),
        max_response_bytes: device.max_response_bytes,
        rollup_enabled: poll.rollup,
    })
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}
