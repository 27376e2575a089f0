//! CLI-side config resolution: config file + environment, then flags.

use std::path::PathBuf;

use secrecy::SecretString;

use netmon_config::{Config, load_config_from, resolve_token, to_monitor_config_with_token};
use netmon_core::MonitorConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// The config file in effect: `--config` or the platform default.
pub fn active_config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(netmon_config::config_path)
}

/// Load the file config and apply `--host`, `--port` and `--timeout`.
pub fn load_effective_config(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = load_config_from(&active_config_path(global))?;
    if let Some(ref host) = global.host {
        cfg.device.host.clone_from(host);
    }
    if let Some(port) = global.port {
        cfg.device.port = port;
    }
    if let Some(timeout) = global.timeout {
        cfg.device.timeout = timeout;
    }
    Ok(cfg)
}

/// Build the runtime `MonitorConfig`. `--token` wins over the config chain.
pub fn build_monitor_config(global: &GlobalOpts) -> Result<MonitorConfig, CliError> {
    let cfg = load_effective_config(global)?;
    let token = global
        .token
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .map(|t| SecretString::from(t.to_owned()))
        .or_else(|| resolve_token(&cfg.device));
    Ok(to_monitor_config_with_token(&cfg, token)?)
}
