#![allow(clippy::unwrap_used)]
// File-backed config loading and saving.

use std::time::Duration;

use pretty_assertions::assert_eq;

use netmon_config::{
    Config, ConfigError, load_config_from, save_config_to, to_monitor_config_with_token,
};

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(cfg.device.host, "192.168.1.1");
    assert_eq!(cfg.device.port, 8321);
    assert_eq!(cfg.poll.interval, 60);
}

#[test]
fn test_partial_file_merges_over_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[device]
host = "10.0.0.1"
timeout = 3

[poll]
interval = 15
rollup = false
"#,
    )
    .unwrap();

    let cfg = load_config_from(&path).unwrap();
    assert_eq!(cfg.device.host, "10.0.0.1");
    assert_eq!(cfg.device.port, 8321);
    assert_eq!(cfg.device.path, "/net/status");

    let mc = to_monitor_config_with_token(&cfg, None).unwrap();
    assert_eq!(mc.timeout, Duration::from_secs(3));
    assert_eq!(mc.poll_interval, Duration::from_secs(15));
    assert!(!mc.rollup_enabled);
    assert_eq!(mc.retention, Duration::from_secs(30 * 24 * 3600));
}

#[test]
fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut cfg = Config::default();
    cfg.device.host = "router.lan".into();
    cfg.device.token_env = Some("ROUTER_TOKEN".into());
    cfg.poll.retention_days = 7;
    save_config_to(&cfg, &path).unwrap();

    assert_eq!(load_config_from(&path).unwrap(), cfg);
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[device]\nport = \"not a port\"\n").unwrap();

    assert!(matches!(
        load_config_from(&path),
        Err(ConfigError::Figment(_))
    ));
}
