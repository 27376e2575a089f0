//! Clap derive structures for the `netmon` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// netmon -- router link-health monitor
#[derive(Debug, Parser)]
#[command(
    name = "netmon",
    version,
    about = "Poll an OpenWrt router's netmonitor endpoint and report link health",
    long_about = "Polls the router's status endpoint over a raw TCP socket, records WAN state,\n\
        ping results and link events, and reports availability and loss statistics.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "NETMON_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Router host (overrides config)
    #[arg(long, short = 'H', env = "NETMON_HOST", global = true)]
    pub host: Option<String>,

    /// Router netmonitor port (overrides config)
    #[arg(long, short = 'P', env = "NETMON_PORT", global = true)]
    pub port: Option<u16>,

    /// Bearer token for the status endpoint
    #[arg(long, env = "NETMON_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Fetch timeout in seconds (overrides config)
    #[arg(long, env = "NETMON_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "NETMON_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables (default)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Poll continuously until interrupted
    Run(RunArgs),

    /// Fetch and print the raw status payload (nothing is recorded)
    #[command(alias = "st")]
    Status,

    /// Run one fetch cycle and print what it recorded
    Fetch(FetchArgs),

    /// Inspect and manage configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Run ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Poll interval (overrides config), e.g. "30s", "2m"
    #[arg(long, short = 'i', value_parser = humantime::parse_duration)]
    pub interval: Option<Duration>,

    /// How often to print a summary, e.g. "5m", "1h"
    #[arg(long, default_value = "5m", value_parser = humantime::parse_duration)]
    pub report_every: Duration,

    /// Summary window in hours
    #[arg(long, default_value = "24")]
    pub hours: u32,
}

// ── Fetch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Summary window in hours
    #[arg(long, default_value = "24")]
    pub hours: u32,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Show the effective configuration (token redacted)
    Show,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Store the bearer token in the system keyring
    SetToken {
        /// Token value
        token: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
