mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use netmon_core::Monitor;

use crate::cli::{Cli, Command, RunArgs};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose, cli.global.log_json);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't talk to the device
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "netmon", &mut std::io::stdout());
            Ok(())
        }

        // Everything else needs a monitor for the configured device
        cmd => {
            let mut monitor_config = config::build_monitor_config(&cli.global)?;
            if let Command::Run(RunArgs {
                interval: Some(interval),
                ..
            }) = &cmd
            {
                monitor_config.poll_interval = *interval;
            }
            let monitor = Monitor::new(monitor_config);

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &monitor, &cli.global).await
        }
    }
}
