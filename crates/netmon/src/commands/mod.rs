//! Command handlers.

pub mod config_cmd;
pub mod fetch;
pub mod run;
pub mod status;

use netmon_core::Monitor;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

pub async fn dispatch(cmd: Command, monitor: &Monitor, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Run(args) => run::handle(&args, monitor, global).await,
        Command::Status => status::handle(monitor, global).await,
        Command::Fetch(args) => fetch::handle(&args, monitor, global).await,
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "command does not need a device".into(),
        )),
    }
}
