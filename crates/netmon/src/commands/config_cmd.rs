//! Config subcommand handlers.

use netmon_config::{Config, render_redacted, save_config_to, store_keyring_token};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{active_config_path, load_effective_config};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&active_config_path(global).display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = load_effective_config(global)?;
            output::print_output(render_redacted(&cfg)?.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init { force } => {
            let path = active_config_path(global);
            if path.exists() && !force {
                return Err(CliError::Validation {
                    field: "config".into(),
                    reason: format!("{} already exists (use --force to overwrite)", path.display()),
                });
            }
            save_config_to(&Config::default(), &path)?;
            output::print_output(&format!("wrote {}", path.display()), global.quiet);
            Ok(())
        }

        ConfigCommand::SetToken { token } => {
            if token.trim().is_empty() {
                return Err(CliError::Validation {
                    field: "token".into(),
                    reason: "must not be blank".into(),
                });
            }
            let cfg = load_effective_config(global)?;
            store_keyring_token(&cfg.device.host, token.trim())?;
            output::print_output(
                &format!("token stored in keyring for {}", cfg.device.host),
                global.quiet,
            );
            Ok(())
        }
    }
}
