//! `svc config` — show the effective configuration.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Print the configuration file path
    Path,
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if rendering fails.
pub fn run(app: &AppContext, cmd: &ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => {
            app.renderer().render_config(&app.config, &app.config_path)?;
        }
        ConfigCommand::Path => {
            if app.is_json() {
                println!(
                    "{}",
                    serde_json::json!({ "path": app.config_path.display().to_string() })
                );
            } else {
                println!("{}", app.config_path.display());
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
