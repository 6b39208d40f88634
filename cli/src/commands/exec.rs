//! `svc exec` — run a command inside a service container.

use std::io::IsTerminal;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::lifecycle;
use crate::commands::exit_code;

/// Arguments for the exec command.
#[derive(Args, Debug)]
#[command(trailing_var_arg = true)]
pub struct ExecArgs {
    /// Do not allocate a TTY
    #[arg(short = 'T', long)]
    pub no_tty: bool,

    /// Service to run the command in
    pub service: String,

    /// Command and arguments to run
    #[arg(required = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Run a command inside a service container.
///
/// Passes stdin, stdout, and stderr through transparently. A TTY is only
/// allocated when stdin is a terminal.
///
/// # Errors
///
/// Returns an error if the service is unknown or the command cannot be
/// spawned.
pub async fn run(app: &AppContext, args: ExecArgs) -> Result<ExitCode> {
    let no_tty = args.no_tty || !std::io::stdin().is_terminal();
    let code = lifecycle::exec(
        &app.runner,
        &app.project,
        &app.registry,
        &args.service,
        no_tty,
        &args.command,
    )
    .await?;
    Ok(exit_code(code))
}
