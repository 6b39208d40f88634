//! `svc down` — remove the stack's containers and networks.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::lifecycle::{self, LifecycleRequest};
use crate::commands::exit_code;
use crate::domain::compose::LifecycleFlags;
use crate::domain::operation::Operation;

/// Arguments for the down command.
#[derive(Args, Debug)]
pub struct DownArgs {
    /// Also remove named volumes (asks for confirmation)
    #[arg(long)]
    pub volumes: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Run `svc down`.
///
/// Profiled services are always included so no container is left behind.
/// Volumes are kept unless `--volumes` is given and confirmed.
///
/// # Errors
///
/// Returns an error if the prompt fails or the orchestrator cannot be spawned.
pub async fn run(app: &AppContext, args: DownArgs) -> Result<ExitCode> {
    if args.volumes
        && !args.yes
        && !app.non_interactive
        && !app.is_dry_run()
        && !app.confirm("Remove all containers AND their data volumes?", false)?
    {
        app.output.info("Aborted. Nothing was removed.");
        return Ok(ExitCode::SUCCESS);
    }

    let request = LifecycleRequest {
        flags: LifecycleFlags {
            volumes: args.volumes,
            ..LifecycleFlags::default()
        },
        ..LifecycleRequest::default()
    };
    let code =
        lifecycle::apply(&app.runner, &app.project, &app.registry, Operation::Down, &request)
            .await?;
    if code == 0 && !app.is_dry_run() {
        if args.volumes {
            app.output.success("Stack removed, including volumes.");
        } else {
            app.output.success("Stack removed. Volumes are preserved.");
        }
    }
    Ok(exit_code(code))
}
