//! `svc up` — create and start services in the background.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::lifecycle::{self, LifecycleRequest};
use crate::commands::{ProfileArgs, exit_code};
use crate::domain::compose::LifecycleFlags;
use crate::domain::operation::Operation;

/// Arguments for the up command.
#[derive(Args, Debug)]
pub struct UpArgs {
    #[command(flatten)]
    pub profiles: ProfileArgs,

    /// Build images before starting containers
    #[arg(long)]
    pub build: bool,

    /// Recreate containers even if their configuration is unchanged
    #[arg(long)]
    pub force_recreate: bool,

    /// Services to start (default: every active service)
    pub names: Vec<String>,
}

/// Run `svc up`.
///
/// # Errors
///
/// Returns an error if a service is unknown, its profile is not active, or
/// the orchestrator cannot be spawned.
pub async fn run(app: &AppContext, args: UpArgs) -> Result<ExitCode> {
    let request = LifecycleRequest {
        names: args.names,
        profiles: args.profiles.profiles,
        flags: LifecycleFlags {
            build: args.build,
            force_recreate: args.force_recreate,
            ..LifecycleFlags::default()
        },
    };
    let code = lifecycle::apply(&app.runner, &app.project, &app.registry, Operation::Up, &request)
        .await?;
    if code == 0 && !app.is_dry_run() {
        app.output.success("Services are up.");
    }
    Ok(exit_code(code))
}
