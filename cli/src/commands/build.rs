//! `svc build` — build service images.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::lifecycle::{self, LifecycleRequest};
use crate::commands::exit_code;
use crate::domain::compose::LifecycleFlags;
use crate::domain::operation::Operation;

/// Arguments for the build command.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Do not use the build cache
    #[arg(long)]
    pub no_cache: bool,

    /// Always pull newer base images
    #[arg(long)]
    pub pull: bool,

    /// Services to build (default: every active service)
    pub names: Vec<String>,
}

/// Run `svc build`.
///
/// # Errors
///
/// Returns an error if a service is unknown or the orchestrator cannot be
/// spawned.
pub async fn run(app: &AppContext, args: BuildArgs) -> Result<ExitCode> {
    let request = LifecycleRequest {
        names: args.names,
        flags: LifecycleFlags {
            no_cache: args.no_cache,
            pull: args.pull,
            ..LifecycleFlags::default()
        },
        ..LifecycleRequest::default()
    };
    let code =
        lifecycle::apply(&app.runner, &app.project, &app.registry, Operation::Build, &request)
            .await?;
    Ok(exit_code(code))
}
