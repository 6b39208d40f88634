//! `svc stop|start|restart|pause|unpause` — act on existing containers.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::lifecycle::{self, LifecycleRequest};
use crate::commands::{ProfileArgs, exit_code};
use crate::domain::operation::Operation;

/// Arguments shared by the container control commands.
#[derive(Args, Debug)]
pub struct ControlArgs {
    #[command(flatten)]
    pub profiles: ProfileArgs,

    /// Services to act on (default: every active service)
    pub names: Vec<String>,
}

/// Run a control operation.
///
/// # Errors
///
/// Returns an error if a service is unknown, profile gating refuses it, or
/// the orchestrator cannot be spawned.
pub async fn run(app: &AppContext, op: Operation, args: ControlArgs) -> Result<ExitCode> {
    let request = LifecycleRequest {
        names: args.names,
        profiles: args.profiles.profiles,
        ..LifecycleRequest::default()
    };
    let code = lifecycle::apply(&app.runner, &app.project, &app.registry, op, &request).await?;
    if code == 0 && !app.is_dry_run() {
        app.output.success(&done_message(op));
    }
    Ok(exit_code(code))
}

fn done_message(op: Operation) -> String {
    match op {
        Operation::Stop => "Services stopped. Containers are preserved.".to_string(),
        Operation::Pause => "Services paused. Resume: svc unpause".to_string(),
        Operation::Unpause => "Services resumed.".to_string(),
        other => format!("{} complete.", capitalize(other.verb())),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
