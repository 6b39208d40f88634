//! Lifecycle operations: up, stop, start, restart, down, pause, unpause,
//! build, and exec.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! Every operation is a single orchestrator invocation with inherited stdio,
//! so orchestrator output and errors reach the user verbatim and the exit
//! code is returned unchanged.

use anyhow::{Context, Result};

use crate::application::ports::CommandRunner;
use crate::domain::compose::{ComposeInvocation, ComposeProject, LifecycleFlags};
use crate::domain::error::ServiceError;
use crate::domain::operation::Operation;
use crate::domain::service::ServiceRegistry;

/// What the user asked for.
#[derive(Debug, Clone, Default)]
pub struct LifecycleRequest {
    /// Logical service names; empty means every active service.
    pub names: Vec<String>,
    /// Profiles requested with `--profile`.
    pub profiles: Vec<String>,
    /// Operation-specific flags.
    pub flags: LifecycleFlags,
}

/// Resolve a request into the invocation that would run.
///
/// `down` always activates every registry profile so profiled containers
/// are removed along with the rest of the stack.
///
/// # Errors
///
/// Returns a [`ServiceError`] if a name is unknown or profile gating
/// refuses it.
pub fn plan(
    project: &ComposeProject,
    registry: &ServiceRegistry,
    op: Operation,
    request: &LifecycleRequest,
) -> Result<ComposeInvocation, ServiceError> {
    let mut profiles = request.profiles.clone();
    if op == Operation::Down {
        for p in registry.all_profiles() {
            if !profiles.contains(&p) {
                profiles.push(p);
            }
        }
    }
    let selection = registry.resolve(&request.names, op, &profiles)?;
    Ok(project.lifecycle(op, &selection, request.flags))
}

/// Run a lifecycle operation and return the orchestrator's exit code.
///
/// # Errors
///
/// Returns an error if resolution fails or the orchestrator cannot be spawned.
pub async fn apply(
    runner: &impl CommandRunner,
    project: &ComposeProject,
    registry: &ServiceRegistry,
    op: Operation,
    request: &LifecycleRequest,
) -> Result<i32> {
    let invocation = plan(project, registry, op, request)?;
    tracing::info!(operation = %op, command = %invocation, "dispatching");
    let status = runner
        .run_status(&invocation.program, &invocation.argv())
        .await
        .with_context(|| format!("failed to run {}", invocation.program))?;
    let code = status.code().unwrap_or(1);
    if code != 0 {
        tracing::warn!(operation = %op, code, "orchestrator exited with failure");
    }
    Ok(code)
}

/// Run `command` inside `service` and return its exit code.
///
/// # Errors
///
/// Returns an error if the service is unknown or the orchestrator cannot
/// be spawned.
pub async fn exec(
    runner: &impl CommandRunner,
    project: &ComposeProject,
    registry: &ServiceRegistry,
    service: &str,
    no_tty: bool,
    command: &[String],
) -> Result<i32> {
    if command.is_empty() {
        return Err(ServiceError::MissingService("exec").into());
    }
    let selection = registry.resolve(&[service.to_string()], Operation::Exec, &[])?;
    let invocation = project.exec(&selection, no_tty, command);
    tracing::debug!(command = %invocation, "exec");
    let status = runner
        .run_status(&invocation.program, &invocation.argv())
        .await
        .with_context(|| format!("failed to exec in {service}"))?;
    Ok(status.code().unwrap_or(1))
}
