//! Application service — container state and resource snapshots.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::process::Output;

use anyhow::{Context, Result};

use crate::application::ports::CommandRunner;
use crate::domain::compose::{ComposeInvocation, ComposeProject};
use crate::domain::operation::{
    ContainerStatus, ResourceUsage, parse_ps_output, parse_stats_output,
};
use crate::domain::service::ServiceRegistry;

async fn capture(runner: &impl CommandRunner, invocation: &ComposeInvocation) -> Result<Output> {
    tracing::debug!(command = %invocation, "capturing");
    let output = runner
        .run(&invocation.program, &invocation.argv())
        .await
        .with_context(|| format!("failed to run {}", invocation.program))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("`{invocation}` failed: {}", stderr.trim());
    }
    Ok(output)
}

/// State of every project container, including profiled and stopped ones.
///
/// # Errors
///
/// Returns an error if `compose ps` fails or prints something unparseable.
pub async fn container_states(
    runner: &impl CommandRunner,
    project: &ComposeProject,
    registry: &ServiceRegistry,
) -> Result<Vec<ContainerStatus>> {
    let output = capture(runner, &project.ps(&registry.all_profiles())).await?;
    parse_ps_output(&output.stdout)
}

/// One-shot resource usage of the running project containers.
///
/// Returns an empty list when nothing is running.
///
/// # Errors
///
/// Returns an error if `compose ps -q` or `docker stats` fails.
pub async fn resource_snapshot(
    runner: &impl CommandRunner,
    project: &ComposeProject,
    registry: &ServiceRegistry,
) -> Result<Vec<ResourceUsage>> {
    let ids_out = capture(runner, &project.ps_ids(&registry.all_profiles())).await?;
    let ids: Vec<String> = String::from_utf8_lossy(&ids_out.stdout)
        .split_whitespace()
        .map(str::to_owned)
        .collect();
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let stats_out = capture(runner, &project.stats(&ids)).await?;
    parse_stats_output(&stats_out.stdout)
}
