//! `svc stats` — one-shot resource usage of the project containers.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::status;

/// Run `svc stats`.
///
/// # Errors
///
/// Returns an error if the orchestrator fails or prints unparseable output.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let rows = status::resource_snapshot(&app.runner, &app.project, &app.registry).await?;
    if !app.is_dry_run() {
        app.renderer().render_stats(&rows)?;
    }
    Ok(ExitCode::SUCCESS)
}
