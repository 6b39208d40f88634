//! `svc ps` — container state per service.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::status;

/// Run `svc ps`.
///
/// # Errors
///
/// Returns an error if the orchestrator fails or prints unparseable output.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let containers = status::container_states(&app.runner, &app.project, &app.registry).await?;
    if !app.is_dry_run() {
        app.renderer().render_ps(&containers)?;
    }
    Ok(ExitCode::SUCCESS)
}
