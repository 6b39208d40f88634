//! `svc services` — print the service registry.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;

/// Run `svc services`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    app.renderer().render_services(app.registry.services())?;
    Ok(ExitCode::SUCCESS)
}
