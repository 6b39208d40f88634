//! `svc version` — print the CLI version.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;

/// Run `svc version`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    app.renderer().render_version(env!("CARGO_PKG_VERSION"))?;
    Ok(ExitCode::SUCCESS)
}
