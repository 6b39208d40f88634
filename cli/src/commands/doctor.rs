//! `svc doctor` — run the diagnostics checklist.
//!
//! Checks only observe; nothing is started, stopped, or repaired. Each
//! failed check carries a hint naming the fix.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::diagnostics;
use crate::infra::fs::LocalFs;
use crate::infra::network::TokioNetworkProbe;
use crate::output::{SilentReporter, TerminalReporter};

/// Run `svc doctor`.
///
/// Exits with failure when any check fails.
///
/// # Errors
///
/// Returns an error if the diagnostics settings are invalid or rendering
/// fails.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let report = if app.is_json() {
        diagnostics::run_diagnostics(
            &app.runner,
            &TokioNetworkProbe,
            &LocalFs,
            &SilentReporter,
            &app.project,
            &app.registry,
            &app.config.diagnostics,
        )
        .await?
    } else {
        let reporter = TerminalReporter::with_spinner(&app.output);
        diagnostics::run_diagnostics(
            &app.runner,
            &TokioNetworkProbe,
            &LocalFs,
            &reporter,
            &app.project,
            &app.registry,
            &app.config.diagnostics,
        )
        .await?
    };

    app.renderer().render_doctor(&report)?;
    if report.is_healthy() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
