//! `svc logs` — show or follow service logs.

use std::io::Write as _;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::log_tail::{self, FollowPolicy};
use crate::commands::exit_code;
use crate::domain::logs::{LogFilter, LogQuery, Since};

/// Arguments for the logs command.
#[derive(Args, Debug)]
pub struct LogsArgs {
    /// Show at most N lines, most recent last
    #[arg(long, value_name = "N")]
    pub tail: Option<usize>,

    /// Only lines newer than a duration (10m, 1h30m, 2d) or timestamp
    #[arg(long, value_name = "WHEN")]
    pub since: Option<String>,

    /// Prefix lines with timestamps
    #[arg(short, long)]
    pub timestamps: bool,

    /// Keep streaming new lines until interrupted
    #[arg(long)]
    pub follow: bool,

    /// Only lines matching this regular expression
    #[arg(long, value_name = "PATTERN")]
    pub grep: Option<String>,

    /// Match --grep case-insensitively
    #[arg(short, long, requires = "grep")]
    pub ignore_case: bool,

    /// Service to show (default: all)
    pub service: Option<String>,
}

impl LogsArgs {
    /// Validate the arguments into a query; nothing runs if this fails.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::domain::LogError`] for a bad `--since` or
    /// `--grep` value.
    pub fn to_query(&self, default_tail: Option<usize>) -> Result<LogQuery> {
        let since = self.since.as_deref().map(Since::parse).transpose()?;
        let filter = self
            .grep
            .as_deref()
            .map(|p| LogFilter::new(p, self.ignore_case))
            .transpose()?;
        Ok(LogQuery {
            service: self.service.clone(),
            tail: self.tail.or(default_tail),
            since,
            timestamps: self.timestamps,
            follow: self.follow,
            filter,
        })
    }
}

/// Run `svc logs`.
///
/// Ctrl-C ends the command cleanly with exit code 0.
///
/// # Errors
///
/// Returns an error if the arguments are invalid, the service is unknown,
/// or the orchestrator cannot be spawned.
pub async fn run(app: &AppContext, args: &LogsArgs) -> Result<ExitCode> {
    let query = args.to_query(app.config.logs.default_tail)?;
    // A dry-run stream ends at once; reconnecting would only print
    // invocations with made-up resume points.
    let policy = FollowPolicy {
        reconnect_delay: Duration::from_millis(app.config.logs.reconnect_delay_ms),
        max_reconnects: if app.is_dry_run() {
            0
        } else {
            app.config.logs.max_reconnects
        },
    };

    let mut out = std::io::stdout().lock();
    let mut broken_pipe = false;
    let mut sink = |line: &str| {
        if !broken_pipe && writeln!(out, "{line}").is_err() {
            broken_pipe = true;
        }
    };
    let cancel = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    let summary = log_tail::tail(
        &app.runner,
        &app.project,
        &app.registry,
        &query,
        policy,
        &mut sink,
        cancel,
    )
    .await?;
    tracing::debug!(?summary, "log tail finished");

    if summary.interrupted {
        return Ok(ExitCode::SUCCESS);
    }
    if query.follow
        && !app.is_dry_run()
        && summary.exit_code == 0
        && summary.reconnects >= policy.max_reconnects
    {
        app.output
            .warn("Log stream kept ending; gave up reconnecting.");
    }
    Ok(exit_code(summary.exit_code))
}
