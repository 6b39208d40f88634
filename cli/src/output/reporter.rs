//! `TerminalReporter` — Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use indicatif::ProgressBar;
use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, progress};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// On a TTY, steps drive a single spinner; otherwise:
/// - `step()` prints `"  → {message}"` (suppressed when `ctx.quiet`)
/// - `success()` prints `"  ✓ {message}"` (suppressed when `ctx.quiet`)
/// - `warn()` prints `"  ! {message}"` (suppressed when `ctx.quiet`)
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    spinner: Option<ProgressBar>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx, spinner: None }
    }

    /// Like [`TerminalReporter::new`], but steps update a spinner when the
    /// terminal supports it.
    #[must_use]
    pub fn with_spinner(ctx: &'a OutputContext) -> Self {
        let spinner = ctx.show_progress().then(|| progress::spinner("starting..."));
        Self { ctx, spinner }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if let Some(pb) = &self.spinner {
            pb.set_message(message.to_string());
        } else if !self.ctx.quiet {
            println!("  {} {message}", "→".style(self.ctx.styles.info));
        }
    }

    fn success(&self, message: &str) {
        if let Some(pb) = &self.spinner {
            progress::finish_ok(pb, message);
        } else if !self.ctx.quiet {
            println!("  {} {message}", "✓".style(self.ctx.styles.success));
        }
    }

    fn warn(&self, message: &str) {
        if let Some(pb) = &self.spinner {
            pb.suspend(|| println!("  {} {message}", "!".style(self.ctx.styles.warning)));
        } else if !self.ctx.quiet {
            println!("  {} {message}", "!".style(self.ctx.styles.warning));
        }
    }
}

impl Drop for TerminalReporter<'_> {
    fn drop(&mut self) {
        if let Some(pb) = &self.spinner
            && !pb.is_finished()
        {
            pb.finish_and_clear();
        }
    }
}

/// Reporter that discards progress events (used under `--json`).
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn step(&self, _message: &str) {}
    fn success(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
}
