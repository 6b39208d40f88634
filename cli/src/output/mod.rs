//! Output formatting module

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use std::path::Path;

use anyhow::Result;
use console::Term;
use owo_colors::OwoColorize as _;

pub use human::HumanRenderer;
pub use json::JsonRenderer;
pub use reporter::{SilentReporter, TerminalReporter};
pub use styles::Styles;

use crate::domain::config::SvcConfig;
use crate::domain::health::DiagnosticReport;
use crate::domain::operation::{ContainerStatus, ResourceUsage};
use crate::domain::service::ServiceDescriptor;

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Check if progress indicators should be shown.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a warning message prefixed with `⚠`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// Print an error message prefixed with `✗` to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    /// Print an info message prefixed with `ℹ`. Suppressed when `quiet`.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "ℹ".style(self.styles.info));
        }
    }

    /// Print a section header. Suppressed when `quiet`.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// Print a key-value pair with the key dimmed. Suppressed when `quiet`.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }
}

/// Renderer selected from the output mode.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json(JsonRenderer),
}

impl Renderer<'_> {
    /// Render the service registry.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_services(&self, services: &[ServiceDescriptor]) -> Result<()> {
        match self {
            Renderer::Human(r) => {
                r.render_services(services);
                Ok(())
            }
            Renderer::Json(r) => r.render_services(services),
        }
    }

    /// Render container states.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_ps(&self, containers: &[ContainerStatus]) -> Result<()> {
        match self {
            Renderer::Human(r) => {
                r.render_ps(containers);
                Ok(())
            }
            Renderer::Json(r) => r.render_ps(containers),
        }
    }

    /// Render a resource snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_stats(&self, rows: &[ResourceUsage]) -> Result<()> {
        match self {
            Renderer::Human(r) => {
                r.render_stats(rows);
                Ok(())
            }
            Renderer::Json(r) => r.render_stats(rows),
        }
    }

    /// Render the doctor report.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_doctor(&self, report: &DiagnosticReport) -> Result<()> {
        match self {
            Renderer::Human(r) => {
                r.render_doctor(report);
                Ok(())
            }
            Renderer::Json(r) => r.render_doctor(report),
        }
    }

    /// Render the effective configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_config(&self, config: &SvcConfig, path: &Path) -> Result<()> {
        match self {
            Renderer::Human(r) => r.render_config(config, path),
            Renderer::Json(r) => r.render_config(config, path),
        }
    }

    /// Render the CLI version.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_version(&self, version: &str) -> Result<()> {
        match self {
            Renderer::Human(r) => {
                r.render_version(version);
                Ok(())
            }
            Renderer::Json(r) => r.render_version(version),
        }
    }
}
