//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::time::Duration;

use anyhow::Result;
use tokio::sync::{mpsc, oneshot};

use crate::domain::config::SvcConfig;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Lines of a running process, delivered in order.
///
/// `lines` closes when the process closes stdout; `exit` then resolves with
/// the exit code (`None` if the process was killed by a signal).
pub struct LineStream {
    pub lines: mpsc::Receiver<String>,
    pub exit: oneshot::Receiver<Option<i32>>,
}

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
    /// Run a program with inherited stdio and return only its exit status.
    ///
    /// No timeout: used for lifecycle operations and `exec`, whose output
    /// and errors pass through to the terminal verbatim.
    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus>;
    /// Spawn a program and stream its stdout line by line. Stderr is inherited.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn stream_lines(&self, program: &str, args: &[&str]) -> Result<LineStream>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Configuration Port ────────────────────────────────────────────────────────

/// Abstracts where configuration lives and how it is read.
pub trait ConfigStore {
    /// Load the configuration, falling back to defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load(&self) -> Result<SvcConfig>;
    /// Path the configuration is read from.
    ///
    /// # Errors
    ///
    /// Returns an error if no candidate location can be determined.
    fn path(&self) -> Result<PathBuf>;
}

// ── Network Probe Port ────────────────────────────────────────────────────────

/// Abstracts network connectivity checks so application services can be tested
/// without real network access.
#[allow(async_fn_in_trait)]
pub trait NetworkProbe {
    /// Check TCP connectivity to the given host and port.
    async fn check_tcp_connectivity(&self, host: &str, port: u16) -> Result<bool>;
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Abstracts local path checks.
pub trait PathProbe {
    /// Whether `path` exists.
    fn exists(&self, path: &Path) -> bool;
}
