//! JSON renderer and the error-object formatter used by all `--json` code
//! paths when a command fails.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::config::SvcConfig;
use crate::domain::error::{ConfigError, LogError, ServiceError};
use crate::domain::health::DiagnosticReport;
use crate::domain::operation::{ContainerStatus, ResourceUsage};
use crate::domain::service::ServiceDescriptor;

/// Renders domain types as pretty-printed JSON on stdout.
pub struct JsonRenderer;

fn print_json(value: &impl Serialize) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
    println!("{out}");
    Ok(())
}

impl JsonRenderer {
    /// Print the registry as `{"services": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_services(&self, services: &[ServiceDescriptor]) -> Result<()> {
        print_json(&serde_json::json!({ "services": services }))
    }

    /// Print container states as `{"containers": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_ps(&self, containers: &[ContainerStatus]) -> Result<()> {
        print_json(&serde_json::json!({ "containers": containers }))
    }

    /// Print a resource snapshot as `{"stats": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_stats(&self, rows: &[ResourceUsage]) -> Result<()> {
        print_json(&serde_json::json!({ "stats": rows }))
    }

    /// Print the doctor report with an overall `healthy` verdict.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_doctor(&self, report: &DiagnosticReport) -> Result<()> {
        print_json(&serde_json::json!({
            "healthy": report.is_healthy(),
            "checks": report.checks,
            "resources": report.resources,
        }))
    }

    /// Print the effective configuration and where it was read from.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_config(&self, config: &SvcConfig, path: &Path) -> Result<()> {
        print_json(&serde_json::json!({
            "path": path.display().to_string(),
            "config": config,
        }))
    }

    /// Print `{"version": "..."}`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_version(&self, version: &str) -> Result<()> {
        print_json(&serde_json::json!({ "version": version }))
    }
}

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Machine-readable code for a failed command, taken from the first typed
/// domain error in the chain.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    err.chain()
        .find_map(|cause| {
            cause
                .downcast_ref::<ServiceError>()
                .map(ServiceError::code)
                .or_else(|| cause.downcast_ref::<LogError>().map(LogError::code))
                .or_else(|| cause.downcast_ref::<ConfigError>().map(ConfigError::code))
        })
        .unwrap_or("ERROR")
}
