//! Domain types and validators for `svc` configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use anyhow::Result;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::domain::compose::ComposeProject;
use crate::domain::error::ConfigError;
use crate::domain::service::{ServiceDescriptor, ServiceRegistry, default_services};

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `svc.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SvcConfig {
    /// How the orchestrator is invoked.
    pub compose: ComposeConfig,
    /// Service registry; replaces the built-in one when present.
    pub services: Vec<ServiceDescriptor>,
    /// Log tailing settings.
    pub logs: LogsConfig,
    /// `svc doctor` settings.
    pub diagnostics: DiagnosticsConfig,
}

impl Default for SvcConfig {
    fn default() -> Self {
        Self {
            compose: ComposeConfig::default(),
            services: default_services(),
            logs: LogsConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}

/// Orchestrator invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeConfig {
    pub program: String,
    pub files: Vec<String>,
    pub project_name: Option<String>,
    /// Timeout for captured invocations (`ps`, `stats`, `version`).
    pub timeout_secs: u64,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        let project = ComposeProject::default();
        Self {
            program: project.program,
            files: project.files,
            project_name: project.project_name,
            timeout_secs: 30,
        }
    }
}

/// Log tailing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogsConfig {
    /// Tail applied when `--tail` is not given.
    pub default_tail: Option<usize>,
    /// Pause before reconnecting a followed stream.
    pub reconnect_delay_ms: u64,
    /// Reconnect attempts before giving up on a followed stream.
    pub max_reconnects: u32,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            default_tail: None,
            reconnect_delay_ms: 1000,
            max_reconnects: 5,
        }
    }
}

/// `svc doctor` settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Host the port checks connect to.
    pub host: String,
    /// Log lines scanned per service.
    pub scan_lines: usize,
    /// Case-insensitive patterns counted as errors.
    pub error_patterns: Vec<String>,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            scan_lines: 200,
            error_patterns: ["ERROR", "Traceback", "Exception", "address already in use"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl DiagnosticsConfig {
    /// Compile the error patterns.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidErrorPattern`] for a pattern that does
    /// not compile.
    pub fn compiled_patterns(&self) -> Result<Vec<Regex>, ConfigError> {
        self.error_patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| ConfigError::InvalidErrorPattern {
                        pattern: p.clone(),
                        source,
                    })
            })
            .collect()
    }
}

impl SvcConfig {
    /// The compose project this config points at.
    #[must_use]
    pub fn project(&self) -> ComposeProject {
        ComposeProject {
            program: self.compose.program.clone(),
            files: self.compose.files.clone(),
            project_name: self.compose.project_name.clone(),
        }
    }

    #[must_use]
    pub fn registry(&self) -> ServiceRegistry {
        ServiceRegistry::new(self.services.clone())
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validate a loaded configuration.
///
/// # Errors
///
/// Returns an error if the registry is empty, a name is defined twice, a
/// profiled service is enabled by default, an unprofiled service is not,
/// no compose file is configured, or a diagnostics pattern does not compile.
pub fn validate_config(config: &SvcConfig) -> Result<()> {
    if config.compose.files.is_empty() {
        return Err(ConfigError::NoComposeFiles.into());
    }
    if config.services.is_empty() {
        return Err(ConfigError::EmptyRegistry.into());
    }
    let mut seen: Vec<&str> = Vec::new();
    for svc in &config.services {
        if seen.contains(&svc.name.as_str()) {
            return Err(ConfigError::DuplicateService(svc.name.clone()).into());
        }
        seen.push(&svc.name);
        match (&svc.profile, svc.default_enabled) {
            (Some(profile), true) => {
                return Err(ConfigError::DefaultEnabledProfile {
                    service: svc.name.clone(),
                    profile: profile.clone(),
                }
                .into());
            }
            (None, false) => {
                return Err(ConfigError::DisabledWithoutProfile(svc.name.clone()).into());
            }
            _ => {}
        }
    }
    config.diagnostics.compiled_patterns()?;
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
