//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Service errors ────────────────────────────────────────────────────────────

/// Errors raised while resolving logical service names against the registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Unknown service '{name}'.\n\nKnown services: {known}")]
    UnknownService { name: String, known: String },

    #[error(
        "Service '{service}' only runs under the '{profile}' profile.\n\
         Activate it explicitly: svc up --profile {profile} {service}"
    )]
    ProfileInactive { service: String, profile: String },

    #[error("'{0}' requires a service name.")]
    MissingService(&'static str),
}

impl ServiceError {
    /// Stable machine-readable code for `--json` error output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::UnknownService { .. } => "UNKNOWN_SERVICE",
            ServiceError::ProfileInactive { .. } => "PROFILE_INACTIVE",
            ServiceError::MissingService(_) => "MISSING_SERVICE",
        }
    }
}

// ── Log errors ────────────────────────────────────────────────────────────────

/// Errors in log query arguments, detected before the orchestrator is invoked.
#[derive(Debug, Error)]
pub enum LogError {
    #[error(
        "Invalid --since value '{0}'.\n\n\
         Use a duration (30s, 10m, 1h30m, 2d) or a timestamp (2024-05-01, 2024-05-01T08:00:00Z)."
    )]
    InvalidSince(String),

    #[error("Invalid log pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl LogError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            LogError::InvalidSince(_) => "INVALID_SINCE",
            LogError::InvalidPattern { .. } => "INVALID_PATTERN",
        }
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors found while validating a loaded configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Service '{0}' is defined more than once.")]
    DuplicateService(String),

    #[error(
        "Service '{service}' belongs to profile '{profile}' and cannot be enabled by default."
    )]
    DefaultEnabledProfile { service: String, profile: String },

    #[error(
        "Service '{0}' is not enabled by default but has no profile; compose would still start it. Give it a profile."
    )]
    DisabledWithoutProfile(String),

    #[error("At least one compose file must be configured.")]
    NoComposeFiles,

    #[error("The service registry is empty.")]
    EmptyRegistry,

    #[error("Invalid diagnostics error pattern '{pattern}': {source}")]
    InvalidErrorPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        "INVALID_CONFIG"
    }
}
