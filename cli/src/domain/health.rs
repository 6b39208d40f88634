//! Diagnostics domain types and pure check functions.
//!
//! This module is intentionally free of I/O, async, and external layer imports.
//! All functions take data in and return data out.

use regex::Regex;
use serde::Serialize;

use crate::domain::operation::ResourceUsage;

/// Minimum compose version that understands `--profile` and `ps --format json`.
pub const COMPOSE_MIN_VERSION: semver::Version = semver::Version::new(2, 0, 0);

/// Log messages printed when the browser runtime is missing or unreachable.
pub const BROWSER_MISSING_PATTERNS: &[&str] = &[
    "Executable doesn't exist",
    "playwright install",
    "Failed to launch the browser",
    "browserless",
];

// ── Types ─────────────────────────────────────────────────────────────────────

/// Group a check belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckCategory {
    Prerequisites,
    Containers,
    Ports,
    Logs,
    Runtime,
}

impl CheckCategory {
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            CheckCategory::Prerequisites => "Prerequisites",
            CheckCategory::Containers => "Containers",
            CheckCategory::Ports => "Ports",
            CheckCategory::Logs => "Recent errors",
            CheckCategory::Runtime => "Browser runtime",
        }
    }
}

/// Outcome of a single check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub category: CheckCategory,
    pub name: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl CheckResult {
    #[must_use]
    pub fn pass(category: CheckCategory, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
            passed: true,
            detail: None,
            hint: None,
        }
    }

    #[must_use]
    pub fn fail(category: CheckCategory, name: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
            passed: false,
            detail: None,
            hint: Some(hint.into()),
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Everything `svc doctor` found.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiagnosticReport {
    pub checks: Vec<CheckResult>,
    pub resources: Vec<ResourceUsage>,
}

impl DiagnosticReport {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// Checks in one category, in run order.
    pub fn in_category(&self, category: CheckCategory) -> impl Iterator<Item = &CheckResult> {
        self.checks.iter().filter(move |c| c.category == category)
    }
}

// ── Pure functions ────────────────────────────────────────────────────────────

/// Parse `compose version --short` output (`2.24.5`, `v2.24.5`,
/// `1.29.2, build 5becea4c`).
#[must_use]
pub fn parse_compose_version(stdout: &str) -> Option<semver::Version> {
    let first = stdout.lines().next()?.trim();
    let token = first.split([',', ' ']).next()?.trim_start_matches('v');
    semver::Version::parse(token).ok().or_else(|| {
        // Distro builds sometimes print `2.24` without a patch level.
        let mut parts = token.split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next().unwrap_or("0").parse().ok()?;
        Some(semver::Version::new(major, minor, 0))
    })
}

/// Lines matching any of `patterns`, in order.
#[must_use]
pub fn scan_errors<'a>(lines: &'a [String], patterns: &[Regex]) -> Vec<&'a str> {
    lines
        .iter()
        .filter(|l| patterns.iter().any(|p| p.is_match(l)))
        .map(String::as_str)
        .collect()
}

/// Sources of the `patterns` that match at least one of `hits`, joined as
/// one alternation for `svc logs --grep`.
#[must_use]
pub fn grep_for_hits(hits: &[&str], patterns: &[Regex]) -> String {
    patterns
        .iter()
        .filter(|p| hits.iter().any(|h| p.is_match(h)))
        .map(Regex::as_str)
        .collect::<Vec<_>>()
        .join("|")
}

/// Whether any line reports a missing or unreachable browser runtime.
#[must_use]
pub fn browser_runtime_missing(lines: &[String]) -> bool {
    lines.iter().any(|l| {
        let lower = l.to_ascii_lowercase();
        BROWSER_MISSING_PATTERNS.iter().any(|p| {
            let p = p.to_ascii_lowercase();
            // A bare mention of the service name only counts next to a failure.
            if p == "browserless" {
                lower.contains(&p) && (lower.contains("refused") || lower.contains("error"))
            } else {
                lower.contains(&p)
            }
        })
    })
}

/// Human-readable issue list for failing checks.
#[must_use]
pub fn collect_issues(report: &DiagnosticReport) -> Vec<String> {
    report
        .checks
        .iter()
        .filter(|c| !c.passed)
        .map(|c| match &c.detail {
            Some(d) => format!("{}: {d}", c.name),
            None => c.name.clone(),
        })
        .collect()
}

// ── Unit tests ────────────────────────────────────────────────────────────────
