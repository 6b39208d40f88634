//! Orchestrator operations and the container state they observe.
//!
//! Pure parsing only: callers hand in the raw bytes printed by
//! `docker compose ps --format json` and `docker stats --format '{{json .}}'`.

use std::fmt;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A single orchestrator operation. Each maps to one external invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Up,
    Stop,
    Start,
    Restart,
    Down,
    Pause,
    Unpause,
    Build,
    Logs,
    Exec,
    Stats,
    Ps,
}

impl Operation {
    /// Every operation, in CLI order.
    pub const ALL: [Operation; 12] = [
        Operation::Up,
        Operation::Stop,
        Operation::Start,
        Operation::Restart,
        Operation::Down,
        Operation::Pause,
        Operation::Unpause,
        Operation::Build,
        Operation::Logs,
        Operation::Exec,
        Operation::Stats,
        Operation::Ps,
    ];

    /// The compose subcommand for this operation.
    #[must_use]
    pub fn verb(self) -> &'static str {
        match self {
            Operation::Up => "up",
            Operation::Stop => "stop",
            Operation::Start => "start",
            Operation::Restart => "restart",
            Operation::Down => "down",
            Operation::Pause => "pause",
            Operation::Unpause => "unpause",
            Operation::Build => "build",
            Operation::Logs => "logs",
            Operation::Exec => "exec",
            Operation::Stats => "stats",
            Operation::Ps => "ps",
        }
    }

    /// Whether the operation can bring a container into the running state.
    ///
    /// Activating operations are subject to profile gating: a profiled
    /// service is only touched when its profile was requested.
    #[must_use]
    pub fn is_activating(self) -> bool {
        matches!(self, Operation::Up | Operation::Start | Operation::Restart)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

// ── Container state ───────────────────────────────────────────────────────────

/// Container state as reported by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerState {
    Running,
    Paused,
    Restarting,
    Created,
    Exited,
    Dead,
    #[serde(untagged)]
    Unknown(String),
}

impl ContainerState {
    /// Parse the lowercase state string docker prints.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "running" => ContainerState::Running,
            "paused" => ContainerState::Paused,
            "restarting" => ContainerState::Restarting,
            "created" => ContainerState::Created,
            "exited" => ContainerState::Exited,
            "dead" => ContainerState::Dead,
            other => ContainerState::Unknown(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            ContainerState::Running => "running",
            ContainerState::Paused => "paused",
            ContainerState::Restarting => "restarting",
            ContainerState::Created => "created",
            ContainerState::Exited => "exited",
            ContainerState::Dead => "dead",
            ContainerState::Unknown(s) => s,
        }
    }
}

/// One row of `docker compose ps`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerStatus {
    /// Compose service name.
    pub service: String,
    /// Container name.
    pub name: String,
    /// Container ID (may be abbreviated).
    pub id: String,
    /// Parsed state.
    pub state: ContainerState,
    /// Human status text, e.g. `Up 3 minutes (healthy)`.
    pub status: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawPsEntry {
    #[serde(default)]
    service: String,
    #[serde(default)]
    name: String,
    #[serde(default, rename = "ID")]
    id: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    status: String,
}

impl From<RawPsEntry> for ContainerStatus {
    fn from(raw: RawPsEntry) -> Self {
        Self {
            state: ContainerState::parse(&raw.state),
            service: raw.service,
            name: raw.name,
            id: raw.id,
            status: raw.status,
        }
    }
}

/// Parse `docker compose ps --format json` output.
///
/// Compose before 2.21 prints a single JSON array; later versions print one
/// object per line. Both are accepted. Empty output means no containers.
///
/// # Errors
///
/// Returns an error if the output is neither shape.
pub fn parse_ps_output(stdout: &[u8]) -> Result<Vec<ContainerStatus>> {
    let text = String::from_utf8_lossy(stdout);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if trimmed.starts_with('[') {
        let entries: Vec<RawPsEntry> =
            serde_json::from_str(trimmed).context("parsing compose ps JSON array")?;
        return Ok(entries.into_iter().map(ContainerStatus::from).collect());
    }
    trimmed
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|line| {
            serde_json::from_str::<RawPsEntry>(line)
                .map(ContainerStatus::from)
                .with_context(|| format!("parsing compose ps line: {line}"))
        })
        .collect()
}

// ── Resource usage ────────────────────────────────────────────────────────────

/// One row of `docker stats --no-stream`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceUsage {
    /// Container name.
    pub name: String,
    /// CPU usage in percent.
    pub cpu_percent: f64,
    /// Memory usage text, e.g. `50.1MiB / 1.944GiB`.
    pub mem_usage: String,
    /// Memory usage in percent.
    pub mem_percent: f64,
    /// Network I/O text.
    pub net_io: String,
    /// Block I/O text.
    pub block_io: String,
    /// Number of processes.
    pub pids: u64,
}

#[derive(Deserialize)]
struct RawStats {
    #[serde(default, rename = "Name")]
    name: String,
    #[serde(default, rename = "CPUPerc")]
    cpu: String,
    #[serde(default, rename = "MemUsage")]
    mem_usage: String,
    #[serde(default, rename = "MemPerc")]
    mem: String,
    #[serde(default, rename = "NetIO")]
    net_io: String,
    #[serde(default, rename = "BlockIO")]
    block_io: String,
    #[serde(default, rename = "PIDs")]
    pids: String,
}

fn percent(raw: &str) -> f64 {
    raw.trim().trim_end_matches('%').parse().unwrap_or(0.0)
}

/// Parse `docker stats --no-stream --format '{{json .}}'` output.
///
/// # Errors
///
/// Returns an error if a non-empty line is not a stats object.
pub fn parse_stats_output(stdout: &[u8]) -> Result<Vec<ResourceUsage>> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|line| {
            let raw: RawStats = serde_json::from_str(line)
                .with_context(|| format!("parsing docker stats line: {line}"))?;
            Ok(ResourceUsage {
                cpu_percent: percent(&raw.cpu),
                mem_percent: percent(&raw.mem),
                pids: raw.pids.trim().parse().unwrap_or(0),
                name: raw.name,
                mem_usage: raw.mem_usage,
                net_io: raw.net_io,
                block_io: raw.block_io,
            })
        })
        .collect()
}
