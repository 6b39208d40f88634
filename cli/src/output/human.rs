//! Human-readable terminal renderer.

use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize as _;

use crate::domain::config::SvcConfig;
use crate::domain::health::{CheckCategory, CheckResult, DiagnosticReport, collect_issues};
use crate::domain::operation::{ContainerState, ContainerStatus, ResourceUsage};
use crate::domain::service::ServiceDescriptor;
use crate::output::OutputContext;

const CATEGORIES: [CheckCategory; 5] = [
    CheckCategory::Prerequisites,
    CheckCategory::Containers,
    CheckCategory::Ports,
    CheckCategory::Logs,
    CheckCategory::Runtime,
];

/// Environment variables shown by `svc config show`.
const CONFIG_ENV: [&str; 4] = ["SVC_CONFIG", "SVC_COMPOSE_FILE", "SVC_PROJECT", "NO_COLOR"];

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        if self.ctx.quiet {
            return;
        }
        self.ctx.info(&format!("svc v{version}"));
    }

    /// Render the service registry as a table.
    pub fn render_services(&self, services: &[ServiceDescriptor]) {
        println!(
            "  {}",
            format!(
                "{:<14} {:<16} {:<10} {:<8} {}",
                "NAME", "COMPOSE SERVICE", "PROFILE", "DEFAULT", "PORT"
            )
            .style(self.ctx.styles.bold)
        );
        for svc in services {
            println!("  {}", format_service_row(svc));
        }
    }

    /// Render container states as a table.
    pub fn render_ps(&self, containers: &[ContainerStatus]) {
        if containers.is_empty() {
            if !self.ctx.quiet {
                self.ctx.info("No containers. Start the stack: svc up");
            }
            return;
        }
        println!(
            "  {}",
            format!("{:<14} {:<28} {:<11} {}", "SERVICE", "CONTAINER", "STATE", "STATUS")
                .style(self.ctx.styles.bold)
        );
        for c in containers {
            let state = format!("{:<11}", c.state.as_str());
            let state = match c.state {
                ContainerState::Running => state.style(self.ctx.styles.success).to_string(),
                ContainerState::Paused | ContainerState::Restarting => {
                    state.style(self.ctx.styles.warning).to_string()
                }
                _ => state.style(self.ctx.styles.error).to_string(),
            };
            println!("  {:<14} {:<28} {state} {}", c.service, c.name, c.status);
        }
    }

    /// Render a resource snapshot as a table.
    pub fn render_stats(&self, rows: &[ResourceUsage]) {
        if rows.is_empty() {
            if !self.ctx.quiet {
                self.ctx.info("No running containers.");
            }
            return;
        }
        println!(
            "  {}",
            format!(
                "{:<28} {:>7} {:<22} {:>7} {:<20} {:<20} {:>5}",
                "CONTAINER", "CPU %", "MEM USAGE / LIMIT", "MEM %", "NET I/O", "BLOCK I/O", "PIDS"
            )
            .style(self.ctx.styles.bold)
        );
        for row in rows {
            println!("  {}", format_stats_row(row));
        }
    }

    /// Render doctor check results grouped by category.
    pub fn render_doctor(&self, report: &DiagnosticReport) {
        println!();
        println!("  {}", "svc health check".style(self.ctx.styles.header));

        for category in CATEGORIES {
            let mut checks = report.in_category(category).peekable();
            if checks.peek().is_none() {
                continue;
            }
            println!();
            println!("  {}:", category.title());
            for check in checks {
                self.print_check(check);
            }
        }

        if !report.resources.is_empty() {
            println!();
            println!("  Resources:");
            for row in &report.resources {
                println!(
                    "    {:<28} cpu {:>6.2}%  mem {} ({:.2}%)",
                    row.name, row.cpu_percent, row.mem_usage, row.mem_percent
                );
            }
        }

        println!();
        let issues = collect_issues(report);
        if issues.is_empty() {
            println!(
                "  {} Everything looks good!",
                "✓".style(self.ctx.styles.success)
            );
        } else {
            println!(
                "  {} {}",
                "✗".style(self.ctx.styles.error),
                format_issue_count(issues.len()),
            );
        }
        println!();
    }

    fn print_check(&self, check: &CheckResult) {
        let line = match &check.detail {
            Some(d) => format!("{} {}", check.name, format!("({d})").style(self.ctx.styles.dim)),
            None => check.name.clone(),
        };
        if check.passed {
            println!("    {} {line}", "✓".style(self.ctx.styles.success));
        } else {
            println!("    {} {line}", "✗".style(self.ctx.styles.error));
            if let Some(hint) = &check.hint {
                println!("      {hint}");
            }
        }
    }

    /// Render the effective configuration and the environment that shapes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry cannot be serialized.
    pub fn render_config(&self, config: &SvcConfig, path: &Path) -> Result<()> {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        println!("  {}", "Compose:".style(self.ctx.styles.bold));
        println!("    {:<18} {}", "program:", config.compose.program);
        println!("    {:<18} {}", "files:", config.compose.files.join(", "));
        println!(
            "    {:<18} {}",
            "project_name:",
            config.compose.project_name.as_deref().unwrap_or("(default)")
        );
        println!("    {:<18} {}s", "timeout:", config.compose.timeout_secs);
        println!();
        println!("  {}", "Logs:".style(self.ctx.styles.bold));
        println!(
            "    {:<18} {}",
            "default_tail:",
            config
                .logs
                .default_tail
                .map_or_else(|| "(all)".to_string(), |n| n.to_string())
        );
        println!(
            "    {:<18} {}ms x {}",
            "reconnect:", config.logs.reconnect_delay_ms, config.logs.max_reconnects
        );
        println!();
        println!("  {}", "Diagnostics:".style(self.ctx.styles.bold));
        println!("    {:<18} {}", "host:", config.diagnostics.host);
        println!("    {:<18} {}", "scan_lines:", config.diagnostics.scan_lines);
        println!(
            "    {:<18} {}",
            "error_patterns:",
            config.diagnostics.error_patterns.join(", ")
        );
        println!();
        println!("  {}", "Services:".style(self.ctx.styles.bold));
        for svc in &config.services {
            println!("    {}", format_service_row(svc));
        }
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in CONFIG_ENV {
            println!(
                "    {:<18} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
        println!();
        Ok(())
    }
}

// ── Display helpers (used by tests and output layer) ─────────────────────────

#[must_use]
pub fn format_service_row(svc: &ServiceDescriptor) -> String {
    format!(
        "{:<14} {:<16} {:<10} {:<8} {}",
        svc.name,
        svc.compose_service,
        svc.profile.as_deref().unwrap_or("-"),
        if svc.default_enabled { "yes" } else { "no" },
        svc.port.map_or_else(|| "-".to_string(), |p| p.to_string()),
    )
}

#[must_use]
pub fn format_stats_row(row: &ResourceUsage) -> String {
    format!(
        "{:<28} {:>6.2}% {:<22} {:>6.2}% {:<20} {:<20} {:>5}",
        row.name, row.cpu_percent, row.mem_usage, row.mem_percent, row.net_io, row.block_io, row.pids
    )
}

#[must_use]
pub fn format_issue_count(count: usize) -> String {
    let noun = if count == 1 { "issue" } else { "issues" };
    format!("Found {count} {noun}.")
}
