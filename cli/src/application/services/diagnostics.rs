//! Application service — `svc doctor` checklist.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits. Checks only observe;
//! nothing here changes container state.

use std::path::Path;

use anyhow::Result;

use crate::application::ports::{CommandRunner, NetworkProbe, PathProbe, ProgressReporter};
use crate::application::services::status;
use crate::domain::compose::ComposeProject;
use crate::domain::config::DiagnosticsConfig;
use crate::domain::health::{
    COMPOSE_MIN_VERSION, CheckCategory, CheckResult, DiagnosticReport, browser_runtime_missing,
    grep_for_hits, parse_compose_version, scan_errors,
};
use crate::domain::logs::LogQuery;
use crate::domain::operation::{ContainerState, ContainerStatus, Operation};
use crate::domain::service::{ServiceDescriptor, ServiceRegistry};

/// Name of the browser runtime service, when the registry has one.
const BROWSER_SERVICE: &str = "browserless";

/// Run the doctor checklist.
///
/// # Errors
///
/// Returns an error only if the configured error patterns do not compile;
/// probe failures are recorded as failed checks.
pub async fn run_diagnostics(
    runner: &impl CommandRunner,
    network: &impl NetworkProbe,
    paths: &impl PathProbe,
    reporter: &impl ProgressReporter,
    project: &ComposeProject,
    registry: &ServiceRegistry,
    settings: &DiagnosticsConfig,
) -> Result<DiagnosticReport> {
    let patterns = settings.compiled_patterns()?;
    let mut report = DiagnosticReport::default();

    reporter.step("checking orchestrator...");
    let orchestrator_ok = probe_orchestrator(runner, project, &mut report).await;
    probe_compose_files(paths, project, &mut report);
    if !orchestrator_ok {
        reporter.warn("orchestrator unavailable, skipping container checks");
        return Ok(report);
    }

    reporter.step("checking containers...");
    let containers = match status::container_states(runner, project, registry).await {
        Ok(rows) => rows,
        Err(e) => {
            report.checks.push(
                CheckResult::fail(
                    CheckCategory::Containers,
                    "container states readable",
                    "Run `docker compose ps` to see the orchestrator error.",
                )
                .with_detail(format!("{e:#}")),
            );
            return Ok(report);
        }
    };
    let targets: Vec<&ServiceDescriptor> = registry
        .services()
        .iter()
        .filter(|s| s.default_enabled || containers.iter().any(|c| c.service == s.compose_service))
        .collect();
    let running: Vec<&ServiceDescriptor> = targets
        .iter()
        .copied()
        .filter(|s| probe_container(s, &containers, &mut report))
        .collect();

    reporter.step("checking ports...");
    let mut bound: Vec<&str> = Vec::new();
    for svc in &targets {
        if let Some(port) = svc.port
            && probe_port(network, &settings.host, svc, port, &mut report).await
        {
            bound.push(&svc.name);
        }
    }

    reporter.step("scanning recent logs...");
    let mut scanned: Vec<String> = Vec::new();
    for svc in &running {
        let lines = recent_lines(runner, project, registry, svc, settings.scan_lines).await;
        match lines {
            Ok(lines) => {
                let hits = scan_errors(&lines, &patterns);
                let name = format!("{} logs clean", svc.name);
                report.checks.push(match hits.last() {
                    None => CheckResult::pass(CheckCategory::Logs, name),
                    Some(last) => CheckResult::fail(
                        CheckCategory::Logs,
                        name,
                        format!(
                            "Inspect with: svc logs --tail {} --grep '{}' --ignore-case {}",
                            settings.scan_lines,
                            grep_for_hits(&hits, &patterns),
                            svc.name
                        ),
                    )
                    .with_detail(format!("{} matching lines, last: {last}", hits.len())),
                });
                scanned.extend(lines);
            }
            Err(e) => report.checks.push(
                CheckResult::fail(
                    CheckCategory::Logs,
                    format!("{} logs readable", svc.name),
                    format!("Run: svc logs {}", svc.name),
                )
                .with_detail(format!("{e:#}")),
            ),
        }
    }

    probe_browser_runtime(registry, &running, &bound, &scanned, &mut report);

    if !running.is_empty() {
        match status::resource_snapshot(runner, project, registry).await {
            Ok(rows) => report.resources = rows,
            Err(e) => {
                tracing::warn!(error = %e, "resource snapshot failed");
                reporter.warn("resource snapshot unavailable");
            }
        }
    }

    reporter.success("diagnostics complete");
    Ok(report)
}

// ── Internal probes ───────────────────────────────────────────────────────────

async fn probe_orchestrator(
    runner: &impl CommandRunner,
    project: &ComposeProject,
    report: &mut DiagnosticReport,
) -> bool {
    let invocation = project.version();
    let name = "docker compose available";
    let install_hint = "Install Docker Engine with the compose plugin (docker compose v2).";
    let output = match runner.run(&invocation.program, &invocation.argv()).await {
        Ok(o) => o,
        Err(e) => {
            report.checks.push(
                CheckResult::fail(CheckCategory::Prerequisites, name, install_hint)
                    .with_detail(format!("{e:#}")),
            );
            return false;
        }
    };
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        report.checks.push(
            CheckResult::fail(CheckCategory::Prerequisites, name, install_hint)
                .with_detail(stderr.trim().to_string()),
        );
        return false;
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    match parse_compose_version(&stdout) {
        Some(v) if v < COMPOSE_MIN_VERSION => {
            report.checks.push(
                CheckResult::fail(
                    CheckCategory::Prerequisites,
                    name,
                    format!("Upgrade to docker compose {COMPOSE_MIN_VERSION} or newer."),
                )
                .with_detail(format!("version {v}")),
            );
            false
        }
        Some(v) => {
            report.checks.push(
                CheckResult::pass(CheckCategory::Prerequisites, name)
                    .with_detail(format!("version {v}")),
            );
            true
        }
        None => {
            report.checks.push(
                CheckResult::pass(CheckCategory::Prerequisites, name)
                    .with_detail("version unknown"),
            );
            true
        }
    }
}

fn probe_compose_files(paths: &impl PathProbe, project: &ComposeProject, report: &mut DiagnosticReport) {
    for file in &project.files {
        let name = format!("compose file {file}");
        report.checks.push(if paths.exists(Path::new(file)) {
            CheckResult::pass(CheckCategory::Prerequisites, name)
        } else {
            CheckResult::fail(
                CheckCategory::Prerequisites,
                name,
                "Run svc from the project directory or pass --file.",
            )
            .with_detail("not found")
        });
    }
}

/// Record whether `svc` has a running container; returns the verdict.
fn probe_container(
    svc: &ServiceDescriptor,
    containers: &[ContainerStatus],
    report: &mut DiagnosticReport,
) -> bool {
    let rows: Vec<&ContainerStatus> = containers
        .iter()
        .filter(|c| c.service == svc.compose_service)
        .collect();
    let name = format!("{} running", svc.name);
    if rows.iter().any(|c| c.state == ContainerState::Running) {
        report
            .checks
            .push(CheckResult::pass(CheckCategory::Containers, name));
        return true;
    }
    let (detail, hint) = match rows.first() {
        None => ("no container".to_string(), start_hint(svc)),
        Some(c) if c.state == ContainerState::Paused => (
            "paused".to_string(),
            format!("Resume with: svc unpause {}", svc.name),
        ),
        Some(c) => (
            format!("{} ({})", c.state.as_str(), c.status),
            start_hint(svc),
        ),
    };
    report
        .checks
        .push(CheckResult::fail(CheckCategory::Containers, name, hint).with_detail(detail));
    false
}

fn start_hint(svc: &ServiceDescriptor) -> String {
    match &svc.profile {
        Some(p) => format!("Start with: svc up --profile {p} {}", svc.name),
        None => format!("Start with: svc up {}", svc.name),
    }
}

async fn probe_port(
    network: &impl NetworkProbe,
    host: &str,
    svc: &ServiceDescriptor,
    port: u16,
    report: &mut DiagnosticReport,
) -> bool {
    let open = network
        .check_tcp_connectivity(host, port)
        .await
        .unwrap_or(false);
    let name = format!("{} port {port}", svc.name);
    report.checks.push(if open {
        CheckResult::pass(CheckCategory::Ports, name)
    } else {
        CheckResult::fail(
            CheckCategory::Ports,
            name,
            format!(
                "Check the port mapping in the compose file and firewall rules (ufw / firewalld) for port {port}."
            ),
        )
        .with_detail(format!("nothing listening on {host}:{port}"))
    });
    open
}

async fn recent_lines(
    runner: &impl CommandRunner,
    project: &ComposeProject,
    registry: &ServiceRegistry,
    svc: &ServiceDescriptor,
    scan_lines: usize,
) -> Result<Vec<String>> {
    let selection = registry.resolve(&[svc.name.clone()], Operation::Logs, &[])?;
    let query = LogQuery {
        tail: Some(scan_lines),
        ..LogQuery::default()
    };
    let invocation = project.logs(&selection, &query);
    let output = runner.run(&invocation.program, &invocation.argv()).await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("{}", stderr.trim());
    }
    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_owned)
        .collect())
}

fn probe_browser_runtime(
    registry: &ServiceRegistry,
    running: &[&ServiceDescriptor],
    bound: &[&str],
    scanned: &[String],
    report: &mut DiagnosticReport,
) {
    let name = "browser runtime available";
    if browser_runtime_missing(scanned) {
        report.checks.push(
            CheckResult::fail(
                CheckCategory::Runtime,
                name,
                "Install the browser in the image (playwright install chromium) or start browserless: svc up browserless",
            )
            .with_detail("logs report a missing or unreachable browser"),
        );
        return;
    }
    let Some(browser) = registry.lookup(BROWSER_SERVICE) else {
        report
            .checks
            .push(CheckResult::pass(CheckCategory::Runtime, name).with_detail("no browser service configured"));
        return;
    };
    let is_running = running.iter().any(|s| s.name == browser.name);
    let reachable = browser.port.is_none() || bound.contains(&browser.name.as_str());
    report.checks.push(if is_running && reachable {
        CheckResult::pass(CheckCategory::Runtime, name)
    } else {
        CheckResult::fail(
            CheckCategory::Runtime,
            name,
            format!("Start the browser runtime: svc up {}", browser.name),
        )
        .with_detail(if is_running {
            "container running but port not reachable"
        } else {
            "container not running"
        })
    });
}
