//! Shared test helpers: fake runners, probes, and output constructors.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::path::Path;
use std::process::{ExitStatus, Output};
use std::time::Duration;

use anyhow::Result;
use tokio::sync::{mpsc, oneshot};

use svc_cli::application::ports::{
    CommandRunner, LineStream, NetworkProbe, PathProbe, ProgressReporter,
};
use svc_cli::domain::compose::ComposeProject;
use svc_cli::domain::operation::ContainerState;
use svc_cli::domain::service::ServiceRegistry;
pub use svc_cli::infra::command_runner::exit_status;

// ── Output constructors ──────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

pub fn project() -> ComposeProject {
    ComposeProject::default()
}

pub fn registry() -> ServiceRegistry {
    ServiceRegistry::default()
}

fn record(calls: &RefCell<Vec<String>>, program: &str, args: &[&str]) {
    let mut line = program.to_string();
    for a in args {
        line.push(' ');
        line.push_str(a);
    }
    calls.borrow_mut().push(line);
}

// ── RecordingRunner ──────────────────────────────────────────────────────────

/// Records every invocation as a space-joined command line and reports a
/// fixed exit code.
pub struct RecordingRunner {
    pub calls: RefCell<Vec<String>>,
    code: i32,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::with_status(0)
    }

    pub fn with_status(code: i32) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            code,
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        record(&self.calls, program, args);
        Ok(Output {
            status: exit_status(self.code),
            stdout: Vec::new(),
            stderr: Vec::new(),
        })
    }

    async fn run_with_timeout(&self, program: &str, args: &[&str], _: Duration) -> Result<Output> {
        self.run(program, args).await
    }

    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus> {
        record(&self.calls, program, args);
        Ok(exit_status(self.code))
    }

    fn stream_lines(&self, program: &str, args: &[&str]) -> Result<LineStream> {
        record(&self.calls, program, args);
        let (_, lines) = mpsc::channel(1);
        let (exit_tx, exit) = oneshot::channel();
        let _ = exit_tx.send(Some(self.code));
        Ok(LineStream { lines, exit })
    }
}

// ── StreamRunner ─────────────────────────────────────────────────────────────

/// One scripted log stream.
pub struct Script {
    pub lines: Vec<String>,
    pub exit: Option<i32>,
    /// Keep the stream open after the lines, like a quiet `--follow`.
    pub hang: bool,
}

impl Script {
    pub fn ends(lines: Vec<String>, code: i32) -> Self {
        Self {
            lines,
            exit: Some(code),
            hang: false,
        }
    }

    pub fn hangs(lines: Vec<String>) -> Self {
        Self {
            lines,
            exit: None,
            hang: true,
        }
    }
}

/// Serves scripted streams to successive `stream_lines` calls.
pub struct StreamRunner {
    scripts: RefCell<VecDeque<Script>>,
    pub calls: RefCell<Vec<String>>,
    held_lines: RefCell<Vec<mpsc::Sender<String>>>,
    held_exits: RefCell<Vec<oneshot::Sender<Option<i32>>>>,
}

impl StreamRunner {
    pub fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts: RefCell::new(scripts.into()),
            calls: RefCell::new(Vec::new()),
            held_lines: RefCell::new(Vec::new()),
            held_exits: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for StreamRunner {
    async fn run(&self, _: &str, _: &[&str]) -> Result<Output> {
        anyhow::bail!("captured run not expected in this test")
    }

    async fn run_with_timeout(&self, _: &str, _: &[&str], _: Duration) -> Result<Output> {
        anyhow::bail!("captured run not expected in this test")
    }

    async fn run_status(&self, _: &str, _: &[&str]) -> Result<ExitStatus> {
        anyhow::bail!("run_status not expected in this test")
    }

    fn stream_lines(&self, program: &str, args: &[&str]) -> Result<LineStream> {
        record(&self.calls, program, args);
        let script = self
            .scripts
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("no more scripted streams"))?;
        let (tx, lines) = mpsc::channel(script.lines.len().max(1));
        for line in script.lines {
            tx.try_send(line)?;
        }
        let (exit_tx, exit) = oneshot::channel();
        if script.hang {
            self.held_lines.borrow_mut().push(tx);
            self.held_exits.borrow_mut().push(exit_tx);
        } else {
            let _ = exit_tx.send(script.exit);
        }
        Ok(LineStream { lines, exit })
    }
}

// ── FakeCompose ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct FakeContainer {
    pub id: String,
    pub state: ContainerState,
}

/// Stateful stand-in for `docker compose`: tracks one container per service
/// and answers `ps`, `logs`, `stats`, and `version` from that state.
pub struct FakeCompose {
    registry: ServiceRegistry,
    containers: RefCell<BTreeMap<String, FakeContainer>>,
    next_id: Cell<u32>,
    pub calls: RefCell<Vec<String>>,
    pub logs: RefCell<BTreeMap<String, Vec<String>>>,
    pub version: Option<String>,
}

const VERBS: [&str; 8] = [
    "up", "stop", "start", "restart", "pause", "unpause", "down", "build",
];

impl FakeCompose {
    pub fn new(registry: ServiceRegistry) -> Self {
        Self {
            registry,
            containers: RefCell::new(BTreeMap::new()),
            next_id: Cell::new(1),
            calls: RefCell::new(Vec::new()),
            logs: RefCell::new(BTreeMap::new()),
            version: Some("2.24.5".to_string()),
        }
    }

    /// A fake with `services` already running.
    pub fn running(services: &[&str]) -> Self {
        let fake = Self::new(registry());
        for s in services {
            fake.create(s);
        }
        fake
    }

    pub fn without_compose() -> Self {
        Self {
            version: None,
            ..Self::new(registry())
        }
    }

    pub fn container(&self, service: &str) -> Option<FakeContainer> {
        self.containers.borrow().get(service).cloned()
    }

    pub fn set_state(&self, service: &str, state: ContainerState) {
        if let Some(c) = self.containers.borrow_mut().get_mut(service) {
            c.state = state;
        }
    }

    pub fn set_logs(&self, service: &str, lines: &[&str]) {
        self.logs
            .borrow_mut()
            .insert(service.to_string(), strings(lines));
    }

    fn create(&self, service: &str) {
        let id = format!("c{:04}{service}", self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.containers.borrow_mut().insert(
            service.to_string(),
            FakeContainer {
                id,
                state: ContainerState::Running,
            },
        );
    }

    fn profiles(args: &[&str]) -> Vec<String> {
        args.windows(2)
            .filter(|w| w[0] == "--profile")
            .map(|w| w[1].to_string())
            .collect()
    }

    /// Apply a lifecycle verb; returns the exit code docker would give.
    fn apply(&self, verb: &str, flags: &[&str], named: Vec<String>, profiles: &[String]) -> i32 {
        let targets: Vec<String> = if named.is_empty() {
            match verb {
                "up" => self
                    .registry
                    .services()
                    .iter()
                    .filter(|s| s.is_active(profiles))
                    .map(|s| s.compose_service.clone())
                    .collect(),
                _ => self.containers.borrow().keys().cloned().collect(),
            }
        } else {
            named
        };

        if verb == "down" {
            self.containers.borrow_mut().clear();
            return 0;
        }
        for service in targets {
            let existing = self.container(&service);
            match (verb, existing) {
                ("up", None) => self.create(&service),
                ("up", Some(_)) if flags.contains(&"--force-recreate") => self.create(&service),
                ("up" | "start" | "restart", Some(_)) => {
                    self.set_state(&service, ContainerState::Running);
                }
                ("stop", Some(_)) => self.set_state(&service, ContainerState::Exited),
                ("pause", Some(c)) if c.state == ContainerState::Running => {
                    self.set_state(&service, ContainerState::Paused);
                }
                ("unpause", Some(c)) if c.state == ContainerState::Paused => {
                    self.set_state(&service, ContainerState::Running);
                }
                ("build", _) => {}
                _ => return 1,
            }
        }
        0
    }

    fn ps_json(&self) -> String {
        self.containers
            .borrow()
            .iter()
            .map(|(service, c)| {
                let status = if c.state == ContainerState::Running {
                    "Up 5 minutes"
                } else {
                    ""
                };
                serde_json::json!({
                    "Service": service,
                    "Name": format!("stack-{service}-1"),
                    "ID": c.id,
                    "State": c.state.as_str(),
                    "Status": status,
                })
                .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn running_ids(&self) -> Vec<String> {
        self.containers
            .borrow()
            .values()
            .filter(|c| c.state == ContainerState::Running)
            .map(|c| c.id.clone())
            .collect()
    }
}

impl CommandRunner for FakeCompose {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        record(&self.calls, program, args);
        if args.first() == Some(&"stats") {
            let rows: Vec<String> = args
                .iter()
                .skip(4)
                .map(|id| {
                    serde_json::json!({
                        "Name": id,
                        "CPUPerc": "0.50%",
                        "MemUsage": "64MiB / 2GiB",
                        "MemPerc": "3.13%",
                        "NetIO": "1kB / 1kB",
                        "BlockIO": "0B / 0B",
                        "PIDs": "7",
                    })
                    .to_string()
                })
                .collect();
            return Ok(ok_output(rows.join("\n").as_bytes()));
        }
        if args.contains(&"version") {
            return Ok(match &self.version {
                Some(v) => ok_output(format!("{v}\n").as_bytes()),
                None => err_output(1, b"docker: 'compose' is not a docker command."),
            });
        }
        if args.contains(&"ps") {
            if args.contains(&"-q") {
                return Ok(ok_output(self.running_ids().join("\n").as_bytes()));
            }
            return Ok(ok_output(self.ps_json().as_bytes()));
        }
        if args.contains(&"logs") {
            let service = args.last().copied().unwrap_or_default();
            let lines = self.logs.borrow().get(service).cloned().unwrap_or_default();
            return Ok(ok_output(lines.join("\n").as_bytes()));
        }
        anyhow::bail!("unexpected captured command: {program} {}", args.join(" "))
    }

    async fn run_with_timeout(&self, program: &str, args: &[&str], _: Duration) -> Result<Output> {
        self.run(program, args).await
    }

    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus> {
        record(&self.calls, program, args);
        let Some(pos) = args.iter().position(|a| VERBS.contains(a)) else {
            anyhow::bail!("unexpected lifecycle command: {}", args.join(" "));
        };
        let rest = &args[pos + 1..];
        let flags: Vec<&str> = rest.iter().copied().filter(|a| a.starts_with('-')).collect();
        let named: Vec<String> = rest
            .iter()
            .filter(|a| !a.starts_with('-'))
            .map(|a| (*a).to_string())
            .collect();
        let code = self.apply(args[pos], &flags, named, &Self::profiles(args));
        Ok(exit_status(code))
    }

    fn stream_lines(&self, _: &str, _: &[&str]) -> Result<LineStream> {
        anyhow::bail!("streaming not expected in this test")
    }
}

// ── Probes and reporters ─────────────────────────────────────────────────────

/// Ports in `open` accept connections; everything else is refused.
pub struct FakeNetwork {
    pub open: Vec<u16>,
}

impl NetworkProbe for FakeNetwork {
    async fn check_tcp_connectivity(&self, _host: &str, port: u16) -> Result<bool> {
        Ok(self.open.contains(&port))
    }
}

pub struct FakePaths {
    pub present: bool,
}

impl PathProbe for FakePaths {
    fn exists(&self, _path: &Path) -> bool {
        self.present
    }
}

#[derive(Default)]
pub struct RecordingReporter {
    pub events: RefCell<Vec<String>>,
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.events.borrow_mut().push(format!("step: {message}"));
    }

    fn success(&self, message: &str) {
        self.events.borrow_mut().push(format!("success: {message}"));
    }

    fn warn(&self, message: &str) {
        self.events.borrow_mut().push(format!("warn: {message}"));
    }
}
