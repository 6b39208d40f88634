//! Infrastructure implementations of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution with guaranteed timeout and kill on all platforms.
//! `DryRunRunner` prints each invocation instead of running it.

use std::process::{ExitStatus, Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::sync::{mpsc, oneshot};

use crate::application::ports::{CommandRunner, LineStream};
use crate::domain::compose::ComposeInvocation;

/// Default timeout for captured orchestrator commands (`ps`, `stats`, `version`).
pub const DEFAULT_CMD_TIMEOUT: Duration = Duration::from_secs(30);

/// Lines buffered between the reader task and the consumer.
const LINE_BUFFER: usize = 1024;

/// Build an `ExitStatus` from a logical exit code (cross-platform).
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

/// Production `CommandRunner` backed by `tokio::process`.
///
/// Captured runs race the child against a sleep and kill it explicitly when
/// the sleep wins. Inherited and streamed runs have no deadline.
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_CMD_TIMEOUT)
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.run_with_timeout(program, args, self.timeout).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        tracing::debug!(program, ?args, "spawning (captured)");
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        // Read stdout/stderr concurrently with wait(): a child that fills the
        // pipe buffer blocks on write and wait() would never resolve.
        tokio::select! {
            result = async {
                let (status, stdout, stderr) = tokio::join!(
                    child.wait(),
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut h) = stdout_handle {
                            let _ = h.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut h) = stderr_handle {
                            let _ = h.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                );
                Ok(Output {
                    status: status.with_context(|| format!("waiting for {program}"))?,
                    stdout,
                    stderr,
                })
            } => result,
            () = tokio::time::sleep(timeout) => {
                let _ = child.kill().await;
                anyhow::bail!("{program} timed out after {}s", timeout.as_secs())
            }
        }
    }

    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus> {
        tracing::debug!(program, ?args, "spawning (inherited stdio)");
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        child
            .wait()
            .await
            .with_context(|| format!("waiting for {program}"))
    }

    fn stream_lines(&self, program: &str, args: &[&str]) -> Result<LineStream> {
        tracing::debug!(program, ?args, "spawning (streamed)");
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;
        let stdout = child
            .stdout
            .take()
            .with_context(|| format!("{program} has no stdout"))?;

        let (line_tx, line_rx) = mpsc::channel(LINE_BUFFER);
        let (exit_tx, exit_rx) = oneshot::channel();
        // The task owns the child: dropping the receiver ends the task and
        // kill_on_drop reaps the process.
        tokio::spawn(async move {
            let mut reader = BufReader::new(stdout);
            let mut buf = Vec::new();
            let mut read_failed = false;
            loop {
                buf.clear();
                match reader.read_until(b'\n', &mut buf).await {
                    Ok(0) => break,
                    Ok(_) => {
                        if line_tx.send(decode_line(&buf)).await.is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "log stream read failed");
                        read_failed = true;
                        break;
                    }
                }
            }
            drop(line_tx);
            // Close the pipe before waiting so a still-writing child gets
            // EPIPE instead of blocking forever.
            drop(reader);
            if read_failed {
                let _ = child.kill().await;
                let _ = exit_tx.send(None);
                return;
            }
            let code = child.wait().await.ok().and_then(|s| s.code());
            let _ = exit_tx.send(code);
        });

        Ok(LineStream {
            lines: line_rx,
            exit: exit_rx,
        })
    }
}

/// One output line without its terminator; invalid UTF-8 is replaced.
fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

/// `CommandRunner` for `--dry-run`: prints each invocation to stdout and
/// reports success without spawning anything.
pub struct DryRunRunner;

impl DryRunRunner {
    fn announce(program: &str, args: &[&str]) {
        let invocation = ComposeInvocation {
            program: program.to_string(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
        };
        println!("{invocation}");
    }
}

impl CommandRunner for DryRunRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.run_with_timeout(program, args, DEFAULT_CMD_TIMEOUT).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        _timeout: Duration,
    ) -> Result<Output> {
        Self::announce(program, args);
        Ok(Output {
            status: exit_status(0),
            stdout: Vec::new(),
            stderr: Vec::new(),
        })
    }

    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus> {
        Self::announce(program, args);
        Ok(exit_status(0))
    }

    fn stream_lines(&self, program: &str, args: &[&str]) -> Result<LineStream> {
        Self::announce(program, args);
        let (_, lines) = mpsc::channel(1);
        let (exit_tx, exit) = oneshot::channel();
        let _ = exit_tx.send(Some(0));
        Ok(LineStream { lines, exit })
    }
}

/// Runner selected at startup: live or dry-run.
pub enum AppRunner {
    Live(TokioCommandRunner),
    DryRun(DryRunRunner),
}

impl CommandRunner for AppRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        match self {
            AppRunner::Live(r) => r.run(program, args).await,
            AppRunner::DryRun(r) => r.run(program, args).await,
        }
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        match self {
            AppRunner::Live(r) => r.run_with_timeout(program, args, timeout).await,
            AppRunner::DryRun(r) => r.run_with_timeout(program, args, timeout).await,
        }
    }

    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus> {
        match self {
            AppRunner::Live(r) => r.run_status(program, args).await,
            AppRunner::DryRun(r) => r.run_status(program, args).await,
        }
    }

    fn stream_lines(&self, program: &str, args: &[&str]) -> Result<LineStream> {
        match self {
            AppRunner::Live(r) => r.stream_lines(program, args),
            AppRunner::DryRun(r) => r.stream_lines(program, args),
        }
    }
}
