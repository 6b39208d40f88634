//! Application service — log tailing and following.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//!
//! A one-shot query buffers the merged stream so `--tail` bounds the total
//! output, then filters. A followed query emits matching lines as they
//! arrive, after a bounded backlog when `--tail` is set, and reconnects
//! when the orchestrator ends the stream cleanly (e.g. the container
//! restarted), resuming from the moment it ended.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use anyhow::Result;

use crate::application::ports::{CommandRunner, LineStream};
use crate::domain::compose::{ComposeInvocation, ComposeProject};
use crate::domain::logs::{LogQuery, Since, TailBuffer};
use crate::domain::operation::Operation;
use crate::domain::service::ServiceRegistry;

/// Reconnect behaviour for followed streams.
#[derive(Debug, Clone, Copy)]
pub struct FollowPolicy {
    pub reconnect_delay: Duration,
    pub max_reconnects: u32,
}

impl Default for FollowPolicy {
    fn default() -> Self {
        Self {
            reconnect_delay: Duration::from_secs(1),
            max_reconnects: 5,
        }
    }
}

/// How a tail run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TailSummary {
    /// Lines handed to the sink.
    pub emitted: usize,
    /// Reconnects performed while following.
    pub reconnects: u32,
    /// Exit code of the last orchestrator invocation (0 when interrupted).
    pub exit_code: i32,
    /// Whether the run stopped because `cancel` resolved.
    pub interrupted: bool,
}

async fn exit_code(stream: LineStream) -> i32 {
    stream.exit.await.ok().flatten().unwrap_or(1)
}

/// Stream logs for `query` into `sink` until the stream ends or `cancel`
/// resolves.
///
/// With `--tail` and `--follow` together the backlog is read first as a
/// one-shot query, so the merged history is bounded to N lines as well;
/// following then starts from the instant the backlog read finished.
///
/// # Errors
///
/// Returns an error if the service is unknown or the orchestrator cannot
/// be spawned.
pub async fn tail(
    runner: &impl CommandRunner,
    project: &ComposeProject,
    registry: &ServiceRegistry,
    query: &LogQuery,
    policy: FollowPolicy,
    sink: &mut impl FnMut(&str),
    cancel: impl Future<Output = ()>,
) -> Result<TailSummary> {
    let names: Vec<String> = query.service.iter().cloned().collect();
    let selection = registry.resolve(&names, Operation::Logs, &[])?;
    let mut cancel = std::pin::pin!(cancel);

    let mut summary = TailSummary {
        emitted: 0,
        reconnects: 0,
        exit_code: 0,
        interrupted: false,
    };

    let mut current = query.clone();
    if !query.follow || query.tail.is_some() {
        let backlog = LogQuery {
            follow: false,
            ..query.clone()
        };
        let invocation = project.logs(&selection, &backlog);
        tracing::debug!(command = %invocation, "reading logs");
        read_backlog(runner, &invocation, &backlog, sink, cancel.as_mut(), &mut summary).await?;
        if !query.follow || summary.interrupted || summary.exit_code != 0 {
            return Ok(summary);
        }
        current.tail = None;
        current.since = Some(resume_point(chrono::Utc::now()));
    }

    loop {
        let invocation = project.logs(&selection, &current);
        tracing::debug!(command = %invocation, "following logs");
        let mut stream = runner.stream_lines(&invocation.program, &invocation.argv())?;
        loop {
            tokio::select! {
                biased;
                () = &mut cancel => {
                    summary.interrupted = true;
                    summary.exit_code = 0;
                    return Ok(summary);
                }
                line = stream.lines.recv() => match line {
                    Some(line) => {
                        if current.accepts(&line) {
                            sink(line.as_str());
                            summary.emitted += 1;
                        }
                    }
                    None => break,
                },
            }
        }
        let ended_at = chrono::Utc::now();
        summary.exit_code = exit_code(stream).await;
        if summary.exit_code != 0 || summary.reconnects >= policy.max_reconnects {
            return Ok(summary);
        }

        summary.reconnects += 1;
        tracing::warn!(
            attempt = summary.reconnects,
            max = policy.max_reconnects,
            "log stream ended, reconnecting"
        );
        tokio::select! {
            biased;
            () = &mut cancel => {
                summary.interrupted = true;
                return Ok(summary);
            }
            () = tokio::time::sleep(policy.reconnect_delay) => {}
        }
        current.tail = None;
        current.since = Some(resume_point(ended_at));
    }
}

/// Read a finite query whole, keep its last `tail` lines, then filter.
async fn read_backlog<F: Future<Output = ()>>(
    runner: &impl CommandRunner,
    invocation: &ComposeInvocation,
    query: &LogQuery,
    sink: &mut impl FnMut(&str),
    mut cancel: Pin<&mut F>,
    summary: &mut TailSummary,
) -> Result<()> {
    let mut stream = runner.stream_lines(&invocation.program, &invocation.argv())?;
    let mut buf = TailBuffer::new(query.tail);
    loop {
        tokio::select! {
            biased;
            () = &mut cancel => {
                summary.interrupted = true;
                return Ok(());
            }
            line = stream.lines.recv() => match line {
                Some(line) => buf.push(line),
                None => break,
            },
        }
    }
    summary.exit_code = exit_code(stream).await;
    for line in buf.into_lines().iter().filter(|l| query.accepts(l)) {
        sink(line.as_str());
        summary.emitted += 1;
    }
    Ok(())
}

/// `--since` value for resuming at `at`. Nanosecond precision keeps lines
/// from the same second from being replayed.
#[must_use]
pub fn resume_point(at: chrono::DateTime<chrono::Utc>) -> Since {
    Since::Absolute(at.to_rfc3339_opts(chrono::SecondsFormat::Nanos, true))
}
