// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! I/O streaming and output capture for processes.
//!
//! ```text
//! stdout reader ──┐
//!                 ├──> one flume channel (arrival order)
//! stderr reader ──┘
//!
//! wait (or cancel --> kill) --> collect_output() --> trim_end
//! ```
//!
//! Async readers are tokio tasks; blocking readers are plain threads. Both
//! feed the same kind of channel so the collected text is identical.

use std::io::BufRead;
use std::process::ExitStatus;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Child;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

use super::builder::{ProcessBuilder, StreamFlags};
use crate::core::result::{ExecResult, NOT_RUN};
use crate::error::ProcessError;

/// How long readers may keep draining after a kill.
///
/// Grandchildren (e.g. `git-remote-https`) can hold the pipes open past the
/// death of the process itself.
const DRAIN_AFTER_KILL: Duration = Duration::from_millis(200);

/// Poll interval for the blocking wait loop.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

fn wants_lines(flags: StreamFlags) -> bool {
    flags.intersects(StreamFlags::FORWARD_TO_LOG | StreamFlags::KEEP_IN_STRING)
}

fn forward_line(flags: StreamFlags, process: &str, stream: &str, line: &str) {
    if flags.contains(StreamFlags::FORWARD_TO_LOG) {
        trace!(process = %process, stream = %stream, line = %line, "output");
    }
}

/// Joins collected lines; trailing whitespace is dropped.
fn collect_output(rx: &flume::Receiver<String>, flags: StreamFlags) -> String {
    if !flags.contains(StreamFlags::KEEP_IN_STRING) {
        return String::new();
    }
    let lines: Vec<String> = rx.drain().collect();
    lines.join("\n").trim_end().to_string()
}

fn finish(
    builder: &ProcessBuilder,
    status: std::io::Result<ExitStatus>,
    killed: bool,
    output: String,
) -> ExecResult {
    match status {
        _ if killed => ExecResult::killed(Some(output)),
        Ok(status) => ExecResult::completed(status.code().unwrap_or(NOT_RUN), output),
        Err(e) => ExecResult::failed(
            ProcessError::Io {
                command: builder.command_line(),
                message: e.to_string(),
            },
            Some(output),
        ),
    }
}

/// Reads one async stream line by line into the shared channel.
fn spawn_async_reader<R>(
    reader: Option<R>,
    flags: StreamFlags,
    process: &str,
    stream: &'static str,
    tx: flume::Sender<String>,
) -> Option<JoinHandle<()>>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    if !wants_lines(flags) {
        return None;
    }
    let process = process.to_string();
    reader.map(|reader| {
        tokio::spawn(async move {
            let mut lines = BufReader::new(reader).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        forward_line(flags, &process, stream, &line);
                        if flags.contains(StreamFlags::KEEP_IN_STRING) {
                            let _ = tx.send(line);
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        warn!(process = %process, stream = %stream, error = %e, "error reading stream");
                        break;
                    }
                }
            }
        })
    })
}

/// Blocking counterpart of [`spawn_async_reader`].
fn spawn_thread_reader<R>(
    reader: Option<R>,
    flags: StreamFlags,
    process: &str,
    stream: &'static str,
    tx: flume::Sender<String>,
) -> Option<std::thread::JoinHandle<()>>
where
    R: std::io::Read + Send + 'static,
{
    if !wants_lines(flags) {
        return None;
    }
    let process = process.to_string();
    reader.map(|reader| {
        std::thread::spawn(move || {
            for line in std::io::BufReader::new(reader).lines() {
                match line {
                    Ok(line) => {
                        forward_line(flags, &process, stream, &line);
                        if flags.contains(StreamFlags::KEEP_IN_STRING) {
                            let _ = tx.send(line);
                        }
                    }
                    Err(e) => {
                        warn!(process = %process, stream = %stream, error = %e, "error reading stream");
                        break;
                    }
                }
            }
        })
    })
}

async fn await_readers(handles: [Option<JoinHandle<()>>; 2], killed: bool) {
    for mut handle in handles.into_iter().flatten() {
        if killed {
            if tokio::time::timeout(DRAIN_AFTER_KILL, &mut handle).await.is_err() {
                handle.abort();
            }
        } else {
            let _ = handle.await;
        }
    }
}

impl ProcessBuilder {
    /// Streams output of a spawned child and waits for it, killing it when
    /// `token` fires.
    pub(super) async fn run_child(
        &self,
        name: &str,
        child: &mut Child,
        token: &CancellationToken,
    ) -> ExecResult {
        let flags = self.stream_flags();
        let (tx, rx) = flume::unbounded::<String>();

        let stdout = spawn_async_reader(child.stdout.take(), flags, name, "stdout", tx.clone());
        let stderr = spawn_async_reader(child.stderr.take(), flags, name, "stderr", tx);

        let (status, killed) = tokio::select! {
            status = child.wait() => (status, false),
            () = token.cancelled() => {
                warn!(process = %name, "cancellation requested, killing process");
                let _ = child.start_kill();
                (child.wait().await, true)
            }
        };

        await_readers([stdout, stderr], killed).await;
        finish(self, status, killed, collect_output(&rx, flags))
    }

    /// Blocking variant of [`run_child`](Self::run_child), polling the token
    /// between `try_wait` calls.
    pub(super) fn run_child_blocking(
        &self,
        name: &str,
        child: &mut std::process::Child,
        token: &CancellationToken,
    ) -> ExecResult {
        let flags = self.stream_flags();
        let (tx, rx) = flume::unbounded::<String>();

        let stdout = spawn_thread_reader(child.stdout.take(), flags, name, "stdout", tx.clone());
        let stderr = spawn_thread_reader(child.stderr.take(), flags, name, "stderr", tx);

        let (status, killed) = loop {
            match child.try_wait() {
                Ok(Some(status)) => break (Ok(status), false),
                Ok(None) if token.is_cancelled() => {
                    warn!(process = %name, "cancellation requested, killing process");
                    let _ = child.kill();
                    break (child.wait(), true);
                }
                Ok(None) => std::thread::sleep(POLL_INTERVAL),
                Err(e) => break (Err(e), false),
            }
        };

        // Killed readers may be pinned by a grandchild; leave them detached.
        if !killed {
            for handle in [stdout, stderr].into_iter().flatten() {
                let _ = handle.join();
            }
        }
        finish(self, status, killed, collect_output(&rx, flags))
    }
}
