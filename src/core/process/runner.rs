// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution and lifecycle management.
//!
//! ```text
//! run(token) / run_blocking(token)
//!              |
//!     token already cancelled? --> ExecResult::killed
//!              |
//!     build_command()  args, cwd, env, stdio
//!              |
//!          spawn()
//!         /       \
//!      Err         Ok
//!       |           |
//!  start_failed   run_child  --> ExecResult
//! ```
//!
//! Nothing here returns `Err`: every outcome, including a failed spawn, is
//! described by the returned [`ExecResult`].

use std::process::Stdio;

use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::builder::{ProcessBuilder, StreamFlags};
use crate::core::result::ExecResult;
use crate::error::ProcessStartFailure;

impl ProcessBuilder {
    fn log_exec(&self) {
        if let Some(cwd) = self.working_dir() {
            debug!(cwd = %cwd.display(), "cd");
        }
        debug!(cmd = %self.command_line(), "exec");
    }

    fn spawn_failed(&self, name: &str, error: &std::io::Error) -> ExecResult {
        let failure = ProcessStartFailure::from_io(
            &self.program().display().to_string(),
            self.working_dir(),
            error,
        );
        debug!(process = %name, error = %failure, "spawn failed");
        ExecResult::start_failed(failure)
    }

    /// Spawns the process and waits for it asynchronously.
    ///
    /// Cancelling `token` kills the process; the result then reports
    /// `was_killed` together with whatever output arrived before the kill.
    pub async fn run(self, token: CancellationToken) -> ExecResult {
        if token.is_cancelled() {
            return ExecResult::killed(None);
        }
        let name = self.display_name();
        self.log_exec();

        let mut child = match self.build_command().spawn() {
            Ok(child) => child,
            Err(e) => return self.spawn_failed(&name, &e),
        };
        trace!(process = %name, pid = ?child.id(), "spawned");

        let result = self.run_child(&name, &mut child, &token).await;
        trace!(
            process = %name,
            exit_code = result.exit_code(),
            killed = result.was_killed(),
            "completed"
        );
        result
    }

    /// Spawns the process and blocks the calling thread until it exits.
    pub fn run_blocking(&self, token: &CancellationToken) -> ExecResult {
        if token.is_cancelled() {
            return ExecResult::killed(None);
        }
        let name = self.display_name();
        self.log_exec();

        let mut child = match self.build_std_command().spawn() {
            Ok(child) => child,
            Err(e) => return self.spawn_failed(&name, &e),
        };
        trace!(process = %name, pid = child.id(), "spawned");

        let result = self.run_child_blocking(&name, &mut child, token);
        trace!(
            process = %name,
            exit_code = result.exit_code(),
            killed = result.was_killed(),
            "completed"
        );
        result
    }

    /// Builds the std Command from this builder's configuration.
    fn build_std_command(&self) -> std::process::Command {
        let mut command = std::process::Command::new(self.resolved_program());
        command.args(self.args_slice());
        if let Some(cwd) = self.working_dir() {
            command.current_dir(cwd);
        }
        for (key, value) in self.env_vars() {
            command.env(key, value);
        }
        command.stdin(Stdio::null());
        command.stdout(Self::stdio_from_flags(self.stream_flags()));
        command.stderr(Self::stdio_from_flags(self.stream_flags()));
        command
    }

    /// Builds the tokio Command from this builder's configuration.
    fn build_command(&self) -> Command {
        let mut command = Command::from(self.build_std_command());
        // Kill on drop so an aborted task never leaks its child
        command.kill_on_drop(true);
        command
    }

    /// Converts `StreamFlags` to Stdio configuration.
    fn stdio_from_flags(flags: StreamFlags) -> Stdio {
        if flags.contains(StreamFlags::BIT_BUCKET) {
            Stdio::null()
        } else {
            Stdio::piped()
        }
    }
}
