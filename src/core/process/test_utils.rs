// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Scripted command gateway for tests.
//!
//! Replies are keyed by the command's argument prefix and, optionally, the
//! working directory's final component. Repository-specific replies win over
//! generic ones; unmatched commands succeed with empty output.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures_util::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use super::builder::ProcessBuilder;
use super::gateway::{CommandGateway, SharedGateway};
use crate::core::result::ExecResult;

#[derive(Debug, Clone)]
enum Reply {
    Result(ExecResult),
    /// Runs until cancelled, then reports a kill.
    Hang,
}

#[derive(Debug, Clone)]
struct Rule {
    repo: Option<String>,
    args: String,
    delay: Duration,
    reply: Reply,
}

/// Gateway answering from a script instead of spawning processes.
#[derive(Debug, Default)]
pub(crate) struct ScriptedGateway {
    rules: Vec<Rule>,
    calls: Mutex<Vec<String>>,
}

fn repo_name(cwd: Option<&Path>) -> String {
    cwd.and_then(Path::file_name)
        .map_or_else(String::new, |n| n.to_string_lossy().into_owned())
}

impl ScriptedGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Any repository: commands starting with `args` return `result`.
    pub(crate) fn on(self, args: &str, result: ExecResult) -> Self {
        self.push(None, args, Duration::ZERO, Reply::Result(result))
    }

    /// One repository (matched by directory name).
    pub(crate) fn on_in(self, repo: &str, args: &str, result: ExecResult) -> Self {
        self.push(Some(repo), args, Duration::ZERO, Reply::Result(result))
    }

    /// One repository, answering after `delay`.
    pub(crate) fn delayed_in(
        self,
        repo: &str,
        args: &str,
        delay: Duration,
        result: ExecResult,
    ) -> Self {
        self.push(Some(repo), args, delay, Reply::Result(result))
    }

    /// One repository: the command never finishes on its own.
    pub(crate) fn hang_in(self, repo: &str, args: &str) -> Self {
        self.push(Some(repo), args, Duration::ZERO, Reply::Hang)
    }

    fn push(mut self, repo: Option<&str>, args: &str, delay: Duration, reply: Reply) -> Self {
        self.rules.push(Rule {
            repo: repo.map(str::to_string),
            args: args.to_string(),
            delay,
            reply,
        });
        self
    }

    pub(crate) fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Every call so far as `"<repo>: <args>"`, in call order.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Calls made in one repository, arguments only.
    pub(crate) fn calls_in(&self, repo: &str) -> Vec<String> {
        let prefix = format!("{repo}: ");
        self.calls()
            .into_iter()
            .filter_map(|call| call.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }

    fn lookup(&self, request: &ProcessBuilder) -> (Duration, Reply) {
        let repo = repo_name(request.working_dir());
        let args = request.args_slice().join(" ");
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(format!("{repo}: {args}"));

        let specific = self
            .rules
            .iter()
            .find(|rule| rule.repo.as_deref() == Some(repo.as_str()) && args.starts_with(&rule.args));
        let generic = || {
            self.rules
                .iter()
                .find(|rule| rule.repo.is_none() && args.starts_with(&rule.args))
        };

        specific.or_else(generic).map_or_else(
            || (Duration::ZERO, Reply::Result(ExecResult::completed(0, ""))),
            |rule| (rule.delay, rule.reply.clone()),
        )
    }
}

impl CommandGateway for ScriptedGateway {
    fn execute(&self, request: &ProcessBuilder, token: &CancellationToken) -> ExecResult {
        if token.is_cancelled() {
            return ExecResult::killed(None);
        }
        let (delay, reply) = self.lookup(request);
        std::thread::sleep(delay);
        match reply {
            Reply::Result(result) => result,
            Reply::Hang => {
                while !token.is_cancelled() {
                    std::thread::sleep(Duration::from_millis(5));
                }
                ExecResult::killed(None)
            }
        }
    }

    fn execute_async(
        &self,
        request: ProcessBuilder,
        token: CancellationToken,
    ) -> BoxFuture<'_, ExecResult> {
        Box::pin(async move {
            if token.is_cancelled() {
                return ExecResult::killed(None);
            }
            let (delay, reply) = self.lookup(&request);
            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                () = token.cancelled() => return ExecResult::killed(None),
            }
            match reply {
                Reply::Result(result) => result,
                Reply::Hang => {
                    token.cancelled().await;
                    ExecResult::killed(None)
                }
            }
        })
    }
}

/// Converts a scripted gateway into the shared trait object.
pub(crate) fn shared(gateway: &Arc<ScriptedGateway>) -> SharedGateway {
    Arc::clone(gateway) as SharedGateway
}
