// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git operations over the command gateway.
//!
//! ```text
//! status(porcelain)       git status [--porcelain]
//! fetch(branch)           git fetch [<remote> <branch>]
//! pull                    git pull
//! checkout(b, create)     git checkout [-b] <b>
//! clean(flags)            git clean [-d] [-f] [-x] [-X] [-n]
//! reset(c, mode, back)    git reset --<mode> <c>[~back]
//! set_head                git remote set-head <remote> --auto
//! commit_position(b)      git rev-list --left-right --count <remote>/<b>...<b>
//! branches                git branch --all
//! current_branch          git rev-parse --abbrev-ref HEAD
//! default_branch          git symbolic-ref refs/remotes/<remote>/HEAD --short
//! submodule_paths         git config --file .gitmodules --get-regexp path  (blocking)
//! ```
//!
//! Every call returns a result referencing the repository path; none of them
//! fail with `Err`.

use std::fmt;
use std::path::{Path, PathBuf};

use bitflags::bitflags;
use tokio_util::sync::CancellationToken;

use super::branch::{CommitPosition, GitBranch};
use crate::core::process::{ProcessBuilder, SharedGateway};
use crate::core::result::{ExecResult, TypedResult};
use crate::error::{GitTasksResult, invalid_arguments};

pub const DEFAULT_PROGRAM: &str = "git";
pub const DEFAULT_REMOTE: &str = "origin";

bitflags! {
    /// Switches for `git clean`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CleanFlags: u8 {
        /// -d: recurse into untracked directories
        const DIRECTORIES = 0x01;
        /// -f: force
        const FORCE = 0x02;
        /// -x: ignore the ignore rules
        const IGNORE_RULES = 0x04;
        /// -X: remove only ignored files
        const ONLY_IGNORED = 0x08;
        /// -n: dry run
        const DRY_RUN = 0x10;
    }
}

impl CleanFlags {
    /// Rejects `-x` together with `-X`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArguments` for the conflicting pair.
    pub fn validate(self) -> GitTasksResult<Self> {
        if self.contains(Self::IGNORE_RULES | Self::ONLY_IGNORED) {
            return Err(invalid_arguments(
                "Cannot use both 'only-ignored' and 'ignore-rules' switches together.",
            ));
        }
        Ok(self)
    }

    fn args(self) -> impl Iterator<Item = &'static str> {
        [
            (Self::DIRECTORIES, "-d"),
            (Self::FORCE, "-f"),
            (Self::IGNORE_RULES, "-x"),
            (Self::ONLY_IGNORED, "-X"),
            (Self::DRY_RUN, "-n"),
        ]
        .into_iter()
        .filter(move |(flag, _)| self.contains(*flag))
        .map(|(_, arg)| arg)
    }
}

/// `git reset` mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ResetMode {
    #[default]
    Mixed,
    Soft,
    Hard,
}

impl ResetMode {
    const fn as_arg(self) -> &'static str {
        match self {
            Self::Mixed => "--mixed",
            Self::Soft => "--soft",
            Self::Hard => "--hard",
        }
    }
}

impl fmt::Display for ResetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_arg()[2..])
    }
}

/// Git command construction bound to one gateway, remote and cancellation token.
#[derive(Clone)]
pub struct Git {
    gateway: SharedGateway,
    program: String,
    remote: String,
    token: CancellationToken,
}

impl fmt::Debug for Git {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Git")
            .field("program", &self.program)
            .field("remote", &self.remote)
            .finish_non_exhaustive()
    }
}

impl Git {
    #[must_use]
    pub fn new(gateway: SharedGateway, token: CancellationToken) -> Self {
        Self {
            gateway,
            program: DEFAULT_PROGRAM.to_string(),
            remote: DEFAULT_REMOTE.to_string(),
            token,
        }
    }

    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    #[must_use]
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    #[must_use]
    pub fn remote(&self) -> &str {
        &self.remote
    }

    #[must_use]
    pub const fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Base request: never prompt for credentials.
    fn command<I, S>(&self, repo: &Path, args: I) -> ProcessBuilder
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        ProcessBuilder::new(&self.program)
            .args(args)
            .cwd(repo)
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GCM_INTERACTIVE", "never")
            .name("git")
    }

    async fn run<I, S>(&self, repo: &Path, args: I) -> ExecResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let request = self.command(repo, args);
        self.gateway
            .execute_async(request, self.token.clone())
            .await
            .with_reference(repo)
    }

    pub async fn status(&self, repo: &Path, porcelain: bool) -> ExecResult {
        if porcelain {
            self.run(repo, ["status", "--porcelain"]).await
        } else {
            self.run(repo, ["status"]).await
        }
    }

    /// Fetches `branch` from the configured remote, or everything when `None`.
    pub async fn fetch(&self, repo: &Path, branch: Option<&str>) -> ExecResult {
        match branch {
            Some(branch) => self.run(repo, ["fetch", self.remote.as_str(), branch]).await,
            None => self.run(repo, ["fetch"]).await,
        }
    }

    pub async fn pull(&self, repo: &Path) -> ExecResult {
        self.run(repo, ["pull"]).await
    }

    pub async fn checkout(&self, repo: &Path, branch: &str, create: bool) -> ExecResult {
        if create {
            self.run(repo, ["checkout", "-b", branch]).await
        } else {
            self.run(repo, ["checkout", branch]).await
        }
    }

    /// Runs `git clean`; callers validate `flags` first.
    pub async fn clean(&self, repo: &Path, flags: CleanFlags) -> ExecResult {
        let args: Vec<&str> = std::iter::once("clean").chain(flags.args()).collect();
        self.run(repo, args).await
    }

    /// Resets to `commit`, or `commit~back` when `back > 0`.
    pub async fn reset(&self, repo: &Path, commit: &str, mode: ResetMode, back: u32) -> ExecResult {
        let target = if back > 0 {
            format!("{commit}~{back}")
        } else {
            commit.to_string()
        };
        self.run(repo, ["reset", mode.as_arg(), target.as_str()]).await
    }

    /// Points `refs/remotes/<remote>/HEAD` at the remote's default branch.
    pub async fn set_head(&self, repo: &Path, remote: &str) -> ExecResult {
        self.run(repo, ["remote", "set-head", remote, "--auto"]).await
    }

    pub async fn commit_position(&self, repo: &Path, branch: &str) -> TypedResult<CommitPosition> {
        let range = format!("{}/{branch}...{branch}", self.remote);
        self.run(repo, ["rev-list", "--left-right", "--count", range.as_str()])
            .await
            .parse_value(CommitPosition::parse)
    }

    pub async fn branches(&self, repo: &Path) -> TypedResult<Vec<GitBranch>> {
        self.run(repo, ["branch", "--all"])
            .await
            .parse_value(|output| Some(GitBranch::parse_list(output)))
    }

    pub async fn current_branch(&self, repo: &Path) -> TypedResult<String> {
        self.run(repo, ["rev-parse", "--abbrev-ref", "HEAD"])
            .await
            .parse_value(|output| {
                let branch = output.trim();
                (!branch.is_empty()).then(|| branch.to_string())
            })
    }

    /// Default branch of the configured remote, without the remote prefix.
    pub async fn default_branch(&self, repo: &Path) -> TypedResult<String> {
        let head = format!("refs/remotes/{}/HEAD", self.remote);
        self.run(repo, ["symbolic-ref", head.as_str(), "--short"])
            .await
            .parse_value(strip_remote_prefix)
    }

    /// Absolute paths of the submodules declared in `repo/.gitmodules`.
    ///
    /// Blocking. A missing or empty `.gitmodules` yields no paths.
    #[must_use]
    pub fn submodule_paths(&self, repo: &Path) -> Vec<PathBuf> {
        let request = self.command(repo, ["config", "--file", ".gitmodules", "--get-regexp", "path"]);
        let result = self.gateway.execute(&request, &self.token);
        if !result.success() {
            return Vec::new();
        }
        parse_submodule_paths(repo, result.output_or_empty())
    }
}

/// `origin/main` → `main`; `origin/release/1.x` → `release/1.x`.
pub(super) fn strip_remote_prefix(output: &str) -> Option<String> {
    let (_, branch) = output.trim().split_once('/')?;
    (!branch.is_empty()).then(|| branch.to_string())
}

/// Parses `submodule.<name>.path <path>` lines.
pub(super) fn parse_submodule_paths(repo: &Path, output: &str) -> Vec<PathBuf> {
    output
        .lines()
        .filter_map(|line| line.trim().split_once(' '))
        .map(|(_, path)| repo.join(path.trim()))
        .collect()
}
