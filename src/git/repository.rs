// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! One working tree under management.
//!
//! ```text
//! RepositoryCandidate (path, relative_path, is_submodule)
//!        |  branch lookups
//!        v
//! RepositoryTarget::resolved(current, default)   error = None
//! RepositoryTarget::failed(message)              branches = None
//!        |
//!        v  owned by exactly one task
//! results: BTreeMap<OperationKind, ExecResult>
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use super::branch::{CommitPosition, GitBranch};
use crate::core::result::{ExecResult, TypedResult};

/// The git operations whose results a repository keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperationKind {
    Status,
    FullStatus,
    Fetch,
    Pull,
    Checkout,
    Clean,
    Reset,
    SetHead,
    CommitPosition,
    Branches,
    CurrentBranch,
    DefaultBranch,
}

impl OperationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::FullStatus => "full-status",
            Self::Fetch => "fetch",
            Self::Pull => "pull",
            Self::Checkout => "checkout",
            Self::Clean => "clean",
            Self::Reset => "reset",
            Self::SetHead => "set-head",
            Self::CommitPosition => "commit-position",
            Self::Branches => "branches",
            Self::CurrentBranch => "current-branch",
            Self::DefaultBranch => "default-branch",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directory that looks like a repository but has not been inspected yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryCandidate {
    pub path: PathBuf,
    pub relative_path: String,
    pub is_submodule: bool,
}

impl RepositoryCandidate {
    /// Builds a candidate, deriving the relative path from `base`.
    ///
    /// The base itself is shown as `"."`.
    #[must_use]
    pub fn new(base: &Path, path: PathBuf, is_submodule: bool) -> Self {
        let relative_path = match path.strip_prefix(base) {
            Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
            Ok(rel) => rel.to_string_lossy().replace('\\', "/"),
            Err(_) => path.display().to_string(),
        };
        Self {
            path,
            relative_path,
            is_submodule,
        }
    }
}

/// One git working tree (main checkout or submodule).
#[derive(Debug, Clone)]
pub struct RepositoryTarget {
    path: PathBuf,
    relative_path: String,
    current_branch: Option<String>,
    default_branch: Option<String>,
    is_submodule: bool,
    error_message: Option<String>,
    pub(crate) screen_row: u16,
    pub(crate) screen_column: u16,
    results: BTreeMap<OperationKind, ExecResult>,
    commit_position: Option<TypedResult<CommitPosition>>,
    branches: Option<TypedResult<Vec<GitBranch>>>,
}

impl RepositoryTarget {
    fn from_candidate(candidate: RepositoryCandidate) -> Self {
        Self {
            path: candidate.path,
            relative_path: candidate.relative_path,
            current_branch: None,
            default_branch: None,
            is_submodule: candidate.is_submodule,
            error_message: None,
            screen_row: 0,
            screen_column: 0,
            results: BTreeMap::new(),
            commit_position: None,
            branches: None,
        }
    }

    /// A repository whose branch lookups both succeeded.
    #[must_use]
    pub fn resolved(
        candidate: RepositoryCandidate,
        current_branch: impl Into<String>,
        default_branch: impl Into<String>,
    ) -> Self {
        Self {
            current_branch: Some(current_branch.into()),
            default_branch: Some(default_branch.into()),
            ..Self::from_candidate(candidate)
        }
    }

    /// A repository that failed discovery; it carries no branch information.
    #[must_use]
    pub fn failed(candidate: RepositoryCandidate, message: impl Into<String>) -> Self {
        Self {
            error_message: Some(message.into()),
            ..Self::from_candidate(candidate)
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    #[must_use]
    pub fn current_branch(&self) -> Option<&str> {
        self.current_branch.as_deref()
    }

    #[must_use]
    pub fn default_branch(&self) -> Option<&str> {
        self.default_branch.as_deref()
    }

    #[must_use]
    pub const fn is_submodule(&self) -> bool {
        self.is_submodule
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Whether discovery succeeded and work may be scheduled.
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        self.error_message.is_none()
    }

    /// Whether the checked-out branch is the remote's default branch.
    #[must_use]
    pub fn on_default_branch(&self) -> bool {
        self.current_branch.is_some() && self.current_branch == self.default_branch
    }

    #[must_use]
    pub const fn screen_row(&self) -> u16 {
        self.screen_row
    }

    #[must_use]
    pub const fn screen_column(&self) -> u16 {
        self.screen_column
    }

    /// Records the result of an operation, replacing any earlier one.
    pub fn record(&mut self, kind: OperationKind, result: ExecResult) {
        self.results.insert(kind, result);
    }

    #[must_use]
    pub fn result(&self, kind: OperationKind) -> Option<&ExecResult> {
        self.results.get(&kind)
    }

    /// All recorded results, ordered by operation kind.
    #[must_use]
    pub const fn results(&self) -> &BTreeMap<OperationKind, ExecResult> {
        &self.results
    }

    /// Records a commit position; the untyped status is kept in the map too.
    pub fn record_commit_position(&mut self, position: TypedResult<CommitPosition>) {
        self.results
            .insert(OperationKind::CommitPosition, position.status().clone());
        self.commit_position = Some(position);
    }

    #[must_use]
    pub const fn commit_position(&self) -> Option<&TypedResult<CommitPosition>> {
        self.commit_position.as_ref()
    }

    /// Records a branch listing; the untyped status is kept in the map too.
    pub fn record_branches(&mut self, branches: TypedResult<Vec<GitBranch>>) {
        self.results
            .insert(OperationKind::Branches, branches.status().clone());
        self.branches = Some(branches);
    }

    #[must_use]
    pub const fn branches(&self) -> Option<&TypedResult<Vec<GitBranch>>> {
        self.branches.as_ref()
    }
}
