// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-repository work and the orchestrator that runs it.
//!
//! # Architecture
//!
//! ```text
//! Orchestrator::run(job, repos)
//!      |
//!      +-- live:    rows --> headers --> JoinSet (one task per healthy repo)
//!      |                                  job.run(ctx, repo) --> renderer
//!      |            --> park cursor below the block
//!      |
//!      +-- verbose: for each repo in order
//!                     header --> job.run --> end line --> raw git output
//!
//! JobContext { git (gateway + token), renderer }
//! ```
//!
//! # Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Orchestrator`] | Schedules a job over every repository |
//! | [`RepoJob`] | One command's work on one repository |
//! | [`JobContext`] | Shared git handle and renderer |
//! | [`RunSummary`] | Repositories with their recorded results, in discovery order |

pub mod jobs;
pub mod orchestrator;

use std::sync::Arc;

use futures_util::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use crate::classify::{Category, ClassifiedOutcome, classify};
use crate::core::result::ExecResult;
use crate::git::{Git, OperationKind, RepositoryTarget};
use crate::render::{RenderMode, TerminalRenderer};

pub use orchestrator::{Orchestrator, RunSummary};

/// The work one command performs on a single repository.
///
/// Jobs record what they ran on the repository and render as they go. They
/// never fail: every problem ends up as a fragment on the repository's row.
pub trait RepoJob: Send + Sync {
    fn name(&self) -> &str;

    /// Results printed beneath the header in verbose mode, in order.
    fn verbose_outputs(&self) -> &[OperationKind] {
        &[]
    }

    fn run<'a>(
        &'a self,
        ctx: &'a JobContext,
        repo: &'a mut RepositoryTarget,
    ) -> BoxFuture<'a, ()>;
}

/// Context handed to every job.
#[derive(Debug, Clone)]
pub struct JobContext {
    git: Git,
    renderer: Arc<TerminalRenderer>,
}

impl JobContext {
    #[must_use]
    pub const fn new(git: Git, renderer: Arc<TerminalRenderer>) -> Self {
        Self { git, renderer }
    }

    #[must_use]
    pub const fn git(&self) -> &Git {
        &self.git
    }

    #[must_use]
    pub fn renderer(&self) -> &TerminalRenderer {
        &self.renderer
    }

    #[must_use]
    pub const fn cancel_token(&self) -> &CancellationToken {
        self.git.token()
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.git.token().is_cancelled()
    }

    #[must_use]
    pub fn mode(&self) -> RenderMode {
        self.renderer.mode()
    }

    /// Classifies `result`, records it and writes the outcome.
    pub fn report(
        &self,
        repo: &mut RepositoryTarget,
        kind: OperationKind,
        result: ExecResult,
    ) -> ClassifiedOutcome {
        let outcome = classify(kind, &result);
        tracing::debug!(
            repo = %repo.relative_path(),
            operation = %kind,
            category = %outcome.category,
            "classified"
        );
        self.renderer.write_outcome(repo, &outcome);
        repo.record(kind, result);
        outcome
    }
}

/// Whether a job should stop after `outcome`.
#[must_use]
pub fn was_killed(outcome: &ClassifiedOutcome) -> bool {
    outcome.category == Category::Killed
}
