// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use futures_util::future::BoxFuture;

use super::report_step;
use crate::error::GitTasksResult;
use crate::git::{CleanFlags, OperationKind, RepositoryTarget};
use crate::task::{JobContext, RepoJob};

/// `git clean` with validated switches.
#[derive(Debug, Clone, Copy)]
pub struct CleanJob {
    flags: CleanFlags,
}

impl CleanJob {
    /// # Errors
    ///
    /// Returns `InvalidArguments` when `-x` and `-X` are combined.
    pub fn new(flags: CleanFlags) -> GitTasksResult<Self> {
        Ok(Self {
            flags: flags.validate()?,
        })
    }

    #[must_use]
    pub const fn flags(&self) -> CleanFlags {
        self.flags
    }

    async fn execute(&self, ctx: &JobContext, repo: &mut RepositoryTarget) {
        let result = ctx.git().clean(repo.path(), self.flags).await;
        report_step(ctx, repo, OperationKind::Clean, result);
    }
}

impl RepoJob for CleanJob {
    fn name(&self) -> &'static str {
        "clean"
    }

    fn verbose_outputs(&self) -> &[OperationKind] {
        &[OperationKind::Clean]
    }

    fn run<'a>(
        &'a self,
        ctx: &'a JobContext,
        repo: &'a mut RepositoryTarget,
    ) -> BoxFuture<'a, ()> {
        Box::pin(self.execute(ctx, repo))
    }
}
