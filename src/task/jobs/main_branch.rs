// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use futures_util::future::BoxFuture;

use super::{report_position, report_status, report_step};
use crate::git::{OperationKind, RepositoryTarget};
use crate::task::{JobContext, RepoJob};

/// Back to the remote's default branch, optionally pulling.
#[derive(Debug, Clone, Copy, Default)]
pub struct MainJob {
    pull: bool,
}

impl MainJob {
    #[must_use]
    pub const fn new(pull: bool) -> Self {
        Self { pull }
    }

    async fn execute(&self, ctx: &JobContext, repo: &mut RepositoryTarget) {
        if !report_status(ctx, repo).await {
            return;
        }

        let Some(branch) = repo.default_branch().map(str::to_string) else {
            return;
        };

        let result = ctx.git().checkout(repo.path(), &branch, false).await;
        if !report_step(ctx, repo, OperationKind::Checkout, result) {
            return;
        }

        if self.pull {
            ctx.renderer().write_activity(repo);
            let result = ctx.git().pull(repo.path()).await;
            if !report_step(ctx, repo, OperationKind::Pull, result) {
                return;
            }
        }

        report_position(ctx, repo, &branch).await;
    }
}

impl RepoJob for MainJob {
    fn name(&self) -> &'static str {
        "main"
    }

    fn verbose_outputs(&self) -> &[OperationKind] {
        &[OperationKind::Checkout, OperationKind::Pull]
    }

    fn run<'a>(
        &'a self,
        ctx: &'a JobContext,
        repo: &'a mut RepositoryTarget,
    ) -> BoxFuture<'a, ()> {
        Box::pin(self.execute(ctx, repo))
    }
}
