// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use futures_util::future::BoxFuture;

use super::{report_position, report_step};
use crate::git::{OperationKind, RepositoryTarget};
use crate::task::{JobContext, RepoJob};

/// `git pull`, then the commit position.
#[derive(Debug, Clone, Copy, Default)]
pub struct PullJob;

impl PullJob {
    async fn execute(ctx: &JobContext, repo: &mut RepositoryTarget) {
        let result = ctx.git().pull(repo.path()).await;
        if !report_step(ctx, repo, OperationKind::Pull, result) {
            return;
        }
        if let Some(branch) = repo.current_branch().map(str::to_string) {
            report_position(ctx, repo, &branch).await;
        }
    }
}

impl RepoJob for PullJob {
    fn name(&self) -> &'static str {
        "pull"
    }

    fn verbose_outputs(&self) -> &[OperationKind] {
        &[OperationKind::Pull]
    }

    fn run<'a>(
        &'a self,
        ctx: &'a JobContext,
        repo: &'a mut RepositoryTarget,
    ) -> BoxFuture<'a, ()> {
        Box::pin(Self::execute(ctx, repo))
    }
}
