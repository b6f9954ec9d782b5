// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use futures_util::future::BoxFuture;

use super::report_step;
use crate::git::{OperationKind, RepositoryTarget};
use crate::task::{JobContext, RepoJob};

/// Repairs `refs/remotes/<remote>/HEAD`.
///
/// The remote is taken from the first remote-tracking branch, falling back
/// to the configured one.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetHeadJob;

impl SetHeadJob {
    async fn execute(ctx: &JobContext, repo: &mut RepositoryTarget) {
        let branches = ctx.git().branches(repo.path()).await;
        if branches.status().was_killed() {
            report_step(ctx, repo, OperationKind::Branches, branches.without_value());
            return;
        }

        let remote = branches
            .value()
            .and_then(|list| list.iter().find_map(|b| b.remote.clone()))
            .unwrap_or_else(|| ctx.git().remote().to_string());
        repo.record_branches(branches);

        let result = ctx.git().set_head(repo.path(), &remote).await;
        report_step(ctx, repo, OperationKind::SetHead, result);
    }
}

impl RepoJob for SetHeadJob {
    fn name(&self) -> &'static str {
        "fix-ref"
    }

    fn verbose_outputs(&self) -> &[OperationKind] {
        &[OperationKind::SetHead]
    }

    fn run<'a>(
        &'a self,
        ctx: &'a JobContext,
        repo: &'a mut RepositoryTarget,
    ) -> BoxFuture<'a, ()> {
        Box::pin(Self::execute(ctx, repo))
    }
}
