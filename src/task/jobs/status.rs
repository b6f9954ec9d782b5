// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use futures_util::future::BoxFuture;

use super::{report_position, report_status};
use crate::classify::classify;
use crate::git::{OperationKind, RepositoryTarget};
use crate::task::{JobContext, RepoJob, was_killed};

/// Which status text verbose mode prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusDetail {
    #[default]
    None,
    /// `git status --porcelain`
    Porcelain,
    /// `git status`
    Full,
}

/// Working tree state plus position relative to the remote.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusJob {
    fetch: bool,
    detail: StatusDetail,
}

impl StatusJob {
    #[must_use]
    pub const fn new(fetch: bool, detail: StatusDetail) -> Self {
        Self { fetch, detail }
    }

    async fn execute(&self, ctx: &JobContext, repo: &mut RepositoryTarget) {
        let branch = repo.current_branch().map(str::to_string);

        if self.fetch {
            let result = ctx.git().fetch(repo.path(), branch.as_deref()).await;
            let outcome = classify(OperationKind::Fetch, &result);
            repo.record(OperationKind::Fetch, result);
            // a successful fetch only shows through the position
            if outcome.is_error {
                ctx.renderer().clear_activity(repo, true);
                ctx.renderer().write_outcome(repo, &outcome);
                if was_killed(&outcome) {
                    return;
                }
            }
        }

        if !report_status(ctx, repo).await {
            return;
        }

        if self.detail == StatusDetail::Full {
            let full = ctx.git().status(repo.path(), false).await;
            repo.record(OperationKind::FullStatus, full);
        }

        if let Some(branch) = branch {
            report_position(ctx, repo, &branch).await;
        }
    }
}

impl RepoJob for StatusJob {
    fn name(&self) -> &'static str {
        "status"
    }

    fn verbose_outputs(&self) -> &[OperationKind] {
        match self.detail {
            StatusDetail::None => &[OperationKind::Fetch],
            StatusDetail::Porcelain => &[OperationKind::Fetch, OperationKind::Status],
            StatusDetail::Full => &[OperationKind::Fetch, OperationKind::FullStatus],
        }
    }

    fn run<'a>(
        &'a self,
        ctx: &'a JobContext,
        repo: &'a mut RepositoryTarget,
    ) -> BoxFuture<'a, ()> {
        Box::pin(self.execute(ctx, repo))
    }
}
