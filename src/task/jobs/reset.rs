// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use bon::Builder;
use futures_util::future::BoxFuture;

use super::report_step;
use crate::core::result::ExecResult;
use crate::git::{CleanFlags, OperationKind, RepositoryTarget, ResetMode};
use crate::task::{JobContext, RepoJob};

/// `git reset`, optionally followed by `git clean -d -f`.
///
/// The clean only runs when the reset succeeded; both outcomes share the row.
#[derive(Debug, Clone, Builder)]
pub struct ResetJob {
    #[builder(setters(name = with_commit), default = "HEAD".to_string(), into)]
    commit: String,
    #[builder(setters(name = with_mode), default)]
    mode: ResetMode,
    /// Commits back from `commit` (`commit~back`)
    #[builder(setters(name = with_back), default)]
    back: u32,
    #[builder(setters(name = with_clean), default)]
    clean: bool,
}

impl ResetJob {
    async fn execute(&self, ctx: &JobContext, repo: &mut RepositoryTarget) {
        let result = ctx
            .git()
            .reset(repo.path(), &self.commit, self.mode, self.back)
            .await;
        if !report_step(ctx, repo, OperationKind::Reset, result) {
            return;
        }

        let reset_ok = repo.result(OperationKind::Reset).is_some_and(ExecResult::success);
        if !self.clean || !reset_ok {
            return;
        }

        ctx.renderer().write_activity(repo);
        let result = ctx
            .git()
            .clean(repo.path(), CleanFlags::DIRECTORIES | CleanFlags::FORCE)
            .await;
        report_step(ctx, repo, OperationKind::Clean, result);
    }
}

impl RepoJob for ResetJob {
    fn name(&self) -> &'static str {
        "reset"
    }

    fn verbose_outputs(&self) -> &[OperationKind] {
        &[OperationKind::Reset, OperationKind::Clean]
    }

    fn run<'a>(
        &'a self,
        ctx: &'a JobContext,
        repo: &'a mut RepositoryTarget,
    ) -> BoxFuture<'a, ()> {
        Box::pin(self.execute(ctx, repo))
    }
}
