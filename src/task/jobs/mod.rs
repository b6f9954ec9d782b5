// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! One job per command.
//!
//! ```text
//! status    [fetch] --> status --> position
//! pull      pull --> position
//! checkout  status --> [branch --all, wildcard match] --> checkout
//! main      status --> checkout <default> --> [pull] --> position
//! clean     clean
//! reset     reset --> [clean -d -f, only after a successful reset]
//! fix-ref   branch --all --> remote set-head <remote> --auto
//! ```
//!
//! A killed step ends the job; the row shows `killed`.

mod checkout;
mod clean;
mod main_branch;
mod pull;
mod reset;
mod set_head;
mod status;

pub use checkout::CheckoutJob;
pub use clean::CleanJob;
pub use main_branch::MainJob;
pub use pull::PullJob;
pub use reset::ResetJob;
pub use set_head::SetHeadJob;
pub use status::{StatusDetail, StatusJob};

use super::{JobContext, was_killed};
use crate::classify::classify;
use crate::git::{OperationKind, RepositoryTarget};

/// Porcelain status as `clean` / `local changes`. Returns `false` when killed.
async fn report_status(ctx: &JobContext, repo: &mut RepositoryTarget) -> bool {
    let status = ctx.git().status(repo.path(), true).await;
    let renderer = ctx.renderer();
    renderer.clear_activity(repo, true);
    if status.was_killed() {
        ctx.report(repo, OperationKind::Status, status);
        return false;
    }
    renderer.write_status(repo, &status);
    repo.record(OperationKind::Status, status);
    true
}

/// Ahead/behind counts against the remote branch of the same name.
async fn report_position(ctx: &JobContext, repo: &mut RepositoryTarget, branch: &str) {
    let position = ctx.git().commit_position(repo.path(), branch).await;
    if position.status().was_killed() {
        let outcome = classify(OperationKind::CommitPosition, position.status());
        ctx.renderer().write_outcome(repo, &outcome);
    } else {
        ctx.renderer().write_commit_position(repo, &position);
    }
    repo.record_commit_position(position);
}

/// Clears the activity placeholder, then reports like [`JobContext::report`].
/// Returns `false` when the step was killed.
fn report_step(
    ctx: &JobContext,
    repo: &mut RepositoryTarget,
    kind: OperationKind,
    result: crate::core::result::ExecResult,
) -> bool {
    ctx.renderer().clear_activity(repo, true);
    !was_killed(&ctx.report(repo, kind, result))
}
