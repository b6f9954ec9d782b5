// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Checkout of a branch, commit or wildcard pattern.
//!
//! A pattern containing `*` is matched case-insensitively against local and
//! remote branch names (remote prefix dropped); `*` spans any characters,
//! `/` included. Exactly one distinct name must match.

use std::collections::BTreeSet;

use futures_util::future::BoxFuture;
use regex::Regex;

use super::{report_status, report_step};
use crate::error::{GitTasksResult, invalid_arguments};
use crate::git::{GitBranch, OperationKind, RepositoryTarget};
use crate::render::{Fragment, Style};
use crate::task::{JobContext, RepoJob};

#[derive(Debug, Clone)]
pub struct CheckoutJob {
    target: String,
    create: bool,
    pattern: Option<Regex>,
}

impl CheckoutJob {
    /// # Errors
    ///
    /// Returns `InvalidArguments` for an empty target.
    pub fn new(target: impl Into<String>, create: bool) -> GitTasksResult<Self> {
        let target = target.into();
        if target.trim().is_empty() {
            return Err(invalid_arguments("Branch or commit must not be empty."));
        }
        let pattern = if target.contains('*') {
            let source = format!(
                "^{}$",
                regex::escape(&target.to_lowercase()).replace(r"\*", ".*")
            );
            Some(Regex::new(&source).map_err(|e| {
                invalid_arguments(format!("Invalid branch pattern '{target}': {e}"))
            })?)
        } else {
            None
        };
        Ok(Self {
            target,
            create,
            pattern,
        })
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Distinct branch names matching the pattern, sorted.
    fn matching<'b>(pattern: &Regex, branches: &'b [GitBranch]) -> Vec<&'b str> {
        branches
            .iter()
            .map(|b| b.name.as_str())
            .filter(|name| *name != "HEAD" && pattern.is_match(&name.to_lowercase()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Resolves the wildcard; `None` after rendering why nothing will be checked out.
    async fn resolve(
        pattern: &Regex,
        ctx: &JobContext,
        repo: &mut RepositoryTarget,
    ) -> Option<String> {
        let branches = ctx.git().branches(repo.path()).await;
        if branches.status().was_killed() {
            report_step(ctx, repo, OperationKind::Branches, branches.without_value());
            return None;
        }
        if !branches.success() {
            ctx.renderer()
                .write_fragment(repo, &Fragment::new("branch list error", Style::Red));
            repo.record_branches(branches);
            return None;
        }

        let found: Vec<String> = branches
            .value()
            .map(|list| Self::matching(pattern, list))
            .unwrap_or_default()
            .into_iter()
            .map(str::to_string)
            .collect();
        repo.record_branches(branches);

        match found.as_slice() {
            [single] => Some(single.clone()),
            [] => {
                ctx.renderer()
                    .write_fragment(repo, &Fragment::new("no matching branch", Style::Yellow));
                None
            }
            many => {
                ctx.renderer().write_fragment(
                    repo,
                    &Fragment::new(format!("{} matching branches", many.len()), Style::Yellow),
                );
                None
            }
        }
    }

    async fn execute(&self, ctx: &JobContext, repo: &mut RepositoryTarget) {
        if !report_status(ctx, repo).await {
            return;
        }

        let branch = match &self.pattern {
            Some(pattern) => match Self::resolve(pattern, ctx, repo).await {
                Some(branch) => branch,
                None => return,
            },
            None => self.target.clone(),
        };

        let result = ctx.git().checkout(repo.path(), &branch, self.create).await;
        report_step(ctx, repo, OperationKind::Checkout, result);
    }
}

impl RepoJob for CheckoutJob {
    fn name(&self) -> &'static str {
        "checkout"
    }

    fn verbose_outputs(&self) -> &[OperationKind] {
        &[OperationKind::Checkout]
    }

    fn run<'a>(
        &'a self,
        ctx: &'a JobContext,
        repo: &'a mut RepositoryTarget,
    ) -> BoxFuture<'a, ()> {
        Box::pin(self.execute(ctx, repo))
    }
}
