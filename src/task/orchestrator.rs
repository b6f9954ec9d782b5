// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Runs one job over every repository.
//!
//! ```text
//! Orchestrator::new(git, renderer)
//!   .with_max_concurrency(n)        0 = unbounded
//!   .run(job, repos).await
//!       live:    tasks finish in any order, results re-sorted
//!       verbose: strictly in discovery order
//!   Ctrl+C --> cancel token --> running git processes are killed
//! ```

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::{JobContext, RepoJob};
use crate::error::TaskError;
use crate::git::{Git, OperationKind, RepositoryTarget};
use crate::render::{Fragment, RenderMode, Style, TerminalRenderer, allocate_rows};

/// Repositories after a run, in discovery order.
#[derive(Debug)]
pub struct RunSummary {
    pub repositories: Vec<RepositoryTarget>,
    pub mode: RenderMode,
    pub cancelled: bool,
}

impl RunSummary {
    /// Repositories whose discovery failed.
    #[must_use]
    pub fn failed_discovery(&self) -> usize {
        self.repositories.iter().filter(|r| !r.is_healthy()).count()
    }
}

/// Schedules a [`RepoJob`] across repositories.
pub struct Orchestrator {
    ctx: JobContext,
    max_concurrency: usize,
    handle_interrupt: bool,
}

impl Orchestrator {
    #[must_use]
    pub fn new(git: Git, renderer: Arc<TerminalRenderer>) -> Self {
        Self {
            ctx: JobContext::new(git, renderer),
            max_concurrency: 0,
            handle_interrupt: true,
        }
    }

    /// Caps the number of repositories worked on at once; `0` means no cap.
    #[must_use]
    pub const fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Whether Ctrl+C cancels the run.
    #[must_use]
    pub const fn with_interrupt_handler(mut self, enable: bool) -> Self {
        self.handle_interrupt = enable;
        self
    }

    #[must_use]
    pub const fn context(&self) -> &JobContext {
        &self.ctx
    }

    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.ctx.cancel_token().clone()
    }

    /// Runs `job` on every healthy repository.
    ///
    /// Never fails: per-repository problems are rendered on their rows.
    pub async fn run(&self, job: Arc<dyn RepoJob>, repos: Vec<RepositoryTarget>) -> RunSummary {
        let mode = self.ctx.mode();
        info!(
            job = %job.name(),
            repositories = repos.len(),
            mode = ?mode,
            "Starting run"
        );

        let watcher = self.handle_interrupt.then(|| self.spawn_interrupt_watcher());

        let repositories = match mode {
            RenderMode::Live => self.run_live(&job, repos).await,
            RenderMode::Verbose => self.run_verbose(&job, repos).await,
        };

        if let Some(watcher) = watcher {
            watcher.abort();
        }

        let cancelled = self.ctx.is_cancelled();
        if cancelled {
            warn!(job = %job.name(), "Run was cancelled");
        }
        info!(job = %job.name(), repositories = repositories.len(), "Run finished");

        RunSummary {
            repositories,
            mode,
            cancelled,
        }
    }

    fn spawn_interrupt_watcher(&self) -> tokio::task::JoinHandle<()> {
        let token = self.cancel_token();
        tokio::spawn(async move {
            tokio::select! {
                result = tokio::signal::ctrl_c() => {
                    if result.is_ok() {
                        warn!("Interrupt received, killing running git processes");
                        token.cancel();
                    }
                }
                () = token.cancelled() => {}
            }
        })
    }

    async fn run_live(
        &self,
        job: &Arc<dyn RepoJob>,
        mut repos: Vec<RepositoryTarget>,
    ) -> Vec<RepositoryTarget> {
        let renderer = self.ctx.renderer();
        let viewport = renderer.viewport().unwrap_or(crate::render::Viewport {
            cursor_row: 0,
            height: u16::MAX,
        });
        let block = allocate_rows(repos.len(), viewport.cursor_row, viewport.height);
        debug!(first = block.first(), len = block.len(), "Rows allocated");

        for (repo, row) in repos.iter_mut().zip(block.rows()) {
            repo.screen_row = row;
            renderer.write_header(repo, true);
        }

        let semaphore =
            (self.max_concurrency > 0).then(|| Arc::new(Semaphore::new(self.max_concurrency)));
        let mut slots: Vec<Option<RepositoryTarget>> = Vec::with_capacity(repos.len());
        // task id -> (slot, snapshot for panic reporting)
        let mut spawned = HashMap::new();
        let mut set = JoinSet::new();

        for (index, repo) in repos.into_iter().enumerate() {
            if !repo.is_healthy() {
                slots.push(Some(repo));
                continue;
            }
            slots.push(None);
            let snapshot = repo.clone();
            let job = Arc::clone(job);
            let ctx = self.ctx.clone();
            let semaphore = semaphore.clone();
            let handle = set.spawn(async move {
                let _permit = match semaphore {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                let mut repo = repo;
                job.run(&ctx, &mut repo).await;
                repo
            });
            spawned.insert(handle.id(), (index, snapshot));
        }

        while let Some(joined) = set.join_next_with_id().await {
            match joined {
                Ok((id, repo)) => {
                    if let Some((index, _)) = spawned.remove(&id) {
                        debug!(repo = %repo.relative_path(), "Repository finished");
                        slots[index] = Some(repo);
                    }
                }
                Err(e) => {
                    if let Some((index, mut snapshot)) = spawned.remove(&e.id()) {
                        let err = TaskError::Panicked {
                            repository: snapshot.relative_path().to_string(),
                            message: e.to_string(),
                        };
                        error!(error = %err, "Repository task failed");
                        // the row may already hold fragments the task wrote
                        renderer.replace_tail(&mut snapshot, &Fragment::new("panicked", Style::Red));
                        slots[index] = Some(snapshot);
                    }
                }
            }
        }

        renderer.park_cursor(block.next_row());
        slots.into_iter().flatten().collect()
    }

    async fn run_verbose(
        &self,
        job: &Arc<dyn RepoJob>,
        mut repos: Vec<RepositoryTarget>,
    ) -> Vec<RepositoryTarget> {
        let renderer = self.ctx.renderer();
        for repo in &mut repos {
            renderer.write_header(repo, false);
            if repo.is_healthy() {
                job.run(&self.ctx, repo).await;
            }
            renderer.end_line();
            if repo.is_healthy() {
                renderer.write_raw_output(&verbose_text(repo, job.verbose_outputs()));
            }
        }
        repos
    }
}

fn section_label(kind: OperationKind) -> String {
    match kind {
        OperationKind::FullStatus => "STATUS".to_string(),
        other => other.as_str().to_uppercase(),
    }
}

/// Raw outputs of `kinds`; each is labeled when more than one has text.
fn verbose_text(repo: &RepositoryTarget, kinds: &[OperationKind]) -> String {
    let sections: Vec<(OperationKind, &str)> = kinds
        .iter()
        .filter_map(|kind| {
            let output = repo.result(*kind)?.output_or_empty();
            (!output.trim().is_empty()).then_some((*kind, output))
        })
        .collect();

    let labeled = sections.len() > 1;
    let mut text = String::new();
    for (kind, output) in sections {
        if labeled {
            let _ = writeln!(text, "{}:", section_label(kind));
        }
        let _ = writeln!(text, "{output}");
    }
    text
}
