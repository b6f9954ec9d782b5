// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository command handlers.
//!
//! ```text
//! args --> job (invalid combinations fail here, before discovery)
//!      --> discover(PATH) --> none found? print, exit 1
//!      --> renderer (live unless -s, -n or no tty)
//!      --> Orchestrator::run
//! ```

use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::cli::repo::{CheckoutArgs, MainArgs, RepoArgs, StatusArgs};
use crate::cli::worktree::{CleanArgs, ResetArgs};
use crate::config::Config;
use crate::core::process::ProcessGateway;
use crate::error::Result;
use crate::git::{CleanFlags, Git, discover};
use crate::render::TerminalRenderer;
use crate::task::jobs::{
    CheckoutJob, CleanJob, MainJob, PullJob, ResetJob, SetHeadJob, StatusDetail, StatusJob,
};
use crate::task::{Orchestrator, RepoJob, RunSummary};

/// How a repository command ended.
#[derive(Debug)]
pub enum RepoRun {
    Completed(RunSummary),
    /// Nothing to work on below the path; already reported.
    NoRepositories,
}

/// Discovers repositories below `args.path` and runs `job` on them.
///
/// # Errors
///
/// Returns an error if the path does not exist or an exclude glob is bad.
pub async fn run_job(
    args: &RepoArgs,
    verbose: bool,
    job: Arc<dyn RepoJob>,
    config: &Config,
) -> Result<RepoRun> {
    let token = CancellationToken::new();
    let git = Git::new(ProcessGateway::shared(), token)
        .with_program(config.git.program.as_str())
        .with_remote(config.git.remote.as_str());

    let repos = discover(&git, &args.path, &config.discovery.options()).await?;
    if repos.is_empty() {
        println!("No git repositories found: {}", display_path(&args.path));
        return Ok(RepoRun::NoRepositories);
    }
    info!(job = %job.name(), count = repos.len(), "Repositories discovered");

    let renderer = Arc::new(TerminalRenderer::stdout(verbose || args.show_output));
    let summary = Orchestrator::new(git, renderer)
        .with_max_concurrency(config.orchestrator.max_concurrency)
        .run(job, repos)
        .await;
    Ok(RepoRun::Completed(summary))
}

fn display_path(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

/// # Errors
///
/// See [`run_job`].
pub async fn run_status_command(args: &StatusArgs, config: &Config) -> Result<RepoRun> {
    let detail = if args.repo.show_output {
        StatusDetail::Full
    } else if args.pending {
        StatusDetail::Porcelain
    } else {
        StatusDetail::None
    };
    let job = StatusJob::new(args.fetch, detail);
    run_job(&args.repo, args.pending, Arc::new(job), config).await
}

/// # Errors
///
/// See [`run_job`].
pub async fn run_pull_command(args: &RepoArgs, config: &Config) -> Result<RepoRun> {
    run_job(args, false, Arc::new(PullJob), config).await
}

/// # Errors
///
/// Returns `InvalidArguments` for an empty target, otherwise see [`run_job`].
pub async fn run_checkout_command(args: &CheckoutArgs, config: &Config) -> Result<RepoRun> {
    let job = CheckoutJob::new(args.target.as_str(), args.create)?;
    run_job(&args.repo, false, Arc::new(job), config).await
}

/// # Errors
///
/// See [`run_job`].
pub async fn run_main_command(args: &MainArgs, config: &Config) -> Result<RepoRun> {
    run_job(&args.repo, false, Arc::new(MainJob::new(args.pull)), config).await
}

/// # Errors
///
/// Returns `InvalidArguments` for `-x` with `-X`, otherwise see [`run_job`].
pub async fn run_clean_command(args: &CleanArgs, config: &Config) -> Result<RepoRun> {
    let job = CleanJob::new(args.flags())?;
    let dry_run = job.flags().contains(CleanFlags::DRY_RUN);
    run_job(&args.repo, dry_run, Arc::new(job), config).await
}

/// # Errors
///
/// See [`run_job`].
pub async fn run_reset_command(args: &ResetArgs, config: &Config) -> Result<RepoRun> {
    let job = ResetJob::builder()
        .with_commit(args.commit.as_str())
        .with_mode(args.mode)
        .with_back(args.back)
        .with_clean(args.clean)
        .build();
    run_job(&args.repo, false, Arc::new(job), config).await
}

/// # Errors
///
/// See [`run_job`].
pub async fn run_fix_ref_command(args: &RepoArgs, config: &Config) -> Result<RepoRun> {
    run_job(args, false, Arc::new(SetHeadJob), config).await
}
