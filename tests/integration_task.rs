// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for whole runs.
//!
//! Real repositories, real git processes, verbose rendering into a buffer.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};

use git_tasks::cli::repo::RepoArgs;
use git_tasks::cli::worktree::CleanArgs;
use git_tasks::cmd::repos::{RepoRun, run_clean_command, run_pull_command};
use git_tasks::config::Config;
use git_tasks::core::process::ProcessGateway;
use git_tasks::git::{DiscoveryOptions, Git, OperationKind, ResetMode, discover};
use git_tasks::render::{RenderMode, TerminalRenderer};
use git_tasks::task::jobs::{PullJob, ResetJob, StatusDetail, StatusJob};
use git_tasks::task::{Orchestrator, RepoJob, RunSummary};
use regex::Regex;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn run_git(args: &[&str], cwd: &Path) -> bool {
    Command::new("git")
        .args(args)
        .current_dir(cwd)
        .env("GIT_AUTHOR_NAME", "Test")
        .env("GIT_AUTHOR_EMAIL", "test@test.com")
        .env("GIT_COMMITTER_NAME", "Test")
        .env("GIT_COMMITTER_EMAIL", "test@test.com")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn commit_file(repo: &Path, name: &str, content: &str) {
    fs::write(repo.join(name), content).unwrap();
    assert!(run_git(&["add", name], repo));
    assert!(run_git(&["commit", "-q", "-m", &format!("Add {name}")], repo));
}

/// Bare origin with one commit on `main`, plus the seed clone that pushed it.
fn init_origin(base: &Path) -> (PathBuf, PathBuf) {
    let origin = base.join("origin.git");
    fs::create_dir(&origin).unwrap();
    assert!(run_git(&["init", "-q", "--bare", "-b", "main"], &origin));

    let seed = base.join("seed");
    assert!(run_git(&["clone", "-q", origin.to_str().unwrap(), "seed"], base));
    commit_file(&seed, "README.md", "# Test");
    assert!(run_git(&["push", "-q", "origin", "main"], &seed));
    (origin, seed)
}

/// Clone with a merge-based pull regardless of the user's git config.
fn clone_into(origin: &Path, parent: &Path, name: &str) -> PathBuf {
    assert!(run_git(&["clone", "-q", origin.to_str().unwrap(), name], parent));
    let repo = parent.join(name);
    assert!(run_git(&["config", "pull.rebase", "false"], &repo));
    repo
}

/// Cloneable sink collecting everything the renderer writes.
#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Capture {
    /// Captured text without color sequences.
    fn lines(&self) -> Vec<String> {
        let ansi = Regex::new(r"\x1b\[[0-9;]*m").unwrap();
        let raw = String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned();
        ansi.replace_all(&raw, "")
            .lines()
            .map(|line| line.trim_end().to_string())
            .collect()
    }
}

async fn run_verbose(root: &Path, job: Arc<dyn RepoJob>) -> (RunSummary, Capture) {
    let git = Git::new(ProcessGateway::shared(), CancellationToken::new());
    let repos = discover(&git, root, &DiscoveryOptions::default())
        .await
        .unwrap();
    let capture = Capture::default();
    let renderer = Arc::new(TerminalRenderer::verbose(Box::new(capture.clone())));
    let summary = Orchestrator::new(git, renderer)
        .with_interrupt_handler(false)
        .run(job, repos)
        .await;
    (summary, capture)
}

// =============================================================================
// Status
// =============================================================================

#[tokio::test]
async fn task_status_clean_changed_and_broken() {
    let temp = temp_dir();
    let (origin, _) = init_origin(temp.path());
    let root = temp.path().join("work");
    fs::create_dir(&root).unwrap();
    clone_into(&origin, &root, "alpha");
    let beta = clone_into(&origin, &root, "beta");
    fs::write(beta.join("README.md"), "# Edited").unwrap();
    let gamma = root.join("gamma");
    fs::create_dir(&gamma).unwrap();
    assert!(run_git(&["init", "-q", "-b", "main"], &gamma));
    commit_file(&gamma, "a.txt", "a");

    let job = Arc::new(StatusJob::new(false, StatusDetail::None));
    let (summary, capture) = run_verbose(&root, job).await;

    let lines = capture.lines();
    assert_eq!(lines[0], "alpha main clean");
    assert_eq!(lines[1], "beta main local changes");
    assert!(lines[2].starts_with("gamma discovery error ("), "{lines:?}");
    assert_eq!(lines.len(), 3);

    assert_eq!(summary.mode, RenderMode::Verbose);
    assert_eq!(summary.failed_discovery(), 1);
    assert!(!summary.cancelled);
}

// =============================================================================
// Pull
// =============================================================================

#[tokio::test]
async fn task_pull_fast_forwards_every_clone() {
    let temp = temp_dir();
    let (origin, seed) = init_origin(temp.path());
    let root = temp.path().join("work");
    fs::create_dir(&root).unwrap();
    let alpha = clone_into(&origin, &root, "alpha");
    clone_into(&origin, &root, "beta");

    commit_file(&seed, "NEWS.md", "news");
    assert!(run_git(&["push", "-q", "origin", "main"], &seed));

    let (summary, capture) = run_verbose(&root, Arc::new(PullJob)).await;

    let headers: Vec<String> = capture
        .lines()
        .into_iter()
        .filter(|line| line.starts_with("alpha") || line.starts_with("beta"))
        .collect();
    assert_eq!(headers, vec!["alpha main pulled", "beta main pulled"]);
    assert!(alpha.join("NEWS.md").exists());

    let position = summary.repositories[0]
        .commit_position()
        .and_then(|p| p.value().copied())
        .unwrap();
    assert_eq!((position.ahead, position.behind), (0, 0));
}

#[tokio::test]
async fn task_pull_already_up_to_date() {
    let temp = temp_dir();
    let (origin, _) = init_origin(temp.path());
    let repo = clone_into(&origin, temp.path(), "only");

    let (_, capture) = run_verbose(&repo, Arc::new(PullJob)).await;

    let lines = capture.lines();
    assert_eq!(lines[0], ". main up to date");
}

// =============================================================================
// Reset
// =============================================================================

#[tokio::test]
async fn task_reset_then_clean() {
    let temp = temp_dir();
    let (origin, _) = init_origin(temp.path());
    let repo = clone_into(&origin, temp.path(), "alpha");
    commit_file(&repo, "second.txt", "2");
    fs::write(repo.join("junk.txt"), "junk").unwrap();

    let job = ResetJob::builder()
        .with_mode(ResetMode::Hard)
        .with_back(1)
        .with_clean(true)
        .build();
    let (summary, capture) = run_verbose(&repo, Arc::new(job)).await;

    let lines = capture.lines();
    assert!(lines[0].starts_with(". main reset to "), "{lines:?}");
    assert!(lines[0].ends_with(" cleaned 1 file"), "{lines:?}");
    assert_eq!(lines[1], "RESET:");
    assert!(lines.contains(&"CLEAN:".to_string()));
    assert!(lines.contains(&"Removing junk.txt".to_string()));

    assert!(!repo.join("second.txt").exists());
    assert!(!repo.join("junk.txt").exists());
    assert!(summary.repositories[0].result(OperationKind::Clean).is_some());
}

// =============================================================================
// Command handlers
// =============================================================================

#[tokio::test]
async fn cmd_reports_no_repositories() {
    let temp = temp_dir();
    let args = RepoArgs {
        path: temp.path().to_path_buf(),
        show_output: true,
    };

    let run = run_pull_command(&args, &Config::default()).await.unwrap();
    assert!(matches!(run, RepoRun::NoRepositories));
}

#[tokio::test]
async fn cmd_rejects_conflicting_clean_flags_before_discovery() {
    let args = CleanArgs {
        repo: RepoArgs {
            path: PathBuf::from("/definitely/not/here"),
            show_output: false,
        },
        ignore_rules: true,
        only_ignored: true,
        ..CleanArgs::default()
    };

    let err = run_clean_command(&args, &Config::default()).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cannot use both 'only-ignored' and 'ignore-rules' switches together."
    );
}

#[tokio::test]
async fn cmd_missing_path_is_an_error() {
    let args = RepoArgs {
        path: PathBuf::from("/definitely/not/here"),
        show_output: true,
    };
    let err = run_pull_command(&args, &Config::default()).await.unwrap_err();
    assert!(err.to_string().contains("directory not found"), "{err}");
}
