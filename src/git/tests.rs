// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::ops::{parse_submodule_paths, strip_remote_prefix};
use super::*;
use crate::core::process::test_utils::{ScriptedGateway, shared};
use crate::core::result::ExecResult;
use crate::error::{GitError, GitTasksError};

fn git_with(gateway: &Arc<ScriptedGateway>) -> Git {
    Git::new(shared(gateway), CancellationToken::new())
}

// =============================================================================
// Output parsing
// =============================================================================

#[test]
fn test_commit_position_parse() {
    assert_eq!(
        CommitPosition::parse("3\t5"),
        Some(CommitPosition { behind: 3, ahead: 5 })
    );
    assert_eq!(
        CommitPosition::parse("0 0\n"),
        Some(CommitPosition::default())
    );
    assert!(CommitPosition::parse("0\t0").is_some_and(|p| p.is_level()));
    assert_eq!(CommitPosition::parse(""), None);
    assert_eq!(CommitPosition::parse("3"), None);
    assert_eq!(CommitPosition::parse("a\tb"), None);
    assert_eq!(CommitPosition::parse("1\t2\t3"), None);
}

#[test]
fn test_branch_list_parse() {
    let output = "* main\n  feature/login\n  remotes/origin/HEAD -> origin/main\n  remotes/origin/main\n  remotes/upstream/release/1.x\n\n";
    let names: Vec<String> = GitBranch::parse_list(output)
        .iter()
        .map(|b| format!("{} current={} remote={}", b.full_name(), b.is_current, b.is_remote))
        .collect();

    insta::assert_debug_snapshot!(names, @r#"
    [
        "main current=true remote=false",
        "feature/login current=false remote=false",
        "origin/HEAD current=false remote=true",
        "origin/main current=false remote=true",
        "upstream/release/1.x current=false remote=true",
    ]
    "#);
}

#[test]
fn test_strip_remote_prefix() {
    assert_eq!(strip_remote_prefix("origin/main\n").as_deref(), Some("main"));
    assert_eq!(
        strip_remote_prefix("origin/release/1.x").as_deref(),
        Some("release/1.x")
    );
    assert_eq!(strip_remote_prefix("main"), None);
    assert_eq!(strip_remote_prefix("origin/"), None);
}

#[test]
fn test_submodule_paths_parse() {
    let output = "submodule.libs/a.path libs/a\nsubmodule.b.path b\n";
    let paths = parse_submodule_paths(Path::new("/work"), output);
    assert_eq!(
        paths,
        vec![PathBuf::from("/work/libs/a"), PathBuf::from("/work/b")]
    );
    assert!(parse_submodule_paths(Path::new("/work"), "").is_empty());
}

// =============================================================================
// Repository model
// =============================================================================

#[test]
fn test_candidate_relative_path() {
    let base = Path::new("/work/tree");
    let root = RepositoryCandidate::new(base, base.to_path_buf(), false);
    let child = RepositoryCandidate::new(base, base.join("libs").join("a"), true);

    assert_eq!(root.relative_path, ".");
    assert_eq!(child.relative_path, "libs/a");
    assert!(child.is_submodule);
}

#[test]
fn test_target_error_and_branches_are_exclusive() {
    let candidate = RepositoryCandidate::new(Path::new("/w"), PathBuf::from("/w/a"), false);

    let ok = RepositoryTarget::resolved(candidate.clone(), "feature", "main");
    assert!(ok.is_healthy());
    assert_eq!(ok.current_branch(), Some("feature"));
    assert_eq!(ok.default_branch(), Some("main"));
    assert!(!ok.on_default_branch());

    let failed = RepositoryTarget::failed(candidate, "fatal: not a git repository");
    assert!(!failed.is_healthy());
    assert_eq!(failed.current_branch(), None);
    assert_eq!(failed.default_branch(), None);
}

#[test]
fn test_target_records_results_by_kind() {
    let candidate = RepositoryCandidate::new(Path::new("/w"), PathBuf::from("/w/a"), false);
    let mut repo = RepositoryTarget::resolved(candidate, "main", "main");

    repo.record(OperationKind::Pull, ExecResult::completed(0, "Already up to date."));
    repo.record_commit_position(
        ExecResult::completed(0, "0\t2").parse_value(CommitPosition::parse),
    );

    let kinds: Vec<_> = repo.results().keys().copied().collect();
    assert_eq!(kinds, vec![OperationKind::Pull, OperationKind::CommitPosition]);
    assert_eq!(
        repo.commit_position().and_then(|p| p.value()).map(|p| p.ahead),
        Some(2)
    );
}

// =============================================================================
// Git command construction
// =============================================================================

#[tokio::test]
async fn test_ops_build_expected_arguments() {
    let gateway = ScriptedGateway::new().shared();
    let git = git_with(&gateway).with_remote("upstream");
    let repo = Path::new("/work/a");

    let _ = git.fetch(repo, Some("main")).await;
    let _ = git.fetch(repo, None).await;
    let _ = git.checkout(repo, "topic", true).await;
    let _ = git.reset(repo, "HEAD", ResetMode::Hard, 2).await;
    let _ = git.reset(repo, "abc123", ResetMode::Mixed, 0).await;
    let _ = git.clean(repo, CleanFlags::DIRECTORIES | CleanFlags::FORCE | CleanFlags::DRY_RUN).await;
    let _ = git.commit_position(repo, "main").await;
    let _ = git.set_head(repo, "origin").await;

    insta::assert_debug_snapshot!(gateway.calls_in("a"), @r#"
    [
        "fetch upstream main",
        "fetch",
        "checkout -b topic",
        "reset --hard HEAD~2",
        "reset --mixed abc123",
        "clean -d -f -n",
        "rev-list --left-right --count upstream/main...main",
        "remote set-head origin --auto",
    ]
    "#);
}

#[tokio::test]
async fn test_results_reference_repository() {
    let gateway = ScriptedGateway::new().shared();
    let git = git_with(&gateway);

    let result = git.pull(Path::new("/work/a")).await;
    assert_eq!(result.reference(), Some(Path::new("/work/a")));
}

#[tokio::test]
async fn test_typed_lookups_parse_on_success_only() {
    let gateway = ScriptedGateway::new()
        .on_in("a", "symbolic-ref", ExecResult::completed(0, "origin/develop"))
        .on_in("b", "symbolic-ref", ExecResult::completed(128, "fatal: ref refs/remotes/origin/HEAD is not a symbolic ref"))
        .on("rev-list", ExecResult::completed(0, "1\t4"))
        .shared();
    let git = git_with(&gateway);

    let found = git.default_branch(Path::new("/w/a")).await;
    assert_eq!(found.value().map(String::as_str), Some("develop"));

    let missing = git.default_branch(Path::new("/w/b")).await;
    assert!(!missing.success());
    assert_eq!(missing.status().exit_code(), 128);

    let position = git.commit_position(Path::new("/w/a"), "develop").await;
    assert_eq!(position.into_value(), Some(CommitPosition { behind: 1, ahead: 4 }));
}

#[test]
fn test_clean_rejects_ignore_rules_with_only_ignored() {
    let err = (CleanFlags::IGNORE_RULES | CleanFlags::ONLY_IGNORED)
        .validate()
        .unwrap_err();
    assert!(matches!(err, GitTasksError::InvalidArguments(_)));
    insta::assert_snapshot!(err.to_string(), @"Cannot use both 'only-ignored' and 'ignore-rules' switches together.");

    assert!(CleanFlags::IGNORE_RULES.validate().is_ok());
    assert!(CleanFlags::ONLY_IGNORED.validate().is_ok());
}

// =============================================================================
// Discovery
// =============================================================================

fn make_repo(path: &Path) {
    std::fs::create_dir_all(path.join(".git")).expect("create .git");
}

fn make_linked_repo(path: &Path) {
    std::fs::create_dir_all(path).expect("create dir");
    std::fs::write(path.join(".git"), "gitdir: ../.git/modules/x\n").expect("write .git file");
}

#[test]
fn test_is_repository_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    let plain = dir.path().join("plain");
    let repo = dir.path().join("repo");
    let linked = dir.path().join("linked");
    let bogus = dir.path().join("bogus");
    std::fs::create_dir_all(&plain).expect("mkdir");
    make_repo(&repo);
    make_linked_repo(&linked);
    std::fs::create_dir_all(&bogus).expect("mkdir");
    std::fs::write(bogus.join(".git"), "nonsense").expect("write");

    assert!(!discovery::is_repository_dir(&plain));
    assert!(discovery::is_repository_dir(&repo));
    assert!(discovery::is_repository_dir(&linked));
    assert!(!discovery::is_repository_dir(&bogus));
}

#[tokio::test]
async fn test_discover_walks_children_and_submodules() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    make_repo(root);
    make_repo(&root.join("alpha"));
    make_linked_repo(&root.join("beta"));
    make_repo(&root.join(".hidden"));
    std::fs::create_dir_all(root.join("notes")).expect("mkdir");
    make_linked_repo(&root.join("vendor").join("gamma"));
    make_repo(&root.join("skipme"));

    let gateway = ScriptedGateway::new()
        .on(
            "config --file .gitmodules",
            ExecResult::completed(
                0,
                "submodule.beta.path beta\nsubmodule.gamma.path vendor/gamma\nsubmodule.ghost.path ghost",
            ),
        )
        .on("rev-parse --abbrev-ref HEAD", ExecResult::completed(0, "main"))
        .on("symbolic-ref", ExecResult::completed(0, "origin/main"))
        .on_in("alpha", "rev-parse", ExecResult::completed(0, "feature"))
        .shared();
    let git = git_with(&gateway);
    let options = DiscoveryOptions::builder()
        .with_exclude(vec!["skip*".to_string()])
        .build();

    let repos = discover(&git, root, &options).await.expect("discover");
    let summary: Vec<String> = repos
        .iter()
        .map(|r| {
            format!(
                "{} submodule={} branch={}",
                r.relative_path(),
                r.is_submodule(),
                r.current_branch().unwrap_or("-")
            )
        })
        .collect();

    insta::assert_debug_snapshot!(summary, @r#"
    [
        ". submodule=false branch=main",
        ".hidden submodule=false branch=main",
        "alpha submodule=false branch=feature",
        "beta submodule=true branch=main",
        "vendor/gamma submodule=true branch=main",
    ]
    "#);
}

#[test]
fn test_find_candidates_in_wide_workspace() {
    let dir = tempfile::tempdir().expect("tempdir");
    for i in 0..300 {
        make_repo(&dir.path().join(format!("r{i:03}")));
    }
    let gateway = ScriptedGateway::new().shared();
    let options = DiscoveryOptions::builder().with_submodules(false).build();

    let found = discovery::find_candidates(&git_with(&gateway), dir.path(), &options)
        .expect("find candidates");

    assert_eq!(found.len(), 300);
    assert_eq!(found[0].relative_path, "r000");
    assert_eq!(found[299].relative_path, "r299");
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_discover_joins_branch_failures() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path().join("tree");
    make_repo(&root.join("broken"));
    make_repo(&root.join("good"));

    let gateway = ScriptedGateway::new()
        .on_in("broken", "rev-parse", ExecResult::completed(128, "fatal: not a git repository"))
        .on_in("broken", "symbolic-ref", ExecResult::completed(128, "fatal: not a git repository"))
        .on("rev-parse", ExecResult::completed(0, "main"))
        .on("symbolic-ref", ExecResult::completed(0, "origin/main"))
        .shared();
    let git = git_with(&gateway);

    let repos = discover(&git, &root, &DiscoveryOptions::default())
        .await
        .expect("discover");

    assert_eq!(repos.len(), 2);
    let broken = &repos[0];
    assert_eq!(broken.relative_path(), "broken");
    assert_eq!(
        broken.error_message(),
        Some("fatal: not a git repository; fatal: not a git repository")
    );
    assert_eq!(broken.current_branch(), None);
    assert!(repos[1].is_healthy());
}

#[tokio::test]
async fn test_discover_missing_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let gateway = ScriptedGateway::new().shared();
    let git = git_with(&gateway);

    let err = discover(&git, &dir.path().join("nope"), &DiscoveryOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GitTasksError::Git(ref e) if matches!(**e, GitError::RepoNotFound { .. })
    ));
}

#[tokio::test]
async fn test_discover_rejects_bad_exclude_glob() {
    let dir = tempfile::tempdir().expect("tempdir");
    let gateway = ScriptedGateway::new().shared();
    let git = git_with(&gateway);
    let options = DiscoveryOptions::builder()
        .with_exclude(vec!["{unclosed".to_string()])
        .build();

    let err = discover(&git, dir.path(), &options).await.unwrap_err();
    assert!(err.to_string().contains("discovery"), "{err}");
}
