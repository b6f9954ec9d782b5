// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository discovery.
//!
//! ```text
//! <root>/
//!   .git            root itself            (included)
//!   lib-a/.git      immediate child        (included)
//!   vendor/b/.git   declared in .gitmodules (included, submodule)
//!   .tools/.git     hidden child           (included)
//!   notes/          no .git                (skipped)
//!
//! candidates --> dedupe (submodule wins) --> exclude globs --> sort
//!            --> branch lookups, concurrently per repository
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bon::Builder;
use flume::unbounded;
use futures_util::future::join_all;
use ignore::WalkBuilder;
use tracing::{debug, warn};
use wax::{Glob, Program as _};

use super::ops::Git;
use super::repository::{RepositoryCandidate, RepositoryTarget};
use crate::error::{ConfigError, GitError, GitTasksError, GitTasksResult};

/// What to look for beneath the target path.
#[derive(Debug, Clone, Builder)]
pub struct DiscoveryOptions {
    /// Globs matched against each repository's relative path
    #[builder(setters(name = with_exclude), default)]
    exclude: Vec<String>,
    /// Include paths declared in `.gitmodules`
    #[builder(setters(name = with_submodules), default = true)]
    submodules: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl DiscoveryOptions {
    #[must_use]
    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }

    #[must_use]
    pub const fn submodules(&self) -> bool {
        self.submodules
    }
}

/// Whether `path` is the root of a working tree.
///
/// A `.git` directory counts, and so does a `.git` file pointing elsewhere
/// (`gitdir: ...`), as submodules and worktrees use.
#[must_use]
pub fn is_repository_dir(path: &Path) -> bool {
    let dot_git = path.join(".git");
    if dot_git.is_dir() {
        return true;
    }
    dot_git.is_file()
        && std::fs::read_to_string(&dot_git).is_ok_and(|text| text.starts_with("gitdir:"))
}

/// The root and its immediate child directories, hidden ones included, that are repositories.
fn walk_candidates(root: &Path) -> Vec<PathBuf> {
    let (tx, rx) = unbounded::<PathBuf>();

    let mut builder = WalkBuilder::new(root);
    builder
        .max_depth(Some(1))
        .hidden(false)
        .parents(false)
        .ignore(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false);

    builder.build_parallel().run(|| {
        let tx = tx.clone();
        Box::new(move |entry_result| {
            match entry_result {
                Ok(entry) => {
                    if entry.file_type().is_some_and(|ft| ft.is_dir())
                        && is_repository_dir(entry.path())
                    {
                        let _ = tx.send(entry.path().to_path_buf());
                    }
                }
                Err(e) => warn!(error = %e, "walk error"),
            }
            ignore::WalkState::Continue
        })
    });

    drop(tx);
    rx.iter().collect()
}

fn compile_excludes(patterns: &[String]) -> GitTasksResult<Vec<Glob<'_>>> {
    patterns
        .iter()
        .map(|pattern| {
            Glob::new(pattern).map_err(|e| {
                GitTasksError::from(ConfigError::InvalidValue {
                    section: "discovery".to_string(),
                    key: "exclude".to_string(),
                    message: format!("invalid glob '{pattern}': {e}"),
                })
            })
        })
        .collect()
}

/// Candidate repositories beneath `root`, deduplicated, filtered and sorted by path.
///
/// Blocking: walks the file system and lists submodules through the
/// blocking gateway call.
///
/// # Errors
///
/// Returns an error if an exclude glob does not compile.
pub fn find_candidates(
    git: &Git,
    root: &Path,
    options: &DiscoveryOptions,
) -> GitTasksResult<Vec<RepositoryCandidate>> {
    let excludes = compile_excludes(options.exclude())?;

    // path -> is_submodule; BTreeMap keeps the result sorted
    let mut found: BTreeMap<PathBuf, bool> = walk_candidates(root)
        .into_iter()
        .map(|path| (path, false))
        .collect();

    if options.submodules() {
        for path in git.submodule_paths(root) {
            if is_repository_dir(&path) {
                found.insert(path, true);
            } else {
                debug!(path = %path.display(), "submodule not initialized, skipping");
            }
        }
    }

    Ok(found
        .into_iter()
        .map(|(path, is_submodule)| RepositoryCandidate::new(root, path, is_submodule))
        .filter(|candidate| {
            let excluded = excludes
                .iter()
                .any(|glob| glob.is_match(Path::new(&candidate.relative_path)));
            if excluded {
                debug!(repo = %candidate.relative_path, "excluded");
            }
            !excluded
        })
        .collect())
}

/// Looks up both branches; any failure turns the candidate into a failed target.
pub async fn resolve(git: &Git, candidate: RepositoryCandidate) -> RepositoryTarget {
    let (current, default) = tokio::join!(
        git.current_branch(&candidate.path),
        git.default_branch(&candidate.path)
    );

    let mut errors = Vec::new();
    if !current.success() {
        errors.push(current.to_string());
    }
    if !default.success() {
        errors.push(default.to_string());
    }

    match (current.into_value(), default.into_value()) {
        (Some(current), Some(default)) if errors.is_empty() => {
            RepositoryTarget::resolved(candidate, current, default)
        }
        _ => {
            let message = errors.join("; ");
            debug!(repo = %candidate.relative_path, error = %message, "discovery failed");
            RepositoryTarget::failed(candidate, message)
        }
    }
}

/// Discovers every repository beneath `root`, in path order.
///
/// # Errors
///
/// Returns `GitError::RepoNotFound` when `root` is not a directory, or a
/// config error for a bad exclude glob.
pub async fn discover(
    git: &Git,
    root: &Path,
    options: &DiscoveryOptions,
) -> GitTasksResult<Vec<RepositoryTarget>> {
    let root = std::path::absolute(root).map_err(GitTasksError::from)?;
    if !root.is_dir() {
        return Err(GitError::RepoNotFound {
            path: root.display().to_string(),
        }
        .into());
    }

    let candidates = {
        let git = git.clone();
        let root = root.clone();
        let options = options.clone();
        tokio::task::spawn_blocking(move || find_candidates(&git, &root, &options))
            .await
            .map_err(|e| GitTasksError::Other(e.to_string().into_boxed_str()))??
    };
    debug!(root = %root.display(), count = candidates.len(), "candidates found");

    Ok(join_all(candidates.into_iter().map(|candidate| resolve(git, candidate))).await)
}
