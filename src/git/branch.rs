// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Parsed git output: branch listings and ahead/behind counts.

use std::fmt;

/// Commits the local branch is behind and ahead of its remote counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommitPosition {
    pub behind: u32,
    pub ahead: u32,
}

impl CommitPosition {
    /// Parses `rev-list --left-right --count <remote>/<b>...<b>` output.
    ///
    /// The left count (remote side) is what the local branch is behind.
    #[must_use]
    pub fn parse(output: &str) -> Option<Self> {
        let mut parts = output.split_whitespace();
        let behind = parts.next()?.parse().ok()?;
        let ahead = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self { behind, ahead })
    }

    #[must_use]
    pub const fn is_level(&self) -> bool {
        self.behind == 0 && self.ahead == 0
    }
}

/// One line of `git branch --all`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitBranch {
    pub name: String,
    pub remote: Option<String>,
    pub is_current: bool,
    pub is_remote: bool,
}

impl GitBranch {
    /// Parses one line of `git branch --all`.
    ///
    /// ```text
    /// * main                          current
    ///   feature/x                     local
    ///   remotes/origin/HEAD -> origin/main
    ///   remotes/origin/feature/x      remote "origin", name "feature/x"
    /// ```
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let text = line.trim();

        if let Some(name) = text.strip_prefix("* ") {
            return Self {
                name: name.to_string(),
                remote: None,
                is_current: true,
                is_remote: false,
            };
        }

        if let Some(rest) = text.strip_prefix("remotes/") {
            let rest = rest.split(" -> ").next().unwrap_or(rest);
            let (remote, name) = match rest.split_once('/') {
                Some((remote, name)) => (Some(remote.to_string()), name.to_string()),
                None => (None, rest.to_string()),
            };
            return Self {
                name,
                remote,
                is_current: false,
                is_remote: true,
            };
        }

        Self {
            name: text.to_string(),
            remote: None,
            is_current: false,
            is_remote: false,
        }
    }

    /// Parses every non-empty line of `git branch --all`.
    #[must_use]
    pub fn parse_list(output: &str) -> Vec<Self> {
        output
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(Self::parse)
            .collect()
    }

    /// `remote/name` for remote branches, `name` otherwise.
    #[must_use]
    pub fn full_name(&self) -> String {
        match (&self.remote, self.is_remote) {
            (Some(remote), true) => format!("{remote}/{}", self.name),
            _ => self.name.clone(),
        }
    }
}

impl fmt::Display for GitBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}
