// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments shared by every repository command, and the read-mostly ones.
//!
//! ```text
//! <command> [PATH] [-s]
//! status    [-f] [-p]
//! checkout  <BRANCH_OR_COMMIT> [-b]
//! main      [-p]
//! ```

use std::path::PathBuf;

use clap::Args;

/// Target directory and output mode.
#[derive(Debug, Clone, Args)]
pub struct RepoArgs {
    /// Directory holding the repositories; it may be a repository itself.
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Prints git's output below each repository instead of the live dashboard.
    #[arg(short = 's', long = "show-output")]
    pub show_output: bool,
}

impl Default for RepoArgs {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            show_output: false,
        }
    }
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, Default, Args)]
pub struct StatusArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Fetches the current branch first.
    #[arg(short = 'f', long)]
    pub fetch: bool,

    /// Prints the porcelain status of each repository.
    #[arg(short = 'p', long)]
    pub pending: bool,
}

/// Arguments for the `checkout` command.
#[derive(Debug, Clone, Args)]
pub struct CheckoutArgs {
    /// Branch, commit or wildcard pattern such as 'feature/*'.
    #[arg(value_name = "BRANCH_OR_COMMIT")]
    pub target: String,

    #[command(flatten)]
    pub repo: RepoArgs,

    /// Creates the branch (`checkout -b`).
    #[arg(short = 'b', long)]
    pub create: bool,
}

/// Arguments for the `main` command.
#[derive(Debug, Clone, Default, Args)]
pub struct MainArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Pulls after switching.
    #[arg(short = 'p', long)]
    pub pull: bool,
}
