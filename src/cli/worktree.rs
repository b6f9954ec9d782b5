// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments for the commands that discard work.
//!
//! ```text
//! clean [-d] [-f] [-x | -X] [-n]
//! reset [-c COMMIT] [-m mixed|soft|hard] [-b N] [-u]
//! ```

use clap::Args;

use super::repo::RepoArgs;
use crate::git::{CleanFlags, ResetMode};

/// Arguments for the `clean` command.
#[derive(Debug, Clone, Default, Args)]
pub struct CleanArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Removes untracked directories too.
    #[arg(short = 'd')]
    pub directories: bool,

    /// Required by git unless clean.requireForce is false.
    #[arg(short = 'f')]
    pub force: bool,

    /// Ignores the ignore rules.
    #[arg(short = 'x')]
    pub ignore_rules: bool,

    /// Removes only ignored files.
    #[arg(short = 'X')]
    pub only_ignored: bool,

    /// Shows what would be removed. Implies --show-output.
    #[arg(short = 'n')]
    pub dry_run: bool,
}

impl CleanArgs {
    /// Flags as given; validation happens when the job is built.
    #[must_use]
    pub fn flags(&self) -> CleanFlags {
        [
            (self.directories, CleanFlags::DIRECTORIES),
            (self.force, CleanFlags::FORCE),
            (self.ignore_rules, CleanFlags::IGNORE_RULES),
            (self.only_ignored, CleanFlags::ONLY_IGNORED),
            (self.dry_run, CleanFlags::DRY_RUN),
        ]
        .into_iter()
        .filter(|(set, _)| *set)
        .fold(CleanFlags::empty(), |flags, (_, flag)| flags | flag)
    }
}

/// Arguments for the `reset` command.
#[derive(Debug, Clone, Args)]
pub struct ResetArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Commit to reset to.
    #[arg(short = 'c', long, value_name = "COMMIT", default_value = "HEAD")]
    pub commit: String,

    #[arg(short = 'm', long, value_enum, default_value_t = ResetMode::Mixed)]
    pub mode: ResetMode,

    /// Goes N commits back from COMMIT.
    #[arg(short = 'b', long, value_name = "N", default_value_t = 0)]
    pub back: u32,

    /// Runs `git clean -d -f` after a successful reset.
    #[arg(short = 'u', long)]
    pub clean: bool,
}
