// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! git-tasks [global options] [command]
//! status [PATH]      (default)
//! pull [PATH]
//! checkout <BRANCH_OR_COMMIT> [PATH]
//! main [PATH]
//! clean [PATH]
//! reset [PATH]
//! fix-ref [PATH]
//! config
//! version
//! ```

pub mod global;
pub mod repo;
pub mod worktree;

#[cfg(test)]
mod tests;

use clap::{Args, Parser, Subcommand};

use crate::cli::global::GlobalOptions;
use crate::cli::repo::{CheckoutArgs, MainArgs, RepoArgs, StatusArgs};
use crate::cli::worktree::{CleanArgs, ResetArgs};

/// Runs git across a directory of repositories and its submodules.
#[derive(Debug, Parser)]
#[command(
    name = "git-tasks",
    author,
    version,
    about = "Multi-Repository Git Runner",
    long_about = "git-tasks Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Runs one git operation on every repository below PATH at once\n\
                  and keeps one status line per repository up to date.\n\n\
                  Invoking `git-tasks` alone shows the status of the current\n\
                  directory. See `git-tasks <command> --help` for more\n\
                  information about a command.",
    after_help = "CONFIG FILES:\n\n\
                  git-tasks reads `git-tasks.toml` from the current directory\n\
                  when present, then every file given with --config, then\n\
                  GIT_TASKS_<SECTION>__<KEY> environment variables. Use\n\
                  `git-tasks config` to see the resolved values."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute; `status` when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    Version,

    /// Lists every option and its value after all config layers.
    Config(ConfigArgs),

    /// Shows working tree state and position against the remote.
    Status(StatusArgs),

    /// Pulls every repository.
    Pull(RepoArgs),

    /// Checks out a branch, commit or unique wildcard match.
    Checkout(CheckoutArgs),

    /// Switches to the remote's default branch.
    Main(MainArgs),

    /// Removes untracked files.
    Clean(CleanArgs),

    /// Resets the current branch.
    Reset(ResetArgs),

    /// Repairs the remote HEAD reference.
    #[command(name = "fix-ref")]
    FixRef(RepoArgs),
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// Lists the configuration files that were loaded instead.
    #[arg(long)]
    pub files: bool,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
