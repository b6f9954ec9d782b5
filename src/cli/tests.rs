// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;

use clap::Parser;

use crate::cli::{Cli, Command};
use crate::git::{CleanFlags, ResetMode};

#[test]
fn test_no_command_defaults_to_status() {
    let cli = Cli::try_parse_from(["git-tasks"]).unwrap();
    assert!(cli.command.is_none());
}

#[test]
fn test_parse_global_options() {
    let cli = Cli::try_parse_from([
        "git-tasks",
        "-l",
        "4",
        "--log-file",
        "run.log",
        "--config",
        "a.toml",
        "--config",
        "b.toml",
        "pull",
    ])
    .unwrap();
    insta::assert_debug_snapshot!(cli.global.to_config_overrides(), @r#"
    [
        (
            "global.log_level",
            "4",
        ),
        (
            "global.file_log_level",
            "4",
        ),
        (
            "global.log_file",
            "run.log",
        ),
    ]
    "#);
    assert_eq!(cli.global.configs.len(), 2);
}

#[test]
fn test_log_level_out_of_range() {
    assert!(Cli::try_parse_from(["git-tasks", "-l", "7"]).is_err());
}

#[test]
fn test_parse_status() {
    let cli = Cli::try_parse_from(["git-tasks", "status", "-f", "-p", "/src", "-s"]).unwrap();
    let Some(Command::Status(args)) = cli.command else {
        panic!("expected status");
    };
    assert!(args.fetch && args.pending && args.repo.show_output);
    assert_eq!(args.repo.path, Path::new("/src"));
}

#[test]
fn test_path_defaults_to_current_dir() {
    let cli = Cli::try_parse_from(["git-tasks", "fix-ref"]).unwrap();
    let Some(Command::FixRef(args)) = cli.command else {
        panic!("expected fix-ref");
    };
    assert_eq!(args.path, Path::new("."));
    assert!(!args.show_output);
}

#[test]
fn test_parse_checkout() {
    let cli = Cli::try_parse_from(["git-tasks", "checkout", "feature/*", "-b", "work"]).unwrap();
    insta::assert_debug_snapshot!(cli.command, @r#"
    Some(
        Checkout(
            CheckoutArgs {
                target: "feature/*",
                repo: RepoArgs {
                    path: "work",
                    show_output: false,
                },
                create: true,
            },
        ),
    )
    "#);
}

#[test]
fn test_checkout_requires_target() {
    assert!(Cli::try_parse_from(["git-tasks", "checkout"]).is_err());
}

#[test]
fn test_parse_clean_flags() {
    let cli = Cli::try_parse_from(["git-tasks", "clean", "-d", "-f", "-X", "-n"]).unwrap();
    let Some(Command::Clean(args)) = cli.command else {
        panic!("expected clean");
    };
    assert_eq!(
        args.flags(),
        CleanFlags::DIRECTORIES | CleanFlags::FORCE | CleanFlags::ONLY_IGNORED | CleanFlags::DRY_RUN
    );
}

#[test]
fn test_clean_conflict_is_parsed_and_rejected_later() {
    let cli = Cli::try_parse_from(["git-tasks", "clean", "-x", "-X"]).unwrap();
    let Some(Command::Clean(args)) = cli.command else {
        panic!("expected clean");
    };
    assert!(args.flags().validate().is_err());
}

#[test]
fn test_parse_reset() {
    let cli = Cli::try_parse_from(["git-tasks", "reset"]).unwrap();
    let Some(Command::Reset(args)) = cli.command else {
        panic!("expected reset");
    };
    assert_eq!((args.commit.as_str(), args.mode, args.back, args.clean), ("HEAD", ResetMode::Mixed, 0, false));

    let cli = Cli::try_parse_from([
        "git-tasks", "reset", "-c", "v1.2", "-m", "hard", "-b", "3", "-u",
    ])
    .unwrap();
    let Some(Command::Reset(args)) = cli.command else {
        panic!("expected reset");
    };
    assert_eq!((args.commit.as_str(), args.mode, args.back, args.clean), ("v1.2", ResetMode::Hard, 3, true));
}

#[test]
fn test_reset_rejects_unknown_mode() {
    assert!(Cli::try_parse_from(["git-tasks", "reset", "-m", "keep"]).is_err());
}

#[test]
fn test_parse_main_and_config() {
    let cli = Cli::try_parse_from(["git-tasks", "main", "-p"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Main(ref args)) if args.pull));

    let cli = Cli::try_parse_from(["git-tasks", "config", "--files"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Config(ref args)) if args.files));
}
