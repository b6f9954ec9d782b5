// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Status | Pull | Checkout | Main | Clean | Reset | FixRef | Config
//! ```

use std::process::ExitCode;

use git_tasks::cli::global::GlobalOptions;
use git_tasks::cli::repo::StatusArgs;
use git_tasks::cli::{self, Command};
use git_tasks::cmd::config::run_config_command;
use git_tasks::cmd::repos::{
    RepoRun, run_checkout_command, run_clean_command, run_fix_ref_command, run_main_command,
    run_pull_command, run_reset_command, run_status_command,
};
use git_tasks::config::{Config, ConfigLoader, ENV_PREFIX, LOCAL_CONFIG_FILE};
use git_tasks::logging::init_logging;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    if matches!(cli.command, Some(Command::Version)) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let (config, config_files) = match load_config(&cli.global) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match init_logging(&config.log_config()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, &config, &config_files).await
}

async fn dispatch_command(cli: &cli::Cli, config: &Config, config_files: &[String]) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => Ok(None),
        Some(Command::Config(args)) => {
            run_config_command(args, config, config_files);
            Ok(None)
        }
        Some(Command::Status(args)) => run_status_command(args, config).await.map(Some),
        Some(Command::Pull(args)) => run_pull_command(args, config).await.map(Some),
        Some(Command::Checkout(args)) => run_checkout_command(args, config).await.map(Some),
        Some(Command::Main(args)) => run_main_command(args, config).await.map(Some),
        Some(Command::Clean(args)) => run_clean_command(args, config).await.map(Some),
        Some(Command::Reset(args)) => run_reset_command(args, config).await.map(Some),
        Some(Command::FixRef(args)) => run_fix_ref_command(args, config).await.map(Some),
        None => run_status_command(&StatusArgs::default(), config)
            .await
            .map(Some),
    };

    match result {
        Ok(Some(RepoRun::NoRepositories)) => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn build_config_loader(global: &GlobalOptions) -> ConfigLoader {
    let mut loader = ConfigLoader::new().add_toml_file_optional(LOCAL_CONFIG_FILE);
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader.with_env_prefix(ENV_PREFIX)
}

fn load_config(global: &GlobalOptions) -> git_tasks::error::Result<(Config, Vec<String>)> {
    let mut loader = build_config_loader(global);
    let files = loader.format_loaded_files();
    for (key, value) in global.to_config_overrides() {
        loader = loader.set(key, value)?;
    }
    Ok((loader.build()?, files))
}
