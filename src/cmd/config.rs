// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The `config` command.

use crate::cli::ConfigArgs;
use crate::config::Config;

/// Prints the resolved options, or the files they came from.
pub fn run_config_command(args: &ConfigArgs, config: &Config, config_files: &[String]) {
    if !args.files {
        for line in config.format_options() {
            println!("{line}");
        }
        return;
    }

    if config_files.is_empty() {
        println!("No configuration files loaded");
    } else {
        for line in config_files {
            println!("{line}");
        }
    }
}
