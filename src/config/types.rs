// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration sections.
//!
//! ```text
//! Config
//!   [global]        log levels, log file
//!   [git]           program, remote
//!   [discovery]     exclude globs, submodules
//!   [orchestrator]  max_concurrency (0 = unbounded)
//! ```

use serde::{Deserialize, Serialize};
use wax::Glob;

use crate::error::ConfigError;
use crate::git::{DEFAULT_PROGRAM, DEFAULT_REMOTE, DiscoveryOptions};
use crate::logging::LogLevel;

/// Logging options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Console (stderr) log level (0-6).
    pub log_level: LogLevel,
    /// File log level (0-6).
    pub file_log_level: LogLevel,
    /// Log file; no file logging when empty.
    pub log_file: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::WARN,
            file_log_level: LogLevel::DEBUG,
            log_file: String::new(),
        }
    }
}

/// How git is invoked.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitConfig {
    /// Executable name or path.
    pub program: String,
    /// Remote used for fetches, default branches and commit positions.
    pub remote: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            remote: DEFAULT_REMOTE.to_string(),
        }
    }
}

/// Which repositories take part in a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Globs matched against relative repository paths.
    pub exclude: Vec<String>,
    pub submodules: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            submodules: true,
        }
    }
}

impl DiscoveryConfig {
    /// Rejects exclude patterns that are not valid globs.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first bad pattern.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for pattern in &self.exclude {
            Glob::new(pattern).map_err(|e| ConfigError::InvalidValue {
                section: "discovery".to_string(),
                key: "exclude".to_string(),
                message: format!("'{pattern}' is not a valid glob: {e}"),
            })?;
        }
        Ok(())
    }

    #[must_use]
    pub fn options(&self) -> DiscoveryOptions {
        DiscoveryOptions::builder()
            .with_exclude(self.exclude.clone())
            .with_submodules(self.submodules)
            .build()
    }
}

/// Scheduling limits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrchestratorConfig {
    /// Repositories worked on at once; `0` means no limit.
    pub max_concurrency: usize,
}
