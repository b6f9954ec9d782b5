// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. git-tasks.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. GIT_TASKS_* env vars
//! 5. CLI log overrides
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! GIT_TASKS_GIT__REMOTE=upstream             → git.remote = "upstream"
//! GIT_TASKS_ORCHESTRATOR__MAX_CONCURRENCY=4  → orchestrator.max_concurrency = 4
//! GIT_TASKS_DISCOVERY__EXCLUDE=a*,vendor/**  → discovery.exclude = ["a*", "vendor/**"]
//! ```

pub mod loader;
pub mod types;


use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GitTasksError, Result};
use crate::logging::LogConfig;

pub use loader::{ConfigLoader, SourceKind};
pub use types::{DiscoveryConfig, GitConfig, GlobalConfig, OrchestratorConfig};

/// File read from the working directory when present.
pub const LOCAL_CONFIG_FILE: &str = "git-tasks.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "GIT_TASKS";

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub global: GlobalConfig,
    pub git: GitConfig,
    pub discovery: DiscoveryConfig,
    pub orchestrator: OrchestratorConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use git_tasks::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("git-tasks.toml")
    ///     .with_env_prefix("GIT_TASKS")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// # Errors
    ///
    /// Returns an error for an exclude pattern that is not a valid glob.
    pub fn validate(&self) -> Result<()> {
        self.discovery
            .validate()
            .map_err(|e| GitTasksError::from(e).into())
    }

    /// Logging settings for [`init_logging`](crate::logging::init_logging).
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        let log_file = (!self.global.log_file.is_empty()).then(|| self.global.log_file.clone());
        LogConfig::builder()
            .with_console_level(self.global.log_level)
            .with_file_level(self.global.file_log_level)
            .maybe_with_log_file(log_file)
            .build()
    }

    /// Every option as an aligned `key = value` line, sorted by key.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_git_options(&mut options);
        self.format_discovery_options(&mut options);
        options.insert(
            "orchestrator.max_concurrency".into(),
            self.orchestrator.max_concurrency.to_string(),
        );

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "global.log_level".into(),
            self.global.log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert("global.log_file".into(), self.global.log_file.clone());
    }

    fn format_git_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("git.program".into(), self.git.program.clone());
        options.insert("git.remote".into(), self.git.remote.clone());
    }

    fn format_discovery_options(&self, options: &mut BTreeMap<String, String>) {
        let exclude = self
            .discovery
            .exclude
            .iter()
            .map(|pattern| format!("\"{pattern}\""))
            .collect::<Vec<_>>()
            .join(", ");
        options.insert("discovery.exclude".into(), format!("[{exclude}]"));
        options.insert(
            "discovery.submodules".into(),
            self.discovery.submodules.to_string(),
        );
    }
}
