// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Layered configuration loading.
//!
//! ```text
//! ConfigLoader::new()
//!   .add_toml_file_optional("git-tasks.toml")
//!   .add_toml_file(--config)           repeatable
//!   .with_env_prefix("GIT_TASKS")      GIT_TASKS_<SECTION>__<KEY>
//!   .set("global.log_level", 4)?       CLI overrides
//!        |
//!        v
//!    build() --> validate() --> Config
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Environment, File, FileFormat};
use tracing::debug;

use super::Config;
use crate::error::Result;

/// Where a layer came from, for the `config` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Required,
    Optional,
    Inline,
}

impl SourceKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "file",
            Self::Optional => "optional",
            Self::Inline => "string",
        }
    }
}

/// Builder over `config::ConfigBuilder` that remembers its file layers.
pub struct ConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: Option<String>,
    files: Vec<(SourceKind, PathBuf)>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            env_prefix: None,
            files: Vec::new(),
        }
    }

    /// Adds a TOML file that must exist when `build()` runs.
    #[must_use]
    pub fn add_toml_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(path).format(FileFormat::Toml).required(true));
        self.files.push((SourceKind::Required, path.to_path_buf()));
        self
    }

    #[must_use]
    pub fn add_toml_file_optional<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(path).format(FileFormat::Toml).required(false));
        if path.exists() {
            self.files.push((SourceKind::Optional, path.to_path_buf()));
        }
        self
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self.files
            .push((SourceKind::Inline, PathBuf::from("<string>")));
        self
    }

    /// Reads `<PREFIX>_<SECTION>__<KEY>` variables.
    ///
    /// Sections and keys are split by a double underscore since keys such as
    /// `max_concurrency` contain single ones. `discovery.exclude` is a
    /// comma-separated list.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Sets a value that wins over every other layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not a valid path expression.
    pub fn set<T: Into<config::Value>>(mut self, key: &str, value: T) -> Result<Self> {
        self.builder = self
            .builder
            .set_override(key, value)
            .with_context(|| format!("Invalid config override '{key}'"))?;
        Ok(self)
    }

    /// Merges every layer and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if a required file is missing or malformed, if a
    /// value has the wrong type or an unknown key, or if an exclude glob
    /// does not compile.
    pub fn build(self) -> Result<Config> {
        for (kind, path) in &self.files {
            debug!(source = kind.as_str(), path = %path.display(), "config layer");
        }
        let builder = match &self.env_prefix {
            Some(prefix) => self.builder.add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("discovery.exclude")
                    .try_parsing(true),
            ),
            None => self.builder,
        };
        let merged = builder.build().context("Failed to load configuration")?;
        let config: Config = merged
            .try_deserialize()
            .context("Failed to read configuration")?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn loaded_files(&self) -> &[(SourceKind, PathBuf)] {
        &self.files
    }

    /// One numbered line per file layer, in priority order.
    #[must_use]
    pub fn format_loaded_files(&self) -> Vec<String> {
        self.files
            .iter()
            .enumerate()
            .map(|(i, (kind, path))| {
                format!("{}. [{}] {}", i + 1, kind.as_str(), path.display())
            })
            .collect()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
