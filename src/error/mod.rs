// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!            GitTasksError (~24 bytes)
//!                     |
//!   +------+------+---+---+------+------+--------+
//!   |      |      |       |      |      |        |
//!   v      v      v       v      v      v        v
//! Args    Git   Config  Task  Process  Io   Other
//! Box<str> Box   Box     Box    Box    Box  Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Git      RepoNotFound
//!   Config   InvalidValue
//!   Task     Panicked
//!   Process  Start(ProcessStartFailure), Io
//!
//! ProcessStartFailure: NotFound | AccessDenied | Other
//! ```
//!
//! Per-repository failures never travel through this enum. They are stored
//! inside [`ExecResult`](crate::core::result::ExecResult) and rendered on the
//! repository's own row. Only invalid argument combinations and startup
//! problems surface as a process-level error.

use std::path::Path;

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`GitTasksError`].
pub type GitTasksResult<T> = std::result::Result<T, GitTasksError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum GitTasksError {
    /// Mutually exclusive flags or otherwise unusable arguments.
    ///
    /// Detected before any repository is touched.
    #[error("{0}")]
    InvalidArguments(Box<str>),

    /// Git operation failed.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Orchestration error.
    #[error("task error: {0}")]
    Task(#[from] Box<TaskError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

/// Create a [`GitTasksError::InvalidArguments`] from a message.
pub fn invalid_arguments(message: impl Into<String>) -> GitTasksError {
    GitTasksError::InvalidArguments(message.into().into_boxed_str())
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for GitTasksError {
                fn from(err: $error) -> Self {
                    GitTasksError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    GitError => Git,
    ConfigError => Config,
    TaskError => Task,
    ProcessError => Process,
    std::io::Error => Io,
}

// --- Git Errors ---

/// Git-level errors that stop a whole command.
#[derive(Debug, Error)]
pub enum GitError {
    /// Target directory does not exist or cannot be resolved.
    #[error("directory not found: {path}")]
    RepoNotFound { path: String },
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Task Errors ---

/// Orchestration errors.
#[derive(Debug, Error)]
pub enum TaskError {
    /// A repository task panicked; its row keeps whatever was already drawn.
    #[error("task for '{repository}' panicked: {message}")]
    Panicked { repository: String, message: String },
}

// --- Process Errors ---

/// Why an external command could not be started.
///
/// Produced only by the command gateway, which is the one place that looks
/// at OS error kinds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessStartFailure {
    /// The executable (or working directory) does not exist.
    #[error("file not found: {program} ({cwd})")]
    NotFound { program: String, cwd: String },

    /// The executable or working directory is not accessible.
    #[error("access denied: {program} ({cwd})")]
    AccessDenied { program: String, cwd: String },

    /// Any other spawn failure.
    #[error("failed to start {program}: {message}")]
    Other { program: String, message: String },
}

impl ProcessStartFailure {
    /// Classifies a spawn error by its [`std::io::ErrorKind`].
    #[must_use]
    pub fn from_io(program: &str, cwd: Option<&Path>, err: &std::io::Error) -> Self {
        let cwd = cwd.map_or_else(|| ".".to_string(), |p| p.display().to_string());
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound {
                program: program.to_string(),
                cwd,
            },
            std::io::ErrorKind::PermissionDenied => Self::AccessDenied {
                program: program.to_string(),
                cwd,
            },
            _ => Self::Other {
                program: program.to_string(),
                message: err.to_string(),
            },
        }
    }
}

/// Process execution errors stored on a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessError {
    /// The process never started.
    #[error(transparent)]
    Start(#[from] ProcessStartFailure),

    /// The process started but waiting on it or reading its output failed.
    #[error("i/o error while running '{command}': {message}")]
    Io { command: String, message: String },
}

impl ProcessError {
    /// Returns the start failure, if this error is one.
    #[must_use]
    pub const fn start_failure(&self) -> Option<&ProcessStartFailure> {
        match self {
            Self::Start(failure) => Some(failure),
            Self::Io { .. } => None,
        }
    }
}
