// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Outcome of one external command invocation.
//!
//! ```text
//! ExecResult { exit_code, was_killed, exception, output, reference }
//!      |  with_value(v) / parse_value(f)
//!      v
//! TypedResult<T> { result, value }
//!      |  without_value()
//!      v
//! ExecResult (status fields untouched)
//!
//! success = exit_code == 0 && !was_killed && exception.is_none() && output.is_some()
//! typed   = success && value.is_some()
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{ProcessError, ProcessStartFailure};

/// Exit code of a command that never ran.
pub const NOT_RUN: i32 = -1;

/// Raw outcome of a command: exit status plus merged stdout/stderr.
///
/// Values are immutable once built. The `with_*` transforms return a new
/// result with identical status fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    exit_code: i32,
    was_killed: bool,
    exception: Option<ProcessError>,
    output: Option<String>,
    reference: Option<PathBuf>,
}

impl Default for ExecResult {
    fn default() -> Self {
        Self {
            exit_code: NOT_RUN,
            was_killed: false,
            exception: None,
            output: None,
            reference: None,
        }
    }
}

impl ExecResult {
    /// Result of a process that ran to completion.
    #[must_use]
    pub fn completed(exit_code: i32, output: impl Into<String>) -> Self {
        Self {
            exit_code,
            output: Some(output.into()),
            ..Self::default()
        }
    }

    /// Result of a process that was killed through cancellation.
    ///
    /// `output` holds whatever was captured before the kill.
    #[must_use]
    pub fn killed(output: Option<String>) -> Self {
        Self {
            was_killed: true,
            output,
            ..Self::default()
        }
    }

    /// Result of a process that could not be started.
    #[must_use]
    pub fn start_failed(failure: ProcessStartFailure) -> Self {
        Self {
            exception: Some(ProcessError::Start(failure)),
            ..Self::default()
        }
    }

    /// Result carrying an arbitrary process error.
    #[must_use]
    pub fn failed(error: ProcessError, output: Option<String>) -> Self {
        Self {
            exception: Some(error),
            output,
            ..Self::default()
        }
    }

    /// Wraps a value computed without running anything (exit code 0, empty output).
    #[must_use]
    pub fn with_object<T>(value: T) -> TypedResult<T> {
        Self::completed(0, String::new()).with_value(Some(value))
    }

    /// Whether the command ran, exited 0, was not killed and produced output.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
            && !self.was_killed
            && self.exception.is_none()
            && self.output.is_some()
    }

    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.exit_code
    }

    #[must_use]
    pub const fn was_killed(&self) -> bool {
        self.was_killed
    }

    #[must_use]
    pub const fn exception(&self) -> Option<&ProcessError> {
        self.exception.as_ref()
    }

    /// Returns the start failure, if the process never ran.
    #[must_use]
    pub fn start_failure(&self) -> Option<&ProcessStartFailure> {
        self.exception.as_ref().and_then(ProcessError::start_failure)
    }

    #[must_use]
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    /// Returns the output or an empty string.
    #[must_use]
    pub fn output_or_empty(&self) -> &str {
        self.output.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn reference(&self) -> Option<&Path> {
        self.reference.as_deref()
    }

    /// Same status, new reference.
    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<PathBuf>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Reinterprets this result as a typed one carrying `value`.
    #[must_use]
    pub fn with_value<T>(self, value: Option<T>) -> TypedResult<T> {
        TypedResult {
            result: self,
            value,
        }
    }

    /// Parses the output into a value.
    ///
    /// The parser only runs when the command succeeded. A parser returning
    /// `None` leaves the typed result unsuccessful with the status intact.
    #[must_use]
    pub fn parse_value<T>(self, parse: impl FnOnce(&str) -> Option<T>) -> TypedResult<T> {
        let value = if self.success() {
            self.output.as_deref().and_then(parse)
        } else {
            None
        };
        self.with_value(value)
    }
}

impl fmt::Display for ExecResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.output, &self.exception) {
            (Some(output), _) if !output.is_empty() => f.write_str(output),
            (_, Some(exception)) => write!(f, "{exception}"),
            _ if self.was_killed => f.write_str("process was killed"),
            _ => write!(f, "exit code {}", self.exit_code),
        }
    }
}

/// [`ExecResult`] plus a value parsed from (or attached to) it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedResult<T> {
    result: ExecResult,
    value: Option<T>,
}

impl<T> TypedResult<T> {
    /// Status success plus a present value.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.result.success() && self.value.is_some()
    }

    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Consumes the result, returning the value.
    #[must_use]
    pub fn into_value(self) -> Option<T> {
        self.value
    }

    /// The untyped status this value was derived from.
    #[must_use]
    pub const fn status(&self) -> &ExecResult {
        &self.result
    }

    /// Same status, new reference.
    #[must_use]
    pub fn with_reference(self, reference: impl Into<PathBuf>) -> Self {
        Self {
            result: self.result.with_reference(reference),
            value: self.value,
        }
    }

    /// Same status, a different value.
    #[must_use]
    pub fn with_value<U>(self, value: Option<U>) -> TypedResult<U> {
        self.result.with_value(value)
    }

    /// Drops the value, keeping the status.
    #[must_use]
    pub fn without_value(self) -> ExecResult {
        self.result
    }
}

impl<T> fmt::Display for TypedResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.result, f)
    }
}
