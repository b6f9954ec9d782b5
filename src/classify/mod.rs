// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Turns raw command results into short, colored outcomes.
//!
//! ```text
//! ExecResult
//!    |
//!    +-- killed? ----------------> Killed
//!    +-- start failure? ---------> NotFound | AccessDenied | StartFailed
//!    |
//!    v
//! rules::table(kind), top to bottom, first match wins
//!    |
//!    +-- no match ---------------> Unknown (error, even on exit 0)
//!    v
//! ClassifiedOutcome { category, message, is_error, is_notable }
//! ```
//!
//! Classification is pure: the same result always yields the same outcome.

mod rules;

use std::fmt;

use crate::core::result::ExecResult;
use crate::error::ProcessStartFailure;
use crate::git::OperationKind;

/// Semantic bucket of an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Unchanged,
    Success,
    Conflict,
    WouldOverwrite,
    NoTracking,
    NoRemote,
    NoMatch,
    Aborted,
    Error,
    Fatal,
    Killed,
    NotFound,
    AccessDenied,
    StartFailed,
    Unknown,
}

impl Category {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::Success => "success",
            Self::Conflict => "conflict",
            Self::WouldOverwrite => "would-overwrite",
            Self::NoTracking => "no-tracking",
            Self::NoRemote => "no-remote",
            Self::NoMatch => "no-match",
            Self::Aborted => "aborted",
            Self::Error => "error",
            Self::Fatal => "fatal",
            Self::Killed => "killed",
            Self::NotFound => "not-found",
            Self::AccessDenied => "access-denied",
            Self::StartFailed => "start-failed",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a command's result means, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedOutcome {
    pub category: Category,
    pub message: String,
    pub is_error: bool,
    pub is_notable: bool,
}

impl ClassifiedOutcome {
    fn error(category: Category, message: &str) -> Self {
        Self {
            category,
            message: message.to_string(),
            is_error: true,
            is_notable: false,
        }
    }
}

impl fmt::Display for ClassifiedOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Classifies the result of one `kind` operation.
///
/// Total over every kind and result. Operations without a rule table (and
/// outputs no rule recognizes) come back as an `Unknown` error.
#[must_use]
pub fn classify(kind: OperationKind, result: &ExecResult) -> ClassifiedOutcome {
    if result.was_killed() {
        return ClassifiedOutcome::error(Category::Killed, "killed");
    }
    if let Some(failure) = result.start_failure() {
        return match failure {
            ProcessStartFailure::NotFound { .. } => {
                ClassifiedOutcome::error(Category::NotFound, "not found")
            }
            ProcessStartFailure::AccessDenied { .. } => {
                ClassifiedOutcome::error(Category::AccessDenied, "access denied")
            }
            ProcessStartFailure::Other { .. } => {
                ClassifiedOutcome::error(Category::StartFailed, "start failed")
            }
        };
    }
    if result.exception().is_some() {
        return ClassifiedOutcome::error(Category::Error, "process error");
    }

    let output = result.output_or_empty();
    let lowered = output.to_lowercase();
    let success = result.success();

    rules::table(kind)
        .iter()
        .find(|rule| rule.matches(output, &lowered, success))
        .map_or_else(
            || ClassifiedOutcome::error(Category::Unknown, "unknown"),
            |rule| rule.outcome(output),
        )
}
