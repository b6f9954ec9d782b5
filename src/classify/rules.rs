// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-operation rule tables.
//!
//! Needles of case-insensitive matchers are written in lowercase; they are
//! compared against the lowercased output.

use std::sync::LazyLock;

use regex::Regex;

use super::{Category, ClassifiedOutcome};
use crate::git::OperationKind;

static BRANCH_NAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"Switched to (?:a new )?branch '([^']+)'").ok());
static HEAD_HASH: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"HEAD is now at ([0-9a-f]{4,40})").ok());
static SET_TO: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"set to ([^ \r\n]+)").ok());
static POINTS_TO: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"points to '([^']+)'").ok());

#[derive(Debug, Clone, Copy)]
pub(super) enum Matcher {
    /// Case-insensitive substring.
    Contains(&'static str),
    /// Case-sensitive substring.
    Exact(&'static str),
    /// Any of several case-insensitive substrings.
    AnyOf(&'static [&'static str]),
    /// Blank output.
    Empty,
}

impl Matcher {
    fn is_match(self, output: &str, lowered: &str) -> bool {
        match self {
            Self::Contains(needle) => lowered.contains(needle),
            Self::Exact(needle) => output.contains(needle),
            Self::AnyOf(needles) => needles.iter().any(|needle| lowered.contains(needle)),
            Self::Empty => output.trim().is_empty(),
        }
    }
}

/// Detail pulled out of the output to replace the rule's generic message.
#[derive(Debug, Clone, Copy)]
pub(super) enum Detail {
    SwitchedTo,
    NewBranch,
    DetachedAt,
    ResetTo,
    SetTo,
    PointsTo,
    WouldRemove,
    Removed,
}

fn capture<'a>(regex: &LazyLock<Option<Regex>>, output: &'a str) -> Option<&'a str> {
    regex
        .as_ref()?
        .captures(output)?
        .get(1)
        .map(|m| m.as_str())
}

fn count_lines(output: &str, prefix: &str) -> usize {
    output
        .lines()
        .filter(|line| line.trim_start().starts_with(prefix))
        .count()
}

impl Detail {
    fn render(self, output: &str) -> Option<String> {
        match self {
            Self::SwitchedTo => capture(&BRANCH_NAME, output).map(|b| format!("switched to {b}")),
            Self::NewBranch => {
                capture(&BRANCH_NAME, output).map(|b| format!("switched to new branch {b}"))
            }
            Self::DetachedAt => capture(&HEAD_HASH, output).map(|h| format!("detached at {h}")),
            Self::ResetTo => capture(&HEAD_HASH, output).map(|h| format!("reset to {h}")),
            Self::SetTo => capture(&SET_TO, output).map(|r| format!("set to {r}")),
            Self::PointsTo => capture(&POINTS_TO, output).map(|r| format!("set to {r}")),
            Self::WouldRemove => match count_lines(output, "Would remove ") {
                0 => None,
                n => Some(format!("would clean {n}")),
            },
            Self::Removed => match count_lines(output, "Removing ") {
                0 => None,
                1 => Some("cleaned 1 file".to_string()),
                n => Some(format!("cleaned {n} files")),
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(super) struct Rule {
    matcher: Matcher,
    category: Category,
    message: &'static str,
    is_error: bool,
    is_notable: bool,
    requires_success: bool,
    detail: Option<Detail>,
}

const fn rule(matcher: Matcher, category: Category, message: &'static str) -> Rule {
    Rule {
        matcher,
        category,
        message,
        is_error: false,
        is_notable: false,
        requires_success: false,
        detail: None,
    }
}

impl Rule {
    const fn error(mut self) -> Self {
        self.is_error = true;
        self
    }

    const fn notable(mut self) -> Self {
        self.is_notable = true;
        self
    }

    const fn on_success(mut self) -> Self {
        self.requires_success = true;
        self
    }

    const fn detail(mut self, detail: Detail) -> Self {
        self.detail = Some(detail);
        self
    }

    pub(super) fn matches(&self, output: &str, lowered: &str, success: bool) -> bool {
        (success || !self.requires_success) && self.matcher.is_match(output, lowered)
    }

    pub(super) fn outcome(&self, output: &str) -> ClassifiedOutcome {
        let message = self
            .detail
            .and_then(|detail| detail.render(output))
            .unwrap_or_else(|| self.message.to_string());
        ClassifiedOutcome {
            category: self.category,
            message,
            is_error: self.is_error,
            is_notable: self.is_notable,
        }
    }
}

const ERROR: Rule = rule(Matcher::Contains("error: "), Category::Error, "error").error();
const FATAL: Rule = rule(Matcher::Contains("fatal: "), Category::Fatal, "fatal").error();

static PULL: &[Rule] = &[
    rule(Matcher::Contains("already up to date"), Category::Unchanged, "up to date"),
    rule(Matcher::Exact("CONFLICT "), Category::Conflict, "conflict").error(),
    rule(Matcher::Contains("merge conflict"), Category::Conflict, "conflict").error(),
    rule(
        Matcher::Contains("would be overwritten"),
        Category::WouldOverwrite,
        "local changes would be overwritten",
    )
    .error(),
    rule(
        Matcher::Contains("no tracking information for the current branch"),
        Category::NoTracking,
        "no tracking information",
    )
    .error(),
    rule(Matcher::Contains("no such ref was fetched"), Category::NoRemote, "no remote").error(),
    rule(Matcher::Contains("couldn't find remote ref"), Category::NoRemote, "no remote").error(),
    rule(Matcher::Exact("Aborting"), Category::Aborted, "aborted").error(),
    ERROR,
    FATAL,
    rule(
        Matcher::AnyOf(&["fast-forward", "merge made", "applying: "]),
        Category::Success,
        "pulled",
    )
    .notable()
    .on_success(),
];

static CHECKOUT: &[Rule] = &[
    rule(Matcher::Contains("already on"), Category::Unchanged, "already on branch"),
    rule(
        Matcher::Contains("switched to a new branch"),
        Category::Success,
        "switched to new branch",
    )
    .notable()
    .detail(Detail::NewBranch),
    rule(Matcher::Contains("switched to branch"), Category::Success, "switched")
        .notable()
        .detail(Detail::SwitchedTo),
    rule(Matcher::Contains("did not match"), Category::NoMatch, "no match").error(),
    ERROR,
    FATAL,
    rule(Matcher::Contains("head is now at"), Category::Success, "detached")
        .notable()
        .on_success()
        .detail(Detail::DetachedAt),
];

static CLEAN: &[Rule] = &[
    ERROR,
    FATAL,
    rule(Matcher::Exact("Would remove "), Category::Success, "would clean")
        .notable()
        .on_success()
        .detail(Detail::WouldRemove),
    rule(Matcher::Exact("Removing "), Category::Success, "cleaned")
        .notable()
        .on_success()
        .detail(Detail::Removed),
    rule(Matcher::Empty, Category::Unchanged, "nothing to clean").on_success(),
];

static RESET: &[Rule] = &[
    ERROR,
    FATAL,
    rule(Matcher::Contains("head is now at"), Category::Success, "reset")
        .notable()
        .on_success()
        .detail(Detail::ResetTo),
    rule(Matcher::Contains("unstaged changes after reset"), Category::Success, "reset")
        .notable()
        .on_success(),
    rule(Matcher::Empty, Category::Success, "reset").on_success(),
];

static FETCH: &[Rule] = &[
    rule(Matcher::Contains("couldn't find remote ref"), Category::NoRemote, "no remote").error(),
    ERROR,
    FATAL,
    rule(Matcher::Empty, Category::Unchanged, "fetched").on_success(),
    rule(Matcher::Contains("->"), Category::Success, "fetched")
        .notable()
        .on_success(),
];

// `remote set-head --auto` reports "<r>/HEAD set to <b>" before git 2.48 and
// "'<r>/HEAD' is unchanged and points to '<b>'" (or "... now points to ...")
// after.
static SET_HEAD: &[Rule] = &[
    ERROR,
    FATAL,
    rule(Matcher::AnyOf(&["now points to", "is now created"]), Category::Success, "set")
        .notable()
        .on_success()
        .detail(Detail::PointsTo),
    rule(Matcher::Contains("unchanged"), Category::Unchanged, "unchanged").on_success(),
    rule(Matcher::Contains("set to "), Category::Success, "set")
        .notable()
        .on_success()
        .detail(Detail::SetTo),
];

/// Rules for `kind`, in evaluation order. Empty for read-only lookups.
pub(super) fn table(kind: OperationKind) -> &'static [Rule] {
    match kind {
        OperationKind::Pull => PULL,
        OperationKind::Checkout => CHECKOUT,
        OperationKind::Clean => CLEAN,
        OperationKind::Reset => RESET,
        OperationKind::Fetch => FETCH,
        OperationKind::SetHead => SET_HEAD,
        OperationKind::Status
        | OperationKind::FullStatus
        | OperationKind::CommitPosition
        | OperationKind::Branches
        | OperationKind::CurrentBranch
        | OperationKind::DefaultBranch => &[],
    }
}
