// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Terminal output: one header row per repository, then in-place updates.
//!
//! ```text
//! live                                  verbose
//! ----                                  -------
//! path branch ...      <- header        path branch up to date
//! lib/a main   clean ↑1                   <raw git output, dim>
//!       ^ column advances per fragment  lib/a main clean
//!
//! write = lock --> MoveTo(column, row) --> print --> column += n --> flush
//! ```
//!
//! Row and column bookkeeping lives on each [`RepositoryTarget`]; the
//! renderer holds the only handle to the output stream. Write failures are
//! logged and otherwise ignored: a broken terminal never fails a repository.

pub mod rows;
#[cfg(test)]
pub(crate) mod test_utils;

use std::io::{self, IsTerminal, Write};
use std::sync::{Mutex, PoisonError};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Print, PrintStyledContent, StyledContent, Stylize};
use crossterm::terminal::{Clear, ClearType};
use tracing::debug;

use crate::classify::ClassifiedOutcome;
use crate::core::result::{ExecResult, TypedResult};
use crate::git::{CommitPosition, RepositoryTarget};

pub use rows::{RowBlock, allocate_rows};

/// Activity placeholder, cleared before the first status fragment.
const ACTIVITY: &str = " ...";

/// How output is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Concurrent, cursor-addressed updates on assigned rows.
    Live,
    /// Sequential lines with raw git output, no cursor movement.
    Verbose,
}

/// Cursor row and window height at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub cursor_row: u16,
    pub height: u16,
}

impl Viewport {
    /// Queries the real terminal; `None` when stdout is not one.
    #[must_use]
    pub fn probe() -> Option<Self> {
        if !io::stdout().is_terminal() {
            return None;
        }
        let (_, cursor_row) = crossterm::cursor::position()
            .map_err(|e| debug!(error = %e, "cursor position query failed"))
            .ok()?;
        let (_, height) = crossterm::terminal::size()
            .map_err(|e| debug!(error = %e, "terminal size query failed"))
            .ok()?;
        Some(Self { cursor_row, height })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Plain,
    Dim,
    Red,
    Green,
    Yellow,
    Blue,
}

impl Style {
    fn apply(self, text: String) -> StyledContent<String> {
        match self {
            Self::Plain => text.stylize(),
            Self::Dim => text.dim(),
            Self::Red => text.red(),
            Self::Green => text.green(),
            Self::Yellow => text.yellow(),
            Self::Blue => text.blue(),
        }
    }
}

/// Text written after a single space separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    text: String,
    style: Style,
}

impl Fragment {
    #[must_use]
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn style(&self) -> Style {
        self.style
    }

    /// Red for errors, green for notable changes, dim otherwise.
    #[must_use]
    pub fn from_outcome(outcome: &ClassifiedOutcome) -> Self {
        let style = if outcome.is_error {
            Style::Red
        } else if outcome.is_notable {
            Style::Green
        } else {
            Style::Dim
        };
        Self::new(outcome.message.clone(), style)
    }

    fn width(&self) -> u16 {
        u16::try_from(self.text.chars().count() + 1).unwrap_or(u16::MAX)
    }
}

fn width_of(text: &str) -> u16 {
    u16::try_from(text.chars().count()).unwrap_or(u16::MAX)
}

fn excerpt(text: &str) -> &str {
    text.lines().map(str::trim).find(|line| !line.is_empty()).unwrap_or_default()
}

/// Owns the output stream and serializes every write to it.
pub struct TerminalRenderer {
    out: Mutex<Box<dyn Write + Send>>,
    viewport: Option<Viewport>,
}

impl std::fmt::Debug for TerminalRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalRenderer")
            .field("viewport", &self.viewport)
            .finish_non_exhaustive()
    }
}

impl TerminalRenderer {
    /// Live renderer positioned relative to `viewport`.
    #[must_use]
    pub fn live(out: Box<dyn Write + Send>, viewport: Viewport) -> Self {
        Self {
            out: Mutex::new(out),
            viewport: Some(viewport),
        }
    }

    #[must_use]
    pub fn verbose(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
            viewport: None,
        }
    }

    /// Renderer on stdout. Live output needs a terminal that answers the
    /// cursor query; anything else falls back to verbose.
    #[must_use]
    pub fn stdout(verbose: bool) -> Self {
        let out: Box<dyn Write + Send> = Box::new(io::stdout());
        if verbose {
            return Self::verbose(out);
        }
        match Viewport::probe() {
            Some(viewport) => Self::live(out, viewport),
            None => {
                debug!("no interactive terminal, using verbose output");
                Self::verbose(out)
            }
        }
    }

    #[must_use]
    pub const fn mode(&self) -> RenderMode {
        if self.viewport.is_some() {
            RenderMode::Live
        } else {
            RenderMode::Verbose
        }
    }

    #[must_use]
    pub const fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    const fn is_live(&self) -> bool {
        self.viewport.is_some()
    }

    /// Runs `f` with the stream locked, then flushes.
    fn with_output(&self, f: impl FnOnce(&mut Box<dyn Write + Send>) -> io::Result<()>) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = f(&mut *out).and_then(|()| out.flush()) {
            debug!(error = %e, "terminal write failed");
        }
    }

    /// Writes the path and branch (or the discovery error) on a new line.
    ///
    /// In live mode the line is terminated right away, optionally ending in
    /// the activity placeholder; verbose lines stay open until
    /// [`end_line`](Self::end_line).
    pub fn write_header(&self, repo: &mut RepositoryTarget, with_activity: bool) {
        let live = self.is_live();
        let path = repo.relative_path().to_string();
        let mut column = width_of(&path);
        let mut tail: Vec<Fragment> = Vec::new();

        match (repo.current_branch(), repo.error_message()) {
            (Some(branch), _) => {
                let style = if repo.on_default_branch() {
                    Style::Dim
                } else {
                    Style::Blue
                };
                let branch = Fragment::new(branch, style);
                column = column.saturating_add(branch.width());
                tail.push(branch);
            }
            (None, message) => {
                let detail = message.map(excerpt).filter(|m| !m.is_empty()).map_or_else(
                    || excerpt(&repo.path().display().to_string()).to_string(),
                    str::to_string,
                );
                let error = Fragment::new("discovery error", Style::Red);
                let detail = Fragment::new(format!("({detail})"), Style::Dim);
                column = column
                    .saturating_add(error.width())
                    .saturating_add(detail.width());
                tail.push(error);
                tail.push(detail);
            }
        }
        repo.screen_column = column;

        let activity = live && with_activity && repo.is_healthy();
        self.with_output(|out| {
            queue!(out, Print(&path))?;
            for fragment in &tail {
                queue!(
                    out,
                    PrintStyledContent(fragment.style.apply(format!(" {}", fragment.text)))
                )?;
            }
            if activity {
                queue!(out, PrintStyledContent(ACTIVITY.dim()))?;
            }
            if live {
                queue!(out, Print("\n"))?;
            }
            Ok(())
        });
    }

    /// Positioned partial write: `" " + text` at the repository's column.
    pub fn write_fragment(&self, repo: &mut RepositoryTarget, fragment: &Fragment) {
        self.put_fragment(repo, fragment, false);
    }

    /// Like [`write_fragment`](Self::write_fragment), then blanks the rest
    /// of the row in live mode.
    pub fn replace_tail(&self, repo: &mut RepositoryTarget, fragment: &Fragment) {
        self.put_fragment(repo, fragment, true);
    }

    fn put_fragment(&self, repo: &mut RepositoryTarget, fragment: &Fragment, clear_tail: bool) {
        let (column, row) = (repo.screen_column, repo.screen_row);
        let live = self.is_live();
        self.with_output(|out| {
            if live {
                queue!(out, MoveTo(column, row))?;
            }
            queue!(
                out,
                PrintStyledContent(fragment.style.apply(format!(" {}", fragment.text)))
            )?;
            if live && clear_tail {
                queue!(out, Clear(ClearType::UntilNewLine))?;
            }
            Ok(())
        });
        repo.screen_column = column.saturating_add(fragment.width());
    }

    pub fn write_outcome(&self, repo: &mut RepositoryTarget, outcome: &ClassifiedOutcome) {
        self.write_fragment(repo, &Fragment::from_outcome(outcome));
    }

    /// Porcelain status: blank means clean.
    pub fn write_status(&self, repo: &mut RepositoryTarget, status: &ExecResult) {
        let fragment = if !status.success() {
            Fragment::new("status error", Style::Red)
        } else if status.output_or_empty().trim().is_empty() {
            Fragment::new("clean", Style::Green)
        } else {
            Fragment::new("local changes", Style::Yellow)
        };
        self.write_fragment(repo, &fragment);
    }

    /// `↑ahead` then `↓behind`; nothing when level with the remote.
    pub fn write_commit_position(
        &self,
        repo: &mut RepositoryTarget,
        position: &TypedResult<CommitPosition>,
    ) {
        let Some(position) = position.value().filter(|_| position.success()) else {
            self.write_fragment(repo, &Fragment::new("position error", Style::Red));
            return;
        };
        if position.ahead > 0 {
            self.write_fragment(repo, &Fragment::new(format!("↑{}", position.ahead), Style::Green));
        }
        if position.behind > 0 {
            self.write_fragment(
                repo,
                &Fragment::new(format!("↓{}", position.behind), Style::Yellow),
            );
        }
    }

    /// Shows the activity placeholder without moving the column.
    pub fn write_activity(&self, repo: &RepositoryTarget) {
        if !self.is_live() {
            return;
        }
        let (column, row) = (repo.screen_column, repo.screen_row);
        self.with_output(|out| queue!(out, MoveTo(column, row), PrintStyledContent(ACTIVITY.dim())));
    }

    /// Blanks the activity placeholder; the column stays where it was.
    pub fn clear_activity(&self, repo: &RepositoryTarget, restore_cursor: bool) {
        if !self.is_live() {
            return;
        }
        let (column, row) = (repo.screen_column, repo.screen_row);
        let blanks = " ".repeat(ACTIVITY.len());
        self.with_output(|out| {
            queue!(out, MoveTo(column, row), Print(&blanks))?;
            if restore_cursor {
                queue!(out, MoveTo(column, row))?;
            }
            Ok(())
        });
    }

    /// Verbose mode: raw command output, dimmed, on its own lines.
    pub fn write_raw_output(&self, text: &str) {
        if self.is_live() || text.trim().is_empty() {
            return;
        }
        self.with_output(|out| {
            for line in text.lines() {
                queue!(out, PrintStyledContent(line.dim()), Print("\n"))?;
            }
            Ok(())
        });
    }

    /// Verbose mode: terminates the header line.
    pub fn end_line(&self) {
        if self.is_live() {
            return;
        }
        self.with_output(|out| queue!(out, Print("\n")));
    }

    /// Moves to column 0 of `row`, below the dashboard.
    pub fn park_cursor(&self, row: u16) {
        if !self.is_live() {
            return;
        }
        self.with_output(|out| queue!(out, MoveTo(0, row)));
    }
}
