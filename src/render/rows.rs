// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Row assignment for the live dashboard.
//!
//! ```text
//! fits:      R + N < H   rows [R, R+N)
//!
//! overflow:  rows [H-N-1, H-1); printing N header lines from the bottom
//!            scrolls the screen so the block lands exactly there and the
//!            cursor rests on row H-1
//! ```

/// Contiguous rows, one per repository, in input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBlock {
    first: u16,
    len: u16,
}

impl RowBlock {
    #[must_use]
    pub const fn first(&self) -> u16 {
        self.first
    }

    #[must_use]
    pub const fn len(&self) -> u16 {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Row of the `index`-th repository.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<u16> {
        let index = u16::try_from(index).ok()?;
        (index < self.len).then(|| self.first.saturating_add(index))
    }

    pub fn rows(&self) -> impl Iterator<Item = u16> + use<> {
        let first = self.first;
        (0..self.len).map(move |i| first.saturating_add(i))
    }

    /// The row just below the block; the cursor is parked here at the end.
    #[must_use]
    pub const fn next_row(&self) -> u16 {
        self.first.saturating_add(self.len)
    }
}

/// Assigns `count` rows starting at the cursor, shifted up when they would
/// run past the bottom of a `window_height` high window.
#[must_use]
pub fn allocate_rows(count: usize, cursor_row: u16, window_height: u16) -> RowBlock {
    let len = u16::try_from(count).unwrap_or(u16::MAX);
    let first = if u32::from(cursor_row) + u32::from(len) < u32::from(window_height) {
        cursor_row
    } else {
        window_height.saturating_sub(len).saturating_sub(1)
    };
    RowBlock { first, len }
}
