// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core modules for running external commands.
//!
//! ```text
//!           core
//!            |
//!      +-----+------+
//!      |            |
//!      v            v
//!   process       result
//!      |            |
//!   Builder      ExecResult
//!   Gateway      TypedResult
//! ```

pub mod process;
pub mod result;
