// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process spawning behind the [`CommandGateway`](gateway::CommandGateway) seam.
//!
//! ```text
//! ProcessBuilder::new("git")
//!   .args() .cwd() .env()
//!       |
//!       v
//! CommandGateway::execute / execute_async
//!       |
//!       v  ProcessGateway
//! std/tokio Command, merged stdout+stderr, kill on cancel
//!       |
//!       v
//! ExecResult { exit_code, was_killed, exception, output }
//! ```

pub mod builder;
pub mod gateway;
mod io;
mod runner;
#[cfg(test)]
pub(crate) mod test_utils;

pub use builder::{ProcessBuilder, StreamFlags};
pub use gateway::{CommandGateway, ProcessGateway, SharedGateway};
