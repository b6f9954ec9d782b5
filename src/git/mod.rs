// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git repositories and the operations run on them.
//!
//! ```text
//!   discovery.rs            ops.rs
//!  walk + .gitmodules     Git { gateway, remote, token }
//!        |                   |   status/pull/checkout/...
//!        v                   v
//!  RepositoryTarget  <--  ExecResult / TypedResult<T>
//!   (repository.rs)          ^
//!                            |  parse
//!                        branch.rs
//!                  CommitPosition, GitBranch
//! ```
//!
//! Every git invocation goes through the
//! [`CommandGateway`](crate::core::process::CommandGateway), so results carry
//! the same kill and start-failure semantics everywhere.

pub mod branch;
pub mod discovery;
pub mod ops;
pub mod repository;

pub use branch::{CommitPosition, GitBranch};
pub use discovery::{DiscoveryOptions, discover};
pub use ops::{CleanFlags, DEFAULT_PROGRAM, DEFAULT_REMOTE, Git, ResetMode};
pub use repository::{OperationKind, RepositoryCandidate, RepositoryTarget};

#[cfg(test)]
mod tests;
