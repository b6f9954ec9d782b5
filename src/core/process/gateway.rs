// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The one place external commands are executed.
//!
//! Everything above this layer talks to `dyn CommandGateway`, so tests swap
//! in a scripted gateway and never touch a real process.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use super::builder::ProcessBuilder;
use crate::core::result::ExecResult;

/// Shared handle to a gateway.
pub type SharedGateway = Arc<dyn CommandGateway>;

/// Executes command requests and reports their outcome as an [`ExecResult`].
///
/// Implementations never fail: a missing executable, a denied spawn or a kill
/// are all reported inside the result.
pub trait CommandGateway: Send + Sync {
    /// Runs `request`, blocking the calling thread until it finishes.
    fn execute(&self, request: &ProcessBuilder, token: &CancellationToken) -> ExecResult;

    /// Runs `request` asynchronously.
    fn execute_async(
        &self,
        request: ProcessBuilder,
        token: CancellationToken,
    ) -> BoxFuture<'_, ExecResult>;
}

/// Gateway backed by real OS processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessGateway;

impl ProcessGateway {
    #[must_use]
    pub fn shared() -> SharedGateway {
        Arc::new(Self)
    }
}

impl CommandGateway for ProcessGateway {
    fn execute(&self, request: &ProcessBuilder, token: &CancellationToken) -> ExecResult {
        request.run_blocking(token)
    }

    fn execute_async(
        &self,
        request: ProcessBuilder,
        token: CancellationToken,
    ) -> BoxFuture<'_, ExecResult> {
        Box::pin(request.run(token))
    }
}
