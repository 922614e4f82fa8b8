//! Background pre-processing.
//!
//! Warms a [`LeaderboardStore`] on a tokio blocking worker so the caller can
//! keep doing I/O while the pipeline runs, and hands the finished result to
//! a callback.

use std::sync::Arc;

use leaderboard_core::error::{LeaderboardError, Result};
use leaderboard_core::models::LeaderboardResult;
use tokio::task::JoinHandle;

use crate::store::LeaderboardStore;

/// Start computing `store` in the background and call `callback` with the
/// result.
///
/// When the store is already warm the callback runs immediately on the
/// calling thread. Must be called from within a tokio runtime.
pub fn pre_process<F>(store: Arc<LeaderboardStore>, callback: F) -> PreprocessHandle
where
    F: FnOnce(Arc<LeaderboardResult>) + Send + 'static,
{
    if let Some(result) = store.cached() {
        tracing::debug!("leaderboard already computed; invoking callback immediately");
        callback(Arc::clone(&result));
        return PreprocessHandle {
            handle: tokio::task::spawn_blocking(move || result),
        };
    }

    let handle = tokio::task::spawn_blocking(move || {
        let result = store.get();
        tracing::debug!(
            solvers = result.unique_solvers,
            puzzles = result.total_puzzles,
            "pre-processing finished"
        );
        callback(Arc::clone(&result));
        result
    });

    PreprocessHandle { handle }
}

// ── PreprocessHandle ──────────────────────────────────────────────────────────

/// A handle to a background pre-process task.
pub struct PreprocessHandle {
    handle: JoinHandle<Arc<LeaderboardResult>>,
}

impl PreprocessHandle {
    /// Abort the task.
    ///
    /// A computation that has already started runs to completion; only the
    /// wait on it is abandoned.
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Wait for the result.
    pub async fn wait(self) -> Result<Arc<LeaderboardResult>> {
        self.handle
            .await
            .map_err(|e| LeaderboardError::Other(e.into()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
