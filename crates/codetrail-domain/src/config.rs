//! Configuration value objects for the task executor and LSP client.
//!
//! These are populated by `codetrail-server` from TOML/env layers (see the
//! configuration section of the design docs) and threaded down into the
//! infrastructure layer as plain values — no config type ever crosses into
//! `codetrail-domain`'s own logic beyond being a data holder.

use serde::{Deserialize, Serialize};

/// Tunables for the parallel task executor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Maximum number of tasks executed concurrently, clamped to `1..=64`.
    pub max_concurrency: u32,
    /// Whether execution begins automatically once a task graph has ready
    /// tasks, rather than waiting for an explicit start call.
    pub auto_start: bool,
    /// Whether a failed task halts the remaining execution, rather than
    /// letting independent branches continue.
    pub stop_on_error: bool,
    /// Whether a failed task's partial effects are rolled back automatically.
    pub enable_rollback: bool,
    /// Per-task execution timeout, in milliseconds.
    pub task_timeout_ms: u64,
    /// Per-request timeout for LSP calls, in milliseconds.
    pub lsp_timeout_ms: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 3,
            auto_start: true,
            stop_on_error: true,
            enable_rollback: true,
            task_timeout_ms: 300_000,
            lsp_timeout_ms: 30_000,
        }
    }
}

impl ExecutorConfig {
    /// Clamp `max_concurrency` into the supported `1..=64` range.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.max_concurrency = self.max_concurrency.clamp(1, 64);
        self
    }
}
