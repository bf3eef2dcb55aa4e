//! Task event entity — an append-only audit record of scheduler activity.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::task::TaskId;

crate::define_id!(TaskEventId, "Stable identifier for a task event record.");

/// Closed set of event kinds the scheduler appends to the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskEventKind {
    /// A task was created.
    Created,
    /// A `blocks`/`suggests`/`relates_to` dependency edge was added.
    DependencyAdded,
    /// A task was split into subtasks via `decompose`.
    Decomposed,
    /// A task's status changed, outside the executor's own lifecycle events.
    StatusChanged,
    /// A failed task was reset back to `pending` via `rollback`.
    TaskRolledBack,
    ExecutionStarted,
    ExecutionCompleted,
    ExecutionFailed,
    ExecutionPaused,
    ExecutionResumed,
    GroupStarted,
    GroupCompleted,
    TaskStarted,
    TaskCompleted,
    TaskFailed,
    TaskCancelled,
}

/// A single append-only entry in the execution audit trail.
///
/// `task_id` is `None` for execution-scoped events (`execution:*`) that are
/// not tied to a single task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskEvent {
    /// Stable identifier.
    pub id: TaskEventId,
    /// Task this event pertains to, if any.
    pub task_id: Option<TaskId>,
    /// Event kind.
    pub kind: TaskEventKind,
    /// Human-readable summary.
    pub message: String,
    /// Structured detail (e.g. previous/next status, error text).
    pub metadata: serde_json::Value,
    /// Timestamp (Unix epoch seconds).
    pub occurred_at: i64,
}

impl TaskEvent {
    /// Construct an event with no structured metadata.
    #[must_use]
    pub fn new(
        task_id: Option<TaskId>,
        kind: TaskEventKind,
        message: impl Into<String>,
        now: i64,
    ) -> Self {
        Self {
            id: TaskEventId::new(),
            task_id,
            kind,
            message: message.into(),
            metadata: serde_json::Value::Null,
            occurred_at: now,
        }
    }

    /// Construct an event carrying structured metadata.
    #[must_use]
    pub fn with_metadata(
        task_id: Option<TaskId>,
        kind: TaskEventKind,
        message: impl Into<String>,
        metadata: serde_json::Value,
        now: i64,
    ) -> Self {
        Self {
            id: TaskEventId::new(),
            task_id,
            kind,
            message: message.into(),
            metadata,
            occurred_at: now,
        }
    }
}
