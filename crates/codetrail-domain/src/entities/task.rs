//! Task entity — a unit of work in the dependency-ordered task graph.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

crate::define_id!(TaskId, "Stable identifier for a task.");

/// Task lifecycle status.
///
/// Transitions are enforced by the application layer's state machine, not by
/// this type; see the status transition table in the design docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created, but one or more of its dependencies are not yet `done`.
    Pending,
    /// All dependencies are `done`; eligible to start.
    Ready,
    /// Currently executing.
    InProgress,
    /// Manually paused or waiting on an external condition.
    Blocked,
    /// Execution raised an error; eligible for `rollback` or a retry.
    Failed,
    /// Completed successfully.
    Done,
    /// Withdrawn; excluded from scheduling and critical-path computation.
    Cancelled,
}

impl TaskStatus {
    /// Whether this status is a terminal state the scheduler will not revisit
    /// on its own.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Cancelled)
    }
}

/// Coarse category of work a task represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Feature,
    Bug,
    Test,
    Refactor,
    Doc,
}

/// Rough size estimate used for scheduling heuristics and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Trivial,
    Simple,
    Moderate,
    Complex,
}

/// A unit of work tracked and scheduled by the task graph engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Stable identifier.
    pub id: TaskId,
    /// Parent task, when this task was produced by decomposition.
    pub parent_id: Option<TaskId>,
    /// Short human-readable title.
    pub title: String,
    /// Longer free-form description.
    pub description: String,
    /// Category of work.
    pub task_type: TaskType,
    /// Current lifecycle status.
    pub status: TaskStatus,
    /// Scheduling priority; higher runs first among otherwise-ready tasks.
    pub priority: i32,
    /// Size estimate.
    pub complexity: Complexity,
    /// Estimated effort in minutes, if supplied.
    pub estimated_effort_minutes: Option<i64>,
    /// Actual effort in minutes, recorded on completion.
    pub actual_effort_minutes: Option<i64>,
    /// Whether this task must pass a test gate before being marked `done`.
    pub test_required: bool,
    /// Free-form structured metadata (e.g. affected files, owning module).
    pub metadata: serde_json::Value,
    /// Creation timestamp (Unix epoch seconds).
    pub created_at: i64,
    /// Timestamp the task entered `in_progress`, if it has.
    pub started_at: Option<i64>,
    /// Timestamp the task reached a terminal status, if it has.
    pub completed_at: Option<i64>,
}

impl Task {
    /// Construct a new, pending task.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>, now: i64) -> Self {
        Self {
            id: TaskId::new(),
            parent_id: None,
            title: title.into(),
            description: description.into(),
            task_type: TaskType::Feature,
            status: TaskStatus::Pending,
            priority: 0,
            complexity: Complexity::Moderate,
            estimated_effort_minutes: None,
            actual_effort_minutes: None,
            test_required: false,
            metadata: serde_json::Value::Null,
            created_at: now,
            started_at: None,
            completed_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_is_pending() {
        let task = Task::new("Add retry logic", "", 1_700_000_000);
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.started_at.is_none());
    }

    #[test]
    fn terminal_statuses() {
        assert!(TaskStatus::Done.is_terminal());
        assert!(TaskStatus::Cancelled.is_terminal());
        assert!(!TaskStatus::Blocked.is_terminal());
        assert!(!TaskStatus::Ready.is_terminal());
    }

    #[test]
    fn complexity_orders_by_size() {
        assert!(Complexity::Trivial < Complexity::Simple);
        assert!(Complexity::Moderate < Complexity::Complex);
    }
}
