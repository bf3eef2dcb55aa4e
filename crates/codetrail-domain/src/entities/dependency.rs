//! Dependency entity — a directed edge between two tasks.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::task::TaskId;

/// Semantics of a directed edge between two tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DependencyType {
    /// `depends_on` must reach `done` before `task_id` can become `ready`.
    Blocks,
    /// Informational ordering hint; does not gate scheduling.
    Suggests,
    /// Non-ordering association, carried for traceability only.
    RelatesTo,
}

/// A directed edge from `task_id` to `depends_on`.
///
/// Only `Blocks` edges participate in readiness computation, cycle detection
/// and critical-path analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependency {
    /// The dependent task.
    pub task_id: TaskId,
    /// The task it depends on.
    pub depends_on: TaskId,
    /// Edge semantics.
    pub dependency_type: DependencyType,
}

impl Dependency {
    /// Construct a `Blocks` edge, the common case.
    #[must_use]
    pub fn blocks(task_id: TaskId, depends_on: TaskId) -> Self {
        Self {
            task_id,
            depends_on,
            dependency_type: DependencyType::Blocks,
        }
    }
}
