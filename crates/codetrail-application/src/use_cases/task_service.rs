//! Task graph engine use case: CRUD, the status state machine, dependency
//! management, scheduling views and the audit trail.

use std::sync::Arc;

use codetrail_domain::entities::{
    Complexity, Dependency, DependencyType, Task, TaskEvent, TaskEventKind, TaskId, TaskStatus,
    TaskType,
};
use codetrail_domain::error::{Error, Result};
use codetrail_domain::now_epoch_secs;
use codetrail_domain::ports::{TaskEventRepository, TaskRepository};
use codetrail_infrastructure::TaskGraph;
use serde_json::json;
use tracing::info;

use crate::dto::{CriticalPath, Issue, ParallelGroup};

/// Default estimated effort (minutes) used for critical-path weighting when a
/// task has none recorded.
const DEFAULT_EFFORT_MINUTES: i64 = 60;

/// Fields accepted when creating a task; everything else is derived.
#[derive(Debug, Clone, Default)]
pub struct TaskInput {
    /// Short human-readable title.
    pub title: String,
    /// Longer free-form description.
    pub description: String,
    /// Category of work; defaults to [`TaskType::Feature`].
    pub task_type: Option<TaskType>,
    /// Scheduling priority; higher runs first among otherwise-ready tasks.
    pub priority: i32,
    /// Size estimate; defaults to [`Complexity::Moderate`].
    pub complexity: Option<Complexity>,
    /// Estimated effort in minutes.
    pub estimated_effort_minutes: Option<i64>,
    /// Whether this task must pass a test gate before `done`.
    pub test_required: bool,
    /// Free-form structured metadata.
    pub metadata: serde_json::Value,
}

/// Drives task CRUD, the status state machine, dependency management and the
/// scheduling views (`ready_tasks`, `execution_order`, `parallel_groups`,
/// `critical_path`, `validate`).
pub struct TaskService {
    tasks: Arc<dyn TaskRepository>,
    events: Arc<dyn TaskEventRepository>,
}

impl TaskService {
    /// Build the service over its two repository ports.
    #[must_use]
    pub fn new(tasks: Arc<dyn TaskRepository>, events: Arc<dyn TaskEventRepository>) -> Self {
        Self { tasks, events }
    }

    /// Create a task from `input`, validating required fields.
    pub async fn create_task(&self, input: TaskInput) -> Result<Task> {
        if input.title.trim().is_empty() {
            return Err(Error::validation("task title must not be empty"));
        }
        let now = now_epoch_secs();
        let mut task = Task::new(input.title, input.description, now);
        task.task_type = input.task_type.unwrap_or(TaskType::Feature);
        task.priority = input.priority;
        task.complexity = input.complexity.unwrap_or(Complexity::Moderate);
        task.estimated_effort_minutes = input.estimated_effort_minutes;
        task.test_required = input.test_required;
        task.metadata = input.metadata;

        self.tasks.upsert(&task).await?;
        self.emit(Some(task.id), TaskEventKind::Created, "task created", json!({})).await?;
        Ok(task)
    }

    /// Create several children of `parent_id` in one call.
    pub async fn decompose(&self, parent_id: TaskId, subtasks: Vec<TaskInput>) -> Result<Vec<Task>> {
        self.tasks.get(parent_id).await?;
        let mut children = Vec::with_capacity(subtasks.len());
        for input in subtasks {
            let mut task = self.create_task(input).await?;
            task.parent_id = Some(parent_id);
            self.tasks.upsert(&task).await?;
            children.push(task);
        }
        self.emit(
            Some(parent_id),
            TaskEventKind::Decomposed,
            format!("decomposed into {} subtasks", children.len()),
            json!({ "children": children.iter().map(|t| t.id.to_string()).collect::<Vec<_>>() }),
        )
        .await?;
        Ok(children)
    }

    /// Add a `dependency_type` edge from `task_id` to `depends_on`. Rejects a
    /// missing endpoint or, for `Blocks` edges, a cycle.
    pub async fn add_dependency(
        &self,
        task_id: TaskId,
        depends_on: TaskId,
        dependency_type: DependencyType,
    ) -> Result<()> {
        self.tasks.get(task_id).await?;
        self.tasks.get(depends_on).await?;

        if dependency_type == DependencyType::Blocks {
            let all_tasks = self.tasks.list().await?;
            let ids: Vec<TaskId> = all_tasks.iter().map(|t| t.id).collect();
            let existing = self.tasks.list_dependencies().await?;
            let graph = TaskGraph::build(&ids, &existing);
            if graph.would_cycle(task_id, depends_on) {
                return Err(Error::cycle_detected(format!(
                    "adding {depends_on} -> {task_id} would create a cycle"
                )));
            }
        }

        let dependency = Dependency { task_id, depends_on, dependency_type };
        self.tasks.add_dependency(&dependency).await?;
        self.emit(
            Some(task_id),
            TaskEventKind::DependencyAdded,
            format!("depends on {depends_on} ({dependency_type})"),
            json!({ "depends_on": depends_on.to_string(), "type": dependency_type.to_string() }),
        )
        .await?;
        Ok(())
    }

    /// Pending tasks whose every `blocks` dependency is `done`, sorted by
    /// priority descending then creation time ascending.
    pub async fn ready_tasks(&self) -> Result<Vec<Task>> {
        let all_tasks = self.tasks.list().await?;
        let dependencies = self.tasks.list_dependencies().await?;
        let done: std::collections::HashSet<TaskId> = all_tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Done)
            .map(|t| t.id)
            .collect();

        let mut ready: Vec<Task> = all_tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Pending)
            .filter(|t| {
                dependencies
                    .iter()
                    .filter(|d| d.task_id == t.id && d.dependency_type == DependencyType::Blocks)
                    .all(|d| done.contains(&d.depends_on))
            })
            .cloned()
            .collect();

        ready.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.created_at.cmp(&b.created_at)));
        Ok(ready)
    }

    /// Topological order over every non-terminal task.
    pub async fn execution_order(&self) -> Result<Vec<TaskId>> {
        let graph = self.non_terminal_graph().await?;
        graph.execution_order()
    }

    /// Tasks grouped into levels that can each run in parallel.
    pub async fn parallel_groups(&self) -> Result<Vec<ParallelGroup>> {
        let graph = self.non_terminal_graph().await?;
        let groups = graph.parallel_groups()?;
        Ok(groups
            .into_iter()
            .enumerate()
            .map(|(level, tasks)| ParallelGroup { level, tasks, can_run_in_parallel: true })
            .collect())
    }

    /// Longest dependency chain weighted by `estimated_effort_minutes`
    /// (default 60 when unset).
    pub async fn critical_path(&self) -> Result<CriticalPath> {
        let all_tasks = self.tasks.list().await?;
        let durations: std::collections::HashMap<TaskId, i64> = all_tasks
            .iter()
            .map(|t| (t.id, t.estimated_effort_minutes.unwrap_or(DEFAULT_EFFORT_MINUTES)))
            .collect();

        let graph = self.non_terminal_graph().await?;
        let path = graph.critical_path(|id| u32::try_from(durations.get(&id).copied().unwrap_or(DEFAULT_EFFORT_MINUTES)).unwrap_or(0))?;
        let total_effort_minutes = path.iter().map(|id| durations.get(id).copied().unwrap_or(DEFAULT_EFFORT_MINUTES)).sum();
        Ok(CriticalPath { tasks: path, total_effort_minutes })
    }

    /// Apply `new_status` to `task_id`, enforcing the §4.4.1 transition
    /// table. On `done`, unblocks dependents and auto-completes a parent
    /// whose children are all `done`.
    pub async fn update_status(
        &self,
        task_id: TaskId,
        new_status: TaskStatus,
        metadata: Option<serde_json::Value>,
    ) -> Result<Task> {
        let mut task = self.tasks.get(task_id).await?;
        if !allowed_transition(task.status, new_status) {
            return Err(Error::invalid_transition(format!(
                "cannot move task {task_id} from {} to {new_status}",
                task.status
            )));
        }

        let now = now_epoch_secs();
        let previous = task.status;
        task.status = new_status;
        match new_status {
            TaskStatus::InProgress => task.started_at = Some(now),
            TaskStatus::Done => {
                task.completed_at = Some(now);
                task.actual_effort_minutes = task
                    .started_at
                    .map(|started| ((now - started) / 60).max(0));
            }
            _ => {}
        }
        self.tasks.upsert(&task).await?;
        self.emit(
            Some(task_id),
            TaskEventKind::StatusChanged,
            format!("{previous} -> {new_status}"),
            metadata.unwrap_or(json!({})),
        )
        .await?;

        if new_status == TaskStatus::Done {
            self.unblock_dependents(task_id).await?;
            self.maybe_complete_parent(task.parent_id).await?;
        }
        Ok(task)
    }

    /// Reset a `failed` task back to `pending`, clearing its timestamps.
    pub async fn rollback(&self, task_id: TaskId) -> Result<Task> {
        let mut task = self.tasks.get(task_id).await?;
        if task.status != TaskStatus::Failed {
            return Err(Error::invalid_transition(format!(
                "rollback only applies to failed tasks, {task_id} is {}",
                task.status
            )));
        }
        task.status = TaskStatus::Pending;
        task.started_at = None;
        task.completed_at = None;
        task.actual_effort_minutes = None;
        self.tasks.upsert(&task).await?;
        self.emit(Some(task_id), TaskEventKind::TaskRolledBack, "task rolled back", json!({})).await?;
        Ok(task)
    }

    /// Structural problems in the task graph: orphaned edges, cycles and
    /// isolated tasks in a graph of two or more.
    pub async fn validate(&self) -> Result<Vec<Issue>> {
        let all_tasks = self.tasks.list().await?;
        let ids: std::collections::HashSet<TaskId> = all_tasks.iter().map(|t| t.id).collect();
        let dependencies = self.tasks.list_dependencies().await?;

        let mut issues = Vec::new();
        for dependency in &dependencies {
            if !ids.contains(&dependency.task_id) {
                issues.push(Issue::OrphanedEdge { missing: dependency.task_id });
            }
            if !ids.contains(&dependency.depends_on) {
                issues.push(Issue::OrphanedEdge { missing: dependency.depends_on });
            }
        }

        let id_list: Vec<TaskId> = all_tasks.iter().map(|t| t.id).collect();
        let graph = TaskGraph::build(&id_list, &dependencies);
        if graph.execution_order().is_err() {
            issues.push(Issue::Cycle { description: "blocks subgraph contains a cycle".to_string() });
        }

        if all_tasks.len() >= 2 {
            for task in &all_tasks {
                let has_edge = dependencies.iter().any(|d| d.task_id == task.id || d.depends_on == task.id);
                if !has_edge {
                    issues.push(Issue::IsolatedTask { task_id: task.id });
                }
            }
        }
        Ok(issues)
    }

    /// Full audit trail for a single task, oldest first.
    pub async fn events(&self, task_id: TaskId) -> Result<Vec<TaskEvent>> {
        self.events.list_for_task(task_id).await
    }

    async fn non_terminal_graph(&self) -> Result<TaskGraph> {
        let all_tasks = self.tasks.list().await?;
        let ids: Vec<TaskId> = all_tasks
            .iter()
            .filter(|t| !t.status.is_terminal())
            .map(|t| t.id)
            .collect();
        let dependencies = self.tasks.list_dependencies().await?;
        Ok(TaskGraph::build(&ids, &dependencies))
    }

    async fn unblock_dependents(&self, completed: TaskId) -> Result<()> {
        let all_tasks = self.tasks.list().await?;
        let dependencies = self.tasks.list_dependencies().await?;
        let done: std::collections::HashSet<TaskId> = all_tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Done)
            .map(|t| t.id)
            .collect();

        let dependents: Vec<TaskId> = dependencies
            .iter()
            .filter(|d| d.depends_on == completed && d.dependency_type == DependencyType::Blocks)
            .map(|d| d.task_id)
            .collect();

        for dependent_id in dependents {
            let Some(mut dependent) = all_tasks.iter().find(|t| t.id == dependent_id).cloned() else {
                continue;
            };
            if dependent.status != TaskStatus::Pending {
                continue;
            }
            let all_blocking_done = dependencies
                .iter()
                .filter(|d| d.task_id == dependent_id && d.dependency_type == DependencyType::Blocks)
                .all(|d| done.contains(&d.depends_on));
            if all_blocking_done {
                dependent.status = TaskStatus::Ready;
                self.tasks.upsert(&dependent).await?;
                self.emit(
                    Some(dependent_id),
                    TaskEventKind::StatusChanged,
                    "pending -> ready (dependencies satisfied)",
                    json!({}),
                )
                .await?;
            }
        }
        Ok(())
    }

    async fn maybe_complete_parent(&self, parent_id: Option<TaskId>) -> Result<()> {
        let Some(parent_id) = parent_id else { return Ok(()) };
        let children = self.tasks.list_children(parent_id).await?;
        if !children.is_empty() && children.iter().all(|c| c.status == TaskStatus::Done) {
            let mut parent = self.tasks.get(parent_id).await?;
            if parent.status != TaskStatus::Done {
                let now = now_epoch_secs();
                parent.status = TaskStatus::Done;
                parent.completed_at = Some(now);
                self.tasks.upsert(&parent).await?;
                self.emit(
                    Some(parent_id),
                    TaskEventKind::StatusChanged,
                    "auto-completed: all children done",
                    json!({}),
                )
                .await?;
                info!(%parent_id, "parent task auto-completed");
            }
        }
        Ok(())
    }

    async fn emit(
        &self,
        task_id: Option<TaskId>,
        kind: TaskEventKind,
        message: impl Into<String>,
        metadata: serde_json::Value,
    ) -> Result<()> {
        let event = TaskEvent::with_metadata(task_id, kind, message, metadata, now_epoch_secs());
        self.events.append(&event).await
    }
}

/// §4.4.1 status transition table.
fn allowed_transition(from: TaskStatus, to: TaskStatus) -> bool {
    use TaskStatus::{Blocked, Cancelled, Done, Failed, InProgress, Pending, Ready};
    matches!(
        (from, to),
        (Pending, Ready) | (Pending, InProgress) | (Pending, Blocked) | (Pending, Cancelled)
            | (Ready, InProgress) | (Ready, Blocked) | (Ready, Cancelled)
            | (InProgress, Done) | (InProgress, Failed) | (InProgress, Blocked)
            | (Blocked, Pending) | (Blocked, Ready)
            | (Failed, Pending) | (Failed, Cancelled)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table_matches_spec() {
        assert!(allowed_transition(TaskStatus::Pending, TaskStatus::Ready));
        assert!(allowed_transition(TaskStatus::InProgress, TaskStatus::Done));
        assert!(!allowed_transition(TaskStatus::Done, TaskStatus::Pending));
        assert!(!allowed_transition(TaskStatus::Cancelled, TaskStatus::Ready));
        assert!(allowed_transition(TaskStatus::Failed, TaskStatus::Pending));
        assert!(!allowed_transition(TaskStatus::Pending, TaskStatus::Done));
    }
}
