//! SQLite-backed [`TaskRepository`].

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use codetrail_domain::entities::{Complexity, Dependency, DependencyType, Task, TaskId, TaskStatus, TaskType};
use codetrail_domain::error::{Error, Result};
use codetrail_domain::ports::{DatabaseExecutor, SqlParam, SqlRow, TaskRepository};

/// SQLite implementation backed by the `tasks` and `task_dependencies` tables.
pub struct SqliteTaskRepository {
    executor: Arc<dyn DatabaseExecutor>,
}

impl SqliteTaskRepository {
    /// Build a repository over an already-migrated executor.
    #[must_use]
    pub fn new(executor: Arc<dyn DatabaseExecutor>) -> Self {
        Self { executor }
    }

    fn from_row(row: &dyn SqlRow) -> Result<Task> {
        let status_str = row
            .try_get_string("status")?
            .ok_or_else(|| Error::store("task row missing status"))?;
        let task_type_str = row
            .try_get_string("task_type")?
            .ok_or_else(|| Error::store("task row missing task_type"))?;
        let complexity_str = row
            .try_get_string("complexity")?
            .ok_or_else(|| Error::store("task row missing complexity"))?;
        let metadata = row
            .try_get_string("metadata")?
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or(serde_json::Value::Null);
        Ok(Task {
            id: row
                .try_get_string("id")?
                .ok_or_else(|| Error::store("task row missing id"))?
                .as_str()
                .into(),
            parent_id: row
                .try_get_string("parent_id")?
                .map(|s| TaskId::from_string(&s)),
            title: row
                .try_get_string("title")?
                .ok_or_else(|| Error::store("task row missing title"))?,
            description: row.try_get_string("description")?.unwrap_or_default(),
            task_type: TaskType::from_str(&task_type_str)
                .map_err(|_| Error::store(format!("unknown task_type: {task_type_str}")))?,
            status: TaskStatus::from_str(&status_str)
                .map_err(|_| Error::store(format!("unknown status: {status_str}")))?,
            priority: row.try_get_i64("priority")?.unwrap_or(0) as i32,
            complexity: Complexity::from_str(&complexity_str)
                .map_err(|_| Error::store(format!("unknown complexity: {complexity_str}")))?,
            estimated_effort_minutes: row.try_get_i64("estimated_effort_minutes")?,
            actual_effort_minutes: row.try_get_i64("actual_effort_minutes")?,
            test_required: row.try_get_i64("test_required")?.unwrap_or(0) != 0,
            metadata,
            created_at: row
                .try_get_i64("created_at")?
                .ok_or_else(|| Error::store("task row missing created_at"))?,
            started_at: row.try_get_i64("started_at")?,
            completed_at: row.try_get_i64("completed_at")?,
        })
    }

    fn dependency_from_row(row: &dyn SqlRow) -> Result<Dependency> {
        let dep_type_str = row
            .try_get_string("dependency_type")?
            .ok_or_else(|| Error::store("dependency row missing dependency_type"))?;
        Ok(Dependency {
            task_id: row
                .try_get_string("task_id")?
                .ok_or_else(|| Error::store("dependency row missing task_id"))?
                .as_str()
                .into(),
            depends_on: row
                .try_get_string("depends_on")?
                .ok_or_else(|| Error::store("dependency row missing depends_on"))?
                .as_str()
                .into(),
            dependency_type: DependencyType::from_str(&dep_type_str)
                .map_err(|_| Error::store(format!("unknown dependency_type: {dep_type_str}")))?,
        })
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn upsert(&self, task: &Task) -> Result<()> {
        let metadata = serde_json::to_string(&task.metadata)
            .map_err(|e| Error::store_with_source("failed to serialize task metadata", e))?;
        self.executor
            .execute(
                "INSERT INTO tasks (id, parent_id, title, description, task_type, status, priority, complexity, estimated_effort_minutes, actual_effort_minutes, test_required, metadata, created_at, started_at, completed_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                 ON CONFLICT(id) DO UPDATE SET
                    parent_id = excluded.parent_id,
                    title = excluded.title,
                    description = excluded.description,
                    task_type = excluded.task_type,
                    status = excluded.status,
                    priority = excluded.priority,
                    complexity = excluded.complexity,
                    estimated_effort_minutes = excluded.estimated_effort_minutes,
                    actual_effort_minutes = excluded.actual_effort_minutes,
                    test_required = excluded.test_required,
                    metadata = excluded.metadata,
                    started_at = excluded.started_at,
                    completed_at = excluded.completed_at",
                &[
                    SqlParam::String(task.id.to_string()),
                    task.parent_id.map_or(SqlParam::Null, |id| SqlParam::String(id.to_string())),
                    SqlParam::String(task.title.clone()),
                    SqlParam::String(task.description.clone()),
                    SqlParam::String(task.task_type.to_string()),
                    SqlParam::String(task.status.to_string()),
                    SqlParam::I64(i64::from(task.priority)),
                    SqlParam::String(task.complexity.to_string()),
                    task.estimated_effort_minutes.map_or(SqlParam::Null, SqlParam::I64),
                    task.actual_effort_minutes.map_or(SqlParam::Null, SqlParam::I64),
                    SqlParam::I64(i64::from(task.test_required)),
                    SqlParam::String(metadata),
                    SqlParam::I64(task.created_at),
                    task.started_at.map_or(SqlParam::Null, SqlParam::I64),
                    task.completed_at.map_or(SqlParam::Null, SqlParam::I64),
                ],
            )
            .await
    }

    async fn get(&self, id: TaskId) -> Result<Task> {
        let row = self
            .executor
            .query_one(
                "SELECT * FROM tasks WHERE id = ?",
                &[SqlParam::String(id.to_string())],
            )
            .await?
            .ok_or_else(|| Error::not_found(format!("task {id}")))?;
        Self::from_row(row.as_ref())
    }

    async fn list(&self) -> Result<Vec<Task>> {
        let rows = self
            .executor
            .query_all("SELECT * FROM tasks ORDER BY created_at", &[])
            .await?;
        rows.iter().map(|r| Self::from_row(r.as_ref())).collect()
    }

    async fn list_by_status(&self, status: TaskStatus) -> Result<Vec<Task>> {
        let rows = self
            .executor
            .query_all(
                "SELECT * FROM tasks WHERE status = ? ORDER BY priority DESC, created_at",
                &[SqlParam::String(status.to_string())],
            )
            .await?;
        rows.iter().map(|r| Self::from_row(r.as_ref())).collect()
    }

    async fn list_children(&self, parent_id: TaskId) -> Result<Vec<Task>> {
        let rows = self
            .executor
            .query_all(
                "SELECT * FROM tasks WHERE parent_id = ? ORDER BY created_at",
                &[SqlParam::String(parent_id.to_string())],
            )
            .await?;
        rows.iter().map(|r| Self::from_row(r.as_ref())).collect()
    }

    async fn add_dependency(&self, dependency: &Dependency) -> Result<()> {
        self.executor
            .execute(
                "INSERT INTO task_dependencies (task_id, depends_on, dependency_type)
                 VALUES (?, ?, ?)
                 ON CONFLICT(task_id, depends_on) DO UPDATE SET
                    dependency_type = excluded.dependency_type",
                &[
                    SqlParam::String(dependency.task_id.to_string()),
                    SqlParam::String(dependency.depends_on.to_string()),
                    SqlParam::String(dependency.dependency_type.to_string()),
                ],
            )
            .await
    }

    async fn list_dependencies(&self) -> Result<Vec<Dependency>> {
        let rows = self
            .executor
            .query_all("SELECT * FROM task_dependencies", &[])
            .await?;
        rows.iter()
            .map(|r| Self::dependency_from_row(r.as_ref()))
            .collect()
    }

    async fn list_dependencies_for(&self, task_id: TaskId) -> Result<Vec<Dependency>> {
        let rows = self
            .executor
            .query_all(
                "SELECT * FROM task_dependencies WHERE task_id = ?",
                &[SqlParam::String(task_id.to_string())],
            )
            .await?;
        rows.iter()
            .map(|r| Self::dependency_from_row(r.as_ref()))
            .collect()
    }
}
