//! SQLite-backed [`TaskEventRepository`] — an append-only audit trail.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use codetrail_domain::entities::{TaskEvent, TaskEventKind, TaskId};
use codetrail_domain::error::{Error, Result};
use codetrail_domain::ports::{DatabaseExecutor, SqlParam, SqlRow, TaskEventRepository};

/// SQLite implementation backed by the `task_events` table.
pub struct SqliteTaskEventRepository {
    executor: Arc<dyn DatabaseExecutor>,
}

impl SqliteTaskEventRepository {
    /// Build a repository over an already-migrated executor.
    #[must_use]
    pub fn new(executor: Arc<dyn DatabaseExecutor>) -> Self {
        Self { executor }
    }

    fn from_row(row: &dyn SqlRow) -> Result<TaskEvent> {
        let kind_str = row
            .try_get_string("kind")?
            .ok_or_else(|| Error::store("event row missing kind"))?;
        let metadata = row
            .try_get_string("metadata")?
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or(serde_json::Value::Null);
        Ok(TaskEvent {
            id: row
                .try_get_string("id")?
                .ok_or_else(|| Error::store("event row missing id"))?
                .as_str()
                .into(),
            task_id: row.try_get_string("task_id")?.map(|s| TaskId::from_string(&s)),
            kind: TaskEventKind::from_str(&kind_str)
                .map_err(|_| Error::store(format!("unknown event kind: {kind_str}")))?,
            message: row.try_get_string("message")?.unwrap_or_default(),
            metadata,
            occurred_at: row
                .try_get_i64("occurred_at")?
                .ok_or_else(|| Error::store("event row missing occurred_at"))?,
        })
    }
}

#[async_trait]
impl TaskEventRepository for SqliteTaskEventRepository {
    async fn append(&self, event: &TaskEvent) -> Result<()> {
        let metadata = serde_json::to_string(&event.metadata)
            .map_err(|e| Error::store_with_source("failed to serialize event metadata", e))?;
        self.executor
            .execute(
                "INSERT INTO task_events (id, task_id, kind, message, metadata, occurred_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
                &[
                    SqlParam::String(event.id.to_string()),
                    event
                        .task_id
                        .map_or(SqlParam::Null, |id| SqlParam::String(id.to_string())),
                    SqlParam::String(event.kind.to_string()),
                    SqlParam::String(event.message.clone()),
                    SqlParam::String(metadata),
                    SqlParam::I64(event.occurred_at),
                ],
            )
            .await
    }

    async fn list_for_task(&self, task_id: TaskId) -> Result<Vec<TaskEvent>> {
        let rows = self
            .executor
            .query_all(
                "SELECT * FROM task_events WHERE task_id = ? ORDER BY occurred_at",
                &[SqlParam::String(task_id.to_string())],
            )
            .await?;
        rows.iter().map(|r| Self::from_row(r.as_ref())).collect()
    }

    async fn list_all(&self) -> Result<Vec<TaskEvent>> {
        let rows = self
            .executor
            .query_all("SELECT * FROM task_events ORDER BY occurred_at", &[])
            .await?;
        rows.iter().map(|r| Self::from_row(r.as_ref())).collect()
    }
}
