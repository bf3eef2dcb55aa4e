//! SQLite-backed [`SearchHistoryRepository`] — an append-only query log.

use std::sync::Arc;

use async_trait::async_trait;
use codetrail_domain::entities::{ProjectId, SearchQuery};
use codetrail_domain::error::{Error, Result};
use codetrail_domain::ports::{DatabaseExecutor, SearchHistoryRepository, SqlParam, SqlRow};

/// SQLite implementation backed by the `search_history` table.
pub struct SqliteSearchHistoryRepository {
    executor: Arc<dyn DatabaseExecutor>,
}

impl SqliteSearchHistoryRepository {
    /// Build a repository over an already-migrated executor.
    #[must_use]
    pub fn new(executor: Arc<dyn DatabaseExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl SearchHistoryRepository for SqliteSearchHistoryRepository {
    async fn record(&self, query: &SearchQuery) -> Result<()> {
        self.executor
            .execute(
                "INSERT INTO search_history (id, project_id, query, created_at) VALUES (?, ?, ?, ?)",
                &[
                    SqlParam::String(query.id.to_string()),
                    SqlParam::String(query.project_id.to_string()),
                    SqlParam::String(query.query.clone()),
                    SqlParam::I64(query.created_at),
                ],
            )
            .await
    }

    async fn count_for_project(&self, project_id: ProjectId) -> Result<usize> {
        let row = self
            .executor
            .query_one(
                "SELECT COUNT(*) AS total FROM search_history WHERE project_id = ?",
                &[SqlParam::String(project_id.to_string())],
            )
            .await?;
        let total = match row {
            Some(row) => row.try_get_i64("total")?.unwrap_or(0),
            None => 0,
        };
        Ok(total.max(0) as usize)
    }

    async fn recent_for_project(&self, project_id: ProjectId, limit: usize) -> Result<Vec<String>> {
        let rows = self
            .executor
            .query_all(
                "SELECT query FROM search_history WHERE project_id = ?
                 ORDER BY created_at DESC, id DESC LIMIT ?",
                &[SqlParam::String(project_id.to_string()), SqlParam::I64(limit as i64)],
            )
            .await?;
        rows.iter()
            .map(|r| {
                r.try_get_string("query")?
                    .ok_or_else(|| Error::store("search_history row missing query"))
            })
            .collect()
    }
}
