//! SQLite-backed [`FileRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use codetrail_domain::entities::{FileId, FileRecord, ProjectId};
use codetrail_domain::error::{Error, Result};
use codetrail_domain::ports::{DatabaseExecutor, FileRepository, SqlParam, SqlRow};

/// SQLite implementation backed by the `file_records` table.
pub struct SqliteFileRepository {
    executor: Arc<dyn DatabaseExecutor>,
}

impl SqliteFileRepository {
    /// Build a repository over an already-migrated executor.
    #[must_use]
    pub fn new(executor: Arc<dyn DatabaseExecutor>) -> Self {
        Self { executor }
    }

    fn from_row(row: &dyn SqlRow) -> Result<FileRecord> {
        Ok(FileRecord {
            id: row
                .try_get_string("id")?
                .ok_or_else(|| Error::store("file row missing id"))?
                .as_str()
                .into(),
            project_id: row
                .try_get_string("project_id")?
                .ok_or_else(|| Error::store("file row missing project_id"))?
                .as_str()
                .into(),
            path: row
                .try_get_string("path")?
                .ok_or_else(|| Error::store("file row missing path"))?,
            size_bytes: row
                .try_get_i64("size_bytes")?
                .ok_or_else(|| Error::store("file row missing size_bytes"))? as u64,
            content_hash: row
                .try_get_string("content_hash")?
                .ok_or_else(|| Error::store("file row missing content_hash"))?,
            language: row.try_get_string("language")?,
            is_entrypoint: row.try_get_i64("is_entrypoint")?.unwrap_or(0) != 0,
            last_analyzed_at: row
                .try_get_i64("last_analyzed_at")?
                .ok_or_else(|| Error::store("file row missing last_analyzed_at"))?,
        })
    }
}

#[async_trait]
impl FileRepository for SqliteFileRepository {
    async fn upsert(&self, file: &FileRecord) -> Result<()> {
        self.executor
            .execute(
                "INSERT INTO file_records (id, project_id, path, size_bytes, content_hash, language, is_entrypoint, last_analyzed_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                 ON CONFLICT(id) DO UPDATE SET
                    size_bytes = excluded.size_bytes,
                    content_hash = excluded.content_hash,
                    language = excluded.language,
                    is_entrypoint = excluded.is_entrypoint,
                    last_analyzed_at = excluded.last_analyzed_at",
                &[
                    SqlParam::String(file.id.to_string()),
                    SqlParam::String(file.project_id.to_string()),
                    SqlParam::String(file.path.clone()),
                    SqlParam::I64(file.size_bytes as i64),
                    SqlParam::String(file.content_hash.clone()),
                    file.language.clone().map_or(SqlParam::Null, SqlParam::String),
                    SqlParam::I64(i64::from(file.is_entrypoint)),
                    SqlParam::I64(file.last_analyzed_at),
                ],
            )
            .await
    }

    async fn get(&self, id: FileId) -> Result<Option<FileRecord>> {
        let row = self
            .executor
            .query_one(
                "SELECT * FROM file_records WHERE id = ?",
                &[SqlParam::String(id.to_string())],
            )
            .await?;
        row.map(|r| Self::from_row(r.as_ref())).transpose()
    }

    async fn list_by_project(&self, project_id: ProjectId) -> Result<Vec<FileRecord>> {
        let rows = self
            .executor
            .query_all(
                "SELECT * FROM file_records WHERE project_id = ? ORDER BY path",
                &[SqlParam::String(project_id.to_string())],
            )
            .await?;
        rows.iter().map(|r| Self::from_row(r.as_ref())).collect()
    }

    async fn delete(&self, id: FileId) -> Result<()> {
        self.executor
            .execute(
                "DELETE FROM file_records WHERE id = ?",
                &[SqlParam::String(id.to_string())],
            )
            .await
    }
}
