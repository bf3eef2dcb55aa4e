//! SQLite-backed [`EmbeddingRepository`].
//!
//! Vectors are stored as a `BLOB` of little-endian `f32` values rather than
//! JSON text: the vocabulary is fixed-size (see the keyword list in
//! `crate::embedding`), so a flat byte buffer round-trips exactly and avoids
//! floating-point text round-tripping.

use std::sync::Arc;

use async_trait::async_trait;
use codetrail_domain::entities::{Embedding, FileId, ProjectId};
use codetrail_domain::error::{Error, Result};
use codetrail_domain::ports::{DatabaseExecutor, EmbeddingRepository, SqlParam, SqlRow};

/// SQLite implementation backed by the `embeddings` table.
pub struct SqliteEmbeddingRepository {
    executor: Arc<dyn DatabaseExecutor>,
}

impl SqliteEmbeddingRepository {
    /// Build a repository over an already-migrated executor.
    #[must_use]
    pub fn new(executor: Arc<dyn DatabaseExecutor>) -> Self {
        Self { executor }
    }

    fn encode_vector(vector: &[f32]) -> Vec<u8> {
        vector.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    fn decode_vector(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect()
    }

    fn from_row(row: &dyn SqlRow) -> Result<Embedding> {
        let vector_bytes = row
            .try_get_blob("vector")?
            .ok_or_else(|| Error::store("embedding row missing vector"))?;
        Ok(Embedding {
            symbol_id: row
                .try_get_string("symbol_id")?
                .ok_or_else(|| Error::store("embedding row missing symbol_id"))?
                .as_str()
                .into(),
            file_id: row
                .try_get_string("file_id")?
                .ok_or_else(|| Error::store("embedding row missing file_id"))?
                .as_str()
                .into(),
            description: row
                .try_get_string("description")?
                .ok_or_else(|| Error::store("embedding row missing description"))?,
            vector: Self::decode_vector(&vector_bytes),
            code_snippet: row.try_get_string("code_snippet")?,
        })
    }
}

#[async_trait]
impl EmbeddingRepository for SqliteEmbeddingRepository {
    async fn upsert(&self, embedding: &Embedding) -> Result<()> {
        self.executor
            .execute(
                "INSERT INTO embeddings (symbol_id, file_id, description, vector, code_snippet)
                 VALUES (?, ?, ?, ?, ?)
                 ON CONFLICT(symbol_id) DO UPDATE SET
                    file_id = excluded.file_id,
                    description = excluded.description,
                    vector = excluded.vector,
                    code_snippet = excluded.code_snippet",
                &[
                    SqlParam::String(embedding.symbol_id.to_string()),
                    SqlParam::String(embedding.file_id.to_string()),
                    SqlParam::String(embedding.description.clone()),
                    SqlParam::Blob(Self::encode_vector(&embedding.vector)),
                    embedding.code_snippet.clone().map_or(SqlParam::Null, SqlParam::String),
                ],
            )
            .await
    }

    async fn list_by_project(&self, project_id: ProjectId) -> Result<Vec<Embedding>> {
        let rows = self
            .executor
            .query_all(
                "SELECT embeddings.* FROM embeddings
                 JOIN file_records ON file_records.id = embeddings.file_id
                 WHERE file_records.project_id = ?
                 ORDER BY file_records.path, embeddings.symbol_id",
                &[SqlParam::String(project_id.to_string())],
            )
            .await?;
        rows.iter().map(|r| Self::from_row(r.as_ref())).collect()
    }

    async fn delete_for_file(&self, file_id: FileId) -> Result<()> {
        self.executor
            .execute(
                "DELETE FROM embeddings WHERE file_id = ?",
                &[SqlParam::String(file_id.to_string())],
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_round_trips_through_bytes() {
        let original = vec![0.5_f32, -1.25, 0.0, 3.75];
        let bytes = SqliteEmbeddingRepository::encode_vector(&original);
        let decoded = SqliteEmbeddingRepository::decode_vector(&bytes);
        assert_eq!(original, decoded);
    }
}
