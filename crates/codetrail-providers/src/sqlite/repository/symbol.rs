//! SQLite-backed [`SymbolRepository`].

use std::sync::Arc;
use std::str::FromStr;

use async_trait::async_trait;
use codetrail_domain::entities::{FileId, ProjectId, Symbol, SymbolId, SymbolKind};
use codetrail_domain::error::{Error, Result};
use codetrail_domain::ports::{DatabaseExecutor, SqlParam, SqlRow, SymbolRepository};

/// SQLite implementation backed by the `symbols` table.
pub struct SqliteSymbolRepository {
    executor: Arc<dyn DatabaseExecutor>,
}

impl SqliteSymbolRepository {
    /// Build a repository over an already-migrated executor.
    #[must_use]
    pub fn new(executor: Arc<dyn DatabaseExecutor>) -> Self {
        Self { executor }
    }

    fn from_row(row: &dyn SqlRow) -> Result<Symbol> {
        let kind_str = row
            .try_get_string("kind")?
            .ok_or_else(|| Error::store("symbol row missing kind"))?;
        let kind = SymbolKind::from_str(&kind_str)
            .map_err(|_| Error::store(format!("unknown symbol kind: {kind_str}")))?;
        Ok(Symbol {
            id: row
                .try_get_string("id")?
                .ok_or_else(|| Error::store("symbol row missing id"))?
                .as_str()
                .into(),
            file_id: row
                .try_get_string("file_id")?
                .ok_or_else(|| Error::store("symbol row missing file_id"))?
                .as_str()
                .into(),
            name: row
                .try_get_string("name")?
                .ok_or_else(|| Error::store("symbol row missing name"))?,
            kind,
            detail: row.try_get_string("detail")?,
            start_line: row.try_get_i64("start_line")?.unwrap_or(0) as u32,
            start_column: row.try_get_i64("start_column")?.unwrap_or(0) as u32,
            end_line: row.try_get_i64("end_line")?.unwrap_or(0) as u32,
            end_column: row.try_get_i64("end_column")?.unwrap_or(0) as u32,
            parent_id: row
                .try_get_string("parent_id")?
                .map(|s| SymbolId::from_string(&s)),
            is_exported: row.try_get_i64("is_exported")?.unwrap_or(1) != 0,
        })
    }
}

#[async_trait]
impl SymbolRepository for SqliteSymbolRepository {
    async fn replace_for_file(&self, file_id: FileId, symbols: &[Symbol]) -> Result<()> {
        self.delete_for_file(file_id).await?;
        for symbol in symbols {
            self.executor
                .execute(
                    "INSERT INTO symbols (id, file_id, name, kind, detail, start_line, start_column, end_line, end_column, parent_id, is_exported)
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                    &[
                        SqlParam::String(symbol.id.to_string()),
                        SqlParam::String(symbol.file_id.to_string()),
                        SqlParam::String(symbol.name.clone()),
                        SqlParam::String(symbol.kind.to_string()),
                        symbol.detail.clone().map_or(SqlParam::Null, SqlParam::String),
                        SqlParam::I64(i64::from(symbol.start_line)),
                        SqlParam::I64(i64::from(symbol.start_column)),
                        SqlParam::I64(i64::from(symbol.end_line)),
                        SqlParam::I64(i64::from(symbol.end_column)),
                        symbol
                            .parent_id
                            .map_or(SqlParam::Null, |id| SqlParam::String(id.to_string())),
                        SqlParam::I64(i64::from(symbol.is_exported)),
                    ],
                )
                .await?;
        }
        Ok(())
    }

    async fn list_by_file(&self, file_id: FileId) -> Result<Vec<Symbol>> {
        let rows = self
            .executor
            .query_all(
                "SELECT * FROM symbols WHERE file_id = ? ORDER BY start_line",
                &[SqlParam::String(file_id.to_string())],
            )
            .await?;
        rows.iter().map(|r| Self::from_row(r.as_ref())).collect()
    }

    async fn list_by_project(&self, project_id: ProjectId) -> Result<Vec<Symbol>> {
        let rows = self
            .executor
            .query_all(
                "SELECT symbols.* FROM symbols
                 JOIN file_records ON file_records.id = symbols.file_id
                 WHERE file_records.project_id = ?
                 ORDER BY file_records.path, symbols.start_line",
                &[SqlParam::String(project_id.to_string())],
            )
            .await?;
        rows.iter().map(|r| Self::from_row(r.as_ref())).collect()
    }

    async fn get(&self, id: SymbolId) -> Result<Option<Symbol>> {
        let row = self
            .executor
            .query_one(
                "SELECT * FROM symbols WHERE id = ?",
                &[SqlParam::String(id.to_string())],
            )
            .await?;
        row.map(|r| Self::from_row(r.as_ref())).transpose()
    }

    async fn delete_for_file(&self, file_id: FileId) -> Result<()> {
        self.executor
            .execute(
                "DELETE FROM symbols WHERE file_id = ?",
                &[SqlParam::String(file_id.to_string())],
            )
            .await
    }
}
