//! SQLite-backed [`ProjectRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use codetrail_domain::entities::{Project, ProjectId};
use codetrail_domain::error::{Error, Result};
use codetrail_domain::ports::{DatabaseExecutor, ProjectRepository, SqlParam};

/// SQLite implementation backed by the `projects` table.
pub struct SqliteProjectRepository {
    executor: Arc<dyn DatabaseExecutor>,
}

impl SqliteProjectRepository {
    /// Build a repository over an already-migrated executor.
    #[must_use]
    pub fn new(executor: Arc<dyn DatabaseExecutor>) -> Self {
        Self { executor }
    }

    fn from_row(row: &dyn codetrail_domain::ports::SqlRow) -> Result<Project> {
        let languages: Vec<String> = row
            .try_get_string("languages")?
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();
        Ok(Project {
            id: row
                .try_get_string("id")?
                .ok_or_else(|| Error::store("project row missing id"))?
                .as_str()
                .into(),
            path: row
                .try_get_string("path")?
                .ok_or_else(|| Error::store("project row missing path"))?,
            name: row
                .try_get_string("name")?
                .ok_or_else(|| Error::store("project row missing name"))?,
            primary_language: row.try_get_string("primary_language")?,
            languages,
            git_remote: row.try_get_string("git_remote")?,
            created_at: row
                .try_get_i64("created_at")?
                .ok_or_else(|| Error::store("project row missing created_at"))?,
            updated_at: row
                .try_get_i64("updated_at")?
                .ok_or_else(|| Error::store("project row missing updated_at"))?,
        })
    }
}

#[async_trait]
impl ProjectRepository for SqliteProjectRepository {
    async fn upsert(&self, project: &Project) -> Result<()> {
        let languages = serde_json::to_string(&project.languages)
            .map_err(|e| Error::store_with_source("failed to serialize languages", e))?;
        self.executor
            .execute(
                "INSERT INTO projects (id, path, name, primary_language, languages, git_remote, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                 ON CONFLICT(id) DO UPDATE SET
                    path = excluded.path,
                    name = excluded.name,
                    primary_language = excluded.primary_language,
                    languages = excluded.languages,
                    git_remote = excluded.git_remote,
                    updated_at = excluded.updated_at",
                &[
                    SqlParam::String(project.id.to_string()),
                    SqlParam::String(project.path.clone()),
                    SqlParam::String(project.name.clone()),
                    project
                        .primary_language
                        .clone()
                        .map_or(SqlParam::Null, SqlParam::String),
                    SqlParam::String(languages),
                    project
                        .git_remote
                        .clone()
                        .map_or(SqlParam::Null, SqlParam::String),
                    SqlParam::I64(project.created_at),
                    SqlParam::I64(project.updated_at),
                ],
            )
            .await
    }

    async fn get(&self, id: ProjectId) -> Result<Project> {
        let row = self
            .executor
            .query_one(
                "SELECT * FROM projects WHERE id = ?",
                &[SqlParam::String(id.to_string())],
            )
            .await?
            .ok_or_else(|| Error::not_found(format!("project {id}")))?;
        Self::from_row(row.as_ref())
    }

    async fn get_by_path(&self, path: &str) -> Result<Option<Project>> {
        let row = self
            .executor
            .query_one(
                "SELECT * FROM projects WHERE path = ?",
                &[SqlParam::String(path.to_owned())],
            )
            .await?;
        row.map(|r| Self::from_row(r.as_ref())).transpose()
    }

    async fn list(&self) -> Result<Vec<Project>> {
        let rows = self
            .executor
            .query_all("SELECT * FROM projects ORDER BY created_at", &[])
            .await?;
        rows.iter().map(|r| Self::from_row(r.as_ref())).collect()
    }
}
