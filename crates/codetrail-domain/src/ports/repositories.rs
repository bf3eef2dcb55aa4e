//! Repository ports for data persistence.
//!
//! All repository traits use `#[async_trait]` and require `Send + Sync`.
//! Implementations live in `codetrail-providers`.

use async_trait::async_trait;

use crate::entities::{
    Dependency, Embedding, FileId, FileRecord, Project, ProjectId, SearchQuery, Symbol, SymbolId,
    Task, TaskEvent, TaskId, TaskStatus,
};
use crate::error::Result;

/// Persistence for project records.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Insert a project, or update it if one with the same id already exists.
    async fn upsert(&self, project: &Project) -> Result<()>;
    /// Fetch a project by id.
    async fn get(&self, id: ProjectId) -> Result<Project>;
    /// Fetch a project by its root path.
    async fn get_by_path(&self, path: &str) -> Result<Option<Project>>;
    /// List all registered projects.
    async fn list(&self) -> Result<Vec<Project>>;
}

/// Persistence for file records within a project.
#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Insert a file record, or update it if one with the same id exists.
    async fn upsert(&self, file: &FileRecord) -> Result<()>;
    /// Fetch a file record by id.
    async fn get(&self, id: FileId) -> Result<Option<FileRecord>>;
    /// List every file tracked for a project.
    async fn list_by_project(&self, project_id: ProjectId) -> Result<Vec<FileRecord>>;
    /// Remove a file record (used when a file is deleted from disk).
    async fn delete(&self, id: FileId) -> Result<()>;
}

/// Persistence for extracted symbols.
#[async_trait]
pub trait SymbolRepository: Send + Sync {
    /// Replace all symbols for a file with a freshly extracted set.
    async fn replace_for_file(&self, file_id: FileId, symbols: &[Symbol]) -> Result<()>;
    /// List symbols belonging to a file.
    async fn list_by_file(&self, file_id: FileId) -> Result<Vec<Symbol>>;
    /// List all symbols belonging to a project, across all its files.
    async fn list_by_project(&self, project_id: ProjectId) -> Result<Vec<Symbol>>;
    /// Fetch a single symbol by id.
    async fn get(&self, id: SymbolId) -> Result<Option<Symbol>>;
    /// Remove every symbol associated with a file.
    async fn delete_for_file(&self, file_id: FileId) -> Result<()>;
}

/// Persistence for keyword-frequency embedding vectors.
#[async_trait]
pub trait EmbeddingRepository: Send + Sync {
    /// Insert an embedding, or replace the one for the same symbol.
    async fn upsert(&self, embedding: &Embedding) -> Result<()>;
    /// List every embedding within a project, for full-corpus similarity
    /// ranking.
    async fn list_by_project(&self, project_id: ProjectId) -> Result<Vec<Embedding>>;
    /// Remove every embedding associated with a file.
    async fn delete_for_file(&self, file_id: FileId) -> Result<()>;
}

/// Persistence for tasks and their dependency edges.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Insert a task, or update it if one with the same id exists.
    async fn upsert(&self, task: &Task) -> Result<()>;
    /// Fetch a task by id.
    async fn get(&self, id: TaskId) -> Result<Task>;
    /// List all tasks.
    async fn list(&self) -> Result<Vec<Task>>;
    /// List tasks with a given status.
    async fn list_by_status(&self, status: TaskStatus) -> Result<Vec<Task>>;
    /// List the direct children of a task.
    async fn list_children(&self, parent_id: TaskId) -> Result<Vec<Task>>;
    /// Record a dependency edge.
    async fn add_dependency(&self, dependency: &Dependency) -> Result<()>;
    /// List every dependency edge across all tasks.
    async fn list_dependencies(&self) -> Result<Vec<Dependency>>;
    /// List the dependency edges outgoing from a single task.
    async fn list_dependencies_for(&self, task_id: TaskId) -> Result<Vec<Dependency>>;
}

/// Persistence for the append-only search-query audit trail.
#[async_trait]
pub trait SearchHistoryRepository: Send + Sync {
    /// Record one query run against a project.
    async fn record(&self, query: &SearchQuery) -> Result<()>;
    /// Total queries recorded for a project.
    async fn count_for_project(&self, project_id: ProjectId) -> Result<usize>;
    /// The `limit` most recent queries for a project, newest first.
    async fn recent_for_project(&self, project_id: ProjectId, limit: usize) -> Result<Vec<String>>;
}

/// Persistence for the append-only task event audit trail.
#[async_trait]
pub trait TaskEventRepository: Send + Sync {
    /// Append an event. Events are never updated or deleted.
    async fn append(&self, event: &TaskEvent) -> Result<()>;
    /// List events for a single task, oldest first.
    async fn list_for_task(&self, task_id: TaskId) -> Result<Vec<TaskEvent>>;
    /// List all events, oldest first.
    async fn list_all(&self) -> Result<Vec<TaskEvent>>;
}
