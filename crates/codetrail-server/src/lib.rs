//! # Codetrail Facade
//!
//! Thin composition root wiring the SQLite-backed repositories from
//! `codetrail-providers`, the infrastructure adapters (LSP, file walking,
//! task graph, parallel executor) and the three application use cases into
//! a single handle.
//!
//! This crate carries no transport of its own: no HTTP routes, no CLI
//! argument parsing, no MCP tool registry. It exposes plain async methods
//! that a transport layer (or a test, or a REPL) calls directly. The method
//! names and shapes mirror the Indexer, Retrieval and Task APIs embedders
//! are expected to build atop.

/// Configuration loading and per-user path resolution.
pub mod config;
/// Tracing subscriber setup.
pub mod logging;

use std::path::Path;
use std::sync::Arc;

use codetrail_application::dto::{
    AnalysisReport, CriticalPath, DecomposeResult, FileHash, Issue, ParallelGroup, SearchHit,
    SearchStats, StructureSummary,
};
use codetrail_application::{IndexingService, SearchService, TaskInput, TaskService};
use codetrail_domain::entities::{
    DependencyType, Project, ProjectId, Symbol, Task, TaskEvent, TaskId, TaskStatus,
};
use codetrail_domain::error::Result;
use codetrail_domain::ports::{DatabaseExecutor, TaskRepository};
use codetrail_infrastructure::{ExecutionReport, TaskCallback, TaskExecutor};
use codetrail_providers::sqlite::repository::{
    SqliteEmbeddingRepository, SqliteFileRepository, SqliteProjectRepository,
    SqliteSearchHistoryRepository, SqliteSymbolRepository, SqliteTaskEventRepository,
    SqliteTaskRepository,
};
use codetrail_providers::sqlite::SqliteExecutor;

use crate::config::AppConfig;

/// Composition root: every subsystem behind one handle.
///
/// Construct with [`Codetrail::open`], which applies [`AppConfig`],
/// opens (or creates) the SQLite database and wires the repositories into
/// the three use-case services plus the task executor.
pub struct Codetrail {
    indexing: IndexingService,
    search: SearchService,
    tasks: TaskService,
    executor: TaskExecutor,
    task_repo: Arc<SqliteTaskRepository>,
}

impl Codetrail {
    /// Open the database named by `config` (creating it and applying the
    /// schema if absent) and wire every service over it.
    pub async fn open(config: &AppConfig) -> Result<Self> {
        let db_path = config.resolved_database_path();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                codetrail_domain::error::Error::io_with_source(
                    format!("failed to create {}", parent.display()),
                    e,
                )
            })?;
        }
        let executor = SqliteExecutor::connect(&db_path).await?;
        Ok(Self::from_executor(Arc::new(executor), config))
    }

    /// Open an in-memory database. Intended for tests and short-lived
    /// embedders that don't need durability across restarts.
    pub async fn open_in_memory(config: &AppConfig) -> Result<Self> {
        let executor = SqliteExecutor::connect_in_memory().await?;
        Ok(Self::from_executor(Arc::new(executor), config))
    }

    fn from_executor(db: Arc<dyn DatabaseExecutor>, config: &AppConfig) -> Self {
        let projects = Arc::new(SqliteProjectRepository::new(db.clone()));
        let files = Arc::new(SqliteFileRepository::new(db.clone()));
        let symbols = Arc::new(SqliteSymbolRepository::new(db.clone()));
        let embeddings = Arc::new(SqliteEmbeddingRepository::new(db.clone()));
        let search_history = Arc::new(SqliteSearchHistoryRepository::new(db.clone()));
        let task_repo = Arc::new(SqliteTaskRepository::new(db.clone()));
        let event_repo = Arc::new(SqliteTaskEventRepository::new(db));

        let indexing = IndexingService::new(projects.clone(), files.clone(), symbols.clone());
        let search = SearchService::new(embeddings, symbols, files, projects, search_history);
        let tasks = TaskService::new(task_repo.clone(), event_repo.clone());
        let executor = TaskExecutor::new(task_repo.clone(), event_repo, config.executor.clone());

        Self { indexing, search, tasks, executor, task_repo }
    }

    // -- Indexer API (spec §4.1) --------------------------------------

    /// Register (or reopen) a project rooted at `path`.
    pub async fn open_project(&self, path: &Path) -> Result<Project> {
        self.indexing.open_project(path).await
    }

    /// Walk, hash and extract symbols for every recognized file under
    /// `root`, updating only files whose content hash changed.
    pub async fn analyze_project(&self, project_id: ProjectId, root: &Path) -> Result<AnalysisReport> {
        self.indexing.analyze(project_id, root).await
    }

    /// Top-level symbols declared in one project-relative file.
    pub async fn file_outline(&self, project_id: ProjectId, relative_path: &str) -> Result<Vec<Symbol>> {
        self.indexing.file_outline(project_id, relative_path).await
    }

    /// Per-language and per-file aggregate counts for a project.
    pub async fn project_structure(&self, project_id: ProjectId) -> Result<StructureSummary> {
        self.indexing.project_structure(project_id).await
    }

    /// Content hash of every tracked file in a project.
    pub async fn hash_tree(&self, project_id: ProjectId) -> Result<Vec<FileHash>> {
        self.indexing.hash_tree(project_id).await
    }

    // -- Retrieval API (spec §4.3) -------------------------------------

    /// Recompute embeddings for every symbol in a project.
    pub async fn index_embeddings(&self, project_id: ProjectId) -> Result<usize> {
        self.search.index_embeddings(project_id).await
    }

    /// Rank symbols in a project against a free-text query.
    pub async fn search(&self, project_id: ProjectId, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        self.search.search(project_id, query, limit).await
    }

    /// Embedding index size, dimensionality and recent query history for a
    /// project.
    pub async fn search_stats(&self, project_id: ProjectId) -> Result<SearchStats> {
        self.search.stats(project_id).await
    }

    // -- Task API (spec §4.4) ------------------------------------------

    /// Create a standalone task.
    pub async fn create_task(&self, input: TaskInput) -> Result<Task> {
        self.tasks.create_task(input).await
    }

    /// Split `parent_id` into child tasks.
    pub async fn decompose(&self, parent_id: TaskId, subtasks: Vec<TaskInput>) -> Result<DecomposeResult> {
        let children = self.tasks.decompose(parent_id, subtasks).await?;
        Ok(DecomposeResult { children })
    }

    /// Add a dependency edge, rejecting it if it would introduce a cycle.
    pub async fn add_dependency(
        &self,
        task_id: TaskId,
        depends_on: TaskId,
        dependency_type: DependencyType,
    ) -> Result<()> {
        self.tasks.add_dependency(task_id, depends_on, dependency_type).await
    }

    /// Tasks whose blocking dependencies are all done, ready-first order.
    pub async fn ready_tasks(&self) -> Result<Vec<Task>> {
        self.tasks.ready_tasks().await
    }

    /// Topological execution order over non-terminal tasks.
    pub async fn execution_order(&self) -> Result<Vec<TaskId>> {
        self.tasks.execution_order().await
    }

    /// Tasks grouped by dependency depth, each group runnable in parallel.
    pub async fn parallel_groups(&self) -> Result<Vec<ParallelGroup>> {
        self.tasks.parallel_groups().await
    }

    /// Longest-effort dependency chain over non-terminal tasks.
    pub async fn critical_path(&self) -> Result<CriticalPath> {
        self.tasks.critical_path().await
    }

    /// Transition a task's status, enforcing the allowed-transition table.
    pub async fn update_status(
        &self,
        task_id: TaskId,
        new_status: TaskStatus,
        metadata: Option<serde_json::Value>,
    ) -> Result<Task> {
        self.tasks.update_status(task_id, new_status, metadata).await
    }

    /// Reset a failed task back to pending.
    pub async fn rollback(&self, task_id: TaskId) -> Result<Task> {
        self.tasks.rollback(task_id).await
    }

    /// Orphaned edges, cycles and isolated tasks across the task set.
    pub async fn validate(&self) -> Result<Vec<Issue>> {
        self.tasks.validate().await
    }

    /// Full event history for one task, oldest first.
    pub async fn events(&self, task_id: TaskId) -> Result<Vec<TaskEvent>> {
        self.tasks.events(task_id).await
    }

    /// Run every task reachable from `task_ids` in dependency order,
    /// invoking `callback` for each and persisting status/events as it
    /// goes. See [`TaskExecutor::execute_all`] for concurrency, timeout
    /// and cancellation semantics.
    pub async fn execute_tasks(&self, task_ids: &[TaskId], callback: TaskCallback) -> Result<ExecutionReport> {
        let mut tasks = Vec::with_capacity(task_ids.len());
        let mut dependencies = Vec::new();
        for &id in task_ids {
            let task = self.task_repo.get(id).await?;
            dependencies.extend(self.task_repo.list_dependencies_for(id).await?);
            tasks.push(task);
        }
        self.executor.execute_all(&tasks, &dependencies, callback).await
    }

    /// Pause dispatch of new task groups; in-flight tasks run to completion.
    pub fn pause_execution(&self) {
        self.executor.pause();
    }

    /// Resume dispatch after [`Codetrail::pause_execution`].
    pub async fn resume_execution(&self) -> Result<()> {
        self.executor.resume().await
    }

    /// Request cancellation of one not-yet-started task.
    pub fn cancel_task(&self, task_id: TaskId) {
        self.executor.cancel_task(task_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn analyzing_an_empty_root_makes_no_mutations() {
        let codetrail = Codetrail::open_in_memory(&AppConfig::default()).await.unwrap();
        let root = tempfile::tempdir().unwrap();

        let project = codetrail.open_project(root.path()).await.unwrap();
        let before = project.clone();

        let report = codetrail.analyze_project(project.id, root.path()).await.unwrap();
        assert_eq!(report.files_analyzed, 0);
        assert_eq!(report.symbols_found, 0);

        let after = codetrail.open_project(root.path()).await.unwrap();
        assert_eq!(after.updated_at, before.updated_at);
        assert_eq!(after.primary_language, before.primary_language);
    }

    #[tokio::test]
    async fn search_stats_tracks_query_history() {
        let codetrail = Codetrail::open_in_memory(&AppConfig::default()).await.unwrap();
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("lib.rs"), "pub fn parse() {}\n").unwrap();

        let project = codetrail.open_project(root.path()).await.unwrap();
        codetrail.analyze_project(project.id, root.path()).await.unwrap();
        codetrail.index_embeddings(project.id).await.unwrap();

        codetrail.search(project.id, "parse", 10).await.unwrap();
        codetrail.search(project.id, "parse again", 10).await.unwrap();

        let stats = codetrail.search_stats(project.id).await.unwrap();
        assert_eq!(stats.total_searches, 2);
        assert_eq!(stats.recent_queries, vec!["parse again".to_string(), "parse".to_string()]);
    }
}
