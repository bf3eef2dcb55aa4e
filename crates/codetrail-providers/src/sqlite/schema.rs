//! Forward-only, idempotent SQLite schema for the index, task graph and
//! embedding stores.
//!
//! Every statement uses `CREATE TABLE IF NOT EXISTS` / `CREATE INDEX IF NOT
//! EXISTS`, so re-running the same pool at startup is always safe: there is
//! no migration ledger, only additive statements applied in order.

use codetrail_domain::error::Result;
use codetrail_domain::ports::DatabaseExecutor;

const STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS projects (
        id TEXT PRIMARY KEY,
        path TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        primary_language TEXT,
        languages TEXT NOT NULL DEFAULT '[]',
        git_remote TEXT,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS file_records (
        id TEXT PRIMARY KEY,
        project_id TEXT NOT NULL REFERENCES projects(id),
        path TEXT NOT NULL,
        size_bytes INTEGER NOT NULL,
        content_hash TEXT NOT NULL,
        language TEXT,
        is_entrypoint INTEGER NOT NULL DEFAULT 0,
        last_analyzed_at INTEGER NOT NULL,
        UNIQUE(project_id, path)
    )",
    "CREATE INDEX IF NOT EXISTS idx_file_records_project_path
        ON file_records(project_id, path)",
    "CREATE TABLE IF NOT EXISTS symbols (
        id TEXT PRIMARY KEY,
        file_id TEXT NOT NULL REFERENCES file_records(id),
        name TEXT NOT NULL,
        kind TEXT NOT NULL,
        detail TEXT,
        start_line INTEGER NOT NULL,
        start_column INTEGER NOT NULL,
        end_line INTEGER NOT NULL,
        end_column INTEGER NOT NULL,
        parent_id TEXT,
        is_exported INTEGER NOT NULL DEFAULT 1
    )",
    "CREATE INDEX IF NOT EXISTS idx_symbols_file_id ON symbols(file_id)",
    "CREATE TABLE IF NOT EXISTS embeddings (
        symbol_id TEXT PRIMARY KEY,
        file_id TEXT NOT NULL REFERENCES file_records(id),
        description TEXT NOT NULL,
        vector BLOB NOT NULL,
        code_snippet TEXT
    )",
    "CREATE INDEX IF NOT EXISTS idx_embeddings_file_id ON embeddings(file_id)",
    "CREATE TABLE IF NOT EXISTS search_history (
        id TEXT PRIMARY KEY,
        project_id TEXT NOT NULL REFERENCES projects(id),
        query TEXT NOT NULL,
        created_at INTEGER NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_search_history_project_id ON search_history(project_id, created_at)",
    "CREATE TABLE IF NOT EXISTS tasks (
        id TEXT PRIMARY KEY,
        parent_id TEXT,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        task_type TEXT NOT NULL,
        status TEXT NOT NULL,
        priority INTEGER NOT NULL DEFAULT 0,
        complexity TEXT NOT NULL,
        estimated_effort_minutes INTEGER,
        actual_effort_minutes INTEGER,
        test_required INTEGER NOT NULL DEFAULT 0,
        metadata TEXT NOT NULL DEFAULT 'null',
        created_at INTEGER NOT NULL,
        started_at INTEGER,
        completed_at INTEGER
    )",
    "CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_parent_id ON tasks(parent_id)",
    "CREATE TABLE IF NOT EXISTS task_dependencies (
        task_id TEXT NOT NULL REFERENCES tasks(id),
        depends_on TEXT NOT NULL REFERENCES tasks(id),
        dependency_type TEXT NOT NULL,
        PRIMARY KEY (task_id, depends_on)
    )",
    "CREATE INDEX IF NOT EXISTS idx_task_dependencies_task_id ON task_dependencies(task_id)",
    "CREATE TABLE IF NOT EXISTS task_events (
        id TEXT PRIMARY KEY,
        task_id TEXT,
        kind TEXT NOT NULL,
        message TEXT NOT NULL,
        metadata TEXT NOT NULL DEFAULT 'null',
        occurred_at INTEGER NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_task_events_task_id ON task_events(task_id)",
];

/// Apply every schema statement against `executor`, in order.
///
/// Safe to call on every process start: each statement is a no-op if its
/// table or index already exists.
pub async fn ensure_schema(executor: &dyn DatabaseExecutor) -> Result<()> {
    for stmt in STATEMENTS {
        executor.execute(stmt, &[]).await?;
    }
    Ok(())
}
