//! Result shapes returned across the application layer's use-case boundary.
//!
//! These are plain data, not persisted entities; they exist to give callers
//! (the server facade, tests) a stable shape for each operation's output.

use codetrail_domain::entities::{Task, TaskId};

/// Outcome of a single `analyze` pass over a project root.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct AnalysisReport {
    /// Newly discovered files.
    pub new: usize,
    /// Files whose content hash changed since the last scan.
    pub changed: usize,
    /// Files whose content hash did not change.
    pub unchanged: usize,
    /// Files present last scan but no longer on disk.
    pub deleted: usize,
    /// Total files whose symbols were (re-)extracted this pass.
    pub files_analyzed: usize,
    /// Total symbols produced across every extracted file.
    pub symbols_found: usize,
    /// Count of non-fatal per-file errors encountered.
    pub errors: usize,
}

/// Summary counts for `project_structure`.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct StructureSummary {
    /// Total tracked files.
    pub files: usize,
    /// Total symbols across all files.
    pub symbols: usize,
    /// Functions plus methods.
    pub functions_and_methods: usize,
    /// Classes plus interfaces.
    pub classes_and_interfaces: usize,
}

/// One row of `hash_tree`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FileHash {
    /// Path relative to the project root.
    pub path: String,
    /// Content hash as a lowercase hex string.
    pub hash: String,
    /// Detected language, if recognized.
    pub language: Option<String>,
    /// Size in bytes.
    pub size: u64,
    /// Timestamp of the last successful analysis.
    pub last_analyzed: i64,
}

/// A single ranked search result.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SearchHit {
    /// Owning file's path.
    pub file_path: String,
    /// Matched symbol name.
    pub symbol_name: String,
    /// Matched symbol kind, as its `snake_case` name.
    pub symbol_kind: String,
    /// Description the embedding was built from.
    pub description: String,
    /// Source lines around the symbol, when available.
    pub code_snippet: Option<String>,
    /// Cosine similarity against the query, in `[-1.0, 1.0]`.
    pub score: f32,
}

/// Aggregate counters for the embedding index and its query history.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct SearchStats {
    /// Total embeddings indexed.
    pub total_embeddings: usize,
    /// Dimensionality of each embedding vector.
    pub vector_length: usize,
    /// Total queries ever run against this project.
    pub total_searches: usize,
    /// The most recent queries, newest first.
    pub recent_queries: Vec<String>,
}

/// A contiguous slice of the dependency-ordered task list that can run
/// concurrently.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ParallelGroup {
    /// 0-based depth level; lower levels have no unresolved dependencies.
    pub level: usize,
    /// Task ids in this level.
    pub tasks: Vec<TaskId>,
    /// Always `true`: tasks within a level have no ordering dependency on
    /// one another.
    pub can_run_in_parallel: bool,
}

/// The longest dependency chain by cumulative estimated effort.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct CriticalPath {
    /// Task ids along the path, in execution order.
    pub tasks: Vec<TaskId>,
    /// Total estimated effort in minutes along the path.
    pub total_effort_minutes: i64,
}

/// A structural problem found by `validate()`.
#[derive(Debug, Clone, serde::Serialize)]
pub enum Issue {
    /// A dependency edge references a task that does not exist.
    OrphanedEdge {
        /// The task id that does not exist.
        missing: TaskId,
    },
    /// The `blocks` subgraph contains a cycle.
    Cycle {
        /// Human-readable description of the cycle.
        description: String,
    },
    /// A task has neither dependencies nor dependents, in a graph with at
    /// least two tasks.
    IsolatedTask {
        /// The isolated task's id.
        task_id: TaskId,
    },
}

/// Tasks grouped by `parent_id`, used by `decompose`.
#[derive(Debug, Clone)]
pub struct DecomposeResult {
    /// The newly created children, in the order supplied.
    pub children: Vec<Task>,
}
