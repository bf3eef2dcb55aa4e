//! Search query entity — one row of the search-history audit trail.

use serde::{Deserialize, Serialize};

use super::project::ProjectId;

crate::define_id!(SearchQueryId, "Stable identifier for a recorded search query.");

/// A single recorded call to `search()`, kept so `stats()` can report
/// `total_searches`/`recent_queries` for a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Stable identifier.
    pub id: SearchQueryId,
    /// Project the search was run against.
    pub project_id: ProjectId,
    /// The free-text query string, verbatim.
    pub query: String,
    /// When the search ran (Unix epoch seconds).
    pub created_at: i64,
}

impl SearchQuery {
    /// Record a query run against `project_id` at `created_at`.
    #[must_use]
    pub fn new(project_id: ProjectId, query: impl Into<String>, created_at: i64) -> Self {
        Self { id: SearchQueryId::new(), project_id, query: query.into(), created_at }
    }
}
