//! Project entity — the identity of an indexed repository root.

use serde::{Deserialize, Serialize};

crate::define_id!(ProjectId, "Stable identifier for a registered project.");

/// Identity of an indexed root.
///
/// Created on first registration, updated on reopen/rescan, never deleted by
/// the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Stable identifier.
    pub id: ProjectId,
    /// Absolute, unique filesystem path of the project root.
    pub path: String,
    /// Display name.
    pub name: String,
    /// Primary detected language (highest file count among recognized
    /// languages; ties broken by root-indicator markers).
    pub primary_language: Option<String>,
    /// Full set of languages detected with count > 0.
    pub languages: Vec<String>,
    /// Optional git remote URL.
    pub git_remote: Option<String>,
    /// Creation timestamp (Unix epoch seconds).
    pub created_at: i64,
    /// Last update timestamp (Unix epoch seconds).
    pub updated_at: i64,
}

impl Project {
    /// Construct a freshly registered project with no detected languages yet.
    #[must_use]
    pub fn new(path: impl Into<String>, name: impl Into<String>, now: i64) -> Self {
        let path = path.into();
        Self {
            id: ProjectId::from_name(&path),
            path,
            name: name.into(),
            primary_language: None,
            languages: Vec::new(),
            git_remote: None,
            created_at: now,
            updated_at: now,
        }
    }
}
