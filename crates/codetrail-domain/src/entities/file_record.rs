//! File record entity — one row per tracked file within a project.

use serde::{Deserialize, Serialize};

use super::project::ProjectId;

crate::define_id!(FileId, "Stable identifier for a tracked file.");

/// A single file tracked by the index, keyed by project-relative path.
///
/// The `content_hash` is the sole signal used to decide whether a file is
/// new, changed, unchanged or deleted on a re-scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    /// Stable identifier, deterministically derived from `(project_id, path)`.
    pub id: FileId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Path relative to the project root, using `/` separators.
    pub path: String,
    /// Size in bytes at last scan.
    pub size_bytes: u64,
    /// 128-bit content hash, rendered as a lowercase hex string.
    pub content_hash: String,
    /// Detected language, if recognized.
    pub language: Option<String>,
    /// Whether this file was flagged as a likely program entrypoint.
    pub is_entrypoint: bool,
    /// Timestamp of the last successful analysis pass.
    pub last_analyzed_at: i64,
}

impl FileRecord {
    /// Derive the stable id for a `(project_id, path)` pair.
    #[must_use]
    pub fn derive_id(project_id: ProjectId, path: &str) -> FileId {
        FileId::from_name(&format!("{project_id}:{path}"))
    }

    /// Construct a record for a freshly discovered file.
    #[must_use]
    pub fn new(
        project_id: ProjectId,
        path: impl Into<String>,
        size_bytes: u64,
        content_hash: impl Into<String>,
        language: Option<String>,
        now: i64,
    ) -> Self {
        let path = path.into();
        let id = Self::derive_id(project_id, &path);
        Self {
            id,
            project_id,
            path,
            size_bytes,
            content_hash: content_hash.into(),
            language,
            is_entrypoint: false,
            last_analyzed_at: now,
        }
    }

    /// Whether `candidate_hash` differs from the stored hash, i.e. the file
    /// changed since the last scan.
    #[must_use]
    pub fn has_changed(&self, candidate_hash: &str) -> bool {
        self.content_hash != candidate_hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_path_derives_same_id() {
        let project_id = ProjectId::from_name("/repo");
        assert_eq!(
            FileRecord::derive_id(project_id, "src/lib.rs"),
            FileRecord::derive_id(project_id, "src/lib.rs")
        );
    }

    #[test]
    fn detects_hash_change() {
        let project_id = ProjectId::from_name("/repo");
        let record = FileRecord::new(project_id, "src/lib.rs", 10, "abc123", None, 1);
        assert!(record.has_changed("def456"));
        assert!(!record.has_changed("abc123"));
    }
}
