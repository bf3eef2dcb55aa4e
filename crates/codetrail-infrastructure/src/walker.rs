//! Parallel, exclusion-aware file walker for a project root.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use codetrail_domain::error::{Error, Result};
use codetrail_providers::language::{self, EXCLUDED_DIRS};
use ignore::WalkBuilder;

/// A single file discovered under a project root.
#[derive(Debug, Clone)]
pub struct WalkedFile {
    /// Absolute path on disk.
    pub absolute_path: PathBuf,
    /// Path relative to the project root, using `/` separators.
    pub relative_path: String,
    /// File extension without the leading dot, if any.
    pub extension: Option<String>,
}

/// Result of walking a project root: every recognized-language file plus the
/// raw root-indicator marker names observed at the top level.
#[derive(Debug, Clone, Default)]
pub struct WalkResult {
    /// Files whose extension is in the recognized closed set.
    pub files: Vec<WalkedFile>,
    /// Extension → file count, used by language detection.
    pub extension_counts: HashMap<String, u64>,
    /// Marker file names found directly under `root` (e.g. `Cargo.toml`).
    pub root_markers: Vec<String>,
}

/// Walk `root`, skipping the closed exclusion-directory set and never
/// following symlinks, returning every file whose extension is in the
/// recognized language map.
///
/// `root` must be an absolute, readable directory.
pub fn walk_project(root: &Path) -> Result<WalkResult> {
    if !root.is_absolute() {
        return Err(Error::validation(format!(
            "project root must be absolute: {}",
            root.display()
        )));
    }
    if !root.is_dir() {
        return Err(Error::validation(format!(
            "project root is not a readable directory: {}",
            root.display()
        )));
    }

    let root_markers: Vec<String> = std::fs::read_dir(root)
        .map_err(|e| Error::io_with_source(format!("failed to read {}", root.display()), e))?
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|ft| ft.is_file()))
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();

    let files: Mutex<Vec<WalkedFile>> = Mutex::new(Vec::new());

    WalkBuilder::new(root)
        .hidden(false)
        .follow_links(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .filter_entry(|entry| {
            if entry.file_type().is_some_and(|ft| ft.is_dir()) {
                let name = entry.file_name().to_string_lossy();
                return !EXCLUDED_DIRS.contains(&name.as_ref());
            }
            true
        })
        .build_parallel()
        .run(|| {
            Box::new(|entry| {
                let Ok(entry) = entry else {
                    return ignore::WalkState::Continue;
                };
                if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                    return ignore::WalkState::Continue;
                }
                let absolute_path = entry.path().to_path_buf();
                let extension = absolute_path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(str::to_owned);
                let Some(ext) = &extension else {
                    return ignore::WalkState::Continue;
                };
                if language::language_for_extension(ext).is_none() {
                    return ignore::WalkState::Continue;
                }
                let relative_path = absolute_path
                    .strip_prefix(root)
                    .unwrap_or(&absolute_path)
                    .to_string_lossy()
                    .replace('\\', "/");
                files.lock().unwrap().push(WalkedFile {
                    absolute_path,
                    relative_path,
                    extension,
                });
                ignore::WalkState::Continue
            })
        });

    let files = files.into_inner().unwrap();
    let mut extension_counts: HashMap<String, u64> = HashMap::new();
    for file in &files {
        if let Some(ext) = &file.extension {
            *extension_counts.entry(ext.clone()).or_insert(0) += 1;
        }
    }

    Ok(WalkResult {
        files,
        extension_counts,
        root_markers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_relative_root() {
        let err = walk_project(Path::new("relative/path")).unwrap_err();
        assert!(matches!(err, Error::ValidationFailed { .. }));
    }

    #[test]
    fn walks_recognized_files_and_skips_excluded_dirs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Cargo.toml"), "[package]\nname = \"x\"").unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/lib.rs"), "fn main() {}").unwrap();
        std::fs::create_dir_all(dir.path().join("target/debug")).unwrap();
        std::fs::write(dir.path().join("target/debug/ignored.rs"), "fn x() {}").unwrap();

        let result = walk_project(dir.path()).unwrap();
        assert_eq!(result.files.len(), 1);
        assert_eq!(result.files[0].relative_path, "src/lib.rs");
        assert!(result.root_markers.contains(&"Cargo.toml".to_string()));
    }
}
