//! Language detection: root-indicator markers plus an extension census.
//!
//! Two phases, run once per `analyze` call against the already-walked file
//! list (the walker itself lives in `codetrail-infrastructure`, which is the
//! only caller of this module).

use std::collections::HashMap;

/// Marker file → language bucket it indicates, checked at the project root.
const ROOT_INDICATORS: &[(&str, &str)] = &[
    ("package.json", "javascript"),
    ("go.mod", "go"),
    ("Cargo.toml", "rust"),
    ("pyproject.toml", "python"),
    ("requirements.txt", "python"),
    ("setup.py", "python"),
    ("Gemfile", "ruby"),
    ("pom.xml", "java"),
    ("build.gradle", "java"),
    ("composer.json", "php"),
];

/// Extension (without the leading dot) → language, the authoritative closed
/// set. Unknown extensions are skipped entirely.
const EXTENSION_MAP: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("jsx", "javascript"),
    ("mjs", "javascript"),
    ("cjs", "javascript"),
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("py", "python"),
    ("go", "go"),
    ("rs", "rust"),
    ("rb", "ruby"),
    ("java", "java"),
    ("php", "php"),
];

/// Directory names that are never descended into while walking a project.
pub const EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    "out",
    ".next",
    "coverage",
    "vendor",
    "target",
    "__pycache__",
    "venv",
    ".venv",
];

/// Map a file extension (no leading dot, as returned by
/// `Path::extension().to_str()`) to its recognized language, if any.
#[must_use]
pub fn language_for_extension(extension: &str) -> Option<&'static str> {
    EXTENSION_MAP
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, lang)| *lang)
}

/// Language bucket a root-indicator marker file name points to, if any.
#[must_use]
pub fn language_for_root_indicator(file_name: &str) -> Option<&'static str> {
    ROOT_INDICATORS
        .iter()
        .find(|(marker, _)| *marker == file_name)
        .map(|(_, lang)| *lang)
}

/// Aggregated detection result for a scanned project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectedLanguages {
    /// Every language with at least one matching file, alphabetically.
    pub languages: Vec<String>,
    /// The language with the most files, with root-indicator markers
    /// breaking ties among languages with an equal file count.
    pub primary: Option<String>,
}

/// Tally languages from an extension census and a set of observed
/// root-indicator markers, per the two-phase detection scheme.
#[must_use]
pub fn detect_languages(extension_counts: &HashMap<String, u64>, root_markers: &[String]) -> DetectedLanguages {
    let mut counts: HashMap<&'static str, u64> = HashMap::new();
    for (ext, count) in extension_counts {
        if let Some(lang) = language_for_extension(ext) {
            *counts.entry(lang).or_insert(0) += count;
        }
    }

    let mut languages: Vec<String> = counts.keys().map(|l| (*l).to_string()).collect();
    languages.sort();

    let indicated: Vec<&'static str> = root_markers
        .iter()
        .filter_map(|m| language_for_root_indicator(m))
        .collect();

    let max_count = counts.values().copied().max();
    let primary = max_count.and_then(|max| {
        let tied: Vec<&&str> = counts
            .iter()
            .filter(|(_, c)| **c == max)
            .map(|(lang, _)| lang)
            .collect();
        if tied.len() == 1 {
            return Some((*tied[0]).to_string());
        }
        indicated
            .iter()
            .find(|lang| tied.contains(lang))
            .map(|lang| (*lang).to_string())
            .or_else(|| tied.first().map(|lang| (**lang).to_string()))
    });

    DetectedLanguages { languages, primary }
}

/// Closed basename set that always flags a file as an entrypoint, regardless
/// of path.
pub const ENTRYPOINT_BASENAMES: &[&str] = &[
    "index.js",
    "index.ts",
    "main.js",
    "main.ts",
    "app.js",
    "app.ts",
    "server.js",
    "server.ts",
    "__main__.py",
    "main.py",
    "Main.java",
    "main.go",
    "main.rs",
];

/// Whether a project-relative path should be flagged `is_entrypoint`: its
/// basename is in the closed set, or any path component is `bin`.
#[must_use]
pub fn is_entrypoint(relative_path: &str) -> bool {
    let basename = relative_path.rsplit('/').next().unwrap_or(relative_path);
    if ENTRYPOINT_BASENAMES.contains(&basename) {
        return true;
    }
    relative_path.split('/').any(|component| component == "bin")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_maps_to_language() {
        assert_eq!(language_for_extension("rs"), Some("rust"));
        assert_eq!(language_for_extension("tsx"), Some("typescript"));
        assert_eq!(language_for_extension("unknown"), None);
    }

    #[test]
    fn primary_language_is_highest_count() {
        let mut counts = HashMap::new();
        counts.insert("rs".to_string(), 10);
        counts.insert("py".to_string(), 3);
        let detected = detect_languages(&counts, &[]);
        assert_eq!(detected.primary.as_deref(), Some("rust"));
        assert_eq!(detected.languages, vec!["python".to_string(), "rust".to_string()]);
    }

    #[test]
    fn root_indicator_breaks_tie() {
        let mut counts = HashMap::new();
        counts.insert("ts".to_string(), 5);
        counts.insert("py".to_string(), 5);
        let detected = detect_languages(&counts, &["pyproject.toml".to_string()]);
        assert_eq!(detected.primary.as_deref(), Some("python"));
    }

    #[test]
    fn entrypoint_by_basename_or_bin_dir() {
        assert!(is_entrypoint("src/main.rs"));
        assert!(is_entrypoint("tools/bin/run.rs"));
        assert!(!is_entrypoint("src/lib.rs"));
    }
}
