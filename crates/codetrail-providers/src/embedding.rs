//! Deterministic keyword-frequency embedding.
//!
//! Not a neural embedding: the same description always yields the same
//! vector, and every dimension corresponds to a fixed keyword rather than a
//! learned latent direction.

use std::sync::LazyLock;

use regex::Regex;

/// Matches a leading `//`, `///`, `/**`, `/*`, `*/` or bare `*` comment marker,
/// with any amount of following whitespace.
static COMMENT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(///?!?|/\*\*?|\*/?)\s?").unwrap());

/// How many lines to look backward from a symbol's start line when searching
/// for a leading doc comment.
const COMMENT_LOOKBACK: usize = 10;

/// Lines of context kept before and after a symbol's span in its snippet.
const SNIPPET_CONTEXT: u32 = 2;

/// Fixed, ordered keyword vocabulary. Every embedding vector has exactly
/// `KEYWORDS.len()` components, one per entry, in this order.
pub const KEYWORDS: &[&str] = &[
    "function", "class", "method", "async", "error", "auth", "database", "api", "route",
    "handler", "render", "model", "service", "config", "request", "response", "query", "schema",
    "validate", "parse", "token", "session", "cache", "event", "queue", "worker", "task",
    "job", "test", "build", "deploy", "log", "metric", "middleware", "controller", "repository",
    "client", "server", "connection", "stream",
];

/// Tokenize a description: lowercase, fold non-word characters to spaces,
/// split on whitespace, and discard tokens shorter than three characters.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .filter(|t| t.len() >= 3)
        .map(str::to_owned)
        .collect()
}

/// Build the keyword-frequency vector for a description, per the tokenize →
/// count → keyword-affinity procedure. Query strings use the same function.
#[must_use]
pub fn embed(text: &str) -> Vec<f32> {
    let tokens = tokenize(text);
    let mut counts: std::collections::HashMap<&str, u32> = std::collections::HashMap::new();
    for token in &tokens {
        *counts.entry(token.as_str()).or_insert(0) += 1;
    }

    KEYWORDS
        .iter()
        .map(|&keyword| {
            let exact = *counts.get(keyword).unwrap_or(&0) as f32;
            let related: u32 = counts
                .iter()
                .filter(|(token, _)| **token != keyword && (token.contains(keyword) || keyword.contains(**token)))
                .map(|(_, count)| *count)
                .sum();
            exact + 0.5 * related as f32
        })
        .collect()
}

/// Walk backward from `start_line` (1-based) over `lines`, collecting
/// comment lines above the symbol.
///
/// Blank lines are skipped without ending the walk; the first non-blank,
/// non-comment line stops it. Looks back at most [`COMMENT_LOOKBACK`]
/// lines. Comment markers are stripped from each collected line and the
/// result is joined with spaces; returns `None` if no comment precedes the
/// symbol within that window.
#[must_use]
pub fn leading_comment(lines: &[&str], start_line: u32) -> Option<String> {
    let start_idx = start_line.saturating_sub(1) as usize;
    let floor = start_idx.saturating_sub(COMMENT_LOOKBACK);

    let mut collected = Vec::new();
    for idx in (floor..start_idx).rev() {
        let Some(line) = lines.get(idx) else { break };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !COMMENT_MARKER.is_match(line) {
            break;
        }
        let stripped = COMMENT_MARKER.replace(line, "").trim().to_string();
        collected.push(stripped);
    }
    collected.reverse();

    if collected.is_empty() {
        None
    } else {
        Some(collected.join(" "))
    }
}

/// Source lines `[start_line - 2, end_line + 2]` (1-based, inclusive),
/// clamped to the file's bounds, joined with newlines.
#[must_use]
pub fn code_snippet(lines: &[&str], start_line: u32, end_line: u32) -> String {
    let from = start_line.saturating_sub(1).saturating_sub(SNIPPET_CONTEXT) as usize;
    let to = (end_line.saturating_sub(1) + SNIPPET_CONTEXT) as usize;
    let to = to.min(lines.len().saturating_sub(1));
    if lines.is_empty() || from > to {
        return String::new();
    }
    lines[from..=to].join("\n")
}

/// Compose the description a symbol's embedding is computed from: its kind
/// and name, optional signature detail, any leading doc comment, and a
/// trailing file-location marker, joined with `" | "`.
#[must_use]
pub fn build_description(kind: &str, name: &str, detail: Option<&str>, comment: Option<&str>, path: &str) -> String {
    let mut parts = vec![format!("{kind} {name}")];
    if let Some(detail) = detail {
        parts.push(detail.to_string());
    }
    if let Some(comment) = comment {
        parts.push(comment.to_string());
    }
    let breadcrumb = path.split('/').collect::<Vec<_>>().join(" > ");
    parts.push(format!("Located in: {breadcrumb}"));
    parts.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_drops_short_and_punctuation_tokens() {
        let tokens = tokenize("Fn parse_Config(a, b) -> Result");
        assert!(tokens.contains(&"parse_config".to_string()));
        assert!(tokens.contains(&"result".to_string()));
        assert!(!tokens.iter().any(|t| t == "fn" || t == "a" || t == "b"));
    }

    #[test]
    fn vector_has_one_component_per_keyword() {
        let v = embed("authenticate user with password");
        assert_eq!(v.len(), KEYWORDS.len());
    }

    #[test]
    fn substring_relation_contributes_half_weight() {
        let v = embed("authenticate the session");
        let auth_idx = KEYWORDS.iter().position(|k| *k == "auth").unwrap();
        assert!(v[auth_idx] > 0.0);
        assert!((v[auth_idx] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn unrelated_text_yields_zero_vector() {
        let v = embed("xyz qrs tuv");
        assert!(v.iter().all(|c| *c == 0.0));
    }

    #[test]
    fn leading_comment_collects_contiguous_doc_lines() {
        let lines = ["/// Parses a config file.", "/// Returns an error on invalid syntax.", "fn parse() {}"];
        let comment = leading_comment(&lines, 3).unwrap();
        assert_eq!(comment, "Parses a config file. Returns an error on invalid syntax.");
    }

    #[test]
    fn leading_comment_skips_blank_lines_without_stopping() {
        let lines = ["/// Unrelated.", "", "fn parse() {}"];
        assert_eq!(leading_comment(&lines, 3), Some("Unrelated.".to_string()));
    }

    #[test]
    fn leading_comment_stops_at_code_line() {
        let lines = ["let x = 1;", "/// Doc comment.", "fn parse() {}"];
        assert_eq!(leading_comment(&lines, 3), Some("Doc comment.".to_string()));
        let lines = ["/// Doc comment.", "let x = 1;", "fn parse() {}"];
        assert_eq!(leading_comment(&lines, 3), None);
    }

    #[test]
    fn leading_comment_none_when_no_comment_precedes() {
        let lines = ["let x = 1;", "fn parse() {}"];
        assert_eq!(leading_comment(&lines, 2), None);
    }

    #[test]
    fn code_snippet_clamps_to_file_bounds() {
        let lines = ["a", "b", "c"];
        assert_eq!(code_snippet(&lines, 1, 1), "a\nb\nc");
        assert_eq!(code_snippet(&lines, 2, 2), "a\nb\nc");
    }

    #[test]
    fn build_description_includes_comment_detail_and_location() {
        let description = build_description(
            "function",
            "parse",
            Some("fn parse() -> Result"),
            Some("Parses a config file."),
            "src/config.rs",
        );
        assert_eq!(
            description,
            "function parse | fn parse() -> Result | Parses a config file. | Located in: src > config.rs"
        );
    }

    #[test]
    fn build_description_omits_absent_fields() {
        let description = build_description("function", "parse", None, None, "src/config.rs");
        assert_eq!(description, "function parse | Located in: src > config.rs");
    }
}
