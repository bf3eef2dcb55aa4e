//! Regex-based fallback symbol extraction.
//!
//! Used only when no LSP server is available for a detected language. This
//! extraction is intentionally lossy: anything it cannot determine (detail,
//! end position, nesting) is left at its null/zero default rather than
//! guessed.

use codetrail_domain::entities::{FileId, Symbol, SymbolKind};
use regex::Regex;

struct Pattern {
    regex: Regex,
    kind: SymbolKind,
}

fn patterns_for(language: &str) -> Vec<Pattern> {
    match language {
        "rust" => vec![
            Pattern {
                regex: Regex::new(r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?(?:async\s+)?fn\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap(),
                kind: SymbolKind::Function,
            },
            Pattern {
                regex: Regex::new(r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?struct\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap(),
                kind: SymbolKind::Struct,
            },
            Pattern {
                regex: Regex::new(r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?enum\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap(),
                kind: SymbolKind::Enum,
            },
            Pattern {
                regex: Regex::new(r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?trait\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap(),
                kind: SymbolKind::Interface,
            },
        ],
        "python" => vec![
            Pattern {
                regex: Regex::new(r"(?m)^\s*(?:async\s+)?def\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap(),
                kind: SymbolKind::Function,
            },
            Pattern {
                regex: Regex::new(r"(?m)^\s*class\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap(),
                kind: SymbolKind::Class,
            },
        ],
        "javascript" | "typescript" => vec![
            Pattern {
                regex: Regex::new(r"(?m)^\s*(?:export\s+)?(?:async\s+)?function\s+([A-Za-z_$][A-Za-z0-9_$]*)").unwrap(),
                kind: SymbolKind::Function,
            },
            Pattern {
                regex: Regex::new(r"(?m)^\s*(?:export\s+)?class\s+([A-Za-z_$][A-Za-z0-9_$]*)").unwrap(),
                kind: SymbolKind::Class,
            },
            Pattern {
                regex: Regex::new(r"(?m)^\s*(?:export\s+)?const\s+([A-Za-z_$][A-Za-z0-9_$]*)\s*=\s*(?:async\s*)?\(").unwrap(),
                kind: SymbolKind::Function,
            },
        ],
        "go" => vec![
            Pattern {
                regex: Regex::new(r"(?m)^func\s+(?:\([^)]*\)\s*)?([A-Za-z_][A-Za-z0-9_]*)").unwrap(),
                kind: SymbolKind::Function,
            },
            Pattern {
                regex: Regex::new(r"(?m)^type\s+([A-Za-z_][A-Za-z0-9_]*)\s+struct").unwrap(),
                kind: SymbolKind::Struct,
            },
        ],
        "ruby" => vec![
            Pattern {
                regex: Regex::new(r"(?m)^\s*def\s+([A-Za-z_][A-Za-z0-9_?!]*)").unwrap(),
                kind: SymbolKind::Method,
            },
            Pattern {
                regex: Regex::new(r"(?m)^\s*class\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap(),
                kind: SymbolKind::Class,
            },
        ],
        "java" => vec![
            Pattern {
                regex: Regex::new(r"(?m)^\s*(?:public|private|protected)\s+class\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap(),
                kind: SymbolKind::Class,
            },
            Pattern {
                regex: Regex::new(r"(?m)^\s*(?:public|private|protected)\s+(?:static\s+)?[\w<>\[\]]+\s+([A-Za-z_][A-Za-z0-9_]*)\s*\(").unwrap(),
                kind: SymbolKind::Method,
            },
        ],
        "php" => vec![
            Pattern {
                regex: Regex::new(r"(?m)^\s*function\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap(),
                kind: SymbolKind::Function,
            },
            Pattern {
                regex: Regex::new(r"(?m)^\s*class\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap(),
                kind: SymbolKind::Class,
            },
        ],
        _ => Vec::new(),
    }
}

/// Extract a flat (non-hierarchical) symbol list from `content` using the
/// regex patterns registered for `language`. Returns an empty vector for an
/// unrecognized language.
#[must_use]
pub fn extract_symbols(file_id: FileId, content: &str, language: &str) -> Vec<Symbol> {
    let mut symbols = Vec::new();
    for pattern in patterns_for(language) {
        for captures in pattern.regex.captures_iter(content) {
            let Some(name_match) = captures.get(1) else {
                continue;
            };
            let name = name_match.as_str().to_owned();
            let start = name_match.start();
            let line = content[..start].bytes().filter(|b| *b == b'\n').count() as u32 + 1;
            symbols.push(Symbol::new(file_id, name, pattern.kind, None, line, 0, line, 0, None));
        }
    }
    symbols
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_rust_function_and_struct() {
        let file_id = FileId::from_name("f");
        let content = "pub fn parse() {}\nstruct Thing;\n";
        let symbols = extract_symbols(file_id, content, "rust");
        assert!(symbols.iter().any(|s| s.name == "parse" && s.kind == SymbolKind::Function));
        assert!(symbols.iter().any(|s| s.name == "Thing" && s.kind == SymbolKind::Struct));
    }

    #[test]
    fn unrecognized_language_yields_nothing() {
        let file_id = FileId::from_name("f");
        assert!(extract_symbols(file_id, "whatever", "cobol").is_empty());
    }

    #[test]
    fn non_extractable_attributes_stay_null() {
        let file_id = FileId::from_name("f");
        let symbols = extract_symbols(file_id, "fn parse() {}", "rust");
        assert_eq!(symbols[0].detail, None);
        assert_eq!(symbols[0].parent_id, None);
    }
}
