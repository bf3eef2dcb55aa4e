//! Symbol entity — a named code construct extracted from a file.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::file_record::FileId;

crate::define_id!(SymbolId, "Stable identifier for an extracted symbol.");

/// Closed set of symbol kinds recognized by the index.
///
/// Mirrors the LSP `SymbolKind` enumeration (1..26) collapsed onto this set;
/// LSP kinds with no counterpart here map to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    File,
    Module,
    Namespace,
    Package,
    Class,
    Method,
    Property,
    Field,
    Constructor,
    Enum,
    Interface,
    Function,
    Variable,
    Constant,
    EnumMember,
    Struct,
    Event,
    Operator,
    TypeParameter,
    Unknown,
}

/// A named code construct extracted from a single file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symbol {
    /// Stable identifier, deterministically derived from
    /// `(file_id, name, kind, start_line)`.
    pub id: SymbolId,
    /// Owning file.
    pub file_id: FileId,
    /// Symbol name as reported by the extractor.
    pub name: String,
    /// Closed symbol kind.
    pub kind: SymbolKind,
    /// Optional signature or type detail (LSP `detail` field, when present).
    pub detail: Option<String>,
    /// 1-based start line.
    pub start_line: u32,
    /// 0-based start column.
    pub start_column: u32,
    /// 1-based end line.
    pub end_line: u32,
    /// 0-based end column.
    pub end_column: u32,
    /// Parent symbol, if this symbol is nested (e.g. a method within a
    /// class).
    pub parent_id: Option<SymbolId>,
    /// Whether the symbol is part of the file's public surface.
    ///
    /// Always `true` today: neither the LSP extractor nor the regex fallback
    /// currently determine export visibility reliably across languages.
    pub is_exported: bool,
}

impl Symbol {
    /// Derive the stable id for a symbol occurrence.
    #[must_use]
    pub fn derive_id(file_id: FileId, name: &str, kind: SymbolKind, start_line: u32) -> SymbolId {
        SymbolId::from_name(&format!("{file_id}:{name}:{kind}:{start_line}"))
    }

    /// Construct a symbol, deriving its id from its position within the file.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        file_id: FileId,
        name: impl Into<String>,
        kind: SymbolKind,
        detail: Option<String>,
        start_line: u32,
        start_column: u32,
        end_line: u32,
        end_column: u32,
        parent_id: Option<SymbolId>,
    ) -> Self {
        let name = name.into();
        let id = Self::derive_id(file_id, &name, kind, start_line);
        Self {
            id,
            file_id,
            name,
            kind,
            detail,
            start_line,
            start_column,
            end_line,
            end_column,
            parent_id,
            is_exported: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::file_record::FileId;

    #[test]
    fn same_position_derives_same_id() {
        let file_id = FileId::from_name("proj:src/lib.rs");
        let a = Symbol::derive_id(file_id, "parse", SymbolKind::Function, 10);
        let b = Symbol::derive_id(file_id, "parse", SymbolKind::Function, 10);
        assert_eq!(a, b);
    }

    #[test]
    fn different_line_derives_different_id() {
        let file_id = FileId::from_name("proj:src/lib.rs");
        let a = Symbol::derive_id(file_id, "parse", SymbolKind::Function, 10);
        let b = Symbol::derive_id(file_id, "parse", SymbolKind::Function, 20);
        assert_ne!(a, b);
    }

    #[test]
    fn new_symbol_is_exported_by_default() {
        let file_id = FileId::from_name("proj:src/lib.rs");
        let symbol = Symbol::new(file_id, "parse", SymbolKind::Function, None, 10, 0, 12, 1, None);
        assert!(symbol.is_exported);
    }
}
