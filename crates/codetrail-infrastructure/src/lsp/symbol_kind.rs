//! Mapping from the LSP `SymbolKind` enumeration (1..26) to the closed
//! [`SymbolKind`] set used by the index.

use codetrail_domain::entities::SymbolKind;

/// Map an LSP `SymbolKind` integer to the closed domain kind, falling back to
/// [`SymbolKind::Unknown`] for kinds the index does not distinguish (`String`,
/// `Number`, `Boolean`, `Array`, `Object`, `Key`, `Null`) and for any value
/// outside the 1..26 range.
#[must_use]
pub fn from_lsp_kind(kind: i64) -> SymbolKind {
    match kind {
        1 => SymbolKind::File,
        2 => SymbolKind::Module,
        3 => SymbolKind::Namespace,
        4 => SymbolKind::Package,
        5 => SymbolKind::Class,
        6 => SymbolKind::Method,
        7 => SymbolKind::Property,
        8 => SymbolKind::Field,
        9 => SymbolKind::Constructor,
        10 => SymbolKind::Enum,
        11 => SymbolKind::Interface,
        12 => SymbolKind::Function,
        13 => SymbolKind::Variable,
        14 => SymbolKind::Constant,
        22 => SymbolKind::EnumMember,
        23 => SymbolKind::Struct,
        24 => SymbolKind::Event,
        25 => SymbolKind::Operator,
        26 => SymbolKind::TypeParameter,
        _ => SymbolKind::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_common_kinds() {
        assert_eq!(from_lsp_kind(12), SymbolKind::Function);
        assert_eq!(from_lsp_kind(5), SymbolKind::Class);
        assert_eq!(from_lsp_kind(23), SymbolKind::Struct);
    }

    #[test]
    fn maps_event_enum_member_and_operator() {
        assert_eq!(from_lsp_kind(22), SymbolKind::EnumMember);
        assert_eq!(from_lsp_kind(24), SymbolKind::Event);
        assert_eq!(from_lsp_kind(25), SymbolKind::Operator);
        assert_eq!(from_lsp_kind(26), SymbolKind::TypeParameter);
    }

    #[test]
    fn unrepresentable_value_kinds_fall_back_to_unknown() {
        assert_eq!(from_lsp_kind(15), SymbolKind::Unknown);
        assert_eq!(from_lsp_kind(99), SymbolKind::Unknown);
    }
}
