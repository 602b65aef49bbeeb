//! Declaration classifier: reduces each top-level declaration to the key
//! the ordering policy compares.

use crate::syntax::{Decl, DeclId, DeclKind, Keyword};

/// Go's program entry point.
pub const DEFAULT_ENTRY_POINT: &str = "main";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclKey {
    pub id: DeclId,
    pub kind: KeyKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyKind {
    Grouped {
        keyword: Keyword,
        /// Primary name of the first spec; `None` for an empty group.
        first_name: Option<String>,
    },
    Function {
        name: String,
        is_entry_point: bool,
    },
}

/// Build the comparison key for `decl`.
///
/// A function is the entry point when its name equals `entry_point`,
/// whether or not it has a receiver.
pub fn classify(decl: &Decl, entry_point: &str) -> DeclKey {
    let kind = match &decl.kind {
        DeclKind::Func(f) => KeyKind::Function {
            name: f.name.clone(),
            is_entry_point: f.name == entry_point,
        },
        DeclKind::Gen(g) => KeyKind::Grouped {
            keyword: g.keyword,
            first_name: g.specs.first().map(|s| s.primary_name().to_string()),
        },
    };
    DeclKey { id: decl.id, kind }
}

pub fn classify_all(decls: &[Decl], entry_point: &str) -> Vec<DeclKey> {
    decls.iter().map(|d| classify(d, entry_point)).collect()
}
