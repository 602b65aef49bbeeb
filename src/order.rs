//! Ordering policy for top-level declarations.
//!
//! Rules, applied in order:
//! 1. Grouped declarations (`import`/`const`/`type`/`var`) come before
//!    functions.
//! 2. Among functions the entry point comes first, the rest by name.
//! 3. Among grouped declarations, keyword precedence
//!    (import < const < type < var) decides, then the primary name of the
//!    first spec. An empty group sorts before a non-empty one.
//!
//! Names compare byte-wise. The relation has ties (same-named methods on
//! different receivers, blocks whose first specs share a name), so callers
//! must sort stably.

use std::cmp::Ordering;

use crate::classify::{DeclKey, KeyKind};

/// Total preorder over declaration keys.
pub fn compare(a: &DeclKey, b: &DeclKey) -> Ordering {
    match (&a.kind, &b.kind) {
        (KeyKind::Grouped { .. }, KeyKind::Function { .. }) => Ordering::Less,
        (KeyKind::Function { .. }, KeyKind::Grouped { .. }) => Ordering::Greater,
        (
            KeyKind::Function {
                name: name_a,
                is_entry_point: entry_a,
            },
            KeyKind::Function {
                name: name_b,
                is_entry_point: entry_b,
            },
        ) => match (entry_a, entry_b) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (true, true) => Ordering::Equal,
            (false, false) => name_a.as_bytes().cmp(name_b.as_bytes()),
        },
        (
            KeyKind::Grouped {
                keyword: kw_a,
                first_name: first_a,
            },
            KeyKind::Grouped {
                keyword: kw_b,
                first_name: first_b,
            },
        ) => kw_a.cmp(kw_b).then_with(|| match (first_a, first_b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => x.as_bytes().cmp(y.as_bytes()),
        }),
    }
}

/// Whether `a` must be placed strictly before `b`.
pub fn less(a: &DeclKey, b: &DeclKey) -> bool {
    compare(a, b) == Ordering::Less
}
