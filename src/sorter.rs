//! Stable reordering of a file's declarations.

use crate::classify::classify_all;
use crate::order::compare;
use crate::syntax::{DeclId, SourceFile};

/// Reorder `file.decls` under the ordering policy.
///
/// Uses `sort_by`, which is stable: declarations that compare equal keep
/// their source order. Returns the new order as declaration identities so
/// callers can look up anything keyed by `DeclId` (comments in particular).
pub fn sort_file(file: &mut SourceFile, entry_point: &str) -> Vec<DeclId> {
    let keys = classify_all(&file.decls, entry_point);
    let mut order: Vec<usize> = (0..file.decls.len()).collect();
    order.sort_by(|&a, &b| compare(&keys[a], &keys[b]));

    let mut slots: Vec<_> = std::mem::take(&mut file.decls).into_iter().map(Some).collect();
    file.decls = order
        .iter()
        .filter_map(|&idx| slots[idx].take())
        .collect();
    file.decls.iter().map(|d| d.id).collect()
}
