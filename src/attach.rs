//! Comment association table.
//!
//! Every comment group outside a declaration's own text is bound to exactly
//! one owner when the file is classified, keyed by `DeclId`:
//! - a group starting on the line where the previous declaration (or the
//!   package clause) ends is that owner's trailing comment;
//! - the last group before a declaration with no blank line in between is
//!   its doc comment;
//! - any other group before a declaration is detached and travels with
//!   that following declaration;
//! - groups after the last declaration form the footer.
//!
//! The renderer looks bindings up by identity, so reordering never depends
//! on source positions.

use std::collections::HashMap;

use crate::syntax::{CommentGroup, DeclId, SourceFile, Span};

/// Comments bound to one declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attachment {
    pub detached: Vec<CommentGroup>,
    pub doc: Option<CommentGroup>,
    /// Text between the doc group and the declaration.
    pub doc_gap: String,
    pub trailing: Option<CommentGroup>,
    /// Whitespace between the declaration and its trailing group.
    pub trailing_gap: String,
}

#[derive(Debug, Clone, Default)]
pub struct CommentMap {
    entries: HashMap<DeclId, Attachment>,
    /// Trailing comment of the package clause, with its gap.
    pub header_trailing: Option<(String, CommentGroup)>,
    pub footer: Vec<CommentGroup>,
}

impl CommentMap {
    pub fn get(&self, id: DeclId) -> Option<&Attachment> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

enum Owner {
    Header,
    Decl(DeclId),
}

/// Bind `comments` to the declarations of `file`, which must still be in
/// source order.
pub fn associate(src: &str, file: &SourceFile, comments: &[CommentGroup]) -> CommentMap {
    let mut map = CommentMap {
        entries: file
            .decls
            .iter()
            .map(|d| (d.id, Attachment::default()))
            .collect(),
        ..CommentMap::default()
    };

    let mut groups = comments
        .iter()
        .filter(|g| g.span.start >= file.header_span.end)
        .peekable();
    let mut owner = Owner::Header;
    let mut owner_span = file.header_span;

    for decl in &file.decls {
        let mut region = Vec::new();
        while let Some(g) = groups.peek() {
            if g.span.start >= decl.span.start {
                break;
            }
            region.push((*g).clone());
            groups.next();
        }
        let rest = bind_trailing(src, &mut map, &owner, owner_span, region);
        bind_leading(src, &mut map, decl.id, decl.span, rest);

        // groups inside the declaration belong to its text
        while let Some(g) = groups.peek() {
            if g.span.start >= decl.span.end {
                break;
            }
            groups.next();
        }
        owner = Owner::Decl(decl.id);
        owner_span = decl.span;
    }

    let region: Vec<CommentGroup> = groups.cloned().collect();
    let rest = bind_trailing(src, &mut map, &owner, owner_span, region);
    map.footer = rest;
    map
}

/// Bind the first group of `region` as the owner's trailing comment when it
/// starts on the owner's last line. Returns the remaining groups.
fn bind_trailing(
    src: &str,
    map: &mut CommentMap,
    owner: &Owner,
    owner_span: Span,
    mut region: Vec<CommentGroup>,
) -> Vec<CommentGroup> {
    let starts_on_owner_line = region
        .first()
        .is_some_and(|g| g.span.line == owner_span.end_line);
    if !starts_on_owner_line {
        return region;
    }
    let group = region.remove(0);
    let gap = inline_gap(&src[owner_span.end..group.span.start]);
    match owner {
        Owner::Header => map.header_trailing = Some((gap, group)),
        Owner::Decl(id) => {
            if let Some(entry) = map.entries.get_mut(id) {
                entry.trailing_gap = gap;
                entry.trailing = Some(group);
            }
        }
    }
    region
}

fn bind_leading(
    src: &str,
    map: &mut CommentMap,
    id: DeclId,
    decl_span: Span,
    mut region: Vec<CommentGroup>,
) {
    let Some(entry) = map.entries.get_mut(&id) else {
        return;
    };
    let adjacent = region
        .last()
        .is_some_and(|g| g.span.end_line + 1 >= decl_span.line);
    if adjacent {
        if let Some(doc) = region.pop() {
            entry.doc_gap = if doc.span.end_line == decl_span.line {
                inline_gap(&src[doc.span.end..decl_span.start])
            } else {
                "\n".to_string()
            };
            entry.doc = Some(doc);
        }
    }
    entry.detached = region;
}

/// Horizontal whitespace of a same-line gap, or a single space when the gap
/// held none (for example only an explicit `;`).
fn inline_gap(gap: &str) -> String {
    let ws: String = gap.chars().filter(|c| *c == ' ' || *c == '\t').collect();
    if ws.is_empty() {
        " ".to_string()
    } else {
        ws
    }
}
