//! Canonical text for a sorted file.
//!
//! Layout: the package header, then each declaration separated by one
//! blank line (detached comments first, each followed by a blank line,
//! then doc comment, declaration and trailing comment), then the footer
//! comments, then a single newline.

use std::collections::HashSet;

use crate::attach::CommentMap;
use crate::error::RenderError;
use crate::layout::reindent;
use crate::syntax::SourceFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Rewrite indentation with tabs and trim trailing whitespace.
    pub reindent: bool,
    pub tab_width: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            reindent: true,
            tab_width: 4,
        }
    }
}

pub fn render(
    file: &SourceFile,
    comments: &CommentMap,
    layout: &Layout,
) -> Result<String, RenderError> {
    if file.decls.len() != comments.len() {
        return Err(RenderError::CountMismatch {
            sorted: file.decls.len(),
            parsed: comments.len(),
        });
    }
    let lay = |text: &str| -> Result<String, RenderError> {
        if layout.reindent {
            reindent(text, layout.tab_width).map_err(RenderError::Rescan)
        } else {
            Ok(text.to_string())
        }
    };

    let mut out = String::new();
    out.push_str(file.header.trim_end());
    if let Some((gap, group)) = &comments.header_trailing {
        out.push_str(gap);
        out.push_str(&group.text);
    }

    let mut seen = HashSet::with_capacity(file.decls.len());
    for decl in &file.decls {
        if !seen.insert(decl.id) {
            return Err(RenderError::Duplicate(decl.id.0));
        }
        let attached = comments
            .get(decl.id)
            .ok_or(RenderError::Unattached(decl.id.0))?;

        out.push_str("\n\n");
        for group in &attached.detached {
            out.push_str(&lay(&group.text)?);
            out.push_str("\n\n");
        }
        let mut chunk = String::new();
        if let Some(doc) = &attached.doc {
            chunk.push_str(&doc.text);
            chunk.push_str(&attached.doc_gap);
        }
        chunk.push_str(&decl.text);
        if let Some(trailing) = &attached.trailing {
            chunk.push_str(&attached.trailing_gap);
            chunk.push_str(&trailing.text);
        }
        out.push_str(&lay(&chunk)?);
    }

    for group in &comments.footer {
        out.push_str("\n\n");
        out.push_str(&lay(&group.text)?);
    }
    out.push('\n');
    Ok(out)
}
