//! Style pre-pass: sorts the specs inside parenthesized declaration blocks.
//!
//! Runs before classification, so the first-spec names the ordering policy
//! compares are already the sorted ones and a second run finds nothing to
//! move.
//!
//! Specs are sorted within runs of adjacent lines; a blank line or a
//! detached comment ends a run, which keeps hand-made sub-groups intact.
//! Each spec moves together with its doc comment lines and its trailing
//! comment. A block is left as written when its layout is not one spec per
//! line, or when reordering could change meaning (`iota` or implicit
//! repetition in `const`, calls in `var` initializers).

use crate::syntax::{CommentGroup, DeclKind, GenDecl, Keyword, SourceFile, Span, Spec};

/// Sort specs of every eligible block in `file`. `src` is the text the file
/// was parsed from.
pub fn normalize_specs(src: &str, file: &mut SourceFile, comments: &[CommentGroup]) -> usize {
    let lines = line_starts(src);
    let mut rewritten = 0;
    for decl in &mut file.decls {
        let span = decl.span;
        if let DeclKind::Gen(gen) = &mut decl.kind {
            if let Some((text, order)) = reorder_block(src, &lines, span, gen, comments) {
                let mut slots: Vec<Option<Spec>> =
                    std::mem::take(&mut gen.specs).into_iter().map(Some).collect();
                gen.specs = order.iter().filter_map(|&i| slots[i].take()).collect();
                decl.text = text;
                rewritten += 1;
            }
        }
    }
    rewritten
}

/// Whether moving specs of this block could change what the program means.
pub fn order_sensitive(gen: &GenDecl) -> bool {
    match gen.keyword {
        Keyword::Const => gen.specs.iter().any(|s| s.uses_iota || !s.has_value),
        Keyword::Var => gen.specs.iter().any(|s| s.value_has_call),
        Keyword::Import | Keyword::Type => false,
    }
}

fn sort_key(keyword: Keyword, spec: &Spec) -> (String, String) {
    match keyword {
        Keyword::Import => (
            spec.path.clone().unwrap_or_default(),
            spec.local_name.clone().unwrap_or_default(),
        ),
        _ => (spec.primary_name().to_string(), String::new()),
    }
}

/// Lines a spec occupies, including its doc and trailing comments.
#[derive(Debug, Clone, Copy)]
struct Chunk {
    first: usize,
    last: usize,
}

/// Returns the rewritten declaration text and the new spec order, or `None`
/// when the block is ineligible or already sorted.
fn reorder_block(
    src: &str,
    lines: &[usize],
    span: Span,
    gen: &GenDecl,
    comments: &[CommentGroup],
) -> Option<(String, Vec<usize>)> {
    let (lparen, rparen) = gen.parens?;
    if gen.specs.len() < 2 || order_sensitive(gen) {
        return None;
    }
    let open_line = lparen.line;
    let close_line = rparen.line;
    if close_line <= open_line || !blank(&src[lines[close_line - 1]..rparen.start]) {
        return None;
    }

    let inner: Vec<&CommentGroup> = comments
        .iter()
        .filter(|c| c.span.start >= lparen.end && c.span.end <= rparen.start)
        .collect();

    let mut chunks = Vec::with_capacity(gen.specs.len());
    let mut prev_last = open_line;
    for spec in &gen.specs {
        let line = spec.span.line;
        if line <= prev_last || !blank(&src[lines[line - 1]..spec.span.start]) {
            return None;
        }
        let first = inner
            .iter()
            .find(|c| c.span.end_line + 1 == line && c.span.line > prev_last)
            .map_or(line, |c| c.span.line);
        let last = inner
            .iter()
            .find(|c| c.span.line == spec.span.end_line && c.span.start >= spec.span.end)
            .map_or(spec.span.end_line, |c| c.span.end_line.max(spec.span.end_line));
        chunks.push(Chunk { first, last });
        prev_last = last;
    }
    if prev_last >= close_line {
        return None;
    }

    let keys: Vec<_> = gen.specs.iter().map(|s| sort_key(gen.keyword, s)).collect();
    let mut order: Vec<usize> = (0..chunks.len()).collect();
    let mut start = 0;
    while start < chunks.len() {
        let mut end = start + 1;
        while end < chunks.len() && chunks[end].first == chunks[end - 1].last + 1 {
            end += 1;
        }
        order[start..end].sort_by(|&a, &b| keys[a].cmp(&keys[b]));
        start = end;
    }
    if order.iter().enumerate().all(|(slot, &i)| slot == i) {
        return None;
    }

    let line_text = |first: usize, last: usize| &src[lines[first - 1]..lines[last]];
    let mut text = String::with_capacity(span.end - span.start);
    text.push_str(&src[span.start..lines[open_line]]);
    let mut next_line = open_line + 1;
    for (slot, chunk) in chunks.iter().enumerate() {
        if chunk.first > next_line {
            text.push_str(line_text(next_line, chunk.first - 1));
        }
        let moved = chunks[order[slot]];
        text.push_str(line_text(moved.first, moved.last));
        next_line = chunk.last + 1;
    }
    if close_line > next_line {
        text.push_str(line_text(next_line, close_line - 1));
    }
    text.push_str(&src[lines[close_line - 1]..span.end]);
    Some((text, order))
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Byte offset of the start of each line; index 0 is line 1.
pub fn line_starts(src: &str) -> Vec<usize> {
    let mut starts = vec![0];
    starts.extend(src.match_indices('\n').map(|(i, _)| i + 1));
    starts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse;

    fn normalized(src: &str) -> SourceFile {
        let parsed = parse(src).unwrap();
        let mut file = parsed.file;
        normalize_specs(src, &mut file, &parsed.comments);
        file
    }

    #[test]
    fn sorts_const_specs_with_values() {
        let src = "package p\n\nconst (\n\tc2 = 2\n\tc1 = 1\n)\n";
        let file = normalized(src);
        assert_eq!(file.decls[0].text, "const (\n\tc1 = 1\n\tc2 = 2\n)");
        let gen = file.decls[0].as_gen().unwrap();
        assert_eq!(gen.specs[0].primary_name(), "c1");
    }

    #[test]
    fn leaves_iota_blocks_alone() {
        let src = "package p\n\nconst (\n\tB = iota\n\tA\n)\n";
        let file = normalized(src);
        assert_eq!(file.decls[0].text, "const (\n\tB = iota\n\tA\n)");
    }

    #[test]
    fn leaves_var_blocks_with_calls_alone() {
        let src = "package p\n\nvar (\n\tb = load()\n\ta = 1\n)\n";
        let file = normalized(src);
        assert_eq!(file.decls[0].text, "var (\n\tb = load()\n\ta = 1\n)");
    }

    #[test]
    fn imports_sort_within_blank_line_groups() {
        let src = "package p\n\nimport (\n\t\"strings\"\n\t\"fmt\"\n\n\t\"github.com/x/z\"\n\t\"github.com/x/a\"\n)\n";
        let file = normalized(src);
        assert_eq!(
            file.decls[0].text,
            "import (\n\t\"fmt\"\n\t\"strings\"\n\n\t\"github.com/x/a\"\n\t\"github.com/x/z\"\n)"
        );
    }

    #[test]
    fn specs_carry_their_comments() {
        let src = "package p\n\ntype (\n\t// Zed doc.\n\tZed int // z\n\t// Alpha doc.\n\tAlpha struct {\n\t\tX int\n\t}\n)\n";
        let file = normalized(src);
        assert_eq!(
            file.decls[0].text,
            "type (\n\t// Alpha doc.\n\tAlpha struct {\n\t\tX int\n\t}\n\t// Zed doc.\n\tZed int // z\n)"
        );
    }

    #[test]
    fn detached_comment_splits_runs() {
        let src = "package p\n\nvar (\n\tb = 2\n\ta = 1\n\n\t// later\n\n\td = 4\n\tc = 3\n)\n";
        let file = normalized(src);
        assert_eq!(
            file.decls[0].text,
            "var (\n\ta = 1\n\tb = 2\n\n\t// later\n\n\tc = 3\n\td = 4\n)"
        );
    }

    #[test]
    fn one_line_blocks_are_skipped() {
        let src = "package p\n\nvar (b = 2; a = 1)\n";
        let file = normalized(src);
        assert_eq!(file.decls[0].text, "var (b = 2; a = 1)");
    }

    #[test]
    fn sorted_block_is_untouched() {
        let src = "package p\n\nimport (\n\t\"a\"\n\t\"b\"\n)\n";
        let parsed = parse(src).unwrap();
        let mut file = parsed.file;
        assert_eq!(normalize_specs(src, &mut file, &parsed.comments), 0);
    }
}
