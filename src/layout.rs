//! Indentation layout for rendered declaration chunks.
//!
//! Leading whitespace becomes tabs (one per `tab_width` columns, leftover
//! columns stay spaces) and trailing spaces and tabs are dropped. Lines
//! that begin inside a multi-line raw string or block comment keep their
//! leading whitespace, and lines that continue into one keep their
//! trailing whitespace, since both are part of the token.

use crate::error::Diagnostic;
use crate::syntax::lexer::tokenize;
use crate::syntax::token::TokenKind;

pub fn reindent(text: &str, tab_width: usize) -> Result<String, Diagnostic> {
    let tab_width = tab_width.max(1);
    let lines: Vec<&str> = text.split('\n').collect();
    let mut keep_lead = vec![false; lines.len()];
    let mut keep_trail = vec![false; lines.len()];
    for tok in tokenize(text)? {
        let spans_lines = tok.span.is_multiline()
            && matches!(tok.kind, TokenKind::Str(_) | TokenKind::BlockComment);
        if !spans_lines {
            continue;
        }
        for line in tok.span.line + 1..=tok.span.end_line {
            keep_lead[line - 1] = true;
        }
        for line in tok.span.line..tok.span.end_line {
            keep_trail[line - 1] = true;
        }
    }

    let mut out = String::with_capacity(text.len());
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let mut line: &str = line;
        if !keep_trail[i] {
            line = line.trim_end_matches([' ', '\t']);
        }
        if keep_lead[i] {
            out.push_str(line);
            continue;
        }
        let body = line.trim_start_matches([' ', '\t']);
        let width = leading_width(&line[..line.len() - body.len()], tab_width);
        for _ in 0..width / tab_width {
            out.push('\t');
        }
        for _ in 0..width % tab_width {
            out.push(' ');
        }
        out.push_str(body);
    }
    Ok(out)
}

/// Visual width of a run of spaces and tabs, with tab stops every
/// `tab_width` columns.
fn leading_width(ws: &str, tab_width: usize) -> usize {
    ws.chars().fold(0, |col, c| match c {
        '\t' => (col / tab_width + 1) * tab_width,
        _ => col + 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_become_tabs() {
        let text = "func f() {\n    if x {\n        y()\n    }\n}";
        assert_eq!(
            reindent(text, 4).unwrap(),
            "func f() {\n\tif x {\n\t\ty()\n\t}\n}"
        );
    }

    #[test]
    fn leftover_columns_stay_spaces() {
        let text = "func f() {\n      g()\n}";
        assert_eq!(reindent(text, 4).unwrap(), "func f() {\n\t  g()\n}");
    }

    #[test]
    fn trailing_whitespace_is_dropped() {
        let text = "func f() { \t\n\tg()   \n}";
        assert_eq!(reindent(text, 4).unwrap(), "func f() {\n\tg()\n}");
    }

    #[test]
    fn raw_string_contents_are_preserved() {
        let text = "var s = `first  \n    second\n  third`";
        assert_eq!(reindent(text, 4).unwrap(), text);
    }

    #[test]
    fn block_comment_lines_are_preserved() {
        let text = "/*\n   * aligned\n   */\nfunc f() {}";
        assert_eq!(reindent(text, 4).unwrap(), text);
    }

    #[test]
    fn idempotent_on_tabs() {
        let text = "func f() {\n\t  g()\n}";
        assert_eq!(reindent(text, 4).unwrap(), text);
    }

    #[test]
    fn mixed_tab_and_spaces_use_tab_stops() {
        // two spaces then a tab reach column 4
        let text = "func f() {\n  \tg()\n}";
        assert_eq!(reindent(text, 4).unwrap(), "func f() {\n\tg()\n}");
    }
}
