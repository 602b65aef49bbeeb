//! The round trip for one file: parse, normalize, attach comments, sort,
//! render, compare.
//!
//! A pure function of its input: no filesystem access, no shared state.
//! CRLF line endings are rewritten to LF before parsing, so canonical text
//! always uses `\n`.

use std::borrow::Cow;

use crate::attach::associate;
use crate::classify::DEFAULT_ENTRY_POINT;
use crate::detect::{detect, Change};
use crate::error::Result;
use crate::render::{render, Layout};
use crate::sorter::sort_file;
use crate::style::normalize_specs;
use crate::syntax::parse;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOptions {
    /// Function name sorted before all other functions.
    pub entry_point: String,
    /// Run the spec pre-pass and rewrite indentation.
    pub normalize: bool,
    pub tab_width: usize,
}

impl Default for SortOptions {
    fn default() -> Self {
        Self {
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            normalize: true,
            tab_width: 4,
        }
    }
}

/// Canonical text of `src`.
pub fn render_sorted(src: &str, opts: &SortOptions) -> Result<String> {
    let src = unix_newlines(src);
    let src = src.as_ref();
    let parsed = parse(src)?;
    let mut file = parsed.file;
    if opts.normalize {
        normalize_specs(src, &mut file, &parsed.comments);
    }
    // associate before sorting: bindings come from source positions
    let comments = associate(src, &file, &parsed.comments);
    sort_file(&mut file, &opts.entry_point);
    let layout = Layout {
        reindent: opts.normalize,
        tab_width: opts.tab_width,
    };
    Ok(render(&file, &comments, &layout)?)
}

fn unix_newlines(src: &str) -> Cow<'_, str> {
    if src.contains("\r\n") {
        Cow::Owned(src.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(src)
    }
}

/// Canonicalize `src` and report whether anything moved.
pub fn sort_source(src: &str, opts: &SortOptions) -> Result<Change> {
    let rendered = render_sorted(src, opts)?;
    Ok(detect(src.as_bytes(), rendered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn sorted(src: &str) -> String {
        render_sorted(src, &SortOptions::default()).unwrap()
    }

    #[test]
    fn groups_first_then_entry_point_then_names() {
        let src = "package main\n\nfunc zeta() {}\n\nfunc main() {}\n\nfunc alpha() {}\n\nconst (\n\tc2 = 2\n\tc1 = 1\n)\n";
        assert_eq!(
            sorted(src),
            "package main\n\nconst (\n\tc1 = 1\n\tc2 = 2\n)\n\nfunc main() {}\n\nfunc alpha() {}\n\nfunc zeta() {}\n"
        );
    }

    #[test]
    fn canonical_input_is_unchanged() {
        let src = "package main\n\nfunc main() {}\n\nfunc alpha() {}\n\nfunc zeta() {}\n";
        assert_eq!(
            sort_source(src, &SortOptions::default()).unwrap(),
            Change::Unchanged
        );
    }

    #[test]
    fn output_is_a_fixed_point() {
        let src = "package p\n\n// Z doc.\nfunc Z() {}\n\nvar (\n\tb = 2\n\ta = 1\n)\n\n// detached\n\ntype T struct {\n    X int\n}\n";
        let once = sorted(src);
        assert_eq!(
            once,
            "package p\n\n// detached\n\ntype T struct {\n\tX int\n}\n\nvar (\n\ta = 1\n\tb = 2\n)\n\n// Z doc.\nfunc Z() {}\n"
        );
        assert_eq!(
            sort_source(&once, &SortOptions::default()).unwrap(),
            Change::Unchanged
        );
    }

    #[test]
    fn same_named_methods_keep_source_order() {
        let src = "package p\n\nfunc (b *B) Run() {}\n\nfunc (a *A) Run() {}\n\nfunc Alpha() {}\n";
        assert_eq!(
            sorted(src),
            "package p\n\nfunc Alpha() {}\n\nfunc (b *B) Run() {}\n\nfunc (a *A) Run() {}\n"
        );
    }

    #[test]
    fn comments_travel_with_their_declaration() {
        let src = "package p // pkg\n\n// B does b.\nfunc B() {} // trailing b\n\n// Section A\n\n// A does a.\nfunc A() {}\n\n// footer\n";
        assert_eq!(
            sorted(src),
            "package p // pkg\n\n// Section A\n\n// A does a.\nfunc A() {}\n\n// B does b.\nfunc B() {} // trailing b\n\n// footer\n"
        );
    }

    #[test]
    fn custom_entry_point() {
        let opts = SortOptions {
            entry_point: "init".to_string(),
            ..SortOptions::default()
        };
        let src = "package p\n\nfunc b() {}\n\nfunc init() {}\n";
        assert_eq!(
            render_sorted(src, &opts).unwrap(),
            "package p\n\nfunc init() {}\n\nfunc b() {}\n"
        );
    }

    #[test]
    fn method_named_like_the_entry_point_sorts_first() {
        let src = "package p\n\nfunc alpha() {}\n\nfunc (t T) main() {}\n";
        assert_eq!(
            sorted(src),
            "package p\n\nfunc (t T) main() {}\n\nfunc alpha() {}\n"
        );
    }

    #[test]
    fn crlf_input_renders_with_unix_newlines() {
        let src = "package p\r\n\r\nfunc b() {\r\n\tx()\r\n}\r\n\r\n// doc\r\nfunc a() {}\r\n";
        let out = sorted(src);
        assert_eq!(out, "package p\n\n// doc\nfunc a() {}\n\nfunc b() {\n\tx()\n}\n");
        assert!(sort_source(src, &SortOptions::default()).unwrap().is_changed());
        assert_eq!(
            sort_source(&out, &SortOptions::default()).unwrap(),
            Change::Unchanged
        );
    }

    #[test]
    fn byte_order_mark_is_kept_in_the_header() {
        let src = "\u{feff}package p\n\nfunc b() {}\n\nfunc a() {}\n";
        assert_eq!(
            sorted(src),
            "\u{feff}package p\n\nfunc a() {}\n\nfunc b() {}\n"
        );
    }

    #[test]
    fn without_normalization_text_is_verbatim() {
        let opts = SortOptions {
            normalize: false,
            ..SortOptions::default()
        };
        let src = "package p\n\nfunc b() {\n    x()   \n}\n\nvar (\n\tz = 1\n\ty = 2\n)\n";
        assert_eq!(
            render_sorted(src, &opts).unwrap(),
            "package p\n\nvar (\n\tz = 1\n\ty = 2\n)\n\nfunc b() {\n    x()   \n}\n"
        );
    }

    #[test]
    fn normalization_reindents_bodies() {
        let src = "package p\n\nfunc b() {\n    x()   \n}\n";
        assert_eq!(sorted(src), "package p\n\nfunc b() {\n\tx()\n}\n");
    }

    #[test]
    fn parse_errors_are_reported() {
        match sort_source("package p\n\nfunc {\n", &SortOptions::default()) {
            Err(Error::Parse { diagnostics }) => assert_eq!(diagnostics[0].line, 3),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
