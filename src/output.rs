//! Output rendering for batch reports.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-file fields and a top-level summary.

use std::path::Path;

use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use similar::TextDiff;

use crate::batch::{BatchReport, FileReport, Outcome, STDIN_NAME};
use crate::error::Error;
use crate::utils;

/// Lines of unchanged context around each diff hunk.
const CONTEXT: usize = 3;

/// What the run was asked to show.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mode {
    pub write: bool,
    pub list: bool,
    pub diff: bool,
    pub check: bool,
}

fn display(path: &Path) -> String {
    if path == Path::new(STDIN_NAME) {
        STDIN_NAME.to_string()
    } else {
        utils::rel_to_wd(path)
    }
}

/// Print a batch report in the requested format.
///
/// Human mode follows the classic formatter contract: rewritten text of
/// changed files on stdout, nothing for unchanged ones, failures on stderr.
/// `--list` and `--check` print file names instead, `--diff` prints diffs.
pub fn print_report(report: &BatchReport, output: &str, mode: Mode) {
    if output == "json" {
        match serde_json::to_string_pretty(&compose_report_json(report, mode)) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("{} {}", utils::error_prefix(output), e),
        }
        return;
    }
    let color = utils::use_colors(output);
    for file in &report.files {
        let name = display(&file.path);
        match &file.outcome {
            Outcome::Unchanged => {}
            Outcome::Skipped(reason) => {
                eprintln!("{} skipped {} ({})", utils::info_prefix(output), name, reason);
            }
            Outcome::Failed(err) => {
                for line in failure_lines(&name, err) {
                    eprintln!("{} {}", utils::error_prefix(output), line);
                }
            }
            Outcome::Changed { original, rendered } | Outcome::Written { original, rendered } => {
                if mode.list || (mode.check && !mode.diff) {
                    println!("{}", name);
                }
                if mode.diff {
                    let d = unified_diff(original, rendered);
                    if color {
                        println!("{} {}\n{}", "---".cyan().bold(), name.bold(), d);
                    } else {
                        println!("--- {}\n{}", name, d);
                    }
                } else if matches!(file.outcome, Outcome::Written { .. }) {
                    if !mode.list {
                        if color {
                            println!("{} {}", "sorted:".green().bold(), name.bold());
                        } else {
                            println!("sorted: {}", name);
                        }
                    }
                } else if !mode.list && !mode.check {
                    print!("{}", rendered);
                }
            }
        }
    }
}

/// One message per diagnostic, prefixed with the file name.
pub fn failure_lines(name: &str, err: &Error) -> Vec<String> {
    match err {
        Error::Parse { diagnostics } => diagnostics
            .iter()
            .map(|d| format!("{}:{}", name, d))
            .collect(),
        Error::Io { source, .. } => vec![format!("{}: {}", name, source)],
        Error::Render(e) => vec![format!("{}: {}", name, e)],
    }
}

fn file_json(file: &FileReport, mode: Mode) -> JsonVal {
    let name = display(&file.path);
    let (preview, diff) = match &file.outcome {
        Outcome::Changed { original, rendered } => (
            if mode.diff { None } else { Some(rendered.clone()) },
            if mode.diff {
                Some(unified_diff(original, rendered))
            } else {
                None
            },
        ),
        Outcome::Written { original, rendered } => (
            None,
            if mode.diff {
                Some(unified_diff(original, rendered))
            } else {
                None
            },
        ),
        _ => (None, None),
    };
    let errors: Option<Vec<String>> = match &file.outcome {
        Outcome::Failed(err) => Some(failure_lines(&name, err)),
        _ => None,
    };
    let reason = match &file.outcome {
        Outcome::Skipped(reason) => Some(reason.clone()),
        _ => None,
    };
    json!({
        "file": name,
        "status": file.outcome.label(),
        "changed": file.outcome.is_changed(),
        "wrote": matches!(file.outcome, Outcome::Written { .. }),
        "preview": preview,
        "diff": diff,
        "errors": errors,
        "reason": reason,
    })
}

/// Compose report JSON object (pure) for testing/snapshot purposes.
pub fn compose_report_json(report: &BatchReport, mode: Mode) -> JsonVal {
    let items: Vec<_> = report.files.iter().map(|f| file_json(f, mode)).collect();
    let summary = json!({
        "changed": report.changed(),
        "wrote": report.written(),
        "skipped": report.skipped(),
        "failed": report.failed(),
        "total": report.files.len(),
        "exit_code": report.exit_code(mode.check),
    });
    json!({"results": items, "summary": summary})
}

/// Line diff of `old` to `new` in unified format with `CONTEXT` lines.
/// Empty when the texts are equal.
pub fn unified_diff(old: &str, new: &str) -> String {
    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(CONTEXT)
        .header("original", "sorted")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Diagnostic;
    use std::path::PathBuf;

    fn report() -> BatchReport {
        BatchReport {
            files: vec![
                FileReport {
                    path: PathBuf::from("a.go"),
                    outcome: Outcome::Changed {
                        original: "package p\n\nfunc b() {}\n\nfunc a() {}\n".into(),
                        rendered: "package p\n\nfunc a() {}\n\nfunc b() {}\n".into(),
                    },
                },
                FileReport {
                    path: PathBuf::from("b.go"),
                    outcome: Outcome::Unchanged,
                },
                FileReport {
                    path: PathBuf::from("c.go"),
                    outcome: Outcome::Failed(Error::Parse {
                        diagnostics: vec![Diagnostic::new(3, 6, "expected function name, found '{'")],
                    }),
                },
            ],
        }
    }

    #[test]
    fn test_compose_report_json_preview_and_diff() {
        let rep = report();
        let out = compose_report_json(&rep, Mode::default());
        assert_eq!(out["summary"]["changed"], 1);
        assert_eq!(out["summary"]["failed"], 1);
        assert_eq!(out["summary"]["total"], 3);
        assert_eq!(out["summary"]["exit_code"], 2);
        assert_eq!(out["results"][0]["status"], "changed");
        assert!(out["results"][0]["preview"].is_string());
        assert!(out["results"][0]["diff"].is_null());
        assert_eq!(out["results"][1]["changed"], false);
        assert_eq!(
            out["results"][2]["errors"][0],
            "c.go:3:6: expected function name, found '{'"
        );

        let with_diff = compose_report_json(
            &rep,
            Mode {
                diff: true,
                ..Mode::default()
            },
        );
        assert!(with_diff["results"][0]["preview"].is_null());
        assert!(with_diff["results"][0]["diff"].is_string());
    }

    #[test]
    fn diff_shows_moved_lines() {
        let d = unified_diff(
            "package p\n\nfunc b() {}\n\nfunc a() {}\n",
            "package p\n\nfunc a() {}\n\nfunc b() {}\n",
        );
        assert!(d.starts_with("--- original\n+++ sorted\n@@ -1,"));
        assert!(d.contains("\n-func b() {}\n") || d.contains("\n-func a() {}\n"));
        assert!(d.contains("\n+func b() {}\n") || d.contains("\n+func a() {}\n"));
    }

    #[test]
    fn identical_text_has_no_hunks() {
        assert_eq!(unified_diff("x\ny\n", "x\ny\n"), "");
    }

    #[test]
    fn distant_changes_get_separate_hunks() {
        let old: String = (0..30).map(|i| format!("l{i}\n")).collect();
        let new = old.replace("l2\n", "L2\n").replace("l25\n", "L25\n");
        let d = unified_diff(&old, &new);
        assert_eq!(d.matches("@@ -").count(), 2);
        assert!(d.contains("@@ -1,6 +1,6 @@\n"));
    }

    #[test]
    fn large_reversed_input_diffs_every_line() {
        let old: String = (0..8000).map(|i| format!("l{i}\n")).collect();
        let new: String = (0..8000).rev().map(|i| format!("l{i}\n")).collect();
        let d = unified_diff(&old, &new);
        assert!(d.starts_with("--- original\n+++ sorted\n"));
        assert!(d.lines().filter(|l| l.starts_with('+') && !l.starts_with("+++")).count() >= 7999);
    }

    #[test]
    fn failure_lines_prefix_each_diagnostic() {
        let err = Error::Parse {
            diagnostics: vec![
                Diagnostic::new(1, 1, "first"),
                Diagnostic::new(2, 1, "second"),
            ],
        };
        assert_eq!(failure_lines("x.go", &err), vec!["x.go:1:1: first", "x.go:2:1: second"]);
    }
}
