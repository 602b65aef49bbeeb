//! Batch driver: resolves CLI targets and runs the pipeline over each file.
//!
//! Files are processed one after another. A failure is recorded in that
//! file's report and the run moves on; the aggregate is returned as a
//! value, never kept in process state.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use glob::{MatchOptions, Pattern};
use regex::Regex;

use crate::detect::Change;
use crate::error::Error;
use crate::pipeline::{sort_source, SortOptions};

/// Path argument that selects standard input.
pub const STDIN_ARG: &str = "-";
/// Name reported for standard input.
pub const STDIN_NAME: &str = "<standard input>";

static GENERATED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^// Code generated .* DO NOT EDIT\.$").expect("valid generated marker regex")
});

#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub sort: SortOptions,
    /// Replace changed files in place.
    pub write: bool,
    pub skip_generated: bool,
    pub exclude: Excludes,
}

/// Compiled `exclude` patterns, matched against paths relative to `root`
/// and against bare file names.
#[derive(Debug, Clone, Default)]
pub struct Excludes {
    root: PathBuf,
    patterns: Vec<Pattern>,
}

impl Excludes {
    pub fn new(root: &Path, patterns: &[String]) -> Result<Self, glob::PatternError> {
        let patterns = patterns
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            root: absolute(root),
            patterns,
        })
    }

    pub fn matches(&self, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let abs = absolute(path);
        let rel = pathdiff::diff_paths(&abs, &self.root).unwrap_or(abs);
        let rel = rel.to_string_lossy().replace('\\', "/");
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.patterns
            .iter()
            .any(|p| p.matches(&rel) || p.matches(&name))
    }
}

#[derive(Debug)]
pub enum Outcome {
    Unchanged,
    /// Canonical text differs; nothing written.
    Changed { original: String, rendered: String },
    /// Canonical text differed and replaced the file.
    Written { original: String, rendered: String },
    Skipped(String),
    Failed(Error),
}

impl Outcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, Outcome::Changed { .. } | Outcome::Written { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Unchanged => "unchanged",
            Outcome::Changed { .. } => "changed",
            Outcome::Written { .. } => "written",
            Outcome::Skipped(_) => "skipped",
            Outcome::Failed(_) => "failed",
        }
    }
}

#[derive(Debug)]
pub struct FileReport {
    /// Path as given or discovered; `<standard input>` for stdin.
    pub path: PathBuf,
    pub outcome: Outcome,
}

impl FileReport {
    pub fn is_stdin(&self) -> bool {
        self.path == Path::new(STDIN_NAME)
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn changed(&self) -> usize {
        self.files.iter().filter(|f| f.outcome.is_changed()).count()
    }

    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Written { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }

    /// 2 when any file failed, 1 when `check` is set and a file would
    /// change, 0 otherwise.
    pub fn exit_code(&self, check: bool) -> i32 {
        if self.failed() > 0 {
            2
        } else if check && self.changed() > 0 {
            1
        } else {
            0
        }
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.outcome)).count()
    }
}

enum Target {
    Stdin,
    File(PathBuf),
    /// A walk entry that could not be inspected.
    Unreadable(PathBuf, Error),
}

/// Process every path in `paths`; `stdin` backs the `-` argument.
pub fn run_batch(paths: &[String], opts: &BatchOptions, stdin: &mut dyn Read) -> BatchReport {
    let mut report = BatchReport::default();
    for arg in paths {
        for target in expand(arg) {
            report.files.push(process(target, opts, stdin));
        }
    }
    report
}

/// Canonicalize one in-memory source. Never touches the filesystem.
pub fn process_source(src: String, opts: &SortOptions) -> Outcome {
    match sort_source(&src, opts) {
        Ok(Change::Unchanged) => Outcome::Unchanged,
        Ok(Change::Changed(rendered)) => Outcome::Changed {
            original: src,
            rendered,
        },
        Err(e) => Outcome::Failed(e),
    }
}

pub fn is_generated(src: &str) -> bool {
    // the marker must precede the package clause
    let end = src
        .match_indices("package")
        .find(|(i, _)| *i == 0 || src.as_bytes()[i - 1] == b'\n')
        .map_or(src.len(), |(i, _)| i);
    GENERATED.is_match(&src[..end])
}

fn expand(arg: &str) -> Vec<Target> {
    if arg == STDIN_ARG {
        return vec![Target::Stdin];
    }
    let path = PathBuf::from(arg);
    match fs::metadata(&path) {
        Ok(meta) if meta.is_dir() => walk(&path),
        Ok(_) => vec![Target::File(path)],
        Err(e) => {
            let err = Error::io(&path, e);
            vec![Target::Unreadable(path, err)]
        }
    }
}

/// `*.go` entries below `path` in path order. Entries that cannot be read
/// are kept as failures so they count against the run.
fn walk(path: &Path) -> Vec<Target> {
    let pattern = format!("{}/**/*.go", Pattern::escape(&path.to_string_lossy()));
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };
    let entries = match glob::glob_with(&pattern, options) {
        Ok(entries) => entries,
        Err(e) => {
            let err = Error::io(path, io::Error::new(io::ErrorKind::InvalidInput, e));
            return vec![Target::Unreadable(path.to_path_buf(), err)];
        }
    };
    let mut targets: Vec<(PathBuf, Option<Error>)> = Vec::new();
    for entry in entries {
        match entry {
            // a directory named `x.go` is not a source file
            Ok(p) if p.is_dir() || hidden_below(path, &p) => {}
            Ok(p) => targets.push((p, None)),
            Err(e) => {
                let p = e.path().to_path_buf();
                if !hidden_below(path, &p) {
                    let err = Error::io(&p, e.into_error());
                    targets.push((p, Some(err)));
                }
            }
        }
    }
    targets.sort_by(|a, b| a.0.cmp(&b.0));
    targets
        .into_iter()
        .map(|(p, err)| match err {
            Some(err) => Target::Unreadable(p, err),
            None => Target::File(p),
        })
        .collect()
}

fn process(target: Target, opts: &BatchOptions, stdin: &mut dyn Read) -> FileReport {
    let (path, read) = match target {
        Target::Stdin => {
            let mut buf = String::new();
            let read = stdin.read_to_string(&mut buf).map(|_| buf);
            (PathBuf::from(STDIN_NAME), read)
        }
        Target::Unreadable(path, err) => {
            return FileReport {
                path,
                outcome: Outcome::Failed(err),
            };
        }
        Target::File(path) => {
            if opts.exclude.matches(&path) {
                return FileReport {
                    path,
                    outcome: Outcome::Skipped("excluded".to_string()),
                };
            }
            let read = fs::read_to_string(&path);
            (path, read)
        }
    };
    let src = match read {
        Ok(src) => src,
        Err(e) => {
            let outcome = Outcome::Failed(Error::io(&path, e));
            return FileReport { path, outcome };
        }
    };
    if opts.skip_generated && is_generated(&src) {
        return FileReport {
            path,
            outcome: Outcome::Skipped("generated".to_string()),
        };
    }

    let outcome = match process_source(src, &opts.sort) {
        Outcome::Changed { original, rendered } if opts.write && path != Path::new(STDIN_NAME) => {
            match fs::write(&path, &rendered) {
                Ok(()) => Outcome::Written { original, rendered },
                Err(e) => Outcome::Failed(Error::io(&path, e)),
            }
        }
        other => other,
    };
    FileReport { path, outcome }
}

/// Whether any component of `path` under `root` starts with a dot.
fn hidden_below(root: &Path, path: &Path) -> bool {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
}

fn absolute(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::empty;
    use tempfile::tempdir;

    const MESSY: &str = "package p\n\nfunc b() {}\n\nfunc a() {}\n";
    const CLEAN: &str = "package p\n\nfunc a() {}\n\nfunc b() {}\n";

    fn arg(p: &Path) -> String {
        p.to_string_lossy().to_string()
    }

    #[test]
    fn directory_walk_is_sorted_and_skips_hidden() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join("z.go"), CLEAN).unwrap();
        fs::write(root.join("sub/a.go"), MESSY).unwrap();
        fs::write(root.join(".hidden.go"), MESSY).unwrap();
        fs::write(root.join(".git/x.go"), MESSY).unwrap();
        fs::write(root.join("notes.txt"), "x").unwrap();

        let report = run_batch(&[arg(root)], &BatchOptions::default(), &mut empty());
        let names: Vec<_> = report
            .files
            .iter()
            .map(|f| f.path.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(names, vec![PathBuf::from("sub/a.go"), PathBuf::from("z.go")]);
        assert_eq!(report.changed(), 1);
        assert_eq!(report.exit_code(true), 1);
        assert_eq!(report.exit_code(false), 0);
    }

    #[test]
    fn failure_does_not_stop_the_batch() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("bad.go");
        let good = dir.path().join("good.go");
        fs::write(&bad, "package p\n\nfunc {\n").unwrap();
        fs::write(&good, MESSY).unwrap();
        let missing = dir.path().join("missing.go");

        let report = run_batch(
            &[arg(&bad), arg(&missing), arg(&good)],
            &BatchOptions::default(),
            &mut empty(),
        );
        assert_eq!(report.files.len(), 3);
        assert!(matches!(
            report.files[0].outcome,
            Outcome::Failed(Error::Parse { .. })
        ));
        assert!(matches!(
            report.files[1].outcome,
            Outcome::Failed(Error::Io { .. })
        ));
        assert!(report.files[2].outcome.is_changed());
        assert_eq!(report.exit_code(true), 2);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_walk_entries_are_failures() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("ok.go"), CLEAN).unwrap();
        std::os::unix::fs::symlink(root.join("gone.go"), root.join("dangling.go")).unwrap();

        let report = run_batch(&[arg(root)], &BatchOptions::default(), &mut empty());
        assert_eq!(report.files.len(), 2);
        assert!(report.files[0].path.ends_with("dangling.go"));
        assert!(matches!(
            report.files[0].outcome,
            Outcome::Failed(Error::Io { .. })
        ));
        assert!(matches!(report.files[1].outcome, Outcome::Unchanged));
        assert_eq!(report.exit_code(false), 2);
    }

    #[test]
    fn write_mode_replaces_only_changed_files() {
        let dir = tempdir().unwrap();
        let messy = dir.path().join("messy.go");
        let bad = dir.path().join("bad.go");
        fs::write(&messy, MESSY).unwrap();
        fs::write(&bad, "package p\n\nfunc b() {}\n\nfunc a() {\n").unwrap();
        let opts = BatchOptions {
            write: true,
            ..BatchOptions::default()
        };

        let report = run_batch(&[arg(&messy), arg(&bad)], &opts, &mut empty());
        assert!(matches!(report.files[0].outcome, Outcome::Written { .. }));
        assert_eq!(fs::read_to_string(&messy).unwrap(), CLEAN);
        assert_eq!(
            fs::read_to_string(&bad).unwrap(),
            "package p\n\nfunc b() {}\n\nfunc a() {\n"
        );
        assert_eq!(report.written(), 1);
        assert_eq!(report.failed(), 1);
    }

    #[test]
    fn stdin_is_read_and_never_written() {
        let opts = BatchOptions {
            write: true,
            ..BatchOptions::default()
        };
        let mut input = MESSY.as_bytes();
        let report = run_batch(&["-".to_string()], &opts, &mut input);
        let file = &report.files[0];
        assert!(file.is_stdin());
        match &file.outcome {
            Outcome::Changed { rendered, .. } => assert_eq!(rendered, CLEAN),
            other => panic!("expected change, got {other:?}"),
        }
    }

    #[test]
    fn excluded_and_generated_files_are_skipped() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("vendor")).unwrap();
        fs::write(root.join("vendor/v.go"), MESSY).unwrap();
        fs::write(
            root.join("gen.go"),
            "// Code generated by stringer. DO NOT EDIT.\n\npackage p\n\nfunc b() {}\n\nfunc a() {}\n",
        )
        .unwrap();
        let opts = BatchOptions {
            skip_generated: true,
            exclude: Excludes::new(root, &["vendor/**".to_string()]).unwrap(),
            ..BatchOptions::default()
        };

        let report = run_batch(&[arg(root)], &opts, &mut empty());
        assert_eq!(report.skipped(), 2);
        assert_eq!(report.changed(), 0);
    }

    #[test]
    fn generated_marker_must_precede_package_clause() {
        assert!(is_generated(
            "// Code generated by protoc-gen-go. DO NOT EDIT.\npackage p\n"
        ));
        assert!(!is_generated(
            "package p\n\n// Code generated by hand. DO NOT EDIT.\n"
        ));
        assert!(!is_generated("// Code generated, edit freely.\npackage p\n"));
    }

    #[test]
    fn exclude_patterns_match_relative_paths_and_names() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("internal")).unwrap();
        fs::write(root.join("internal/mock_db.go"), "").unwrap();
        let ex = Excludes::new(root, &["mock_*.go".to_string()]).unwrap();
        assert!(ex.matches(&root.join("internal/mock_db.go")));
        assert!(!ex.matches(&root.join("internal/db.go")));
        assert!(Excludes::new(root, &["[".to_string()]).is_err());
    }
}
