//! Error types for the sorting pipeline and the batch driver.
//!
//! Every error is attributed to one file by the caller; nothing here is
//! global. Parse errors carry positioned diagnostics, render errors signal
//! an internal invariant violation.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// A positioned message from the scanner or parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub col: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn new(line: usize, col: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            col,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.col, self.message)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input. The file is skipped.
    #[error("{}", join_diagnostics(.diagnostics))]
    Parse { diagnostics: Vec<Diagnostic> },

    /// File unreadable or unwritable.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl Error {
    pub fn parse(diagnostic: Diagnostic) -> Self {
        Error::Parse {
            diagnostics: vec![diagnostic],
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Invariant violations detected while laying out a sorted file.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("declaration #{0} appears more than once in the sorted sequence")]
    Duplicate(usize),

    #[error("declaration #{0} has no comment association")]
    Unattached(usize),

    #[error("sorted sequence holds {sorted} declarations, parsed {parsed}")]
    CountMismatch { sorted: usize, parsed: usize },

    #[error("rendered text no longer scans: {0}")]
    Rescan(Diagnostic),
}

fn join_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_lists_every_diagnostic() {
        let err = Error::Parse {
            diagnostics: vec![
                Diagnostic::new(3, 1, "expected declaration, found 'x'"),
                Diagnostic::new(9, 5, "expected ';', found ')'"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "3:1: expected declaration, found 'x'\n9:5: expected ';', found ')'"
        );
    }

    #[test]
    fn io_error_names_the_path() {
        let err = Error::io(
            "a/b.go",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        assert_eq!(err.to_string(), "a/b.go: no such file");
    }
}
