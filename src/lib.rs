//! gosort core library.
//!
//! Canonicalizes the top-level declaration order of Go source files:
//! parse, normalize, reorder, render, compare. The pipeline is a pure
//! function of its input and idempotent.
//!
//! High-level modules:
//! - `syntax`: Go scanner, top-level parser and declaration tree.
//! - `style`: Spec sorting inside parenthesized blocks.
//! - `classify` / `order` / `sorter`: Comparison keys, ordering policy, stable sort.
//! - `attach`: Comment association keyed by declaration identity.
//! - `layout` / `render`: Indentation layout and canonical text.
//! - `detect`: Byte comparison against the input.
//! - `pipeline`: The round trip for one source text.
//! - `batch`: Target resolution and per-file outcomes.
//! - `config`: Discovery and effective configuration resolution.
//! - `cli` / `output`: CLI argument parsing and report printers.
//! - `utils`: Supporting helpers.
pub mod attach;
pub mod batch;
pub mod classify;
pub mod cli;
pub mod config;
pub mod detect;
pub mod error;
pub mod layout;
pub mod order;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod sorter;
pub mod style;
pub mod syntax;
pub mod utils;

pub use detect::Change;
pub use error::{Diagnostic, Error, RenderError, Result};
pub use pipeline::{render_sorted, sort_source, SortOptions};
