//! Go source front end: scanner, top-level parser and declaration tree.
//!
//! Source text ──► `lexer` ──► tokens ──► `parser` ──► `SourceFile` + comment groups

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{
    CommentGroup, Decl, DeclId, DeclKind, FuncDecl, GenDecl, Keyword, Parsed, SourceFile, Spec,
};
pub use parser::parse;
pub use token::Span;
