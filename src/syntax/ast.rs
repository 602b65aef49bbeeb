//! Declaration tree for one Go source file.
//!
//! Only the top level is modelled. Function bodies, spec values and types
//! stay as owned source text inside each `Decl`.

use crate::syntax::token::Span;

/// Stable identity of a declaration: its index in source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub usize);

/// Grouped declaration keyword. The derived order is the precedence used
/// when sorting: import < const < type < var.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Keyword {
    Import,
    Const,
    Type,
    Var,
}

impl Keyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Import => "import",
            Keyword::Const => "const",
            Keyword::Type => "type",
            Keyword::Var => "var",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Package name from the package clause.
    pub package: String,
    /// Everything up to and including the package name.
    pub header: String,
    /// Span of the package clause (`package` through the name).
    pub header_span: Span,
    pub decls: Vec<Decl>,
}

#[derive(Debug, Clone)]
pub struct Decl {
    pub id: DeclId,
    /// Original position. Left untouched when `text` is rewritten.
    pub span: Span,
    pub text: String,
    pub kind: DeclKind,
}

#[derive(Debug, Clone)]
pub enum DeclKind {
    Func(FuncDecl),
    Gen(GenDecl),
}

#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub name: String,
    /// Receiver parameter text without parentheses, e.g. `s *Server`.
    pub receiver: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GenDecl {
    pub keyword: Keyword,
    /// `(` and `)` of a parenthesized group.
    pub parens: Option<(Span, Span)>,
    pub specs: Vec<Spec>,
}

#[derive(Debug, Clone)]
pub struct Spec {
    pub span: Span,
    /// Bound identifiers (const/var) or the single type name (type).
    pub names: Vec<String>,
    /// Import path without quotes.
    pub path: Option<String>,
    /// Local import name (`.`, `_` or an identifier).
    pub local_name: Option<String>,
    /// An `=` appears at the top nesting level.
    pub has_value: bool,
    /// The spec mentions `iota`.
    pub uses_iota: bool,
    /// A `(` appears after the `=`, i.e. the value may call something.
    pub value_has_call: bool,
}

impl Spec {
    /// First bound identifier, type name, or import path.
    pub fn primary_name(&self) -> &str {
        if let Some(path) = &self.path {
            return path;
        }
        self.names.first().map(String::as_str).unwrap_or("")
    }
}

impl Decl {
    pub fn as_gen(&self) -> Option<&GenDecl> {
        match &self.kind {
            DeclKind::Gen(g) => Some(g),
            DeclKind::Func(_) => None,
        }
    }

    pub fn as_func(&self) -> Option<&FuncDecl> {
        match &self.kind {
            DeclKind::Func(f) => Some(f),
            DeclKind::Gen(_) => None,
        }
    }
}

/// Comments with no blank line and no code between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentGroup {
    pub span: Span,
    pub text: String,
}

/// Parser output: the tree plus every comment group in source order.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub file: SourceFile,
    pub comments: Vec<CommentGroup>,
}
