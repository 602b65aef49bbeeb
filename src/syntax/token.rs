//! Lexical tokens of Go source text.
//!
//! Only the distinctions the top-level parser needs are kept: brackets,
//! separators, declaration keywords, identifiers, string literals and
//! comments. Every other operator collapses into `Op`.

use std::fmt;

/// Byte range in source text plus the lines it starts and ends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Byte offset of the first byte.
    pub start: usize,
    /// Byte offset one past the last byte.
    pub end: usize,
    /// Line of `start` (1-based).
    pub line: usize,
    /// Column of `start` (1-based, in bytes).
    pub col: usize,
    /// Line of the last byte (equal to `line` for single-line tokens).
    pub end_line: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, col: usize, end_line: usize) -> Self {
        Self {
            start,
            end,
            line,
            col,
            end_line,
        }
    }

    /// Smallest span covering `self` and `other` (`other` must not start earlier).
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
            line: self.line,
            col: self.col,
            end_line: other.end_line,
        }
    }

    pub fn is_multiline(&self) -> bool {
        self.end_line > self.line
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, TokenKind::LineComment | TokenKind::BlockComment)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Keywords the parser dispatches on
    Package,
    Import,
    Const,
    Type,
    Var,
    Func,
    /// Any other reserved word; `break`, `continue`, `fallthrough` and
    /// `return` matter for semicolon insertion.
    Keyword(&'static str),

    Ident(String),
    Int,
    Float,
    Imag,
    Rune,
    /// Interpreted or raw string literal; the payload is the source text
    /// including its quotes.
    Str(String),

    LParen,
    RParen,
    LBrack,
    RBrack,
    LBrace,
    RBrace,
    Comma,
    Dot,
    Assign,
    /// `implicit` is true when the scanner inserted it at a newline or EOF.
    Semi { implicit: bool },
    Op(&'static str),

    LineComment,
    BlockComment,

    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Package => write!(f, "'package'"),
            TokenKind::Import => write!(f, "'import'"),
            TokenKind::Const => write!(f, "'const'"),
            TokenKind::Type => write!(f, "'type'"),
            TokenKind::Var => write!(f, "'var'"),
            TokenKind::Func => write!(f, "'func'"),
            TokenKind::Keyword(k) => write!(f, "'{k}'"),
            TokenKind::Ident(s) => write!(f, "identifier '{s}'"),
            TokenKind::Int | TokenKind::Float | TokenKind::Imag => write!(f, "number"),
            TokenKind::Rune => write!(f, "rune literal"),
            TokenKind::Str(s) => write!(f, "string {s}"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBrack => write!(f, "'['"),
            TokenKind::RBrack => write!(f, "']'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Dot => write!(f, "'.'"),
            TokenKind::Assign => write!(f, "'='"),
            TokenKind::Semi { implicit: true } => write!(f, "newline"),
            TokenKind::Semi { implicit: false } => write!(f, "';'"),
            TokenKind::Op(op) => write!(f, "'{op}'"),
            TokenKind::LineComment | TokenKind::BlockComment => write!(f, "comment"),
            TokenKind::Eof => write!(f, "EOF"),
        }
    }
}

/// Map a word to its keyword token, if it is reserved.
pub fn keyword_lookup(word: &str) -> Option<TokenKind> {
    let kind = match word {
        "package" => TokenKind::Package,
        "import" => TokenKind::Import,
        "const" => TokenKind::Const,
        "type" => TokenKind::Type,
        "var" => TokenKind::Var,
        "func" => TokenKind::Func,
        "break" => TokenKind::Keyword("break"),
        "case" => TokenKind::Keyword("case"),
        "chan" => TokenKind::Keyword("chan"),
        "continue" => TokenKind::Keyword("continue"),
        "default" => TokenKind::Keyword("default"),
        "defer" => TokenKind::Keyword("defer"),
        "else" => TokenKind::Keyword("else"),
        "fallthrough" => TokenKind::Keyword("fallthrough"),
        "for" => TokenKind::Keyword("for"),
        "go" => TokenKind::Keyword("go"),
        "goto" => TokenKind::Keyword("goto"),
        "if" => TokenKind::Keyword("if"),
        "interface" => TokenKind::Keyword("interface"),
        "map" => TokenKind::Keyword("map"),
        "range" => TokenKind::Keyword("range"),
        "return" => TokenKind::Keyword("return"),
        "select" => TokenKind::Keyword("select"),
        "struct" => TokenKind::Keyword("struct"),
        "switch" => TokenKind::Keyword("switch"),
        _ => return None,
    };
    Some(kind)
}

/// Operators, longest first so the scanner can take the first prefix match.
pub const OPERATORS: &[&str] = &[
    "<<=", ">>=", "&^=", "...", "&&", "||", "<-", "++", "--", "==", "!=", "<=", ">=", ":=", "+=",
    "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<", ">>", "&^", "+", "-", "*", "/", "%", "&", "|",
    "^", "<", ">", "!", "~", ":",
];
