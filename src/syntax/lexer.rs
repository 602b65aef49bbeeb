//! Hand-written Go scanner.
//!
//! Produces every token including comments, and inserts semicolons at line
//! ends the way the Go scanner does: after an identifier, a literal, one of
//! `break continue fallthrough return`, or one of `++ -- ) ] }`. When a
//! comment ends the line, the semicolon is emitted before the comment.

use crate::error::Diagnostic;
use crate::syntax::token::{keyword_lookup, Span, Token, TokenKind, OPERATORS};

const BOM: char = '\u{feff}';

pub struct Lexer<'src> {
    src: &'src str,
    bytes: &'src [u8],
    pos: usize,
    line: usize,
    col: usize,
    insert_semi: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            // a byte order mark is only legal as the very first character
            pos: if src.starts_with(BOM) { BOM.len_utf8() } else { 0 },
            line: 1,
            col: 1,
            insert_semi: false,
        }
    }

    /// Scan the whole source. The last token is always `Eof`.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, Diagnostic> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let done = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, Diagnostic> {
        loop {
            match self.peek() {
                Some(b' ') | Some(b'\t') | Some(b'\r') => self.advance(1),
                Some(b'\n') => {
                    if self.insert_semi {
                        return Ok(self.implicit_semi());
                    }
                    self.newline();
                }
                _ => break,
            }
        }

        let Some(ch) = self.peek() else {
            if self.insert_semi {
                return Ok(self.implicit_semi());
            }
            return Ok(Token::new(TokenKind::Eof, self.span_from(self.pos, self.line, self.col)));
        };

        if ch == b'/' && matches!(self.peek_at(1), Some(b'/') | Some(b'*')) {
            if self.insert_semi && self.comment_ends_line() {
                return Ok(self.implicit_semi());
            }
            return self.lex_comment();
        }

        let start = self.pos;
        let line = self.line;
        let col = self.col;

        let kind = if ch == b'"' {
            self.lex_string()?
        } else if ch == b'`' {
            self.lex_raw_string()?
        } else if ch == b'\'' {
            self.lex_rune()?
        } else if ch.is_ascii_digit()
            || (ch == b'.' && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()))
        {
            self.lex_number()
        } else if self.peek_char().is_some_and(|c| c.is_alphabetic() || c == '_') {
            self.lex_word()
        } else {
            self.lex_punct()?
        };

        self.insert_semi = match &kind {
            TokenKind::Ident(_)
            | TokenKind::Int
            | TokenKind::Float
            | TokenKind::Imag
            | TokenKind::Rune
            | TokenKind::Str(_)
            | TokenKind::RParen
            | TokenKind::RBrack
            | TokenKind::RBrace => true,
            TokenKind::Keyword(k) => matches!(*k, "break" | "continue" | "fallthrough" | "return"),
            TokenKind::Op(op) => matches!(*op, "++" | "--"),
            _ => false,
        };
        Ok(Token::new(kind, self.span_from(start, line, col)))
    }

    fn implicit_semi(&mut self) -> Token {
        self.insert_semi = false;
        Token::new(
            TokenKind::Semi { implicit: true },
            Span::new(self.pos, self.pos, self.line, self.col, self.line),
        )
    }

    /// True when the comment at the cursor is followed by a newline (or EOF)
    /// before any other token, or is a block comment spanning lines.
    fn comment_ends_line(&self) -> bool {
        let rest = &self.src[self.pos..];
        if rest.starts_with("//") {
            return true;
        }
        match rest[2..].find("*/") {
            Some(close) => {
                if rest[..close + 2].contains('\n') {
                    return true;
                }
                let after = &rest[close + 4..];
                let trimmed = after.trim_start_matches([' ', '\t', '\r']);
                trimmed.is_empty() || trimmed.starts_with('\n') || trimmed.starts_with("//")
            }
            None => true,
        }
    }

    fn lex_comment(&mut self) -> Result<Token, Diagnostic> {
        let start = self.pos;
        let line = self.line;
        let col = self.col;
        if self.peek_at(1) == Some(b'/') {
            while let Some(c) = self.peek() {
                if c == b'\n' {
                    break;
                }
                self.advance(1);
            }
            return Ok(Token::new(TokenKind::LineComment, self.span_from(start, line, col)));
        }
        self.advance(2);
        loop {
            match self.peek() {
                None => return Err(Diagnostic::new(line, col, "comment not terminated")),
                Some(b'*') if self.peek_at(1) == Some(b'/') => {
                    self.advance(2);
                    break;
                }
                Some(b'\n') => self.newline(),
                Some(_) => self.advance(1),
            }
        }
        Ok(Token::new(TokenKind::BlockComment, self.span_from(start, line, col)))
    }

    fn lex_string(&mut self) -> Result<TokenKind, Diagnostic> {
        let start = self.pos;
        let (line, col) = (self.line, self.col);
        self.advance(1);
        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    return Err(Diagnostic::new(line, col, "string literal not terminated"))
                }
                Some(b'\\') => self.skip_escape(),
                Some(b'"') => {
                    self.advance(1);
                    break;
                }
                Some(_) => self.advance(1),
            }
        }
        Ok(TokenKind::Str(self.src[start..self.pos].to_string()))
    }

    fn lex_raw_string(&mut self) -> Result<TokenKind, Diagnostic> {
        let start = self.pos;
        let (line, col) = (self.line, self.col);
        self.advance(1);
        loop {
            match self.peek() {
                None => {
                    return Err(Diagnostic::new(
                        line,
                        col,
                        "raw string literal not terminated",
                    ))
                }
                Some(b'`') => {
                    self.advance(1);
                    break;
                }
                Some(b'\n') => self.newline(),
                Some(_) => self.advance(1),
            }
        }
        Ok(TokenKind::Str(self.src[start..self.pos].to_string()))
    }

    fn lex_rune(&mut self) -> Result<TokenKind, Diagnostic> {
        let (line, col) = (self.line, self.col);
        self.advance(1);
        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    return Err(Diagnostic::new(line, col, "rune literal not terminated"))
                }
                Some(b'\\') => self.skip_escape(),
                Some(b'\'') => {
                    self.advance(1);
                    break;
                }
                Some(_) => self.advance(1),
            }
        }
        Ok(TokenKind::Rune)
    }

    fn lex_number(&mut self) -> TokenKind {
        let hex = self.peek() == Some(b'0') && matches!(self.peek_at(1), Some(b'x') | Some(b'X'));
        let mut float = false;
        let mut seen_dot = false;
        let mut prev = 0u8;
        while let Some(c) = self.peek() {
            let exponent = if hex {
                matches!(prev, b'p' | b'P')
            } else {
                matches!(prev, b'e' | b'E')
            };
            if c.is_ascii_alphanumeric() || c == b'_' {
                if !hex && matches!(c, b'e' | b'E') || hex && matches!(c, b'p' | b'P') {
                    float = true;
                }
            } else if c == b'.' && !seen_dot {
                seen_dot = true;
                float = true;
            } else if (c == b'+' || c == b'-') && exponent {
                // exponent sign
            } else {
                break;
            }
            prev = c;
            self.advance(1);
        }
        if prev == b'i' {
            TokenKind::Imag
        } else if float {
            TokenKind::Float
        } else {
            TokenKind::Int
        }
    }

    fn lex_word(&mut self) -> TokenKind {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '_' {
                self.advance(c.len_utf8());
            } else {
                break;
            }
        }
        let word = &self.src[start..self.pos];
        keyword_lookup(word).unwrap_or_else(|| TokenKind::Ident(word.to_string()))
    }

    fn lex_punct(&mut self) -> Result<TokenKind, Diagnostic> {
        let Some(ch) = self.peek() else {
            return Ok(TokenKind::Eof);
        };
        let kind = match ch {
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'[' => TokenKind::LBrack,
            b']' => TokenKind::RBrack,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semi { implicit: false },
            b'.' if !self.src[self.pos..].starts_with("...") => TokenKind::Dot,
            b'=' if self.peek_at(1) != Some(b'=') => TokenKind::Assign,
            _ => {
                let rest = &self.src[self.pos..];
                let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) else {
                    let c = self.peek_char().unwrap_or('\u{fffd}');
                    return Err(Diagnostic::new(
                        self.line,
                        self.col,
                        format!("invalid character U+{:04X} '{c}'", c as u32),
                    ));
                };
                self.advance(op.len());
                return Ok(TokenKind::Op(op));
            }
        };
        self.advance(1);
        Ok(kind)
    }

    /// Skip a backslash and the byte it escapes, unless that byte ends the line.
    fn skip_escape(&mut self) {
        match self.peek_at(1) {
            Some(b'\n') | None => self.advance(1),
            Some(_) => self.advance(2),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, n: usize) -> Option<u8> {
        self.bytes.get(self.pos + n).copied()
    }

    fn peek_char(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.bytes.len());
        self.col += n;
    }

    fn newline(&mut self) {
        self.pos += 1;
        self.line += 1;
        self.col = 1;
    }

    fn span_from(&self, start: usize, line: usize, col: usize) -> Span {
        Span::new(start, self.pos, line, col, self.line)
    }
}

/// Convenience wrapper: scan `src` into tokens.
pub fn tokenize(src: &str) -> Result<Vec<Token>, Diagnostic> {
    Lexer::new(src).tokenize()
}
