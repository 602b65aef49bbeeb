//! Top-level declaration parser.
//!
//! Consumes the scanner's tokens and produces a `SourceFile`: the package
//! clause, then one `Decl` per `import`/`const`/`type`/`var`/`func`
//! declaration. Inside a declaration the parser only tracks bracket
//! nesting to find where it ends; specs are inspected just enough to
//! extract their names.
//!
//! Errors are collected instead of aborting. After a bad declaration the
//! parser skips to the next declaration keyword at column 1 and carries
//! on, stopping after `MAX_DIAGNOSTICS` reports.

use crate::error::{Diagnostic, Error, Result};
use crate::syntax::ast::{
    CommentGroup, Decl, DeclId, DeclKind, FuncDecl, GenDecl, Keyword, Parsed, SourceFile, Spec,
};
use crate::syntax::lexer::tokenize;
use crate::syntax::token::{Span, Token, TokenKind};

const MAX_DIAGNOSTICS: usize = 10;

/// Parse Go source text into its declaration tree and comment groups.
pub fn parse(src: &str) -> Result<Parsed> {
    let all = tokenize(src).map_err(Error::parse)?;
    let comments = group_comments(src, &all);
    let tokens: Vec<Token> = all.into_iter().filter(|t| !t.is_comment()).collect();
    let mut parser = Parser::new(src, tokens);
    let file = parser.parse_file();
    if !parser.diagnostics.is_empty() {
        return Err(Error::Parse {
            diagnostics: parser.diagnostics,
        });
    }
    Ok(Parsed { file, comments })
}

pub struct Parser<'src> {
    src: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Parser<'src> {
    /// `tokens` must not contain comments and must end with `Eof`.
    pub fn new(src: &'src str, tokens: Vec<Token>) -> Self {
        Self {
            src,
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn parse_file(&mut self) -> SourceFile {
        let mut file = SourceFile {
            package: String::new(),
            header: String::new(),
            header_span: Span::default(),
            decls: Vec::new(),
        };
        match self.parse_package_clause() {
            Ok((name, span)) => {
                file.package = name;
                file.header = self.src[..span.end].to_string();
                file.header_span = span;
            }
            Err(d) => {
                self.diagnostics.push(d);
                return file;
            }
        }

        let mut seen_other = false;
        while self.diagnostics.len() < MAX_DIAGNOSTICS {
            let tok = self.peek().clone();
            let result = match tok.kind {
                TokenKind::Eof => break,
                TokenKind::Semi { .. } => {
                    self.advance();
                    continue;
                }
                TokenKind::Func => self.parse_func_decl(),
                TokenKind::Import => {
                    if seen_other {
                        self.diagnostics.push(Diagnostic::new(
                            tok.span.line,
                            tok.span.col,
                            "imports must appear before other declarations",
                        ));
                    }
                    self.parse_gen_decl(Keyword::Import)
                }
                TokenKind::Const => self.parse_gen_decl(Keyword::Const),
                TokenKind::Type => self.parse_gen_decl(Keyword::Type),
                TokenKind::Var => self.parse_gen_decl(Keyword::Var),
                other => Err(self.error_at(
                    &tok.span,
                    format!("expected declaration, found {other}"),
                )),
            };
            match result {
                Ok((span, kind)) => {
                    if !matches!(&kind, DeclKind::Gen(g) if g.keyword == Keyword::Import) {
                        seen_other = true;
                    }
                    let id = DeclId(file.decls.len());
                    file.decls.push(Decl {
                        id,
                        span,
                        text: self.src[span.start..span.end].to_string(),
                        kind,
                    });
                }
                Err(d) => {
                    self.diagnostics.push(d);
                    self.recover();
                }
            }
        }
        file
    }

    fn parse_package_clause(&mut self) -> std::result::Result<(String, Span), Diagnostic> {
        let tok = self.peek().clone();
        if tok.kind != TokenKind::Package {
            return Err(self.error_at(
                &tok.span,
                format!("expected 'package', found {}", tok.kind),
            ));
        }
        self.advance();
        let (name, name_span) = self.expect_ident()?;
        self.expect_semi()?;
        Ok((name, tok.span.to(name_span)))
    }

    fn parse_gen_decl(&mut self, keyword: Keyword) -> std::result::Result<(Span, DeclKind), Diagnostic> {
        let kw_span = self.advance().span;
        let (end, parens, specs) = if self.peek().kind == TokenKind::LParen {
            let lparen = self.advance().span;
            let mut specs = Vec::new();
            loop {
                let tok = self.peek().clone();
                match tok.kind {
                    TokenKind::Semi { .. } => {
                        self.advance();
                    }
                    TokenKind::RParen => break,
                    TokenKind::Eof => {
                        return Err(self.error_at(&tok.span, "expected ')', found EOF"));
                    }
                    _ => {
                        specs.push(self.parse_spec(keyword)?);
                        let next = self.peek().clone();
                        match next.kind {
                            TokenKind::Semi { .. } => {
                                self.advance();
                            }
                            TokenKind::RParen => {}
                            other => {
                                return Err(self.error_at(
                                    &next.span,
                                    format!("expected ';', found {other}"),
                                ))
                            }
                        }
                    }
                }
            }
            let rparen = self.advance().span;
            (rparen, Some((lparen, rparen)), specs)
        } else {
            let spec = self.parse_spec(keyword)?;
            (spec.span, None, vec![spec])
        };
        self.expect_semi()?;
        Ok((
            kw_span.to(end),
            DeclKind::Gen(GenDecl {
                keyword,
                parens,
                specs,
            }),
        ))
    }

    fn parse_spec(&mut self, keyword: Keyword) -> std::result::Result<Spec, Diagnostic> {
        let first = self.pos;
        let last = self.skip_to_terminator(true)?.ok_or_else(|| {
            let tok = self.peek();
            self.error_at(
                &tok.span,
                format!("expected {} spec, found {}", keyword.as_str(), tok.kind),
            )
        })?;
        let toks = &self.tokens[first..=last];
        let span = toks[0].span.to(toks[toks.len() - 1].span);
        let mut spec = Spec {
            span,
            names: Vec::new(),
            path: None,
            local_name: None,
            has_value: false,
            uses_iota: false,
            value_has_call: false,
        };

        match keyword {
            Keyword::Import => {
                let mut rest = toks;
                match &rest[0].kind {
                    TokenKind::Ident(name) => {
                        spec.local_name = Some(name.clone());
                        rest = &rest[1..];
                    }
                    TokenKind::Dot => {
                        spec.local_name = Some(".".to_string());
                        rest = &rest[1..];
                    }
                    _ => {}
                }
                match rest.first() {
                    Some(Token {
                        kind: TokenKind::Str(lit),
                        ..
                    }) => spec.path = Some(unquote(lit)),
                    Some(tok) => {
                        return Err(self.error_at(
                            &tok.span,
                            format!("expected import path, found {}", tok.kind),
                        ))
                    }
                    None => {
                        return Err(self.error_at(&span, "expected import path"));
                    }
                }
                if let Some(extra) = rest.get(1) {
                    return Err(self.error_at(
                        &extra.span,
                        format!("expected ';', found {}", extra.kind),
                    ));
                }
            }
            Keyword::Type => match &toks[0].kind {
                TokenKind::Ident(name) => spec.names.push(name.clone()),
                other => {
                    return Err(self.error_at(
                        &toks[0].span,
                        format!("expected type name, found {other}"),
                    ))
                }
            },
            Keyword::Const | Keyword::Var => {
                let mut i = 0;
                loop {
                    match toks.get(i).map(|t| &t.kind) {
                        Some(TokenKind::Ident(name)) => spec.names.push(name.clone()),
                        Some(other) => {
                            return Err(self.error_at(
                                &toks[i].span,
                                format!("expected identifier, found {other}"),
                            ))
                        }
                        None => break,
                    }
                    if toks.get(i + 1).map(|t| &t.kind) == Some(&TokenKind::Comma) {
                        i += 2;
                    } else {
                        break;
                    }
                }
                let mut depth = 0usize;
                for tok in toks {
                    match &tok.kind {
                        TokenKind::LParen => {
                            if spec.has_value {
                                spec.value_has_call = true;
                            }
                            depth += 1;
                        }
                        TokenKind::LBrack | TokenKind::LBrace => depth += 1,
                        TokenKind::RParen | TokenKind::RBrack | TokenKind::RBrace => {
                            depth = depth.saturating_sub(1)
                        }
                        TokenKind::Assign if depth == 0 => spec.has_value = true,
                        TokenKind::Ident(name) if name == "iota" => spec.uses_iota = true,
                        _ => {}
                    }
                }
            }
        }
        Ok(spec)
    }

    fn parse_func_decl(&mut self) -> std::result::Result<(Span, DeclKind), Diagnostic> {
        let func_span = self.advance().span;
        let receiver = if self.peek().kind == TokenKind::LParen {
            let lparen = self.advance().span;
            self.skip_to_terminator(true)?;
            let tok = self.peek().clone();
            if tok.kind != TokenKind::RParen {
                return Err(self.error_at(&tok.span, format!("expected ')', found {}", tok.kind)));
            }
            let rparen = self.advance().span;
            Some(self.src[lparen.end..rparen.start].trim().to_string())
        } else {
            None
        };
        let (name, name_span) = self.expect_ident().map_err(|d| Diagnostic {
            message: d.message.replace("expected identifier", "expected function name"),
            ..d
        })?;
        let last = self.skip_to_terminator(false)?;
        let end = match last {
            Some(idx) => self.tokens[idx].span,
            None => name_span,
        };
        self.expect_semi()?;
        Ok((
            func_span.to(end),
            DeclKind::Func(FuncDecl { name, receiver }),
        ))
    }

    /// Advance over a balanced token run up to (not including) a `;` at
    /// nesting depth zero, or a `)` at depth zero when `stop_at_rparen`.
    /// Returns the index of the last consumed token, if any.
    fn skip_to_terminator(
        &mut self,
        stop_at_rparen: bool,
    ) -> std::result::Result<Option<usize>, Diagnostic> {
        let mut depth = 0usize;
        let mut last = None;
        loop {
            let tok = self.peek().clone();
            match tok.kind {
                TokenKind::Eof => {
                    if depth > 0 {
                        return Err(self.error_at(&tok.span, "unexpected EOF"));
                    }
                    return Ok(last);
                }
                TokenKind::Semi { .. } if depth == 0 => return Ok(last),
                TokenKind::RParen if depth == 0 && stop_at_rparen => return Ok(last),
                TokenKind::LParen | TokenKind::LBrack | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBrack | TokenKind::RBrace => {
                    if depth == 0 {
                        return Err(self.error_at(&tok.span, format!("unexpected {}", tok.kind)));
                    }
                    depth -= 1;
                }
                _ => {}
            }
            last = Some(self.pos);
            self.advance();
        }
    }

    /// Skip to the next declaration keyword that starts a line.
    fn recover(&mut self) {
        if self.peek().kind != TokenKind::Eof {
            self.advance();
        }
        loop {
            let tok = self.peek();
            let at_decl = matches!(
                tok.kind,
                TokenKind::Import
                    | TokenKind::Const
                    | TokenKind::Type
                    | TokenKind::Var
                    | TokenKind::Func
            ) && tok.span.col == 1;
            if tok.kind == TokenKind::Eof || at_decl {
                return;
            }
            self.advance();
        }
    }

    fn expect_ident(&mut self) -> std::result::Result<(String, Span), Diagnostic> {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::Ident(name) => {
                self.advance();
                Ok((name, tok.span))
            }
            other => Err(self.error_at(&tok.span, format!("expected identifier, found {other}"))),
        }
    }

    fn expect_semi(&mut self) -> std::result::Result<(), Diagnostic> {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::Semi { .. } => {
                self.advance();
                Ok(())
            }
            TokenKind::Eof => Ok(()),
            other => Err(self.error_at(&tok.span, format!("expected ';', found {other}"))),
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn error_at(&self, span: &Span, message: impl Into<String>) -> Diagnostic {
        Diagnostic::new(span.line, span.col, message)
    }
}

/// Strip the quotes of an interpreted or raw string literal.
fn unquote(lit: &str) -> String {
    if lit.len() >= 2 {
        lit[1..lit.len() - 1].to_string()
    } else {
        lit.to_string()
    }
}

/// Group comment tokens: consecutive comments join a group unless a blank
/// line or a code token separates them. A comment that starts on the line
/// where code ends opens a group limited to that line, so a trailing
/// comment never swallows the doc comment of the next line.
fn group_comments(src: &str, tokens: &[Token]) -> Vec<CommentGroup> {
    let mut groups = Vec::new();
    // (span so far, confined to its first line)
    let mut current: Option<(Span, bool)> = None;
    let mut code_line = 0usize;
    let flush = |span: Span, groups: &mut Vec<CommentGroup>| {
        groups.push(CommentGroup {
            span,
            text: src[span.start..span.end].to_string(),
        });
    };
    for tok in tokens {
        if tok.is_comment() {
            current = match current {
                Some((span, inline)) => {
                    let joins = if inline {
                        tok.span.line == span.end_line
                    } else {
                        tok.span.line <= span.end_line + 1
                    };
                    if joins {
                        Some((span.to(tok.span), inline))
                    } else {
                        flush(span, &mut groups);
                        Some((tok.span, tok.span.line == code_line))
                    }
                }
                None => Some((tok.span, tok.span.line == code_line)),
            };
        } else if !matches!(tok.kind, TokenKind::Semi { implicit: true } | TokenKind::Eof) {
            if let Some((span, _)) = current.take() {
                flush(span, &mut groups);
            }
            code_line = tok.span.end_line;
        }
    }
    if let Some((span, _)) = current {
        flush(span, &mut groups);
    }
    groups
}
