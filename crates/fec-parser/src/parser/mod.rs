//! Recursive-descent parser (C5, spec.md sec 4.3).
//!
//! Grounded on `snow-parser/src/parser/items.rs` and `.../expressions.rs`
//! for the overall recursive-descent shape and Pratt-style binary-operator
//! climbing, and on `original_source/src/parse/root.cpp` for item and
//! attribute/visibility ordering.

mod attrs;
mod exprs;
mod generics;
mod items;
mod paths;
mod patterns;
mod types;

use fec_common::{FileId, Sink, Span};
use fec_lexer::token::{Token, TokenKind};

use crate::ast::Crate;
use crate::token_tree::{ProtoSpan, TokenStream};

/// A closed error taxonomy for parse failures (spec.md sec 4.3 "Failure").
/// Constructed at the error site and handed to the shared `Sink`; there is
/// no error-recovery accumulation (non-goal, spec.md sec 1).
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    UnexpectedToken { found: TokenKind, expected: Vec<&'static str>, span: Span },
    IllegalAttributePosition { span: Span },
    IllegalSelfBinding { span: Span },
    ConflictingModuleFileLayout { name: String, span: Span },
    ReservedWord { word: &'static str, span: Span },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::UnexpectedToken { found, expected, .. } => {
                write!(f, "unexpected token {found:?}, expected one of {expected:?}")
            }
            ParseError::IllegalAttributePosition { .. } => write!(f, "attribute not allowed here"),
            ParseError::IllegalSelfBinding { .. } => write!(f, "illegal `self` binding"),
            ParseError::ConflictingModuleFileLayout { name, .. } => {
                write!(f, "both `{name}.rs` and `{name}/mod.rs` exist")
            }
            ParseError::ReservedWord { word, .. } => write!(f, "`{word}` is reserved"),
        }
    }
}

impl std::error::Error for ParseError {}

pub type PResult<T> = Result<T, ParseError>;

fn token_err(e: fec_lexer::error::LexError) -> ParseError {
    ParseError::UnexpectedToken { found: TokenKind::Error, expected: vec!["valid token"], span: e.span }
}

pub struct Parser<'src> {
    stream: TokenStream<'src>,
    /// Suppressed while parsing the scrutinee of `if`/`while`/`match`, where
    /// a bare `{` must open the body block rather than a struct literal
    /// (mirrors rustc's "no struct literal" restriction).
    no_struct_literal: bool,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, file: FileId) -> PResult<Self> {
        let stream = TokenStream::new(source, file).map_err(token_err)?;
        Ok(Self { stream, no_struct_literal: false })
    }

    /// Run `f` with struct-literal parsing suppressed, restoring the prior
    /// setting afterward (condition positions can themselves nest, e.g. a
    /// `match` scrutinee containing a `while` expression).
    fn with_no_struct_literal<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let saved = self.no_struct_literal;
        self.no_struct_literal = true;
        let result = f(self);
        self.no_struct_literal = saved;
        result
    }

    /// Run `f` with struct-literal parsing allowed again, even inside a
    /// suppressed context (parenthesized/bracketed sub-expressions reset
    /// the restriction, matching rustc).
    fn with_struct_literal<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let saved = self.no_struct_literal;
        self.no_struct_literal = false;
        let result = f(self);
        self.no_struct_literal = saved;
        result
    }

    pub fn parse_crate(&mut self) -> PResult<Crate> {
        items::parse_crate(self)
    }

    // ── Token-level primitives ───────────────────────────────────────────

    fn bump(&mut self) -> PResult<Token> {
        self.stream.get().map_err(token_err)
    }

    /// Peek the kind of the next token without consuming it.
    fn peek_kind(&mut self) -> PResult<TokenKind> {
        let tok = self.bump()?;
        let kind = tok.kind.clone();
        self.stream.putback(tok);
        Ok(kind)
    }

    /// Peek the full span of the next token without consuming it, for
    /// error reporting at a point where no span has been opened yet.
    fn peek_span(&mut self) -> PResult<Span> {
        let tok = self.bump()?;
        let span = tok.span;
        self.stream.putback(tok);
        Ok(span)
    }

    /// Peek the kind of the token *after* the next one.
    fn peek2_kind(&mut self) -> PResult<TokenKind> {
        let tok = self.bump()?;
        let kind = self.stream.lookahead(0).map_err(token_err)?.clone();
        self.stream.putback(tok);
        Ok(kind)
    }

    /// Peek the kind of the token two past the next one (the full
    /// three-token lookahead budget, spec.md sec 4.2), e.g. to see past an
    /// `extern`'s optional ABI string literal to whatever follows it.
    fn peek3_kind(&mut self) -> PResult<TokenKind> {
        self.stream.lookahead(2).map(|k| k.clone()).map_err(token_err)
    }

    fn expect(&mut self, want: &TokenKind, name: &'static str) -> PResult<Token> {
        let tok = self.bump()?;
        if std::mem::discriminant(&tok.kind) == std::mem::discriminant(want) {
            Ok(tok)
        } else {
            Err(ParseError::UnexpectedToken { found: tok.kind, expected: vec![name], span: tok.span })
        }
    }

    fn eat(&mut self, want: &TokenKind) -> PResult<bool> {
        if std::mem::discriminant(&self.peek_kind()?) == std::mem::discriminant(want) {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_ident(&mut self) -> PResult<String> {
        let tok = self.bump()?;
        match tok.kind {
            TokenKind::Ident(s) => Ok(s),
            other => Err(ParseError::UnexpectedToken { found: other, expected: vec!["identifier"], span: tok.span }),
        }
    }

    fn start_span(&mut self) -> PResult<ProtoSpan> {
        self.peek_kind()?;
        Ok(self.stream.start_span())
    }

    fn end_span(&self, ps: ProtoSpan) -> Span {
        self.stream.end_span(ps)
    }
}

/// Entry point used by `fec-driver` and tests: parse a full source string
/// into an `AST.Crate`, reporting the first fatal diagnostic through `sink`.
pub fn parse_str(source: &str, file: FileId, sink: &mut dyn Sink) -> Option<Crate> {
    match Parser::new(source, file).and_then(|mut p| p.parse_crate()) {
        Ok(krate) => Some(krate),
        Err(err) => {
            let span = error_span(&err);
            sink.error(span, "E0100", &err.to_string());
            None
        }
    }
}

fn error_span(err: &ParseError) -> Span {
    match err {
        ParseError::UnexpectedToken { span, .. }
        | ParseError::IllegalAttributePosition { span }
        | ParseError::IllegalSelfBinding { span }
        | ParseError::ConflictingModuleFileLayout { span, .. }
        | ParseError::ReservedWord { span, .. } => *span,
    }
}
