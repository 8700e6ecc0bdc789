//! Token tree / token stream abstraction (C3, spec.md sec 4.2).
//!
//! `TokenStream` wraps a `fec_lexer::Lexer`, filtering trivia and
//! implementing the `get`/`putback`/`lookahead(<=3)`/`start_span`/
//! `end_span` contract. `TokenTree` supplies the balanced-bracket view used
//! by macro matchers and attribute argument lists.

use std::collections::VecDeque;

use fec_common::{FileId, Span};
use fec_lexer::token::{Token, TokenKind};
use fec_lexer::Lexer;

/// Either a single token or a balanced-bracket sequence of token trees.
///
/// `Interp` is never constructed by this crate on its own -- nothing here
/// invokes macro expansion -- but the variant exists so the shape described
/// in spec.md sec 3 ("interpolated fragments... embedded in a token stream
/// by macro expansion") is representable by a caller that does expand
/// macros before handing a pre-built stream back in.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenTree {
    Leaf(Token),
    Delimited {
        delim: Delimiter,
        open: Span,
        close: Span,
        trees: Vec<TokenTree>,
    },
    Interp(InterpFragment),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Paren,
    Bracket,
    Brace,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InterpFragment {
    Type,
    Pattern,
    Path,
    Expr,
    Stmt,
    Block,
    MetaItem,
}

/// A marker for the start of a span, returned by `start_span` and consumed
/// by `end_span`.
#[derive(Debug, Clone, Copy)]
pub struct ProtoSpan {
    line: u32,
    col: u32,
}

/// Bug raised when the `get`/`putback`/`lookahead` contract is violated
/// (spec.md sec 4.2: "panics with a `Double putback` bug if misused").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamBug {
    DoublePutback,
    LookaheadTooFar { requested: usize, max: usize },
}

impl std::fmt::Display for StreamBug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamBug::DoublePutback => write!(f, "double putback"),
            StreamBug::LookaheadTooFar { requested, max } => {
                write!(f, "lookahead({requested}) exceeds the {max}-token limit")
            }
        }
    }
}

pub const MAX_LOOKAHEAD: usize = 3;

/// A uniform front over a lexer: discards trivia, exposes `get`/`putback`/
/// bounded `lookahead`, and tracks a position stack for span materialisation.
pub struct TokenStream<'src> {
    lexer: Lexer<'src>,
    putback: Option<Token>,
    lookahead_buf: VecDeque<Token>,
    file: FileId,
    eof: Token,
    last_end: (u32, u32),
}

impl<'src> TokenStream<'src> {
    pub fn new(source: &'src str, file: FileId) -> Result<Self, fec_lexer::error::LexError> {
        let mut lexer = Lexer::new(source, file);
        let eof = loop {
            let tok = lexer.next_token()?;
            if matches!(tok.kind, TokenKind::Eof) {
                break tok;
            }
        };
        Ok(Self {
            lexer: Lexer::new(source, file),
            putback: None,
            lookahead_buf: VecDeque::new(),
            file,
            eof,
            last_end: (1, 1),
        })
    }

    /// Pull the next non-trivia token straight from the lexer, ignoring the
    /// putback/lookahead buffers.
    fn raw_next(&mut self) -> Result<Token, fec_lexer::error::LexError> {
        loop {
            let tok = self.lexer.next_token()?;
            match tok.kind {
                TokenKind::Whitespace | TokenKind::Newline | TokenKind::Comment { .. } => continue,
                _ => return Ok(tok),
            }
        }
    }

    /// Returns the next non-trivia token. Drains the lookahead buffer and
    /// the single-slot putback cache first.
    pub fn get(&mut self) -> Result<Token, fec_lexer::error::LexError> {
        let tok = if let Some(t) = self.putback.take() {
            t
        } else if let Some(t) = self.lookahead_buf.pop_front() {
            t
        } else {
            self.raw_next()?
        };
        self.last_end = (tok.span.end_line, tok.span.end_col);
        Ok(tok)
    }

    /// Cache one token to be replayed by the next `get`. A second `putback`
    /// before an intervening `get` is a bug (spec.md sec 4.2).
    pub fn putback(&mut self, tok: Token) {
        if self.putback.is_some() {
            panic!("{}", StreamBug::DoublePutback);
        }
        self.putback = Some(tok);
    }

    /// Peek at the *i*th future token's kind (`i == 0` is the very next
    /// token) without consuming it. At most three tokens of lookahead.
    pub fn lookahead(&mut self, i: usize) -> Result<&TokenKind, fec_lexer::error::LexError> {
        if i >= MAX_LOOKAHEAD {
            panic!("{}", StreamBug::LookaheadTooFar { requested: i, max: MAX_LOOKAHEAD - 1 });
        }
        // The putback slot, if occupied, is logically token 0.
        let base = if self.putback.is_some() { 1 } else { 0 };
        while self.lookahead_buf.len() + base <= i {
            let tok = self.raw_next()?;
            self.lookahead_buf.push_back(tok);
        }
        if let Some(pb) = &self.putback {
            if i == 0 {
                return Ok(&pb.kind);
            }
            Ok(&self.lookahead_buf[i - 1].kind)
        } else {
            Ok(&self.lookahead_buf[i].kind)
        }
    }

    pub fn start_span(&self) -> ProtoSpan {
        if let Some(pb) = &self.putback {
            return ProtoSpan { line: pb.span.start_line, col: pb.span.start_col };
        }
        if let Some(la) = self.lookahead_buf.front() {
            return ProtoSpan { line: la.span.start_line, col: la.span.start_col };
        }
        ProtoSpan { line: self.eof.span.start_line, col: self.eof.span.start_col }
    }

    /// Materialise a `Span` running from `ps` to the stream's current
    /// position (the end of the most recently consumed token, tracked via
    /// `self.last_end`, which `get` updates).
    pub fn end_span(&self, ps: ProtoSpan) -> Span {
        Span::new(self.file, ps.line, ps.col, self.last_end.0, self.last_end.1)
    }
}
