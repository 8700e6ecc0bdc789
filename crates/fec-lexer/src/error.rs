//! Lexer error taxonomy (spec.md sec 4.1 "Failure", sec 7 "Lex errors"),
//! grounded on `mesh-common/src/error.rs`'s closed-enum + manual `Display`
//! shape.

use std::fmt;

use fec_common::Span;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LexErrorKind {
    UnexpectedByte(char),
    UnterminatedString,
    UnterminatedChar,
    UnterminatedBlockComment,
    UnterminatedRawString { hash_count: u32 },
    InvalidEscapeSequence(char),
    InvalidUnicodeEscape,
    /// An integer suffix outside `{i,u}{8,16,32,64,128,size}` / `f32`/`f64`.
    InvalidIntSuffix(String),
    /// More than ~60 significant digits in a float literal's buffer.
    FloatLiteralTooLarge,
    /// Octal/hex/binary floating-point literals are rejected (spec.md sec 9
    /// "Open questions").
    NonDecimalFloat,
    InvalidUtf8,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedByte(c) => write!(f, "unexpected byte sequence: {c:?}"),
            Self::UnterminatedString => write!(f, "unterminated string literal"),
            Self::UnterminatedChar => write!(f, "unterminated character literal"),
            Self::UnterminatedBlockComment => write!(f, "unterminated block comment"),
            Self::UnterminatedRawString { hash_count } => {
                write!(f, "unterminated raw string (expected {hash_count} closing '#')")
            }
            Self::InvalidEscapeSequence(c) => write!(f, "invalid escape sequence: \\{c}"),
            Self::InvalidUnicodeEscape => write!(f, "invalid \\u{{...}} escape"),
            Self::InvalidIntSuffix(s) => write!(f, "invalid integer literal suffix: {s}"),
            Self::FloatLiteralTooLarge => write!(f, "float literal has too many significant digits"),
            Self::NonDecimalFloat => write!(f, "non-decimal floating point literals are not supported"),
            Self::InvalidUtf8 => write!(f, "source is not valid UTF-8"),
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for LexError {}
