//! The token vocabulary (spec.md sec 3 "Token").
//!
//! `TokenKind` is the complete set of lexical atoms the lexer can produce.
//! Interpolated fragments (embedded AST pieces injected by macro expansion)
//! are deliberately not modelled here: macro expansion is an external
//! collaborator this crate never invokes (spec.md sec 1), so nothing in this
//! pipeline ever constructs one. The token-tree layer in `fec-parser` (C3)
//! reserves a variant for them so the *shape* of the contract
//! ("interpolated fragments are yielded by `get` unchanged") is still
//! representable there, where the AST types they would carry already live.

use fec_common::{CoreType, LiteralTypeTag, Span};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TokenKind {
    // ── Trivia ───────────────────────────────────────────────────────
    /// A run of ASCII whitespace, not including newlines.
    Whitespace,
    /// A single `\n` (or `\r\n`), emitted separately so line counting works
    /// uniformly whether or not trivia is later discarded.
    Newline,
    /// `// ...` to end of line, or a (possibly nested) `/* ... */` block.
    /// `text` is the comment's contents, not including the delimiters.
    Comment { text: String, doc: DocKind },

    // ── Identifiers & lifetimes ─────────────────────────────────────
    Ident(String),
    /// A macro invocation name: an identifier immediately followed by `!`.
    MacroName(String),
    /// `'a` -- the lifetime text without the leading quote.
    Lifetime(String),

    // ── Keywords (52) ────────────────────────────────────────────────
    KwAs,
    KwBreak,
    KwConst,
    KwContinue,
    KwCrate,
    KwDyn,
    KwElse,
    KwEnum,
    KwExtern,
    KwFalse,
    KwFn,
    KwFor,
    KwIf,
    KwImpl,
    KwIn,
    KwLet,
    KwLoop,
    KwMatch,
    KwMod,
    KwMove,
    KwMut,
    KwPub,
    KwRef,
    KwReturn,
    KwSelfValue,
    KwSelfType,
    KwStatic,
    KwStruct,
    KwSuper,
    KwTrait,
    KwTrue,
    KwType,
    KwUnsafe,
    KwUse,
    KwWhere,
    KwWhile,
    KwAsync,
    KwAwait,
    // Reserved for future use; recognized but never produced in a valid
    // parse (spec.md sec 9 "Open questions").
    KwAbstract,
    KwBecome,
    KwBox,
    KwDo,
    KwFinal,
    KwMacro,
    KwOverride,
    KwPriv,
    KwProc,
    KwTry,
    KwTypeof,
    KwUnsized,
    KwVirtual,
    KwYield,

    // ── Literals ─────────────────────────────────────────────────────
    Integer { value: u128, tag: LiteralTypeTag },
    Float { value: f64, tag: FloatTypeTag },
    Char(char),
    Str(String),
    ByteStr(Vec<u8>),

    // ── Structural punctuation (approx. 70 symbols) ──────────────────
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Not,
    And,
    Or,
    AndAnd,
    OrOr,
    Shl,
    Shr,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    CaretEq,
    AndEq,
    OrEq,
    ShlEq,
    ShrEq,
    Eq,
    EqEq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    At,
    Dot,
    DotDot,
    DotDotDot,
    DotDotEq,
    Comma,
    Semi,
    Colon,
    ColonColon,
    RArrow,
    FatArrow,
    Pound,
    Dollar,
    Question,
    Tilde,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    Eof,
    /// Unrecognised byte sequence; error recovery is a non-goal (spec.md
    /// sec 1) so this never survives past the lexer's own error report, but
    /// the variant exists so `Token` stays total over the byte stream.
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DocKind {
    None,
    Outer,
    Inner,
}

/// Float literals only ever carry `F32`, `F64` or a deferred tag -- never a
/// non-float `CoreType` -- so they get their own narrower tag type instead
/// of reusing `LiteralTypeTag` loosely.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum FloatTypeTag {
    Explicit(CoreType),
    Any,
}

/// Look up a keyword from its string spelling against the ordered keyword
/// table (spec.md sec 4.1 rule 8: "the identifier is looked up in the
/// ordered keyword table").
pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
    KEYWORDS
        .binary_search_by_key(&s, |(spelling, _)| *spelling)
        .ok()
        .map(|i| KEYWORDS[i].1.clone())
}

/// Lexicographically ordered so lookups can binary search, per the spec's
/// prescription for both the keyword table and the symbol table.
static KEYWORDS: &[(&str, TokenKind)] = &[
    ("abstract", TokenKind::KwAbstract),
    ("as", TokenKind::KwAs),
    ("async", TokenKind::KwAsync),
    ("await", TokenKind::KwAwait),
    ("become", TokenKind::KwBecome),
    ("box", TokenKind::KwBox),
    ("break", TokenKind::KwBreak),
    ("const", TokenKind::KwConst),
    ("continue", TokenKind::KwContinue),
    ("crate", TokenKind::KwCrate),
    ("do", TokenKind::KwDo),
    ("dyn", TokenKind::KwDyn),
    ("else", TokenKind::KwElse),
    ("enum", TokenKind::KwEnum),
    ("extern", TokenKind::KwExtern),
    ("false", TokenKind::KwFalse),
    ("final", TokenKind::KwFinal),
    ("fn", TokenKind::KwFn),
    ("for", TokenKind::KwFor),
    ("if", TokenKind::KwIf),
    ("impl", TokenKind::KwImpl),
    ("in", TokenKind::KwIn),
    ("let", TokenKind::KwLet),
    ("loop", TokenKind::KwLoop),
    ("macro", TokenKind::KwMacro),
    ("match", TokenKind::KwMatch),
    ("mod", TokenKind::KwMod),
    ("move", TokenKind::KwMove),
    ("mut", TokenKind::KwMut),
    ("override", TokenKind::KwOverride),
    ("priv", TokenKind::KwPriv),
    ("proc", TokenKind::KwProc),
    ("pub", TokenKind::KwPub),
    ("ref", TokenKind::KwRef),
    ("return", TokenKind::KwReturn),
    ("self", TokenKind::KwSelfValue),
    ("static", TokenKind::KwStatic),
    ("struct", TokenKind::KwStruct),
    ("super", TokenKind::KwSuper),
    ("trait", TokenKind::KwTrait),
    ("true", TokenKind::KwTrue),
    ("try", TokenKind::KwTry),
    ("type", TokenKind::KwType),
    ("typeof", TokenKind::KwTypeof),
    ("unsafe", TokenKind::KwUnsafe),
    ("unsized", TokenKind::KwUnsized),
    ("use", TokenKind::KwUse),
    ("virtual", TokenKind::KwVirtual),
    ("where", TokenKind::KwWhere),
    ("while", TokenKind::KwWhile),
    ("yield", TokenKind::KwYield),
    ("Self", TokenKind::KwSelfType),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_table_is_sorted() {
        for w in KEYWORDS.windows(2) {
            assert!(w[0].0 < w[1].0, "{:?} should sort before {:?}", w[0].0, w[1].0);
        }
    }

    #[test]
    fn keyword_from_str_recognizes_keywords_and_self_type() {
        assert_eq!(keyword_from_str("fn"), Some(TokenKind::KwFn));
        assert_eq!(keyword_from_str("self"), Some(TokenKind::KwSelfValue));
        assert_eq!(keyword_from_str("Self"), Some(TokenKind::KwSelfType));
        assert_eq!(keyword_from_str("struct"), Some(TokenKind::KwStruct));
    }

    #[test]
    fn keyword_from_str_rejects_identifiers() {
        assert_eq!(keyword_from_str("foo"), None);
        assert_eq!(keyword_from_str(""), None);
        assert_eq!(keyword_from_str("FN"), None);
    }
}
