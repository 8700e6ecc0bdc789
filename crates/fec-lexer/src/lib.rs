//! Lexer (C2): byte stream to token stream, Unicode-aware, with
//! comment/whitespace classification (spec.md sec 4.1).
//!
//! Grounded on `snow-lexer/src/cursor.rs` (byte-accurate char cursor) and
//! `snow-lexer/src/lib.rs` (the lexer-as-token-producer shape), with the
//! exact escape/numeric/raw-string semantics taken from
//! `examples/original_source/src/parse/lex.cpp`.

pub mod cursor;
pub mod error;
pub mod symbols;
pub mod token;

use cursor::Cursor;
use error::{LexError, LexErrorKind};
use fec_common::{CoreType, FileId, LiteralTypeTag, Span};
use token::{keyword_from_str, DocKind, FloatTypeTag, Token, TokenKind};

pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    emitted_eof: bool,
}

impl<'src> Lexer<'src> {
    /// Construct a lexer over already-validated UTF-8 text, consuming a
    /// single leading BOM if present (spec.md sec 4.1 rule 0, sec 6 "Source
    /// format").
    pub fn new(source: &'src str, file: FileId) -> Self {
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);
        Self {
            cursor: Cursor::new(source, file),
            emitted_eof: false,
        }
    }

    /// Validate a raw byte stream as UTF-8 before lexing it (spec.md sec 4.1
    /// "Reports unexpected byte sequences as a hard error with span";
    /// `std::str::from_utf8` is the idiomatic stand-in for the manual
    /// UTF-8 decoder the original C++ front-end hand-rolled -- the
    /// guarantee it provides is identical, it is just built into `str`).
    pub fn from_bytes(bytes: &'src [u8], file: FileId) -> Result<Self, LexError> {
        match std::str::from_utf8(bytes) {
            Ok(s) => Ok(Self::new(s, file)),
            Err(_) => Err(LexError::new(
                LexErrorKind::InvalidUtf8,
                Span::point(file, 1, 1),
            )),
        }
    }

    /// Tokenize the entire source into a vector, including the trailing
    /// `Eof` token. Aborts on the first lex error (non-goal: error
    /// recovery, spec.md sec 1).
    pub fn tokenize(source: &'src str, file: FileId) -> Result<Vec<Token>, LexError> {
        let mut lexer = Lexer::new(source, file);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token()?;
            let is_eof = matches!(tok.kind, TokenKind::Eof);
            out.push(tok);
            if is_eof {
                break;
            }
        }
        Ok(out)
    }

    /// Produce the next token, including trivia (whitespace, newlines,
    /// comments) -- the "real-get-token wrapper" that discards these lives
    /// one layer up, in `fec-parser`'s `TokenStream` (spec.md sec 4.1 rule 2).
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        if self.emitted_eof {
            return Ok(Token::new(TokenKind::Eof, self.here()));
        }
        if self.cursor.is_eof() {
            self.emitted_eof = true;
            return Ok(Token::new(TokenKind::Eof, self.here()));
        }

        let (start_line, start_col) = (self.cursor.line(), self.cursor.col());
        let c = self.cursor.peek().unwrap();

        // Shebang (spec.md sec 4.1 rule 3): only at file position (1, 1),
        // and only `#!` followed by `/` -- `#![` is the crate-attribute
        // opener, not a shebang.
        if start_line == 1 && start_col == 1 && c == '#' && self.cursor.peek_n(1) == Some('!') && self.cursor.peek_n(2) == Some('/') {
            self.cursor.advance();
            self.cursor.advance();
            self.cursor.eat_while(|c| c != '\n');
            return Ok(self.finish(TokenKind::Whitespace, start_line, start_col));
        }

        if c == '\r' && self.cursor.peek_n(1) == Some('\n') {
            self.cursor.advance();
            self.cursor.advance();
            return Ok(self.finish(TokenKind::Newline, start_line, start_col));
        }
        if c == '\n' || c == '\r' {
            self.cursor.advance();
            return Ok(self.finish(TokenKind::Newline, start_line, start_col));
        }
        if c.is_ascii_whitespace() {
            self.cursor.eat_while(|c| c.is_ascii_whitespace() && c != '\n' && c != '\r');
            return Ok(self.finish(TokenKind::Whitespace, start_line, start_col));
        }

        if c == '/' && self.cursor.peek_n(1) == Some('/') {
            return Ok(self.lex_line_comment(start_line, start_col));
        }
        if c == '/' && self.cursor.peek_n(1) == Some('*') {
            return Ok(self.lex_block_comment(start_line, start_col)?);
        }

        if c.is_ascii_digit() {
            return self.lex_number(start_line, start_col);
        }

        if c == '\'' {
            return self.lex_quote(start_line, start_col);
        }
        if c == '"' {
            return self.lex_string(start_line, start_col);
        }
        if c == 'b' && matches!(self.cursor.peek_n(1), Some('"') | Some('\'')) {
            return self.lex_byte_literal(start_line, start_col);
        }
        if (c == 'b' || c == 'r') && self.is_raw_string_start() {
            return self.lex_raw_string(start_line, start_col);
        }

        if is_ident_start(c) {
            return Ok(self.lex_ident_or_keyword(start_line, start_col));
        }

        if let Some((spelling, kind)) = symbols::longest_match(self.cursor.rest()) {
            for _ in 0..spelling.chars().count() {
                self.cursor.advance();
            }
            return Ok(self.finish(kind, start_line, start_col));
        }

        self.cursor.advance();
        Err(LexError::new(
            LexErrorKind::UnexpectedByte(c),
            self.cursor.span_from(start_line, start_col),
        ))
    }

    fn here(&self) -> Span {
        self.cursor.span_from(self.cursor.line(), self.cursor.col())
    }

    fn finish(&self, kind: TokenKind, start_line: u32, start_col: u32) -> Token {
        Token::new(kind, self.cursor.span_from(start_line, start_col))
    }

    fn lex_line_comment(&mut self, start_line: u32, start_col: u32) -> Token {
        self.cursor.advance();
        self.cursor.advance();
        let doc = if self.cursor.peek() == Some('!') {
            self.cursor.advance();
            DocKind::Inner
        } else if self.cursor.peek() == Some('/') && self.cursor.peek_n(1) != Some('/') {
            self.cursor.advance();
            DocKind::Outer
        } else {
            DocKind::None
        };
        let text_start = self.cursor.pos();
        self.cursor.eat_while(|c| c != '\n' && c != '\r');
        let text = self.cursor.slice(text_start, self.cursor.pos()).to_string();
        self.finish(TokenKind::Comment { text, doc }, start_line, start_col)
    }

    fn lex_block_comment(&mut self, start_line: u32, start_col: u32) -> Result<Token, LexError> {
        self.cursor.advance();
        self.cursor.advance();
        let doc = if self.cursor.peek() == Some('!') {
            self.cursor.advance();
            DocKind::Inner
        } else if self.cursor.peek() == Some('*') && !matches!(self.cursor.peek_n(1), Some('*') | Some('/')) {
            self.cursor.advance();
            DocKind::Outer
        } else {
            DocKind::None
        };
        let text_start = self.cursor.pos();
        let mut depth = 1u32;
        loop {
            match (self.cursor.peek(), self.cursor.peek_n(1)) {
                (None, _) => {
                    return Err(LexError::new(
                        LexErrorKind::UnterminatedBlockComment,
                        self.cursor.span_from(start_line, start_col),
                    ));
                }
                (Some('/'), Some('*')) => {
                    self.cursor.advance();
                    self.cursor.advance();
                    depth += 1;
                }
                (Some('*'), Some('/')) => {
                    let text_end = self.cursor.pos();
                    self.cursor.advance();
                    self.cursor.advance();
                    depth -= 1;
                    if depth == 0 {
                        let text = self.cursor.slice(text_start, text_end).to_string();
                        return Ok(self.finish(TokenKind::Comment { text, doc }, start_line, start_col));
                    }
                }
                _ => {
                    self.cursor.advance();
                }
            }
        }
    }

    fn lex_ident_or_keyword(&mut self, start_line: u32, start_col: u32) -> Token {
        let start = self.cursor.pos();
        self.cursor.eat_while(is_ident_continue);
        let text = self.cursor.slice(start, self.cursor.pos()).to_string();
        if self.cursor.peek() == Some('!') {
            self.cursor.advance();
            return self.finish(TokenKind::MacroName(text), start_line, start_col);
        }
        if let Some(kw) = keyword_from_str(&text) {
            return self.finish(kw, start_line, start_col);
        }
        self.finish(TokenKind::Ident(text), start_line, start_col)
    }

    /// A leading `'` is either a lifetime or a character literal. Per
    /// spec.md sec 4.1 rule 6: if the following character begins an
    /// identifier and is *not* immediately followed by a closing quote,
    /// it's a lifetime.
    fn lex_quote(&mut self, start_line: u32, start_col: u32) -> Result<Token, LexError> {
        self.cursor.advance(); // opening '
        let looks_like_ident = self.cursor.peek().map_or(false, is_ident_start);
        let closes_immediately = self.cursor.peek_n(1) == Some('\'');
        if looks_like_ident && !closes_immediately {
            let start = self.cursor.pos();
            self.cursor.eat_while(is_ident_continue);
            let text = self.cursor.slice(start, self.cursor.pos()).to_string();
            return Ok(self.finish(TokenKind::Lifetime(text), start_line, start_col));
        }
        // Character literal.
        let ch = self.read_char_escape('\'', start_line, start_col)?;
        match self.cursor.peek() {
            Some('\'') => {
                self.cursor.advance();
                Ok(self.finish(TokenKind::Char(ch), start_line, start_col))
            }
            _ => Err(LexError::new(
                LexErrorKind::UnterminatedChar,
                self.cursor.span_from(start_line, start_col),
            )),
        }
    }

    fn lex_string(&mut self, start_line: u32, start_col: u32) -> Result<Token, LexError> {
        self.cursor.advance(); // opening "
        let mut s = String::new();
        loop {
            match self.cursor.peek() {
                None => {
                    return Err(LexError::new(
                        LexErrorKind::UnterminatedString,
                        self.cursor.span_from(start_line, start_col),
                    ))
                }
                Some('"') => {
                    self.cursor.advance();
                    return Ok(self.finish(TokenKind::Str(s), start_line, start_col));
                }
                Some('\\') if self.is_line_splice() => {
                    self.cursor.advance();
                    self.cursor.advance();
                    self.cursor.eat_while(|c| c.is_whitespace());
                }
                _ => {
                    s.push(self.read_char_escape('"', start_line, start_col)?);
                }
            }
        }
    }

    fn lex_byte_literal(&mut self, start_line: u32, start_col: u32) -> Result<Token, LexError> {
        self.cursor.advance(); // 'b'
        if self.cursor.peek() == Some('\'') {
            self.cursor.advance();
            let ch = self.read_char_escape('\'', start_line, start_col)?;
            match self.cursor.peek() {
                Some('\'') => {
                    self.cursor.advance();
                    return Ok(self.finish(
                        TokenKind::Integer {
                            value: ch as u128,
                            tag: LiteralTypeTag::Explicit(CoreType::U8),
                        },
                        start_line,
                        start_col,
                    ));
                }
                _ => {
                    return Err(LexError::new(
                        LexErrorKind::UnterminatedChar,
                        self.cursor.span_from(start_line, start_col),
                    ))
                }
            }
        }
        // b"..."
        self.cursor.advance(); // opening "
        let mut bytes = Vec::new();
        loop {
            match self.cursor.peek() {
                None => {
                    return Err(LexError::new(
                        LexErrorKind::UnterminatedString,
                        self.cursor.span_from(start_line, start_col),
                    ))
                }
                Some('"') => {
                    self.cursor.advance();
                    return Ok(self.finish(TokenKind::ByteStr(bytes), start_line, start_col));
                }
                _ => {
                    let ch = self.read_char_escape('"', start_line, start_col)?;
                    let mut buf = [0u8; 4];
                    bytes.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                }
            }
        }
    }

    /// Whether the cursor sits at the start of a raw (byte) string: `r"`,
    /// `r#"`, `br"`, `br#"`, ...
    fn is_raw_string_start(&self) -> bool {
        let mut n = 0usize;
        if self.cursor.peek_n(n) == Some('b') {
            n += 1;
        }
        if self.cursor.peek_n(n) != Some('r') {
            return false;
        }
        n += 1;
        while self.cursor.peek_n(n) == Some('#') {
            n += 1;
        }
        self.cursor.peek_n(n) == Some('"')
    }

    fn lex_raw_string(&mut self, start_line: u32, start_col: u32) -> Result<Token, LexError> {
        let is_byte = self.cursor.peek() == Some('b');
        if is_byte {
            self.cursor.advance();
        }
        self.cursor.advance(); // 'r'
        let mut hash_count = 0u32;
        while self.cursor.peek() == Some('#') {
            self.cursor.advance();
            hash_count += 1;
        }
        self.cursor.advance(); // opening "
        let content_start = self.cursor.pos();
        loop {
            match self.cursor.peek() {
                None => {
                    return Err(LexError::new(
                        LexErrorKind::UnterminatedRawString { hash_count },
                        self.cursor.span_from(start_line, start_col),
                    ))
                }
                Some('"') => {
                    let content_end = self.cursor.pos();
                    self.cursor.advance();
                    let mut closing_hashes = 0u32;
                    while closing_hashes < hash_count && self.cursor.peek() == Some('#') {
                        self.cursor.advance();
                        closing_hashes += 1;
                    }
                    if closing_hashes == hash_count {
                        let text = self.cursor.slice(content_start, content_end).to_string();
                        return Ok(if is_byte {
                            self.finish(TokenKind::ByteStr(text.into_bytes()), start_line, start_col)
                        } else {
                            self.finish(TokenKind::Str(text), start_line, start_col)
                        });
                    }
                    // Not enough matching hashes: the quote was content, not
                    // the closing delimiter; keep scanning from here.
                }
                _ => {
                    self.cursor.advance();
                }
            }
        }
    }

    /// `\` immediately followed by a newline is a line-splice: consumed
    /// through the next non-whitespace (spec.md sec 4.1 rule 5).
    fn is_line_splice(&self) -> bool {
        matches!(self.cursor.peek_n(1), Some('\n')) || (self.cursor.peek_n(1) == Some('\r') && self.cursor.peek_n(2) == Some('\n'))
    }

    fn read_char_escape(&mut self, _delim: char, start_line: u32, start_col: u32) -> Result<char, LexError> {
        let c = self
            .cursor
            .advance()
            .ok_or_else(|| LexError::new(LexErrorKind::UnterminatedString, self.cursor.span_from(start_line, start_col)))?;
        if c != '\\' {
            return Ok(c);
        }
        let esc = self
            .cursor
            .advance()
            .ok_or_else(|| LexError::new(LexErrorKind::UnterminatedString, self.cursor.span_from(start_line, start_col)))?;
        Ok(match esc {
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            '0' => '\0',
            'x' => self.read_hex_byte_escape(start_line, start_col)?,
            'u' => self.read_unicode_escape(start_line, start_col)?,
            other => {
                return Err(LexError::new(
                    LexErrorKind::InvalidEscapeSequence(other),
                    self.cursor.span_from(start_line, start_col),
                ))
            }
        })
    }

    fn read_hex_byte_escape(&mut self, start_line: u32, start_col: u32) -> Result<char, LexError> {
        let mut value: u32 = 0;
        for _ in 0..2 {
            let d = self
                .cursor
                .advance()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| LexError::new(LexErrorKind::InvalidEscapeSequence('x'), self.cursor.span_from(start_line, start_col)))?;
            value = value * 16 + d;
        }
        Ok(value as u8 as char)
    }

    /// `\u{...}`, up to six hex digits (spec.md sec 4.1 rule 5/8).
    fn read_unicode_escape(&mut self, start_line: u32, start_col: u32) -> Result<char, LexError> {
        if self.cursor.peek() != Some('{') {
            return Err(LexError::new(LexErrorKind::InvalidUnicodeEscape, self.cursor.span_from(start_line, start_col)));
        }
        self.cursor.advance();
        let mut value: u32 = 0;
        let mut digits = 0;
        while let Some(c) = self.cursor.peek() {
            if c == '}' {
                break;
            }
            let d = c
                .to_digit(16)
                .ok_or_else(|| LexError::new(LexErrorKind::InvalidUnicodeEscape, self.cursor.span_from(start_line, start_col)))?;
            if digits >= 6 {
                return Err(LexError::new(LexErrorKind::InvalidUnicodeEscape, self.cursor.span_from(start_line, start_col)));
            }
            value = value * 16 + d;
            digits += 1;
            self.cursor.advance();
        }
        if self.cursor.peek() != Some('}') || digits == 0 {
            return Err(LexError::new(LexErrorKind::InvalidUnicodeEscape, self.cursor.span_from(start_line, start_col)));
        }
        self.cursor.advance();
        char::from_u32(value).ok_or_else(|| LexError::new(LexErrorKind::InvalidUnicodeEscape, self.cursor.span_from(start_line, start_col)))
    }

    fn lex_number(&mut self, start_line: u32, start_col: u32) -> Result<Token, LexError> {
        let mut base = 10u32;
        if self.cursor.peek() == Some('0') {
            match self.cursor.peek_n(1) {
                Some('x') => {
                    base = 16;
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some('o') => {
                    base = 8;
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some('b') => {
                    base = 2;
                    self.cursor.advance();
                    self.cursor.advance();
                }
                _ => {}
            }
        }
        let digits_start = self.cursor.pos();
        self.cursor.eat_while(|c| c.is_digit(base) || c == '_');
        let mut is_float = false;
        if base == 10 {
            if self.cursor.peek() == Some('.') && self.cursor.peek_n(1).map_or(false, |c| c.is_ascii_digit()) {
                is_float = true;
                self.cursor.advance();
                self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
            }
            if matches!(self.cursor.peek(), Some('e') | Some('E')) {
                let mut offset = 1;
                let mut la = self.cursor.peek_n(offset);
                if matches!(la, Some('+') | Some('-')) {
                    offset += 1;
                    la = self.cursor.peek_n(offset);
                }
                if la.map_or(false, |c| c.is_ascii_digit()) {
                    is_float = true;
                    self.cursor.advance(); // e/E
                    if matches!(self.cursor.peek(), Some('+') | Some('-')) {
                        self.cursor.advance();
                    }
                    self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
                }
            }
        } else if self.cursor.peek() == Some('.') && self.cursor.peek_n(1).map_or(false, |c| c.is_ascii_digit()) {
            // Non-decimal floats are rejected (spec.md sec 9 open question).
            return Err(LexError::new(LexErrorKind::NonDecimalFloat, self.cursor.span_from(start_line, start_col)));
        }

        let digits_end = self.cursor.pos();
        let digits: String = self.cursor.slice(digits_start, digits_end).chars().filter(|&c| c != '.' && c != '_').collect();

        if digits.len() > 60 {
            return Err(LexError::new(LexErrorKind::FloatLiteralTooLarge, self.cursor.span_from(start_line, start_col)));
        }

        // Optional suffix.
        let suffix_start = self.cursor.pos();
        if is_ident_start_no_digit_check(self.cursor.peek()) {
            self.cursor.eat_while(is_ident_continue);
        }
        let suffix = self.cursor.slice(suffix_start, self.cursor.pos());
        // `1f32`/`1f64` are float literals even without a `.` or exponent --
        // the suffix alone carries the float-ness (spec.md sec 4.1 rule 4).
        // Only applies to decimal literals: a binary/octal digit run can't
        // have consumed the `f`, so a trailing `f32`/`f64` there is just an
        // invalid integer suffix.
        let is_float = is_float || (base == 10 && (suffix == "f32" || suffix == "f64"));

        if is_float {
            let text: String = self.cursor.slice(digits_start, suffix_start).chars().filter(|&c| c != '_').collect();
            let value: f64 = text.parse().map_err(|_| LexError::new(LexErrorKind::FloatLiteralTooLarge, self.cursor.span_from(start_line, start_col)))?;
            let tag = if suffix.is_empty() {
                FloatTypeTag::Any
            } else {
                match suffix {
                    "f32" => FloatTypeTag::Explicit(CoreType::F32),
                    "f64" => FloatTypeTag::Explicit(CoreType::F64),
                    other => return Err(LexError::new(LexErrorKind::InvalidIntSuffix(other.to_string()), self.cursor.span_from(start_line, start_col))),
                }
            };
            return Ok(self.finish(TokenKind::Float { value, tag }, start_line, start_col));
        }

        let clean_digits: String = self.cursor.slice(digits_start, suffix_start).chars().filter(|&c| c != '_').collect();
        let value = u128::from_str_radix(&clean_digits, base)
            .map_err(|_| LexError::new(LexErrorKind::InvalidIntSuffix(clean_digits.clone()), self.cursor.span_from(start_line, start_col)))?;
        let tag = if suffix.is_empty() {
            LiteralTypeTag::Any
        } else {
            match CoreType::from_str(suffix).filter(|t| t.is_valid_int_suffix()) {
                Some(ty) => LiteralTypeTag::Explicit(ty),
                None => return Err(LexError::new(LexErrorKind::InvalidIntSuffix(suffix.to_string()), self.cursor.span_from(start_line, start_col))),
            }
        };
        Ok(self.finish(TokenKind::Integer { value, tag }, start_line, start_col))
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic() || (!c.is_ascii() && !c.is_whitespace() && !c.is_control())
}

fn is_ident_start_no_digit_check(c: Option<char>) -> bool {
    c.map_or(false, is_ident_start)
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric() || (!c.is_ascii() && !c.is_whitespace() && !c.is_control())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::tokenize(src, FileId::ROOT).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn non_trivia(src: &str) -> Vec<TokenKind> {
        kinds(src)
            .into_iter()
            .filter(|k| !matches!(k, TokenKind::Whitespace | TokenKind::Newline | TokenKind::Comment { .. }))
            .collect()
    }

    #[test]
    fn integer_bases() {
        assert_eq!(
            non_trivia("0x1F 0b101 0o17 1_000"),
            vec![
                TokenKind::Integer { value: 0x1F, tag: LiteralTypeTag::Any },
                TokenKind::Integer { value: 0b101, tag: LiteralTypeTag::Any },
                TokenKind::Integer { value: 0o17, tag: LiteralTypeTag::Any },
                TokenKind::Integer { value: 1000, tag: LiteralTypeTag::Any },
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn integer_suffix_and_float() {
        assert_eq!(
            non_trivia("1i32 3.14 1.0e10"),
            vec![
                TokenKind::Integer { value: 1, tag: LiteralTypeTag::Explicit(CoreType::I32) },
                TokenKind::Float { value: 3.14, tag: FloatTypeTag::Any },
                TokenKind::Float { value: 1.0e10, tag: FloatTypeTag::Any },
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn dot_not_followed_by_digit_is_its_own_token() {
        assert_eq!(
            non_trivia("1.foo()"),
            vec![
                TokenKind::Integer { value: 1, tag: LiteralTypeTag::Any },
                TokenKind::Dot,
                TokenKind::Ident("foo".into()),
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_escapes() {
        let toks = kinds(r#""hi\n\t\x41\u{1F600}""#);
        assert_eq!(toks[0], TokenKind::Str("hi\n\t\x41\u{1F600}".to_string()));
    }

    #[test]
    fn byte_string_and_char() {
        assert_eq!(non_trivia(r#"b"hi""#)[0], TokenKind::ByteStr(vec![0x68, 0x69]));
        assert_eq!(non_trivia("'x'")[0], TokenKind::Char('x'));
    }

    #[test]
    fn lifetime_vs_char() {
        assert_eq!(non_trivia("'a"), vec![TokenKind::Lifetime("a".into()), TokenKind::Eof]);
        assert_eq!(non_trivia("'a'"), vec![TokenKind::Char('a'), TokenKind::Eof]);
    }

    #[test]
    fn raw_string_with_hashes() {
        assert_eq!(non_trivia(r###"r#"has "one" quote"#"###)[0], TokenKind::Str(r#"has "one" quote"#.to_string()));
    }

    #[test]
    fn nested_block_comments() {
        let toks = kinds("/* outer /* inner */ still outer */ 1");
        assert!(matches!(toks[0], TokenKind::Comment { .. }));
    }

    #[test]
    fn macro_name_detection() {
        assert_eq!(non_trivia("foo!"), vec![TokenKind::MacroName("foo".into()), TokenKind::Eof]);
    }

    #[test]
    fn keyword_vs_identifier() {
        assert_eq!(non_trivia("fn foo"), vec![TokenKind::KwFn, TokenKind::Ident("foo".into()), TokenKind::Eof]);
    }

    #[test]
    fn shebang_at_file_start_is_whitespace() {
        assert_eq!(non_trivia("#!/usr/bin/env rustc\nfn main() {}")[0], TokenKind::KwFn);
    }

    #[test]
    fn hash_bang_bracket_is_not_shebang() {
        assert_eq!(non_trivia("#![allow(dead_code)]")[0], TokenKind::Pound);
    }

    #[test]
    fn non_decimal_float_is_rejected() {
        assert!(Lexer::tokenize("0x1.5", FileId::ROOT).is_err());
    }

    #[test]
    fn suffix_alone_makes_a_float() {
        assert_eq!(
            non_trivia("1f32"),
            vec![TokenKind::Float { value: 1.0, tag: FloatTypeTag::Explicit(CoreType::F32) }, TokenKind::Eof]
        );
    }

    #[test]
    fn operator_longest_match() {
        assert_eq!(
            non_trivia("a <<= b"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::ShlEq,
                TokenKind::Ident("b".into()),
                TokenKind::Eof,
            ]
        );
    }
}
