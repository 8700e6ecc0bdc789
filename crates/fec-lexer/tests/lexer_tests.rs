//! Integration tests for the tokenizer, including the round-trip property
//! from spec.md sec 8: concatenating every token's source slice (as located
//! by its span) reproduces the input exactly.

use fec_common::FileId;
use fec_lexer::Lexer;

/// Build a line-start byte-offset table so a `(line, col)` pair from a
/// `Span` can be turned back into a byte offset into `source`, the way a
/// caller holding only spans (never byte offsets) would have to.
fn line_starts(source: &str) -> Vec<usize> {
    let mut starts = vec![0usize];
    for (i, c) in source.char_indices() {
        if c == '\n' {
            starts.push(i + 1);
        }
    }
    starts
}

fn byte_offset(starts: &[usize], line: u32, col: u32) -> usize {
    starts[(line - 1) as usize] + (col - 1) as usize
}

fn assert_round_trips(source: &str) {
    let tokens = Lexer::tokenize(source, FileId::ROOT).expect("should lex cleanly");
    let starts = line_starts(source);
    let mut rebuilt = String::new();
    for tok in &tokens {
        if matches!(tok.kind, fec_lexer::token::TokenKind::Eof) {
            continue;
        }
        let start = byte_offset(&starts, tok.span.start_line, tok.span.start_col);
        let end = byte_offset(&starts, tok.span.end_line, tok.span.end_col);
        rebuilt.push_str(&source[start..end]);
    }
    assert_eq!(rebuilt, source, "token spans did not tile the source exactly");
}

#[test]
fn round_trip_simple_function() {
    assert_round_trips("fn add(a: i32, b: i32) -> i32 {\n    a + b\n}\n");
}

#[test]
fn round_trip_comments_and_strings() {
    assert_round_trips("// leading comment\nlet s = \"hi\\nthere\"; /* trailing */\n");
}

#[test]
fn round_trip_with_crlf_and_tabs() {
    assert_round_trips("fn f() {\r\n\tlet x = 1;\r\n}\r\n");
}

#[test]
fn round_trip_operators_and_ranges() {
    assert_round_trips("let r = 0..=10; x <<= 2; y = a..b;\n");
}

#[test]
fn round_trip_raw_and_byte_strings() {
    assert_round_trips(r####"let s = r#"a "quoted" word"#; let b = b"raw";"####);
}

#[test]
fn unterminated_string_reports_error_not_panic() {
    let err = Lexer::tokenize("let s = \"oops", FileId::ROOT).unwrap_err();
    assert!(matches!(err.kind, fec_lexer::error::LexErrorKind::UnterminatedString));
}

#[test]
fn unterminated_block_comment_reports_error() {
    let err = Lexer::tokenize("/* never closes", FileId::ROOT).unwrap_err();
    assert!(matches!(err.kind, fec_lexer::error::LexErrorKind::UnterminatedBlockComment));
}

#[test]
fn invalid_escape_reports_error() {
    let err = Lexer::tokenize(r#""\q""#, FileId::ROOT).unwrap_err();
    assert!(matches!(err.kind, fec_lexer::error::LexErrorKind::InvalidEscapeSequence('q')));
}
