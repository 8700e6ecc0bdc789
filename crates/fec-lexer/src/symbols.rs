//! The multi-character symbol table (spec.md sec 4.1 rule 7).
//!
//! A lexicographically ordered table of symbols, each at most three bytes,
//! searched by extending the match greedily and remembering the longest
//! complete entry seen, mirroring `original_source/src/parse/token.cpp`'s
//! `Lexer::getSymbol`.

use crate::token::TokenKind;

/// Every structural punctuation spelling, sorted so `longest_match` can walk
/// it with a simple linear prefix scan (the table is small enough -- under
/// fifty entries -- that a flat scan beats standing up a trie).
static SYMBOLS: &[(&str, TokenKind)] = &[
    ("!", TokenKind::Not),
    ("!=", TokenKind::Ne),
    ("#", TokenKind::Pound),
    ("$", TokenKind::Dollar),
    ("%", TokenKind::Percent),
    ("%=", TokenKind::PercentEq),
    ("&", TokenKind::And),
    ("&&", TokenKind::AndAnd),
    ("&=", TokenKind::AndEq),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("*", TokenKind::Star),
    ("*=", TokenKind::StarEq),
    ("+", TokenKind::Plus),
    ("+=", TokenKind::PlusEq),
    (",", TokenKind::Comma),
    ("-", TokenKind::Minus),
    ("-=", TokenKind::MinusEq),
    ("->", TokenKind::RArrow),
    (".", TokenKind::Dot),
    ("..", TokenKind::DotDot),
    ("...", TokenKind::DotDotDot),
    ("..=", TokenKind::DotDotEq),
    ("/", TokenKind::Slash),
    ("/=", TokenKind::SlashEq),
    (":", TokenKind::Colon),
    ("::", TokenKind::ColonColon),
    (";", TokenKind::Semi),
    ("<", TokenKind::Lt),
    ("<<", TokenKind::Shl),
    ("<<=", TokenKind::ShlEq),
    ("<=", TokenKind::Le),
    ("=", TokenKind::Eq),
    ("==", TokenKind::EqEq),
    ("=>", TokenKind::FatArrow),
    (">", TokenKind::Gt),
    (">=", TokenKind::Ge),
    (">>", TokenKind::Shr),
    (">>=", TokenKind::ShrEq),
    ("?", TokenKind::Question),
    ("@", TokenKind::At),
    ("[", TokenKind::LBracket),
    ("]", TokenKind::RBracket),
    ("^", TokenKind::Caret),
    ("^=", TokenKind::CaretEq),
    ("{", TokenKind::LBrace),
    ("|", TokenKind::Or),
    ("|=", TokenKind::OrEq),
    ("||", TokenKind::OrOr),
    ("}", TokenKind::RBrace),
    ("~", TokenKind::Tilde),
];

/// Find the longest symbol in `SYMBOLS` that is a prefix of `text` (which is
/// the remaining source starting at the current cursor position, not
/// necessarily just the symbol itself). Returns the matched spelling and its
/// `TokenKind`, or `None` if no symbol starts here.
pub fn longest_match(text: &str) -> Option<(&'static str, TokenKind)> {
    let mut best: Option<(&'static str, TokenKind)> = None;
    for (spelling, kind) in SYMBOLS {
        if text.starts_with(spelling) {
            let is_longer = best.as_ref().map_or(true, |(b, _)| spelling.len() > b.len());
            if is_longer {
                best = Some((spelling, kind.clone()));
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_table_is_sorted() {
        for w in SYMBOLS.windows(2) {
            assert!(w[0].0 < w[1].0, "{:?} should sort before {:?}", w[0].0, w[1].0);
        }
    }

    #[test]
    fn longest_match_prefers_longer_symbols() {
        assert_eq!(longest_match("<<=x").unwrap().0, "<<=");
        assert_eq!(longest_match("<<x").unwrap().0, "<<");
        assert_eq!(longest_match("<x").unwrap().0, "<");
    }

    #[test]
    fn longest_match_disambiguates_dot_forms() {
        assert_eq!(longest_match("..=1").unwrap().0, "..=");
        assert_eq!(longest_match("...1").unwrap().0, "...");
        assert_eq!(longest_match("..1").unwrap().0, "..");
        assert_eq!(longest_match(".1").unwrap().0, ".");
    }

    #[test]
    fn longest_match_none_for_unknown_start() {
        assert!(longest_match("abc").is_none());
    }
}
