//! Pattern parsing (spec.md sec 3 "AST.Pattern").
//!
//! Grounded on `snow-parser/src/parser/patterns.rs` for the overall
//! dispatch and on `original_source/src/ast/pattern.hpp` for the
//! struct/tuple/slice shapes. Bindings are left `MaybeBind` here exactly as
//! spec.md sec 4.4 prescribes; disambiguating a bare identifier against an
//! imported constant or unit struct happens later, against the path
//! binding table, not in this module.

use fec_lexer::token::TokenKind;

use crate::ast::{BindMode, Pattern, PatternBinding, PatternKind};

use super::exprs;
use super::paths;
use super::{PResult, ParseError, Parser};

pub fn parse_pattern(p: &mut Parser) -> PResult<Pattern> {
    let ps = p.start_span()?;
    // `name @ sub-pattern`: only a bare identifier (not a path, struct or
    // tuple pattern) can carry an `@`-binding, so this is checked ahead of
    // the general dispatch rather than folded into `parse_pattern_kind`.
    if let TokenKind::Ident(name) = p.peek_kind()? {
        if name != "_" && matches!(p.peek2_kind()?, TokenKind::At) {
            p.bump()?;
            p.bump()?;
            let inner = parse_pattern(p)?;
            let span = p.end_span(ps);
            let binding = PatternBinding { mutable: false, mode: BindMode::Move, name, slot: 0 };
            return Ok(Pattern { kind: inner.kind, binding: Some(binding), span });
        }
    }
    let kind = parse_pattern_kind(p)?;
    Ok(Pattern::new(kind, p.end_span(ps)))
}

fn parse_pattern_kind(p: &mut Parser) -> PResult<PatternKind> {
    match p.peek_kind()? {
        TokenKind::Ident(ref name) if name == "_" => {
            p.bump()?;
            Ok(PatternKind::Any)
        }
        TokenKind::KwRef | TokenKind::KwMut => {
            // `ref`/`mut` only ever prefix a binding; they're folded into
            // the binding mode by lowering, which is why the `MaybeBind`
            // node itself carries no mode -- that lives on the enclosing
            // `Pattern::binding`, populated once the resolver confirms this
            // really is a fresh binding and not a path to a constant.
            let name = p.expect_ident()?;
            Ok(PatternKind::MaybeBind(name))
        }
        TokenKind::And => {
            p.bump()?;
            let mutable = p.eat(&TokenKind::KwMut)?;
            let inner = Box::new(parse_pattern(p)?);
            Ok(PatternKind::Ref { mutable, inner })
        }
        TokenKind::LParen => parse_tuple(p),
        TokenKind::LBracket => parse_slice(p),
        TokenKind::Integer { .. } | TokenKind::Float { .. } | TokenKind::Str(_) | TokenKind::ByteStr(_) | TokenKind::Char(_) | TokenKind::KwTrue | TokenKind::KwFalse | TokenKind::Minus => {
            parse_value_pattern(p)
        }
        TokenKind::MacroName(_) => {
            let inv = super::exprs::parse_macro_invocation(p)?;
            Ok(PatternKind::Macro(inv))
        }
        TokenKind::Ident(_) | TokenKind::ColonColon | TokenKind::KwSelfValue | TokenKind::KwSuper | TokenKind::KwSelfType => parse_path_pattern(p),
        other => Err(ParseError::UnexpectedToken { found: other, expected: vec!["a pattern"], span: p.peek_span()? }),
    }
}

fn parse_tuple(p: &mut Parser) -> PResult<PatternKind> {
    p.expect(&TokenKind::LParen, "`(`")?;
    let mut elems = Vec::new();
    loop {
        if p.eat(&TokenKind::RParen)? {
            break;
        }
        elems.push(parse_pattern(p)?);
        if !p.eat(&TokenKind::Comma)? {
            p.expect(&TokenKind::RParen, "`)`")?;
            break;
        }
    }
    Ok(PatternKind::Tuple(elems))
}

fn parse_slice(p: &mut Parser) -> PResult<PatternKind> {
    p.expect(&TokenKind::LBracket, "`[`")?;
    let mut leading = Vec::new();
    let mut extra_bind = None;
    let mut trailing = Vec::new();
    let mut seen_rest = false;
    loop {
        if p.eat(&TokenKind::RBracket)? {
            break;
        }
        if p.eat(&TokenKind::DotDot)? {
            seen_rest = true;
        } else {
            let pat = parse_pattern(p)?;
            if seen_rest {
                trailing.push(pat);
            } else {
                leading.push(pat);
            }
        }
        if !p.eat(&TokenKind::Comma)? {
            p.expect(&TokenKind::RBracket, "`]`")?;
            break;
        }
    }
    let _ = seen_rest;
    Ok(PatternKind::Slice { leading, extra_bind, trailing })
}

fn parse_value_pattern(p: &mut Parser) -> PResult<PatternKind> {
    let start = Box::new(exprs::parse_literal_expr(p)?);
    let end = if p.eat(&TokenKind::DotDotEq)? || p.eat(&TokenKind::DotDotDot)? {
        Some(Box::new(exprs::parse_literal_expr(p)?))
    } else {
        None
    };
    Ok(PatternKind::Value { start, end })
}

fn parse_path_pattern(p: &mut Parser) -> PResult<PatternKind> {
    // A bare single identifier with no following path/struct/tuple syntax
    // is a binding candidate, not a path -- spec.md sec 4.4's `MaybeBind`.
    if let TokenKind::Ident(name) = p.peek_kind()? {
        let is_bare = !matches!(p.peek2_kind()?, TokenKind::ColonColon | TokenKind::LParen | TokenKind::LBrace);
        if is_bare {
            p.bump()?;
            return Ok(PatternKind::MaybeBind(name));
        }
    }
    let path = paths::parse_path(p)?;
    match p.peek_kind()? {
        TokenKind::LParen => {
            p.bump()?;
            let mut elems = Vec::new();
            loop {
                if p.eat(&TokenKind::RParen)? {
                    break;
                }
                elems.push(parse_pattern(p)?);
                if !p.eat(&TokenKind::Comma)? {
                    p.expect(&TokenKind::RParen, "`)`")?;
                    break;
                }
            }
            Ok(PatternKind::StructTuple(path, elems))
        }
        TokenKind::LBrace => {
            p.bump()?;
            let mut fields = Vec::new();
            let mut exhaustive = true;
            loop {
                if p.eat(&TokenKind::RBrace)? {
                    break;
                }
                if p.eat(&TokenKind::DotDot)? {
                    exhaustive = false;
                    p.expect(&TokenKind::RBrace, "`}`")?;
                    break;
                }
                let name = p.expect_ident()?;
                let field_pat = if p.eat(&TokenKind::Colon)? {
                    parse_pattern(p)?
                } else {
                    let span = p.peek_span()?;
                    Pattern::new(PatternKind::MaybeBind(name.clone()), span)
                };
                fields.push((name, field_pat));
                if !p.eat(&TokenKind::Comma)? {
                    p.expect(&TokenKind::RBrace, "`}`")?;
                    break;
                }
            }
            Ok(PatternKind::Struct { path, fields, exhaustive })
        }
        _ => Ok(PatternKind::WildcardStructTuple(path)),
    }
}
