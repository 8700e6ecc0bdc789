//! Attribute and visibility parsing (spec.md sec 4.3 "Attributes",
//! "Visibility").
//!
//! Grounded on `snow-parser/src/parser/items.rs`'s leading-attribute loop
//! and on `original_source/src/ast/attribute.hpp` for the
//! name/list/name-value `MetaItem` shapes.

use fec_lexer::token::TokenKind;

use crate::ast::{Attribute, Literal, MetaItem, Visibility};

use super::{PResult, ParseError, Parser};

/// Consume every leading `#[...]`/`#![...]` attribute. Order is preserved;
/// duplicates are left for a later validation pass to reject.
pub fn parse_attrs(p: &mut Parser) -> PResult<Vec<Attribute>> {
    let mut attrs = Vec::new();
    while matches!(p.peek_kind()?, TokenKind::Pound) {
        attrs.push(parse_one_attr(p)?);
    }
    Ok(attrs)
}

/// Consume only leading `#![...]` attributes, stopping at the first
/// `#[...]` outer attribute (which belongs to the next item, not the
/// enclosing crate/module) or any non-attribute token.
pub fn parse_inner_attrs(p: &mut Parser) -> PResult<Vec<Attribute>> {
    let mut attrs = Vec::new();
    while matches!(p.peek_kind()?, TokenKind::Pound) && matches!(p.peek2_kind()?, TokenKind::Not) {
        attrs.push(parse_one_attr(p)?);
    }
    Ok(attrs)
}

fn parse_one_attr(p: &mut Parser) -> PResult<Attribute> {
    let ps = p.start_span()?;
    p.expect(&TokenKind::Pound, "`#`")?;
    let inner = p.eat(&TokenKind::Not)?;
    p.expect(&TokenKind::LBracket, "`[`")?;
    let meta = parse_meta_item(p)?;
    p.expect(&TokenKind::RBracket, "`]`")?;
    Ok(Attribute { meta, inner, span: p.end_span(ps) })
}

fn parse_meta_item(p: &mut Parser) -> PResult<MetaItem> {
    let name = p.expect_ident()?;
    match p.peek_kind()? {
        TokenKind::LParen => {
            p.bump()?;
            let mut items = Vec::new();
            loop {
                if p.eat(&TokenKind::RParen)? {
                    break;
                }
                items.push(parse_meta_item(p)?);
                if !p.eat(&TokenKind::Comma)? {
                    p.expect(&TokenKind::RParen, "`)`")?;
                    break;
                }
            }
            Ok(MetaItem::List(name, items))
        }
        TokenKind::Eq => {
            p.bump()?;
            let value = parse_meta_literal(p)?;
            Ok(MetaItem::NameValue(name, value))
        }
        _ => Ok(MetaItem::Name(name)),
    }
}

fn parse_meta_literal(p: &mut Parser) -> PResult<Literal> {
    let tok = p.bump()?;
    match tok.kind {
        TokenKind::Str(s) => Ok(Literal::Str(s)),
        TokenKind::Integer { value, tag } => Ok(Literal::Int { value, tag }),
        TokenKind::KwTrue => Ok(Literal::Bool(true)),
        TokenKind::KwFalse => Ok(Literal::Bool(false)),
        other => Err(ParseError::UnexpectedToken { found: other, expected: vec!["a literal attribute value"], span: tok.span }),
    }
}

/// `pub` or nothing (private is the default everywhere per spec.md sec 4.3
/// "Visibility": "items are private by default").
pub fn parse_visibility(p: &mut Parser) -> PResult<Visibility> {
    if p.eat(&TokenKind::KwPub)? {
        Ok(Visibility::Public)
    } else {
        Ok(Visibility::Private)
    }
}

