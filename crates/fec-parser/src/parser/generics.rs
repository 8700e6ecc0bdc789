//! Generic parameter lists and where-clauses (spec.md sec 4.3 "Generics",
//! "Where-clauses").
//!
//! Grounded on `snow-parser/src/parser/generics.rs` for the
//! lifetimes-then-types parameter ordering and on
//! `original_source/src/ast/generics.hpp` for the bound/default shapes.

use fec_lexer::token::TokenKind;

use crate::ast::{GenericParam, GenericParamKind, Generics, TraitBound, WhereClause, WherePredicate};

use super::paths;
use super::types;
use super::{PResult, Parser};

/// `<'a, T: Bound, const N: usize = 0>`. Absent entirely when the next
/// token isn't `<`.
pub fn parse_generics(p: &mut Parser) -> PResult<Generics> {
    if !p.eat(&TokenKind::Lt)? {
        return Ok(Generics::default());
    }
    let mut params = Vec::new();
    loop {
        if p.eat(&TokenKind::Gt)? {
            break;
        }
        match p.peek_kind()? {
            TokenKind::Lifetime(_) => {
                let TokenKind::Lifetime(name) = p.bump()?.kind else { unreachable!() };
                let bounds = if p.eat(&TokenKind::Colon)? { parse_lifetime_bounds(p)? } else { Vec::new() };
                params.push(GenericParam { name, kind: GenericParamKind::Lifetime { bounds } });
            }
            _ => {
                let name = p.expect_ident()?;
                let bounds = if p.eat(&TokenKind::Colon)? { parse_trait_bounds(p)? } else { Vec::new() };
                let default = if p.eat(&TokenKind::Eq)? { Some(types::parse_type(p)?) } else { None };
                params.push(GenericParam { name, kind: GenericParamKind::Type { bounds, default } });
            }
        }
        if !p.eat(&TokenKind::Comma)? {
            p.expect(&TokenKind::Gt, "`>`")?;
            break;
        }
    }
    Ok(Generics { params })
}

fn parse_lifetime_bounds(p: &mut Parser) -> PResult<Vec<String>> {
    let mut bounds = vec![{
        let TokenKind::Lifetime(name) = p.bump()?.kind else {
            return Ok(Vec::new());
        };
        name
    }];
    while p.eat(&TokenKind::Plus)? {
        let TokenKind::Lifetime(name) = p.bump()?.kind else { break };
        bounds.push(name);
    }
    Ok(bounds)
}

/// One or more `+`-separated trait bounds, each optionally `?`-relaxed or
/// higher-ranked (`for<'a> Trait<'a>`).
pub fn parse_trait_bounds(p: &mut Parser) -> PResult<Vec<TraitBound>> {
    let mut bounds = vec![parse_one_bound(p)?];
    while p.eat(&TokenKind::Plus)? {
        if let TokenKind::Lifetime(_) = p.peek_kind()? {
            p.bump()?;
            continue;
        }
        bounds.push(parse_one_bound(p)?);
    }
    Ok(bounds)
}

fn parse_one_bound(p: &mut Parser) -> PResult<TraitBound> {
    let hrls = if p.eat(&TokenKind::KwFor)? {
        p.expect(&TokenKind::Lt, "`<`")?;
        let mut names = Vec::new();
        loop {
            if p.eat(&TokenKind::Gt)? {
                break;
            }
            let TokenKind::Lifetime(name) = p.bump()?.kind else { break };
            names.push(name);
            if !p.eat(&TokenKind::Comma)? {
                p.expect(&TokenKind::Gt, "`>`")?;
                break;
            }
        }
        names
    } else {
        Vec::new()
    };
    let maybe = p.eat(&TokenKind::Question)?;
    let path = paths::parse_path(p)?;
    Ok(TraitBound { hrls, path, maybe })
}

/// `where T: Bound, 'a: 'b`. Absent entirely when the next token isn't
/// `where`.
pub fn parse_where_clause(p: &mut Parser) -> PResult<WhereClause> {
    if !p.eat(&TokenKind::KwWhere)? {
        return Ok(WhereClause::default());
    }
    let mut predicates = Vec::new();
    loop {
        if matches!(p.peek_kind()?, TokenKind::LBrace | TokenKind::Semi) {
            break;
        }
        if let TokenKind::Lifetime(_) = p.peek_kind()? {
            let TokenKind::Lifetime(lifetime) = p.bump()?.kind else { unreachable!() };
            p.expect(&TokenKind::Colon, "`:`")?;
            let TokenKind::Lifetime(bound) = p.bump()?.kind else {
                break;
            };
            predicates.push(WherePredicate::LifetimeOutlives { lifetime, bound });
        } else {
            let ty = types::parse_type(p)?;
            p.expect(&TokenKind::Colon, "`:`")?;
            let bounds = parse_trait_bounds(p)?;
            predicates.push(WherePredicate::TypeBound { hrls: Vec::new(), ty, bounds });
        }
        if !p.eat(&TokenKind::Comma)? {
            break;
        }
    }
    Ok(WhereClause { predicates })
}
