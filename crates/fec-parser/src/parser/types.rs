//! Type-expression parsing (spec.md sec 3 "AST.TypeRef").
//!
//! Grounded on `snow-parser/src/parser/types.rs` for the overall shape
//! (prefix dispatch on the leading token, postfix-free grammar) and on
//! `original_source/src/ast/type.hpp` for the primitive/array/pointer/
//! trait-object spellings.

use fec_common::CoreType;
use fec_lexer::token::TokenKind;

use crate::ast::{FunctionTypeInfo, Type, TypeRef};

use super::exprs;
use super::paths;
use super::{PResult, ParseError, Parser};

pub fn parse_type(p: &mut Parser) -> PResult<Type> {
    let ps = p.start_span()?;
    let kind = parse_type_kind(p)?;
    Ok(Type::new(kind, p.end_span(ps)))
}

fn parse_type_kind(p: &mut Parser) -> PResult<TypeRef> {
    match p.peek_kind()? {
        TokenKind::Not => {
            p.bump()?;
            Ok(TypeRef::None)
        }
        TokenKind::Ident(ref name) if name == "_" => {
            p.bump()?;
            Ok(TypeRef::Any)
        }
        TokenKind::Ident(ref name) if CoreType::from_str(name).is_some() => {
            let name = name.clone();
            p.bump()?;
            Ok(TypeRef::Primitive(CoreType::from_str(&name).unwrap()))
        }
        TokenKind::LParen => parse_tuple_or_unit(p),
        TokenKind::And => {
            p.bump()?;
            if let TokenKind::Lifetime(_) = p.peek_kind()? {
                p.bump()?;
            }
            let mutable = p.eat(&TokenKind::KwMut)?;
            let inner = Box::new(parse_type(p)?);
            Ok(TypeRef::Borrow { mutable, inner })
        }
        TokenKind::Star => {
            p.bump()?;
            let mutable = if p.eat(&TokenKind::KwMut)? {
                true
            } else {
                p.expect(&TokenKind::KwConst, "`const` or `mut`")?;
                false
            };
            let inner = Box::new(parse_type(p)?);
            Ok(TypeRef::Pointer { mutable, inner })
        }
        TokenKind::LBracket => parse_array(p),
        TokenKind::KwDyn => {
            p.bump()?;
            parse_trait_object(p)
        }
        TokenKind::KwFor | TokenKind::KwUnsafe | TokenKind::KwExtern => parse_fn_type(p),
        TokenKind::KwSelfType | TokenKind::ColonColon | TokenKind::KwSelfValue | TokenKind::KwSuper | TokenKind::Lt | TokenKind::Ident(_) => {
            let path = paths::parse_path(p)?;
            Ok(TypeRef::Path(path))
        }
        TokenKind::KwFn => parse_fn_type(p),
        other => Err(ParseError::UnexpectedToken { found: other, expected: vec!["a type"], span: p.peek_span()? }),
    }
}

fn parse_tuple_or_unit(p: &mut Parser) -> PResult<TypeRef> {
    p.expect(&TokenKind::LParen, "`(`")?;
    if p.eat(&TokenKind::RParen)? {
        return Ok(TypeRef::Unit);
    }
    let mut elems = vec![parse_type(p)?];
    while p.eat(&TokenKind::Comma)? {
        if matches!(p.peek_kind()?, TokenKind::RParen) {
            break;
        }
        elems.push(parse_type(p)?);
    }
    p.expect(&TokenKind::RParen, "`)`")?;
    Ok(TypeRef::Tuple(elems))
}

fn parse_array(p: &mut Parser) -> PResult<TypeRef> {
    p.expect(&TokenKind::LBracket, "`[`")?;
    let inner = Box::new(parse_type(p)?);
    let size = if p.eat(&TokenKind::Semi)? { Some(Box::new(exprs::parse_expr(p)?)) } else { None };
    p.expect(&TokenKind::RBracket, "`]`")?;
    Ok(TypeRef::Array { inner, size })
}

fn parse_hrls(p: &mut Parser) -> PResult<Vec<String>> {
    if !p.eat(&TokenKind::KwFor)? {
        return Ok(Vec::new());
    }
    p.expect(&TokenKind::Lt, "`<`")?;
    let mut lifetimes = Vec::new();
    loop {
        if p.eat(&TokenKind::Gt)? {
            break;
        }
        let TokenKind::Lifetime(name) = p.bump()?.kind else {
            return Err(ParseError::UnexpectedToken { found: TokenKind::Error, expected: vec!["a lifetime"], span: p.peek_span()? });
        };
        lifetimes.push(name);
        if !p.eat(&TokenKind::Comma)? {
            p.expect(&TokenKind::Gt, "`>`")?;
            break;
        }
    }
    Ok(lifetimes)
}

fn parse_trait_object(p: &mut Parser) -> PResult<TypeRef> {
    let hrls = parse_hrls(p)?;
    let mut traits = vec![paths::parse_path(p)?];
    while p.eat(&TokenKind::Plus)? {
        if let TokenKind::Lifetime(_) = p.peek_kind()? {
            p.bump()?;
            continue;
        }
        traits.push(paths::parse_path(p)?);
    }
    Ok(TypeRef::TraitObject { hrls, traits })
}

fn parse_fn_type(p: &mut Parser) -> PResult<TypeRef> {
    let _hrls = parse_hrls(p)?;
    let is_unsafe = p.eat(&TokenKind::KwUnsafe)?;
    let abi = if p.eat(&TokenKind::KwExtern)? {
        match p.peek_kind()? {
            TokenKind::Str(_) => {
                let TokenKind::Str(s) = p.bump()?.kind else { unreachable!() };
                s
            }
            _ => "C".to_string(),
        }
    } else {
        "Rust".to_string()
    };
    p.expect(&TokenKind::KwFn, "`fn`")?;
    p.expect(&TokenKind::LParen, "`(`")?;
    let mut params = Vec::new();
    let mut variadic = false;
    loop {
        if p.eat(&TokenKind::RParen)? {
            break;
        }
        if p.eat(&TokenKind::DotDotDot)? {
            variadic = true;
            p.expect(&TokenKind::RParen, "`)`")?;
            break;
        }
        params.push(parse_type(p)?);
        if !p.eat(&TokenKind::Comma)? {
            p.expect(&TokenKind::RParen, "`)`")?;
            break;
        }
    }
    let ret = if p.eat(&TokenKind::RArrow)? {
        Box::new(parse_type(p)?)
    } else {
        let unit_span = p.peek_span()?;
        Box::new(Type::new(TypeRef::Unit, unit_span))
    };
    Ok(TypeRef::Function(FunctionTypeInfo { is_unsafe, abi, params, ret, variadic }))
}
