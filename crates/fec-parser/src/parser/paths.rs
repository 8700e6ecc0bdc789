//! Path parsing (spec.md sec 4.3 "Use paths", sec 8 path-form tests).
//!
//! Grounded on `original_source/src/ast/path.hpp` for the five path forms
//! (`Relative`, `SelfPath`, `Super`, `Absolute`, `Ufcs`) and on
//! `original_source/src/parse/root.cpp` for how the leading token
//! (`::`, `self`, `super`, `<`, or a bare identifier) selects between them.

use fec_lexer::token::TokenKind;

use crate::ast::{AstPath, Path, PathNode, PathParams};

use super::types;
use super::{PResult, ParseError, Parser};

/// Parses one `name<generics>` segment. `Self` (the type, not `self`) is a
/// legal segment name wherever an identifier is, e.g. `Self::new`.
fn parse_node(p: &mut Parser) -> PResult<PathNode> {
    let name = match p.peek_kind()? {
        TokenKind::KwSelfType => {
            p.bump()?;
            "Self".to_string()
        }
        _ => p.expect_ident()?,
    };
    let params = parse_generic_args(p)?;
    Ok(PathNode { name, params })
}

/// `::`-separated segments, at least one.
fn parse_nodes(p: &mut Parser) -> PResult<Vec<PathNode>> {
    let mut nodes = vec![parse_node(p)?];
    while p.eat(&TokenKind::ColonColon)? {
        nodes.push(parse_node(p)?);
    }
    Ok(nodes)
}

/// `<'a, T, Item = U>` following a path segment's name. Absent entirely
/// when the next token isn't `<`.
fn parse_generic_args(p: &mut Parser) -> PResult<PathParams> {
    if !p.eat(&TokenKind::Lt)? {
        return Ok(PathParams::default());
    }
    let mut params = PathParams::default();
    loop {
        if p.eat(&TokenKind::Gt)? {
            break;
        }
        match p.peek_kind()? {
            TokenKind::Lifetime(_) => {
                let TokenKind::Lifetime(name) = p.bump()?.kind else { unreachable!() };
                params.lifetimes.push(name);
            }
            TokenKind::Ident(name) if p.peek2_kind()? == TokenKind::Eq => {
                p.bump()?;
                p.bump()?;
                let ty = types::parse_type(p)?;
                params.assoc_bindings.push((name, ty));
            }
            _ => {
                let ty = types::parse_type(p)?;
                params.types.push(ty);
            }
        }
        if !p.eat(&TokenKind::Comma)? {
            p.expect(&TokenKind::Gt, "`>`")?;
            break;
        }
    }
    Ok(params)
}

/// The `<T as Trait>::item` / `<T>::item` UFCS form. Called once the
/// leading `<` has been identified by the caller as starting a path rather
/// than a generic-less comparison (paths never appear where a binary `<`
/// could, so this is unambiguous at every call site in this crate).
fn parse_ufcs(p: &mut Parser) -> PResult<Path> {
    p.expect(&TokenKind::Lt, "`<`")?;
    let ty = Box::new(types::parse_type(p)?);
    let trait_ = if p.eat(&TokenKind::KwAs)? {
        Some(Box::new(parse_path(p)?))
    } else {
        None
    };
    p.expect(&TokenKind::Gt, "`>`")?;
    p.expect(&TokenKind::ColonColon, "`::`")?;
    let nodes = parse_nodes(p)?;
    Ok(Path::Ufcs { ty, trait_, nodes })
}

/// Entry point: parse one full `AST.Path` (spec.md sec 3), dispatching on
/// the leading token to pick among the five forms.
pub fn parse_path(p: &mut Parser) -> PResult<AstPath> {
    let ps = p.start_span()?;
    let path = match p.peek_kind()? {
        TokenKind::ColonColon => {
            p.bump()?;
            let crate_name = p.expect_ident()?;
            p.expect(&TokenKind::ColonColon, "`::`")?;
            let nodes = parse_nodes(p)?;
            Path::Absolute { crate_name, nodes }
        }
        TokenKind::KwSelfValue => {
            p.bump()?;
            p.expect(&TokenKind::ColonColon, "`::`")?;
            Path::SelfPath(parse_nodes(p)?)
        }
        TokenKind::KwSuper => {
            let mut count = 0u32;
            while p.eat(&TokenKind::KwSuper)? {
                count += 1;
                p.expect(&TokenKind::ColonColon, "`::`")?;
            }
            Path::Super { count, nodes: parse_nodes(p)? }
        }
        TokenKind::Lt => parse_ufcs(p)?,
        TokenKind::Ident(_) | TokenKind::KwSelfType => Path::Relative(parse_nodes(p)?),
        other => {
            return Err(ParseError::UnexpectedToken { found: other, expected: vec!["a path"], span: p.end_span(ps) })
        }
    };
    let span = p.end_span(ps);
    Ok(AstPath::new(path, span))
}
