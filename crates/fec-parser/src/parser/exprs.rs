//! Expression and statement parsing (spec.md sec 3 "AST.ExprNode", sec 4.3
//! "Expressions", "Blocks & statements", "Control flow").
//!
//! Grounded on `snow-parser/src/parser/expressions.rs` for the
//! precedence-climbing shape (a ladder of `parse_*_expr` functions, one per
//! binding level, bottoming out at a `parse_primary`/`parse_postfix` pair)
//! and on `original_source/src/parse/expr.cpp` for operator precedence and
//! the struct-literal restriction inside `if`/`while`/`match` scrutinees.

use fec_common::CoreType;
use fec_lexer::token::{FloatTypeTag, TokenKind};

use crate::ast::{
    ArrayLit, BinOp, ClosureParam, CompoundOp, ExprKind, ExprNode, FieldName, Literal, MacroInvocation, MatchArm, Stmt, UniOp,
};
use crate::token_tree::TokenTree;

use super::items;
use super::patterns;
use super::paths;
use super::types;
use super::{PResult, ParseError, Parser};

pub fn parse_expr(p: &mut Parser) -> PResult<ExprNode> {
    parse_assign_expr(p)
}

/// A restricted literal/unary expression, used on the value side of
/// range patterns (spec.md sec 3 "AST.Pattern Value") where a full
/// expression grammar would be ambiguous with the pattern's own syntax.
pub fn parse_literal_expr(p: &mut Parser) -> PResult<ExprNode> {
    let ps = p.start_span()?;
    if p.eat(&TokenKind::Minus)? {
        let inner = parse_literal_expr(p)?;
        let span = p.end_span(ps);
        return Ok(ExprNode::new(ExprKind::UniOp { op: UniOp::Neg, operand: Box::new(inner) }, span));
    }
    let kind = parse_literal_kind(p)?;
    Ok(ExprNode::new(ExprKind::Literal(kind), p.end_span(ps)))
}

fn parse_literal_kind(p: &mut Parser) -> PResult<Literal> {
    let tok = p.bump()?;
    match tok.kind {
        TokenKind::Integer { value, tag } => Ok(Literal::Int { value, tag }),
        TokenKind::Float { value, tag } => Ok(Literal::Float { value, tag: float_tag_to_core(tag) }),
        TokenKind::Char(c) => Ok(Literal::Char(c)),
        TokenKind::Str(s) => Ok(Literal::Str(s)),
        TokenKind::ByteStr(b) => Ok(Literal::ByteStr(b)),
        TokenKind::KwTrue => Ok(Literal::Bool(true)),
        TokenKind::KwFalse => Ok(Literal::Bool(false)),
        other => Err(ParseError::UnexpectedToken { found: other, expected: vec!["a literal"], span: tok.span }),
    }
}

fn float_tag_to_core(tag: FloatTypeTag) -> Option<CoreType> {
    match tag {
        FloatTypeTag::Explicit(c) => Some(c),
        FloatTypeTag::Any => None,
    }
}

// ── Precedence ladder ───────────────────────────────────────────────────

fn compound_op(kind: &TokenKind) -> Option<CompoundOp> {
    Some(match kind {
        TokenKind::PlusEq => CompoundOp::Add,
        TokenKind::MinusEq => CompoundOp::Sub,
        TokenKind::StarEq => CompoundOp::Mul,
        TokenKind::SlashEq => CompoundOp::Div,
        TokenKind::PercentEq => CompoundOp::Rem,
        TokenKind::AndEq => CompoundOp::BitAnd,
        TokenKind::OrEq => CompoundOp::BitOr,
        TokenKind::CaretEq => CompoundOp::BitXor,
        TokenKind::ShlEq => CompoundOp::Shl,
        TokenKind::ShrEq => CompoundOp::Shr,
        _ => return None,
    })
}

fn parse_assign_expr(p: &mut Parser) -> PResult<ExprNode> {
    let ps = p.start_span()?;
    let lhs = parse_range_expr(p)?;
    let kind = p.peek_kind()?;
    if matches!(kind, TokenKind::Eq) {
        p.bump()?;
        let rhs = parse_assign_expr(p)?;
        let span = p.end_span(ps);
        return Ok(ExprNode::new(ExprKind::Assign { op: None, target: Box::new(lhs), value: Box::new(rhs) }, span));
    }
    if let Some(op) = compound_op(&kind) {
        p.bump()?;
        let rhs = parse_assign_expr(p)?;
        let span = p.end_span(ps);
        return Ok(ExprNode::new(ExprKind::Assign { op: Some(op), target: Box::new(lhs), value: Box::new(rhs) }, span));
    }
    Ok(lhs)
}

fn parse_range_expr(p: &mut Parser) -> PResult<ExprNode> {
    let ps = p.start_span()?;
    let lhs = parse_or_expr(p)?;
    let op = if p.eat(&TokenKind::DotDotEq)? {
        Some(BinOp::RangeInc)
    } else if p.eat(&TokenKind::DotDot)? {
        Some(BinOp::Range)
    } else {
        None
    };
    let Some(op) = op else { return Ok(lhs) };
    let rhs = parse_or_expr(p)?;
    let span = p.end_span(ps);
    Ok(ExprNode::new(ExprKind::BinOp { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }, span))
}

macro_rules! left_assoc_level {
    ($name:ident, $next:ident, [$($tok:pat => $op:expr),+ $(,)?]) => {
        fn $name(p: &mut Parser) -> PResult<ExprNode> {
            let ps = p.start_span()?;
            let mut lhs = $next(p)?;
            loop {
                let op = match p.peek_kind()? {
                    $($tok => $op,)+
                    _ => break,
                };
                p.bump()?;
                let rhs = $next(p)?;
                let span = p.end_span(ps);
                lhs = ExprNode::new(ExprKind::BinOp { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }, span);
            }
            Ok(lhs)
        }
    };
}

left_assoc_level!(parse_or_expr, parse_and_expr, [TokenKind::OrOr => BinOp::Or]);
left_assoc_level!(parse_and_expr, parse_cmp_expr, [TokenKind::AndAnd => BinOp::And]);

fn parse_cmp_expr(p: &mut Parser) -> PResult<ExprNode> {
    let ps = p.start_span()?;
    let lhs = parse_bitor_expr(p)?;
    let op = match p.peek_kind()? {
        TokenKind::EqEq => BinOp::Eq,
        TokenKind::Ne => BinOp::Ne,
        TokenKind::Lt => BinOp::Lt,
        TokenKind::Le => BinOp::Le,
        TokenKind::Gt => BinOp::Gt,
        TokenKind::Ge => BinOp::Ge,
        _ => return Ok(lhs),
    };
    p.bump()?;
    let rhs = parse_bitor_expr(p)?;
    let span = p.end_span(ps);
    Ok(ExprNode::new(ExprKind::BinOp { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }, span))
}

left_assoc_level!(parse_bitor_expr, parse_bitxor_expr, [TokenKind::Or => BinOp::BitOr]);
left_assoc_level!(parse_bitxor_expr, parse_bitand_expr, [TokenKind::Caret => BinOp::BitXor]);
left_assoc_level!(parse_bitand_expr, parse_shift_expr, [TokenKind::And => BinOp::BitAnd]);
left_assoc_level!(parse_shift_expr, parse_add_expr, [TokenKind::Shl => BinOp::Shl, TokenKind::Shr => BinOp::Shr]);
left_assoc_level!(parse_add_expr, parse_mul_expr, [TokenKind::Plus => BinOp::Add, TokenKind::Minus => BinOp::Sub]);
left_assoc_level!(parse_mul_expr, parse_cast_expr, [TokenKind::Star => BinOp::Mul, TokenKind::Slash => BinOp::Div, TokenKind::Percent => BinOp::Rem]);

fn parse_cast_expr(p: &mut Parser) -> PResult<ExprNode> {
    let ps = p.start_span()?;
    let mut lhs = parse_unary_expr(p)?;
    while p.eat(&TokenKind::KwAs)? {
        let ty = types::parse_type(p)?;
        let span = p.end_span(ps);
        lhs = ExprNode::new(ExprKind::Cast { value: Box::new(lhs), ty }, span);
    }
    Ok(lhs)
}

fn parse_unary_expr(p: &mut Parser) -> PResult<ExprNode> {
    let ps = p.start_span()?;
    match p.peek_kind()? {
        TokenKind::Minus => {
            p.bump()?;
            let operand = Box::new(parse_unary_expr(p)?);
            Ok(ExprNode::new(ExprKind::UniOp { op: UniOp::Neg, operand }, p.end_span(ps)))
        }
        TokenKind::Not => {
            p.bump()?;
            let operand = Box::new(parse_unary_expr(p)?);
            Ok(ExprNode::new(ExprKind::UniOp { op: UniOp::Not, operand }, p.end_span(ps)))
        }
        TokenKind::Star => {
            p.bump()?;
            let operand = Box::new(parse_unary_expr(p)?);
            Ok(ExprNode::new(ExprKind::Deref(operand), p.end_span(ps)))
        }
        TokenKind::And => {
            p.bump()?;
            let mutable = p.eat(&TokenKind::KwMut)?;
            let operand = Box::new(parse_unary_expr(p)?);
            Ok(ExprNode::new(ExprKind::Borrow { mutable, operand }, p.end_span(ps)))
        }
        TokenKind::AndAnd => {
            // `&&expr`: a single token for two reference levels.
            p.bump()?;
            let mutable = p.eat(&TokenKind::KwMut)?;
            let innermost = Box::new(parse_unary_expr(p)?);
            let inner_span = innermost.span;
            let inner = ExprNode::new(ExprKind::Borrow { mutable, operand: innermost }, inner_span);
            Ok(ExprNode::new(ExprKind::Borrow { mutable: false, operand: Box::new(inner) }, p.end_span(ps)))
        }
        _ => parse_postfix_expr(p),
    }
}

fn parse_postfix_expr(p: &mut Parser) -> PResult<ExprNode> {
    let ps = p.start_span()?;
    let mut expr = parse_primary_expr(p)?;
    loop {
        match p.peek_kind()? {
            TokenKind::Question => {
                p.bump()?;
                expr = ExprNode::new(ExprKind::Try(Box::new(expr)), p.end_span(ps));
            }
            TokenKind::Dot => {
                p.bump()?;
                expr = parse_field_or_method(p, expr, ps)?;
            }
            TokenKind::LParen => {
                let args = parse_call_args(p)?;
                let span = p.end_span(ps);
                expr = match expr.kind {
                    ExprKind::NamedValue(path) => ExprNode::new(ExprKind::CallPath { path, args }, span),
                    _ => ExprNode::new(ExprKind::CallObject { callee: Box::new(expr), args }, span),
                };
            }
            TokenKind::LBracket => {
                p.bump()?;
                let index = Box::new(p.with_struct_literal(|p| parse_expr(p))?);
                p.expect(&TokenKind::RBracket, "`]`")?;
                expr = ExprNode::new(ExprKind::Index { value: Box::new(expr), index }, p.end_span(ps));
            }
            _ => break,
        }
    }
    Ok(expr)
}

fn parse_field_or_method(p: &mut Parser, value: ExprNode, ps: crate::token_tree::ProtoSpan) -> PResult<ExprNode> {
    if let TokenKind::Integer { value: n, .. } = p.peek_kind()? {
        p.bump()?;
        return Ok(ExprNode::new(ExprKind::Field { value: Box::new(value), name: FieldName::Tuple(n as u32) }, p.end_span(ps)));
    }
    let name = p.expect_ident()?;
    let type_args = if p.eat(&TokenKind::ColonColon)? {
        p.expect(&TokenKind::Lt, "`<`")?;
        parse_turbofish_types(p)?
    } else {
        Vec::new()
    };
    if matches!(p.peek_kind()?, TokenKind::LParen) {
        let args = parse_call_args(p)?;
        return Ok(ExprNode::new(ExprKind::CallMethod { receiver: Box::new(value), method: name, type_args, args }, p.end_span(ps)));
    }
    Ok(ExprNode::new(ExprKind::Field { value: Box::new(value), name: FieldName::Named(name) }, p.end_span(ps)))
}

fn parse_turbofish_types(p: &mut Parser) -> PResult<Vec<crate::ast::Type>> {
    let mut types_out = Vec::new();
    loop {
        if p.eat(&TokenKind::Gt)? {
            break;
        }
        types_out.push(types::parse_type(p)?);
        if !p.eat(&TokenKind::Comma)? {
            p.expect(&TokenKind::Gt, "`>`")?;
            break;
        }
    }
    Ok(types_out)
}

fn parse_call_args(p: &mut Parser) -> PResult<Vec<ExprNode>> {
    p.expect(&TokenKind::LParen, "`(`")?;
    let mut args = Vec::new();
    loop {
        if p.eat(&TokenKind::RParen)? {
            break;
        }
        args.push(p.with_struct_literal(|p| parse_expr(p))?);
        if !p.eat(&TokenKind::Comma)? {
            p.expect(&TokenKind::RParen, "`)`")?;
            break;
        }
    }
    Ok(args)
}

// ── Primary expressions ──────────────────────────────────────────────────

fn parse_primary_expr(p: &mut Parser) -> PResult<ExprNode> {
    let ps = p.start_span()?;
    if let TokenKind::Lifetime(_) = p.peek_kind()? {
        return parse_labelled(p, ps);
    }
    match p.peek_kind()? {
        TokenKind::Integer { .. }
        | TokenKind::Float { .. }
        | TokenKind::Char(_)
        | TokenKind::Str(_)
        | TokenKind::ByteStr(_)
        | TokenKind::KwTrue
        | TokenKind::KwFalse => {
            let kind = parse_literal_kind(p)?;
            Ok(ExprNode::new(ExprKind::Literal(kind), p.end_span(ps)))
        }
        TokenKind::LParen => parse_tuple_or_paren(p, ps),
        TokenKind::LBracket => parse_array_expr(p, ps),
        TokenKind::LBrace => {
            let (stmts, tail) = parse_block_contents(p)?;
            Ok(ExprNode::new(ExprKind::Block(stmts, tail), p.end_span(ps)))
        }
        TokenKind::KwIf => parse_if(p, ps),
        TokenKind::KwMatch => parse_match(p, ps),
        TokenKind::KwLoop => parse_loop(p, ps, None),
        TokenKind::KwWhile => parse_while(p, ps, None),
        TokenKind::KwFor => parse_for(p, ps, None),
        TokenKind::KwReturn => {
            p.bump()?;
            let value = if can_start_expr(&p.peek_kind()?) { Some(Box::new(parse_expr(p)?)) } else { None };
            Ok(ExprNode::new(ExprKind::Return(value), p.end_span(ps)))
        }
        TokenKind::KwBreak => {
            p.bump()?;
            let label = if let TokenKind::Lifetime(_) = p.peek_kind()? {
                let TokenKind::Lifetime(l) = p.bump()?.kind else { unreachable!() };
                Some(l)
            } else {
                None
            };
            let value = if can_start_expr(&p.peek_kind()?) { Some(Box::new(parse_expr(p)?)) } else { None };
            Ok(ExprNode::new(ExprKind::Break { label, value }, p.end_span(ps)))
        }
        TokenKind::KwContinue => {
            p.bump()?;
            let label = if let TokenKind::Lifetime(_) = p.peek_kind()? {
                let TokenKind::Lifetime(l) = p.bump()?.kind else { unreachable!() };
                Some(l)
            } else {
                None
            };
            Ok(ExprNode::new(ExprKind::Continue { label }, p.end_span(ps)))
        }
        TokenKind::KwMove | TokenKind::Or | TokenKind::OrOr => parse_closure(p, ps),
        TokenKind::MacroName(_) => {
            let inv = parse_macro_invocation(p)?;
            Ok(ExprNode::new(ExprKind::Macro(inv), p.end_span(ps)))
        }
        TokenKind::Ident(_) | TokenKind::ColonColon | TokenKind::KwSelfValue | TokenKind::KwSuper | TokenKind::KwSelfType | TokenKind::Lt => {
            let path = paths::parse_path(p)?;
            if !p.no_struct_literal && matches!(p.peek_kind()?, TokenKind::LBrace) {
                return parse_struct_literal(p, ps, path);
            }
            Ok(ExprNode::new(ExprKind::NamedValue(path), p.end_span(ps)))
        }
        other => Err(ParseError::UnexpectedToken { found: other, expected: vec!["an expression"], span: p.peek_span()? }),
    }
}

fn can_start_expr(kind: &TokenKind) -> bool {
    !matches!(
        kind,
        TokenKind::Semi | TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket | TokenKind::Comma | TokenKind::Eof
    )
}

fn parse_labelled(p: &mut Parser, ps: crate::token_tree::ProtoSpan) -> PResult<ExprNode> {
    let TokenKind::Lifetime(label) = p.bump()?.kind else { unreachable!() };
    p.expect(&TokenKind::Colon, "`:`")?;
    match p.peek_kind()? {
        TokenKind::KwLoop => parse_loop(p, ps, Some(label)),
        TokenKind::KwWhile => parse_while(p, ps, Some(label)),
        TokenKind::KwFor => parse_for(p, ps, Some(label)),
        other => Err(ParseError::UnexpectedToken { found: other, expected: vec!["`loop`, `while` or `for`"], span: p.peek_span()? }),
    }
}

fn parse_loop(p: &mut Parser, ps: crate::token_tree::ProtoSpan, label: Option<String>) -> PResult<ExprNode> {
    p.expect(&TokenKind::KwLoop, "`loop`")?;
    let (stmts, tail) = parse_block_contents(p)?;
    let body = tail_to_stmts(stmts, tail);
    Ok(ExprNode::new(ExprKind::Loop { label, body }, p.end_span(ps)))
}

fn parse_while(p: &mut Parser, ps: crate::token_tree::ProtoSpan, label: Option<String>) -> PResult<ExprNode> {
    p.expect(&TokenKind::KwWhile, "`while`")?;
    if p.eat(&TokenKind::KwLet)? {
        let pattern = patterns::parse_pattern(p)?;
        p.expect(&TokenKind::Eq, "`=`")?;
        let value = Box::new(p.with_no_struct_literal(|p| parse_expr(p))?);
        let (stmts, tail) = parse_block_contents(p)?;
        let body = tail_to_stmts(stmts, tail);
        return Ok(ExprNode::new(ExprKind::WhileLet { label, pattern, value, body }, p.end_span(ps)));
    }
    let cond = Box::new(p.with_no_struct_literal(|p| parse_expr(p))?);
    let (stmts, tail) = parse_block_contents(p)?;
    let body = tail_to_stmts(stmts, tail);
    Ok(ExprNode::new(ExprKind::While { label, cond, body }, p.end_span(ps)))
}

fn parse_for(p: &mut Parser, ps: crate::token_tree::ProtoSpan, label: Option<String>) -> PResult<ExprNode> {
    p.expect(&TokenKind::KwFor, "`for`")?;
    let pattern = patterns::parse_pattern(p)?;
    p.expect(&TokenKind::KwIn, "`in`")?;
    let iter = Box::new(p.with_no_struct_literal(|p| parse_expr(p))?);
    let (stmts, tail) = parse_block_contents(p)?;
    let body = tail_to_stmts(stmts, tail);
    Ok(ExprNode::new(ExprKind::For { label, pattern, iter, body }, p.end_span(ps)))
}

/// A block's trailing tail expression (if any) is itself just another
/// statement once a loop body discards its value (spec.md sec 3 "Block"
/// distinguishes `Stmt` from a final tail only for value-producing blocks).
fn tail_to_stmts(mut stmts: Vec<Stmt>, tail: Option<Box<ExprNode>>) -> Vec<Stmt> {
    if let Some(tail) = tail {
        stmts.push(Stmt::Expr(*tail));
    }
    stmts
}

fn parse_if(p: &mut Parser, ps: crate::token_tree::ProtoSpan) -> PResult<ExprNode> {
    p.expect(&TokenKind::KwIf, "`if`")?;
    if p.eat(&TokenKind::KwLet)? {
        let pattern = patterns::parse_pattern(p)?;
        p.expect(&TokenKind::Eq, "`=`")?;
        let value = Box::new(p.with_no_struct_literal(|p| parse_expr(p))?);
        let (stmts, tail) = parse_block_contents(p)?;
        let then_branch = tail_to_stmts(stmts, tail);
        let else_branch = parse_else(p)?;
        return Ok(ExprNode::new(ExprKind::IfLet { pattern, value, then_branch, else_branch }, p.end_span(ps)));
    }
    let cond = Box::new(p.with_no_struct_literal(|p| parse_expr(p))?);
    let (stmts, tail) = parse_block_contents(p)?;
    let then_branch = tail_to_stmts(stmts, tail);
    let else_branch = parse_else(p)?;
    Ok(ExprNode::new(ExprKind::If { cond, then_branch, else_branch }, p.end_span(ps)))
}

fn parse_else(p: &mut Parser) -> PResult<Option<Box<ExprNode>>> {
    if !p.eat(&TokenKind::KwElse)? {
        return Ok(None);
    }
    let ps = p.start_span()?;
    if matches!(p.peek_kind()?, TokenKind::KwIf) {
        return Ok(Some(Box::new(parse_if(p, ps)?)));
    }
    let (stmts, tail) = parse_block_contents(p)?;
    Ok(Some(ExprNode::boxed(ExprKind::Block(stmts, tail), p.end_span(ps))))
}

fn parse_match(p: &mut Parser, ps: crate::token_tree::ProtoSpan) -> PResult<ExprNode> {
    p.expect(&TokenKind::KwMatch, "`match`")?;
    let value = Box::new(p.with_no_struct_literal(|p| parse_expr(p))?);
    p.expect(&TokenKind::LBrace, "`{`")?;
    let mut arms = Vec::new();
    loop {
        if p.eat(&TokenKind::RBrace)? {
            break;
        }
        let pattern = patterns::parse_pattern(p)?;
        let guard = if p.eat(&TokenKind::KwIf)? { Some(Box::new(p.with_no_struct_literal(|p| parse_expr(p))?)) } else { None };
        p.expect(&TokenKind::FatArrow, "`=>`")?;
        let body = Box::new(parse_expr(p)?);
        arms.push(MatchArm { pattern, guard, body });
        // A trailing comma is optional after a block-shaped arm body; this
        // grammar simply makes it optional everywhere.
        let _ = p.eat(&TokenKind::Comma)?;
    }
    Ok(ExprNode::new(ExprKind::Match { value, arms }, p.end_span(ps)))
}

fn parse_closure(p: &mut Parser, ps: crate::token_tree::ProtoSpan) -> PResult<ExprNode> {
    let _is_move = p.eat(&TokenKind::KwMove)?;
    let mut params = Vec::new();
    if p.eat(&TokenKind::OrOr)? {
        // `|| body`, no parameters at all.
    } else {
        p.expect(&TokenKind::Or, "`|`")?;
        loop {
            if p.eat(&TokenKind::Or)? {
                break;
            }
            let pattern = patterns::parse_pattern(p)?;
            let ty = if p.eat(&TokenKind::Colon)? { Some(types::parse_type(p)?) } else { None };
            params.push(ClosureParam { pattern, ty });
            if !p.eat(&TokenKind::Comma)? {
                p.expect(&TokenKind::Or, "`|`")?;
                break;
            }
        }
    }
    let ret = if p.eat(&TokenKind::RArrow)? { Some(types::parse_type(p)?) } else { None };
    let body = Box::new(parse_expr(p)?);
    Ok(ExprNode::new(ExprKind::Closure { params, ret, body }, p.end_span(ps)))
}

fn parse_tuple_or_paren(p: &mut Parser, ps: crate::token_tree::ProtoSpan) -> PResult<ExprNode> {
    p.expect(&TokenKind::LParen, "`(`")?;
    if p.eat(&TokenKind::RParen)? {
        return Ok(ExprNode::new(ExprKind::Tuple(Vec::new()), p.end_span(ps)));
    }
    let first = p.with_struct_literal(|p| parse_expr(p))?;
    if p.eat(&TokenKind::RParen)? {
        return Ok(first);
    }
    let mut elems = vec![first];
    while p.eat(&TokenKind::Comma)? {
        if matches!(p.peek_kind()?, TokenKind::RParen) {
            break;
        }
        elems.push(p.with_struct_literal(|p| parse_expr(p))?);
    }
    p.expect(&TokenKind::RParen, "`)`")?;
    Ok(ExprNode::new(ExprKind::Tuple(elems), p.end_span(ps)))
}

fn parse_array_expr(p: &mut Parser, ps: crate::token_tree::ProtoSpan) -> PResult<ExprNode> {
    p.expect(&TokenKind::LBracket, "`[`")?;
    if p.eat(&TokenKind::RBracket)? {
        return Ok(ExprNode::new(ExprKind::Array(ArrayLit::List(Vec::new())), p.end_span(ps)));
    }
    let first = p.with_struct_literal(|p| parse_expr(p))?;
    if p.eat(&TokenKind::Semi)? {
        let count = Box::new(p.with_struct_literal(|p| parse_expr(p))?);
        p.expect(&TokenKind::RBracket, "`]`")?;
        return Ok(ExprNode::new(ExprKind::Array(ArrayLit::Sized { value: Box::new(first), count }), p.end_span(ps)));
    }
    let mut elems = vec![first];
    while p.eat(&TokenKind::Comma)? {
        if matches!(p.peek_kind()?, TokenKind::RBracket) {
            break;
        }
        elems.push(p.with_struct_literal(|p| parse_expr(p))?);
    }
    p.expect(&TokenKind::RBracket, "`]`")?;
    Ok(ExprNode::new(ExprKind::Array(ArrayLit::List(elems)), p.end_span(ps)))
}

fn parse_struct_literal(p: &mut Parser, ps: crate::token_tree::ProtoSpan, path: crate::ast::AstPath) -> PResult<ExprNode> {
    p.expect(&TokenKind::LBrace, "`{`")?;
    let mut fields = Vec::new();
    let mut base = None;
    loop {
        if p.eat(&TokenKind::RBrace)? {
            break;
        }
        if p.eat(&TokenKind::DotDot)? {
            base = Some(Box::new(p.with_struct_literal(|p| parse_expr(p))?));
            p.expect(&TokenKind::RBrace, "`}`")?;
            break;
        }
        let name = p.expect_ident()?;
        let value = if p.eat(&TokenKind::Colon)? {
            Box::new(p.with_struct_literal(|p| parse_expr(p))?)
        } else {
            let span = p.peek_span()?;
            Box::new(ExprNode::new(ExprKind::NamedValue(crate::ast::AstPath::new(crate::ast::Path::Relative(vec![crate::ast::PathNode::plain(name.clone())]), span)), span))
        };
        fields.push(crate::ast::StructLiteralField { name, value });
        if !p.eat(&TokenKind::Comma)? {
            p.expect(&TokenKind::RBrace, "`}`")?;
            break;
        }
    }
    Ok(ExprNode::new(ExprKind::StructLiteral { path, fields, base }, p.end_span(ps)))
}

pub fn parse_macro_invocation(p: &mut Parser) -> PResult<MacroInvocation> {
    let ps = p.start_span()?;
    let TokenKind::MacroName(name) = p.bump()?.kind else {
        return Err(ParseError::UnexpectedToken { found: TokenKind::Error, expected: vec!["a macro name"], span: p.peek_span()? });
    };
    let close = match p.peek_kind()? {
        TokenKind::LParen => TokenKind::RParen,
        TokenKind::LBracket => TokenKind::RBracket,
        TokenKind::LBrace => TokenKind::RBrace,
        other => return Err(ParseError::UnexpectedToken { found: other, expected: vec!["`(`, `[` or `{`"], span: p.peek_span()? }),
    };
    p.bump()?;
    let mut depth = 1u32;
    let mut trees = Vec::new();
    loop {
        let tok = p.bump()?;
        if matches!(tok.kind, TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace) {
            depth += 1;
        }
        if tok.kind == close {
            depth -= 1;
            if depth == 0 {
                break;
            }
        }
        trees.push(TokenTree::Leaf(tok));
    }
    Ok(MacroInvocation { name, args: trees, span: p.end_span(ps) })
}

// ── Blocks & statements ──────────────────────────────────────────────────

/// A block's body: its statements plus an optional tail expression
/// (spec.md sec 4.3 "Blocks & statements": "the final expression, if it
/// has no trailing `;`, is the block's value").
pub fn parse_block_contents(p: &mut Parser) -> PResult<(Vec<Stmt>, Option<Box<ExprNode>>)> {
    p.expect(&TokenKind::LBrace, "`{`")?;
    let mut stmts = Vec::new();
    loop {
        if p.eat(&TokenKind::RBrace)? {
            return Ok((stmts, None));
        }
        if p.eat(&TokenKind::Semi)? {
            // A bare `;` is an empty statement.
            continue;
        }
        let kind = p.peek_kind()?;
        if kind == TokenKind::KwLet {
            stmts.push(parse_let_stmt(p)?);
            continue;
        }
        if items::looks_like_item_start(&kind) {
            let item = items::parse_item(p)?;
            stmts.push(Stmt::Item(Box::new(item)));
            continue;
        }
        let expr = p.with_struct_literal(|p| parse_expr(p))?;
        if p.eat(&TokenKind::Semi)? {
            stmts.push(Stmt::Semi(expr));
            continue;
        }
        if matches!(p.peek_kind()?, TokenKind::RBrace) {
            p.bump()?;
            return Ok((stmts, Some(Box::new(expr))));
        }
        stmts.push(Stmt::Expr(expr));
    }
}

fn parse_let_stmt(p: &mut Parser) -> PResult<Stmt> {
    let ps = p.start_span()?;
    p.expect(&TokenKind::KwLet, "`let`")?;
    let pattern = patterns::parse_pattern(p)?;
    let ty = if p.eat(&TokenKind::Colon)? { Some(types::parse_type(p)?) } else { None };
    p.expect(&TokenKind::Eq, "`=`")?;
    let value = Box::new(p.with_struct_literal(|p| parse_expr(p))?);
    p.expect(&TokenKind::Semi, "`;`")?;
    let span = p.end_span(ps);
    Ok(Stmt::Semi(ExprNode::new(ExprKind::Let { pattern, ty, value }, span)))
}
