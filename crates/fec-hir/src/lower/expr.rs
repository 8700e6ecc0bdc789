//! Expression lowering (spec.md sec 4.4 item 4): `while`/`while let` become
//! `Loop`, `if let` becomes `Match`, ranges become `ops::Range*` struct
//! literals, calls are reclassified into `CallValue`/`TupleVariant`/
//! `CallPath`, and `for`/postfix-`?`/unexpanded macros are a bug if they
//! ever reach here (spec.md sec 7: expansion must have removed them first).

use fec_parser::ast;

use crate::hir;
use crate::lower::namespace::{TypeBinding, ValueBinding};
use crate::lower::pattern::lower_pattern;
use crate::lower::types::{lower_path, lower_type};
use crate::lower::Lowerer;

pub fn lower_block(l: &mut Lowerer, stmts: &[ast::Stmt], tail: Option<&ast::ExprNode>) -> (Vec<hir::Stmt>, Option<Box<hir::ExprNode>>) {
    l.push_scope();
    let stmts = stmts.iter().map(|s| lower_stmt(l, s)).collect();
    let tail = tail.map(|e| Box::new(lower_expr(l, e)));
    l.pop_scope();
    (stmts, tail)
}

fn lower_stmt(l: &mut Lowerer, stmt: &ast::Stmt) -> hir::Stmt {
    match stmt {
        ast::Stmt::Expr(e) => hir::Stmt::Expr(lower_expr(l, e)),
        ast::Stmt::Semi(e) => hir::Stmt::Semi(lower_expr(l, e)),
        ast::Stmt::Item(i) => l.bug(i.span, "local item declarations are not supported"),
    }
}

pub fn lower_expr(l: &mut Lowerer, expr: &ast::ExprNode) -> hir::ExprNode {
    let span = expr.span;
    let kind = lower_expr_kind(l, expr);
    hir::ExprNode::new(kind, span)
}

fn boxed(l: &mut Lowerer, expr: &ast::ExprNode) -> Box<hir::ExprNode> {
    Box::new(lower_expr(l, expr))
}

fn lower_literal(lit: &ast::Literal) -> hir::Literal {
    match lit {
        ast::Literal::Int { value, tag } => hir::Literal::Int { value: *value, tag: *tag },
        ast::Literal::Float { value, tag } => hir::Literal::Float { value: *value, tag: *tag },
        ast::Literal::Bool(b) => hir::Literal::Bool(*b),
        ast::Literal::Str(s) => hir::Literal::Str(s.clone()),
        ast::Literal::ByteStr(b) => hir::Literal::ByteStr(b.clone()),
        ast::Literal::Char(c) => hir::Literal::Char(*c),
    }
}

fn lower_field_name(f: &ast::FieldName) -> hir::FieldName {
    match f {
        ast::FieldName::Named(n) => hir::FieldName::Named(n.clone()),
        ast::FieldName::Tuple(i) => hir::FieldName::Tuple(*i),
    }
}

fn lower_compound_op(op: ast::CompoundOp) -> hir::CompoundOp {
    match op {
        ast::CompoundOp::Add => hir::CompoundOp::Add,
        ast::CompoundOp::Sub => hir::CompoundOp::Sub,
        ast::CompoundOp::Mul => hir::CompoundOp::Mul,
        ast::CompoundOp::Div => hir::CompoundOp::Div,
        ast::CompoundOp::Rem => hir::CompoundOp::Rem,
        ast::CompoundOp::BitAnd => hir::CompoundOp::BitAnd,
        ast::CompoundOp::BitOr => hir::CompoundOp::BitOr,
        ast::CompoundOp::BitXor => hir::CompoundOp::BitXor,
        ast::CompoundOp::Shl => hir::CompoundOp::Shl,
        ast::CompoundOp::Shr => hir::CompoundOp::Shr,
    }
}

fn lower_uni_op(op: ast::UniOp) -> hir::UniOp {
    match op {
        ast::UniOp::Not => hir::UniOp::Not,
        ast::UniOp::Neg => hir::UniOp::Neg,
    }
}

fn plain_bin_op(op: ast::BinOp) -> hir::BinOp {
    match op {
        ast::BinOp::Add => hir::BinOp::Add,
        ast::BinOp::Sub => hir::BinOp::Sub,
        ast::BinOp::Mul => hir::BinOp::Mul,
        ast::BinOp::Div => hir::BinOp::Div,
        ast::BinOp::Rem => hir::BinOp::Rem,
        ast::BinOp::BitAnd => hir::BinOp::BitAnd,
        ast::BinOp::BitOr => hir::BinOp::BitOr,
        ast::BinOp::BitXor => hir::BinOp::BitXor,
        ast::BinOp::Shl => hir::BinOp::Shl,
        ast::BinOp::Shr => hir::BinOp::Shr,
        ast::BinOp::And => hir::BinOp::And,
        ast::BinOp::Or => hir::BinOp::Or,
        ast::BinOp::Eq => hir::BinOp::Eq,
        ast::BinOp::Ne => hir::BinOp::Ne,
        ast::BinOp::Lt => hir::BinOp::Lt,
        ast::BinOp::Le => hir::BinOp::Le,
        ast::BinOp::Gt => hir::BinOp::Gt,
        ast::BinOp::Ge => hir::BinOp::Ge,
        ast::BinOp::Range | ast::BinOp::RangeInc => unreachable!("ranges are desugared before reaching plain_bin_op"),
    }
}

/// `a..b` / `a..=b` lower to `ops::Range{start,end}` / `ops::RangeInclusive`
/// struct literals (spec.md sec 4.4 "ranges -> struct literals against
/// `ops::Range*`").
fn lower_range(l: &mut Lowerer, op: ast::BinOp, lhs: &ast::ExprNode, rhs: &ast::ExprNode, span: fec_common::Span) -> hir::ExprKind {
    let type_name = match op {
        ast::BinOp::Range => "Range",
        ast::BinOp::RangeInc => "RangeInclusive",
        _ => unreachable!(),
    };
    let path = hir::Path::Generic(hir::GenericPath::simple(hir::SimplePath::new("core", vec!["ops".to_string(), type_name.to_string()])));
    let start = hir::StructLiteralField { name: "start".to_string(), value: boxed(l, lhs) };
    let end = hir::StructLiteralField { name: "end".to_string(), value: boxed(l, rhs) };
    let _ = span;
    hir::ExprKind::StructLiteral { path, fields: vec![start, end], base: None }
}

fn lower_expr_kind(l: &mut Lowerer, expr: &ast::ExprNode) -> hir::ExprKind {
    match &expr.kind {
        ast::ExprKind::Block(stmts, tail) => {
            let (stmts, tail) = lower_block(l, stmts, tail.as_deref());
            hir::ExprKind::Block(stmts, tail)
        }
        ast::ExprKind::Return(value) => match value {
            Some(v) => hir::ExprKind::Return(boxed(l, v)),
            // spec.md sec 4.4: "`return;` -> `return ()`".
            None => hir::ExprKind::Return(hir::ExprNode::boxed(hir::ExprKind::Tuple(Vec::new()), expr.span)),
        },
        ast::ExprKind::Break { label, value } => {
            if value.is_some() {
                l.bug(expr.span, "break with a value is not yet supported");
            }
            hir::ExprKind::Break { label: label.clone() }
        }
        ast::ExprKind::Continue { label } => hir::ExprKind::Continue { label: label.clone() },
        ast::ExprKind::Let { pattern, ty, value } => {
            let value = boxed(l, value);
            let ty = ty.as_ref().map(|t| lower_type(l, t));
            let pattern = lower_pattern(l, pattern);
            hir::ExprKind::Let { pattern, ty, value }
        }
        ast::ExprKind::Assign { op, target, value } => hir::ExprKind::Assign {
            op: op.map(lower_compound_op),
            target: boxed(l, target),
            value: boxed(l, value),
        },
        ast::ExprKind::BinOp { op: ast::BinOp::Range, lhs, rhs } => lower_range(l, ast::BinOp::Range, lhs, rhs, expr.span),
        ast::ExprKind::BinOp { op: ast::BinOp::RangeInc, lhs, rhs } => lower_range(l, ast::BinOp::RangeInc, lhs, rhs, expr.span),
        ast::ExprKind::BinOp { op, lhs, rhs } => hir::ExprKind::BinOp { op: plain_bin_op(*op), lhs: boxed(l, lhs), rhs: boxed(l, rhs) },
        ast::ExprKind::UniOp { op, operand } => hir::ExprKind::UniOp { op: lower_uni_op(*op), operand: boxed(l, operand) },
        ast::ExprKind::Borrow { mutable, operand } => hir::ExprKind::Borrow { mutable: *mutable, operand: boxed(l, operand) },
        ast::ExprKind::Cast { value, ty } => hir::ExprKind::Cast { value: boxed(l, value), ty: lower_type(l, ty) },
        ast::ExprKind::Deref(inner) => hir::ExprKind::Deref(boxed(l, inner)),

        ast::ExprKind::CallPath { path, args } => lower_call_path(l, path, args, expr.span),
        ast::ExprKind::CallMethod { receiver, method, type_args, args } => hir::ExprKind::CallMethod {
            receiver: boxed(l, receiver),
            method: method.clone(),
            type_args: type_args.iter().map(|t| lower_type(l, t)).collect(),
            args: args.iter().map(|a| lower_expr(l, a)).collect(),
        },
        ast::ExprKind::CallObject { callee, args } => {
            hir::ExprKind::CallObject { callee: boxed(l, callee), args: args.iter().map(|a| lower_expr(l, a)).collect() }
        }

        ast::ExprKind::Loop { label, body } => {
            let (body, _) = lower_block(l, body, None);
            hir::ExprKind::Loop { label: label.clone(), body, result_ty: hir::TypeRef::unit() }
        }
        ast::ExprKind::While { label, cond, body } => lower_while(l, label.clone(), cond, body),
        ast::ExprKind::WhileLet { label, pattern, value, body } => lower_while_let(l, label.clone(), pattern, value, body),
        ast::ExprKind::For { .. } => l.bug(expr.span, "`for` loops must be desugared before lowering"),

        ast::ExprKind::Match { value, arms } => hir::ExprKind::Match { value: boxed(l, value), arms: arms.iter().map(|a| lower_arm(l, a)).collect() },
        ast::ExprKind::If { cond, then_branch, else_branch } => {
            let cond = boxed(l, cond);
            let (then_branch, _) = lower_block(l, then_branch, None);
            let else_branch = else_branch.as_ref().map(|e| boxed(l, e));
            hir::ExprKind::If { cond, then_branch, else_branch }
        }
        ast::ExprKind::IfLet { pattern, value, then_branch, else_branch } => lower_if_let(l, pattern, value, then_branch, else_branch.as_deref()),

        ast::ExprKind::Literal(lit) => hir::ExprKind::Literal(lower_literal(lit)),
        ast::ExprKind::Closure { params, ret, body } => lower_closure(l, params, ret.as_ref(), body),
        ast::ExprKind::StructLiteral { path, fields, base } => {
            let path = lower_path(l, path);
            let fields = fields.iter().map(|f| hir::StructLiteralField { name: f.name.clone(), value: boxed(l, &f.value) }).collect();
            let base = base.as_ref().map(|b| boxed(l, b));
            hir::ExprKind::StructLiteral { path, fields, base }
        }
        ast::ExprKind::Array(arr) => hir::ExprKind::Array(match arr {
            ast::ArrayLit::List(items) => hir::ArrayLit::List(items.iter().map(|e| lower_expr(l, e)).collect()),
            ast::ArrayLit::Sized { value, count } => hir::ArrayLit::Sized { value: boxed(l, value), count: boxed(l, count) },
        }),
        ast::ExprKind::Tuple(items) => hir::ExprKind::Tuple(items.iter().map(|e| lower_expr(l, e)).collect()),

        ast::ExprKind::NamedValue(path) => lower_named_value(l, path, expr.span),

        ast::ExprKind::Field { value, name } => hir::ExprKind::Field { value: boxed(l, value), name: lower_field_name(name) },
        ast::ExprKind::Index { value, index } => hir::ExprKind::Index { value: boxed(l, value), index: boxed(l, index) },

        ast::ExprKind::Try(_) => l.bug(expr.span, "postfix `?` must be expanded before lowering"),
        ast::ExprKind::Macro(_) => l.bug(expr.span, "unexpanded macro expression reached lowering"),
    }
}

fn lower_while(l: &mut Lowerer, label: Option<String>, cond: &ast::ExprNode, body: &[ast::Stmt]) -> hir::ExprKind {
    let cond_hir = boxed(l, cond);
    let (then_branch, _) = lower_block(l, body, None);
    let break_expr = Box::new(hir::ExprNode::new(hir::ExprKind::Break { label: None }, cond.span));
    let if_expr = hir::ExprNode::new(hir::ExprKind::If { cond: cond_hir, then_branch, else_branch: Some(break_expr) }, cond.span);
    hir::ExprKind::Loop { label, body: vec![hir::Stmt::Expr(if_expr)], result_ty: hir::TypeRef::unit() }
}

fn lower_while_let(l: &mut Lowerer, label: Option<String>, pattern: &ast::Pattern, value: &ast::ExprNode, body: &[ast::Stmt]) -> hir::ExprKind {
    let value_hir = boxed(l, value);
    l.push_scope();
    let matched = lower_pattern(l, pattern);
    let (then_stmts, _) = lower_block(l, body, None);
    l.pop_scope();
    let match_arm = hir::MatchArm {
        pattern: matched,
        guard: None,
        body: Box::new(hir::ExprNode::new(hir::ExprKind::Block(then_stmts, None), pattern.span)),
    };
    let break_arm = hir::MatchArm {
        pattern: hir::Pattern::new(hir::PatternKind::Any, pattern.span),
        guard: None,
        body: Box::new(hir::ExprNode::new(hir::ExprKind::Break { label: None }, pattern.span)),
    };
    let match_expr = hir::ExprNode::new(hir::ExprKind::Match { value: value_hir, arms: vec![match_arm, break_arm] }, pattern.span);
    hir::ExprKind::Loop { label, body: vec![hir::Stmt::Expr(match_expr)], result_ty: hir::TypeRef::unit() }
}

fn lower_if_let(
    l: &mut Lowerer,
    pattern: &ast::Pattern,
    value: &ast::ExprNode,
    then_branch: &[ast::Stmt],
    else_branch: Option<&ast::ExprNode>,
) -> hir::ExprKind {
    let value_hir = boxed(l, value);
    l.push_scope();
    let matched = lower_pattern(l, pattern);
    let (then_stmts, _) = lower_block(l, then_branch, None);
    l.pop_scope();
    let then_arm = hir::MatchArm {
        pattern: matched,
        guard: None,
        body: Box::new(hir::ExprNode::new(hir::ExprKind::Block(then_stmts, None), pattern.span)),
    };
    let else_body = match else_branch {
        Some(e) => lower_expr(l, e),
        None => hir::ExprNode::new(hir::ExprKind::Tuple(Vec::new()), pattern.span),
    };
    let else_arm = hir::MatchArm { pattern: hir::Pattern::new(hir::PatternKind::Any, pattern.span), guard: None, body: Box::new(else_body) };
    hir::ExprKind::Match { value: value_hir, arms: vec![then_arm, else_arm] }
}

fn lower_arm(l: &mut Lowerer, arm: &ast::MatchArm) -> hir::MatchArm {
    l.push_scope();
    let pattern = lower_pattern(l, &arm.pattern);
    let guard = arm.guard.as_ref().map(|g| boxed(l, g));
    let body = boxed(l, &arm.body);
    l.pop_scope();
    hir::MatchArm { pattern, guard, body }
}

fn lower_closure(l: &mut Lowerer, params: &[ast::ClosureParam], ret: Option<&ast::Type>, body: &ast::ExprNode) -> hir::ExprKind {
    let closure_ty = l.fresh_closure_id();
    l.push_scope();
    let params = params
        .iter()
        .map(|p| {
            let ty = match &p.ty {
                Some(t) => lower_type(l, t),
                None => l.fresh_infer(hir::InferClass::General),
            };
            let pattern = lower_pattern(l, &p.pattern);
            hir::ClosureParam { pattern, ty }
        })
        .collect();
    let ret = match ret {
        Some(t) => lower_type(l, t),
        None => l.fresh_infer(hir::InferClass::General),
    };
    let body = boxed(l, body);
    l.pop_scope();
    hir::ExprKind::Closure { closure_ty, params, ret, body }
}

/// spec.md sec 4.4 "Calls": a call's callee path is reclassified against
/// the binder (`lower::namespace`) into a locally-resolved variable
/// (`CallValue`), a unit/tuple-variant constructor (`TupleVariant`), or
/// everything else (`CallPath`).
fn lower_call_path(l: &mut Lowerer, path: &ast::AstPath, args: &[ast::ExprNode], span: fec_common::Span) -> hir::ExprKind {
    let args_hir: Vec<_> = args.iter().map(|a| lower_expr(l, a)).collect();
    if let ast::Path::Relative(nodes) = &path.path {
        if nodes.len() == 1 {
            if let Some(slot) = l.lookup_local(&nodes[0].name) {
                return hir::ExprKind::CallValue { slot, args: args_hir };
            }
            if let Some(ValueBinding::StructConstructor) = l.modules.lookup_value(&nodes[0].name) {
                let lowered = lower_path(l, path);
                return hir::ExprKind::TupleVariant { path: lowered, is_struct: true, args: args_hir };
            }
        }
        if nodes.len() >= 2 {
            let type_name = &nodes[nodes.len() - 2].name;
            if let Some(TypeBinding::Enum { variants }) = l.modules.lookup_type(type_name) {
                let variant_name = &nodes[nodes.len() - 1].name;
                if variants.iter().any(|v| &v.name == variant_name) {
                    let lowered = lower_path(l, path);
                    return hir::ExprKind::TupleVariant { path: lowered, is_struct: false, args: args_hir };
                }
            }
        }
    }
    let lowered = lower_path(l, path);
    hir::ExprKind::CallPath { path: lowered, args: args_hir }
}

/// spec.md sec 3 "named value (resolved via path binding)": a bare
/// identifier lowers to `Local(slot)` for a variable, a zero-field struct
/// literal / `TupleVariant` for a unit-like constant, or `NamedValue(path)`
/// for everything else (function, constant, static).
fn lower_named_value(l: &mut Lowerer, path: &ast::AstPath, span: fec_common::Span) -> hir::ExprKind {
    if let ast::Path::Relative(nodes) = &path.path {
        if nodes.len() == 1 {
            let name = &nodes[0].name;
            if let Some(slot) = l.lookup_local(name) {
                return hir::ExprKind::Local(slot);
            }
            if let Some(ValueBinding::StructConstant) = l.modules.lookup_value(name) {
                let lowered = lower_path(l, path);
                return hir::ExprKind::StructLiteral { path: lowered, fields: Vec::new(), base: None };
            }
        }
        if nodes.len() >= 2 {
            let type_name = &nodes[nodes.len() - 2].name;
            if let Some(TypeBinding::Enum { variants }) = l.modules.lookup_type(type_name) {
                let variant_name = &nodes[nodes.len() - 1].name;
                if variants.iter().any(|v| &v.name == variant_name && v.is_unit) {
                    let lowered = lower_path(l, path);
                    return hir::ExprKind::TupleVariant { path: lowered, is_struct: false, args: Vec::new() };
                }
            }
        }
    }
    let _ = span;
    hir::ExprKind::NamedValue(lower_path(l, path))
}
