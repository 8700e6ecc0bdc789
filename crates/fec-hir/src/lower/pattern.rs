//! Pattern lowering (spec.md sec 4.4 item 3).

use fec_parser::ast;

use crate::hir;
use crate::lower::expr::lower_expr;
use crate::lower::namespace::{TypeBinding, ValueBinding};
use crate::lower::types::lower_path;
use crate::lower::Lowerer;

/// Lowers one pattern, binding any names it introduces into the current
/// local scope as it goes (spec.md sec 4.4: "`MaybeBind`... resolved against
/// the path binding table before lowering; reaching one here is a bug").
pub fn lower_pattern(l: &mut Lowerer, pat: &ast::Pattern) -> hir::Pattern {
    let kind = lower_pattern_kind(l, pat);
    let binding = pat.binding.as_ref().map(|b| bind_pattern_binding(l, b));
    hir::Pattern { kind, binding, span: pat.span }
}

fn bind_pattern_binding(l: &mut Lowerer, b: &ast::PatternBinding) -> hir::Binding {
    let mode = match b.mode {
        ast::BindMode::Move => hir::BindMode::Move,
        ast::BindMode::Ref => hir::BindMode::Ref,
        ast::BindMode::MutRef => hir::BindMode::MutRef,
    };
    l.bind_local_binding(&b.name, mode, b.mutable)
}

fn lower_pattern_kind(l: &mut Lowerer, pat: &ast::Pattern) -> hir::PatternKind {
    match &pat.kind {
        ast::PatternKind::Any => hir::PatternKind::Any,
        ast::PatternKind::MaybeBind(name) => lower_maybe_bind(l, name, pat.span),
        ast::PatternKind::Macro(_) => l.bug(pat.span, "unexpanded macro pattern reached lowering"),
        ast::PatternKind::Box(inner) => hir::PatternKind::Box(Box::new(lower_pattern(l, inner))),
        ast::PatternKind::Ref { mutable, inner } => hir::PatternKind::Ref { mutable: *mutable, inner: Box::new(lower_pattern(l, inner)) },
        ast::PatternKind::Value { start, end: None } => hir::PatternKind::Value(lower_literal_expr(l, start)),
        ast::PatternKind::Value { start, end: Some(end) } => {
            hir::PatternKind::Range { start: lower_literal_expr(l, start), end: lower_literal_expr(l, end) }
        }
        ast::PatternKind::Tuple(elems) => hir::PatternKind::Tuple(elems.iter().map(|p| lower_pattern(l, p)).collect()),
        ast::PatternKind::WildcardStructTuple(path) => lower_wildcard_tuple(l, path),
        ast::PatternKind::StructTuple(path, subs) => lower_tuple_pattern(l, path, subs),
        ast::PatternKind::Struct { path, fields, exhaustive } => lower_struct_pattern(l, path, fields, *exhaustive),
        ast::PatternKind::Slice { leading, extra_bind, trailing } => hir::PatternKind::Slice {
            leading: leading.iter().map(|p| lower_pattern(l, p)).collect(),
            extra_bind: extra_bind.as_ref().map(|p| Box::new(lower_pattern(l, p))),
            trailing: trailing.iter().map(|p| lower_pattern(l, p)).collect(),
        },
    }
}

/// A pattern's `Value` operands are always literal expressions (spec.md sec
/// 4.4); anything else reaching here is malformed input the parser should
/// already have rejected.
fn lower_literal_expr(l: &mut Lowerer, expr: &ast::ExprNode) -> hir::Literal {
    match lower_expr(l, expr).kind {
        hir::ExprKind::Literal(lit) => lit,
        _ => l.bug(expr.span, "non-literal expression in pattern position"),
    }
}

/// `AST.PatternKind::MaybeBind(name)` is ambiguous between a fresh binding
/// and a nullary constant pattern (unit struct / fieldless enum variant);
/// spec.md sec 9's path-binding table decides this the same way it decides
/// bare-identifier expressions (see `lower::expr::lower_named_value`).
fn lower_maybe_bind(l: &mut Lowerer, name: &str, span: fec_common::Span) -> hir::PatternKind {
    match l.modules.lookup_value(name) {
        Some(ValueBinding::StructConstant) => {
            let simple = hir::SimplePath::new(l.crate_name.clone(), vec![name.to_string()]);
            hir::PatternKind::Struct { path: hir::Path::Generic(hir::GenericPath::simple(simple)), fields: Vec::new(), exhaustive: true }
        }
        _ => hir::PatternKind::Bind(l.bind_local_binding(name, hir::BindMode::Move, false)),
    }
}

fn is_enum_variant_path(l: &Lowerer, path: &ast::AstPath) -> Option<bool> {
    let ast::Path::Relative(nodes) = &path.path else { return None };
    if nodes.len() < 2 {
        return None;
    }
    let type_name = &nodes[nodes.len() - 2].name;
    match l.modules.lookup_type(type_name) {
        Some(TypeBinding::Enum { variants }) => {
            let variant_name = &nodes[nodes.len() - 1].name;
            Some(variants.iter().any(|v| &v.name == variant_name))
        }
        _ => None,
    }
}

fn lower_wildcard_tuple(l: &mut Lowerer, path: &ast::AstPath) -> hir::PatternKind {
    let is_enum = is_enum_variant_path(l, path).unwrap_or(false);
    let lowered = lower_path(l, path);
    if is_enum {
        hir::PatternKind::EnumTupleWildcard(lowered)
    } else {
        hir::PatternKind::StructTupleWildcard(lowered)
    }
}

fn lower_tuple_pattern(l: &mut Lowerer, path: &ast::AstPath, subs: &[ast::Pattern]) -> hir::PatternKind {
    let is_enum = is_enum_variant_path(l, path).unwrap_or(false);
    let lowered = lower_path(l, path);
    let subs = subs.iter().map(|p| lower_pattern(l, p)).collect();
    if is_enum {
        hir::PatternKind::EnumTuple { path: lowered, subs }
    } else {
        hir::PatternKind::StructTuple { path: lowered, subs }
    }
}

fn lower_struct_pattern(l: &mut Lowerer, path: &ast::AstPath, fields: &[(String, ast::Pattern)], exhaustive: bool) -> hir::PatternKind {
    let is_enum = is_enum_variant_path(l, path).unwrap_or(false);
    let lowered = lower_path(l, path);
    let fields = fields.iter().map(|(name, p)| (name.clone(), lower_pattern(l, p))).collect();
    if is_enum {
        hir::PatternKind::EnumStruct { path: lowered, fields, exhaustive }
    } else {
        hir::PatternKind::Struct { path: lowered, fields, exhaustive }
    }
}
