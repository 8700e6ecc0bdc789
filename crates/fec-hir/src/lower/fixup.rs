//! Post-lowering fixup passes (spec.md sec 4.4 item 7, and the final
//! bullet of sec 4.4 describing the `Loop` divergence visitor): resolves
//! every `TraitPath.resolved_trait` against the crate's `trait_index`, then
//! walks every function body setting a `Loop`'s `result_ty` to `Diverge`
//! when no enclosed `break` targets it.

use rustc_hash::FxHashMap;

use crate::hir;
use crate::lower::Lowerer;

type TraitIndex = FxHashMap<hir::SimplePath, hir::TraitId>;

pub fn run(l: &mut Lowerer, out: &mut hir::Crate) {
    let trait_index = out.trait_index.clone();
    fixup_module(l, &trait_index, &mut out.root);
    for impl_ in &mut out.type_impls {
        fixup_generics(l, &trait_index, &mut impl_.generics);
        fixup_type(l, &trait_index, &mut impl_.implementor);
        for method in impl_.methods.values_mut() {
            fixup_function(l, &trait_index, &mut method.function);
        }
    }
    for impls in out.trait_impls.values_mut() {
        for impl_ in impls {
            fixup_generics(l, &trait_index, &mut impl_.generics);
            fixup_type(l, &trait_index, &mut impl_.implementor);
            resolve_trait_path(l, &trait_index, &mut impl_.trait_args);
            for method in impl_.methods.values_mut() {
                fixup_function(l, &trait_index, &mut method.function);
            }
            for constant in impl_.constants.values_mut() {
                fixup_type(l, &trait_index, &mut constant.constant.ty);
                fixup_expr(l, &trait_index, &mut constant.constant.value);
            }
            for ty in impl_.types.values_mut() {
                fixup_type(l, &trait_index, &mut ty.ty);
            }
        }
    }
    for impls in out.marker_impls.values_mut() {
        for impl_ in impls {
            fixup_generics(l, &trait_index, &mut impl_.generics);
            fixup_type(l, &trait_index, &mut impl_.implementor);
            resolve_trait_path(l, &trait_index, &mut impl_.trait_args);
        }
    }
}

fn resolve_trait_path(l: &mut Lowerer, trait_index: &TraitIndex, tp: &mut hir::TraitPath) {
    match trait_index.get(&tp.path.base) {
        Some(id) => tp.resolved_trait = Some(id.clone()),
        None => l.bug(tp.span, format!("unresolved trait path `{}`", tp.path.base)),
    }
}

fn fixup_generics(l: &mut Lowerer, trait_index: &TraitIndex, generics: &mut hir::Generics) {
    for param in &mut generics.params {
        if let hir::GenericParamKind::Type { bounds } = &mut param.kind {
            for b in bounds {
                resolve_trait_path(l, trait_index, b);
            }
        }
    }
}

fn fixup_function(l: &mut Lowerer, trait_index: &TraitIndex, f: &mut hir::Function) {
    fixup_generics(l, trait_index, &mut f.generics);
    for param in &mut f.params {
        fixup_pattern(l, trait_index, &mut param.pattern);
        fixup_type(l, trait_index, &mut param.ty);
    }
    fixup_type(l, trait_index, &mut f.ret);
    if let Some(body) = &mut f.body {
        fixup_expr(l, trait_index, body);
    }
}

fn fixup_module(l: &mut Lowerer, trait_index: &TraitIndex, module: &mut hir::Module) {
    for entry in module.types.values_mut() {
        match &mut entry.item {
            hir::TypeItem::Struct(s) => {
                fixup_generics(l, trait_index, &mut s.generics);
                fixup_struct_body(l, trait_index, &mut s.body);
            }
            hir::TypeItem::Enum(e) => {
                fixup_generics(l, trait_index, &mut e.generics);
                for v in &mut e.variants {
                    match &mut v.body {
                        hir::VariantBody::Unit => {}
                        hir::VariantBody::Value(expr) => fixup_expr(l, trait_index, expr),
                        hir::VariantBody::Tuple(fields) | hir::VariantBody::Struct(fields) => {
                            for f in fields {
                                fixup_type(l, trait_index, &mut f.ty);
                            }
                        }
                    }
                }
            }
            hir::TypeItem::TypeAlias { generics, ty, .. } => {
                fixup_generics(l, trait_index, generics);
                if let Some(ty) = ty {
                    fixup_type(l, trait_index, ty);
                }
            }
            hir::TypeItem::Trait(t) => {
                fixup_generics(l, trait_index, &mut t.generics);
                for bound in &mut t.bounds {
                    resolve_trait_path(l, trait_index, &mut bound.trait_);
                }
                for parent in &mut t.parents {
                    resolve_trait_path(l, trait_index, parent);
                }
                for assoc in t.types.values_mut() {
                    for b in &mut assoc.bounds {
                        resolve_trait_path(l, trait_index, b);
                    }
                    if let Some(d) = &mut assoc.default {
                        fixup_type(l, trait_index, d);
                    }
                }
                for value in t.values.values_mut() {
                    match value {
                        hir::TraitValue::Function(f) => fixup_function(l, trait_index, f),
                        hir::TraitValue::Constant(c) => {
                            fixup_type(l, trait_index, &mut c.ty);
                            fixup_expr(l, trait_index, &mut c.value);
                        }
                        hir::TraitValue::Static(s) => {
                            fixup_type(l, trait_index, &mut s.ty);
                            fixup_expr(l, trait_index, &mut s.value);
                        }
                        hir::TraitValue::None => {}
                    }
                }
            }
            hir::TypeItem::Module(m) => fixup_module(l, trait_index, m),
            hir::TypeItem::Import(_) => {}
        }
    }
    for entry in module.values.values_mut() {
        match &mut entry.item {
            hir::ValueItem::Function(f) => fixup_function(l, trait_index, f),
            hir::ValueItem::Constant(c) => {
                fixup_type(l, trait_index, &mut c.ty);
                fixup_expr(l, trait_index, &mut c.value);
            }
            hir::ValueItem::Static(s) => {
                fixup_type(l, trait_index, &mut s.ty);
                fixup_expr(l, trait_index, &mut s.value);
            }
            hir::ValueItem::Import(_) | hir::ValueItem::StructConstant(_) | hir::ValueItem::StructConstructor(_) => {}
        }
    }
}

fn fixup_struct_body(l: &mut Lowerer, trait_index: &TraitIndex, body: &mut hir::StructBody) {
    match body {
        hir::StructBody::Unit => {}
        hir::StructBody::Tuple(fields) | hir::StructBody::Named(fields) => {
            for f in fields {
                fixup_type(l, trait_index, &mut f.ty);
            }
        }
    }
}

fn fixup_type(l: &mut Lowerer, trait_index: &TraitIndex, ty: &mut hir::TypeRef) {
    match ty {
        hir::TypeRef::Diverge | hir::TypeRef::Infer { .. } | hir::TypeRef::Primitive(_) | hir::TypeRef::Generic { .. } | hir::TypeRef::Closure(_) => {}
        hir::TypeRef::Tuple(elems) => {
            for e in elems {
                fixup_type(l, trait_index, e);
            }
        }
        hir::TypeRef::Slice(inner) => fixup_type(l, trait_index, inner),
        hir::TypeRef::Array { inner, len_expr, .. } => {
            fixup_type(l, trait_index, inner);
            fixup_expr(l, trait_index, len_expr);
        }
        hir::TypeRef::Borrow { inner, .. } | hir::TypeRef::Pointer { inner, .. } => fixup_type(l, trait_index, inner),
        hir::TypeRef::Path(path) => fixup_path(l, trait_index, path),
        hir::TypeRef::TraitObject { data_trait, markers, .. } => {
            if let Some(p) = data_trait {
                fixup_path(l, trait_index, p);
            }
            for m in markers {
                fixup_path(l, trait_index, m);
            }
        }
        hir::TypeRef::Function(info) => {
            for p in &mut info.params {
                fixup_type(l, trait_index, p);
            }
            fixup_type(l, trait_index, &mut info.ret);
        }
    }
}

fn fixup_path(l: &mut Lowerer, trait_index: &TraitIndex, path: &mut hir::Path) {
    match path {
        hir::Path::Generic(gp) => fixup_path_params(l, trait_index, &mut gp.params),
        hir::Path::UfcsInherent { ty, params, .. } => {
            fixup_type(l, trait_index, ty);
            fixup_path_params(l, trait_index, params);
        }
        hir::Path::UfcsKnown { ty, trait_, params, .. } => {
            fixup_type(l, trait_index, ty);
            resolve_trait_path(l, trait_index, trait_);
            fixup_path_params(l, trait_index, params);
        }
        hir::Path::UfcsUnknown { ty, params, .. } => {
            fixup_type(l, trait_index, ty);
            fixup_path_params(l, trait_index, params);
        }
    }
}

fn fixup_path_params(l: &mut Lowerer, trait_index: &TraitIndex, params: &mut hir::PathParams) {
    for t in &mut params.types {
        fixup_type(l, trait_index, t);
    }
}

fn fixup_pattern(l: &mut Lowerer, trait_index: &TraitIndex, pat: &mut hir::Pattern) {
    match &mut pat.kind {
        hir::PatternKind::Any | hir::PatternKind::Bind(_) | hir::PatternKind::Value(_) | hir::PatternKind::Range { .. } => {}
        hir::PatternKind::Box(inner) | hir::PatternKind::Ref { inner, .. } => fixup_pattern(l, trait_index, inner),
        hir::PatternKind::Tuple(elems) => {
            for e in elems {
                fixup_pattern(l, trait_index, e);
            }
        }
        hir::PatternKind::EnumTupleWildcard(path) | hir::PatternKind::StructTupleWildcard(path) => fixup_path(l, trait_index, path),
        hir::PatternKind::EnumTuple { path, subs } | hir::PatternKind::StructTuple { path, subs } => {
            fixup_path(l, trait_index, path);
            for s in subs {
                fixup_pattern(l, trait_index, s);
            }
        }
        hir::PatternKind::EnumStruct { path, fields, .. } | hir::PatternKind::Struct { path, fields, .. } => {
            fixup_path(l, trait_index, path);
            for (_, p) in fields {
                fixup_pattern(l, trait_index, p);
            }
        }
        hir::PatternKind::Slice { leading, extra_bind, trailing } => {
            for p in leading.iter_mut().chain(trailing.iter_mut()) {
                fixup_pattern(l, trait_index, p);
            }
            if let Some(b) = extra_bind {
                fixup_pattern(l, trait_index, b);
            }
        }
    }
}

/// Sets a `Loop`'s `result_ty` to `Diverge` when no `break` inside its own
/// body (not crossing into a nested loop with its own label) targets it
/// (spec.md sec 4.4, final bullet), while also resolving every `TraitPath`
/// and `Path` reachable from the body (sec 4.4 item 7).
fn fixup_expr(l: &mut Lowerer, trait_index: &TraitIndex, expr: &mut hir::ExprNode) {
    match &mut expr.kind {
        hir::ExprKind::Block(stmts, tail) => {
            for s in stmts {
                fixup_stmt(l, trait_index, s);
            }
            if let Some(t) = tail {
                fixup_expr(l, trait_index, t);
            }
        }
        hir::ExprKind::Return(e) => fixup_expr(l, trait_index, e),
        hir::ExprKind::Break { .. } | hir::ExprKind::Continue { .. } | hir::ExprKind::Literal(_) | hir::ExprKind::Local(_) => {}
        hir::ExprKind::Let { pattern, ty, value } => {
            fixup_pattern(l, trait_index, pattern);
            if let Some(t) = ty {
                fixup_type(l, trait_index, t);
            }
            fixup_expr(l, trait_index, value);
        }
        hir::ExprKind::Assign { target, value, .. } => {
            fixup_expr(l, trait_index, target);
            fixup_expr(l, trait_index, value);
        }
        hir::ExprKind::BinOp { lhs, rhs, .. } => {
            fixup_expr(l, trait_index, lhs);
            fixup_expr(l, trait_index, rhs);
        }
        hir::ExprKind::UniOp { operand, .. } | hir::ExprKind::Borrow { operand, .. } => fixup_expr(l, trait_index, operand),
        hir::ExprKind::Cast { value, ty } => {
            fixup_expr(l, trait_index, value);
            fixup_type(l, trait_index, ty);
        }
        hir::ExprKind::Deref(e) => fixup_expr(l, trait_index, e),
        hir::ExprKind::CallPath { path, args } => {
            fixup_path(l, trait_index, path);
            for a in args {
                fixup_expr(l, trait_index, a);
            }
        }
        hir::ExprKind::CallValue { args, .. } => {
            for a in args {
                fixup_expr(l, trait_index, a);
            }
        }
        hir::ExprKind::TupleVariant { path, args, .. } => {
            fixup_path(l, trait_index, path);
            for a in args {
                fixup_expr(l, trait_index, a);
            }
        }
        hir::ExprKind::CallMethod { receiver, type_args, args, .. } => {
            fixup_expr(l, trait_index, receiver);
            for t in type_args {
                fixup_type(l, trait_index, t);
            }
            for a in args {
                fixup_expr(l, trait_index, a);
            }
        }
        hir::ExprKind::CallObject { callee, args } => {
            fixup_expr(l, trait_index, callee);
            for a in args {
                fixup_expr(l, trait_index, a);
            }
        }
        hir::ExprKind::Loop { label, body, result_ty } => {
            for s in body.iter_mut() {
                fixup_stmt(l, trait_index, s);
            }
            let has_break = body.iter().any(|s| stmt_has_matching_break(s, label.as_deref()));
            if !has_break {
                *result_ty = hir::TypeRef::Diverge;
            }
        }
        hir::ExprKind::Match { value, arms } => {
            fixup_expr(l, trait_index, value);
            for arm in arms {
                fixup_pattern(l, trait_index, &mut arm.pattern);
                if let Some(g) = &mut arm.guard {
                    fixup_expr(l, trait_index, g);
                }
                fixup_expr(l, trait_index, &mut arm.body);
            }
        }
        hir::ExprKind::If { cond, then_branch, else_branch } => {
            fixup_expr(l, trait_index, cond);
            for s in then_branch {
                fixup_stmt(l, trait_index, s);
            }
            if let Some(e) = else_branch {
                fixup_expr(l, trait_index, e);
            }
        }
        hir::ExprKind::Closure { params, ret, body, .. } => {
            for p in params {
                fixup_pattern(l, trait_index, &mut p.pattern);
                fixup_type(l, trait_index, &mut p.ty);
            }
            fixup_type(l, trait_index, ret);
            fixup_expr(l, trait_index, body);
        }
        hir::ExprKind::StructLiteral { path, fields, base } => {
            fixup_path(l, trait_index, path);
            for f in fields {
                fixup_expr(l, trait_index, &mut f.value);
            }
            if let Some(b) = base {
                fixup_expr(l, trait_index, b);
            }
        }
        hir::ExprKind::Array(arr) => match arr {
            hir::ArrayLit::List(items) => {
                for i in items {
                    fixup_expr(l, trait_index, i);
                }
            }
            hir::ArrayLit::Sized { value, count } => {
                fixup_expr(l, trait_index, value);
                fixup_expr(l, trait_index, count);
            }
        },
        hir::ExprKind::Tuple(items) => {
            for i in items {
                fixup_expr(l, trait_index, i);
            }
        }
        hir::ExprKind::NamedValue(path) => fixup_path(l, trait_index, path),
        hir::ExprKind::Field { value, .. } => fixup_expr(l, trait_index, value),
        hir::ExprKind::Index { value, index } => {
            fixup_expr(l, trait_index, value);
            fixup_expr(l, trait_index, index);
        }
    }
}

fn fixup_stmt(l: &mut Lowerer, trait_index: &TraitIndex, stmt: &mut hir::Stmt) {
    match stmt {
        hir::Stmt::Expr(e) | hir::Stmt::Semi(e) => fixup_expr(l, trait_index, e),
    }
}

/// Looks for a `break` that targets the enclosing loop: an unlabeled
/// `break` always counts (it targets the nearest loop); a labeled `break`
/// counts only if it names this loop's label. Does not cross into a nested
/// `Loop`, whose own unlabeled breaks target itself, not the outer loop.
fn stmt_has_matching_break(stmt: &hir::Stmt, label: Option<&str>) -> bool {
    match stmt {
        hir::Stmt::Expr(e) | hir::Stmt::Semi(e) => expr_has_matching_break(e, label),
    }
}

fn expr_has_matching_break(expr: &hir::ExprNode, label: Option<&str>) -> bool {
    match &expr.kind {
        hir::ExprKind::Break { label: break_label } => break_label.is_none() || break_label.as_deref() == label,
        hir::ExprKind::Loop { .. } | hir::ExprKind::Closure { .. } => false,
        hir::ExprKind::Block(stmts, tail) => {
            stmts.iter().any(|s| stmt_has_matching_break(s, label)) || tail.as_deref().is_some_and(|t| expr_has_matching_break(t, label))
        }
        hir::ExprKind::Return(_) | hir::ExprKind::Continue { .. } | hir::ExprKind::Literal(_) | hir::ExprKind::Local(_) | hir::ExprKind::NamedValue(_) => false,
        hir::ExprKind::Let { value, .. } => expr_has_matching_break(value, label),
        hir::ExprKind::Assign { target, value, .. } => expr_has_matching_break(target, label) || expr_has_matching_break(value, label),
        hir::ExprKind::BinOp { lhs, rhs, .. } => expr_has_matching_break(lhs, label) || expr_has_matching_break(rhs, label),
        hir::ExprKind::UniOp { operand, .. } | hir::ExprKind::Borrow { operand, .. } | hir::ExprKind::Deref(operand) => expr_has_matching_break(operand, label),
        hir::ExprKind::Cast { value, .. } => expr_has_matching_break(value, label),
        hir::ExprKind::CallPath { args, .. } | hir::ExprKind::CallValue { args, .. } | hir::ExprKind::TupleVariant { args, .. } => {
            args.iter().any(|a| expr_has_matching_break(a, label))
        }
        hir::ExprKind::CallMethod { receiver, args, .. } => expr_has_matching_break(receiver, label) || args.iter().any(|a| expr_has_matching_break(a, label)),
        hir::ExprKind::CallObject { callee, args } => expr_has_matching_break(callee, label) || args.iter().any(|a| expr_has_matching_break(a, label)),
        hir::ExprKind::Match { value, arms } => {
            expr_has_matching_break(value, label)
                || arms.iter().any(|arm| arm.guard.as_deref().is_some_and(|g| expr_has_matching_break(g, label)) || expr_has_matching_break(&arm.body, label))
        }
        hir::ExprKind::If { cond, then_branch, else_branch } => {
            expr_has_matching_break(cond, label)
                || then_branch.iter().any(|s| stmt_has_matching_break(s, label))
                || else_branch.as_deref().is_some_and(|e| expr_has_matching_break(e, label))
        }
        hir::ExprKind::StructLiteral { fields, base, .. } => {
            fields.iter().any(|f| expr_has_matching_break(&f.value, label)) || base.as_deref().is_some_and(|b| expr_has_matching_break(b, label))
        }
        hir::ExprKind::Array(arr) => match arr {
            hir::ArrayLit::List(items) => items.iter().any(|i| expr_has_matching_break(i, label)),
            hir::ArrayLit::Sized { value, count } => expr_has_matching_break(value, label) || expr_has_matching_break(count, label),
        },
        hir::ExprKind::Tuple(items) => items.iter().any(|i| expr_has_matching_break(i, label)),
        hir::ExprKind::Field { value, .. } => expr_has_matching_break(value, label),
        hir::ExprKind::Index { value, index } => expr_has_matching_break(value, label) || expr_has_matching_break(index, label),
    }
}
