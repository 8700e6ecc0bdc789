//! Type lowering, `AST.TypeRef -> HIR.TypeRef` (spec.md sec 4.4 item 1).

use fec_parser::ast;

use crate::hir;
use crate::lower::namespace::TypeBinding;
use crate::lower::Lowerer;

pub fn lower_type(l: &mut Lowerer, ty: &ast::Type) -> hir::TypeRef {
    match &ty.kind {
        ast::TypeRef::None => hir::TypeRef::Diverge,
        ast::TypeRef::Any => l.fresh_infer(hir::InferClass::General),
        ast::TypeRef::Unit => hir::TypeRef::unit(),
        ast::TypeRef::Macro => l.bug(ty.span, "unexpanded macro type reached lowering"),
        ast::TypeRef::Primitive(core) => hir::TypeRef::Primitive(*core),
        ast::TypeRef::Tuple(elems) => hir::TypeRef::Tuple(elems.iter().map(|t| lower_type(l, t)).collect()),
        ast::TypeRef::Borrow { mutable, inner } => hir::TypeRef::Borrow { mutable: *mutable, inner: Box::new(lower_type(l, inner)) },
        ast::TypeRef::Pointer { mutable, inner } => hir::TypeRef::Pointer { mutable: *mutable, inner: Box::new(lower_type(l, inner)) },
        ast::TypeRef::Array { inner, size: None } => hir::TypeRef::Slice(Box::new(lower_type(l, inner))),
        ast::TypeRef::Array { inner, size: Some(expr) } => {
            let inner = Box::new(lower_type(l, inner));
            let len_expr = Box::new(crate::lower::expr::lower_expr(l, expr));
            hir::TypeRef::Array { inner, len_expr, resolved_len: None }
        }
        ast::TypeRef::Path(path) => lower_path_type(l, path),
        ast::TypeRef::TraitObject { hrls, traits } => lower_trait_object(l, hrls, traits),
        ast::TypeRef::Function(info) => hir::TypeRef::Function(hir::FunctionTypeInfo {
            is_unsafe: info.is_unsafe,
            abi: if info.abi.is_empty() { "Rust".to_string() } else { info.abi.clone() },
            params: info.params.iter().map(|t| lower_type(l, t)).collect(),
            ret: Box::new(lower_type(l, &info.ret)),
            variadic: info.variadic,
        }),
        ast::TypeRef::Generic(name, index) => hir::TypeRef::Generic { name: name.clone(), index: *index },
    }
}

/// spec.md sec 4.4 item 1 "Path": generic type parameters already arrive as
/// `ast::TypeRef::Generic` from the parser (see `ast::ty::TypeRef`), so a
/// `Path` node here always denotes a module item; lower it and wrap the
/// result in `TypeRef::Path`.
fn lower_path_type(l: &mut Lowerer, path: &ast::AstPath) -> hir::TypeRef {
    hir::TypeRef::Path(lower_path(l, path))
}

fn lower_trait_object(l: &mut Lowerer, hrls: &[String], traits: &[ast::AstPath]) -> hir::TypeRef {
    let mut data_trait = None;
    let mut markers = Vec::new();
    for t in traits {
        let lowered = lower_path(l, t);
        let is_marker = matches!(resolve_path_root(l, t), Some(TypeBinding::Trait { is_marker: true }));
        if is_marker {
            markers.push(lowered);
        } else if data_trait.is_none() {
            data_trait = Some(Box::new(lowered));
        } else {
            l.bug(t.span, "more than one non-marker trait in a trait object");
        }
    }
    hir::TypeRef::TraitObject { hrls: hrls.to_vec(), data_trait, markers }
}

fn resolve_path_root<'l>(l: &'l Lowerer, path: &ast::AstPath) -> Option<&'l TypeBinding> {
    match &path.path {
        ast::Path::Relative(nodes) if !nodes.is_empty() => l.modules.lookup_type(&nodes[0].name),
        _ => None,
    }
}

/// Path lowering (spec.md sec 4.4 item 2): only `Absolute` paths (and,
/// within UFCS, `Local` for type bindings) are valid once name resolution
/// has run; `Relative`/`Self`/`Super`/`Local` at value position are a bug.
/// This pass performs that resolution itself (see `lower::namespace`), so
/// in practice every well-formed surface `Relative` path is accepted here
/// and turned into a `HIR.Path` addressed by its resolved absolute form.
pub fn lower_path(l: &mut Lowerer, path: &ast::AstPath) -> hir::Path {
    match &path.path {
        ast::Path::Relative(nodes) => lower_relative(l, nodes, path.span),
        ast::Path::Absolute { nodes, .. } => {
            let simple = hir::SimplePath::new(l.crate_name.clone(), nodes.iter().map(|n| n.name.clone()).collect());
            hir::Path::Generic(hir::GenericPath { base: simple, params: lower_final_params(l, nodes) })
        }
        ast::Path::SelfPath(nodes) | ast::Path::Super { nodes, .. } => lower_relative(l, nodes, path.span),
        ast::Path::Ufcs { ty, trait_, nodes } => lower_ufcs(l, ty, trait_.as_deref(), nodes, path.span),
        ast::Path::Local(name) => {
            l.bug(path.span, format!("unresolved local path `{name}` reached lowering"))
        }
        ast::Path::Invalid => l.bug(path.span, "Path::Invalid reached lowering"),
    }
}

fn lower_final_params(l: &mut Lowerer, nodes: &[ast::PathNode]) -> hir::PathParams {
    let types = nodes.last().map(|n| n.params.types.iter().map(|t| lower_type(l, t)).collect()).unwrap_or_default();
    hir::PathParams { types }
}

fn lower_relative(l: &mut Lowerer, nodes: &[ast::PathNode], span: fec_common::Span) -> hir::Path {
    if nodes.is_empty() {
        l.bug(span, "empty path reached lowering");
    }
    let krate = l.crate_name.clone();
    let components = nodes.iter().map(|n| n.name.clone()).collect();
    hir::Path::Generic(hir::GenericPath { base: hir::SimplePath::new(krate, components), params: lower_final_params(l, nodes) })
}

fn lower_ufcs(l: &mut Lowerer, ty: &ast::Type, trait_: Option<&ast::AstPath>, nodes: &[ast::PathNode], span: fec_common::Span) -> hir::Path {
    if nodes.len() != 1 {
        l.bug(span, "UFCS path must name exactly one item");
    }
    let item = nodes[0].name.clone();
    let params = lower_final_params(l, nodes);
    let lowered_ty = Box::new(lower_type(l, ty));
    match trait_ {
        Some(tp) => {
            let generic_path = match lower_path(l, tp) {
                hir::Path::Generic(gp) => gp,
                _ => l.bug(span, "UFCS trait operand must be a plain path"),
            };
            let trait_path = hir::TraitPath::new(generic_path, span);
            hir::Path::UfcsKnown { ty: lowered_ty, trait_: trait_path, item, params }
        }
        None => hir::Path::UfcsInherent { ty: lowered_ty, item, params },
    }
}
