//! Item and impl-block lowering (spec.md sec 4.4 items 5-6): recursive
//! module lowering with synthetic names for anonymous submodules, and
//! impl-block indexing into `type_impls`/`trait_impls`/`marker_impls`.

use rustc_hash::FxHashMap;

use fec_parser::ast;

use crate::hir;
use crate::lower::expr::{lower_block, lower_expr};
use crate::lower::namespace::{Namespaces, TypeBinding};
use crate::lower::pattern::lower_pattern;
use crate::lower::types::{lower_path, lower_type};
use crate::lower::Lowerer;

type TraitIndex = FxHashMap<hir::SimplePath, hir::TraitId>;

/// Lowers every item directly inside one module body into `out`'s value and
/// type namespaces, recursing into nested `mod` blocks. Impl blocks are
/// skipped here; `index_impls` walks the same tree separately since impls
/// are not named module members (spec.md sec 3 "HIR.Module").
pub fn lower_items_into(l: &mut Lowerer, items: &[ast::Item], module_path: &hir::SimplePath, out: &mut hir::Module, trait_index: &mut TraitIndex) {
    out.path = Some(module_path.clone());
    let mut anon_count = 0u32;
    for item in items {
        let public = matches!(item.vis, ast::Visibility::Public);
        match &item.kind {
            ast::ItemKind::Struct(def) => lower_struct_item(l, def, module_path, public, out),
            ast::ItemKind::Enum(def) => lower_enum_item(l, def, module_path, public, out),
            ast::ItemKind::Trait(def) => lower_trait_item(l, def, module_path, public, out, trait_index),
            ast::ItemKind::TypeAlias(def) => lower_type_alias_item(l, def, public, out),
            ast::ItemKind::Function(f) => lower_function_item(l, f, public, out),
            ast::ItemKind::Const(c) => lower_const_item(l, c, public, out),
            ast::ItemKind::Static(s) => lower_static_item(l, s, public, out),
            ast::ItemKind::Use(u) => lower_use_item(l, u, public, out),
            ast::ItemKind::Module(def) => lower_module_item(l, def, module_path, public, out, trait_index, &mut anon_count),
            ast::ItemKind::ExternCrate(_) | ast::ItemKind::ExternBlock(_) | ast::ItemKind::Impl(_) | ast::ItemKind::Macro(_) => {}
        }
    }
}

fn lower_generics(l: &mut Lowerer, generics: &ast::Generics, where_clause: &ast::WhereClause) -> hir::Generics {
    let mut params: Vec<hir::GenericParam> = generics
        .params
        .iter()
        .map(|p| hir::GenericParam {
            name: p.name.clone(),
            kind: match &p.kind {
                ast::GenericParamKind::Lifetime { .. } => hir::GenericParamKind::Lifetime,
                ast::GenericParamKind::Type { bounds, .. } => {
                    hir::GenericParamKind::Type { bounds: bounds.iter().map(|b| lower_trait_bound(l, b)).collect() }
                }
            },
        })
        .collect();

    for pred in &where_clause.predicates {
        if let ast::WherePredicate::TypeBound { ty, bounds, .. } = pred {
            if let ast::TypeRef::Generic(name, _) = &ty.kind {
                if let Some(param) = params.iter_mut().find(|p| &p.name == name) {
                    if let hir::GenericParamKind::Type { bounds: existing } = &mut param.kind {
                        existing.extend(bounds.iter().map(|b| lower_trait_bound(l, b)));
                    }
                }
            }
        }
    }
    hir::Generics { params }
}

fn lower_trait_bound(l: &mut Lowerer, bound: &ast::TraitBound) -> hir::TraitPath {
    let generic_path = match lower_path(l, &bound.path) {
        hir::Path::Generic(gp) => gp,
        _ => l.bug(bound.path.span, "trait bound must name a plain path"),
    };
    let mut tp = hir::TraitPath::new(generic_path, bound.path.span);
    tp.hrls = bound.hrls.clone();
    tp
}

fn generic_names(generics: &ast::Generics) -> Vec<String> {
    generics
        .params
        .iter()
        .filter(|p| matches!(p.kind, ast::GenericParamKind::Type { .. }))
        .map(|p| p.name.clone())
        .collect()
}

fn lower_field(l: &mut Lowerer, f: &ast::StructField) -> hir::Field {
    hir::Field { name: f.name.clone(), ty: lower_type(l, &f.ty), public: f.public }
}

fn lower_struct_body(l: &mut Lowerer, body: &ast::StructBody) -> hir::StructBody {
    match body {
        ast::StructBody::Unit => hir::StructBody::Unit,
        ast::StructBody::Tuple(fields) => hir::StructBody::Tuple(fields.iter().map(|f| lower_field(l, f)).collect()),
        ast::StructBody::Named(fields) => hir::StructBody::Named(fields.iter().map(|f| lower_field(l, f)).collect()),
    }
}

fn lower_repr(r: ast::Repr) -> hir::Repr {
    match r {
        ast::Repr::Rust => hir::Repr::Rust,
        ast::Repr::C => hir::Repr::C,
        ast::Repr::U8 => hir::Repr::U8,
        ast::Repr::U16 => hir::Repr::U16,
        ast::Repr::U32 => hir::Repr::U32,
        ast::Repr::Packed => hir::Repr::Packed,
    }
}

fn lower_struct_item(l: &mut Lowerer, def: &ast::StructDef, module_path: &hir::SimplePath, public: bool, out: &mut hir::Module) {
    let mark = l.push_generics(generic_names(&def.generics));
    let generics = lower_generics(l, &def.generics, &def.where_clause);
    let body = lower_struct_body(l, &def.body);
    l.pop_generics(mark);

    let item_path = module_path.join(def.name.clone());
    let struct_val = hir::Struct { name: def.name.clone(), generics, repr: lower_repr(def.repr), body: body.clone(), span: def.span };
    out.types.insert(def.name.clone(), hir::TypeEntry { item: hir::TypeItem::Struct(struct_val), public });

    match body {
        hir::StructBody::Unit => {
            out.values.insert(def.name.clone(), hir::ValueEntry { item: hir::ValueItem::StructConstant(item_path), public });
        }
        hir::StructBody::Tuple(_) => {
            out.values.insert(def.name.clone(), hir::ValueEntry { item: hir::ValueItem::StructConstructor(item_path), public });
        }
        hir::StructBody::Named(_) => {}
    }
}

fn lower_variant_body(l: &mut Lowerer, body: &ast::VariantBody) -> hir::VariantBody {
    match body {
        ast::VariantBody::Unit => hir::VariantBody::Unit,
        ast::VariantBody::Value(e) => hir::VariantBody::Value(lower_expr(l, e)),
        ast::VariantBody::Tuple(fields) => hir::VariantBody::Tuple(fields.iter().map(|f| lower_field(l, f)).collect()),
        ast::VariantBody::Struct(fields) => hir::VariantBody::Struct(fields.iter().map(|f| lower_field(l, f)).collect()),
    }
}

fn lower_enum_item(l: &mut Lowerer, def: &ast::EnumDef, module_path: &hir::SimplePath, public: bool, out: &mut hir::Module) {
    let mark = l.push_generics(generic_names(&def.generics));
    let generics = lower_generics(l, &def.generics, &def.where_clause);
    let variants = def.variants.iter().map(|v| hir::EnumVariant { name: v.name.clone(), body: lower_variant_body(l, &v.body) }).collect();
    l.pop_generics(mark);
    let _ = module_path;
    let enum_val = hir::Enum { name: def.name.clone(), generics, repr: lower_repr(def.repr), variants, span: def.span };
    out.types.insert(def.name.clone(), hir::TypeEntry { item: hir::TypeItem::Enum(enum_val), public });
}

fn lower_type_alias_item(l: &mut Lowerer, def: &ast::TypeAliasDef, public: bool, out: &mut hir::Module) {
    let mark = l.push_generics(generic_names(&def.generics));
    let generics = lower_generics(l, &def.generics, &ast::WhereClause::default());
    let ty = def.ty.as_ref().map(|t| lower_type(l, t));
    l.pop_generics(mark);
    out.types.insert(
        def.name.clone(),
        hir::TypeEntry { item: hir::TypeItem::TypeAlias { name: def.name.clone(), generics, ty }, public },
    );
}

fn self_binding_pattern(l: &mut Lowerer, mutable: bool, mode: hir::BindMode, span: fec_common::Span) -> hir::Pattern {
    let binding = l.bind_local_binding("self", mode, mutable);
    hir::Pattern { kind: hir::PatternKind::Bind(binding), binding: None, span }
}

fn lower_self_param(l: &mut Lowerer, self_param: &ast::SelfParam, span: fec_common::Span) -> Option<hir::Param> {
    let self_ty = || hir::TypeRef::Generic { name: "Self".to_string(), index: 0 };
    match self_param {
        ast::SelfParam::None => None,
        ast::SelfParam::Value { mutable } => {
            Some(hir::Param { pattern: self_binding_pattern(l, *mutable, hir::BindMode::Move, span), ty: self_ty() })
        }
        ast::SelfParam::Ref { mutable, .. } => Some(hir::Param {
            pattern: self_binding_pattern(l, false, hir::BindMode::Ref, span),
            ty: hir::TypeRef::Borrow { mutable: *mutable, inner: Box::new(self_ty()) },
        }),
        ast::SelfParam::Typed(ty) => {
            let ty = lower_type(l, ty);
            Some(hir::Param { pattern: self_binding_pattern(l, false, hir::BindMode::Move, span), ty })
        }
        ast::SelfParam::RefTyped(ty) => {
            let ty = lower_type(l, ty);
            Some(hir::Param { pattern: self_binding_pattern(l, false, hir::BindMode::Ref, span), ty })
        }
    }
}

/// Lowers one function, including its `self` receiver folded into
/// `params[0]` (the HIR model carries no separate receiver slot).
pub fn lower_function(l: &mut Lowerer, f: &ast::Function) -> hir::Function {
    let mark = l.push_generics(generic_names(&f.generics));
    let generics = lower_generics(l, &f.generics, &f.where_clause);
    l.push_scope();
    let mut params = Vec::new();
    params.extend(lower_self_param(l, &f.self_param, f.span));
    for p in &f.params {
        let ty = lower_type(l, &p.ty);
        let pattern = lower_pattern(l, &p.pattern);
        params.push(hir::Param { pattern, ty });
    }
    let ret = lower_type(l, &f.ret);
    let body = f.body.as_ref().map(|stmts| {
        let (stmts, tail) = lower_block(l, stmts, None);
        hir::ExprNode::new(hir::ExprKind::Block(stmts, tail), f.span)
    });
    l.pop_scope();
    l.pop_generics(mark);
    hir::Function {
        name: f.name.clone(),
        is_unsafe: f.is_unsafe,
        is_const: f.is_const,
        is_async: f.is_async,
        abi: f.abi.clone(),
        generics,
        params,
        ret,
        body,
        span: f.span,
    }
}

fn lower_function_item(l: &mut Lowerer, f: &ast::Function, public: bool, out: &mut hir::Module) {
    let function = lower_function(l, f);
    out.values.insert(f.name.clone(), hir::ValueEntry { item: hir::ValueItem::Function(function), public });
}

pub fn lower_constant(l: &mut Lowerer, c: &ast::ConstDef) -> hir::Constant {
    hir::Constant { name: c.name.clone(), ty: lower_type(l, &c.ty), value: lower_expr(l, &c.value), span: c.span }
}

fn lower_const_item(l: &mut Lowerer, c: &ast::ConstDef, public: bool, out: &mut hir::Module) {
    let constant = lower_constant(l, c);
    out.values.insert(c.name.clone(), hir::ValueEntry { item: hir::ValueItem::Constant(constant), public });
}

pub fn lower_static(l: &mut Lowerer, s: &ast::StaticDef) -> hir::Static {
    hir::Static { name: s.name.clone(), mutable: s.mutable, ty: lower_type(l, &s.ty), value: lower_expr(l, &s.value), span: s.span }
}

fn lower_static_item(l: &mut Lowerer, s: &ast::StaticDef, public: bool, out: &mut hir::Module) {
    let static_val = lower_static(l, s);
    out.values.insert(s.name.clone(), hir::ValueEntry { item: hir::ValueItem::Static(static_val), public });
}

/// spec.md sec 4.4: `use` re-exports are recorded as an import alias in
/// both namespaces rather than resolved eagerly -- resolving the target is
/// deferred to whatever later consumes the path (spec.md sec 9 path-binding
/// note). Nested/glob trees are flattened to their simple leaves.
fn lower_use_item(l: &mut Lowerer, u: &ast::UseDecl, public: bool, out: &mut hir::Module) {
    flatten_use_tree(l, &u.tree, public, out);
}

fn flatten_use_tree(l: &mut Lowerer, tree: &ast::UseTree, public: bool, out: &mut hir::Module) {
    match tree {
        ast::UseTree::Simple { path, rename } => {
            let target = lower_path(l, path);
            let hir::Path::Generic(gp) = target else {
                return;
            };
            let fallback = gp.base.last().map(str::to_string).unwrap_or_else(|| l.crate_name.clone());
            let name = rename.clone().unwrap_or(fallback);
            out.values.insert(name.clone(), hir::ValueEntry { item: hir::ValueItem::Import(gp.base.clone()), public });
            out.types.insert(name, hir::TypeEntry { item: hir::TypeItem::Import(gp.base), public });
        }
        ast::UseTree::Glob { .. } => {}
        ast::UseTree::Nested { items, .. } => {
            for sub in items {
                flatten_use_tree(l, sub, public, out);
            }
        }
    }
}

fn lower_trait_item(
    l: &mut Lowerer,
    def: &ast::TraitDef,
    module_path: &hir::SimplePath,
    public: bool,
    out: &mut hir::Module,
    trait_index: &mut TraitIndex,
) {
    let trait_path = module_path.join(def.name.clone());
    trait_index.insert(trait_path.clone(), hir::TraitId(trait_path.clone()));

    let mark = l.push_generics(generic_names(&def.generics));
    let generics = lower_generics(l, &def.generics, &def.where_clause);
    let parents = def.supertraits.iter().map(|p| lower_trait_bound_path(l, p)).collect();

    let self_bound_trait = hir::TraitPath::new(hir::GenericPath::simple(trait_path.clone()), def.span);
    let bounds = vec![hir::TraitBound { ty: hir::TypeRef::Generic { name: "Self".to_string(), index: 0 }, trait_: self_bound_trait }];

    let mut types = FxHashMap::default();
    let mut values = FxHashMap::default();
    for item in &def.items {
        match &item.kind {
            ast::ItemKind::Function(f) => {
                let value = if f.body.is_some() { hir::TraitValue::Function(lower_function(l, f)) } else { hir::TraitValue::None };
                values.insert(f.name.clone(), value);
            }
            ast::ItemKind::Const(c) => {
                values.insert(c.name.clone(), hir::TraitValue::Constant(lower_constant(l, c)));
            }
            ast::ItemKind::Static(s) => {
                values.insert(s.name.clone(), hir::TraitValue::Static(lower_static(l, s)));
            }
            ast::ItemKind::TypeAlias(ta) => {
                let default = ta.ty.as_ref().map(|t| lower_type(l, t));
                types.insert(ta.name.clone(), hir::AssociatedType { name: ta.name.clone(), bounds: Vec::new(), default });
            }
            _ => {}
        }
    }
    l.pop_generics(mark);

    let trait_val = hir::Trait {
        name: def.name.clone(),
        generics,
        self_lifetime: None,
        parents,
        is_marker: def.is_marker,
        bounds,
        types,
        values,
        span: def.span,
    };
    out.types.insert(def.name.clone(), hir::TypeEntry { item: hir::TypeItem::Trait(trait_val), public });
    out.traits.push(trait_path);
}

fn lower_trait_bound_path(l: &mut Lowerer, path: &ast::AstPath) -> hir::TraitPath {
    let generic_path = match lower_path(l, path) {
        hir::Path::Generic(gp) => gp,
        _ => l.bug(path.span, "supertrait bound must name a plain path"),
    };
    hir::TraitPath::new(generic_path, path.span)
}

fn lower_module_item(
    l: &mut Lowerer,
    def: &ast::ModuleDef,
    parent_path: &hir::SimplePath,
    public: bool,
    out: &mut hir::Module,
    trait_index: &mut TraitIndex,
    anon_count: &mut u32,
) {
    let items = match &def.body {
        ast::ModuleBody::Inline(items) => items,
        // spec.md sec 4.3 "Sub-module loading policy": the file-system
        // collaborator that resolves `mod foo;` is external to this crate.
        ast::ModuleBody::External => {
            l.bug(def.span, format!("external module `{}` was not pre-loaded into an inline body", def.name))
        }
    };
    let name = if def.name.is_empty() {
        let synthetic = format!("#{anon_count}");
        *anon_count += 1;
        synthetic
    } else {
        def.name.clone()
    };
    let child_path = parent_path.join(name.clone());
    let mut child = hir::Module::new(child_path.clone());
    let child_ns = Namespaces::collect(items);
    l.push_module_namespaces(child_ns);
    lower_items_into(l, items, &child_path, &mut child, trait_index);
    l.pop_module_namespaces();
    for t in &child.traits {
        out.traits.push(t.clone());
    }
    out.types.insert(name, hir::TypeEntry { item: hir::TypeItem::Module(Box::new(child)), public });
}

// ── Impl-block lowering and indexing (spec.md sec 4.4 item 6) ──────────────

/// Accumulates the three crate-level impl indexes while walking the item
/// tree. Kept separate from `hir::Crate` itself so the walk can hold a
/// shared reference to the already-lowered `hir::Module` tree (for child
/// lookup) alongside a mutable reference to this accumulator, without the
/// two aliasing one struct (spec.md sec 9 "Arenas vs individual ownership").
#[derive(Default)]
pub struct ImplIndex {
    pub type_impls: Vec<hir::TypeImpl>,
    pub trait_impls: FxHashMap<hir::SimplePath, Vec<hir::TraitImpl>>,
    pub marker_impls: FxHashMap<hir::SimplePath, Vec<hir::MarkerImpl>>,
}

pub fn index_impls(l: &mut Lowerer, items: &[ast::Item], module_path: &hir::SimplePath, module: &hir::Module, out: &mut ImplIndex) {
    let ns = Namespaces::collect(items);
    l.push_module_namespaces(ns);
    let mut anon_count = 0u32;
    for item in items {
        match &item.kind {
            ast::ItemKind::Impl(def) => lower_impl_item(l, def, module_path, out),
            ast::ItemKind::Module(mdef) => {
                // Mirrors `lower_items_into`'s traversal order exactly, so
                // the synthetic `#N` name assigned there for an anonymous
                // submodule is reproduced identically here.
                let name = if mdef.name.is_empty() {
                    let synthetic = format!("#{anon_count}");
                    anon_count += 1;
                    synthetic
                } else {
                    mdef.name.clone()
                };
                if let ast::ModuleBody::Inline(child_items) = &mdef.body {
                    let child_path = module_path.join(name.clone());
                    if let Some(hir::TypeEntry { item: hir::TypeItem::Module(child_module), .. }) = module.types.get(&name) {
                        index_impls(l, child_items, &child_path, child_module, out);
                    }
                }
            }
            _ => {}
        }
    }
    l.pop_module_namespaces();
}

fn lower_impl_item(l: &mut Lowerer, def: &ast::ImplDef, module_path: &hir::SimplePath, out: &mut ImplIndex) {
    let mark = l.push_generics(generic_names(&def.generics));
    let generics = lower_generics(l, &def.generics, &def.where_clause);
    let implementor = lower_type(l, &def.self_ty);

    match &def.trait_ {
        None => {
            let mut methods = FxHashMap::default();
            for item in &def.items {
                if let ast::ItemKind::Function(f) = &item.kind {
                    let public = matches!(item.vis, ast::Visibility::Public);
                    methods.insert(f.name.clone(), hir::TypeImplMethod { function: lower_function(l, f), public, specialisable: true });
                }
            }
            out.type_impls.push(hir::TypeImpl { generics, implementor, methods, source_module: module_path.clone(), span: def.span });
        }
        Some(trait_path) => {
            let trait_is_marker = matches!(resolve_type_binding(l, trait_path), Some(TypeBinding::Trait { is_marker: true }));
            let trait_args = lower_trait_bound_path(l, trait_path);
            if trait_is_marker && def.items.is_empty() {
                out.marker_impls.entry(trait_args.path.base.clone()).or_default().push(hir::MarkerImpl {
                    generics,
                    trait_args,
                    is_positive: !def.is_negative,
                    implementor,
                    source_module: module_path.clone(),
                    span: def.span,
                });
            } else {
                let mut methods = FxHashMap::default();
                let mut constants = FxHashMap::default();
                let mut types = FxHashMap::default();
                for item in &def.items {
                    match &item.kind {
                        ast::ItemKind::Function(f) => {
                            methods.insert(f.name.clone(), hir::TraitImplMethod { function: lower_function(l, f), specialisable: false });
                        }
                        ast::ItemKind::Const(c) => {
                            constants.insert(c.name.clone(), hir::TraitImplConstant { constant: lower_constant(l, c), specialisable: false });
                        }
                        ast::ItemKind::TypeAlias(ta) => {
                            if let Some(ty) = &ta.ty {
                                types.insert(ta.name.clone(), hir::TraitImplType { ty: lower_type(l, ty), specialisable: false });
                            }
                        }
                        _ => {}
                    }
                }
                out.trait_impls.entry(trait_args.path.base.clone()).or_default().push(hir::TraitImpl {
                    generics,
                    trait_args,
                    implementor,
                    methods,
                    constants,
                    types,
                    source_module: module_path.clone(),
                    span: def.span,
                });
            }
        }
    }
    l.pop_generics(mark);
}

fn resolve_type_binding<'l>(l: &'l Lowerer, path: &ast::AstPath) -> Option<&'l TypeBinding> {
    match &path.path {
        ast::Path::Relative(nodes) if !nodes.is_empty() => l.modules.lookup_type(&nodes[0].name),
        _ => None,
    }
}
