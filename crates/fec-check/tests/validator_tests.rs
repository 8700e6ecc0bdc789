//! Integration tests for the validator (spec.md sec 4.5), one per
//! representative "Contract per node" row plus a couple of whole-crate
//! acceptance/rejection scenarios. Function bodies are hand-built with
//! `ty` already populated -- this crate runs after type inference, which
//! is an external phase this pipeline does not implement, so tests stand
//! in for that phase by constructing already-typed trees directly, the
//! same way `fec-resolve`'s tests build already-lowered crates directly.

use fec_common::{CoreType, DiagnosticBag, FileId, Sink, Span};
use fec_hir::hir::{self, BinOp, CompoundOp, ExprKind, ExprNode, Function, Generics, Path, Pattern, PatternKind, TypeRef, UniOp, ValueEntry, ValueItem};
use fec_resolve::Resolver;

fn span() -> Span {
    Span::point(FileId::ROOT, 1, 1)
}

fn node(kind: ExprKind, ty: TypeRef) -> ExprNode {
    ExprNode { kind, ty: Some(ty), span: span() }
}

fn wildcard() -> Pattern {
    Pattern::new(PatternKind::Any, span())
}

fn lower(source: &str) -> hir::Crate {
    let mut sink = DiagnosticBag::new();
    let krate = fec_parser::parse_str(source, FileId::ROOT, &mut sink).expect("parse_str returned None without recording an error");
    assert!(!sink.has_errors(), "unexpected parse errors: {:?}", sink.diagnostics);
    fec_hir::lower_crate(krate, "test", &mut sink)
}

fn make_fn(name: &str, ret: TypeRef, body: ExprNode) -> Function {
    Function {
        name: name.to_string(),
        is_unsafe: false,
        is_const: false,
        is_async: false,
        abi: None,
        generics: Generics::default(),
        params: Vec::new(),
        ret,
        body: Some(body),
        span: span(),
    }
}

/// Wire `f` into a throwaway crate's root module and run it through the
/// public `validate_crate` entry point.
fn validate_via_crate(krate: &mut hir::Crate, f: Function) -> DiagnosticBag {
    krate.root.values.insert(f.name.clone(), ValueEntry { item: ValueItem::Function(f), public: false });
    let resolver = Resolver::new(krate);
    let mut sink = DiagnosticBag::new();
    fec_check::validate_crate(krate, &resolver, &mut sink);
    sink
}

fn path_ty(name: &str) -> TypeRef {
    TypeRef::Path(Path::Generic(hir::GenericPath::simple(hir::SimplePath::new("test", vec![name.to_string()]))))
}

#[test]
fn block_tail_type_must_match_block_result_type() {
    let mut krate = lower("fn placeholder() {}");
    let tail = node(ExprKind::Literal(hir::Literal::Bool(true)), TypeRef::Primitive(CoreType::Bool));
    let body = node(ExprKind::Block(Vec::new(), Some(Box::new(tail))), TypeRef::Primitive(CoreType::Bool));
    let sink = validate_via_crate(&mut krate, make_fn("ok", TypeRef::Primitive(CoreType::Bool), body));
    assert!(!sink.has_errors());
}

#[test]
fn block_tail_mismatch_is_rejected() {
    let mut krate = lower("fn placeholder() {}");
    let tail = node(ExprKind::Literal(hir::Literal::Bool(true)), TypeRef::Primitive(CoreType::Bool));
    let body = node(ExprKind::Block(Vec::new(), Some(Box::new(tail))), TypeRef::Primitive(CoreType::I32));
    let sink = validate_via_crate(&mut krate, make_fn("bad", TypeRef::Primitive(CoreType::I32), body));
    assert_eq!(sink.errors().count(), 1);
}

#[test]
fn missing_else_branch_implies_unit_on_the_true_branch() {
    let mut krate = lower("fn placeholder() {}");
    let cond = node(ExprKind::Literal(hir::Literal::Bool(true)), TypeRef::Primitive(CoreType::Bool));
    let if_expr = node(ExprKind::If { cond: Box::new(cond), then_branch: Vec::new(), else_branch: None }, TypeRef::unit());
    let body = node(ExprKind::Block(Vec::new(), Some(Box::new(if_expr))), TypeRef::unit());
    let sink = validate_via_crate(&mut krate, make_fn("ok", TypeRef::unit(), body));
    assert!(!sink.has_errors());
}

#[test]
fn match_arm_bodies_must_all_equal_the_match_result_type() {
    let mut krate = lower("fn placeholder() {}");
    let value = node(
        ExprKind::Literal(hir::Literal::Int { value: 1, tag: fec_common::LiteralTypeTag::Explicit(CoreType::I32) }),
        TypeRef::Primitive(CoreType::I32),
    );
    let arm_ok = hir::MatchArm {
        pattern: wildcard(),
        guard: None,
        body: Box::new(node(ExprKind::Literal(hir::Literal::Bool(true)), TypeRef::Primitive(CoreType::Bool))),
    };
    let arm_bad = hir::MatchArm {
        pattern: wildcard(),
        guard: None,
        body: Box::new(node(
            ExprKind::Literal(hir::Literal::Int { value: 0, tag: fec_common::LiteralTypeTag::Explicit(CoreType::I32) }),
            TypeRef::Primitive(CoreType::I32),
        )),
    };
    let match_expr = node(ExprKind::Match { value: Box::new(value), arms: vec![arm_ok, arm_bad] }, TypeRef::Primitive(CoreType::Bool));
    let body = node(ExprKind::Block(Vec::new(), Some(Box::new(match_expr))), TypeRef::Primitive(CoreType::Bool));
    let sink = validate_via_crate(&mut krate, make_fn("bad", TypeRef::Primitive(CoreType::Bool), body));
    assert_eq!(sink.errors().count(), 1);
}

#[test]
fn binop_add_resolves_through_the_add_trait_impl() {
    let mut krate = lower(
        "trait Add { type Output; fn add(self, rhs: Self) -> Self::Output; } struct S; impl Add for S { type Output = S; fn add(self, rhs: Self) -> S { rhs } }",
    );
    let lhs = node(ExprKind::Local(0), path_ty("S"));
    let rhs = node(ExprKind::Local(1), path_ty("S"));
    let binop = node(ExprKind::BinOp { op: BinOp::Add, lhs: Box::new(lhs), rhs: Box::new(rhs) }, path_ty("S"));
    let body = node(ExprKind::Block(Vec::new(), Some(Box::new(binop))), path_ty("S"));
    let sink = validate_via_crate(&mut krate, make_fn("add_s", path_ty("S"), body));
    assert!(!sink.has_errors(), "{:?}", sink.diagnostics);
}

#[test]
fn binop_add_without_a_matching_impl_is_rejected() {
    let mut krate = lower("struct S;");
    let lhs = node(ExprKind::Local(0), path_ty("S"));
    let rhs = node(ExprKind::Local(1), path_ty("S"));
    let binop = node(ExprKind::BinOp { op: BinOp::Add, lhs: Box::new(lhs), rhs: Box::new(rhs) }, path_ty("S"));
    let body = node(ExprKind::Block(Vec::new(), Some(Box::new(binop))), path_ty("S"));
    let sink = validate_via_crate(&mut krate, make_fn("add_s", path_ty("S"), body));
    assert_eq!(sink.errors().count(), 1);
}

#[test]
fn comparison_operators_must_produce_bool() {
    let mut krate = lower("trait Eq { fn eq(self, rhs: Self) -> bool; } struct S; impl Eq for S { fn eq(self, rhs: Self) -> bool { true } }");
    let lhs = node(ExprKind::Local(0), path_ty("S"));
    let rhs = node(ExprKind::Local(1), path_ty("S"));
    let cmp = node(ExprKind::BinOp { op: BinOp::Eq, lhs: Box::new(lhs), rhs: Box::new(rhs) }, TypeRef::Primitive(CoreType::Bool));
    let body = node(ExprKind::Block(Vec::new(), Some(Box::new(cmp))), TypeRef::Primitive(CoreType::Bool));
    let sink = validate_via_crate(&mut krate, make_fn("eq_s", TypeRef::Primitive(CoreType::Bool), body));
    assert!(!sink.has_errors(), "{:?}", sink.diagnostics);
}

#[test]
fn short_circuit_and_has_no_trait_requirement() {
    let mut krate = lower("fn placeholder() {}");
    let lhs = node(ExprKind::Literal(hir::Literal::Bool(true)), TypeRef::Primitive(CoreType::Bool));
    let rhs = node(ExprKind::Literal(hir::Literal::Bool(false)), TypeRef::Primitive(CoreType::Bool));
    let and_expr = node(ExprKind::BinOp { op: BinOp::And, lhs: Box::new(lhs), rhs: Box::new(rhs) }, TypeRef::Primitive(CoreType::Bool));
    let body = node(ExprKind::Block(Vec::new(), Some(Box::new(and_expr))), TypeRef::Primitive(CoreType::Bool));
    let sink = validate_via_crate(&mut krate, make_fn("and", TypeRef::Primitive(CoreType::Bool), body));
    assert!(!sink.has_errors());
}

#[test]
fn uniop_neg_resolves_through_the_neg_trait_impl() {
    let mut krate = lower(
        "trait Neg { type Output; fn neg(self) -> Self::Output; } struct S; impl Neg for S { type Output = S; fn neg(self) -> S { self } }",
    );
    let operand = node(ExprKind::Local(0), path_ty("S"));
    let neg = node(ExprKind::UniOp { op: UniOp::Neg, operand: Box::new(operand) }, path_ty("S"));
    let body = node(ExprKind::Block(Vec::new(), Some(Box::new(neg))), path_ty("S"));
    let sink = validate_via_crate(&mut krate, make_fn("neg_s", path_ty("S"), body));
    assert!(!sink.has_errors(), "{:?}", sink.diagnostics);
}

#[test]
fn compound_assign_resolves_through_the_add_assign_trait_impl() {
    let mut krate = lower("trait AddAssign { fn add_assign(&mut self, rhs: Self); } struct S; impl AddAssign for S { fn add_assign(&mut self, rhs: Self) {} }");
    let target = node(ExprKind::Local(0), path_ty("S"));
    let value = node(ExprKind::Local(1), path_ty("S"));
    let assign = node(ExprKind::Assign { op: Some(CompoundOp::Add), target: Box::new(target), value: Box::new(value) }, TypeRef::unit());
    let body = node(ExprKind::Block(Vec::new(), Some(Box::new(assign))), TypeRef::unit());
    let sink = validate_via_crate(&mut krate, make_fn("bump", TypeRef::unit(), body));
    assert!(!sink.has_errors(), "{:?}", sink.diagnostics);
}

#[test]
fn plain_assign_requires_equal_operand_types() {
    let mut krate = lower("fn placeholder() {}");
    let target = node(ExprKind::Local(0), TypeRef::Primitive(CoreType::I32));
    let value = node(ExprKind::Literal(hir::Literal::Bool(true)), TypeRef::Primitive(CoreType::Bool));
    let assign = node(ExprKind::Assign { op: None, target: Box::new(target), value: Box::new(value) }, TypeRef::unit());
    let body = node(ExprKind::Block(Vec::new(), Some(Box::new(assign))), TypeRef::unit());
    let sink = validate_via_crate(&mut krate, make_fn("bad", TypeRef::unit(), body));
    assert_eq!(sink.errors().count(), 1);
}

#[test]
fn borrow_result_type_must_be_a_matching_reference() {
    let mut krate = lower("fn placeholder() {}");
    let operand = node(ExprKind::Local(0), TypeRef::Primitive(CoreType::I32));
    let borrow_ty = TypeRef::Borrow { mutable: false, inner: Box::new(TypeRef::Primitive(CoreType::I32)) };
    let borrow = node(ExprKind::Borrow { mutable: false, operand: Box::new(operand) }, borrow_ty.clone());
    let body = node(ExprKind::Block(Vec::new(), Some(Box::new(borrow))), borrow_ty.clone());
    let sink = validate_via_crate(&mut krate, make_fn("borrow_it", borrow_ty, body));
    assert!(!sink.has_errors());
}

#[test]
fn primitive_to_primitive_cast_is_permitted() {
    let mut krate = lower("fn placeholder() {}");
    let value = node(
        ExprKind::Literal(hir::Literal::Int { value: 1, tag: fec_common::LiteralTypeTag::Explicit(CoreType::I32) }),
        TypeRef::Primitive(CoreType::I32),
    );
    let cast = node(ExprKind::Cast { value: Box::new(value), ty: TypeRef::Primitive(CoreType::I64) }, TypeRef::Primitive(CoreType::I64));
    let body = node(ExprKind::Block(Vec::new(), Some(Box::new(cast))), TypeRef::Primitive(CoreType::I64));
    let sink = validate_via_crate(&mut krate, make_fn("widen", TypeRef::Primitive(CoreType::I64), body));
    assert!(!sink.has_errors());
}

#[test]
fn reference_to_reference_cast_requires_equal_inner_types() {
    let mut krate = lower("fn placeholder() {}");
    let from_ty = TypeRef::Borrow { mutable: false, inner: Box::new(TypeRef::Primitive(CoreType::I32)) };
    let to_ty = TypeRef::Borrow { mutable: false, inner: Box::new(TypeRef::Primitive(CoreType::Bool)) };
    let value = node(ExprKind::Local(0), from_ty);
    let cast = node(ExprKind::Cast { value: Box::new(value), ty: to_ty.clone() }, to_ty.clone());
    let body = node(ExprKind::Block(Vec::new(), Some(Box::new(cast))), to_ty.clone());
    let sink = validate_via_crate(&mut krate, make_fn("bad_cast", to_ty, body));
    assert_eq!(sink.errors().count(), 1);
}

#[test]
fn tuple_variant_arity_must_match_the_enum_definition() {
    let mut krate = lower("enum E { A, B(i32) }");
    let path = Path::Generic(hir::GenericPath::simple(hir::SimplePath::new("test", vec!["E".to_string(), "B".to_string()])));
    let arg = node(
        ExprKind::Literal(hir::Literal::Int { value: 7, tag: fec_common::LiteralTypeTag::Explicit(CoreType::I32) }),
        TypeRef::Primitive(CoreType::I32),
    );
    let variant = node(ExprKind::TupleVariant { path, is_struct: false, args: vec![arg] }, path_ty("E"));
    let body = node(ExprKind::Block(Vec::new(), Some(Box::new(variant))), path_ty("E"));
    let sink = validate_via_crate(&mut krate, make_fn("make_b", path_ty("E"), body));
    assert!(!sink.has_errors(), "{:?}", sink.diagnostics);
}

#[test]
fn tuple_variant_with_wrong_arity_is_rejected() {
    let mut krate = lower("enum E { A, B(i32) }");
    let path = Path::Generic(hir::GenericPath::simple(hir::SimplePath::new("test", vec!["E".to_string(), "B".to_string()])));
    let variant = node(ExprKind::TupleVariant { path, is_struct: false, args: Vec::new() }, path_ty("E"));
    let body = node(ExprKind::Block(Vec::new(), Some(Box::new(variant))), path_ty("E"));
    let sink = validate_via_crate(&mut krate, make_fn("make_b", path_ty("E"), body));
    assert_eq!(sink.errors().count(), 1);
}

#[test]
fn struct_literal_field_types_are_checked_by_name() {
    let mut krate = lower("struct S { x: i32 }");
    let path = Path::Generic(hir::GenericPath::simple(hir::SimplePath::new("test", vec!["S".to_string()])));
    let field_value = node(
        ExprKind::Literal(hir::Literal::Int { value: 1, tag: fec_common::LiteralTypeTag::Explicit(CoreType::I32) }),
        TypeRef::Primitive(CoreType::I32),
    );
    let field = hir::StructLiteralField { name: "x".to_string(), value: Box::new(field_value) };
    let literal = node(ExprKind::StructLiteral { path, fields: vec![field], base: None }, path_ty("S"));
    let body = node(ExprKind::Block(Vec::new(), Some(Box::new(literal))), path_ty("S"));
    let sink = validate_via_crate(&mut krate, make_fn("make_s", path_ty("S"), body));
    assert!(!sink.has_errors(), "{:?}", sink.diagnostics);
}

#[test]
fn closure_body_must_equal_its_declared_return_type() {
    let mut krate = lower("fn placeholder() {}");
    let closure_body = node(ExprKind::Literal(hir::Literal::Bool(true)), TypeRef::Primitive(CoreType::I32));
    let closure = node(
        ExprKind::Closure { closure_ty: 0, params: Vec::new(), ret: TypeRef::Primitive(CoreType::Bool), body: Box::new(closure_body) },
        TypeRef::Closure(0),
    );
    let body = node(ExprKind::Block(Vec::new(), Some(Box::new(closure))), TypeRef::Closure(0));
    let sink = validate_via_crate(&mut krate, make_fn("bad_closure", TypeRef::Closure(0), body));
    assert_eq!(sink.errors().count(), 1);
}

#[test]
fn a_diverging_return_satisfies_every_type_equality_it_participates_in() {
    let mut krate = lower("fn placeholder() {}");
    let operand = node(ExprKind::Literal(hir::Literal::Bool(true)), TypeRef::Primitive(CoreType::Bool));
    let ret = node(ExprKind::Return(Box::new(operand)), TypeRef::Diverge);
    let tail = node(
        ExprKind::Literal(hir::Literal::Int { value: 1, tag: fec_common::LiteralTypeTag::Explicit(CoreType::I32) }),
        TypeRef::Primitive(CoreType::I32),
    );
    let block = node(ExprKind::Block(vec![hir::Stmt::Semi(ret)], Some(Box::new(tail))), TypeRef::Primitive(CoreType::I32));
    let sink = validate_via_crate(&mut krate, make_fn("early_return", TypeRef::Primitive(CoreType::Bool), block));
    assert!(!sink.has_errors());
}
