//! Parser integration tests (spec.md sec 8 "Parser" testable properties).

use fec_common::{DiagnosticBag, FileId};
use fec_parser::ast::{ExprKind, ItemKind, Literal, Path, PatternKind, StructBody, TypeRef, UseTree};
use fec_parser::parse_str;

fn parse(source: &str) -> fec_parser::ast::Crate {
    let mut sink = DiagnosticBag::new();
    let krate = parse_str(source, FileId::ROOT, &mut sink);
    assert!(!sink.has_errors(), "unexpected parse errors: {:?}", sink.diagnostics);
    krate.expect("parse_str returned None without recording an error")
}

fn only_item(source: &str) -> ItemKind {
    let krate = parse(source);
    assert_eq!(krate.items.len(), 1, "expected exactly one item in {source:?}");
    krate.items.into_iter().next().unwrap().kind
}

// ── Span contiguity (spec.md sec 8: "span for every node is a contiguous
// substring of the input") ─────────────────────────────────────────────────

#[test]
fn item_span_covers_the_whole_declaration() {
    let krate = parse("fn main() { let x: i32 = 1 + 2; }");
    let item = &krate.items[0];
    assert_eq!(item.span.start_line, 1);
    assert_eq!(item.span.start_col, 1);
    // "fn main() { let x: i32 = 1 + 2; }" is 34 bytes; end_col is one past
    // the last consumed byte.
    assert_eq!(item.span.end_col as usize, "fn main() { let x: i32 = 1 + 2; }".len() + 1);
}

#[test]
fn nested_expr_span_is_contained_within_its_statement() {
    let ItemKind::Function(f) = only_item("fn main() { let x: i32 = 1 + 2; }") else {
        panic!("expected a function item");
    };
    let body = f.body.expect("fn main has a body");
    let fec_parser::ast::Stmt::Semi(let_expr) = &body[0] else {
        panic!("expected the `let` to be a statement");
    };
    let ExprKind::Let { value, .. } = &let_expr.kind else {
        panic!("expected ExprKind::Let");
    };
    assert!(value.span.start_line >= let_expr.span.start_line);
    assert!(value.span.end_col <= let_expr.span.end_col || value.span.end_line < let_expr.span.end_line);
}

// ── Path forms (spec.md sec 8) ──────────────────────────────────────────────

#[test]
fn absolute_path_form() {
    let ItemKind::Use(decl) = only_item("use ::core::mem::swap;") else {
        panic!("expected a use item");
    };
    let UseTree::Simple { path, .. } = decl.tree else {
        panic!("expected a simple use tree");
    };
    match path.path {
        Path::Absolute { crate_name, nodes } => {
            assert_eq!(crate_name, "core");
            assert_eq!(nodes.iter().map(|n| n.name.as_str()).collect::<Vec<_>>(), vec!["mem", "swap"]);
        }
        other => panic!("expected Path::Absolute, got {other:?}"),
    }
}

#[test]
fn self_path_form() {
    let ItemKind::Use(decl) = only_item("use self::m;") else {
        panic!("expected a use item");
    };
    let UseTree::Simple { path, .. } = decl.tree else {
        panic!("expected a simple use tree");
    };
    match path.path {
        Path::SelfPath(nodes) => assert_eq!(nodes.iter().map(|n| n.name.as_str()).collect::<Vec<_>>(), vec!["m"]),
        other => panic!("expected Path::SelfPath, got {other:?}"),
    }
}

#[test]
fn super_path_form() {
    let ItemKind::Use(decl) = only_item("use super::super::x;") else {
        panic!("expected a use item");
    };
    let UseTree::Simple { path, .. } = decl.tree else {
        panic!("expected a simple use tree");
    };
    match path.path {
        Path::Super { count, nodes } => {
            assert_eq!(count, 2);
            assert_eq!(nodes.iter().map(|n| n.name.as_str()).collect::<Vec<_>>(), vec!["x"]);
        }
        other => panic!("expected Path::Super, got {other:?}"),
    }
}

#[test]
fn ufcs_path_form() {
    let ItemKind::Function(f) = only_item("fn call() -> i32 { <S as T>::item() }") else {
        panic!("expected a function item");
    };
    let body = f.body.unwrap();
    let fec_parser::ast::Stmt::Expr(expr) = &body[0] else {
        panic!("expected a tail expression");
    };
    let ExprKind::CallPath { path, .. } = &expr.kind else {
        panic!("expected a CallPath, got {:?}", expr.kind);
    };
    match &path.path {
        Path::Ufcs { trait_, nodes, .. } => {
            assert!(trait_.is_some());
            assert_eq!(nodes.iter().map(|n| n.name.as_str()).collect::<Vec<_>>(), vec!["item"]);
        }
        other => panic!("expected Path::Ufcs, got {other:?}"),
    }
}

// ── Generics round-trip (spec.md sec 8: "Generics without bounds
// round-trip... to an equivalent AST") ──────────────────────────────────────

#[test]
fn generics_without_bounds_round_trip() {
    let ItemKind::Struct(def) = only_item("struct Pair<A, B> { a: A, b: B }") else {
        panic!("expected a struct item");
    };
    let names: Vec<_> = def.generics.params.iter().map(|p| p.name.clone()).collect();
    assert_eq!(names, vec!["A", "B"]);
    let StructBody::Named(fields) = &def.body else {
        panic!("expected named fields");
    };
    assert_eq!(fields.len(), 2);
    for (field, expected) in fields.iter().zip(["A", "B"]) {
        let TypeRef::Path(path) = &field.ty.kind else {
            panic!("expected a path type for field {field:?}");
        };
        match &path.path {
            Path::Relative(nodes) => assert_eq!(nodes[0].name, expected),
            other => panic!("expected Path::Relative, got {other:?}"),
        }
    }
}

// ── No-struct-literal-in-condition-position ────────────────────────────────

#[test]
fn if_condition_does_not_swallow_struct_literal() {
    let ItemKind::Function(f) = only_item("struct S { x: i32 } fn f(flag: bool) -> i32 { if flag { 1 } else { 2 } }") else {
        unreachable!()
    };
    let _ = f;
    // A second, sharper case: `if (S { x: 1 }).x == 1 { }` requires the
    // struct literal to be legal again inside parens even though it's
    // nested in an `if` condition.
    let krate = parse("struct S { x: i32 } fn g() -> i32 { if (S { x: 1 }).x == 1 { 0 } else { 1 } }");
    assert_eq!(krate.items.len(), 2);
}

// ── Items: functions, structs, enums, traits, impls ────────────────────────

#[test]
fn const_fn_and_extern_fn_parse_as_functions_not_const_or_extern_items() {
    let ItemKind::Function(f) = only_item("const fn zero() -> i32 { 0 }") else {
        panic!("expected `const fn` to parse as a Function item");
    };
    assert!(f.is_const);
    assert!(!f.is_async);

    let ItemKind::Function(f) = only_item(r#"extern "C" fn raw(x: i32) -> i32;"#) else {
        panic!("expected `extern \"C\" fn` to parse as a Function item");
    };
    assert_eq!(f.abi.as_deref(), Some("C"));
    assert!(f.body.is_none());
}

#[test]
fn extern_crate_and_extern_block_still_parse() {
    let ItemKind::ExternCrate(decl) = only_item("extern crate alloc;") else {
        panic!("expected an extern crate declaration");
    };
    assert_eq!(decl.name, "alloc");

    let ItemKind::ExternBlock(block) = only_item(r#"extern "C" { fn puts(s: *const i32); }"#) else {
        panic!("expected an extern block");
    };
    assert_eq!(block.abi.as_deref(), Some("C"));
    assert_eq!(block.items.len(), 1);
}

#[test]
fn plain_const_item_still_parses() {
    let ItemKind::Const(def) = only_item("const ZERO: i32 = 0;") else {
        panic!("expected a const item");
    };
    assert_eq!(def.name, "ZERO");
}

#[test]
fn tuple_struct_with_where_clause() {
    let ItemKind::Struct(def) = only_item("struct Wrapper<T>(T) where T: Clone;") else {
        panic!("expected a tuple struct");
    };
    assert_eq!(def.where_clause.predicates.len(), 1);
    let StructBody::Tuple(fields) = &def.body else {
        panic!("expected a tuple body");
    };
    assert_eq!(fields.len(), 1);
}

#[test]
fn enum_variants_in_declaration_order() {
    let ItemKind::Enum(def) = only_item("enum E { A, B(i32), C { x: i32 } }") else {
        panic!("expected an enum item");
    };
    assert_eq!(def.variants.iter().map(|v| v.name.as_str()).collect::<Vec<_>>(), vec!["A", "B", "C"]);
}

#[test]
fn marker_trait_has_no_items() {
    let ItemKind::Trait(def) = only_item("trait Marker {}") else {
        panic!("expected a trait item");
    };
    assert!(def.is_marker);
    assert!(def.items.is_empty());
}

#[test]
fn trait_with_associated_type_is_not_a_marker() {
    let ItemKind::Trait(def) = only_item("trait T { type A; fn f(&self) -> Self::A; }") else {
        panic!("expected a trait item");
    };
    assert!(!def.is_marker);
    assert_eq!(def.items.len(), 2);
}

#[test]
fn impl_for_extracts_trait_path_and_self_type() {
    let ItemKind::Impl(def) = only_item("impl Clone for S { fn clone(&self) -> Self { Self } }") else {
        panic!("expected an impl item");
    };
    assert!(def.trait_.is_some());
    let TypeRef::Path(self_path) = &def.self_ty.kind else {
        panic!("expected a path self-type");
    };
    match &self_path.path {
        Path::Relative(nodes) => assert_eq!(nodes[0].name, "S"),
        other => panic!("expected Path::Relative, got {other:?}"),
    }
}

#[test]
fn inherent_impl_has_no_trait_path() {
    let ItemKind::Impl(def) = only_item("impl S { fn n() -> i32 { 42 } }") else {
        panic!("expected an impl item");
    };
    assert!(def.trait_.is_none());
}

// ── Expressions: precedence, assignment, compound ops ──────────────────────

#[test]
fn binop_precedence_groups_multiplication_before_addition() {
    let ItemKind::Function(f) = only_item("fn f() -> i32 { 1 + 2 * 3 }") else {
        unreachable!()
    };
    let body = f.body.unwrap();
    let fec_parser::ast::Stmt::Expr(expr) = &body[0] else {
        panic!("expected tail expression");
    };
    let ExprKind::BinOp { op: fec_parser::ast::BinOp::Add, rhs, .. } = &expr.kind else {
        panic!("expected top-level Add, got {:?}", expr.kind);
    };
    assert!(matches!(rhs.kind, ExprKind::BinOp { op: fec_parser::ast::BinOp::Mul, .. }));
}

#[test]
fn compound_assign_carries_its_operator() {
    let ItemKind::Function(f) = only_item("fn f() { let mut x = 0i32; x += 1; }") else {
        unreachable!()
    };
    let body = f.body.unwrap();
    let fec_parser::ast::Stmt::Semi(expr) = &body[1] else {
        panic!("expected the `+=` to be a statement");
    };
    let ExprKind::Assign { op, .. } = &expr.kind else {
        panic!("expected ExprKind::Assign, got {:?}", expr.kind);
    };
    assert_eq!(*op, Some(fec_parser::ast::CompoundOp::Add));
}

#[test]
fn tuple_variant_call_lowers_args_in_order() {
    let ItemKind::Function(f) = only_item("fn f() -> E { E::B(7) }") else {
        unreachable!()
    };
    let body = f.body.unwrap();
    let fec_parser::ast::Stmt::Expr(expr) = &body[0] else {
        panic!("expected tail expression");
    };
    let ExprKind::CallPath { args, .. } = &expr.kind else {
        panic!("expected a CallPath, got {:?}", expr.kind);
    };
    assert_eq!(args.len(), 1);
    assert!(matches!(args[0].kind, ExprKind::Literal(Literal::Int { value: 7, .. })));
}

#[test]
fn string_byte_string_and_char_literals() {
    let ItemKind::Function(f) = only_item(r#"fn f() { let s = "hi"; let b = b"hi"; let c = 'x'; }"#) else {
        unreachable!()
    };
    let body = f.body.unwrap();
    let lit = |stmt: &fec_parser::ast::Stmt| -> Literal {
        let fec_parser::ast::Stmt::Semi(expr) = stmt else {
            panic!("expected a `let` statement");
        };
        let ExprKind::Let { value, .. } = &expr.kind else {
            panic!("expected ExprKind::Let");
        };
        let ExprKind::Literal(lit) = &value.kind else {
            panic!("expected a literal value");
        };
        lit.clone()
    };
    assert_eq!(lit(&body[0]), Literal::Str("hi".to_string()));
    assert_eq!(lit(&body[1]), Literal::ByteStr(vec![0x68, 0x69]));
    assert_eq!(lit(&body[2]), Literal::Char('x'));
}

// ── Patterns ─────────────────────────────────────────────────────────────

#[test]
fn name_at_subpattern_binding() {
    let ItemKind::Function(f) = only_item("fn f(n: i32) { match n { x @ 0 => {}, _ => {} } }") else {
        unreachable!()
    };
    let body = f.body.unwrap();
    let fec_parser::ast::Stmt::Expr(expr) = &body[0] else {
        panic!("expected a match expression");
    };
    let ExprKind::Match { arms, .. } = &expr.kind else {
        panic!("expected ExprKind::Match, got {:?}", expr.kind);
    };
    let first = &arms[0].pattern;
    let binding = first.binding.as_ref().expect("expected a binding on `x @ 0`");
    assert_eq!(binding.name, "x");
    assert!(matches!(first.kind, PatternKind::Value { .. }));
}

// ── Self-params ─────────────────────────────────────────────────────────────

#[test]
fn ref_self_is_distinguished_from_a_reference_parameter() {
    let ItemKind::Impl(def) = only_item("impl S { fn m(&self, other: &S) -> i32 { 0 } }") else {
        unreachable!()
    };
    let ItemKind::Function(f) = &def.items[0].kind else {
        panic!("expected a function in the impl block");
    };
    assert!(matches!(f.self_param, fec_parser::ast::SelfParam::Ref { mutable: false, lifetime: None }));
    assert_eq!(f.params.len(), 1);
}
