//! AST->HIR lowering integration tests (spec.md sec 8 "Lowering" testable
//! properties): desugaring shapes, the synthesized `Self: ThisTrait` bound,
//! loop divergence, call-site reclassification and impl indexing.

use fec_common::{DiagnosticBag, FileId};
use fec_hir::hir;
use fec_hir::lower_crate;

fn lower(source: &str) -> hir::Crate {
    let mut sink = DiagnosticBag::new();
    let krate = fec_parser::parse_str(source, FileId::ROOT, &mut sink).expect("parse_str returned None without recording an error");
    assert!(!sink.has_errors(), "unexpected parse errors: {:?}", sink.diagnostics);
    lower_crate(krate, "test", &mut sink)
}

fn main_body(krate: &hir::Crate) -> &hir::ExprNode {
    match krate.root.values.get("main") {
        Some(hir::ValueEntry { item: hir::ValueItem::Function(f), .. }) => f.body.as_ref().expect("fn main has a body"),
        other => panic!("expected fn main in the crate root, found {other:?}"),
    }
}

/// The sole statement of a block, whether it surfaced as the tail
/// expression (no trailing `;`) or as a `Stmt`.
fn single_expr(body: &hir::ExprNode) -> &hir::ExprKind {
    match &body.kind {
        hir::ExprKind::Block(stmts, tail) => match tail {
            Some(t) => &t.kind,
            None => match stmts.last().expect("expected at least one statement") {
                hir::Stmt::Expr(e) | hir::Stmt::Semi(e) => &e.kind,
            },
        },
        other => other,
    }
}

fn nth_stmt(body: &hir::ExprNode, index: usize) -> &hir::ExprKind {
    match &body.kind {
        hir::ExprKind::Block(stmts, _) => match &stmts[index] {
            hir::Stmt::Expr(e) | hir::Stmt::Semi(e) => &e.kind,
        },
        other => panic!("expected a block, got {other:?}"),
    }
}

// ── `while`/`while let` desugaring (spec.md sec 4.4 rules 1-2) ─────────────

#[test]
fn while_desugars_to_loop_with_conditional_break() {
    let krate = lower("fn main() { while true { } }");
    let body = main_body(&krate);
    let hir::ExprKind::Loop { body, result_ty, .. } = single_expr(body) else {
        panic!("expected `while` to desugar to a Loop");
    };
    assert_eq!(body.len(), 1, "the loop body is the single desugared `if`");
    let hir::Stmt::Expr(if_expr) | hir::Stmt::Semi(if_expr) = &body[0] else { unreachable!() };
    let hir::ExprKind::If { else_branch, .. } = &if_expr.kind else {
        panic!("expected the loop body to be an `if`, got {:?}", if_expr.kind);
    };
    let Some(else_branch) = else_branch else {
        panic!("expected the desugared `if` to have an `else { break }`");
    };
    assert!(matches!(else_branch.kind, hir::ExprKind::Break { label: None }));
    // the synthesized `break` lives in the loop's own body, so it does not diverge.
    assert!(result_ty.is_unit());
}

#[test]
fn while_let_desugars_to_loop_with_match() {
    let krate = lower("fn main() { let mut o = 1; while let x = o { o = x; }; }");
    let body = main_body(&krate);
    let hir::ExprKind::Loop { body, .. } = nth_stmt(body, 1) else {
        panic!("expected `while let` to desugar to a Loop");
    };
    let hir::Stmt::Expr(match_expr) | hir::Stmt::Semi(match_expr) = &body[0] else { unreachable!() };
    let hir::ExprKind::Match { arms, .. } = &match_expr.kind else {
        panic!("expected the loop body to be a Match, got {:?}", match_expr.kind);
    };
    assert_eq!(arms.len(), 2, "one arm for the pattern, one catch-all `break`");
    assert!(matches!(arms[1].pattern.kind, hir::PatternKind::Any));
    assert!(matches!(arms[1].body.kind, hir::ExprKind::Break { label: None }));
}

// ── `if let` desugaring (spec.md sec 4.4 rule 3) ───────────────────────────

#[test]
fn if_let_desugars_to_two_arm_match() {
    let krate = lower("fn main() { let o = 1; if let x = o { x; } else { 0; }; }");
    let body = main_body(&krate);
    let hir::ExprKind::Match { arms, .. } = nth_stmt(body, 1) else {
        panic!("expected `if let` to desugar to a Match");
    };
    assert_eq!(arms.len(), 2);
    assert!(matches!(arms[1].pattern.kind, hir::PatternKind::Any), "the else-branch arm matches anything");
}

// ── Loop divergence (spec.md sec 4.4, final bullet) ────────────────────────

#[test]
fn loop_with_no_break_diverges() {
    let krate = lower("fn main() { loop { let x = 1; } }");
    let body = main_body(&krate);
    let hir::ExprKind::Loop { result_ty, .. } = single_expr(body) else {
        panic!("expected a Loop");
    };
    assert_eq!(*result_ty, hir::TypeRef::Diverge);
}

#[test]
fn loop_with_break_stays_unit() {
    let krate = lower("fn main() { loop { break; } }");
    let body = main_body(&krate);
    let hir::ExprKind::Loop { result_ty, .. } = single_expr(body) else {
        panic!("expected a Loop");
    };
    assert!(result_ty.is_unit());
}

#[test]
fn labeled_break_in_nested_loop_does_not_save_the_outer_loop() {
    let krate = lower("fn main() { 'outer: loop { loop { break; } } }");
    let body = main_body(&krate);
    let hir::ExprKind::Loop { label, result_ty, .. } = single_expr(body) else {
        panic!("expected the outer Loop");
    };
    assert_eq!(label.as_deref(), Some("outer"));
    assert_eq!(*result_ty, hir::TypeRef::Diverge, "the inner loop's break targets itself, not 'outer");
}

// ── Trait lowering: synthesized `Self: ThisTrait` bound (spec.md sec 3) ────

#[test]
fn trait_bounds_start_with_synthesized_self_bound() {
    let krate = lower("trait Greet { fn hi(&self); }");
    let Some(hir::TypeEntry { item: hir::TypeItem::Trait(t), .. }) = krate.root.types.get("Greet") else {
        panic!("expected a lowered trait named Greet");
    };
    let first = t.bounds.first().expect("bounds must be non-empty");
    assert_eq!(first.ty, hir::TypeRef::Generic { name: "Self".to_string(), index: 0 });
    assert_eq!(first.trait_.path.base, hir::SimplePath::new("test", vec!["Greet".to_string()]));
    assert_eq!(first.trait_.resolved_trait, Some(hir::TraitId(hir::SimplePath::new("test", vec!["Greet".to_string()]))), "index-fixup must resolve it");
}

// ── Call-site reclassification (spec.md sec 4.4 "Calls") ───────────────────

#[test]
fn call_to_a_local_variable_becomes_call_value() {
    let krate = lower("fn main() { let f = 1; f(2); }");
    let body = main_body(&krate);
    assert!(matches!(nth_stmt(body, 1), hir::ExprKind::CallValue { .. }));
}

#[test]
fn call_to_a_tuple_struct_constructor_becomes_tuple_variant() {
    let krate = lower("struct Point(i32, i32); fn main() { Point(1, 2); }");
    let body = main_body(&krate);
    let hir::ExprKind::TupleVariant { is_struct, args, .. } = single_expr(body) else {
        panic!("expected a TupleVariant call");
    };
    assert!(*is_struct);
    assert_eq!(args.len(), 2);
}

// ── Impl indexing (spec.md sec 4.4 item 6) ─────────────────────────────────

#[test]
fn empty_marker_trait_impl_is_indexed_as_a_marker_impl() {
    let krate = lower("trait Marker {} struct S; impl Marker for S {}");
    let key = hir::SimplePath::new("test", vec!["Marker".to_string()]);
    assert!(krate.trait_impls.get(&key).is_none() || krate.trait_impls[&key].is_empty());
    let impls = krate.marker_impls.get(&key).expect("Marker impl for S must be indexed");
    assert_eq!(impls.len(), 1);
    assert!(impls[0].is_positive);
}

#[test]
fn non_empty_trait_impl_is_indexed_as_a_trait_impl() {
    let krate = lower("trait Greet { fn hi(&self); } struct S; impl Greet for S { fn hi(&self) {} }");
    let key = hir::SimplePath::new("test", vec!["Greet".to_string()]);
    let impls = krate.trait_impls.get(&key).expect("Greet impl for S must be indexed");
    assert_eq!(impls.len(), 1);
    assert!(impls[0].methods.contains_key("hi"));
}

#[test]
fn inherent_impl_is_indexed_by_type() {
    let krate = lower("struct S; impl S { fn new() -> S { S } }");
    assert_eq!(krate.type_impls.len(), 1);
    assert!(krate.type_impls[0].methods.contains_key("new"));
}
