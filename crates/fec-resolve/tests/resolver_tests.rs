//! Integration tests for the `Resolver` contract (spec.md sec 4.6) run
//! against real lowered crates, same style as `fec-hir`'s lowering tests.

use fec_common::{DiagnosticBag, FileId, Sink, Span};
use fec_hir::hir;
use fec_resolve::{Resolver, TraitImplMatch};

fn lower(source: &str) -> hir::Crate {
    let mut sink = DiagnosticBag::new();
    let krate = fec_parser::parse_str(source, FileId::ROOT, &mut sink).expect("parse_str returned None without recording an error");
    assert!(!sink.has_errors(), "unexpected parse errors: {:?}", sink.diagnostics);
    fec_hir::lower_crate(krate, "test", &mut sink)
}

fn path_ty(name: &str) -> hir::TypeRef {
    hir::TypeRef::Path(hir::Path::Generic(hir::GenericPath::simple(hir::SimplePath::new("test", vec![name.to_string()]))))
}

#[test]
fn find_type_impls_matches_the_inherent_impl_by_receiver_type() {
    let krate = lower("struct S; impl S { fn n() -> i32 { 42 } }");
    let resolver = Resolver::new(&krate);
    let found = resolver.find_type_impls(&path_ty("S"), |t| t.clone(), |imp| imp.methods.get("n").map(|_| ()));
    assert_eq!(found, Some(()));
}

#[test]
fn find_type_impls_does_not_match_an_unrelated_type() {
    let krate = lower("struct S; struct Q; impl S { fn n() -> i32 { 42 } }");
    let resolver = Resolver::new(&krate);
    let found = resolver.find_type_impls(&path_ty("Q"), |t| t.clone(), |imp| imp.methods.get("n").map(|_| ()));
    assert_eq!(found, None);
}

#[test]
fn find_trait_impls_matches_a_positive_trait_impl() {
    let krate = lower("trait Greet { fn hi(&self); } struct S; impl Greet for S { fn hi(&self) {} }");
    let resolver = Resolver::new(&krate);
    let key = hir::SimplePath::new("test", vec!["Greet".to_string()]);
    let found = resolver.find_trait_impls(&key, &[], &path_ty("S"), |m| match m {
        TraitImplMatch::Trait(imp) => imp.methods.get("hi").map(|_| ()),
        TraitImplMatch::Marker(_) => None,
    });
    assert_eq!(found, Some(()));
}

#[test]
fn find_trait_impls_matches_a_marker_auto_impl() {
    let krate = lower("trait Marker {} struct S; impl Marker for S {}");
    let resolver = Resolver::new(&krate);
    let key = hir::SimplePath::new("test", vec!["Marker".to_string()]);
    let found = resolver.find_trait_impls(&key, &[], &path_ty("S"), |m| match m {
        TraitImplMatch::Marker(imp) => Some(imp.is_positive),
        TraitImplMatch::Trait(_) => None,
    });
    assert_eq!(found, Some(true));
}

#[test]
fn expand_associated_types_rewrites_a_resolvable_ufcs_known_projection() {
    let krate = lower(
        "trait Container { type Item; } struct S; impl Container for S { type Item = i32; } fn get() -> <S as Container>::Item { 0 }",
    );
    let resolver = Resolver::new(&krate);
    let hir::ValueItem::Function(f) = &krate.root.values["get"].item else {
        panic!("expected a lowered function named get");
    };
    assert!(matches!(f.ret, hir::TypeRef::Path(hir::Path::UfcsKnown { .. })), "expected the raw return type to still be a UFCS projection before expansion");
    let expanded = resolver.expand_associated_types(&f.ret);
    assert_eq!(expanded, hir::TypeRef::Primitive(fec_common::CoreType::I32));
}

#[test]
fn expand_associated_types_leaves_an_unresolvable_projection_untouched() {
    let krate = lower("trait Container { type Item; } struct S; fn want(x: <S as Container>::Item) { let _ = x; }");
    let resolver = Resolver::new(&krate);
    let hir::ValueItem::Function(f) = &krate.root.values["want"].item else {
        panic!("expected a lowered function named want");
    };
    let original = f.params[0].ty.clone();
    let expanded = resolver.expand_associated_types(&original);
    assert_eq!(expanded, original, "no impl provides Item for S, so the projection survives unchanged");
}

#[test]
fn get_lang_item_path_falls_back_to_the_default_table() {
    let krate = lower("fn main() {}");
    let resolver = Resolver::new(&krate);
    let mut sink = DiagnosticBag::new();
    let path = resolver.get_lang_item_path("add", &mut sink, Span::point(FileId::ROOT, 1, 1));
    assert_eq!(path, hir::SimplePath::new("core", vec!["ops".to_string(), "Add".to_string()]));
    assert!(!sink.has_errors());
}

#[test]
#[should_panic(expected = "compiler bug")]
fn get_lang_item_path_bugs_on_an_unknown_name() {
    let krate = lower("fn main() {}");
    let resolver = Resolver::new(&krate);
    let mut sink = DiagnosticBag::new();
    resolver.get_lang_item_path("not_a_real_lang_item", &mut sink, Span::point(FileId::ROOT, 1, 1));
}

#[test]
fn generics_guard_releases_its_scope_on_drop() {
    let krate = lower("fn main() {}");
    let mut resolver = Resolver::new(&krate);
    {
        let guard = resolver.set_impl_generics(vec!["T".to_string()]);
        assert_eq!(guard.in_scope_impl_generics(), &["T".to_string()]);
    }
    assert!(resolver.in_scope_impl_generics().is_empty());
}
