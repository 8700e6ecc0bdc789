//! The static trait resolver (C9, spec.md sec 4.6): the consumed contract
//! `fec-check`'s validator is built against. Grounded on
//! `mesh-typeck::traits::TraitRegistry` for the impl-lookup shape
//! (`has_impl`/`find_impl`/`find_impl_with_type_args`, structural matching
//! via a throwaway unifier per query) and on `mesh-typeck::unify::InferCtx`'s
//! `fn_return_type_stack` for the scoped-activation shape that
//! `set_impl_generics`/`set_item_generics` need.

use fec_common::{Sink, Span};
use fec_hir::hir;

use crate::lang_items;
use crate::unify::Unifier;

/// A matched trait impl, positive or negative/marker (spec.md sec 4.6
/// `find_trait_impls`: "iterates trait impls, bounds, and auto-impls").
pub enum TraitImplMatch<'a> {
    Trait(&'a hir::TraitImpl),
    Marker(&'a hir::MarkerImpl),
}

enum GenericsScope {
    Impl,
    Item,
}

/// Releases the generics scope it was created from on drop, from whichever
/// exit path runs first (spec.md sec 4.6: "return a guard whose release
/// restores the previous scope"; sec 9 "Visitor control flow": "must release
/// every push on every exit path... Model as RAII-style scope guards").
pub struct GenericsGuard<'r, 'a> {
    resolver: &'r mut Resolver<'a>,
    scope: GenericsScope,
}

impl<'a> std::ops::Deref for GenericsGuard<'_, 'a> {
    type Target = Resolver<'a>;

    fn deref(&self) -> &Resolver<'a> {
        self.resolver
    }
}

impl<'a> std::ops::DerefMut for GenericsGuard<'_, 'a> {
    fn deref_mut(&mut self) -> &mut Resolver<'a> {
        self.resolver
    }
}

impl Drop for GenericsGuard<'_, '_> {
    fn drop(&mut self) {
        match self.scope {
            GenericsScope::Impl => {
                self.resolver.impl_generics.pop();
            }
            GenericsScope::Item => {
                self.resolver.item_generics.pop();
            }
        }
    }
}

pub struct Resolver<'a> {
    crate_ref: &'a hir::Crate,
    default_lang_items: rustc_hash::FxHashMap<String, hir::SimplePath>,
    impl_generics: Vec<Vec<String>>,
    item_generics: Vec<Vec<String>>,
}

impl<'a> Resolver<'a> {
    pub fn new(crate_ref: &'a hir::Crate) -> Self {
        Self {
            crate_ref,
            default_lang_items: lang_items::default_table(),
            impl_generics: Vec::new(),
            item_generics: Vec::new(),
        }
    }

    pub fn crate_ref(&self) -> &'a hir::Crate {
        self.crate_ref
    }

    /// Activate `params` as the in-scope generics for the impl block being
    /// visited. Released when the returned guard drops.
    pub fn set_impl_generics(&mut self, params: Vec<String>) -> GenericsGuard<'_, 'a> {
        self.impl_generics.push(params);
        GenericsGuard { resolver: self, scope: GenericsScope::Impl }
    }

    /// Activate `params` as the in-scope generics for the item (function,
    /// struct, ...) being visited. Released when the returned guard drops.
    pub fn set_item_generics(&mut self, params: Vec<String>) -> GenericsGuard<'_, 'a> {
        self.item_generics.push(params);
        GenericsGuard { resolver: self, scope: GenericsScope::Item }
    }

    pub fn in_scope_impl_generics(&self) -> &[String] {
        self.impl_generics.last().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn in_scope_item_generics(&self) -> &[String] {
        self.item_generics.last().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolve a lang-item name to its defining path. The crate's own
    /// `lang_items` table (populated from `#[lang = "..."]` attributes, were
    /// attribute lowering implemented) takes priority over the built-in
    /// default table; an unknown name is a bug (spec.md sec 4.6).
    pub fn get_lang_item_path(&self, name: &str, sink: &mut dyn Sink, span: Span) -> hir::SimplePath {
        if let Some(path) = self.crate_ref.lang_items.get(name) {
            return path.clone();
        }
        if let Some(path) = self.default_lang_items.get(name) {
            return path.clone();
        }
        sink.bug(span, format!("unknown lang item `{name}`"))
    }

    /// Iterate trait impls (and marker/auto-impls) of `trait_path`, calling
    /// `callback` on each whose implementor structurally unifies with `ty`
    /// and whose trait type arguments unify with `trait_args`. Returns the
    /// first non-`None` result (spec.md sec 4.6: "returns the first that
    /// matches").
    pub fn find_trait_impls<T>(
        &self,
        trait_path: &hir::SimplePath,
        trait_args: &[hir::TypeRef],
        ty: &hir::TypeRef,
        mut callback: impl FnMut(TraitImplMatch<'_>) -> Option<T>,
    ) -> Option<T> {
        if let Some(impls) = self.crate_ref.trait_impls.get(trait_path) {
            for imp in impls {
                let mut u = Unifier::new();
                let fresh_implementor = u.freshen(&imp.implementor);
                if !u.unify(&fresh_implementor, ty) {
                    continue;
                }
                let stored_args = &imp.trait_args.path.params.types;
                if stored_args.len() != trait_args.len() {
                    continue;
                }
                let args_match = stored_args.iter().zip(trait_args).all(|(stored, query)| {
                    let fresh = u.freshen(stored);
                    u.unify(&fresh, query)
                });
                if !args_match {
                    continue;
                }
                if let Some(result) = callback(TraitImplMatch::Trait(imp)) {
                    return Some(result);
                }
            }
        }
        if let Some(impls) = self.crate_ref.marker_impls.get(trait_path) {
            for imp in impls {
                let mut u = Unifier::new();
                let fresh_implementor = u.freshen(&imp.implementor);
                if !u.unify(&fresh_implementor, ty) {
                    continue;
                }
                if let Some(result) = callback(TraitImplMatch::Marker(imp)) {
                    return Some(result);
                }
            }
        }
        None
    }

    /// Iterate inherent impls whose receiver type unifies with `ty` (after
    /// `resolve_cb` has a chance to normalize outstanding inference
    /// variables the resolver itself does not own).
    pub fn find_type_impls<T>(
        &self,
        ty: &hir::TypeRef,
        resolve_cb: impl Fn(&hir::TypeRef) -> hir::TypeRef,
        mut callback: impl FnMut(&hir::TypeImpl) -> Option<T>,
    ) -> Option<T> {
        let ty = resolve_cb(ty);
        for imp in &self.crate_ref.type_impls {
            let mut u = Unifier::new();
            let fresh_implementor = u.freshen(&imp.implementor);
            if u.unify(&fresh_implementor, &ty) {
                if let Some(result) = callback(imp) {
                    return Some(result);
                }
            }
        }
        None
    }

    /// Rewrite `UfcsKnown` projections reachable from `ty` to their concrete
    /// form wherever the owning impl's associated-type binding is known
    /// (spec.md sec 4.6 `expand_associated_types`). Unresolvable projections
    /// are left as-is; the validator treats a surviving `UfcsKnown` as an
    /// unresolved associated type.
    pub fn expand_associated_types(&self, ty: &hir::TypeRef) -> hir::TypeRef {
        use hir::{Path, TypeRef};
        match ty {
            TypeRef::Path(Path::UfcsKnown { ty: self_ty, trait_, item, .. }) => {
                let expanded_self = self.expand_associated_types(self_ty);
                let Some(hir::TraitId(trait_path)) = &trait_.resolved_trait else {
                    return ty.clone();
                };
                let found = self.find_trait_impls(trait_path, &[], &expanded_self, |m| match m {
                    TraitImplMatch::Trait(imp) => imp.types.get(item).map(|bound| bound.ty.clone()),
                    TraitImplMatch::Marker(_) => None,
                });
                match found {
                    Some(concrete) => self.expand_associated_types(&concrete),
                    None => ty.clone(),
                }
            }
            TypeRef::Tuple(elems) => TypeRef::Tuple(elems.iter().map(|e| self.expand_associated_types(e)).collect()),
            TypeRef::Slice(inner) => TypeRef::Slice(Box::new(self.expand_associated_types(inner))),
            TypeRef::Array { inner, len_expr, resolved_len } => TypeRef::Array {
                inner: Box::new(self.expand_associated_types(inner)),
                len_expr: len_expr.clone(),
                resolved_len: *resolved_len,
            },
            TypeRef::Borrow { mutable, inner } => TypeRef::Borrow { mutable: *mutable, inner: Box::new(self.expand_associated_types(inner)) },
            TypeRef::Pointer { mutable, inner } => TypeRef::Pointer { mutable: *mutable, inner: Box::new(self.expand_associated_types(inner)) },
            other => other.clone(),
        }
    }
}
