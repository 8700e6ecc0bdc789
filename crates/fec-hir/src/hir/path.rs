//! `HIR mirror types` for paths (spec.md sec 3 "HIR mirror types").
//!
//! Grounded on `mesh-typeck/src/ty.rs`'s closed-enum-plus-smart-constructor
//! shape, and on spec.md sec 9's note that the `TraitPath` back-pointer
//! should be "a separate auxiliary map `SimplePath -> TraitId`... rather
//! than a raw pointer": `TraitId` here is a thin newtype over the trait's
//! own `SimplePath`, since a trait's absolute path already uniquely locates
//! it in the module tree -- no numeric arena is needed for that lookup to be
//! O(1) via a side table.

use fec_common::Span;

use crate::hir::ty::TypeRef;

/// An absolute path with no generic arguments (spec.md GLOSSARY "SimplePath").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimplePath {
    pub krate: String,
    pub components: Vec<String>,
}

impl SimplePath {
    pub fn new(krate: impl Into<String>, components: Vec<String>) -> Self {
        Self { krate: krate.into(), components }
    }

    /// The crate root path (empty component list): spec.md sec 3's
    /// invariant carve-out "unless it denotes the crate root".
    pub fn crate_root(krate: impl Into<String>) -> Self {
        Self { krate: krate.into(), components: Vec::new() }
    }

    pub fn is_crate_root(&self) -> bool {
        self.components.is_empty()
    }

    pub fn join(&self, name: impl Into<String>) -> Self {
        let mut components = self.components.clone();
        components.push(name.into());
        Self { krate: self.krate.clone(), components }
    }

    pub fn last(&self) -> Option<&str> {
        self.components.last().map(String::as_str)
    }
}

impl std::fmt::Display for SimplePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "::{}", self.krate)?;
        for c in &self.components {
            write!(f, "::{c}")?;
        }
        Ok(())
    }
}

/// Ordered type arguments on the final segment of a `GenericPath`
/// (spec.md sec 3: "`PathParams(types)`" in the HIR mirror, narrower than
/// the AST's `PathParams` since lifetimes and associated-type bindings are
/// erased once a path is fully resolved).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathParams {
    pub types: Vec<TypeRef>,
}

/// A `SimplePath` plus the generic arguments on its final component.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericPath {
    pub base: SimplePath,
    pub params: PathParams,
}

impl GenericPath {
    pub fn simple(base: SimplePath) -> Self {
        Self { base, params: PathParams::default() }
    }
}

/// A thin, index-like identity for a trait: its own absolute path. Looked
/// up through `Crate::trait_index` rather than dereferenced directly, so it
/// never outlives the crate it was built from (spec.md sec 3 "Lifecycle").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TraitId(pub SimplePath);

/// A path to a trait, with HRTB binders and associated-type bounds
/// (`Iterator<Item = T>` as a bound, not a projection).
#[derive(Debug, Clone, PartialEq)]
pub struct TraitPath {
    pub path: GenericPath,
    pub hrls: Vec<String>,
    pub type_bounds: Vec<(String, TypeRef)>,
    /// Populated by the index-fixup pass (spec.md sec 3 "Lifecycle"); `None`
    /// until fixup runs, `bug` if fixup cannot resolve it.
    pub resolved_trait: Option<TraitId>,
    pub span: Span,
}

impl TraitPath {
    pub fn new(path: GenericPath, span: Span) -> Self {
        Self { path, hrls: Vec::new(), type_bounds: Vec::new(), resolved_trait: None, span }
    }
}

/// A fully resolved HIR path (spec.md sec 3 "HIR mirror types").
#[derive(Debug, Clone, PartialEq)]
pub enum Path {
    Generic(GenericPath),
    /// `<Type>::item`, no known trait.
    UfcsInherent { ty: Box<TypeRef>, item: String, params: PathParams },
    /// `<Type as Trait>::item`.
    UfcsKnown { ty: Box<TypeRef>, trait_: TraitPath, item: String, params: PathParams },
    /// `<Type>::item` where the owning trait is not yet known (ambiguous
    /// inherent-vs-trait dispatch, left for the validator/resolver to pick).
    UfcsUnknown { ty: Box<TypeRef>, item: String, params: PathParams },
}
