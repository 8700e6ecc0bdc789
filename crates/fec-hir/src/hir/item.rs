//! `HIR.Module`, `HIR.Trait`, `HIR.Enum`/`Struct`, the three impl kinds, and
//! `HIR.Crate` (spec.md sec 3).

use rustc_hash::FxHashMap;

use fec_common::Span;

use crate::hir::expr::ExprNode;
use crate::hir::path::{SimplePath, TraitId, TraitPath};
use crate::hir::pattern::Pattern;
use crate::hir::ty::TypeRef;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Repr {
    Rust,
    C,
    U8,
    U16,
    U32,
    Packed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenericParamKind {
    Lifetime,
    Type { bounds: Vec<TraitPath> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenericParam {
    pub name: String,
    pub kind: GenericParamKind,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Generics {
    pub params: Vec<GenericParam>,
}

/// A bound on a generic parameter (or, for a trait's implicit `Self`
/// materialization, on the trait's own `Self` type -- spec.md sec 3: "The
/// HIR invariant `GenericParams.m_bounds` for a trait always starts with
/// `Self: ThisTrait` once lowered"). `ty` is `TypeRef::Generic { name:
/// "Self", .. }` for that synthesized entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TraitBound {
    pub ty: TypeRef,
    pub trait_: TraitPath,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub pattern: Pattern,
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub is_unsafe: bool,
    pub is_const: bool,
    pub is_async: bool,
    pub abi: Option<String>,
    pub generics: Generics,
    pub params: Vec<Param>,
    pub ret: TypeRef,
    /// `None` for a trait method with no default body.
    pub body: Option<ExprNode>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub name: String,
    pub ty: TypeRef,
    pub value: ExprNode,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Static {
    pub name: String,
    pub mutable: bool,
    pub ty: TypeRef,
    pub value: ExprNode,
    pub span: Span,
}

// ── Structs & enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: Option<String>,
    pub ty: TypeRef,
    pub public: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StructBody {
    Unit,
    Tuple(Vec<Field>),
    Named(Vec<Field>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Struct {
    pub name: String,
    pub generics: Generics,
    pub repr: Repr,
    pub body: StructBody,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VariantBody {
    Unit,
    Value(ExprNode),
    Tuple(Vec<Field>),
    Struct(Vec<Field>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumVariant {
    pub name: String,
    pub body: VariantBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enum {
    pub name: String,
    pub generics: Generics,
    pub repr: Repr,
    pub variants: Vec<EnumVariant>,
    pub span: Span,
}

// ── Traits ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct AssociatedType {
    pub name: String,
    pub bounds: Vec<TraitPath>,
    pub default: Option<TypeRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TraitValue {
    Constant(Constant),
    Static(Static),
    Function(Function),
    /// An associated const/fn declared but not given a default.
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trait {
    pub name: String,
    pub generics: Generics,
    pub self_lifetime: Option<String>,
    pub parents: Vec<TraitPath>,
    pub is_marker: bool,
    /// First entry is always the synthesized `Self: ThisTrait` bound
    /// (spec.md sec 3 invariant).
    pub bounds: Vec<TraitBound>,
    pub types: FxHashMap<String, AssociatedType>,
    pub values: FxHashMap<String, TraitValue>,
    pub span: Span,
}

// ── Impls ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct TraitImplMethod {
    pub function: Function,
    pub specialisable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraitImplConstant {
    pub constant: Constant,
    pub specialisable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraitImplType {
    pub ty: TypeRef,
    pub specialisable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraitImpl {
    pub generics: Generics,
    pub trait_args: TraitPath,
    pub implementor: TypeRef,
    pub methods: FxHashMap<String, TraitImplMethod>,
    pub constants: FxHashMap<String, TraitImplConstant>,
    pub types: FxHashMap<String, TraitImplType>,
    pub source_module: SimplePath,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeImplMethod {
    pub function: Function,
    pub public: bool,
    pub specialisable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeImpl {
    pub generics: Generics,
    pub implementor: TypeRef,
    pub methods: FxHashMap<String, TypeImplMethod>,
    pub source_module: SimplePath,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerImpl {
    pub generics: Generics,
    pub trait_args: TraitPath,
    pub is_positive: bool,
    pub implementor: TypeRef,
    pub source_module: SimplePath,
    pub span: Span,
}

// ── Modules ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ValueItem {
    Import(SimplePath),
    Constant(Constant),
    Static(Static),
    /// The constant value of a unit-like struct (`struct S;` used as `S`).
    StructConstant(SimplePath),
    /// The callable constructor of a tuple struct (`struct P(i32, i32);`
    /// used as `P(1, 2)`).
    StructConstructor(SimplePath),
    Function(Function),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeItem {
    Import(SimplePath),
    Module(Box<Module>),
    TypeAlias { name: String, generics: Generics, ty: Option<TypeRef> },
    Enum(Enum),
    Struct(Struct),
    Trait(Trait),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueEntry {
    pub item: ValueItem,
    pub public: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeEntry {
    pub item: TypeItem,
    pub public: bool,
}

/// spec.md sec 3 "HIR.Module": two maps (value/type namespace), plus the
/// ordered list of traits in lexical scope (self plus inherited) that
/// method-dispatch search walks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Module {
    pub path: Option<SimplePath>,
    pub values: FxHashMap<String, ValueEntry>,
    pub types: FxHashMap<String, TypeEntry>,
    pub traits: Vec<SimplePath>,
}

impl Module {
    pub fn new(path: SimplePath) -> Self {
        Self { path: Some(path), ..Self::default() }
    }
}

/// A `macro_rules!`-style macro exported from the crate. Never expanded by
/// this pipeline (spec.md sec 1); carried only so `exported_macros` round
/// trips a name -> definition-site path.
#[derive(Debug, Clone, PartialEq)]
pub struct MacroRules {
    pub name: String,
    pub span: Span,
}

/// spec.md sec 3 "HIR.Crate": a root module plus the three impl indexes,
/// exported macros, lang items, and the auxiliary `TraitId` lookup table
/// spec.md sec 9 recommends in place of a raw back-pointer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Crate {
    pub name: String,
    pub root: Module,
    pub type_impls: Vec<TypeImpl>,
    pub trait_impls: FxHashMap<SimplePath, Vec<TraitImpl>>,
    pub marker_impls: FxHashMap<SimplePath, Vec<MarkerImpl>>,
    pub exported_macros: FxHashMap<String, MacroRules>,
    pub lang_items: FxHashMap<String, SimplePath>,
    /// Populated while items are placed (before impl-indexing runs, so the
    /// index-fixup pass in sec 4.4 item 7 can resolve every `TraitPath`
    /// against it).
    pub trait_index: FxHashMap<SimplePath, TraitId>,
}

impl Crate {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self { name: name.clone(), root: Module::new(SimplePath::crate_root(name)), ..Self::default() }
    }
}
