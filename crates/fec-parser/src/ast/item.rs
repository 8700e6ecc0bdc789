//! Module items, generics and the crate root (spec.md sec 4.3 "Module
//! items", "Generics", "Where-clauses", "Functions", "Use paths").

use fec_common::Span;

use crate::ast::expr::{ExprNode, Literal, Stmt};
use crate::ast::mac::MacroInvocation;
use crate::ast::path::AstPath;
use crate::ast::pattern::Pattern;
use crate::ast::ty::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Private,
    Public,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetaItem {
    Name(String),
    List(String, Vec<MetaItem>),
    NameValue(String, Literal),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub meta: MetaItem,
    /// `#![...]` (inner, attaches to the enclosing item) vs `#[...]`
    /// (outer, attaches to the following item).
    pub inner: bool,
    pub span: Span,
}

// ── Generics ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct TraitBound {
    pub hrls: Vec<String>,
    pub path: AstPath,
    /// `?Sized`-style relaxed bound.
    pub maybe: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenericParamKind {
    Lifetime { bounds: Vec<String> },
    Type { bounds: Vec<TraitBound>, default: Option<Type> },
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

#[derive(Debug, Clone, PartialEq)]
pub enum WherePredicate {
    LifetimeOutlives { lifetime: String, bound: String },
    TypeBound { hrls: Vec<String>, ty: Type, bounds: Vec<TraitBound> },
    TypeEq { lhs: Type, rhs: Type },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WhereClause {
    pub predicates: Vec<WherePredicate>,
}

// ── Functions ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum SelfParam {
    None,
    Value { mutable: bool },
    Ref { mutable: bool, lifetime: Option<String> },
    /// `self: T`
    Typed(Type),
    /// `&self: T`
    RefTyped(Type),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub pattern: Pattern,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub is_unsafe: bool,
    pub is_const: bool,
    pub is_async: bool,
    pub abi: Option<String>,
    pub generics: Generics,
    pub self_param: SelfParam,
    pub params: Vec<Param>,
    pub ret: Type,
    pub where_clause: WhereClause,
    /// `None` for a trait method with no default body.
    pub body: Option<Vec<Stmt>>,
    pub span: Span,
}

// ── Structs & enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repr {
    Rust,
    C,
    U8,
    U16,
    U32,
    Packed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    pub name: Option<String>,
    pub ty: Type,
    pub public: bool,
    pub attrs: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StructBody {
    Unit,
    Tuple(Vec<StructField>),
    Named(Vec<StructField>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDef {
    pub name: String,
    pub generics: Generics,
    pub where_clause: WhereClause,
    pub repr: Repr,
    pub body: StructBody,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VariantBody {
    Unit,
    Value(ExprNode),
    Tuple(Vec<StructField>),
    Struct(Vec<StructField>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumVariant {
    pub name: String,
    pub body: VariantBody,
    pub attrs: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDef {
    pub name: String,
    pub generics: Generics,
    pub where_clause: WhereClause,
    pub repr: Repr,
    pub variants: Vec<EnumVariant>,
    pub span: Span,
}

// ── Traits & impls ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct TraitDef {
    pub name: String,
    pub is_unsafe: bool,
    pub is_marker: bool,
    pub generics: Generics,
    pub supertraits: Vec<AstPath>,
    pub where_clause: WhereClause,
    pub items: Vec<Item>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImplDef {
    pub is_unsafe: bool,
    pub is_negative: bool,
    pub generics: Generics,
    pub trait_: Option<AstPath>,
    pub self_ty: Type,
    pub where_clause: WhereClause,
    pub items: Vec<Item>,
    pub span: Span,
}

// ── Use / extern ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum UseTree {
    Simple { path: AstPath, rename: Option<String> },
    Glob { path: AstPath },
    Nested { prefix: AstPath, items: Vec<UseTree> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct UseDecl {
    pub tree: UseTree,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExternCrateDecl {
    pub name: String,
    pub rename: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExternBlock {
    pub abi: Option<String>,
    pub items: Vec<Item>,
    pub span: Span,
}

// ── Consts, statics, type aliases ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ConstDef {
    pub name: String,
    pub ty: Type,
    pub value: ExprNode,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaticDef {
    pub name: String,
    pub mutable: bool,
    pub ty: Type,
    pub value: ExprNode,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDef {
    pub name: String,
    pub generics: Generics,
    /// Absent for an associated-type declaration inside a trait with no
    /// default.
    pub ty: Option<Type>,
    pub span: Span,
}

// ── Modules & crate ──────────────────────────────────────────────────────

/// Spec.md sec 4.3 "Sub-module loading policy": an external `mod foo;`
/// is resolved by the file-system collaborator, which this crate never
/// invokes; the parser only records that the declaration was external.
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleBody {
    Inline(Vec<Item>),
    External,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDef {
    pub name: String,
    pub body: ModuleBody,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    Use(UseDecl),
    ExternCrate(ExternCrateDecl),
    ExternBlock(ExternBlock),
    Const(ConstDef),
    Static(StaticDef),
    Function(Function),
    TypeAlias(TypeAliasDef),
    Struct(StructDef),
    Enum(EnumDef),
    Trait(TraitDef),
    Impl(ImplDef),
    Module(ModuleDef),
    Macro(MacroInvocation),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub vis: Visibility,
    pub attrs: Vec<Attribute>,
    pub kind: ItemKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Crate {
    pub attrs: Vec<Attribute>,
    pub items: Vec<Item>,
}
