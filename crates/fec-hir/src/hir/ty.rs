//! `HIR.TypeRef` (spec.md sec 3: "`TypeRef::Data` adds `Infer(index, class)`,
//! `Generic(name, index)`, `Diverge`, and concrete `Tuple/Array/Slice/
//! Borrow/Pointer/Path/TraitObject/Function/Closure`").

use fec_common::CoreType;

use crate::hir::expr::ExprNode;
use crate::hir::path::Path;

/// What kind of inference variable an `Infer` slot stands for -- narrows
/// unification the same way rustc's integer/float fallback vars do,
/// grounded on `mesh-typeck::ty::TyVar` (plain index) generalized with a
/// class tag since spec.md sec 3 names one explicitly (`Infer(index,
/// class)`) where the teacher's `TyVar` carries none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferClass {
    General,
    Integer,
    Float,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionTypeInfo {
    pub is_unsafe: bool,
    pub abi: String,
    pub params: Vec<TypeRef>,
    pub ret: Box<TypeRef>,
    pub variadic: bool,
}

/// `HIR.TypeRef` (spec.md sec 3).
#[derive(Debug, Clone, PartialEq)]
pub enum TypeRef {
    /// The uninhabited `!` type (`AST.TypeRef::None` lowers here).
    Diverge,
    /// A fresh inference variable introduced by lowering `AST.TypeRef::Any`
    /// or a deferred-type literal.
    Infer { index: u32, class: InferClass },
    Primitive(CoreType),
    Tuple(Vec<TypeRef>),
    /// `AST.TypeRef::Array(inner, None)` lowers to this (spec.md sec 4.4).
    Slice(Box<TypeRef>),
    /// `AST.TypeRef::Array(inner, Some(expr))`. `resolved_len` starts `None`
    /// (spec.md sec 4.4's "size_placeholder=max") and is filled in once the
    /// external const-evaluator resolves the size expression.
    Array { inner: Box<TypeRef>, len_expr: Box<ExprNode>, resolved_len: Option<u64> },
    Borrow { mutable: bool, inner: Box<TypeRef> },
    Pointer { mutable: bool, inner: Box<TypeRef> },
    Path(Path),
    /// A locally in-scope generic type parameter.
    Generic { name: String, index: u32 },
    /// At most one data (non-marker) trait, per spec.md sec 4.4's
    /// `TraitObject` split; the remaining entries of the source list are
    /// marker bounds folded into `markers`.
    TraitObject { hrls: Vec<String>, data_trait: Option<Box<Path>>, markers: Vec<Path> },
    Function(FunctionTypeInfo),
    /// The synthetic, anonymous type of one closure literal, identified by
    /// a per-crate unique id assigned during lowering.
    Closure(u32),
}

impl TypeRef {
    pub fn unit() -> Self {
        TypeRef::Tuple(Vec::new())
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, TypeRef::Tuple(elems) if elems.is_empty())
    }
}
