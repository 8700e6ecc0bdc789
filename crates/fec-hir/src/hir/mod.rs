//! The HIR data model (C6, spec.md sec 3). A lowered mirror of the AST with
//! resolved paths, desugared control flow, and per-crate item/impl indexes.
//! Every node is a closed sum type per spec.md sec 9, same as the AST.

pub mod expr;
pub mod item;
pub mod path;
pub mod pattern;
pub mod ty;

pub use expr::{ArrayLit, BinOp, ClosureParam, CompoundOp, ExprKind, ExprNode, FieldName, Literal, MatchArm, Stmt, StructLiteralField, UniOp};
pub use item::{
    AssociatedType, Constant, Crate, Enum, EnumVariant, Field, Function, GenericParam, GenericParamKind, Generics, MacroRules, MarkerImpl, Module,
    Param, Repr, Static, Struct, StructBody, Trait, TraitBound, TraitImpl, TraitImplConstant, TraitImplMethod, TraitImplType, TraitValue, TypeEntry,
    TypeImpl, TypeImplMethod, TypeItem, ValueEntry, ValueItem, VariantBody,
};
pub use path::{GenericPath, Path, PathParams, SimplePath, TraitId, TraitPath};
pub use pattern::{BindMode, Binding, Pattern, PatternKind};
pub use ty::{FunctionTypeInfo, InferClass, TypeRef};
