//! The surface AST (C4, spec.md sec 3). One file per syntactic category,
//! following the teacher's `ast/item.rs`-style organization
//! (`mesh-parser/src/ast/`), rebuilt here as owned closed sum types per
//! spec.md sec 9's explicit tagged-union mandate rather than the teacher's
//! rowan CST views.

pub mod expr;
pub mod item;
pub mod mac;
pub mod path;
pub mod pattern;
pub mod ty;

pub use expr::{ArrayLit, BinOp, ClosureParam, CompoundOp, ExprKind, ExprNode, FieldName, Literal, MatchArm, Stmt, StructLiteralField, UniOp};
pub use item::{
    Attribute, ConstDef, Crate, EnumDef, EnumVariant, ExternBlock, ExternCrateDecl, Function, GenericParam, GenericParamKind, Generics, ImplDef, Item,
    ItemKind, MetaItem, ModuleBody, ModuleDef, Param, Repr, SelfParam, StaticDef, StructBody, StructDef, StructField, TraitBound, TraitDef,
    TypeAliasDef, UseDecl, UseTree, VariantBody, Visibility, WhereClause, WherePredicate,
};
pub use mac::MacroInvocation;
pub use path::{AstPath, Path, PathBinding, PathNode, PathParams};
pub use pattern::{BindMode, Pattern, PatternBinding, PatternKind};
pub use ty::{FunctionTypeInfo, Type, TypeRef};
