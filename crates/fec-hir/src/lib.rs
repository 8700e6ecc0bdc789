//! HIR data model (C6, spec.md sec 3 "HIR mirror types") and AST->HIR
//! lowering, impl indexing and index fixup (C7, spec.md sec 4.4).

pub mod hir;
mod lower;

pub use lower::lower_crate;
