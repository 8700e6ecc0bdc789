//! Static trait resolver contract (C9, spec.md sec 4.6): the collaborator
//! the expression validator (C8, `fec-check`) consumes to answer "does this
//! type implement this trait", "what is this associated type", and "what
//! path does this lang item live at". Does not perform inference itself --
//! it is a lookup and structural-matching layer over an already-lowered
//! `hir::Crate`.

mod lang_items;
mod operators;
mod resolver;
mod unify;

pub use operators::{binop_trait, compound_assign_trait, uniop_trait};
pub use resolver::{GenericsGuard, Resolver, TraitImplMatch};
pub use unify::Unifier;
