//! The expression validator (C8, spec.md sec 4.5): the last front-end phase
//! before MIR lowering (external). Consumes an already-lowered,
//! already-typechecked `hir::Crate` and the `fec-resolve::Resolver` built
//! over it, re-asserting the structural properties type inference is not
//! required to have produced but a correct crate must satisfy.

mod paths;
mod validator;

use fec_common::Sink;
use fec_hir::hir;
use fec_resolve::Resolver;

pub use validator::Validator;

/// Validate every function in `krate`. Stops at the first mismatch
/// (spec.md sec 8: "the validator either accepts it or emits exactly one
/// diagnostic with a span").
pub fn validate_crate(krate: &hir::Crate, resolver: &Resolver<'_>, sink: &mut dyn Sink) {
    Validator::new(resolver, sink).validate_crate(krate);
}
