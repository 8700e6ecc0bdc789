//! Macro invocations (spec.md sec 4.3 "Macros"): parsed, never expanded --
//! expansion is an external collaborator. Surviving one past lowering in an
//! expression or pattern position is a bug (spec.md sec 7).

use fec_common::Span;

use crate::token_tree::TokenTree;

#[derive(Debug, Clone, PartialEq)]
pub struct MacroInvocation {
    pub name: String,
    pub args: Vec<TokenTree>,
    pub span: Span,
}
