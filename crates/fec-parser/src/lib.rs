//! Token-tree abstraction (C3) and the surface AST plus recursive-descent
//! parser (C4, C5; spec.md sec 3-4).

pub mod ast;
pub mod parser;
pub mod token_tree;

pub use parser::{parse_str, ParseError, PResult, Parser};
pub use token_tree::{Delimiter, InterpFragment, ProtoSpan, StreamBug, TokenStream, MAX_LOOKAHEAD};
