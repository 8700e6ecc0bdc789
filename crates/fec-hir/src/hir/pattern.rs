//! `HIR.Pattern` (spec.md sec 3 "AST.Pattern" mirrored post-lowering, sec
//! 4.4 "Pattern lowering").

use fec_common::Span;

use crate::hir::expr::Literal;
use crate::hir::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindMode {
    Move,
    Ref,
    MutRef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub mutable: bool,
    pub mode: BindMode,
    pub name: String,
    pub slot: u32,
}

/// spec.md sec 4.4: "Path bindings in patterns are decoded against the
/// `PathBinding` tag to choose `EnumTuple/EnumTupleWildcard/EnumStruct` vs
/// `StructTuple/StructTupleWildcard/Struct`."
#[derive(Debug, Clone, PartialEq)]
pub enum PatternKind {
    Any,
    /// A resolved fresh binding (`AST.PatternKind::MaybeBind`, decoded).
    Bind(Binding),
    Box(Box<Pattern>),
    Ref { mutable: bool, inner: Box<Pattern> },
    Value(Literal),
    Range { start: Literal, end: Literal },
    Tuple(Vec<Pattern>),
    EnumTupleWildcard(Path),
    EnumTuple { path: Path, subs: Vec<Pattern> },
    EnumStruct { path: Path, fields: Vec<(String, Pattern)>, exhaustive: bool },
    StructTupleWildcard(Path),
    StructTuple { path: Path, subs: Vec<Pattern> },
    Struct { path: Path, fields: Vec<(String, Pattern)>, exhaustive: bool },
    Slice { leading: Vec<Pattern>, extra_bind: Option<Box<Pattern>>, trailing: Vec<Pattern> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub kind: PatternKind,
    /// A pattern can both bind a name *and* match structurally (`x @ Some(y)`,
    /// modelled here the same way the AST does it).
    pub binding: Option<Binding>,
    pub span: Span,
}

impl Pattern {
    pub fn new(kind: PatternKind, span: Span) -> Self {
        Self { kind, binding: None, span }
    }
}
