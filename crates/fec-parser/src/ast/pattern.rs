//! `AST.Pattern` (spec.md sec 3 "AST.Pattern").

use fec_common::Span;

use crate::ast::expr::ExprNode;
use crate::ast::mac::MacroInvocation;
use crate::ast::path::AstPath;

#[derive(Debug, Clone, PartialEq)]
pub enum BindMode {
    Move,
    Ref,
    MutRef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatternBinding {
    pub mutable: bool,
    pub mode: BindMode,
    pub name: String,
    pub slot: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PatternKind {
    Any,
    /// An identifier pattern whose binding-vs-constant nature is still
    /// ambiguous; resolved against the path binding table before lowering
    /// (spec.md sec 4.4: "`MaybeBind`... must have been eliminated before
    /// lowering; reaching them is a bug").
    MaybeBind(String),
    Macro(MacroInvocation),
    Box(Box<Pattern>),
    Ref { mutable: bool, inner: Box<Pattern> },
    Value { start: Box<ExprNode>, end: Option<Box<ExprNode>> },
    Tuple(Vec<Pattern>),
    WildcardStructTuple(AstPath),
    StructTuple(AstPath, Vec<Pattern>),
    Struct {
        path: AstPath,
        fields: Vec<(String, Pattern)>,
        exhaustive: bool,
    },
    Slice {
        leading: Vec<Pattern>,
        extra_bind: Option<Box<Pattern>>,
        trailing: Vec<Pattern>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub kind: PatternKind,
    pub binding: Option<PatternBinding>,
    pub span: Span,
}

impl Pattern {
    pub fn new(kind: PatternKind, span: Span) -> Self {
        Self { kind, binding: None, span }
    }
}
