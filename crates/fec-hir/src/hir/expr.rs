//! `HIR.ExprNode` (spec.md sec 3 "AST.ExprNode" mirrored post-lowering, sec
//! 4.4 "Expression lowering"). `While`/`WhileLet`/`IfLet`/`For`/`Try` do not
//! appear here: lowering desugars the first four and rejects a surviving
//! `Try` as a bug (spec.md sec 4.4, sec 7).

use fec_common::{CoreType, LiteralTypeTag, Span};

use crate::hir::path::Path;
use crate::hir::pattern::Pattern;
use crate::hir::ty::TypeRef;

#[derive(Debug, Clone, PartialEq)]
pub struct ExprNode {
    pub kind: ExprKind,
    /// The node's result type, to be filled in by the external typecheck
    /// phase (spec.md sec 5 "Ordering guarantees"); `None` immediately after
    /// lowering.
    pub ty: Option<TypeRef>,
    pub span: Span,
}

impl ExprNode {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, ty: None, span }
    }

    pub fn boxed(kind: ExprKind, span: Span) -> Box<Self> {
        Box::new(Self::new(kind, span))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    And,
    Or,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompoundOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int { value: u128, tag: LiteralTypeTag },
    Float { value: f64, tag: Option<CoreType> },
    Bool(bool),
    Str(String),
    ByteStr(Vec<u8>),
    Char(char),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchArm {
    pub pattern: Pattern,
    pub guard: Option<Box<ExprNode>>,
    pub body: Box<ExprNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClosureParam {
    pub pattern: Pattern,
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructLiteralField {
    pub name: String,
    pub value: Box<ExprNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrayLit {
    List(Vec<ExprNode>),
    Sized { value: Box<ExprNode>, count: Box<ExprNode> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldName {
    Named(String),
    Tuple(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Block(Vec<Stmt>, Option<Box<ExprNode>>),

    /// `return;` has already been rewritten to `return ()` (spec.md sec
    /// 4.4 rule "`return;` -> `return ()`"), so the operand is never absent.
    Return(Box<ExprNode>),
    /// spec.md sec 4.4: "`break`/`continue` with a value are not yet
    /// supported and are rejected", so no payload is carried here.
    Break { label: Option<String> },
    Continue { label: Option<String> },

    Let { pattern: Pattern, ty: Option<TypeRef>, value: Box<ExprNode> },

    Assign { op: Option<CompoundOp>, target: Box<ExprNode>, value: Box<ExprNode> },

    BinOp { op: BinOp, lhs: Box<ExprNode>, rhs: Box<ExprNode> },
    UniOp { op: UniOp, operand: Box<ExprNode> },
    Borrow { mutable: bool, operand: Box<ExprNode> },
    Cast { value: Box<ExprNode>, ty: TypeRef },
    Deref(Box<ExprNode>),

    /// A callee that did not resolve to a locally-bound variable, a
    /// tuple/unit-variant constructor, or a known UFCS method (spec.md sec
    /// 4.4 "Calls": "everything else becomes `CallPath`").
    CallPath { path: Path, args: Vec<ExprNode> },
    /// "Path-call sites whose callee is a locally-resolved variable become
    /// `CallValue(Variable, args)`" (spec.md sec 4.4).
    CallValue { slot: u32, args: Vec<ExprNode> },
    CallMethod { receiver: Box<ExprNode>, method: String, type_args: Vec<TypeRef>, args: Vec<ExprNode> },
    CallObject { callee: Box<ExprNode>, args: Vec<ExprNode> },
    /// "Unit-variant and tuple-variant paths become `TupleVariant(path,
    /// is_struct, args)`" (spec.md sec 4.4).
    TupleVariant { path: Path, is_struct: bool, args: Vec<ExprNode> },

    /// `loop`, `while`, and `while let` all desugar to this one node
    /// (spec.md sec 4.4 rules 1-2). `result_ty` defaults to unit and is set
    /// to `Diverge` by the post-lowering visitor described in sec 4.4's
    /// final bullet when no enclosed `break` targets this loop's label.
    Loop { label: Option<String>, body: Vec<Stmt>, result_ty: TypeRef },

    Match { value: Box<ExprNode>, arms: Vec<MatchArm> },
    /// `if let` has already become a two-arm `Match` (spec.md sec 4.4 rule
    /// 3); only the plain conditional survives as its own node.
    If { cond: Box<ExprNode>, then_branch: Vec<Stmt>, else_branch: Option<Box<ExprNode>> },

    Literal(Literal),
    Closure { closure_ty: u32, params: Vec<ClosureParam>, ret: TypeRef, body: Box<ExprNode> },
    StructLiteral { path: Path, fields: Vec<StructLiteralField>, base: Option<Box<ExprNode>> },
    Array(ArrayLit),
    Tuple(Vec<ExprNode>),

    /// A reference to a local variable, resolved to its binding slot
    /// (spec.md sec 3 "named value (resolved via path binding)",
    /// `PathBinding::Variable(slot)`).
    Local(u32),
    /// A reference to a module-level constant, static, or function value,
    /// resolved to its absolute path.
    NamedValue(Path),

    Field { value: Box<ExprNode>, name: FieldName },
    Index { value: Box<ExprNode>, index: Box<ExprNode> },
}

/// spec.md sec 3: a statement is an expression statement, a `let`, or a
/// locally declared item. Local item declarations are out of scope for this
/// lowering pass -- none of spec.md sec 8's end-to-end scenarios nest an
/// item inside a block, and sec 4.4 does not specify their desugaring.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(ExprNode),
    Semi(ExprNode),
}
