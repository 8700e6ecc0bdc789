//! `AST.ExprNode` (spec.md sec 3 "AST.ExprNode").

use fec_common::{CoreType, LiteralTypeTag, Span};

use crate::ast::mac::MacroInvocation;
use crate::ast::pattern::Pattern;
use crate::ast::path::AstPath;
use crate::ast::ty::Type;

#[derive(Debug, Clone, PartialEq)]
pub struct ExprNode {
    pub kind: ExprKind,
    pub span: Span,
}

impl ExprNode {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
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
    Range,
    RangeInc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniOp {
    Not,
    Neg,
}

/// The operator half of an `Assign` node: `None` for plain `=`, `Some(op)`
/// for `op=` (spec.md sec 3 "assign (with compound-op tag)").
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
    pub ty: Option<Type>,
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

    Return(Option<Box<ExprNode>>),
    Break { label: Option<String>, value: Option<Box<ExprNode>> },
    Continue { label: Option<String> },

    Let { pattern: Pattern, ty: Option<Type>, value: Box<ExprNode> },

    Assign { op: Option<CompoundOp>, target: Box<ExprNode>, value: Box<ExprNode> },

    BinOp { op: BinOp, lhs: Box<ExprNode>, rhs: Box<ExprNode> },
    UniOp { op: UniOp, operand: Box<ExprNode> },
    Borrow { mutable: bool, operand: Box<ExprNode> },
    Cast { value: Box<ExprNode>, ty: Type },
    Deref(Box<ExprNode>),

    CallPath { path: AstPath, args: Vec<ExprNode> },
    CallMethod { receiver: Box<ExprNode>, method: String, type_args: Vec<Type>, args: Vec<ExprNode> },
    CallObject { callee: Box<ExprNode>, args: Vec<ExprNode> },

    Loop { label: Option<String>, body: Vec<Stmt> },
    While { label: Option<String>, cond: Box<ExprNode>, body: Vec<Stmt> },
    WhileLet { label: Option<String>, pattern: Pattern, value: Box<ExprNode>, body: Vec<Stmt> },
    For { label: Option<String>, pattern: Pattern, iter: Box<ExprNode>, body: Vec<Stmt> },

    Match { value: Box<ExprNode>, arms: Vec<MatchArm> },
    If { cond: Box<ExprNode>, then_branch: Vec<Stmt>, else_branch: Option<Box<ExprNode>> },
    IfLet { pattern: Pattern, value: Box<ExprNode>, then_branch: Vec<Stmt>, else_branch: Option<Box<ExprNode>> },

    Literal(Literal),
    Closure { params: Vec<ClosureParam>, ret: Option<Type>, body: Box<ExprNode> },
    StructLiteral { path: AstPath, fields: Vec<StructLiteralField>, base: Option<Box<ExprNode>> },
    Array(ArrayLit),
    Tuple(Vec<ExprNode>),

    /// An identifier reference, resolved via the path's binding during
    /// lowering (spec.md sec 3: "named value (resolved via path binding)").
    NamedValue(AstPath),

    Field { value: Box<ExprNode>, name: FieldName },
    Index { value: Box<ExprNode>, index: Box<ExprNode> },

    /// Postfix `?`. A parse-time-only node: expansion removes it before
    /// lowering ever sees it (spec.md sec 4.3, sec 7).
    Try(Box<ExprNode>),

    Macro(MacroInvocation),
}

/// A statement inside a block: an expression statement, a `let`, or an
/// item declared locally. `Let` here is the same shape as `ExprKind::Let`
/// but statement position is where it actually occurs; expression-position
/// `let` only shows up as the condition of `if let`/`while let` above.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(ExprNode),
    /// An expression statement terminated with `;`, discarding its value.
    Semi(ExprNode),
    Item(Box<crate::ast::item::Item>),
}
