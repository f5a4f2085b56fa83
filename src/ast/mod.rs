//! Abstract Syntax Tree (AST) definitions for the Kaleido language.

use serde::{Deserialize, Serialize};

/// Name given by the parser to a wrapped top-level expression.
pub const ANONYMOUS_FUNCTION_NAME: &str = "__anon_expr";

/// Span information for source location tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }

    /// Smallest span covering both operands
    pub fn merge(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

/// Top-level items produced by the parser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Item {
    /// Function definition, including wrapped top-level expressions
    Function(Function),
    /// Extern declaration (a bare prototype)
    Extern(Prototype),
}

/// Expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Number(NumberExpr),
    Variable(VariableExpr),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Var(VarExpr),
    Call(CallExpr),
    If(IfExpr),
    For(ForExpr),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Number(e) => e.span,
            Expr::Variable(e) => e.span,
            Expr::Unary(e) => e.span,
            Expr::Binary(e) => e.span,
            Expr::Var(e) => e.span,
            Expr::Call(e) => e.span,
            Expr::If(e) => e.span,
            Expr::For(e) => e.span,
        }
    }
}

/// Numeric literal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberExpr {
    pub value: f64,
    pub span: Span,
}

/// Variable reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableExpr {
    pub name: String,
    pub span: Span,
}

/// Application of a user-defined unary operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpr {
    pub opcode: char,
    pub operand: Box<Expr>,
    pub span: Span,
}

/// Binary expression; `=` is assignment, everything else is an operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub op: char,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
}

/// `var a = 1, b in body` — mutable bindings scoped to the body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarExpr {
    /// Bindings in declaration order; a missing initializer defaults to 0.0
    pub bindings: Vec<(String, Option<Expr>)>,
    pub body: Box<Expr>,
    pub span: Span,
}

/// Function call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    pub callee: String,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// `if cond then a else b` expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfExpr {
    pub cond: Box<Expr>,
    pub then_expr: Box<Expr>,
    pub else_expr: Option<Box<Expr>>,
    pub span: Span,
}

/// `for i = start, end, step in body` loop expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForExpr {
    pub var_name: String,
    pub start: Box<Expr>,
    pub end: Box<Expr>,
    pub step: Box<Expr>,
    pub body: Box<Expr>,
    pub span: Span,
}

/// Function signature; operators carry their parsed precedence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prototype {
    pub name: String,
    pub params: Vec<String>,
    pub is_operator: bool,
    pub precedence: i32,
    pub span: Span,
}

impl Prototype {
    /// True for the zero-argument wrapper the parser builds around a
    /// free-standing top-level expression.
    pub fn is_anonymous(&self) -> bool {
        self.name == ANONYMOUS_FUNCTION_NAME
    }
}

/// Function definition: a prototype plus a body expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub proto: Prototype,
    pub body: Expr,
    pub span: Span,
}
