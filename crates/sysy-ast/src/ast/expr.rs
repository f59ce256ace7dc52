//! Expression nodes.

use sysy_core::Span;

use crate::ast::{BinaryOp, Ident, UnaryOp};

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    /// Integer or floating-point literal
    Number(NumberExpr),
    /// Variable reference, possibly indexed
    Var(VarExpr<'ast>),
    /// Unary prefix operation
    Unary(&'ast UnaryExpr<'ast>),
    /// Binary operation
    Binary(&'ast BinaryExpr<'ast>),
    /// Function call
    Call(&'ast CallExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    pub fn span(&self) -> Span {
        match self {
            Self::Number(e) => e.span,
            Self::Var(e) => e.span,
            Self::Unary(e) => e.span,
            Self::Binary(e) => e.span,
            Self::Call(e) => e.span,
        }
    }
}

/// The value of a numeric literal, tagged by its lexical kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i32),
    Float(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberExpr {
    pub value: Number,
    pub span: Span,
}

/// `name` or `name[i][j]...`.
///
/// Also used as the target of an assignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarExpr<'ast> {
    pub name: Ident<'ast>,
    /// Subscripts, outermost first; empty for a plain reference
    pub indices: &'ast [&'ast Expr<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnaryExpr<'ast> {
    pub op: UnaryOp,
    pub operand: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryExpr<'ast> {
    pub left: &'ast Expr<'ast>,
    pub op: BinaryOp,
    pub right: &'ast Expr<'ast>,
    pub span: Span,
}

/// A call by name; functions live in one flat namespace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallExpr<'ast> {
    pub name: Ident<'ast>,
    pub args: &'ast [&'ast Expr<'ast>],
    pub span: Span,
}
