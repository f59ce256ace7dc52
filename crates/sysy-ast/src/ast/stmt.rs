//! Statement nodes.
//!
//! Declarations are statements too, so a [`Block`] is just a sequence of
//! statements lowered in order.

use sysy_core::Span;

use crate::ast::decl::{ConstDecl, VarDecl};
use crate::ast::expr::{Expr, VarExpr};

/// A statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stmt<'ast> {
    /// `const int N = 10;`
    Const(ConstDecl<'ast>),
    /// `int x = 1, y[3];`
    Var(VarDecl<'ast>),
    /// `lvalue = expr;`
    Assign(AssignStmt<'ast>),
    /// `expr;` or the empty statement `;`
    Expr(ExprStmt<'ast>),
    /// `{ ... }`
    Block(Block<'ast>),
    If(&'ast IfStmt<'ast>),
    While(&'ast WhileStmt<'ast>),
    Break(BreakStmt),
    Continue(ContinueStmt),
    Return(ReturnStmt<'ast>),
}

impl<'ast> Stmt<'ast> {
    pub fn span(&self) -> Span {
        match self {
            Self::Const(s) => s.span,
            Self::Var(s) => s.span,
            Self::Assign(s) => s.span,
            Self::Expr(s) => s.span,
            Self::Block(s) => s.span,
            Self::If(s) => s.span,
            Self::While(s) => s.span,
            Self::Break(s) => s.span,
            Self::Continue(s) => s.span,
            Self::Return(s) => s.span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignStmt<'ast> {
    pub target: VarExpr<'ast>,
    pub value: &'ast Expr<'ast>,
    pub span: Span,
}

/// An expression evaluated for its side effects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExprStmt<'ast> {
    /// `None` for the empty statement `;`
    pub expr: Option<&'ast Expr<'ast>>,
    pub span: Span,
}

/// A brace-delimited sequence of statements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block<'ast> {
    pub stmts: &'ast [Stmt<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IfStmt<'ast> {
    pub condition: &'ast Expr<'ast>,
    pub then_stmt: &'ast Stmt<'ast>,
    pub else_stmt: Option<&'ast Stmt<'ast>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhileStmt<'ast> {
    pub condition: &'ast Expr<'ast>,
    pub body: &'ast Stmt<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakStmt {
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinueStmt {
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnStmt<'ast> {
    pub value: Option<&'ast Expr<'ast>>,
    pub span: Span,
}
