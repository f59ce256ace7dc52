//! Declaration nodes: constants, variables and function definitions.

use sysy_core::{Primitive, Span};

use crate::ast::Ident;
use crate::ast::expr::Expr;
use crate::ast::stmt::Block;

/// A top-level element of a compile unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Item<'ast> {
    Const(ConstDecl<'ast>),
    Var(VarDecl<'ast>),
    Function(&'ast FunctionDef<'ast>),
}

impl<'ast> Item<'ast> {
    pub fn span(&self) -> Span {
        match self {
            Self::Const(d) => d.span,
            Self::Var(d) => d.span,
            Self::Function(f) => f.span,
        }
    }
}

/// `const <ty> a = ..., b[2] = {...};`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstDecl<'ast> {
    pub ty: Primitive,
    pub defs: &'ast [VarDef<'ast>],
    pub span: Span,
}

/// `<ty> a, b = ..., c[2][3];`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarDecl<'ast> {
    pub ty: Primitive,
    pub defs: &'ast [VarDef<'ast>],
    pub span: Span,
}

/// One declarator of a constant or variable declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarDef<'ast> {
    pub name: Ident<'ast>,
    /// Array extents, outermost first; empty for scalars
    pub dims: &'ast [ArrayDim<'ast>],
    pub init: Option<InitVal<'ast>>,
    pub span: Span,
}

/// One array extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArrayDim<'ast> {
    /// `[]`, only valid as the leading extent of a parameter
    Unspecified,
    /// `[expr]` with a compile-time constant `expr`
    Sized(&'ast Expr<'ast>),
}

/// An initializer: a single expression or a (possibly nested) brace list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InitVal<'ast> {
    Expr(&'ast Expr<'ast>),
    List(&'ast [InitVal<'ast>], Span),
}

impl<'ast> InitVal<'ast> {
    pub fn span(&self) -> Span {
        match self {
            Self::Expr(e) => e.span(),
            Self::List(_, span) => *span,
        }
    }
}

/// A function definition.
///
/// Example: `int sum(int n, int a[]) { ... }`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunctionDef<'ast> {
    pub name: Ident<'ast>,
    pub return_type: Primitive,
    pub params: &'ast [Param<'ast>],
    pub body: Block<'ast>,
    pub span: Span,
}

/// A function parameter: a scalar, or an array whose leading extent is
/// unspecified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Param<'ast> {
    pub name: Ident<'ast>,
    pub ty: Primitive,
    pub dims: &'ast [ArrayDim<'ast>],
    pub span: Span,
}
