//! Arena-backed construction helpers for AST nodes.
//!
//! The parser is an external collaborator, so the lowering engine's tests,
//! benchmarks and embedders build trees directly. [`AstBuilder`] hides the
//! arena bookkeeping; every node it produces carries the builder's current
//! span (see [`AstBuilder::at`]).

use bumpalo::Bump;
use sysy_core::{Primitive, Span};

use crate::ast::*;

/// Builds AST nodes inside a [`Bump`] arena.
///
/// ```
/// use bumpalo::Bump;
/// use sysy_ast::{AstBuilder, BinaryOp};
/// use sysy_core::Primitive;
///
/// let arena = Bump::new();
/// let b = AstBuilder::new(&arena);
/// // int f(int n) { return n + 1; }
/// let body = [b.ret(Some(b.binary(b.var("n"), BinaryOp::Add, b.int(1))))];
/// let f = b.function("f", Primitive::Int, &[b.param("n", Primitive::Int)], &body);
/// let unit = b.unit(&[f]);
/// assert_eq!(unit.functions().count(), 1);
/// ```
#[derive(Clone, Copy)]
pub struct AstBuilder<'ast> {
    arena: &'ast Bump,
    span: Span,
}

impl<'ast> AstBuilder<'ast> {
    pub fn new(arena: &'ast Bump) -> Self {
        Self {
            arena,
            span: Span::default(),
        }
    }

    /// A builder whose nodes carry `span`.
    pub fn at(&self, span: Span) -> Self {
        Self {
            arena: self.arena,
            span,
        }
    }

    pub fn arena(&self) -> &'ast Bump {
        self.arena
    }

    pub fn span(&self) -> Span {
        self.span
    }

    // ==========================================================================
    // Expressions
    // ==========================================================================

    pub fn ident(&self, name: &str) -> Ident<'ast> {
        Ident::new(self.arena.alloc_str(name), self.span)
    }

    pub fn int(&self, value: i32) -> &'ast Expr<'ast> {
        self.arena.alloc(Expr::Number(NumberExpr {
            value: Number::Int(value),
            span: self.span,
        }))
    }

    pub fn float(&self, value: f32) -> &'ast Expr<'ast> {
        self.arena.alloc(Expr::Number(NumberExpr {
            value: Number::Float(value),
            span: self.span,
        }))
    }

    /// A plain variable reference.
    pub fn var(&self, name: &str) -> &'ast Expr<'ast> {
        self.index(name, &[])
    }

    /// `name[i][j]...`
    pub fn index(&self, name: &str, indices: &[&'ast Expr<'ast>]) -> &'ast Expr<'ast> {
        self.arena.alloc(Expr::Var(self.lvalue(name, indices)))
    }

    /// The target of an assignment.
    pub fn lvalue(&self, name: &str, indices: &[&'ast Expr<'ast>]) -> VarExpr<'ast> {
        VarExpr {
            name: self.ident(name),
            indices: self.arena.alloc_slice_copy(indices),
            span: self.span,
        }
    }

    pub fn unary(&self, op: UnaryOp, operand: &'ast Expr<'ast>) -> &'ast Expr<'ast> {
        let node = self.arena.alloc(UnaryExpr {
            op,
            operand,
            span: self.span,
        });
        self.arena.alloc(Expr::Unary(node))
    }

    pub fn binary(
        &self,
        left: &'ast Expr<'ast>,
        op: BinaryOp,
        right: &'ast Expr<'ast>,
    ) -> &'ast Expr<'ast> {
        let node = self.arena.alloc(BinaryExpr {
            left,
            op,
            right,
            span: self.span,
        });
        self.arena.alloc(Expr::Binary(node))
    }

    pub fn call(&self, name: &str, args: &[&'ast Expr<'ast>]) -> &'ast Expr<'ast> {
        let node = self.arena.alloc(CallExpr {
            name: self.ident(name),
            args: self.arena.alloc_slice_copy(args),
            span: self.span,
        });
        self.arena.alloc(Expr::Call(node))
    }

    // ==========================================================================
    // Statements
    // ==========================================================================

    pub fn assign(
        &self,
        name: &str,
        indices: &[&'ast Expr<'ast>],
        value: &'ast Expr<'ast>,
    ) -> Stmt<'ast> {
        Stmt::Assign(AssignStmt {
            target: self.lvalue(name, indices),
            value,
            span: self.span,
        })
    }

    pub fn expr_stmt(&self, expr: &'ast Expr<'ast>) -> Stmt<'ast> {
        Stmt::Expr(ExprStmt {
            expr: Some(expr),
            span: self.span,
        })
    }

    /// The empty statement `;`.
    pub fn empty_stmt(&self) -> Stmt<'ast> {
        Stmt::Expr(ExprStmt {
            expr: None,
            span: self.span,
        })
    }

    pub fn block(&self, stmts: &[Stmt<'ast>]) -> Block<'ast> {
        Block {
            stmts: self.arena.alloc_slice_copy(stmts),
            span: self.span,
        }
    }

    pub fn block_stmt(&self, stmts: &[Stmt<'ast>]) -> Stmt<'ast> {
        Stmt::Block(self.block(stmts))
    }

    pub fn if_stmt(
        &self,
        condition: &'ast Expr<'ast>,
        then_stmt: Stmt<'ast>,
        else_stmt: Option<Stmt<'ast>>,
    ) -> Stmt<'ast> {
        let then_stmt = self.arena.alloc(then_stmt);
        let else_stmt = match else_stmt {
            Some(stmt) => {
                let stmt: &'ast Stmt<'ast> = self.arena.alloc(stmt);
                Some(stmt)
            }
            None => None,
        };
        Stmt::If(self.arena.alloc(IfStmt {
            condition,
            then_stmt,
            else_stmt,
            span: self.span,
        }))
    }

    pub fn while_stmt(&self, condition: &'ast Expr<'ast>, body: Stmt<'ast>) -> Stmt<'ast> {
        let body = self.arena.alloc(body);
        Stmt::While(self.arena.alloc(WhileStmt {
            condition,
            body,
            span: self.span,
        }))
    }

    pub fn break_stmt(&self) -> Stmt<'ast> {
        Stmt::Break(BreakStmt { span: self.span })
    }

    pub fn continue_stmt(&self) -> Stmt<'ast> {
        Stmt::Continue(ContinueStmt { span: self.span })
    }

    pub fn ret(&self, value: Option<&'ast Expr<'ast>>) -> Stmt<'ast> {
        Stmt::Return(ReturnStmt {
            value,
            span: self.span,
        })
    }

    // ==========================================================================
    // Declarations
    // ==========================================================================

    /// Sized extents `[e0][e1]...`.
    pub fn dims(&self, extents: &[&'ast Expr<'ast>]) -> &'ast [ArrayDim<'ast>] {
        self.arena
            .alloc_slice_fill_iter(extents.iter().map(|&e| ArrayDim::Sized(e)))
    }

    /// Parameter extents `[][e1]...`.
    pub fn decayed_dims(&self, trailing: &[&'ast Expr<'ast>]) -> &'ast [ArrayDim<'ast>] {
        self.arena.alloc_slice_fill_with(trailing.len() + 1, |i| match i {
            0 => ArrayDim::Unspecified,
            _ => ArrayDim::Sized(trailing[i - 1]),
        })
    }

    pub fn init_expr(&self, expr: &'ast Expr<'ast>) -> InitVal<'ast> {
        InitVal::Expr(expr)
    }

    pub fn init_list(&self, elements: &[InitVal<'ast>]) -> InitVal<'ast> {
        InitVal::List(self.arena.alloc_slice_copy(elements), self.span)
    }

    pub fn def(
        &self,
        name: &str,
        dims: &'ast [ArrayDim<'ast>],
        init: Option<InitVal<'ast>>,
    ) -> VarDef<'ast> {
        VarDef {
            name: self.ident(name),
            dims,
            init,
            span: self.span,
        }
    }

    /// A scalar declarator, optionally initialized with an expression.
    pub fn scalar_def(&self, name: &str, init: Option<&'ast Expr<'ast>>) -> VarDef<'ast> {
        self.def(name, &[], init.map(InitVal::Expr))
    }

    pub fn var_decl(&self, ty: Primitive, defs: &[VarDef<'ast>]) -> VarDecl<'ast> {
        VarDecl {
            ty,
            defs: self.arena.alloc_slice_copy(defs),
            span: self.span,
        }
    }

    pub fn const_decl(&self, ty: Primitive, defs: &[VarDef<'ast>]) -> ConstDecl<'ast> {
        ConstDecl {
            ty,
            defs: self.arena.alloc_slice_copy(defs),
            span: self.span,
        }
    }

    /// `ty name = init;` as a statement.
    pub fn local(&self, ty: Primitive, name: &str, init: Option<&'ast Expr<'ast>>) -> Stmt<'ast> {
        Stmt::Var(self.var_decl(ty, &[self.scalar_def(name, init)]))
    }

    /// `const ty name = init;` as a statement.
    pub fn local_const(&self, ty: Primitive, name: &str, init: &'ast Expr<'ast>) -> Stmt<'ast> {
        Stmt::Const(self.const_decl(ty, &[self.scalar_def(name, Some(init))]))
    }

    /// `ty name = init;` at file scope.
    pub fn global(&self, ty: Primitive, name: &str, init: Option<&'ast Expr<'ast>>) -> Item<'ast> {
        Item::Var(self.var_decl(ty, &[self.scalar_def(name, init)]))
    }

    /// `const ty name = init;` at file scope.
    pub fn global_const(&self, ty: Primitive, name: &str, init: &'ast Expr<'ast>) -> Item<'ast> {
        Item::Const(self.const_decl(ty, &[self.scalar_def(name, Some(init))]))
    }

    pub fn param(&self, name: &str, ty: Primitive) -> Param<'ast> {
        Param {
            name: self.ident(name),
            ty,
            dims: &[],
            span: self.span,
        }
    }

    /// `ty name[][e1]...`
    pub fn array_param(
        &self,
        name: &str,
        ty: Primitive,
        trailing: &[&'ast Expr<'ast>],
    ) -> Param<'ast> {
        Param {
            name: self.ident(name),
            ty,
            dims: self.decayed_dims(trailing),
            span: self.span,
        }
    }

    pub fn function(
        &self,
        name: &str,
        return_type: Primitive,
        params: &[Param<'ast>],
        body: &[Stmt<'ast>],
    ) -> Item<'ast> {
        Item::Function(self.arena.alloc(FunctionDef {
            name: self.ident(name),
            return_type,
            params: self.arena.alloc_slice_copy(params),
            body: self.block(body),
            span: self.span,
        }))
    }

    pub fn unit(&self, items: &[Item<'ast>]) -> CompileUnit<'ast> {
        CompileUnit::new(self.arena.alloc_slice_copy(items), self.span)
    }
}
