//! Statement lowering.
//!
//! The [`StmtCompiler`] lowers statements at the insertion cursor. A
//! statement reached while the cursor is empty is unreachable and emits
//! nothing; `break` and `continue` still check that a loop encloses them.
//!
//! # Example
//!
//! ```ignore
//! let mut compiler = StmtCompiler::new(ctx);
//! compiler.compile(&stmt)?;
//! ```

mod assign;
mod block;
mod if_stmt;
mod return_stmt;
mod while_stmt;

use sysy_ast::{BreakStmt, ContinueStmt, ExprStmt, Stmt};
use sysy_core::{CompilationError, Span};

use crate::context::CompilationContext;
use crate::decl::DeclCompiler;
use crate::expr::ExprCompiler;
use crate::ir::BlockId;

type Result<T> = std::result::Result<T, CompilationError>;

/// Lowers statements into the active function.
pub struct StmtCompiler<'a> {
    /// Compilation context with the module, cursor, scopes and loops
    ctx: &'a mut CompilationContext,
}

impl<'a> StmtCompiler<'a> {
    pub fn new(ctx: &'a mut CompilationContext) -> Self {
        Self { ctx }
    }

    /// Lower a statement.
    pub fn compile<'ast>(&mut self, stmt: &Stmt<'ast>) -> Result<()> {
        match stmt {
            Stmt::Break(brk) => return self.compile_break(brk),
            Stmt::Continue(cont) => return self.compile_continue(cont),
            _ if self.ctx.is_unreachable() => return Ok(()),
            _ => {}
        }

        match stmt {
            Stmt::Const(decl) => DeclCompiler::new(self.ctx).compile_const_decl(decl),
            Stmt::Var(decl) => DeclCompiler::new(self.ctx).compile_var_decl(decl),
            Stmt::Assign(assign) => self.compile_assign(assign),
            Stmt::Expr(expr_stmt) => self.compile_expr_stmt(expr_stmt),
            Stmt::Block(block) => self.compile_block(block),
            Stmt::If(if_stmt) => self.compile_if(if_stmt),
            Stmt::While(while_stmt) => self.compile_while(while_stmt),
            Stmt::Return(ret) => self.compile_return(ret),
            Stmt::Break(_) | Stmt::Continue(_) => Ok(()),
        }
    }

    /// Lower statements in order, in the current scope.
    pub fn compile_stmts<'ast>(&mut self, stmts: &[Stmt<'ast>]) -> Result<()> {
        for stmt in stmts {
            self.compile(stmt)?;
        }
        Ok(())
    }

    /// Evaluate for side effects; the value, if any, is dropped.
    fn compile_expr_stmt<'ast>(&mut self, expr_stmt: &ExprStmt<'ast>) -> Result<()> {
        let Some(expr) = expr_stmt.expr else {
            return Ok(());
        };
        self.expr_compiler().compile(expr)?;
        Ok(())
    }

    fn compile_break(&mut self, brk: &BreakStmt) -> Result<()> {
        let target = self.ctx.loops().break_target();
        self.jump_out(target, "break", brk.span)
    }

    fn compile_continue(&mut self, cont: &ContinueStmt) -> Result<()> {
        let target = self.ctx.loops().continue_target();
        self.jump_out(target, "continue", cont.span)
    }

    /// Branch to a loop target and close the block.
    fn jump_out(&mut self, target: Option<BlockId>, keyword: &'static str, span: Span) -> Result<()> {
        let target = target.ok_or(CompilationError::ControlOutsideLoop { keyword, span })?;
        if self.ctx.is_unreachable() {
            return Ok(());
        }
        self.ctx.build_br(target)
    }

    fn expr_compiler(&mut self) -> ExprCompiler<'_> {
        ExprCompiler::new(self.ctx)
    }
}
