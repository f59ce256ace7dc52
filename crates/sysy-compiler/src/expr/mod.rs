//! Expression lowering.
//!
//! The [`ExprCompiler`] lowers an expression at the insertion cursor and
//! yields the resulting [`Value`]. Scalars are yielded by value; arrays
//! decay to the address of their first element.
//!
//! # Example
//!
//! ```ignore
//! let mut compiler = ExprCompiler::new(ctx);
//! let value = compiler.compile(expr)?;
//! let cond = compiler.compile_condition(expr)?;
//! ```

mod binary;
mod calls;
mod identifiers;
mod literals;
mod unary;

use sysy_ast::{Expr, VarExpr};
use sysy_core::{CompilationError, DataType, Primitive, Span};

use crate::context::CompilationContext;
use crate::conversion::convert;
use crate::ir::Value;

type Result<T> = std::result::Result<T, CompilationError>;

/// Lowers expressions into the active function.
pub struct ExprCompiler<'a> {
    /// Compilation context with the module, cursor and scopes
    ctx: &'a mut CompilationContext,
}

impl<'a> ExprCompiler<'a> {
    pub fn new(ctx: &'a mut CompilationContext) -> Self {
        Self { ctx }
    }

    /// Lower an expression to a value.
    pub fn compile<'ast>(&mut self, expr: &Expr<'ast>) -> Result<Value> {
        match expr {
            Expr::Number(number) => Ok(literals::compile_number(number)),
            Expr::Var(var) => identifiers::compile_var(self, var),
            Expr::Unary(unary) => unary::compile_unary(self, unary),
            Expr::Binary(binary) => binary::compile_binary(self, binary),
            Expr::Call(call) => calls::compile_call(self, call),
        }
    }

    /// Lower an expression and coerce it to `target`.
    pub fn compile_as<'ast>(&mut self, expr: &Expr<'ast>, target: Primitive) -> Result<Value> {
        let value = self.compile(expr)?;
        self.convert(value, target, expr.span())
    }

    /// Lower a branch condition: any scalar, coerced to bool.
    pub fn compile_condition<'ast>(&mut self, expr: &Expr<'ast>) -> Result<Value> {
        self.compile_as(expr, Primitive::Bool)
    }

    /// Address of a (possibly indexed) variable and the type stored there.
    ///
    /// Used for assignment targets.
    pub fn compile_address<'ast>(&mut self, var: &VarExpr<'ast>) -> Result<(Value, DataType)> {
        identifiers::compile_address(self, var)
    }

    fn convert(&mut self, value: Value, target: Primitive, span: Span) -> Result<Value> {
        convert(self.ctx, value, target, span)
    }
}
