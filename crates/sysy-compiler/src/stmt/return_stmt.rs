//! Return statements.

use sysy_ast::ReturnStmt;
use sysy_core::{CompilationError, Primitive};

use super::{Result, StmtCompiler};

impl StmtCompiler<'_> {
    /// Lower `return [value];`, coercing the value to the return type.
    pub fn compile_return<'ast>(&mut self, ret: &ReturnStmt<'ast>) -> Result<()> {
        let function = self
            .ctx
            .active_function()
            .cloned()
            .ok_or_else(|| CompilationError::internal("return outside of a function"))?;

        let value = match ret.value {
            Some(expr) => {
                let value = self.expr_compiler().compile_as(expr, function.return_type)?;
                Some(value)
            }
            None if function.return_type != Primitive::Void => {
                return Err(CompilationError::MissingReturnValue {
                    function: function.name,
                    span: ret.span,
                });
            }
            None => None,
        };
        self.ctx.build_ret(value)
    }
}
