//! Assignment statements.

use sysy_ast::AssignStmt;
use sysy_core::CompilationError;

use super::{Result, StmtCompiler};
use crate::conversion::{convert, infer};

impl StmtCompiler<'_> {
    /// Lower `target = value;`.
    ///
    /// The target's address is computed before the value; the target must
    /// be a scalar element.
    pub fn compile_assign<'ast>(&mut self, assign: &AssignStmt<'ast>) -> Result<()> {
        let mut compiler = self.expr_compiler();
        let (address, data_type) = compiler.compile_address(&assign.target)?;
        let value = compiler.compile(assign.value)?;
        let Some(base) = data_type.as_scalar() else {
            return Err(CompilationError::InvalidConversion {
                from: infer(&value.ty).to_string(),
                to: data_type.to_string(),
                span: assign.span,
            });
        };
        let value = convert(self.ctx, value, base, assign.value.span())?;
        self.ctx.build_store(value, address)
    }
}
