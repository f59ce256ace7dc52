//! Variable references and indexing.
//!
//! A reference resolves to the symbol's storage. Indexing a declared array
//! steps through it with a leading zero index; indexing a parameter array
//! first loads the row pointer held in its slot.
//!
//! ```text
//! int a[2][3];   a[i]    -> getelementptr [2 x [3 x i32]], a, 0, i     : [3 x i32]*
//! int p[][3];    p[i][j] -> load p; getelementptr [3 x i32], %p, i, j   : i32*
//! ```

use sysy_ast::VarExpr;
use sysy_core::{CompilationError, DataType, Primitive};

use super::{ExprCompiler, Result};
use crate::ir::Value;

/// Load a scalar, or decay an array to the address of its first element.
pub fn compile_var<'ast>(compiler: &mut ExprCompiler<'_>, var: &VarExpr<'ast>) -> Result<Value> {
    let (address, data_type) = compile_address(compiler, var)?;
    if data_type.is_scalar() || data_type.is_decayed() {
        return compiler.ctx.build_load(address);
    }
    compiler
        .ctx
        .build_gep(address, vec![Value::int(0), Value::int(0)])
}

/// Address of the referenced storage, and the type stored there.
pub fn compile_address<'ast>(
    compiler: &mut ExprCompiler<'_>,
    var: &VarExpr<'ast>,
) -> Result<(Value, DataType)> {
    let name = var.name.name;
    let symbol = compiler.ctx.resolve(name, var.span)?;
    let (address, data_type) = (symbol.address.clone(), symbol.data_type.clone());

    if var.indices.is_empty() {
        return Ok((address, data_type));
    }
    let remaining = data_type
        .indexed(var.indices.len())
        .ok_or_else(|| CompilationError::InvalidIndex {
            name: name.to_string(),
            message: format!(
                "{} subscript(s) on a value of type '{data_type}'",
                var.indices.len()
            ),
            span: var.span,
        })?;

    let mut indices = Vec::with_capacity(var.indices.len() + 1);
    if data_type.is_decayed() {
        let rows = compiler.ctx.build_load(address)?;
        for index in var.indices {
            indices.push(compiler.compile_as(index, Primitive::Int)?);
        }
        let element = compiler.ctx.build_gep(rows, indices)?;
        return Ok((element, remaining));
    }

    indices.push(Value::int(0));
    for index in var.indices {
        indices.push(compiler.compile_as(index, Primitive::Int)?);
    }
    let element = compiler.ctx.build_gep(address, indices)?;
    Ok((element, remaining))
}
