//! Unary operators.

use sysy_ast::{UnaryExpr, UnaryOp};
use sysy_core::{CompilationError, Primitive};

use super::{ExprCompiler, Result};
use crate::conversion::infer;
use crate::ir::{UnaryOp as IrUnaryOp, Value};

/// `+x` and `-x` work on int or float (a bool operand becomes int);
/// `!x` works on any scalar coerced to bool.
pub fn compile_unary<'ast>(
    compiler: &mut ExprCompiler<'_>,
    unary: &UnaryExpr<'ast>,
) -> Result<Value> {
    let operand = compiler.compile(unary.operand)?;
    let data_type = infer(&operand.ty);
    let invalid = || CompilationError::InvalidOperandType {
        op: unary.op.to_string(),
        ty: data_type.to_string(),
        span: unary.span,
    };
    let base = match data_type.as_scalar() {
        Some(base) if !base.is_void() => base,
        _ => return Err(invalid()),
    };

    match unary.op {
        UnaryOp::Plus | UnaryOp::Minus => {
            let target = if base == Primitive::Float {
                Primitive::Float
            } else {
                Primitive::Int
            };
            let value = compiler.convert(operand, target, unary.span)?;
            if unary.op == UnaryOp::Plus {
                return Ok(value);
            }
            let op = if target == Primitive::Float {
                IrUnaryOp::FNeg
            } else {
                IrUnaryOp::Neg
            };
            compiler.ctx.build_unary(op, value)
        }
        UnaryOp::Not => {
            let value = compiler.convert(operand, Primitive::Bool, unary.span)?;
            compiler.ctx.build_unary(IrUnaryOp::Not, value)
        }
    }
}
