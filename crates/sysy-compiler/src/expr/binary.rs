//! Binary operators, including short-circuit `&&` and `||`.

use sysy_ast::{BinaryExpr, BinaryOp};
use sysy_core::{CompilationError, Primitive};

use super::{ExprCompiler, Result};
use crate::conversion::{infer, resolve_common};
use crate::ir::{BinaryOp as IrBinaryOp, FloatPredicate, IntPredicate, IrType, Value};

const NUMERIC: [Primitive; 2] = [Primitive::Int, Primitive::Float];

/// Lower a binary expression.
///
/// Arithmetic and comparisons convert both operands to their common numeric
/// type; `%` is int only. Comparisons yield bool.
pub fn compile_binary<'ast>(
    compiler: &mut ExprCompiler<'_>,
    binary: &BinaryExpr<'ast>,
) -> Result<Value> {
    if binary.op.is_logical() {
        return compile_short_circuit(compiler, binary);
    }

    let lhs = compiler.compile(binary.left)?;
    let rhs = compiler.compile(binary.right)?;
    let (lhs_type, rhs_type) = (infer(&lhs.ty), infer(&rhs.ty));
    let invalid = || CompilationError::InvalidOperator {
        op: binary.op.to_string(),
        left: lhs_type.to_string(),
        right: rhs_type.to_string(),
        span: binary.span,
    };
    if [&lhs_type, &rhs_type]
        .iter()
        .any(|ty| ty.is_array() || ty.is_void())
    {
        return Err(invalid());
    }

    let common = resolve_common(
        binary.op.as_str(),
        &lhs_type,
        &rhs_type,
        &NUMERIC,
        binary.span,
    )?;
    if binary.op == BinaryOp::Mod && common == Primitive::Float {
        return Err(invalid());
    }
    let lhs = compiler.convert(lhs, common, binary.left.span())?;
    let rhs = compiler.convert(rhs, common, binary.right.span())?;
    let float = common == Primitive::Float;
    let ctx = &mut *compiler.ctx;

    match binary.op {
        BinaryOp::Add if float => ctx.build_binary(IrBinaryOp::FAdd, lhs, rhs),
        BinaryOp::Add => ctx.build_binary(IrBinaryOp::Add, lhs, rhs),
        BinaryOp::Sub if float => ctx.build_binary(IrBinaryOp::FSub, lhs, rhs),
        BinaryOp::Sub => ctx.build_binary(IrBinaryOp::Sub, lhs, rhs),
        BinaryOp::Mul if float => ctx.build_binary(IrBinaryOp::FMul, lhs, rhs),
        BinaryOp::Mul => ctx.build_binary(IrBinaryOp::Mul, lhs, rhs),
        BinaryOp::Div if float => ctx.build_binary(IrBinaryOp::FDiv, lhs, rhs),
        BinaryOp::Div => ctx.build_binary(IrBinaryOp::SDiv, lhs, rhs),
        BinaryOp::Mod => ctx.build_binary(IrBinaryOp::SRem, lhs, rhs),
        BinaryOp::Lt if float => ctx.build_fcmp(FloatPredicate::Olt, lhs, rhs),
        BinaryOp::Lt => ctx.build_icmp(IntPredicate::Slt, lhs, rhs),
        BinaryOp::Le if float => ctx.build_fcmp(FloatPredicate::Ole, lhs, rhs),
        BinaryOp::Le => ctx.build_icmp(IntPredicate::Sle, lhs, rhs),
        BinaryOp::Gt if float => ctx.build_fcmp(FloatPredicate::Ogt, lhs, rhs),
        BinaryOp::Gt => ctx.build_icmp(IntPredicate::Sgt, lhs, rhs),
        BinaryOp::Ge if float => ctx.build_fcmp(FloatPredicate::Oge, lhs, rhs),
        BinaryOp::Ge => ctx.build_icmp(IntPredicate::Sge, lhs, rhs),
        BinaryOp::Eq if float => ctx.build_fcmp(FloatPredicate::Oeq, lhs, rhs),
        BinaryOp::Eq => ctx.build_icmp(IntPredicate::Eq, lhs, rhs),
        BinaryOp::Ne if float => ctx.build_fcmp(FloatPredicate::One, lhs, rhs),
        BinaryOp::Ne => ctx.build_icmp(IntPredicate::Ne, lhs, rhs),
        BinaryOp::And | BinaryOp::Or => Err(CompilationError::internal(
            "logical operator reached arithmetic lowering",
        )),
    }
}

/// `&&` / `||` with the right operand evaluated only when needed.
///
/// ```text
///   [left]                        [left]
///   br left, %and, %andm          br left, %orm, %or
/// and:                          or:
///   [right]                       [right]
///   br %andm                      br %orm
/// andm:                         orm:
///   phi [false, left], [right]    phi [true, left], [right]
/// ```
fn compile_short_circuit<'ast>(
    compiler: &mut ExprCompiler<'_>,
    binary: &BinaryExpr<'ast>,
) -> Result<Value> {
    if compiler.ctx.is_unreachable() {
        return Ok(Value::void());
    }
    let is_and = binary.op == BinaryOp::And;
    let (rhs_name, merge_name) = if is_and { ("and", "andm") } else { ("or", "orm") };
    let rhs_block = compiler.ctx.create_block(rhs_name)?;
    let merge_block = compiler.ctx.create_block(merge_name)?;

    let lhs = compiler.compile_condition(binary.left)?;
    if lhs.as_bool() == Some(is_and) {
        // `true && r` and `false || r` are just `r`.
        return compiler.compile_condition(binary.right);
    }
    let from_lhs = open_cursor(compiler)?;
    match lhs.as_bool() {
        // A constant left side decides the result; the right side gets no
        // incoming edge.
        Some(_) => compiler.ctx.build_br(merge_block)?,
        None if is_and => compiler.ctx.build_cond_br(lhs, rhs_block, merge_block)?,
        None => compiler.ctx.build_cond_br(lhs, merge_block, rhs_block)?,
    }

    compiler.ctx.open_block(rhs_block)?;
    let rhs = compiler.compile_condition(binary.right)?;
    let from_rhs = open_cursor(compiler)?;
    compiler.ctx.build_br(merge_block)?;

    compiler.ctx.open_block(merge_block)?;
    // Skipping the right side means the left side alone decided the result.
    compiler.ctx.build_phi(
        IrType::I1,
        vec![(Value::bool(!is_and), from_lhs), (rhs, from_rhs)],
    )
}

fn open_cursor(compiler: &ExprCompiler<'_>) -> Result<crate::ir::BlockId> {
    compiler
        .ctx
        .cursor()
        .ok_or_else(|| CompilationError::internal("operand lowering closed the block"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::test_support::{context_in_function, declare_local};
    use crate::ir::{InstKind, Terminator};
    use bumpalo::Bump;
    use sysy_ast::AstBuilder;
    use sysy_core::DataType;

    #[test]
    fn int_and_float_promote_to_float() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut ctx = context_in_function(Primitive::Void);
        let value = ExprCompiler::new(&mut ctx)
            .compile(b.binary(b.int(1), BinaryOp::Add, b.float(0.5)))
            .unwrap();
        assert_eq!(value, Value::float(1.5));
    }

    #[test]
    fn float_modulo_is_invalid() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut ctx = context_in_function(Primitive::Void);
        let err = ExprCompiler::new(&mut ctx)
            .compile(b.binary(b.float(1.0), BinaryOp::Mod, b.int(2)))
            .unwrap_err();
        assert!(matches!(err, CompilationError::InvalidOperator { ref op, .. } if op == "%"));
    }

    #[test]
    fn comparison_yields_bool() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut ctx = context_in_function(Primitive::Void);
        let value = ExprCompiler::new(&mut ctx)
            .compile(b.binary(b.float(1.0), BinaryOp::Ge, b.int(2)))
            .unwrap();
        assert_eq!(value, Value::bool(false));
    }

    #[test]
    fn and_builds_phi_with_false_from_left() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut ctx = context_in_function(Primitive::Void);
        declare_local(&mut ctx, "x", DataType::int());
        let value = ExprCompiler::new(&mut ctx)
            .compile(b.binary(b.var("x"), BinaryOp::And, b.int(1)))
            .unwrap();

        let function = ctx.current_function().unwrap();
        let entry = function.find_block("entry").unwrap();
        let rhs = function.find_block("and").unwrap();
        let merge = function.find_block("andm").unwrap();
        assert_eq!(function.successors(entry), vec![rhs, merge]);
        assert_eq!(
            function.inst(value.as_inst().unwrap()).kind,
            InstKind::Phi {
                incoming: vec![(Value::bool(false), entry), (Value::bool(true), rhs)],
            }
        );
        assert_eq!(ctx.cursor(), Some(merge));
    }

    #[test]
    fn constant_false_and_jumps_straight_to_merge() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut ctx = context_in_function(Primitive::Void);
        ExprCompiler::new(&mut ctx)
            .compile(b.binary(b.int(0), BinaryOp::And, b.int(1)))
            .unwrap();

        let function = ctx.current_function().unwrap();
        let entry = function.find_block("entry").unwrap();
        let rhs = function.find_block("and").unwrap();
        let merge = function.find_block("andm").unwrap();
        assert_eq!(function.block(entry).terminator, Some(Terminator::Br(merge)));
        assert!(function.predecessors(rhs).is_empty());
        assert_eq!(function.predecessors(merge), vec![entry, rhs]);
    }

    #[test]
    fn constant_true_and_is_the_right_operand() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut ctx = context_in_function(Primitive::Void);
        let value = ExprCompiler::new(&mut ctx)
            .compile(b.binary(b.int(2), BinaryOp::And, b.float(0.0)))
            .unwrap();
        assert_eq!(value, Value::bool(false));
        assert_eq!(ctx.current_function().unwrap().layout().len(), 1);
    }

    #[test]
    fn or_branches_to_merge_on_true() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut ctx = context_in_function(Primitive::Void);
        ExprCompiler::new(&mut ctx)
            .compile(b.binary(b.int(1), BinaryOp::Or, b.int(0)))
            .unwrap();
        let function = ctx.current_function().unwrap();
        let entry = function.find_block("entry").unwrap();
        let rhs = function.find_block("or").unwrap();
        let merge = function.find_block("orm").unwrap();
        assert_eq!(function.successors(entry), vec![merge, rhs]);
    }

    #[test]
    fn short_circuit_in_unreachable_code_yields_nothing() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut ctx = context_in_function(Primitive::Void);
        ctx.build_ret(None).unwrap();
        let value = ExprCompiler::new(&mut ctx)
            .compile(b.binary(b.int(1), BinaryOp::And, b.int(1)))
            .unwrap();
        assert!(value.is_void());
        assert_eq!(ctx.current_function().unwrap().layout().len(), 1);
    }
}
