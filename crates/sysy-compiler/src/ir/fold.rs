//! Constant folding applied while emitting.
//!
//! Each function returns `None` when the operands are not all constants or
//! the result is not representable (integer division by zero, `i32::MIN / -1`).

use super::{BinaryOp, CastOp, FloatPredicate, IntPredicate, UnaryOp, Value};

pub fn fold_binary(op: BinaryOp, lhs: &Value, rhs: &Value) -> Option<Value> {
    if op.is_float() {
        let (a, b) = (lhs.as_float()?, rhs.as_float()?);
        let result = match op {
            BinaryOp::FAdd => a + b,
            BinaryOp::FSub => a - b,
            BinaryOp::FMul => a * b,
            BinaryOp::FDiv => a / b,
            _ => return None,
        };
        return Some(Value::float(result));
    }
    let (a, b) = (lhs.as_int()?, rhs.as_int()?);
    let result = match op {
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Sub => a.wrapping_sub(b),
        BinaryOp::Mul => a.wrapping_mul(b),
        BinaryOp::SDiv => a.checked_div(b)?,
        BinaryOp::SRem => a.checked_rem(b)?,
        _ => return None,
    };
    Some(Value::int(result))
}

pub fn fold_unary(op: UnaryOp, operand: &Value) -> Option<Value> {
    match op {
        UnaryOp::Neg => operand.as_int().map(|v| Value::int(v.wrapping_neg())),
        UnaryOp::FNeg => operand.as_float().map(|v| Value::float(-v)),
        UnaryOp::Not => operand.as_bool().map(|v| Value::bool(!v)),
    }
}

pub fn fold_icmp(pred: IntPredicate, lhs: &Value, rhs: &Value) -> Option<Value> {
    let (a, b) = match (lhs.as_int(), rhs.as_int()) {
        (Some(a), Some(b)) => (a, b),
        _ => {
            let (a, b) = (lhs.as_bool()?, rhs.as_bool()?);
            (i32::from(a), i32::from(b))
        }
    };
    let result = match pred {
        IntPredicate::Eq => a == b,
        IntPredicate::Ne => a != b,
        IntPredicate::Slt => a < b,
        IntPredicate::Sle => a <= b,
        IntPredicate::Sgt => a > b,
        IntPredicate::Sge => a >= b,
    };
    Some(Value::bool(result))
}

pub fn fold_fcmp(pred: FloatPredicate, lhs: &Value, rhs: &Value) -> Option<Value> {
    let (a, b) = (lhs.as_float()?, rhs.as_float()?);
    if a.is_nan() || b.is_nan() {
        return Some(Value::bool(false));
    }
    let result = match pred {
        FloatPredicate::Oeq => a == b,
        FloatPredicate::One => a != b,
        FloatPredicate::Olt => a < b,
        FloatPredicate::Ole => a <= b,
        FloatPredicate::Ogt => a > b,
        FloatPredicate::Oge => a >= b,
    };
    Some(Value::bool(result))
}

/// Float to int truncates toward zero; out-of-range values saturate.
pub fn fold_cast(op: CastOp, value: &Value) -> Option<Value> {
    match op {
        CastOp::SiToFp => value.as_int().map(|v| Value::float(v as f32)),
        CastOp::FpToSi => value.as_float().map(|v| Value::int(v as i32)),
        CastOp::ZExt => value.as_bool().map(|v| Value::int(i32::from(v))),
        CastOp::UiToFp => value.as_bool().map(|v| Value::float(if v { 1.0 } else { 0.0 })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_arithmetic_wraps() {
        let folded = fold_binary(BinaryOp::Add, &Value::int(i32::MAX), &Value::int(1));
        assert_eq!(folded, Some(Value::int(i32::MIN)));
    }

    #[test]
    fn division_by_zero_is_not_folded() {
        assert_eq!(fold_binary(BinaryOp::SDiv, &Value::int(1), &Value::int(0)), None);
        assert_eq!(fold_binary(BinaryOp::SRem, &Value::int(1), &Value::int(0)), None);
        assert_eq!(
            fold_binary(BinaryOp::SDiv, &Value::int(i32::MIN), &Value::int(-1)),
            None
        );
    }

    #[test]
    fn float_to_int_truncates_toward_zero() {
        assert_eq!(fold_cast(CastOp::FpToSi, &Value::float(3.9)), Some(Value::int(3)));
        assert_eq!(fold_cast(CastOp::FpToSi, &Value::float(-3.9)), Some(Value::int(-3)));
        assert_eq!(fold_cast(CastOp::SiToFp, &Value::int(3)), Some(Value::float(3.0)));
    }

    #[test]
    fn ordered_compare_with_nan_is_false() {
        let nan = Value::float(f32::NAN);
        assert_eq!(
            fold_fcmp(FloatPredicate::One, &nan, &Value::float(0.0)),
            Some(Value::bool(false))
        );
    }

    #[test]
    fn non_constants_are_left_alone() {
        let arg = Value::arg(0, crate::ir::IrType::I32);
        assert_eq!(fold_binary(BinaryOp::Add, &arg, &Value::int(1)), None);
        assert_eq!(fold_unary(UnaryOp::Neg, &arg), None);
    }
}
