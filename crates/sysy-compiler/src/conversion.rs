//! Type representation and implicit conversions.
//!
//! ## Conversion table
//!
//! | from \ to | bool | int | float |
//! |-----------|------|-----|-------|
//! | bool      | -    | zext | uitofp |
//! | int       | `!= 0` | - | sitofp |
//! | float     | `!= 0.0` | fptosi | - |
//!
//! Conversions to or from void, and of arrays, are errors.

use sysy_core::{CompilationError, DataType, Primitive, Span};

use crate::context::CompilationContext;
use crate::ir::{CastOp, FloatPredicate, IntPredicate, IrType, Value};

type Result<T> = std::result::Result<T, CompilationError>;

pub fn scalar_type(base: Primitive) -> IrType {
    match base {
        Primitive::Void => IrType::Void,
        Primitive::Bool => IrType::I1,
        Primitive::Int => IrType::I32,
        Primitive::Float => IrType::F32,
    }
}

/// Storage type of a semantic type.
///
/// Extents nest outermost first; an unspecified leading extent becomes a
/// pointer to the row type.
///
/// ```
/// use sysy_compiler::conversion::representation;
/// use sysy_core::{DataType, Primitive};
///
/// let param = DataType::array(Primitive::Int, vec![None, Some(3)]);
/// assert_eq!(representation(&param).to_string(), "[3 x i32]*");
/// ```
pub fn representation(ty: &DataType) -> IrType {
    ty.dims
        .iter()
        .rev()
        .fold(scalar_type(ty.base), |inner, dim| match dim {
            Some(len) => inner.array_of(*len),
            None => inner.ptr_to(),
        })
}

/// Semantic type of a lowered value, recovered from its IR type.
///
/// A pointer is a decayed array: `i32*` is `int[]`, `[3 x i32]*` is
/// `int[][3]`.
pub fn infer(ty: &IrType) -> DataType {
    match ty {
        IrType::Void => DataType::void(),
        IrType::I1 => DataType::bool(),
        IrType::I32 => DataType::int(),
        IrType::F32 => DataType::float(),
        IrType::Ptr(inner) => {
            let mut data_type = infer(inner);
            data_type.dims.insert(0, None);
            data_type
        }
        IrType::Array(len, inner) => {
            let mut data_type = infer(inner);
            data_type.dims.insert(0, Some(*len));
            data_type
        }
    }
}

/// Coerce `value` to the scalar type `target`.
pub fn convert(
    ctx: &mut CompilationContext,
    value: Value,
    target: Primitive,
    span: Span,
) -> Result<Value> {
    let from = infer(&value.ty);
    let invalid = || CompilationError::InvalidConversion {
        from: from.to_string(),
        to: target.to_string(),
        span,
    };
    let source = from.as_scalar().ok_or_else(invalid)?;
    if source.is_void() || target.is_void() {
        return Err(invalid());
    }
    match (source, target) {
        (a, b) if a == b => Ok(value),
        (Primitive::Int, Primitive::Float) => ctx.build_cast(CastOp::SiToFp, value),
        (Primitive::Float, Primitive::Int) => ctx.build_cast(CastOp::FpToSi, value),
        (Primitive::Bool, Primitive::Int) => ctx.build_cast(CastOp::ZExt, value),
        (Primitive::Bool, Primitive::Float) => ctx.build_cast(CastOp::UiToFp, value),
        (Primitive::Int, Primitive::Bool) => ctx.build_icmp(IntPredicate::Ne, value, Value::int(0)),
        (Primitive::Float, Primitive::Bool) => {
            ctx.build_fcmp(FloatPredicate::One, value, Value::float(0.0))
        }
        _ => Err(invalid()),
    }
}

/// Common operand type for a binary operator.
///
/// Picks the highest-ranked type of `allowed` that one of the operands has;
/// the other operand converts to it.
pub fn resolve_common(
    op: &str,
    lhs: &DataType,
    rhs: &DataType,
    allowed: &[Primitive],
    span: Span,
) -> Result<Primitive> {
    let candidates = [lhs.as_scalar(), rhs.as_scalar()];
    allowed
        .iter()
        .copied()
        .filter(|ty| candidates.contains(&Some(*ty)))
        .max()
        .ok_or_else(|| CompilationError::InvalidOperator {
            op: op.to_string(),
            left: lhs.to_string(),
            right: rhs.to_string(),
            span,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NUMERIC: [Primitive; 2] = [Primitive::Int, Primitive::Float];

    #[test]
    fn representation_of_arrays() {
        let ty = DataType::array(Primitive::Float, vec![Some(2), Some(3)]);
        assert_eq!(representation(&ty), IrType::F32.array_of(3).array_of(2));
        assert_eq!(representation(&DataType::bool()), IrType::I1);
    }

    #[test]
    fn infer_round_trips_decayed_parameters() {
        let param = DataType::array(Primitive::Int, vec![None, Some(4)]);
        assert_eq!(infer(&representation(&param)), param);
    }

    #[test]
    fn common_type_prefers_float() {
        let common =
            resolve_common("+", &DataType::int(), &DataType::float(), &NUMERIC, Span::default());
        assert_eq!(common, Ok(Primitive::Float));
    }

    #[test]
    fn bool_operand_widens_to_other_side() {
        let common =
            resolve_common("+", &DataType::bool(), &DataType::int(), &NUMERIC, Span::default());
        assert_eq!(common, Ok(Primitive::Int));
    }

    #[test]
    fn no_allowed_operand_is_invalid_operator() {
        let err = resolve_common(
            "*",
            &DataType::bool(),
            &DataType::void(),
            &NUMERIC,
            Span::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CompilationError::InvalidOperator { ref op, .. } if op == "*"));
    }

    #[test]
    fn arrays_never_convert() {
        let mut ctx = CompilationContext::new("test");
        let decayed = Value::undef(IrType::I32.ptr_to());
        let err = convert(&mut ctx, decayed, Primitive::Int, Span::default()).unwrap_err();
        assert_eq!(
            err,
            CompilationError::InvalidConversion {
                from: "int[]".into(),
                to: "int".into(),
                span: Span::default()
            }
        );
    }

    #[test]
    fn constants_convert_without_emitting() {
        let mut ctx = CompilationContext::new("test");
        let three = convert(&mut ctx, Value::int(3), Primitive::Float, Span::default());
        assert_eq!(three, Ok(Value::float(3.0)));
        let truncated = convert(&mut ctx, Value::float(3.9), Primitive::Int, Span::default());
        assert_eq!(truncated, Ok(Value::int(3)));
        let truthy = convert(&mut ctx, Value::float(0.5), Primitive::Bool, Span::default());
        assert_eq!(truthy, Ok(Value::bool(true)));
    }
}
