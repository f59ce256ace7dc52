//! Compile-time evaluation of constant expressions.
//!
//! Used for array extents, constant initializers and global initializers.
//! Literals, constants (including elements of constant arrays at constant
//! indices) and every operator fold; variables and calls do not.

use sysy_ast::{BinaryExpr, BinaryOp, Expr, Number, UnaryExpr, UnaryOp, VarExpr};
use sysy_core::{CompilationError, DataType, Primitive, Span};

use crate::conversion::resolve_common;
use crate::ir::{Initializer, Value};
use crate::scope::ScopeStack;

type Result<T> = std::result::Result<T, CompilationError>;

const NUMERIC: [Primitive; 2] = [Primitive::Int, Primitive::Float];

/// A scalar known at compile time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstValue {
    Bool(bool),
    Int(i32),
    Float(f32),
}

impl ConstValue {
    pub fn primitive(&self) -> Primitive {
        match self {
            ConstValue::Bool(_) => Primitive::Bool,
            ConstValue::Int(_) => Primitive::Int,
            ConstValue::Float(_) => Primitive::Float,
        }
    }

    /// The same conversions the runtime applies.
    pub fn convert(self, target: Primitive) -> Option<ConstValue> {
        let converted = match (self, target) {
            (ConstValue::Bool(b), Primitive::Bool) => ConstValue::Bool(b),
            (ConstValue::Bool(b), Primitive::Int) => ConstValue::Int(i32::from(b)),
            (ConstValue::Bool(b), Primitive::Float) => ConstValue::Float(if b { 1.0 } else { 0.0 }),
            (ConstValue::Int(v), Primitive::Bool) => ConstValue::Bool(v != 0),
            (ConstValue::Int(v), Primitive::Int) => ConstValue::Int(v),
            (ConstValue::Int(v), Primitive::Float) => ConstValue::Float(v as f32),
            (ConstValue::Float(v), Primitive::Bool) => ConstValue::Bool(v != 0.0),
            (ConstValue::Float(v), Primitive::Int) => ConstValue::Int(v as i32),
            (ConstValue::Float(v), Primitive::Float) => ConstValue::Float(v),
            (_, Primitive::Void) => return None,
        };
        Some(converted)
    }

    pub fn to_value(self) -> Value {
        match self {
            ConstValue::Bool(b) => Value::bool(b),
            ConstValue::Int(v) => Value::int(v),
            ConstValue::Float(v) => Value::float(v),
        }
    }

    pub fn to_initializer(self) -> Initializer {
        match self {
            ConstValue::Bool(b) => Initializer::Int(i32::from(b)),
            ConstValue::Int(v) => Initializer::Int(v),
            ConstValue::Float(v) => Initializer::Float(v),
        }
    }
}

/// Contents of a constant: row-major scalar values over `dims`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstInit {
    pub dims: Vec<u32>,
    pub values: Vec<ConstValue>,
}

impl ConstInit {
    pub fn scalar(value: ConstValue) -> Self {
        Self {
            dims: Vec::new(),
            values: vec![value],
        }
    }

    /// Element at fully specified `indices`, if in bounds.
    pub fn element(&self, indices: &[i64]) -> Option<ConstValue> {
        if indices.len() != self.dims.len() {
            return None;
        }
        let mut offset = 0usize;
        for (&index, &dim) in indices.iter().zip(&self.dims) {
            if index < 0 || index >= i64::from(dim) {
                return None;
            }
            offset = offset * dim as usize + index as usize;
        }
        self.values.get(offset).copied()
    }

    /// Nested global initializer.
    pub fn to_initializer(&self) -> Initializer {
        nest(&self.dims, &self.values)
    }
}

fn nest(dims: &[u32], values: &[ConstValue]) -> Initializer {
    let Some((_, inner)) = dims.split_first() else {
        return values
            .first()
            .map_or(Initializer::Zero, |v| v.to_initializer());
    };
    let stride = inner.iter().map(|&d| d as usize).product::<usize>().max(1);
    let init = Initializer::Array(
        values
            .chunks(stride)
            .map(|chunk| nest(inner, chunk))
            .collect(),
    );
    if init.is_zero() { Initializer::Zero } else { init }
}

/// Evaluates expressions against the constants visible in a scope stack.
pub struct ConstEvaluator<'a> {
    scopes: &'a ScopeStack,
}

impl<'a> ConstEvaluator<'a> {
    pub fn new(scopes: &'a ScopeStack) -> Self {
        Self { scopes }
    }

    pub fn eval(&self, expr: &Expr<'_>) -> Result<ConstValue> {
        match expr {
            Expr::Number(n) => Ok(match n.value {
                Number::Int(v) => ConstValue::Int(v),
                Number::Float(v) => ConstValue::Float(v),
            }),
            Expr::Var(var) => self.eval_var(var),
            Expr::Unary(unary) => self.eval_unary(unary),
            Expr::Binary(binary) => self.eval_binary(binary),
            Expr::Call(call) => Err(CompilationError::NonConstantExpression {
                what: format!("call to '{}'", call.name.name),
                span: call.span,
            }),
        }
    }

    /// Evaluate and convert to `target`.
    pub fn eval_as(&self, expr: &Expr<'_>, target: Primitive) -> Result<ConstValue> {
        let value = self.eval(expr)?;
        value
            .convert(target)
            .ok_or_else(|| CompilationError::InvalidConversion {
                from: value.primitive().to_string(),
                to: target.to_string(),
                span: expr.span(),
            })
    }

    /// An array extent: a non-negative int.
    pub fn eval_extent(&self, expr: &Expr<'_>) -> Result<u32> {
        match self.eval(expr)? {
            ConstValue::Int(v) => u32::try_from(v).map_err(|_| {
                CompilationError::InvalidArrayDimension {
                    message: format!("extent {v} is negative"),
                    span: expr.span(),
                }
            }),
            other => Err(CompilationError::InvalidArrayDimension {
                message: format!("extent has type '{}', expected 'int'", other.primitive()),
                span: expr.span(),
            }),
        }
    }

    fn eval_var(&self, var: &VarExpr<'_>) -> Result<ConstValue> {
        let name = var.name.name;
        let symbol = self.scopes.resolve(name, var.span)?;
        let init = symbol
            .constant
            .as_ref()
            .ok_or_else(|| CompilationError::NonConstantExpression {
                what: format!("variable '{name}'"),
                span: var.span,
            })?;
        if var.indices.len() != init.dims.len() {
            return Err(CompilationError::InvalidIndex {
                name: name.to_string(),
                message: format!(
                    "constant expression needs {} subscript(s), found {}",
                    init.dims.len(),
                    var.indices.len()
                ),
                span: var.span,
            });
        }
        let mut indices = Vec::with_capacity(var.indices.len());
        for index in var.indices {
            match self.eval(index)?.convert(Primitive::Int) {
                Some(ConstValue::Int(v)) => indices.push(i64::from(v)),
                _ => {
                    return Err(CompilationError::InvalidIndex {
                        name: name.to_string(),
                        message: "subscript is not an integer".to_string(),
                        span: index.span(),
                    });
                }
            }
        }
        init.element(&indices)
            .ok_or_else(|| CompilationError::InvalidIndex {
                name: name.to_string(),
                message: format!("subscript {indices:?} is out of bounds"),
                span: var.span,
            })
    }

    fn eval_unary(&self, unary: &UnaryExpr<'_>) -> Result<ConstValue> {
        let operand = self.eval(unary.operand)?;
        match unary.op {
            UnaryOp::Not => Ok(ConstValue::Bool(!truthy(operand))),
            UnaryOp::Plus | UnaryOp::Minus => {
                let value = match operand {
                    ConstValue::Float(_) => operand,
                    _ => operand
                        .convert(Primitive::Int)
                        .unwrap_or(ConstValue::Int(0)),
                };
                Ok(match (unary.op, value) {
                    (UnaryOp::Minus, ConstValue::Int(v)) => ConstValue::Int(v.wrapping_neg()),
                    (UnaryOp::Minus, ConstValue::Float(v)) => ConstValue::Float(-v),
                    _ => value,
                })
            }
        }
    }

    fn eval_binary(&self, binary: &BinaryExpr<'_>) -> Result<ConstValue> {
        let lhs = self.eval(binary.left)?;
        let rhs = self.eval(binary.right)?;
        if binary.op.is_logical() {
            let result = match binary.op {
                BinaryOp::And => truthy(lhs) && truthy(rhs),
                _ => truthy(lhs) || truthy(rhs),
            };
            return Ok(ConstValue::Bool(result));
        }

        let common = resolve_common(
            binary.op.as_str(),
            &DataType::scalar(lhs.primitive()),
            &DataType::scalar(rhs.primitive()),
            &NUMERIC,
            binary.span,
        )?;
        match (lhs.convert(common), rhs.convert(common)) {
            (Some(ConstValue::Int(a)), Some(ConstValue::Int(b))) => int_binary(binary, a, b),
            (Some(ConstValue::Float(a)), Some(ConstValue::Float(b))) => float_binary(binary, a, b),
            _ => Err(CompilationError::internal("constant operands did not convert")),
        }
    }
}

fn truthy(value: ConstValue) -> bool {
    matches!(value.convert(Primitive::Bool), Some(ConstValue::Bool(true)))
}

fn int_binary(binary: &BinaryExpr<'_>, a: i32, b: i32) -> Result<ConstValue> {
    let division_by_zero = |span: Span| CompilationError::NonConstantExpression {
        what: "integer division by zero".to_string(),
        span,
    };
    Ok(match binary.op {
        BinaryOp::Add => ConstValue::Int(a.wrapping_add(b)),
        BinaryOp::Sub => ConstValue::Int(a.wrapping_sub(b)),
        BinaryOp::Mul => ConstValue::Int(a.wrapping_mul(b)),
        BinaryOp::Div if b == 0 => return Err(division_by_zero(binary.span)),
        BinaryOp::Div => ConstValue::Int(a.wrapping_div(b)),
        BinaryOp::Mod if b == 0 => return Err(division_by_zero(binary.span)),
        BinaryOp::Mod => ConstValue::Int(a.wrapping_rem(b)),
        BinaryOp::Lt => ConstValue::Bool(a < b),
        BinaryOp::Le => ConstValue::Bool(a <= b),
        BinaryOp::Gt => ConstValue::Bool(a > b),
        BinaryOp::Ge => ConstValue::Bool(a >= b),
        BinaryOp::Eq => ConstValue::Bool(a == b),
        BinaryOp::Ne => ConstValue::Bool(a != b),
        BinaryOp::And | BinaryOp::Or => {
            return Err(CompilationError::internal("logical operator in arithmetic folding"));
        }
    })
}

fn float_binary(binary: &BinaryExpr<'_>, a: f32, b: f32) -> Result<ConstValue> {
    Ok(match binary.op {
        BinaryOp::Add => ConstValue::Float(a + b),
        BinaryOp::Sub => ConstValue::Float(a - b),
        BinaryOp::Mul => ConstValue::Float(a * b),
        BinaryOp::Div => ConstValue::Float(a / b),
        BinaryOp::Mod => {
            return Err(CompilationError::InvalidOperator {
                op: "%".to_string(),
                left: "float".to_string(),
                right: "float".to_string(),
                span: binary.span,
            });
        }
        BinaryOp::Lt => ConstValue::Bool(a < b),
        BinaryOp::Le => ConstValue::Bool(a <= b),
        BinaryOp::Gt => ConstValue::Bool(a > b),
        BinaryOp::Ge => ConstValue::Bool(a >= b),
        BinaryOp::Eq => ConstValue::Bool(a == b),
        BinaryOp::Ne => ConstValue::Bool(!a.is_nan() && !b.is_nan() && a != b),
        BinaryOp::And | BinaryOp::Or => {
            return Err(CompilationError::internal("logical operator in arithmetic folding"));
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Symbol;
    use bumpalo::Bump;
    use sysy_ast::AstBuilder;

    fn scopes_with_table() -> ScopeStack {
        let mut scopes = ScopeStack::new();
        scopes
            .declare(Symbol {
                name: "N".into(),
                data_type: DataType::int(),
                address: Value::int(0),
                constant: Some(ConstInit::scalar(ConstValue::Int(4))),
                span: Span::default(),
            })
            .unwrap();
        scopes
            .declare(Symbol {
                name: "table".into(),
                data_type: DataType::array(Primitive::Int, vec![Some(2), Some(2)]),
                address: Value::int(0),
                constant: Some(ConstInit {
                    dims: vec![2, 2],
                    values: [1, 2, 3, 4].map(ConstValue::Int).to_vec(),
                }),
                span: Span::default(),
            })
            .unwrap();
        scopes
    }

    #[test]
    fn folds_constants_and_operators() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let scopes = scopes_with_table();
        let eval = ConstEvaluator::new(&scopes);

        // N * 2 + table[1][0]
        let expr = b.binary(
            b.binary(b.var("N"), BinaryOp::Mul, b.int(2)),
            BinaryOp::Add,
            b.index("table", &[b.int(1), b.int(0)]),
        );
        assert_eq!(eval.eval(expr), Ok(ConstValue::Int(11)));
        assert_eq!(eval.eval_extent(expr), Ok(11));
    }

    #[test]
    fn mixed_arithmetic_widens_to_float() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let scopes = ScopeStack::new();
        let eval = ConstEvaluator::new(&scopes);
        let expr = b.binary(b.int(1), BinaryOp::Div, b.float(2.0));
        assert_eq!(eval.eval(expr), Ok(ConstValue::Float(0.5)));
    }

    #[test]
    fn calls_and_variables_are_not_constant() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut scopes = ScopeStack::new();
        scopes
            .declare(Symbol {
                name: "v".into(),
                data_type: DataType::int(),
                address: Value::int(0),
                constant: None,
                span: Span::default(),
            })
            .unwrap();
        let eval = ConstEvaluator::new(&scopes);
        assert!(matches!(
            eval.eval(b.call("getint", &[])),
            Err(CompilationError::NonConstantExpression { .. })
        ));
        assert!(matches!(
            eval.eval(b.var("v")),
            Err(CompilationError::NonConstantExpression { .. })
        ));
    }

    #[test]
    fn negative_extent_is_rejected() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let scopes = ScopeStack::new();
        let eval = ConstEvaluator::new(&scopes);
        let expr = b.unary(UnaryOp::Minus, b.int(1));
        assert!(matches!(
            eval.eval_extent(expr),
            Err(CompilationError::InvalidArrayDimension { .. })
        ));
    }

    #[test]
    fn out_of_bounds_constant_index() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let scopes = scopes_with_table();
        let eval = ConstEvaluator::new(&scopes);
        assert!(matches!(
            eval.eval(b.index("table", &[b.int(2), b.int(0)])),
            Err(CompilationError::InvalidIndex { .. })
        ));
    }

    #[test]
    fn initializer_nesting_collapses_zero_rows() {
        let init = ConstInit {
            dims: vec![2, 2],
            values: [0, 0, 5, 0].map(ConstValue::Int).to_vec(),
        };
        assert_eq!(
            init.to_initializer(),
            Initializer::Array(vec![
                Initializer::Zero,
                Initializer::Array(vec![Initializer::Int(5), Initializer::Int(0)]),
            ])
        );
    }
}
