//! Numeric literals.

use sysy_ast::{Number, NumberExpr};

use crate::ir::Value;

/// An `i32` or `float` constant, following the literal's lexical kind.
pub fn compile_number(number: &NumberExpr) -> Value {
    match number.value {
        Number::Int(v) => Value::int(v),
        Number::Float(v) => Value::float(v),
    }
}
