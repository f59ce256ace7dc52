//! Function signatures supplied for externally defined functions.

use crate::{DataType, Primitive};

/// Name, parameter types and return type of a callable function.
///
/// Library prototypes are registered from these before a compile unit is
/// lowered; afterwards they are callable exactly like user functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub name: String,
    pub params: Vec<DataType>,
    pub return_type: Primitive,
}

impl FunctionSignature {
    pub fn new(name: impl Into<String>, params: Vec<DataType>, return_type: Primitive) -> Self {
        Self {
            name: name.into(),
            params,
            return_type,
        }
    }
}
