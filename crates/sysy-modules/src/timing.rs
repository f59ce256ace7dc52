//! Timer hooks.
//!
//! The runtime brackets a timed region with these calls; the argument is
//! the source line of the call.

use sysy_core::{DataType, FunctionSignature, Primitive};

/// `void _sysy_starttime(int lineno)`
pub fn starttime() -> FunctionSignature {
    FunctionSignature::new("_sysy_starttime", vec![DataType::int()], Primitive::Void)
}

/// `void _sysy_stoptime(int lineno)`
pub fn stoptime() -> FunctionSignature {
    FunctionSignature::new("_sysy_stoptime", vec![DataType::int()], Primitive::Void)
}

pub fn prototypes() -> Vec<FunctionSignature> {
    vec![starttime(), stoptime()]
}
