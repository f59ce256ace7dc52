//! Console input and output.
//!
//! The array readers return the number of elements read; the array writers
//! take the element count first.

use sysy_core::{DataType, FunctionSignature, Primitive};

// =============================================================================
// INPUT
// =============================================================================

/// `int getint()`
pub fn getint() -> FunctionSignature {
    FunctionSignature::new("getint", Vec::new(), Primitive::Int)
}

/// `int getch()`
pub fn getch() -> FunctionSignature {
    FunctionSignature::new("getch", Vec::new(), Primitive::Int)
}

/// `float getfloat()`
pub fn getfloat() -> FunctionSignature {
    FunctionSignature::new("getfloat", Vec::new(), Primitive::Float)
}

/// `int getarray(int a[])`
pub fn getarray() -> FunctionSignature {
    FunctionSignature::new("getarray", vec![row(Primitive::Int)], Primitive::Int)
}

/// `int getfarray(float a[])`
pub fn getfarray() -> FunctionSignature {
    FunctionSignature::new("getfarray", vec![row(Primitive::Float)], Primitive::Int)
}

// =============================================================================
// OUTPUT
// =============================================================================

/// `void putint(int)`
pub fn putint() -> FunctionSignature {
    FunctionSignature::new("putint", vec![DataType::int()], Primitive::Void)
}

/// `void putch(int)`
pub fn putch() -> FunctionSignature {
    FunctionSignature::new("putch", vec![DataType::int()], Primitive::Void)
}

/// `void putfloat(float)`
pub fn putfloat() -> FunctionSignature {
    FunctionSignature::new("putfloat", vec![DataType::float()], Primitive::Void)
}

/// `void putarray(int n, int a[])`
pub fn putarray() -> FunctionSignature {
    FunctionSignature::new(
        "putarray",
        vec![DataType::int(), row(Primitive::Int)],
        Primitive::Void,
    )
}

/// `void putfarray(int n, float a[])`
pub fn putfarray() -> FunctionSignature {
    FunctionSignature::new(
        "putfarray",
        vec![DataType::int(), row(Primitive::Float)],
        Primitive::Void,
    )
}

/// All console functions.
pub fn prototypes() -> Vec<FunctionSignature> {
    vec![
        getint(),
        getch(),
        getfloat(),
        getarray(),
        getfarray(),
        putint(),
        putch(),
        putfloat(),
        putarray(),
        putfarray(),
    ]
}

/// A decayed one-dimensional array parameter.
fn row(base: Primitive) -> DataType {
    DataType::array(base, vec![None])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_functions_take_decayed_rows() {
        assert_eq!(getarray().params[0].to_string(), "int[]");
        assert_eq!(putfarray().params[1].to_string(), "float[]");
        assert_eq!(putfarray().params[0], DataType::int());
    }
}
