//! IR types.

use std::fmt;

/// A first-class or aggregate IR type.
///
/// Pointers are typed; an array is `[len x element]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IrType {
    Void,
    /// Boolean (`i1`)
    I1,
    /// 32-bit integer
    I32,
    /// Single-precision float
    F32,
    Ptr(Box<IrType>),
    Array(u32, Box<IrType>),
}

impl IrType {
    /// `self*`
    pub fn ptr_to(self) -> IrType {
        IrType::Ptr(Box::new(self))
    }

    /// `[len x self]`
    pub fn array_of(self, len: u32) -> IrType {
        IrType::Array(len, Box::new(self))
    }

    /// The pointee of a pointer type.
    pub fn pointee(&self) -> Option<&IrType> {
        match self {
            IrType::Ptr(inner) => Some(inner),
            _ => None,
        }
    }

    /// The element type of an array type.
    pub fn element(&self) -> Option<&IrType> {
        match self {
            IrType::Array(_, inner) => Some(inner),
            _ => None,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, IrType::Void)
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, IrType::Ptr(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, IrType::Array(..))
    }

    /// `i1`, `i32` or `float`.
    pub fn is_scalar(&self) -> bool {
        matches!(self, IrType::I1 | IrType::I32 | IrType::F32)
    }
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrType::Void => f.write_str("void"),
            IrType::I1 => f.write_str("i1"),
            IrType::I32 => f.write_str("i32"),
            IrType::F32 => f.write_str("float"),
            IrType::Ptr(inner) => write!(f, "{inner}*"),
            IrType::Array(len, inner) => write!(f, "[{len} x {inner}]"),
        }
    }
}
