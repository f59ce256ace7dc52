//! Semantic types of the source language.
//!
//! A [`DataType`] is a [`Primitive`] base plus an ordered list of array
//! extents. Scalars have no extents. A `None` extent only ever appears in the
//! leading position of a function parameter, where the array decays to a
//! pointer to its first row.
//!
//! ```
//! use sysy_core::{DataType, Primitive};
//!
//! let matrix = DataType::array(Primitive::Int, vec![Some(2), Some(3)]);
//! assert_eq!(matrix.to_string(), "int[2][3]");
//!
//! let row_param = DataType::array(Primitive::Float, vec![None, Some(3)]);
//! assert!(row_param.is_decayed());
//! assert_eq!(row_param.to_string(), "float[][3]");
//! ```

use std::fmt::{self, Display, Formatter};

/// Scalar base types.
///
/// Variants are ordered by conversion rank, so `Float > Int` holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    Void,
    Bool,
    Int,
    Float,
}

impl Primitive {
    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Void => "void",
            Primitive::Bool => "bool",
            Primitive::Int => "int",
            Primitive::Float => "float",
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Primitive::Void)
    }
}

impl Display for Primitive {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A complete semantic type: base plus array extents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataType {
    pub base: Primitive,
    pub dims: Vec<Option<u32>>,
}

impl DataType {
    pub fn scalar(base: Primitive) -> Self {
        Self {
            base,
            dims: Vec::new(),
        }
    }

    pub fn array(base: Primitive, dims: Vec<Option<u32>>) -> Self {
        Self { base, dims }
    }

    pub fn int() -> Self {
        Self::scalar(Primitive::Int)
    }

    pub fn float() -> Self {
        Self::scalar(Primitive::Float)
    }

    pub fn bool() -> Self {
        Self::scalar(Primitive::Bool)
    }

    pub fn void() -> Self {
        Self::scalar(Primitive::Void)
    }

    pub fn is_array(&self) -> bool {
        !self.dims.is_empty()
    }

    pub fn is_scalar(&self) -> bool {
        self.dims.is_empty()
    }

    pub fn is_void(&self) -> bool {
        self.is_scalar() && self.base.is_void()
    }

    /// Whether the leading extent is unspecified (pointer decay).
    pub fn is_decayed(&self) -> bool {
        matches!(self.dims.first(), Some(None))
    }

    /// The scalar base when this is not an array.
    pub fn as_scalar(&self) -> Option<Primitive> {
        if self.is_scalar() {
            Some(self.base)
        } else {
            None
        }
    }

    /// The type left after indexing `count` leading dimensions away.
    pub fn indexed(&self, count: usize) -> Option<DataType> {
        if count > self.dims.len() {
            return None;
        }
        Some(DataType {
            base: self.base,
            dims: self.dims[count..].to_vec(),
        })
    }

    /// Number of scalar elements, when every extent is known.
    pub fn element_count(&self) -> Option<u64> {
        self.dims
            .iter()
            .try_fold(1u64, |acc, dim| dim.map(|d| acc * u64::from(d)))
    }
}

impl From<Primitive> for DataType {
    fn from(base: Primitive) -> Self {
        DataType::scalar(base)
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        for dim in &self.dims {
            match dim {
                Some(n) => write!(f, "[{n}]")?,
                None => write!(f, "[]")?,
            }
        }
        Ok(())
    }
}
