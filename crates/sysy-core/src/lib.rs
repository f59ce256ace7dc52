//! Core types shared by the SysY middle end.
//!
//! - [`Span`]: source positions carried by AST nodes and errors
//! - [`CompilationError`]: the fatal error taxonomy of lowering
//! - [`Primitive`] / [`DataType`]: semantic types
//! - [`FunctionSignature`]: prototypes for externally defined functions

pub mod data_type;
pub mod error;
pub mod signature;
pub mod span;

pub use data_type::{DataType, Primitive};
pub use error::CompilationError;
pub use signature::FunctionSignature;
pub use span::Span;
