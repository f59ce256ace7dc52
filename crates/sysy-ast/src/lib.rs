//! Abstract syntax tree for SysY compile units.
//!
//! The tree is produced by an external parser (or [`AstBuilder`]) and consumed
//! read-only by `sysy-compiler`. Nodes are arena-allocated and `Copy`.

pub mod ast;
pub mod builder;

pub use ast::*;
pub use builder::AstBuilder;
