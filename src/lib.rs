//! SysY middle end: lowers a SysY AST to SSA IR.
//!
//! The workspace is split into layers:
//!
//! - [`sysy_core`]: spans, semantic types, the error taxonomy
//! - [`sysy_ast`]: the arena-allocated AST and its builder
//! - [`sysy_compiler`]: the IR and the lowering engine
//! - [`sysy_modules`]: the runtime library prototypes
//!
//! This crate re-exports the pieces most callers need and offers
//! [`compile`], which lowers a unit against the standard runtime library.
//!
//! # Example
//!
//! ```
//! use sysy::{AstBuilder, BinaryOp, Bump, Primitive};
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let unit = b.unit(&[b.function(
//!     "main",
//!     Primitive::Int,
//!     &[],
//!     &[
//!         b.expr_stmt(b.call("putint", &[b.binary(b.int(1), BinaryOp::Add, b.int(2))])),
//!         b.ret(Some(b.int(0))),
//!     ],
//! )]);
//!
//! let module = sysy::compile(&unit).unwrap();
//! assert!(module.to_string().contains("call void @putint(i32 3)"));
//! ```

pub use bumpalo::Bump;
pub use sysy_ast::{AstBuilder, BinaryOp, CompileUnit, UnaryOp};
pub use sysy_compiler::ir;
pub use sysy_compiler::{Compiler, CompilerConfig, FaultHook, PrototypeProvider};
pub use sysy_core::{CompilationError, DataType, FunctionSignature, Primitive, Span};
pub use sysy_modules::StandardLibrary;

pub use sysy_compiler::ir::Module;

pub mod prelude {
    pub use sysy_ast::*;
    pub use sysy_compiler::ir::{Function, IrType, Module, Value};
    pub use sysy_compiler::{CompilationError, Compiler, CompilerConfig, PrototypeProvider};
    pub use sysy_core::{DataType, FunctionSignature, Primitive, Span};
    pub use sysy_modules::StandardLibrary;
}

/// Lower `unit` with default settings against the standard runtime library.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn compile(unit: &CompileUnit<'_>) -> Result<Module, CompilationError> {
    let library = StandardLibrary::new();
    CompilerConfig::new().build(&library).compile(unit)
}
