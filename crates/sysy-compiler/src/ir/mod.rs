//! Target-independent SSA intermediate representation.
//!
//! A [`Module`] holds globals and [`Function`]s; a function holds basic
//! [`Block`]s of [`Instruction`]s, each block ending in one [`Terminator`].
//! Operands are [`Value`]s tagged with their [`IrType`].

mod fold;
mod function;
mod instr;
mod module;
mod printer;
mod types;
mod value;
mod verify;

pub use fold::{fold_binary, fold_cast, fold_fcmp, fold_icmp, fold_unary};
pub use function::{Block, Function, Linkage, Param};
pub use instr::{
    BinaryOp, CastOp, FloatPredicate, InstKind, Instruction, IntPredicate, Terminator, UnaryOp,
};
pub use module::{Global, Initializer, Module};
pub use printer::FunctionPrinter;
pub use types::IrType;
pub use value::{BlockId, FuncId, GlobalId, InstId, Value, ValueKind};
pub use verify::{VerifyError, gep_result, verify_function};
