//! Instructions and terminators.

use std::fmt;

use super::{BlockId, FuncId, IrType, Value};

/// Two-operand arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    SDiv,
    SRem,
    FAdd,
    FSub,
    FMul,
    FDiv,
}

impl BinaryOp {
    pub fn is_float(&self) -> bool {
        matches!(
            self,
            BinaryOp::FAdd | BinaryOp::FSub | BinaryOp::FMul | BinaryOp::FDiv
        )
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::SDiv => "sdiv",
            BinaryOp::SRem => "srem",
            BinaryOp::FAdd => "fadd",
            BinaryOp::FSub => "fsub",
            BinaryOp::FMul => "fmul",
            BinaryOp::FDiv => "fdiv",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Integer negation
    Neg,
    /// Float negation
    FNeg,
    /// Boolean inversion
    Not,
}

impl UnaryOp {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "neg",
            UnaryOp::FNeg => "fneg",
            UnaryOp::Not => "not",
        }
    }

    /// The only operand type the operation accepts.
    pub fn operand_type(&self) -> IrType {
        match self {
            UnaryOp::Neg => IrType::I32,
            UnaryOp::FNeg => IrType::F32,
            UnaryOp::Not => IrType::I1,
        }
    }
}

/// Signed integer comparison predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntPredicate {
    Eq,
    Ne,
    Slt,
    Sle,
    Sgt,
    Sge,
}

impl IntPredicate {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            IntPredicate::Eq => "eq",
            IntPredicate::Ne => "ne",
            IntPredicate::Slt => "slt",
            IntPredicate::Sle => "sle",
            IntPredicate::Sgt => "sgt",
            IntPredicate::Sge => "sge",
        }
    }
}

/// Ordered float comparison predicates; false if either side is NaN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatPredicate {
    Oeq,
    One,
    Olt,
    Ole,
    Ogt,
    Oge,
}

impl FloatPredicate {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            FloatPredicate::Oeq => "oeq",
            FloatPredicate::One => "one",
            FloatPredicate::Olt => "olt",
            FloatPredicate::Ole => "ole",
            FloatPredicate::Ogt => "ogt",
            FloatPredicate::Oge => "oge",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastOp {
    /// `i32` to `float`
    SiToFp,
    /// `float` to `i32`, truncating toward zero
    FpToSi,
    /// `i1` to `i32`
    ZExt,
    /// `i1` to `float`
    UiToFp,
}

impl CastOp {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            CastOp::SiToFp => "sitofp",
            CastOp::FpToSi => "fptosi",
            CastOp::ZExt => "zext",
            CastOp::UiToFp => "uitofp",
        }
    }

    /// `(source, target)` types of the cast.
    pub fn signature(&self) -> (IrType, IrType) {
        match self {
            CastOp::SiToFp => (IrType::I32, IrType::F32),
            CastOp::FpToSi => (IrType::F32, IrType::I32),
            CastOp::ZExt => (IrType::I1, IrType::I32),
            CastOp::UiToFp => (IrType::I1, IrType::F32),
        }
    }
}

/// Non-terminator instruction payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum InstKind {
    /// Stack slot for one value of `allocated`; yields `allocated*`
    Alloca { allocated: IrType },
    Load { ptr: Value },
    Store { value: Value, ptr: Value },
    /// Address arithmetic; the first index steps over `base` itself
    Gep { base: Value, indices: Vec<Value> },
    Binary { op: BinaryOp, lhs: Value, rhs: Value },
    Unary { op: UnaryOp, operand: Value },
    ICmp { pred: IntPredicate, lhs: Value, rhs: Value },
    FCmp { pred: FloatPredicate, lhs: Value, rhs: Value },
    Cast { op: CastOp, value: Value },
    Phi { incoming: Vec<(Value, BlockId)> },
    Call { callee: FuncId, args: Vec<Value> },
}

impl InstKind {
    /// Every value operand, in order.
    pub fn operands(&self) -> Vec<&Value> {
        match self {
            InstKind::Alloca { .. } => Vec::new(),
            InstKind::Load { ptr } => vec![ptr],
            InstKind::Store { value, ptr } => vec![value, ptr],
            InstKind::Gep { base, indices } => std::iter::once(base).chain(indices).collect(),
            InstKind::Binary { lhs, rhs, .. }
            | InstKind::ICmp { lhs, rhs, .. }
            | InstKind::FCmp { lhs, rhs, .. } => vec![lhs, rhs],
            InstKind::Unary { operand, .. } => vec![operand],
            InstKind::Cast { value, .. } => vec![value],
            InstKind::Phi { incoming } => incoming.iter().map(|(v, _)| v).collect(),
            InstKind::Call { args, .. } => args.iter().collect(),
        }
    }
}

/// An instruction and the type of the value it produces (`void` for stores
/// and void calls).
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub kind: InstKind,
    pub ty: IrType,
}

/// The single control transfer ending a block.
#[derive(Debug, Clone, PartialEq)]
pub enum Terminator {
    Br(BlockId),
    CondBr {
        cond: Value,
        then_block: BlockId,
        else_block: BlockId,
    },
    Ret(Option<Value>),
}

impl Terminator {
    pub fn successors(&self) -> Vec<BlockId> {
        match self {
            Terminator::Br(target) => vec![*target],
            Terminator::CondBr {
                then_block,
                else_block,
                ..
            } => vec![*then_block, *else_block],
            Terminator::Ret(_) => Vec::new(),
        }
    }

    pub fn is_return(&self) -> bool {
        matches!(self, Terminator::Ret(_))
    }
}

impl fmt::Display for IntPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl fmt::Display for FloatPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
