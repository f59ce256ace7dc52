//! Structural verification of a lowered function.
//!
//! A failure here means the lowering logic built malformed IR; it is never
//! caused by the input program.

use rustc_hash::FxHashMap;
use thiserror::Error;

use super::{
    BlockId, FuncId, Function, InstId, InstKind, Instruction, IrType, Module, Terminator, UnaryOp,
    Value, ValueKind,
};

/// Why a function failed verification.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VerifyError {
    #[error("function has no blocks")]
    NoBody,

    #[error("block '{block}' has no terminator")]
    Unterminated { block: String },

    #[error("block '{block}' branches to a block that is not part of the function")]
    DanglingTarget { block: String },

    #[error("in block '{block}': {message}")]
    Malformed { block: String, message: String },
}

type Result<T> = std::result::Result<T, VerifyError>;

/// Check every laid-out block of a function definition.
pub fn verify_function(module: &Module, func: FuncId) -> Result<()> {
    Verifier::new(module, module.function(func)).run()
}

struct Verifier<'a> {
    module: &'a Module,
    function: &'a Function,
    inst_blocks: FxHashMap<InstId, BlockId>,
}

impl<'a> Verifier<'a> {
    fn new(module: &'a Module, function: &'a Function) -> Self {
        Self {
            module,
            function,
            inst_blocks: function.inst_blocks(),
        }
    }

    fn run(&self) -> Result<()> {
        let entry = self.function.entry().ok_or(VerifyError::NoBody)?;
        for (id, block) in self.function.blocks() {
            let terminator = block
                .terminator
                .as_ref()
                .ok_or_else(|| VerifyError::Unterminated {
                    block: block.name.clone(),
                })?;
            self.check_terminator(id, terminator)?;

            let mut seen_non_phi = false;
            for (_, inst) in self.function.block_insts(id) {
                match inst.kind {
                    InstKind::Phi { .. } if seen_non_phi => {
                        return Err(self.malformed(id, "phi node after non-phi instruction"));
                    }
                    InstKind::Phi { .. } => {}
                    InstKind::Alloca { .. } if id != entry => {
                        return Err(self.malformed(id, "alloca outside the entry block"));
                    }
                    _ => seen_non_phi = true,
                }
                self.check_instruction(id, inst)?;
            }
        }
        Ok(())
    }

    fn malformed(&self, block: BlockId, message: impl Into<String>) -> VerifyError {
        VerifyError::Malformed {
            block: self.function.block(block).name.clone(),
            message: message.into(),
        }
    }

    fn expect_type(&self, block: BlockId, value: &Value, expected: &IrType) -> Result<()> {
        if &value.ty != expected {
            return Err(self.malformed(
                block,
                format!("expected operand of type {expected}, found {}", value.ty),
            ));
        }
        Ok(())
    }

    fn check_operand(&self, block: BlockId, value: &Value) -> Result<()> {
        match value.kind {
            ValueKind::Inst(id) => {
                if !self.inst_blocks.contains_key(&id) {
                    return Err(self.malformed(
                        block,
                        format!("operand %{} is not placed in this function", id.0),
                    ));
                }
                self.expect_type(block, value, &self.function.inst(id).ty)
            }
            ValueKind::Arg(index) => match self.function.params.get(index as usize) {
                Some(param) => self.expect_type(block, value, &param.ty),
                None => Err(self.malformed(block, format!("argument {index} out of range"))),
            },
            ValueKind::Global(id) => match self.module.globals().get(id.index()) {
                Some(global) => self.expect_type(block, value, &global.value_type.clone().ptr_to()),
                None => Err(self.malformed(block, "reference to unknown global")),
            },
            ValueKind::Void => Err(self.malformed(block, "void value used as an operand")),
            _ => Ok(()),
        }
    }

    fn check_terminator(&self, block: BlockId, terminator: &Terminator) -> Result<()> {
        for target in terminator.successors() {
            if !self.function.is_laid_out(target) {
                return Err(VerifyError::DanglingTarget {
                    block: self.function.block(block).name.clone(),
                });
            }
        }
        match terminator {
            Terminator::Br(_) => Ok(()),
            Terminator::CondBr { cond, .. } => {
                self.check_operand(block, cond)?;
                self.expect_type(block, cond, &IrType::I1)
            }
            Terminator::Ret(None) if self.function.return_type.is_void() => Ok(()),
            Terminator::Ret(None) => Err(self.malformed(block, "missing return value")),
            Terminator::Ret(Some(value)) => {
                self.check_operand(block, value)?;
                self.expect_type(block, value, &self.function.return_type)
            }
        }
    }

    fn check_instruction(&self, block: BlockId, inst: &Instruction) -> Result<()> {
        for operand in inst.kind.operands() {
            self.check_operand(block, operand)?;
        }
        match &inst.kind {
            InstKind::Alloca { allocated } => {
                self.expect_result(block, inst, &allocated.clone().ptr_to())
            }
            InstKind::Load { ptr } => self.expect_type(block, ptr, &inst.ty.clone().ptr_to()),
            InstKind::Store { value, ptr } => {
                self.expect_type(block, ptr, &value.ty.clone().ptr_to())?;
                self.expect_result(block, inst, &IrType::Void)
            }
            InstKind::Gep { base, indices } => {
                let result = gep_result(&base.ty, indices.len())
                    .ok_or_else(|| self.malformed(block, "invalid getelementptr"))?;
                for index in indices {
                    self.expect_type(block, index, &IrType::I32)?;
                }
                self.expect_result(block, inst, &result)
            }
            InstKind::Binary { op, lhs, rhs } => {
                let ty = if op.is_float() { IrType::F32 } else { IrType::I32 };
                self.expect_type(block, lhs, &ty)?;
                self.expect_type(block, rhs, &ty)?;
                self.expect_result(block, inst, &ty)
            }
            InstKind::Unary { op, operand } => {
                let ty = op.operand_type();
                self.expect_type(block, operand, &ty)?;
                if *op == UnaryOp::Not {
                    return self.expect_result(block, inst, &IrType::I1);
                }
                self.expect_result(block, inst, &ty)
            }
            InstKind::ICmp { lhs, rhs, .. } => {
                if !matches!(lhs.ty, IrType::I32 | IrType::I1) {
                    return Err(self.malformed(block, format!("icmp on {}", lhs.ty)));
                }
                self.expect_type(block, rhs, &lhs.ty)?;
                self.expect_result(block, inst, &IrType::I1)
            }
            InstKind::FCmp { lhs, rhs, .. } => {
                self.expect_type(block, lhs, &IrType::F32)?;
                self.expect_type(block, rhs, &IrType::F32)?;
                self.expect_result(block, inst, &IrType::I1)
            }
            InstKind::Cast { op, value } => {
                let (from, to) = op.signature();
                self.expect_type(block, value, &from)?;
                self.expect_result(block, inst, &to)
            }
            InstKind::Phi { incoming } => self.check_phi(block, inst, incoming),
            InstKind::Call { callee, args } => {
                let callee = self
                    .module
                    .functions()
                    .get(callee.index())
                    .ok_or_else(|| self.malformed(block, "call to unknown function"))?;
                if callee.params.len() != args.len() {
                    return Err(self.malformed(
                        block,
                        format!("call to '{}' with wrong argument count", callee.name),
                    ));
                }
                for (param, arg) in callee.params.iter().zip(args) {
                    self.expect_type(block, arg, &param.ty)?;
                }
                self.expect_result(block, inst, &callee.return_type)
            }
        }
    }

    fn check_phi(
        &self,
        block: BlockId,
        inst: &Instruction,
        incoming: &[(Value, BlockId)],
    ) -> Result<()> {
        let mut predecessors = self.function.predecessors(block);
        let mut sources: Vec<BlockId> = incoming.iter().map(|(_, b)| *b).collect();
        predecessors.sort();
        sources.sort();
        if predecessors != sources {
            return Err(self.malformed(block, "phi incoming blocks differ from predecessors"));
        }
        for (value, _) in incoming {
            self.expect_type(block, value, &inst.ty)?;
        }
        Ok(())
    }

    fn expect_result(&self, block: BlockId, inst: &Instruction, expected: &IrType) -> Result<()> {
        if &inst.ty != expected {
            return Err(self.malformed(
                block,
                format!("instruction produces {}, expected {expected}", inst.ty),
            ));
        }
        Ok(())
    }
}

/// Result type of a GEP over `base` with `index_count` indices.
pub fn gep_result(base: &IrType, index_count: usize) -> Option<IrType> {
    let mut current = base.pointee()?;
    if index_count == 0 {
        return None;
    }
    for _ in 1..index_count {
        current = current.element()?;
    }
    Some(current.clone().ptr_to())
}
