//! Instruction emission at the insertion cursor.
//!
//! Every `build_*` helper appends to the open block and fails with an
//! internal error when the cursor is empty; callers check
//! [`CompilationContext::is_unreachable`] first. Operations whose operands
//! are all constants fold to a constant instead of emitting anything.
//! Terminators close the block and clear the cursor.

mod loops;

pub use loops::{LoopStack, LoopTargets};

use sysy_core::CompilationError;

use crate::context::CompilationContext;
use crate::ir::{
    BinaryOp, BlockId, CastOp, FloatPredicate, FuncId, InstKind, Instruction, IntPredicate,
    IrType, Terminator, UnaryOp, Value, fold_binary, fold_cast, fold_fcmp, fold_icmp, fold_unary,
    gep_result,
};

type Result<T> = std::result::Result<T, CompilationError>;

impl CompilationContext {
    fn insertion_block(&self) -> Result<BlockId> {
        self.cursor()
            .ok_or_else(|| CompilationError::internal("emitting with no open block"))
    }

    /// Append an instruction producing `ty` at the cursor.
    pub fn emit(&mut self, kind: InstKind, ty: IrType) -> Result<Value> {
        let block = self.insertion_block()?;
        let function = self.current_function_mut()?;
        let id = function.push_inst(
            block,
            Instruction {
                kind,
                ty: ty.clone(),
            },
        );
        if ty.is_void() {
            return Ok(Value::void());
        }
        Ok(Value::inst(id, ty))
    }

    // ==========================================================================
    // Memory
    // ==========================================================================

    /// A stack slot in the entry block, regardless of the cursor.
    pub fn build_alloca(&mut self, allocated: IrType) -> Result<Value> {
        let ty = allocated.clone().ptr_to();
        let id = self
            .current_function_mut()?
            .insert_alloca(allocated)
            .ok_or_else(|| CompilationError::internal("function has no entry block"))?;
        Ok(Value::inst(id, ty))
    }

    pub fn build_load(&mut self, ptr: Value) -> Result<Value> {
        let ty = ptr
            .ty
            .pointee()
            .cloned()
            .ok_or_else(|| CompilationError::internal(format!("load through {}", ptr.ty)))?;
        self.emit(InstKind::Load { ptr }, ty)
    }

    pub fn build_store(&mut self, value: Value, ptr: Value) -> Result<()> {
        self.emit(InstKind::Store { value, ptr }, IrType::Void)?;
        Ok(())
    }

    pub fn build_gep(&mut self, base: Value, indices: Vec<Value>) -> Result<Value> {
        let ty = gep_result(&base.ty, indices.len()).ok_or_else(|| {
            CompilationError::internal(format!(
                "getelementptr on {} with {} indices",
                base.ty,
                indices.len()
            ))
        })?;
        self.emit(InstKind::Gep { base, indices }, ty)
    }

    // ==========================================================================
    // Arithmetic
    // ==========================================================================

    pub fn build_binary(&mut self, op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value> {
        if let Some(folded) = fold_binary(op, &lhs, &rhs) {
            return Ok(folded);
        }
        let ty = lhs.ty.clone();
        self.emit(InstKind::Binary { op, lhs, rhs }, ty)
    }

    pub fn build_unary(&mut self, op: UnaryOp, operand: Value) -> Result<Value> {
        if let Some(folded) = fold_unary(op, &operand) {
            return Ok(folded);
        }
        let ty = operand.ty.clone();
        self.emit(InstKind::Unary { op, operand }, ty)
    }

    pub fn build_icmp(&mut self, pred: IntPredicate, lhs: Value, rhs: Value) -> Result<Value> {
        if let Some(folded) = fold_icmp(pred, &lhs, &rhs) {
            return Ok(folded);
        }
        self.emit(InstKind::ICmp { pred, lhs, rhs }, IrType::I1)
    }

    pub fn build_fcmp(&mut self, pred: FloatPredicate, lhs: Value, rhs: Value) -> Result<Value> {
        if let Some(folded) = fold_fcmp(pred, &lhs, &rhs) {
            return Ok(folded);
        }
        self.emit(InstKind::FCmp { pred, lhs, rhs }, IrType::I1)
    }

    pub fn build_cast(&mut self, op: CastOp, value: Value) -> Result<Value> {
        if let Some(folded) = fold_cast(op, &value) {
            return Ok(folded);
        }
        let (_, to) = op.signature();
        self.emit(InstKind::Cast { op, value }, to)
    }

    pub fn build_phi(&mut self, ty: IrType, incoming: Vec<(Value, BlockId)>) -> Result<Value> {
        self.emit(InstKind::Phi { incoming }, ty)
    }

    /// Call `callee`; void callees yield [`Value::void`].
    pub fn build_call(&mut self, callee: FuncId, args: Vec<Value>) -> Result<Value> {
        let ty = self.module().function(callee).return_type.clone();
        self.emit(InstKind::Call { callee, args }, ty)
    }

    // ==========================================================================
    // Terminators
    // ==========================================================================

    fn terminate(&mut self, terminator: Terminator) -> Result<()> {
        let block = self.insertion_block()?;
        self.current_function_mut()?
            .set_terminator(block, terminator);
        self.clear_cursor();
        Ok(())
    }

    pub fn build_br(&mut self, target: BlockId) -> Result<()> {
        self.terminate(Terminator::Br(target))
    }

    pub fn build_cond_br(&mut self, cond: Value, then_block: BlockId, else_block: BlockId) -> Result<()> {
        self.terminate(Terminator::CondBr {
            cond,
            then_block,
            else_block,
        })
    }

    pub fn build_ret(&mut self, value: Option<Value>) -> Result<()> {
        self.terminate(Terminator::Ret(value))
    }
}
