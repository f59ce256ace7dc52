//! Loop target tracking for `break` and `continue`.

use crate::ir::BlockId;

/// Stack of enclosing loops, innermost last.
#[derive(Debug, Default)]
pub struct LoopStack {
    loops: Vec<LoopTargets>,
}

/// Branch targets of one loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopTargets {
    /// Where `continue` goes: the condition block
    pub continue_target: BlockId,
    /// Where `break` goes: the block after the loop
    pub break_target: BlockId,
}

impl LoopStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter_loop(&mut self, continue_target: BlockId, break_target: BlockId) {
        self.loops.push(LoopTargets {
            continue_target,
            break_target,
        });
    }

    pub fn exit_loop(&mut self) -> Option<LoopTargets> {
        self.loops.pop()
    }

    pub fn in_loop(&self) -> bool {
        !self.loops.is_empty()
    }

    /// Targets of the innermost loop.
    pub fn current(&self) -> Option<LoopTargets> {
        self.loops.last().copied()
    }

    pub fn continue_target(&self) -> Option<BlockId> {
        self.current().map(|l| l.continue_target)
    }

    pub fn break_target(&self) -> Option<BlockId> {
        self.current().map(|l| l.break_target)
    }

    pub fn loop_depth(&self) -> usize {
        self.loops.len()
    }
}
