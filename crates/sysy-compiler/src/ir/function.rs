//! Functions and their basic blocks.
//!
//! Blocks are created detached and only become part of the function once
//! [`Function::append_block`] places them in the layout. A block that is
//! created but never appended (an `if` whose branches both return leaves its
//! merge block that way) is invisible to the printer and the verifier.

use rustc_hash::FxHashMap;

use super::{BlockId, InstId, InstKind, Instruction, IrType, Terminator, Value};

/// Symbol visibility of a function or global.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Linkage {
    External,
    Internal,
}

impl Linkage {
    pub fn keyword(&self) -> &'static str {
        match self {
            Linkage::External => "external",
            Linkage::Internal => "internal",
        }
    }
}

/// A straight-line instruction sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub name: String,
    pub insts: Vec<InstId>,
    pub terminator: Option<Terminator>,
}

impl Block {
    pub fn is_terminated(&self) -> bool {
        self.terminator.is_some()
    }
}

/// A formal parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: IrType,
}

/// A function definition, or a declaration when it has no blocks.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub return_type: IrType,
    pub params: Vec<Param>,
    pub linkage: Linkage,
    insts: Vec<Instruction>,
    blocks: Vec<Block>,
    layout: Vec<BlockId>,
    block_names: FxHashMap<String, u32>,
}

impl Function {
    pub fn new(
        name: impl Into<String>,
        return_type: IrType,
        params: Vec<Param>,
        linkage: Linkage,
    ) -> Self {
        Self {
            name: name.into(),
            return_type,
            params,
            linkage,
            insts: Vec::new(),
            blocks: Vec::new(),
            layout: Vec::new(),
            block_names: FxHashMap::default(),
        }
    }

    /// A function with no body.
    pub fn is_declaration(&self) -> bool {
        self.layout.is_empty()
    }

    /// The value of argument `index`.
    pub fn arg(&self, index: usize) -> Option<Value> {
        self.params
            .get(index)
            .map(|p| Value::arg(index as u32, p.ty.clone()))
    }

    // ==========================================================================
    // Blocks
    // ==========================================================================

    /// Create a detached block. Names are uniqued: `then`, `then.1`, ...
    pub fn create_block(&mut self, base: &str) -> BlockId {
        let name = match self.block_names.get_mut(base) {
            Some(count) => {
                *count += 1;
                format!("{base}.{count}")
            }
            None => {
                self.block_names.insert(base.to_string(), 0);
                base.to_string()
            }
        };
        let id = BlockId(self.blocks.len() as u32);
        self.blocks.push(Block {
            name,
            insts: Vec::new(),
            terminator: None,
        });
        id
    }

    /// Place a block at the end of the layout. Appending twice is a no-op.
    pub fn append_block(&mut self, block: BlockId) {
        if !self.is_laid_out(block) {
            self.layout.push(block);
        }
    }

    pub fn is_laid_out(&self, block: BlockId) -> bool {
        self.layout.contains(&block)
    }

    /// Blocks in layout order.
    pub fn layout(&self) -> &[BlockId] {
        &self.layout
    }

    pub fn entry(&self) -> Option<BlockId> {
        self.layout.first().copied()
    }

    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.index()]
    }

    pub fn block_mut(&mut self, id: BlockId) -> &mut Block {
        &mut self.blocks[id.index()]
    }

    /// Laid-out blocks with their ids.
    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &Block)> {
        self.layout.iter().map(|&id| (id, &self.blocks[id.index()]))
    }

    pub fn find_block(&self, name: &str) -> Option<BlockId> {
        self.layout
            .iter()
            .copied()
            .find(|id| self.blocks[id.index()].name == name)
    }

    pub fn successors(&self, block: BlockId) -> Vec<BlockId> {
        self.block(block)
            .terminator
            .as_ref()
            .map(Terminator::successors)
            .unwrap_or_default()
    }

    /// Laid-out blocks branching to `block`, each listed once.
    pub fn predecessors(&self, block: BlockId) -> Vec<BlockId> {
        self.layout
            .iter()
            .copied()
            .filter(|&id| self.successors(id).contains(&block))
            .collect()
    }

    // ==========================================================================
    // Instructions
    // ==========================================================================

    pub fn inst(&self, id: InstId) -> &Instruction {
        &self.insts[id.index()]
    }

    pub fn inst_count(&self) -> usize {
        self.insts.len()
    }

    /// Append an instruction to the end of `block`.
    pub fn push_inst(&mut self, block: BlockId, inst: Instruction) -> InstId {
        let id = InstId(self.insts.len() as u32);
        self.insts.push(inst);
        self.blocks[block.index()].insts.push(id);
        id
    }

    /// Insert an `alloca` into the entry block, after the allocas already
    /// there. Returns `None` when the function has no entry block.
    pub fn insert_alloca(&mut self, allocated: IrType) -> Option<InstId> {
        let entry = self.entry()?;
        let id = InstId(self.insts.len() as u32);
        self.insts.push(Instruction {
            ty: allocated.clone().ptr_to(),
            kind: InstKind::Alloca { allocated },
        });
        let insts = &self.insts;
        let block = &mut self.blocks[entry.index()];
        let position = block
            .insts
            .iter()
            .take_while(|i| matches!(insts[i.index()].kind, InstKind::Alloca { .. }))
            .count();
        block.insts.insert(position, id);
        Some(id)
    }

    pub fn set_terminator(&mut self, block: BlockId, terminator: Terminator) {
        self.blocks[block.index()].terminator = Some(terminator);
    }

    /// Map from instruction to the laid-out block holding it.
    pub fn inst_blocks(&self) -> FxHashMap<InstId, BlockId> {
        self.blocks()
            .flat_map(|(id, block)| block.insts.iter().map(move |&inst| (inst, id)))
            .collect()
    }

    /// Laid-out instructions of `block` in order.
    pub fn block_insts(&self, block: BlockId) -> impl Iterator<Item = (InstId, &Instruction)> {
        self.block(block)
            .insts
            .iter()
            .map(|&id| (id, &self.insts[id.index()]))
    }
}
