//! Textual rendering of modules, in an LLVM-flavoured syntax.
//!
//! ```text
//! @g = internal global i32 0
//!
//! declare i32 @getint()
//!
//! define i32 @main() {
//! entry:
//!   %0 = call i32 @getint()
//!   ret i32 %0
//! }
//! ```

use std::fmt::{self, Display, Formatter, Write};

use rustc_hash::FxHashMap;

use super::{
    BlockId, Function, InstId, Initializer, InstKind, Instruction, IrType, Linkage, Module,
    Terminator, Value, ValueKind,
};

impl Display for Module {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "; ModuleID = '{}'", self.name)?;
        if !self.globals().is_empty() {
            writeln!(f)?;
        }
        for global in self.globals() {
            let kind = if global.constant { "constant" } else { "global" };
            write!(
                f,
                "@{} = {} {} ",
                global.name,
                global.linkage.keyword(),
                kind
            )?;
            write_initializer(f, &global.value_type, &global.initializer)?;
            writeln!(f)?;
        }
        for function in self.functions() {
            writeln!(f)?;
            FunctionPrinter::new(self, function).fmt(f)?;
        }
        Ok(())
    }
}

fn write_initializer(f: &mut Formatter<'_>, ty: &IrType, init: &Initializer) -> fmt::Result {
    match init {
        Initializer::Zero => write!(f, "{ty} zeroinitializer"),
        Initializer::Int(v) => write!(f, "{ty} {v}"),
        Initializer::Float(v) => write!(f, "{ty} {v:?}"),
        Initializer::Array(elements) => {
            if init.is_zero() {
                return write!(f, "{ty} zeroinitializer");
            }
            let element_type = ty.element().unwrap_or(&IrType::Void);
            write!(f, "{ty} [")?;
            for (i, element) in elements.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_initializer(f, element_type, element)?;
            }
            f.write_char(']')
        }
    }
}

/// Renders one function against its module.
///
/// Value-producing instructions are numbered `%0, %1, ...` in layout order;
/// stores and void calls take no number.
pub struct FunctionPrinter<'a> {
    module: &'a Module,
    function: &'a Function,
    slots: FxHashMap<InstId, usize>,
}

impl<'a> FunctionPrinter<'a> {
    pub fn new(module: &'a Module, function: &'a Function) -> Self {
        let slots = function
            .blocks()
            .flat_map(|(block, _)| function.block_insts(block))
            .filter(|(_, inst)| !inst.ty.is_void())
            .enumerate()
            .map(|(slot, (id, _))| (id, slot))
            .collect();
        Self {
            module,
            function,
            slots,
        }
    }

    fn slot(&self, id: InstId) -> String {
        match self.slots.get(&id) {
            Some(slot) => format!("%{slot}"),
            // Not laid out; only reachable when dumping a faulty function.
            None => format!("%detached.{}", id.0),
        }
    }

    fn value(&self, value: &Value) -> String {
        match value.kind {
            ValueKind::ConstInt(v) => v.to_string(),
            ValueKind::ConstFloat(v) => format!("{v:?}"),
            ValueKind::ConstBool(v) => v.to_string(),
            ValueKind::Undef => "undef".to_string(),
            ValueKind::Zero => "zeroinitializer".to_string(),
            ValueKind::Inst(id) => self.slot(id),
            ValueKind::Arg(i) => match self.function.params.get(i as usize) {
                Some(param) => format!("%{}", param.name),
                None => format!("%arg{i}"),
            },
            ValueKind::Global(id) => match self.module.globals().get(id.index()) {
                Some(global) => format!("@{}", global.name),
                None => format!("@global{}", id.0),
            },
            ValueKind::Void => "void".to_string(),
        }
    }

    /// `type value`
    fn typed(&self, value: &Value) -> String {
        format!("{} {}", value.ty, self.value(value))
    }

    fn label(&self, block: BlockId) -> String {
        format!("%{}", self.function.block(block).name)
    }

    fn instruction(&self, inst: &Instruction) -> String {
        match &inst.kind {
            InstKind::Alloca { allocated } => format!("alloca {allocated}"),
            InstKind::Load { ptr } => format!("load {}, {}", inst.ty, self.typed(ptr)),
            InstKind::Store { value, ptr } => {
                format!("store {}, {}", self.typed(value), self.typed(ptr))
            }
            InstKind::Gep { base, indices } => {
                let pointee = base.ty.pointee().unwrap_or(&IrType::Void);
                let mut text = format!("getelementptr {pointee}, {}", self.typed(base));
                for index in indices {
                    text.push_str(", ");
                    text.push_str(&self.typed(index));
                }
                text
            }
            InstKind::Binary { op, lhs, rhs } => {
                format!("{} {}, {}", op.mnemonic(), self.typed(lhs), self.value(rhs))
            }
            InstKind::Unary { op, operand } => format!("{} {}", op.mnemonic(), self.typed(operand)),
            InstKind::ICmp { pred, lhs, rhs } => {
                format!("icmp {pred} {}, {}", self.typed(lhs), self.value(rhs))
            }
            InstKind::FCmp { pred, lhs, rhs } => {
                format!("fcmp {pred} {}, {}", self.typed(lhs), self.value(rhs))
            }
            InstKind::Cast { op, value } => {
                format!("{} {} to {}", op.mnemonic(), self.typed(value), inst.ty)
            }
            InstKind::Phi { incoming } => {
                let arms: Vec<String> = incoming
                    .iter()
                    .map(|(value, block)| format!("[ {}, {} ]", self.value(value), self.label(*block)))
                    .collect();
                format!("phi {} {}", inst.ty, arms.join(", "))
            }
            InstKind::Call { callee, args } => {
                let name = self
                    .module
                    .functions()
                    .get(callee.index())
                    .map_or("<unknown>", |f| f.name.as_str());
                let args: Vec<String> = args.iter().map(|a| self.typed(a)).collect();
                format!("call {} @{name}({})", inst.ty, args.join(", "))
            }
        }
    }

    fn terminator(&self, terminator: &Terminator) -> String {
        match terminator {
            Terminator::Br(target) => format!("br label {}", self.label(*target)),
            Terminator::CondBr {
                cond,
                then_block,
                else_block,
            } => format!(
                "br {}, label {}, label {}",
                self.typed(cond),
                self.label(*then_block),
                self.label(*else_block)
            ),
            Terminator::Ret(None) => "ret void".to_string(),
            Terminator::Ret(Some(value)) => format!("ret {}", self.typed(value)),
        }
    }
}

impl Display for FunctionPrinter<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let function = self.function;
        if function.is_declaration() {
            let params: Vec<String> = function.params.iter().map(|p| p.ty.to_string()).collect();
            return writeln!(
                f,
                "declare {} @{}({})",
                function.return_type,
                function.name,
                params.join(", ")
            );
        }

        let params: Vec<String> = function
            .params
            .iter()
            .map(|p| format!("{} %{}", p.ty, p.name))
            .collect();
        let linkage = match function.linkage {
            Linkage::External => String::new(),
            Linkage::Internal => "internal ".to_string(),
        };
        writeln!(
            f,
            "define {linkage}{} @{}({}) {{",
            function.return_type,
            function.name,
            params.join(", ")
        )?;
        for (id, block) in function.blocks() {
            writeln!(f, "{}:", block.name)?;
            for (inst_id, inst) in function.block_insts(id) {
                if inst.ty.is_void() {
                    writeln!(f, "  {}", self.instruction(inst))?;
                } else {
                    writeln!(f, "  {} = {}", self.slot(inst_id), self.instruction(inst))?;
                }
            }
            match &block.terminator {
                Some(terminator) => writeln!(f, "  {}", self.terminator(terminator))?,
                None => writeln!(f, "  ; missing terminator")?,
            }
        }
        writeln!(f, "}}")
    }
}
