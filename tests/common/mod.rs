//! Shared helpers for the lowering integration tests.

#![allow(dead_code)]

use sysy::ir::{BlockId, Function, InstId, InstKind, Instruction, Module, Value, verify_function};
use sysy::{CompileUnit, CompilerConfig, StandardLibrary};

/// Lower with the standard library, panicking with the error on failure.
pub fn lower(unit: &CompileUnit<'_>) -> Module {
    match sysy::compile(unit) {
        Ok(module) => module,
        Err(err) => panic!("lowering failed: {err}"),
    }
}

/// Lower with verification disabled, so tests can verify explicitly.
pub fn lower_unverified(unit: &CompileUnit<'_>) -> Module {
    let library = StandardLibrary::new();
    CompilerConfig::new()
        .with_verification(false)
        .build(&library)
        .compile(unit)
        .unwrap()
}

pub fn function<'m>(module: &'m Module, name: &str) -> &'m Function {
    module
        .function_by_name(name)
        .unwrap_or_else(|| panic!("no function '{name}' in module"))
}

/// Every defined function passes the verifier.
pub fn assert_verified(module: &Module) {
    for (index, function) in module.functions().iter().enumerate() {
        if function.is_declaration() {
            continue;
        }
        let id = module.get_function(&function.name).unwrap();
        assert_eq!(id.index(), index);
        if let Err(err) = verify_function(module, id) {
            panic!("function '{}' failed verification: {err}\n{module}", function.name);
        }
    }
}

pub fn block(function: &Function, name: &str) -> BlockId {
    function
        .find_block(name)
        .unwrap_or_else(|| panic!("no block '{name}' in '{}'", function.name))
}

/// Laid-out block names in order.
pub fn block_names(function: &Function) -> Vec<String> {
    function.blocks().map(|(_, b)| b.name.clone()).collect()
}

/// All instructions of laid-out blocks with the block holding them.
pub fn instructions(function: &Function) -> Vec<(BlockId, InstId, &Instruction)> {
    function
        .blocks()
        .flat_map(|(id, _)| {
            function
                .block_insts(id)
                .map(move |(inst_id, inst)| (id, inst_id, inst))
        })
        .collect()
}

/// Blocks containing a call to `callee`.
pub fn blocks_calling(module: &Module, function: &Function, callee: &str) -> Vec<BlockId> {
    let target = module.get_function(callee);
    instructions(function)
        .into_iter()
        .filter(|(_, _, inst)| {
            matches!(&inst.kind, InstKind::Call { callee, .. } if Some(*callee) == target)
        })
        .map(|(block, _, _)| block)
        .collect()
}

/// Arguments of every call to `callee`, in layout order.
pub fn call_args(module: &Module, function: &Function, callee: &str) -> Vec<Vec<Value>> {
    let target = module.get_function(callee);
    instructions(function)
        .into_iter()
        .filter_map(|(_, _, inst)| match &inst.kind {
            InstKind::Call { callee, args } if Some(*callee) == target => Some(args.clone()),
            _ => None,
        })
        .collect()
}

/// The values stored to the slot `ptr`, in layout order.
pub fn stores_to(function: &Function, ptr: &Value) -> Vec<Value> {
    instructions(function)
        .into_iter()
        .filter_map(|(_, _, inst)| match &inst.kind {
            InstKind::Store { value, ptr: target } if target == ptr => Some(value.clone()),
            _ => None,
        })
        .collect()
}

/// The pointer a load instruction reads.
pub fn loaded_from(function: &Function, value: &Value) -> Value {
    let id = value.as_inst().expect("value is not an instruction");
    match &function.inst(id).kind {
        InstKind::Load { ptr } => ptr.clone(),
        other => panic!("expected a load, got {other:?}"),
    }
}
