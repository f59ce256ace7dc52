//! CompilationContext - all mutable state of one lowering pass.
//!
//! The context owns the module under construction, the insertion cursor, the
//! active function, the scope stack and the loop stack. Lowering code threads
//! it by `&mut` reference; nested constructs acquire a [`ContextGuard`] that
//! restores the state when dropped, whether lowering finished, returned early
//! or failed.

use std::ops::{Deref, DerefMut};

use rustc_hash::FxHashMap;
use sysy_core::{CompilationError, FunctionSignature, Primitive, Span};

use crate::emit::LoopStack;
use crate::ir::{BlockId, FuncId, Function, Module};
use crate::scope::{ScopeStack, Symbol};

type Result<T> = std::result::Result<T, CompilationError>;

/// The function whose body is being lowered.
#[derive(Debug, Clone)]
pub struct ActiveFunction {
    pub id: FuncId,
    pub name: String,
    pub return_type: Primitive,
}

/// An entry of the flat function namespace.
#[derive(Debug, Clone)]
pub struct FunctionEntry {
    pub id: FuncId,
    pub signature: FunctionSignature,
}

pub struct CompilationContext {
    module: Module,
    function: Option<ActiveFunction>,
    /// Open block accepting instructions; `None` after a terminator
    cursor: Option<BlockId>,
    scopes: ScopeStack,
    loops: LoopStack,
    functions: FxHashMap<String, FunctionEntry>,
}

impl CompilationContext {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module: Module::new(module_name),
            function: None,
            cursor: None,
            scopes: ScopeStack::new(),
            loops: LoopStack::new(),
            functions: FxHashMap::default(),
        }
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn module_mut(&mut self) -> &mut Module {
        &mut self.module
    }

    pub fn into_module(self) -> Module {
        self.module
    }

    // ==========================================================================
    // Active function and cursor
    // ==========================================================================

    pub fn active_function(&self) -> Option<&ActiveFunction> {
        self.function.as_ref()
    }

    /// Declarations are global exactly when no function is active.
    pub fn is_global_scope(&self) -> bool {
        self.function.is_none()
    }

    pub fn function_id(&self) -> Result<FuncId> {
        self.function
            .as_ref()
            .map(|f| f.id)
            .ok_or_else(|| CompilationError::internal("no active function"))
    }

    pub fn current_function(&self) -> Result<&Function> {
        let id = self.function_id()?;
        Ok(self.module.function(id))
    }

    pub fn current_function_mut(&mut self) -> Result<&mut Function> {
        let id = self.function_id()?;
        Ok(self.module.function_mut(id))
    }

    pub fn cursor(&self) -> Option<BlockId> {
        self.cursor
    }

    /// No block is open: whatever is lowered now can never execute.
    pub fn is_unreachable(&self) -> bool {
        self.cursor.is_none()
    }

    pub fn clear_cursor(&mut self) {
        self.cursor = None;
    }

    /// Create a detached block in the active function.
    pub fn create_block(&mut self, name: &str) -> Result<BlockId> {
        Ok(self.current_function_mut()?.create_block(name))
    }

    /// Append `block` to the layout and move the cursor to it.
    pub fn open_block(&mut self, block: BlockId) -> Result<()> {
        self.current_function_mut()?.append_block(block);
        self.cursor = Some(block);
        Ok(())
    }

    // ==========================================================================
    // Names
    // ==========================================================================

    pub fn scopes(&self) -> &ScopeStack {
        &self.scopes
    }

    pub fn declare(&mut self, symbol: Symbol) -> Result<()> {
        self.scopes.declare(symbol)
    }

    pub fn resolve(&self, name: &str, span: Span) -> Result<&Symbol> {
        self.scopes.resolve(name, span)
    }

    pub fn loops(&self) -> &LoopStack {
        &self.loops
    }

    pub fn register_function(&mut self, id: FuncId, signature: FunctionSignature) {
        self.functions
            .insert(signature.name.clone(), FunctionEntry { id, signature });
    }

    pub fn lookup_function(&self, name: &str) -> Option<&FunctionEntry> {
        self.functions.get(name)
    }

    // ==========================================================================
    // Guards
    // ==========================================================================

    /// Push a lexical scope until the guard drops.
    pub fn enter_scope(&mut self) -> ContextGuard<'_> {
        self.scopes.push();
        ContextGuard {
            ctx: self,
            release: |ctx| ctx.scopes.pop(),
        }
    }

    /// Push loop targets until the guard drops.
    pub fn enter_loop(&mut self, continue_target: BlockId, break_target: BlockId) -> ContextGuard<'_> {
        self.loops.enter_loop(continue_target, break_target);
        ContextGuard {
            ctx: self,
            release: |ctx| {
                ctx.loops.exit_loop();
            },
        }
    }

    pub fn begin_function(&mut self, function: ActiveFunction) {
        self.function = Some(function);
    }

    /// Back to global scope; also clears the cursor.
    pub fn end_function(&mut self) {
        self.function = None;
        self.cursor = None;
    }

    /// [`begin_function`](Self::begin_function) until the guard drops.
    pub fn enter_function(&mut self, function: ActiveFunction) -> ContextGuard<'_> {
        self.begin_function(function);
        ContextGuard {
            ctx: self,
            release: |ctx| ctx.end_function(),
        }
    }
}

/// Borrow of the context that undoes one `enter_*` call on drop.
///
/// Dereferences to the context, so lowering continues through the guard.
pub struct ContextGuard<'a> {
    ctx: &'a mut CompilationContext,
    release: fn(&mut CompilationContext),
}

impl Deref for ContextGuard<'_> {
    type Target = CompilationContext;

    fn deref(&self) -> &CompilationContext {
        &*self.ctx
    }
}

impl DerefMut for ContextGuard<'_> {
    fn deref_mut(&mut self) -> &mut CompilationContext {
        &mut *self.ctx
    }
}

impl Drop for ContextGuard<'_> {
    fn drop(&mut self) {
        (self.release)(&mut *self.ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{IrType, Linkage, Value};
    use sysy_core::DataType;

    fn symbol(name: &str) -> Symbol {
        Symbol {
            name: name.to_string(),
            data_type: DataType::int(),
            address: Value::int(0),
            constant: None,
            span: Span::default(),
        }
    }

    fn fail_inside(ctx: &mut CompilationContext) -> Result<()> {
        let mut scope = ctx.enter_scope();
        scope.declare(symbol("inner"))?;
        let looped = scope.enter_loop(BlockId(0), BlockId(1));
        assert_eq!(looped.loops().loop_depth(), 1);
        looped.resolve("missing", Span::default())?;
        Ok(())
    }

    #[test]
    fn guards_unwind_on_error() {
        let mut ctx = CompilationContext::new("test");
        assert!(fail_inside(&mut ctx).is_err());
        assert!(ctx.scopes().is_global());
        assert!(!ctx.loops().in_loop());
        assert!(ctx.scopes().lookup("inner").is_none());
    }

    #[test]
    fn function_guard_clears_cursor() {
        let mut ctx = CompilationContext::new("test");
        let id = ctx.module_mut().add_function(Function::new(
            "f",
            IrType::Void,
            Vec::new(),
            Linkage::Internal,
        ));
        {
            let mut func = ctx.enter_function(ActiveFunction {
                id,
                name: "f".into(),
                return_type: Primitive::Void,
            });
            assert!(!func.is_global_scope());
            let entry = func.create_block("entry").unwrap();
            func.open_block(entry).unwrap();
            assert_eq!(func.cursor(), Some(entry));
        }
        assert!(ctx.is_global_scope());
        assert!(ctx.is_unreachable());
    }

    #[test]
    fn blocks_need_an_active_function() {
        let mut ctx = CompilationContext::new("test");
        let err = ctx.create_block("entry").unwrap_err();
        assert!(err.is_internal());
    }
}
