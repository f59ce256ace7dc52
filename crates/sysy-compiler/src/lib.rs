//! SysY Compiler
//!
//! Lowers a SysY compile unit to a target-independent SSA IR in a single
//! forward pass over the AST.
//!
//! ## Pipeline
//!
//! - **Prototypes**: external functions from a [`PrototypeProvider`] are
//!   declared first
//! - **Items**: global declarations and function definitions are lowered in
//!   source order; a function can call itself and anything declared before it
//! - **Verification**: every finished function is structurally verified
//!
//! Any error aborts the whole unit; no partial module is returned.
//!
//! ## Modules
//!
//! - [`ir`]: the IR data model, printer, verifier and constant folder
//! - [`context`]: compilation context with the cursor, scopes and loops
//! - [`conversion`]: semantic/IR type mapping and implicit conversions
//! - [`const_eval`]: compile-time evaluation of constant expressions
//! - [`decl`]: constant and variable declarations
//! - [`expr`]: expression lowering, including short-circuit operators
//! - [`stmt`]: statement and control-flow lowering
//! - [`function_compiler`]: function definitions
//! - [`registry`]: external function prototypes
//!
//! ## Example
//!
//! ```
//! use bumpalo::Bump;
//! use sysy_ast::AstBuilder;
//! use sysy_compiler::CompilerConfig;
//! use sysy_core::Primitive;
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let unit = b.unit(&[b.function("main", Primitive::Int, &[], &[b.ret(Some(b.int(0)))])]);
//!
//! let module = CompilerConfig::new().build(&()).compile(&unit).unwrap();
//! assert!(module.to_string().contains("define i32 @main()"));
//! ```

pub mod const_eval;
pub mod context;
pub mod conversion;
pub mod decl;
pub mod emit;
pub mod expr;
pub mod function_compiler;
pub mod ir;
pub mod registry;
pub mod scope;
pub mod stmt;

pub use context::{ActiveFunction, CompilationContext, ContextGuard, FunctionEntry};
pub use decl::DeclCompiler;
pub use emit::{LoopStack, LoopTargets};
pub use expr::ExprCompiler;
pub use function_compiler::FunctionCompiler;
pub use ir::Module;
pub use registry::{PrototypeProvider, register_prototypes};
pub use scope::{ScopeStack, Symbol};
pub use stmt::StmtCompiler;

// Re-export CompilationError from core for convenience
pub use sysy_core::CompilationError;

use sysy_ast::{CompileUnit, Item};

type Result<T> = std::result::Result<T, CompilationError>;

/// Called with the module under construction when a function fails
/// verification.
pub type FaultHook = Box<dyn Fn(&Module) + Send + Sync + 'static>;

/// Builder for [`Compiler`].
pub struct CompilerConfig {
    module_name: String,
    verify: bool,
    fault_hook: Option<FaultHook>,
}

impl CompilerConfig {
    pub fn new() -> Self {
        Self {
            module_name: "main".to_string(),
            verify: true,
            fault_hook: None,
        }
    }

    pub fn with_module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = name.into();
        self
    }

    /// Skip structural verification of finished functions.
    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Replace the default fault report (the module rendered at error level).
    pub fn with_fault_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Module) + Send + Sync + 'static,
    {
        self.fault_hook = Some(Box::new(hook));
        self
    }

    pub fn build<'p>(self, prototypes: &'p dyn PrototypeProvider) -> Compiler<'p> {
        Compiler {
            config: self,
            prototypes,
        }
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// The main compiler entry point.
pub struct Compiler<'p> {
    config: CompilerConfig,
    prototypes: &'p dyn PrototypeProvider,
}

impl Compiler<'_> {
    /// Lower a compile unit to a module.
    ///
    /// Every call starts from a fresh context, so a failed unit leaves
    /// nothing behind for the next one.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile(&self, unit: &CompileUnit<'_>) -> Result<Module> {
        let mut ctx = CompilationContext::new(self.config.module_name.clone());
        register_prototypes(&mut ctx, self.prototypes)?;

        for item in unit.items() {
            self.compile_item(&mut ctx, item)
                .map_err(|err| self.fail(&ctx, err))?;
        }

        let module = ctx.into_module();
        log::debug!(
            "lowered module '{}': {} global(s), {} function(s)",
            module.name,
            module.globals().len(),
            module.functions().len()
        );
        Ok(module)
    }

    fn compile_item(&self, ctx: &mut CompilationContext, item: &Item<'_>) -> Result<()> {
        match item {
            Item::Const(decl) => DeclCompiler::new(ctx).compile_const_decl(decl),
            Item::Var(decl) => DeclCompiler::new(ctx).compile_var_decl(decl),
            Item::Function(def) => {
                FunctionCompiler::new(ctx, self.config.verify).compile(def)?;
                Ok(())
            }
        }
    }

    /// Hand the in-progress module to the fault report before a
    /// verification fault escapes.
    fn fail(&self, ctx: &CompilationContext, err: CompilationError) -> CompilationError {
        if matches!(err, CompilationError::InternalVerificationFault { .. }) {
            self.report_fault(ctx.module());
        }
        err
    }

    fn report_fault(&self, module: &Module) {
        match &self.config.fault_hook {
            Some(hook) => hook(module),
            None => log::error!("module at verification failure:\n{module}"),
        }
    }
}
