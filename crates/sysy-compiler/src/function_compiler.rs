//! Function compiler for lowering a function definition to IR.
//!
//! This module provides [`FunctionCompiler`] which lowers a single function:
//!
//! - Registering the signature so the body (and later items) can call it
//! - Binding parameters to entry-block stack slots
//! - Lowering the body statements
//! - Terminating blocks the body left open with a default return
//! - Verifying the finished function
//!
//! # Example
//!
//! ```ignore
//! let mut compiler = FunctionCompiler::new(ctx, true);
//! let id = compiler.compile(&func_def)?;
//! ```

use sysy_ast::{FunctionDef, Param as AstParam};
use sysy_core::{CompilationError, DataType, FunctionSignature, Primitive};

use crate::context::{ActiveFunction, CompilationContext};
use crate::conversion::{representation, scalar_type};
use crate::decl::eval_extents;
use crate::ir::{FuncId, Function, Linkage, Param, Terminator, Value, verify_function};
use crate::scope::Symbol;
use crate::stmt::StmtCompiler;

type Result<T> = std::result::Result<T, CompilationError>;

/// Lowers function definitions into the module.
pub struct FunctionCompiler<'a> {
    /// Compilation context with the module under construction
    ctx: &'a mut CompilationContext,
    /// Run the verifier on every finished function
    verify: bool,
}

impl<'a> FunctionCompiler<'a> {
    pub fn new(ctx: &'a mut CompilationContext, verify: bool) -> Self {
        Self { ctx, verify }
    }

    /// Lower one function definition.
    ///
    /// `main` gets external linkage, every other function internal.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile<'ast>(&mut self, def: &FunctionDef<'ast>) -> Result<FuncId> {
        let name = def.name.name;
        if self.ctx.lookup_function(name).is_some() {
            return Err(CompilationError::DuplicateFunction {
                name: name.to_string(),
                span: def.name.span,
            });
        }

        let param_types = def
            .params
            .iter()
            .map(|param| self.param_type(param))
            .collect::<Result<Vec<_>>>()?;
        let params = def
            .params
            .iter()
            .zip(&param_types)
            .map(|(param, ty)| Param {
                name: param.name.name.to_string(),
                ty: representation(ty),
            })
            .collect();
        let linkage = if name == "main" {
            Linkage::External
        } else {
            Linkage::Internal
        };
        let id = self.ctx.module_mut().add_function(Function::new(
            name,
            scalar_type(def.return_type),
            params,
            linkage,
        ));
        self.ctx.register_function(
            id,
            FunctionSignature::new(name, param_types.clone(), def.return_type),
        );
        log::debug!("lowering function '{name}'");

        {
            let mut function = self.ctx.enter_function(ActiveFunction {
                id,
                name: name.to_string(),
                return_type: def.return_type,
            });
            let entry = function.create_block("entry")?;
            function.open_block(entry)?;

            let mut scope = function.enter_scope();
            bind_params(&mut scope, def.params, &param_types)?;
            // Parameters and top-level body declarations share one scope.
            StmtCompiler::new(&mut scope).compile_stmts(def.body.stmts)?;
        }

        self.terminate_open_blocks(id, def.return_type);
        if self.verify {
            self.verify(id)?;
        }
        Ok(id)
    }

    /// Structurally verify a finished function.
    pub fn verify(&self, id: FuncId) -> Result<()> {
        verify_function(self.ctx.module(), id).map_err(|err| {
            CompilationError::InternalVerificationFault {
                function: self.ctx.module().function(id).name.clone(),
                message: err.to_string(),
            }
        })
    }

    /// Semantic type of a parameter. An array parameter's leading extent is
    /// always treated as unspecified.
    fn param_type(&self, param: &AstParam<'_>) -> Result<DataType> {
        let Some((_, trailing)) = param.dims.split_first() else {
            return Ok(DataType::scalar(param.ty));
        };
        let extents = eval_extents(self.ctx.scopes(), trailing, param.span)?;
        let mut dims = vec![None];
        dims.extend(extents.into_iter().map(Some));
        Ok(DataType::array(param.ty, dims))
    }

    /// Give every laid-out block still lacking a terminator a default return.
    ///
    /// Falling off the end of a non-void function returns an unspecified
    /// value.
    fn terminate_open_blocks(&mut self, id: FuncId, return_type: Primitive) {
        let function = self.ctx.module_mut().function_mut(id);
        let open: Vec<_> = function
            .blocks()
            .filter(|(_, block)| !block.is_terminated())
            .map(|(block, _)| block)
            .collect();
        for block in open {
            let value = match return_type {
                Primitive::Void => None,
                base => Some(Value::undef(scalar_type(base))),
            };
            log::trace!(
                "default return in '{}' block '{}'",
                function.name,
                function.block(block).name
            );
            function.set_terminator(block, Terminator::Ret(value));
        }
    }
}

/// Spill each incoming argument to a stack slot and declare it.
fn bind_params(
    ctx: &mut CompilationContext,
    params: &[AstParam<'_>],
    types: &[DataType],
) -> Result<()> {
    for (index, (param, data_type)) in params.iter().zip(types).enumerate() {
        let ty = representation(data_type);
        let slot = ctx.build_alloca(ty.clone())?;
        ctx.build_store(Value::arg(index as u32, ty), slot.clone())?;
        ctx.declare(Symbol {
            name: param.name.name.to_string(),
            data_type: data_type.clone(),
            address: slot,
            constant: None,
            span: param.span,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{InstKind, IrType};
    use bumpalo::Bump;
    use sysy_ast::{AstBuilder, BinaryOp, Item};

    fn definition<'ast>(item: Item<'ast>) -> &'ast FunctionDef<'ast> {
        match item {
            Item::Function(def) => def,
            other => panic!("expected a function, got {other:?}"),
        }
    }

    #[test]
    fn parameters_are_spilled_to_slots() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let def = definition(b.function(
            "add",
            Primitive::Int,
            &[b.param("a", Primitive::Int), b.param("b", Primitive::Float)],
            &[b.ret(Some(b.binary(b.var("a"), BinaryOp::Add, b.var("b"))))],
        ));

        let mut ctx = CompilationContext::new("test");
        let id = FunctionCompiler::new(&mut ctx, true).compile(def).unwrap();

        let function = ctx.module().function(id);
        assert_eq!(function.linkage, Linkage::Internal);
        assert_eq!(function.params[1].ty, IrType::F32);
        let entry = function.entry().unwrap();
        let kinds: Vec<_> = function
            .block_insts(entry)
            .map(|(_, inst)| &inst.kind)
            .collect();
        assert!(matches!(kinds[0], InstKind::Alloca { .. }));
        assert!(matches!(kinds[1], InstKind::Alloca { .. }));
        assert!(matches!(kinds[2], InstKind::Store { value, .. } if *value == Value::arg(0, IrType::I32)));
        assert!(ctx.active_function().is_none());
        assert!(ctx.scopes().is_global());
    }

    #[test]
    fn array_parameter_decays() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let def = definition(b.function(
            "sum",
            Primitive::Void,
            &[b.array_param("m", Primitive::Int, &[b.int(3)])],
            &[],
        ));

        let mut ctx = CompilationContext::new("test");
        let id = FunctionCompiler::new(&mut ctx, true).compile(def).unwrap();
        assert_eq!(
            ctx.module().function(id).params[0].ty,
            IrType::I32.array_of(3).ptr_to()
        );
        let signature = &ctx.lookup_function("sum").unwrap().signature;
        assert_eq!(
            signature.params[0],
            DataType::array(Primitive::Int, vec![None, Some(3)])
        );
    }

    #[test]
    fn missing_return_gets_undef() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let def = definition(b.function("main", Primitive::Int, &[], &[]));

        let mut ctx = CompilationContext::new("test");
        let id = FunctionCompiler::new(&mut ctx, true).compile(def).unwrap();
        let function = ctx.module().function(id);
        assert_eq!(function.linkage, Linkage::External);
        let entry = function.entry().unwrap();
        assert_eq!(
            function.block(entry).terminator,
            Some(Terminator::Ret(Some(Value::undef(IrType::I32))))
        );
    }

    #[test]
    fn recursion_resolves_the_function_itself() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let def = definition(b.function(
            "fact",
            Primitive::Int,
            &[b.param("n", Primitive::Int)],
            &[
                b.if_stmt(
                    b.binary(b.var("n"), BinaryOp::Le, b.int(1)),
                    b.ret(Some(b.int(1))),
                    None,
                ),
                b.ret(Some(b.binary(
                    b.var("n"),
                    BinaryOp::Mul,
                    b.call("fact", &[b.binary(b.var("n"), BinaryOp::Sub, b.int(1))]),
                ))),
            ],
        ));

        let mut ctx = CompilationContext::new("test");
        assert!(FunctionCompiler::new(&mut ctx, true).compile(def).is_ok());
    }

    #[test]
    fn duplicate_definition_is_rejected() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let def = definition(b.function("f", Primitive::Void, &[], &[]));

        let mut ctx = CompilationContext::new("test");
        FunctionCompiler::new(&mut ctx, true).compile(def).unwrap();
        let err = FunctionCompiler::new(&mut ctx, true)
            .compile(def)
            .unwrap_err();
        assert!(matches!(err, CompilationError::DuplicateFunction { .. }));
    }

    #[test]
    fn duplicate_parameter_names_are_rejected() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let def = definition(b.function(
            "f",
            Primitive::Void,
            &[b.param("x", Primitive::Int), b.param("x", Primitive::Int)],
            &[],
        ));

        let mut ctx = CompilationContext::new("test");
        let err = FunctionCompiler::new(&mut ctx, true)
            .compile(def)
            .unwrap_err();
        assert!(matches!(err, CompilationError::Redeclaration { .. }));
        assert!(ctx.active_function().is_none());
        assert!(ctx.scopes().is_global());
    }
}
