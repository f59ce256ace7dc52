//! Function calls.

use sysy_ast::CallExpr;
use sysy_core::CompilationError;

use super::{ExprCompiler, Result};
use crate::conversion::{infer, representation};
use crate::ir::Value;

/// Lower a call: arguments left to right, scalars coerced to the parameter
/// type, arrays passed through as pointers.
pub fn compile_call<'ast>(
    compiler: &mut ExprCompiler<'_>,
    call: &CallExpr<'ast>,
) -> Result<Value> {
    let name = call.name.name;
    let entry = compiler
        .ctx
        .lookup_function(name)
        .cloned()
        .ok_or_else(|| CompilationError::UnknownFunction {
            name: name.to_string(),
            span: call.span,
        })?;
    let params = &entry.signature.params;
    if params.len() != call.args.len() {
        return Err(CompilationError::ArityMismatch {
            name: name.to_string(),
            expected: params.len(),
            got: call.args.len(),
            span: call.span,
        });
    }

    let mut args = Vec::with_capacity(params.len());
    for (arg, param) in call.args.iter().zip(params) {
        let value = compiler.compile(arg)?;
        match param.as_scalar() {
            Some(base) => args.push(compiler.convert(value, base, arg.span())?),
            None => {
                let expected = representation(param);
                if value.ty != expected {
                    return Err(CompilationError::InvalidConversion {
                        from: infer(&value.ty).to_string(),
                        to: param.to_string(),
                        span: arg.span(),
                    });
                }
                args.push(value);
            }
        }
    }

    compiler.ctx.build_call(entry.id, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::test_support::context_in_function;
    use crate::ir::{Function, InstKind, IrType, Linkage, Param};
    use crate::scope::Symbol;
    use bumpalo::Bump;
    use sysy_ast::AstBuilder;
    use sysy_core::{DataType, FunctionSignature, Primitive, Span};

    fn declare(
        ctx: &mut crate::context::CompilationContext,
        name: &str,
        params: Vec<DataType>,
        return_type: Primitive,
    ) -> crate::ir::FuncId {
        let ir_params = params
            .iter()
            .enumerate()
            .map(|(i, ty)| Param {
                name: format!("p{i}"),
                ty: representation(ty),
            })
            .collect();
        let id = ctx.module_mut().add_function(Function::new(
            name,
            crate::conversion::scalar_type(return_type),
            ir_params,
            Linkage::External,
        ));
        ctx.register_function(id, FunctionSignature::new(name, params, return_type));
        id
    }

    #[test]
    fn scalar_arguments_are_coerced() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut ctx = context_in_function(Primitive::Void);
        let callee = declare(&mut ctx, "putfloat", vec![DataType::float()], Primitive::Void);

        let value = ExprCompiler::new(&mut ctx)
            .compile(b.call("putfloat", &[b.int(3)]))
            .unwrap();
        assert!(value.is_void());

        let function = ctx.current_function().unwrap();
        let entry = function.entry().unwrap();
        let (_, call) = function.block_insts(entry).last().unwrap();
        assert_eq!(
            call.kind,
            InstKind::Call {
                callee,
                args: vec![Value::float(3.0)],
            }
        );
    }

    #[test]
    fn unknown_function_and_arity() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut ctx = context_in_function(Primitive::Void);
        declare(&mut ctx, "getint", Vec::new(), Primitive::Int);

        let mut compiler = ExprCompiler::new(&mut ctx);
        assert!(matches!(
            compiler.compile(b.call("nope", &[])),
            Err(CompilationError::UnknownFunction { .. })
        ));
        assert!(matches!(
            compiler.compile(b.call("getint", &[b.int(1)])),
            Err(CompilationError::ArityMismatch {
                expected: 0,
                got: 1,
                ..
            })
        ));
    }

    #[test]
    fn array_argument_passes_decayed_pointer() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut ctx = context_in_function(Primitive::Void);
        declare(
            &mut ctx,
            "getarray",
            vec![DataType::array(Primitive::Int, vec![None])],
            Primitive::Int,
        );
        let slot = ctx.build_alloca(IrType::I32.array_of(10)).unwrap();
        ctx.declare(Symbol {
            name: "a".into(),
            data_type: DataType::array(Primitive::Int, vec![Some(10)]),
            address: slot,
            constant: None,
            span: Span::default(),
        })
        .unwrap();

        let value = ExprCompiler::new(&mut ctx)
            .compile(b.call("getarray", &[b.var("a")]))
            .unwrap();
        assert_eq!(value.ty, IrType::I32);
    }

    #[test]
    fn mismatched_array_shape_is_rejected() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut ctx = context_in_function(Primitive::Void);
        declare(
            &mut ctx,
            "getfarray",
            vec![DataType::array(Primitive::Float, vec![None])],
            Primitive::Int,
        );
        let slot = ctx.build_alloca(IrType::I32.array_of(10)).unwrap();
        ctx.declare(Symbol {
            name: "a".into(),
            data_type: DataType::array(Primitive::Int, vec![Some(10)]),
            address: slot,
            constant: None,
            span: Span::default(),
        })
        .unwrap();

        let err = ExprCompiler::new(&mut ctx)
            .compile(b.call("getfarray", &[b.var("a")]))
            .unwrap_err();
        assert_eq!(
            err,
            CompilationError::InvalidConversion {
                from: "int[]".into(),
                to: "float[]".into(),
                span: Span::default(),
            }
        );
    }
}
