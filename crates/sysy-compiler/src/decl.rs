//! Constant and variable declarations.
//!
//! Whether a declaration is global is decided by the context: with no active
//! function it is. Constants are always realized as internal global
//! constants; inside a function their name is prefixed with the function's
//! (`main.N`). Local variables get an entry-block `alloca` and are
//! initialized where they are declared.
//!
//! ## Aggregate initializers
//!
//! Brace lists are flattened row-major with brace elision: a scalar fills the
//! next element, a nested list fills the largest sub-array that starts at the
//! current position, and missing elements are zero.
//!
//! ```text
//! int a[2][3] = {1, 2, 3, {4}};   // {{1, 2, 3}, {4, 0, 0}}
//! int b[2][2] = {{1}, 2, 3};      // {{1, 0}, {2, 3}}
//! ```

use sysy_ast::{ArrayDim, ConstDecl, Expr, InitVal, VarDecl, VarDef};
use sysy_core::{CompilationError, DataType, Primitive, Span};

use crate::const_eval::{ConstEvaluator, ConstInit, ConstValue};
use crate::context::CompilationContext;
use crate::conversion::{convert, representation};
use crate::expr::ExprCompiler;
use crate::ir::{Global, Initializer, Linkage, Value};
use crate::scope::{ScopeStack, Symbol};

type Result<T> = std::result::Result<T, CompilationError>;

/// Lowers declarations at file or block scope.
pub struct DeclCompiler<'a> {
    ctx: &'a mut CompilationContext,
}

impl<'a> DeclCompiler<'a> {
    pub fn new(ctx: &'a mut CompilationContext) -> Self {
        Self { ctx }
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile_const_decl(&mut self, decl: &ConstDecl<'_>) -> Result<()> {
        for def in decl.defs {
            self.compile_const_def(decl.ty, def)?;
        }
        Ok(())
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile_var_decl(&mut self, decl: &VarDecl<'_>) -> Result<()> {
        for def in decl.defs {
            if self.ctx.is_global_scope() {
                self.compile_global_var(decl.ty, def)?;
            } else {
                self.compile_local_var(decl.ty, def)?;
            }
        }
        Ok(())
    }

    fn compile_const_def(&mut self, base: Primitive, def: &VarDef<'_>) -> Result<()> {
        let name = def.name.name;
        let dims = self.extents(def.dims, def.span)?;
        let init = def.init.ok_or_else(|| CompilationError::InvalidInitializer {
            message: format!("constant '{name}' requires an initializer"),
            span: def.span,
        })?;
        let contents = self.constant_contents(base, &dims, &init)?;
        let data_type = DataType::array(base, dims.iter().map(|&d| Some(d)).collect());

        let global_name = match self.ctx.active_function() {
            Some(function) => {
                let qualified = format!("{}.{name}", function.name);
                self.ctx.module().unique_global_name(&qualified)
            }
            None => name.to_string(),
        };
        log::trace!("constant '{name}' stored as global '{global_name}'");

        let id = self.ctx.module_mut().add_global(Global {
            name: global_name,
            value_type: representation(&data_type),
            constant: true,
            linkage: Linkage::Internal,
            initializer: contents.to_initializer(),
        });
        let address = self.ctx.module().global_value(id);
        self.ctx.declare(Symbol {
            name: name.to_string(),
            data_type,
            address,
            constant: Some(contents),
            span: def.span,
        })
    }

    fn compile_global_var(&mut self, base: Primitive, def: &VarDef<'_>) -> Result<()> {
        let name = def.name.name;
        let dims = self.extents(def.dims, def.span)?;
        let data_type = DataType::array(base, dims.iter().map(|&d| Some(d)).collect());
        let initializer = match &def.init {
            Some(init) => self.constant_contents(base, &dims, init)?.to_initializer(),
            None => Initializer::Zero,
        };
        let id = self.ctx.module_mut().add_global(Global {
            name: name.to_string(),
            value_type: representation(&data_type),
            constant: false,
            linkage: Linkage::Internal,
            initializer,
        });
        let address = self.ctx.module().global_value(id);
        self.ctx.declare(Symbol {
            name: name.to_string(),
            data_type,
            address,
            constant: None,
            span: def.span,
        })
    }

    fn compile_local_var(&mut self, base: Primitive, def: &VarDef<'_>) -> Result<()> {
        let dims = self.extents(def.dims, def.span)?;
        let data_type = DataType::array(base, dims.iter().map(|&d| Some(d)).collect());
        let storage = representation(&data_type);
        let slot = self.ctx.build_alloca(storage.clone())?;
        self.ctx.declare(Symbol {
            name: def.name.name.to_string(),
            data_type,
            address: slot.clone(),
            constant: None,
            span: def.span,
        })?;

        let Some(init) = &def.init else {
            return Ok(());
        };
        if dims.is_empty() {
            let expr = scalar_initializer(init)?;
            let value = ExprCompiler::new(self.ctx).compile(expr)?;
            let value = convert(self.ctx, value, base, expr.span())?;
            return self.ctx.build_store(value, slot);
        }

        let elements = flatten_initializer(init, &dims)?;
        self.ctx.build_store(Value::zero(storage), slot.clone())?;
        for (position, expr) in elements {
            let value = ExprCompiler::new(self.ctx).compile(expr)?;
            let value = convert(self.ctx, value, base, expr.span())?;
            let mut indices = vec![Value::int(0)];
            indices.extend(unravel(position, &dims).into_iter().map(Value::int));
            let element = self.ctx.build_gep(slot.clone(), indices)?;
            self.ctx.build_store(value, element)?;
        }
        Ok(())
    }

    /// Evaluate declared extents, all of which must be given.
    pub fn extents(&self, dims: &[ArrayDim<'_>], span: Span) -> Result<Vec<u32>> {
        eval_extents(self.ctx.scopes(), dims, span)
    }

    /// Evaluate an initializer entirely at compile time.
    fn constant_contents(
        &self,
        base: Primitive,
        dims: &[u32],
        init: &InitVal<'_>,
    ) -> Result<ConstInit> {
        let evaluator = ConstEvaluator::new(self.ctx.scopes());
        if dims.is_empty() {
            let expr = scalar_initializer(init)?;
            return Ok(ConstInit::scalar(evaluator.eval_as(expr, base)?));
        }
        let zero = ConstValue::Int(0)
            .convert(base)
            .ok_or_else(|| CompilationError::InvalidConversion {
                from: "int".to_string(),
                to: base.to_string(),
                span: init.span(),
            })?;
        let mut values = vec![zero; element_count(dims)];
        for (position, expr) in flatten_initializer(init, dims)? {
            values[position] = evaluator.eval_as(expr, base)?;
        }
        Ok(ConstInit {
            dims: dims.to_vec(),
            values,
        })
    }
}

/// Evaluate array extents against the constants visible in `scopes`.
pub fn eval_extents(scopes: &ScopeStack, dims: &[ArrayDim<'_>], span: Span) -> Result<Vec<u32>> {
    let evaluator = ConstEvaluator::new(scopes);
    dims.iter()
        .map(|dim| match dim {
            ArrayDim::Sized(expr) => evaluator.eval_extent(expr),
            ArrayDim::Unspecified => Err(CompilationError::InvalidArrayDimension {
                message: "extent must be specified".to_string(),
                span,
            }),
        })
        .collect()
}

fn scalar_initializer<'ast>(init: &InitVal<'ast>) -> Result<&'ast Expr<'ast>> {
    match init {
        InitVal::Expr(expr) => Ok(*expr),
        InitVal::List(_, span) => Err(CompilationError::InvalidInitializer {
            message: "braced list initializes a scalar".to_string(),
            span: *span,
        }),
    }
}

fn element_count(dims: &[u32]) -> usize {
    dims.iter().map(|&d| d as usize).product()
}

/// Row-major position to per-dimension indices.
fn unravel(mut position: usize, dims: &[u32]) -> Vec<i32> {
    let mut indices = vec![0; dims.len()];
    for (slot, &dim) in indices.iter_mut().zip(dims).rev() {
        let dim = dim.max(1) as usize;
        *slot = (position % dim) as i32;
        position /= dim;
    }
    indices
}

/// Explicit elements of an array initializer as `(row-major position, expr)`.
pub fn flatten_initializer<'ast>(
    init: &InitVal<'ast>,
    dims: &[u32],
) -> Result<Vec<(usize, &'ast Expr<'ast>)>> {
    match init {
        InitVal::List(items, _) => {
            let mut out = Vec::new();
            flatten_list(items, dims, 0, &mut out)?;
            Ok(out)
        }
        InitVal::Expr(expr) => Err(CompilationError::InvalidInitializer {
            message: "array requires a braced initializer list".to_string(),
            span: expr.span(),
        }),
    }
}

fn flatten_list<'ast>(
    items: &[InitVal<'ast>],
    dims: &[u32],
    base: usize,
    out: &mut Vec<(usize, &'ast Expr<'ast>)>,
) -> Result<()> {
    let total = element_count(dims);
    let mut position = 0;
    for item in items {
        if position >= total {
            return Err(CompilationError::InvalidInitializer {
                message: format!("too many elements for an array of {total}"),
                span: item.span(),
            });
        }
        match item {
            InitVal::Expr(expr) => {
                out.push((base + position, *expr));
                position += 1;
            }
            InitVal::List(nested, span) => {
                let depth = (1..dims.len())
                    .find(|&k| position % element_count(&dims[k..]).max(1) == 0)
                    .ok_or_else(|| CompilationError::InvalidInitializer {
                        message: if dims.len() == 1 {
                            "braced list initializes a scalar element".to_string()
                        } else {
                            "nested list does not start at a sub-array boundary".to_string()
                        },
                        span: *span,
                    })?;
                let sub_dims = &dims[depth..];
                flatten_list(nested, sub_dims, base + position, out)?;
                position += element_count(sub_dims);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use sysy_ast::{AstBuilder, Number};

    fn positions(elements: &[(usize, &Expr<'_>)]) -> Vec<(usize, i32)> {
        elements
            .iter()
            .map(|(pos, expr)| match expr {
                Expr::Number(n) => match n.value {
                    Number::Int(v) => (*pos, v),
                    Number::Float(v) => (*pos, v as i32),
                },
                _ => (*pos, -1),
            })
            .collect()
    }

    #[test]
    fn flat_list_fills_row_major() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let init = b.init_list(&[b.init_expr(b.int(1)), b.init_expr(b.int(2)), b.init_expr(b.int(3))]);
        let flat = flatten_initializer(&init, &[2, 2]).unwrap();
        assert_eq!(positions(&flat), vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn nested_lists_align_to_rows() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        // {1, 2, 3, {4}} over [2][3]
        let init = b.init_list(&[
            b.init_expr(b.int(1)),
            b.init_expr(b.int(2)),
            b.init_expr(b.int(3)),
            b.init_list(&[b.init_expr(b.int(4))]),
        ]);
        let flat = flatten_initializer(&init, &[2, 3]).unwrap();
        assert_eq!(positions(&flat), vec![(0, 1), (1, 2), (2, 3), (3, 4)]);

        // {{1}, 2, 3} over [2][2]
        let init = b.init_list(&[
            b.init_list(&[b.init_expr(b.int(1))]),
            b.init_expr(b.int(2)),
            b.init_expr(b.int(3)),
        ]);
        let flat = flatten_initializer(&init, &[2, 2]).unwrap();
        assert_eq!(positions(&flat), vec![(0, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn nested_list_picks_outermost_aligned_sub_array() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        // {{1, 2, 3, 4}} over [2][2][2]: the inner list fills a [2][2] slab.
        let init = b.init_list(&[b.init_list(&[
            b.init_expr(b.int(1)),
            b.init_expr(b.int(2)),
            b.init_expr(b.int(3)),
            b.init_expr(b.int(4)),
        ])]);
        let flat = flatten_initializer(&init, &[2, 2, 2]).unwrap();
        assert_eq!(positions(&flat), vec![(0, 1), (1, 2), (2, 3), (3, 4)]);
    }

    #[test]
    fn overflow_is_rejected() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let init = b.init_list(&[
            b.init_expr(b.int(1)),
            b.init_expr(b.int(2)),
            b.init_expr(b.int(3)),
        ]);
        assert!(matches!(
            flatten_initializer(&init, &[2]),
            Err(CompilationError::InvalidInitializer { .. })
        ));
    }

    #[test]
    fn misaligned_nested_list_is_rejected() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let init = b.init_list(&[b.init_expr(b.int(1)), b.init_list(&[b.init_expr(b.int(2))])]);
        assert!(matches!(
            flatten_initializer(&init, &[2, 2]),
            Err(CompilationError::InvalidInitializer { .. })
        ));
    }

    #[test]
    fn unravel_positions() {
        assert_eq!(unravel(0, &[2, 3]), vec![0, 0]);
        assert_eq!(unravel(4, &[2, 3]), vec![1, 1]);
        assert_eq!(unravel(5, &[2, 3]), vec![1, 2]);
    }
}
