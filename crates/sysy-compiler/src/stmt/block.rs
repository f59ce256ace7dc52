//! Block statements.

use sysy_ast::Block;

use super::{Result, StmtCompiler};

impl StmtCompiler<'_> {
    /// Lower `{ ... }` in a fresh scope.
    ///
    /// Names declared inside are dropped when the block ends, and shadow
    /// outer names of the same spelling until then.
    pub fn compile_block<'ast>(&mut self, block: &Block<'ast>) -> Result<()> {
        let mut scope = self.ctx.enter_scope();
        StmtCompiler::new(&mut scope).compile_stmts(block.stmts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::test_support::context_in_function;
    use crate::ir::{InstKind, Value};
    use bumpalo::Bump;
    use sysy_ast::AstBuilder;
    use sysy_core::{CompilationError, Primitive};

    #[test]
    fn inner_declaration_shadows_outer() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut ctx = context_in_function(Primitive::Void);
        StmtCompiler::new(&mut ctx)
            .compile_stmts(&[
                b.local(Primitive::Int, "x", Some(b.int(1))),
                b.block_stmt(&[
                    b.local(Primitive::Float, "x", Some(b.int(2))),
                    b.assign("x", &[], b.int(3)),
                ]),
                b.assign("x", &[], b.int(4)),
            ])
            .unwrap();

        let function = ctx.current_function().unwrap();
        let entry = function.entry().unwrap();
        let stores: Vec<Value> = function
            .block_insts(entry)
            .filter_map(|(_, inst)| match &inst.kind {
                InstKind::Store { value, .. } => Some(value.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            stores,
            vec![
                Value::int(1),
                Value::float(2.0),
                Value::float(3.0),
                Value::int(4)
            ]
        );
        assert_eq!(
            ctx.scopes().lookup("x").unwrap().data_type,
            sysy_core::DataType::int()
        );
    }

    #[test]
    fn inner_names_are_gone_after_the_block() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut ctx = context_in_function(Primitive::Void);
        let err = StmtCompiler::new(&mut ctx)
            .compile_stmts(&[
                b.block_stmt(&[b.local(Primitive::Int, "y", None)]),
                b.assign("y", &[], b.int(1)),
            ])
            .unwrap_err();
        assert!(matches!(err, CompilationError::UndeclaredIdentifier { .. }));
        assert!(ctx.scopes().is_global());
    }

    #[test]
    fn same_scope_redeclaration_is_rejected() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut ctx = context_in_function(Primitive::Void);
        let err = StmtCompiler::new(&mut ctx)
            .compile(&b.block_stmt(&[
                b.local(Primitive::Int, "z", None),
                b.local(Primitive::Float, "z", None),
            ]))
            .unwrap_err();
        assert!(matches!(err, CompilationError::Redeclaration { .. }));
    }
}
