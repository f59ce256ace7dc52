//! If statements.

use sysy_ast::IfStmt;

use super::{Result, StmtCompiler};

impl StmtCompiler<'_> {
    /// Lower `if (c) then [else otherwise]`.
    ///
    /// Both arms always get a block. The merge block is laid out only when
    /// an arm falls through into it; when neither does, the cursor stays
    /// empty after the statement.
    ///
    /// ```text
    ///   br c, %then, %else
    /// then:
    ///   [then]
    ///   br %merge            ; only if [then] falls through
    /// else:
    ///   [else]
    ///   br %merge            ; only if [else] falls through
    /// merge:                 ; only if some arm branched here
    /// ```
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile_if<'ast>(&mut self, if_stmt: &IfStmt<'ast>) -> Result<()> {
        let condition = self.expr_compiler().compile_condition(if_stmt.condition)?;
        let then_block = self.ctx.create_block("then")?;
        let else_block = self.ctx.create_block("else")?;
        let merge_block = self.ctx.create_block("merge")?;
        self.ctx.build_cond_br(condition, then_block, else_block)?;

        let mut needs_merge = false;

        self.ctx.open_block(then_block)?;
        self.compile(if_stmt.then_stmt)?;
        if !self.ctx.is_unreachable() {
            needs_merge = true;
            self.ctx.build_br(merge_block)?;
        }

        self.ctx.open_block(else_block)?;
        if let Some(else_stmt) = if_stmt.else_stmt {
            self.compile(else_stmt)?;
        }
        if !self.ctx.is_unreachable() {
            needs_merge = true;
            self.ctx.build_br(merge_block)?;
        }

        if needs_merge {
            self.ctx.open_block(merge_block)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::test_support::context_in_function;
    use crate::stmt::test_support::layout_names;
    use bumpalo::Bump;
    use sysy_ast::{AstBuilder, BinaryOp};
    use sysy_core::Primitive;

    #[test]
    fn if_without_else_falls_into_merge() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut ctx = context_in_function(Primitive::Void);
        StmtCompiler::new(&mut ctx)
            .compile_stmts(&[
                b.local(Primitive::Int, "x", None),
                b.if_stmt(
                    b.binary(b.var("x"), BinaryOp::Gt, b.int(0)),
                    b.assign("x", &[], b.int(1)),
                    None,
                ),
            ])
            .unwrap();

        assert_eq!(layout_names(&ctx), ["entry", "then", "else", "merge"]);
        let function = ctx.current_function().unwrap();
        let merge = function.find_block("merge").unwrap();
        assert_eq!(function.predecessors(merge).len(), 2);
        assert_eq!(ctx.cursor(), Some(merge));
    }

    #[test]
    fn both_arms_returning_leaves_no_merge() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut ctx = context_in_function(Primitive::Int);
        StmtCompiler::new(&mut ctx)
            .compile_stmts(&[
                b.local(Primitive::Int, "x", None),
                b.if_stmt(
                    b.var("x"),
                    b.ret(Some(b.int(1))),
                    Some(b.ret(Some(b.int(2)))),
                ),
            ])
            .unwrap();

        assert_eq!(layout_names(&ctx), ["entry", "then", "else"]);
        assert!(ctx.is_unreachable());
    }

    #[test]
    fn one_returning_arm_merges_the_other() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut ctx = context_in_function(Primitive::Int);
        StmtCompiler::new(&mut ctx)
            .compile_stmts(&[
                b.local(Primitive::Int, "x", None),
                b.if_stmt(b.var("x"), b.ret(Some(b.int(1))), None),
                b.ret(Some(b.int(0))),
            ])
            .unwrap();

        let function = ctx.current_function().unwrap();
        let merge = function.find_block("merge").unwrap();
        let else_block = function.find_block("else").unwrap();
        assert_eq!(function.predecessors(merge), vec![else_block]);
        let returns = function
            .blocks()
            .filter(|(_, block)| {
                block
                    .terminator
                    .as_ref()
                    .is_some_and(|terminator| terminator.is_return())
            })
            .count();
        assert_eq!(returns, 2);
    }

    #[test]
    fn nested_ifs_get_unique_block_names() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut ctx = context_in_function(Primitive::Void);
        StmtCompiler::new(&mut ctx)
            .compile_stmts(&[
                b.local(Primitive::Int, "x", None),
                b.if_stmt(
                    b.var("x"),
                    b.if_stmt(b.var("x"), b.assign("x", &[], b.int(2)), None),
                    None,
                ),
            ])
            .unwrap();

        assert_eq!(
            layout_names(&ctx),
            ["entry", "then", "then.1", "else.1", "merge.1", "else", "merge"]
        );
    }
}
