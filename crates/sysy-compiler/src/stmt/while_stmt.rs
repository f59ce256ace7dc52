//! While loops.

use sysy_ast::WhileStmt;

use super::{Result, StmtCompiler};

impl StmtCompiler<'_> {
    /// Lower `while (c) body`.
    ///
    /// `continue` targets `cond`, `break` targets `cont`, and lowering
    /// resumes in `cont`.
    ///
    /// ```text
    ///   br %cond
    /// cond:
    ///   [c]
    ///   br c, %body, %cont
    /// body:
    ///   [body]
    ///   br %cond             ; only if [body] falls through
    /// cont:
    /// ```
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile_while<'ast>(&mut self, while_stmt: &WhileStmt<'ast>) -> Result<()> {
        let cond_block = self.ctx.create_block("cond")?;
        let body_block = self.ctx.create_block("body")?;
        let cont_block = self.ctx.create_block("cont")?;
        self.ctx.build_br(cond_block)?;

        self.ctx.open_block(cond_block)?;
        let condition = self.expr_compiler().compile_condition(while_stmt.condition)?;
        self.ctx.build_cond_br(condition, body_block, cont_block)?;

        self.ctx.open_block(body_block)?;
        {
            let mut looped = self.ctx.enter_loop(cond_block, cont_block);
            StmtCompiler::new(&mut looped).compile(while_stmt.body)?;
        }
        if !self.ctx.is_unreachable() {
            self.ctx.build_br(cond_block)?;
        }

        self.ctx.open_block(cont_block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::test_support::context_in_function;
    use crate::ir::Terminator;
    use crate::stmt::test_support::layout_names;
    use bumpalo::Bump;
    use sysy_ast::{AstBuilder, BinaryOp};
    use sysy_core::Primitive;

    #[test]
    fn loop_blocks_and_back_edge() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut ctx = context_in_function(Primitive::Void);
        StmtCompiler::new(&mut ctx)
            .compile_stmts(&[
                b.local(Primitive::Int, "i", Some(b.int(0))),
                b.while_stmt(
                    b.binary(b.var("i"), BinaryOp::Lt, b.int(10)),
                    b.assign("i", &[], b.binary(b.var("i"), BinaryOp::Add, b.int(1))),
                ),
            ])
            .unwrap();

        assert_eq!(layout_names(&ctx), ["entry", "cond", "body", "cont"]);
        let function = ctx.current_function().unwrap();
        let cond = function.find_block("cond").unwrap();
        let body = function.find_block("body").unwrap();
        let cont = function.find_block("cont").unwrap();
        assert_eq!(function.block(body).terminator, Some(Terminator::Br(cond)));
        assert_eq!(function.successors(cond), vec![body, cont]);
        assert_eq!(ctx.cursor(), Some(cont));
        assert!(!ctx.loops().in_loop());
    }

    #[test]
    fn break_and_continue_target_innermost_loop() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut ctx = context_in_function(Primitive::Void);
        StmtCompiler::new(&mut ctx)
            .compile(&b.while_stmt(
                b.int(1),
                b.block_stmt(&[
                    b.while_stmt(b.int(1), b.break_stmt()),
                    b.continue_stmt(),
                ]),
            ))
            .unwrap();

        let function = ctx.current_function().unwrap();
        let outer_cond = function.find_block("cond").unwrap();
        let inner_body = function.find_block("body.1").unwrap();
        let inner_cont = function.find_block("cont.1").unwrap();
        assert_eq!(
            function.block(inner_body).terminator,
            Some(Terminator::Br(inner_cont))
        );
        assert_eq!(
            function.block(inner_cont).terminator,
            Some(Terminator::Br(outer_cond))
        );
    }

    #[test]
    fn statements_after_break_are_dropped() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut ctx = context_in_function(Primitive::Void);
        StmtCompiler::new(&mut ctx)
            .compile_stmts(&[
                b.local(Primitive::Int, "i", None),
                b.while_stmt(
                    b.int(1),
                    b.block_stmt(&[b.break_stmt(), b.assign("i", &[], b.int(5))]),
                ),
            ])
            .unwrap();

        let function = ctx.current_function().unwrap();
        let body = function.find_block("body").unwrap();
        assert!(function.block(body).insts.is_empty());
    }

    #[test]
    fn loop_context_is_popped_on_error() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut ctx = context_in_function(Primitive::Void);
        let result = StmtCompiler::new(&mut ctx)
            .compile(&b.while_stmt(b.int(1), b.assign("missing", &[], b.int(1))));
        assert!(result.is_err());
        assert!(!ctx.loops().in_loop());
        assert!(ctx.scopes().is_global());
    }
}
