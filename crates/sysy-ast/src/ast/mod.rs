//! Abstract syntax tree consumed by the lowering engine.
//!
//! All nodes borrow from an arena ([`bumpalo::Bump`]) and are plain `Copy`
//! data: the tree is read-only input and is never mutated after the parser
//! (or an [`AstBuilder`](crate::AstBuilder)) produces it.

pub mod decl;
pub mod expr;
pub mod ops;
pub mod stmt;

pub use decl::*;
pub use expr::*;
pub use ops::*;
pub use stmt::*;

use sysy_core::Span;

/// An identifier with its location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ident<'ast> {
    pub name: &'ast str,
    pub span: Span,
}

impl<'ast> Ident<'ast> {
    pub fn new(name: &'ast str, span: Span) -> Self {
        Self { name, span }
    }
}

/// A whole source file: top-level declarations and functions in source order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompileUnit<'ast> {
    pub items: &'ast [Item<'ast>],
    pub span: Span,
}

impl<'ast> CompileUnit<'ast> {
    pub fn new(items: &'ast [Item<'ast>], span: Span) -> Self {
        Self { items, span }
    }

    pub fn items(&self) -> &'ast [Item<'ast>] {
        self.items
    }

    /// Function definitions, in source order.
    pub fn functions(self) -> impl Iterator<Item = &'ast FunctionDef<'ast>> {
        self.items.iter().filter_map(|item| match item {
            Item::Function(f) => Some(*f),
            _ => None,
        })
    }
}
