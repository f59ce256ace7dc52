//! Lexical scopes mapping names to storage.
//!
//! The bottom scope holds globals and is never popped; every function body
//! and brace-delimited block pushes one more.

use rustc_hash::FxHashMap;
use sysy_core::{CompilationError, DataType, Span};

use crate::const_eval::ConstInit;
use crate::ir::Value;

type Result<T> = std::result::Result<T, CompilationError>;

// ============================================================================
// Types
// ============================================================================

/// A declared variable, constant or parameter.
#[derive(Debug, Clone)]
pub struct Symbol {
    /// Source name
    pub name: String,
    /// Semantic type; a parameter array has an unspecified leading extent
    pub data_type: DataType,
    /// Address of the storage (an `alloca` or a global)
    pub address: Value,
    /// Compile-time contents, for constants
    pub constant: Option<ConstInit>,
    /// Where it was declared
    pub span: Span,
}

// ============================================================================
// ScopeStack
// ============================================================================

#[derive(Debug)]
pub struct ScopeStack {
    scopes: Vec<FxHashMap<String, Symbol>>,
}

impl ScopeStack {
    /// A stack holding only the global scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![FxHashMap::default()],
        }
    }

    pub fn push(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    /// Pop the innermost scope. The global scope stays.
    pub fn pop(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn is_global(&self) -> bool {
        self.scopes.len() == 1
    }

    /// Bind a name in the innermost scope.
    pub fn declare(&mut self, symbol: Symbol) -> Result<()> {
        let scope = self
            .scopes
            .last_mut()
            .ok_or_else(|| CompilationError::internal("scope stack is empty"))?;
        if scope.contains_key(&symbol.name) {
            return Err(CompilationError::Redeclaration {
                name: symbol.name,
                span: symbol.span,
            });
        }
        scope.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    /// Innermost binding of `name`.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn resolve(&self, name: &str, span: Span) -> Result<&Symbol> {
        self.lookup(name)
            .ok_or_else(|| CompilationError::UndeclaredIdentifier {
                name: name.to_string(),
                span,
            })
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
