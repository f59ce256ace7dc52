//! Error taxonomy for lowering a compile unit.
//!
//! Every error is fatal: the first one aborts the whole compile unit and no
//! partial module is produced.
//!
//! ```text
//! CompilationError
//! ├── user errors        - carry the span of the offending node
//! │   ├── UndeclaredIdentifier / UnknownFunction / ArityMismatch
//! │   ├── InvalidOperator / InvalidOperandType / InvalidConversion
//! │   ├── ControlOutsideLoop / MissingReturnValue
//! │   ├── Redeclaration / DuplicateFunction
//! │   └── NonConstantExpression / InvalidArrayDimension / InvalidInitializer / InvalidIndex
//! └── compiler defects   - never caused by the input program
//!     ├── InternalVerificationFault
//!     └── Internal
//! ```

use thiserror::Error;

use crate::Span;

/// Errors raised while lowering an AST to IR.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompilationError {
    /// A name was not found in any enclosing scope.
    #[error("at {span}: use of undeclared identifier '{name}'")]
    UndeclaredIdentifier { name: String, span: Span },

    /// A call names a function that is neither defined nor a library prototype.
    #[error("at {span}: call to unknown function '{name}'")]
    UnknownFunction { name: String, span: Span },

    /// Call argument count differs from the declared parameter count.
    #[error("at {span}: '{name}' expects {expected} argument(s), got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
        span: Span,
    },

    /// Neither operand of a binary operator has a type the operator accepts.
    #[error("at {span}: operator '{op}' cannot be applied to '{left}' and '{right}'")]
    InvalidOperator {
        op: String,
        left: String,
        right: String,
        span: Span,
    },

    /// An operand has a type outside the operator's allowed set.
    #[error("at {span}: invalid operand type '{ty}' for operator '{op}'")]
    InvalidOperandType { op: String, ty: String, span: Span },

    /// Implicit coercion to or from void, or between incompatible shapes.
    #[error("at {span}: cannot convert '{from}' to '{to}'")]
    InvalidConversion { from: String, to: String, span: Span },

    /// `break` or `continue` with no enclosing loop.
    #[error("at {span}: '{keyword}' statement outside of a loop")]
    ControlOutsideLoop { keyword: &'static str, span: Span },

    /// `return;` inside a function that returns a value.
    #[error("at {span}: function '{function}' must return a value")]
    MissingReturnValue { function: String, span: Span },

    /// The same name declared twice in one scope.
    #[error("at {span}: redeclaration of '{name}' in the same scope")]
    Redeclaration { name: String, span: Span },

    /// A function defined twice, or defined over a library prototype.
    #[error("at {span}: function '{name}' is already defined")]
    DuplicateFunction { name: String, span: Span },

    /// A constant context (extent, constant or global initializer) used a
    /// value only known at run time.
    #[error("at {span}: {what} is not a compile-time constant")]
    NonConstantExpression { what: String, span: Span },

    /// An array extent that is negative, non-integral, or unspecified where
    /// a size is required.
    #[error("at {span}: invalid array dimension: {message}")]
    InvalidArrayDimension { message: String, span: Span },

    /// An initializer whose shape does not fit the declared type.
    #[error("at {span}: invalid initializer: {message}")]
    InvalidInitializer { message: String, span: Span },

    /// Indexing a scalar, or indexing with more subscripts than dimensions.
    #[error("at {span}: invalid index on '{name}': {message}")]
    InvalidIndex {
        name: String,
        message: String,
        span: Span,
    },

    /// A constructed function failed structural verification.
    #[error("internal error: function '{function}' failed verification: {message}")]
    InternalVerificationFault { function: String, message: String },

    /// Any other defect in the lowering logic.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl CompilationError {
    /// The span of the offending node, for user errors.
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UndeclaredIdentifier { span, .. }
            | Self::UnknownFunction { span, .. }
            | Self::ArityMismatch { span, .. }
            | Self::InvalidOperator { span, .. }
            | Self::InvalidOperandType { span, .. }
            | Self::InvalidConversion { span, .. }
            | Self::ControlOutsideLoop { span, .. }
            | Self::MissingReturnValue { span, .. }
            | Self::Redeclaration { span, .. }
            | Self::DuplicateFunction { span, .. }
            | Self::NonConstantExpression { span, .. }
            | Self::InvalidArrayDimension { span, .. }
            | Self::InvalidInitializer { span, .. }
            | Self::InvalidIndex { span, .. } => Some(*span),
            Self::InternalVerificationFault { .. } | Self::Internal { .. } => None,
        }
    }

    /// Whether this error signals a defect in the compiler rather than the
    /// input program.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::InternalVerificationFault { .. } | Self::Internal { .. }
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
