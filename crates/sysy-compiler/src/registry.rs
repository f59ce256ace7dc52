//! Externally defined functions.
//!
//! A [`PrototypeProvider`] supplies the signatures of functions that the
//! compile unit may call without defining, such as a runtime library. They
//! are declared in the module before any item is lowered.

use sysy_core::{CompilationError, FunctionSignature, Span};

use crate::context::CompilationContext;
use crate::conversion::{representation, scalar_type};
use crate::ir::{Function, Linkage, Param};

type Result<T> = std::result::Result<T, CompilationError>;

/// Source of external function prototypes.
pub trait PrototypeProvider {
    fn prototypes(&self) -> Vec<FunctionSignature>;
}

/// No external functions.
impl PrototypeProvider for () {
    fn prototypes(&self) -> Vec<FunctionSignature> {
        Vec::new()
    }
}

impl PrototypeProvider for Vec<FunctionSignature> {
    fn prototypes(&self) -> Vec<FunctionSignature> {
        self.clone()
    }
}

/// Declare every prototype of `provider` as an external function.
pub fn register_prototypes(
    ctx: &mut CompilationContext,
    provider: &dyn PrototypeProvider,
) -> Result<()> {
    for signature in provider.prototypes() {
        if ctx.lookup_function(&signature.name).is_some() {
            return Err(CompilationError::DuplicateFunction {
                name: signature.name,
                span: Span::default(),
            });
        }
        let params = signature
            .params
            .iter()
            .enumerate()
            .map(|(i, ty)| Param {
                name: format!("p{i}"),
                ty: representation(ty),
            })
            .collect();
        let id = ctx.module_mut().add_function(Function::new(
            signature.name.clone(),
            scalar_type(signature.return_type),
            params,
            Linkage::External,
        ));
        log::trace!("declared external function '{}'", signature.name);
        ctx.register_function(id, signature);
    }
    Ok(())
}
