//! Runtime library prototypes for SysY programs.
//!
//! SysY programs call into a small C runtime for I/O and timing. This crate
//! supplies the prototypes of those functions so that calls to them lower
//! like calls to any other function:
//!
//! - **io** - `getint`, `getfloat`, `putarray`, ...
//! - **timing** - `_sysy_starttime`, `_sysy_stoptime`
//!
//! # Usage
//!
//! ```
//! use sysy_compiler::CompilerConfig;
//! use sysy_modules::StandardLibrary;
//!
//! let library = StandardLibrary::new();
//! let compiler = CompilerConfig::new().build(&library);
//! ```

pub mod io;
pub mod timing;

use sysy_compiler::PrototypeProvider;
use sysy_core::FunctionSignature;

/// The complete SysY runtime library.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardLibrary {
    _private: (),
}

impl StandardLibrary {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrototypeProvider for StandardLibrary {
    fn prototypes(&self) -> Vec<FunctionSignature> {
        let mut prototypes = io::prototypes();
        prototypes.extend(timing::prototypes());
        prototypes
    }
}
