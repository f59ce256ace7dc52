//! The module under construction: globals plus functions.

use rustc_hash::{FxHashMap, FxHashSet};

use super::{FuncId, Function, GlobalId, IrType, Linkage, Value};

/// Constant initial contents of a global.
#[derive(Debug, Clone, PartialEq)]
pub enum Initializer {
    /// All-zero contents of any type
    Zero,
    Int(i32),
    Float(f32),
    /// One initializer per array element
    Array(Vec<Initializer>),
}

impl Initializer {
    pub fn is_zero(&self) -> bool {
        match self {
            Initializer::Zero => true,
            Initializer::Int(v) => *v == 0,
            Initializer::Float(v) => v.to_bits() == 0,
            Initializer::Array(elements) => elements.iter().all(Initializer::is_zero),
        }
    }
}

/// A global variable or constant.
#[derive(Debug, Clone, PartialEq)]
pub struct Global {
    pub name: String,
    pub value_type: IrType,
    pub constant: bool,
    pub linkage: Linkage,
    pub initializer: Initializer,
}

/// A compiled IR module.
#[derive(Debug, Clone)]
pub struct Module {
    pub name: String,
    globals: Vec<Global>,
    functions: Vec<Function>,
    function_names: FxHashMap<String, FuncId>,
    global_names: FxHashSet<String>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            globals: Vec::new(),
            functions: Vec::new(),
            function_names: FxHashMap::default(),
            global_names: FxHashSet::default(),
        }
    }

    // ==========================================================================
    // Globals
    // ==========================================================================

    /// Add a global. Its name must be unused; see [`Module::unique_global_name`].
    pub fn add_global(&mut self, global: Global) -> GlobalId {
        let id = GlobalId(self.globals.len() as u32);
        self.global_names.insert(global.name.clone());
        self.globals.push(global);
        id
    }

    /// `base`, or `base.N` for the first free `N` when `base` is taken.
    pub fn unique_global_name(&self, base: &str) -> String {
        if !self.global_names.contains(base) {
            return base.to_string();
        }
        (1u32..)
            .map(|n| format!("{base}.{n}"))
            .find(|candidate| !self.global_names.contains(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    pub fn global(&self, id: GlobalId) -> &Global {
        &self.globals[id.index()]
    }

    pub fn globals(&self) -> &[Global] {
        &self.globals
    }

    pub fn get_global(&self, name: &str) -> Option<GlobalId> {
        self.globals
            .iter()
            .position(|g| g.name == name)
            .map(|i| GlobalId(i as u32))
    }

    /// The address of a global.
    pub fn global_value(&self, id: GlobalId) -> Value {
        Value::global(id, self.global(id).value_type.clone())
    }

    // ==========================================================================
    // Functions
    // ==========================================================================

    /// Add a function to the flat function namespace. A later function with
    /// the same name replaces the earlier name binding.
    pub fn add_function(&mut self, function: Function) -> FuncId {
        let id = FuncId(self.functions.len() as u32);
        self.function_names.insert(function.name.clone(), id);
        self.functions.push(function);
        id
    }

    pub fn function(&self, id: FuncId) -> &Function {
        &self.functions[id.index()]
    }

    pub fn function_mut(&mut self, id: FuncId) -> &mut Function {
        &mut self.functions[id.index()]
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn get_function(&self, name: &str) -> Option<FuncId> {
        self.function_names.get(name).copied()
    }

    pub fn function_by_name(&self, name: &str) -> Option<&Function> {
        self.get_function(name).map(|id| self.function(id))
    }
}
