//! Operand values and entity handles.

use super::IrType;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl $name {
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

handle!(
    /// An instruction within its function.
    InstId
);
handle!(
    /// A basic block within its function.
    BlockId
);
handle!(
    /// A function within its module.
    FuncId
);
handle!(
    /// A global variable within its module.
    GlobalId
);

/// What an operand refers to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueKind {
    ConstInt(i32),
    ConstFloat(f32),
    ConstBool(bool),
    Undef,
    /// `zeroinitializer` of an aggregate type
    Zero,
    /// The result of an instruction
    Inst(InstId),
    /// An incoming function argument, by position
    Arg(u32),
    /// The address of a global
    Global(GlobalId),
    /// No value; the result of a void call or a store
    Void,
}

/// An operand: a [`ValueKind`] tagged with its IR type.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub kind: ValueKind,
    pub ty: IrType,
}

impl Value {
    pub fn new(kind: ValueKind, ty: IrType) -> Self {
        Self { kind, ty }
    }

    pub fn int(value: i32) -> Self {
        Self::new(ValueKind::ConstInt(value), IrType::I32)
    }

    pub fn float(value: f32) -> Self {
        Self::new(ValueKind::ConstFloat(value), IrType::F32)
    }

    pub fn bool(value: bool) -> Self {
        Self::new(ValueKind::ConstBool(value), IrType::I1)
    }

    pub fn undef(ty: IrType) -> Self {
        Self::new(ValueKind::Undef, ty)
    }

    pub fn zero(ty: IrType) -> Self {
        Self::new(ValueKind::Zero, ty)
    }

    pub fn void() -> Self {
        Self::new(ValueKind::Void, IrType::Void)
    }

    pub fn inst(id: InstId, ty: IrType) -> Self {
        Self::new(ValueKind::Inst(id), ty)
    }

    pub fn arg(index: u32, ty: IrType) -> Self {
        Self::new(ValueKind::Arg(index), ty)
    }

    /// The address of a global whose value type is `value_type`.
    pub fn global(id: GlobalId, value_type: IrType) -> Self {
        Self::new(ValueKind::Global(id), value_type.ptr_to())
    }

    pub fn is_void(&self) -> bool {
        matches!(self.kind, ValueKind::Void)
    }

    pub fn as_int(&self) -> Option<i32> {
        match self.kind {
            ValueKind::ConstInt(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self.kind {
            ValueKind::ConstFloat(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.kind {
            ValueKind::ConstBool(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_inst(&self) -> Option<InstId> {
        match self.kind {
            ValueKind::Inst(id) => Some(id),
            _ => None,
        }
    }
}
