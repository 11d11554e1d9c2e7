//! Values, statements and references

use super::{Mode, Parameter, TypeParameter, TypeSpec};
use crate::context::Context;

/// Use of a name in value position
#[derive(Debug, Clone)]
pub struct Reference {
    pub context: Context,
    pub name: String,
    /// Set where the target may be declared later in the same body
    pub allow_forward_reference: bool,
}

#[derive(Debug, Clone)]
pub struct Value {
    pub context: Context,
    pub kind: ValueKind,
}

#[derive(Debug, Clone)]
pub enum ValueKind {
    String(String),
    Number(String),
    Boolean(bool),
    None,
    Identifier(Reference),
    /// `var x: T = value` / `val x: T = value`
    NewAssignment {
        mode: Mode,
        name: String,
        ty: TypeSpec,
        value: Box<Value>,
    },
    /// `x = value`
    DirectAssignment {
        reference: Reference,
        value: Box<Value>,
    },
    /// `indirect.x = value`
    IndirectAssignment {
        indirect: Box<Value>,
        reference: Reference,
        value: Box<Value>,
    },
    MethodCall {
        method: Reference,
        type_arguments: Vec<TypeSpec>,
        arguments: Vec<Value>,
    },
    /// `outer.inner`
    Nested {
        outer: Box<Value>,
        inner: Box<Value>,
    },
    Function(FunctionValue),
}

/// Function literal
#[derive(Debug, Clone)]
pub struct FunctionValue {
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<Parameter>,
    pub return_type: Box<TypeSpec>,
    pub statements: Vec<Statement>,
}

impl Value {
    pub fn new(context: Context, kind: ValueKind) -> Self {
        Self { context, kind }
    }

    pub fn as_function(&self) -> Option<&FunctionValue> {
        match &self.kind {
            ValueKind::Function(function) => Some(function),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Statement {
    pub context: Context,
    pub value: Value,
    /// Whether this is the last statement of its body
    pub last: bool,
}
