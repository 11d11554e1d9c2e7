//! Compilation units, declarations and their members

use std::fmt;

use super::{Statement, TypeSpec, Value};
use crate::context::Context;

/// Declaration visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    Public,
    #[default]
    Namespace,
    Private,
}

/// Binding mode of attributes and local assignments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Var,
    Val,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Var => f.write_str("var"),
            Mode::Val => f.write_str("val"),
        }
    }
}

/// Which construct introduced a user-defined type name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Type,
    Class,
    TypeParameter,
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclKind::Type => f.write_str("type"),
            DeclKind::Class => f.write_str("class"),
            DeclKind::TypeParameter => f.write_str("type parameter"),
        }
    }
}

/// One compilation unit
#[derive(Debug, Clone)]
pub struct Root {
    pub context: Context,
    pub namespace: String,
    pub uses: Vec<Use>,
    pub top_level: TopLevel,
}

/// The single declaration a unit exports
#[derive(Debug, Clone)]
pub enum TopLevel {
    Type(TypeDecl),
    Class(ClassDecl),
}

impl TopLevel {
    pub fn name(&self) -> &str {
        match self {
            TopLevel::Type(decl) => &decl.name,
            TopLevel::Class(decl) => &decl.name,
        }
    }

    pub fn kind(&self) -> DeclKind {
        match self {
            TopLevel::Type(_) => DeclKind::Type,
            TopLevel::Class(_) => DeclKind::Class,
        }
    }

    pub fn type_parameters(&self) -> &[TypeParameter] {
        match self {
            TopLevel::Type(decl) => &decl.type_parameters,
            TopLevel::Class(decl) => &decl.type_parameters,
        }
    }
}

impl From<TypeDecl> for TopLevel {
    fn from(decl: TypeDecl) -> Self {
        TopLevel::Type(decl)
    }
}

impl From<ClassDecl> for TopLevel {
    fn from(decl: ClassDecl) -> Self {
        TopLevel::Class(decl)
    }
}

/// Import of a foreign or sibling name, optionally aliased
#[derive(Debug, Clone)]
pub struct Use {
    pub context: Context,
    pub from: String,
    pub to: String,
}

impl Use {
    /// Local name bound when no alias is given: the last segment of `from`
    pub fn default_alias(from: &str) -> &str {
        from.rsplit('.').next().unwrap_or(from)
    }

    pub fn is_aliased(&self) -> bool {
        self.to != Self::default_alias(&self.from)
    }
}

impl fmt::Display for Use {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "use {} : {}", self.from, self.to)
    }
}

/// Interface-like type declaration
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub context: Context,
    pub visibility: Visibility,
    pub name: String,
    pub type_parameters: Vec<TypeParameter>,
    pub super_type: TypeSpec,
    pub methods: Vec<MethodSignature>,
}

impl TypeDecl {
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_type_parameters(mut self, type_parameters: Vec<TypeParameter>) -> Self {
        self.type_parameters = type_parameters;
        self
    }

    pub fn with_methods(mut self, methods: Vec<MethodSignature>) -> Self {
        self.methods = methods;
        self
    }
}

/// Class declaration with method bodies and attributes
#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub context: Context,
    pub visibility: Visibility,
    pub name: String,
    pub type_parameters: Vec<TypeParameter>,
    pub super_type: TypeSpec,
    pub methods: Vec<Method>,
    pub attributes: Vec<Attribute>,
}

impl ClassDecl {
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_type_parameters(mut self, type_parameters: Vec<TypeParameter>) -> Self {
        self.type_parameters = type_parameters;
        self
    }

    pub fn with_methods(mut self, methods: Vec<Method>) -> Self {
        self.methods = methods;
        self
    }

    pub fn with_attributes(mut self, attributes: Vec<Attribute>) -> Self {
        self.attributes = attributes;
        self
    }
}

#[derive(Debug, Clone)]
pub struct TypeParameter {
    pub context: Context,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Parameter {
    pub context: Context,
    pub name: String,
    pub ty: TypeSpec,
}

#[derive(Debug, Clone)]
pub struct MethodSignature {
    pub context: Context,
    pub visibility: Visibility,
    pub name: String,
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<Parameter>,
    pub return_type: TypeSpec,
}

impl MethodSignature {
    /// Overload-distinguishing key: `name(paramType1,paramType2)`
    pub fn key(&self) -> String {
        let parameters: Vec<String> = self
            .parameters
            .iter()
            .map(|parameter| parameter.ty.to_string())
            .collect();
        format!("{}({})", self.name, parameters.join(","))
    }

    /// Key a call site with `arity` arguments looks up: `name(_,_)`
    pub fn call_key_for(name: &str, arity: usize) -> String {
        format!("{name}({})", vec!["_"; arity].join(","))
    }

    pub fn call_key(&self) -> String {
        Self::call_key_for(&self.name, self.parameters.len())
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_type_parameters(mut self, type_parameters: Vec<TypeParameter>) -> Self {
        self.type_parameters = type_parameters;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Method {
    pub context: Context,
    pub signature: MethodSignature,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone)]
pub struct Attribute {
    pub context: Context,
    pub mode: Mode,
    pub name: String,
    pub ty: TypeSpec,
    pub value: Value,
}
