//! Node construction with ids drawn from a shared generator

use super::{
    Attribute, ClassDecl, FunctionValue, Method, MethodSignature, Mode, NodeIdGenerator,
    Parameter, Reference, Root, Statement, TopLevel, TypeDecl, TypeParameter, TypeSpec,
    TypeSpecKind, Use, Value, ValueKind, Visibility,
};

/// Builds nodes whose ids all come from one [`NodeIdGenerator`]
#[derive(Debug, Clone, Copy)]
pub struct AstBuilder<'a> {
    ids: &'a NodeIdGenerator,
}

impl<'a> AstBuilder<'a> {
    pub fn new(ids: &'a NodeIdGenerator) -> Self {
        Self { ids }
    }

    pub fn ids(&self) -> &'a NodeIdGenerator {
        self.ids
    }

    // Declarations

    pub fn root(
        &self,
        namespace: impl Into<String>,
        uses: Vec<Use>,
        top_level: impl Into<TopLevel>,
    ) -> Root {
        Root {
            context: self.ids.context(),
            namespace: namespace.into(),
            uses,
            top_level: top_level.into(),
        }
    }

    /// `use a.b.C`, binding `C`
    pub fn use_(&self, from: impl Into<String>) -> Use {
        let from = from.into();
        let to = Use::default_alias(&from).to_string();
        Use {
            context: self.ids.context(),
            from,
            to,
        }
    }

    /// `use a.b.C : D`, binding `D`
    pub fn use_as(&self, from: impl Into<String>, to: impl Into<String>) -> Use {
        Use {
            context: self.ids.context(),
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn type_decl(&self, name: impl Into<String>, super_type: TypeSpec) -> TypeDecl {
        TypeDecl {
            context: self.ids.context(),
            visibility: Visibility::default(),
            name: name.into(),
            type_parameters: Vec::new(),
            super_type,
            methods: Vec::new(),
        }
    }

    pub fn class_decl(&self, name: impl Into<String>, super_type: TypeSpec) -> ClassDecl {
        ClassDecl {
            context: self.ids.context(),
            visibility: Visibility::default(),
            name: name.into(),
            type_parameters: Vec::new(),
            super_type,
            methods: Vec::new(),
            attributes: Vec::new(),
        }
    }

    pub fn type_parameter(&self, name: impl Into<String>) -> TypeParameter {
        TypeParameter {
            context: self.ids.context(),
            name: name.into(),
        }
    }

    pub fn parameter(&self, name: impl Into<String>, ty: TypeSpec) -> Parameter {
        Parameter {
            context: self.ids.context(),
            name: name.into(),
            ty,
        }
    }

    pub fn signature(
        &self,
        name: impl Into<String>,
        parameters: Vec<Parameter>,
        return_type: TypeSpec,
    ) -> MethodSignature {
        MethodSignature {
            context: self.ids.context(),
            visibility: Visibility::Public,
            name: name.into(),
            type_parameters: Vec::new(),
            parameters,
            return_type,
        }
    }

    pub fn method(&self, signature: MethodSignature, statements: Vec<Statement>) -> Method {
        Method {
            context: self.ids.context(),
            signature,
            statements,
        }
    }

    pub fn attribute(
        &self,
        mode: Mode,
        name: impl Into<String>,
        ty: TypeSpec,
        value: Value,
    ) -> Attribute {
        Attribute {
            context: self.ids.context(),
            mode,
            name: name.into(),
            ty,
            value,
        }
    }

    // Types

    fn type_spec(&self, kind: TypeSpecKind) -> TypeSpec {
        TypeSpec::new(self.ids.context(), kind)
    }

    pub fn simple(&self, name: impl Into<String>) -> TypeSpec {
        self.simple_with(name, Vec::new())
    }

    pub fn simple_with(&self, name: impl Into<String>, arguments: Vec<TypeSpec>) -> TypeSpec {
        self.type_spec(TypeSpecKind::Simple {
            name: name.into(),
            arguments,
        })
    }

    pub fn union(&self, members: Vec<TypeSpec>) -> TypeSpec {
        self.type_spec(TypeSpecKind::Union(members))
    }

    pub fn intersection(&self, members: Vec<TypeSpec>) -> TypeSpec {
        self.type_spec(TypeSpecKind::Intersection(members))
    }

    pub fn function_type(&self, arguments: Vec<TypeSpec>, return_type: TypeSpec) -> TypeSpec {
        self.type_spec(TypeSpecKind::Function {
            arguments,
            return_type: Box::new(return_type),
        })
    }

    pub fn inferred(&self) -> TypeSpec {
        self.type_spec(TypeSpecKind::Inferred)
    }

    // Values

    pub fn reference(&self, name: impl Into<String>) -> Reference {
        Reference {
            context: self.ids.context(),
            name: name.into(),
            allow_forward_reference: false,
        }
    }

    /// Reference that may name something declared later in the same body
    pub fn forward_reference(&self, name: impl Into<String>) -> Reference {
        Reference {
            allow_forward_reference: true,
            ..self.reference(name)
        }
    }

    fn value(&self, kind: ValueKind) -> Value {
        Value::new(self.ids.context(), kind)
    }

    pub fn string(&self, value: impl Into<String>) -> Value {
        self.value(ValueKind::String(value.into()))
    }

    pub fn number(&self, value: impl Into<String>) -> Value {
        self.value(ValueKind::Number(value.into()))
    }

    pub fn boolean(&self, value: bool) -> Value {
        self.value(ValueKind::Boolean(value))
    }

    pub fn none(&self) -> Value {
        self.value(ValueKind::None)
    }

    pub fn identifier(&self, name: impl Into<String>) -> Value {
        let reference = self.reference(name);
        self.value(ValueKind::Identifier(reference))
    }

    pub fn new_assignment(
        &self,
        mode: Mode,
        name: impl Into<String>,
        ty: TypeSpec,
        value: Value,
    ) -> Value {
        self.value(ValueKind::NewAssignment {
            mode,
            name: name.into(),
            ty,
            value: Box::new(value),
        })
    }

    pub fn direct_assignment(&self, name: impl Into<String>, value: Value) -> Value {
        let reference = self.reference(name);
        self.value(ValueKind::DirectAssignment {
            reference,
            value: Box::new(value),
        })
    }

    pub fn indirect_assignment(
        &self,
        indirect: Value,
        name: impl Into<String>,
        value: Value,
    ) -> Value {
        let reference = self.reference(name);
        self.value(ValueKind::IndirectAssignment {
            indirect: Box::new(indirect),
            reference,
            value: Box::new(value),
        })
    }

    /// Call of a method, which may be declared after the calling body
    pub fn method_call(
        &self,
        name: impl Into<String>,
        type_arguments: Vec<TypeSpec>,
        arguments: Vec<Value>,
    ) -> Value {
        let method = self.forward_reference(name);
        self.value(ValueKind::MethodCall {
            method,
            type_arguments,
            arguments,
        })
    }

    pub fn nested(&self, outer: Value, inner: Value) -> Value {
        self.value(ValueKind::Nested {
            outer: Box::new(outer),
            inner: Box::new(inner),
        })
    }

    pub fn function(
        &self,
        type_parameters: Vec<TypeParameter>,
        parameters: Vec<Parameter>,
        return_type: TypeSpec,
        statements: Vec<Statement>,
    ) -> Value {
        self.value(ValueKind::Function(FunctionValue {
            type_parameters,
            parameters,
            return_type: Box::new(return_type),
            statements,
        }))
    }

    pub fn statement(&self, value: Value, last: bool) -> Statement {
        Statement {
            context: self.ids.context(),
            value,
            last,
        }
    }
}
