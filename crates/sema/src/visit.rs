//! Traversal over the closed set of node kinds
//!
//! [`NodeRef`] borrows any node of a tree. [`NodeRef::children`] is the one
//! place that knows the structural children of each kind; every generic
//! traversal in the crate is built on it.

use std::fmt;

use crate::ast::{
    Attribute, ClassDecl, Method, MethodSignature, NodeId, Parameter, Reference, Root,
    Statement, TopLevel, TypeDecl, TypeParameter, TypeSpec, TypeSpecKind, Use, Value, ValueKind,
};
use crate::context::Context;

/// Kind tag of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Use,
    Type,
    Class,
    TypeParameter,
    Parameter,
    MethodSignature,
    Method,
    Attribute,
    Statement,
    Reference,
    SimpleType,
    UnionType,
    IntersectionType,
    FunctionType,
    InferredType,
    StringValue,
    NumberValue,
    BooleanValue,
    NoneValue,
    IdentifierValue,
    NewAssignmentValue,
    DirectAssignmentValue,
    IndirectAssignmentValue,
    MethodCallValue,
    NestedValue,
    FunctionValue,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Root => "Root",
            NodeKind::Use => "Use",
            NodeKind::Type => "Type",
            NodeKind::Class => "Class",
            NodeKind::TypeParameter => "TypeParameter",
            NodeKind::Parameter => "Parameter",
            NodeKind::MethodSignature => "MethodSignature",
            NodeKind::Method => "Method",
            NodeKind::Attribute => "Attribute",
            NodeKind::Statement => "Statement",
            NodeKind::Reference => "Reference",
            NodeKind::SimpleType => "SimpleType",
            NodeKind::UnionType => "UnionType",
            NodeKind::IntersectionType => "IntersectionType",
            NodeKind::FunctionType => "FunctionType",
            NodeKind::InferredType => "InferredType",
            NodeKind::StringValue => "StringValue",
            NodeKind::NumberValue => "NumberValue",
            NodeKind::BooleanValue => "BooleanValue",
            NodeKind::NoneValue => "NoneValue",
            NodeKind::IdentifierValue => "IdentifierValue",
            NodeKind::NewAssignmentValue => "NewAssignmentValue",
            NodeKind::DirectAssignmentValue => "DirectAssignmentValue",
            NodeKind::IndirectAssignmentValue => "IndirectAssignmentValue",
            NodeKind::MethodCallValue => "MethodCallValue",
            NodeKind::NestedValue => "NestedValue",
            NodeKind::FunctionValue => "FunctionValue",
        }
    }

    pub fn is_type_spec(self) -> bool {
        matches!(
            self,
            NodeKind::SimpleType
                | NodeKind::UnionType
                | NodeKind::IntersectionType
                | NodeKind::FunctionType
                | NodeKind::InferredType
        )
    }

    pub fn is_value(self) -> bool {
        matches!(
            self,
            NodeKind::StringValue
                | NodeKind::NumberValue
                | NodeKind::BooleanValue
                | NodeKind::NoneValue
                | NodeKind::IdentifierValue
                | NodeKind::NewAssignmentValue
                | NodeKind::DirectAssignmentValue
                | NodeKind::IndirectAssignmentValue
                | NodeKind::MethodCallValue
                | NodeKind::NestedValue
                | NodeKind::FunctionValue
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Borrowed node of any kind
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Root(&'a Root),
    Use(&'a Use),
    Type(&'a TypeDecl),
    Class(&'a ClassDecl),
    TypeParameter(&'a TypeParameter),
    Parameter(&'a Parameter),
    MethodSignature(&'a MethodSignature),
    Method(&'a Method),
    Attribute(&'a Attribute),
    Statement(&'a Statement),
    Reference(&'a Reference),
    TypeSpec(&'a TypeSpec),
    Value(&'a Value),
}

impl<'a> NodeRef<'a> {
    pub fn context(self) -> &'a Context {
        match self {
            NodeRef::Root(node) => &node.context,
            NodeRef::Use(node) => &node.context,
            NodeRef::Type(node) => &node.context,
            NodeRef::Class(node) => &node.context,
            NodeRef::TypeParameter(node) => &node.context,
            NodeRef::Parameter(node) => &node.context,
            NodeRef::MethodSignature(node) => &node.context,
            NodeRef::Method(node) => &node.context,
            NodeRef::Attribute(node) => &node.context,
            NodeRef::Statement(node) => &node.context,
            NodeRef::Reference(node) => &node.context,
            NodeRef::TypeSpec(node) => &node.context,
            NodeRef::Value(node) => &node.context,
        }
    }

    pub fn id(self) -> NodeId {
        self.context().node()
    }

    pub fn kind(self) -> NodeKind {
        match self {
            NodeRef::Root(_) => NodeKind::Root,
            NodeRef::Use(_) => NodeKind::Use,
            NodeRef::Type(_) => NodeKind::Type,
            NodeRef::Class(_) => NodeKind::Class,
            NodeRef::TypeParameter(_) => NodeKind::TypeParameter,
            NodeRef::Parameter(_) => NodeKind::Parameter,
            NodeRef::MethodSignature(_) => NodeKind::MethodSignature,
            NodeRef::Method(_) => NodeKind::Method,
            NodeRef::Attribute(_) => NodeKind::Attribute,
            NodeRef::Statement(_) => NodeKind::Statement,
            NodeRef::Reference(_) => NodeKind::Reference,
            NodeRef::TypeSpec(spec) => match &spec.kind {
                TypeSpecKind::Simple { .. } => NodeKind::SimpleType,
                TypeSpecKind::Union(_) => NodeKind::UnionType,
                TypeSpecKind::Intersection(_) => NodeKind::IntersectionType,
                TypeSpecKind::Function { .. } => NodeKind::FunctionType,
                TypeSpecKind::Inferred => NodeKind::InferredType,
            },
            NodeRef::Value(value) => match &value.kind {
                ValueKind::String(_) => NodeKind::StringValue,
                ValueKind::Number(_) => NodeKind::NumberValue,
                ValueKind::Boolean(_) => NodeKind::BooleanValue,
                ValueKind::None => NodeKind::NoneValue,
                ValueKind::Identifier(_) => NodeKind::IdentifierValue,
                ValueKind::NewAssignment { .. } => NodeKind::NewAssignmentValue,
                ValueKind::DirectAssignment { .. } => NodeKind::DirectAssignmentValue,
                ValueKind::IndirectAssignment { .. } => NodeKind::IndirectAssignmentValue,
                ValueKind::MethodCall { .. } => NodeKind::MethodCallValue,
                ValueKind::Nested { .. } => NodeKind::NestedValue,
                ValueKind::Function(_) => NodeKind::FunctionValue,
            },
        }
    }

    /// Structural children, in declaration order. Every edge of the tree is
    /// listed exactly once.
    pub fn children(self) -> Vec<NodeRef<'a>> {
        let mut children = Vec::new();
        match self {
            NodeRef::Root(root) => {
                children.extend(root.uses.iter().map(NodeRef::Use));
                children.push(NodeRef::from(&root.top_level));
            }
            NodeRef::Use(_) | NodeRef::TypeParameter(_) | NodeRef::Reference(_) => {}
            NodeRef::Type(decl) => {
                children.extend(decl.type_parameters.iter().map(NodeRef::TypeParameter));
                children.push(NodeRef::TypeSpec(&decl.super_type));
                children.extend(decl.methods.iter().map(NodeRef::MethodSignature));
            }
            NodeRef::Class(decl) => {
                children.extend(decl.type_parameters.iter().map(NodeRef::TypeParameter));
                children.push(NodeRef::TypeSpec(&decl.super_type));
                children.extend(decl.methods.iter().map(NodeRef::Method));
                children.extend(decl.attributes.iter().map(NodeRef::Attribute));
            }
            NodeRef::Parameter(parameter) => children.push(NodeRef::TypeSpec(&parameter.ty)),
            NodeRef::MethodSignature(signature) => {
                children.extend(signature.type_parameters.iter().map(NodeRef::TypeParameter));
                children.extend(signature.parameters.iter().map(NodeRef::Parameter));
                children.push(NodeRef::TypeSpec(&signature.return_type));
            }
            NodeRef::Method(method) => {
                children.push(NodeRef::MethodSignature(&method.signature));
                children.extend(method.statements.iter().map(NodeRef::Statement));
            }
            NodeRef::Attribute(attribute) => {
                children.push(NodeRef::TypeSpec(&attribute.ty));
                children.push(NodeRef::Value(&attribute.value));
            }
            NodeRef::Statement(statement) => children.push(NodeRef::Value(&statement.value)),
            NodeRef::TypeSpec(spec) => match &spec.kind {
                TypeSpecKind::Simple { arguments, .. } => {
                    children.extend(arguments.iter().map(NodeRef::TypeSpec));
                }
                TypeSpecKind::Union(members) | TypeSpecKind::Intersection(members) => {
                    children.extend(members.iter().map(NodeRef::TypeSpec));
                }
                TypeSpecKind::Function {
                    arguments,
                    return_type,
                } => {
                    children.extend(arguments.iter().map(NodeRef::TypeSpec));
                    children.push(NodeRef::TypeSpec(return_type));
                }
                TypeSpecKind::Inferred => {}
            },
            NodeRef::Value(value) => match &value.kind {
                ValueKind::String(_)
                | ValueKind::Number(_)
                | ValueKind::Boolean(_)
                | ValueKind::None => {}
                ValueKind::Identifier(reference) => children.push(NodeRef::Reference(reference)),
                ValueKind::NewAssignment { ty, value, .. } => {
                    children.push(NodeRef::TypeSpec(ty));
                    children.push(NodeRef::Value(value));
                }
                ValueKind::DirectAssignment { reference, value } => {
                    children.push(NodeRef::Reference(reference));
                    children.push(NodeRef::Value(value));
                }
                ValueKind::IndirectAssignment {
                    indirect,
                    reference,
                    value,
                } => {
                    children.push(NodeRef::Reference(reference));
                    children.push(NodeRef::Value(indirect));
                    children.push(NodeRef::Value(value));
                }
                ValueKind::MethodCall {
                    method,
                    type_arguments,
                    arguments,
                } => {
                    children.push(NodeRef::Reference(method));
                    children.extend(type_arguments.iter().map(NodeRef::TypeSpec));
                    children.extend(arguments.iter().map(NodeRef::Value));
                }
                ValueKind::Nested { outer, inner } => {
                    children.push(NodeRef::Value(outer));
                    children.push(NodeRef::Value(inner));
                }
                ValueKind::Function(function) => {
                    children.extend(function.type_parameters.iter().map(NodeRef::TypeParameter));
                    children.extend(function.parameters.iter().map(NodeRef::Parameter));
                    children.push(NodeRef::TypeSpec(&function.return_type));
                    children.extend(function.statements.iter().map(NodeRef::Statement));
                }
            },
        }
        children
    }
}

impl<'a> From<&'a TopLevel> for NodeRef<'a> {
    fn from(top_level: &'a TopLevel) -> Self {
        match top_level {
            TopLevel::Type(decl) => NodeRef::Type(decl),
            TopLevel::Class(decl) => NodeRef::Class(decl),
        }
    }
}

impl<'a> From<&'a Root> for NodeRef<'a> {
    fn from(root: &'a Root) -> Self {
        NodeRef::Root(root)
    }
}

impl<'a> From<&'a TypeSpec> for NodeRef<'a> {
    fn from(spec: &'a TypeSpec) -> Self {
        NodeRef::TypeSpec(spec)
    }
}

impl<'a> From<&'a Value> for NodeRef<'a> {
    fn from(value: &'a Value) -> Self {
        NodeRef::Value(value)
    }
}

/// Pre-order walk
pub fn walk<'a, F>(node: NodeRef<'a>, f: &mut F)
where
    F: FnMut(NodeRef<'a>),
{
    f(node);
    for child in node.children() {
        walk(child, f);
    }
}

/// Pre-order list accumulation
pub fn flat_map<'a, T, F>(node: NodeRef<'a>, mut f: F) -> Vec<T>
where
    F: FnMut(NodeRef<'a>) -> Vec<T>,
{
    let mut out = Vec::new();
    walk(node, &mut |n| out.extend(f(n)));
    out
}

/// Every node, in pre-order, for which `predicate` holds
pub fn nodes_matching<'a, P>(node: NodeRef<'a>, mut predicate: P) -> Vec<NodeRef<'a>>
where
    P: FnMut(NodeRef<'a>) -> bool,
{
    flat_map(node, |n| if predicate(n) { vec![n] } else { Vec::new() })
}
