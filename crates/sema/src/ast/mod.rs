//! Syntax tree consumed by the semantic passes
//!
//! Trees arrive fully built and validated; [`AstBuilder`] is the
//! construction API for whatever produces them.

mod builder;
mod decl;
mod types;
mod value;

use std::sync::atomic::{AtomicU64, Ordering};

pub use builder::AstBuilder;
pub use decl::{
    Attribute, ClassDecl, DeclKind, Method, MethodSignature, Mode, Parameter, Root, TopLevel,
    TypeDecl, TypeParameter, Use, Visibility,
};
pub use types::{TypeSpec, TypeSpecKind};
pub use value::{FunctionValue, Reference, Statement, Value, ValueKind};

pub use crate::common::NodeId;
use crate::common::Span;
use crate::context::Context;

/// Source of node ids for one compile session.
///
/// Every node of a session, including those synthesized by later passes,
/// must draw from the same generator.
#[derive(Debug, Default)]
pub struct NodeIdGenerator {
    last: AtomicU64,
}

impl NodeIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> NodeId {
        NodeId::from_raw(self.last.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// A fresh context for a new node
    pub fn context(&self) -> Context {
        Context::new(self.next())
    }
}

/// Behaviour shared by every node kind
pub trait Node {
    fn context(&self) -> &Context;

    fn context_mut(&mut self) -> &mut Context;

    fn id(&self) -> NodeId {
        self.context().node()
    }

    fn span(&self) -> Option<Span> {
        self.context().get::<Span>().copied()
    }

    /// Attach a source span
    fn at(mut self, span: Span) -> Self
    where
        Self: Sized,
    {
        self.context_mut().put(span);
        self
    }
}

macro_rules! impl_node {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Node for $ty {
                fn context(&self) -> &Context {
                    &self.context
                }

                fn context_mut(&mut self) -> &mut Context {
                    &mut self.context
                }
            }
        )*
    };
}

impl_node!(
    Root,
    Use,
    TypeDecl,
    ClassDecl,
    TypeParameter,
    Parameter,
    MethodSignature,
    Method,
    Attribute,
    TypeSpec,
    Value,
    Statement,
    Reference,
);

impl Node for TopLevel {
    fn context(&self) -> &Context {
        match self {
            TopLevel::Type(decl) => &decl.context,
            TopLevel::Class(decl) => &decl.context,
        }
    }

    fn context_mut(&mut self) -> &mut Context {
        match self {
            TopLevel::Type(decl) => &mut decl.context,
            TopLevel::Class(decl) => &mut decl.context,
        }
    }
}
