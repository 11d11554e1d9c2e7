//! Bindings held by scopes

use std::fmt;

use super::HostType;
use crate::ast::{DeclKind, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    /// Type, class or type parameter declared in source
    UserType {
        node: NodeId,
        name: String,
        kind: DeclKind,
    },
    /// Concrete foreign or built-in type
    HostClass(HostType),
    /// Abstract foreign or built-in type
    HostInterface(HostType),
    /// Stands for the canonical name `target`
    Alias { target: String },
    /// Variable, constant, parameter, method, attribute or `this`
    Value { node: NodeId, name: String },
}

impl Symbol {
    pub fn user_type(node: NodeId, name: impl Into<String>, kind: DeclKind) -> Self {
        Self::UserType {
            node,
            name: name.into(),
            kind,
        }
    }

    /// Class or interface symbol, as the descriptor says
    pub fn host(ty: HostType) -> Self {
        if ty.is_interface {
            Self::HostInterface(ty)
        } else {
            Self::HostClass(ty)
        }
    }

    pub fn value(node: NodeId, name: impl Into<String>) -> Self {
        Self::Value {
            node,
            name: name.into(),
        }
    }

    pub fn alias(target: impl Into<String>) -> Self {
        Self::Alias {
            target: target.into(),
        }
    }

    pub fn is_alias(&self) -> bool {
        matches!(self, Self::Alias { .. })
    }

    pub fn alias_target(&self) -> Option<&str> {
        match self {
            Self::Alias { target } => Some(target),
            _ => None,
        }
    }

    /// Node that declared the symbol, for source declarations
    pub fn declaring_node(&self) -> Option<NodeId> {
        match self {
            Self::UserType { node, .. } | Self::Value { node, .. } => Some(*node),
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserType { name, kind, .. } => write!(f, "({kind} {name})"),
            Self::HostClass(ty) => write!(f, "(host class {})", ty.name),
            Self::HostInterface(ty) => write!(f, "(host interface {})", ty.name),
            Self::Alias { target } => write!(f, "(alias {target})"),
            Self::Value { name, node } => write!(f, "(value {name} {node})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_picks_variant_from_descriptor() {
        assert!(matches!(
            Symbol::host(HostType::class("lang.Object")),
            Symbol::HostClass(_)
        ));
        assert!(matches!(
            Symbol::host(HostType::interface("lang.Comparable")),
            Symbol::HostInterface(_)
        ));
    }

    #[test]
    fn test_display() {
        let node = NodeId::from_raw(3);
        assert_eq!(Symbol::user_type(node, "ns.T", DeclKind::Class).to_string(), "(class ns.T)");
        assert_eq!(Symbol::host(HostType::class("lang.None")).to_string(), "(host class lang.None)");
        assert_eq!(Symbol::alias("foo.Bar").to_string(), "(alias foo.Bar)");
        assert_eq!(Symbol::value(node, "count").to_string(), "(value count #3)");
    }

    #[test]
    fn test_accessors() {
        let node = NodeId::from_raw(3);
        assert_eq!(Symbol::alias("foo.Bar").alias_target(), Some("foo.Bar"));
        assert!(Symbol::alias("foo.Bar").is_alias());
        assert_eq!(Symbol::user_type(node, "A", DeclKind::TypeParameter).declaring_node(), Some(node));
        assert_eq!(Symbol::value(node, "this").declaring_node(), Some(node));
        assert_eq!(Symbol::host(HostType::class("x.Y")).alias_target(), None);
        assert_eq!(Symbol::alias("x.Y").declaring_node(), None);
    }
}
