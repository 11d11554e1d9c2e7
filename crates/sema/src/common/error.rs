//! Structural errors
//!
//! These are never shown to users as diagnostics: they mean a pass was run
//! before the pass it depends on, or on a tree that was not fully built.

use thiserror::Error;

use super::{NodeId, ScopeId};

/// Fatal error aborting a whole analysis run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SemaError {
    #[error("no {key} found in context of node {node}")]
    MissingContext { node: NodeId, key: String },

    #[error("context key cannot be empty")]
    InvalidContextKey,

    #[error("no parent found for node {node} ({kind})")]
    MissingParent { node: NodeId, kind: &'static str },

    #[error("no scope assigned to node {node}")]
    MissingScope { node: NodeId },

    #[error("unknown scope {0}")]
    UnknownScope(ScopeId),

    #[error("{0} has no enclosing scope")]
    NoEnclosingScope(ScopeId),

    #[error("node {node} reached twice while indexing relatives")]
    DuplicateNode { node: NodeId },

    #[error("node {node} is not part of the indexed tree")]
    UnknownNode { node: NodeId },

    #[error("{pass} reported {count} diagnostics but cannot fail")]
    UnexpectedDiagnostics { pass: &'static str, count: usize },
}

impl SemaError {
    pub fn missing_context(node: NodeId, key: impl Into<String>) -> Self {
        Self::MissingContext {
            node,
            key: key.into(),
        }
    }

    pub fn missing_parent(node: NodeId, kind: &'static str) -> Self {
        Self::MissingParent { node, kind }
    }

    pub fn missing_scope(node: NodeId) -> Self {
        Self::MissingScope { node }
    }

    pub fn duplicate_node(node: NodeId) -> Self {
        Self::DuplicateNode { node }
    }

    pub fn unknown_node(node: NodeId) -> Self {
        Self::UnknownNode { node }
    }

    pub fn unexpected_diagnostics(pass: &'static str, count: usize) -> Self {
        Self::UnexpectedDiagnostics { pass, count }
    }
}

pub type SemaResult<T> = Result<T, SemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let node = NodeId::from_raw(7);
        assert_eq!(
            SemaError::missing_context(node, "Span").to_string(),
            "no Span found in context of node #7"
        );
        assert_eq!(
            SemaError::missing_parent(node, "MethodSignature").to_string(),
            "no parent found for node #7 (MethodSignature)"
        );
        assert_eq!(
            SemaError::missing_scope(node).to_string(),
            "no scope assigned to node #7"
        );
        assert_eq!(
            SemaError::unexpected_diagnostics("flattening", 2).to_string(),
            "flattening reported 2 diagnostics but cannot fail"
        );
    }
}
