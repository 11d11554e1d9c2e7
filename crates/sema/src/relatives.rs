//! Parent and sibling navigation
//!
//! [`Relatives`] is built by one walk over a tree and answers upward and
//! sideways queries without touching the tree again.

use std::collections::HashMap;
use std::fmt::{self, Write as _};

use crate::ast::{NodeId, Root};
use crate::common::{SemaError, SemaResult};
use crate::visit::{NodeKind, NodeRef};

/// Parent index and ordered children index of one tree
#[derive(Debug, Clone)]
pub struct Relatives {
    root: NodeId,
    kinds: HashMap<NodeId, NodeKind>,
    parents: HashMap<NodeId, NodeId>,
    children: HashMap<NodeId, Vec<NodeId>>,
}

impl Relatives {
    pub fn build(root: &Root) -> SemaResult<Self> {
        let root_ref = NodeRef::Root(root);
        let mut relatives = Self {
            root: root_ref.id(),
            kinds: HashMap::new(),
            parents: HashMap::new(),
            children: HashMap::new(),
        };
        relatives.index(root_ref, None)?;
        tracing::trace!(root = %relatives.root, nodes = relatives.len(), "indexed relatives");
        Ok(relatives)
    }

    fn index(&mut self, node: NodeRef<'_>, parent: Option<NodeId>) -> SemaResult<()> {
        let id = node.id();
        if self.kinds.insert(id, node.kind()).is_some() {
            return Err(SemaError::duplicate_node(id));
        }
        if let Some(parent) = parent {
            self.parents.insert(id, parent);
        }

        let children = node.children();
        self.children
            .insert(id, children.iter().map(|child| child.id()).collect());
        for child in children {
            self.index(child, Some(id))?;
        }
        Ok(())
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.kinds.contains_key(&node)
    }

    pub fn kind(&self, node: NodeId) -> SemaResult<NodeKind> {
        self.kinds
            .get(&node)
            .copied()
            .ok_or_else(|| SemaError::unknown_node(node))
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parents.get(&node).copied()
    }

    pub fn parent_kind(&self, node: NodeId) -> Option<NodeKind> {
        self.parent(node)
            .and_then(|parent| self.kinds.get(&parent).copied())
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.children
            .get(&node)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All children of the parent, `node` included; empty for the root
    pub fn siblings(&self, node: NodeId) -> &[NodeId] {
        match self.parent(node) {
            Some(parent) => self.children(parent),
            None => &[],
        }
    }

    pub fn sibling(&self, node: NodeId, offset: isize) -> Option<NodeId> {
        let siblings = self.siblings(node);
        let position = siblings.iter().position(|&sibling| sibling == node)?;
        let target = position.checked_add_signed(offset)?;
        siblings.get(target).copied()
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.sibling(node, 1)
    }

    pub fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.sibling(node, -1)
    }

    /// Parent, grandparent and so on up to the root
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(node), |&current| self.parent(current))
    }

    /// Nearest ancestor of the given kind
    pub fn enclosing(&self, node: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.ancestors(node)
            .find(|ancestor| self.kinds.get(ancestor) == Some(&kind))
    }

    fn write_subtree(&self, out: &mut String, node: NodeId, depth: usize) -> fmt::Result {
        let kind = self.kinds.get(&node).map_or("?", |kind| kind.name());
        writeln!(out, "{:indent$}{kind} {node}", "", indent = depth * 2)?;
        for &child in self.children(node) {
            self.write_subtree(out, child, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Relatives {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_subtree(&mut out, self.root, 0)?;
        f.write_str(&out)
    }
}
