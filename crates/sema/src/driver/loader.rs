//! Cross-unit type loading by analyzing other units on demand

use std::cell::RefCell;
use std::collections::HashSet;

use tracing::{debug, warn};

use super::{SemaConfig, Session};
use crate::ast::{Node, NodeId, NodeIdGenerator, Root};
use crate::symbols::{HostTypes, QualifiedName, Symbol, TypeLoader};

/// Source of unit trees, e.g. a parser over a source directory
pub trait TreeProvider {
    /// Tree of the unit declaring `qualified_name`, built with ids from `ids`
    fn tree_for(&self, qualified_name: &str, ids: &NodeIdGenerator) -> Option<Root>;
}

/// Resolves a missing type by analyzing the unit that declares it in a
/// nested [`Session`], which uses this loader in turn.
///
/// A request for a name that is already being resolved further up the
/// stack fails instead of recursing.
pub struct SourceTypeLoader<'a, P> {
    provider: P,
    ids: &'a NodeIdGenerator,
    host: &'a dyn HostTypes,
    config: SemaConfig,
    resolving: RefCell<HashSet<String>>,
}

impl<'a, P: TreeProvider> SourceTypeLoader<'a, P> {
    pub fn new(
        provider: P,
        ids: &'a NodeIdGenerator,
        host: &'a dyn HostTypes,
        config: SemaConfig,
    ) -> Self {
        Self {
            provider,
            ids,
            host,
            config,
            resolving: RefCell::new(HashSet::new()),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn analyze(&self, qualified_name: &str) -> Option<Symbol> {
        let tree = self.provider.tree_for(qualified_name, self.ids)?;
        let declared = QualifiedName::in_namespace(tree.top_level.name(), &tree.namespace);
        if declared.as_str() != qualified_name {
            warn!(
                requested = qualified_name,
                declared = %declared,
                "unit declares a different type"
            );
            return None;
        }

        let analysis = Session::new(self.config.clone(), self.ids, self.host, self)
            .and_then(|mut session| session.analyze(&tree));
        match analysis {
            Ok(analysis) => {
                if !analysis.is_ok() {
                    warn!(
                        name = qualified_name,
                        errors = analysis.diagnostics.len(),
                        "loaded unit has errors"
                    );
                }
                Some(Symbol::user_type(
                    tree.top_level.id(),
                    declared.as_str(),
                    tree.top_level.kind(),
                ))
            }
            Err(error) => {
                warn!(name = qualified_name, %error, "failed to analyze loaded unit");
                None
            }
        }
    }
}

impl<P: TreeProvider> TypeLoader for SourceTypeLoader<'_, P> {
    fn load(&self, qualified_name: &str, trigger: NodeId) -> Option<Symbol> {
        if !self.resolving.borrow_mut().insert(qualified_name.to_string()) {
            warn!(name = qualified_name, %trigger, "cyclic type load");
            return None;
        }
        debug!(name = qualified_name, %trigger, "loading type");

        let symbol = self.analyze(qualified_name);
        self.resolving.borrow_mut().remove(qualified_name);
        symbol
    }
}
