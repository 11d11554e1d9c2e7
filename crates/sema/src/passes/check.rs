//! Discovery plus unresolved-name checking for one unit

use tracing::debug;

use super::{Discovery, Scopes};
use crate::ast::{Node, Root, TypeSpec};
use crate::common::{Diagnostic, SemaResult};
use crate::symbols::{HostTypes, QualifiedName, Symbol, SymbolTable, TypeLoader};
use crate::visit::{self, NodeKind, NodeRef};

/// Runs [`Discovery`], then makes sure every simple type reference of the
/// unit resolves in its own scope.
pub struct Checker<'a> {
    discovery: Discovery<'a>,
    loader: &'a dyn TypeLoader,
}

impl<'a> Checker<'a> {
    pub fn new(host: &'a dyn HostTypes, loader: &'a dyn TypeLoader) -> Self {
        Self {
            discovery: Discovery::new(host, loader),
            loader,
        }
    }

    /// Discovery diagnostics followed by one `symbol not found` per
    /// unresolved reference, in tree order
    pub fn check(
        &self,
        root: &Root,
        scopes: &Scopes,
        table: &mut SymbolTable,
    ) -> SemaResult<Vec<Diagnostic>> {
        let mut diagnostics = self.discovery.discover(root, scopes, table)?;

        let references =
            visit::nodes_matching(NodeRef::Root(root), |node| node.kind() == NodeKind::SimpleType);
        for reference in references {
            let NodeRef::TypeSpec(spec) = reference else {
                continue;
            };
            if let Some(diagnostic) = self.resolve(root, spec, scopes, table)? {
                diagnostics.push(diagnostic);
            }
        }

        debug!(
            unit = root.top_level.name(),
            errors = diagnostics.len(),
            "checked unit"
        );
        Ok(diagnostics)
    }

    /// Falls back to the loader on a miss; a loaded type is bound in the
    /// unit scope under its qualified name, with the plain name as alias.
    fn resolve(
        &self,
        root: &Root,
        spec: &TypeSpec,
        scopes: &Scopes,
        table: &mut SymbolTable,
    ) -> SemaResult<Option<Diagnostic>> {
        let Some(name) = spec.simple_name() else {
            return Ok(None);
        };
        if !table.find(scopes.scope_of(spec.id())?, name)?.is_empty() {
            return Ok(None);
        }

        let qualified = QualifiedName::in_namespace(name, &root.namespace);
        let Some(symbol) = self.loader.load(qualified.as_str(), spec.id()) else {
            debug!(name, node = %spec.id(), "unresolved type reference");
            return Ok(Some(Diagnostic::symbol_not_found(name, &spec.context)));
        };

        let unit = scopes.scope_of(root.id())?;
        table.put(unit, qualified.as_str(), symbol)?;
        if qualified.as_str() != name {
            table.put(unit, name, Symbol::alias(qualified.as_str()))?;
        }
        Ok(None)
    }
}
