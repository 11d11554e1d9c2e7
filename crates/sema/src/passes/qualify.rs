//! Type canonicalization
//!
//! Clones a unit with every simple type reference replaced by its canonical
//! name. A name bound to a single [`Alias`](crate::symbols::Symbol::Alias)
//! is followed to its target, looked up again from the table root; any other
//! name, bound once, several times or not at all, is already canonical. Unresolved names are reported
//! by the [`Checker`](super::Checker), not here.

use std::collections::HashSet;

use tracing::{debug, trace};

use super::{Rewrite, Scopes};
use crate::ast::{Node, NodeIdGenerator, Root, TypeSpec, TypeSpecKind};
use crate::common::{Diagnostic, SemaResult};
use crate::context::Context;
use crate::symbols::{ScopeId, SymbolTable};
use crate::validated::Validated;

pub struct Qualifier<'a> {
    ids: &'a NodeIdGenerator,
    scopes: &'a Scopes,
    table: &'a SymbolTable,
}

impl<'a> Qualifier<'a> {
    pub fn new(ids: &'a NodeIdGenerator, scopes: &'a Scopes, table: &'a SymbolTable) -> Self {
        Self { ids, scopes, table }
    }

    pub fn qualify(&self, root: &Root) -> SemaResult<Validated<Root>> {
        let qualified = self.root(root)?;
        debug!(
            unit = root.top_level.name(),
            errors = qualified.errors().len(),
            "qualified types"
        );
        Ok(qualified)
    }

    /// Follows alias bindings of `name`, seen from `scope`, to the name they
    /// finally stand for.
    pub fn canonical_name(
        &self,
        scope: ScopeId,
        name: &str,
        at: &Context,
    ) -> SemaResult<Validated<String>> {
        let mut visited = HashSet::new();
        let mut current = name.to_owned();
        let mut scope = scope;
        loop {
            let [symbol] = self.table.find(scope, &current)? else {
                return Ok(Validated::Valid(current));
            };
            let Some(target) = symbol.alias_target() else {
                return Ok(Validated::Valid(current));
            };

            visited.insert(current);
            if visited.contains(target) {
                debug!(name, target, "alias cycle");
                return Ok(Validated::error(Diagnostic::alias_cycle(name, at)));
            }
            trace!(name, target, "following alias");
            current = target.to_owned();
            scope = self.table.root();
        }
    }
}

impl Rewrite for Qualifier<'_> {
    fn ids(&self) -> &NodeIdGenerator {
        self.ids
    }

    fn type_spec(&self, spec: &TypeSpec) -> SemaResult<Validated<TypeSpec>> {
        let TypeSpecKind::Simple { name, .. } = &spec.kind else {
            return self.descend(spec);
        };
        let canonical = self.canonical_name(self.scopes.scope_of(spec.id())?, name, &spec.context)?;
        let rebuilt = self.descend(spec)?;
        Ok(canonical.combine(rebuilt).map(|(canonical, mut spec)| {
            if let TypeSpecKind::Simple { name, .. } = &mut spec.kind {
                *name = canonical;
            }
            spec
        }))
    }
}
