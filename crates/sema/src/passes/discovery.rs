//! Symbol discovery
//!
//! Binds what a unit imports and declares into the scopes assigned by
//! [`ScopeAssignment`](super::ScopeAssignment):
//! - `use a.B : C` binds `a.B` to the foreign type and `C` as an alias of it
//! - `type T` / `class T` in namespace `ns` binds `ns.T` to the declaration
//!   and `T` as an alias of it, one level above the unit scope, so sibling
//!   units of the namespace see each other
//! - type parameters are bound in the scope of the node declaring them
//!
//! A declaration whose name is already bound is reported and its type
//! parameters are left unbound.
//!
//! Problems are collected, never returned early.

use tracing::debug;

use super::Scopes;
use crate::ast::{DeclKind, Node, Root, TypeParameter, Use};
use crate::common::{Diagnostic, SemaResult};
use crate::symbols::{HostTypes, QualifiedName, Symbol, SymbolTable, TypeLoader};
use crate::visit::{self, NodeRef};

pub struct Discovery<'a> {
    host: &'a dyn HostTypes,
    loader: &'a dyn TypeLoader,
}

impl<'a> Discovery<'a> {
    pub fn new(host: &'a dyn HostTypes, loader: &'a dyn TypeLoader) -> Self {
        Self { host, loader }
    }

    pub fn discover(
        &self,
        root: &Root,
        scopes: &Scopes,
        table: &mut SymbolTable,
    ) -> SemaResult<Vec<Diagnostic>> {
        let mut diagnostics = Vec::new();
        for use_ in &root.uses {
            diagnostics.extend(self.discover_use(use_, scopes, table)?);
        }
        diagnostics.extend(self.discover_declaration(root, scopes, table)?);

        debug!(
            unit = root.top_level.name(),
            errors = diagnostics.len(),
            "discovered symbols"
        );
        Ok(diagnostics)
    }

    fn discover_use(
        &self,
        use_: &Use,
        scopes: &Scopes,
        table: &mut SymbolTable,
    ) -> SemaResult<Vec<Diagnostic>> {
        let scope = scopes.scope_of(use_.id())?;
        if !table.find_local(scope, &use_.to)?.is_empty() {
            return Ok(vec![Diagnostic::symbol_already_defined(
                &use_.to,
                &use_.context,
            )]);
        }

        if table.find(scope, &use_.from)?.is_empty() {
            let symbol = self
                .host
                .lookup(&use_.from)
                .map(Symbol::host)
                .or_else(|| self.loader.load(&use_.from, use_.id()));
            let Some(symbol) = symbol else {
                debug!(from = %use_.from, "unresolved use");
                return Ok(vec![Diagnostic::symbol_not_found(&use_.from, &use_.context)]);
            };
            table.put(scope, &use_.from, symbol)?;
        }

        if use_.to != use_.from {
            table.put(scope, &use_.to, Symbol::alias(use_.from.as_str()))?;
        }
        Ok(Vec::new())
    }

    fn discover_declaration(
        &self,
        root: &Root,
        scopes: &Scopes,
        table: &mut SymbolTable,
    ) -> SemaResult<Vec<Diagnostic>> {
        let decl = &root.top_level;
        let name = decl.name();

        if !table.find(scopes.scope_of(decl.id())?, name)?.is_empty() {
            debug!(name, "duplicate declaration");
            return Ok(vec![Diagnostic::symbol_already_defined(name, decl.context())]);
        }

        let unit_scope = scopes.scope_of(root.id())?;
        let target = table.parent(unit_scope)?.unwrap_or(unit_scope);
        let qualified = QualifiedName::in_namespace(name, &root.namespace);
        if qualified.as_str() != name {
            table.put(target, name, Symbol::alias(qualified.as_str()))?;
        }
        table.put(
            target,
            qualified.as_str(),
            Symbol::user_type(decl.id(), qualified.as_str(), decl.kind()),
        )?;

        let mut diagnostics = self.bind_type_parameters(decl.type_parameters(), scopes, table)?;

        let nested: Vec<&TypeParameter> = visit::flat_map(NodeRef::from(decl), |node| match node {
            NodeRef::MethodSignature(signature) => signature.type_parameters.iter().collect(),
            NodeRef::Value(value) => value
                .as_function()
                .map(|function| function.type_parameters.iter().collect())
                .unwrap_or_default(),
            _ => Vec::new(),
        });
        diagnostics.extend(self.bind_type_parameters(nested, scopes, table)?);

        Ok(diagnostics)
    }

    fn bind_type_parameters<'t>(
        &self,
        type_parameters: impl IntoIterator<Item = &'t TypeParameter>,
        scopes: &Scopes,
        table: &mut SymbolTable,
    ) -> SemaResult<Vec<Diagnostic>> {
        let mut diagnostics = Vec::new();
        for type_parameter in type_parameters {
            let scope = scopes.scope_of(type_parameter.id())?;
            let name = type_parameter.name.as_str();
            if table.find_local(scope, name)?.is_empty() {
                table.put(
                    scope,
                    name,
                    Symbol::user_type(type_parameter.id(), name, DeclKind::TypeParameter),
                )?;
            } else {
                diagnostics.push(Diagnostic::symbol_already_defined(
                    name,
                    &type_parameter.context,
                ));
            }
        }
        Ok(diagnostics)
    }
}
