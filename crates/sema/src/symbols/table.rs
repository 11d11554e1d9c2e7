//! Hierarchical symbol table

use std::collections::HashMap;
use std::fmt;

use string_interner::{DefaultStringInterner, DefaultSymbol as NameKey};

use super::{ScopeId, Symbol};
use crate::common::{SemaError, SemaResult};

#[derive(Debug, Clone)]
struct Scope {
    name: String,
    parent: Option<ScopeId>,
    children: Vec<ScopeId>,
    bindings: HashMap<NameKey, Vec<Symbol>>,
    /// Binding names in first-insertion order, for dumps
    order: Vec<NameKey>,
}

impl Scope {
    fn new(name: String, parent: Option<ScopeId>) -> Self {
        Self {
            name,
            parent,
            children: Vec::new(),
            bindings: HashMap::new(),
            order: Vec::new(),
        }
    }
}

/// Tree of named scopes, each binding names to one or more symbols.
///
/// Scope 0 is the root and has no parent.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    names: DefaultStringInterner,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new(String::new(), None)],
            names: DefaultStringInterner::default(),
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId::from_raw(0)
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    fn scope(&self, id: ScopeId) -> SemaResult<&Scope> {
        self.scopes
            .get(id.to_raw() as usize)
            .ok_or(SemaError::UnknownScope(id))
    }

    fn scope_mut(&mut self, id: ScopeId) -> SemaResult<&mut Scope> {
        self.scopes
            .get_mut(id.to_raw() as usize)
            .ok_or(SemaError::UnknownScope(id))
    }

    /// New child of `parent`; names need not be unique among siblings
    pub fn create_scope(&mut self, parent: ScopeId, name: impl Into<String>) -> SemaResult<ScopeId> {
        let id = ScopeId::from_raw(self.scopes.len() as u32);
        let name = name.into();
        self.scope_mut(parent)?.children.push(id);
        tracing::trace!(scope = %id, parent = %parent, name = %name, "created scope");
        self.scopes.push(Scope::new(name, Some(parent)));
        Ok(id)
    }

    /// First child of `parent` called `name`, created if missing
    pub fn child_named(&mut self, parent: ScopeId, name: &str) -> SemaResult<ScopeId> {
        let existing = self
            .scope(parent)?
            .children
            .iter()
            .copied()
            .find(|&child| self.scopes[child.to_raw() as usize].name == name);
        match existing {
            Some(child) => Ok(child),
            None => self.create_scope(parent, name),
        }
    }

    /// Adds a binding; earlier bindings of the same name are kept
    pub fn put(&mut self, scope: ScopeId, name: &str, symbol: Symbol) -> SemaResult<()> {
        let key = self.names.get_or_intern(name);
        tracing::trace!(scope = %scope, name, symbol = %symbol, "bound symbol");
        let scope = self.scope_mut(scope)?;
        let symbols = scope.bindings.entry(key).or_default();
        if symbols.is_empty() {
            scope.order.push(key);
        }
        symbols.push(symbol);
        Ok(())
    }

    /// Bindings of `name` in `scope` only
    pub fn find_local(&self, scope: ScopeId, name: &str) -> SemaResult<&[Symbol]> {
        let scope = self.scope(scope)?;
        Ok(self
            .names
            .get(name)
            .and_then(|key| scope.bindings.get(&key))
            .map(Vec::as_slice)
            .unwrap_or_default())
    }

    /// Bindings of `name` in the nearest scope, starting at `scope` and
    /// walking up to the root, that binds it at all. Bindings from different
    /// levels are never merged.
    pub fn find(&self, scope: ScopeId, name: &str) -> SemaResult<&[Symbol]> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let symbols = self.find_local(id, name)?;
            if !symbols.is_empty() {
                return Ok(symbols);
            }
            current = self.scope(id)?.parent;
        }
        Ok(&[])
    }

    pub fn parent(&self, scope: ScopeId) -> SemaResult<Option<ScopeId>> {
        Ok(self.scope(scope)?.parent)
    }

    pub fn children(&self, scope: ScopeId) -> SemaResult<&[ScopeId]> {
        Ok(&self.scope(scope)?.children)
    }

    pub fn name(&self, scope: ScopeId) -> SemaResult<&str> {
        Ok(&self.scope(scope)?.name)
    }

    /// Scope names from the root down to `scope`, joined with `.`
    pub fn fq_name(&self, scope: ScopeId) -> SemaResult<String> {
        let mut parts = Vec::new();
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = self.scope(id)?;
            if scope.parent.is_some() {
                parts.push(scope.name.as_str());
            }
            current = scope.parent;
        }
        parts.reverse();
        Ok(parts.join("."))
    }

    fn write_scope(&self, f: &mut fmt::Formatter<'_>, id: ScopeId, depth: usize) -> fmt::Result {
        let Ok(scope) = self.scope(id) else {
            return Ok(());
        };
        let name = if scope.parent.is_none() { "<root>" } else { scope.name.as_str() };
        writeln!(f, "{:indent$}{name}", "", indent = depth * 2)?;
        for key in &scope.order {
            let name = self.names.resolve(*key).unwrap_or("?");
            let symbols: Vec<String> = scope.bindings[key].iter().map(ToString::to_string).collect();
            writeln!(
                f,
                "{:indent$}- {name}: {}",
                "",
                symbols.join(", "),
                indent = depth * 2 + 2
            )?;
        }
        for &child in &scope.children {
            self.write_scope(f, child, depth + 1)?;
        }
        Ok(())
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_scope(f, self.root(), 0)
    }
}
