//! Foreign and built-in type descriptors

use std::collections::BTreeMap;

use super::{QualifiedName, Symbol, SymbolTable};
use crate::common::SemaResult;

/// Namespace built-in types live under
pub const BUILTIN_NAMESPACE: &str = "lang";

/// Descriptor of a type provided by the host platform
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostType {
    /// Fully qualified name
    pub name: String,
    pub is_interface: bool,
}

impl HostType {
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_interface: false,
        }
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_interface: true,
        }
    }
}

/// Lookup of host types by qualified name
pub trait HostTypes {
    fn lookup(&self, qualified_name: &str) -> Option<HostType>;

    /// Types to pre-bind in every symbol table, i.e. those directly under
    /// `namespace`
    fn builtins(&self, namespace: &str) -> Vec<HostType> {
        let _ = namespace;
        Vec::new()
    }
}

/// In-memory host type registry
#[derive(Debug, Clone, Default)]
pub struct HostTypeRegistry {
    types: BTreeMap<String, HostType>,
}

impl HostTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the core built-ins `Object` and `None`
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .register(HostType::class(format!("{BUILTIN_NAMESPACE}.Object")))
            .register(HostType::class(format!("{BUILTIN_NAMESPACE}.None")));
        registry
    }

    pub fn register(&mut self, ty: HostType) -> &mut Self {
        self.types.insert(ty.name.clone(), ty);
        self
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HostType> {
        self.types.values()
    }
}

impl HostTypes for HostTypeRegistry {
    fn lookup(&self, qualified_name: &str) -> Option<HostType> {
        self.types.get(qualified_name).cloned()
    }

    fn builtins(&self, namespace: &str) -> Vec<HostType> {
        self.types
            .values()
            .filter(|ty| QualifiedName::new(ty.name.as_str()).namespace() == Some(namespace))
            .cloned()
            .collect()
    }
}

/// Binds every built-in of `namespace` at the table root, under its
/// qualified name and under its simple name as an alias
pub fn seed_builtins(
    table: &mut SymbolTable,
    host: &dyn HostTypes,
    namespace: &str,
) -> SemaResult<()> {
    let root = table.root();
    for ty in host.builtins(namespace) {
        let qualified = QualifiedName::new(ty.name.as_str());
        table.put(root, qualified.as_str(), Symbol::host(ty))?;
        table.put(root, qualified.simple_name(), Symbol::alias(qualified.as_str()))?;
    }
    tracing::debug!(namespace, "seeded built-in types");
    Ok(())
}
