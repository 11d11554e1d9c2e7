//! Lazy resolution of types declared outside the current unit

use super::{HostTypes, Symbol};
use crate::ast::NodeId;

/// Resolves a qualified type name that a local lookup missed.
///
/// Implementations may block, for instance to read and analyze another
/// source file.
pub trait TypeLoader {
    fn load(&self, qualified_name: &str, trigger: NodeId) -> Option<Symbol>;
}

/// Loader that never resolves anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLoader;

impl TypeLoader for NoLoader {
    fn load(&self, _qualified_name: &str, _trigger: NodeId) -> Option<Symbol> {
        None
    }
}

/// Resolves names through a host type lookup
pub struct HostTypeLoader<'a> {
    host: &'a dyn HostTypes,
}

impl<'a> HostTypeLoader<'a> {
    pub fn new(host: &'a dyn HostTypes) -> Self {
        Self { host }
    }
}

impl TypeLoader for HostTypeLoader<'_> {
    fn load(&self, qualified_name: &str, _trigger: NodeId) -> Option<Symbol> {
        self.host.lookup(qualified_name).map(Symbol::host)
    }
}

/// Asks each loader in turn; the first hit wins
#[derive(Default)]
pub struct LoaderChain<'a> {
    loaders: Vec<&'a dyn TypeLoader>,
}

impl<'a> LoaderChain<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, loader: &'a dyn TypeLoader) -> Self {
        self.loaders.push(loader);
        self
    }
}

impl TypeLoader for LoaderChain<'_> {
    fn load(&self, qualified_name: &str, trigger: NodeId) -> Option<Symbol> {
        self.loaders
            .iter()
            .find_map(|loader| loader.load(qualified_name, trigger))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::DeclKind;
    use crate::symbols::{HostType, HostTypeRegistry};
    use pretty_assertions::assert_eq;

    struct Fixed(&'static str);

    impl TypeLoader for Fixed {
        fn load(&self, qualified_name: &str, trigger: NodeId) -> Option<Symbol> {
            (qualified_name == self.0)
                .then(|| Symbol::user_type(trigger, qualified_name, DeclKind::Type))
        }
    }

    #[test]
    fn test_chain_returns_first_hit() {
        let mut registry = HostTypeRegistry::new();
        registry.register(HostType::class("a.A"));
        let host = HostTypeLoader::new(&registry);
        let fixed = Fixed("a.A");
        let other = Fixed("b.B");
        let chain = LoaderChain::new().with(&host).with(&fixed).with(&other);
        let trigger = NodeId::from_raw(1);

        assert_eq!(chain.load("a.A", trigger), Some(Symbol::host(HostType::class("a.A"))));
        assert_eq!(
            chain.load("b.B", trigger),
            Some(Symbol::user_type(trigger, "b.B", DeclKind::Type))
        );
        assert_eq!(chain.load("c.C", trigger), None);
        assert_eq!(NoLoader.load("a.A", trigger), None);
    }
}
