//! Analysis session and pass orchestration

mod loader;

pub use loader::{SourceTypeLoader, TreeProvider};

use tracing::{debug, info, info_span};

use crate::ast::{NodeIdGenerator, Root};
use crate::common::{Diagnostic, SemaResult};
use crate::passes::{
    Checker, Flattener, NameChecker, Qualifier, References, ScopeAssignment, Scopes,
    namespace_scope,
};
use crate::relatives::Relatives;
use crate::symbols::{BUILTIN_NAMESPACE, HostTypes, SymbolTable, TypeLoader, seed_builtins};
use crate::validated::Validated;

/// Session options
#[derive(Debug, Clone)]
pub struct SemaConfig {
    /// Log phase banners at `info`
    pub verbose: bool,
    /// Log the symbol table once every name of a unit is bound
    pub dump_scopes: bool,
    /// Log the relatives index of each unit
    pub dump_relatives: bool,
    /// Normalize unions and intersections of the canonical tree
    pub flatten: bool,
    /// Namespace whose host types are visible everywhere by simple name
    pub builtin_namespace: String,
}

impl Default for SemaConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            dump_scopes: false,
            dump_relatives: false,
            flatten: true,
            builtin_namespace: BUILTIN_NAMESPACE.to_string(),
        }
    }
}

/// Everything computed for one unit
#[derive(Debug)]
pub struct Analysis {
    pub relatives: Relatives,
    pub scopes: Scopes,
    /// Declaring nodes of each resolved value reference
    pub references: References,
    pub diagnostics: Vec<Diagnostic>,
    /// Canonical, flattened clone of the unit; absent when qualifying failed
    pub tree: Option<Root>,
}

impl Analysis {
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Analyzes units against one shared symbol table.
///
/// Units of the same namespace analyzed by one session see each other's
/// declarations.
pub struct Session<'a> {
    config: SemaConfig,
    ids: &'a NodeIdGenerator,
    table: SymbolTable,
    host: &'a dyn HostTypes,
    loader: &'a dyn TypeLoader,
}

impl<'a> Session<'a> {
    pub fn new(
        config: SemaConfig,
        ids: &'a NodeIdGenerator,
        host: &'a dyn HostTypes,
        loader: &'a dyn TypeLoader,
    ) -> SemaResult<Self> {
        let mut table = SymbolTable::new();
        seed_builtins(&mut table, host, &config.builtin_namespace)?;

        Ok(Self {
            config,
            ids,
            table,
            host,
            loader,
        })
    }

    pub fn config(&self) -> &SemaConfig {
        &self.config
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn analyze(&mut self, root: &Root) -> SemaResult<Analysis> {
        let span = info_span!(
            "analyze",
            unit = root.top_level.name(),
            namespace = %root.namespace
        );
        let _enter = span.enter();

        // Phase 1: Relatives
        let relatives = Relatives::build(root)?;
        if self.config.dump_relatives {
            debug!("=== Relatives ===\n{relatives}");
        }

        // Phase 2: Scope assignment
        if self.config.verbose {
            info!("Assigning scopes...");
        }
        let enclosing = namespace_scope(&mut self.table, &root.namespace)?;
        let scopes = ScopeAssignment::new(&mut self.table, &relatives, enclosing).assign(root)?;

        // Phase 3: Discovery and unresolved names
        if self.config.verbose {
            info!("Discovering symbols...");
        }
        let mut diagnostics =
            Checker::new(self.host, self.loader).check(root, &scopes, &mut self.table)?;

        // Phase 4: Value names
        if self.config.verbose {
            info!("Checking value names...");
        }
        let (references, names) =
            NameChecker::new(&mut self.table, &relatives, &scopes).check(root)?;
        diagnostics.extend(names);
        if self.config.dump_scopes {
            debug!("=== Symbol Table ===\n{}", self.table);
        }

        // Phase 5: Qualifying
        if self.config.verbose {
            info!("Qualifying types...");
        }
        let tree = match Qualifier::new(self.ids, &scopes, &self.table).qualify(root)? {
            Validated::Valid(tree) if self.config.flatten => {
                // Phase 6: Flattening
                if self.config.verbose {
                    info!("Flattening types...");
                }
                Some(Flattener::new(self.ids).flatten(&tree)?)
            }
            Validated::Valid(tree) => Some(tree),
            Validated::Invalid(errors) => {
                diagnostics.extend(errors);
                None
            }
        };

        if self.config.verbose {
            info!(errors = diagnostics.len(), "Analysis finished");
        }
        Ok(Analysis {
            relatives,
            scopes,
            references,
            diagnostics,
            tree,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBuilder, TopLevel};
    use crate::symbols::{HostType, HostTypeRegistry, NoLoader, Symbol};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtins_are_seeded_by_simple_and_qualified_name() {
        let ids = NodeIdGenerator::new();
        let mut host = HostTypeRegistry::with_builtins();
        host.register(HostType::interface("lang.Comparable"))
            .register(HostType::class("util.List"));
        let session = Session::new(SemaConfig::default(), &ids, &host, &NoLoader).unwrap();

        let table = session.table();
        let root = table.root();
        assert_eq!(
            table.find_local(root, "Comparable").unwrap(),
            &[Symbol::alias("lang.Comparable")]
        );
        assert!(matches!(
            table.find_local(root, "lang.Comparable").unwrap(),
            [Symbol::HostInterface(_)]
        ));
        assert!(table.find_local(root, "List").unwrap().is_empty());
    }

    #[test]
    fn test_flattening_can_be_disabled() {
        let ids = NodeIdGenerator::new();
        let ast = AstBuilder::new(&ids);
        let root = ast.root(
            "ns",
            vec![],
            ast.type_decl("T", ast.union(vec![ast.simple("Object")])),
        );
        let host = HostTypeRegistry::with_builtins();
        let config = SemaConfig {
            flatten: false,
            ..SemaConfig::default()
        };

        let mut session = Session::new(config, &ids, &host, &NoLoader).unwrap();
        let analysis = session.analyze(&root).unwrap();
        let Some(TopLevel::Type(decl)) = analysis.tree.as_ref().map(|tree| &tree.top_level) else {
            panic!("expected type");
        };
        assert_eq!(decl.super_type.to_string(), "(lang.Object)");
    }

    #[test]
    fn test_units_of_one_namespace_see_each_other() {
        let ids = NodeIdGenerator::new();
        let ast = AstBuilder::new(&ids);
        let first = ast.root("ns", vec![], ast.class_decl("A", ast.simple("Object")));
        let second = ast.root("ns", vec![], ast.type_decl("B", ast.simple("A")));
        let host = HostTypeRegistry::with_builtins();

        let mut session = Session::new(SemaConfig::default(), &ids, &host, &NoLoader).unwrap();
        assert!(session.analyze(&first).unwrap().is_ok());
        let analysis = session.analyze(&second).unwrap();
        assert!(analysis.is_ok());

        let Some(TopLevel::Type(decl)) = analysis.tree.as_ref().map(|tree| &tree.top_level) else {
            panic!("expected type");
        };
        assert_eq!(decl.super_type.to_string(), "ns.A");
    }
}
