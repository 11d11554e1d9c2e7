//! Scope assignment
//!
//! Gives every node of a unit the scope its names are resolved in. Most
//! nodes share their parent's scope; declarations, method signatures,
//! methods, function literals and attributes open new ones:
//!
//! | node                        | scope                                        |
//! |-----------------------------|----------------------------------------------|
//! | root                        | child of the enclosing scope, named after the unit |
//! | type / class                | `[body]`                                     |
//! | signature under a type      | `name(ParamType,...)`                        |
//! | signature under a method    | the method's signature scope                 |
//! | method                      | `name(ParamType,...)`, then `[body]` for statements |
//! | function literal            | `[anon:<line>]`, then `[body]` for statements |
//! | attribute                   | the attribute's name                         |

use std::collections::HashMap;

use tracing::debug;

use crate::ast::{NodeId, Root, ValueKind};
use crate::common::{SemaError, SemaResult, Span};
use crate::relatives::Relatives;
use crate::symbols::{ScopeId, SymbolTable};
use crate::visit::{NodeKind, NodeRef};

pub const BODY_SCOPE: &str = "[body]";

/// Scope assigned to each node of a unit
#[derive(Debug, Clone, Default)]
pub struct Scopes {
    by_node: HashMap<NodeId, ScopeId>,
}

impl Scopes {
    pub fn get(&self, node: NodeId) -> Option<ScopeId> {
        self.by_node.get(&node).copied()
    }

    pub fn scope_of(&self, node: NodeId) -> SemaResult<ScopeId> {
        self.get(node).ok_or_else(|| SemaError::missing_scope(node))
    }

    pub fn len(&self) -> usize {
        self.by_node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_node.is_empty()
    }
}

/// Scope for `namespace` under the table root, one level per segment.
/// Existing levels are reused so units of one namespace share them.
pub fn namespace_scope(table: &mut SymbolTable, namespace: &str) -> SemaResult<ScopeId> {
    let mut scope = table.root();
    for part in namespace.split('.').filter(|part| !part.is_empty()) {
        scope = table.child_named(scope, part)?;
    }
    Ok(scope)
}

pub struct ScopeAssignment<'a> {
    table: &'a mut SymbolTable,
    relatives: &'a Relatives,
    enclosing: ScopeId,
    scopes: Scopes,
}

impl<'a> ScopeAssignment<'a> {
    /// `relatives` must index the tree passed to [`assign`](Self::assign)
    pub fn new(table: &'a mut SymbolTable, relatives: &'a Relatives, enclosing: ScopeId) -> Self {
        Self {
            table,
            relatives,
            enclosing,
            scopes: Scopes::default(),
        }
    }

    pub fn assign(mut self, root: &Root) -> SemaResult<Scopes> {
        self.visit(NodeRef::Root(root))?;
        debug!(
            unit = root.top_level.name(),
            nodes = self.scopes.len(),
            "assigned scopes"
        );
        Ok(self.scopes)
    }

    fn parent_scope(&self, node: NodeRef<'_>) -> SemaResult<ScopeId> {
        let parent = self
            .relatives
            .parent(node.id())
            .ok_or_else(|| SemaError::missing_parent(node.id(), node.kind().name()))?;
        self.scopes.scope_of(parent)
    }

    fn enter(&mut self, node: NodeRef<'_>, scope: ScopeId) {
        self.scopes.by_node.insert(node.id(), scope);
    }

    fn visit_all<'n>(&mut self, nodes: impl IntoIterator<Item = NodeRef<'n>>) -> SemaResult<()> {
        for node in nodes {
            self.visit(node)?;
        }
        Ok(())
    }

    fn open(&mut self, node: NodeRef<'_>, name: impl Into<String>) -> SemaResult<()> {
        let parent = self.parent_scope(node)?;
        let scope = self.table.create_scope(parent, name)?;
        self.enter(node, scope);
        self.visit_all(node.children())
    }

    fn inherit(&mut self, node: NodeRef<'_>) -> SemaResult<()> {
        let scope = self.parent_scope(node)?;
        self.enter(node, scope);
        self.visit_all(node.children())
    }

    fn visit(&mut self, node: NodeRef<'_>) -> SemaResult<()> {
        match node {
            NodeRef::Root(root) => {
                let scope = self.table.create_scope(self.enclosing, root.top_level.name())?;
                self.enter(node, scope);
                self.visit_all(node.children())
            }
            NodeRef::Type(_) | NodeRef::Class(_) => self.open(node, BODY_SCOPE),
            NodeRef::MethodSignature(signature) => {
                match self.relatives.parent_kind(node.id()) {
                    Some(NodeKind::Type) => self.open(node, signature.key()),
                    _ => self.inherit(node),
                }
            }
            NodeRef::Method(method) => {
                let parent = self.parent_scope(node)?;
                let scope = self.table.create_scope(parent, method.signature.key())?;
                self.enter(node, scope);
                self.visit(NodeRef::MethodSignature(&method.signature))?;

                let body = self.table.create_scope(scope, BODY_SCOPE)?;
                self.enter(node, body);
                self.visit_all(method.statements.iter().map(NodeRef::Statement))
            }
            NodeRef::Value(value) => match &value.kind {
                ValueKind::Function(function) => {
                    let line = value
                        .context
                        .get::<Span>()
                        .filter(|span| span.line > 0)
                        .map_or_else(|| String::from("?"), |span| span.line.to_string());
                    let parent = self.parent_scope(node)?;
                    let scope = self.table.create_scope(parent, format!("[anon:{line}]"))?;
                    self.enter(node, scope);
                    self.visit_all(function.type_parameters.iter().map(NodeRef::TypeParameter))?;
                    self.visit_all(function.parameters.iter().map(NodeRef::Parameter))?;
                    self.visit(NodeRef::TypeSpec(&function.return_type))?;

                    let body = self.table.create_scope(scope, BODY_SCOPE)?;
                    self.enter(node, body);
                    self.visit_all(function.statements.iter().map(NodeRef::Statement))
                }
                _ => self.inherit(node),
            },
            NodeRef::Attribute(attribute) => self.open(node, attribute.name.as_str()),
            NodeRef::Use(_)
            | NodeRef::TypeParameter(_)
            | NodeRef::Parameter(_)
            | NodeRef::Statement(_)
            | NodeRef::Reference(_)
            | NodeRef::TypeSpec(_) => self.inherit(node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBuilder, Mode, Node, NodeIdGenerator, TopLevel};
    use pretty_assertions::assert_eq;

    fn assign(table: &mut SymbolTable, root: &Root) -> SemaResult<Scopes> {
        let relatives = Relatives::build(root)?;
        let enclosing = namespace_scope(table, &root.namespace)?;
        ScopeAssignment::new(table, &relatives, enclosing).assign(root)
    }

    fn fq(table: &SymbolTable, scopes: &Scopes, node: NodeId) -> String {
        table.fq_name(scopes.scope_of(node).unwrap()).unwrap()
    }

    #[test]
    fn test_type_declaration_scopes() {
        let ids = NodeIdGenerator::new();
        let ast = AstBuilder::new(&ids);
        let decl = ast
            .type_decl("T", ast.simple("Object"))
            .with_type_parameters(vec![ast.type_parameter("A")])
            .with_methods(vec![
                ast.signature("m", vec![ast.parameter("a", ast.simple("A"))], ast.simple("A")),
                ast.signature("m", vec![ast.parameter("b", ast.simple("B"))], ast.simple("B")),
            ]);
        let root = ast.root("a.b", vec![ast.use_("lang.Object")], decl);

        let mut table = SymbolTable::new();
        let scopes = assign(&mut table, &root).unwrap();
        let TopLevel::Type(decl) = &root.top_level else {
            panic!("expected type");
        };

        assert_eq!(fq(&table, &scopes, root.id()), "a.b.T");
        assert_eq!(fq(&table, &scopes, root.uses[0].id()), "a.b.T");
        assert_eq!(fq(&table, &scopes, decl.id()), "a.b.T.[body]");
        assert_eq!(fq(&table, &scopes, decl.type_parameters[0].id()), "a.b.T.[body]");
        assert_eq!(fq(&table, &scopes, decl.super_type.id()), "a.b.T.[body]");
        assert_eq!(fq(&table, &scopes, decl.methods[0].id()), "a.b.T.[body].m(A)");
        assert_eq!(fq(&table, &scopes, decl.methods[1].id()), "a.b.T.[body].m(B)");
        assert_eq!(
            fq(&table, &scopes, decl.methods[0].parameters[0].ty.id()),
            "a.b.T.[body].m(A)"
        );
    }

    #[test]
    fn test_method_signature_shares_method_scope() {
        let ids = NodeIdGenerator::new();
        let ast = AstBuilder::new(&ids);
        let method = ast.method(
            ast.signature("m", vec![ast.parameter("a", ast.simple("A"))], ast.simple("A")),
            vec![ast.statement(ast.identifier("a"), true)],
        );
        let class = ast.class_decl("C", ast.simple("Object")).with_methods(vec![method]);
        let root = ast.root("ns", vec![], class);

        let mut table = SymbolTable::new();
        let scopes = assign(&mut table, &root).unwrap();
        let TopLevel::Class(class) = &root.top_level else {
            panic!("expected class");
        };
        let method = &class.methods[0];

        assert_eq!(fq(&table, &scopes, method.signature.id()), "ns.C.[body].m(A)");
        assert_eq!(
            fq(&table, &scopes, method.signature.parameters[0].id()),
            "ns.C.[body].m(A)"
        );
        assert_eq!(fq(&table, &scopes, method.id()), "ns.C.[body].m(A).[body]");
        assert_eq!(
            fq(&table, &scopes, method.statements[0].id()),
            "ns.C.[body].m(A).[body]"
        );
        assert_eq!(
            table.parent(scopes.scope_of(method.id()).unwrap()).unwrap(),
            Some(scopes.scope_of(method.signature.id()).unwrap())
        );
    }

    #[test]
    fn test_function_literal_scopes() {
        let ids = NodeIdGenerator::new();
        let ast = AstBuilder::new(&ids);
        let spanned = ast
            .function(
                vec![ast.type_parameter("X")],
                vec![ast.parameter("x", ast.simple("X"))],
                ast.simple("X"),
                vec![ast.statement(ast.identifier("x"), true)],
            )
            .at(Span::new(40, 60).with_position(12, 5));
        let unspanned = ast.function(vec![], vec![], ast.simple("None"), vec![]);
        let class = ast.class_decl("C", ast.simple("Object")).with_attributes(vec![
            ast.attribute(Mode::Val, "f", ast.inferred(), spanned),
            ast.attribute(Mode::Val, "g", ast.inferred(), unspanned),
        ]);
        let root = ast.root("ns", vec![], class);

        let mut table = SymbolTable::new();
        let scopes = assign(&mut table, &root).unwrap();
        let TopLevel::Class(class) = &root.top_level else {
            panic!("expected class");
        };
        let f = &class.attributes[0];
        let g = &class.attributes[1];
        let function = f.value.as_function().unwrap();

        assert_eq!(fq(&table, &scopes, f.id()), "ns.C.[body].f");
        assert_eq!(fq(&table, &scopes, f.ty.id()), "ns.C.[body].f");
        assert_eq!(fq(&table, &scopes, f.value.id()), "ns.C.[body].f.[anon:12].[body]");
        assert_eq!(
            fq(&table, &scopes, function.parameters[0].id()),
            "ns.C.[body].f.[anon:12]"
        );
        assert_eq!(
            fq(&table, &scopes, function.type_parameters[0].id()),
            "ns.C.[body].f.[anon:12]"
        );
        assert_eq!(
            fq(&table, &scopes, function.return_type.id()),
            "ns.C.[body].f.[anon:12]"
        );
        assert_eq!(
            fq(&table, &scopes, function.statements[0].id()),
            "ns.C.[body].f.[anon:12].[body]"
        );
        assert_eq!(fq(&table, &scopes, g.value.id()), "ns.C.[body].g.[anon:?].[body]");
    }

    #[test]
    fn test_units_of_one_namespace_share_namespace_scope() {
        let ids = NodeIdGenerator::new();
        let ast = AstBuilder::new(&ids);
        let first = ast.root("ns", vec![], ast.type_decl("A", ast.simple("Object")));
        let second = ast.root("ns", vec![], ast.type_decl("B", ast.simple("Object")));

        let mut table = SymbolTable::new();
        let first_scopes = assign(&mut table, &first).unwrap();
        let second_scopes = assign(&mut table, &second).unwrap();

        let a = first_scopes.scope_of(first.id()).unwrap();
        let b = second_scopes.scope_of(second.id()).unwrap();
        assert_ne!(a, b);
        assert_eq!(table.parent(a).unwrap(), table.parent(b).unwrap());
    }

    #[test]
    fn test_relatives_of_another_tree_is_a_structural_error() {
        let ids = NodeIdGenerator::new();
        let ast = AstBuilder::new(&ids);
        let indexed = ast.root("ns", vec![], ast.type_decl("A", ast.simple("Object")));
        let other = ast.root("ns", vec![ast.use_("x.Y")], ast.type_decl("B", ast.simple("Object")));

        let mut table = SymbolTable::new();
        let enclosing = table.root();
        let relatives = Relatives::build(&indexed).unwrap();
        let err = ScopeAssignment::new(&mut table, &relatives, enclosing)
            .assign(&other)
            .unwrap_err();
        assert_eq!(err, SemaError::missing_parent(other.uses[0].id(), "Use"));
    }

    #[test]
    fn test_scope_of_unassigned_node() {
        let scopes = Scopes::default();
        let node = NodeId::from_raw(5);
        assert_eq!(scopes.scope_of(node), Err(SemaError::missing_scope(node)));
        assert!(scopes.is_empty());
    }
}
