//! Value name checking
//!
//! Binds the names a unit declares in value position and resolves every
//! value reference against them:
//! - `this`, attributes and methods are bound in the class body
//! - method signatures of a type are bound in the type body
//! - parameters and local assignments are bound in the scope they appear in
//!
//! Methods are bound under `name(ParamType,...)` and under the key a call
//! site uses, `name(_,...)`. References allowing forward use, such as method
//! calls, are resolved in a second pass once every declaration of the unit
//! is bound.

use std::collections::HashMap;

use tracing::debug;

use super::Scopes;
use crate::ast::{
    Attribute, Method, MethodSignature, Node, NodeId, Parameter, Reference, Root, Statement,
    TopLevel, Value, ValueKind,
};
use crate::common::{Diagnostic, SemaError, SemaResult};
use crate::context::Context;
use crate::relatives::Relatives;
use crate::symbols::{ScopeId, Symbol, SymbolTable};
use crate::visit::{self, NodeKind, NodeRef};

pub const THIS: &str = "this";

/// Declaring nodes each resolved reference stands for
#[derive(Debug, Clone, Default)]
pub struct References {
    by_node: HashMap<NodeId, Vec<NodeId>>,
}

impl References {
    /// Empty when `reference` is unresolved or bound only to host types
    pub fn targets(&self, reference: NodeId) -> &[NodeId] {
        self.by_node
            .get(&reference)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_resolved(&self, reference: NodeId) -> bool {
        self.by_node.contains_key(&reference)
    }

    pub fn len(&self) -> usize {
        self.by_node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_node.is_empty()
    }
}

pub struct NameChecker<'a> {
    table: &'a mut SymbolTable,
    relatives: &'a Relatives,
    scopes: &'a Scopes,
    references: References,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> NameChecker<'a> {
    /// `relatives` and `scopes` must come from the tree passed to
    /// [`check`](Self::check)
    pub fn new(table: &'a mut SymbolTable, relatives: &'a Relatives, scopes: &'a Scopes) -> Self {
        Self {
            table,
            relatives,
            scopes,
            references: References::default(),
            diagnostics: Vec::new(),
        }
    }

    pub fn check(mut self, root: &Root) -> SemaResult<(References, Vec<Diagnostic>)> {
        self.top_level(&root.top_level)?;

        let deferred = visit::nodes_matching(NodeRef::Root(root), |node| {
            matches!(node, NodeRef::Reference(reference) if reference.allow_forward_reference)
        });
        for node in deferred {
            if let NodeRef::Reference(reference) = node {
                self.resolve(reference)?;
            }
        }

        debug!(
            unit = root.top_level.name(),
            resolved = self.references.len(),
            errors = self.diagnostics.len(),
            "checked value names"
        );
        Ok((self.references, self.diagnostics))
    }

    fn enclosing(&self, scope: ScopeId) -> SemaResult<ScopeId> {
        self.table
            .parent(scope)?
            .ok_or(SemaError::NoEnclosingScope(scope))
    }

    fn ensure_free(&mut self, scope: ScopeId, name: &str, at: &Context) -> SemaResult<()> {
        if !self.table.find(scope, name)?.is_empty() {
            debug!(name, node = %at.node(), "duplicate value name");
            self.diagnostics.push(Diagnostic::symbol_already_defined(name, at));
        }
        Ok(())
    }

    fn bind(&mut self, scope: ScopeId, name: &str, node: NodeId) -> SemaResult<()> {
        self.table.put(scope, name, Symbol::value(node, name))
    }

    fn bind_method(
        &mut self,
        scope: ScopeId,
        signature: &MethodSignature,
        node: NodeId,
        at: &Context,
    ) -> SemaResult<()> {
        let key = signature.key();
        self.ensure_free(scope, &key, at)?;
        self.bind(scope, &key, node)?;

        let call_key = signature.call_key();
        if call_key != key {
            self.bind(scope, &call_key, node)?;
        }
        Ok(())
    }

    fn top_level(&mut self, top_level: &TopLevel) -> SemaResult<()> {
        match top_level {
            TopLevel::Type(decl) => decl
                .methods
                .iter()
                .try_for_each(|signature| self.signature(signature)),
            TopLevel::Class(decl) => {
                let body = self.scopes.scope_of(decl.id())?;
                self.bind(body, THIS, decl.id())?;
                for attribute in &decl.attributes {
                    self.attribute(attribute)?;
                }
                decl.methods.iter().try_for_each(|method| self.method(method))
            }
        }
    }

    /// Method signature of a type declaration
    fn signature(&mut self, signature: &MethodSignature) -> SemaResult<()> {
        let scope = self.enclosing(self.scopes.scope_of(signature.id())?)?;
        self.bind_method(scope, signature, signature.id(), &signature.context)?;
        self.parameters(&signature.parameters)
    }

    fn method(&mut self, method: &Method) -> SemaResult<()> {
        let scope = self.enclosing(self.scopes.scope_of(method.signature.id())?)?;
        self.bind_method(scope, &method.signature, method.id(), &method.context)?;
        self.parameters(&method.signature.parameters)?;
        self.statements(&method.statements)
    }

    fn attribute(&mut self, attribute: &Attribute) -> SemaResult<()> {
        let scope = self.enclosing(self.scopes.scope_of(attribute.id())?)?;
        self.ensure_free(scope, &attribute.name, &attribute.context)?;
        self.value(&attribute.value)?;
        self.bind(scope, &attribute.name, attribute.id())
    }

    fn parameters(&mut self, parameters: &[Parameter]) -> SemaResult<()> {
        for parameter in parameters {
            let scope = self.scopes.scope_of(parameter.id())?;
            self.ensure_free(scope, &parameter.name, &parameter.context)?;
            self.bind(scope, &parameter.name, parameter.id())?;
        }
        Ok(())
    }

    fn statements(&mut self, statements: &[Statement]) -> SemaResult<()> {
        statements
            .iter()
            .try_for_each(|statement| self.value(&statement.value))
    }

    fn value(&mut self, value: &Value) -> SemaResult<()> {
        match &value.kind {
            ValueKind::String(_) | ValueKind::Number(_) | ValueKind::Boolean(_) | ValueKind::None => {
                Ok(())
            }
            ValueKind::Identifier(reference) => self.reference(reference),
            ValueKind::NewAssignment { name, value: assigned, .. } => {
                let scope = self.scopes.scope_of(value.id())?;
                self.ensure_free(scope, name, &value.context)?;
                self.value(assigned)?;
                self.bind(scope, name, value.id())
            }
            ValueKind::DirectAssignment { reference, value } => {
                self.reference(reference)?;
                self.value(value)
            }
            ValueKind::IndirectAssignment {
                indirect,
                reference,
                value,
            } => {
                self.reference(reference)?;
                self.value(indirect)?;
                self.value(value)
            }
            ValueKind::MethodCall {
                method, arguments, ..
            } => {
                self.reference(method)?;
                arguments.iter().try_for_each(|argument| self.value(argument))
            }
            ValueKind::Nested { outer, inner } => {
                self.value(inner)?;
                self.value(outer)
            }
            ValueKind::Function(function) => {
                self.parameters(&function.parameters)?;
                self.statements(&function.statements)
            }
        }
    }

    fn reference(&mut self, reference: &Reference) -> SemaResult<()> {
        if reference.allow_forward_reference {
            return Ok(());
        }
        self.resolve(reference)
    }

    fn resolve(&mut self, reference: &Reference) -> SemaResult<()> {
        let name = self.lookup_key(reference)?;
        let symbols = self.table.find(self.scopes.scope_of(reference.id())?, &name)?;
        if symbols.is_empty() {
            debug!(name = %name, node = %reference.id(), "unresolved value reference");
            self.diagnostics
                .push(Diagnostic::symbol_not_found(&name, &reference.context));
            return Ok(());
        }

        let targets = symbols.iter().filter_map(Symbol::declaring_node).collect();
        self.references.by_node.insert(reference.id(), targets);
        Ok(())
    }

    /// `name(_,...)` for the method of a call, the plain name otherwise
    fn lookup_key(&self, reference: &Reference) -> SemaResult<String> {
        let parent = self
            .relatives
            .parent(reference.id())
            .ok_or_else(|| SemaError::missing_parent(reference.id(), "Reference"))?;
        if self.relatives.kind(parent)? != NodeKind::MethodCallValue {
            return Ok(reference.name.clone());
        }

        let mut arity = 0;
        for &child in self.relatives.children(parent) {
            if self.relatives.kind(child)?.is_value() {
                arity += 1;
            }
        }
        Ok(MethodSignature::call_key_for(&reference.name, arity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBuilder, ClassDecl, Mode, NodeIdGenerator};
    use crate::passes::testing::{messages, seeded_table};
    use crate::passes::{Discovery, ScopeAssignment, namespace_scope};
    use crate::symbols::{HostTypeRegistry, NoLoader};
    use pretty_assertions::assert_eq;

    fn check(root: &Root) -> (SymbolTable, Scopes, References, Vec<Diagnostic>) {
        let host = HostTypeRegistry::with_builtins();
        let mut table = seeded_table(&host);
        let relatives = Relatives::build(root).unwrap();
        let enclosing = namespace_scope(&mut table, &root.namespace).unwrap();
        let scopes = ScopeAssignment::new(&mut table, &relatives, enclosing)
            .assign(root)
            .unwrap();
        Discovery::new(&host, &NoLoader)
            .discover(root, &scopes, &mut table)
            .unwrap();
        let (references, diagnostics) = NameChecker::new(&mut table, &relatives, &scopes)
            .check(root)
            .unwrap();
        (table, scopes, references, diagnostics)
    }

    fn class_of(root: &Root) -> &ClassDecl {
        let TopLevel::Class(class) = &root.top_level else {
            panic!("expected class");
        };
        class
    }

    fn reference_of(value: &Value) -> &Reference {
        match &value.kind {
            ValueKind::Identifier(reference) | ValueKind::DirectAssignment { reference, .. } => {
                reference
            }
            ValueKind::MethodCall { method, .. } => method,
            _ => panic!("expected a reference"),
        }
    }

    #[test]
    fn test_members_parameters_and_locals_resolve() {
        let ids = NodeIdGenerator::new();
        let ast = AstBuilder::new(&ids);
        let method = ast.method(
            ast.signature("add", vec![ast.parameter("step", ast.simple("Number"))], ast.simple("Number")),
            vec![
                ast.statement(ast.direct_assignment("count", ast.identifier("step")), false),
                ast.statement(
                    ast.new_assignment(Mode::Val, "me", ast.inferred(), ast.identifier("this")),
                    false,
                ),
                ast.statement(ast.identifier("me"), true),
            ],
        );
        let class = ast
            .class_decl("Counter", ast.simple("Object"))
            .with_attributes(vec![ast.attribute(Mode::Var, "count", ast.simple("Number"), ast.number("0"))])
            .with_methods(vec![method]);
        let root = ast.root("ns", vec![], class);

        let (table, scopes, references, diagnostics) = check(&root);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");

        let class = class_of(&root);
        let method = &class.methods[0];
        let statements = &method.statements;
        assert_eq!(references.targets(reference_of(&statements[0].value).id()), &[class.attributes[0].id()]);
        let ValueKind::DirectAssignment { value: step, .. } = &statements[0].value.kind else {
            panic!("expected assignment");
        };
        assert_eq!(
            references.targets(reference_of(step).id()),
            &[method.signature.parameters[0].id()]
        );
        assert_eq!(references.targets(reference_of(&statements[2].value).id()), &[statements[1].value.id()]);

        let body = scopes.scope_of(class.id()).unwrap();
        assert_eq!(table.find_local(body, THIS).unwrap(), &[Symbol::value(class.id(), THIS)]);
        assert_eq!(
            table.find_local(body, "add(Number)").unwrap(),
            &[Symbol::value(method.id(), "add(Number)")]
        );
        assert_eq!(table.find_local(body, "add(_)").unwrap().len(), 1);
    }

    #[test]
    fn test_undefined_identifiers_are_reported() {
        let ids = NodeIdGenerator::new();
        let ast = AstBuilder::new(&ids);
        let method = ast.method(
            ast.signature("run", vec![], ast.simple("None")),
            vec![
                ast.statement(ast.identifier("missing"), false),
                ast.statement(
                    ast.new_assignment(Mode::Val, "x", ast.inferred(), ast.identifier("x")),
                    true,
                ),
            ],
        );
        let class = ast.class_decl("C", ast.simple("Object")).with_methods(vec![method]);
        let root = ast.root("ns", vec![], class);

        let (_, _, references, diagnostics) = check(&root);
        assert_eq!(
            messages(&diagnostics),
            vec!["symbol not found: missing", "symbol not found: x"]
        );
        let statement = &class_of(&root).methods[0].statements[0];
        assert_eq!(diagnostics[0].node, reference_of(&statement.value).id());
        assert!(!references.is_resolved(reference_of(&statement.value).id()));
    }

    #[test]
    fn test_method_calls_may_precede_declaration() {
        let ids = NodeIdGenerator::new();
        let ast = AstBuilder::new(&ids);
        let first = ast.method(
            ast.signature("first", vec![], ast.simple("None")),
            vec![ast.statement(ast.method_call("second", vec![], vec![ast.number("1")]), true)],
        );
        let second = ast.method(
            ast.signature("second", vec![ast.parameter("n", ast.simple("Number"))], ast.simple("None")),
            vec![],
        );
        let class = ast
            .class_decl("C", ast.simple("Object"))
            .with_methods(vec![first, second]);
        let root = ast.root("ns", vec![], class);

        let (_, _, references, diagnostics) = check(&root);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");

        let class = class_of(&root);
        let call = &class.methods[0].statements[0].value;
        assert_eq!(references.targets(reference_of(call).id()), &[class.methods[1].id()]);
    }

    #[test]
    fn test_forward_references_are_checked_last() {
        let ids = NodeIdGenerator::new();
        let ast = AstBuilder::new(&ids);
        let method = ast.method(
            ast.signature("run", vec![], ast.simple("None")),
            vec![
                ast.statement(ast.method_call("nope", vec![], vec![ast.identifier("arg")]), false),
                ast.statement(ast.identifier("gone"), true),
            ],
        );
        let class = ast.class_decl("C", ast.simple("Object")).with_methods(vec![method]);
        let root = ast.root("ns", vec![], class);

        let (_, _, _, diagnostics) = check(&root);
        assert_eq!(
            messages(&diagnostics),
            vec![
                "symbol not found: arg",
                "symbol not found: gone",
                "symbol not found: nope(_)",
            ]
        );
    }

    #[test]
    fn test_calls_resolve_every_overload_of_their_arity() {
        let ids = NodeIdGenerator::new();
        let ast = AstBuilder::new(&ids);
        let put = |ty: &str| {
            ast.method(
                ast.signature("put", vec![ast.parameter("k", ast.simple(ty))], ast.simple("None")),
                vec![],
            )
        };
        let caller = ast.method(
            ast.signature("run", vec![], ast.simple("None")),
            vec![ast.statement(ast.method_call("put", vec![], vec![ast.none()]), true)],
        );
        let class = ast
            .class_decl("C", ast.simple("Object"))
            .with_methods(vec![put("Number"), put("String"), caller]);
        let root = ast.root("ns", vec![], class);

        let (_, _, references, diagnostics) = check(&root);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");

        let class = class_of(&root);
        let call = &class.methods[2].statements[0].value;
        assert_eq!(
            references.targets(reference_of(call).id()),
            &[class.methods[0].id(), class.methods[1].id()]
        );
    }

    #[test]
    fn test_duplicate_names() {
        let ids = NodeIdGenerator::new();
        let ast = AstBuilder::new(&ids);
        let method = |name: &str, statements| {
            ast.method(
                ast.signature(
                    name,
                    vec![ast.parameter("a", ast.simple("A")), ast.parameter("a", ast.simple("A"))],
                    ast.simple("None"),
                ),
                statements,
            )
        };
        let shadowing = vec![ast.statement(
            ast.new_assignment(Mode::Val, "size", ast.inferred(), ast.none()),
            true,
        )];
        let class = ast
            .class_decl("C", ast.simple("Object"))
            .with_attributes(vec![
                ast.attribute(Mode::Val, "size", ast.inferred(), ast.none()),
                ast.attribute(Mode::Val, "size", ast.inferred(), ast.none()),
            ])
            .with_methods(vec![method("m", shadowing), method("m", vec![])]);
        let root = ast.root("ns", vec![], class);

        let (_, _, _, diagnostics) = check(&root);
        assert_eq!(
            messages(&diagnostics),
            vec![
                "symbol already defined: size",
                "symbol already defined: a",
                "symbol already defined: size",
                "symbol already defined: m(A,A)",
                "symbol already defined: a",
            ]
        );
    }

    #[test]
    fn test_type_signatures_are_bound_in_type_body() {
        let ids = NodeIdGenerator::new();
        let ast = AstBuilder::new(&ids);
        let signature = || ast.signature("get", vec![ast.parameter("i", ast.simple("Number"))], ast.simple("A"));
        let decl = ast
            .type_decl("T", ast.simple("Object"))
            .with_methods(vec![signature(), signature()]);
        let root = ast.root("ns", vec![], decl);

        let (table, scopes, _, diagnostics) = check(&root);
        assert_eq!(messages(&diagnostics), vec!["symbol already defined: get(Number)"]);

        let body = scopes.scope_of(root.top_level.id()).unwrap();
        assert_eq!(table.find_local(body, "get(Number)").unwrap().len(), 2);
        assert!(table.find_local(body, THIS).unwrap().is_empty());
    }

    #[test]
    fn test_function_literal_parameters_stay_inside() {
        let ids = NodeIdGenerator::new();
        let ast = AstBuilder::new(&ids);
        let literal = ast.function(
            vec![],
            vec![ast.parameter("x", ast.simple("Number"))],
            ast.simple("Number"),
            vec![ast.statement(ast.identifier("x"), true)],
        );
        let class = ast.class_decl("C", ast.simple("Object")).with_attributes(vec![
            ast.attribute(Mode::Val, "f", ast.inferred(), literal),
            ast.attribute(Mode::Val, "g", ast.inferred(), ast.identifier("x")),
        ]);
        let root = ast.root("ns", vec![], class);

        let (_, _, references, diagnostics) = check(&root);
        assert_eq!(messages(&diagnostics), vec!["symbol not found: x"]);
        assert_eq!(references.len(), 1);
    }
}
