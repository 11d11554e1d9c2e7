//! Tree rewriting with fresh node ids
//!
//! Every default method rebuilds its node unchanged apart from a new id,
//! keeping the old context entries through [`Context::derive`]. Type
//! expressions go through [`Rewrite::type_spec`], the one hook a pass has
//! to provide. Diagnostics from all branches are accumulated.

use crate::ast::{
    Attribute, ClassDecl, FunctionValue, Method, MethodSignature, NodeIdGenerator, Parameter,
    Reference, Root, Statement, TopLevel, TypeDecl, TypeParameter, TypeSpec, TypeSpecKind, Use,
    Value, ValueKind,
};
use crate::common::SemaResult;
use crate::context::Context;
use crate::validated::Validated;

pub trait Rewrite {
    fn ids(&self) -> &NodeIdGenerator;

    fn type_spec(&self, spec: &TypeSpec) -> SemaResult<Validated<TypeSpec>>;

    fn context(&self, context: &Context) -> Context {
        context.derive(self.ids().next())
    }

    /// Rebuilds `spec` around rewritten children
    fn descend(&self, spec: &TypeSpec) -> SemaResult<Validated<TypeSpec>> {
        let context = self.context(&spec.context);
        let kind = match &spec.kind {
            TypeSpecKind::Simple { name, arguments } => {
                self.type_specs(arguments)?
                    .map(|arguments| TypeSpecKind::Simple {
                        name: name.clone(),
                        arguments,
                    })
            }
            TypeSpecKind::Union(members) => self.type_specs(members)?.map(TypeSpecKind::Union),
            TypeSpecKind::Intersection(members) => {
                self.type_specs(members)?.map(TypeSpecKind::Intersection)
            }
            TypeSpecKind::Function {
                arguments,
                return_type,
            } => self
                .type_specs(arguments)?
                .combine(self.type_spec(return_type)?)
                .map(|(arguments, return_type)| TypeSpecKind::Function {
                    arguments,
                    return_type: Box::new(return_type),
                }),
            TypeSpecKind::Inferred => Validated::Valid(TypeSpecKind::Inferred),
        };
        Ok(kind.map(|kind| TypeSpec::new(context, kind)))
    }

    fn type_specs(&self, specs: &[TypeSpec]) -> SemaResult<Validated<Vec<TypeSpec>>> {
        specs.iter().map(|spec| self.type_spec(spec)).collect()
    }

    fn root(&self, root: &Root) -> SemaResult<Validated<Root>> {
        let context = self.context(&root.context);
        let uses: Vec<Use> = root
            .uses
            .iter()
            .map(|use_| Use {
                context: self.context(&use_.context),
                ..use_.clone()
            })
            .collect();
        let top_level = match &root.top_level {
            TopLevel::Type(decl) => self.type_decl(decl)?.map(TopLevel::Type),
            TopLevel::Class(decl) => self.class_decl(decl)?.map(TopLevel::Class),
        };
        Ok(top_level.map(|top_level| Root {
            context,
            namespace: root.namespace.clone(),
            uses,
            top_level,
        }))
    }

    fn type_decl(&self, decl: &TypeDecl) -> SemaResult<Validated<TypeDecl>> {
        let context = self.context(&decl.context);
        let type_parameters = self.type_parameters(&decl.type_parameters);
        let super_type = self.type_spec(&decl.super_type)?;
        let methods: Validated<Vec<MethodSignature>> = decl
            .methods
            .iter()
            .map(|signature| self.signature(signature))
            .collect::<SemaResult<_>>()?;
        Ok(super_type
            .combine(methods)
            .map(|(super_type, methods)| TypeDecl {
                context,
                visibility: decl.visibility,
                name: decl.name.clone(),
                type_parameters,
                super_type,
                methods,
            }))
    }

    fn class_decl(&self, decl: &ClassDecl) -> SemaResult<Validated<ClassDecl>> {
        let context = self.context(&decl.context);
        let type_parameters = self.type_parameters(&decl.type_parameters);
        let super_type = self.type_spec(&decl.super_type)?;
        let methods: Validated<Vec<Method>> = decl
            .methods
            .iter()
            .map(|method| self.method(method))
            .collect::<SemaResult<_>>()?;
        let attributes: Validated<Vec<Attribute>> = decl
            .attributes
            .iter()
            .map(|attribute| self.attribute(attribute))
            .collect::<SemaResult<_>>()?;
        Ok(super_type
            .combine(methods)
            .combine(attributes)
            .map(|((super_type, methods), attributes)| ClassDecl {
                context,
                visibility: decl.visibility,
                name: decl.name.clone(),
                type_parameters,
                super_type,
                methods,
                attributes,
            }))
    }

    fn type_parameters(&self, type_parameters: &[TypeParameter]) -> Vec<TypeParameter> {
        type_parameters
            .iter()
            .map(|type_parameter| TypeParameter {
                context: self.context(&type_parameter.context),
                name: type_parameter.name.clone(),
            })
            .collect()
    }

    fn parameters(&self, parameters: &[Parameter]) -> SemaResult<Validated<Vec<Parameter>>> {
        parameters
            .iter()
            .map(|parameter| {
                let context = self.context(&parameter.context);
                Ok(self.type_spec(&parameter.ty)?.map(|ty| Parameter {
                    context,
                    name: parameter.name.clone(),
                    ty,
                }))
            })
            .collect()
    }

    fn signature(&self, signature: &MethodSignature) -> SemaResult<Validated<MethodSignature>> {
        let context = self.context(&signature.context);
        let type_parameters = self.type_parameters(&signature.type_parameters);
        let parameters = self.parameters(&signature.parameters)?;
        let return_type = self.type_spec(&signature.return_type)?;
        Ok(parameters
            .combine(return_type)
            .map(|(parameters, return_type)| MethodSignature {
                context,
                visibility: signature.visibility,
                name: signature.name.clone(),
                type_parameters,
                parameters,
                return_type,
            }))
    }

    fn method(&self, method: &Method) -> SemaResult<Validated<Method>> {
        let context = self.context(&method.context);
        let signature = self.signature(&method.signature)?;
        let statements = self.statements(&method.statements)?;
        Ok(signature
            .combine(statements)
            .map(|(signature, statements)| Method {
                context,
                signature,
                statements,
            }))
    }

    fn attribute(&self, attribute: &Attribute) -> SemaResult<Validated<Attribute>> {
        let context = self.context(&attribute.context);
        let ty = self.type_spec(&attribute.ty)?;
        let value = self.value(&attribute.value)?;
        Ok(ty.combine(value).map(|(ty, value)| Attribute {
            context,
            mode: attribute.mode,
            name: attribute.name.clone(),
            ty,
            value,
        }))
    }

    fn statements(&self, statements: &[Statement]) -> SemaResult<Validated<Vec<Statement>>> {
        statements
            .iter()
            .map(|statement| {
                let context = self.context(&statement.context);
                Ok(self.value(&statement.value)?.map(|value| Statement {
                    context,
                    value,
                    last: statement.last,
                }))
            })
            .collect()
    }

    fn reference(&self, reference: &Reference) -> Reference {
        Reference {
            context: self.context(&reference.context),
            ..reference.clone()
        }
    }

    fn values(&self, values: &[Value]) -> SemaResult<Validated<Vec<Value>>> {
        values.iter().map(|value| self.value(value)).collect()
    }

    fn value(&self, value: &Value) -> SemaResult<Validated<Value>> {
        let context = self.context(&value.context);
        let kind = match &value.kind {
            ValueKind::String(_) | ValueKind::Number(_) | ValueKind::Boolean(_) | ValueKind::None => {
                Validated::Valid(value.kind.clone())
            }
            ValueKind::Identifier(reference) => {
                Validated::Valid(ValueKind::Identifier(self.reference(reference)))
            }
            ValueKind::NewAssignment {
                mode,
                name,
                ty,
                value,
            } => self
                .type_spec(ty)?
                .combine(self.value(value)?)
                .map(|(ty, value)| ValueKind::NewAssignment {
                    mode: *mode,
                    name: name.clone(),
                    ty,
                    value: Box::new(value),
                }),
            ValueKind::DirectAssignment { reference, value } => {
                let reference = self.reference(reference);
                self.value(value)?
                    .map(|value| ValueKind::DirectAssignment {
                        reference,
                        value: Box::new(value),
                    })
            }
            ValueKind::IndirectAssignment {
                indirect,
                reference,
                value,
            } => {
                let indirect = self.value(indirect)?;
                let reference = self.reference(reference);
                indirect
                    .combine(self.value(value)?)
                    .map(|(indirect, value)| ValueKind::IndirectAssignment {
                        indirect: Box::new(indirect),
                        reference,
                        value: Box::new(value),
                    })
            }
            ValueKind::MethodCall {
                method,
                type_arguments,
                arguments,
            } => {
                let method = self.reference(method);
                self.type_specs(type_arguments)?
                    .combine(self.values(arguments)?)
                    .map(|(type_arguments, arguments)| ValueKind::MethodCall {
                        method,
                        type_arguments,
                        arguments,
                    })
            }
            ValueKind::Nested { outer, inner } => self
                .value(outer)?
                .combine(self.value(inner)?)
                .map(|(outer, inner)| ValueKind::Nested {
                    outer: Box::new(outer),
                    inner: Box::new(inner),
                }),
            ValueKind::Function(function) => self.function(function)?.map(ValueKind::Function),
        };
        Ok(kind.map(|kind| Value::new(context, kind)))
    }

    fn function(&self, function: &FunctionValue) -> SemaResult<Validated<FunctionValue>> {
        let type_parameters = self.type_parameters(&function.type_parameters);
        let parameters = self.parameters(&function.parameters)?;
        let return_type = self.type_spec(&function.return_type)?;
        let statements = self.statements(&function.statements)?;
        Ok(parameters.combine(return_type).combine(statements).map(
            |((parameters, return_type), statements)| FunctionValue {
                type_parameters,
                parameters,
                return_type: Box::new(return_type),
                statements,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBuilder, Mode, Node};
    use crate::common::{Diagnostic, Span};
    use crate::context::Origin;
    use crate::visit::{self, NodeRef};
    use pretty_assertions::assert_eq;

    struct Identity<'a>(&'a NodeIdGenerator);

    impl Rewrite for Identity<'_> {
        fn ids(&self) -> &NodeIdGenerator {
            self.0
        }

        fn type_spec(&self, spec: &TypeSpec) -> SemaResult<Validated<TypeSpec>> {
            self.descend(spec)
        }
    }

    /// Rejects every simple type whose name starts with `Bad`
    struct RejectBad<'a>(&'a NodeIdGenerator);

    impl Rewrite for RejectBad<'_> {
        fn ids(&self) -> &NodeIdGenerator {
            self.0
        }

        fn type_spec(&self, spec: &TypeSpec) -> SemaResult<Validated<TypeSpec>> {
            match spec.simple_name() {
                Some(name) if name.starts_with("Bad") => Ok(Validated::error(
                    Diagnostic::symbol_not_found(name, &spec.context),
                )),
                _ => self.descend(spec),
            }
        }
    }

    fn class_unit(ast: &AstBuilder<'_>) -> Root {
        let body = vec![
            ast.statement(
                ast.new_assignment(Mode::Val, "x", ast.simple("A"), ast.number("1")),
                false,
            ),
            ast.statement(
                ast.method_call("put", vec![ast.simple("A")], vec![ast.identifier("x")]),
                true,
            ),
        ];
        let method = ast.method(
            ast.signature("run", vec![ast.parameter("a", ast.simple("A"))], ast.simple("None")),
            body,
        );
        let attribute = ast.attribute(
            Mode::Var,
            "f",
            ast.inferred(),
            ast.function(vec![], vec![], ast.simple("A"), vec![]),
        );
        let decl = ast
            .class_decl("C", ast.union(vec![ast.simple("A"), ast.simple("B")]))
            .with_methods(vec![method])
            .with_attributes(vec![attribute]);
        ast.root("ns", vec![ast.use_("lang.Object")], decl)
    }

    fn ids_of(root: &Root) -> Vec<crate::ast::NodeId> {
        visit::flat_map(NodeRef::Root(root), |node| vec![node.id()])
    }

    #[test]
    fn test_identity_rewrite_renumbers_every_node() {
        let ids = NodeIdGenerator::new();
        let ast = AstBuilder::new(&ids);
        let root = class_unit(&ast);

        let Validated::Valid(copy) = Identity(&ids).root(&root).unwrap() else {
            panic!("identity rewrite failed");
        };

        let before = ids_of(&root);
        let after = ids_of(&copy);
        assert_eq!(before.len(), after.len());
        assert!(after.iter().all(|id| !before.contains(id)));
        assert_eq!(copy.top_level.name(), "C");
        assert_eq!(copy.uses[0].from, "lang.Object");
        assert_eq!(copy.context.get::<Origin>(), Some(&Origin(root.id())));
    }

    #[test]
    fn test_rewrite_keeps_context_entries() {
        let ids = NodeIdGenerator::new();
        let ast = AstBuilder::new(&ids);
        let span = Span::new(0, 4).with_position(1, 1);
        let root = ast.root("ns", vec![], ast.type_decl("T", ast.simple("A").at(span)));

        let Validated::Valid(copy) = Identity(&ids).root(&root).unwrap() else {
            panic!("identity rewrite failed");
        };
        let TopLevel::Type(decl) = &copy.top_level else {
            panic!("expected type");
        };
        assert_eq!(decl.super_type.span(), Some(span));
        assert_eq!(decl.super_type.to_string(), "A");
    }

    #[test]
    fn test_diagnostics_from_all_branches_are_kept() {
        let ids = NodeIdGenerator::new();
        let ast = AstBuilder::new(&ids);
        let method = ast.method(
            ast.signature("run", vec![ast.parameter("a", ast.simple("BadOne"))], ast.simple("A")),
            vec![ast.statement(
                ast.new_assignment(Mode::Var, "x", ast.simple("BadTwo"), ast.none()),
                true,
            )],
        );
        let decl = ast
            .class_decl("C", ast.simple("BadSuper"))
            .with_methods(vec![method]);
        let root = ast.root("ns", vec![], decl);

        let result = RejectBad(&ids).root(&root).unwrap();
        let messages: Vec<&str> = result.errors().iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "symbol not found: BadSuper",
                "symbol not found: BadOne",
                "symbol not found: BadTwo",
            ]
        );
    }
}
