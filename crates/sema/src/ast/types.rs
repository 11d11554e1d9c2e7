//! Type expressions

use std::fmt;

use crate::context::Context;

/// A type expression
#[derive(Debug, Clone)]
pub struct TypeSpec {
    pub context: Context,
    pub kind: TypeSpecKind,
}

#[derive(Debug, Clone)]
pub enum TypeSpecKind {
    /// Named type with optional type arguments: `List[A]`
    Simple {
        name: String,
        arguments: Vec<TypeSpec>,
    },
    /// Any of the members: `A | B`
    Union(Vec<TypeSpec>),
    /// All of the members: `A & B`
    Intersection(Vec<TypeSpec>),
    /// Function type: `(A, B): R`
    Function {
        arguments: Vec<TypeSpec>,
        return_type: Box<TypeSpec>,
    },
    /// Left for inference
    Inferred,
}

impl TypeSpec {
    pub fn new(context: Context, kind: TypeSpecKind) -> Self {
        Self { context, kind }
    }

    /// Name of a simple type reference
    pub fn simple_name(&self) -> Option<&str> {
        match &self.kind {
            TypeSpecKind::Simple { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Members of a union or intersection
    pub fn members(&self) -> Option<&[TypeSpec]> {
        match &self.kind {
            TypeSpecKind::Union(members) | TypeSpecKind::Intersection(members) => Some(members),
            _ => None,
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[TypeSpec], separator: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeSpecKind::Simple { name, arguments } => {
                f.write_str(name)?;
                if !arguments.is_empty() {
                    f.write_str("[")?;
                    write_list(f, arguments, ", ")?;
                    f.write_str("]")?;
                }
                Ok(())
            }
            TypeSpecKind::Union(members) => {
                f.write_str("(")?;
                write_list(f, members, " | ")?;
                f.write_str(")")
            }
            TypeSpecKind::Intersection(members) => {
                f.write_str("(")?;
                write_list(f, members, " & ")?;
                f.write_str(")")
            }
            TypeSpecKind::Function {
                arguments,
                return_type,
            } => {
                f.write_str("(")?;
                write_list(f, arguments, ", ")?;
                write!(f, "): {return_type}")
            }
            TypeSpecKind::Inferred => f.write_str("inferred"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{AstBuilder, NodeIdGenerator};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_forms() {
        let ids = NodeIdGenerator::new();
        let ast = AstBuilder::new(&ids);

        assert_eq!(ast.simple("A").to_string(), "A");
        assert_eq!(
            ast.simple_with("Map", vec![ast.simple("K"), ast.simple("V")]).to_string(),
            "Map[K, V]"
        );
        assert_eq!(
            ast.union(vec![ast.simple("A"), ast.intersection(vec![ast.simple("B"), ast.simple("C")])])
                .to_string(),
            "(A | (B & C))"
        );
        assert_eq!(
            ast.function_type(vec![ast.simple("A"), ast.simple("B")], ast.simple("R")).to_string(),
            "(A, B): R"
        );
        assert_eq!(ast.inferred().to_string(), "inferred");
    }

    #[test]
    fn test_accessors() {
        let ids = NodeIdGenerator::new();
        let ast = AstBuilder::new(&ids);

        assert_eq!(ast.simple("A").simple_name(), Some("A"));
        assert_eq!(ast.inferred().simple_name(), None);
        assert_eq!(ast.union(vec![ast.simple("A")]).members().map(<[_]>::len), Some(1));
        assert!(ast.simple("A").members().is_none());
    }
}
