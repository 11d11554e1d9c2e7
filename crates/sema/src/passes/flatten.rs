//! Union and intersection normalization
//!
//! `(A | B) | C` becomes `(A | B | C)`, repeated members are dropped by
//! their rendering, and a composite left with a single member is replaced
//! by that member. Everything else is cloned unchanged.

use std::collections::HashSet;

use tracing::debug;

use super::Rewrite;
use crate::ast::{NodeIdGenerator, Root, TypeSpec, TypeSpecKind};
use crate::common::{Diagnostic, SemaError, SemaResult, Span};
use crate::validated::Validated;

pub struct Flattener<'a> {
    ids: &'a NodeIdGenerator,
}

impl<'a> Flattener<'a> {
    pub fn new(ids: &'a NodeIdGenerator) -> Self {
        Self { ids }
    }

    pub fn flatten(&self, root: &Root) -> SemaResult<Root> {
        let flat = self.root(root)?.into_result().map_err(unexpected)?;
        debug!(unit = flat.top_level.name(), "flattened types");
        Ok(flat)
    }

    /// Clone of a single type expression, flattened bottom-up
    pub fn flatten_spec(&self, spec: &TypeSpec) -> SemaResult<TypeSpec> {
        self.type_spec(spec)?.into_result().map_err(unexpected)
    }
}

impl Rewrite for Flattener<'_> {
    fn ids(&self) -> &NodeIdGenerator {
        self.ids
    }

    fn type_spec(&self, spec: &TypeSpec) -> SemaResult<Validated<TypeSpec>> {
        Ok(self.descend(spec)?.map(normalize))
    }
}

fn unexpected(diagnostics: Vec<Diagnostic>) -> SemaError {
    SemaError::unexpected_diagnostics("flattening", diagnostics.len())
}

/// Members of `member` when it is a composite of the same kind as its
/// parent, otherwise `member` itself
fn splice(member: TypeSpec, union: bool) -> Vec<TypeSpec> {
    match member.kind {
        TypeSpecKind::Union(members) if union => members,
        TypeSpecKind::Intersection(members) if !union => members,
        kind => vec![TypeSpec::new(member.context, kind)],
    }
}

/// Normalizes one composite whose members are already normalized
fn normalize(spec: TypeSpec) -> TypeSpec {
    let TypeSpec { context, kind } = spec;
    let (members, union) = match kind {
        TypeSpecKind::Union(members) => (members, true),
        TypeSpecKind::Intersection(members) => (members, false),
        kind => return TypeSpec::new(context, kind),
    };

    let mut seen = HashSet::new();
    let mut flat: Vec<TypeSpec> = members
        .into_iter()
        .flat_map(|member| splice(member, union))
        .filter(|member| seen.insert(member.to_string()))
        .collect();

    if flat.len() == 1 {
        let mut only = flat.remove(0);
        only.context.copy_from::<Span>(&context);
        return only;
    }

    let kind = if union {
        TypeSpecKind::Union(flat)
    } else {
        TypeSpecKind::Intersection(flat)
    };
    TypeSpec::new(context, kind)
}
