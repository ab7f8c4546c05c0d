//! Relation canonicalization.
//!
//! Turns a raw relation type token into one of the eight canonical kinds and
//! resolves its target. The declared name is always kept; `aliased` only
//! redirects the target.

use schemata_core::decl::{DeclKind, RelationDecl};
use schemata_core::graph::relation::{Relation, RelationTarget};
use schemata_core::types::{Ownership, RelationKind, RelationShape};
use schemata_core::SchemaRegistry;

use crate::error::ResolveError;

fn malformed(owner: &str, decl: &RelationDecl, detail: impl Into<String>) -> ResolveError {
    ResolveError::MalformedRelation {
        declaration: owner.to_string(),
        relation: decl.name.clone(),
        detail: detail.into(),
    }
}

/// Canonicalize `decl` declared on `owner`. Targets are looked up in the
/// namespace of `target_kind` (Models for models, Entities for entities).
pub fn canonicalize(
    registry: &SchemaRegistry,
    owner: &str,
    target_kind: DeclKind,
    decl: &RelationDecl,
) -> Result<Relation, Vec<ResolveError>> {
    let shape = RelationShape::parse(&decl.kind).ok_or_else(|| {
        vec![malformed(
            owner,
            decl,
            format!("unknown relation type '{}'", decl.kind),
        )]
    })?;
    let kind = RelationKind::from_shape(shape);

    let mut problems = Vec::new();
    if !decl.candidates.is_empty() && kind != RelationKind::ForOnePoly && kind != RelationKind::ForManyPoly {
        problems.push(malformed(owner, decl, format!("'for' is only valid on For*Poly, not {kind}")));
    }
    if decl.through.is_some() && !(kind.is_polymorphic() && kind.ownership() == Ownership::Has) {
        problems.push(malformed(owner, decl, format!("'through' is only valid on Has*Poly, not {kind}")));
    }
    if !problems.is_empty() {
        return Err(problems);
    }

    let missing = |name: &str| ResolveError::UnknownDeclaration {
        declaration: owner.to_string(),
        member: decl.name.clone(),
        kind: target_kind,
        name: name.to_string(),
    };

    let target = if kind.is_polymorphic() && kind.ownership() == Ownership::For {
        if decl.aliased.is_some() {
            return Err(vec![malformed(owner, decl, "'aliased' is not valid on For*Poly")]);
        }
        if decl.candidates.is_empty() {
            return Err(vec![malformed(owner, decl, "For*Poly requires a non-empty 'for' list")]);
        }
        let unknown: Vec<_> = decl
            .candidates
            .iter()
            .filter(|c| !registry.contains(target_kind, c))
            .map(|c| missing(c))
            .collect();
        if !unknown.is_empty() {
            return Err(unknown);
        }
        RelationTarget::Candidates(decl.candidates.clone())
    } else {
        if kind.is_polymorphic() && decl.through.is_none() {
            return Err(vec![malformed(owner, decl, format!("{kind} requires 'through'"))]);
        }
        let name = decl.aliased.as_deref().unwrap_or(&decl.name);
        if !registry.contains(target_kind, name) {
            return Err(vec![missing(name)]);
        }
        RelationTarget::Single(name.to_string())
    };

    let mut relation = Relation::new(decl.name.clone(), kind, target);
    relation.through = decl.through.clone();
    relation.aliased = decl.aliased.is_some();
    relation.unique = decl.unique;
    Ok(relation)
}
