//! Entity indirection path walking.
//!
//! `Root.rel1.rel2.Field` starts at Model `Root`, follows each relation by
//! its declared name on the current Model (aliases are looked up on that
//! Model, hop by hop), and ends on a field of the last Model reached.

use schemata_core::graph::field::{Field, IndirectionPath, PathStep};
use schemata_core::graph::node::Model;

use crate::error::{ResolveError, Result};

/// A walked path plus the terminal field it lands on.
#[derive(Debug, Clone)]
pub struct Walk<'a> {
    pub path: IndirectionPath,
    pub terminal: &'a Field,
}

/// Walk `segments` over `models`. `entity` and `field` locate errors.
pub fn walk<'a>(
    models: &'a [Model],
    entity: &str,
    field: &str,
    segments: &[&str],
) -> Result<Walk<'a>> {
    let dotted = segments.join(".");
    let broken = |reason: String| ResolveError::BrokenIndirectionPath {
        declaration: entity.to_string(),
        field: field.to_string(),
        path: dotted.clone(),
        reason,
    };
    let find = |name: &str| models.iter().find(|m| m.name == name);

    let (root, rest) = match segments {
        [root, rest @ ..] if !rest.is_empty() => (*root, rest),
        _ => return Err(broken("a path needs a root model and a terminal field".into())),
    };
    let Some((terminal, hops)) = rest.split_last() else {
        return Err(broken("missing terminal field".into()));
    };

    let mut current = find(root).ok_or_else(|| broken(format!("unknown root model '{root}'")))?;
    let mut visited = vec![current.name.as_str()];
    let mut steps = Vec::with_capacity(hops.len());

    for hop in hops {
        let relation = current
            .relation(hop)
            .ok_or_else(|| broken(format!("model '{}' has no relation '{hop}'", current.name)))?;
        let target = relation.target_name().ok_or_else(|| {
            broken(format!(
                "relation '{}.{hop}' is polymorphic and has no single target",
                current.name
            ))
        })?;
        if visited.contains(&target) {
            return Err(ResolveError::CyclicIndirection {
                declaration: entity.to_string(),
                field: field.to_string(),
                path: dotted.clone(),
                model: target.to_string(),
            });
        }
        let next = find(target).ok_or_else(|| broken(format!("unknown model '{target}'")))?;
        steps.push(PathStep {
            relation: relation.name.clone(),
            kind: relation.kind,
            from: current.name.clone(),
            to: next.name.clone(),
        });
        visited.push(next.name.as_str());
        current = next;
    }

    let terminal_field = current
        .field(terminal)
        .ok_or_else(|| broken(format!("model '{}' has no field '{terminal}'", current.name)))?;

    Ok(Walk {
        path: IndirectionPath {
            root: root.to_string(),
            steps,
            terminal: terminal.to_string(),
        },
        terminal: terminal_field,
    })
}
