//! Key lookups shared by the backends.

use schemata_core::graph::field::{Field, FieldType};
use schemata_core::graph::node::Entity;
use schemata_core::ModelGraph;

/// Primary key fields of the Model or Entity `name`, in identifier order.
/// Subclasses report the key they inherit from their base.
pub(crate) fn primary_key<'a>(graph: &'a ModelGraph, name: &str) -> Vec<&'a Field> {
    match graph.model(name) {
        Some(model) => model.primary_fields(),
        None => graph
            .entity(name)
            .map(Entity::primary_fields)
            .unwrap_or_default(),
    }
}

/// The single key field of `name`, or why there is none.
pub(crate) fn single_key<'a>(graph: &'a ModelGraph, name: &str) -> Result<&'a Field, String> {
    let key = primary_key(graph, name);
    match key.as_slice() {
        [] => Err(format!("'{name}' has no primary identifier")),
        [field] => Ok(*field),
        _ => Err(format!("'{name}' has a composite primary identifier")),
    }
}

/// The key type shared by every candidate of a `For*Poly` relation.
pub(crate) fn shared_key_type(graph: &ModelGraph, candidates: &[&str]) -> Result<FieldType, String> {
    let mut shared: Option<&FieldType> = None;
    for candidate in candidates {
        let key = single_key(graph, candidate)?;
        match shared {
            None => shared = Some(&key.ty),
            Some(ty) if *ty == key.ty => {}
            Some(_) => {
                return Err(format!(
                    "candidates {} do not share one key type",
                    candidates.join(", ")
                ))
            }
        }
    }
    shared
        .cloned()
        .ok_or_else(|| "polymorphic relation has no candidates".to_string())
}

/// Whether `name` is the base of a hierarchy with at least one variant.
pub(crate) fn is_union(graph: &ModelGraph, name: &str) -> bool {
    graph.model(name).is_some_and(|m| m.is_base())
        && graph.hierarchy(name).is_some_and(|h| !h.variants.is_empty())
}
