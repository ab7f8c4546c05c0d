//! Entity indirection paths must still hold against the graph: every step
//! names an existing relation between the recorded Models, and the terminal
//! field exists with the type the entity field carries.

use schemata_core::graph::field::Field;
use schemata_core::ModelGraph;

use crate::rule::{Check, Rule, Violation};

#[derive(Debug)]
pub struct EntityPathCheck;

fn path_problem(graph: &ModelGraph, field: &Field) -> Option<String> {
    let path = field.source.as_ref()?;
    if graph.model(&path.root).is_none() {
        return Some(format!("root model '{}' does not exist", path.root));
    }
    let mut current = path.root.as_str();
    for step in &path.steps {
        if step.from != current {
            return Some(format!("step '{}' does not start at '{current}'", step.relation));
        }
        let rel = graph.model(&step.from).and_then(|m| m.relation(&step.relation));
        match rel {
            Some(r) if r.target_name() == Some(step.to.as_str()) => {}
            _ => {
                return Some(format!(
                    "'{}' has no relation '{}' to '{}'",
                    step.from, step.relation, step.to
                ))
            }
        }
        current = step.to.as_str();
    }
    match graph.model(current).and_then(|m| m.field(&path.terminal)) {
        Some(terminal) if terminal.ty == field.ty => None,
        Some(_) => Some(format!("terminal field '{}' changed type", path.terminal)),
        None => Some(format!("'{current}' has no field '{}'", path.terminal)),
    }
}

impl Check for EntityPathCheck {
    fn name(&self) -> &str {
        "entity-paths"
    }

    fn run(&self, graph: &ModelGraph, out: &mut Vec<Violation>) {
        for entity in graph.entities() {
            for field in &entity.fields {
                if let Some(problem) = path_problem(graph, field) {
                    let dotted = field.source.as_ref().map(|p| p.dotted()).unwrap_or_default();
                    out.push(
                        Violation::new(
                            &entity.name,
                            Rule::BrokenIndirectionPath,
                            format!("path '{dotted}': {problem}"),
                        )
                        .at(&field.name),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemata_core::builder::GraphBuilder;
    use schemata_core::graph::field::{FieldType, IndirectionPath, PathStep};
    use schemata_core::graph::node::{Entity, Model};
    use schemata_core::graph::relation::{Relation, RelationTarget};
    use schemata_core::types::{AtomicType, RelationKind};

    fn graph_with(entity_field: Field) -> ModelGraph {
        let mut person = Model::new("Person");
        person.relations.push(Relation::new(
            "ContactInfo",
            RelationKind::HasOne,
            RelationTarget::Single("ContactInfo".into()),
        ));
        let mut info = Model::new("ContactInfo");
        info.fields.push(Field::atomic("Email", AtomicType::String));
        let mut card = Entity::new("Card");
        card.fields.push(entity_field);
        GraphBuilder::new().model(person).model(info).entity(card).build()
    }

    fn sourced(relation: &str, terminal: &str, ty: FieldType) -> Field {
        let mut f = Field::new("Email", ty);
        f.source = Some(IndirectionPath {
            root: "Person".into(),
            steps: vec![PathStep {
                relation: relation.into(),
                kind: RelationKind::HasOne,
                from: "Person".into(),
                to: "ContactInfo".into(),
            }],
            terminal: terminal.into(),
        });
        f
    }

    #[test]
    fn intact_path_passes() {
        let graph = graph_with(sourced("ContactInfo", "Email", FieldType::Atomic(AtomicType::String)));
        let mut out = Vec::new();
        EntityPathCheck.run(&graph, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn stale_steps_are_reported() {
        for field in [
            sourced("Contact", "Email", FieldType::Atomic(AtomicType::String)),
            sourced("ContactInfo", "Phone", FieldType::Atomic(AtomicType::String)),
            sourced("ContactInfo", "Email", FieldType::Atomic(AtomicType::Integer)),
        ] {
            let graph = graph_with(field);
            let mut out = Vec::new();
            EntityPathCheck.run(&graph, &mut out);
            assert_eq!(out.len(), 1);
            assert_eq!(out[0].rule, Rule::BrokenIndirectionPath);
        }
    }
}
