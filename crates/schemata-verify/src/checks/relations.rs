//! Relation rules: targets exist, polymorphic interfaces exist on their
//! targets, and `HasMany` inverses are unambiguous.

use schemata_core::graph::relation::Relation;
use schemata_core::types::{Ownership, RelationKind};
use schemata_core::ModelGraph;

use crate::rule::{Check, Rule, Violation};

#[derive(Debug)]
pub struct RelationCheck;

fn check_model_relation(graph: &ModelGraph, owner: &str, rel: &Relation, out: &mut Vec<Violation>) {
    for target in rel.targets() {
        if graph.model(target).is_none() {
            out.push(
                Violation::new(
                    owner,
                    Rule::DanglingRelationTarget,
                    format!("{} target '{target}' is not a model", rel.kind),
                )
                .at(&rel.name),
            );
        }
    }

    if rel.kind.is_polymorphic() && rel.ownership() == Ownership::Has {
        if let (Some(target), Some(through)) = (rel.target_name(), rel.through.as_deref()) {
            if graph.model(target).is_some() {
                let owner_listed = graph
                    .interface(target, through)
                    .is_some_and(|iface| iface.targets().contains(&owner));
                if !owner_listed {
                    out.push(
                        Violation::new(
                            owner,
                            Rule::DanglingInterface,
                            format!(
                                "'{target}' has no polymorphic interface '{through}' listing '{owner}'"
                            ),
                        )
                        .at(&rel.name),
                    );
                }
            }
        }
    }

    if rel.kind == RelationKind::HasMany {
        if let Some(target) = rel.target_name() {
            let back = graph.back_references(target, owner);
            if back.len() > 1 {
                let names: Vec<_> = back.iter().map(|r| r.name.as_str()).collect();
                out.push(
                    Violation::new(
                        owner,
                        Rule::AmbiguousAliasTarget,
                        format!(
                            "'{target}' points back at '{owner}' through several relations ({})",
                            names.join(", ")
                        ),
                    )
                    .at(&rel.name),
                );
            }
        }
    }
}

impl Check for RelationCheck {
    fn name(&self) -> &str {
        "relations"
    }

    fn run(&self, graph: &ModelGraph, out: &mut Vec<Violation>) {
        for model in graph.models() {
            for rel in model.own_relations() {
                check_model_relation(graph, &model.name, rel, out);
            }
        }
        for entity in graph.entities() {
            for rel in &entity.relations {
                for target in rel.targets() {
                    if graph.entity(target).is_none() {
                        out.push(
                            Violation::new(
                                &entity.name,
                                Rule::DanglingRelationTarget,
                                format!("{} target '{target}' is not an entity", rel.kind),
                            )
                            .at(&rel.name),
                        );
                    }
                }
            }
        }
    }
}
