//! Identifier rules: exactly one `primary`, unique names, existing fields.

use schemata_core::graph::field::{Field, Identifier};
use schemata_core::ModelGraph;

use crate::rule::{Check, Rule, Violation};

#[derive(Debug)]
pub struct IdentifierCheck;

fn check_owner(owner: &str, fields: &[Field], identifiers: &[Identifier], out: &mut Vec<Violation>) {
    if !identifiers.iter().any(Identifier::is_primary) {
        out.push(Violation::new(
            owner,
            Rule::MissingPrimaryIdentifier,
            "no identifier named 'primary'",
        ));
    }

    for (i, id) in identifiers.iter().enumerate() {
        if identifiers[..i].iter().any(|prev| prev.name == id.name) {
            out.push(
                Violation::new(
                    owner,
                    Rule::DuplicateIdentifier,
                    format!("identifier '{}' declared more than once", id.name),
                )
                .at(&id.name),
            );
        }
        if id.fields.is_empty() {
            out.push(
                Violation::new(
                    owner,
                    Rule::UnknownIdentifierField,
                    format!("identifier '{}' lists no fields", id.name),
                )
                .at(&id.name),
            );
        }
        for field in &id.fields {
            if !fields.iter().any(|f| &f.name == field) {
                out.push(
                    Violation::new(
                        owner,
                        Rule::UnknownIdentifierField,
                        format!("identifier '{}' names unknown field '{field}'", id.name),
                    )
                    .at(&id.name),
                );
            }
        }
    }
}

impl Check for IdentifierCheck {
    fn name(&self) -> &str {
        "identifiers"
    }

    fn run(&self, graph: &ModelGraph, out: &mut Vec<Violation>) {
        for model in graph.models() {
            check_owner(&model.name, &model.fields, &model.identifiers, out);
        }
        for entity in graph.entities() {
            check_owner(&entity.name, &entity.fields, &entity.identifiers, out);
        }
    }
}
