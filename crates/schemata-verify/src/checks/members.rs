//! Member name uniqueness within one declaration.

use schemata_core::ModelGraph;

use crate::rule::{Check, Rule, Violation};

#[derive(Debug)]
pub struct MemberCheck;

fn check_names<'a>(owner: &str, names: impl Iterator<Item = &'a str>, out: &mut Vec<Violation>) {
    let mut seen: Vec<&str> = Vec::new();
    for name in names {
        if seen.contains(&name) {
            out.push(
                Violation::new(
                    owner,
                    Rule::DuplicateMember,
                    format!("member '{name}' declared more than once"),
                )
                .at(name),
            );
        } else {
            seen.push(name);
        }
    }
}

impl Check for MemberCheck {
    fn name(&self) -> &str {
        "members"
    }

    fn run(&self, graph: &ModelGraph, out: &mut Vec<Violation>) {
        for m in graph.models() {
            let names = m
                .fields
                .iter()
                .map(|f| f.name.as_str())
                .chain(m.relations.iter().map(|r| r.name.as_str()));
            check_names(&m.name, names, out);
        }
        for e in graph.entities() {
            let names = e
                .fields
                .iter()
                .map(|f| f.name.as_str())
                .chain(e.relations.iter().map(|r| r.name.as_str()));
            check_names(&e.name, names, out);
        }
        for s in graph.structures() {
            check_names(&s.name, s.fields.iter().map(|f| f.name.as_str()), out);
        }
        for e in graph.enums() {
            check_names(&e.name, e.entries.iter().map(|v| v.symbol.as_str()), out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemata_core::decl::{FieldDecl, ModelDecl, RelationDecl};
    use schemata_core::DeclarationSet;
    use schemata_resolve::resolve_set;

    #[test]
    fn field_and_relation_sharing_a_name() {
        let set = DeclarationSet::new()
            .with(
                ModelDecl::new("Person")
                    .field(FieldDecl::new("ID", "UUID"))
                    .field(FieldDecl::new("Address", "String"))
                    .primary(&["ID"])
                    .relation(RelationDecl::new("Address", "HasOne")),
            )
            .with(ModelDecl::new("Address"));
        let graph = resolve_set(&set).graph;
        let mut out = Vec::new();
        MemberCheck.run(&graph, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].rule, Rule::DuplicateMember);
        assert_eq!(out[0].context.as_deref(), Some("Address"));
    }

    #[test]
    fn subclass_redeclaring_base_field() {
        let set = DeclarationSet::new()
            .with(
                ModelDecl::new("Animal")
                    .field(FieldDecl::new("ID", "UUID"))
                    .field(FieldDecl::new("Name", "String"))
                    .primary(&["ID"])
                    .discriminator("Kind"),
            )
            .with(
                ModelDecl::new("Dog")
                    .field(FieldDecl::new("Name", "String"))
                    .extends("Animal", "dog"),
            );
        let graph = resolve_set(&set).graph;
        let mut out = Vec::new();
        MemberCheck.run(&graph, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].declaration, "Dog");
    }
}
