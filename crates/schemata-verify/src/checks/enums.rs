//! Enum rules and enum references.

use schemata_core::graph::field::Field;
use schemata_core::ModelGraph;

use crate::rule::{Check, Rule, Violation};

#[derive(Debug)]
pub struct EnumCheck;

fn check_references(graph: &ModelGraph, owner: &str, fields: &[Field], out: &mut Vec<Violation>) {
    for field in fields {
        if let Some(name) = field.ty.as_enum() {
            if graph.enum_def(name).is_none() {
                out.push(
                    Violation::new(owner, Rule::UnknownEnumReference, format!("unknown enum '{name}'"))
                        .at(&field.name),
                );
            }
        }
    }
}

impl Check for EnumCheck {
    fn name(&self) -> &str {
        "enums"
    }

    fn run(&self, graph: &ModelGraph, out: &mut Vec<Violation>) {
        for e in graph.enums() {
            if e.entries.is_empty() {
                out.push(Violation::new(&e.name, Rule::EmptyEnum, "enum declares no values"));
            }
            for (i, entry) in e.entries.iter().enumerate() {
                if e.entries[..i].iter().any(|prev| prev.value == entry.value) {
                    out.push(
                        Violation::new(
                            &e.name,
                            Rule::DuplicateEnumValue,
                            format!("value '{}' is used by more than one symbol", entry.value),
                        )
                        .at(&entry.symbol),
                    );
                }
                if !e.repr.accepts(&entry.value) {
                    out.push(
                        Violation::new(
                            &e.name,
                            Rule::EnumReprMismatch,
                            format!("value '{}' is not a valid {}", entry.value, e.repr.atomic()),
                        )
                        .at(&entry.symbol),
                    );
                }
            }
        }

        for m in graph.models() {
            check_references(graph, &m.name, &m.fields, out);
        }
        for e in graph.entities() {
            check_references(graph, &e.name, &e.fields, out);
        }
        for s in graph.structures() {
            check_references(graph, &s.name, &s.fields, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemata_core::decl::EnumDecl;
    use schemata_core::types::EnumRepr;
    use schemata_core::DeclarationSet;
    use schemata_resolve::resolve_set;

    fn run(set: DeclarationSet) -> Vec<Violation> {
        let graph = resolve_set(&set).graph;
        let mut out = Vec::new();
        EnumCheck.run(&graph, &mut out);
        out
    }

    #[test]
    fn well_formed_enum_passes() {
        let set = DeclarationSet::new().with(
            EnumDecl::new("Nationality", EnumRepr::String)
                .entry("US", "American")
                .entry("DE", "German"),
        );
        assert!(run(set).is_empty());
    }

    #[test]
    fn duplicate_values() {
        let set = DeclarationSet::new().with(
            EnumDecl::new("Nationality", EnumRepr::String)
                .entry("US", "American")
                .entry("USA", "American"),
        );
        let out = run(set);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].rule, Rule::DuplicateEnumValue);
        assert_eq!(out[0].context.as_deref(), Some("USA"));
    }

    #[test]
    fn empty_and_mismatched() {
        let set = DeclarationSet::new()
            .with(EnumDecl::new("Nothing", EnumRepr::String))
            .with(EnumDecl::new("Level", EnumRepr::Integer).entry("Low", "1").entry("High", "lots"));
        let rules: Vec<_> = run(set).into_iter().map(|v| v.rule).collect();
        assert_eq!(rules, vec![Rule::EmptyEnum, Rule::EnumReprMismatch]);
    }
}
