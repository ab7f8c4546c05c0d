//! Polymorphic hierarchy rules.

use schemata_core::ModelGraph;

use crate::rule::{Check, Rule, Violation};

#[derive(Debug)]
pub struct PolymorphismCheck;

impl Check for PolymorphismCheck {
    fn name(&self) -> &str {
        "polymorphism"
    }

    fn run(&self, graph: &ModelGraph, out: &mut Vec<Violation>) {
        for h in graph.hierarchies() {
            let base = graph.model(&h.base);

            if h.discriminator.is_none() {
                let reason = if base.is_some() {
                    format!("base '{}' declares no polymorphic discriminator", h.base)
                } else {
                    format!("base '{}' does not exist", h.base)
                };
                for v in &h.variants {
                    out.push(Violation::new(&v.model, Rule::DanglingPolymorphicBase, reason.clone()));
                }
            }

            if base.is_some_and(|b| b.is_subclass()) {
                out.push(Violation::new(
                    &h.base,
                    Rule::NestedHierarchy,
                    format!("'{}' is a subclass and cannot also be a polymorphic base", h.base),
                ));
            }

            for (i, v) in h.variants.iter().enumerate() {
                let Some(identity) = v.identity.as_deref() else {
                    out.push(Violation::new(
                        &v.model,
                        Rule::MissingIdentity,
                        format!("subclass of '{}' declares no polymorphic identity", h.base),
                    ));
                    continue;
                };
                if let Some(first) = h.variants[..i]
                    .iter()
                    .find(|prev| prev.identity.as_deref() == Some(identity))
                {
                    out.push(Violation::new(
                        &v.model,
                        Rule::DuplicateIdentity,
                        format!(
                            "identity '{identity}' already selects '{}' in hierarchy '{}'",
                            first.model, h.base
                        ),
                    ));
                }
            }
        }
    }
}
