//! Polymorphic hierarchy resolution: discriminator synthesis, member
//! inheritance, and base → subclasses grouping.

use schemata_core::decl::ModelDecl;
use schemata_core::graph::field::Field;
use schemata_core::graph::node::{Hierarchy, Model, Polymorphism, Variant};
use schemata_core::types::AtomicType;
use tracing::debug;

/// Set the polymorphic role of `model` from its declaration. A base whose
/// discriminator is not one of its fields gets a required `String` field.
pub fn assign_role(model: &mut Model, decl: &ModelDecl) {
    if let Some(base) = &decl.extends {
        model.polymorphism = Polymorphism::Subclass {
            base: base.clone(),
            identity: decl.identity().map(str::to_string),
        };
    } else if let Some(discriminator) = decl.discriminator_field() {
        if model.field(discriminator).is_none() {
            debug!(model = %model.name, %discriminator, "synthesizing discriminator field");
            model
                .fields
                .push(Field::atomic(discriminator, AtomicType::String));
        }
        model.polymorphism = Polymorphism::Base {
            discriminator: discriminator.to_string(),
        };
    }
}

/// Copy each existing base's own members into its subclasses. Inherited
/// members come first and are flagged.
pub fn inherit(models: &mut [Model]) {
    for i in 0..models.len() {
        let Some(base_name) = models[i].base().map(str::to_string) else {
            continue;
        };
        let Some(base) = models.iter().find(|m| m.name == base_name && m.name != models[i].name)
        else {
            continue;
        };
        let fields: Vec<_> = base.own_fields().map(Field::inherit).collect();
        let relations: Vec<_> = base.own_relations().map(|r| r.inherit()).collect();
        let identifiers = base.identifiers.clone();

        let sub = &mut models[i];
        sub.fields.splice(0..0, fields);
        sub.relations.splice(0..0, relations);
        let own_identifiers = std::mem::replace(&mut sub.identifiers, identifiers);
        sub.identifiers.extend(own_identifiers);
    }
}

/// Group subclasses by base. Every base declaring a discriminator gets a
/// hierarchy even without subclasses; bases that are missing or declare no
/// discriminator get one with `discriminator: None`.
pub fn group(models: &[Model]) -> Vec<Hierarchy> {
    let mut hierarchies: Vec<Hierarchy> = models
        .iter()
        .filter_map(|m| {
            m.discriminator().map(|d| Hierarchy {
                base: m.name.clone(),
                discriminator: Some(d.to_string()),
                variants: Vec::new(),
            })
        })
        .collect();

    for model in models {
        let Polymorphism::Subclass { base, identity } = &model.polymorphism else {
            continue;
        };
        let variant = Variant {
            identity: identity.clone(),
            model: model.name.clone(),
        };
        match hierarchies.iter_mut().find(|h| &h.base == base) {
            Some(h) => h.variants.push(variant),
            None => hierarchies.push(Hierarchy {
                base: base.clone(),
                discriminator: models
                    .iter()
                    .find(|m| &m.name == base)
                    .and_then(Model::discriminator)
                    .map(str::to_string),
                variants: vec![variant],
            }),
        }
    }
    hierarchies
}
