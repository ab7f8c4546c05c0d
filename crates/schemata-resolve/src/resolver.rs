//! Two-phase resolution.
//!
//! Phase one registers every declaration so forward references cost
//! nothing. Phase two resolves each declaration by lookup: enums and
//! structures, then Models (own members, roles, inheritance), hierarchies,
//! and finally Entities, whose paths walk the resolved Models. A broken
//! member is dropped from its declaration and reported; everything else
//! keeps resolving.

use schemata_core::builder::GraphBuilder;
use schemata_core::decl::{DeclKind, EntityDecl, FieldDecl, ModelDecl, RelationDecl};
use schemata_core::graph::field::{Field, FieldType};
use schemata_core::graph::node::{EnumDef, EnumEntry, Entity, Model, Structure};
use schemata_core::graph::relation::Relation;
use schemata_core::{DeclarationSet, ModelGraph, SchemaRegistry};
use tracing::{debug, info};

use crate::error::ResolveError;
use crate::fields::{self, TypeToken};
use crate::hierarchy;
use crate::paths;

/// Outcome of a resolution run: the graph plus every reference error found.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub graph: ModelGraph,
    pub errors: Vec<ResolveError>,
}

impl Resolution {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Register `set` and resolve it. Duplicate registrations are reported
/// alongside reference errors.
pub fn resolve_set(set: &DeclarationSet) -> Resolution {
    let (registry, duplicates) = SchemaRegistry::from_set(set);
    let mut resolution = resolve(&registry);
    let mut errors: Vec<ResolveError> = duplicates.into_iter().map(ResolveError::from).collect();
    errors.append(&mut resolution.errors);
    resolution.errors = errors;
    resolution
}

/// Resolve every declaration in `registry` into a frozen graph.
pub fn resolve(registry: &SchemaRegistry) -> Resolution {
    let mut resolver = Resolver {
        registry,
        errors: Vec::new(),
    };
    let graph = resolver.run();
    info!(
        models = graph.models().len(),
        entities = graph.entities().len(),
        errors = resolver.errors.len(),
        "resolution finished"
    );
    Resolution {
        graph,
        errors: resolver.errors,
    }
}

struct Resolver<'r> {
    registry: &'r SchemaRegistry,
    errors: Vec<ResolveError>,
}

impl Resolver<'_> {
    fn run(&mut self) -> ModelGraph {
        let registry = self.registry;
        let mut builder = GraphBuilder::new();

        for decl in registry.enums() {
            builder.add_enum(EnumDef {
                name: decl.name.clone(),
                repr: decl.repr,
                entries: decl
                    .values
                    .iter()
                    .map(|e| EnumEntry {
                        symbol: e.symbol.clone(),
                        value: e.value.clone(),
                    })
                    .collect(),
            });
        }

        for decl in registry.structures() {
            let fields = self.plain_fields(&decl.name, &decl.fields);
            debug!(structure = %decl.name, "resolved");
            builder.add_structure(Structure {
                name: decl.name.clone(),
                fields,
            });
        }

        let mut models: Vec<Model> = registry
            .models()
            .map(|decl| self.model(decl))
            .collect();
        hierarchy::inherit(&mut models);
        for h in hierarchy::group(&models) {
            builder.add_hierarchy(h);
        }

        let entities: Vec<Entity> = registry
            .entities()
            .map(|decl| self.entity(decl, &models))
            .collect();

        for model in models {
            builder.add_model(model);
        }
        for entity in entities {
            builder.add_entity(entity);
        }
        builder.build()
    }

    fn plain_fields(&mut self, owner: &str, decls: &[FieldDecl]) -> Vec<Field> {
        let mut resolved = Vec::with_capacity(decls.len());
        for decl in decls {
            match fields::resolve_plain_field(self.registry, owner, decl) {
                Ok(field) => resolved.push(field),
                Err(e) => self.errors.push(e),
            }
        }
        resolved
    }

    fn relations(&mut self, owner: &str, kind: DeclKind, decls: &[RelationDecl]) -> Vec<Relation> {
        let mut resolved = Vec::with_capacity(decls.len());
        for decl in decls {
            match crate::relations::canonicalize(self.registry, owner, kind, decl) {
                Ok(relation) => resolved.push(relation),
                Err(errs) => self.errors.extend(errs),
            }
        }
        resolved
    }

    fn model(&mut self, decl: &ModelDecl) -> Model {
        let mut model = Model::new(decl.name.clone());
        model.fields = self.plain_fields(&decl.name, &decl.fields);
        model.identifiers = fields::resolve_identifiers(&decl.identifiers);
        model.relations = self.relations(&decl.name, DeclKind::Model, &decl.relations);
        hierarchy::assign_role(&mut model, decl);
        debug!(
            model = %model.name,
            fields = model.fields.len(),
            relations = model.relations.len(),
            "resolved"
        );
        model
    }

    fn entity(&mut self, decl: &EntityDecl, models: &[Model]) -> Entity {
        let mut entity = Entity::new(decl.name.clone());
        for field in &decl.fields {
            match self.entity_field(&decl.name, field, models) {
                Ok(f) => entity.fields.push(f),
                Err(e) => self.errors.push(e),
            }
        }
        entity.identifiers = fields::resolve_identifiers(&decl.identifiers);
        entity.relations = self.relations(&decl.name, DeclKind::Entity, &decl.relations);
        debug!(entity = %entity.name, roots = ?entity.roots(), "resolved");
        entity
    }

    fn entity_field(
        &self,
        entity: &str,
        decl: &FieldDecl,
        models: &[Model],
    ) -> Result<Field, ResolveError> {
        match fields::classify(&decl.type_ref) {
            TypeToken::Atomic(atomic) => Ok(fields::make_field(decl, FieldType::Atomic(atomic))),
            TypeToken::Named(name) => {
                let ty = fields::resolve_named(self.registry, entity, &decl.name, name)?;
                Ok(fields::make_field(decl, ty))
            }
            TypeToken::Path(segments) => {
                let walk = paths::walk(models, entity, &decl.name, &segments)?;
                let mut field = fields::make_field(decl, walk.terminal.ty.clone());
                field.optional |= walk.terminal.optional;
                field.collection = walk.path.crosses_many();
                field.source = Some(walk.path);
                Ok(field)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemata_core::decl::{EnumDecl, StructureDecl};
    use schemata_core::graph::relation::RelationTarget;
    use schemata_core::types::{AtomicType, EnumRepr, RelationKind};

    fn crm() -> DeclarationSet {
        DeclarationSet::new()
            .with(
                ModelDecl::new("Person")
                    .field(FieldDecl::new("ID", "AutoIncrement"))
                    .field(FieldDecl::new("Name", "String"))
                    .field(FieldDecl::new("Nationality", "Nationality"))
                    .primary(&["ID"])
                    .relation(RelationDecl::new("ContactInfo", "HasOne"))
                    .relation(RelationDecl::new("Employer", "ForOne").aliased("Company")),
            )
            .with(
                ModelDecl::new("ContactInfo")
                    .field(FieldDecl::new("ID", "UUID"))
                    .field(FieldDecl::new("Email", "String"))
                    .primary(&["ID"]),
            )
            .with(
                ModelDecl::new("Company")
                    .field(FieldDecl::new("ID", "UUID"))
                    .primary(&["ID"]),
            )
            .with(
                EnumDecl::new("Nationality", EnumRepr::String)
                    .entry("US", "American")
                    .entry("DE", "German"),
            )
            .with(
                EntityDecl::new("Card")
                    .field(FieldDecl::new("ID", "Person.ID"))
                    .field(FieldDecl::new("Email", "Person.ContactInfo.Email"))
                    .primary(&["ID"]),
            )
    }

    #[test]
    fn resolves_forward_references() {
        let resolution = resolve_set(&crm());
        assert!(resolution.is_clean(), "{:?}", resolution.errors);
        let person = resolution.graph.model("Person").unwrap();
        assert_eq!(
            person.field("Nationality").unwrap().ty,
            FieldType::Enum("Nationality".into())
        );
        let employer = person.relation("Employer").unwrap();
        assert_eq!(employer.kind, RelationKind::ForOne);
        assert_eq!(employer.target, RelationTarget::Single("Company".into()));
    }

    #[test]
    fn entity_fields_carry_walked_paths() {
        let resolution = resolve_set(&crm());
        let card = resolution.graph.entity("Card").unwrap();
        let email = card.field("Email").unwrap();
        assert_eq!(email.ty, FieldType::Atomic(AtomicType::String));
        let path = email.source.as_ref().unwrap();
        assert_eq!(path.root, "Person");
        assert_eq!(path.steps[0].relation, "ContactInfo");
        assert_eq!(card.roots(), vec!["Person"]);
    }

    #[test]
    fn errors_are_batched_and_members_dropped() {
        let set = DeclarationSet::new()
            .with(
                ModelDecl::new("Person")
                    .field(FieldDecl::new("ID", "UUID"))
                    .field(FieldDecl::new("Mood", "Mood"))
                    .primary(&["ID"])
                    .relation(RelationDecl::new("Passport", "HasOne")),
            )
            .with(ModelDecl::new("Person"))
            .with(StructureDecl::new("Point").field(FieldDecl::new("X", "Person.ID")));
        let resolution = resolve_set(&set);
        let codes: Vec<_> = resolution.errors.iter().map(|e| e.code()).collect();
        assert_eq!(
            codes,
            vec![
                "DuplicateDeclaration",
                "IndirectionOutsideEntity",
                "UnknownEnum",
                "UnknownDeclaration"
            ]
        );
        let person = resolution.graph.model("Person").unwrap();
        assert_eq!(person.fields.len(), 1);
        assert!(person.relations.is_empty());
        assert!(resolution.graph.structure("Point").unwrap().fields.is_empty());
    }

    #[test]
    fn collection_fields_through_many() {
        let set = DeclarationSet::new()
            .with(
                ModelDecl::new("Company")
                    .field(FieldDecl::new("ID", "UUID"))
                    .primary(&["ID"])
                    .relation(RelationDecl::new("Staff", "HasMany").aliased("Person")),
            )
            .with(
                ModelDecl::new("Person")
                    .field(FieldDecl::new("ID", "UUID"))
                    .field(FieldDecl::new("Name", "String"))
                    .primary(&["ID"]),
            )
            .with(
                EntityDecl::new("Roster")
                    .field(FieldDecl::new("ID", "Company.ID"))
                    .field(FieldDecl::new("Names", "Company.Staff.Name"))
                    .primary(&["ID"]),
            );
        let resolution = resolve_set(&set);
        assert!(resolution.is_clean(), "{:?}", resolution.errors);
        let roster = resolution.graph.entity("Roster").unwrap();
        assert!(roster.field("Names").unwrap().collection);
        assert!(!roster.field("ID").unwrap().collection);
    }
}
