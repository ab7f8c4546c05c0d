//! The Intermediate Model Graph (IMG).
//!
//! A closed, fully resolved view of every declaration: field types are
//! resolved, relation kinds canonicalized, entity paths pre-walked, and
//! polymorphic hierarchies grouped. Built once per run by the resolver and
//! read-only afterwards; backends share it by reference.

pub mod field;
pub mod node;
pub mod relation;

use serde::{Deserialize, Serialize};

use self::field::FieldType;
use self::node::{EnumDef, Entity, Hierarchy, Model, Structure};
use self::relation::Relation;
use crate::types::RelationKind;

/// The frozen graph handed to the validator and the backends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelGraph {
    pub(crate) models: Vec<Model>,
    pub(crate) entities: Vec<Entity>,
    pub(crate) enums: Vec<EnumDef>,
    pub(crate) structures: Vec<Structure>,
    pub(crate) hierarchies: Vec<Hierarchy>,
}

/// Declaration counts, for reports and logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub models: usize,
    pub entities: usize,
    pub enums: usize,
    pub structures: usize,
    pub hierarchies: usize,
}

impl ModelGraph {
    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn enums(&self) -> &[EnumDef] {
        &self.enums
    }

    pub fn structures(&self) -> &[Structure] {
        &self.structures
    }

    pub fn hierarchies(&self) -> &[Hierarchy] {
        &self.hierarchies
    }

    pub fn model(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.name == name)
    }

    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    pub fn enum_def(&self, name: &str) -> Option<&EnumDef> {
        self.enums.iter().find(|e| e.name == name)
    }

    pub fn structure(&self, name: &str) -> Option<&Structure> {
        self.structures.iter().find(|s| s.name == name)
    }

    /// The hierarchy whose base is `base`.
    pub fn hierarchy(&self, base: &str) -> Option<&Hierarchy> {
        self.hierarchies.iter().find(|h| h.base == base)
    }

    /// The hierarchy `model` belongs to, as base or subclass.
    pub fn hierarchy_of(&self, model: &str) -> Option<&Hierarchy> {
        let m = self.model(model)?;
        match m.base() {
            Some(base) => self.hierarchy(base),
            None => self.hierarchy(model),
        }
    }

    /// The Model whose storage holds rows of `model`: the base for
    /// subclasses, the Model itself otherwise.
    pub fn storage_model<'a>(&'a self, model: &'a str) -> &'a str {
        match self.model(model).and_then(Model::base) {
            Some(base) if self.model(base).is_some() => base,
            _ => model,
        }
    }

    /// `ForOne` relations declared on `target` that point back at `owner`.
    pub fn back_references(&self, target: &str, owner: &str) -> Vec<&Relation> {
        self.model(target)
            .map(|t| {
                t.relations
                    .iter()
                    .filter(|r| r.kind == RelationKind::ForOne && r.target_name() == Some(owner))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The `For*Poly` interface `name` declared on `model`.
    pub fn interface(&self, model: &str, name: &str) -> Option<&Relation> {
        self.model(model)?
            .relation(name)
            .filter(|r| r.is_interface())
    }

    /// Models using `enum_name` as a field type.
    pub fn enum_users(&self, enum_name: &str) -> Vec<&Model> {
        self.models
            .iter()
            .filter(|m| {
                m.fields
                    .iter()
                    .any(|f| f.ty == FieldType::Enum(enum_name.to_string()))
            })
            .collect()
    }

    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            models: self.models.len(),
            entities: self.entities.len(),
            enums: self.enums.len(),
            structures: self.structures.len(),
            hierarchies: self.hierarchies.len(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
