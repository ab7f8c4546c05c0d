//! Resolved declarations: Models, Entities, Enums, Structures, and
//! polymorphic hierarchies.

use serde::{Deserialize, Serialize};

use super::field::{Field, Identifier};
use super::relation::Relation;
use crate::types::EnumRepr;

/// Polymorphic role of a Model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Polymorphism {
    #[default]
    None,
    Base {
        discriminator: String,
    },
    Subclass {
        base: String,
        identity: Option<String>,
    },
}

/// A resolved Model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    /// Effective fields: inherited base fields first, then own fields.
    pub fields: Vec<Field>,
    pub identifiers: Vec<Identifier>,
    pub relations: Vec<Relation>,
    #[serde(default)]
    pub polymorphism: Polymorphism,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            identifiers: Vec::new(),
            relations: Vec::new(),
            polymorphism: Polymorphism::None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.iter().find(|r| r.name == name)
    }

    pub fn identifier(&self, name: &str) -> Option<&Identifier> {
        self.identifiers.iter().find(|i| i.name == name)
    }

    pub fn primary(&self) -> Option<&Identifier> {
        self.identifier(Identifier::PRIMARY)
    }

    /// Fields of the primary identifier, in identifier order.
    pub fn primary_fields(&self) -> Vec<&Field> {
        self.primary()
            .map(|id| id.fields.iter().filter_map(|f| self.field(f)).collect())
            .unwrap_or_default()
    }

    /// Fields declared on this Model itself.
    pub fn own_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.inherited)
    }

    pub fn own_relations(&self) -> impl Iterator<Item = &Relation> {
        self.relations.iter().filter(|r| !r.inherited)
    }

    pub fn is_base(&self) -> bool {
        matches!(self.polymorphism, Polymorphism::Base { .. })
    }

    pub fn is_subclass(&self) -> bool {
        matches!(self.polymorphism, Polymorphism::Subclass { .. })
    }

    pub fn base(&self) -> Option<&str> {
        match &self.polymorphism {
            Polymorphism::Subclass { base, .. } => Some(base),
            _ => None,
        }
    }

    pub fn identity(&self) -> Option<&str> {
        match &self.polymorphism {
            Polymorphism::Subclass { identity, .. } => identity.as_deref(),
            _ => None,
        }
    }

    pub fn discriminator(&self) -> Option<&str> {
        match &self.polymorphism {
            Polymorphism::Base { discriminator } => Some(discriminator),
            _ => None,
        }
    }
}

/// A resolved Entity. Fields carry their indirection paths; relations
/// point at other Entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub fields: Vec<Field>,
    pub identifiers: Vec<Identifier>,
    pub relations: Vec<Relation>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            identifiers: Vec::new(),
            relations: Vec::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.iter().find(|r| r.name == name)
    }

    pub fn primary(&self) -> Option<&Identifier> {
        self.identifiers.iter().find(|i| i.is_primary())
    }

    pub fn primary_fields(&self) -> Vec<&Field> {
        self.primary()
            .map(|id| id.fields.iter().filter_map(|f| self.field(f)).collect())
            .unwrap_or_default()
    }

    /// Root Models of every path-sourced field, deduplicated in order.
    pub fn roots(&self) -> Vec<&str> {
        let mut roots: Vec<&str> = Vec::new();
        for path in self.fields.iter().filter_map(|f| f.source.as_ref()) {
            if !roots.contains(&path.root.as_str()) {
                roots.push(&path.root);
            }
        }
        roots
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    pub name: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumEntry {
    pub symbol: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDef {
    pub name: String,
    pub repr: EnumRepr,
    pub entries: Vec<EnumEntry>,
}

/// One subclass of a hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub identity: Option<String>,
    pub model: String,
}

/// A polymorphic hierarchy: a base and the subclasses extending it.
///
/// `discriminator` is `None` when the base does not exist or does not
/// declare one. Variants keep declaration order and may repeat identities;
/// the validator reports both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hierarchy {
    pub base: String,
    pub discriminator: Option<String>,
    pub variants: Vec<Variant>,
}

impl Hierarchy {
    /// Identities in variant order, skipping subclasses without one.
    pub fn identities(&self) -> Vec<&str> {
        self.variants
            .iter()
            .filter_map(|v| v.identity.as_deref())
            .collect()
    }

    pub fn variant_for(&self, identity: &str) -> Option<&Variant> {
        self.variants
            .iter()
            .find(|v| v.identity.as_deref() == Some(identity))
    }
}
