//! Canonicalized relations.

use serde::{Deserialize, Serialize};

use crate::types::{Cardinality, Ownership, RelationKind};

/// Where a relation points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationTarget {
    /// A single Model (or Entity, for entity relations).
    Single(String),
    /// `For*Poly`: any of the listed candidates.
    Candidates(Vec<String>),
}

/// A relation with its kind canonicalized and its target resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Declared name; drives every materialized name.
    pub name: String,
    pub kind: RelationKind,
    pub target: RelationTarget,
    /// `Has*Poly`: the polymorphic interface on the target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub through: Option<String>,
    /// The target came from `aliased` rather than the declared name.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub aliased: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unique: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub inherited: bool,
}

impl Relation {
    pub fn new(name: impl Into<String>, kind: RelationKind, target: RelationTarget) -> Self {
        Self {
            name: name.into(),
            kind,
            target,
            through: None,
            aliased: false,
            unique: false,
            inherited: false,
        }
    }

    /// The single target name, if this relation has one.
    pub fn target_name(&self) -> Option<&str> {
        match &self.target {
            RelationTarget::Single(name) => Some(name),
            RelationTarget::Candidates(_) => None,
        }
    }

    /// Every name this relation may point at.
    pub fn targets(&self) -> Vec<&str> {
        match &self.target {
            RelationTarget::Single(name) => vec![name.as_str()],
            RelationTarget::Candidates(names) => names.iter().map(String::as_str).collect(),
        }
    }

    pub fn ownership(&self) -> Ownership {
        self.kind.ownership()
    }

    pub fn cardinality(&self) -> Cardinality {
        self.kind.cardinality()
    }

    /// `For*Poly`: a polymorphic interface other Models can point through.
    pub fn is_interface(&self) -> bool {
        self.kind.is_polymorphic() && self.ownership() == Ownership::For
    }

    pub fn inherit(&self) -> Self {
        Self {
            inherited: true,
            ..self.clone()
        }
    }
}
