//! Resolved fields, identifiers, and entity indirection paths.

use serde::{Deserialize, Serialize};

use crate::types::{AtomicType, Attribute, RelationKind};

/// The resolved type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum FieldType {
    Atomic(AtomicType),
    /// Reference to an enum by name.
    Enum(String),
}

impl FieldType {
    pub fn as_atomic(&self) -> Option<AtomicType> {
        match self {
            FieldType::Atomic(t) => Some(*t),
            FieldType::Enum(_) => None,
        }
    }

    pub fn as_enum(&self) -> Option<&str> {
        match self {
            FieldType::Enum(name) => Some(name),
            FieldType::Atomic(_) => None,
        }
    }
}

/// A field with its type resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: FieldType,
    pub optional: bool,
    pub immutable: bool,
    /// Attributes outside the recognized set, carried through untouched.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
    /// Entity fields: the pre-walked indirection path this field reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<IndirectionPath>,
    /// Entity fields reached through a `Many` relation hold collections.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub collection: bool,
    /// Copied from a polymorphic base.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub inherited: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            immutable: false,
            attributes: Vec::new(),
            source: None,
            collection: false,
            inherited: false,
        }
    }

    pub fn atomic(name: impl Into<String>, ty: AtomicType) -> Self {
        Self::new(name, FieldType::Atomic(ty))
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Return a copy flagged as inherited from a base.
    pub fn inherit(&self) -> Self {
        Self {
            inherited: true,
            ..self.clone()
        }
    }
}

/// A named identifier over an ordered list of field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    pub fields: Vec<String>,
}

impl Identifier {
    pub const PRIMARY: &'static str = "primary";

    pub fn is_primary(&self) -> bool {
        self.name == Self::PRIMARY
    }

    pub fn is_composite(&self) -> bool {
        self.fields.len() > 1
    }
}

/// One hop of an indirection path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    /// Declared relation name on `from`.
    pub relation: String,
    pub kind: RelationKind,
    pub from: String,
    pub to: String,
}

/// A fully walked `Root.rel1.rel2.Field` path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndirectionPath {
    pub root: String,
    pub steps: Vec<PathStep>,
    /// The field read on the last Model of the walk.
    pub terminal: String,
}

impl IndirectionPath {
    /// The Model owning the terminal field.
    pub fn terminal_model(&self) -> &str {
        self.steps.last().map_or(self.root.as_str(), |s| s.to.as_str())
    }

    /// Whether any hop fans out.
    pub fn crosses_many(&self) -> bool {
        self.steps.iter().any(|s| s.kind.is_many())
    }

    /// The dotted form, as declared.
    pub fn dotted(&self) -> String {
        let mut parts = vec![self.root.as_str()];
        parts.extend(self.steps.iter().map(|s| s.relation.as_str()));
        parts.push(self.terminal.as_str());
        parts.join(".")
    }
}
