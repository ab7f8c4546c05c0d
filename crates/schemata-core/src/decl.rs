//! Raw declarations as handed over by a front end.
//!
//! Declarations are plain data: names and unresolved tokens. Nothing here is
//! checked beyond what serde enforces; the registry indexes them and the
//! resolver gives them meaning.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Attribute, EnumRepr};

/// The four declaration kinds, each with its own namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DeclKind {
    Model,
    Entity,
    Enum,
    Structure,
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclKind::Model => write!(f, "model"),
            DeclKind::Entity => write!(f, "entity"),
            DeclKind::Enum => write!(f, "enum"),
            DeclKind::Structure => write!(f, "structure"),
        }
    }
}

/// A field declaration with its unresolved type token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    /// Atomic type name, enum name, or (entities only) a dotted path.
    #[serde(rename = "type")]
    pub type_ref: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, type_ref: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_ref: type_ref.into(),
            attributes: Vec::new(),
        }
    }

    /// Append an attribute.
    pub fn with_attribute(mut self, attribute: impl Into<Attribute>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    /// Mark the field optional.
    pub fn optional(self) -> Self {
        self.with_attribute(Attribute::Optional)
    }

    pub fn is_optional(&self) -> bool {
        self.attributes.contains(&Attribute::Optional)
    }

    pub fn is_immutable(&self) -> bool {
        self.attributes.contains(&Attribute::Immutable)
    }
}

/// A named identifier over one or more fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierDecl {
    pub name: String,
    pub fields: Vec<String>,
}

impl IdentifierDecl {
    pub fn new(name: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            name: name.into(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// A relation declaration. `kind` is the raw type token (`HasOne`,
/// `ForManyPoly`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub through: Option<String>,
    #[serde(default, rename = "for", skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliased: Option<String>,
    /// Each target is associated with at most one owner.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unique: bool,
}

impl RelationDecl {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            through: None,
            candidates: Vec::new(),
            aliased: None,
            unique: false,
        }
    }

    pub fn aliased(mut self, target: impl Into<String>) -> Self {
        self.aliased = Some(target.into());
        self
    }

    pub fn through(mut self, interface: impl Into<String>) -> Self {
        self.through = Some(interface.into());
        self
    }

    pub fn for_candidates(mut self, candidates: &[&str]) -> Self {
        self.candidates = candidates.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// Polymorphism settings of a Model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolymorphicDecl {
    /// On a base: the field naming the concrete subclass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,
    /// On a subclass: the discriminator value selecting it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
}

/// A persisted Model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDecl {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
    #[serde(default)]
    pub identifiers: Vec<IdentifierDecl>,
    #[serde(default)]
    pub relations: Vec<RelationDecl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polymorphic: Option<PolymorphicDecl>,
}

impl ModelDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            identifiers: Vec::new(),
            relations: Vec::new(),
            extends: None,
            polymorphic: None,
        }
    }

    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    pub fn identifier(mut self, name: &str, fields: &[&str]) -> Self {
        self.identifiers.push(IdentifierDecl::new(name, fields));
        self
    }

    /// Declare the `primary` identifier.
    pub fn primary(self, fields: &[&str]) -> Self {
        self.identifier("primary", fields)
    }

    pub fn relation(mut self, relation: RelationDecl) -> Self {
        self.relations.push(relation);
        self
    }

    /// Declare this model the base of a hierarchy.
    pub fn discriminator(mut self, field: impl Into<String>) -> Self {
        self.polymorphic
            .get_or_insert_with(PolymorphicDecl::default)
            .discriminator = Some(field.into());
        self
    }

    /// Declare this model a subclass of `base` selected by `identity`.
    pub fn extends(mut self, base: impl Into<String>, identity: impl Into<String>) -> Self {
        self.extends = Some(base.into());
        self.polymorphic
            .get_or_insert_with(PolymorphicDecl::default)
            .identity = Some(identity.into());
        self
    }

    pub fn discriminator_field(&self) -> Option<&str> {
        self.polymorphic.as_ref()?.discriminator.as_deref()
    }

    pub fn identity(&self) -> Option<&str> {
        self.polymorphic.as_ref()?.identity.as_deref()
    }
}

/// A derived aggregation over Model fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDecl {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
    #[serde(default)]
    pub identifiers: Vec<IdentifierDecl>,
    #[serde(default)]
    pub relations: Vec<RelationDecl>,
}

impl EntityDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            identifiers: Vec::new(),
            relations: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    pub fn identifier(mut self, name: &str, fields: &[&str]) -> Self {
        self.identifiers.push(IdentifierDecl::new(name, fields));
        self
    }

    pub fn primary(self, fields: &[&str]) -> Self {
        self.identifier("primary", fields)
    }

    pub fn relation(mut self, relation: RelationDecl) -> Self {
        self.relations.push(relation);
        self
    }
}

/// One `symbol → value` entry of an enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumEntryDecl {
    pub symbol: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub repr: EnumRepr,
    #[serde(default)]
    pub values: Vec<EnumEntryDecl>,
}

impl EnumDecl {
    pub fn new(name: impl Into<String>, repr: EnumRepr) -> Self {
        Self {
            name: name.into(),
            repr,
            values: Vec::new(),
        }
    }

    pub fn entry(mut self, symbol: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.push(EnumEntryDecl {
            symbol: symbol.into(),
            value: value.into(),
        });
        self
    }
}

/// A relation-less, non-persisted field grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureDecl {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

impl StructureDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }
}

/// Any declaration, tagged with its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Model(ModelDecl),
    Entity(EntityDecl),
    Enum(EnumDecl),
    Structure(StructureDecl),
}

impl Declaration {
    pub fn kind(&self) -> DeclKind {
        match self {
            Declaration::Model(_) => DeclKind::Model,
            Declaration::Entity(_) => DeclKind::Entity,
            Declaration::Enum(_) => DeclKind::Enum,
            Declaration::Structure(_) => DeclKind::Structure,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Declaration::Model(d) => &d.name,
            Declaration::Entity(d) => &d.name,
            Declaration::Enum(d) => &d.name,
            Declaration::Structure(d) => &d.name,
        }
    }
}

impl From<ModelDecl> for Declaration {
    fn from(d: ModelDecl) -> Self {
        Declaration::Model(d)
    }
}

impl From<EntityDecl> for Declaration {
    fn from(d: EntityDecl) -> Self {
        Declaration::Entity(d)
    }
}

impl From<EnumDecl> for Declaration {
    fn from(d: EnumDecl) -> Self {
        Declaration::Enum(d)
    }
}

impl From<StructureDecl> for Declaration {
    fn from(d: StructureDecl) -> Self {
        Declaration::Structure(d)
    }
}

/// A structured declaration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationSet {
    #[serde(default)]
    pub models: Vec<ModelDecl>,
    #[serde(default)]
    pub entities: Vec<EntityDecl>,
    #[serde(default)]
    pub enums: Vec<EnumDecl>,
    #[serde(default)]
    pub structures: Vec<StructureDecl>,
}

impl DeclarationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON declaration document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with(mut self, declaration: impl Into<Declaration>) -> Self {
        self.push(declaration.into());
        self
    }

    pub fn push(&mut self, declaration: Declaration) {
        match declaration {
            Declaration::Model(d) => self.models.push(d),
            Declaration::Entity(d) => self.entities.push(d),
            Declaration::Enum(d) => self.enums.push(d),
            Declaration::Structure(d) => self.structures.push(d),
        }
    }

    /// Append every declaration of `other`, keeping order.
    pub fn merge(&mut self, other: DeclarationSet) {
        self.models.extend(other.models);
        self.entities.extend(other.entities);
        self.enums.extend(other.enums);
        self.structures.extend(other.structures);
    }

    /// All declarations: enums, structures, models, then entities.
    pub fn declarations(&self) -> impl Iterator<Item = Declaration> + '_ {
        self.enums
            .iter()
            .cloned()
            .map(Declaration::Enum)
            .chain(self.structures.iter().cloned().map(Declaration::Structure))
            .chain(self.models.iter().cloned().map(Declaration::Model))
            .chain(self.entities.iter().cloned().map(Declaration::Entity))
    }

    pub fn len(&self) -> usize {
        self.models.len() + self.entities.len() + self.enums.len() + self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_json_document() {
        let json = r#"{
            "models": [{
                "name": "Company",
                "fields": [{"name": "ID", "type": "UUID"},
                           {"name": "Motto", "type": "String", "attributes": ["optional", "searchable"]}],
                "identifiers": [{"name": "primary", "fields": ["ID"]}],
                "relations": [
                    {"name": "WorkContact", "type": "ForOne", "aliased": "Contact"},
                    {"name": "Tags", "type": "ForMany", "unique": true},
                    {"name": "Owner", "type": "ForOnePoly", "for": ["Person", "Company"]}
                ]
            }],
            "enums": [{"name": "Nationality", "type": "String",
                       "values": [{"symbol": "US", "value": "American"}]}]
        }"#;
        let set = DeclarationSet::from_json(json).unwrap();
        assert_eq!(set.len(), 2);
        let company = &set.models[0];
        assert!(company.fields[1].is_optional());
        assert_eq!(
            company.fields[1].attributes[1],
            Attribute::Other("searchable".into())
        );
        assert_eq!(company.relations[0].aliased.as_deref(), Some("Contact"));
        assert!(company.relations[1].unique);
        assert_eq!(company.relations[2].candidates, vec!["Person", "Company"]);
        assert_eq!(set.enums[0].repr, EnumRepr::String);
    }

    #[test]
    fn polymorphic_builders() {
        let base = ModelDecl::new("Animal").discriminator("Kind");
        let dog = ModelDecl::new("Dog").extends("Animal", "dog");
        assert_eq!(base.discriminator_field(), Some("Kind"));
        assert_eq!(dog.extends.as_deref(), Some("Animal"));
        assert_eq!(dog.identity(), Some("dog"));
        assert_eq!(base.identity(), None);
    }

    #[test]
    fn merge_keeps_order() {
        let mut a = DeclarationSet::new().with(ModelDecl::new("A"));
        let b = DeclarationSet::new()
            .with(ModelDecl::new("B"))
            .with(EnumDecl::new("E", EnumRepr::Integer));
        a.merge(b);
        let names: Vec<_> = a.models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(a.enums.len(), 1);
    }

    #[test]
    fn declarations_lists_enums_first() {
        let set = DeclarationSet::new()
            .with(ModelDecl::new("M"))
            .with(EnumDecl::new("E", EnumRepr::String));
        let kinds: Vec<_> = set.declarations().map(|d| d.kind()).collect();
        assert_eq!(kinds, vec![DeclKind::Enum, DeclKind::Model]);
    }
}
