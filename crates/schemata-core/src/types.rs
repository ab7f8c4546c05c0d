//! Primitive vocabulary shared by declarations and the resolved graph:
//! atomic field types, enum representations, field attributes, and the
//! relation ownership/cardinality/polymorphism triple.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The recognized atomic field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AtomicType {
    #[serde(rename = "UUID")]
    Uuid,
    AutoIncrement,
    String,
    Integer,
    Float,
    Boolean,
    Time,
    Date,
    Protected,
    Sealed,
}

impl AtomicType {
    /// Every atomic type, in declaration order.
    pub const ALL: [AtomicType; 10] = [
        AtomicType::Uuid,
        AtomicType::AutoIncrement,
        AtomicType::String,
        AtomicType::Integer,
        AtomicType::Float,
        AtomicType::Boolean,
        AtomicType::Time,
        AtomicType::Date,
        AtomicType::Protected,
        AtomicType::Sealed,
    ];

    /// The canonical spelling used in declarations.
    pub fn name(&self) -> &'static str {
        match self {
            AtomicType::Uuid => "UUID",
            AtomicType::AutoIncrement => "AutoIncrement",
            AtomicType::String => "String",
            AtomicType::Integer => "Integer",
            AtomicType::Float => "Float",
            AtomicType::Boolean => "Boolean",
            AtomicType::Time => "Time",
            AtomicType::Date => "Date",
            AtomicType::Protected => "Protected",
            AtomicType::Sealed => "Sealed",
        }
    }

    /// Look up an atomic type by its canonical spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }
}

impl fmt::Display for AtomicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Representation type of an enum's literal values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnumRepr {
    String,
    Integer,
    Float,
}

impl EnumRepr {
    /// The atomic type carrying this representation.
    pub fn atomic(&self) -> AtomicType {
        match self {
            EnumRepr::String => AtomicType::String,
            EnumRepr::Integer => AtomicType::Integer,
            EnumRepr::Float => AtomicType::Float,
        }
    }

    /// Whether a literal is well-formed for this representation.
    pub fn accepts(&self, literal: &str) -> bool {
        match self {
            EnumRepr::String => true,
            EnumRepr::Integer => literal.trim().parse::<i64>().is_ok(),
            EnumRepr::Float => literal.trim().parse::<f64>().is_ok(),
        }
    }
}

/// A field attribute. `optional` and `immutable` are first-class; anything
/// else is carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Attribute {
    Optional,
    Immutable,
    Other(String),
}

impl From<String> for Attribute {
    fn from(value: String) -> Self {
        match value.as_str() {
            "optional" => Attribute::Optional,
            "immutable" => Attribute::Immutable,
            _ => Attribute::Other(value),
        }
    }
}

impl From<&str> for Attribute {
    fn from(value: &str) -> Self {
        Attribute::from(value.to_string())
    }
}

impl From<Attribute> for String {
    fn from(value: Attribute) -> Self {
        match value {
            Attribute::Optional => "optional".into(),
            Attribute::Immutable => "immutable".into(),
            Attribute::Other(s) => s,
        }
    }
}

/// Relation ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ownership {
    /// Dependent on the target.
    For,
    /// The target depends on this declaration.
    Has,
}

/// Relation cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinality {
    One,
    Many,
}

/// The parsed (ownership, cardinality, polymorphism) triple of a relation
/// type token such as `HasOne` or `ForManyPoly`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RelationShape {
    pub ownership: Ownership,
    pub cardinality: Cardinality,
    pub polymorphic: bool,
}

impl RelationShape {
    /// Parse a relation type token. Returns `None` for unrecognized tokens.
    pub fn parse(token: &str) -> Option<Self> {
        let (ownership, rest) = if let Some(rest) = token.strip_prefix("Has") {
            (Ownership::Has, rest)
        } else if let Some(rest) = token.strip_prefix("For") {
            (Ownership::For, rest)
        } else {
            return None;
        };
        let (cardinality, rest) = if let Some(rest) = rest.strip_prefix("One") {
            (Cardinality::One, rest)
        } else if let Some(rest) = rest.strip_prefix("Many") {
            (Cardinality::Many, rest)
        } else {
            return None;
        };
        let polymorphic = match rest {
            "" => false,
            "Poly" => true,
            _ => return None,
        };
        Some(Self {
            ownership,
            cardinality,
            polymorphic,
        })
    }
}

/// The eight canonical relation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    HasOne,
    HasMany,
    ForOne,
    ForMany,
    HasOnePoly,
    HasManyPoly,
    ForOnePoly,
    ForManyPoly,
}

impl RelationKind {
    /// Map a relation shape onto its canonical kind.
    pub fn from_shape(shape: RelationShape) -> Self {
        use Cardinality::*;
        use Ownership::*;
        match (shape.ownership, shape.cardinality, shape.polymorphic) {
            (Has, One, false) => RelationKind::HasOne,
            (Has, Many, false) => RelationKind::HasMany,
            (For, One, false) => RelationKind::ForOne,
            (For, Many, false) => RelationKind::ForMany,
            (Has, One, true) => RelationKind::HasOnePoly,
            (Has, Many, true) => RelationKind::HasManyPoly,
            (For, One, true) => RelationKind::ForOnePoly,
            (For, Many, true) => RelationKind::ForManyPoly,
        }
    }

    pub fn ownership(&self) -> Ownership {
        match self {
            RelationKind::HasOne
            | RelationKind::HasMany
            | RelationKind::HasOnePoly
            | RelationKind::HasManyPoly => Ownership::Has,
            _ => Ownership::For,
        }
    }

    pub fn cardinality(&self) -> Cardinality {
        match self {
            RelationKind::HasOne
            | RelationKind::ForOne
            | RelationKind::HasOnePoly
            | RelationKind::ForOnePoly => Cardinality::One,
            _ => Cardinality::Many,
        }
    }

    pub fn is_polymorphic(&self) -> bool {
        matches!(
            self,
            RelationKind::HasOnePoly
                | RelationKind::HasManyPoly
                | RelationKind::ForOnePoly
                | RelationKind::ForManyPoly
        )
    }

    pub fn is_many(&self) -> bool {
        self.cardinality() == Cardinality::Many
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_names_round_trip() {
        for t in AtomicType::ALL {
            assert_eq!(AtomicType::from_name(t.name()), Some(t));
        }
        assert_eq!(AtomicType::from_name("uuid"), None);
        assert_eq!(AtomicType::from_name("Nationality"), None);
    }

    #[test]
    fn attribute_from_string() {
        assert_eq!(Attribute::from("optional"), Attribute::Optional);
        assert_eq!(Attribute::from("immutable"), Attribute::Immutable);
        assert_eq!(
            Attribute::from("indexed"),
            Attribute::Other("indexed".into())
        );
    }

    #[test]
    fn parse_all_eight_tokens() {
        let cases = [
            ("HasOne", RelationKind::HasOne),
            ("HasMany", RelationKind::HasMany),
            ("ForOne", RelationKind::ForOne),
            ("ForMany", RelationKind::ForMany),
            ("HasOnePoly", RelationKind::HasOnePoly),
            ("HasManyPoly", RelationKind::HasManyPoly),
            ("ForOnePoly", RelationKind::ForOnePoly),
            ("ForManyPoly", RelationKind::ForManyPoly),
        ];
        for (token, kind) in cases {
            let shape = RelationShape::parse(token).unwrap();
            assert_eq!(RelationKind::from_shape(shape), kind, "{token}");
        }
    }

    #[test]
    fn reject_malformed_tokens() {
        assert!(RelationShape::parse("HasSome").is_none());
        assert!(RelationShape::parse("OwnsOne").is_none());
        assert!(RelationShape::parse("HasOnePolymorphic").is_none());
        assert!(RelationShape::parse("").is_none());
    }

    #[test]
    fn kind_accessors() {
        assert_eq!(RelationKind::ForManyPoly.ownership(), Ownership::For);
        assert_eq!(RelationKind::HasOnePoly.cardinality(), Cardinality::One);
        assert!(RelationKind::HasManyPoly.is_polymorphic());
        assert!(!RelationKind::ForOne.is_polymorphic());
        assert!(RelationKind::ForMany.is_many());
    }

    #[test]
    fn enum_repr_accepts_literals() {
        assert!(EnumRepr::Integer.accepts("42"));
        assert!(!EnumRepr::Integer.accepts("forty-two"));
        assert!(EnumRepr::Float.accepts("2.5"));
        assert!(EnumRepr::String.accepts("anything"));
    }
}
