//! Field type resolution.

use schemata_core::decl::{FieldDecl, IdentifierDecl};
use schemata_core::graph::field::{Field, FieldType, Identifier};
use schemata_core::types::{AtomicType, Attribute};
use schemata_core::SchemaRegistry;

use crate::error::{ResolveError, Result};

/// How a field's type token reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeToken<'a> {
    Atomic(AtomicType),
    /// A dotted `Root.rel.Field` path.
    Path(Vec<&'a str>),
    /// Any other bare name: must be an enum.
    Named(&'a str),
}

/// Classify a type token without consulting the registry.
pub fn classify(token: &str) -> TypeToken<'_> {
    let token = token.trim();
    if let Some(atomic) = AtomicType::from_name(token) {
        TypeToken::Atomic(atomic)
    } else if token.contains('.') {
        TypeToken::Path(token.split('.').map(str::trim).collect())
    } else {
        TypeToken::Named(token)
    }
}

/// Resolve a non-path token to an atomic type or an existing enum.
pub fn resolve_named(
    registry: &SchemaRegistry,
    declaration: &str,
    field: &str,
    name: &str,
) -> Result<FieldType> {
    if registry.enum_decl(name).is_some() {
        Ok(FieldType::Enum(name.to_string()))
    } else {
        Err(ResolveError::UnknownEnum {
            declaration: declaration.to_string(),
            field: field.to_string(),
            name: name.to_string(),
        })
    }
}

/// Build a resolved field from its declaration and resolved type.
pub fn make_field(decl: &FieldDecl, ty: FieldType) -> Field {
    let mut field = Field::new(decl.name.clone(), ty);
    field.optional = decl.is_optional();
    field.immutable = decl.is_immutable();
    field.attributes = decl
        .attributes
        .iter()
        .filter(|a| matches!(a, Attribute::Other(_)))
        .cloned()
        .collect();
    field
}

/// Resolve a Model or Structure field. Paths are not allowed here.
pub fn resolve_plain_field(
    registry: &SchemaRegistry,
    declaration: &str,
    decl: &FieldDecl,
) -> Result<Field> {
    let ty = match classify(&decl.type_ref) {
        TypeToken::Atomic(atomic) => FieldType::Atomic(atomic),
        TypeToken::Named(name) => resolve_named(registry, declaration, &decl.name, name)?,
        TypeToken::Path(_) => {
            return Err(ResolveError::IndirectionOutsideEntity {
                declaration: declaration.to_string(),
                field: decl.name.clone(),
                path: decl.type_ref.clone(),
            })
        }
    };
    Ok(make_field(decl, ty))
}

pub fn resolve_identifiers(decls: &[IdentifierDecl]) -> Vec<Identifier> {
    decls
        .iter()
        .map(|d| Identifier {
            name: d.name.clone(),
            fields: d.fields.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemata_core::decl::EnumDecl;
    use schemata_core::types::EnumRepr;

    fn registry() -> SchemaRegistry {
        let mut r = SchemaRegistry::new();
        r.register(EnumDecl::new("Nationality", EnumRepr::String))
            .unwrap();
        r
    }

    #[test]
    fn classify_tokens() {
        assert_eq!(classify("UUID"), TypeToken::Atomic(AtomicType::Uuid));
        assert_eq!(
            classify("Person.ContactInfo.Email"),
            TypeToken::Path(vec!["Person", "ContactInfo", "Email"])
        );
        assert_eq!(classify("Nationality"), TypeToken::Named("Nationality"));
    }

    #[test]
    fn enum_reference_resolves() {
        let f = resolve_plain_field(
            &registry(),
            "Person",
            &FieldDecl::new("Nationality", "Nationality"),
        )
        .unwrap();
        assert_eq!(f.ty, FieldType::Enum("Nationality".into()));
        assert!(!f.optional);
    }

    #[test]
    fn unknown_enum_fails() {
        let err =
            resolve_plain_field(&registry(), "Person", &FieldDecl::new("Mood", "Mood")).unwrap_err();
        assert_eq!(err.code(), "UnknownEnum");
    }

    #[test]
    fn path_on_model_fails() {
        let err = resolve_plain_field(
            &registry(),
            "Person",
            &FieldDecl::new("Email", "Contact.Email"),
        )
        .unwrap_err();
        assert_eq!(err.code(), "IndirectionOutsideEntity");
    }

    #[test]
    fn attributes_split_into_flags_and_passthrough() {
        let decl = FieldDecl::new("Name", "String")
            .optional()
            .with_attribute("immutable")
            .with_attribute("searchable");
        let f = resolve_plain_field(&registry(), "Person", &decl).unwrap();
        assert!(f.optional);
        assert!(f.immutable);
        assert_eq!(f.attributes, vec![Attribute::Other("searchable".into())]);
    }
}
