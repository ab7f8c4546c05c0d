//! Per-target type-mapping tables.
//!
//! Each target maps every atomic type to a target type name. A second,
//! sparse table maps atomic types whose *reference* (a foreign key or key
//! field pointing at a column of that type) differs from the column type,
//! e.g. a `SERIAL` key is referenced as `INTEGER`.

use std::collections::BTreeMap;

use schemata_core::types::AtomicType;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TargetError};
use crate::target::TargetKind;

/// Atomic type name → target type name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TypeMap {
    pub target: TargetKind,
    pub types: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub references: BTreeMap<String, String>,
}

fn table(pairs: [(AtomicType, &str); 10]) -> BTreeMap<String, String> {
    pairs
        .into_iter()
        .map(|(t, name)| (t.name().to_string(), name.to_string()))
        .collect()
}

impl TypeMap {
    /// The built-in table for `target`.
    pub fn builtin(target: TargetKind) -> Self {
        use AtomicType as A;
        match target {
            TargetKind::Relational => Self {
                target,
                types: table([
                    (A::Uuid, "UUID"),
                    (A::AutoIncrement, "SERIAL"),
                    (A::String, "TEXT"),
                    (A::Integer, "BIGINT"),
                    (A::Float, "DOUBLE PRECISION"),
                    (A::Boolean, "BOOLEAN"),
                    (A::Time, "TIMESTAMPTZ"),
                    (A::Date, "DATE"),
                    (A::Protected, "TEXT"),
                    (A::Sealed, "BYTEA"),
                ]),
                references: [(A::AutoIncrement.name().to_string(), "INTEGER".to_string())]
                    .into_iter()
                    .collect(),
            },
            TargetKind::Go => Self {
                target,
                types: table([
                    (A::Uuid, "uuid.UUID"),
                    (A::AutoIncrement, "uint"),
                    (A::String, "string"),
                    (A::Integer, "int64"),
                    (A::Float, "float64"),
                    (A::Boolean, "bool"),
                    (A::Time, "time.Time"),
                    (A::Date, "time.Time"),
                    (A::Protected, "string"),
                    (A::Sealed, "[]byte"),
                ]),
                references: BTreeMap::new(),
            },
            TargetKind::Typescript => Self {
                target,
                types: table([
                    (A::Uuid, "string"),
                    (A::AutoIncrement, "number"),
                    (A::String, "string"),
                    (A::Integer, "number"),
                    (A::Float, "number"),
                    (A::Boolean, "boolean"),
                    (A::Time, "Date"),
                    (A::Date, "Date"),
                    (A::Protected, "string"),
                    (A::Sealed, "string"),
                ]),
                references: BTreeMap::new(),
            },
        }
    }

    /// Column/field type for an atomic type.
    pub fn type_for(&self, atomic: AtomicType) -> Result<&str> {
        self.types
            .get(atomic.name())
            .map(String::as_str)
            .ok_or_else(|| TargetError::UnmappedType {
                target: self.target.to_string(),
                atomic: atomic.name().to_string(),
            })
    }

    /// Type of a column or field referencing a key of type `atomic`.
    pub fn reference_for(&self, atomic: AtomicType) -> Result<&str> {
        match self.references.get(atomic.name()) {
            Some(name) => Ok(name),
            None => self.type_for(atomic),
        }
    }

    /// Replace entries of the column table. The reference type of an
    /// overridden entry is rederived from the new name: a serial type is
    /// referenced by its integer width, anything else by itself.
    pub fn apply_overrides(&mut self, overrides: &BTreeMap<String, String>) {
        for (atomic, name) in overrides {
            self.types.insert(atomic.clone(), name.clone());
            match serial_reference(name) {
                Some(reference) => {
                    self.references.insert(atomic.clone(), reference.to_string());
                }
                None => {
                    self.references.remove(atomic);
                }
            }
        }
    }

    /// Atomic types without an entry.
    pub fn missing(&self) -> Vec<AtomicType> {
        AtomicType::ALL
            .into_iter()
            .filter(|t| !self.types.contains_key(t.name()))
            .collect()
    }
}

/// Integer type a column of the serial type `name` is referenced as.
fn serial_reference(name: &str) -> Option<&'static str> {
    match name.trim().to_ascii_uppercase().as_str() {
        "SMALLSERIAL" | "SERIAL2" => Some("SMALLINT"),
        "SERIAL" | "SERIAL4" => Some("INTEGER"),
        "BIGSERIAL" | "SERIAL8" => Some("BIGINT"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_are_complete() {
        for target in TargetKind::ALL {
            assert!(TypeMap::builtin(target).missing().is_empty(), "{target}");
        }
    }

    #[test]
    fn relational_mapping() {
        let map = TypeMap::builtin(TargetKind::Relational);
        assert_eq!(map.type_for(AtomicType::AutoIncrement).unwrap(), "SERIAL");
        assert_eq!(map.reference_for(AtomicType::AutoIncrement).unwrap(), "INTEGER");
        assert_eq!(map.reference_for(AtomicType::Uuid).unwrap(), "UUID");
        assert_eq!(map.type_for(AtomicType::Float).unwrap(), "DOUBLE PRECISION");
    }

    #[test]
    fn structural_mappings() {
        let go = TypeMap::builtin(TargetKind::Go);
        assert_eq!(go.type_for(AtomicType::Uuid).unwrap(), "uuid.UUID");
        assert_eq!(go.type_for(AtomicType::Sealed).unwrap(), "[]byte");
        let ts = TypeMap::builtin(TargetKind::Typescript);
        assert_eq!(ts.type_for(AtomicType::Time).unwrap(), "Date");
        assert_eq!(ts.type_for(AtomicType::Integer).unwrap(), "number");
    }

    #[test]
    fn overrides_replace_entries() {
        let mut map = TypeMap::builtin(TargetKind::Relational);
        map.apply_overrides(&[("String".to_string(), "VARCHAR(255)".to_string())].into_iter().collect());
        assert_eq!(map.type_for(AtomicType::String).unwrap(), "VARCHAR(255)");
    }

    #[test]
    fn key_override_rederives_reference_type() {
        let mut map = TypeMap::builtin(TargetKind::Relational);
        map.apply_overrides(&[("AutoIncrement".to_string(), "BIGSERIAL".to_string())].into_iter().collect());
        assert_eq!(map.type_for(AtomicType::AutoIncrement).unwrap(), "BIGSERIAL");
        assert_eq!(map.reference_for(AtomicType::AutoIncrement).unwrap(), "BIGINT");

        map.apply_overrides(&[("AutoIncrement".to_string(), "BIGINT".to_string())].into_iter().collect());
        assert_eq!(map.reference_for(AtomicType::AutoIncrement).unwrap(), "BIGINT");
        assert!(map.references.is_empty());
    }

    #[test]
    fn unmapped_type_errors() {
        let mut map = TypeMap::builtin(TargetKind::Go);
        map.types.remove("Sealed");
        let err = map.type_for(AtomicType::Sealed).unwrap_err();
        assert!(matches!(err, TargetError::UnmappedType { .. }));
        assert_eq!(map.missing(), vec![AtomicType::Sealed]);
    }
}
