//! Naming convention transforms applied by each target.

use schemata_core::naming;
use serde::{Deserialize, Serialize};

use crate::target::TargetKind;

/// A case transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameCase {
    Snake,
    Camel,
    Pascal,
    /// Pluralized snake case, for relational tables.
    PluralSnake,
    /// Keep declared PascalCase names (acronyms included), converting only
    /// names that are not already PascalCase.
    Exported,
}

impl NameCase {
    pub fn apply(&self, name: &str) -> String {
        match self {
            NameCase::Snake => naming::snake(name),
            NameCase::Camel => naming::camel(name),
            NameCase::Pascal => naming::pascal(name),
            NameCase::PluralSnake => naming::table_name(name),
            NameCase::Exported => {
                let exported = name.chars().next().is_some_and(char::is_uppercase)
                    && name.chars().all(char::is_alphanumeric);
                if exported {
                    name.to_string()
                } else {
                    naming::pascal(name)
                }
            }
        }
    }
}

/// How a target spells declaration names and member names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NamingConvention {
    /// Models, Entities, Structures, Enums.
    pub types: NameCase,
    /// Fields, columns, relation-derived members.
    pub members: NameCase,
}

impl NamingConvention {
    pub fn builtin(target: TargetKind) -> Self {
        match target {
            TargetKind::Relational => Self {
                types: NameCase::PluralSnake,
                members: NameCase::Snake,
            },
            TargetKind::Go => Self {
                types: NameCase::Exported,
                members: NameCase::Exported,
            },
            TargetKind::Typescript => Self {
                types: NameCase::Exported,
                members: NameCase::Camel,
            },
        }
    }

    pub fn type_name(&self, name: &str) -> String {
        self.types.apply(name)
    }

    pub fn member_name(&self, name: &str) -> String {
        self.members.apply(name)
    }
}
