//! The generation targets.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TargetError};

/// A supported output representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetKind {
    /// Relational DDL (PostgreSQL dialect): tables, views, constraints.
    Relational,
    /// Struct/interface-oriented source (Go).
    Go,
    /// Union-oriented source (TypeScript).
    Typescript,
}

impl TargetKind {
    pub const ALL: [TargetKind; 3] = [TargetKind::Relational, TargetKind::Go, TargetKind::Typescript];

    pub fn name(&self) -> &'static str {
        match self {
            TargetKind::Relational => "relational",
            TargetKind::Go => "go",
            TargetKind::Typescript => "typescript",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name() == name)
            .ok_or_else(|| TargetError::UnknownTarget {
                name: name.to_string(),
            })
    }

    pub fn description(&self) -> &'static str {
        match self {
            TargetKind::Relational => {
                "PostgreSQL DDL: tables, lookup tables, junctions, views, single-table inheritance"
            }
            TargetKind::Go => "Go structs, key structs, interfaces and factories",
            TargetKind::Typescript => "TypeScript interfaces, discriminated unions and type guards",
        }
    }

    /// File extension of the rendered artifact.
    pub fn extension(&self) -> &'static str {
        match self {
            TargetKind::Relational => "sql",
            TargetKind::Go => "go",
            TargetKind::Typescript => "ts",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for t in TargetKind::ALL {
            assert_eq!(TargetKind::from_name(t.name()).unwrap(), t);
        }
    }

    #[test]
    fn unknown_target() {
        let err = TargetKind::from_name("cobol").unwrap_err();
        assert!(err.to_string().contains("unknown target 'cobol'"));
    }
}
