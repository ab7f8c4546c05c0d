//! Resolution error types.

use schemata_core::{DeclKind, RegistryError};

/// A reference that could not be resolved. Fatal to the referencing member;
/// resolution of everything else continues.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// Duplicate registration surfaced while building the registry.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("{declaration}.{member}: unknown {kind} '{name}'")]
    UnknownDeclaration {
        declaration: String,
        member: String,
        kind: DeclKind,
        name: String,
    },

    #[error("{declaration}.{field}: unknown enum '{name}'")]
    UnknownEnum {
        declaration: String,
        field: String,
        name: String,
    },

    #[error("{declaration}.{field}: broken indirection path '{path}': {reason}")]
    BrokenIndirectionPath {
        declaration: String,
        field: String,
        path: String,
        reason: String,
    },

    #[error("{declaration}.{field}: indirection path '{path}' revisits model '{model}'")]
    CyclicIndirection {
        declaration: String,
        field: String,
        path: String,
        model: String,
    },

    #[error("{declaration}.{relation}: malformed relation: {detail}")]
    MalformedRelation {
        declaration: String,
        relation: String,
        detail: String,
    },

    #[error("{declaration}.{field}: indirection path '{path}' is only allowed on entities")]
    IndirectionOutsideEntity {
        declaration: String,
        field: String,
        path: String,
    },
}

impl ResolveError {
    /// Name of the declaration the error belongs to.
    pub fn declaration(&self) -> &str {
        match self {
            ResolveError::Registry(RegistryError::DuplicateDeclaration { name, .. })
            | ResolveError::Registry(RegistryError::UnknownDeclaration { name, .. }) => name,
            ResolveError::UnknownDeclaration { declaration, .. }
            | ResolveError::UnknownEnum { declaration, .. }
            | ResolveError::BrokenIndirectionPath { declaration, .. }
            | ResolveError::CyclicIndirection { declaration, .. }
            | ResolveError::MalformedRelation { declaration, .. }
            | ResolveError::IndirectionOutsideEntity { declaration, .. } => declaration,
        }
    }

    /// Short machine-readable error kind.
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::Registry(RegistryError::DuplicateDeclaration { .. }) => {
                "DuplicateDeclaration"
            }
            ResolveError::Registry(RegistryError::UnknownDeclaration { .. })
            | ResolveError::UnknownDeclaration { .. } => "UnknownDeclaration",
            ResolveError::UnknownEnum { .. } => "UnknownEnum",
            ResolveError::BrokenIndirectionPath { .. } => "BrokenIndirectionPath",
            ResolveError::CyclicIndirection { .. } => "CyclicIndirection",
            ResolveError::MalformedRelation { .. } => "MalformedRelation",
            ResolveError::IndirectionOutsideEntity { .. } => "IndirectionOutsideEntity",
        }
    }
}

pub type Result<T> = std::result::Result<T, ResolveError>;
