//! Schema registry: one name → declaration index per declaration kind.
//!
//! The registry performs no type or relationship checking. It only rejects
//! duplicate names within a kind and answers lookups.

use std::collections::HashMap;

use thiserror::Error;

use crate::decl::{
    DeclKind, Declaration, DeclarationSet, EntityDecl, EnumDecl, ModelDecl, StructureDecl,
};

/// Errors raised by registration and lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("duplicate {kind} declaration '{name}'")]
    DuplicateDeclaration { kind: DeclKind, name: String },

    #[error("unknown {kind} '{name}'")]
    UnknownDeclaration { kind: DeclKind, name: String },
}

/// Registration-ordered declarations of one kind.
#[derive(Debug, Default)]
struct DeclIndex {
    entries: Vec<Declaration>,
    positions: HashMap<String, usize>,
}

impl DeclIndex {
    fn insert(&mut self, declaration: Declaration) -> Result<(), RegistryError> {
        let name = declaration.name().to_string();
        if self.positions.contains_key(&name) {
            return Err(RegistryError::DuplicateDeclaration {
                kind: declaration.kind(),
                name,
            });
        }
        self.positions.insert(name, self.entries.len());
        self.entries.push(declaration);
        Ok(())
    }

    fn get(&self, name: &str) -> Option<&Declaration> {
        self.positions.get(name).map(|&i| &self.entries[i])
    }
}

/// Holds every registered declaration, keyed by kind and name.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    models: DeclIndex,
    entities: DeclIndex,
    enums: DeclIndex,
    structures: DeclIndex,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn index(&self, kind: DeclKind) -> &DeclIndex {
        match kind {
            DeclKind::Model => &self.models,
            DeclKind::Entity => &self.entities,
            DeclKind::Enum => &self.enums,
            DeclKind::Structure => &self.structures,
        }
    }

    fn index_mut(&mut self, kind: DeclKind) -> &mut DeclIndex {
        match kind {
            DeclKind::Model => &mut self.models,
            DeclKind::Entity => &mut self.entities,
            DeclKind::Enum => &mut self.enums,
            DeclKind::Structure => &mut self.structures,
        }
    }

    /// Register a declaration under its kind's namespace.
    pub fn register(&mut self, declaration: impl Into<Declaration>) -> Result<(), RegistryError> {
        let declaration = declaration.into();
        self.index_mut(declaration.kind()).insert(declaration)
    }

    /// Register a whole set. Every duplicate is reported; the first
    /// registration of a name wins and registration continues.
    pub fn register_all(&mut self, set: &DeclarationSet) -> Vec<RegistryError> {
        set.declarations()
            .filter_map(|d| self.register(d).err())
            .collect()
    }

    /// Build a registry from a set, returning it with any duplicate errors.
    pub fn from_set(set: &DeclarationSet) -> (Self, Vec<RegistryError>) {
        let mut registry = Self::new();
        let errors = registry.register_all(set);
        (registry, errors)
    }

    /// Look up a declaration by kind and name.
    pub fn lookup(&self, kind: DeclKind, name: &str) -> Result<&Declaration, RegistryError> {
        self.index(kind)
            .get(name)
            .ok_or_else(|| RegistryError::UnknownDeclaration {
                kind,
                name: name.to_string(),
            })
    }

    pub fn contains(&self, kind: DeclKind, name: &str) -> bool {
        self.index(kind).get(name).is_some()
    }

    pub fn model(&self, name: &str) -> Option<&ModelDecl> {
        match self.models.get(name) {
            Some(Declaration::Model(m)) => Some(m),
            _ => None,
        }
    }

    pub fn entity(&self, name: &str) -> Option<&EntityDecl> {
        match self.entities.get(name) {
            Some(Declaration::Entity(e)) => Some(e),
            _ => None,
        }
    }

    pub fn enum_decl(&self, name: &str) -> Option<&EnumDecl> {
        match self.enums.get(name) {
            Some(Declaration::Enum(e)) => Some(e),
            _ => None,
        }
    }

    pub fn structure(&self, name: &str) -> Option<&StructureDecl> {
        match self.structures.get(name) {
            Some(Declaration::Structure(s)) => Some(s),
            _ => None,
        }
    }

    pub fn models(&self) -> impl Iterator<Item = &ModelDecl> {
        self.models.entries.iter().filter_map(|d| match d {
            Declaration::Model(m) => Some(m),
            _ => None,
        })
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntityDecl> {
        self.entities.entries.iter().filter_map(|d| match d {
            Declaration::Entity(e) => Some(e),
            _ => None,
        })
    }

    pub fn enums(&self) -> impl Iterator<Item = &EnumDecl> {
        self.enums.entries.iter().filter_map(|d| match d {
            Declaration::Enum(e) => Some(e),
            _ => None,
        })
    }

    pub fn structures(&self) -> impl Iterator<Item = &StructureDecl> {
        self.structures.entries.iter().filter_map(|d| match d {
            Declaration::Structure(s) => Some(s),
            _ => None,
        })
    }

    /// Number of registered declarations of `kind`.
    pub fn count(&self, kind: DeclKind) -> usize {
        self.index(kind).entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EnumRepr;

    #[test]
    fn register_and_lookup() {
        let mut registry = SchemaRegistry::new();
        registry.register(ModelDecl::new("Person")).unwrap();
        let found = registry.lookup(DeclKind::Model, "Person").unwrap();
        assert_eq!(found.name(), "Person");
        assert!(registry.model("Person").is_some());
    }

    #[test]
    fn duplicate_within_kind_rejected() {
        let mut registry = SchemaRegistry::new();
        registry.register(ModelDecl::new("Person")).unwrap();
        let err = registry.register(ModelDecl::new("Person")).unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateDeclaration {
                kind: DeclKind::Model,
                name: "Person".into()
            }
        );
    }

    #[test]
    fn same_name_different_kinds_allowed() {
        let mut registry = SchemaRegistry::new();
        registry.register(ModelDecl::new("Status")).unwrap();
        registry
            .register(EnumDecl::new("Status", EnumRepr::String))
            .unwrap();
        assert!(registry.contains(DeclKind::Model, "Status"));
        assert!(registry.contains(DeclKind::Enum, "Status"));
    }

    #[test]
    fn unknown_lookup_fails() {
        let registry = SchemaRegistry::new();
        let err = registry.lookup(DeclKind::Entity, "Ghost").unwrap_err();
        assert!(matches!(err, RegistryError::UnknownDeclaration { .. }));
        assert_eq!(err.to_string(), "unknown entity 'Ghost'");
    }

    #[test]
    fn register_all_reports_every_duplicate_and_keeps_first() {
        let set = DeclarationSet::new()
            .with(ModelDecl::new("A").primary(&["ID"]))
            .with(ModelDecl::new("A"))
            .with(ModelDecl::new("B"))
            .with(ModelDecl::new("B"));
        let (registry, errors) = SchemaRegistry::from_set(&set);
        assert_eq!(errors.len(), 2);
        assert_eq!(registry.count(DeclKind::Model), 2);
        assert_eq!(registry.model("A").unwrap().identifiers.len(), 1);
    }

    #[test]
    fn iteration_follows_registration_order() {
        let set = DeclarationSet::new()
            .with(ModelDecl::new("Zebra"))
            .with(ModelDecl::new("Aardvark"));
        let (registry, _) = SchemaRegistry::from_set(&set);
        let names: Vec<_> = registry.models().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Zebra", "Aardvark"]);
    }
}
