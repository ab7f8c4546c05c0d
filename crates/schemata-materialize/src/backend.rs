//! The backend contract and the backend registry.

use std::fmt;

use schemata_core::ModelGraph;
use schemata_targets::{TargetKind, TargetProfile, TargetsConfig};
use serde::Serialize;

use crate::error::{MaterializationError, UnsupportedConstruct};
use crate::go::GoBackend;
use crate::relational::RelationalBackend;
use crate::typescript::TypeScriptBackend;

/// The rendered output of one backend.
#[derive(Debug, Clone, Serialize)]
pub struct Artifact {
    pub target: TargetKind,
    /// Suggested file name, e.g. `schema.sql`.
    pub file_name: String,
    pub content: String,
    /// Declarations that produced output.
    pub declarations: usize,
    pub unsupported: Vec<UnsupportedConstruct>,
}

impl Artifact {
    pub fn is_complete(&self) -> bool {
        self.unsupported.is_empty()
    }
}

/// A generation backend: consumes the frozen graph with its target profile
/// (type map, naming convention, settings) and renders one artifact.
///
/// Object-safe so backends can be stored in `Box<dyn Backend>`.
pub trait Backend: fmt::Debug + Send + Sync {
    fn profile(&self) -> &TargetProfile;

    fn target(&self) -> TargetKind {
        self.profile().target
    }

    /// Render every declaration of `graph`. Unsupported constructs are
    /// collected in the artifact rather than aborting generation.
    fn generate(&self, graph: &ModelGraph) -> Artifact;
}

/// Registry of available backends.
#[derive(Debug, Default)]
pub struct BackendRegistry {
    backends: Vec<Box<dyn Backend>>,
}

impl BackendRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// All three backends with their built-in profiles.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(RelationalBackend::new(TargetProfile::builtin(
            TargetKind::Relational,
        ))));
        registry.register(Box::new(GoBackend::new(TargetProfile::builtin(TargetKind::Go))));
        registry.register(Box::new(TypeScriptBackend::new(TargetProfile::builtin(
            TargetKind::Typescript,
        ))));
        registry
    }

    /// All three backends with profiles adjusted by a `[targets]` section.
    pub fn configured(config: &TargetsConfig) -> Result<Self, MaterializationError> {
        let mut registry = Self::new();
        registry.register(Box::new(RelationalBackend::new(TargetProfile::configured(
            TargetKind::Relational,
            &config.relational,
        )?)));
        registry.register(Box::new(GoBackend::new(TargetProfile::configured(
            TargetKind::Go,
            &config.go,
        )?)));
        registry.register(Box::new(TypeScriptBackend::new(TargetProfile::configured(
            TargetKind::Typescript,
            &config.typescript,
        )?)));
        Ok(registry)
    }

    /// Register a backend, replacing any backend for the same target.
    pub fn register(&mut self, backend: Box<dyn Backend>) {
        self.backends.retain(|b| b.target() != backend.target());
        self.backends.push(backend);
    }

    pub fn get(&self, target: TargetKind) -> Option<&dyn Backend> {
        self.backends
            .iter()
            .find(|b| b.target() == target)
            .map(|b| b.as_ref())
    }

    pub fn targets(&self) -> Vec<TargetKind> {
        self.backends.iter().map(|b| b.target()).collect()
    }

    /// The backends for `targets`, in the requested order; every registered
    /// backend when `targets` is empty.
    pub fn select(&self, targets: &[TargetKind]) -> Result<Vec<&dyn Backend>, MaterializationError> {
        if targets.is_empty() {
            return Ok(self.backends.iter().map(|b| b.as_ref()).collect());
        }
        let mut selected: Vec<&dyn Backend> = Vec::new();
        for &target in targets {
            let backend = self
                .get(target)
                .ok_or(MaterializationError::UnknownBackend { target })?;
            if !selected.iter().any(|b| b.target() == target) {
                selected.push(backend);
            }
        }
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_has_all_targets() {
        let registry = BackendRegistry::builtin();
        assert_eq!(registry.targets(), TargetKind::ALL.to_vec());
    }

    #[test]
    fn select_subset_in_order() {
        let registry = BackendRegistry::builtin();
        let selected = registry
            .select(&[TargetKind::Typescript, TargetKind::Relational, TargetKind::Typescript])
            .unwrap();
        let targets: Vec<_> = selected.iter().map(|b| b.target()).collect();
        assert_eq!(targets, vec![TargetKind::Typescript, TargetKind::Relational]);
    }

    #[test]
    fn select_missing_backend() {
        let mut registry = BackendRegistry::new();
        registry.register(Box::new(GoBackend::new(TargetProfile::builtin(TargetKind::Go))));
        let err = registry.select(&[TargetKind::Relational]).unwrap_err();
        assert!(matches!(
            err,
            MaterializationError::UnknownBackend {
                target: TargetKind::Relational
            }
        ));
    }

    #[test]
    fn register_replaces_same_target() {
        let mut registry = BackendRegistry::builtin();
        let mut profile = TargetProfile::builtin(TargetKind::Go);
        profile.package = "crm".into();
        registry.register(Box::new(GoBackend::new(profile)));
        assert_eq!(registry.targets().len(), 3);
        let go = registry.get(TargetKind::Go).unwrap();
        assert_eq!(go.profile().package, "crm");
    }

    #[test]
    fn configured_registry_rejects_bad_overrides() {
        let mut config = TargetsConfig::default();
        config.relational.types.insert("Text".into(), "TEXT".into());
        assert!(BackendRegistry::configured(&config).is_err());
    }
}
