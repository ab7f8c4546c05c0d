//! Materialization errors.

use schemata_targets::{TargetError, TargetKind};
use serde::Serialize;
use thiserror::Error;

/// Errors that stop the materialization pipeline.
#[derive(Debug, Error)]
pub enum MaterializationError {
    #[error("validation failed: {violations} violation(s), generation blocked")]
    ValidationFailed { violations: usize },

    #[error("no backend registered for target '{target}'")]
    UnknownBackend { target: TargetKind },

    #[error("backend '{target}' panicked during generation")]
    BackendPanicked { target: TargetKind },

    #[error(transparent)]
    Target(#[from] TargetError),
}

/// A construct one backend cannot express. Reported per backend; the
/// backend skips the offending member and keeps generating.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{target}: {declaration}{}: {detail}", member_suffix(.member))]
pub struct UnsupportedConstruct {
    pub target: TargetKind,
    pub declaration: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
    pub detail: String,
}

fn member_suffix(member: &Option<String>) -> String {
    member.as_ref().map(|m| format!(".{m}")).unwrap_or_default()
}

impl UnsupportedConstruct {
    pub fn new(target: TargetKind, declaration: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            target,
            declaration: declaration.into(),
            member: None,
            detail: detail.into(),
        }
    }

    pub fn at(mut self, member: impl Into<String>) -> Self {
        self.member = Some(member.into());
        self
    }
}
