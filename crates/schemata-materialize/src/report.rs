//! Materialization report aggregating the gate and every backend run.

use std::fmt;

use schemata_targets::TargetKind;
use schemata_verify::ReportSummary;
use serde::Serialize;

use crate::backend::Artifact;
use crate::error::UnsupportedConstruct;

/// One backend's contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSummary {
    pub target: TargetKind,
    pub file_name: String,
    pub declarations: usize,
    pub bytes: usize,
    pub unsupported: usize,
}

impl ArtifactSummary {
    pub fn of(artifact: &Artifact) -> Self {
        Self {
            target: artifact.target,
            file_name: artifact.file_name.clone(),
            declarations: artifact.declarations,
            bytes: artifact.content.len(),
            unsupported: artifact.unsupported.len(),
        }
    }
}

/// Summary report of a pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct MaterializationReport {
    /// Total pipeline duration in milliseconds.
    pub duration_ms: u64,
    pub validation: ReportSummary,
    pub artifacts: Vec<ArtifactSummary>,
    /// Unsupported constructs of every backend, in backend order.
    pub unsupported: Vec<UnsupportedConstruct>,
}

impl MaterializationReport {
    pub fn new(duration_ms: u64, validation: ReportSummary, artifacts: &[Artifact]) -> Self {
        Self {
            duration_ms,
            validation,
            artifacts: artifacts.iter().map(ArtifactSummary::of).collect(),
            unsupported: artifacts
                .iter()
                .flat_map(|a| a.unsupported.iter().cloned())
                .collect(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.unsupported.is_empty()
    }
}

impl fmt::Display for MaterializationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Materialization Report ===")?;
        writeln!(f, "Duration: {} ms", self.duration_ms)?;
        writeln!(f)?;
        writeln!(
            f,
            "--- Validation: PASSED ({} checks, {} declarations) ---",
            self.validation.checks, self.validation.declarations
        )?;

        writeln!(f)?;
        writeln!(f, "--- Artifacts ({}) ---", self.artifacts.len())?;
        for a in &self.artifacts {
            writeln!(
                f,
                "  {:<12} {:<14} {} declarations, {} bytes{}",
                a.target.name(),
                a.file_name,
                a.declarations,
                a.bytes,
                if a.unsupported > 0 {
                    format!(", {} unsupported", a.unsupported)
                } else {
                    String::new()
                }
            )?;
        }

        if !self.unsupported.is_empty() {
            writeln!(f)?;
            writeln!(f, "--- Unsupported Constructs ---")?;
            for u in &self.unsupported {
                writeln!(f, "  {u}")?;
            }
        }
        Ok(())
    }
}
