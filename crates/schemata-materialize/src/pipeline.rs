//! Materialization pipeline orchestrator.

use std::thread;
use std::time::Instant;

use schemata_core::{DeclarationSet, ModelGraph};
use schemata_resolve::{resolve_set, Resolution};
use schemata_targets::{TargetKind, TargetsConfig};
use schemata_verify::Validator;
use tracing::{debug, info, warn};

use crate::backend::{Artifact, Backend, BackendRegistry};
use crate::error::MaterializationError;
use crate::gate::gate_or_halt;
use crate::report::MaterializationReport;

/// Configuration for the materialization pipeline.
#[derive(Debug)]
pub struct PipelineConfig {
    pub validator: Validator,
    pub backends: BackendRegistry,
    /// Targets to generate; every registered backend when empty.
    pub targets: Vec<TargetKind>,
}

impl PipelineConfig {
    /// Standard checks and the built-in backends, all targets.
    pub fn standard() -> Self {
        Self {
            validator: Validator::standard(),
            backends: BackendRegistry::builtin(),
            targets: Vec::new(),
        }
    }

    /// Standard checks, backends configured by a `[targets]` section, and
    /// its enabled targets selected.
    pub fn from_targets(config: &TargetsConfig) -> Result<Self, MaterializationError> {
        Ok(Self {
            validator: Validator::standard(),
            backends: BackendRegistry::configured(config)?,
            targets: config.enabled_targets()?,
        })
    }

    pub fn with_targets(mut self, targets: Vec<TargetKind>) -> Self {
        self.targets = targets;
        self
    }
}

/// Output of a successful pipeline run.
#[derive(Debug)]
pub struct PipelineOutput {
    pub artifacts: Vec<Artifact>,
    pub report: MaterializationReport,
}

/// Run every backend over `graph` concurrently, one scoped thread per
/// backend. Artifacts come back in backend order.
pub fn run_backends(
    graph: &ModelGraph,
    backends: &[&dyn Backend],
) -> Result<Vec<Artifact>, MaterializationError> {
    thread::scope(|scope| {
        let handles: Vec<_> = backends
            .iter()
            .map(|&backend| {
                let target = backend.target();
                debug!(%target, "backend started");
                (target, scope.spawn(move || backend.generate(graph)))
            })
            .collect();

        handles
            .into_iter()
            .map(|(target, handle)| {
                let artifact = handle
                    .join()
                    .map_err(|_| MaterializationError::BackendPanicked { target })?;
                for u in &artifact.unsupported {
                    warn!(%target, construct = %u, "unsupported construct");
                }
                debug!(%target, bytes = artifact.content.len(), "backend finished");
                Ok(artifact)
            })
            .collect()
    })
}

/// Run the pipeline over a resolution: validation gate, then the selected
/// backends in parallel. A run failing the gate produces no artifacts.
pub fn materialize(
    resolution: &Resolution,
    config: &PipelineConfig,
) -> Result<PipelineOutput, MaterializationError> {
    let start = Instant::now();

    let validation = gate_or_halt(resolution, &config.validator)?;
    info!("validation gate passed");

    let backends = config.backends.select(&config.targets)?;
    let artifacts = run_backends(&resolution.graph, &backends)?;
    info!(artifacts = artifacts.len(), "generation finished");

    let duration_ms = start.elapsed().as_millis() as u64;
    let report = MaterializationReport::new(duration_ms, validation.summary, &artifacts);
    Ok(PipelineOutput { artifacts, report })
}

/// Register, resolve and materialize a declaration set.
pub fn materialize_set(
    set: &DeclarationSet,
    config: &PipelineConfig,
) -> Result<PipelineOutput, MaterializationError> {
    materialize(&resolve_set(set), config)
}
