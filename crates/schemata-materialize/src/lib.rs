//! Code generation for schemata.
//!
//! Takes a resolved Intermediate Model Graph through the validation gate
//! and, when it passes, runs every selected backend over the frozen graph
//! in parallel:
//!
//! - relational: PostgreSQL DDL (tables, lookup tables, junctions, views)
//! - go: structs, typed enums, hierarchy interfaces
//! - typescript: interfaces, enums, discriminated unions

pub mod backend;
pub mod error;
pub mod gate;
pub mod go;
mod keys;
pub mod pipeline;
pub mod relational;
pub mod report;
pub mod typescript;

pub use backend::{Artifact, Backend, BackendRegistry};
pub use error::{MaterializationError, UnsupportedConstruct};
pub use gate::{gate_or_halt, validation_gate, GateDecision};
pub use go::GoBackend;
pub use pipeline::{materialize, materialize_set, run_backends, PipelineConfig, PipelineOutput};
pub use relational::RelationalBackend;
pub use report::{ArtifactSummary, MaterializationReport};
pub use typescript::TypeScriptBackend;
