//! Core data structures for schemata: raw declarations, the schema
//! registry, and the Intermediate Model Graph every later stage reads.

pub mod builder;
pub mod decl;
pub mod graph;
pub mod naming;
pub mod registry;
pub mod types;

pub use decl::{DeclKind, Declaration, DeclarationSet};
pub use graph::ModelGraph;
pub use registry::{RegistryError, SchemaRegistry};
