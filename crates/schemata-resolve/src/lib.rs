//! Reference resolution for schemata.
//!
//! Takes a [`SchemaRegistry`](schemata_core::SchemaRegistry) of raw
//! declarations and produces the Intermediate Model Graph: field types
//! classified, relations canonicalized into the eight kinds, entity paths
//! pre-walked, and polymorphic hierarchies grouped. Resolution never stops at
//! the first problem; every reference error is collected.

pub mod error;
pub mod fields;
pub mod hierarchy;
pub mod paths;
pub mod relations;
pub mod resolver;

pub use error::{ResolveError, Result};
pub use resolver::{resolve, resolve_set, Resolution};
