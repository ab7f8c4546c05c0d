//! Generation target definitions for schemata.
//!
//! A target profile bundles what a backend needs beyond the model graph:
//! - **Type map:** atomic type → target type, plus reference types
//! - **Naming convention:** how declaration and member names are spelled
//! - **Settings:** identifier length limit, package name
//!
//! Built-in profiles can be adjusted from the `[targets]` section of a
//! project manifest.

pub mod config;
pub mod error;
pub mod naming;
pub mod parse;
pub mod target;
pub mod typemap;

pub use config::{TargetConfig, TargetProfile, TargetsConfig, ValidationIssue};
pub use error::{Result, TargetError};
pub use naming::{NameCase, NamingConvention};
pub use target::TargetKind;
pub use typemap::TypeMap;
