//! Invariant validation for the schemata intermediate model graph.
//!
//! Every check runs to completion; violations are collected rather than
//! returned early, so a single report names every problem in a run.

pub mod checks;
pub mod report;
pub mod rule;
pub mod validator;

pub use report::{ReportSummary, ValidationReport};
pub use rule::{Check, Rule, Violation};
pub use validator::Validator;
