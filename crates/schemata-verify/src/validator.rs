//! Validator orchestrator: runs every registered check and batches the
//! violations into one report.

use schemata_core::ModelGraph;
use schemata_resolve::Resolution;
use tracing::{debug, info};

use crate::checks::{
    EntityPathCheck, EnumCheck, IdentifierCheck, MemberCheck, PolymorphismCheck, RelationCheck,
};
use crate::report::ValidationReport;
use crate::rule::{Check, Rule, Violation};

/// Holds the checks to run.
#[derive(Debug, Default)]
pub struct Validator {
    checks: Vec<Box<dyn Check>>,
}

impl Validator {
    /// An empty validator.
    pub fn new() -> Self {
        Self::default()
    }

    /// A validator with every standard check registered.
    pub fn standard() -> Self {
        let mut v = Self::new();
        v.register(Box::new(IdentifierCheck));
        v.register(Box::new(MemberCheck));
        v.register(Box::new(RelationCheck));
        v.register(Box::new(PolymorphismCheck));
        v.register(Box::new(EnumCheck));
        v.register(Box::new(EntityPathCheck));
        v
    }

    pub fn register(&mut self, check: Box<dyn Check>) {
        self.checks.push(check);
    }

    pub fn check_names(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    /// Run every check over `graph`.
    pub fn validate(&self, graph: &ModelGraph) -> ValidationReport {
        let violations = self.collect(graph);
        let summary = graph.summary();
        let declarations =
            summary.models + summary.entities + summary.enums + summary.structures;
        info!(
            checks = self.checks.len(),
            violations = violations.len(),
            "validation finished"
        );
        ValidationReport::new(self.checks.len(), declarations, violations)
    }

    /// Validate a resolution, folding its reference errors in ahead of the
    /// rule violations so one report carries every problem of the run.
    pub fn validate_resolution(&self, resolution: &Resolution) -> ValidationReport {
        let mut report = self.validate(&resolution.graph);
        let mut violations: Vec<Violation> = resolution
            .errors
            .iter()
            .map(|e| Violation::new(e.declaration(), Rule::UnresolvedReference, e.to_string()))
            .collect();
        violations.append(&mut report.violations);
        ValidationReport::new(report.summary.checks, report.summary.declarations, violations)
    }

    fn collect(&self, graph: &ModelGraph) -> Vec<Violation> {
        let mut out = Vec::new();
        for check in &self.checks {
            let before = out.len();
            check.run(graph, &mut out);
            debug!(check = check.name(), found = out.len() - before, "check ran");
        }
        out
    }
}
