//! Validation report with summary statistics.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::rule::{Rule, Violation};

/// Summary statistics for a validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub checks: usize,
    pub declarations: usize,
    pub violations: usize,
}

/// The complete validation report. A non-empty violation list blocks
/// generation.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub summary: ReportSummary,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new(checks: usize, declarations: usize, violations: Vec<Violation>) -> Self {
        Self {
            summary: ReportSummary {
                checks,
                declarations,
                violations: violations.len(),
            },
            violations,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violation counts per rule.
    pub fn by_rule(&self) -> BTreeMap<Rule, usize> {
        let mut counts = BTreeMap::new();
        for v in &self.violations {
            *counts.entry(v.rule).or_insert(0) += 1;
        }
        counts
    }

    /// Violations attached to one declaration.
    pub fn for_declaration<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Violation> {
        self.violations.iter().filter(move |v| v.declaration == name)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Validation Report ===")?;
        writeln!(
            f,
            "Checks: {} | Declarations: {} | Violations: {}",
            self.summary.checks, self.summary.declarations, self.summary.violations
        )?;
        if self.violations.is_empty() {
            writeln!(f, "No violations.")?;
        } else {
            writeln!(f, "--- Violations ---")?;
            for v in &self.violations {
                writeln!(f, "{v}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ValidationReport {
        ValidationReport::new(
            6,
            3,
            vec![
                Violation::new("Person", Rule::MissingPrimaryIdentifier, "no identifier named 'primary'"),
                Violation::new("Dog", Rule::DuplicateIdentity, "identity 'dog' already selects 'Wolf'"),
                Violation::new("Company", Rule::AmbiguousAliasTarget, "ambiguous").at("Staff"),
            ],
        )
    }

    #[test]
    fn display_lists_every_violation() {
        let text = sample().to_string();
        assert!(text.contains("=== Validation Report ==="));
        assert!(text.contains("Violations: 3"));
        assert!(text.contains("Company.Staff: [AmbiguousAliasTarget] ambiguous"));
        assert!(text.contains("Person: [MissingPrimaryIdentifier]"));
    }

    #[test]
    fn clean_report() {
        let report = ValidationReport::new(6, 1, Vec::new());
        assert!(report.is_clean());
        assert!(report.to_string().contains("No violations."));
    }

    #[test]
    fn json_shape() {
        let json = sample().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["summary"]["violations"], 3);
        assert_eq!(value["violations"][2]["rule"], "AmbiguousAliasTarget");
        assert_eq!(value["violations"][2]["context"], "Staff");
        assert!(value["violations"][0].get("context").is_none());
    }

    #[test]
    fn counts_by_rule() {
        let report = sample();
        assert_eq!(report.by_rule()[&Rule::DuplicateIdentity], 1);
        assert_eq!(report.for_declaration("Dog").count(), 1);
    }
}
