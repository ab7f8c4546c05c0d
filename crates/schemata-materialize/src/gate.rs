//! Validation gate: decides whether a resolved graph may be materialized.

use schemata_resolve::Resolution;
use schemata_verify::{ValidationReport, Validator};

use crate::error::MaterializationError;

/// The gate's decision on whether generation may proceed.
#[derive(Debug)]
pub enum GateDecision {
    /// No reference errors and no invariant violations.
    Pass { report: ValidationReport },
    /// Generation must not run.
    Halt {
        violations: usize,
        report: ValidationReport,
    },
}

impl GateDecision {
    pub fn report(&self) -> &ValidationReport {
        match self {
            GateDecision::Pass { report } | GateDecision::Halt { report, .. } => report,
        }
    }

    pub fn passed(&self) -> bool {
        matches!(self, GateDecision::Pass { .. })
    }
}

/// Validate a resolution, folding its reference errors into the report,
/// and decide.
pub fn validation_gate(resolution: &Resolution, validator: &Validator) -> GateDecision {
    let report = validator.validate_resolution(resolution);
    if report.is_clean() {
        GateDecision::Pass { report }
    } else {
        GateDecision::Halt {
            violations: report.violations.len(),
            report,
        }
    }
}

/// Run the gate and return an error if it halts.
pub fn gate_or_halt(
    resolution: &Resolution,
    validator: &Validator,
) -> Result<ValidationReport, MaterializationError> {
    match validation_gate(resolution, validator) {
        GateDecision::Pass { report } => Ok(report),
        GateDecision::Halt { violations, .. } => {
            Err(MaterializationError::ValidationFailed { violations })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemata_core::decl::{FieldDecl, ModelDecl, RelationDecl};
    use schemata_core::DeclarationSet;
    use schemata_resolve::resolve_set;

    fn person() -> ModelDecl {
        ModelDecl::new("Person")
            .field(FieldDecl::new("ID", "AutoIncrement"))
            .field(FieldDecl::new("Name", "String"))
            .primary(&["ID"])
    }

    #[test]
    fn clean_graph_passes() {
        let set = DeclarationSet::new().with(person());
        let decision = validation_gate(&resolve_set(&set), &Validator::standard());
        assert!(decision.passed());
        assert!(decision.report().is_clean());
    }

    #[test]
    fn reference_errors_halt() {
        let set = DeclarationSet::new()
            .with(person().relation(RelationDecl::new("Employer", "ForOne")));
        let resolution = resolve_set(&set);
        let decision = validation_gate(&resolution, &Validator::standard());
        assert!(matches!(decision, GateDecision::Halt { violations, .. } if violations == 1));
    }

    #[test]
    fn invariant_violations_halt() {
        let set = DeclarationSet::new().with(ModelDecl::new("Orphan").field(FieldDecl::new("ID", "UUID")));
        let err = gate_or_halt(&resolve_set(&set), &Validator::standard()).unwrap_err();
        assert!(matches!(err, MaterializationError::ValidationFailed { violations: 1 }));
    }
}
