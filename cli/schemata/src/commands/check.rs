//! `schemata check`: register, resolve and validate declarations.

use std::path::PathBuf;

use anyhow::{bail, Result};
use schemata_resolve::resolve_set;
use schemata_verify::{ValidationReport, Validator};

use crate::input::load_declarations;

/// Run every stage up to the validation gate over `files`.
pub fn validate(files: &[PathBuf]) -> Result<ValidationReport> {
    let set = load_declarations(files)?;
    let resolution = resolve_set(&set);
    Ok(Validator::standard().validate_resolution(&resolution))
}

/// Print the validation report. Fails when any violation was found.
pub fn run(files: &[PathBuf], report_format: Option<&str>) -> Result<()> {
    let report = validate(files)?;

    match report_format.unwrap_or("human") {
        "human" => print!("{report}"),
        "json" => println!("{}", report.to_json()?),
        other => bail!("unknown report format: '{other}' (expected human or json)"),
    }

    if !report.is_clean() {
        bail!("{} violation(s) found", report.violations.len());
    }
    Ok(())
}
