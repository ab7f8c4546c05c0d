//! `schemata inspect`: dump the validated model graph as JSON.

use std::path::PathBuf;

use anyhow::{bail, Result};
use schemata_core::ModelGraph;
use schemata_materialize::validation_gate;
use schemata_resolve::resolve_set;
use schemata_verify::Validator;

use crate::input::load_declarations;

/// Resolve and validate `files`, returning the graph only if it passes.
pub fn validated_graph(files: &[PathBuf]) -> Result<ModelGraph> {
    let set = load_declarations(files)?;
    let resolution = resolve_set(&set);
    let decision = validation_gate(&resolution, &Validator::standard());
    if !decision.passed() {
        eprint!("{}", decision.report());
        bail!("graph is invalid: {} violation(s)", decision.report().violations.len());
    }
    Ok(resolution.graph)
}

pub fn run(files: &[PathBuf]) -> Result<()> {
    let graph = validated_graph(files)?;
    println!("{}", graph.to_json()?);
    Ok(())
}
