//! `schemata generate`: gate the declarations, then run the selected backends.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use schemata_materialize::{materialize, validation_gate, Artifact, PipelineConfig, PipelineOutput};
use schemata_resolve::resolve_set;
use schemata_targets::{TargetKind, TargetsConfig};
use tracing::info;

use crate::input::load_declarations;

/// Pipeline configuration from the `[targets]` section, narrowed to
/// `targets` when any are named.
pub fn pipeline_config(targets_config: &TargetsConfig, targets: &[String]) -> Result<PipelineConfig> {
    let config = PipelineConfig::from_targets(targets_config)?;
    if targets.is_empty() {
        return Ok(config);
    }
    let kinds = targets
        .iter()
        .map(|t| TargetKind::from_name(t))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(config.with_targets(kinds))
}

/// Load, resolve and materialize. A run blocked by the gate prints its
/// validation report to stderr and fails.
pub fn generate(files: &[PathBuf], config: &PipelineConfig) -> Result<PipelineOutput> {
    let set = load_declarations(files)?;
    let resolution = resolve_set(&set);

    let decision = validation_gate(&resolution, &config.validator);
    if !decision.passed() {
        eprint!("{}", decision.report());
        bail!(
            "generation blocked: {} violation(s)",
            decision.report().violations.len()
        );
    }

    Ok(materialize(&resolution, config)?)
}

/// Write one file per artifact into `out_dir`, creating it if needed.
pub fn write_artifacts(out_dir: &Path, artifacts: &[Artifact]) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;
    artifacts
        .iter()
        .map(|artifact| {
            let path = out_dir.join(&artifact.file_name);
            std::fs::write(&path, &artifact.content)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "artifact written");
            Ok(path)
        })
        .collect()
}

/// Generate and either write the artifacts to `out_dir` or print them.
/// Every artifact is emitted before unsupported constructs fail the run.
pub fn run(files: &[PathBuf], config: &PipelineConfig, out_dir: Option<&Path>) -> Result<()> {
    let output = generate(files, config)?;

    match out_dir {
        Some(dir) => {
            for path in write_artifacts(dir, &output.artifacts)? {
                println!("wrote {}", path.display());
            }
            println!();
            print!("{}", output.report);
        }
        None => {
            for artifact in &output.artifacts {
                print!("{}", artifact.content);
            }
        }
    }

    for construct in &output.report.unsupported {
        eprintln!("warning: unsupported construct: {construct}");
    }
    if !output.report.is_complete() {
        bail!(
            "{} unsupported construct(s); the remaining output was still generated",
            output.report.unsupported.len()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEOPLE: &str = r#"{
  "models": [
    {"name": "Person",
     "fields": [{"name": "ID", "type": "AutoIncrement"}, {"name": "Name", "type": "String"}],
     "identifiers": [{"name": "primary", "fields": ["ID"]}],
     "relations": [{"name": "ContactInfo", "type": "HasOne"}]},
    {"name": "ContactInfo",
     "fields": [{"name": "ID", "type": "AutoIncrement"}, {"name": "Email", "type": "String"}],
     "identifiers": [{"name": "primary", "fields": ["ID"]}]}
  ]
}"#;

    fn people(dir: &Path) -> PathBuf {
        let path = dir.join("people.json");
        std::fs::write(&path, PEOPLE).unwrap();
        path
    }

    #[test]
    fn writes_one_file_per_target() {
        let dir = tempfile::tempdir().unwrap();
        let file = people(dir.path());
        let out = dir.path().join("generated");
        let config = pipeline_config(&TargetsConfig::default(), &[]).unwrap();

        run(&[file], &config, Some(&out)).unwrap();
        assert!(out.join("schema.sql").is_file());
        assert!(out.join("models.go").is_file());
        assert!(out.join("models.ts").is_file());
        let sql = std::fs::read_to_string(out.join("schema.sql")).unwrap();
        assert!(sql.contains("CREATE TABLE people ("));
    }

    #[test]
    fn target_flag_narrows_backends() {
        let dir = tempfile::tempdir().unwrap();
        let file = people(dir.path());
        let config = pipeline_config(&TargetsConfig::default(), &["typescript".to_string()]).unwrap();

        let output = generate(&[file], &config).unwrap();
        assert_eq!(output.artifacts.len(), 1);
        assert_eq!(output.artifacts[0].target, TargetKind::Typescript);
    }

    #[test]
    fn unknown_target_is_rejected() {
        assert!(pipeline_config(&TargetsConfig::default(), &["cobol".to_string()]).is_err());
    }

    #[test]
    fn violations_block_generation() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bad.json");
        std::fs::write(&file, r#"{"models": [{"name": "Orphan"}]}"#).unwrap();
        let out = dir.path().join("generated");
        let config = PipelineConfig::standard();

        assert!(run(&[file], &config, Some(&out)).is_err());
        assert!(!out.exists());
    }

    #[test]
    fn unsupported_construct_fails_after_writing_siblings() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("membership.json");
        std::fs::write(
            &file,
            r#"{"models": [
  {"name": "Membership",
   "fields": [{"name": "PersonID", "type": "Integer"}, {"name": "ClubID", "type": "Integer"}],
   "identifiers": [{"name": "primary", "fields": ["PersonID", "ClubID"]}]},
  {"name": "Badge",
   "fields": [{"name": "ID", "type": "AutoIncrement"}],
   "identifiers": [{"name": "primary", "fields": ["ID"]}],
   "relations": [{"name": "Membership", "type": "ForOne"}]}
]}"#,
        )
        .unwrap();
        let out = dir.path().join("generated");
        let config = PipelineConfig::standard();

        assert!(run(&[file], &config, Some(&out)).is_err());
        assert!(out.join("schema.sql").is_file());
        assert!(out.join("models.go").is_file());
        assert!(out.join("models.ts").is_file());
    }
}
