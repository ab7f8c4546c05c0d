//! `schemata.toml` manifest parsing and project configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use schemata_targets::TargetsConfig;
use serde::{Deserialize, Serialize};

pub const MANIFEST_FILE: &str = "schemata.toml";

/// The top-level manifest of a schemata project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemataManifest {
    /// Project metadata (required).
    pub project: ProjectConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Enabled targets and per-target settings.
    #[serde(default)]
    pub targets: TargetsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
}

/// Declaration documents, relative to the manifest directory. Merged in order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default)]
    pub declarations: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory generated files are written to, relative to the manifest
    /// directory. Generated output goes to stdout when unset.
    #[serde(default)]
    pub dir: Option<String>,
}

impl SchemataManifest {
    /// Search for `schemata.toml` from `start_dir` upward. Returns the
    /// manifest and the directory containing it.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest: SchemataManifest = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                manifest
                    .targets
                    .validate()
                    .map_err(|issues| {
                        let detail = issues
                            .iter()
                            .map(|i| format!("{}: {}", i.severity, i.message))
                            .collect::<Vec<_>>()
                            .join("; ");
                        anyhow::anyhow!("invalid [targets] section: {detail}")
                    })
                    .with_context(|| format!("validating {}", candidate.display()))?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                return Ok(None);
            }
        }
    }

    /// Declaration files named by the manifest, resolved against `project_dir`.
    pub fn declaration_paths(&self, project_dir: &Path) -> Vec<PathBuf> {
        self.input
            .declarations
            .iter()
            .map(|d| project_dir.join(d))
            .collect()
    }

    /// The configured output directory, resolved against `project_dir`.
    pub fn output_dir(&self, project_dir: &Path) -> Option<PathBuf> {
        self.output.dir.as_ref().map(|d| project_dir.join(d))
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        let manifest: SchemataManifest = toml::from_str(s)?;
        Ok(manifest)
    }
}
