//! Locating and loading declaration documents.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use schemata_core::DeclarationSet;
use tracing::debug;

use crate::manifest::SchemataManifest;

/// Declaration files to load: the ones given on the command line (relative
/// to `cwd`), else the manifest's `[input] declarations`.
pub fn declaration_files(
    cwd: &Path,
    files: &[String],
    manifest: Option<(&SchemataManifest, &Path)>,
) -> Result<Vec<PathBuf>> {
    if !files.is_empty() {
        return Ok(files.iter().map(|f| cwd.join(f)).collect());
    }
    match manifest {
        Some((m, dir)) if !m.input.declarations.is_empty() => Ok(m.declaration_paths(dir)),
        Some(_) => bail!("no declaration files given and [input] declarations is empty"),
        None => bail!("no declaration files given and no schemata.toml found"),
    }
}

/// Load and merge declaration documents in order. `.toml` files are parsed
/// as TOML, everything else as JSON.
pub fn load_declarations(paths: &[PathBuf]) -> Result<DeclarationSet> {
    let mut set = DeclarationSet::new();
    for path in paths {
        let document = load_document(path)?;
        debug!(
            path = %path.display(),
            declarations = document.len(),
            "declaration document loaded"
        );
        set.merge(document);
    }
    Ok(set)
}

fn load_document(path: &Path) -> Result<DeclarationSet> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let is_toml = path.extension().is_some_and(|ext| ext == "toml");
    let document = if is_toml {
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?
    } else {
        serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))?
    };
    Ok(document)
}
