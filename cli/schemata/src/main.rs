//! schemata CLI: resolve schema declarations and generate relational DDL,
//! Go and TypeScript from them.

mod commands;
mod input;
mod manifest;

use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use schemata_targets::TargetsConfig;
use tracing_subscriber::EnvFilter;

use manifest::SchemataManifest;

#[derive(Parser)]
#[command(name = "schemata", version, about = "Schema resolution and multi-target code generation")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register, resolve and validate declarations
    Check {
        /// Declaration files (default: [input] declarations in schemata.toml)
        files: Vec<String>,
        /// Report format (human, json)
        #[arg(long)]
        report: Option<String>,
    },
    /// Validate declarations and generate code for the selected targets
    Generate {
        /// Declaration files (default: [input] declarations in schemata.toml)
        files: Vec<String>,
        /// Target to generate (repeatable; default: [targets] enabled)
        #[arg(long)]
        target: Vec<String>,
        /// Output directory (default: [output] dir in schemata.toml, else stdout)
        #[arg(long)]
        out: Option<String>,
    },
    /// Dump the validated model graph as JSON
    Inspect {
        /// Declaration files (default: [input] declarations in schemata.toml)
        files: Vec<String>,
    },
    /// Show generation targets
    Targets {
        #[command(subcommand)]
        action: TargetAction,
    },
}

#[derive(Subcommand)]
enum TargetAction {
    /// List available generation targets
    List,
    /// Show the built-in profile of a target
    Describe {
        /// Target name
        name: String,
        /// Output format (default: human-readable, "toml" for TOML)
        #[arg(long)]
        format: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// Log to stderr so generated output on stdout stays clean.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Check { files, report } => {
            let (manifest, project_dir) = load_manifest_optional(&cwd)?;
            let files = declaration_files(&cwd, &files, manifest.as_ref(), project_dir.as_deref())?;
            commands::check::run(&files, report.as_deref())
        }

        Commands::Generate { files, target, out } => {
            let (manifest, project_dir) = load_manifest_optional(&cwd)?;
            let files = declaration_files(&cwd, &files, manifest.as_ref(), project_dir.as_deref())?;
            let default_targets = TargetsConfig::default();
            let targets_config = manifest.as_ref().map_or(&default_targets, |m| &m.targets);
            let config = commands::generate::pipeline_config(targets_config, &target)?;
            let out_dir = match out {
                Some(out) => Some(cwd.join(out)),
                None => manifest
                    .as_ref()
                    .zip(project_dir.as_deref())
                    .and_then(|(m, dir)| m.output_dir(dir)),
            };
            commands::generate::run(&files, &config, out_dir.as_deref())
        }

        Commands::Inspect { files } => {
            let (manifest, project_dir) = load_manifest_optional(&cwd)?;
            let files = declaration_files(&cwd, &files, manifest.as_ref(), project_dir.as_deref())?;
            commands::inspect::run(&files)
        }

        Commands::Targets { action } => match action {
            TargetAction::List => commands::targets::list(),
            TargetAction::Describe { name, format } => {
                commands::targets::describe(&name, format.as_deref())
            }
        },
    }
}

fn declaration_files(
    cwd: &Path,
    files: &[String],
    manifest: Option<&SchemataManifest>,
    project_dir: Option<&Path>,
) -> anyhow::Result<Vec<PathBuf>> {
    input::declaration_files(cwd, files, manifest.zip(project_dir))
}

/// Try to load a manifest from the current directory upward. Returns (None, None) if not found.
fn load_manifest_optional(cwd: &Path) -> anyhow::Result<(Option<SchemataManifest>, Option<PathBuf>)> {
    match SchemataManifest::find_and_load(cwd)? {
        Some((manifest, dir)) => Ok((Some(manifest), Some(dir))),
        None => Ok((None, None)),
    }
}
