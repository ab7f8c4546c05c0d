//! `schemata targets`: generation target listing and description.

use anyhow::{bail, Result};
use schemata_core::types::AtomicType;
use schemata_targets::parse::profile_to_toml;
use schemata_targets::{TargetKind, TargetProfile};

/// List all built-in targets.
pub fn list() -> Result<()> {
    println!("Built-in targets:");
    println!();
    for target in TargetKind::ALL {
        println!("  {:<12} {}", target.name(), target.description());
    }
    println!();
    println!("Use 'schemata targets describe <name>' for details.");
    Ok(())
}

/// Describe a target's built-in profile.
pub fn describe(name: &str, format: Option<&str>) -> Result<()> {
    let target = match TargetKind::from_name(name) {
        Ok(t) => t,
        Err(_) => bail!("unknown target: '{name}'. Use 'schemata targets list' to see available targets."),
    };
    let profile = TargetProfile::builtin(target);

    match format {
        Some("toml") => {
            print!("{}", profile_to_toml(&profile)?);
            return Ok(());
        }
        Some(other) if other != "human" => bail!("unknown format: '{other}' (expected human or toml)"),
        _ => {}
    }

    println!("=== Target: {} ===", target.name());
    println!("{}", profile.description);
    println!();
    println!("--- Output ---");
    println!("  Extension:        .{}", target.extension());
    if target == TargetKind::Relational {
        println!("  Identifier limit: {}", profile.identifier_limit);
    }
    if target == TargetKind::Go {
        println!("  Package:          {}", profile.package);
    }
    println!();
    println!("--- Type Map ---");
    for atomic in AtomicType::ALL {
        let mapped = profile.type_map.type_for(atomic)?;
        let reference = profile.type_map.reference_for(atomic)?;
        if reference == mapped {
            println!("  {:<14} {mapped}", atomic.name());
        } else {
            println!("  {:<14} {mapped} (references: {reference})", atomic.name());
        }
    }
    Ok(())
}
