//! TOML parsing and serialization for target configuration and profiles.

use crate::config::{TargetProfile, TargetsConfig};
use crate::error::Result;

/// Parse a standalone `[targets]`-shaped TOML document.
pub fn parse_targets_toml(toml_str: &str) -> Result<TargetsConfig> {
    let config: TargetsConfig = toml::from_str(toml_str)?;
    Ok(config)
}

/// Serialize a target profile to pretty TOML.
pub fn profile_to_toml(profile: &TargetProfile) -> Result<String> {
    let toml_str = toml::to_string_pretty(profile)?;
    Ok(toml_str)
}

/// Parse a target profile from TOML.
pub fn parse_profile_toml(toml_str: &str) -> Result<TargetProfile> {
    let profile: TargetProfile = toml::from_str(toml_str)?;
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::TargetKind;

    #[test]
    fn parse_targets_section() {
        let cfg = parse_targets_toml(
            r#"
enabled = ["relational", "typescript"]

[relational]
identifier-limit = 40
types = { Sealed = "BLOB" }

[go]
package = "crm"
"#,
        )
        .unwrap();
        assert_eq!(
            cfg.enabled_targets().unwrap(),
            vec![TargetKind::Relational, TargetKind::Typescript]
        );
        assert_eq!(cfg.relational.identifier_limit, Some(40));
        assert_eq!(cfg.relational.types["Sealed"], "BLOB");
        assert_eq!(cfg.go.package.as_deref(), Some("crm"));
    }

    #[test]
    fn profile_toml_round_trip() {
        let profile = TargetProfile::builtin(TargetKind::Relational);
        let text = profile_to_toml(&profile).unwrap();
        assert!(text.contains("identifier-limit = 63"));
        assert!(text.contains("AutoIncrement = \"SERIAL\""));
        let back = parse_profile_toml(&text).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn invalid_toml_errors() {
        assert!(parse_targets_toml("enabled = [").is_err());
    }
}
