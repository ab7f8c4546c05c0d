//! The `[targets]` section of a project manifest, and target profiles
//! built from it.

use std::collections::BTreeMap;

use schemata_core::types::AtomicType;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TargetError};
use crate::naming::NamingConvention;
use crate::target::TargetKind;
use crate::typemap::TypeMap;

/// Default constraint identifier limit (PostgreSQL `NAMEDATALEN - 1`).
pub const DEFAULT_IDENTIFIER_LIMIT: usize = 63;

/// A validation issue found in a target configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Severity: "error" or "warning".
    pub severity: &'static str,
    /// Human-readable description.
    pub message: String,
}

/// Per-target settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TargetConfig {
    /// Maximum constraint identifier length (relational).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier_limit: Option<usize>,
    /// Package name of generated source (go).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    /// Atomic type name → target type overrides.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub types: BTreeMap<String, String>,
}

/// The `[targets]` manifest section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TargetsConfig {
    #[serde(default = "default_enabled")]
    pub enabled: Vec<String>,
    #[serde(default)]
    pub relational: TargetConfig,
    #[serde(default)]
    pub go: TargetConfig,
    #[serde(default)]
    pub typescript: TargetConfig,
}

fn default_enabled() -> Vec<String> {
    TargetKind::ALL.iter().map(|t| t.name().to_string()).collect()
}

impl Default for TargetsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            relational: TargetConfig::default(),
            go: TargetConfig::default(),
            typescript: TargetConfig::default(),
        }
    }
}

impl TargetsConfig {
    pub fn for_target(&self, target: TargetKind) -> &TargetConfig {
        match target {
            TargetKind::Relational => &self.relational,
            TargetKind::Go => &self.go,
            TargetKind::Typescript => &self.typescript,
        }
    }

    /// Enabled targets, in configuration order.
    pub fn enabled_targets(&self) -> Result<Vec<TargetKind>> {
        self.enabled.iter().map(|n| TargetKind::from_name(n)).collect()
    }

    /// Check the whole section.
    pub fn validate(&self) -> std::result::Result<(), Vec<ValidationIssue>> {
        let mut issues = Vec::new();
        for name in &self.enabled {
            if TargetKind::from_name(name).is_err() {
                issues.push(ValidationIssue {
                    severity: "error",
                    message: format!("enabled target '{name}' is not a known target"),
                });
            }
        }
        for target in TargetKind::ALL {
            if let Err(mut found) = validate_target_config(target, self.for_target(target)) {
                issues.append(&mut found);
            }
        }
        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

/// Validate one target's settings: override keys must name atomic types,
/// mapped names must be non-empty, and the identifier limit must leave room
/// for a prefix and a hash suffix.
pub fn validate_target_config(
    target: TargetKind,
    config: &TargetConfig,
) -> std::result::Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    for (atomic, mapped) in &config.types {
        if AtomicType::from_name(atomic).is_none() {
            issues.push(ValidationIssue {
                severity: "error",
                message: format!("[targets.{target}] types: '{atomic}' is not an atomic type"),
            });
        }
        if mapped.trim().is_empty() {
            issues.push(ValidationIssue {
                severity: "error",
                message: format!("[targets.{target}] types: '{atomic}' maps to an empty name"),
            });
        }
    }

    if let Some(limit) = config.identifier_limit {
        if limit < 16 {
            issues.push(ValidationIssue {
                severity: "error",
                message: format!("[targets.{target}] identifier-limit {limit} is below the minimum of 16"),
            });
        }
        if target != TargetKind::Relational {
            issues.push(ValidationIssue {
                severity: "warning",
                message: format!("[targets.{target}] identifier-limit has no effect on this target"),
            });
        }
    }

    if config.package.is_some() && target != TargetKind::Go {
        issues.push(ValidationIssue {
            severity: "warning",
            message: format!("[targets.{target}] package has no effect on this target"),
        });
    }

    if issues.iter().any(|i| i.severity == "error") {
        Err(issues)
    } else {
        Ok(())
    }
}

/// Everything a backend needs to know about its target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TargetProfile {
    pub target: TargetKind,
    pub description: String,
    pub identifier_limit: usize,
    pub package: String,
    pub naming: NamingConvention,
    pub type_map: TypeMap,
}

impl TargetProfile {
    /// The built-in profile of `target`.
    pub fn builtin(target: TargetKind) -> Self {
        Self {
            target,
            description: target.description().to_string(),
            identifier_limit: DEFAULT_IDENTIFIER_LIMIT,
            package: "models".to_string(),
            naming: NamingConvention::builtin(target),
            type_map: TypeMap::builtin(target),
        }
    }

    /// The built-in profile with `config` applied. Invalid configuration is
    /// rejected with every error-severity issue in the message.
    pub fn configured(target: TargetKind, config: &TargetConfig) -> Result<Self> {
        if let Err(issues) = validate_target_config(target, config) {
            let detail = issues
                .iter()
                .filter(|i| i.severity == "error")
                .map(|i| i.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(TargetError::Validation { detail });
        }
        let mut profile = Self::builtin(target);
        profile.type_map.apply_overrides(&config.types);
        if let Some(limit) = config.identifier_limit {
            profile.identifier_limit = limit;
        }
        if let Some(package) = &config.package {
            profile.package = package.clone();
        }
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_section_enables_everything() {
        let cfg = TargetsConfig::default();
        assert_eq!(cfg.enabled_targets().unwrap(), TargetKind::ALL.to_vec());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn configured_profile_applies_overrides() {
        let config = TargetConfig {
            identifier_limit: Some(30),
            types: [("String".to_string(), "VARCHAR(255)".to_string())].into_iter().collect(),
            ..Default::default()
        };
        let profile = TargetProfile::configured(TargetKind::Relational, &config).unwrap();
        assert_eq!(profile.identifier_limit, 30);
        assert_eq!(
            profile.type_map.type_for(AtomicType::String).unwrap(),
            "VARCHAR(255)"
        );
    }

    #[test]
    fn unknown_atomic_and_empty_name_rejected() {
        let config = TargetConfig {
            types: [
                ("Text".to_string(), "TEXT".to_string()),
                ("Sealed".to_string(), " ".to_string()),
            ]
            .into_iter()
            .collect(),
            ..Default::default()
        };
        let issues = validate_target_config(TargetKind::Relational, &config).unwrap_err();
        assert_eq!(issues.len(), 2);
        let err = TargetProfile::configured(TargetKind::Relational, &config).unwrap_err();
        assert!(err.to_string().contains("'Text' is not an atomic type"));
    }

    #[test]
    fn warnings_do_not_block() {
        let config = TargetConfig {
            package: Some("x".into()),
            ..Default::default()
        };
        assert!(validate_target_config(TargetKind::Typescript, &config).is_ok());
    }

    #[test]
    fn unknown_enabled_target() {
        let cfg = TargetsConfig {
            enabled: vec!["go".into(), "cobol".into()],
            ..Default::default()
        };
        let issues = cfg.validate().unwrap_err();
        assert_eq!(issues.len(), 1);
        assert!(cfg.enabled_targets().is_err());
    }
}
