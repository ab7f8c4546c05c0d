//! Deterministic constraint identifiers.
//!
//! Names are `<prefix>_<table>_<columns>`. A name over the identifier limit
//! is abbreviated to the first letter of each underscore-delimited token
//! (the prefix is kept). If the abbreviation is still too long, or the name
//! collides with one already issued, a hash suffix is appended: the first 8
//! hex digits of the SHA-256 of the full name.

use std::collections::HashSet;

use sha2::{Digest, Sha256};

/// The kinds of named constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    ForeignKey,
    Unique,
    Index,
}

impl ConstraintKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            ConstraintKind::ForeignKey => "fk",
            ConstraintKind::Unique => "uk",
            ConstraintKind::Index => "idx",
        }
    }
}

const HASH_LEN: usize = 8;

/// Issues unique constraint names within one schema.
#[derive(Debug, Clone)]
pub struct ConstraintNamer {
    limit: usize,
    used: HashSet<String>,
}

impl ConstraintNamer {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            used: HashSet::new(),
        }
    }

    /// Name a constraint over `columns` of `table`.
    pub fn name(&mut self, kind: ConstraintKind, table: &str, columns: &[String]) -> String {
        let full = format!("{}_{}_{}", kind.prefix(), table, columns.join("_"));
        if full.len() <= self.limit && self.claim(&full) {
            return full;
        }

        let stem = if full.len() > self.limit {
            let short = abbreviate(kind.prefix(), &full);
            if short.len() <= self.limit && self.claim(&short) {
                return short;
            }
            short
        } else {
            full.clone()
        };

        let keep = self.limit.saturating_sub(HASH_LEN + 1);
        let stem: String = stem.chars().take(keep).collect();
        let stem = stem.trim_end_matches('_');
        let mut salt = 0usize;
        loop {
            let candidate = format!("{stem}_{}", short_hash(&full, salt));
            if self.claim(&candidate) {
                return candidate;
            }
            salt += 1;
        }
    }

    fn claim(&mut self, name: &str) -> bool {
        self.used.insert(name.to_string())
    }
}

/// `fk_contact_info_id` → `fk_c_i_i`.
fn abbreviate(prefix: &str, full: &str) -> String {
    let rest = full
        .strip_prefix(prefix)
        .map(|r| r.trim_start_matches('_'))
        .unwrap_or(full);
    let letters: Vec<String> = rest
        .split('_')
        .filter_map(|token| token.chars().next())
        .map(String::from)
        .collect();
    format!("{prefix}_{}", letters.join("_"))
}

/// First 8 hex digits of SHA-256 over `full` (and a salt, after the first
/// collision).
fn short_hash(full: &str, salt: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(full.as_bytes());
    if salt > 0 {
        hasher.update(salt.to_le_bytes());
    }
    let digest = hasher.finalize();
    digest
        .iter()
        .take(HASH_LEN / 2)
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn short_names_kept_in_full() {
        let mut namer = ConstraintNamer::new(63);
        assert_eq!(
            namer.name(ConstraintKind::ForeignKey, "people", &cols(&["contact_info_id"])),
            "fk_people_contact_info_id"
        );
        assert_eq!(
            namer.name(ConstraintKind::Index, "people", &cols(&["contact_info_id"])),
            "idx_people_contact_info_id"
        );
        assert_eq!(
            namer.name(ConstraintKind::Unique, "nationalities", &cols(&["key"])),
            "uk_nationalities_key"
        );
    }

    #[test]
    fn long_names_abbreviated() {
        let mut namer = ConstraintNamer::new(63);
        let name = namer.name(
            ConstraintKind::ForeignKey,
            "international_shipping_consolidation_manifests",
            &cols(&["originating_customs_broker_id"]),
        );
        assert_eq!(name, "fk_i_s_c_m_o_c_b_i");
        assert!(name.len() <= 63);
    }

    #[test]
    fn colliding_abbreviation_gets_hash_suffix() {
        let mut namer = ConstraintNamer::new(24);
        let a = namer.name(ConstraintKind::Index, "alpha_beta_gamma", &cols(&["delta_id"]));
        let b = namer.name(ConstraintKind::Index, "apple_banana_grape", &cols(&["date_id"]));
        assert_eq!(a, "idx_a_b_g_d_i");
        assert_ne!(a, b);
        assert!(b.starts_with("idx_a_b_g_d_i_"));
        assert_eq!(b.len(), "idx_a_b_g_d_i_".len() + 8);
        assert!(b.len() <= 24);
    }

    #[test]
    fn hash_suffix_is_deterministic() {
        let run = || {
            let mut namer = ConstraintNamer::new(16);
            namer.name(
                ConstraintKind::ForeignKey,
                "very_long_table_name_with_many_parts",
                &cols(&["another_long_column_name_id"]),
            )
        };
        let name = run();
        assert_eq!(name, run());
        assert!(name.len() <= 16);
        assert!(name.starts_with("fk_v_l_"));
        assert_eq!(name.rsplit('_').next().map(str::len), Some(8));
    }

    #[test]
    fn exact_duplicate_full_name_disambiguated() {
        let mut namer = ConstraintNamer::new(63);
        let a = namer.name(ConstraintKind::Index, "people", &cols(&["name"]));
        let b = namer.name(ConstraintKind::Index, "people", &cols(&["name"]));
        assert_eq!(a, "idx_people_name");
        assert!(b.starts_with("idx_people_name_"));
        assert_ne!(a, b);
    }
}
