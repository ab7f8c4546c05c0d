//! Error types for target operations.

/// Errors that can occur while building or configuring a target.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    /// A `[targets]` section or target profile could not be read.
    #[error("invalid targets document: {0}")]
    Toml(#[from] toml::de::Error),

    /// A target profile could not be written out as TOML.
    #[error("cannot dump target profile: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// No target with this name exists.
    #[error("unknown target '{name}' (expected one of: relational, go, typescript)")]
    UnknownTarget { name: String },

    /// The type map has no entry for an atomic type.
    #[error("target '{target}' has no mapping for atomic type '{atomic}'")]
    UnmappedType { target: String, atomic: String },

    /// Invalid target configuration.
    #[error("validation error: {detail}")]
    Validation { detail: String },
}

/// Result type for target operations.
pub type Result<T> = std::result::Result<T, TargetError>;
