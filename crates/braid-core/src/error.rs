//! Error types for braid-core

use crate::migration::{MigrationKind, Version};
use thiserror::Error;

/// Core error type for braid
#[derive(Error, Debug)]
pub enum CoreError {
    /// B001: Configuration file not found
    #[error("[B001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// B002: Failed to parse configuration file
    #[error("[B002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// B003: Invalid configuration value
    #[error("[B003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// B004: A required operation parameter was not supplied
    #[error("[B004] Missing required parameter {param} for `{operation}`")]
    MissingParameter {
        param: &'static str,
        operation: &'static str,
    },

    /// B005: Two migration files of the same kind share a version
    #[error("[B005] Duplicate {kind} migration version {version}: {first} and {second}")]
    DuplicateVersion {
        kind: MigrationKind,
        version: Version,
        first: String,
        second: String,
    },

    /// B006: No discovered migration matches the requested version
    #[error("[B006] No {kind} migration found for version {version}")]
    MigrationNotFound {
        kind: MigrationKind,
        version: Version,
    },

    /// B007: The migration has no down section
    #[error("[B007] {kind} migration {version} is irreversible (no `-- migrate:down` section in {path})")]
    Irreversible {
        kind: MigrationKind,
        version: Version,
        path: String,
    },

    /// B008: Requested version does not exist in any migration kind
    #[error("[B008] No migration found for version {version}")]
    VersionNotFound { version: Version },

    /// B009: IO error
    #[error("[B009] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// B010: IO error with file path context
    #[error("[B010] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// B011: YAML parse error
    #[error("[B011] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
