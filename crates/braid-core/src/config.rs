//! Configuration types and parsing for braid.yml

use crate::error::{CoreError, CoreResult};
use crate::migration::MigrationKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Main project configuration from braid.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Directories containing schema migrations for the primary target
    #[serde(default = "default_schema_paths")]
    pub schema_paths: Vec<String>,

    /// Directories containing data migrations (primary target only)
    #[serde(default = "default_data_paths")]
    pub data_paths: Vec<String>,

    /// Name under which the primary database is reported
    #[serde(default = "default_primary_target")]
    pub primary_target: String,

    /// Primary database connection
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Additional database targets that carry their own schema migrations
    #[serde(default)]
    pub targets: BTreeMap<String, TargetConfig>,

    /// Version ledger table names
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Snapshot dump settings
    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

/// Database connection configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// DuckDB file path (relative to the project root) or `:memory:`.
    ///
    /// When unset the target gets a file under `db/` so ledgers persist
    /// between invocations.
    #[serde(default)]
    pub path: Option<String>,
}

impl DatabaseConfig {
    /// Returns true for an explicitly configured in-memory database.
    pub fn is_memory(&self) -> bool {
        self.path.as_deref() == Some(MEMORY_DB_PATH)
    }

    /// Configured path, or `db/<stem>.duckdb` when none is set.
    pub fn path_or_default(&self, stem: &str) -> String {
        match &self.path {
            Some(path) => path.clone(),
            None => default_db_path(stem),
        }
    }
}

/// A secondary database target.
///
/// Secondary targets only run schema migrations; data migrations are defined
/// once and applied to the primary target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Database connection for this target (default: `db/<target>.duckdb`)
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Schema migration directories (default: `db/<target>_migrate`)
    #[serde(default)]
    pub schema_paths: Vec<String>,
}

/// Names of the two ledger tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    /// Table recording applied schema migrations
    #[serde(default = "default_schema_table")]
    pub schema_table: String,

    /// Table recording applied data migrations
    #[serde(default = "default_data_table")]
    pub data_table: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            schema_table: default_schema_table(),
            data_table: default_data_table(),
        }
    }
}

impl LedgerConfig {
    /// Ledger table for a migration kind.
    pub fn table_for(&self, kind: MigrationKind) -> &str {
        match kind {
            MigrationKind::Schema => &self.schema_table,
            MigrationKind::Data => &self.data_table,
        }
    }
}

/// Serialization format of snapshot files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    /// YAML (default)
    #[default]
    Yaml,
    /// JSON
    Json,
}

impl SnapshotFormat {
    /// File extension used for this format.
    pub fn extension(self) -> &'static str {
        match self {
            SnapshotFormat::Yaml => "yml",
            SnapshotFormat::Json => "json",
        }
    }
}

impl fmt::Display for SnapshotFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotFormat::Yaml => write!(f, "yaml"),
            SnapshotFormat::Json => write!(f, "json"),
        }
    }
}

/// Snapshot dump settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnapshotConfig {
    /// Directory receiving snapshot files
    #[serde(default = "default_snapshot_path")]
    pub path: String,

    /// Snapshot file format
    #[serde(default)]
    pub format: SnapshotFormat,

    /// Dump snapshots automatically after migrations change state
    #[serde(default = "default_true")]
    pub dump: bool,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: default_snapshot_path(),
            format: SnapshotFormat::default(),
            dump: true,
        }
    }
}

/// Path value selecting an in-memory DuckDB database
pub const MEMORY_DB_PATH: &str = ":memory:";

/// Directory holding databases whose path is not configured
pub const DEFAULT_DB_DIR: &str = "db";

/// Environment variable consulted by [`Config::resolve_target`]
pub const TARGET_ENV_VAR: &str = "BRAID_TARGET";

fn default_schema_paths() -> Vec<String> {
    vec!["db/migrate".to_string()]
}

fn default_data_paths() -> Vec<String> {
    vec!["db/data".to_string()]
}

fn default_primary_target() -> String {
    "primary".to_string()
}

fn default_db_path(stem: &str) -> String {
    format!("{DEFAULT_DB_DIR}/{stem}.duckdb")
}

fn default_schema_table() -> String {
    "schema_migrations".to_string()
}

fn default_data_table() -> String {
    "data_migrations".to_string()
}

fn default_snapshot_path() -> String {
    "db".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config = Self::parse(&content).map_err(|e| match e {
            CoreError::YamlParse(yaml) => CoreError::ConfigParseError {
                message: format!("{}: {}", path.display(), yaml),
            },
            other => other,
        })?;
        Ok(config)
    }

    /// Parse and validate configuration from YAML text
    pub fn parse(content: &str) -> CoreResult<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for braid.yml or braid.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("braid.yml");
        let yaml_path = dir.join("braid.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.name.is_empty() {
            return Err(invalid("Project name cannot be empty"));
        }
        if self.database.path.is_none() && !is_target_name(&self.name) {
            return Err(invalid(format!(
                "Project name '{}' cannot name the default database file; set database.path",
                self.name
            )));
        }
        if self.database.path.as_deref() == Some("") {
            return Err(invalid("database.path cannot be empty"));
        }
        if self.schema_paths.is_empty() {
            return Err(invalid("At least one schema_paths entry must be specified"));
        }
        if self.data_paths.is_empty() {
            return Err(invalid("At least one data_paths entry must be specified"));
        }
        if !is_target_name(&self.primary_target) {
            return Err(invalid(format!(
                "Invalid primary_target '{}': use letters, digits, '_' or '-'",
                self.primary_target
            )));
        }
        for name in self.targets.keys() {
            if !is_target_name(name) {
                return Err(invalid(format!(
                    "Invalid target name '{name}': use letters, digits, '_' or '-'"
                )));
            }
            if *name == self.primary_target {
                return Err(invalid(format!(
                    "Target '{name}' has the same name as the primary target"
                )));
            }
        }
        for table in [&self.ledger.schema_table, &self.ledger.data_table] {
            if !is_identifier(table) {
                return Err(invalid(format!("Invalid ledger table name '{table}'")));
            }
        }
        if self.ledger.schema_table == self.ledger.data_table {
            return Err(invalid(
                "ledger.schema_table and ledger.data_table must differ",
            ));
        }
        Ok(())
    }

    /// Names of every configured target, primary first.
    pub fn target_names(&self) -> Vec<&str> {
        std::iter::once(self.primary_target.as_str())
            .chain(self.targets.keys().map(|s| s.as_str()))
            .collect()
    }

    /// Resolve target from CLI flag or BRAID_TARGET environment variable
    ///
    /// Priority: CLI flag > BRAID_TARGET env var > None
    pub fn resolve_target(cli_target: Option<&str>) -> Option<String> {
        cli_target
            .map(String::from)
            .or_else(|| std::env::var(TARGET_ENV_VAR).ok())
            .filter(|t| !t.is_empty())
    }
}

fn invalid(message: impl Into<String>) -> CoreError {
    CoreError::ConfigInvalid {
        message: message.into(),
    }
}

/// Ledger tables are interpolated into SQL, so only plain identifiers pass.
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Target names end up in snapshot file names.
fn is_target_name(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
