//! A loaded braid project: configuration plus the directory it lives in.

use crate::config::{Config, DatabaseConfig, MEMORY_DB_PATH};
use crate::error::{CoreError, CoreResult};
use crate::migration::MigrationKind;
use crate::source::MigrationSource;
use crate::target_name::TargetName;
use std::path::{Path, PathBuf};

/// A project rooted at the directory containing `braid.yml`.
#[derive(Debug, Clone)]
pub struct Project {
    /// Directory that relative paths resolve against
    pub root: PathBuf,
    /// Parsed configuration
    pub config: Config,
}

/// Fully resolved description of one database target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSpec {
    pub name: TargetName,
    /// The primary target owns the data ledger.
    pub primary: bool,
    /// Absolute DuckDB path, or `:memory:`
    pub database_path: String,
    /// Absolute schema migration directories
    pub schema_paths: Vec<PathBuf>,
}

impl Project {
    /// Load the project in `root`, reading `config_path` when given.
    pub fn load(root: &Path, config_path: Option<&Path>) -> CoreResult<Self> {
        if !root.is_dir() {
            return Err(CoreError::ConfigNotFound {
                path: root.display().to_string(),
            });
        }
        let config = match config_path {
            Some(path) => Config::load(path)?,
            None => Config::load_from_dir(root)?,
        };
        Ok(Self::from_config(root, config))
    }

    /// Wrap an already parsed configuration.
    pub fn from_config(root: &Path, config: Config) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
        }
    }

    fn absolute(&self, paths: &[String]) -> Vec<PathBuf> {
        paths.iter().map(|p| self.root.join(p)).collect()
    }

    fn database_path(&self, db: &DatabaseConfig, stem: &str) -> String {
        if db.is_memory() {
            MEMORY_DB_PATH.to_string()
        } else {
            self.root.join(db.path_or_default(stem)).display().to_string()
        }
    }

    /// Every configured target, primary first.
    pub fn targets(&self) -> Vec<TargetSpec> {
        let primary = TargetSpec {
            name: TargetName::new(self.config.primary_target.clone()),
            primary: true,
            database_path: self.database_path(&self.config.database, &self.config.name),
            schema_paths: self.absolute(&self.config.schema_paths),
        };

        std::iter::once(primary)
            .chain(self.config.targets.iter().map(|(name, target)| {
                let schema_paths = if target.schema_paths.is_empty() {
                    vec![self.root.join("db").join(format!("{name}_migrate"))]
                } else {
                    self.absolute(&target.schema_paths)
                };
                TargetSpec {
                    name: TargetName::new(name.clone()),
                    primary: false,
                    database_path: self.database_path(&target.database, name),
                    schema_paths,
                }
            }))
            .collect()
    }

    /// Targets to operate on, optionally restricted to one name.
    pub fn select_targets(&self, only: Option<&str>) -> CoreResult<Vec<TargetSpec>> {
        let all = self.targets();
        match only {
            None => Ok(all),
            Some(name) => {
                let available = self.config.target_names().join(", ");
                let selected: Vec<TargetSpec> =
                    all.iter().filter(|t| t.name == name).cloned().collect();
                if selected.is_empty() {
                    return Err(CoreError::ConfigInvalid {
                        message: format!(
                            "Target '{name}' not found. Available targets: {available}"
                        ),
                    });
                }
                Ok(selected)
            }
        }
    }

    /// Absolute data migration directories.
    pub fn data_paths(&self) -> Vec<PathBuf> {
        self.absolute(&self.config.data_paths)
    }

    /// Source of schema migrations for `target`.
    pub fn schema_source(&self, target: &TargetSpec) -> MigrationSource {
        MigrationSource::new(MigrationKind::Schema, target.schema_paths.clone())
    }

    /// Source of data migrations (shared by the whole project).
    pub fn data_source(&self) -> MigrationSource {
        MigrationSource::new(MigrationKind::Data, self.data_paths())
    }

    /// Absolute snapshot directory.
    pub fn snapshot_dir(&self) -> PathBuf {
        self.root.join(&self.config.snapshot.path)
    }
}

#[cfg(test)]
#[path = "project_test.rs"]
mod tests;
