//! Migration discovery from directories on disk.
//!
//! A migration file is named `<version>_<name>.sql`, where `<version>` is a
//! run of digits. Discovery is stateless: every call rescans the directories.

use crate::error::{CoreError, CoreResult};
use crate::migration::{MigrationKind, MigrationRecord, Version};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Discovers the migrations of one kind from a set of directories.
#[derive(Debug, Clone)]
pub struct MigrationSource {
    kind: MigrationKind,
    paths: Vec<PathBuf>,
}

impl MigrationSource {
    /// Create a source scanning `paths` for migrations of `kind`.
    pub fn new(kind: MigrationKind, paths: Vec<PathBuf>) -> Self {
        Self { kind, paths }
    }

    /// Kind of migration this source yields.
    pub fn kind(&self) -> MigrationKind {
        self.kind
    }

    /// Directories scanned by this source.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Scan every directory and return the migrations ascending by version.
    ///
    /// Missing directories yield nothing. Files that do not follow the naming
    /// convention are skipped with a warning. Two files of this kind sharing a
    /// version is an error.
    pub fn discover(&self) -> CoreResult<Vec<MigrationRecord>> {
        let mut files = Vec::new();
        for dir in &self.paths {
            if dir.is_dir() {
                collect_sql_files(dir, &mut files)?;
            }
        }
        files.sort();

        let mut by_version: BTreeMap<Version, MigrationRecord> = BTreeMap::new();
        for path in files {
            let Some((version, name)) = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(parse_filename)
            else {
                log::warn!(
                    "Skipping {} migration file with unexpected name: {}",
                    self.kind,
                    path.display()
                );
                continue;
            };

            if let Some(existing) = by_version.get(&version) {
                return Err(CoreError::DuplicateVersion {
                    kind: self.kind,
                    version,
                    first: existing.path.display().to_string(),
                    second: path.display().to_string(),
                });
            }
            by_version.insert(
                version,
                MigrationRecord {
                    version,
                    name,
                    kind: self.kind,
                    path,
                },
            );
        }

        Ok(by_version.into_values().collect())
    }
}

/// Recursively collect `.sql` files under `dir`.
fn collect_sql_files(dir: &Path, files: &mut Vec<PathBuf>) -> CoreResult<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })?;

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_sql_files(&path, files)?;
        } else if path.extension().is_some_and(|e| e == "sql") {
            files.push(path);
        }
    }
    Ok(())
}

/// Split `20230101120000_add_users.sql` into its version and name.
pub fn parse_filename(file_name: &str) -> Option<(Version, String)> {
    let stem = file_name.strip_suffix(".sql")?;
    let (digits, name) = stem.split_once('_')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) || name.is_empty() {
        return None;
    }
    let version = digits.parse::<Version>().ok()?;
    Some((version, name.to_string()))
}

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;
