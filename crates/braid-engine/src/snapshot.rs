//! Snapshot files capturing each target's structure and ledgers.
//!
//! Dumpers refresh the files after migrations change state; the loader
//! replays them into fresh databases so new environments can skip running
//! the full migration history.
//!
//! Files under the snapshot directory: `schema.<ext>` for the primary
//! target, `<target>_schema.<ext>` for every other target, and
//! `data_schema.<ext>` for the data ledger.

use crate::error::{EngineError, EngineResult};
use braid_core::{MigrationKind, Project, SnapshotFormat, TargetName, Version};
use braid_db::introspect::{apply_relations, list_schemas};
use braid_db::{list_relations, Ledgers, RelationDdl, TargetDb, TargetPool, VersionLedger};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Persisted state of one ledger, plus the structure for schema snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub target: TargetName,
    pub kind: MigrationKind,
    /// Highest applied version
    pub version: Option<Version>,
    /// Every applied version, ascending
    pub applied: Vec<Version>,
    pub dumped_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemas: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relations: Vec<RelationDdl>,
}

impl Snapshot {
    /// File name of the `kind` snapshot of `target`.
    pub fn file_name(
        kind: MigrationKind,
        target: &TargetName,
        primary: bool,
        format: SnapshotFormat,
    ) -> String {
        let ext = format.extension();
        match kind {
            MigrationKind::Data => format!("data_schema.{ext}"),
            MigrationKind::Schema if primary => format!("schema.{ext}"),
            MigrationKind::Schema => format!("{target}_schema.{ext}"),
        }
    }

    fn capture(db: &TargetDb, ledger: &VersionLedger) -> EngineResult<Self> {
        let applied: Vec<Version> = ledger.applied_versions(db.conn())?.into_iter().collect();
        Ok(Self {
            target: db.name().clone(),
            kind: ledger.kind(),
            version: applied.last().copied(),
            applied,
            dumped_at: Utc::now(),
            schemas: Vec::new(),
            relations: Vec::new(),
        })
    }

    /// Serialize to `path`, creating parent directories.
    pub fn write(&self, path: &Path, format: SnapshotFormat) -> EngineResult<()> {
        let err = |message: String| EngineError::Snapshot {
            path: path.display().to_string(),
            message,
        };
        let content = match format {
            SnapshotFormat::Yaml => serde_yaml::to_string(self).map_err(|e| err(e.to_string()))?,
            SnapshotFormat::Json => {
                let mut json =
                    serde_json::to_string_pretty(self).map_err(|e| err(e.to_string()))?;
                json.push('\n');
                json
            }
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| err(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| err(e.to_string()))
    }

    /// Read a snapshot written by [`Snapshot::write`].
    pub fn read(path: &Path, format: SnapshotFormat) -> EngineResult<Self> {
        if !path.exists() {
            return Err(EngineError::SnapshotNotFound {
                path: path.display().to_string(),
            });
        }
        let err = |message: String| EngineError::Snapshot {
            path: path.display().to_string(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| err(e.to_string()))?;
        match format {
            SnapshotFormat::Yaml => serde_yaml::from_str(&content).map_err(|e| err(e.to_string())),
            SnapshotFormat::Json => serde_json::from_str(&content).map_err(|e| err(e.to_string())),
        }
    }
}

/// Something that persists state after migrations ran.
///
/// Implementations must tolerate being called any number of times.
pub trait Dumper {
    /// Short label used in logs and failure reports.
    fn name(&self) -> &'static str;

    /// Write snapshots for `pool`, returning the files written.
    fn dump(&self, pool: &TargetPool) -> EngineResult<Vec<PathBuf>>;
}

/// Dumps each target's structure and schema ledger.
#[derive(Debug, Clone)]
pub struct SchemaDumper {
    dir: PathBuf,
    format: SnapshotFormat,
    ledgers: Ledgers,
}

impl SchemaDumper {
    pub fn new(dir: PathBuf, format: SnapshotFormat, ledgers: Ledgers) -> Self {
        Self {
            dir,
            format,
            ledgers,
        }
    }

    pub fn from_project(project: &Project) -> Self {
        Self::new(
            project.snapshot_dir(),
            project.config.snapshot.format,
            Ledgers::from_config(&project.config.ledger),
        )
    }
}

impl Dumper for SchemaDumper {
    fn name(&self) -> &'static str {
        "schema"
    }

    fn dump(&self, pool: &TargetPool) -> EngineResult<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(pool.len());
        for db in pool.iter() {
            let mut snapshot = Snapshot::capture(db, &self.ledgers.schema)?;
            snapshot.schemas = list_schemas(db.conn())?;
            snapshot.relations = list_relations(db.conn(), &self.ledgers.tables())?;

            let path = self.dir.join(Snapshot::file_name(
                MigrationKind::Schema,
                db.name(),
                db.is_primary(),
                self.format,
            ));
            snapshot.write(&path, self.format)?;
            log::debug!("Dumped schema snapshot of '{}' to {}", db.name(), path.display());
            written.push(path);
        }
        Ok(written)
    }
}

/// Dumps the primary target's data ledger.
#[derive(Debug, Clone)]
pub struct DataDumper {
    dir: PathBuf,
    format: SnapshotFormat,
    ledgers: Ledgers,
}

impl DataDumper {
    pub fn new(dir: PathBuf, format: SnapshotFormat, ledgers: Ledgers) -> Self {
        Self {
            dir,
            format,
            ledgers,
        }
    }

    pub fn from_project(project: &Project) -> Self {
        Self::new(
            project.snapshot_dir(),
            project.config.snapshot.format,
            Ledgers::from_config(&project.config.ledger),
        )
    }
}

impl Dumper for DataDumper {
    fn name(&self) -> &'static str {
        "data"
    }

    fn dump(&self, pool: &TargetPool) -> EngineResult<Vec<PathBuf>> {
        let Some(db) = pool.primary() else {
            log::debug!("Primary target not selected; skipping data snapshot");
            return Ok(Vec::new());
        };
        let snapshot = Snapshot::capture(db, &self.ledgers.data)?;
        let path = self.dir.join(Snapshot::file_name(
            MigrationKind::Data,
            db.name(),
            true,
            self.format,
        ));
        snapshot.write(&path, self.format)?;
        log::debug!("Dumped data snapshot to {}", path.display());
        Ok(vec![path])
    }
}

/// Replays snapshots into fresh target databases.
#[derive(Debug, Clone)]
pub struct SchemaLoader {
    dir: PathBuf,
    format: SnapshotFormat,
    ledgers: Ledgers,
}

impl SchemaLoader {
    pub fn new(dir: PathBuf, format: SnapshotFormat, ledgers: Ledgers) -> Self {
        Self {
            dir,
            format,
            ledgers,
        }
    }

    pub fn from_project(project: &Project) -> Self {
        Self::new(
            project.snapshot_dir(),
            project.config.snapshot.format,
            Ledgers::from_config(&project.config.ledger),
        )
    }

    /// Load every target's snapshot.
    ///
    /// `format` overrides the configured format; `path_override` replaces the
    /// primary target's schema snapshot path. A missing schema snapshot is an
    /// error, a missing data snapshot only leaves the data ledger empty.
    pub fn load(
        &self,
        pool: &TargetPool,
        format: Option<SnapshotFormat>,
        path_override: Option<&Path>,
    ) -> EngineResult<Vec<PathBuf>> {
        let format = format.unwrap_or(self.format);
        let mut loaded = Vec::new();

        for db in pool.iter() {
            let path = match path_override {
                Some(path) if db.is_primary() => path.to_path_buf(),
                _ => self.dir.join(Snapshot::file_name(
                    MigrationKind::Schema,
                    db.name(),
                    db.is_primary(),
                    format,
                )),
            };
            let snapshot = Snapshot::read(&path, format)?;
            self.restore(db, &self.ledgers.schema, &snapshot)?;
            log::info!(
                "Loaded {} relation(s) into '{}' from {}",
                snapshot.relations.len(),
                db.name(),
                path.display()
            );
            loaded.push(path);

            if db.is_primary() {
                let data_path = self.dir.join(Snapshot::file_name(
                    MigrationKind::Data,
                    db.name(),
                    true,
                    format,
                ));
                if data_path.exists() {
                    let data = Snapshot::read(&data_path, format)?;
                    self.restore(db, &self.ledgers.data, &data)?;
                    loaded.push(data_path);
                } else {
                    log::warn!(
                        "No data snapshot at {}; data ledger starts empty",
                        data_path.display()
                    );
                    self.ledgers.data.ensure_initialized(db.conn())?;
                }
            }
        }
        Ok(loaded)
    }

    fn restore(
        &self,
        db: &TargetDb,
        ledger: &VersionLedger,
        snapshot: &Snapshot,
    ) -> EngineResult<()> {
        if snapshot.target != *db.name() {
            log::warn!(
                "Snapshot was dumped from '{}' but is being loaded into '{}'",
                snapshot.target,
                db.name()
            );
        }
        db.transaction(|conn| -> EngineResult<()> {
            apply_relations(conn, &snapshot.schemas, &snapshot.relations)?;
            ledger.ensure_initialized(conn)?;
            for version in &snapshot.applied {
                ledger.mark_applied(conn, *version)?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod tests;
