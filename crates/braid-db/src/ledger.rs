//! Version ledgers: one table per migration kind recording applied versions.
//!
//! Every method takes the raw [`Connection`] so ledger writes can share the
//! transaction of the migration body they bracket.

use crate::connection::TargetDb;
use crate::error::{DbError, DbResult};
use braid_core::{LedgerConfig, MigrationKind, Version};
use duckdb::Connection;
use std::collections::BTreeSet;

/// Persisted set of applied versions for one migration kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionLedger {
    kind: MigrationKind,
    table: String,
}

impl VersionLedger {
    /// Ledger stored in `table`. The name must already be a validated
    /// identifier (see config validation).
    pub fn new(kind: MigrationKind, table: impl Into<String>) -> Self {
        Self {
            kind,
            table: table.into(),
        }
    }

    /// Migration kind tracked by this ledger.
    pub fn kind(&self) -> MigrationKind {
        self.kind
    }

    /// Backing table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    fn err(&self, message: impl std::fmt::Display) -> DbError {
        DbError::LedgerError {
            table: self.table.clone(),
            message: message.to_string(),
        }
    }

    /// Whether the backing table has been created.
    pub fn exists(&self, conn: &Connection) -> DbResult<bool> {
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables \
                 WHERE table_schema = 'main' AND table_name = ?",
                duckdb::params![self.table],
                |row| row.get(0),
            )
            .map_err(|e| self.err(e))?;
        Ok(count > 0)
    }

    /// Create the backing table if it does not exist.
    pub fn ensure_initialized(&self, conn: &Connection) -> DbResult<()> {
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                 version    BIGINT NOT NULL PRIMARY KEY,
                 applied_at TIMESTAMP NOT NULL DEFAULT now()
             );",
            self.table
        ))
        .map_err(|e| self.err(format!("failed to create ledger table: {e}")))
    }

    /// Applied versions, ascending. An uninitialized ledger is empty.
    pub fn applied_versions(&self, conn: &Connection) -> DbResult<BTreeSet<Version>> {
        if !self.exists(conn)? {
            return Ok(BTreeSet::new());
        }
        let mut stmt = conn
            .prepare(&format!("SELECT version FROM {} ORDER BY version", self.table))
            .map_err(|e| self.err(e))?;
        let rows = stmt
            .query_map([], |row| row.get::<_, i64>(0))
            .map_err(|e| self.err(e))?;

        let mut versions = BTreeSet::new();
        for row in rows {
            versions.insert(Version::new(row.map_err(|e| self.err(e))?));
        }
        Ok(versions)
    }

    /// Whether `version` is recorded.
    pub fn is_applied(&self, conn: &Connection, version: Version) -> DbResult<bool> {
        let count: i64 = conn
            .query_row(
                &format!("SELECT COUNT(*) FROM {} WHERE version = ?", self.table),
                duckdb::params![version.get()],
                |row| row.get(0),
            )
            .map_err(|e| self.err(e))?;
        Ok(count > 0)
    }

    /// Highest applied version, if any.
    pub fn current_version(&self, conn: &Connection) -> DbResult<Option<Version>> {
        Ok(self.applied_versions(conn)?.last().copied())
    }

    /// Record `version` as applied. No-op when already recorded.
    pub fn mark_applied(&self, conn: &Connection, version: Version) -> DbResult<()> {
        if self.is_applied(conn, version)? {
            return Ok(());
        }
        conn.execute(
            &format!("INSERT INTO {} (version) VALUES (?)", self.table),
            duckdb::params![version.get()],
        )
        .map_err(|e| self.err(format!("failed to record version {version}: {e}")))?;
        Ok(())
    }

    /// Remove `version`. No-op when not recorded.
    pub fn mark_reverted(&self, conn: &Connection, version: Version) -> DbResult<()> {
        conn.execute(
            &format!("DELETE FROM {} WHERE version = ?", self.table),
            duckdb::params![version.get()],
        )
        .map_err(|e| self.err(format!("failed to remove version {version}: {e}")))?;
        Ok(())
    }
}

/// The schema and data ledgers of a project.
#[derive(Debug, Clone)]
pub struct Ledgers {
    pub schema: VersionLedger,
    pub data: VersionLedger,
}

impl Ledgers {
    /// Build both ledgers from configuration.
    pub fn from_config(config: &LedgerConfig) -> Self {
        Self {
            schema: VersionLedger::new(
                MigrationKind::Schema,
                config.table_for(MigrationKind::Schema),
            ),
            data: VersionLedger::new(MigrationKind::Data, config.table_for(MigrationKind::Data)),
        }
    }

    /// Ledger for `kind`.
    pub fn for_kind(&self, kind: MigrationKind) -> &VersionLedger {
        match kind {
            MigrationKind::Schema => &self.schema,
            MigrationKind::Data => &self.data,
        }
    }

    /// Whether `target` keeps a ledger for `kind`. Only the primary target
    /// tracks data migrations.
    pub fn tracks(target: &TargetDb, kind: MigrationKind) -> bool {
        kind == MigrationKind::Schema || target.is_primary()
    }

    /// Create every ledger `target` keeps.
    pub fn ensure_initialized(&self, target: &TargetDb) -> DbResult<()> {
        for kind in MigrationKind::ALL {
            if Self::tracks(target, kind) {
                self.for_kind(kind).ensure_initialized(target.conn())?;
            }
        }
        Ok(())
    }

    /// Names of every ledger table, for excluding them from dumps.
    pub fn tables(&self) -> [&str; 2] {
        [self.schema.table(), self.data.table()]
    }
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
