//! Target database connections.
//!
//! [`TargetDb`] owns one DuckDB [`Connection`] for one configured target.
//! [`TargetPool`] opens every selected target once per invocation and hands
//! them out by name; callers pass the handle explicitly to whatever runs
//! against it.

use crate::error::{DbError, DbResult};
use braid_core::{TargetName, TargetSpec};
use duckdb::Connection;
use std::path::Path;

/// One open target database.
///
/// Single-threaded; migrations run strictly one at a time.
pub struct TargetDb {
    spec: TargetSpec,
    conn: Connection,
}

impl TargetDb {
    /// Open (or create) the database described by `spec`.
    pub fn open(spec: TargetSpec) -> DbResult<Self> {
        let conn = if spec.database_path == braid_core::config::MEMORY_DB_PATH {
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?
        } else {
            let path = Path::new(&spec.database_path);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    DbError::ConnectionError(format!("{e}: {}", parent.display()))
                })?;
            }
            Connection::open(path)
                .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?
        };
        log::debug!(
            "Opened target '{}' at {}",
            spec.name,
            spec.database_path
        );
        Ok(Self { spec, conn })
    }

    /// Open an in-memory target with no schema paths.
    ///
    /// Useful for unit tests that don't need persistence.
    pub fn open_memory(name: &str, primary: bool) -> DbResult<Self> {
        Self::open(TargetSpec {
            name: TargetName::new(name),
            primary,
            database_path: braid_core::config::MEMORY_DB_PATH.to_string(),
            schema_paths: Vec::new(),
        })
    }

    /// Target name.
    pub fn name(&self) -> &TargetName {
        &self.spec.name
    }

    /// Whether this target owns the data ledger.
    pub fn is_primary(&self) -> bool {
        self.spec.primary
    }

    /// Resolved target description.
    pub fn spec(&self) -> &TargetSpec {
        &self.spec
    }

    /// Borrow the underlying DuckDB connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Execute one or more SQL statements.
    pub fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(format!("{e}")))
    }

    /// Execute `body` within a `BEGIN` / `COMMIT` transaction, rolling back on
    /// error.
    pub fn transaction<F, T, E>(&self, body: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<DbError>,
    {
        self.conn
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;

        let result = body(&self.conn);

        match &result {
            Ok(_) => {
                if let Err(commit_err) = self.conn.execute_batch("COMMIT") {
                    let _ = self.conn.execute_batch("ROLLBACK");
                    return Err(DbError::TransactionError(format!(
                        "COMMIT failed: {commit_err}"
                    ))
                    .into());
                }
            }
            Err(_) => {
                if let Err(rollback_err) = self.conn.execute_batch("ROLLBACK") {
                    log::warn!(
                        "ROLLBACK failed on target '{}': {rollback_err}",
                        self.spec.name
                    );
                }
            }
        }
        result
    }
}

/// Every target opened for one invocation, primary first.
pub struct TargetPool {
    targets: Vec<TargetDb>,
}

impl TargetPool {
    /// Open a connection for each target spec.
    pub fn open(specs: Vec<TargetSpec>) -> DbResult<Self> {
        let targets = specs
            .into_iter()
            .map(TargetDb::open)
            .collect::<DbResult<Vec<_>>>()?;
        Ok(Self { targets })
    }

    /// Build a pool from already open targets.
    pub fn from_targets(targets: Vec<TargetDb>) -> Self {
        Self { targets }
    }

    /// Look up an open target by name.
    pub fn connection(&self, name: &TargetName) -> DbResult<&TargetDb> {
        self.targets
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| DbError::UnknownTarget {
                name: name.to_string(),
                available: self
                    .targets
                    .iter()
                    .map(|t| t.name().as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// The primary target, if it was selected.
    pub fn primary(&self) -> Option<&TargetDb> {
        self.targets.iter().find(|t| t.is_primary())
    }

    /// Iterate targets in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &TargetDb> {
        self.targets.iter()
    }

    /// Number of open targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns true when no target is open.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(test)]
#[path = "connection_test.rs"]
mod tests;
