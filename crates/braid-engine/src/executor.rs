//! Execution of migration bodies.

use crate::error::{EngineError, EngineResult};
use braid_core::{Direction, MigrationRecord, MigrationScript, TargetName};
use duckdb::Connection;

/// Runs the up or down body of one migration against a connection.
pub trait BodyExecutor {
    /// Whether the body may run inside the transaction that also writes the
    /// ledger.
    fn transactional(&self, record: &MigrationRecord) -> EngineResult<bool>;

    /// Execute the body for `direction`.
    fn execute(
        &self,
        conn: &Connection,
        target: &TargetName,
        record: &MigrationRecord,
        direction: Direction,
    ) -> EngineResult<()>;
}

/// Executes `.sql` migration scripts as written on disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqlScriptExecutor;

impl BodyExecutor for SqlScriptExecutor {
    fn transactional(&self, record: &MigrationRecord) -> EngineResult<bool> {
        Ok(MigrationScript::load(&record.path)?.transactional)
    }

    fn execute(
        &self,
        conn: &Connection,
        target: &TargetName,
        record: &MigrationRecord,
        direction: Direction,
    ) -> EngineResult<()> {
        let script = MigrationScript::load(&record.path)?;
        let body = script.body_for(record, direction)?;
        if body.trim().is_empty() {
            log::debug!("{} {} has an empty {direction} body", record.kind, record.version);
            return Ok(());
        }
        conn.execute_batch(body)
            .map_err(|e| EngineError::Execution {
                kind: record.kind,
                version: record.version,
                target: target.to_string(),
                direction,
                source: e.into(),
            })
    }
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
