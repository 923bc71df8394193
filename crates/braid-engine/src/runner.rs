//! Applies or reverts one migration on one target.

use crate::catalog::TargetCatalog;
use crate::error::EngineResult;
use crate::executor::BodyExecutor;
use braid_core::{CoreError, Direction, MigrationKind, MigrationRecord, Version};
use braid_db::{Ledgers, TargetDb, VersionLedger};
use duckdb::Connection;
use std::time::Instant;

/// Runs a single migration body and keeps its ledger in step with it.
pub struct MigrationRunner<'a> {
    executor: &'a dyn BodyExecutor,
    ledgers: &'a Ledgers,
}

impl<'a> MigrationRunner<'a> {
    pub fn new(executor: &'a dyn BodyExecutor, ledgers: &'a Ledgers) -> Self {
        Self { executor, ledgers }
    }

    /// Run `(kind, version)` in `direction` against `db`.
    ///
    /// The body and the ledger write share one transaction unless the
    /// executor reports the body as non-transactional; then the ledger is
    /// written right after the body succeeds. A failing body leaves the
    /// ledger untouched and its error is returned as is.
    pub fn run(
        &self,
        db: &TargetDb,
        catalog: &TargetCatalog,
        direction: Direction,
        kind: MigrationKind,
        version: Version,
    ) -> EngineResult<MigrationRecord> {
        let record = catalog
            .find(kind, version)
            .ok_or(CoreError::MigrationNotFound { kind, version })?;
        debug_assert!(Ledgers::tracks(db, kind));
        let ledger = self.ledgers.for_kind(kind);

        log::info!(
            "== {}: {} {} {} {}",
            db.name(),
            kind,
            record.version,
            record.name,
            match direction {
                Direction::Up => "migrating",
                Direction::Down => "reverting",
            }
        );
        let started = Instant::now();

        let apply = |conn: &Connection| -> EngineResult<()> {
            self.executor.execute(conn, db.name(), record, direction)?;
            record_outcome(ledger, conn, direction, version)
        };
        if self.executor.transactional(record)? {
            db.transaction(apply)?;
        } else {
            apply(db.conn())?;
        }

        log::info!(
            "== {}: {} {} {} {} ({:.4}s)",
            db.name(),
            kind,
            record.version,
            record.name,
            match direction {
                Direction::Up => "migrated",
                Direction::Down => "reverted",
            },
            started.elapsed().as_secs_f64()
        );
        Ok(record.clone())
    }
}

fn record_outcome(
    ledger: &VersionLedger,
    conn: &Connection,
    direction: Direction,
    version: Version,
) -> EngineResult<()> {
    match direction {
        Direction::Up => ledger.mark_applied(conn, version)?,
        Direction::Down => ledger.mark_reverted(conn, version)?,
    }
    Ok(())
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
