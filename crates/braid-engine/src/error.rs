//! Error types for braid-engine

use crate::report::RunReport;
use braid_core::{CoreError, Direction, MigrationKind, Version};
use braid_db::DbError;
use thiserror::Error;

/// Errors raised while planning or executing migrations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration, discovery, or lookup error
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Database or ledger error
    #[error(transparent)]
    Db(#[from] DbError),

    /// A migration body failed (R001)
    #[error("[R001] {kind} migration {version} failed on target '{target}' while migrating {direction}")]
    Execution {
        kind: MigrationKind,
        version: Version,
        target: String,
        direction: Direction,
        #[source]
        source: DbError,
    },

    /// Pending migrations exist where none are allowed (R002)
    #[error("[R002] You have {count} pending migration(s):\n{listing}\nRun `braid migrate` to resolve this issue.")]
    PendingMigrations { count: usize, listing: String },

    /// Snapshot file is missing (R003)
    #[error("[R003] Snapshot not found: {path}")]
    SnapshotNotFound { path: String },

    /// Snapshot could not be written or read (R004)
    #[error("[R004] Snapshot {path} failed: {message}")]
    Snapshot { path: String, message: String },

    /// A run stopped after some migrations were already applied (R005)
    #[error("[R005] Run halted after {} migration(s)", .report.executed.len())]
    Halted {
        report: Box<RunReport>,
        #[source]
        source: Box<EngineError>,
    },
}

impl EngineError {
    /// True for "no such migration / version" errors.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.root(),
            EngineError::Core(CoreError::MigrationNotFound { .. })
                | EngineError::Core(CoreError::VersionNotFound { .. })
        )
    }

    /// The error that stopped the run, without the partial-run wrapper.
    pub fn root(&self) -> &EngineError {
        match self {
            EngineError::Halted { source, .. } => source.root(),
            other => other,
        }
    }

    /// Steps that were applied before the failure, if any.
    pub fn partial_report(&self) -> Option<&RunReport> {
        match self {
            EngineError::Halted { report, .. } => Some(&**report),
            _ => None,
        }
    }

    /// Attach steps that ran before this error.
    pub(crate) fn after(self, mut earlier: RunReport) -> EngineError {
        let source = match self {
            EngineError::Halted { report, source } => {
                earlier.extend(*report);
                source
            }
            other => Box::new(other),
        };
        if earlier.is_empty() && earlier.dump_failures.is_empty() {
            return *source;
        }
        EngineError::Halted {
            report: Box::new(earlier),
            source,
        }
    }
}

/// Result type alias for EngineError
pub type EngineResult<T> = Result<T, EngineError>;
