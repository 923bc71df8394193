//! Results of orchestrator operations.

use braid_core::{Direction, MigrationKind, MigrationStatus, TargetName, UnifiedEntry, Version};
use serde::Serialize;

/// One migration that ran on one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutedStep {
    pub target: TargetName,
    pub kind: MigrationKind,
    pub version: Version,
    pub name: String,
    pub direction: Direction,
}

/// Outcome of a mutating operation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Steps in execution order
    pub executed: Vec<ExecutedStep>,
    /// Dumpers that failed after the run; the migrations stay applied
    pub dump_failures: Vec<String>,
}

impl RunReport {
    /// True when no migration ran.
    pub fn is_empty(&self) -> bool {
        self.executed.is_empty()
    }

    /// Append the steps and dump failures of a later run.
    pub fn extend(&mut self, other: RunReport) {
        self.executed.extend(other.executed);
        self.dump_failures.extend(other.dump_failures);
    }
}

/// Every migration of one target with its ledger status, in unified order.
#[derive(Debug, Clone, Serialize)]
pub struct TargetStatus {
    pub target: TargetName,
    pub primary: bool,
    pub entries: Vec<UnifiedEntry>,
}

impl TargetStatus {
    /// Entries not yet applied.
    pub fn pending_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.status == MigrationStatus::Pending)
            .count()
    }
}

/// Status of every selected target, primary first.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusReport {
    pub targets: Vec<TargetStatus>,
}

/// Highest applied version of one kind on one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentVersion {
    pub target: TargetName,
    pub kind: MigrationKind,
    pub version: Option<Version>,
}
