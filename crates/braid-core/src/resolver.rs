//! Pending / past partitioning of discovered migrations against a ledger.

use crate::migration::{MigrationKind, MigrationRecord, Version};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// Whether a migration is recorded in its ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationStatus {
    /// Not yet applied
    Pending,
    /// Recorded in the ledger
    Applied,
}

impl fmt::Display for MigrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationStatus::Pending => write!(f, "down"),
            MigrationStatus::Applied => write!(f, "up"),
        }
    }
}

/// A migration annotated with its ledger status.
///
/// `name` is `None` for a ledger version whose file no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnifiedEntry {
    pub version: Version,
    pub kind: MigrationKind,
    pub name: Option<String>,
    pub status: MigrationStatus,
}

impl UnifiedEntry {
    fn from_record(record: &MigrationRecord, status: MigrationStatus) -> Self {
        Self {
            version: record.version,
            kind: record.kind,
            name: Some(record.name.clone()),
            status,
        }
    }

    /// Sort key: version, then kind (schema before data).
    pub fn order_key(&self) -> (Version, MigrationKind) {
        (self.version, self.kind)
    }

    /// False when the ledger references a version with no file on disk.
    pub fn has_file(&self) -> bool {
        self.name.is_some()
    }
}

/// Discovered migrations not present in the ledger, ascending.
pub fn pending(discovered: &[MigrationRecord], applied: &BTreeSet<Version>) -> Vec<UnifiedEntry> {
    let mut entries: Vec<UnifiedEntry> = discovered
        .iter()
        .filter(|r| !applied.contains(&r.version))
        .map(|r| UnifiedEntry::from_record(r, MigrationStatus::Pending))
        .collect();
    entries.sort_by_key(UnifiedEntry::order_key);
    entries
}

/// Applied migrations of `kind`, ascending.
///
/// Ledger versions without a discovered file are included with no name; they
/// count as past but cannot be run.
pub fn past(
    kind: MigrationKind,
    discovered: &[MigrationRecord],
    applied: &BTreeSet<Version>,
) -> Vec<UnifiedEntry> {
    let on_disk: HashSet<Version> = discovered.iter().map(|r| r.version).collect();

    let mut entries: Vec<UnifiedEntry> = discovered
        .iter()
        .filter(|r| applied.contains(&r.version))
        .map(|r| UnifiedEntry::from_record(r, MigrationStatus::Applied))
        .chain(
            applied
                .iter()
                .filter(|v| !on_disk.contains(v))
                .map(|&version| UnifiedEntry {
                    version,
                    kind,
                    name: None,
                    status: MigrationStatus::Applied,
                }),
        )
        .collect();
    entries.sort_by_key(UnifiedEntry::order_key);
    entries
}

/// Every migration of one kind with its status, ascending.
pub fn status(
    kind: MigrationKind,
    discovered: &[MigrationRecord],
    applied: &BTreeSet<Version>,
) -> Vec<UnifiedEntry> {
    let mut entries = pending(discovered, applied);
    entries.extend(past(kind, discovered, applied));
    entries.sort_by_key(UnifiedEntry::order_key);
    entries
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
