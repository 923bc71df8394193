//! Unified ordering of schema and data migrations.
//!
//! Every sequence braid walks is ordered by `(version, kind)` with schema
//! before data at equal versions. Past sequences are the exact reverse, so a
//! forward walk followed by a rollback of the same length retraces its steps.

use crate::migration::{MigrationKind, Version};
use crate::resolver::UnifiedEntry;
use crate::target_name::TargetName;
use serde::Serialize;
use std::collections::BTreeMap;

/// Traversal order of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Oldest first (pending / migrate / forward)
    Ascending,
    /// Newest first (past / rollback)
    Descending,
}

/// Stable merge of two ascending sequences; schema wins ties.
pub fn merge(schema: &[UnifiedEntry], data: &[UnifiedEntry]) -> Vec<UnifiedEntry> {
    debug_assert!(schema.windows(2).all(|w| w[0].order_key() <= w[1].order_key()));
    debug_assert!(data.windows(2).all(|w| w[0].order_key() <= w[1].order_key()));

    let mut merged = Vec::with_capacity(schema.len() + data.len());
    let (mut i, mut j) = (0, 0);
    while i < schema.len() && j < data.len() {
        if schema[i].order_key() <= data[j].order_key() {
            merged.push(schema[i].clone());
            i += 1;
        } else {
            merged.push(data[j].clone());
            j += 1;
        }
    }
    merged.extend_from_slice(&schema[i..]);
    merged.extend_from_slice(&data[j..]);
    merged
}

/// Pending migrations of both kinds, ascending.
pub fn unified_pending(schema: &[UnifiedEntry], data: &[UnifiedEntry]) -> Vec<UnifiedEntry> {
    merge(schema, data)
}

/// Applied migrations of both kinds, descending (data before schema at equal
/// versions).
pub fn unified_past(schema: &[UnifiedEntry], data: &[UnifiedEntry]) -> Vec<UnifiedEntry> {
    let mut merged = merge(schema, data);
    merged.reverse();
    merged
}

/// Unified entries of one target, ascending.
#[derive(Debug, Clone)]
pub struct TargetSet {
    pub target: TargetName,
    /// Data migrations are only scheduled from the primary target's set.
    pub primary: bool,
    pub entries: Vec<UnifiedEntry>,
}

/// One step of the global plan: a `(version, kind)` and every target it runs on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedStep {
    pub version: Version,
    pub kind: MigrationKind,
    pub name: Option<String>,
    pub targets: Vec<TargetName>,
}

impl PlannedStep {
    /// Sort key: version, then kind.
    pub fn order_key(&self) -> (Version, MigrationKind) {
        (self.version, self.kind)
    }
}

/// Merge per-target sets into one global plan.
///
/// Schema entries are scheduled on each target that lists them. Data entries
/// are scheduled once, on the primary target; data entries found in other
/// sets are ignored. Targets within a step keep the order of `sets`.
pub fn per_target(sets: &[TargetSet], order: SortOrder) -> Vec<PlannedStep> {
    let mut steps: BTreeMap<(Version, MigrationKind), PlannedStep> = BTreeMap::new();

    for set in sets {
        for entry in &set.entries {
            if entry.kind == MigrationKind::Data && !set.primary {
                continue;
            }
            let step = steps
                .entry(entry.order_key())
                .or_insert_with(|| PlannedStep {
                    version: entry.version,
                    kind: entry.kind,
                    name: None,
                    targets: Vec::new(),
                });
            if step.name.is_none() {
                step.name = entry.name.clone();
            }
            if !step.targets.contains(&set.target) {
                step.targets.push(set.target.clone());
            }
        }
    }

    match order {
        SortOrder::Ascending => steps.into_values().collect(),
        SortOrder::Descending => steps.into_values().rev().collect(),
    }
}

#[cfg(test)]
#[path = "sequencer_test.rs"]
mod tests;
