use super::*;
use std::path::PathBuf;

fn records(kind: MigrationKind, versions: &[i64]) -> Vec<MigrationRecord> {
    versions
        .iter()
        .map(|&v| MigrationRecord {
            version: Version::new(v),
            name: format!("m{v}"),
            kind,
            path: PathBuf::from(format!("{v}_m{v}.sql")),
        })
        .collect()
}

fn applied(versions: &[i64]) -> BTreeSet<Version> {
    versions.iter().copied().map(Version::new).collect()
}

fn versions(entries: &[UnifiedEntry]) -> Vec<i64> {
    entries.iter().map(|e| e.version.get()).collect()
}

#[test]
fn test_pending_excludes_applied() {
    let discovered = records(MigrationKind::Schema, &[1, 2, 3, 4]);
    let pending = pending(&discovered, &applied(&[1, 3]));
    assert_eq!(versions(&pending), vec![2, 4]);
    assert!(pending.iter().all(|e| e.status == MigrationStatus::Pending));
}

#[test]
fn test_past_includes_only_applied() {
    let discovered = records(MigrationKind::Data, &[1, 2, 3]);
    let past = past(MigrationKind::Data, &discovered, &applied(&[2, 3]));
    assert_eq!(versions(&past), vec![2, 3]);
    assert!(past.iter().all(|e| e.has_file()));
}

#[test]
fn test_pending_and_past_partition_discovered() {
    let discovered = records(MigrationKind::Schema, &[10, 20, 30, 40, 50]);
    let ledger = applied(&[20, 50]);

    let pending = pending(&discovered, &ledger);
    let past = past(MigrationKind::Schema, &discovered, &ledger);

    let pending_set: BTreeSet<i64> = versions(&pending).into_iter().collect();
    let past_set: BTreeSet<i64> = versions(&past).into_iter().collect();
    assert!(pending_set.is_disjoint(&past_set));

    let union: BTreeSet<i64> = pending_set.union(&past_set).copied().collect();
    let all: BTreeSet<i64> = discovered.iter().map(|r| r.version.get()).collect();
    assert_eq!(union, all);
}

#[test]
fn test_orphan_ledger_version_counts_as_past() {
    let discovered = records(MigrationKind::Schema, &[1, 3]);
    let past = past(MigrationKind::Schema, &discovered, &applied(&[1, 2]));
    assert_eq!(versions(&past), vec![1, 2]);
    assert!(past[0].has_file());
    assert!(!past[1].has_file());
    assert_eq!(past[1].kind, MigrationKind::Schema);
}

#[test]
fn test_status_lists_everything_in_order() {
    let discovered = records(MigrationKind::Data, &[1, 3]);
    let entries = status(MigrationKind::Data, &discovered, &applied(&[1, 2]));
    assert_eq!(versions(&entries), vec![1, 2, 3]);
    assert_eq!(entries[0].status, MigrationStatus::Applied);
    assert_eq!(entries[1].name, None);
    assert_eq!(entries[2].status, MigrationStatus::Pending);
    assert_eq!(entries[2].status.to_string(), "down");
}
