//! Integration tests for the braid binary
//!
//! Each test builds a throwaway project with a file-backed DuckDB database so
//! state carries across separate invocations.

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Path to the compiled braid binary
fn braid_bin() -> String {
    env!("CARGO_BIN_EXE_braid").to_string()
}

/// Run a `braid` command in `dir` and return (stdout, stderr, exit code).
fn run_braid(dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(braid_bin())
        .arg("--project-dir")
        .arg(dir)
        .args(args)
        .env_remove("BRAID_TARGET")
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute braid with args {:?}: {}", args, e));
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

fn write(dir: &Path, path: &str, body: &str) {
    let full = dir.join(path);
    std::fs::create_dir_all(full.parent().unwrap()).unwrap();
    std::fs::write(full, body).unwrap();
}

/// Project with two schema migrations and one data migration in between.
fn sample_project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "braid.yml", "name: shop\ndatabase:\n  path: shop.duckdb\n");
    write(
        root,
        "db/migrate/20230101_create_users.sql",
        "-- migrate:up\nCREATE TABLE users (id INTEGER);\n-- migrate:down\nDROP TABLE users;\n",
    );
    write(
        root,
        "db/data/20230102_seed_users.sql",
        "-- migrate:up\nINSERT INTO users VALUES (1);\n-- migrate:down\nDELETE FROM users;\n",
    );
    write(
        root,
        "db/migrate/20230103_create_orders.sql",
        "-- migrate:up\nCREATE TABLE orders (id INTEGER);\n-- migrate:down\nDROP TABLE orders;\n",
    );
    dir
}

// ── Migrate / rollback ─────────────────────────────────────────────────

#[test]
fn test_migrate_then_status() {
    let dir = sample_project();
    let (stdout, stderr, code) = run_braid(dir.path(), &["migrate"]);
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.contains("3 migration(s) run"), "{stdout}");
    assert!(dir.path().join("db/schema.yml").exists());
    assert!(dir.path().join("db/data_schema.yml").exists());

    let (stdout, _, code) = run_braid(dir.path(), &["status"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("3 migration(s), 0 pending"), "{stdout}");
}

#[test]
fn test_default_database_persists_between_runs() {
    let dir = sample_project();
    write(dir.path(), "braid.yml", "name: shop\n");

    let (_, stderr, code) = run_braid(dir.path(), &["migrate"]);
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(dir.path().join("db/shop.duckdb").exists());

    let (stdout, _, code) = run_braid(dir.path(), &["status"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("3 migration(s), 0 pending"), "{stdout}");

    let (_, stderr, code) = run_braid(dir.path(), &["abort-if-pending"]);
    assert_eq!(code, 0, "stderr: {stderr}");
}

#[test]
fn test_status_json() {
    let dir = sample_project();
    run_braid(dir.path(), &["forward", "--steps", "1"]);

    let (stdout, stderr, code) = run_braid(dir.path(), &["status", "--output", "json"]);
    assert_eq!(code, 0, "stderr: {stderr}");
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let entries = json["targets"][0]["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["status"], "applied");
    assert_eq!(entries[1]["kind"], "data");
    assert_eq!(entries[1]["status"], "pending");
}

#[test]
fn test_rollback_and_version() {
    let dir = sample_project();
    run_braid(dir.path(), &["migrate"]);

    let (_, stderr, code) = run_braid(dir.path(), &["rollback"]);
    assert_eq!(code, 0, "stderr: {stderr}");

    let (stdout, _, code) = run_braid(dir.path(), &["version"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("primary schema: 20230101"), "{stdout}");
    assert!(stdout.contains("primary data: 20230102"), "{stdout}");
}

// ── Single versions ────────────────────────────────────────────────────

#[test]
fn test_up_requires_version() {
    let dir = sample_project();
    let (_, stderr, code) = run_braid(dir.path(), &["up"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("[B004]"), "{stderr}");
}

#[test]
fn test_up_unknown_version_fails() {
    let dir = sample_project();
    let (_, stderr, code) = run_braid(dir.path(), &["up", "--version", "19990101"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("19990101"), "{stderr}");
}

#[test]
fn test_up_and_down_single_version() {
    let dir = sample_project();
    let (stdout, stderr, code) = run_braid(dir.path(), &["up", "--version", "20230101"]);
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.contains("1 migration(s) run"), "{stdout}");

    let (_, stderr, code) = run_braid(dir.path(), &["down", "--version", "20230101"]);
    assert_eq!(code, 0, "stderr: {stderr}");
    let (stdout, _, _) = run_braid(dir.path(), &["status"]);
    assert!(stdout.contains("3 migration(s), 3 pending"), "{stdout}");
}

// ── Gate ───────────────────────────────────────────────────────────────

#[test]
fn test_abort_if_pending() {
    let dir = sample_project();
    let (_, stderr, code) = run_braid(dir.path(), &["abort-if-pending"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("[R002]"), "{stderr}");
    assert!(stderr.contains("braid migrate"), "{stderr}");

    run_braid(dir.path(), &["migrate"]);
    let (_, stderr, code) = run_braid(dir.path(), &["abort-if-pending"]);
    assert_eq!(code, 0, "stderr: {stderr}");
}

// ── Failures ───────────────────────────────────────────────────────────

#[test]
fn test_failing_migration_exits_non_zero() {
    let dir = sample_project();
    write(
        dir.path(),
        "db/data/20230104_broken.sql",
        "-- migrate:up\nINSERT INTO missing_table VALUES (1);\n",
    );
    let (stdout, stderr, code) = run_braid(dir.path(), &["migrate"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("[R005]"), "{stderr}");
    assert!(stderr.contains("[R001]"), "{stderr}");
    // steps applied before the failure are still reported
    assert!(stdout.contains("create_orders"), "{stdout}");
    assert!(stdout.contains("3 migration(s) run"), "{stdout}");

    let (stdout, _, _) = run_braid(dir.path(), &["status"]);
    assert!(stdout.contains("4 migration(s), 1 pending"), "{stdout}");
}

#[test]
fn test_missing_config() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_braid(dir.path(), &["status"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Failed to load project"), "{stderr}");
}

// ── Snapshots ──────────────────────────────────────────────────────────

#[test]
fn test_dump_then_load_into_new_database() {
    let dir = sample_project();
    run_braid(dir.path(), &["migrate"]);
    let (stdout, stderr, code) = run_braid(dir.path(), &["dump"]);
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.contains("schema.yml"), "{stdout}");

    // point the project at a fresh database file and load the snapshots
    write(dir.path(), "fresh.yml", "name: shop\ndatabase:\n  path: fresh.duckdb\n");
    let fresh = dir.path().join("fresh.yml");
    let fresh = fresh.to_str().unwrap();
    let (stdout, stderr, code) = run_braid(dir.path(), &["--config", fresh, "load"]);
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.contains("data_schema.yml"), "{stdout}");

    let (_, stderr, code) = run_braid(dir.path(), &["--config", fresh, "abort-if-pending"]);
    assert_eq!(code, 0, "stderr: {stderr}");
}
