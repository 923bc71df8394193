//! Tests for target connections and the pool.

use super::*;

fn count(db: &TargetDb, sql: &str) -> i64 {
    db.conn()
        .query_row(sql, [], |row| row.get::<_, i64>(0))
        .unwrap()
}

#[test]
fn test_open_memory() {
    let db = TargetDb::open_memory("primary", true).unwrap();
    assert_eq!(db.name().as_str(), "primary");
    assert!(db.is_primary());
    assert_eq!(count(&db, "SELECT 1"), 1);
}

#[test]
fn test_open_file_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("app.duckdb");
    let spec = TargetSpec {
        name: TargetName::new("primary"),
        primary: true,
        database_path: path.display().to_string(),
        schema_paths: Vec::new(),
    };
    let _db = TargetDb::open(spec).unwrap();
    assert!(path.exists());
}

#[test]
fn test_transaction_commits_on_success() {
    let db = TargetDb::open_memory("primary", true).unwrap();
    let result: DbResult<()> = db.transaction(|conn| {
        conn.execute_batch("CREATE TABLE t (id INTEGER); INSERT INTO t VALUES (1);")?;
        Ok(())
    });
    result.unwrap();
    assert_eq!(count(&db, "SELECT COUNT(*) FROM t"), 1);
}

#[test]
fn test_transaction_rolls_back_ddl_on_error() {
    let db = TargetDb::open_memory("primary", true).unwrap();
    let result: DbResult<()> = db.transaction(|conn| {
        conn.execute_batch("CREATE TABLE t (id INTEGER);")?;
        conn.execute_batch("INSERT INTO missing_table VALUES (1);")?;
        Ok(())
    });
    assert!(result.is_err());
    assert_eq!(
        count(
            &db,
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 't'"
        ),
        0
    );
}

#[test]
fn test_execute_batch_reports_execution_error() {
    let db = TargetDb::open_memory("primary", true).unwrap();
    let err = db.execute_batch("SELEC nonsense").unwrap_err();
    assert!(matches!(err, DbError::ExecutionError(_)));
}

#[test]
fn test_pool_lookup() {
    let pool = TargetPool::from_targets(vec![
        TargetDb::open_memory("primary", true).unwrap(),
        TargetDb::open_memory("analytics", false).unwrap(),
    ]);
    assert_eq!(pool.len(), 2);
    assert_eq!(pool.primary().unwrap().name().as_str(), "primary");
    assert!(pool
        .connection(&TargetName::new("analytics"))
        .is_ok());

    let err = pool.connection(&TargetName::new("missing")).err().unwrap();
    assert!(err.to_string().contains("Available targets: primary, analytics"));
}

#[test]
fn test_pool_targets_are_isolated() {
    let pool = TargetPool::from_targets(vec![
        TargetDb::open_memory("primary", true).unwrap(),
        TargetDb::open_memory("analytics", false).unwrap(),
    ]);
    let primary = pool.connection(&TargetName::new("primary")).unwrap();
    primary.execute_batch("CREATE TABLE only_here (id INTEGER)").unwrap();

    let analytics = pool.connection(&TargetName::new("analytics")).unwrap();
    assert_eq!(
        count(
            analytics,
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 'only_here'"
        ),
        0
    );
}
