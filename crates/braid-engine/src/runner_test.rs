use super::*;
use crate::error::EngineError;
use crate::executor::SqlScriptExecutor;
use braid_core::{LedgerConfig, TargetName};
use std::cell::Cell;
use std::path::PathBuf;

/// Runs the given SQL as the body, optionally outside a transaction.
struct InlineExecutor {
    sql: &'static str,
    transactional: bool,
    calls: Cell<usize>,
}

impl InlineExecutor {
    fn new(sql: &'static str, transactional: bool) -> Self {
        Self {
            sql,
            transactional,
            calls: Cell::new(0),
        }
    }
}

impl BodyExecutor for InlineExecutor {
    fn transactional(&self, _record: &MigrationRecord) -> EngineResult<bool> {
        Ok(self.transactional)
    }

    fn execute(
        &self,
        conn: &Connection,
        _target: &TargetName,
        _record: &MigrationRecord,
        _direction: Direction,
    ) -> EngineResult<()> {
        self.calls.set(self.calls.get() + 1);
        conn.execute_batch(self.sql)
            .map_err(|e| braid_db::DbError::ExecutionError(e.to_string()).into())
    }
}

fn catalog(kind: MigrationKind, version: i64) -> TargetCatalog {
    let record = MigrationRecord {
        version: Version::new(version),
        name: "step".to_string(),
        kind,
        path: PathBuf::from("unused.sql"),
    };
    let (schema, data) = match kind {
        MigrationKind::Schema => (vec![record], Vec::new()),
        MigrationKind::Data => (Vec::new(), vec![record]),
    };
    TargetCatalog {
        target: TargetName::new("primary"),
        primary: true,
        schema,
        data,
    }
}

fn setup() -> (TargetDb, Ledgers) {
    let db = TargetDb::open_memory("primary", true).unwrap();
    let ledgers = Ledgers::from_config(&LedgerConfig::default());
    ledgers.ensure_initialized(&db).unwrap();
    (db, ledgers)
}

#[test]
fn test_up_then_down_updates_ledger() {
    let (db, ledgers) = setup();
    let executor = InlineExecutor::new("SELECT 1", true);
    let runner = MigrationRunner::new(&executor, &ledgers);
    let cat = catalog(MigrationKind::Data, 7);

    runner
        .run(&db, &cat, Direction::Up, MigrationKind::Data, Version::new(7))
        .unwrap();
    assert!(ledgers.data.is_applied(db.conn(), Version::new(7)).unwrap());
    assert!(ledgers.schema.applied_versions(db.conn()).unwrap().is_empty());

    runner
        .run(&db, &cat, Direction::Down, MigrationKind::Data, Version::new(7))
        .unwrap();
    assert!(!ledgers.data.is_applied(db.conn(), Version::new(7)).unwrap());
    assert_eq!(executor.calls.get(), 2);
}

#[test]
fn test_missing_record_is_not_found() {
    let (db, ledgers) = setup();
    let runner = MigrationRunner::new(&SqlScriptExecutor, &ledgers);
    let err = runner
        .run(
            &db,
            &catalog(MigrationKind::Schema, 1),
            Direction::Up,
            MigrationKind::Schema,
            Version::new(2),
        )
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(ledgers.schema.applied_versions(db.conn()).unwrap().is_empty());
}

#[test]
fn test_failing_body_rolls_back_work_and_leaves_ledger() {
    let (db, ledgers) = setup();
    let executor = InlineExecutor::new(
        "CREATE TABLE half_done (id INTEGER); SELECT * FROM does_not_exist;",
        true,
    );
    let runner = MigrationRunner::new(&executor, &ledgers);

    let err = runner
        .run(
            &db,
            &catalog(MigrationKind::Schema, 3),
            Direction::Up,
            MigrationKind::Schema,
            Version::new(3),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Db(braid_db::DbError::ExecutionError(_))
    ));
    assert!(!ledgers.schema.is_applied(db.conn(), Version::new(3)).unwrap());
    assert!(db.execute_batch("SELECT * FROM half_done").is_err());
}

#[test]
fn test_non_transactional_body_still_records_success() {
    let (db, ledgers) = setup();
    let executor = InlineExecutor::new("CREATE TABLE t (id INTEGER)", false);
    let runner = MigrationRunner::new(&executor, &ledgers);

    runner
        .run(
            &db,
            &catalog(MigrationKind::Schema, 4),
            Direction::Up,
            MigrationKind::Schema,
            Version::new(4),
        )
        .unwrap();
    assert!(ledgers.schema.is_applied(db.conn(), Version::new(4)).unwrap());
    db.execute_batch("SELECT * FROM t").unwrap();
}
