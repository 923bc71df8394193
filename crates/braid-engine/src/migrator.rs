//! Operator-level migration operations.
//!
//! Every operation rediscovers migrations, reads the ledgers of every
//! selected target, and builds one global plan with
//! [`braid_core::sequencer::per_target`] before anything runs. Steps then
//! execute strictly one at a time; within a step, targets run in
//! configuration order (primary first).

use crate::catalog::TargetCatalog;
use crate::error::{EngineError, EngineResult};
use crate::executor::{BodyExecutor, SqlScriptExecutor};
use crate::report::{CurrentVersion, ExecutedStep, RunReport, StatusReport, TargetStatus};
use crate::runner::MigrationRunner;
use crate::snapshot::{DataDumper, Dumper, SchemaDumper};
use braid_core::sequencer::{self, per_target};
use braid_core::{
    resolver, CoreError, Direction, KindScope, MigrationKind, PlannedStep, Project, SortOrder,
    TargetSet, UnifiedEntry, Version,
};
use braid_db::{DbError, Ledgers, TargetDb, TargetPool};
use std::collections::BTreeSet;

/// Drives the sequencer and runner across every target in a pool.
pub struct Migrator<'a> {
    project: &'a Project,
    pool: &'a TargetPool,
    ledgers: Ledgers,
    executor: Box<dyn BodyExecutor + 'a>,
    dumpers: Vec<Box<dyn Dumper + 'a>>,
    scope: KindScope,
}

impl<'a> Migrator<'a> {
    /// Migrator running SQL scripts, dumping snapshots when the project
    /// enables it.
    pub fn new(project: &'a Project, pool: &'a TargetPool) -> Self {
        let dumpers: Vec<Box<dyn Dumper + 'a>> = if project.config.snapshot.dump {
            vec![
                Box::new(SchemaDumper::from_project(project)),
                Box::new(DataDumper::from_project(project)),
            ]
        } else {
            Vec::new()
        };
        Self {
            project,
            pool,
            ledgers: Ledgers::from_config(&project.config.ledger),
            executor: Box::new(SqlScriptExecutor),
            dumpers,
            scope: KindScope::default(),
        }
    }

    /// Replace the body executor.
    pub fn with_executor(mut self, executor: Box<dyn BodyExecutor + 'a>) -> Self {
        self.executor = executor;
        self
    }

    /// Replace the post-run dumpers.
    pub fn with_dumpers(mut self, dumpers: Vec<Box<dyn Dumper + 'a>>) -> Self {
        self.dumpers = dumpers;
        self
    }

    /// Restrict planning to one migration kind.
    pub fn with_scope(mut self, scope: KindScope) -> Self {
        self.scope = scope;
        self
    }

    /// Create every ledger table on every target.
    pub fn ensure_ledgers(&self) -> EngineResult<()> {
        for db in self.pool.iter() {
            self.ledgers.ensure_initialized(db)?;
        }
        Ok(())
    }

    fn catalogs(&self) -> EngineResult<Vec<TargetCatalog>> {
        self.pool
            .iter()
            .map(|db| TargetCatalog::discover(self.project, db.spec()).map_err(EngineError::from))
            .collect()
    }

    fn catalog_for<'c>(
        catalogs: &'c [TargetCatalog],
        db: &TargetDb,
    ) -> EngineResult<&'c TargetCatalog> {
        catalogs
            .iter()
            .find(|c| c.target == *db.name())
            .ok_or_else(|| {
                DbError::UnknownTarget {
                    name: db.name().to_string(),
                    available: catalogs
                        .iter()
                        .map(|c| c.target.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                }
                .into()
            })
    }

    /// Per-kind entries of `db`, produced by `select` and filtered by scope.
    fn target_set<F>(
        &self,
        db: &TargetDb,
        catalog: &TargetCatalog,
        select: F,
    ) -> EngineResult<TargetSet>
    where
        F: Fn(MigrationKind, &TargetCatalog, &BTreeSet<Version>) -> Vec<UnifiedEntry>,
    {
        let mut per_kind: [Vec<UnifiedEntry>; 2] = [Vec::new(), Vec::new()];
        for (slot, kind) in per_kind.iter_mut().zip(MigrationKind::ALL) {
            if !self.scope.includes(kind) || !Ledgers::tracks(db, kind) {
                continue;
            }
            let applied = self.ledgers.for_kind(kind).applied_versions(db.conn())?;
            *slot = select(kind, catalog, &applied);
        }
        let [schema, data] = per_kind;
        Ok(TargetSet {
            target: db.name().clone(),
            primary: db.is_primary(),
            entries: sequencer::merge(&schema, &data),
        })
    }

    fn plan(
        &self,
        catalogs: &[TargetCatalog],
        direction: Direction,
    ) -> EngineResult<Vec<PlannedStep>> {
        let mut sets = Vec::with_capacity(self.pool.len());
        for db in self.pool.iter() {
            let catalog = Self::catalog_for(catalogs, db)?;
            let set = match direction {
                Direction::Up => self.target_set(db, catalog, |kind, c, applied| {
                    resolver::pending(c.records(kind), applied)
                })?,
                Direction::Down => self.target_set(db, catalog, |kind, c, applied| {
                    resolver::past(kind, c.records(kind), applied)
                })?,
            };
            sets.push(set);
        }
        let order = match direction {
            Direction::Up => SortOrder::Ascending,
            Direction::Down => SortOrder::Descending,
        };
        Ok(per_target(&sets, order))
    }

    /// Unified pending plan, ascending.
    pub fn pending_plan(&self) -> EngineResult<Vec<PlannedStep>> {
        let catalogs = self.catalogs()?;
        self.plan(&catalogs, Direction::Up)
    }

    /// Unified past plan, descending.
    pub fn past_plan(&self) -> EngineResult<Vec<PlannedStep>> {
        let catalogs = self.catalogs()?;
        self.plan(&catalogs, Direction::Down)
    }

    /// Apply every pending migration in unified order.
    pub fn migrate_all(&self) -> EngineResult<RunReport> {
        self.ensure_ledgers()?;
        let catalogs = self.catalogs()?;
        let plan = self.plan(&catalogs, Direction::Up)?;
        if plan.is_empty() {
            log::info!("No pending migrations");
        }
        self.execute(&plan, Direction::Up, &catalogs)
    }

    /// Apply the next `steps` pending migrations.
    pub fn forward(&self, steps: usize) -> EngineResult<RunReport> {
        self.ensure_ledgers()?;
        let catalogs = self.catalogs()?;
        let plan = self.plan(&catalogs, Direction::Up)?;
        let selected: Vec<PlannedStep> = plan.into_iter().take(steps).collect();
        self.execute(&selected, Direction::Up, &catalogs)
    }

    /// Revert the last `steps` applied migrations, newest first.
    pub fn rollback(&self, steps: usize) -> EngineResult<RunReport> {
        self.ensure_ledgers()?;
        let catalogs = self.catalogs()?;
        let plan = self.plan(&catalogs, Direction::Down)?;
        let selected: Vec<PlannedStep> = plan.into_iter().take(steps).collect();
        self.execute(&selected, Direction::Down, &catalogs)
    }

    /// Run one version up or down.
    ///
    /// When the version exists as both a schema and a data migration and
    /// `run_both` is false, only the first match in plan order runs: schema
    /// when going up, data when going down. A version that is already in the
    /// requested state is a no-op.
    pub fn run_version(
        &self,
        direction: Direction,
        version: Option<Version>,
        run_both: bool,
    ) -> EngineResult<RunReport> {
        let version = version.ok_or(CoreError::MissingParameter {
            param: "VERSION",
            operation: match direction {
                Direction::Up => "up",
                Direction::Down => "down",
            },
        })?;
        self.run_matching(direction, version, None, run_both)
    }

    fn run_matching(
        &self,
        direction: Direction,
        version: Version,
        only_kind: Option<MigrationKind>,
        run_both: bool,
    ) -> EngineResult<RunReport> {
        self.ensure_ledgers()?;
        let catalogs = self.catalogs()?;
        let mut matches: Vec<PlannedStep> = self
            .plan(&catalogs, direction)?
            .into_iter()
            .filter(|s| s.version == version && only_kind.map_or(true, |k| s.kind == k))
            .collect();

        if matches.is_empty() {
            let discovered = catalogs.iter().any(|c| {
                c.kinds_at(version)
                    .into_iter()
                    .any(|k| self.scope.includes(k) && only_kind.map_or(true, |o| o == k))
            });
            if !discovered {
                return Err(CoreError::VersionNotFound { version }.into());
            }
            log::info!(
                "Version {version} is already {}",
                match direction {
                    Direction::Up => "applied",
                    Direction::Down => "reverted",
                }
            );
            return Ok(RunReport::default());
        }

        if matches.len() > 1 && !run_both {
            let skipped: Vec<String> = matches[1..].iter().map(|s| s.kind.to_string()).collect();
            log::warn!(
                "Version {version} exists as more than one kind; running only the {} migration and skipping {}. Pass --both to run all of them.",
                matches[0].kind,
                skipped.join(", ")
            );
            matches.truncate(1);
        }
        self.execute(&matches, direction, &catalogs)
    }

    /// Revert and re-apply.
    ///
    /// With a version, that version is run down and then up again, re-applying
    /// the kind that was reverted. Without one, the last `steps` (default 1)
    /// migrations are rolled back and everything pending is migrated.
    pub fn redo(&self, version: Option<Version>, steps: Option<usize>) -> EngineResult<RunReport> {
        match version {
            Some(version) => {
                let report = self.run_matching(Direction::Down, version, None, false)?;
                let reverted = report.executed.first().map(|s| s.kind);
                let reapplied = self.run_matching(Direction::Up, version, reverted, false);
                chain(report, reapplied)
            }
            None => {
                let report = self.rollback(steps.unwrap_or(1))?;
                chain(report, self.migrate_all())
            }
        }
    }

    /// Every migration of every target with its status, in unified order.
    pub fn status(&self) -> EngineResult<StatusReport> {
        let catalogs = self.catalogs()?;
        let mut report = StatusReport::default();
        for db in self.pool.iter() {
            let catalog = Self::catalog_for(&catalogs, db)?;
            let set = self.target_set(db, catalog, |kind, c, applied| {
                resolver::status(kind, c.records(kind), applied)
            })?;
            report.targets.push(TargetStatus {
                target: set.target,
                primary: set.primary,
                entries: set.entries,
            });
        }
        Ok(report)
    }

    /// Fail with [`EngineError::PendingMigrations`] when anything is pending.
    pub fn abort_if_pending(&self) -> EngineResult<()> {
        let pending = self.pending_plan()?;
        if pending.is_empty() {
            return Ok(());
        }
        let listing = pending
            .iter()
            .map(|step| {
                let targets: Vec<&str> = step.targets.iter().map(|t| t.as_str()).collect();
                format!(
                    "  {:>14}  {:<6}  {}  ({})",
                    step.version,
                    step.kind,
                    step.name.as_deref().unwrap_or("NO FILE"),
                    targets.join(", ")
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        Err(EngineError::PendingMigrations {
            count: pending.len(),
            listing,
        })
    }

    /// Highest applied version per target and kind.
    pub fn current_versions(&self) -> EngineResult<Vec<CurrentVersion>> {
        let mut versions = Vec::new();
        for db in self.pool.iter() {
            for kind in MigrationKind::ALL {
                if !self.scope.includes(kind) || !Ledgers::tracks(db, kind) {
                    continue;
                }
                versions.push(CurrentVersion {
                    target: db.name().clone(),
                    kind,
                    version: self.ledgers.for_kind(kind).current_version(db.conn())?,
                });
            }
        }
        Ok(versions)
    }

    /// Run every dumper, collecting failures instead of propagating them.
    pub fn dump(&self) -> Vec<String> {
        let mut failures = Vec::new();
        for dumper in &self.dumpers {
            if let Err(e) = dumper.dump(self.pool) {
                log::warn!("{} dump failed: {e}", dumper.name());
                failures.push(format!("{}: {e}", dumper.name()));
            }
        }
        failures
    }

    fn execute(
        &self,
        plan: &[PlannedStep],
        direction: Direction,
        catalogs: &[TargetCatalog],
    ) -> EngineResult<RunReport> {
        let mut report = RunReport::default();
        let result = self.run_steps(plan, direction, catalogs, &mut report);
        if !report.is_empty() {
            report.dump_failures = self.dump();
        }
        match result {
            Ok(()) => Ok(report),
            Err(e) => Err(e.after(report)),
        }
    }

    fn run_steps(
        &self,
        plan: &[PlannedStep],
        direction: Direction,
        catalogs: &[TargetCatalog],
        report: &mut RunReport,
    ) -> EngineResult<()> {
        let runner = MigrationRunner::new(self.executor.as_ref(), &self.ledgers);
        for step in plan {
            for target in &step.targets {
                let db = self.pool.connection(target)?;
                let catalog = Self::catalog_for(catalogs, db)?;
                let record = runner.run(db, catalog, direction, step.kind, step.version)?;
                report.executed.push(ExecutedStep {
                    target: target.clone(),
                    kind: record.kind,
                    version: record.version,
                    name: record.name,
                    direction,
                });
            }
        }
        Ok(())
    }
}

/// Append `next` to `report`, keeping `report` on the error when `next` fails.
fn chain(mut report: RunReport, next: EngineResult<RunReport>) -> EngineResult<RunReport> {
    match next {
        Ok(next) => {
            report.extend(next);
            Ok(report)
        }
        Err(e) => Err(e.after(report)),
    }
}

#[cfg(test)]
#[path = "migrator_test.rs"]
mod tests;
