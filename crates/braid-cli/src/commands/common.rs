//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use braid_core::{Config, KindScope, Project};
use braid_db::TargetPool;
use braid_engine::{EngineResult, Migrator, RunReport};
use std::fmt;
use std::path::Path;

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that open databases are closed before the process ends.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; the command already reported the failure.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Load a project from the directory specified in global CLI arguments.
pub(crate) fn load_project(global: &GlobalArgs) -> Result<Project> {
    Project::load(
        Path::new(&global.project_dir),
        global.config.as_deref().map(Path::new),
    )
    .context("Failed to load project")
}

/// Open the selected targets, honouring `--target` / `BRAID_TARGET`.
pub(crate) fn open_pool(project: &Project, global: &GlobalArgs) -> Result<TargetPool> {
    let target = Config::resolve_target(global.target.as_deref());
    let specs = project.select_targets(target.as_deref())?;
    log::debug!(
        "Opening target(s): {}",
        specs
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    TargetPool::open(specs).context("Failed to open target databases")
}

/// Run `op` with a migrator over the selected targets.
pub(crate) fn with_migrator<T>(
    global: &GlobalArgs,
    scope: KindScope,
    op: impl FnOnce(&Migrator<'_>) -> Result<T>,
) -> Result<T> {
    let project = load_project(global)?;
    let pool = open_pool(&project, global)?;
    let migrator = Migrator::new(&project, &pool).with_scope(scope);
    op(&migrator)
}

/// Run a mutating operation and print its report.
///
/// When the run stops part way, the steps applied before the failure are
/// printed before the error propagates.
pub(crate) fn run_and_report(
    global: &GlobalArgs,
    scope: KindScope,
    op: impl FnOnce(&Migrator<'_>) -> EngineResult<RunReport>,
) -> Result<()> {
    let report = with_migrator(global, scope, |m| {
        op(m).map_err(|err| {
            if let Some(partial) = err.partial_report() {
                print_run_report(partial);
            }
            anyhow::Error::from(err)
        })
    })?;
    print_run_report(&report);
    Ok(())
}

/// Print what a mutating command did.
pub(crate) fn print_run_report(report: &RunReport) {
    if report.is_empty() {
        println!("Nothing to do");
        return;
    }
    let rows: Vec<Vec<String>> = report
        .executed
        .iter()
        .map(|step| {
            vec![
                step.target.to_string(),
                step.direction.to_string(),
                step.kind.to_string(),
                step.version.to_string(),
                step.name.clone(),
            ]
        })
        .collect();
    print_table(&["TARGET", "DIRECTION", "KIND", "VERSION", "NAME"], &rows);
    println!();
    println!("{} migration(s) run", report.executed.len());

    for failure in &report.dump_failures {
        eprintln!("Warning: snapshot dump failed: {failure}");
    }
}

/// Calculate column widths for a table given headers and rows.
///
/// Each column width is the maximum of the header length and the longest
/// cell in that column.
pub(crate) fn calculate_column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.len());
        }
    }
    widths
}

/// Print a formatted table to stdout.
///
/// Prints a left-aligned header row, a separator line of dashes, and each
/// data row. Columns are separated by two spaces.
pub(crate) fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let widths = calculate_column_widths(headers, rows);

    let header_parts: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| format!("{:<width$}", h, width = w))
        .collect();
    println!("{}", header_parts.join("  ").trim_end());

    let sep_parts: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep_parts.join("  "));

    for row in rows {
        let row_parts: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<width$}", cell, width = w))
            .collect();
        println!("{}", row_parts.join("  ").trim_end());
    }
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
