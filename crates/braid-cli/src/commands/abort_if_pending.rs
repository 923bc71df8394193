//! Abort-if-pending command implementation

use anyhow::Result;
use braid_engine::EngineError;

use crate::cli::{GlobalArgs, KindArgs};
use crate::commands::common::{with_migrator, ExitCode};

/// Execute the abort-if-pending command
///
/// Exits with status 1 when migrations are pending so deployment scripts can
/// gate on it.
pub(crate) fn execute(args: &KindArgs, global: &GlobalArgs) -> Result<()> {
    with_migrator(global, args.kind.into(), |m| match m.abort_if_pending() {
        Ok(()) => {
            if global.verbose {
                println!("No pending migrations");
            }
            Ok(())
        }
        Err(err @ EngineError::PendingMigrations { .. }) => {
            eprintln!("{err}");
            Err(ExitCode(1).into())
        }
        Err(err) => Err(err.into()),
    })
}
