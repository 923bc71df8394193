//! Rollback command implementation

use anyhow::Result;

use crate::cli::{GlobalArgs, StepArgs};
use crate::commands::common::run_and_report;

/// Execute the rollback command
pub(crate) fn execute(args: &StepArgs, global: &GlobalArgs) -> Result<()> {
    run_and_report(global, args.kinds.kind.into(), |m| m.rollback(args.steps))
}
