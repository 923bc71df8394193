//! Redo command implementation

use anyhow::Result;
use braid_core::Version;

use crate::cli::{GlobalArgs, RedoArgs};
use crate::commands::common::run_and_report;

/// Execute the redo command
pub(crate) fn execute(args: &RedoArgs, global: &GlobalArgs) -> Result<()> {
    let version = args.target_version.map(Version::new);
    run_and_report(global, args.kinds.kind.into(), |m| m.redo(version, args.steps))
}
