//! Up and down command implementation

use anyhow::Result;
use braid_core::{Direction, Version};

use crate::cli::{GlobalArgs, VersionArgs};
use crate::commands::common::run_and_report;

/// Execute `up` or `down` for a single version
pub(crate) fn execute(args: &VersionArgs, direction: Direction, global: &GlobalArgs) -> Result<()> {
    let version = args.target_version.map(Version::new);
    run_and_report(global, args.kinds.kind.into(), |m| {
        m.run_version(direction, version, args.both)
    })
}
