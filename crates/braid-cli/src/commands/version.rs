//! Version command implementation

use anyhow::Result;

use crate::cli::{GlobalArgs, KindArgs};
use crate::commands::common::with_migrator;

/// Execute the version command
pub(crate) fn execute(args: &KindArgs, global: &GlobalArgs) -> Result<()> {
    let versions = with_migrator(global, args.kind.into(), |m| Ok(m.current_versions()?))?;
    for current in versions {
        let version = current
            .version
            .map(|v| v.to_string())
            .unwrap_or_else(|| "none".to_string());
        println!("{} {}: {version}", current.target, current.kind);
    }
    Ok(())
}
