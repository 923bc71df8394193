//! Load command implementation

use anyhow::{Context, Result};
use braid_engine::SchemaLoader;
use std::path::PathBuf;

use crate::cli::{GlobalArgs, LoadArgs};
use crate::commands::common::{load_project, open_pool};

/// Execute the load command
pub(crate) fn execute(args: &LoadArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let pool = open_pool(&project, global)?;

    let path_override = args.path.as_ref().map(|p| {
        let path = PathBuf::from(p);
        if path.is_absolute() {
            path
        } else {
            project.root.join(path)
        }
    });

    let loaded = SchemaLoader::from_project(&project)
        .load(&pool, args.format.map(Into::into), path_override.as_deref())
        .context("Failed to load snapshots")?;
    for path in loaded {
        println!("Loaded {}", path.display());
    }
    Ok(())
}
