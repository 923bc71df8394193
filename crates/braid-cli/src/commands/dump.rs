//! Dump command implementation

use anyhow::Result;
use braid_engine::{DataDumper, Dumper, SchemaDumper};

use crate::cli::GlobalArgs;
use crate::commands::common::{load_project, open_pool};

/// Execute the dump command
pub(crate) fn execute(global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let pool = open_pool(&project, global)?;

    let schema = SchemaDumper::from_project(&project);
    let data = DataDumper::from_project(&project);
    for dumper in [&schema as &dyn Dumper, &data] {
        for path in dumper.dump(&pool)? {
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}
