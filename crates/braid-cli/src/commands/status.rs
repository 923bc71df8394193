//! Status command implementation

use anyhow::{Context, Result};
use braid_engine::StatusReport;

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::commands::common::{print_table, with_migrator};

const NO_FILE: &str = "********** NO FILE **********";

/// Execute the status command
pub(crate) fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let report = with_migrator(global, args.kinds.kind.into(), |m| Ok(m.status()?))?;

    match args.output {
        StatusOutput::Json => {
            let json = serde_json::to_string_pretty(&report)
                .context("Failed to serialize status")?;
            println!("{json}");
        }
        StatusOutput::Table => print_status(&report),
    }
    Ok(())
}

fn print_status(report: &StatusReport) {
    for (i, target) in report.targets.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let role = if target.primary { " (primary)" } else { "" };
        println!("Target: {}{role}", target.target);
        println!();

        let rows: Vec<Vec<String>> = target
            .entries
            .iter()
            .map(|e| {
                vec![
                    e.status.to_string(),
                    e.kind.to_string(),
                    e.version.to_string(),
                    e.name.clone().unwrap_or_else(|| NO_FILE.to_string()),
                ]
            })
            .collect();
        print_table(&["STATUS", "KIND", "VERSION", "NAME"], &rows);
        println!();
        println!(
            "{} migration(s), {} pending",
            target.entries.len(),
            target.pending_count()
        );
    }
}
