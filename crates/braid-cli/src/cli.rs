//! CLI argument definitions using clap derive API

use braid_core::{KindScope, SnapshotFormat};
use clap::{Args, Parser, Subcommand, ValueEnum};

/// braid - Run schema and data migrations in one interleaved order
#[derive(Parser, Debug)]
#[command(name = "braid")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Only operate on this target (falls back to BRAID_TARGET)
    #[arg(short, long, global = true)]
    pub target: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply every pending migration in unified order
    Migrate(MigrateArgs),

    /// Revert the most recently applied migrations
    Rollback(StepArgs),

    /// Apply the next pending migrations
    Forward(StepArgs),

    /// Apply a single version
    Up(VersionArgs),

    /// Revert a single version
    Down(VersionArgs),

    /// Revert and re-apply a version, or the last migrations
    Redo(RedoArgs),

    /// Show every migration and whether it is applied
    Status(StatusArgs),

    /// Print the current version of each ledger
    Version(KindArgs),

    /// Fail if any migration is pending
    AbortIfPending(KindArgs),

    /// Write snapshot files for the current database state
    Dump,

    /// Load snapshot files into fresh databases
    Load(LoadArgs),
}

/// Migration kinds an operation applies to
#[derive(Args, Debug, Clone, Copy)]
pub struct KindArgs {
    /// Restrict to one migration kind
    #[arg(short, long, value_enum, default_value = "both")]
    pub kind: KindArg,
}

/// Kind filter values
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    /// Schema and data migrations
    Both,
    /// Schema migrations only
    Schema,
    /// Data migrations only
    Data,
}

impl From<KindArg> for KindScope {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Both => KindScope::Both,
            KindArg::Schema => KindScope::Schema,
            KindArg::Data => KindScope::Data,
        }
    }
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub kinds: KindArgs,
}

/// Arguments for rollback and forward
#[derive(Args, Debug)]
pub struct StepArgs {
    /// Number of migrations to run
    #[arg(short, long, default_value = "1")]
    pub steps: usize,

    #[command(flatten)]
    pub kinds: KindArgs,
}

/// Arguments for up and down
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Version to run
    #[arg(long = "version", value_name = "VERSION")]
    pub target_version: Option<i64>,

    /// Run every migration sharing the version, not just the first
    #[arg(short, long)]
    pub both: bool,

    #[command(flatten)]
    pub kinds: KindArgs,
}

/// Arguments for the redo command
#[derive(Args, Debug)]
pub struct RedoArgs {
    /// Version to redo (default: the last applied migrations)
    #[arg(long = "version", value_name = "VERSION")]
    pub target_version: Option<i64>,

    /// Number of migrations to redo when no version is given
    #[arg(short, long, conflicts_with = "target_version")]
    pub steps: Option<usize>,

    #[command(flatten)]
    pub kinds: KindArgs,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: StatusOutput,

    #[command(flatten)]
    pub kinds: KindArgs,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Table format
    Table,
    /// JSON output
    Json,
}

/// Arguments for the load command
#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Snapshot format (default: from config)
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Primary schema snapshot to load instead of the default file
    #[arg(long)]
    pub path: Option<String>,
}

/// Snapshot format values
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Yaml,
    Json,
}

impl From<FormatArg> for SnapshotFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Yaml => SnapshotFormat::Yaml,
            FormatArg::Json => SnapshotFormat::Json,
        }
    }
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
