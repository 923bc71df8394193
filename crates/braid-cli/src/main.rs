//! braid CLI - interleaved schema and data migrations for DuckDB

use anyhow::Result;
use braid_core::Direction;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::common::ExitCode;
use commands::{
    abort_if_pending, dump, forward, load, migrate, redo, rollback, status, up_down, version,
};

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.global.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_target(false)
        .init();

    if let Err(err) = run(&cli) {
        if let Some(code) = err.downcast_ref::<ExitCode>() {
            std::process::exit(code.0);
        }
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let global = &cli.global;
    match &cli.command {
        Commands::Migrate(args) => migrate::execute(args, global),
        Commands::Rollback(args) => rollback::execute(args, global),
        Commands::Forward(args) => forward::execute(args, global),
        Commands::Up(args) => up_down::execute(args, Direction::Up, global),
        Commands::Down(args) => up_down::execute(args, Direction::Down, global),
        Commands::Redo(args) => redo::execute(args, global),
        Commands::Status(args) => status::execute(args, global),
        Commands::Version(args) => version::execute(args, global),
        Commands::AbortIfPending(args) => abort_if_pending::execute(args, global),
        Commands::Dump => dump::execute(global),
        Commands::Load(args) => load::execute(args, global),
    }
}
