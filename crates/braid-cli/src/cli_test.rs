use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_up_takes_version_and_both() {
    let cli = Cli::try_parse_from(["braid", "up", "--version", "20230101", "--both"]).unwrap();
    match cli.command {
        Commands::Up(args) => {
            assert_eq!(args.target_version, Some(20230101));
            assert!(args.both);
            assert_eq!(args.kinds.kind, KindArg::Both);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_global_args_after_subcommand() {
    let cli = Cli::try_parse_from([
        "braid", "rollback", "--steps", "3", "-k", "data", "-t", "analytics", "-v",
    ])
    .unwrap();
    assert!(cli.global.verbose);
    assert_eq!(cli.global.target.as_deref(), Some("analytics"));
    match cli.command {
        Commands::Rollback(args) => {
            assert_eq!(args.steps, 3);
            assert_eq!(KindScope::from(args.kinds.kind), KindScope::Data);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_redo_rejects_version_with_steps() {
    assert!(Cli::try_parse_from(["braid", "redo", "--version", "1", "--steps", "2"]).is_err());
}

#[test]
fn test_abort_if_pending_name() {
    let cli = Cli::try_parse_from(["braid", "abort-if-pending"]).unwrap();
    assert!(matches!(cli.command, Commands::AbortIfPending(_)));
}
