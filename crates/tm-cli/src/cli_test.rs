use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn parses_rollback_target() {
    let cli = Cli::try_parse_from(["tm", "-p", "/srv/app", "rollback", "--to", "3"]).unwrap();
    assert_eq!(cli.global.project_dir, PathBuf::from("/srv/app"));
    match cli.command {
        Commands::Rollback(args) => assert_eq!(args.to_version, 3),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn rollback_requires_target_version() {
    assert!(Cli::try_parse_from(["tm", "rollback"]).is_err());
}

#[test]
fn global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["tm", "migrate", "--dry-run", "-v", "-t", "prod"]).unwrap();
    assert!(cli.global.verbose);
    assert_eq!(cli.global.target.as_deref(), Some("prod"));
    assert!(matches!(cli.command, Commands::Migrate(MigrateArgs { dry_run: true })));
}

#[test]
fn init_name_is_optional() {
    let cli = Cli::try_parse_from(["tm", "init"]).unwrap();
    assert!(matches!(cli.command, Commands::Init(InitArgs { name: None })));

    let cli = Cli::try_parse_from(["tm", "-p", "svc", "init", "--name", "orders"]).unwrap();
    match cli.command {
        Commands::Init(args) => assert_eq!(args.name.as_deref(), Some("orders")),
        other => panic!("unexpected command: {other:?}"),
    }
}
