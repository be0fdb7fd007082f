use super::*;

#[test]
fn parses_run_with_defaults() {
    let cli = Cli::try_parse_from(["pulse-cli", "run"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Run {
            no_export: false,
            email: None
        }
    ));
    assert!(cli.profile.is_none());
}

#[test]
fn parses_run_flags() {
    let cli = Cli::try_parse_from([
        "pulse-cli",
        "run",
        "--no-export",
        "--email",
        "lead@example.com",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Commands::Run { no_export, email } => {
            assert!(no_export);
            assert_eq!(email.as_deref(), Some("lead@example.com"));
        }
        Commands::Stream => panic!("expected run"),
    }
}

#[test]
fn parses_stream_with_global_profile() {
    let cli = Cli::try_parse_from(["pulse-cli", "stream", "--profile", "apps/ind.yaml"])
        .expect("expected valid cli args");

    assert!(matches!(cli.command, Commands::Stream));
    assert_eq!(cli.profile, Some(PathBuf::from("apps/ind.yaml")));
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["pulse-cli"]).is_err());
}

#[test]
fn email_requires_a_value() {
    assert!(Cli::try_parse_from(["pulse-cli", "run", "--email"]).is_err());
}
