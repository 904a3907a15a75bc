use super::*;
use clap::Parser;

#[test]
fn search_parses_dataset_and_query() {
    let cli = Cli::try_parse_from(["grua", "search", "classes", "ng", "--environment", "prod"])
        .expect("parse");
    match cli.command {
        Commands::Search(SearchArgs {
            dataset,
            query,
            environment,
            master_zone,
        }) => {
            assert_eq!(dataset, DatasetArg::Classes);
            assert_eq!(query, "ng");
            assert_eq!(environment.as_deref(), Some("prod"));
            assert!(master_zone.is_none());
        }
        _ => panic!("expected search command"),
    }
}

#[test]
fn search_query_defaults_to_empty() {
    let cli = Cli::try_parse_from(["grua", "search", "nodes"]).expect("parse");
    match cli.command {
        Commands::Search(args) => {
            assert_eq!(args.dataset, DatasetArg::Certname);
            assert_eq!(args.query, "");
        }
        _ => panic!("expected search command"),
    }
}

#[test]
fn unknown_dataset_is_rejected() {
    let parsed = Cli::try_parse_from(["grua", "search", "environments", "x"]);
    assert!(parsed.is_err(), "only classes, certname and facts are searchable");
}

#[test]
fn global_flags_parse_before_the_command() {
    let cli = Cli::try_parse_from([
        "grua",
        "--base-url",
        "https://console.example",
        "--csrf-token",
        "t0k",
        "--raw-patterns",
        "rules",
        "pin",
        "g1",
        "web01",
        "--master-zone",
        "mz",
    ])
    .expect("parse");
    assert_eq!(cli.base_url.as_deref(), Some("https://console.example"));
    assert_eq!(cli.csrf_token.as_deref(), Some("t0k"));
    assert!(cli.raw_patterns);
    match cli.command {
        Commands::Rules(RulesArgs {
            command:
                RulesCommand::Pin {
                    group,
                    certname,
                    master_zone,
                },
        }) => {
            assert_eq!(group, "g1");
            assert_eq!(certname, "web01");
            assert_eq!(master_zone.as_deref(), Some("mz"));
        }
        _ => panic!("expected rules pin command"),
    }
}

#[test]
fn variables_set_accepts_hyphen_values() {
    let cli =
        Cli::try_parse_from(["grua", "variables", "set", "g1", "opts", "-Xmx2g"]).expect("parse");
    match cli.command {
        Commands::Variables(VariablesArgs {
            command: VariablesCommand::Set { key, value, .. },
        }) => {
            assert_eq!(key, "opts");
            assert_eq!(value, "-Xmx2g");
        }
        _ => panic!("expected variables set command"),
    }
}

#[test]
fn classify_requires_master_id() {
    assert!(Cli::try_parse_from(["grua", "classify", "web01"]).is_err());
    let cli = Cli::try_parse_from(["grua", "classify", "web01", "--master-id", "3"])
        .expect("parse");
    assert!(matches!(cli.command, Commands::Classify(ClassifyArgs { .. })));
}
