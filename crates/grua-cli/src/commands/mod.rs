use anyhow::{Context, Result};
use grua_console::{ConsoleClient, ConsoleConfig, PatternMode, Transport};

use crate::cli::{Cli, ClassesCommand, Commands, RulesCommand, VariablesCommand};

mod handlers;
mod support;


pub(crate) fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    let client = ConsoleClient::from_config(config).context("failed to create console client")?;
    execute(&client, cli.command)
}

/// Defaults, config file and environment, then command-line flags.
fn resolve_config(cli: &Cli) -> Result<ConsoleConfig> {
    let config = ConsoleConfig::load(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("failed to load configuration from {}", path.display()),
        None => "failed to load configuration".to_string(),
    })?;
    apply_flags(config, cli)
}

fn apply_flags(mut config: ConsoleConfig, cli: &Cli) -> Result<ConsoleConfig> {
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(token) = &cli.csrf_token {
        config.csrf_token = Some(token.clone());
    }
    if cli.raw_patterns {
        config.pattern_mode = PatternMode::Raw;
    }
    config.validate().context("invalid command-line flags")?;
    Ok(config)
}

fn execute<T: Transport>(client: &ConsoleClient<T>, command: Commands) -> Result<()> {
    match command {
        Commands::Search(args) => handlers::handle_search(client, &args),
        Commands::Classes(args) => match args.command {
            ClassesCommand::Show { group, environment } => {
                handlers::handle_classes_show(client, &group, environment)
            }
        },
        Commands::Rules(args) => match args.command {
            RulesCommand::Show { group } => handlers::handle_rules_show(client, &group),
            RulesCommand::Pin {
                group,
                certname,
                master_zone,
            } => handlers::handle_rules_pin(client, &group, &certname, master_zone),
            RulesCommand::Unpin { group, certname } => {
                handlers::handle_rules_unpin(client, &group, &certname)
            }
        },
        Commands::Variables(args) => match args.command {
            VariablesCommand::Show { group } => handlers::handle_variables_show(client, &group),
            VariablesCommand::Set { group, key, value } => {
                handlers::handle_variables_set(client, &group, &key, &value)
            }
            VariablesCommand::Unset { group, key } => {
                handlers::handle_variables_unset(client, &group, &key)
            }
        },
        Commands::Sync(args) => handlers::handle_sync(client, &args),
        Commands::Classify(args) => {
            let classification = client
                .node_classifier(&args.certname, &args.master_id)
                .with_context(|| format!("failed to classify {}", args.certname))?;
            support::print_json(&classification)
        }
    }
}
