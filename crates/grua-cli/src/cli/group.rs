use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct ClassesArgs {
    #[command(subcommand)]
    pub command: ClassesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ClassesCommand {
    Show {
        group: String,
        #[arg(long)]
        environment: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct RulesArgs {
    #[command(subcommand)]
    pub command: RulesCommand,
}

#[derive(Debug, Subcommand)]
pub enum RulesCommand {
    Show {
        group: String,
    },
    /// Pins a node to the group.
    Pin {
        group: String,
        certname: String,
        #[arg(long)]
        master_zone: Option<String>,
    },
    Unpin {
        group: String,
        certname: String,
    },
}

#[derive(Debug, Args)]
pub struct VariablesArgs {
    #[command(subcommand)]
    pub command: VariablesCommand,
}

#[derive(Debug, Subcommand)]
pub enum VariablesCommand {
    Show {
        group: String,
    },
    /// Sets a variable, replacing every existing row of the key.
    Set {
        group: String,
        key: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    Unset {
        group: String,
        key: String,
    },
}
