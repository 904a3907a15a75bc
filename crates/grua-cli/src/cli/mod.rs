use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod args;
mod group;

#[cfg(test)]
mod tests;

pub use args::{ClassifyArgs, DatasetArg, SearchArgs, SyncArgs};
pub use group::{
    ClassesArgs, ClassesCommand, RulesArgs, RulesCommand, VariablesArgs, VariablesCommand,
};

#[derive(Debug, Parser)]
#[command(name = "grua")]
#[command(about = "GRUA node classification console", version)]
pub struct Cli {
    /// TOML configuration file; `GRUA_*` environment variables override it.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    #[arg(long, value_name = "TOKEN")]
    pub csrf_token: Option<String>,

    /// Compile search queries as regular expressions instead of literal text.
    #[arg(long, default_value_t = false)]
    pub raw_patterns: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Search(SearchArgs),
    Classes(ClassesArgs),
    Rules(RulesArgs),
    Variables(VariablesArgs),
    Sync(SyncArgs),
    Classify(ClassifyArgs),
}
