use clap::{Args, ValueEnum};
use grua_console::search::{DATASET_CERTNAME, DATASET_CLASSES, DATASET_FACTS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DatasetArg {
    Classes,
    #[value(alias = "nodes")]
    Certname,
    Facts,
}

impl DatasetArg {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Classes => DATASET_CLASSES,
            Self::Certname => DATASET_CERTNAME,
            Self::Facts => DATASET_FACTS,
        }
    }

    /// Record field the suggestions are matched on.
    pub const fn display_field(self) -> &'static str {
        match self {
            Self::Certname => "certname",
            Self::Classes | Self::Facts => "name",
        }
    }
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(value_enum)]
    pub dataset: DatasetArg,
    /// Text typed into the input; empty lists every enabled record.
    #[arg(default_value = "", allow_hyphen_values = true)]
    pub query: String,
    /// Limits the classes dataset to one environment.
    #[arg(long)]
    pub environment: Option<String>,
    /// Limits node and fact datasets to one master zone.
    #[arg(long)]
    pub master_zone: Option<String>,
}

#[derive(Debug, Args)]
pub struct SyncArgs {
    pub master_id: String,
    /// Name shown in the result message; defaults to the id.
    #[arg(long)]
    pub label: Option<String>,
}

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    pub certname: String,
    #[arg(long)]
    pub master_id: String,
}
