//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs, config::ConfigCommands, demand::DemandCommands, init::InitArgs,
    loyalty::LoyaltyCommands, matching::MatchArgs, partner::PartnerCommands, po::PoCommands,
    so::SoCommands, sup::SupCommands, transfer::TransferCommands,
};

#[derive(Parser)]
#[command(name = "baskit")]
#[command(author, version, about = "Baskit procurement marketplace toolkit")]
#[command(long_about = "Match procurement needs against a supplier catalog, rank suppliers, draft purchase orders, and run the loyalty and partner-risk modules from the command line.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logs on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project root (default: auto-detect by finding .baskit/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new Baskit project
    Init(InitArgs),

    /// Supplier catalog
    #[command(subcommand)]
    Sup(SupCommands),

    /// Evaluate and rank suppliers for an item list
    Match(MatchArgs),

    /// Distributor demands and their quotes
    #[command(subcommand)]
    Demand(DemandCommands),

    /// Predefined sales orders
    #[command(subcommand)]
    So(SoCommands),

    /// Encode and decode item-list transfer links
    #[command(subcommand)]
    Transfer(TransferCommands),

    /// Purchase orders
    #[command(subcommand)]
    Po(PoCommands),

    /// Loyalty marketplace (campaigns, receipts, leaderboards)
    #[command(subcommand)]
    Loyalty(LoyaltyCommands),

    /// Partner portal and transaction risk scoring
    #[command(subcommand)]
    Partner(PartnerCommands),

    /// Configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (yaml for show, tsv for list)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}

impl OutputFormat {
    /// Resolve `Auto`, honouring the configured default format
    pub fn resolve(self, configured: Option<&str>, fallback: OutputFormat) -> OutputFormat {
        if self != OutputFormat::Auto {
            return self;
        }
        configured
            .and_then(|name| OutputFormat::from_str(name, true).ok())
            .filter(|f| *f != OutputFormat::Auto)
            .unwrap_or(fallback)
    }
}
