//! Command-line argument definitions

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    bom::BomArgs, completions::CompletionsArgs, explode::ExplodeArgs, import::ImportArgs,
    lookup::LookupCommands, validate::ValidateArgs, where_used::WhereUsedArgs,
};

#[derive(Parser, Debug)]
#[command(
    name = "bomx",
    version,
    about = "Effective-dated Bill-of-Materials explosion",
    long_about = "Explode multi-level BOMs into component requirements as of a date.\n\n\
                  Master data comes from YAML/CSV files (--data) or a SQLite store (--db)."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options accepted by every command
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Master data file or directory (YAML/CSV)
    #[arg(long, short = 'd', global = true, env = "BOMX_DATA")]
    pub data: Option<PathBuf>,

    /// SQLite master data store
    #[arg(long, global = true, env = "BOMX_DB")]
    pub db: Option<PathBuf>,

    /// Config file (default: ./bomx.yaml when present)
    #[arg(long, global = true, env = "BOMX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// More log output (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Explode an item's BOM as of a date
    Explode(ExplodeArgs),

    /// List an item's direct components as of a date
    Bom(BomArgs),

    /// List the parents that directly consume an item
    WhereUsed(WhereUsedArgs),

    /// Look up master data valid on a date
    #[command(subcommand)]
    Lookup(LookupCommands),

    /// Check master data for overlapping versions, ambiguity and cycles
    Validate(ValidateArgs),

    /// Load YAML/CSV master data into a SQLite store
    Import(ImportArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Output format for command results
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// TSV for lists, YAML for single records
    #[default]
    Auto,
    /// Human-readable table
    Table,
    Json,
    Yaml,
    Csv,
    Tsv,
}
