//! CLI module - argument parsing and command dispatch

pub mod args;
pub mod commands;
pub mod helpers;
pub mod output;

pub use args::{Cli, Commands, GlobalOpts, OutputFormat};

use miette::Result;

use crate::core::config::Config;

/// Run a parsed command line against a resolved config
pub fn dispatch(cli: Cli, config: &Config) -> Result<()> {
    let global = &cli.global;
    match cli.command {
        Commands::Explode(args) => commands::explode::run(args, global, config),
        Commands::Bom(args) => commands::bom::run(args, global, config),
        Commands::WhereUsed(args) => commands::where_used::run(args, global, config),
        Commands::Lookup(cmd) => commands::lookup::run(cmd, global, config),
        Commands::Validate(args) => commands::validate::run(args, global, config),
        Commands::Import(args) => commands::import::run(args, global, config),
        Commands::Completions(args) => commands::completions::run(args),
    }
}
