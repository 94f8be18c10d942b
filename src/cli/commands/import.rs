//! `bomx import` command - Load YAML/CSV master data into a SQLite store

use std::path::PathBuf;

use console::style;
use miette::Result;

use crate::cli::helpers::ensure_parent_dir;
use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::loader::load_path;
use crate::core::store::LinkStore;

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// Master data file or directory to import
    pub path: PathBuf,
}

pub fn run(args: ImportArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let db = global
        .db
        .clone()
        .or_else(|| config.database.clone())
        .ok_or_else(|| {
            miette::miette!(
                help = "pass --db <FILE> or set database in bomx.yaml",
                "No target store given"
            )
        })?;

    if !args.path.exists() {
        return Err(miette::miette!("Master data not found: {}", args.path.display()));
    }

    let data = load_path(&args.path)?;
    ensure_parent_dir(&db)?;
    let mut store = LinkStore::open(&db)?;
    let written = store.replace_all(&data)?;
    let stats = store.statistics()?;

    println!(
        "{} Imported {} record(s) from {} into {}",
        style("✓").green(),
        style(written).cyan(),
        args.path.display(),
        style(db.display()).yellow()
    );
    println!(
        "  items: {}  bom_links: {}  suppliers: {}  staff: {}  unit_prices: {}",
        stats.items, stats.bom_links, stats.suppliers, stats.staff, stats.unit_prices
    );
    println!(
        "  {} row(s) stored, schema v{}, {:.1} KiB on disk",
        stats.total_rows(),
        stats.schema_version,
        stats.db_size_bytes as f64 / 1024.0
    );
    Ok(())
}
