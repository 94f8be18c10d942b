//! Shared helper functions for CLI commands
//!
//! Resolves where master data comes from (flags over config) and renders
//! the small bits every command shares.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;

use crate::cli::GlobalOpts;
use crate::core::catalog::{ItemLookup, MasterData};
use crate::core::config::Config;
use crate::core::loader::load_path;
use crate::core::store::LinkStore;

/// Where a command reads master data from
pub enum DataSource {
    /// YAML/CSV files loaded into memory
    Files { path: PathBuf, data: MasterData },
    /// SQLite store, read lazily
    Store(LinkStore),
}

impl DataSource {
    /// Open the source named by flags, falling back to the config
    ///
    /// An explicit `--db` or `--data` flag beats both config entries.
    pub fn open(global: &GlobalOpts, config: &Config) -> Result<Self> {
        if let Some(db) = &global.db {
            return open_store(db);
        }
        if let Some(data) = &global.data {
            return open_files(data);
        }
        if let Some(db) = &config.database {
            return open_store(db);
        }
        if let Some(data) = &config.data {
            return open_files(data);
        }
        Err(miette::miette!(
            code = "bomx::no_data",
            help = "pass --data <PATH> or --db <FILE>, or set data/database in bomx.yaml",
            "No master data source configured"
        ))
    }

    /// Everything in memory, loading the whole store when needed
    pub fn into_master_data(self) -> Result<MasterData> {
        match self {
            DataSource::Files { data, .. } => Ok(data),
            DataSource::Store(store) => Ok(store.load_master_data()?),
        }
    }

    pub fn item_lookup(&self) -> &dyn ItemLookup {
        match self {
            DataSource::Files { data, .. } => data as &dyn ItemLookup,
            DataSource::Store(store) => store as &dyn ItemLookup,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            DataSource::Files { path, .. } => path.display().to_string(),
            DataSource::Store(store) => store
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| ":memory:".to_string()),
        }
    }
}

fn open_store(path: &Path) -> Result<DataSource> {
    if !path.exists() {
        return Err(miette::miette!(
            help = "create it with `bomx import <PATH> --db <FILE>`",
            "Store not found: {}",
            path.display()
        ));
    }
    Ok(DataSource::Store(LinkStore::open(path)?))
}

fn open_files(path: &Path) -> Result<DataSource> {
    if !path.exists() {
        return Err(miette::miette!("Master data not found: {}", path.display()));
    }
    let data = load_path(path)?;
    Ok(DataSource::Files {
        path: path.to_path_buf(),
        data,
    })
}

/// The as-of date, defaulting to today
pub fn as_of_or_today(as_of: Option<NaiveDate>) -> NaiveDate {
    as_of.unwrap_or_else(|| Local::now().date_naive())
}

/// Item name valid on `date`, empty when unknown
///
/// Lookup failures (e.g. ambiguous item versions) render as empty too; the
/// explosion result itself is unaffected.
pub fn item_name(lookup: &dyn ItemLookup, item_code: &str, date: NaiveDate) -> String {
    match lookup.item_as_of(item_code, date) {
        Ok(Some(item)) => item.item_name,
        _ => String::new(),
    }
}

/// Render a decimal without trailing zeros
pub fn format_quantity(quantity: Decimal) -> String {
    quantity.normalize().to_string()
}

/// Truncate a string to max_len, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Make sure the directory holding `path` exists
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).into_diagnostic()?;
    }
    Ok(())
}
