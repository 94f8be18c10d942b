//! Master data loading from YAML and CSV files
//!
//! A YAML master data document has optional top-level sections:
//!
//! ```yaml
//! items:
//!   - item_code: X
//!     effective_from: 2024-01-01
//!     item_name: Product X
//!     category: product
//! bom_links:
//!   - parent_item_code: X
//!     child_item_code: n
//!     effective_from: 2024-01-01
//!     required_quantity: 1
//!     sequence: 1
//! suppliers: []
//! staff: []
//! unit_prices: []
//! ```
//!
//! CSV files carry BOM links only, one per row, with the header
//! `parent_item_code,child_item_code,effective_from,effective_to,required_quantity,sequence`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use miette::Diagnostic;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::core::catalog::MasterData;
use crate::core::config::PROJECT_CONFIG_FILE;
use crate::entities::{BomLink, ItemVersion, StaffVersion, SupplierVersion, UnitPriceVersion};
use crate::yaml::{parse_yaml, YamlError};

#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("Failed to read {path}")]
    #[diagnostic(code(bomx::load::io))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlError),

    #[error("Invalid CSV in {path}: {source}")]
    #[diagnostic(
        code(bomx::load::csv),
        help("expected header: parent_item_code,child_item_code,effective_from,effective_to,required_quantity,sequence")
    )]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid row {row} in {path}: {message}")]
    #[diagnostic(code(bomx::load::invalid_row))]
    InvalidRow {
        path: PathBuf,
        row: usize,
        message: String,
    },

    #[error("Unsupported master data file: {0}")]
    #[diagnostic(
        code(bomx::load::unsupported),
        help("master data files end in .yaml, .yml or .csv")
    )]
    Unsupported(PathBuf),

    #[error("Failed to walk {path}: {message}")]
    #[diagnostic(code(bomx::load::walk))]
    Walk { path: PathBuf, message: String },
}

/// A YAML master data document
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MasterDataFile {
    #[serde(default)]
    pub items: Vec<ItemVersion>,
    #[serde(default)]
    pub bom_links: Vec<BomLink>,
    #[serde(default)]
    pub suppliers: Vec<SupplierVersion>,
    #[serde(default)]
    pub staff: Vec<StaffVersion>,
    #[serde(default)]
    pub unit_prices: Vec<UnitPriceVersion>,
}

/// A CSV link row; the quantity stays text until parsed so its scale survives
#[derive(Debug, Deserialize)]
struct CsvLinkRow {
    parent_item_code: String,
    child_item_code: String,
    effective_from: NaiveDate,
    #[serde(default)]
    effective_to: Option<NaiveDate>,
    required_quantity: String,
    #[serde(default)]
    sequence: i32,
}

/// Load a master data file, or every master data file under a directory
pub fn load_path(path: &Path) -> Result<MasterData, LoadError> {
    if !path.is_dir() {
        return load_file(path);
    }

    let mut data = MasterData::new();
    let mut files = 0;
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.map_err(|e| LoadError::Walk {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let file = entry.path();
        if !entry.file_type().is_file() || !is_master_data_file(file) {
            continue;
        }
        data.merge(load_file(file)?);
        files += 1;
    }

    info!(
        dir = %path.display(),
        files,
        records = data.record_count(),
        "loaded master data"
    );
    Ok(data)
}

/// Load one `.yaml`/`.yml` document or `.csv` link file
pub fn load_file(path: &Path) -> Result<MasterData, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let data = match extension(path).as_deref() {
        Some("yaml") | Some("yml") => parse_master_data(&content, path)?,
        Some("csv") => {
            let mut data = MasterData::new();
            data.links.extend(read_links_csv(content.as_bytes(), path)?);
            data
        }
        _ => return Err(LoadError::Unsupported(path.to_path_buf())),
    };

    debug!(path = %path.display(), records = data.record_count(), "loaded file");
    Ok(data)
}

/// Parse a YAML master data document
pub fn parse_master_data(content: &str, path: &Path) -> Result<MasterData, LoadError> {
    let file: MasterDataFile = if content.trim().is_empty() {
        MasterDataFile::default()
    } else {
        parse_yaml(content, &path.display().to_string())?
    };

    for (idx, link) in file.bom_links.iter().enumerate() {
        check_link_quantity(link, path, idx + 1)?;
    }

    let mut data = MasterData::new();
    data.items.extend(file.items);
    data.suppliers.extend(file.suppliers);
    data.staff.extend(file.staff);
    data.unit_prices.extend(file.unit_prices);
    data.links.extend(file.bom_links);
    Ok(data)
}

/// Read BOM links from CSV
///
/// Row numbers in errors count the header as row 1.
pub fn read_links_csv<R: io::Read>(reader: R, path: &Path) -> Result<Vec<BomLink>, LoadError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut links = Vec::new();
    for (idx, row) in reader.deserialize::<CsvLinkRow>().enumerate() {
        let row_number = idx + 2;
        let row = row.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let required_quantity: Decimal =
            row.required_quantity
                .parse()
                .map_err(|e| LoadError::InvalidRow {
                    path: path.to_path_buf(),
                    row: row_number,
                    message: format!("required_quantity '{}': {}", row.required_quantity, e),
                })?;

        let link = BomLink {
            parent_item_code: row.parent_item_code,
            child_item_code: row.child_item_code,
            effective_from: row.effective_from,
            effective_to: row.effective_to,
            required_quantity,
            sequence: row.sequence,
        };
        check_link_quantity(&link, path, row_number)?;
        links.push(link);
    }
    Ok(links)
}

fn check_link_quantity(link: &BomLink, path: &Path, row: usize) -> Result<(), LoadError> {
    if link.has_valid_quantity() {
        return Ok(());
    }
    Err(LoadError::InvalidRow {
        path: path.to_path_buf(),
        row,
        message: format!(
            "required_quantity of {} → {} must be greater than zero, got {}",
            link.parent_item_code, link.child_item_code, link.required_quantity
        ),
    })
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}

fn is_master_data_file(path: &Path) -> bool {
    let is_config = path
        .file_name()
        .is_some_and(|name| name == PROJECT_CONFIG_FILE);
    !is_config && matches!(extension(path).as_deref(), Some("yaml" | "yml" | "csv"))
}
