//! `bomx explode` command - Multi-level BOM explosion as of a date

use chrono::NaiveDate;
use console::style;
use miette::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::cli::helpers::{as_of_or_today, format_quantity, item_name, truncate_str, DataSource};
use crate::cli::output::{effective_format, print_list};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::catalog::ItemLookup;
use crate::core::config::Config;
use crate::core::explosion::{
    aggregate_requirements, BomLinkSource, ExplosionEngine, ExplosionRecord, ItemRequirement,
};

#[derive(clap::Args, Debug)]
pub struct ExplodeArgs {
    /// Root item code
    pub item: String,

    /// Quantity of the root item (default from config, 1)
    #[arg(long, short = 'q')]
    pub qty: Option<Decimal>,

    /// Explode as of this date (YYYY-MM-DD, default today)
    #[arg(long, short = 'a')]
    pub as_of: Option<NaiveDate>,

    /// Sum requirements per component instead of listing every path
    #[arg(long)]
    pub aggregate: bool,

    /// Load the whole link table before exploding (SQLite store only)
    #[arg(long)]
    pub prefetch: bool,
}

/// One explosion record decorated with the component's name
#[derive(Debug, Serialize)]
struct ExplodeRow<'a> {
    #[serde(flatten)]
    record: &'a ExplosionRecord,
    #[serde(skip_serializing_if = "String::is_empty")]
    item_name: String,
}

#[derive(Debug, Serialize)]
struct RequirementRow<'a> {
    #[serde(flatten)]
    requirement: &'a ItemRequirement,
    #[serde(skip_serializing_if = "String::is_empty")]
    item_name: String,
}

pub fn run(args: ExplodeArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let as_of = as_of_or_today(args.as_of);
    let quantity = args.qty.unwrap_or(config.default_quantity);
    let source = DataSource::open(global, config)?;
    debug!(source = %source.describe(), "exploding");

    if args.prefetch && matches!(source, DataSource::Files { .. }) {
        eprintln!(
            "{} --prefetch only applies to a SQLite store; file data is already in memory",
            style("!").yellow()
        );
    }

    let records = match &source {
        DataSource::Files { data, .. } => explode(&data.links, &args.item, quantity, as_of)?,
        DataSource::Store(store) if args.prefetch => {
            let table = store.prefetch()?;
            explode(&table, &args.item, quantity, as_of)?
        }
        DataSource::Store(store) => explode(store, &args.item, quantity, as_of)?,
    };

    if records.is_empty() {
        eprintln!(
            "{} {} has no components as of {}",
            style("!").yellow(),
            style(&args.item).cyan(),
            as_of
        );
    }

    let lookup = source.item_lookup();
    if args.aggregate {
        print_requirements(&aggregate_requirements(&records), lookup, as_of, global.format)
    } else {
        print_records(&records, lookup, as_of, global.format)
    }
}

fn explode<S: BomLinkSource>(
    source: S,
    item: &str,
    quantity: Decimal,
    as_of: NaiveDate,
) -> Result<Vec<ExplosionRecord>> {
    Ok(ExplosionEngine::new(source).explode(item, quantity, as_of)?)
}

fn print_records(
    records: &[ExplosionRecord],
    lookup: &dyn ItemLookup,
    as_of: NaiveDate,
    format: OutputFormat,
) -> Result<()> {
    let format = effective_format(format, true);
    let decorated: Vec<ExplodeRow> = records
        .iter()
        .map(|record| ExplodeRow {
            record,
            item_name: item_name(lookup, &record.child_item_code, as_of),
        })
        .collect();

    let indent = format == OutputFormat::Table;
    let rows: Vec<Vec<String>> = decorated
        .iter()
        .map(|row| {
            let r = row.record;
            let child = if indent {
                format!("{}{}", "  ".repeat(r.level.saturating_sub(1) as usize), r.child_item_code)
            } else {
                r.child_item_code.clone()
            };
            vec![
                r.level.to_string(),
                r.parent_item_code.clone(),
                child,
                truncate_str(&row.item_name, 30),
                format_quantity(r.unit_quantity),
                format_quantity(r.total_quantity),
                r.sequence.to_string(),
            ]
        })
        .collect();

    print_list(
        &decorated,
        &["LEVEL", "PARENT", "CHILD", "NAME", "UNIT QTY", "TOTAL QTY", "SEQ"],
        &rows,
        format,
    )
}

fn print_requirements(
    requirements: &[ItemRequirement],
    lookup: &dyn ItemLookup,
    as_of: NaiveDate,
    format: OutputFormat,
) -> Result<()> {
    let decorated: Vec<RequirementRow> = requirements
        .iter()
        .map(|requirement| RequirementRow {
            requirement,
            item_name: item_name(lookup, &requirement.item_code, as_of),
        })
        .collect();

    let rows: Vec<Vec<String>> = decorated
        .iter()
        .map(|row| {
            let r = row.requirement;
            vec![
                r.item_code.clone(),
                truncate_str(&row.item_name, 30),
                format_quantity(r.total_quantity),
                r.occurrences.to_string(),
                r.low_level_code.to_string(),
            ]
        })
        .collect();

    print_list(
        &decorated,
        &["ITEM", "NAME", "TOTAL QTY", "PATHS", "LLC"],
        &rows,
        format,
    )
}
