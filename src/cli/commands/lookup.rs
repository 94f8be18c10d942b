//! `bomx lookup` command - Effective-dated master data inquiry

use chrono::NaiveDate;
use clap::Subcommand;
use miette::Result;
use serde::Serialize;

use crate::cli::helpers::{as_of_or_today, DataSource};
use crate::cli::output::{effective_format, print_list, print_structured};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::catalog::VersionCatalog;
use crate::core::config::Config;
use crate::core::entity::MasterRecord;
use crate::core::temporal::format_validity;
use crate::entities::UnitPriceKey;

#[derive(Subcommand, Debug)]
pub enum LookupCommands {
    /// Item master version valid on a date
    Item(KeyArgs),

    /// Supplier master version valid on a date
    Supplier(KeyArgs),

    /// Staff master version (and department) valid on a date
    Staff(KeyArgs),

    /// Unit price of an item valid on a date
    Price(PriceArgs),
}

#[derive(clap::Args, Debug)]
pub struct KeyArgs {
    /// Business key (item, supplier or staff code)
    pub code: String,

    #[command(flatten)]
    pub when: WhenArgs,
}

#[derive(clap::Args, Debug)]
pub struct PriceArgs {
    /// Item code
    pub item: String,

    /// Supplier code (default: every supplier quoting the item)
    pub supplier: Option<String>,

    #[command(flatten)]
    pub when: WhenArgs,
}

#[derive(clap::Args, Debug)]
pub struct WhenArgs {
    /// Resolve as of this date (YYYY-MM-DD, default today)
    #[arg(long, short = 'a')]
    pub as_of: Option<NaiveDate>,

    /// List the whole version chain instead of one version
    #[arg(long)]
    pub history: bool,
}

pub fn run(cmd: LookupCommands, global: &GlobalOpts, config: &Config) -> Result<()> {
    let data = DataSource::open(global, config)?.into_master_data()?;

    match cmd {
        LookupCommands::Item(args) => lookup_one(&data.items, &args.code, &args.when, global.format),
        LookupCommands::Supplier(args) => {
            lookup_one(&data.suppliers, &args.code, &args.when, global.format)
        }
        LookupCommands::Staff(args) => lookup_one(&data.staff, &args.code, &args.when, global.format),
        LookupCommands::Price(args) => match args.supplier {
            Some(supplier) => {
                let key = UnitPriceKey::new(args.item, supplier);
                lookup_one(&data.unit_prices, &key, &args.when, global.format)
            }
            None if args.when.history => {
                let versions: Vec<_> = data
                    .unit_prices
                    .chains()
                    .filter(|(key, _)| key.item_code == args.item)
                    .flat_map(|(_, chain)| chain.iter())
                    .collect();
                print_history(&versions, global.format)
            }
            None => {
                let as_of = as_of_or_today(args.when.as_of);
                let prices = data.unit_prices_for_item_as_of(&args.item, as_of)?;
                if prices.is_empty() {
                    return Err(not_found("unit price", &args.item, as_of));
                }
                print_history(&prices, global.format)
            }
        },
    }
}

/// Print one chain's version valid on the date, or the whole chain
fn lookup_one<V, Q>(
    catalog: &VersionCatalog<V>,
    key: &Q,
    when: &WhenArgs,
    format: OutputFormat,
) -> Result<()>
where
    V: MasterRecord + Serialize,
    V::Key: std::borrow::Borrow<Q>,
    Q: Ord + std::fmt::Display + ?Sized,
{
    if when.history {
        let versions: Vec<&V> = catalog.versions(key).iter().collect();
        if versions.is_empty() {
            return Err(miette::miette!("No {} {} found", V::KIND, key));
        }
        return print_history(&versions, format);
    }

    let as_of = as_of_or_today(when.as_of);
    match catalog.find_valid_as_of(key, as_of)? {
        Some(version) => match effective_format(format, false) {
            f @ (OutputFormat::Json | OutputFormat::Yaml) => print_structured(version, f),
            f => print_history(&[version], f),
        },
        None => Err(not_found(V::KIND, key, as_of)),
    }
}

fn print_history<V: MasterRecord + Serialize>(versions: &[&V], format: OutputFormat) -> Result<()> {
    let rows: Vec<Vec<String>> = versions
        .iter()
        .map(|v| vec![v.key().to_string(), format_validity(*v), v.summary()])
        .collect();
    print_list(versions, &["KEY", "VALID", "DETAILS"], &rows, format)
}

fn not_found(kind: &str, key: &(impl std::fmt::Display + ?Sized), as_of: NaiveDate) -> miette::Report {
    miette::miette!(
        help = "use --history to list every version",
        "No {} {} valid as of {}",
        kind,
        key,
        as_of
    )
}
