//! `bomx bom` command - Single-level BOM of a parent item

use chrono::NaiveDate;
use console::style;
use miette::Result;

use crate::cli::helpers::{as_of_or_today, format_quantity, item_name, DataSource};
use crate::cli::output::print_list;
use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::explosion::{children_as_of, BomLinkSource};
use crate::core::temporal::format_validity;

#[derive(clap::Args, Debug)]
pub struct BomArgs {
    /// Parent item code
    pub item: String,

    /// Resolve links as of this date (YYYY-MM-DD, default today)
    #[arg(long, short = 'a')]
    pub as_of: Option<NaiveDate>,
}

pub fn run(args: BomArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let as_of = as_of_or_today(args.as_of);
    let source = DataSource::open(global, config)?;

    let links = match &source {
        DataSource::Files { data, .. } => data.links.links_for_parent(&args.item)?,
        DataSource::Store(store) => store.links_for_parent(&args.item)?,
    };
    let children = children_as_of(&args.item, &links, as_of)?;

    if children.is_empty() {
        eprintln!(
            "{} {} has no components as of {}",
            style("!").yellow(),
            style(&args.item).cyan(),
            as_of
        );
    }

    let lookup = source.item_lookup();
    let rows: Vec<Vec<String>> = children
        .iter()
        .map(|link| {
            vec![
                link.sequence.to_string(),
                link.child_item_code.clone(),
                item_name(lookup, &link.child_item_code, as_of),
                format_quantity(link.required_quantity),
                format_validity(link),
            ]
        })
        .collect();

    print_list(
        &children,
        &["SEQ", "CHILD", "NAME", "QTY", "VALID"],
        &rows,
        global.format,
    )
}
