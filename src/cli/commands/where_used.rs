//! `bomx where-used` command - Single-level reverse BOM lookup

use chrono::NaiveDate;
use console::style;
use miette::Result;

use crate::cli::helpers::{as_of_or_today, format_quantity, item_name, DataSource};
use crate::cli::output::print_list;
use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::links::BomLinkTable;
use crate::core::temporal::format_validity;

#[derive(clap::Args, Debug)]
pub struct WhereUsedArgs {
    /// Component item code
    pub item: String,

    /// Resolve links as of this date (YYYY-MM-DD, default today)
    #[arg(long, short = 'a')]
    pub as_of: Option<NaiveDate>,
}

pub fn run(args: WhereUsedArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let as_of = as_of_or_today(args.as_of);
    let source = DataSource::open(global, config)?;

    let used = match &source {
        DataSource::Files { data, .. } => data.links.where_used(&args.item, as_of)?,
        DataSource::Store(store) => {
            BomLinkTable::from_links(store.links_for_child(&args.item)?)
                .where_used(&args.item, as_of)?
        }
    };

    if used.is_empty() {
        eprintln!(
            "{} {} is not used by any parent as of {}",
            style("!").yellow(),
            style(&args.item).cyan(),
            as_of
        );
    }

    let lookup = source.item_lookup();
    let rows: Vec<Vec<String>> = used
        .iter()
        .map(|link| {
            vec![
                link.parent_item_code.clone(),
                item_name(lookup, &link.parent_item_code, as_of),
                format_quantity(link.required_quantity),
                link.sequence.to_string(),
                format_validity(link),
            ]
        })
        .collect();

    print_list(
        &used,
        &["PARENT", "NAME", "QTY", "SEQ", "VALID"],
        &rows,
        global.format,
    )
}
