//! `bomx validate` command - Check master data quality
//!
//! Reports version chains with empty or overlapping intervals, then explodes
//! every parent item as of the date to surface ambiguous links, invalid
//! quantities and cycles the way an explosion would hit them.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use console::style;
use miette::Result;
use rust_decimal::Decimal;

use crate::cli::helpers::{as_of_or_today, DataSource};
use crate::cli::GlobalOpts;
use crate::core::catalog::{MasterData, VersionCatalog};
use crate::core::config::Config;
use crate::core::entity::MasterRecord;
use crate::core::explosion::ExplosionEngine;

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Explode every parent as of this date (YYYY-MM-DD, default today)
    #[arg(long, short = 'a')]
    pub as_of: Option<NaiveDate>,

    /// Show summary only, don't list individual findings
    #[arg(long)]
    pub summary: bool,
}

/// Validation statistics
#[derive(Default)]
struct ValidationStats {
    chains_checked: usize,
    chain_issues: usize,
    parents_exploded: usize,
    explosion_errors: usize,
}

pub fn run(args: ValidateArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let as_of = as_of_or_today(args.as_of);
    let source = DataSource::open(global, config)?;
    let label = source.describe();
    let data = source.into_master_data()?;

    println!(
        "{} Validating {} record(s) from {} as of {}...\n",
        style("→").blue(),
        data.record_count(),
        label,
        as_of
    );

    let mut stats = ValidationStats::default();
    let mut findings = Vec::new();

    check_catalog(&data.items, &mut stats, &mut findings);
    check_catalog(&data.suppliers, &mut stats, &mut findings);
    check_catalog(&data.staff, &mut stats, &mut findings);
    check_catalog(&data.unit_prices, &mut stats, &mut findings);
    for (key, issue) in data.links.check() {
        findings.push(format!("BOM link {}: {}", key, issue));
        stats.chain_issues += 1;
    }
    stats.chains_checked += data
        .links
        .iter()
        .map(|l| (&l.parent_item_code, &l.child_item_code))
        .collect::<BTreeSet<_>>()
        .len();

    explode_all(&data, as_of, &mut stats, &mut findings);

    if !args.summary {
        for finding in &findings {
            println!("{} {}", style("✗").red(), finding);
        }
        if !findings.is_empty() {
            println!();
        }
    }

    println!("{}", style("─".repeat(60)).dim());
    println!("{}", style("Validation Summary").bold());
    println!("{}", style("─".repeat(60)).dim());
    println!("  Chains checked:    {}", style(stats.chains_checked).cyan());
    println!("  Chain issues:      {}", style(stats.chain_issues).red());
    println!("  Parents exploded:  {}", style(stats.parents_exploded).cyan());
    println!("  Explosion errors:  {}", style(stats.explosion_errors).red());
    println!();

    if findings.is_empty() {
        println!(
            "{} Master data is consistent as of {}",
            style("✓").green().bold(),
            as_of
        );
        Ok(())
    } else {
        Err(miette::miette!(
            "Validation failed: {} issue(s) found",
            findings.len()
        ))
    }
}

fn check_catalog<V: MasterRecord>(
    catalog: &VersionCatalog<V>,
    stats: &mut ValidationStats,
    findings: &mut Vec<String>,
) {
    stats.chains_checked += catalog.len();
    for (key, issue) in catalog.check() {
        findings.push(format!("{} {}: {}", V::KIND, key, issue));
        stats.chain_issues += 1;
    }
}

/// Explode every parent; one loop or ambiguity shows up once per distinct message
fn explode_all(
    data: &MasterData,
    as_of: NaiveDate,
    stats: &mut ValidationStats,
    findings: &mut Vec<String>,
) {
    let engine = ExplosionEngine::new(&data.links);
    let mut seen = BTreeSet::new();

    for parent in data.links.parents() {
        stats.parents_exploded += 1;
        if let Err(e) = engine.explode(parent, Decimal::ONE, as_of) {
            if seen.insert(e.to_string()) {
                findings.push(format!("explode {}: {}", parent, e));
                stats.explosion_errors += 1;
            }
        }
    }
}
