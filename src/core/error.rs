//! Error types for resolution and explosion
//!
//! Every variant aborts the current call. A BOM explosion never returns a
//! partial result: a truncated list would read as a complete (and
//! under-counted) material requirement.

use chrono::NaiveDate;
use miette::Diagnostic;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by the temporal resolver, the explosion engine and link sources
#[derive(Debug, Error, Diagnostic)]
pub enum BomError {
    #[error("Invalid explosion quantity {quantity}: the root quantity must be greater than zero")]
    #[diagnostic(
        code(bomx::invalid_quantity),
        help("pass a positive quantity, e.g. --qty 1")
    )]
    InvalidQuantity { quantity: Decimal },

    #[error("Invalid required quantity {quantity} on BOM link {parent} → {child}")]
    #[diagnostic(
        code(bomx::invalid_link_quantity),
        help("required quantities must be greater than zero; fix the link row in the master data")
    )]
    InvalidLinkQuantity {
        parent: String,
        child: String,
        quantity: Decimal,
    },

    #[error("Cyclic BOM: link {parent} → {child} closes the loop {}", .path.join(" → "))]
    #[diagnostic(
        code(bomx::cyclic_bom),
        help("an item cannot be its own (transitive) component; remove or end-date one of the links in the loop")
    )]
    CyclicBom {
        parent: String,
        child: String,
        path: Vec<String>,
    },

    #[error("Ambiguous {kind} versions for {key} as of {date}: {count} versions are valid on that date")]
    #[diagnostic(
        code(bomx::ambiguous_version),
        help("validity intervals of one version chain must not overlap; close the earlier version's effective_to")
    )]
    AmbiguousVersion {
        kind: &'static str,
        key: String,
        date: NaiveDate,
        count: usize,
    },

    #[error("Quantity overflow multiplying along {parent} → {child}")]
    #[diagnostic(code(bomx::quantity_overflow))]
    QuantityOverflow { parent: String, child: String },

    #[error("Link store error: {0}")]
    #[diagnostic(code(bomx::store))]
    Store(#[from] rusqlite::Error),
}

/// Result alias used across the core modules
pub type Result<T, E = BomError> = std::result::Result<T, E>;
