//! Effective-dated ("as of") version resolution
//!
//! Items, BOM links, suppliers, staff and unit prices are stored as version
//! chains. Each version is valid over the half-open interval
//! `[effective_from, effective_to)`; an absent `effective_to` means the
//! version is still open. Resolving a chain "as of" a date yields the single
//! version covering that date, or nothing when the entity did not exist yet
//! (or had already been retired).
//!
//! Two resolvers are provided:
//! - [`resolve_as_of`] never fails. If a corrupt chain has several versions
//!   covering the date it picks the one with the latest `effective_from`,
//!   and among equal `effective_from` values the one supplied last.
//! - [`resolve_unique_as_of`] treats several covering versions as an
//!   [`BomError::AmbiguousVersion`]. All lookups and the explosion engine
//!   go through this one.

use chrono::NaiveDate;

use crate::core::error::{BomError, Result};

/// A record that is one version in an effective-dated chain
pub trait Versioned {
    /// First day the version is valid
    fn effective_from(&self) -> NaiveDate;

    /// First day the version is no longer valid (`None` = open-ended)
    fn effective_to(&self) -> Option<NaiveDate>;

    /// Whether the version covers `date`
    fn is_valid_on(&self, date: NaiveDate) -> bool {
        self.effective_from() <= date && self.effective_to().map_or(true, |to| date < to)
    }
}

/// Iterate over the versions that cover `date`
pub fn valid_as_of<'a, V, I>(versions: I, date: NaiveDate) -> impl Iterator<Item = &'a V>
where
    V: Versioned + 'a,
    I: IntoIterator<Item = &'a V>,
{
    versions.into_iter().filter(move |v| v.is_valid_on(date))
}

/// Resolve the version valid on `date`, tolerating overlapping chains
///
/// Returns `None` when no version covers the date.
pub fn resolve_as_of<'a, V, I>(versions: I, date: NaiveDate) -> Option<&'a V>
where
    V: Versioned + 'a,
    I: IntoIterator<Item = &'a V>,
{
    // max_by_key keeps the last of equal keys
    valid_as_of(versions, date).max_by_key(|v| v.effective_from())
}

/// Resolve the version valid on `date`, failing if more than one covers it
///
/// `kind` and `key` only feed the error message.
pub fn resolve_unique_as_of<'a, V, I>(
    versions: I,
    date: NaiveDate,
    kind: &'static str,
    key: &str,
) -> Result<Option<&'a V>>
where
    V: Versioned + 'a,
    I: IntoIterator<Item = &'a V>,
{
    let mut candidates = valid_as_of(versions, date);
    let Some(first) = candidates.next() else {
        return Ok(None);
    };
    let extra = candidates.count();
    if extra > 0 {
        return Err(BomError::AmbiguousVersion {
            kind,
            key: key.to_string(),
            date,
            count: extra + 1,
        });
    }
    Ok(Some(first))
}

/// A data-quality problem in a version chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainIssue {
    /// `effective_to` is not after `effective_from`, so the version is never valid
    EmptyInterval {
        effective_from: NaiveDate,
        effective_to: NaiveDate,
    },
    /// Two versions cover at least one common day
    Overlap {
        first_from: NaiveDate,
        second_from: NaiveDate,
    },
}

impl std::fmt::Display for ChainIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChainIssue::EmptyInterval {
                effective_from,
                effective_to,
            } => write!(
                f,
                "empty validity interval [{}, {})",
                effective_from, effective_to
            ),
            ChainIssue::Overlap {
                first_from,
                second_from,
            } => write!(
                f,
                "versions starting {} and {} overlap",
                first_from, second_from
            ),
        }
    }
}

/// Check a version chain for empty intervals and overlaps
///
/// The chain does not need to be sorted.
pub fn check_chain<V: Versioned>(versions: &[V]) -> Vec<ChainIssue> {
    let mut issues = Vec::new();
    let mut sorted: Vec<&V> = versions.iter().collect();
    sorted.sort_by_key(|v| v.effective_from());

    for v in &sorted {
        if let Some(to) = v.effective_to() {
            if to <= v.effective_from() {
                issues.push(ChainIssue::EmptyInterval {
                    effective_from: v.effective_from(),
                    effective_to: to,
                });
            }
        }
    }

    // Sorted by start, so an overlap always shows up between a version and
    // one that starts before the latest end seen so far.
    let mut reach: Option<(NaiveDate, Option<NaiveDate>)> = None;
    for v in sorted {
        if v.effective_to().is_some_and(|to| to <= v.effective_from()) {
            continue;
        }
        if let Some((start, end)) = reach {
            if end.map_or(true, |end| v.effective_from() < end) {
                issues.push(ChainIssue::Overlap {
                    first_from: start,
                    second_from: v.effective_from(),
                });
            }
        }
        let extends = match (reach, v.effective_to()) {
            (None, _) => true,
            (Some((_, None)), _) => false,
            (Some(_), None) => true,
            (Some((_, Some(end))), Some(to)) => to > end,
        };
        if extends {
            reach = Some((v.effective_from(), v.effective_to()));
        }
    }

    issues
}

/// Render a validity interval as `[from, to)` or `[from, open)`
pub fn format_validity<V: Versioned + ?Sized>(version: &V) -> String {
    match version.effective_to() {
        Some(to) => format!("[{}, {})", version.effective_from(), to),
        None => format!("[{}, open)", version.effective_from()),
    }
}
