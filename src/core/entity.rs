//! MasterRecord trait - common interface for effective-dated master data

use std::fmt::Display;

use crate::core::temporal::Versioned;

/// Common trait for all versioned master-data records
///
/// A record is one version of a business entity. All versions sharing the
/// same [`MasterRecord::Key`] form one chain.
pub trait MasterRecord: Versioned {
    /// Human-readable kind used in messages (e.g., "item", "supplier")
    const KIND: &'static str;

    /// Stable business key shared by every version of the entity
    type Key: Ord + Clone + Display;

    /// Get the record's natural key
    fn key(&self) -> Self::Key;

    /// One-line description of this version for listings
    fn summary(&self) -> String;
}
