//! BOM link entity type - Effective-dated parent/child structure rows

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::entity::MasterRecord;
use crate::core::temporal::Versioned;

/// Natural key of a BOM link chain
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BomLinkKey {
    pub parent: String,
    pub child: String,
}

impl std::fmt::Display for BomLinkKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}", self.parent, self.child)
    }
}

/// One version of a parent → child BOM relationship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomLink {
    /// Item being built
    pub parent_item_code: String,

    /// Item consumed
    pub child_item_code: String,

    /// First day this link is valid
    pub effective_from: NaiveDate,

    /// First day this link is no longer valid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_to: Option<NaiveDate>,

    /// Units of child consumed per one unit of parent (must be > 0)
    #[serde(deserialize_with = "crate::core::decimal::deserialize")]
    pub required_quantity: Decimal,

    /// Display and tie-break order among siblings
    #[serde(default)]
    pub sequence: i32,
}

impl BomLink {
    /// Create an open-ended link
    pub fn new(
        parent_item_code: impl Into<String>,
        child_item_code: impl Into<String>,
        effective_from: NaiveDate,
        required_quantity: Decimal,
        sequence: i32,
    ) -> Self {
        Self {
            parent_item_code: parent_item_code.into(),
            child_item_code: child_item_code.into(),
            effective_from,
            effective_to: None,
            required_quantity,
            sequence,
        }
    }

    /// Close this link on `date` (builder style)
    pub fn until(mut self, date: NaiveDate) -> Self {
        self.effective_to = Some(date);
        self
    }

    /// Whether the required quantity satisfies the `> 0` invariant
    pub fn has_valid_quantity(&self) -> bool {
        self.required_quantity > Decimal::ZERO
    }
}

impl Versioned for BomLink {
    fn effective_from(&self) -> NaiveDate {
        self.effective_from
    }

    fn effective_to(&self) -> Option<NaiveDate> {
        self.effective_to
    }
}

impl MasterRecord for BomLink {
    const KIND: &'static str = "BOM link";
    type Key = BomLinkKey;

    fn key(&self) -> BomLinkKey {
        BomLinkKey {
            parent: self.parent_item_code.clone(),
            child: self.child_item_code.clone(),
        }
    }

    fn summary(&self) -> String {
        format!("{} × {} (seq {})", self.child_item_code, self.required_quantity, self.sequence)
    }
}
