//! Unit price entity type - Supplier purchase prices per item

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::entity::MasterRecord;
use crate::core::temporal::Versioned;

/// Natural key of a unit price chain
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitPriceKey {
    pub item_code: String,
    pub supplier_code: String,
}

impl UnitPriceKey {
    pub fn new(item_code: impl Into<String>, supplier_code: impl Into<String>) -> Self {
        Self {
            item_code: item_code.into(),
            supplier_code: supplier_code.into(),
        }
    }
}

impl std::fmt::Display for UnitPriceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.item_code, self.supplier_code)
    }
}

fn default_currency() -> String {
    "JPY".to_string()
}

/// One version of an item's purchase price from one supplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitPriceVersion {
    /// Item being priced
    pub item_code: String,

    /// Supplier quoting the price
    pub supplier_code: String,

    /// First day this price is valid
    pub effective_from: NaiveDate,

    /// First day this price is no longer valid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_to: Option<NaiveDate>,

    /// Price per unit
    #[serde(deserialize_with = "crate::core::decimal::deserialize")]
    pub price: Decimal,

    /// ISO 4217 currency code
    #[serde(default = "default_currency")]
    pub currency_code: String,
}

impl Versioned for UnitPriceVersion {
    fn effective_from(&self) -> NaiveDate {
        self.effective_from
    }

    fn effective_to(&self) -> Option<NaiveDate> {
        self.effective_to
    }
}

impl MasterRecord for UnitPriceVersion {
    const KIND: &'static str = "unit price";
    type Key = UnitPriceKey;

    fn key(&self) -> UnitPriceKey {
        UnitPriceKey::new(self.item_code.clone(), self.supplier_code.clone())
    }

    fn summary(&self) -> String {
        format!("{} {}", self.price, self.currency_code)
    }
}
