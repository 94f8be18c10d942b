//! Item entity type - Products, intermediates, parts and materials

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::entity::MasterRecord;
use crate::core::temporal::Versioned;

/// Item category (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    /// Finished product sold to customers
    Product,
    /// Manufactured sub-assembly consumed by other items
    Intermediate,
    /// Purchased or made component
    Part,
    /// Raw material
    Material,
}

impl std::fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemCategory::Product => write!(f, "product"),
            ItemCategory::Intermediate => write!(f, "intermediate"),
            ItemCategory::Part => write!(f, "part"),
            ItemCategory::Material => write!(f, "material"),
        }
    }
}

impl std::str::FromStr for ItemCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "product" => Ok(ItemCategory::Product),
            "intermediate" => Ok(ItemCategory::Intermediate),
            "part" => Ok(ItemCategory::Part),
            "material" => Ok(ItemCategory::Material),
            _ => Err(format!(
                "Invalid item category: {}. Use product, intermediate, part, or material",
                s
            )),
        }
    }
}

/// One version of an item master record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemVersion {
    /// Stable business key
    pub item_code: String,

    /// First day this version is valid
    pub effective_from: NaiveDate,

    /// First day this version is no longer valid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_to: Option<NaiveDate>,

    /// Item name
    pub item_name: String,

    /// Item category
    pub category: ItemCategory,

    /// Replenishment lead time in days
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_time: Option<u32>,

    /// Yield rate in percent (e.g., 98.00)
    #[serde(
        default,
        deserialize_with = "crate::core::decimal::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub yield_rate: Option<Decimal>,
}

impl ItemVersion {
    /// Create an open-ended version with no planning attributes
    pub fn new(
        item_code: impl Into<String>,
        effective_from: NaiveDate,
        item_name: impl Into<String>,
        category: ItemCategory,
    ) -> Self {
        Self {
            item_code: item_code.into(),
            effective_from,
            effective_to: None,
            item_name: item_name.into(),
            category,
            lead_time: None,
            yield_rate: None,
        }
    }

    /// Close this version on `date` (builder style)
    pub fn until(mut self, date: NaiveDate) -> Self {
        self.effective_to = Some(date);
        self
    }
}

impl Versioned for ItemVersion {
    fn effective_from(&self) -> NaiveDate {
        self.effective_from
    }

    fn effective_to(&self) -> Option<NaiveDate> {
        self.effective_to
    }
}

impl MasterRecord for ItemVersion {
    const KIND: &'static str = "item";
    type Key = String;

    fn key(&self) -> String {
        self.item_code.clone()
    }

    fn summary(&self) -> String {
        format!("{} ({})", self.item_name, self.category)
    }
}
