//! Supplier entity type - Business partners we buy from, subcontract to or sell to

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::entity::MasterRecord;
use crate::core::temporal::Versioned;

/// Supplier relationship type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SupplierType {
    #[default]
    Vendor,
    Subcontractor,
    Customer,
}

impl std::fmt::Display for SupplierType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SupplierType::Vendor => write!(f, "vendor"),
            SupplierType::Subcontractor => write!(f, "subcontractor"),
            SupplierType::Customer => write!(f, "customer"),
        }
    }
}

impl std::str::FromStr for SupplierType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vendor" => Ok(SupplierType::Vendor),
            "subcontractor" => Ok(SupplierType::Subcontractor),
            "customer" => Ok(SupplierType::Customer),
            _ => Err(format!(
                "Unknown supplier type: {}. Use vendor, subcontractor or customer",
                s
            )),
        }
    }
}

/// One version of a supplier master record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierVersion {
    /// Stable business key
    pub supplier_code: String,

    /// First day this version is valid
    pub effective_from: NaiveDate,

    /// First day this version is no longer valid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_to: Option<NaiveDate>,

    /// Company name
    pub supplier_name: String,

    /// Relationship type
    #[serde(default)]
    pub supplier_type: SupplierType,
}

impl Versioned for SupplierVersion {
    fn effective_from(&self) -> NaiveDate {
        self.effective_from
    }

    fn effective_to(&self) -> Option<NaiveDate> {
        self.effective_to
    }
}

impl MasterRecord for SupplierVersion {
    const KIND: &'static str = "supplier";
    type Key = String;

    fn key(&self) -> String {
        self.supplier_code.clone()
    }

    fn summary(&self) -> String {
        format!("{} ({})", self.supplier_name, self.supplier_type)
    }
}
