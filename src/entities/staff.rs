//! Staff entity type - Employees and their department assignments over time

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::entity::MasterRecord;
use crate::core::temporal::Versioned;

/// One version of a staff master record
///
/// A transfer to another department closes the current version and opens a
/// new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffVersion {
    pub staff_code: String,

    pub effective_from: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_to: Option<NaiveDate>,

    pub staff_name: String,

    pub department_code: String,
}

impl Versioned for StaffVersion {
    fn effective_from(&self) -> NaiveDate {
        self.effective_from
    }

    fn effective_to(&self) -> Option<NaiveDate> {
        self.effective_to
    }
}

impl MasterRecord for StaffVersion {
    const KIND: &'static str = "staff";
    type Key = String;

    fn key(&self) -> String {
        self.staff_code.clone()
    }

    fn summary(&self) -> String {
        format!("{} ({})", self.staff_name, self.department_code)
    }
}
