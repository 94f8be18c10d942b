//! Entity type definitions
//!
//! Every master entity is effective-dated: a record is one version in a chain
//! sharing a natural key.
//!
//! - [`ItemVersion`] - Products, intermediates, parts and materials
//! - [`BomLink`] - Parent → child structure rows with required quantities
//! - [`SupplierVersion`] - Vendors, subcontractors and customers
//! - [`StaffVersion`] - Staff and their department assignment
//! - [`UnitPriceVersion`] - Purchase prices per item and supplier

pub mod bom;
pub mod item;
pub mod staff;
pub mod supplier;
pub mod unit_price;

pub use bom::{BomLink, BomLinkKey};
pub use item::{ItemCategory, ItemVersion};
pub use staff::StaffVersion;
pub use supplier::{SupplierType, SupplierVersion};
pub use unit_price::{UnitPriceKey, UnitPriceVersion};
