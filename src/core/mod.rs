//! Core module - temporal resolution, BOM explosion and master data access

pub mod catalog;
pub mod config;
pub mod decimal;
pub mod entity;
pub mod error;
pub mod explosion;
pub mod links;
pub mod loader;
pub mod store;
pub mod temporal;

pub use catalog::{ItemLookup, MasterData, VersionCatalog};
pub use config::{Config, ConfigError};
pub use entity::MasterRecord;
pub use error::{BomError, Result};
pub use explosion::{
    aggregate_requirements, BomLinkSource, ExplosionEngine, ExplosionRecord, ItemRequirement,
};
pub use links::BomLinkTable;
pub use loader::{load_path, LoadError, MasterDataFile};
pub use store::{LinkStore, StoreStats};
pub use temporal::{
    check_chain, format_validity, resolve_as_of, resolve_unique_as_of, valid_as_of, ChainIssue,
    Versioned,
};
