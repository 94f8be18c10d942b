//! Version catalogs for effective-dated master data
//!
//! Items, suppliers, staff and unit prices all share one lookup shape:
//! `find_valid_as_of(natural_key, date)`. [`VersionCatalog`] implements it
//! once over any [`MasterRecord`], and [`MasterData`] bundles the catalogs
//! with the BOM link table.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt::Display;

use chrono::NaiveDate;

use crate::core::entity::MasterRecord;
use crate::core::error::Result;
use crate::core::links::BomLinkTable;
use crate::core::temporal::{check_chain, resolve_unique_as_of, ChainIssue};
use crate::entities::{
    ItemVersion, StaffVersion, SupplierVersion, UnitPriceKey, UnitPriceVersion,
};

/// Version chains of one entity type, keyed by natural key
#[derive(Debug, Clone)]
pub struct VersionCatalog<V: MasterRecord> {
    chains: BTreeMap<V::Key, Vec<V>>,
}

impl<V: MasterRecord> Default for VersionCatalog<V> {
    fn default() -> Self {
        Self {
            chains: BTreeMap::new(),
        }
    }
}

impl<V: MasterRecord> VersionCatalog<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a version, keeping its chain ordered by effective_from
    pub fn insert(&mut self, version: V) {
        let chain = self.chains.entry(version.key()).or_default();
        // Equal starts keep insertion order
        let at = chain.partition_point(|v| v.effective_from() <= version.effective_from());
        chain.insert(at, version);
    }

    pub fn extend(&mut self, versions: impl IntoIterator<Item = V>) {
        for version in versions {
            self.insert(version);
        }
    }

    /// Number of distinct natural keys
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Number of stored versions across all chains
    pub fn version_count(&self) -> usize {
        self.chains.values().map(Vec::len).sum()
    }

    /// Natural keys in order
    pub fn keys(&self) -> impl Iterator<Item = &V::Key> {
        self.chains.keys()
    }

    /// The full version chain for `key`, oldest first
    pub fn versions<Q>(&self, key: &Q) -> &[V]
    where
        V::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.chains.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every chain, in key order
    pub fn chains(&self) -> impl Iterator<Item = (&V::Key, &[V])> {
        self.chains.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// The version of `key` valid on `date`
    ///
    /// `Ok(None)` means the entity did not exist on that date. Several valid
    /// versions are reported as an ambiguity error.
    pub fn find_valid_as_of<Q>(&self, key: &Q, date: NaiveDate) -> Result<Option<&V>>
    where
        V::Key: Borrow<Q>,
        Q: Ord + Display + ?Sized,
    {
        resolve_unique_as_of(self.versions(key), date, V::KIND, &key.to_string())
    }

    /// Check every chain for empty intervals and overlaps
    pub fn check(&self) -> Vec<(V::Key, ChainIssue)> {
        self.chains
            .iter()
            .flat_map(|(key, chain)| {
                check_chain(chain)
                    .into_iter()
                    .map(move |issue| (key.clone(), issue))
            })
            .collect()
    }
}

impl<V: MasterRecord> FromIterator<V> for VersionCatalog<V> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut catalog = Self::new();
        catalog.extend(iter);
        catalog
    }
}

/// Item master lookups as of a date
///
/// The explosion engine never needs item data; this is for callers that
/// decorate explosion output or cost it.
pub trait ItemLookup {
    fn item_as_of(&self, item_code: &str, date: NaiveDate) -> Result<Option<ItemVersion>>;
}

/// All effective-dated master data the engine and its callers read
#[derive(Debug, Clone, Default)]
pub struct MasterData {
    pub items: VersionCatalog<ItemVersion>,
    pub suppliers: VersionCatalog<SupplierVersion>,
    pub staff: VersionCatalog<StaffVersion>,
    pub unit_prices: VersionCatalog<UnitPriceVersion>,
    pub links: BomLinkTable,
}

impl MasterData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another data set into this one
    pub fn merge(&mut self, other: MasterData) {
        self.items.extend(other.items.chains.into_values().flatten());
        self.suppliers
            .extend(other.suppliers.chains.into_values().flatten());
        self.staff.extend(other.staff.chains.into_values().flatten());
        self.unit_prices
            .extend(other.unit_prices.chains.into_values().flatten());
        self.links.extend(other.links.iter().cloned());
    }

    pub fn item_as_of(&self, item_code: &str, date: NaiveDate) -> Result<Option<&ItemVersion>> {
        self.items.find_valid_as_of(item_code, date)
    }

    pub fn supplier_as_of(
        &self,
        supplier_code: &str,
        date: NaiveDate,
    ) -> Result<Option<&SupplierVersion>> {
        self.suppliers.find_valid_as_of(supplier_code, date)
    }

    pub fn staff_as_of(&self, staff_code: &str, date: NaiveDate) -> Result<Option<&StaffVersion>> {
        self.staff.find_valid_as_of(staff_code, date)
    }

    pub fn unit_price_as_of(
        &self,
        item_code: &str,
        supplier_code: &str,
        date: NaiveDate,
    ) -> Result<Option<&UnitPriceVersion>> {
        self.unit_prices
            .find_valid_as_of(&UnitPriceKey::new(item_code, supplier_code), date)
    }

    /// Every supplier's price for `item_code` valid on `date`, by supplier code
    pub fn unit_prices_for_item_as_of(
        &self,
        item_code: &str,
        date: NaiveDate,
    ) -> Result<Vec<&UnitPriceVersion>> {
        let mut prices = Vec::new();
        for key in self.unit_prices.keys().filter(|k| k.item_code == item_code) {
            if let Some(price) = self.unit_prices.find_valid_as_of(key, date)? {
                prices.push(price);
            }
        }
        Ok(prices)
    }

    /// Total number of stored versions and links
    pub fn record_count(&self) -> usize {
        self.items.version_count()
            + self.suppliers.version_count()
            + self.staff.version_count()
            + self.unit_prices.version_count()
            + self.links.len()
    }
}

impl ItemLookup for MasterData {
    fn item_as_of(&self, item_code: &str, date: NaiveDate) -> Result<Option<ItemVersion>> {
        Ok(MasterData::item_as_of(self, item_code, date)?.cloned())
    }
}
