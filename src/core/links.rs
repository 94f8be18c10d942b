//! In-memory BOM link table
//!
//! Holds a bulk-prefetched copy of the link table indexed by parent item,
//! which makes it the cheapest [`BomLinkSource`] for deep structures. Also
//! answers the reverse "where used" inquiry.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::core::error::Result;
use crate::core::explosion::BomLinkSource;
use crate::core::temporal::{check_chain, resolve_unique_as_of, ChainIssue};
use crate::entities::{BomLink, BomLinkKey};

/// BOM links indexed by parent item code
#[derive(Debug, Clone, Default)]
pub struct BomLinkTable {
    by_parent: BTreeMap<String, Vec<BomLink>>,
    len: usize,
}

impl BomLinkTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from an unordered collection of links
    pub fn from_links(links: impl IntoIterator<Item = BomLink>) -> Self {
        let mut table = Self::new();
        table.extend(links);
        table
    }

    /// Add one link (any version)
    pub fn insert(&mut self, link: BomLink) {
        self.by_parent
            .entry(link.parent_item_code.clone())
            .or_default()
            .push(link);
        self.len += 1;
    }

    pub fn extend(&mut self, links: impl IntoIterator<Item = BomLink>) {
        for link in links {
            self.insert(link);
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Every link, ordered by parent item code then insertion order
    pub fn iter(&self) -> impl Iterator<Item = &BomLink> {
        self.by_parent.values().flatten()
    }

    /// Item codes that have at least one link as parent, in order
    pub fn parents(&self) -> impl Iterator<Item = &str> {
        self.by_parent.keys().map(String::as_str)
    }

    /// Every link naming `child_item_code` as child, regardless of dates
    pub fn links_for_child(&self, child_item_code: &str) -> Vec<&BomLink> {
        self.iter()
            .filter(|link| link.child_item_code == child_item_code)
            .collect()
    }

    /// Single-level where-used: the links consuming `child_item_code` valid on `as_of`
    ///
    /// Each (parent, child) chain must resolve to at most one link. The result
    /// is ordered by parent item code, then sequence.
    pub fn where_used(&self, child_item_code: &str, as_of: NaiveDate) -> Result<Vec<BomLink>> {
        let mut used = Vec::new();
        for (parent, links) in &self.by_parent {
            let chain = links
                .iter()
                .filter(|link| link.child_item_code == child_item_code);
            let key = format!("{} → {}", parent, child_item_code);
            if let Some(link) = resolve_unique_as_of(chain, as_of, "BOM link", &key)? {
                used.push(link.clone());
            }
        }
        used.sort_by(|a, b| {
            a.parent_item_code
                .cmp(&b.parent_item_code)
                .then_with(|| a.sequence.cmp(&b.sequence))
        });
        Ok(used)
    }

    /// Check every (parent, child) chain for empty intervals and overlaps
    pub fn check(&self) -> Vec<(BomLinkKey, ChainIssue)> {
        let mut chains: BTreeMap<BomLinkKey, Vec<BomLink>> = BTreeMap::new();
        for link in self.iter() {
            chains
                .entry(BomLinkKey {
                    parent: link.parent_item_code.clone(),
                    child: link.child_item_code.clone(),
                })
                .or_default()
                .push(link.clone());
        }

        chains
            .into_iter()
            .flat_map(|(key, chain)| {
                check_chain(&chain)
                    .into_iter()
                    .map(move |issue| (key.clone(), issue))
            })
            .collect()
    }
}

impl FromIterator<BomLink> for BomLinkTable {
    fn from_iter<I: IntoIterator<Item = BomLink>>(iter: I) -> Self {
        Self::from_links(iter)
    }
}

impl BomLinkSource for BomLinkTable {
    fn links_for_parent(&self, item_code: &str) -> Result<Vec<BomLink>> {
        Ok(self.by_parent.get(item_code).cloned().unwrap_or_default())
    }
}
