//! BOM explosion engine
//!
//! Expands a root item into every descendant component valid on an as-of
//! date. Each emitted record describes one edge of the explosion tree, and
//! its `total_quantity` is the root quantity multiplied by every
//! `required_quantity` on the path from the root down to that edge. A child
//! reached through two different parents yields two records; summing per
//! item is left to [`aggregate_requirements`].
//!
//! The walk uses an explicit stack, so deep structures cannot overflow the
//! call stack, and keeps the active root-to-node path in a flag vector
//! indexed by interned item, so re-entering an item already being expanded
//! is detected in O(1) and reported as [`BomError::CyclicBom`].

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::core::error::{BomError, Result};
use crate::core::temporal::resolve_unique_as_of;
use crate::entities::BomLink;

/// Supplier of raw BOM links
///
/// Implementations return every link of the parent regardless of validity
/// dates; date filtering is the engine's job. A source may prefetch the
/// whole table or query lazily per call.
pub trait BomLinkSource {
    /// All links whose parent is `item_code`
    fn links_for_parent(&self, item_code: &str) -> Result<Vec<BomLink>>;
}

impl<T: BomLinkSource + ?Sized> BomLinkSource for &T {
    fn links_for_parent(&self, item_code: &str) -> Result<Vec<BomLink>> {
        (**self).links_for_parent(item_code)
    }
}

/// One row of an explosion result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplosionRecord {
    /// Depth of the child (1 = direct child of the root)
    pub level: u32,
    pub parent_item_code: String,
    pub child_item_code: String,
    /// The link's required quantity per unit of parent
    pub unit_quantity: Decimal,
    /// Root quantity times every required quantity along the path
    pub total_quantity: Decimal,
    /// The link's sibling order
    pub sequence: i32,
}

/// Resolve the children of `parent` valid on `as_of`
///
/// Links are grouped per child; each group is one version chain and must
/// resolve to at most one link. The result is ordered by sequence, then by
/// child item code.
pub fn children_as_of(parent: &str, links: &[BomLink], as_of: NaiveDate) -> Result<Vec<BomLink>> {
    let mut chains: BTreeMap<&str, Vec<&BomLink>> = BTreeMap::new();
    for link in links {
        chains
            .entry(link.child_item_code.as_str())
            .or_default()
            .push(link);
    }

    let mut children = Vec::new();
    for (child, chain) in chains {
        let key = format!("{} → {}", parent, child);
        if let Some(link) = resolve_unique_as_of(chain, as_of, "BOM link", &key)? {
            if !link.has_valid_quantity() {
                return Err(BomError::InvalidLinkQuantity {
                    parent: parent.to_string(),
                    child: child.to_string(),
                    quantity: link.required_quantity,
                });
            }
            children.push(link.clone());
        }
    }

    children.sort_by(|a, b| {
        a.sequence
            .cmp(&b.sequence)
            .then_with(|| a.child_item_code.cmp(&b.child_item_code))
    });
    Ok(children)
}

/// Explodes BOMs read from a [`BomLinkSource`]
#[derive(Debug, Clone)]
pub struct ExplosionEngine<S> {
    source: S,
}

impl<S: BomLinkSource> ExplosionEngine<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Explode `root_item_code` for `root_quantity` units as of `as_of`
    ///
    /// The root item does not need an item master record; only its links
    /// matter. A root without valid links yields an empty list.
    ///
    /// Records are ordered by level, then sequence, then child item code.
    /// Identical inputs always produce identical output.
    #[instrument(skip_all, fields(root = %root_item_code, quantity = %root_quantity, as_of = %as_of))]
    pub fn explode(
        &self,
        root_item_code: &str,
        root_quantity: Decimal,
        as_of: NaiveDate,
    ) -> Result<Vec<ExplosionRecord>> {
        if root_quantity <= Decimal::ZERO {
            return Err(BomError::InvalidQuantity {
                quantity: root_quantity,
            });
        }

        let mut walk = Walk::default();
        let root_item = walk.intern(root_item_code);
        let root = walk.push_node(root_item, root_quantity, 0, None);

        let mut records = Vec::new();
        let mut stack = vec![Step::Enter(root)];
        let mut max_level = 0;

        while let Some(step) = stack.pop() {
            let node_index = match step {
                Step::Leave(item) => {
                    walk.active[item] = false;
                    continue;
                }
                Step::Enter(node_index) => node_index,
            };

            let Node {
                item,
                quantity,
                level,
                ..
            } = walk.nodes[node_index];
            walk.active[item] = true;
            stack.push(Step::Leave(item));

            let parent_code = walk.codes[item].clone();
            trace!(item = %parent_code, level, %quantity, "expanding");
            let links = self.source.links_for_parent(&parent_code)?;
            let children = children_as_of(&parent_code, &links, as_of)?;

            let mut next = Vec::with_capacity(children.len());
            for link in children {
                let child = walk.intern(&link.child_item_code);
                if walk.active[child] {
                    return Err(BomError::CyclicBom {
                        parent: parent_code,
                        child: link.child_item_code,
                        path: walk.cycle_path(node_index, child),
                    });
                }

                let total = quantity.checked_mul(link.required_quantity).ok_or_else(|| {
                    BomError::QuantityOverflow {
                        parent: parent_code.clone(),
                        child: link.child_item_code.clone(),
                    }
                })?;

                max_level = max_level.max(level + 1);
                next.push(walk.push_node(child, total, level + 1, Some(node_index)));
                records.push(ExplosionRecord {
                    level: level + 1,
                    parent_item_code: parent_code.clone(),
                    child_item_code: link.child_item_code,
                    unit_quantity: link.required_quantity,
                    total_quantity: total,
                    sequence: link.sequence,
                });
            }

            // Reversed so the first sibling is expanded first
            stack.extend(next.into_iter().rev().map(Step::Enter));
        }

        // Stable: records tied on all three keys keep traversal order
        records.sort_by(|a, b| {
            a.level
                .cmp(&b.level)
                .then_with(|| a.sequence.cmp(&b.sequence))
                .then_with(|| a.child_item_code.cmp(&b.child_item_code))
        });

        debug!(records = records.len(), depth = max_level, "explosion complete");
        Ok(records)
    }
}

enum Step {
    Enter(usize),
    Leave(usize),
}

#[derive(Clone, Copy)]
struct Node {
    item: usize,
    quantity: Decimal,
    level: u32,
    parent: Option<usize>,
}

/// Arena for one explosion call
#[derive(Default)]
struct Walk {
    codes: Vec<String>,
    index: HashMap<String, usize>,
    /// Indexed by interned item: currently on the root-to-node path
    active: Vec<bool>,
    nodes: Vec<Node>,
}

impl Walk {
    fn intern(&mut self, code: &str) -> usize {
        if let Some(&i) = self.index.get(code) {
            return i;
        }
        let i = self.codes.len();
        self.codes.push(code.to_string());
        self.index.insert(code.to_string(), i);
        self.active.push(false);
        i
    }

    fn push_node(&mut self, item: usize, quantity: Decimal, level: u32, parent: Option<usize>) -> usize {
        self.nodes.push(Node {
            item,
            quantity,
            level,
            parent,
        });
        self.nodes.len() - 1
    }

    /// The loop from the first occurrence of `reentered` down to `node`, closed by `reentered`
    fn cycle_path(&self, node: usize, reentered: usize) -> Vec<String> {
        let mut ancestors = Vec::new();
        let mut cursor = Some(node);
        while let Some(i) = cursor {
            ancestors.push(self.nodes[i].item);
            cursor = self.nodes[i].parent;
        }
        ancestors.reverse();

        let start = ancestors
            .iter()
            .position(|&item| item == reentered)
            .unwrap_or(0);
        ancestors[start..]
            .iter()
            .chain(std::iter::once(&reentered))
            .map(|&item| self.codes[item].clone())
            .collect()
    }
}

/// Total consumption of one item across an explosion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRequirement {
    pub item_code: String,
    /// Sum of `total_quantity` over every record of the item
    pub total_quantity: Decimal,
    /// Number of records (paths) the item appears on
    pub occurrences: usize,
    /// Deepest level the item appears at (MRP low-level code)
    pub low_level_code: u32,
}

/// Sum explosion records per child item, ordered by item code
///
/// This is a caller-side post-processing step; the explosion itself never
/// merges paths.
pub fn aggregate_requirements(records: &[ExplosionRecord]) -> Vec<ItemRequirement> {
    let mut by_item: BTreeMap<&str, ItemRequirement> = BTreeMap::new();
    for record in records {
        let entry = by_item
            .entry(record.child_item_code.as_str())
            .or_insert_with(|| ItemRequirement {
                item_code: record.child_item_code.clone(),
                total_quantity: Decimal::ZERO,
                occurrences: 0,
                low_level_code: 0,
            });
        entry.total_quantity += record.total_quantity;
        entry.occurrences += 1;
        entry.low_level_code = entry.low_level_code.max(record.level);
    }
    by_item.into_values().collect()
}
