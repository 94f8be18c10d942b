//! SQLite-backed master data store
//!
//! Persists the effective-dated master tables and serves BOM links one
//! parent at a time, so an explosion only reads the rows it walks. For deep
//! structures [`LinkStore::prefetch`] loads the whole link table into a
//! [`BomLinkTable`] with a single query.

mod serialize;


use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use tracing::{debug, trace};

use crate::core::catalog::{ItemLookup, MasterData};
use crate::core::entity::MasterRecord;
use crate::core::error::Result;
use crate::core::explosion::BomLinkSource;
use crate::core::links::BomLinkTable;
use crate::core::temporal::resolve_unique_as_of;
use crate::entities::{BomLink, ItemVersion, StaffVersion, SupplierVersion, UnitPriceVersion};

use serialize::{decimal_at, optional_decimal_at};

/// Current store schema version
pub const SCHEMA_VERSION: i32 = 1;

const LINK_COLUMNS: &str = "parent_item_code, child_item_code, effective_from, effective_to, \
                            required_quantity, sequence";

const ITEM_COLUMNS: &str =
    "item_code, effective_from, effective_to, item_name, category, lead_time, yield_rate";

/// Row counts of a store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub schema_version: i32,
    pub items: usize,
    pub bom_links: usize,
    pub suppliers: usize,
    pub staff: usize,
    pub unit_prices: usize,
    pub db_size_bytes: u64,
}

impl StoreStats {
    pub fn total_rows(&self) -> usize {
        self.items + self.bom_links + self.suppliers + self.staff + self.unit_prices
    }
}

/// Master data store over a SQLite database
pub struct LinkStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl LinkStore {
    /// Open or create a store at `path`
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        let store = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        store.init_schema()?;
        debug!(path = %path.display(), "opened link store");
        Ok(store)
    }

    /// Open a private in-memory store
    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
            path: None,
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Database file path, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            CREATE TABLE IF NOT EXISTS items (
                item_code TEXT NOT NULL,
                effective_from TEXT NOT NULL,
                effective_to TEXT,
                item_name TEXT NOT NULL,
                category TEXT NOT NULL,
                lead_time INTEGER,
                yield_rate TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_items_code ON items(item_code, effective_from);

            CREATE TABLE IF NOT EXISTS bom_links (
                parent_item_code TEXT NOT NULL,
                child_item_code TEXT NOT NULL,
                effective_from TEXT NOT NULL,
                effective_to TEXT,
                required_quantity TEXT NOT NULL,
                sequence INTEGER NOT NULL DEFAULT 0
            );
            CREATE INDEX IF NOT EXISTS idx_bom_links_parent ON bom_links(parent_item_code);
            CREATE INDEX IF NOT EXISTS idx_bom_links_child ON bom_links(child_item_code);

            CREATE TABLE IF NOT EXISTS suppliers (
                supplier_code TEXT NOT NULL,
                effective_from TEXT NOT NULL,
                effective_to TEXT,
                supplier_name TEXT NOT NULL,
                supplier_type TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_suppliers_code ON suppliers(supplier_code);

            CREATE TABLE IF NOT EXISTS staff (
                staff_code TEXT NOT NULL,
                effective_from TEXT NOT NULL,
                effective_to TEXT,
                staff_name TEXT NOT NULL,
                department_code TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_staff_code ON staff(staff_code);

            CREATE TABLE IF NOT EXISTS unit_prices (
                item_code TEXT NOT NULL,
                supplier_code TEXT NOT NULL,
                effective_from TEXT NOT NULL,
                effective_to TEXT,
                price TEXT NOT NULL,
                currency_code TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_unit_prices_key ON unit_prices(item_code, supplier_code);
            "#,
        )?;
        self.conn.execute(
            "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;
        Ok(())
    }

    /// Replace every table with the contents of `data` in one transaction
    ///
    /// Returns the number of rows written.
    pub fn replace_all(&mut self, data: &MasterData) -> Result<usize> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(
            "DELETE FROM items; DELETE FROM bom_links; DELETE FROM suppliers; \
             DELETE FROM staff; DELETE FROM unit_prices;",
        )?;

        let mut written = 0;
        for (_, chain) in data.items.chains() {
            for item in chain {
                insert_item(&tx, item)?;
                written += 1;
            }
        }
        for link in data.links.iter() {
            insert_link(&tx, link)?;
            written += 1;
        }
        for (_, chain) in data.suppliers.chains() {
            for supplier in chain {
                tx.execute(
                    "INSERT INTO suppliers (supplier_code, effective_from, effective_to, \
                     supplier_name, supplier_type) VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        supplier.supplier_code,
                        supplier.effective_from,
                        supplier.effective_to,
                        supplier.supplier_name,
                        supplier.supplier_type,
                    ],
                )?;
                written += 1;
            }
        }
        for (_, chain) in data.staff.chains() {
            for staff in chain {
                tx.execute(
                    "INSERT INTO staff (staff_code, effective_from, effective_to, staff_name, \
                     department_code) VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        staff.staff_code,
                        staff.effective_from,
                        staff.effective_to,
                        staff.staff_name,
                        staff.department_code,
                    ],
                )?;
                written += 1;
            }
        }
        for (_, chain) in data.unit_prices.chains() {
            for price in chain {
                tx.execute(
                    "INSERT INTO unit_prices (item_code, supplier_code, effective_from, \
                     effective_to, price, currency_code) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        price.item_code,
                        price.supplier_code,
                        price.effective_from,
                        price.effective_to,
                        price.price.to_string(),
                        price.currency_code,
                    ],
                )?;
                written += 1;
            }
        }

        tx.commit()?;
        debug!(rows = written, "replaced store contents");
        Ok(written)
    }

    /// Add one BOM link version
    pub fn insert_link(&self, link: &BomLink) -> Result<()> {
        insert_link(&self.conn, link)?;
        Ok(())
    }

    /// Add one item version
    pub fn insert_item(&self, item: &ItemVersion) -> Result<()> {
        insert_item(&self.conn, item)?;
        Ok(())
    }

    /// Every link naming `child_item_code` as child, regardless of dates
    pub fn links_for_child(&self, child_item_code: &str) -> Result<Vec<BomLink>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {LINK_COLUMNS} FROM bom_links WHERE child_item_code = ?1 \
             ORDER BY parent_item_code, sequence, effective_from"
        ))?;
        let rows = stmt.query_map(params![child_item_code], link_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// The version chain of one item, oldest first
    pub fn item_versions(&self, item_code: &str) -> Result<Vec<ItemVersion>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE item_code = ?1 ORDER BY effective_from"
        ))?;
        let rows = stmt.query_map(params![item_code], item_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Load the whole link table into memory
    pub fn prefetch(&self) -> Result<BomLinkTable> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {LINK_COLUMNS} FROM bom_links ORDER BY parent_item_code, sequence, effective_from"
        ))?;
        let table = stmt
            .query_map([], link_from_row)?
            .collect::<rusqlite::Result<BomLinkTable>>()?;
        debug!(links = table.len(), "prefetched link table");
        Ok(table)
    }

    /// Load every table into an in-memory [`MasterData`]
    pub fn load_master_data(&self) -> Result<MasterData> {
        let mut data = MasterData::new();
        data.links = self.prefetch()?;

        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {ITEM_COLUMNS} FROM items"))?;
        for item in stmt.query_map([], item_from_row)? {
            data.items.insert(item?);
        }

        let mut stmt = self.conn.prepare(
            "SELECT supplier_code, effective_from, effective_to, supplier_name, supplier_type \
             FROM suppliers",
        )?;
        let suppliers = stmt.query_map([], |row| {
            Ok(SupplierVersion {
                supplier_code: row.get(0)?,
                effective_from: row.get(1)?,
                effective_to: row.get(2)?,
                supplier_name: row.get(3)?,
                supplier_type: row.get(4)?,
            })
        })?;
        for supplier in suppliers {
            data.suppliers.insert(supplier?);
        }

        let mut stmt = self.conn.prepare(
            "SELECT staff_code, effective_from, effective_to, staff_name, department_code \
             FROM staff",
        )?;
        let staff = stmt.query_map([], |row| {
            Ok(StaffVersion {
                staff_code: row.get(0)?,
                effective_from: row.get(1)?,
                effective_to: row.get(2)?,
                staff_name: row.get(3)?,
                department_code: row.get(4)?,
            })
        })?;
        for member in staff {
            data.staff.insert(member?);
        }

        let mut stmt = self.conn.prepare(
            "SELECT item_code, supplier_code, effective_from, effective_to, price, currency_code \
             FROM unit_prices",
        )?;
        let prices = stmt.query_map([], |row| {
            Ok(UnitPriceVersion {
                item_code: row.get(0)?,
                supplier_code: row.get(1)?,
                effective_from: row.get(2)?,
                effective_to: row.get(3)?,
                price: decimal_at(row, 4)?,
                currency_code: row.get(5)?,
            })
        })?;
        for price in prices {
            data.unit_prices.insert(price?);
        }

        Ok(data)
    }

    /// Row counts per table
    pub fn statistics(&self) -> Result<StoreStats> {
        let count = |table: &str| -> Result<usize> {
            let n: usize = self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
            Ok(n)
        };

        let schema_version: i32 = self.conn.query_row(
            "SELECT MAX(version) FROM schema_version",
            [],
            |row| row.get(0),
        )?;
        let db_size_bytes = self
            .path
            .as_ref()
            .and_then(|p| fs::metadata(p).ok())
            .map(|m| m.len())
            .unwrap_or(0);

        Ok(StoreStats {
            schema_version,
            items: count("items")?,
            bom_links: count("bom_links")?,
            suppliers: count("suppliers")?,
            staff: count("staff")?,
            unit_prices: count("unit_prices")?,
            db_size_bytes,
        })
    }
}

impl BomLinkSource for LinkStore {
    fn links_for_parent(&self, item_code: &str) -> Result<Vec<BomLink>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {LINK_COLUMNS} FROM bom_links WHERE parent_item_code = ?1"
        ))?;
        let links = stmt
            .query_map(params![item_code], link_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        trace!(parent = item_code, links = links.len(), "fetched links");
        Ok(links)
    }
}

impl ItemLookup for LinkStore {
    fn item_as_of(&self, item_code: &str, date: NaiveDate) -> Result<Option<ItemVersion>> {
        let versions = self.item_versions(item_code)?;
        Ok(resolve_unique_as_of(&versions, date, ItemVersion::KIND, item_code)?.cloned())
    }
}

fn insert_link(conn: &Connection, link: &BomLink) -> rusqlite::Result<usize> {
    conn.execute(
        &format!("INSERT INTO bom_links ({LINK_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
        params![
            link.parent_item_code,
            link.child_item_code,
            link.effective_from,
            link.effective_to,
            link.required_quantity.to_string(),
            link.sequence,
        ],
    )
}

fn insert_item(conn: &Connection, item: &ItemVersion) -> rusqlite::Result<usize> {
    conn.execute(
        &format!("INSERT INTO items ({ITEM_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
        params![
            item.item_code,
            item.effective_from,
            item.effective_to,
            item.item_name,
            item.category,
            item.lead_time,
            item.yield_rate.map(|r| r.to_string()),
        ],
    )
}

fn link_from_row(row: &Row<'_>) -> rusqlite::Result<BomLink> {
    Ok(BomLink {
        parent_item_code: row.get(0)?,
        child_item_code: row.get(1)?,
        effective_from: row.get(2)?,
        effective_to: row.get(3)?,
        required_quantity: decimal_at(row, 4)?,
        sequence: row.get(5)?,
    })
}

fn item_from_row(row: &Row<'_>) -> rusqlite::Result<ItemVersion> {
    Ok(ItemVersion {
        item_code: row.get(0)?,
        effective_from: row.get(1)?,
        effective_to: row.get(2)?,
        item_name: row.get(3)?,
        category: row.get(4)?,
        lead_time: row.get(5)?,
        yield_rate: optional_decimal_at(row, 6)?,
    })
}
