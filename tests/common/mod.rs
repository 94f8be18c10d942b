//! Shared test helpers for integration tests
//!
//! This module provides common utilities used across all test files.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo;
use assert_cmd::Command;
use tempfile::TempDir;

/// Reference structure plus two-generation master data
///
/// ```text
/// X → n(1) → m(1) → a(1)
///          → b(1)
///          → c(2)
///   → d(1)
/// ```
///
/// Link `X → d` is replaced by `X → e` on 2024-06-01.
pub const MASTER_YAML: &str = r#"
items:
  - item_code: X
    effective_from: 2024-01-01
    effective_to: 2024-06-01
    item_name: Product X
    category: product
  - item_code: X
    effective_from: 2024-06-01
    item_name: Product X rev B
    category: product
  - item_code: n
    effective_from: 2024-01-01
    item_name: Subassembly N
    category: intermediate
  - item_code: c
    effective_from: 2024-01-01
    item_name: Bolt M6
    category: part
    lead_time: 5
    yield_rate: "98.00"
bom_links:
  - { parent_item_code: X, child_item_code: n, effective_from: 2024-01-01, required_quantity: 1, sequence: 1 }
  - { parent_item_code: X, child_item_code: d, effective_from: 2024-01-01, effective_to: 2024-06-01, required_quantity: 1, sequence: 2 }
  - { parent_item_code: X, child_item_code: e, effective_from: 2024-06-01, required_quantity: 3, sequence: 2 }
  - { parent_item_code: n, child_item_code: m, effective_from: 2024-01-01, required_quantity: 1, sequence: 1 }
  - { parent_item_code: n, child_item_code: b, effective_from: 2024-01-01, required_quantity: 1, sequence: 2 }
  - { parent_item_code: n, child_item_code: c, effective_from: 2024-01-01, required_quantity: 2, sequence: 3 }
  - { parent_item_code: m, child_item_code: a, effective_from: 2024-01-01, required_quantity: 1, sequence: 1 }
suppliers:
  - supplier_code: SUP001
    effective_from: 2024-01-01
    supplier_name: Acme Metals
    supplier_type: vendor
  - supplier_code: SUP002
    effective_from: 2024-01-01
    supplier_name: Plating Works
    supplier_type: subcontractor
staff:
  - staff_code: S001
    effective_from: 2024-01-01
    effective_to: 2024-07-01
    staff_name: Taro Yamada
    department_code: D001
  - staff_code: S001
    effective_from: 2024-07-01
    staff_name: Taro Yamada
    department_code: D002
unit_prices:
  - item_code: c
    supplier_code: SUP001
    effective_from: 2024-01-01
    effective_to: 2024-06-01
    price: "1000.00"
    currency_code: JPY
  - item_code: c
    supplier_code: SUP001
    effective_from: 2024-06-01
    price: "1200.00"
    currency_code: JPY
  - item_code: c
    supplier_code: SUP002
    effective_from: 2024-01-01
    price: "1100.00"
"#;

/// Links closing the loop A → B → C → A
pub const CYCLIC_YAML: &str = r#"
bom_links:
  - { parent_item_code: A, child_item_code: B, effective_from: 2024-01-01, required_quantity: 1, sequence: 1 }
  - { parent_item_code: B, child_item_code: C, effective_from: 2024-01-01, required_quantity: 1, sequence: 1 }
  - { parent_item_code: C, child_item_code: A, effective_from: 2024-01-01, required_quantity: 1, sequence: 1 }
"#;

/// Two versions of X → n that both cover March 2024
pub const OVERLAPPING_YAML: &str = r#"
bom_links:
  - { parent_item_code: X, child_item_code: n, effective_from: 2024-01-01, required_quantity: 1, sequence: 1 }
  - { parent_item_code: X, child_item_code: n, effective_from: 2024-02-01, required_quantity: 2, sequence: 1 }
"#;

/// Helper to get a bomx command
pub fn bomx() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("bomx"));
    // Keep the developer's own config and log settings out of the tests
    cmd.env_remove("BOMX_DATA")
        .env_remove("BOMX_DB")
        .env_remove("BOMX_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

/// Write `content` to `name` in a fresh temp directory
pub fn setup_data(name: &str, content: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let path = write_file(tmp.path(), name, content);
    (tmp, path)
}

/// Temp directory holding the reference master data as `master.yaml`
pub fn setup_master() -> (TempDir, PathBuf) {
    setup_data("master.yaml", MASTER_YAML)
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}
