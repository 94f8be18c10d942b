//! End-to-end CLI tests

mod common;

use common::{bomx, setup_data, setup_master, write_file, CYCLIC_YAML, OVERLAPPING_YAML};
use predicates::prelude::*;

// ============================================================================
// General
// ============================================================================

#[test]
fn test_help_lists_commands() {
    bomx()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("explode"))
        .stdout(predicate::str::contains("where-used"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn test_missing_data_source_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    bomx()
        .current_dir(tmp.path())
        .args(["explode", "X"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No master data source"));
}

#[test]
fn test_completions_bash() {
    bomx()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bomx"));
}

// ============================================================================
// Explode
// ============================================================================

#[test]
fn test_explode_tsv_output() {
    let (_tmp, path) = setup_master();
    let output = bomx()
        .arg("--data")
        .arg(&path)
        .args(["explode", "X", "--qty", "10", "--as-of", "2024-03-01"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "LEVEL\tPARENT\tCHILD\tNAME\tUNIT QTY\tTOTAL QTY\tSEQ");
    assert_eq!(lines.len(), 7);
    assert_eq!(lines[1], "1\tX\tn\tSubassembly N\t1\t10\t1");
    assert_eq!(lines[2], "1\tX\td\t\t1\t10\t2");
    assert_eq!(lines[5], "2\tn\tc\tBolt M6\t2\t20\t3");
    assert_eq!(lines[6], "3\tm\ta\t\t1\t10\t1");
}

#[test]
fn test_explode_json_output() {
    let (_tmp, path) = setup_master();
    let output = bomx()
        .arg("--data")
        .arg(&path)
        .args(["--format", "json", "explode", "X", "--qty", "10", "--as-of", "2024-03-01"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0]["child_item_code"], "n");
    assert_eq!(rows[0]["level"], 1);
    assert_eq!(rows[0]["item_name"], "Subassembly N");
    assert_eq!(rows[4]["total_quantity"], "20");
}

#[test]
fn test_explode_after_structure_change() {
    let (_tmp, path) = setup_master();
    bomx()
        .arg("--data")
        .arg(&path)
        .args(["explode", "X", "--as-of", "2024-06-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\te\t"))
        .stdout(predicate::str::contains("\td\t").not());
}

#[test]
fn test_explode_aggregate() {
    let (_tmp, path) = setup_master();
    bomx()
        .arg("--data")
        .arg(&path)
        .args(["explode", "X", "--qty", "10", "--as-of", "2024-03-01", "--aggregate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ITEM\tNAME\tTOTAL QTY\tPATHS\tLLC"))
        .stdout(predicate::str::contains("c\tBolt M6\t20\t1\t2"));
}

#[test]
fn test_explode_table_indents_levels() {
    let (_tmp, path) = setup_master();
    bomx()
        .arg("--data")
        .arg(&path)
        .args(["-f", "table", "explode", "X", "--as-of", "2024-03-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("    a"));
}

#[test]
fn test_explode_rejects_zero_quantity() {
    let (_tmp, path) = setup_master();
    bomx()
        .arg("--data")
        .arg(&path)
        .args(["explode", "X", "--qty", "0", "--as-of", "2024-03-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid explosion quantity"));
}

#[test]
fn test_explode_cycle_fails() {
    let (_tmp, path) = setup_data("cyclic.yaml", CYCLIC_YAML);
    bomx()
        .arg("--data")
        .arg(&path)
        .args(["explode", "A", "--as-of", "2024-03-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cyclic BOM"));
}

#[test]
fn test_explode_ambiguous_links_fail() {
    let (_tmp, path) = setup_data("overlap.yaml", OVERLAPPING_YAML);
    bomx()
        .arg("--data")
        .arg(&path)
        .args(["explode", "X", "--as-of", "2024-03-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Ambiguous BOM link versions"));
}

#[test]
fn test_explode_uses_config_file() {
    let (tmp, _path) = setup_master();
    write_file(tmp.path(), "bomx.yaml", "data: master.yaml\ndefault_quantity: 10\n");
    bomx()
        .current_dir(tmp.path())
        .args(["explode", "X", "--as-of", "2024-03-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2\tn\tc\tBolt M6\t2\t20\t3"));
}

#[test]
fn test_explode_prefetch_ignored_for_files() {
    let (_tmp, path) = setup_master();
    bomx()
        .arg("--data")
        .arg(&path)
        .args(["explode", "X", "--as-of", "2024-03-01", "--prefetch"])
        .assert()
        .success()
        .stderr(predicate::str::contains("--prefetch only applies to a SQLite store"))
        .stdout(predicate::str::contains("\tn\tc\t"));
}

#[test]
fn test_explode_long_decimal_is_exact() {
    let (_tmp, path) = setup_data(
        "exact.yaml",
        r#"
bom_links:
  - { parent_item_code: P, child_item_code: q, effective_from: 2024-01-01, required_quantity: "0.333333333333333333", sequence: 1 }
"#,
    );
    bomx()
        .arg("--data")
        .arg(&path)
        .args(["explode", "P", "--qty", "3", "--as-of", "2024-03-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.333333333333333333\t0.999999999999999999"));
}

#[test]
fn test_unquoted_fractional_quantity_rejected() {
    let (_tmp, path) = setup_data(
        "float.yaml",
        r#"
bom_links:
  - { parent_item_code: P, child_item_code: q, effective_from: 2024-01-01, required_quantity: 0.333333333333333333, sequence: 1 }
"#,
    );
    bomx()
        .arg("--data")
        .arg(&path)
        .args(["explode", "P", "--as-of", "2024-03-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("quoted"));
}

#[test]
fn test_csv_link_file() {
    let (_tmp, path) = setup_data(
        "links.csv",
        "parent_item_code,child_item_code,effective_from,effective_to,required_quantity,sequence\n\
         P,q,2024-01-01,,0.5,1\n\
         q,r,2024-01-01,,4,1\n",
    );
    bomx()
        .arg("--data")
        .arg(&path)
        .args(["explode", "P", "--qty", "3", "--as-of", "2024-03-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2\tq\tr\t\t4\t6\t1"));
}

// ============================================================================
// Single-level BOM, where-used and lookup
// ============================================================================

#[test]
fn test_bom_single_level() {
    let (_tmp, path) = setup_master();
    let output = bomx()
        .arg("--data")
        .arg(&path)
        .args(["bom", "X", "--as-of", "2024-03-01"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "SEQ\tCHILD\tNAME\tQTY\tVALID");
    assert_eq!(lines[1], "1\tn\tSubassembly N\t1\t[2024-01-01, open)");
    assert_eq!(lines[2], "2\td\t\t1\t[2024-01-01, 2024-06-01)");
    // Only direct children
    assert_eq!(lines.len(), 3);
}

#[test]
fn test_bom_after_structure_change() {
    let (_tmp, path) = setup_master();
    bomx()
        .arg("--data")
        .arg(&path)
        .args(["bom", "X", "--as-of", "2024-06-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2\te\t\t3\t[2024-06-01, open)"))
        .stdout(predicate::str::contains("\td\t").not());

    // The day before, the old link still holds
    bomx()
        .arg("--data")
        .arg(&path)
        .args(["bom", "X", "--as-of", "2024-05-31"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\td\t"))
        .stdout(predicate::str::contains("\te\t").not());
}

#[test]
fn test_bom_leaf_item_is_empty() {
    let (_tmp, path) = setup_master();
    bomx()
        .arg("--data")
        .arg(&path)
        .args(["bom", "c", "--as-of", "2024-03-01"])
        .assert()
        .success()
        .stderr(predicate::str::contains("has no components"));
}

#[test]
fn test_bom_ambiguous_links_fail() {
    let (_tmp, path) = setup_data("overlap.yaml", OVERLAPPING_YAML);
    bomx()
        .arg("--data")
        .arg(&path)
        .args(["bom", "X", "--as-of", "2024-03-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Ambiguous BOM link versions"));
}

#[test]
fn test_where_used() {
    let (_tmp, path) = setup_master();
    bomx()
        .arg("--data")
        .arg(&path)
        .args(["where-used", "c", "--as-of", "2024-03-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("n\tSubassembly N\t2\t3\t[2024-01-01, open)"));
}

#[test]
fn test_lookup_item_generations() {
    let (_tmp, path) = setup_master();
    bomx()
        .arg("--data")
        .arg(&path)
        .args(["lookup", "item", "X", "--as-of", "2024-03-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("item_name: Product X\n"));

    bomx()
        .arg("--data")
        .arg(&path)
        .args(["lookup", "item", "X", "--as-of", "2024-06-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Product X rev B"));
}

#[test]
fn test_lookup_item_not_found_before_first_version() {
    let (_tmp, path) = setup_master();
    bomx()
        .arg("--data")
        .arg(&path)
        .args(["lookup", "item", "X", "--as-of", "2023-12-31"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No item X valid as of 2023-12-31"));
}

#[test]
fn test_lookup_item_history() {
    let (_tmp, path) = setup_master();
    bomx()
        .arg("--data")
        .arg(&path)
        .args(["lookup", "item", "X", "--history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("X\t[2024-01-01, 2024-06-01)\tProduct X (product)"))
        .stdout(predicate::str::contains("X\t[2024-06-01, open)\tProduct X rev B (product)"));
}

#[test]
fn test_lookup_staff_department_changes() {
    let (_tmp, path) = setup_master();
    bomx()
        .arg("--data")
        .arg(&path)
        .args(["lookup", "staff", "S001", "--as-of", "2024-08-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("department_code: D002"));
}

#[test]
fn test_lookup_price_for_supplier() {
    let (_tmp, path) = setup_master();
    bomx()
        .arg("--data")
        .arg(&path)
        .args(["-f", "json", "lookup", "price", "c", "SUP001", "--as-of", "2024-03-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"1000.00\""));
}

#[test]
fn test_lookup_price_all_suppliers() {
    let (_tmp, path) = setup_master();
    bomx()
        .arg("--data")
        .arg(&path)
        .args(["lookup", "price", "c", "--as-of", "2024-07-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("c/SUP001\t[2024-06-01, open)\t1200.00 JPY"))
        .stdout(predicate::str::contains("c/SUP002\t[2024-01-01, open)\t1100.00 JPY"));
}

// ============================================================================
// Validate
// ============================================================================

#[test]
fn test_validate_clean_data() {
    let (_tmp, path) = setup_master();
    bomx()
        .arg("--data")
        .arg(&path)
        .args(["validate", "--as-of", "2024-03-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Master data is consistent"));
}

#[test]
fn test_validate_reports_overlap() {
    let (_tmp, path) = setup_data("overlap.yaml", OVERLAPPING_YAML);
    bomx()
        .arg("--data")
        .arg(&path)
        .args(["validate", "--as-of", "2024-03-01"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("BOM link X → n"))
        .stderr(predicate::str::contains("Validation failed"));
}

#[test]
fn test_validate_reports_cycle() {
    let (_tmp, path) = setup_data("cyclic.yaml", CYCLIC_YAML);
    bomx()
        .arg("--data")
        .arg(&path)
        .args(["validate", "--as-of", "2024-03-01"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Cyclic BOM"));
}

// ============================================================================
// Import and store-backed commands
// ============================================================================

#[test]
fn test_import_then_explode_from_store() {
    let (tmp, path) = setup_master();
    let db = tmp.path().join("store/master.db");

    bomx()
        .arg("--db")
        .arg(&db)
        .arg("import")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 18 record(s)"))
        .stdout(predicate::str::contains("18 row(s) stored, schema v1"));

    for prefetch in [false, true] {
        let mut cmd = bomx();
        cmd.arg("--db")
            .arg(&db)
            .args(["explode", "X", "--qty", "10", "--as-of", "2024-03-01"]);
        if prefetch {
            cmd.arg("--prefetch");
        }
        cmd.assert()
            .success()
            .stdout(predicate::str::contains("2\tn\tc\tBolt M6\t2\t20\t3"));
    }

    bomx()
        .arg("--db")
        .arg(&db)
        .args(["bom", "X", "--as-of", "2024-07-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1\tn\tSubassembly N\t1\t[2024-01-01, open)"))
        .stdout(predicate::str::contains("2\te\t\t3\t[2024-06-01, open)"));

    bomx()
        .arg("--db")
        .arg(&db)
        .args(["where-used", "a", "--as-of", "2024-03-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("m\t\t1\t1\t[2024-01-01, open)"));
}

#[test]
fn test_import_requires_target() {
    let (tmp, path) = setup_master();
    bomx()
        .current_dir(tmp.path())
        .arg("import")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No target store"));
}

#[test]
fn test_import_rejects_non_positive_quantity() {
    let (tmp, path) = setup_data(
        "bad.csv",
        "parent_item_code,child_item_code,effective_from,effective_to,required_quantity,sequence\n\
         P,q,2024-01-01,,0,1\n",
    );
    bomx()
        .arg("--db")
        .arg(tmp.path().join("master.db"))
        .arg("import")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid row 2"));
}
