//! Integration tests for the baskit CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get a baskit command isolated from the user's config
fn baskit(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("baskit").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("BASKIT_AUTHOR")
        .env_remove("BASKIT_CURRENCY")
        .env_remove("BASKIT_COUNTRY_CODE")
        .env_remove("BASKIT_LOG");
    cmd
}

/// Helper to create a test project in a temp directory
fn setup_test_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    baskit(&tmp).current_dir(tmp.path()).arg("init").assert().success();
    tmp
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    String::from_utf8(output.stdout).unwrap()
}

fn yaml_files(dir: &std::path::Path) -> Vec<std::path::PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|e| e == "yaml"))
        .collect()
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    let tmp = TempDir::new().unwrap();
    baskit(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("procurement"))
        .stdout(predicate::str::contains("match"));
}

#[test]
fn test_version_displays() {
    let tmp = TempDir::new().unwrap();
    baskit(&tmp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("baskit"));
}

#[test]
fn test_completions_generate() {
    let tmp = TempDir::new().unwrap();
    baskit(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("baskit"));
}

// ============================================================================
// Init Tests
// ============================================================================

#[test]
fn test_init_creates_project_structure() {
    let tmp = setup_test_project();
    assert!(tmp.path().join(".baskit/config.yaml").is_file());
    assert!(tmp.path().join(".baskit/catalog.yaml").is_file());
    assert!(tmp.path().join("orders").is_dir());
    assert!(tmp.path().join("receipts").is_dir());
}

#[test]
fn test_init_twice_reports_existing_project() {
    let tmp = setup_test_project();
    baskit(&tmp)
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

// ============================================================================
// Supplier Tests
// ============================================================================

#[test]
fn test_sup_list_recommended_order() {
    let tmp = TempDir::new().unwrap();
    let out = stdout_of(baskit(&tmp).current_dir(tmp.path()).args(["sup", "list", "-f", "id"]));
    let ids: Vec<&str> = out.lines().collect();
    assert_eq!(
        ids,
        vec!["SUP-001", "SUP-003", "SUP-004", "SUP-002", "SUP-005", "SUP-006"]
    );
}

#[test]
fn test_sup_list_count_and_coverage_filter() {
    let tmp = TempDir::new().unwrap();
    baskit(&tmp)
        .current_dir(tmp.path())
        .args(["sup", "list", "--count"])
        .assert()
        .success()
        .stdout("6\n");

    let out = stdout_of(baskit(&tmp).current_dir(tmp.path()).args([
        "sup",
        "list",
        "--coverage",
        "Honda Beat",
        "-f",
        "id",
    ]));
    assert_eq!(out.trim(), "SUP-003");
}

#[test]
fn test_sup_show_stock_table() {
    let tmp = TempDir::new().unwrap();
    baskit(&tmp)
        .current_dir(tmp.path())
        .args(["sup", "show", "sup-001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PT Sumber Pangan Jaya"))
        .stdout(predicate::str::contains("Indomie Goreng"))
        .stdout(predicate::str::contains("Hendra Wijaya"));
}

#[test]
fn test_sup_show_unknown_fails() {
    let tmp = TempDir::new().unwrap();
    baskit(&tmp)
        .current_dir(tmp.path())
        .args(["sup", "show", "SUP-404"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

// ============================================================================
// Match Tests
// ============================================================================

#[test]
fn test_match_best_match_json() {
    let tmp = TempDir::new().unwrap();
    let out = stdout_of(baskit(&tmp).current_dir(tmp.path()).args([
        "match",
        "--so",
        "SO-2024-001",
        "--sort",
        "best-match",
        "-f",
        "json",
    ]));
    let ranked: serde_json::Value = serde_json::from_str(&out).unwrap();
    let ranked = ranked.as_array().unwrap();
    assert_eq!(ranked.len(), 6);
    assert_eq!(ranked[0]["supplier_id"], "SUP-001");
    assert_eq!(ranked[0]["match_percentage"], 100);
    assert_eq!(ranked[0]["rank"], 1);
}

#[test]
fn test_match_only_matched_hides_empty_suppliers() {
    let tmp = TempDir::new().unwrap();
    let out = stdout_of(baskit(&tmp).current_dir(tmp.path()).args([
        "match",
        "--item",
        "Honda Beat:2",
        "--only-matched",
        "-f",
        "id",
    ]));
    assert_eq!(out.trim(), "SUP-003");
}

#[test]
fn test_match_without_items_fails() {
    let tmp = TempDir::new().unwrap();
    baskit(&tmp)
        .current_dir(tmp.path())
        .arg("match")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no items"));
}

#[test]
fn test_match_rejects_bad_item_spec() {
    let tmp = TempDir::new().unwrap();
    baskit(&tmp)
        .current_dir(tmp.path())
        .args(["match", "--item", "Indomie"])
        .assert()
        .failure();
}

// ============================================================================
// Sales Order & Transfer Tests
// ============================================================================

#[test]
fn test_so_list_and_import() {
    let tmp = TempDir::new().unwrap();
    baskit(&tmp)
        .current_dir(tmp.path())
        .args(["so", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SO-2024-001"))
        .stdout(predicate::str::contains("Toko Makmur"));

    baskit(&tmp)
        .current_dir(tmp.path())
        .args(["so", "import", " so-2024-003 "])
        .assert()
        .success()
        .stdout(predicate::str::contains("Honda Beat"));
}

#[test]
fn test_so_import_unknown_lists_known_ids() {
    let tmp = TempDir::new().unwrap();
    baskit(&tmp)
        .current_dir(tmp.path())
        .args(["so", "import", "SO-1999-001"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"))
        .stderr(predicate::str::contains("SO-2024-002"));
}

#[test]
fn test_transfer_link_round_trip() {
    let tmp = TempDir::new().unwrap();
    let link = stdout_of(baskit(&tmp).current_dir(tmp.path()).args([
        "so",
        "import",
        "SO-2024-002",
        "--link",
    ]));
    let link = link.trim();
    assert!(link.starts_with("baskit://review?order="));

    let out = stdout_of(baskit(&tmp).current_dir(tmp.path()).args([
        "transfer",
        "decode",
        link,
        "-f",
        "json",
    ]));
    let transfer: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(transfer["version"], 1);
    assert_eq!(transfer["source"]["kind"], "sales_order");
    assert_eq!(transfer["source"]["id"], "SO-2024-002");
    assert_eq!(transfer["items"][0]["product"], "Bear Brand 189ml");
    assert_eq!(transfer["items"][1]["quantity"], 24);
}

#[test]
fn test_transfer_encode_feeds_match() {
    let tmp = TempDir::new().unwrap();
    let link = stdout_of(baskit(&tmp).current_dir(tmp.path()).args([
        "transfer",
        "encode",
        "--item",
        "Chitato Sapi Panggang:10",
    ]));

    let out = stdout_of(baskit(&tmp).current_dir(tmp.path()).args([
        "match",
        "--transfer",
        link.trim(),
        "--only-matched",
        "-f",
        "id",
    ]));
    assert_eq!(out.trim(), "SUP-004");
}

#[test]
fn test_transfer_decode_rejects_unsupported_version() {
    let tmp = TempDir::new().unwrap();
    baskit(&tmp)
        .current_dir(tmp.path())
        .args([
            "transfer",
            "decode",
            r#"{"version":2,"items":[{"product":"Aqua","quantity":1}]}"#,
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("version"));
}

#[test]
fn test_transfer_decode_reports_schema_violation() {
    let tmp = TempDir::new().unwrap();
    baskit(&tmp)
        .current_dir(tmp.path())
        .args([
            "transfer",
            "decode",
            r#"{"version":1,"items":[{"product":"Aqua","quantity":0}]}"#,
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/items/0/quantity"));
}

// ============================================================================
// Demand Tests
// ============================================================================

#[test]
fn test_demand_list_flags_dangling_quote() {
    let tmp = TempDir::new().unwrap();
    baskit(&tmp)
        .current_dir(tmp.path())
        .args(["demand", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DMD-001"))
        .stdout(predicate::str::contains("QT-005"));
}

#[test]
fn test_demand_list_status_filter() {
    let tmp = TempDir::new().unwrap();
    let out = stdout_of(baskit(&tmp).current_dir(tmp.path()).args([
        "demand", "list", "--status", "open", "-f", "id",
    ]));
    assert_eq!(out.trim(), "DMD-002");
}

#[test]
fn test_demand_show_sorts_quotes() {
    let tmp = TempDir::new().unwrap();
    let out = stdout_of(baskit(&tmp).current_dir(tmp.path()).args(["demand", "show", "DMD-001"]));
    let first = out.find("QT-001").unwrap();
    let second = out.find("QT-002").unwrap();
    assert!(first < second);
    assert!(out.contains("lowest unit price"));
}

// ============================================================================
// Purchase Order Tests
// ============================================================================

#[test]
fn test_po_new_requires_project() {
    let tmp = TempDir::new().unwrap();
    baskit(&tmp)
        .current_dir(tmp.path())
        .args(["po", "new", "--supplier", "SUP-001", "--item", "Indomie Goreng:10", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("baskit init"));
}

#[test]
fn test_po_new_writes_order_and_mailto_link() {
    let tmp = setup_test_project();
    baskit(&tmp)
        .current_dir(tmp.path())
        .args([
            "po",
            "new",
            "--supplier",
            "SUP-001",
            "--so",
            "SO-2024-001",
            "--yes",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created purchase order PO-"))
        .stdout(predicate::str::contains("mailto:sales@sumberpangan.co.id?subject="));

    let files = yaml_files(&tmp.path().join("orders"));
    assert_eq!(files.len(), 1);
    let content = fs::read_to_string(&files[0]).unwrap();
    assert!(content.contains("supplier_id: SUP-001"));
    assert!(content.contains("status: draft"));

    baskit(&tmp)
        .current_dir(tmp.path())
        .args(["po", "list", "--count"])
        .assert()
        .success()
        .stdout("1\n");
}

#[test]
fn test_po_new_whatsapp_link() {
    let tmp = setup_test_project();
    baskit(&tmp)
        .current_dir(tmp.path())
        .args([
            "po",
            "new",
            "-s",
            "SUP-003",
            "--item",
            "Honda Vario 125:2",
            "--yes",
            "--whatsapp",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://wa.me/6282144445555?text="));
}

#[test]
fn test_po_new_nothing_matched_fails() {
    let tmp = setup_test_project();
    baskit(&tmp)
        .current_dir(tmp.path())
        .args(["po", "new", "-s", "SUP-002", "--item", "Honda Beat:1", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("none of the requested items"));
    assert!(yaml_files(&tmp.path().join("orders")).is_empty());
}

#[test]
fn test_po_show_and_send() {
    let tmp = setup_test_project();
    baskit(&tmp)
        .current_dir(tmp.path())
        .args(["po", "new", "-s", "SUP-004", "--item", "Chitato Sapi Panggang:5", "--yes"])
        .assert()
        .success();

    let id = stdout_of(baskit(&tmp).current_dir(tmp.path()).args(["po", "list", "-f", "id"]));
    let id = id.trim();
    assert!(id.starts_with("PO-"));

    baskit(&tmp)
        .current_dir(tmp.path())
        .args(["po", "show", id])
        .assert()
        .success()
        .stdout(predicate::str::contains("UD Camilan Sejahtera"))
        .stdout(predicate::str::contains("Rp 50.000"));

    baskit(&tmp)
        .current_dir(tmp.path())
        .args(["po", "send", id])
        .assert()
        .success()
        .stdout(predicate::str::contains("mailto:"));

    let files = yaml_files(&tmp.path().join("orders"));
    let content = fs::read_to_string(&files[0]).unwrap();
    assert!(content.contains("status: sent"));
}

// ============================================================================
// Loyalty Tests
// ============================================================================

#[test]
fn test_loyalty_active_campaigns() {
    let tmp = TempDir::new().unwrap();
    let out = stdout_of(baskit(&tmp).current_dir(tmp.path()).args([
        "loyalty",
        "campaigns",
        "--active",
        "-f",
        "id",
    ]));
    assert_eq!(out.trim(), "CPG-001");
}

#[test]
fn test_loyalty_leaderboard_ties_share_rank() {
    let tmp = TempDir::new().unwrap();
    let out = stdout_of(baskit(&tmp).current_dir(tmp.path()).args([
        "loyalty",
        "leaderboard",
        "--campaign",
        "CPG-001",
        "-f",
        "json",
    ]));
    let board: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(board[0]["member_id"], "MBR-002");
    assert_eq!(board[0]["rank"], 1);
    assert_eq!(board[1]["member_name"], "Rina Kartika");
    assert_eq!(board[1]["rank"], 2);
    assert_eq!(board[2]["member_name"], "Sari Wulandari");
    assert_eq!(board[2]["rank"], 2);
}

#[test]
fn test_loyalty_submit_and_leaderboard_update() {
    let tmp = setup_test_project();
    baskit(&tmp)
        .current_dir(tmp.path())
        .args([
            "loyalty", "submit", "-c", "CPG-001", "-m", "MBR-001", "-a", "150000",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("approved: 50 point(s)"));

    baskit(&tmp)
        .current_dir(tmp.path())
        .args([
            "loyalty", "submit", "-c", "CPG-001", "-m", "MBR-003", "-a", "5000",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("rejected"));

    assert_eq!(yaml_files(&tmp.path().join("receipts")).len(), 2);

    let out = stdout_of(baskit(&tmp).current_dir(tmp.path()).args([
        "loyalty",
        "leaderboard",
        "-c",
        "CPG-001",
        "-f",
        "json",
    ]));
    let board: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(board[0]["rank"], 1);
    assert_eq!(board[1]["member_id"], "MBR-001");
    assert_eq!(board[1]["points"], 100);
    assert_eq!(board[1]["rank"], 1);
}

#[test]
fn test_loyalty_submit_inactive_campaign_fails() {
    let tmp = setup_test_project();
    baskit(&tmp)
        .current_dir(tmp.path())
        .args([
            "loyalty", "submit", "-c", "CPG-002", "-m", "MBR-001", "-a", "90000",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not running"));
}

#[test]
fn test_loyalty_notify_builds_whatsapp_link() {
    let tmp = TempDir::new().unwrap();
    baskit(&tmp)
        .current_dir(tmp.path())
        .args(["loyalty", "notify", "MBR-001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#3"))
        .stdout(predicate::str::contains("https://wa.me/6281234567890?text="));
}

// ============================================================================
// Partner Tests
// ============================================================================

#[test]
fn test_partner_list() {
    let tmp = TempDir::new().unwrap();
    baskit(&tmp)
        .current_dir(tmp.path())
        .args(["partner", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PT Sinar Distribusi"))
        .stdout(predicate::str::contains("3 partner(s) found."));
}

#[test]
fn test_partner_assess_seed_is_reproducible() {
    let tmp = TempDir::new().unwrap();
    let run = || {
        stdout_of(baskit(&tmp).current_dir(tmp.path()).args([
            "partner", "assess", "TXN-002", "--seed", "42", "-f", "json",
        ]))
    };
    let first: serde_json::Value = serde_json::from_str(&run()).unwrap();
    let second: serde_json::Value = serde_json::from_str(&run()).unwrap();
    assert_eq!(first, second);

    let score = first["score"].as_u64().unwrap();
    assert!(score <= 100);
    assert_eq!(first["level"], "high");
}

#[test]
fn test_partner_assess_clean_transaction_is_low_risk() {
    let tmp = TempDir::new().unwrap();
    let out = stdout_of(baskit(&tmp).current_dir(tmp.path()).args([
        "partner", "assess", "TXN-001", "--seed", "1", "-f", "json",
    ]));
    let assessment: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert!(assessment["score"].as_u64().unwrap() >= 97);
    assert_eq!(assessment["level"], "low");
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_config_show_env_override() {
    let tmp = setup_test_project();
    baskit(&tmp)
        .current_dir(tmp.path())
        .env("BASKIT_AUTHOR", "Dewi Lestari")
        .args(["config", "show", "author"])
        .assert()
        .success()
        .stdout("Dewi Lestari\n");
}

#[test]
fn test_config_set_project_value() {
    let tmp = setup_test_project();
    baskit(&tmp)
        .current_dir(tmp.path())
        .args(["config", "set", "currency", "IDR"])
        .assert()
        .success();

    baskit(&tmp)
        .current_dir(tmp.path())
        .args(["config", "show", "currency"])
        .assert()
        .success()
        .stdout("IDR\n");
}

#[test]
fn test_config_unknown_key_fails() {
    let tmp = TempDir::new().unwrap();
    baskit(&tmp)
        .current_dir(tmp.path())
        .args(["config", "show", "editor"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown configuration key"));
}
