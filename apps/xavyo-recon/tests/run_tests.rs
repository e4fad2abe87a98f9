//! Integration tests for the run command
//!
//! Tests cover:
//! - CSV and JSON outputs written to the output directory
//! - Case policy override with --exact-case
//! - Delimiter override and config files
//! - Exit codes for discrepancies, schema mismatches and bad input

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

// ============================================================================
// Test Fixtures
// ============================================================================

const ACL_CSV: &str = "\
USCB Owned Applications,User_Unique_ID,Application_Profile_Name
App1,alice,Read
App1,alice,Write
App1, bob ,Read
App2,carol,Admin
";

const IAM_CSV: &str = "\
REQUEST_WORKFLOW_NAME,BRID,PERMISSION_OR_PROFILE_NAME
APP1,ALICE,write
APP1,ALICE,read
APP1,BOB,Read
APP3,dave,User
";

const CLEAN_ACL_CSV: &str = "\
USCB Owned Applications,User_Unique_ID,Application_Profile_Name
App1,alice,Read
";

const CLEAN_IAM_CSV: &str = "\
REQUEST_WORKFLOW_NAME,BRID,PERMISSION_OR_PROFILE_NAME
APP1,ALICE,READ
";

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write test file");
    path
}

fn recon(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_xavyo-recon"))
        .args(args)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to execute command")
}

fn run_in(dir: &TempDir, acl: &str, iam: &str, extra: &[&str]) -> Output {
    let acl = write_file(dir, "acl.csv", acl);
    let iam = write_file(dir, "iam.csv", iam);
    let out = dir.path().join("out");

    let mut args = vec![
        "run",
        "--acl",
        acl.to_str().unwrap(),
        "--iam",
        iam.to_str().unwrap(),
        "--out-dir",
        out.to_str().unwrap(),
    ];
    args.extend_from_slice(extra);
    recon(&args)
}

fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut rdr = csv::Reader::from_path(path).expect("Failed to open CSV");
    let headers = rdr
        .headers()
        .unwrap()
        .iter()
        .map(str::to_string)
        .collect();
    let rows = rdr
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    (headers, rows)
}

// ============================================================================
// Outputs
// ============================================================================

#[test]
fn test_run_writes_csv_outputs() {
    let dir = TempDir::new().unwrap();
    let output = run_in(&dir, ACL_CSV, IAM_CSV, &[]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let out = dir.path().join("out");
    let (headers, rows) = read_csv(&out.join("acl_vs_iam_view_by_brid.csv"));
    assert_eq!(
        headers,
        vec![
            "application",
            "identity",
            "in_acl",
            "in_iam",
            "both",
            "diff_status",
            "ACL_permission",
            "IAM_permission",
            "matched"
        ]
    );
    assert_eq!(rows.len(), 4);
    assert_eq!(
        rows[0],
        vec!["APP1", "ALICE", "true", "true", "true", "BOTH", "Read; Write", "read; write", "true"]
    );
    assert_eq!(rows[1][1], "BOB");
    assert_eq!(rows[1][8], "true");
    assert_eq!(
        rows[2],
        vec!["APP2", "CAROL", "true", "false", "false", "ACL_ONLY", "Admin", "", "false"]
    );
    assert_eq!(rows[3][5], "IAM_ONLY");

    let (headers, rows) = read_csv(&out.join("acl_vs_iam_app_summary.csv"));
    assert_eq!(headers[0], "application");
    assert_eq!(headers.len(), 14);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0][0], "APP1");
    assert_eq!(rows[0][9], "ALICE, BOB");

    let report: Value =
        serde_json::from_str(&fs::read_to_string(out.join("reconciliation_report.json")).unwrap())
            .unwrap();
    assert_eq!(report["statistics"]["reconciled_rows"], 4);
    assert_eq!(report["statistics"]["matched"], 2);
    assert_eq!(report["comparison"], "case_insensitive");
    assert!(report["run_id"].is_string());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Rows: 4 across 3 applications"));
}

#[test]
fn test_run_writes_json_outputs() {
    let dir = TempDir::new().unwrap();
    let output = run_in(&dir, ACL_CSV, IAM_CSV, &["--format", "json"]);
    assert!(output.status.success());

    let out = dir.path().join("out");
    let rows: Value =
        serde_json::from_str(&fs::read_to_string(out.join("acl_vs_iam_view_by_brid.json")).unwrap())
            .unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 4);
    assert_eq!(rows[2]["diff_status"], "ACL_ONLY");
    assert!(rows[2]["IAM_permission"].is_null());

    let summaries: Value =
        serde_json::from_str(&fs::read_to_string(out.join("acl_vs_iam_app_summary.json")).unwrap())
            .unwrap();
    assert_eq!(summaries[0]["both_identities"], serde_json::json!(["ALICE", "BOB"]));
}

#[test]
fn test_run_exact_case() {
    let dir = TempDir::new().unwrap();
    let output = run_in(&dir, ACL_CSV, IAM_CSV, &["--exact-case"]);
    assert!(output.status.success());

    let report: Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join("out/reconciliation_report.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(report["comparison"], "exact");
    assert_eq!(report["statistics"]["matched"], 1);
    assert_eq!(report["statistics"]["mismatched"], 1);
    assert_eq!(report["top_mismatched_applications"][0]["application"], "APP1");
}

#[test]
fn test_run_with_delimiter_and_config() {
    let dir = TempDir::new().unwrap();
    let config = write_file(
        &dir,
        "recon.yaml",
        "acl_columns:\n  application: [App]\n  identity: [User]\n  permission: [Profile]\n",
    );

    let acl = "App;User;Profile\nAPP1;alice;Read\n";
    let iam = "REQUEST_WORKFLOW_NAME;BRID;PERMISSION_OR_PROFILE_NAME\nAPP1;ALICE;read\n";
    let output = run_in(
        &dir,
        acl,
        iam,
        &["--delimiter", ";", "--config", config.to_str().unwrap()],
    );

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let (_, rows) = read_csv(&dir.path().join("out/acl_vs_iam_view_by_brid.csv"));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][8], "true");
}

// ============================================================================
// Exit codes
// ============================================================================

#[test]
fn test_fail_on_mismatch_exit_code() {
    let dir = TempDir::new().unwrap();
    let output = run_in(&dir, ACL_CSV, IAM_CSV, &["--fail-on-mismatch"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Discrepancies found"));
    // Outputs are still written for review.
    assert!(dir.path().join("out/acl_vs_iam_view_by_brid.csv").exists());
}

#[test]
fn test_fail_on_mismatch_clean_run_succeeds() {
    let dir = TempDir::new().unwrap();
    let output = run_in(&dir, CLEAN_ACL_CSV, CLEAN_IAM_CSV, &["--fail-on-mismatch"]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_schema_mismatch_exit_code() {
    let dir = TempDir::new().unwrap();
    let acl = "Application,User,Profile\nAPP1,alice,Read\n";
    let output = run_in(&dir, acl, IAM_CSV, &[]);

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ACL source is missing a application column"));
    assert!(stderr.contains("USCB Owned Applications"));
    assert!(!dir.path().join("out/acl_vs_iam_view_by_brid.csv").exists());
}

#[test]
fn test_missing_input_file_exit_code() {
    let dir = TempDir::new().unwrap();
    let iam = write_file(&dir, "iam.csv", IAM_CSV);
    let missing = dir.path().join("nope.csv");

    let output = recon(&[
        "run",
        "--acl",
        missing.to_str().unwrap(),
        "--iam",
        iam.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("--acl file not found"));
}

#[test]
fn test_invalid_config_exit_code() {
    let dir = TempDir::new().unwrap();
    let config = write_file(&dir, "bad.yaml", "ignore_case: true\n");

    let output = run_in(&dir, ACL_CSV, IAM_CSV, &["--config", config.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_missing_required_argument_exit_code() {
    let output = recon(&["run", "--acl", "acl.csv"]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_json_logs_go_to_stderr() {
    let dir = TempDir::new().unwrap();
    let output = run_in(&dir, CLEAN_ACL_CSV, CLEAN_IAM_CSV, &["--log-json"]);
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    let line = stderr
        .lines()
        .find(|l| l.contains("Access reconciliation completed"))
        .expect("completion event logged");
    let event: Value = serde_json::from_str(line).unwrap();
    assert!(event["run_id"].is_string());
    assert_eq!(event["level"], "INFO");
}
