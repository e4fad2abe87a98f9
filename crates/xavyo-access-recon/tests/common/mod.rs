//! Shared helpers for access reconciliation integration tests.

#![allow(dead_code)]

use std::sync::Once;

use xavyo_access_recon::{CanonicalGrant, RawTable};

static INIT: Once = Once::new();

/// Initialize logging for tests (once).
pub fn init_test_logging() {
    INIT.call_once(|| {
        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::fmt()
                .with_test_writer()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .try_init()
                .ok();
        }
    });
}

/// ACL extract with the default headers.
pub fn acl_table(rows: &[&[&str]]) -> RawTable {
    RawTable::from_records(
        &[
            "USCB Owned Applications",
            "User_Unique_ID",
            "Application_Profile_Name",
        ],
        rows,
    )
}

/// IAM extract with the default headers.
pub fn iam_table(rows: &[&[&str]]) -> RawTable {
    RawTable::from_records(
        &["REQUEST_WORKFLOW_NAME", "BRID", "PERMISSION_OR_PROFILE_NAME"],
        rows,
    )
}

/// Canonical grants from (application, identity, permission) triples.
pub fn grants(rows: &[(&str, &str, &str)]) -> Vec<CanonicalGrant> {
    rows.iter()
        .map(|(application, identity, permission)| CanonicalGrant {
            application: (*application).to_string(),
            identity: (*identity).to_string(),
            permission: (*permission).to_string(),
        })
        .collect()
}

/// A mixed ACL extract spanning several applications.
pub fn sample_acl() -> RawTable {
    acl_table(&[
        &["App1", "alice", "Read"],
        &["App1", "alice", "Write"],
        &["App1", " bob ", "Read"],
        &["App1", "carol", "Admin"],
        &["App2", "bob", "Admin"],
        &["App2", "dave", "User"],
        &["App4", "erin", "Viewer"],
    ])
}

/// A mixed IAM extract overlapping [`sample_acl`].
pub fn sample_iam() -> RawTable {
    iam_table(&[
        &["APP1", "ALICE", "WRITE"],
        &["APP1", "ALICE", "READ"],
        &["APP1", "BOB", "Write"],
        &["APP1", "frank", "Read"],
        &["APP2", "DAVE", "user"],
        &["APP3", "gina", "Owner"],
    ])
}
