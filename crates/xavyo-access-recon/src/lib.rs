//! # Access Reconciliation
//!
//! Compares who has access to which application according to two
//! independent access-control extracts: the ACL record and the IAM / OWNED
//! record.
//!
//! ## Overview
//!
//! A reconciliation run:
//! - Resolves each source's application, identity and permission columns
//!   from configurable candidate header lists
//! - Normalizes keys (trimmed, whitespace collapsed, uppercased) so
//!   cosmetic differences do not break the join
//! - Aggregates permissions per (application, identity) into a sorted,
//!   de-duplicated, `"; "`-joined string
//! - Joins both sources on (application, identity) and flags presence,
//!   diff status and permission equality
//! - Summarizes identity sets and match counts per application
//! - Reports headline statistics and the applications with most mismatches
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      ReconciliationEngine                           │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │                                                                     │
//! │  ┌───────────────┐    ┌───────────────┐    ┌───────────────┐       │
//! │  │   RawTable    │───►│   Column      │───►│  Normalizer   │       │
//! │  │  (ACL / IAM)  │    │   Resolution  │    │               │       │
//! │  └───────────────┘    └───────────────┘    └───────────────┘       │
//! │                                                    │               │
//! │                                                    ▼               │
//! │  ┌───────────────┐    ┌───────────────┐    ┌───────────────┐       │
//! │  │  Summarizer   │◄───│  Reconciler   │◄───│  Aggregator   │       │
//! │  │               │    │ (outer join)  │    │               │       │
//! │  └───────────────┘    └───────────────┘    └───────────────┘       │
//! │          │                    │                                    │
//! │          ▼                    ▼                                    │
//! │  ┌───────────────┐    ┌───────────────┐                            │
//! │  │  Statistics / │───►│    Export     │                            │
//! │  │  Report       │    │  (CSV / JSON) │                            │
//! │  └───────────────┘    └───────────────┘                            │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use xavyo_access_recon::{OutputFormat, ReconConfig, ReconciliationEngine};
//!
//! let config = ReconConfig::from_yaml_path("recon.yaml")?;
//! let engine = ReconciliationEngine::with_config(config);
//!
//! let outcome = engine.run_files("acl.csv", "owned.csv")?;
//!
//! let file = std::fs::File::create("acl_vs_iam_view_by_brid.csv")?;
//! xavyo_access_recon::export::export_reconciled(&outcome.rows, OutputFormat::Csv, file)?;
//!
//! println!("match rate: {:.1}%", outcome.statistics().match_rate());
//! ```

pub mod aggregate;
pub mod columns;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod normalize;
pub mod reconcile;
pub mod report;
pub mod source;
pub mod statistics;
pub mod summarize;
pub mod types;

pub use aggregate::{
    aggregate, aggregate_acl, aggregate_iam, AclTable, AggregatedTable, IamTable,
    PERMISSION_SEPARATOR,
};
pub use columns::{ColumnCandidates, ColumnMapping, ResolvedColumn};
pub use config::ReconConfig;
pub use engine::{ReconciliationEngine, ReconciliationOutcome};
pub use error::{ReconError, ReconResult};
pub use export::OutputFormat;
pub use normalize::{normalize, normalize_key, normalize_permission};
pub use reconcile::{permissions_match, reconcile, reconcile_pair};
pub use report::{ApplicationMismatchCount, ReconciliationReport, ReportGenerator};
pub use source::RawTable;
pub use statistics::RunStatistics;
pub use summarize::summarize;
pub use types::{
    AggregatedGrant, ApplicationSummary, CanonicalGrant, ColumnField, DiffStatus, GrantKey,
    PermissionComparison, ReconciledRow, SourceKind,
};
