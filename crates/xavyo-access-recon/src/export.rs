//! Export of reconciliation outputs.
//!
//! CSV is designed for spreadsheet review:
//! - Reconciled view: one row per (application, identity) with both sides'
//!   permissions side by side. Absent permissions are empty cells.
//! - Application summary: counts plus identity sets rendered as sorted,
//!   comma-separated lists.
//!
//! JSON is the same data with the identity sets kept as arrays.

use std::collections::BTreeSet;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReconResult;
use crate::report::ReconciliationReport;
use crate::types::{ApplicationSummary, ReconciledRow};

/// Separator between identities in a CSV summary cell.
pub const IDENTITY_SEPARATOR: &str = ", ";

/// File stem of the reconciled view.
pub const RECONCILED_FILE_STEM: &str = "acl_vs_iam_view_by_brid";

/// File stem of the application summary.
pub const SUMMARY_FILE_STEM: &str = "acl_vs_iam_app_summary";

/// File name of the run report.
pub const REPORT_FILE_NAME: &str = "reconciliation_report.json";

/// Format of the two output tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Comma-separated values with a header row.
    #[default]
    Csv,
    /// Pretty-printed JSON array.
    Json,
}

impl OutputFormat {
    /// File extension, without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }

    /// File name of the reconciled view in this format.
    #[must_use]
    pub fn reconciled_file_name(self) -> String {
        format!("{RECONCILED_FILE_STEM}.{}", self.extension())
    }

    /// File name of the application summary in this format.
    #[must_use]
    pub fn summary_file_name(self) -> String {
        format!("{SUMMARY_FILE_STEM}.{}", self.extension())
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format '{other}'. Use csv or json")),
        }
    }
}

/// CSV record for a reconciled row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CsvReconciledRecord {
    pub application: String,
    pub identity: String,
    pub in_acl: bool,
    pub in_iam: bool,
    pub both: bool,
    pub diff_status: String,
    #[serde(rename = "ACL_permission")]
    pub acl_permission: String,
    #[serde(rename = "IAM_permission")]
    pub iam_permission: String,
    pub matched: bool,
}

impl From<&ReconciledRow> for CsvReconciledRecord {
    fn from(row: &ReconciledRow) -> Self {
        Self {
            application: row.application.clone(),
            identity: row.identity.clone(),
            in_acl: row.in_acl,
            in_iam: row.in_iam,
            both: row.both,
            diff_status: row.diff_status.to_string(),
            acl_permission: row.acl_permission.clone().unwrap_or_default(),
            iam_permission: row.iam_permission.clone().unwrap_or_default(),
            matched: row.matched,
        }
    }
}

/// CSV record for an application summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CsvSummaryRecord {
    pub application: String,
    pub n_acl_identities: usize,
    pub n_iam_identities: usize,
    pub n_both_identities: usize,
    pub n_acl_only: usize,
    pub n_iam_only: usize,
    pub total_both: usize,
    pub n_matched: usize,
    pub n_mismatch: usize,
    pub acl_identities: String,
    pub iam_identities: String,
    pub both_identities: String,
    pub acl_only_identities: String,
    pub iam_only_identities: String,
}

fn join_identities(ids: &BTreeSet<String>) -> String {
    ids.iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(IDENTITY_SEPARATOR)
}

impl From<&ApplicationSummary> for CsvSummaryRecord {
    fn from(s: &ApplicationSummary) -> Self {
        Self {
            application: s.application.clone(),
            n_acl_identities: s.n_acl_identities,
            n_iam_identities: s.n_iam_identities,
            n_both_identities: s.n_both_identities,
            n_acl_only: s.n_acl_only,
            n_iam_only: s.n_iam_only,
            total_both: s.total_both,
            n_matched: s.n_matched,
            n_mismatch: s.n_mismatch,
            acl_identities: join_identities(&s.acl_identities),
            iam_identities: join_identities(&s.iam_identities),
            both_identities: join_identities(&s.both_identities),
            acl_only_identities: join_identities(&s.acl_only_identities),
            iam_only_identities: join_identities(&s.iam_only_identities),
        }
    }
}

/// Column order of the reconciled view CSV.
pub const RECONCILED_HEADERS: [&str; 9] = [
    "application",
    "identity",
    "in_acl",
    "in_iam",
    "both",
    "diff_status",
    "ACL_permission",
    "IAM_permission",
    "matched",
];

/// Column order of the application summary CSV.
pub const SUMMARY_HEADERS: [&str; 14] = [
    "application",
    "n_acl_identities",
    "n_iam_identities",
    "n_both_identities",
    "n_acl_only",
    "n_iam_only",
    "total_both",
    "n_matched",
    "n_mismatch",
    "acl_identities",
    "iam_identities",
    "both_identities",
    "acl_only_identities",
    "iam_only_identities",
];

/// Export the reconciled view to CSV.
///
/// The header row is written even when there are no rows.
pub fn export_reconciled_csv<W: Write>(rows: &[ReconciledRow], writer: W) -> ReconResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(RECONCILED_HEADERS)?;

    for row in rows {
        wtr.serialize(CsvReconciledRecord::from(row))?;
    }

    wtr.flush()?;
    Ok(())
}

/// Export the application summary to CSV.
///
/// The header row is written even when there are no summaries.
pub fn export_summary_csv<W: Write>(
    summaries: &[ApplicationSummary],
    writer: W,
) -> ReconResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(SUMMARY_HEADERS)?;

    for summary in summaries {
        wtr.serialize(CsvSummaryRecord::from(summary))?;
    }

    wtr.flush()?;
    Ok(())
}

/// Export any serializable value as pretty-printed JSON.
pub fn export_json<T: Serialize + ?Sized, W: Write>(value: &T, mut writer: W) -> ReconResult<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Export the reconciled view in the given format.
pub fn export_reconciled<W: Write>(
    rows: &[ReconciledRow],
    format: OutputFormat,
    writer: W,
) -> ReconResult<()> {
    match format {
        OutputFormat::Csv => export_reconciled_csv(rows, writer),
        OutputFormat::Json => export_json(rows, writer),
    }
}

/// Export the application summary in the given format.
pub fn export_summary<W: Write>(
    summaries: &[ApplicationSummary],
    format: OutputFormat,
    writer: W,
) -> ReconResult<()> {
    match format {
        OutputFormat::Csv => export_summary_csv(summaries, writer),
        OutputFormat::Json => export_json(summaries, writer),
    }
}

/// Export the run report as JSON.
pub fn export_report<W: Write>(report: &ReconciliationReport, writer: W) -> ReconResult<()> {
    export_json(report, writer)
}
