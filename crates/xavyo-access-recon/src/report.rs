//! Reconciliation report generation.
//!
//! The report accompanies the two output tables: run metadata, the columns
//! each source was read from, headline statistics and the applications with
//! the most permission mismatches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::columns::ColumnMapping;
use crate::statistics::RunStatistics;
use crate::types::{ApplicationSummary, PermissionComparison};

/// Complete reconciliation report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// Run ID.
    pub run_id: Uuid,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Permission comparison policy in force.
    pub comparison: PermissionComparison,
    /// Columns the ACL source was read from.
    pub acl_columns: ColumnMapping,
    /// Columns the IAM source was read from.
    pub iam_columns: ColumnMapping,
    /// Statistics.
    pub statistics: RunStatistics,
    /// Applications ranked by mismatch count.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub top_mismatched_applications: Vec<ApplicationMismatchCount>,
}

/// Mismatch count of one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationMismatchCount {
    /// Application name.
    pub application: String,
    /// Pairs with differing permissions.
    pub n_mismatch: usize,
    /// Pairs present on both sides.
    pub total_both: usize,
}

/// Report generator.
pub struct ReportGenerator;

impl ReportGenerator {
    /// Generate a report from run data.
    #[must_use]
    pub fn generate(
        run_id: Uuid,
        comparison: PermissionComparison,
        acl_columns: ColumnMapping,
        iam_columns: ColumnMapping,
        statistics: RunStatistics,
        summaries: &[ApplicationSummary],
        top: usize,
    ) -> ReconciliationReport {
        ReconciliationReport {
            run_id,
            generated_at: Utc::now(),
            comparison,
            acl_columns,
            iam_columns,
            statistics,
            top_mismatched_applications: Self::top_mismatched(summaries, top),
        }
    }

    /// Applications with at least one mismatch, most mismatches first, ties by name.
    #[must_use]
    pub fn top_mismatched(
        summaries: &[ApplicationSummary],
        top: usize,
    ) -> Vec<ApplicationMismatchCount> {
        let mut ranked: Vec<ApplicationMismatchCount> = summaries
            .iter()
            .filter(|s| s.n_mismatch > 0)
            .map(|s| ApplicationMismatchCount {
                application: s.application.clone(),
                n_mismatch: s.n_mismatch,
                total_both: s.total_both,
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.n_mismatch
                .cmp(&a.n_mismatch)
                .then_with(|| a.application.cmp(&b.application))
        });
        ranked.truncate(top);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn summary(app: &str, total_both: usize, n_matched: usize) -> ApplicationSummary {
        ApplicationSummary {
            application: app.to_string(),
            n_acl_identities: total_both,
            n_iam_identities: total_both,
            n_both_identities: total_both,
            n_acl_only: 0,
            n_iam_only: 0,
            total_both,
            n_matched,
            n_mismatch: total_both - n_matched,
            acl_identities: BTreeSet::new(),
            iam_identities: BTreeSet::new(),
            both_identities: BTreeSet::new(),
            acl_only_identities: BTreeSet::new(),
            iam_only_identities: BTreeSet::new(),
        }
    }

    #[test]
    fn test_top_mismatched_ranks_and_truncates() {
        let summaries = vec![
            summary("CLEAN", 5, 5),
            summary("BETA", 4, 2),
            summary("ALPHA", 3, 1),
            summary("GAMMA", 6, 1),
        ];

        let ranked = ReportGenerator::top_mismatched(&summaries, 2);

        assert_eq!(
            ranked,
            vec![
                ApplicationMismatchCount {
                    application: "GAMMA".to_string(),
                    n_mismatch: 5,
                    total_both: 6,
                },
                ApplicationMismatchCount {
                    application: "ALPHA".to_string(),
                    n_mismatch: 2,
                    total_both: 3,
                },
            ]
        );
    }

    #[test]
    fn test_top_mismatched_excludes_clean_applications() {
        let summaries = vec![summary("CLEAN", 2, 2)];
        assert!(ReportGenerator::top_mismatched(&summaries, 10).is_empty());
    }
}
