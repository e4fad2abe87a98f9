//! Run statistics for a reconciliation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{ApplicationSummary, DiffStatus, ReconciledRow};

/// Headline counts of one reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Raw rows read from the ACL source.
    #[serde(default)]
    pub acl_rows_in: usize,
    /// Raw rows read from the IAM source.
    #[serde(default)]
    pub iam_rows_in: usize,
    /// Distinct (application, identity) pairs in the ACL source.
    #[serde(default)]
    pub acl_pairs: usize,
    /// Distinct (application, identity) pairs in the IAM source.
    #[serde(default)]
    pub iam_pairs: usize,
    /// Rows in the reconciled view.
    #[serde(default)]
    pub reconciled_rows: usize,
    /// Distinct applications in the summary.
    #[serde(default)]
    pub applications: usize,
    /// Reconciled rows broken down by diff status.
    #[serde(default)]
    pub rows_by_status: BTreeMap<String, usize>,
    /// Pairs present on both sides with equal permissions.
    #[serde(default)]
    pub matched: usize,
    /// Pairs present on both sides with differing permissions.
    #[serde(default)]
    pub mismatched: usize,
    /// Wall-clock duration of the run in milliseconds.
    #[serde(default)]
    pub duration_ms: u64,
}

impl RunStatistics {
    /// Create new empty statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count reconciled rows and summaries. Input row and pair counts are
    /// filled in by the caller.
    #[must_use]
    pub fn from_outputs(rows: &[ReconciledRow], summaries: &[ApplicationSummary]) -> Self {
        let mut stats = Self {
            reconciled_rows: rows.len(),
            applications: summaries.len(),
            ..Self::default()
        };

        for status in DiffStatus::ALL {
            stats.rows_by_status.insert(status.to_string(), 0);
        }

        for row in rows {
            *stats
                .rows_by_status
                .entry(row.diff_status.to_string())
                .or_insert(0) += 1;
            if row.both {
                if row.matched {
                    stats.matched += 1;
                } else {
                    stats.mismatched += 1;
                }
            }
        }

        stats
    }

    /// Count for a specific diff status.
    #[must_use]
    pub fn status_count(&self, status: DiffStatus) -> usize {
        self.rows_by_status
            .get(&status.to_string())
            .copied()
            .unwrap_or(0)
    }

    /// Rows present on one side only.
    #[must_use]
    pub fn one_sided(&self) -> usize {
        self.status_count(DiffStatus::AclOnly) + self.status_count(DiffStatus::IamOnly)
    }

    /// Percentage of overlapping pairs whose permissions match.
    #[must_use]
    pub fn match_rate(&self) -> f64 {
        let overlap = self.matched + self.mismatched;
        if overlap == 0 {
            0.0
        } else {
            (self.matched as f64 / overlap as f64) * 100.0
        }
    }

    /// Whether the two sources disagree anywhere.
    #[must_use]
    pub fn has_discrepancies(&self) -> bool {
        self.mismatched > 0 || self.one_sided() > 0
    }
}
