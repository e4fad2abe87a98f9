//! Summarizer: per-application identity set algebra and match counts.
//!
//! The application universe is exactly the set of applications seen in the
//! reconciled rows. Every application starts with empty identity sets and
//! zero counts, so a side with no rows for it reads as empty rather than
//! missing.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{ApplicationSummary, ReconciledRow};

#[derive(Debug, Default)]
struct ApplicationAccumulator {
    acl_identities: BTreeSet<String>,
    iam_identities: BTreeSet<String>,
    total_both: usize,
    n_matched: usize,
}

impl ApplicationAccumulator {
    fn record(&mut self, row: &ReconciledRow) {
        if row.in_acl {
            self.acl_identities.insert(row.identity.clone());
        }
        if row.in_iam {
            self.iam_identities.insert(row.identity.clone());
        }
        if row.both {
            self.total_both += 1;
            if row.matched {
                self.n_matched += 1;
            }
        }
    }

    fn finish(self, application: String) -> ApplicationSummary {
        let both_identities: BTreeSet<String> = self
            .acl_identities
            .intersection(&self.iam_identities)
            .cloned()
            .collect();
        let acl_only_identities: BTreeSet<String> = self
            .acl_identities
            .difference(&self.iam_identities)
            .cloned()
            .collect();
        let iam_only_identities: BTreeSet<String> = self
            .iam_identities
            .difference(&self.acl_identities)
            .cloned()
            .collect();

        ApplicationSummary {
            application,
            n_acl_identities: self.acl_identities.len(),
            n_iam_identities: self.iam_identities.len(),
            n_both_identities: both_identities.len(),
            n_acl_only: acl_only_identities.len(),
            n_iam_only: iam_only_identities.len(),
            total_both: self.total_both,
            n_matched: self.n_matched,
            n_mismatch: self.total_both - self.n_matched,
            acl_identities: self.acl_identities,
            iam_identities: self.iam_identities,
            both_identities,
            acl_only_identities,
            iam_only_identities,
        }
    }
}

/// Roll reconciled rows up into one summary per application, sorted by name.
#[must_use]
pub fn summarize(rows: &[ReconciledRow]) -> Vec<ApplicationSummary> {
    let mut universe: BTreeMap<&str, ApplicationAccumulator> = rows
        .iter()
        .map(|row| (row.application.as_str(), ApplicationAccumulator::default()))
        .collect();

    for row in rows {
        if let Some(acc) = universe.get_mut(row.application.as_str()) {
            acc.record(row);
        }
    }

    let summaries: Vec<ApplicationSummary> = universe
        .into_iter()
        .map(|(application, acc)| acc.finish(application.to_string()))
        .collect();

    tracing::debug!(
        rows = rows.len(),
        applications = summaries.len(),
        "Summarized reconciled rows per application"
    );

    summaries
}
