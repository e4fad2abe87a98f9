//! Reconciliation engine orchestrator.
//!
//! Main entry point for reconciliation runs. Column mappings for both
//! sources are resolved before any stage runs, so a schema problem never
//! produces partial output.

use std::path::Path;
use std::time::Instant;

use uuid::Uuid;

use crate::aggregate::{aggregate_acl, aggregate_iam};
use crate::config::ReconConfig;
use crate::error::ReconResult;
use crate::normalize::normalize;
use crate::reconcile::reconcile;
use crate::report::{ReconciliationReport, ReportGenerator};
use crate::source::RawTable;
use crate::statistics::RunStatistics;
use crate::summarize::summarize;
use crate::types::{ApplicationSummary, ReconciledRow, SourceKind};

/// Everything a reconciliation run produces.
#[derive(Debug, Clone)]
pub struct ReconciliationOutcome {
    /// Reconciled view, sorted by (application, identity).
    pub rows: Vec<ReconciledRow>,
    /// Application summary, sorted by application.
    pub summaries: Vec<ApplicationSummary>,
    /// Run report.
    pub report: ReconciliationReport,
}

impl ReconciliationOutcome {
    /// Run statistics.
    #[must_use]
    pub fn statistics(&self) -> &RunStatistics {
        &self.report.statistics
    }
}

/// Reconciliation engine for ACL vs IAM runs.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationEngine {
    config: ReconConfig,
}

impl ReconciliationEngine {
    /// Create an engine with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration.
    #[must_use]
    pub fn with_config(config: ReconConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &ReconConfig {
        &self.config
    }

    /// Load both extracts from CSV files using the configured delimiter.
    pub fn load_sources(
        &self,
        acl_path: impl AsRef<Path>,
        iam_path: impl AsRef<Path>,
    ) -> ReconResult<(RawTable, RawTable)> {
        let delimiter = self.config.delimiter_byte()?;
        let acl = RawTable::from_csv_path(acl_path, delimiter)?;
        let iam = RawTable::from_csv_path(iam_path, delimiter)?;
        Ok((acl, iam))
    }

    /// Load both extracts from CSV files and reconcile them.
    pub fn run_files(
        &self,
        acl_path: impl AsRef<Path>,
        iam_path: impl AsRef<Path>,
    ) -> ReconResult<ReconciliationOutcome> {
        let (acl, iam) = self.load_sources(acl_path, iam_path)?;
        self.run(&acl, &iam)
    }

    /// Reconcile an ACL extract against an IAM extract.
    pub fn run(&self, acl: &RawTable, iam: &RawTable) -> ReconResult<ReconciliationOutcome> {
        let run_id = Uuid::new_v4();
        let started = Instant::now();

        tracing::info!(
            run_id = %run_id,
            acl_rows = acl.len(),
            iam_rows = iam.len(),
            comparison = %self.config.comparison,
            "Starting access reconciliation"
        );

        let acl_mapping = self
            .config
            .acl_columns
            .resolve(SourceKind::Acl, &acl.headers)?;
        let iam_mapping = self
            .config
            .iam_columns
            .resolve(SourceKind::Iam, &iam.headers)?;

        let acl_grants = normalize(acl, &acl_mapping);
        let iam_grants = normalize(iam, &iam_mapping);
        tracing::debug!(
            run_id = %run_id,
            acl_grants = acl_grants.len(),
            iam_grants = iam_grants.len(),
            "Normalized sources"
        );

        let acl_table = aggregate_acl(&acl_grants);
        let iam_table = aggregate_iam(&iam_grants);
        tracing::debug!(
            run_id = %run_id,
            acl_pairs = acl_table.len(),
            iam_pairs = iam_table.len(),
            "Aggregated sources"
        );

        let rows = reconcile(&acl_table, &iam_table, self.config.comparison);
        tracing::debug!(run_id = %run_id, rows = rows.len(), "Reconciled sources");

        let summaries = summarize(&rows);
        tracing::debug!(
            run_id = %run_id,
            applications = summaries.len(),
            "Summarized applications"
        );

        let mut statistics = RunStatistics::from_outputs(&rows, &summaries);
        statistics.acl_rows_in = acl.len();
        statistics.iam_rows_in = iam.len();
        statistics.acl_pairs = acl_table.len();
        statistics.iam_pairs = iam_table.len();
        statistics.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let report = ReportGenerator::generate(
            run_id,
            self.config.comparison,
            acl_mapping,
            iam_mapping,
            statistics,
            &summaries,
            self.config.top_mismatches,
        );

        tracing::info!(
            run_id = %run_id,
            rows = report.statistics.reconciled_rows,
            applications = report.statistics.applications,
            matched = report.statistics.matched,
            mismatched = report.statistics.mismatched,
            one_sided = report.statistics.one_sided(),
            duration_ms = report.statistics.duration_ms,
            "Access reconciliation completed"
        );

        Ok(ReconciliationOutcome {
            rows,
            summaries,
            report,
        })
    }
}
