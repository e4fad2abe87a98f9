//! Run command: reconcile an ACL extract against an IAM extract.
//!
//! # Usage
//!
//! ```bash
//! xavyo-recon run --acl acl.csv --iam owned.csv --out-dir out/
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use xavyo_access_recon::export::{export_reconciled, export_report, export_summary, REPORT_FILE_NAME};
use xavyo_access_recon::{
    OutputFormat, PermissionComparison, ReconResult, ReconciliationEngine, ReconciliationOutcome,
};

use crate::commands::load_config;
use crate::error::{CliError, CliResult};

/// Output format options for the reconciled view and summary
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum RunOutputFormat {
    /// Comma-separated values (default)
    #[default]
    Csv,
    /// Pretty-printed JSON
    Json,
}

impl From<RunOutputFormat> for OutputFormat {
    fn from(format: RunOutputFormat) -> Self {
        match format {
            RunOutputFormat::Csv => OutputFormat::Csv,
            RunOutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// Reconcile an ACL extract against an IAM extract
///
/// Writes the per-identity reconciled view, the per-application summary and
/// a JSON run report into the output directory.
#[derive(Args, Debug)]
#[command(after_help = "EXIT CODES:
    0  Reconciliation completed
    1  General or I/O error (file not found, unwritable output)
    2  Discrepancies found (only with --fail-on-mismatch)
    3  Schema mismatch (a required column is missing from an extract)
    4  Invalid input or configuration

EXAMPLES:
    # Reconcile with the default column names
    xavyo-recon run --acl acl.csv --iam owned.csv

    # Write JSON into a dedicated directory
    xavyo-recon run --acl acl.csv --iam owned.csv --out-dir out --format json

    # Gate an audit pipeline on a clean result
    xavyo-recon run --acl acl.csv --iam owned.csv --fail-on-mismatch
")]
pub struct RunArgs {
    /// ACL extract (CSV)
    #[arg(long, value_name = "CSV")]
    pub acl: PathBuf,

    /// IAM / OWNED extract (CSV)
    #[arg(long, value_name = "CSV")]
    pub iam: PathBuf,

    /// Directory the outputs are written to
    #[arg(short = 'o', long, value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Format of the reconciled view and summary
    #[arg(short = 'f', long, value_enum, default_value = "csv")]
    pub format: RunOutputFormat,

    /// Configuration file (column candidates, comparison, delimiter)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Compare permissions case-sensitively
    #[arg(long)]
    pub exact_case: bool,

    /// Field delimiter of both extracts, overriding the config
    #[arg(short = 'd', long, value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Exit with code 2 when any grant is one-sided or mismatched
    #[arg(long)]
    pub fail_on_mismatch: bool,
}

/// Execute the run command
pub fn execute(args: RunArgs) -> CliResult<()> {
    let mut config = load_config(args.config.as_deref())?;
    if args.exact_case {
        config = config.with_comparison(PermissionComparison::Exact);
    }
    if let Some(delimiter) = args.delimiter {
        config.delimiter = delimiter;
    }
    config.validate()?;

    for (flag, path) in [("--acl", &args.acl), ("--iam", &args.iam)] {
        if !path.is_file() {
            return Err(CliError::Io(format!(
                "{flag} file not found: {}",
                path.display()
            )));
        }
    }

    let engine = ReconciliationEngine::with_config(config);
    let outcome = engine.run_files(&args.acl, &args.iam)?;

    let format = OutputFormat::from(args.format);
    let written = write_outputs(&outcome, format, &args.out_dir)?;

    print_summary(&outcome, &written);

    let stats = outcome.statistics();
    if args.fail_on_mismatch && stats.has_discrepancies() {
        return Err(CliError::Discrepancies {
            mismatched: stats.mismatched,
            one_sided: stats.one_sided(),
        });
    }

    Ok(())
}

/// Write the three output files and return their paths.
fn write_outputs(
    outcome: &ReconciliationOutcome,
    format: OutputFormat,
    out_dir: &Path,
) -> CliResult<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir).map_err(|e| {
        CliError::Io(format!(
            "Failed to create output directory {}: {e}",
            out_dir.display()
        ))
    })?;

    let reconciled = out_dir.join(format.reconciled_file_name());
    write_file(&reconciled, |w| export_reconciled(&outcome.rows, format, w))?;

    let summary = out_dir.join(format.summary_file_name());
    write_file(&summary, |w| export_summary(&outcome.summaries, format, w))?;

    let report = out_dir.join(REPORT_FILE_NAME);
    write_file(&report, |w| export_report(&outcome.report, w))?;

    tracing::debug!(out_dir = %out_dir.display(), format = %format, "Wrote reconciliation outputs");

    Ok(vec![reconciled, summary, report])
}

fn write_file<F>(path: &Path, write: F) -> CliResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> ReconResult<()>,
{
    let file = File::create(path)
        .map_err(|e| CliError::Io(format!("Failed to create {}: {e}", path.display())))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer)?;
    writer.flush()?;
    Ok(())
}

fn print_summary(outcome: &ReconciliationOutcome, written: &[PathBuf]) {
    let stats = outcome.statistics();

    println!("Reconciliation {}", outcome.report.run_id);
    println!(
        "  ACL:  {} rows, {} grants",
        stats.acl_rows_in, stats.acl_pairs
    );
    println!(
        "  IAM:  {} rows, {} grants",
        stats.iam_rows_in, stats.iam_pairs
    );
    println!(
        "  Rows: {} across {} applications",
        stats.reconciled_rows, stats.applications
    );
    for (status, count) in &stats.rows_by_status {
        println!("    {status:<9} {count}");
    }
    println!(
        "  Permissions: {} matched, {} mismatched ({:.1}% match rate, {})",
        stats.matched,
        stats.mismatched,
        stats.match_rate(),
        outcome.report.comparison
    );

    if !outcome.report.top_mismatched_applications.is_empty() {
        println!("  Most mismatched applications:");
        for app in &outcome.report.top_mismatched_applications {
            println!(
                "    {} ({}/{})",
                app.application, app.n_mismatch, app.total_both
            );
        }
    }

    println!("Wrote:");
    for path in written {
        println!("  {}", path.display());
    }
}
