//! xavyo-recon - ACL vs IAM access reconciliation
//!
//! This CLI enables auditors to:
//! - Compare an ACL extract against an IAM / OWNED extract
//! - Export a per-identity reconciled view and a per-application summary
//! - Gate audit pipelines on one-sided grants and permission mismatches

use clap::{Parser, Subcommand};

mod commands;
mod error;
mod logging;

use error::CliResult;

/// xavyo-recon - Access reconciliation between ACL and IAM records
#[derive(Parser)]
#[command(name = "xavyo-recon")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log filter used when RUST_LOG is not set (e.g. "info", "debug")
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile an ACL extract against an IAM extract
    Run(commands::run::RunArgs),

    /// Print the effective column configuration as YAML
    Columns(commands::columns::ColumnsArgs),
}

fn main() {
    // Usage errors exit 4 so that 2 stays reserved for discrepancies.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 4 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let result = run(cli);

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    logging::init_logging(&cli.log_level, cli.log_json)?;

    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Columns(args) => commands::columns::execute(args),
    }
}
