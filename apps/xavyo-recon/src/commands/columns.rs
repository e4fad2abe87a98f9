//! Columns command: print the effective configuration.

use clap::Args;
use std::path::PathBuf;

use crate::commands::load_config;
use crate::error::CliResult;

/// Print the effective column candidates and comparison settings as YAML
///
/// The output is a valid configuration file and can be edited and passed
/// back with --config.
#[derive(Args, Debug)]
pub struct ColumnsArgs {
    /// Configuration file to merge over the defaults
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Execute the columns command
pub fn execute(args: ColumnsArgs) -> CliResult<()> {
    let config = load_config(args.config.as_deref())?;
    print!("{}", config.to_yaml()?);
    Ok(())
}
