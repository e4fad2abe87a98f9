//! CLI error types and exit codes

use thiserror::Error;
use xavyo_access_recon::ReconError;

/// Exit codes for the CLI
/// - 0: Success
/// - 1: General or I/O error
/// - 2: Discrepancies found with --fail-on-mismatch
/// - 3: Schema mismatch (a required column is missing)
/// - 4: Invalid input or configuration
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    SchemaMismatch(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("{0}")]
    Recon(ReconError),

    #[error("Discrepancies found: {mismatched} permission mismatches, {one_sided} one-sided grants")]
    Discrepancies { mismatched: usize, one_sided: usize },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Discrepancies { .. } => 2,
            CliError::SchemaMismatch(_) => 3,
            CliError::Validation(_) | CliError::Config(_) => 4,
            CliError::Io(_) | CliError::Recon(_) => 1,
        }
    }

    /// Print the error to stderr
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {}", self);
        } else {
            eprintln!("Error: {}", self);
        }

        if let Some(suggestion) = self.suggestion() {
            if use_color {
                eprintln!("\n\x1b[33mSuggestion:\x1b[0m {}", suggestion);
            } else {
                eprintln!("\nSuggestion: {}", suggestion);
            }
        }
    }

    /// Get a suggested action for this error
    fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::SchemaMismatch(_) => Some(
                "Check the extract headers, or list the right column names in a --config file. \
                 Run 'xavyo-recon columns' to see the names currently accepted.",
            ),
            CliError::Config(_) => Some("Run 'xavyo-recon columns' to print a valid configuration."),
            _ => None,
        }
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        match err {
            ReconError::SchemaMismatch { .. } => CliError::SchemaMismatch(err.to_string()),
            ReconError::Config(msg) => CliError::Config(msg),
            ReconError::Io(msg) => CliError::Io(msg),
            ReconError::Csv(msg) => CliError::Validation(format!("Malformed CSV: {msg}")),
            other => CliError::Recon(other),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io(err.to_string())
    }
}
