//! Error types for access reconciliation.

use thiserror::Error;

use crate::types::{ColumnField, SourceKind};

/// Result type for reconciliation operations.
pub type ReconResult<T> = Result<T, ReconError>;

/// Errors that can occur while loading sources or running a reconciliation.
///
/// Only [`ReconError::SchemaMismatch`] and the loading/config variants are
/// reachable from a well-formed run: the core stages themselves are total.
#[derive(Debug, Error)]
pub enum ReconError {
    /// None of the candidate header names for a required field exists in the source.
    #[error(
        "{source_kind} source is missing a {field} column: expected one of [{}], found [{}]",
        .candidates.join(", "),
        .available.join(", ")
    )]
    SchemaMismatch {
        source_kind: SourceKind,
        field: ColumnField,
        candidates: Vec<String>,
        available: Vec<String>,
    },

    /// CSV decoding or encoding error.
    #[error("CSV error: {0}")]
    Csv(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ReconError {
    /// Whether this error was raised by column resolution.
    #[must_use]
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(self, Self::SchemaMismatch { .. })
    }
}

impl From<csv::Error> for ReconError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

impl From<std::io::Error> for ReconError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ReconError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
