//! Raw source tables.
//!
//! A [`RawTable`] is the opaque, untyped extract handed to the pipeline. Only
//! the three resolved columns are ever read from it.

use std::io::Read;
use std::path::Path;

use crate::error::{ReconError, ReconResult};

/// UTF-8 BOM bytes.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Header row plus data rows of a loaded source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Build a table from in-memory headers and rows.
    #[must_use]
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Build a table from string slices.
    #[must_use]
    pub fn from_records(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self {
            headers: headers.iter().map(|h| (*h).to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| (*c).to_string()).collect())
                .collect(),
        }
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at `index` of `row`. Cells missing from short rows read as empty.
    #[must_use]
    pub fn cell(row: &[String], index: usize) -> &str {
        row.get(index).map_or("", String::as_str)
    }

    /// Parse a delimited extract. Header names are trimmed and a leading
    /// UTF-8 BOM is dropped.
    pub fn from_csv_reader<R: Read>(mut reader: R, delimiter: u8) -> ReconResult<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_csv_bytes(&data, delimiter)
    }

    /// Parse a delimited extract from raw bytes.
    pub fn from_csv_bytes(data: &[u8], delimiter: u8) -> ReconResult<Self> {
        let data = strip_utf8_bom(data);

        if data.is_empty() {
            return Ok(Self::default());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(data);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Load a delimited extract from disk.
    pub fn from_csv_path(path: impl AsRef<Path>, delimiter: u8) -> ReconResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| ReconError::Io(format!("Failed to read {}: {e}", path.display())))?;

        let table = Self::from_csv_bytes(&data, delimiter)?;

        tracing::debug!(
            path = %path.display(),
            columns = table.headers.len(),
            rows = table.rows.len(),
            "Loaded source extract"
        );

        Ok(table)
    }
}

/// Strip UTF-8 BOM from the beginning of data if present.
fn strip_utf8_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(UTF8_BOM).unwrap_or(data)
}
