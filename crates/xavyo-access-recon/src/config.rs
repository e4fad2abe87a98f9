//! Reconciliation configuration.
//!
//! Every field has a default, so an empty YAML document is a valid config.
//! The configuration is fixed once an engine is built; nothing in it adapts
//! during a run.
//!
//! ```yaml
//! comparison: exact
//! delimiter: ";"
//! acl_columns:
//!   application: ["USCB Owned Applications", "Application"]
//!   identity: ["User_Unique_ID"]
//!   permission: ["Application_Profile_Name", "Application_Profile_name"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::columns::ColumnCandidates;
use crate::error::{ReconError, ReconResult};
use crate::types::{ColumnField, PermissionComparison};

/// Configuration for a reconciliation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconConfig {
    /// Candidate headers of the ACL extract.
    #[serde(default = "ColumnCandidates::acl_defaults")]
    pub acl_columns: ColumnCandidates,
    /// Candidate headers of the IAM / OWNED extract.
    #[serde(default = "ColumnCandidates::iam_defaults")]
    pub iam_columns: ColumnCandidates,
    /// Permission comparison policy.
    #[serde(default)]
    pub comparison: PermissionComparison,
    /// Field delimiter of the source extracts.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Number of applications listed in the report's mismatch ranking.
    #[serde(default = "default_top_mismatches")]
    pub top_mismatches: usize,
}

fn default_delimiter() -> char {
    ','
}

fn default_top_mismatches() -> usize {
    10
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            acl_columns: ColumnCandidates::acl_defaults(),
            iam_columns: ColumnCandidates::iam_defaults(),
            comparison: PermissionComparison::default(),
            delimiter: default_delimiter(),
            top_mismatches: default_top_mismatches(),
        }
    }
}

impl ReconConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> ReconResult<Self> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| ReconError::Config(e.to_string()))?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> ReconResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            ReconError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Render as YAML.
    pub fn to_yaml(&self) -> ReconResult<String> {
        serde_yaml::to_string(self).map_err(|e| ReconError::Serialization(e.to_string()))
    }

    /// Override the comparison policy.
    #[must_use]
    pub fn with_comparison(mut self, comparison: PermissionComparison) -> Self {
        self.comparison = comparison;
        self
    }

    /// Delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> ReconResult<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                ReconError::Config(format!(
                    "Delimiter must be a single ASCII character, got '{}'",
                    self.delimiter
                ))
            })
    }

    /// Reject configurations that cannot resolve any column.
    pub fn validate(&self) -> ReconResult<()> {
        self.delimiter_byte()?;

        let sources = [
            ("acl_columns", &self.acl_columns),
            ("iam_columns", &self.iam_columns),
        ];
        for (source, columns) in sources {
            for field in ColumnField::ALL {
                let candidates = columns.for_field(field);
                if candidates.is_empty() || candidates.iter().any(|c| c.trim().is_empty()) {
                    return Err(ReconError::Config(format!(
                        "{source}.{field} must list at least one non-empty column name"
                    )));
                }
            }
        }

        Ok(())
    }
}
