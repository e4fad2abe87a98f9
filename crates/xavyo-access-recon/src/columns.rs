//! Source column resolution.
//!
//! Each source lists, per canonical field, the header names it may use. The
//! candidates are resolved once against the loaded headers, before any core
//! stage runs. The first candidate present wins; a field with no candidate
//! present is a [`ReconError::SchemaMismatch`].

use serde::{Deserialize, Serialize};

use crate::error::{ReconError, ReconResult};
use crate::types::{ColumnField, SourceKind};

/// Ordered candidate header names for each canonical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnCandidates {
    pub application: Vec<String>,
    pub identity: Vec<String>,
    pub permission: Vec<String>,
}

impl ColumnCandidates {
    /// Build candidates from string slices.
    #[must_use]
    pub fn new(application: &[&str], identity: &[&str], permission: &[&str]) -> Self {
        let owned = |names: &[&str]| names.iter().map(|n| (*n).to_string()).collect();
        Self {
            application: owned(application),
            identity: owned(identity),
            permission: owned(permission),
        }
    }

    /// Column names of the application ACL extract.
    #[must_use]
    pub fn acl_defaults() -> Self {
        Self::new(
            &["USCB Owned Applications"],
            &["User_Unique_ID"],
            &["Application_Profile_Name", "Application_Profile_name"],
        )
    }

    /// Column names of the IAM / OWNED extract.
    #[must_use]
    pub fn iam_defaults() -> Self {
        Self::new(
            &["REQUEST_WORKFLOW_NAME"],
            &["BRID"],
            &["PERMISSION_OR_PROFILE_NAME"],
        )
    }

    /// Default candidates for a source.
    #[must_use]
    pub fn defaults_for(source: SourceKind) -> Self {
        match source {
            SourceKind::Acl => Self::acl_defaults(),
            SourceKind::Iam => Self::iam_defaults(),
        }
    }

    /// Candidates configured for one field.
    #[must_use]
    pub fn for_field(&self, field: ColumnField) -> &[String] {
        match field {
            ColumnField::Application => &self.application,
            ColumnField::Identity => &self.identity,
            ColumnField::Permission => &self.permission,
        }
    }

    /// Resolve every field against the headers of a loaded source.
    pub fn resolve(&self, source: SourceKind, headers: &[String]) -> ReconResult<ColumnMapping> {
        let application = self.resolve_field(source, ColumnField::Application, headers)?;
        let identity = self.resolve_field(source, ColumnField::Identity, headers)?;
        let permission = self.resolve_field(source, ColumnField::Permission, headers)?;

        tracing::debug!(
            source = %source,
            application = %application.name,
            identity = %identity.name,
            permission = %permission.name,
            "Resolved source columns"
        );

        Ok(ColumnMapping {
            source,
            application,
            identity,
            permission,
        })
    }

    fn resolve_field(
        &self,
        source: SourceKind,
        field: ColumnField,
        headers: &[String],
    ) -> ReconResult<ResolvedColumn> {
        let candidates = self.for_field(field);

        candidates
            .iter()
            .find_map(|candidate| {
                headers
                    .iter()
                    .position(|h| h == candidate)
                    .map(|index| ResolvedColumn {
                        name: candidate.clone(),
                        index,
                    })
            })
            .ok_or_else(|| ReconError::SchemaMismatch {
                source_kind: source,
                field,
                candidates: candidates.to_vec(),
                available: headers.to_vec(),
            })
    }
}

/// A header chosen for a field, with its position in the source rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedColumn {
    pub name: String,
    pub index: usize,
}

/// Resolved column positions for one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub source: SourceKind,
    pub application: ResolvedColumn,
    pub identity: ResolvedColumn,
    pub permission: ResolvedColumn,
}

impl ColumnMapping {
    /// Resolved column for one field.
    #[must_use]
    pub fn column(&self, field: ColumnField) -> &ResolvedColumn {
        match field {
            ColumnField::Application => &self.application,
            ColumnField::Identity => &self.identity,
            ColumnField::Permission => &self.permission,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn test_resolve_acl_defaults() {
        let h = headers(&[
            "Region",
            "USCB Owned Applications",
            "User_Unique_ID",
            "Application_Profile_Name",
        ]);

        let mapping = ColumnCandidates::acl_defaults()
            .resolve(SourceKind::Acl, &h)
            .unwrap();

        assert_eq!(mapping.source, SourceKind::Acl);
        assert_eq!(mapping.application.index, 1);
        assert_eq!(mapping.identity.index, 2);
        assert_eq!(mapping.permission.name, "Application_Profile_Name");
        assert_eq!(mapping.permission.index, 3);
    }

    #[test]
    fn test_resolve_falls_back_to_later_candidate() {
        let h = headers(&[
            "USCB Owned Applications",
            "User_Unique_ID",
            "Application_Profile_name",
        ]);

        let mapping = ColumnCandidates::acl_defaults()
            .resolve(SourceKind::Acl, &h)
            .unwrap();

        assert_eq!(mapping.permission.name, "Application_Profile_name");
        assert_eq!(mapping.column(ColumnField::Permission).index, 2);
    }

    #[test]
    fn test_resolve_prefers_first_candidate_when_both_present() {
        let h = headers(&[
            "Application_Profile_name",
            "USCB Owned Applications",
            "User_Unique_ID",
            "Application_Profile_Name",
        ]);

        let mapping = ColumnCandidates::acl_defaults()
            .resolve(SourceKind::Acl, &h)
            .unwrap();

        assert_eq!(mapping.permission.name, "Application_Profile_Name");
        assert_eq!(mapping.permission.index, 3);
    }

    #[test]
    fn test_resolve_missing_column_is_schema_mismatch() {
        let h = headers(&["REQUEST_WORKFLOW_NAME", "PERMISSION_OR_PROFILE_NAME"]);

        let err = ColumnCandidates::iam_defaults()
            .resolve(SourceKind::Iam, &h)
            .unwrap_err();

        match err {
            ReconError::SchemaMismatch {
                source_kind,
                field,
                candidates,
                available,
            } => {
                assert_eq!(source_kind, SourceKind::Iam);
                assert_eq!(field, ColumnField::Identity);
                assert_eq!(candidates, vec!["BRID".to_string()]);
                assert_eq!(available, h);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_is_case_sensitive_on_headers() {
        let h = headers(&["request_workflow_name", "BRID", "PERMISSION_OR_PROFILE_NAME"]);
        let err = ColumnCandidates::iam_defaults()
            .resolve(SourceKind::Iam, &h)
            .unwrap_err();
        assert!(err.is_schema_mismatch());
    }

    #[test]
    fn test_defaults_for_source() {
        assert_eq!(
            ColumnCandidates::defaults_for(SourceKind::Iam),
            ColumnCandidates::iam_defaults()
        );
        assert_eq!(
            ColumnCandidates::defaults_for(SourceKind::Acl).for_field(ColumnField::Identity),
            ["User_Unique_ID".to_string()]
        );
    }
}
