//! Type definitions for the access reconciliation domain.
//!
//! Includes the source and column enums, the per-stage row types and the
//! diff status classification.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Sources and columns
// ============================================================================

/// Which access-control record a table was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SourceKind {
    /// The application ACL extract.
    Acl,
    /// The IAM / OWNED access extract.
    Iam,
}

impl SourceKind {
    /// Name of the joined-permission column produced for this source.
    #[must_use]
    pub fn permission_column(self) -> &'static str {
        match self {
            Self::Acl => "ACL_permission",
            Self::Iam => "IAM_permission",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Acl => write!(f, "ACL"),
            Self::Iam => write!(f, "IAM"),
        }
    }
}

/// Canonical field extracted from every raw source row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnField {
    Application,
    Identity,
    Permission,
}

impl ColumnField {
    /// All fields in extraction order.
    pub const ALL: [ColumnField; 3] = [Self::Application, Self::Identity, Self::Permission];
}

impl fmt::Display for ColumnField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Application => write!(f, "application"),
            Self::Identity => write!(f, "identity"),
            Self::Permission => write!(f, "permission"),
        }
    }
}

// ============================================================================
// Rows
// ============================================================================

/// Join key shared by every stage. Orders by application, then identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GrantKey {
    pub application: String,
    pub identity: String,
}

impl GrantKey {
    #[must_use]
    pub fn new(application: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            application: application.into(),
            identity: identity.into(),
        }
    }
}

/// One normalized permission grant. Several grants may share a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalGrant {
    /// Uppercased, whitespace-collapsed application name.
    pub application: String,
    /// Uppercased, whitespace-collapsed identity (BRID).
    pub identity: String,
    /// Trimmed permission, case preserved.
    pub permission: String,
}

impl CanonicalGrant {
    /// Join key of this grant.
    #[must_use]
    pub fn key(&self) -> GrantKey {
        GrantKey::new(self.application.clone(), self.identity.clone())
    }
}

/// One row per (application, identity) pair within a single source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedGrant {
    pub application: String,
    pub identity: String,
    /// Sorted, de-duplicated non-empty permissions joined with `"; "`.
    pub permission_joined: String,
    /// Always true: absence is represented by the pair missing from the table.
    pub present: bool,
}

impl AggregatedGrant {
    #[must_use]
    pub fn key(&self) -> GrantKey {
        GrantKey::new(self.application.clone(), self.identity.clone())
    }
}

/// Presence classification of a reconciled pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiffStatus {
    /// Present in both sources.
    Both,
    /// Present only in the ACL source.
    AclOnly,
    /// Present only in the IAM source.
    IamOnly,
    /// Present in neither. Not produced by a join, kept for completeness.
    None,
}

impl DiffStatus {
    /// All statuses in priority order.
    pub const ALL: [DiffStatus; 4] = [Self::Both, Self::AclOnly, Self::IamOnly, Self::None];

    /// Classify a pair from its presence flags.
    #[must_use]
    pub fn classify(in_acl: bool, in_iam: bool) -> Self {
        match (in_acl, in_iam) {
            (true, true) => Self::Both,
            (true, false) => Self::AclOnly,
            (false, true) => Self::IamOnly,
            (false, false) => Self::None,
        }
    }

    /// Whether the pair is missing from one side.
    #[must_use]
    pub fn is_one_sided(self) -> bool {
        matches!(self, Self::AclOnly | Self::IamOnly)
    }
}

impl fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Both => write!(f, "BOTH"),
            Self::AclOnly => write!(f, "ACL_ONLY"),
            Self::IamOnly => write!(f, "IAM_ONLY"),
            Self::None => write!(f, "NONE"),
        }
    }
}

impl FromStr for DiffStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BOTH" => Ok(Self::Both),
            "ACL_ONLY" => Ok(Self::AclOnly),
            "IAM_ONLY" => Ok(Self::IamOnly),
            "NONE" => Ok(Self::None),
            other => Err(format!("Unknown diff status: {other}")),
        }
    }
}

/// Row-level comparison of one (application, identity) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledRow {
    pub application: String,
    pub identity: String,
    pub in_acl: bool,
    pub in_iam: bool,
    /// `in_acl && in_iam`.
    pub both: bool,
    pub diff_status: DiffStatus,
    /// Joined ACL permissions, `None` when the pair is absent from the ACL source.
    #[serde(rename = "ACL_permission")]
    pub acl_permission: Option<String>,
    /// Joined IAM permissions, `None` when the pair is absent from the IAM source.
    #[serde(rename = "IAM_permission")]
    pub iam_permission: Option<String>,
    /// True iff `both` and the permissions compare equal. Never true when one-sided.
    pub matched: bool,
}

impl ReconciledRow {
    #[must_use]
    pub fn key(&self) -> GrantKey {
        GrantKey::new(self.application.clone(), self.identity.clone())
    }

    /// Present on both sides with differing permissions.
    #[must_use]
    pub fn is_mismatch(&self) -> bool {
        self.both && !self.matched
    }
}

/// Application-level coverage and match statistics.
///
/// Field order is the audit export order: identity counts, match
/// statistics, then the raw identity sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSummary {
    pub application: String,
    pub n_acl_identities: usize,
    pub n_iam_identities: usize,
    pub n_both_identities: usize,
    pub n_acl_only: usize,
    pub n_iam_only: usize,
    /// Reconciled rows for this application present in both sources.
    pub total_both: usize,
    /// Of `total_both`, rows whose permissions matched.
    pub n_matched: usize,
    /// `total_both - n_matched`.
    pub n_mismatch: usize,
    pub acl_identities: BTreeSet<String>,
    pub iam_identities: BTreeSet<String>,
    pub both_identities: BTreeSet<String>,
    pub acl_only_identities: BTreeSet<String>,
    pub iam_only_identities: BTreeSet<String>,
}

// ============================================================================
// Comparison policy
// ============================================================================

/// How joined permission strings are compared across sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionComparison {
    /// Trim and lowercase both sides before comparing.
    #[default]
    CaseInsensitive,
    /// Trim both sides, compare byte for byte.
    Exact,
}

impl PermissionComparison {
    /// Compare two joined permission strings under this policy.
    #[must_use]
    pub fn matches(self, left: &str, right: &str) -> bool {
        let (left, right) = (left.trim(), right.trim());
        match self {
            Self::CaseInsensitive => left.to_lowercase() == right.to_lowercase(),
            Self::Exact => left == right,
        }
    }
}

impl fmt::Display for PermissionComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CaseInsensitive => write!(f, "case_insensitive"),
            Self::Exact => write!(f, "exact"),
        }
    }
}
