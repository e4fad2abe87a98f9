//! Aggregator: one row per (application, identity) pair within a source.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Deref;

use crate::types::{AggregatedGrant, CanonicalGrant, GrantKey, SourceKind};

/// Separator placed between joined permissions.
pub const PERMISSION_SEPARATOR: &str = "; ";

/// Aggregated grants of a single source, unique and sorted by key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedTable {
    source: SourceKind,
    grants: BTreeMap<GrantKey, AggregatedGrant>,
}

impl AggregatedTable {
    /// Empty table for a source.
    #[must_use]
    pub fn empty(source: SourceKind) -> Self {
        Self {
            source,
            grants: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn source(&self) -> SourceKind {
        self.source
    }

    /// Caller-facing name of the joined-permission column.
    #[must_use]
    pub fn permission_column(&self) -> &'static str {
        self.source.permission_column()
    }

    #[must_use]
    pub fn get(&self, key: &GrantKey) -> Option<&AggregatedGrant> {
        self.grants.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &GrantKey) -> bool {
        self.grants.contains_key(key)
    }

    /// Grants in (application, identity) order.
    pub fn iter(&self) -> impl Iterator<Item = &AggregatedGrant> + '_ {
        self.grants.values()
    }

    /// Keys in (application, identity) order.
    pub fn keys(&self) -> impl Iterator<Item = &GrantKey> + '_ {
        self.grants.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.grants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

/// Aggregated ACL grants. Only [`aggregate_acl`] builds one, so the
/// reconciler can never receive the sides swapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclTable(AggregatedTable);

/// Aggregated IAM grants, built by [`aggregate_iam`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IamTable(AggregatedTable);

impl Deref for AclTable {
    type Target = AggregatedTable;

    fn deref(&self) -> &AggregatedTable {
        &self.0
    }
}

impl Deref for IamTable {
    type Target = AggregatedTable;

    fn deref(&self) -> &AggregatedTable {
        &self.0
    }
}

/// Aggregate the ACL side.
#[must_use]
pub fn aggregate_acl(grants: &[CanonicalGrant]) -> AclTable {
    AclTable(aggregate(grants, SourceKind::Acl))
}

/// Aggregate the IAM side.
#[must_use]
pub fn aggregate_iam(grants: &[CanonicalGrant]) -> IamTable {
    IamTable(aggregate(grants, SourceKind::Iam))
}

/// Group grants by (application, identity) and join their distinct
/// non-blank permissions in byte-wise ascending order.
///
/// Input order never affects the output. A pair whose permissions are all
/// empty still yields a row, with an empty joined string.
#[must_use]
pub fn aggregate(grants: &[CanonicalGrant], source: SourceKind) -> AggregatedTable {
    let mut groups: BTreeMap<GrantKey, BTreeSet<&str>> = BTreeMap::new();

    for grant in grants {
        let permissions = groups.entry(grant.key()).or_default();
        if !grant.permission.trim().is_empty() {
            permissions.insert(grant.permission.as_str());
        }
    }

    let rows_in = grants.len();
    let grants: BTreeMap<GrantKey, AggregatedGrant> = groups
        .into_iter()
        .map(|(key, permissions)| {
            let row = AggregatedGrant {
                application: key.application.clone(),
                identity: key.identity.clone(),
                permission_joined: permissions
                    .into_iter()
                    .collect::<Vec<_>>()
                    .join(PERMISSION_SEPARATOR),
                present: true,
            };
            (key, row)
        })
        .collect();

    tracing::debug!(
        source = %source,
        rows_in,
        pairs = grants.len(),
        column = source.permission_column(),
        "Aggregated grants per application and identity"
    );

    AggregatedTable { source, grants }
}
