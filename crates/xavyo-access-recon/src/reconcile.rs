//! Reconciler: full outer join of the two aggregated sources.
//!
//! Every key present in either table yields exactly one row. A one-sided
//! row carries `None` for the missing side's permissions and is never
//! `matched`.

use std::collections::BTreeSet;

use crate::aggregate::{AclTable, IamTable};
use crate::types::{AggregatedGrant, DiffStatus, GrantKey, PermissionComparison, ReconciledRow};

/// Join the ACL and IAM tables on (application, identity).
///
/// Output is sorted by (application, identity) with a stable sort.
#[must_use]
pub fn reconcile(
    acl: &AclTable,
    iam: &IamTable,
    comparison: PermissionComparison,
) -> Vec<ReconciledRow> {
    let keys: BTreeSet<&GrantKey> = acl.keys().chain(iam.keys()).collect();

    let mut rows: Vec<ReconciledRow> = keys
        .into_iter()
        .map(|key| reconcile_pair(key, acl.get(key), iam.get(key), comparison))
        .collect();

    rows.sort_by(|a, b| {
        (a.application.as_str(), a.identity.as_str())
            .cmp(&(b.application.as_str(), b.identity.as_str()))
    });

    tracing::debug!(
        acl_pairs = acl.len(),
        iam_pairs = iam.len(),
        rows = rows.len(),
        comparison = %comparison,
        "Reconciled ACL and IAM grants"
    );

    rows
}

/// Build the reconciled row for one key from whichever sides hold it.
#[must_use]
pub fn reconcile_pair(
    key: &GrantKey,
    acl: Option<&AggregatedGrant>,
    iam: Option<&AggregatedGrant>,
    comparison: PermissionComparison,
) -> ReconciledRow {
    let acl = acl.filter(|g| g.present);
    let iam = iam.filter(|g| g.present);

    let in_acl = acl.is_some();
    let in_iam = iam.is_some();
    let both = in_acl && in_iam;

    let acl_permission = acl.map(|g| g.permission_joined.clone());
    let iam_permission = iam.map(|g| g.permission_joined.clone());

    ReconciledRow {
        application: key.application.clone(),
        identity: key.identity.clone(),
        in_acl,
        in_iam,
        both,
        diff_status: DiffStatus::classify(in_acl, in_iam),
        matched: permissions_match(
            both,
            acl_permission.as_deref(),
            iam_permission.as_deref(),
            comparison,
        ),
        acl_permission,
        iam_permission,
    }
}

/// `false` unless both sides hold the pair; absent sides compare as empty.
#[must_use]
pub fn permissions_match(
    both: bool,
    acl_permission: Option<&str>,
    iam_permission: Option<&str>,
    comparison: PermissionComparison,
) -> bool {
    both && comparison.matches(acl_permission.unwrap_or(""), iam_permission.unwrap_or(""))
}
