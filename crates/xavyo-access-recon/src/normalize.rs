//! Normalizer: raw source rows to canonical grants.
//!
//! Application and identity become join keys (trimmed, whitespace runs
//! collapsed to one space, uppercased). Permissions are only trimmed so
//! their original case survives for display.

use crate::columns::ColumnMapping;
use crate::source::RawTable;
use crate::types::CanonicalGrant;

/// Normalize a value used as a join key.
#[must_use]
pub fn normalize_key(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Normalize a permission value.
#[must_use]
pub fn normalize_permission(value: &str) -> String {
    value.trim().to_string()
}

/// Map every row of `table` to a canonical grant using the resolved columns.
///
/// One grant per input row, in input order. Nothing is filtered or merged here.
#[must_use]
pub fn normalize(table: &RawTable, mapping: &ColumnMapping) -> Vec<CanonicalGrant> {
    let grants: Vec<CanonicalGrant> = table
        .rows
        .iter()
        .map(|row| CanonicalGrant {
            application: normalize_key(RawTable::cell(row, mapping.application.index)),
            identity: normalize_key(RawTable::cell(row, mapping.identity.index)),
            permission: normalize_permission(RawTable::cell(row, mapping.permission.index)),
        })
        .collect();

    tracing::debug!(
        source = %mapping.source,
        rows = grants.len(),
        "Normalized source rows"
    );

    grants
}
