/// Upsert/reconciliation store
///
/// Makes repeated syncs idempotent: provider-sourced entities are keyed by
/// the provider's own id, so syncing twice with identical input yields
/// exactly one row per id.
///
/// Get-or-create fixes fields only at creation time. Stores that refresh
/// mutable data on resync do it as an explicit second step (lookup, then
/// unconditional assignment and save); stores that do not are left that way
/// on purpose.
pub mod listings;
pub mod models;
pub mod photos;
pub mod reviews;
pub mod social;

pub use listings::ListingStore;
pub use photos::PhotoStore;
pub use reviews::ReviewStore;
pub use social::SocialStore;

use crate::error::{DeskError, DeskResult};
use chrono::{DateTime, Utc};

/// Parse an RFC 3339 timestamp column
pub(crate) fn parse_stored_timestamp(raw: &str) -> DeskResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DeskError::Internal(format!("Invalid stored timestamp {:?}: {}", raw, e)))
}
