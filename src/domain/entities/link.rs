//! The link record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One short-code-to-URL mapping, as stored.
///
/// Serde derives are present because the read endpoints cache whole-record
/// snapshots, not just the destination URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Repository-assigned identifier. Immutable after creation.
    pub id: i64,
    /// The short code. Unique across all live records, immutable.
    pub code: String,
    /// Destination URL. The only caller-mutable field.
    pub target_url: String,
    /// Number of successful resolutions/redirects. Never decreases.
    pub access_count: i64,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation, including access-count increments.
    pub updated_at: DateTime<Utc>,
}

/// What the service hands the repository to insert; everything else on
/// [`Link`] is assigned by the repository.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub code: String,
    pub target_url: String,
}
