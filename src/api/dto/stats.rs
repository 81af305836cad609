//! DTO for link statistics.

use crate::domain::entities::Link;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Statistics for a specific short link: the link metadata plus its raw
/// access counter.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub id: i64,
    pub url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub access_count: i64,
}

impl From<Link> for StatsResponse {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            url: link.target_url,
            short_code: link.code,
            created_at: link.created_at,
            updated_at: link.updated_at,
            access_count: link.access_count,
        }
    }
}
