//! DTOs for link create/read/update responses.

use crate::domain::entities::Link;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// JSON representation of a link returned by create, read, and update.
///
/// The access counter is deliberately absent; it is only exposed through the
/// stats endpoint.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: i64,
    pub url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            url: link.target_url,
            short_code: link.code,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}
