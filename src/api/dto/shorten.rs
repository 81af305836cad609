//! DTOs for the link shortening endpoint.

use serde::Deserialize;
use validator::Validate;

/// Request body for `POST /shorten`.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The URL to shorten (well-formedness is checked by the link service).
    #[validate(length(min = 1, message = "URL is required"))]
    pub url: String,
}
