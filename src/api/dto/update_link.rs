//! DTO for the link update endpoint.

use serde::Deserialize;
use validator::Validate;

/// Request body for `PUT /shorten/{code}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    /// New destination URL for this link.
    #[validate(length(min = 1, message = "URL is required"))]
    pub url: String,
}
