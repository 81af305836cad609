//! Handler for the link shortening endpoint.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::link::LinkResponse;
use crate::api::dto::shorten::ShortenRequest;
use crate::error::AppError;
use crate::state::AppState;

/// `POST /shorten` — creates a short link.
///
/// Accepts `{ "url": "https://example.com/some/long/path" }` and responds
/// `201 Created` with the stored record:
///
/// ```json
/// {
///   "id": 1,
///   "url": "https://example.com/some/long/path",
///   "short_code": "aZ3kQ9",
///   "created_at": "2026-01-01T00:00:00Z",
///   "updated_at": "2026-01-01T00:00:00Z"
/// }
/// ```
///
/// A missing or malformed URL is a 400 with code `invalid_url`.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state.link_service.create_link(&payload.url).await?;

    Ok((StatusCode::CREATED, Json(link.into())))
}
