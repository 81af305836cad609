//! Handlers for link retrieval, update, and delete.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::link::LinkResponse;
use crate::api::dto::update_link::UpdateLinkRequest;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /shorten/{code}` — returns the link for a short code.
///
/// Counts as an access. Within the cache TTL repeated reads are served from
/// the cached snapshot and do not move the counter; the staleness window is
/// bounded by the TTL.
pub async fn get_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.resolve_link(&code).await?;
    Ok(Json(link.into()))
}

/// `PUT /shorten/{code}` — replaces the destination URL.
///
/// Body: `{ "url": "https://new-destination.example" }`. The cached resolve
/// and stats entries for the code are gone before the 200 goes out, so a
/// client that saw the update can never read the old destination back.
pub async fn update_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;

    let link = state.link_service.update_link(&code, &payload.url).await?;

    Ok(Json(link.into()))
}

/// `DELETE /shorten/{code}` — removes a link, responding 204 on success.
pub async fn delete_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete_link(&code).await?;
    Ok(StatusCode::NO_CONTENT)
}
