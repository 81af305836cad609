//! Handler for link statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /shorten/{code}/stats` — the link plus its access counter.
///
/// Reading stats never moves the counter. Stats responses are cached under
/// their own key, separate from resolve responses for the same code.
pub async fn stats_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, AppError> {
    let link = state.link_service.get_stats(&code).await?;
    Ok(Json(link.into()))
}
