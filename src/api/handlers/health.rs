//! Handler for the health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Probes the repository and the cache backend and reports per-component
/// status.
///
/// # Endpoint
///
/// `GET /health`
///
/// Responds 200 when every component answers, 503 with the same body shape
/// when any of them is degraded.
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let repository = if state.link_service.repository_healthy().await {
        CheckStatus::ok()
    } else {
        CheckStatus::failed("Repository query failed")
    };

    let cache = if state.cache.health_check().await {
        CheckStatus::ok()
    } else {
        CheckStatus::failed("Cache backend unreachable")
    };

    let all_healthy = repository.is_ok() && cache.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.into(),
        version: env!("CARGO_PKG_VERSION").into(),
        checks: HealthChecks { repository, cache },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
