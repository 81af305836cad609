//! Router configuration.
//!
//! # Route Structure
//!
//! - `POST   /shorten`              - Create a short link
//! - `GET    /shorten/{code}`       - Resolve a short link (counts an access)
//! - `PUT    /shorten/{code}`       - Replace the destination URL
//! - `DELETE /shorten/{code}`       - Delete a short link
//! - `GET    /shorten/{code}/stats` - Link statistics (does not count)
//! - `GET    /r/{code}`             - Redirect to the destination URL
//! - `GET    /health`               - Component health checks

use crate::api::handlers::{
    delete_link_handler, get_link_handler, health_handler, redirect_handler, shorten_handler,
    stats_handler, update_link_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route(
            "/shorten/{code}",
            get(get_link_handler)
                .put(update_link_handler)
                .delete(delete_link_handler),
        )
        .route("/shorten/{code}/stats", get(stats_handler))
        .route("/r/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
}
