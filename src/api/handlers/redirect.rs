//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};

use crate::error::AppError;
use crate::state::AppState;

/// `GET /r/{code}` — sends the client to the destination URL.
///
/// Same counter and cache behavior as a resolve: a cache miss increments the
/// counter, a hit within the TTL does not. The 307 status keeps clients
/// re-querying the short link instead of memoizing the destination.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let target = state.link_service.redirect_target(&code).await?;
    Ok(Redirect::temporary(&target))
}
