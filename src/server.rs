//! Startup wiring: backend selection and the Axum server lifecycle.

use crate::application::services::{LinkService, LinkServiceSettings};
use crate::config::Config;
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::cache::{CacheService, MemoryCache, RedisCache};
use crate::infrastructure::persistence::{MemoryLinkRepository, PgLinkRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Builds the service from the given configuration and serves until a
/// shutdown signal arrives.
///
/// The repository is PostgreSQL when `DATABASE_URL` is set and in-memory
/// otherwise; the cache is Redis when `REDIS_URL` is set and in-process
/// otherwise. Both, plus the link service, are constructed here and injected
/// into the router state; nothing lives in a global.
///
/// # Errors
///
/// Fails when the database cannot be reached or migrated, or the listen
/// address cannot be bound.
pub async fn run(config: Config) -> Result<()> {
    let repository = build_repository(&config).await?;
    let cache = build_cache(&config).await;

    let link_service = Arc::new(LinkService::new(
        repository,
        cache.clone(),
        LinkServiceSettings {
            code_length: config.code_length,
            max_attempts: config.code_max_attempts,
            cache_ttl_seconds: config.cache_ttl_seconds,
        },
    ));

    let state = AppState {
        link_service,
        cache,
    };

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Selects and initializes the link repository.
async fn build_repository(config: &Config) -> Result<Arc<dyn LinkRepository>> {
    let Some(database_url) = &config.database_url else {
        tracing::warn!("DATABASE_URL not set, links will not survive restarts");
        return Ok(Arc::new(MemoryLinkRepository::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(database_url)
        .await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(Arc::new(PgLinkRepository::new(
        Arc::new(pool),
        Duration::from_secs(config.repository_timeout_seconds),
    )))
}

/// Selects and initializes the response cache.
async fn build_cache(config: &Config) -> Arc<dyn CacheService> {
    if let Some(redis_url) = &config.redis_url {
        match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                return Arc::new(redis);
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using in-process cache.", e);
            }
        }
    }

    Arc::new(MemoryCache::new(config.cache_ttl_seconds))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install shutdown signal handler: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}
