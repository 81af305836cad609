#![allow(dead_code)]

use std::sync::Arc;

use shortly::application::services::{LinkService, LinkServiceSettings};
use shortly::domain::entities::{Link, NewLink};
use shortly::domain::repositories::LinkRepository;
use shortly::infrastructure::cache::{CacheService, MemoryCache, NullCache};
use shortly::infrastructure::persistence::MemoryLinkRepository;
use shortly::state::AppState;

/// Builds an application state over in-memory storage with the response
/// cache enabled. Use for tests that exercise cache behavior.
pub fn create_test_state() -> (AppState, Arc<MemoryLinkRepository>) {
    build_state(Arc::new(MemoryCache::new(30)))
}

/// Builds an application state with caching disabled, so every read reaches
/// the repository. Use for tests that assert exact access counts.
pub fn create_test_state_uncached() -> (AppState, Arc<MemoryLinkRepository>) {
    build_state(Arc::new(NullCache::new()))
}

fn build_state(cache: Arc<dyn CacheService>) -> (AppState, Arc<MemoryLinkRepository>) {
    let repository = Arc::new(MemoryLinkRepository::new());

    let link_service = Arc::new(LinkService::new(
        repository.clone(),
        cache.clone(),
        LinkServiceSettings::default(),
    ));

    let state = AppState {
        link_service,
        cache,
    };

    (state, repository)
}

/// Inserts a link with a known code directly through the repository.
pub async fn create_test_link(
    repository: &dyn LinkRepository,
    code: &str,
    url: &str,
) -> Link {
    repository
        .create(NewLink {
            code: code.to_string(),
            target_url: url.to_string(),
        })
        .await
        .unwrap()
}
