use std::sync::Arc;

use crate::application::services::LinkService;
use crate::infrastructure::cache::CacheService;

/// Shared application state injected into all handlers.
///
/// Both the service and the cache are constructed once at startup and owned
/// here; there is no process-wide singleton. Multiple instances can coexist,
/// which is what the integration tests do.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub cache: Arc<dyn CacheService>,
}
