//! Link creation, resolution, and lifecycle service.

use std::sync::Arc;

use crate::application::services::CodeAllocator;
use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, lookup_with_cache};
use crate::utils::url_validator::validate_target_url;
use serde_json::json;

/// Probe code used by health checks; outside the generated alphabet so it can
/// never collide with a live link.
const HEALTH_PROBE_CODE: &str = "__health__";

/// Tunables for the link service.
#[derive(Debug, Clone)]
pub struct LinkServiceSettings {
    /// Length of generated short codes.
    pub code_length: usize,
    /// Allocation attempt ceiling before reporting capacity exhaustion.
    pub max_attempts: usize,
    /// TTL for cached read responses.
    pub cache_ttl_seconds: u64,
}

impl Default for LinkServiceSettings {
    fn default() -> Self {
        Self {
            code_length: 6,
            max_attempts: 10,
            cache_ttl_seconds: 30,
        }
    }
}

/// Service orchestrating code allocation, persistence, and the response cache.
///
/// Read paths (`resolve_link`, `get_stats`) go through the cache; resolve and
/// stats entries are keyed independently, mirroring how the endpoints cache
/// separately. A cached resolve holds the post-increment snapshot, so repeated
/// resolutions within the TTL serve the cached record without moving the
/// counter. Write paths invalidate both entries for the code before
/// returning, so a caller that has seen a successful write can never read the
/// pre-write payload back.
pub struct LinkService {
    repository: Arc<dyn LinkRepository>,
    cache: Arc<dyn CacheService>,
    allocator: CodeAllocator,
    cache_ttl_seconds: u64,
}

fn resolve_key(code: &str) -> String {
    format!("resolve:{}", code)
}

fn stats_key(code: &str) -> String {
    format!("stats:{}", code)
}

fn validated(target_url: &str) -> Result<String, AppError> {
    validate_target_url(target_url)
        .map_err(|e| AppError::invalid_url("Invalid URL format", json!({ "reason": e.to_string() })))
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(
        repository: Arc<dyn LinkRepository>,
        cache: Arc<dyn CacheService>,
        settings: LinkServiceSettings,
    ) -> Self {
        Self {
            repository,
            cache,
            allocator: CodeAllocator::new(settings.code_length, settings.max_attempts),
            cache_ttl_seconds: settings.cache_ttl_seconds,
        }
    }

    /// Creates a short link for a target URL.
    ///
    /// Allocates an unused code via [`CodeAllocator`] and inserts the record.
    /// If the insert loses a race on the candidate code, the conflict is
    /// absorbed and allocation restarts with a fresh candidate, up to the
    /// configured attempt ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidUrl`] for a missing or malformed URL and
    /// [`AppError::CapacityExhausted`] when no unused code could be claimed.
    pub async fn create_link(&self, target_url: &str) -> Result<Link, AppError> {
        let target_url = validated(target_url)?;

        for _ in 0..self.allocator.max_attempts() {
            let code = self.allocator.allocate(self.repository.as_ref()).await?;

            match self
                .repository
                .create(NewLink {
                    code,
                    target_url: target_url.clone(),
                })
                .await
            {
                Ok(link) => {
                    metrics::counter!("links_created_total").increment(1);
                    tracing::info!(code = %link.code, "Short link created");
                    return Ok(link);
                }
                Err(AppError::DuplicateCode { .. }) => {
                    // Lost the insert race on this candidate; pick a new one.
                    metrics::counter!("code_insert_conflicts_total").increment(1);
                    tracing::debug!("Short code insert conflict, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::capacity_exhausted(
            "Failed to allocate a unique short code",
            json!({ "attempts": self.allocator.max_attempts() }),
        ))
    }

    /// Resolves a short code to its record, counting the access.
    ///
    /// A cache hit returns the cached snapshot without touching the
    /// repository or the counter. On a miss the counter is incremented, the
    /// post-increment snapshot is cached, and the record is returned.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code.
    pub async fn resolve_link(&self, code: &str) -> Result<Link, AppError> {
        let key = resolve_key(code);

        lookup_with_cache(self.cache.as_ref(), &key, self.cache_ttl_seconds, || async {
            self.repository
                .increment_access(code)
                .await?
                .ok_or_else(|| {
                    AppError::not_found("Short link not found", json!({ "code": code }))
                })
        })
        .await
    }

    /// Returns the record including its access count, without counting.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code.
    pub async fn get_stats(&self, code: &str) -> Result<Link, AppError> {
        let key = stats_key(code);

        lookup_with_cache(self.cache.as_ref(), &key, self.cache_ttl_seconds, || async {
            self.repository.find_by_code(code).await?.ok_or_else(|| {
                AppError::not_found("Short link not found", json!({ "code": code }))
            })
        })
        .await
    }

    /// Replaces the target URL of an existing link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidUrl`] for a malformed URL and
    /// [`AppError::NotFound`] if the code does not exist.
    pub async fn update_link(&self, code: &str, target_url: &str) -> Result<Link, AppError> {
        let target_url = validated(target_url)?;

        let link = self
            .repository
            .update_target(code, &target_url)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))?;

        self.invalidate_cached(code).await;
        tracing::info!(code, "Short link updated");

        Ok(link)
    }

    /// Deletes a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code does not exist.
    pub async fn delete_link(&self, code: &str) -> Result<(), AppError> {
        let deleted = self.repository.delete(code).await?;

        if !deleted {
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "code": code }),
            ));
        }

        self.invalidate_cached(code).await;
        tracing::info!(code, "Short link deleted");

        Ok(())
    }

    /// Resolves a code and returns the destination URL for redirecting.
    ///
    /// Counter and cache behavior are identical to [`Self::resolve_link`].
    pub async fn redirect_target(&self, code: &str) -> Result<String, AppError> {
        let link = self.resolve_link(code).await?;
        Ok(link.target_url)
    }

    /// Reports whether the backing repository answers queries.
    pub async fn repository_healthy(&self) -> bool {
        self.repository.find_by_code(HEALTH_PROBE_CODE).await.is_ok()
    }

    /// Drops both cached read entries for a code. Runs before the write's
    /// response is returned, so a completed write is never masked by a stale
    /// cached payload.
    async fn invalidate_cached(&self, code: &str) {
        for key in [resolve_key(code), stats_key(code)] {
            if let Err(e) = self.cache.invalidate(&key).await {
                tracing::error!(error = %e, key, "Failed to invalidate cache after write");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::infrastructure::cache::{MemoryCache, NullCache};
    use chrono::Utc;
    use mockall::Sequence;

    fn test_link(code: &str, url: &str, access_count: i64) -> Link {
        Link {
            id: 10,
            code: code.to_string(),
            target_url: url.to_string(),
            access_count,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service(repo: MockLinkRepository, cache: Arc<dyn CacheService>) -> LinkService {
        LinkService::new(Arc::new(repo), cache, LinkServiceSettings::default())
    }

    #[tokio::test]
    async fn test_create_link_success() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(1).returning(|_| Ok(None));
        repo.expect_create().times(1).returning(|new_link| {
            let now = Utc::now();
            Ok(Link {
                id: 10,
                code: new_link.code,
                target_url: new_link.target_url,
                access_count: 0,
                created_at: now,
                updated_at: now,
            })
        });

        let service = service(repo, Arc::new(NullCache::new()));
        let link = service.create_link("https://example.com").await.unwrap();

        assert_eq!(link.target_url, "https://example.com");
        assert_eq!(link.access_count, 0);
        assert_eq!(link.code.len(), 6);
        assert!(link.code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[tokio::test]
    async fn test_create_link_rejects_invalid_urls() {
        for input in ["", "   ", "not a url", "ftp://example.com/file"] {
            let repo = MockLinkRepository::new();
            let service = service(repo, Arc::new(NullCache::new()));

            let err = service.create_link(input).await.unwrap_err();
            assert!(
                matches!(err, AppError::InvalidUrl { .. }),
                "expected InvalidUrl for {:?}",
                input
            );
        }
    }

    #[tokio::test]
    async fn test_create_link_retries_after_insert_conflict() {
        let mut repo = MockLinkRepository::new();
        let mut seq = Sequence::new();

        repo.expect_find_by_code().times(2).returning(|_| Ok(None));
        repo.expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Err(AppError::duplicate_code(
                    "Short code already exists",
                    json!({}),
                ))
            });
        repo.expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|new_link| {
                let now = Utc::now();
                Ok(Link {
                    id: 11,
                    code: new_link.code,
                    target_url: new_link.target_url,
                    access_count: 0,
                    created_at: now,
                    updated_at: now,
                })
            });

        let service = service(repo, Arc::new(NullCache::new()));
        assert!(service.create_link("https://example.com").await.is_ok());
    }

    #[tokio::test]
    async fn test_create_link_capacity_exhausted_when_codespace_full() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .returning(|code| Ok(Some(test_link(code, "https://taken.example", 0))));
        repo.expect_create().times(0);

        let service = service(repo, Arc::new(NullCache::new()));
        let err = service.create_link("https://example.com").await.unwrap_err();

        assert!(matches!(err, AppError::CapacityExhausted { .. }));
    }

    #[tokio::test]
    async fn test_resolve_link_increments_on_miss_then_serves_from_cache() {
        let mut repo = MockLinkRepository::new();
        repo.expect_increment_access()
            .times(1)
            .returning(|code| Ok(Some(test_link(code, "https://example.com", 1))));

        let service = service(repo, Arc::new(MemoryCache::new(30)));

        let first = service.resolve_link("abc123").await.unwrap();
        assert_eq!(first.access_count, 1);

        // Second resolve hits the cached post-increment snapshot; the single
        // expected increment_access call above proves the repository is not
        // touched again.
        let second = service.resolve_link("abc123").await.unwrap();
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn test_resolve_link_cache_hit_skips_repository() {
        let mut repo = MockLinkRepository::new();
        repo.expect_increment_access().times(0);

        let cache = Arc::new(MemoryCache::new(30));
        let cached = test_link("abc123", "https://example.com", 7);
        cache
            .set(
                "resolve:abc123",
                &serde_json::to_string(&cached).unwrap(),
                None,
            )
            .await
            .unwrap();

        let service = service(repo, cache);
        let link = service.resolve_link("abc123").await.unwrap();

        assert_eq!(link, cached);
    }

    #[tokio::test]
    async fn test_resolve_link_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_increment_access().times(1).returning(|_| Ok(None));

        let service = service(repo, Arc::new(NullCache::new()));
        let err = service.resolve_link("nope42").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_stats_never_increments() {
        let mut repo = MockLinkRepository::new();
        repo.expect_increment_access().times(0);
        repo.expect_find_by_code()
            .times(1)
            .returning(|code| Ok(Some(test_link(code, "https://example.com", 5))));

        let service = service(repo, Arc::new(MemoryCache::new(30)));

        let first = service.get_stats("abc123").await.unwrap();
        let second = service.get_stats("abc123").await.unwrap();

        assert_eq!(first.access_count, 5);
        assert_eq!(second.access_count, 5);
    }

    #[tokio::test]
    async fn test_get_stats_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(1).returning(|_| Ok(None));

        let service = service(repo, Arc::new(NullCache::new()));
        let err = service.get_stats("nope42").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_link_rejects_invalid_url() {
        let repo = MockLinkRepository::new();
        let service = service(repo, Arc::new(NullCache::new()));

        let err = service.update_link("abc123", "nope").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_update_link_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_update_target()
            .times(1)
            .returning(|_, _| Ok(None));

        let service = service(repo, Arc::new(NullCache::new()));
        let err = service
            .update_link("nope42", "https://example.org")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_link_invalidates_cached_reads() {
        let mut repo = MockLinkRepository::new();
        let mut seq = Sequence::new();

        repo.expect_increment_access()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|code| Ok(Some(test_link(code, "https://example.com", 1))));
        repo.expect_update_target()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|code, url| Ok(Some(test_link(code, url, 1))));
        repo.expect_increment_access()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|code| Ok(Some(test_link(code, "https://example.org", 2))));

        let service = service(repo, Arc::new(MemoryCache::new(30)));

        // Warm the resolve cache with the original destination.
        let before = service.resolve_link("abc123").await.unwrap();
        assert_eq!(before.target_url, "https://example.com");

        service
            .update_link("abc123", "https://example.org")
            .await
            .unwrap();

        // The cached entry must not mask the write.
        let after = service.resolve_link("abc123").await.unwrap();
        assert_eq!(after.target_url, "https://example.org");
    }

    #[tokio::test]
    async fn test_delete_link_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_delete().times(1).returning(|_| Ok(false));

        let service = service(repo, Arc::new(NullCache::new()));
        let err = service.delete_link("nope42").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_link_invalidates_cached_reads() {
        let mut repo = MockLinkRepository::new();
        let mut seq = Sequence::new();

        repo.expect_increment_access()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|code| Ok(Some(test_link(code, "https://example.com", 1))));
        repo.expect_delete()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(true));
        repo.expect_increment_access()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));

        let service = service(repo, Arc::new(MemoryCache::new(30)));

        service.resolve_link("abc123").await.unwrap();
        service.delete_link("abc123").await.unwrap();

        let err = service.resolve_link("abc123").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_redirect_target_returns_destination() {
        let mut repo = MockLinkRepository::new();
        repo.expect_increment_access()
            .times(1)
            .returning(|code| Ok(Some(test_link(code, "https://example.com/page", 1))));

        let service = service(repo, Arc::new(NullCache::new()));
        let target = service.redirect_target("abc123").await.unwrap();

        assert_eq!(target, "https://example.com/page");
    }
}
