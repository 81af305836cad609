//! Persistence contract for link records.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Storage contract the link service programs against.
///
/// The repository is the final authority on code uniqueness: `create`
/// atomically rejects a duplicate code and never overwrites. Timestamps are
/// owned by the implementation, which keeps `updated_at >= created_at` true
/// for every record it hands out.
///
/// Implemented by [`PgLinkRepository`] and [`MemoryLinkRepository`]; a
/// `mockall` mock is generated for unit tests.
///
/// [`PgLinkRepository`]: crate::infrastructure::persistence::PgLinkRepository
/// [`MemoryLinkRepository`]: crate::infrastructure::persistence::MemoryLinkRepository
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Creates a new link with `access_count = 0`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateCode`] if the short code is already taken.
    /// Returns [`AppError::RepositoryUnavailable`] on backend timeout or
    /// connection failure, [`AppError::Internal`] on other backend errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Looks a link up by short code; `Ok(None)` when no record matches.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Replaces the target URL and refreshes `updated_at`.
    ///
    /// Returns `Ok(None)` if no link matches the code.
    async fn update_target(&self, code: &str, target_url: &str)
    -> Result<Option<Link>, AppError>;

    /// Atomically increments the access counter and refreshes `updated_at`.
    ///
    /// This is the only operation that may move the counter, and it only
    /// moves it upward. Returns the post-increment record, or `Ok(None)` if
    /// the code does not exist.
    async fn increment_access(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Removes a link.
    ///
    /// Returns `Ok(true)` if the link was found and deleted, `Ok(false)` if
    /// not found.
    async fn delete(&self, code: &str) -> Result<bool, AppError>;
}
