//! Bounded allocation of unused short codes.

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::generate_code;
use serde_json::json;

/// Allocates short codes that are unused at probe time.
///
/// Generates random candidates and probes the repository until one is free.
/// The probe is an optimization, not a lock: two allocators can hand out the
/// same candidate, and the repository's unique constraint settles the race at
/// insert time. The attempt ceiling turns the otherwise unbounded loop into
/// an explicit [`AppError::CapacityExhausted`] contract.
#[derive(Debug, Clone)]
pub struct CodeAllocator {
    code_length: usize,
    max_attempts: usize,
}

impl CodeAllocator {
    /// Creates an allocator producing codes of `code_length` characters,
    /// giving up after `max_attempts` occupied candidates.
    pub fn new(code_length: usize, max_attempts: usize) -> Self {
        Self {
            code_length,
            max_attempts,
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Returns a candidate code with no existing record at probe time.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CapacityExhausted`] after `max_attempts` occupied
    /// candidates in a row; repository errors propagate unchanged.
    pub async fn allocate(&self, repository: &dyn LinkRepository) -> Result<String, AppError> {
        for _ in 0..self.max_attempts {
            let code = generate_code(self.code_length);

            if repository.find_by_code(&code).await?.is_none() {
                return Ok(code);
            }

            metrics::counter!("code_collisions_total").increment(1);
            tracing::debug!(code, "Short code candidate already taken, retrying");
        }

        Err(AppError::capacity_exhausted(
            "Failed to allocate a unique short code",
            json!({
                "attempts": self.max_attempts,
                "code_length": self.code_length,
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Link;
    use crate::domain::repositories::MockLinkRepository;
    use chrono::Utc;
    use mockall::Sequence;

    fn taken_link(code: &str) -> Link {
        Link {
            id: 1,
            code: code.to_string(),
            target_url: "https://example.com".to_string(),
            access_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_allocate_returns_first_free_candidate() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(1)
            .returning(|_| Ok(None));

        let allocator = CodeAllocator::new(6, 10);
        let code = allocator.allocate(&repo).await.unwrap();

        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[tokio::test]
    async fn test_allocate_retries_past_taken_candidates() {
        let mut repo = MockLinkRepository::new();
        let mut seq = Sequence::new();

        repo.expect_find_by_code()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|code| Ok(Some(taken_link(code))));
        repo.expect_find_by_code()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));

        let allocator = CodeAllocator::new(6, 10);
        assert!(allocator.allocate(&repo).await.is_ok());
    }

    #[tokio::test]
    async fn test_allocate_gives_up_after_ceiling() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(3)
            .returning(|code| Ok(Some(taken_link(code))));

        let allocator = CodeAllocator::new(6, 3);
        let err = allocator.allocate(&repo).await.unwrap_err();

        assert!(matches!(err, AppError::CapacityExhausted { .. }));
    }
}
