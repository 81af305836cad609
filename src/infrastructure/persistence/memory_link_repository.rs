//! In-process implementation of the link repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// In-memory repository backed by a DashMap keyed on short code.
///
/// DashMap's sharded locks let unrelated codes proceed concurrently, and the
/// entry API makes create an atomic check-and-insert, so racing creates on
/// the same code see exactly one winner. Used when no database is configured,
/// and as the repository backend in integration tests.
pub struct MemoryLinkRepository {
    links: DashMap<String, Link>,
    next_id: AtomicI64,
}

impl MemoryLinkRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            links: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryLinkRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        match self.links.entry(new_link.code) {
            Entry::Occupied(slot) => Err(AppError::duplicate_code(
                "Short code already exists",
                json!({ "code": slot.key() }),
            )),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let link = Link {
                    id: self.next_id.fetch_add(1, Ordering::Relaxed),
                    code: slot.key().clone(),
                    target_url: new_link.target_url,
                    access_count: 0,
                    created_at: now,
                    updated_at: now,
                };
                slot.insert(link.clone());
                Ok(link)
            }
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.links.get(code).map(|entry| entry.clone()))
    }

    async fn update_target(
        &self,
        code: &str,
        target_url: &str,
    ) -> Result<Option<Link>, AppError> {
        match self.links.get_mut(code) {
            Some(mut entry) => {
                entry.target_url = target_url.to_string();
                entry.updated_at = Utc::now();
                Ok(Some(entry.clone()))
            }
            None => Ok(None),
        }
    }

    async fn increment_access(&self, code: &str) -> Result<Option<Link>, AppError> {
        match self.links.get_mut(code) {
            Some(mut entry) => {
                entry.access_count += 1;
                entry.updated_at = Utc::now();
                Ok(Some(entry.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.links.remove(code).is_some())
    }
}
