//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::{AppError, map_sqlx_error};

#[derive(Debug, sqlx::FromRow)]
struct LinkRow {
    id: i64,
    code: String,
    target_url: String,
    access_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Link {
            id: row.id,
            code: row.code,
            target_url: row.target_url,
            access_count: row.access_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL repository for link storage and retrieval.
///
/// Uses SQLx prepared statements with bound parameters. Every query runs
/// under a bounded timeout; an elapsed timeout surfaces as
/// [`AppError::RepositoryUnavailable`]. Code uniqueness is enforced by the
/// `links_code_key` unique index, which maps to [`AppError::DuplicateCode`].
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
    query_timeout: Duration,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Runs a query future under the configured timeout.
    async fn bounded<T>(
        &self,
        fut: impl Future<Output = Result<T, sqlx::Error>>,
    ) -> Result<T, AppError> {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(result) => result.map_err(map_sqlx_error),
            Err(_) => Err(AppError::repository_unavailable(
                "Repository query timed out",
                json!({ "timeout_ms": self.query_timeout.as_millis() as u64 }),
            )),
        }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let row = self
            .bounded(
                sqlx::query_as::<_, LinkRow>(
                    "INSERT INTO links (code, target_url) VALUES ($1, $2) \
                     RETURNING id, code, target_url, access_count, created_at, updated_at",
                )
                .bind(&new_link.code)
                .bind(&new_link.target_url)
                .fetch_one(self.pool.as_ref()),
            )
            .await?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let row = self
            .bounded(
                sqlx::query_as::<_, LinkRow>(
                    "SELECT id, code, target_url, access_count, created_at, updated_at \
                     FROM links WHERE code = $1",
                )
                .bind(code)
                .fetch_optional(self.pool.as_ref()),
            )
            .await?;

        Ok(row.map(Into::into))
    }

    async fn update_target(
        &self,
        code: &str,
        target_url: &str,
    ) -> Result<Option<Link>, AppError> {
        let row = self
            .bounded(
                sqlx::query_as::<_, LinkRow>(
                    "UPDATE links SET target_url = $2, updated_at = NOW() WHERE code = $1 \
                     RETURNING id, code, target_url, access_count, created_at, updated_at",
                )
                .bind(code)
                .bind(target_url)
                .fetch_optional(self.pool.as_ref()),
            )
            .await?;

        Ok(row.map(Into::into))
    }

    async fn increment_access(&self, code: &str) -> Result<Option<Link>, AppError> {
        let row = self
            .bounded(
                sqlx::query_as::<_, LinkRow>(
                    "UPDATE links SET access_count = access_count + 1, updated_at = NOW() \
                     WHERE code = $1 \
                     RETURNING id, code, target_url, access_count, created_at, updated_at",
                )
                .bind(code)
                .fetch_optional(self.pool.as_ref()),
            )
            .await?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, code: &str) -> Result<bool, AppError> {
        let result = self
            .bounded(
                sqlx::query("DELETE FROM links WHERE code = $1")
                    .bind(code)
                    .execute(self.pool.as_ref()),
            )
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
