//! Share link repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use filetrail_core::result::AppResult;
use filetrail_core::types::{FileId, ShareLinkId};
use filetrail_entity::share::{NewShareLink, ShareLink};

use crate::error::map_db_error;
use crate::store::ShareLinkStore;

/// Repository for share link CRUD, token lookup and view accounting.
#[derive(Debug, Clone)]
pub struct ShareLinkRepository {
    pool: PgPool,
}

impl ShareLinkRepository {
    /// Create a new share link repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShareLinkStore for ShareLinkRepository {
    async fn insert_link(&self, link: &NewShareLink, at: DateTime<Utc>) -> AppResult<ShareLink> {
        sqlx::query_as::<_, ShareLink>(
            "INSERT INTO share_links (id, file_id, token, created_by, expires_at, max_views, \
             views, password_hash, is_active, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, 0, $7, TRUE, $8) RETURNING *",
        )
        .bind(ShareLinkId::new())
        .bind(link.file_id)
        .bind(&link.token)
        .bind(link.created_by)
        .bind(link.expires_at)
        .bind(link.max_views)
        .bind(&link.password_hash)
        .bind(at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to create share link", e))
    }

    async fn find_link(&self, id: ShareLinkId) -> AppResult<Option<ShareLink>> {
        sqlx::query_as::<_, ShareLink>("SELECT * FROM share_links WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to find share link", e))
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<ShareLink>> {
        sqlx::query_as::<_, ShareLink>("SELECT * FROM share_links WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to find share link by token", e))
    }

    async fn list_for_file(&self, file_id: FileId) -> AppResult<Vec<ShareLink>> {
        sqlx::query_as::<_, ShareLink>(
            "SELECT * FROM share_links WHERE file_id = $1 ORDER BY created_at DESC",
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to list share links", e))
    }

    async fn deactivate(&self, id: ShareLinkId) -> AppResult<bool> {
        let result = sqlx::query("UPDATE share_links SET is_active = FALSE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to revoke share link", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn consume(&self, id: ShareLinkId, now: DateTime<Utc>) -> AppResult<Option<ShareLink>> {
        sqlx::query_as::<_, ShareLink>(
            "UPDATE share_links SET views = views + 1 \
             WHERE id = $1 AND is_active = TRUE \
               AND (expires_at IS NULL OR expires_at > $2) \
               AND (max_views = 0 OR views < max_views) \
             RETURNING *",
        )
        .bind(id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to record share link view", e))
    }
}
