//! Activity log repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use filetrail_core::result::AppResult;
use filetrail_core::types::{ActivityId, FileId, UserId};
use filetrail_entity::activity::{ActivityEntry, NewActivity};

use crate::error::map_db_error;
use crate::store::ActivityStore;

/// Repository for the append-only file activity log.
#[derive(Debug, Clone)]
pub struct ActivityRepository {
    pool: PgPool,
}

impl ActivityRepository {
    /// Create a new activity repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityStore for ActivityRepository {
    async fn record(&self, entry: &NewActivity, at: DateTime<Utc>) -> AppResult<ActivityEntry> {
        sqlx::query_as::<_, ActivityEntry>(
            "INSERT INTO file_activity (id, file_id, user_id, action, details, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(ActivityId::new())
        .bind(entry.file_id)
        .bind(entry.user_id)
        .bind(entry.action.as_str())
        .bind(&entry.details)
        .bind(at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to record activity", e))
    }

    async fn list_for_file(&self, file_id: FileId, limit: u32) -> AppResult<Vec<ActivityEntry>> {
        sqlx::query_as::<_, ActivityEntry>(
            "SELECT * FROM file_activity WHERE file_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(file_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to list file activity", e))
    }

    async fn list_for_user(&self, user_id: UserId, limit: u32) -> AppResult<Vec<ActivityEntry>> {
        sqlx::query_as::<_, ActivityEntry>(
            "SELECT * FROM file_activity WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to list user activity", e))
    }
}
