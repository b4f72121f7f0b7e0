//! Access request repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use filetrail_core::result::AppResult;
use filetrail_core::types::{AccessRequestId, FileId, UserId};
use filetrail_entity::access::{AccessRequest, AccessRequestStatus, NewAccessRequest};

use crate::error::map_db_error;
use crate::store::AccessRequestStore;

/// Repository for access requests and their review.
#[derive(Debug, Clone)]
pub struct AccessRequestRepository {
    pool: PgPool,
}

impl AccessRequestRepository {
    /// Create a new access request repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessRequestStore for AccessRequestRepository {
    async fn insert_request(
        &self,
        request: &NewAccessRequest,
        at: DateTime<Utc>,
    ) -> AppResult<AccessRequest> {
        sqlx::query_as::<_, AccessRequest>(
            "INSERT INTO access_requests (id, file_id, requester_id, reason, status, created_at) \
             VALUES ($1, $2, $3, $4, 'pending', $5) RETURNING *",
        )
        .bind(AccessRequestId::new())
        .bind(request.file_id)
        .bind(request.requester_id)
        .bind(&request.reason)
        .bind(at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to create access request", e))
    }

    async fn find_request(&self, id: AccessRequestId) -> AppResult<Option<AccessRequest>> {
        sqlx::query_as::<_, AccessRequest>("SELECT * FROM access_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to find access request", e))
    }

    async fn list_pending(&self) -> AppResult<Vec<AccessRequest>> {
        sqlx::query_as::<_, AccessRequest>(
            "SELECT * FROM access_requests WHERE status = 'pending' ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to list pending access requests", e))
    }

    async fn list_for_file(&self, file_id: FileId) -> AppResult<Vec<AccessRequest>> {
        sqlx::query_as::<_, AccessRequest>(
            "SELECT * FROM access_requests WHERE file_id = $1 ORDER BY created_at DESC",
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to list access requests", e))
    }

    async fn complete_review(
        &self,
        id: AccessRequestId,
        status: AccessRequestStatus,
        reviewer: UserId,
        at: DateTime<Utc>,
    ) -> AppResult<Option<AccessRequest>> {
        sqlx::query_as::<_, AccessRequest>(
            "UPDATE access_requests SET status = $2, reviewed_by = $3, reviewed_at = $4 \
             WHERE id = $1 AND status = 'pending' RETURNING *",
        )
        .bind(id)
        .bind(status)
        .bind(reviewer)
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to review access request", e))
    }
}
