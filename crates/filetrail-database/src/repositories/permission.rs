//! Permission grant repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use filetrail_core::result::AppResult;
use filetrail_core::types::{FileId, PermissionId, UserId};
use filetrail_entity::permission::{NewPermission, Permission};

use crate::error::map_db_error;
use crate::store::PermissionStore;

/// Repository for explicit per-user file grants.
#[derive(Debug, Clone)]
pub struct PermissionRepository {
    pool: PgPool,
}

impl PermissionRepository {
    /// Create a new permission repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionStore for PermissionRepository {
    async fn insert_permission(
        &self,
        grant: &NewPermission,
        at: DateTime<Utc>,
    ) -> AppResult<Permission> {
        sqlx::query_as::<_, Permission>(
            "INSERT INTO file_permissions (id, file_id, user_id, permission, granted_by, \
             expires_at, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(PermissionId::new())
        .bind(grant.file_id)
        .bind(grant.user_id)
        .bind(grant.permission)
        .bind(grant.granted_by)
        .bind(grant.expires_at)
        .bind(at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to grant permission", e))
    }

    async fn find_permission(&self, id: PermissionId) -> AppResult<Option<Permission>> {
        sqlx::query_as::<_, Permission>("SELECT * FROM file_permissions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to find permission", e))
    }

    async fn delete_permission(&self, id: PermissionId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM file_permissions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to revoke permission", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_for_file(&self, file_id: FileId) -> AppResult<Vec<Permission>> {
        sqlx::query_as::<_, Permission>(
            "SELECT * FROM file_permissions WHERE file_id = $1 ORDER BY created_at",
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to list permissions", e))
    }

    async fn list_for_user(
        &self,
        file_id: FileId,
        user_id: UserId,
    ) -> AppResult<Vec<Permission>> {
        sqlx::query_as::<_, Permission>(
            "SELECT * FROM file_permissions WHERE file_id = $1 AND user_id = $2",
        )
        .bind(file_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to list user permissions", e))
    }
}
