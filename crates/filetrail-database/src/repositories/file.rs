//! File repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use filetrail_core::result::AppResult;
use filetrail_core::types::{FileId, WorkspaceId};
use filetrail_entity::file::{File, FileContent};

use crate::error::map_db_error;
use crate::store::{FileLocation, FileStore};

/// Repository for file records.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileStore for FileRepository {
    async fn find_file(&self, id: FileId) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to find file", e))
    }

    async fn set_content(
        &self,
        id: FileId,
        content: &FileContent,
        at: DateTime<Utc>,
    ) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET storage_key = $2, size_bytes = $3, checksum = $4, updated_at = $5 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&content.storage_key)
        .bind(content.size_bytes)
        .bind(&content.checksum)
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to update file content", e))
    }

    async fn set_deleted_at(
        &self,
        id: FileId,
        deleted_at: Option<DateTime<Utc>>,
        at: DateTime<Utc>,
    ) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET deleted_at = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(deleted_at)
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to update trash marker", e))
    }

    async fn relocate(
        &self,
        id: FileId,
        location: FileLocation,
        at: DateTime<Utc>,
    ) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET channel_id = COALESCE($2, channel_id), \
             workspace_id = COALESCE($3, workspace_id), updated_at = $4 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(location.channel_id)
        .bind(location.workspace_id)
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to move file", e))
    }

    async fn list_trashed(&self, workspace_id: WorkspaceId) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE workspace_id = $1 AND deleted_at IS NOT NULL \
             ORDER BY deleted_at DESC",
        )
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to list trash", e))
    }

    async fn find_by_checksum(&self, checksum: &str, exclude: FileId) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE checksum = $1 AND id <> $2 ORDER BY created_at",
        )
        .bind(checksum)
        .bind(exclude)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to find duplicates", e))
    }
}
