//! File version repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use filetrail_core::error::AppError;
use filetrail_core::result::AppResult;
use filetrail_core::types::{FileId, VersionId};
use filetrail_entity::file::FileVersion;

use crate::error::map_db_error;
use crate::store::{NewVersion, VersionStore};

/// Repository for the version history of files.
#[derive(Debug, Clone)]
pub struct VersionRepository {
    pool: PgPool,
}

impl VersionRepository {
    /// Create a new version repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VersionStore for VersionRepository {
    async fn insert_next(
        &self,
        version: &NewVersion,
        at: DateTime<Utc>,
    ) -> AppResult<FileVersion> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_db_error("Failed to begin version transaction", e))?;

        // Bumping the per-file counter locks the file row for the rest of the
        // transaction. The counter is never lowered, so numbers are not reused.
        let next: i32 = sqlx::query_scalar(
            "UPDATE files SET last_version_num = last_version_num + 1 \
             WHERE id = $1 RETURNING last_version_num",
        )
        .bind(version.file_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_db_error("Failed to allocate version number", e))?
        .ok_or_else(|| AppError::not_found(format!("File {} not found", version.file_id)))?;

        let created = sqlx::query_as::<_, FileVersion>(
            "INSERT INTO file_versions (id, file_id, version_num, storage_key, size_bytes, \
             checksum, uploaded_by, comment, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(VersionId::new())
        .bind(version.file_id)
        .bind(next)
        .bind(&version.content.storage_key)
        .bind(version.content.size_bytes)
        .bind(&version.content.checksum)
        .bind(version.uploaded_by)
        .bind(&version.comment)
        .bind(at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_db_error("Failed to create version", e))?;

        tx.commit()
            .await
            .map_err(|e| map_db_error("Failed to commit version", e))?;

        Ok(created)
    }

    async fn find_version(&self, id: VersionId) -> AppResult<Option<FileVersion>> {
        sqlx::query_as::<_, FileVersion>("SELECT * FROM file_versions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to find version", e))
    }

    async fn list_versions(&self, file_id: FileId) -> AppResult<Vec<FileVersion>> {
        sqlx::query_as::<_, FileVersion>(
            "SELECT * FROM file_versions WHERE file_id = $1 ORDER BY version_num DESC",
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to list versions", e))
    }

    async fn delete_version(&self, id: VersionId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM file_versions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to delete version", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn prune_versions(&self, file_id: FileId, keep: u32) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM file_versions WHERE file_id = $1 AND id NOT IN ( \
                 SELECT id FROM file_versions WHERE file_id = $1 \
                 ORDER BY version_num DESC LIMIT $2)",
        )
        .bind(file_id)
        .bind(i64::from(keep))
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to prune versions", e))?;
        Ok(result.rows_affected())
    }
}
