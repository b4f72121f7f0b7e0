//! Aggregate queries.

use async_trait::async_trait;
use sqlx::PgPool;

use filetrail_core::result::AppResult;
use filetrail_core::types::{FileId, WorkspaceId};
use filetrail_entity::stats::{FileStats, QuotaTotals};

use crate::error::map_db_error;
use crate::store::StatsStore;

/// Repository for read-only aggregates over files.
#[derive(Debug, Clone)]
pub struct StatsRepository {
    pool: PgPool,
}

impl StatsRepository {
    /// Create a new stats repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatsStore for StatsRepository {
    async fn quota_totals(&self, workspace_id: WorkspaceId) -> AppResult<QuotaTotals> {
        // Both figures come from one statement so they share a snapshot.
        sqlx::query_as::<_, QuotaTotals>(
            "SELECT COALESCE(SUM(size_bytes), 0)::BIGINT AS total_size, COUNT(*) AS file_count \
             FROM files WHERE workspace_id = $1 AND deleted_at IS NULL",
        )
        .bind(workspace_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to compute workspace usage", e))
    }

    async fn file_stats(&self, file_id: FileId) -> AppResult<FileStats> {
        sqlx::query_as::<_, FileStats>(
            "SELECT \
                 (SELECT COUNT(*) FROM file_downloads WHERE file_id = $1) AS downloads, \
                 (SELECT COUNT(*) FROM file_reactions WHERE file_id = $1) AS reactions, \
                 (SELECT COUNT(*) FROM file_comments WHERE file_id = $1) AS comments, \
                 (SELECT COUNT(*) FROM file_versions WHERE file_id = $1) AS versions",
        )
        .bind(file_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to compute file stats", e))
    }
}
