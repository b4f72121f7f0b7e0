//! Comment, reaction and download repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use filetrail_core::result::AppResult;
use filetrail_core::types::{CommentId, DownloadId, FileId, ReactionId, UserId};
use filetrail_entity::engagement::{
    Comment, DownloadRecord, NewComment, NewDownload, NewReaction, Reaction, ReactionCount,
};

use crate::error::map_db_error;
use crate::store::EngagementStore;

/// Repository for user engagement with files.
#[derive(Debug, Clone)]
pub struct EngagementRepository {
    pool: PgPool,
}

impl EngagementRepository {
    /// Create a new engagement repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EngagementStore for EngagementRepository {
    async fn insert_comment(&self, comment: &NewComment, at: DateTime<Utc>) -> AppResult<Comment> {
        sqlx::query_as::<_, Comment>(
            "INSERT INTO file_comments (id, file_id, user_id, content, parent_id, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(CommentId::new())
        .bind(comment.file_id)
        .bind(comment.user_id)
        .bind(&comment.content)
        .bind(comment.parent_id)
        .bind(at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to add comment", e))
    }

    async fn find_comment(&self, id: CommentId) -> AppResult<Option<Comment>> {
        sqlx::query_as::<_, Comment>("SELECT * FROM file_comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to find comment", e))
    }

    async fn list_comments(&self, file_id: FileId) -> AppResult<Vec<Comment>> {
        sqlx::query_as::<_, Comment>(
            "SELECT * FROM file_comments WHERE file_id = $1 ORDER BY created_at",
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to list comments", e))
    }

    async fn delete_comment(&self, id: CommentId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM file_comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to delete comment", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_reaction(
        &self,
        reaction: &NewReaction,
        at: DateTime<Utc>,
    ) -> AppResult<Reaction> {
        let inserted = sqlx::query_as::<_, Reaction>(
            "INSERT INTO file_reactions (id, file_id, user_id, emoji, created_at) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (file_id, user_id, emoji) DO NOTHING RETURNING *",
        )
        .bind(ReactionId::new())
        .bind(reaction.file_id)
        .bind(reaction.user_id)
        .bind(&reaction.emoji)
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to add reaction", e))?;

        if let Some(inserted) = inserted {
            return Ok(inserted);
        }

        sqlx::query_as::<_, Reaction>(
            "SELECT * FROM file_reactions WHERE file_id = $1 AND user_id = $2 AND emoji = $3",
        )
        .bind(reaction.file_id)
        .bind(reaction.user_id)
        .bind(&reaction.emoji)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to load existing reaction", e))
    }

    async fn delete_reaction(
        &self,
        file_id: FileId,
        user_id: UserId,
        emoji: &str,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM file_reactions WHERE file_id = $1 AND user_id = $2 AND emoji = $3",
        )
        .bind(file_id)
        .bind(user_id)
        .bind(emoji)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to remove reaction", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn reaction_counts(&self, file_id: FileId) -> AppResult<Vec<ReactionCount>> {
        sqlx::query_as::<_, ReactionCount>(
            "SELECT emoji, COUNT(*) AS count FROM file_reactions WHERE file_id = $1 \
             GROUP BY emoji ORDER BY count DESC, emoji",
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to summarize reactions", e))
    }

    async fn insert_download(
        &self,
        file_id: FileId,
        download: &NewDownload,
        at: DateTime<Utc>,
    ) -> AppResult<DownloadRecord> {
        sqlx::query_as::<_, DownloadRecord>(
            "INSERT INTO file_downloads (id, file_id, user_id, ip_address, user_agent, \
             downloaded_at) VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(DownloadId::new())
        .bind(file_id)
        .bind(download.user_id)
        .bind(&download.ip_address)
        .bind(&download.user_agent)
        .bind(at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to record download", e))
    }
}
