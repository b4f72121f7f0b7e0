//! Engagement service: single-row writes that feed file stats.

use std::sync::Arc;

use tracing::info;

use filetrail_core::error::AppError;
use filetrail_core::result::AppResult;
use filetrail_core::traits::Clock;
use filetrail_core::types::{CommentId, FileId};
use filetrail_database::store::{EngagementStore, FileStore};
use filetrail_entity::activity::ActivityAction;
use filetrail_entity::engagement::{
    Comment, DownloadRecord, NewComment, NewDownload, NewReaction, Reaction, ReactionCount,
};

use crate::activity::ActivityService;
use crate::context::RequestContext;
use crate::file::require_file;

/// Records user engagement with files.
#[derive(Clone)]
pub struct EngagementService {
    /// File store.
    files: Arc<dyn FileStore>,
    /// Engagement store.
    engagement: Arc<dyn EngagementStore>,
    /// Activity log.
    activity: Arc<ActivityService>,
    /// Time source.
    clock: Arc<dyn Clock>,
}

impl EngagementService {
    /// Creates a new engagement service.
    pub fn new(
        files: Arc<dyn FileStore>,
        engagement: Arc<dyn EngagementStore>,
        activity: Arc<ActivityService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            files,
            engagement,
            activity,
            clock,
        }
    }

    /// Comment on a file, optionally replying to another comment.
    pub async fn add_comment(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        content: &str,
        parent_id: Option<CommentId>,
    ) -> AppResult<Comment> {
        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::validation("Comment content is required"));
        }
        require_file(self.files.as_ref(), file_id).await?;

        if let Some(parent_id) = parent_id {
            let parent = self
                .engagement
                .find_comment(parent_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Comment {parent_id} not found")))?;
            if parent.file_id != file_id {
                return Err(AppError::validation("Reply must be on the same file"));
            }
        }

        let comment = self
            .engagement
            .insert_comment(
                &NewComment {
                    file_id,
                    user_id: ctx.user_id,
                    content: content.to_string(),
                    parent_id,
                },
                self.clock.now(),
            )
            .await?;

        info!(user_id = %ctx.user_id, file_id = %file_id, comment_id = %comment.id, "Comment added");
        self.activity
            .log(file_id, Some(ctx.user_id), ActivityAction::CommentAdded, "")
            .await;

        Ok(comment)
    }

    /// Comments on a file, oldest first.
    pub async fn list_comments(&self, file_id: FileId) -> AppResult<Vec<Comment>> {
        self.engagement.list_comments(file_id).await
    }

    /// Delete a comment and its replies.
    pub async fn delete_comment(&self, ctx: &RequestContext, comment_id: CommentId) -> AppResult<()> {
        if !self.engagement.delete_comment(comment_id).await? {
            return Err(AppError::not_found(format!("Comment {comment_id} not found")));
        }
        info!(user_id = %ctx.user_id, comment_id = %comment_id, "Comment deleted");
        Ok(())
    }

    /// React to a file. Reacting twice with the same emoji is a no-op.
    pub async fn add_reaction(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        emoji: &str,
    ) -> AppResult<Reaction> {
        let emoji = emoji.trim();
        if emoji.is_empty() {
            return Err(AppError::validation("Emoji is required"));
        }
        require_file(self.files.as_ref(), file_id).await?;

        self.engagement
            .insert_reaction(
                &NewReaction {
                    file_id,
                    user_id: ctx.user_id,
                    emoji: emoji.to_string(),
                },
                self.clock.now(),
            )
            .await
    }

    /// Withdraw a reaction. Returns whether one existed.
    pub async fn remove_reaction(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        emoji: &str,
    ) -> AppResult<bool> {
        let emoji = emoji.trim();
        if emoji.is_empty() {
            return Err(AppError::validation("Emoji is required"));
        }
        self.engagement
            .delete_reaction(file_id, ctx.user_id, emoji)
            .await
    }

    /// Reaction counts per emoji, most used first.
    pub async fn reaction_summary(&self, file_id: FileId) -> AppResult<Vec<ReactionCount>> {
        self.engagement.reaction_counts(file_id).await
    }

    /// Log a download by the acting user.
    pub async fn record_download(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
    ) -> AppResult<DownloadRecord> {
        require_file(self.files.as_ref(), file_id).await?;
        self.engagement
            .insert_download(
                file_id,
                &NewDownload {
                    user_id: Some(ctx.user_id),
                    ip_address: ctx.ip_address.clone(),
                    user_agent: ctx.user_agent.clone(),
                },
                self.clock.now(),
            )
            .await
    }
}
