//! File comment entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use filetrail_core::types::{CommentId, FileId, UserId};

/// A comment on a file, optionally replying to another comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Comment {
    /// Unique comment identifier.
    pub id: CommentId,
    /// The file commented on.
    pub file_id: FileId,
    /// The author.
    pub user_id: UserId,
    /// Comment body.
    pub content: String,
    /// Parent comment for threaded replies.
    pub parent_id: Option<CommentId>,
    /// When the comment was posted.
    pub created_at: DateTime<Utc>,
}

/// Data required to post a comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    /// The file.
    pub file_id: FileId,
    /// The author.
    pub user_id: UserId,
    /// Comment body.
    pub content: String,
    /// Parent comment.
    pub parent_id: Option<CommentId>,
}
