//! File reaction entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use filetrail_core::types::{FileId, ReactionId, UserId};

/// An emoji reaction by a user on a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Reaction {
    /// Unique reaction identifier.
    pub id: ReactionId,
    /// The file.
    pub file_id: FileId,
    /// The reacting user.
    pub user_id: UserId,
    /// The emoji.
    pub emoji: String,
    /// When the reaction was added.
    pub created_at: DateTime<Utc>,
}

/// Data required to add a reaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReaction {
    /// The file.
    pub file_id: FileId,
    /// The reacting user.
    pub user_id: UserId,
    /// The emoji.
    pub emoji: String,
}

/// Number of reactions per emoji.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ReactionCount {
    /// The emoji.
    pub emoji: String,
    /// How many users reacted with it.
    pub count: i64,
}
