//! Activity entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use filetrail_core::types::{ActivityId, FileId, UserId};

/// Actions recorded in the activity feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    /// A version was created.
    VersionCreated,
    /// A version was restored onto the file.
    VersionRestored,
    /// A version was deleted.
    VersionDeleted,
    /// Old versions were pruned.
    VersionsPruned,
    /// A share link was created.
    LinkCreated,
    /// A share link was consumed.
    LinkAccessed,
    /// A share link was revoked.
    LinkRevoked,
    /// A permission was granted.
    PermissionGranted,
    /// A permission was revoked.
    PermissionRevoked,
    /// Access was requested.
    AccessRequested,
    /// An access request was reviewed.
    AccessReviewed,
    /// The file was moved to the trash.
    FileTrashed,
    /// The file was restored from the trash.
    FileRestored,
    /// The file changed channel or workspace.
    FileMoved,
    /// A comment was added.
    CommentAdded,
}

impl ActivityAction {
    /// Return the action as a string for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VersionCreated => "version_created",
            Self::VersionRestored => "version_restored",
            Self::VersionDeleted => "version_deleted",
            Self::VersionsPruned => "versions_pruned",
            Self::LinkCreated => "link_created",
            Self::LinkAccessed => "link_accessed",
            Self::LinkRevoked => "link_revoked",
            Self::PermissionGranted => "permission_granted",
            Self::PermissionRevoked => "permission_revoked",
            Self::AccessRequested => "access_requested",
            Self::AccessReviewed => "access_reviewed",
            Self::FileTrashed => "file_trashed",
            Self::FileRestored => "file_restored",
            Self::FileMoved => "file_moved",
            Self::CommentAdded => "comment_added",
        }
    }
}

impl std::fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ActivityEntry {
    /// Unique entry identifier.
    pub id: ActivityId,
    /// The file acted on.
    pub file_id: FileId,
    /// The acting user (None for anonymous link access).
    pub user_id: Option<UserId>,
    /// The action, as stored (see [`ActivityAction::as_str`]).
    pub action: String,
    /// Free-form detail, e.g. the restored version number.
    pub details: String,
    /// When it happened.
    pub created_at: DateTime<Utc>,
}

/// Data required to record an activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewActivity {
    /// The file acted on.
    pub file_id: FileId,
    /// The acting user.
    pub user_id: Option<UserId>,
    /// The action.
    pub action: ActivityAction,
    /// Free-form detail.
    pub details: String,
}

impl NewActivity {
    /// Build an activity for a file.
    pub fn new(
        file_id: FileId,
        user_id: Option<UserId>,
        action: ActivityAction,
        details: impl Into<String>,
    ) -> Self {
        Self {
            file_id,
            user_id,
            action,
            details: details.into(),
        }
    }
}
