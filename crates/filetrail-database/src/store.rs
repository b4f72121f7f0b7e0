//! Storage contracts used by the engine services.
//!
//! Every trait here is implemented twice: once over PostgreSQL in
//! [`crate::repositories`] and once in memory in [`crate::memory`].
//! Methods that document an atomicity guarantee must hold it under
//! concurrent callers in both implementations.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use filetrail_core::result::AppResult;
use filetrail_core::types::{
    AccessRequestId, ChannelId, CommentId, FileId, PermissionId, ShareLinkId, UserId, VersionId,
    WorkspaceId,
};
use filetrail_entity::access::{AccessRequest, AccessRequestStatus, NewAccessRequest};
use filetrail_entity::activity::{ActivityEntry, NewActivity};
use filetrail_entity::engagement::{
    Comment, DownloadRecord, NewComment, NewDownload, NewReaction, Reaction, ReactionCount,
};
use filetrail_entity::file::{File, FileContent, FileVersion};
use filetrail_entity::permission::{NewPermission, Permission};
use filetrail_entity::share::{NewShareLink, ShareLink};
use filetrail_entity::stats::{FileStats, QuotaTotals};

use crate::memory::MemoryStore;
use crate::repositories::{
    AccessRequestRepository, ActivityRepository, EngagementRepository, FileRepository,
    PermissionRepository, ShareLinkRepository, StatsRepository, VersionRepository,
};

/// Data for a new version; the number is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewVersion {
    /// The file being versioned.
    pub file_id: FileId,
    /// Content captured by the version.
    pub content: FileContent,
    /// Acting user.
    pub uploaded_by: UserId,
    /// Optional free-form note.
    pub comment: Option<String>,
}

/// A partial relocation of a file. `None` leaves the field unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLocation {
    /// Target channel.
    pub channel_id: Option<ChannelId>,
    /// Target workspace.
    pub workspace_id: Option<WorkspaceId>,
}

impl FileLocation {
    /// Whether no field would change.
    pub fn is_empty(&self) -> bool {
        self.channel_id.is_none() && self.workspace_id.is_none()
    }
}

/// File records.
#[async_trait]
pub trait FileStore: Send + Sync + 'static {
    /// Find a file by ID, trashed or not.
    async fn find_file(&self, id: FileId) -> AppResult<Option<File>>;

    /// Overwrite the current content of a file.
    async fn set_content(
        &self,
        id: FileId,
        content: &FileContent,
        at: DateTime<Utc>,
    ) -> AppResult<Option<File>>;

    /// Set or clear the trash marker.
    async fn set_deleted_at(
        &self,
        id: FileId,
        deleted_at: Option<DateTime<Utc>>,
        at: DateTime<Utc>,
    ) -> AppResult<Option<File>>;

    /// Apply a partial relocation.
    async fn relocate(
        &self,
        id: FileId,
        location: FileLocation,
        at: DateTime<Utc>,
    ) -> AppResult<Option<File>>;

    /// Trashed files of a workspace, most recently trashed first.
    async fn list_trashed(&self, workspace_id: WorkspaceId) -> AppResult<Vec<File>>;

    /// Other files carrying `checksum`, including trashed ones.
    async fn find_by_checksum(&self, checksum: &str, exclude: FileId) -> AppResult<Vec<File>>;
}

/// Version history.
#[async_trait]
pub trait VersionStore: Send + Sync + 'static {
    /// Insert a version numbered `max(existing) + 1` for its file.
    ///
    /// Allocation is atomic per file: concurrent callers on the same file
    /// receive distinct numbers. Returns `NotFound` when the file is absent
    /// and `Conflict` when a concurrent writer took the number first.
    async fn insert_next(&self, version: &NewVersion, at: DateTime<Utc>)
    -> AppResult<FileVersion>;

    /// Find a version by ID.
    async fn find_version(&self, id: VersionId) -> AppResult<Option<FileVersion>>;

    /// All versions of a file, newest first.
    async fn list_versions(&self, file_id: FileId) -> AppResult<Vec<FileVersion>>;

    /// Delete a version. Returns whether a row was removed.
    async fn delete_version(&self, id: VersionId) -> AppResult<bool>;

    /// Delete all but the `keep` highest-numbered versions. Returns the count removed.
    async fn prune_versions(&self, file_id: FileId, keep: u32) -> AppResult<u64>;
}

/// Share links.
#[async_trait]
pub trait ShareLinkStore: Send + Sync + 'static {
    /// Insert a new, active link with zero views.
    async fn insert_link(&self, link: &NewShareLink, at: DateTime<Utc>) -> AppResult<ShareLink>;

    /// Find a link by ID.
    async fn find_link(&self, id: ShareLinkId) -> AppResult<Option<ShareLink>>;

    /// Find a link by token, whatever its state.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<ShareLink>>;

    /// All links for a file, newest first.
    async fn list_for_file(&self, file_id: FileId) -> AppResult<Vec<ShareLink>>;

    /// Clear the active flag. Returns whether the link exists.
    async fn deactivate(&self, id: ShareLinkId) -> AppResult<bool>;

    /// Increment `views` iff the link is still usable at `now`.
    ///
    /// The check and the increment are one atomic step, so at most
    /// `max_views` calls ever succeed. Returns the updated link, or `None`
    /// when the link was not usable.
    async fn consume(&self, id: ShareLinkId, now: DateTime<Utc>) -> AppResult<Option<ShareLink>>;
}

/// Explicit per-user grants.
#[async_trait]
pub trait PermissionStore: Send + Sync + 'static {
    /// Insert a grant.
    async fn insert_permission(
        &self,
        grant: &NewPermission,
        at: DateTime<Utc>,
    ) -> AppResult<Permission>;

    /// Find a grant by ID.
    async fn find_permission(&self, id: PermissionId) -> AppResult<Option<Permission>>;

    /// Delete a grant. Returns whether a row was removed.
    async fn delete_permission(&self, id: PermissionId) -> AppResult<bool>;

    /// All grants on a file, oldest first.
    async fn list_for_file(&self, file_id: FileId) -> AppResult<Vec<Permission>>;

    /// Grants held by one user on one file, expired ones included.
    async fn list_for_user(&self, file_id: FileId, user_id: UserId)
    -> AppResult<Vec<Permission>>;
}

/// Access requests.
#[async_trait]
pub trait AccessRequestStore: Send + Sync + 'static {
    /// Insert a pending request.
    async fn insert_request(
        &self,
        request: &NewAccessRequest,
        at: DateTime<Utc>,
    ) -> AppResult<AccessRequest>;

    /// Find a request by ID.
    async fn find_request(&self, id: AccessRequestId) -> AppResult<Option<AccessRequest>>;

    /// Pending requests across all files, oldest first.
    async fn list_pending(&self) -> AppResult<Vec<AccessRequest>>;

    /// All requests for a file, newest first.
    async fn list_for_file(&self, file_id: FileId) -> AppResult<Vec<AccessRequest>>;

    /// Move a pending request to `status`.
    ///
    /// Applies only while the request is still pending; returns `None`
    /// when a concurrent reviewer got there first.
    async fn complete_review(
        &self,
        id: AccessRequestId,
        status: AccessRequestStatus,
        reviewer: UserId,
        at: DateTime<Utc>,
    ) -> AppResult<Option<AccessRequest>>;
}

/// Append-only activity history.
#[async_trait]
pub trait ActivityStore: Send + Sync + 'static {
    /// Append an entry.
    async fn record(&self, entry: &NewActivity, at: DateTime<Utc>) -> AppResult<ActivityEntry>;

    /// Entries for a file, newest first.
    async fn list_for_file(&self, file_id: FileId, limit: u32) -> AppResult<Vec<ActivityEntry>>;

    /// Entries by a user, newest first.
    async fn list_for_user(&self, user_id: UserId, limit: u32) -> AppResult<Vec<ActivityEntry>>;
}

/// Comments, reactions and downloads.
#[async_trait]
pub trait EngagementStore: Send + Sync + 'static {
    /// Insert a comment.
    async fn insert_comment(&self, comment: &NewComment, at: DateTime<Utc>) -> AppResult<Comment>;

    /// Find a comment by ID.
    async fn find_comment(&self, id: CommentId) -> AppResult<Option<Comment>>;

    /// Comments on a file, oldest first.
    async fn list_comments(&self, file_id: FileId) -> AppResult<Vec<Comment>>;

    /// Delete a comment. Returns whether a row was removed.
    async fn delete_comment(&self, id: CommentId) -> AppResult<bool>;

    /// Insert a reaction; an identical (file, user, emoji) reaction is returned as is.
    async fn insert_reaction(
        &self,
        reaction: &NewReaction,
        at: DateTime<Utc>,
    ) -> AppResult<Reaction>;

    /// Remove a user's reaction. Returns whether a row was removed.
    async fn delete_reaction(&self, file_id: FileId, user_id: UserId, emoji: &str)
    -> AppResult<bool>;

    /// Reaction counts per emoji, most used first.
    async fn reaction_counts(&self, file_id: FileId) -> AppResult<Vec<ReactionCount>>;

    /// Record a download.
    async fn insert_download(
        &self,
        file_id: FileId,
        download: &NewDownload,
        at: DateTime<Utc>,
    ) -> AppResult<DownloadRecord>;
}

/// Read-only aggregates.
#[async_trait]
pub trait StatsStore: Send + Sync + 'static {
    /// Total size and count of non-deleted files in one consistent pass.
    async fn quota_totals(&self, workspace_id: WorkspaceId) -> AppResult<QuotaTotals>;

    /// Download, reaction, comment and version counts for a file.
    async fn file_stats(&self, file_id: FileId) -> AppResult<FileStats>;
}

/// The full set of stores the services are built from.
#[derive(Clone)]
pub struct Stores {
    /// File records.
    pub files: Arc<dyn FileStore>,
    /// Version history.
    pub versions: Arc<dyn VersionStore>,
    /// Share links.
    pub links: Arc<dyn ShareLinkStore>,
    /// Permission grants.
    pub permissions: Arc<dyn PermissionStore>,
    /// Access requests.
    pub access_requests: Arc<dyn AccessRequestStore>,
    /// Activity history.
    pub activity: Arc<dyn ActivityStore>,
    /// Comments, reactions and downloads.
    pub engagement: Arc<dyn EngagementStore>,
    /// Aggregates.
    pub stats: Arc<dyn StatsStore>,
}

impl Stores {
    /// Build PostgreSQL-backed stores sharing one pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            files: Arc::new(FileRepository::new(pool.clone())),
            versions: Arc::new(VersionRepository::new(pool.clone())),
            links: Arc::new(ShareLinkRepository::new(pool.clone())),
            permissions: Arc::new(PermissionRepository::new(pool.clone())),
            access_requests: Arc::new(AccessRequestRepository::new(pool.clone())),
            activity: Arc::new(ActivityRepository::new(pool.clone())),
            engagement: Arc::new(EngagementRepository::new(pool.clone())),
            stats: Arc::new(StatsRepository::new(pool)),
        }
    }

    /// Build stores that all view the same in-memory state.
    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            files: store.clone(),
            versions: store.clone(),
            links: store.clone(),
            permissions: store.clone(),
            access_requests: store.clone(),
            activity: store.clone(),
            engagement: store.clone(),
            stats: store,
        }
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}
