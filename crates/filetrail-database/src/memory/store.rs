//! In-memory implementation of every store trait, guarded by one Tokio mutex.
//!
//! Each trait method takes the lock once for its whole body, so every
//! operation is atomic with respect to every other one.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use filetrail_core::error::AppError;
use filetrail_core::result::AppResult;
use filetrail_core::types::{
    AccessRequestId, ActivityId, CommentId, DownloadId, FileId, PermissionId, ReactionId,
    ShareLinkId, UserId, VersionId, WorkspaceId,
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

use crate::store::{
    AccessRequestStore, ActivityStore, EngagementStore, FileLocation, FileStore, NewVersion,
    PermissionStore, ShareLinkStore, StatsStore, VersionStore,
};

/// All tables. Vectors keep insertion order, which stands in for
/// `created_at` ordering when the clock does not move between writes.
#[derive(Debug, Default)]
struct InnerState {
    files: HashMap<FileId, File>,
    /// Highest version number ever issued per file; never lowered.
    version_counters: HashMap<FileId, i32>,
    versions: Vec<FileVersion>,
    links: Vec<ShareLink>,
    permissions: Vec<Permission>,
    access_requests: Vec<AccessRequest>,
    activity: Vec<ActivityEntry>,
    comments: Vec<Comment>,
    reactions: Vec<Reaction>,
    downloads: Vec<DownloadRecord>,
}

/// In-memory store using a Tokio mutex for thread safety.
///
/// Suitable for single-node deployments and tests. File records are
/// created outside the engine; use [`MemoryStore::insert_file`] to seed them.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<InnerState>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a file record.
    pub async fn insert_file(&self, file: File) {
        let mut state = self.state.lock().await;
        debug!(file_id = %file.id, "Seeding file into memory store");
        state.files.insert(file.id, file);
    }
}

#[async_trait]
impl FileStore for MemoryStore {
    async fn find_file(&self, id: FileId) -> AppResult<Option<File>> {
        Ok(self.state.lock().await.files.get(&id).cloned())
    }

    async fn set_content(
        &self,
        id: FileId,
        content: &FileContent,
        at: DateTime<Utc>,
    ) -> AppResult<Option<File>> {
        let mut state = self.state.lock().await;
        Ok(state.files.get_mut(&id).map(|file| {
            file.storage_key = content.storage_key.clone();
            file.size_bytes = content.size_bytes;
            file.checksum = content.checksum.clone();
            file.updated_at = at;
            file.clone()
        }))
    }

    async fn set_deleted_at(
        &self,
        id: FileId,
        deleted_at: Option<DateTime<Utc>>,
        at: DateTime<Utc>,
    ) -> AppResult<Option<File>> {
        let mut state = self.state.lock().await;
        Ok(state.files.get_mut(&id).map(|file| {
            file.deleted_at = deleted_at;
            file.updated_at = at;
            file.clone()
        }))
    }

    async fn relocate(
        &self,
        id: FileId,
        location: FileLocation,
        at: DateTime<Utc>,
    ) -> AppResult<Option<File>> {
        let mut state = self.state.lock().await;
        Ok(state.files.get_mut(&id).map(|file| {
            if let Some(channel_id) = location.channel_id {
                file.channel_id = Some(channel_id);
            }
            if let Some(workspace_id) = location.workspace_id {
                file.workspace_id = workspace_id;
            }
            file.updated_at = at;
            file.clone()
        }))
    }

    async fn list_trashed(&self, workspace_id: WorkspaceId) -> AppResult<Vec<File>> {
        let state = self.state.lock().await;
        let mut trashed: Vec<File> = state
            .files
            .values()
            .filter(|f| f.workspace_id == workspace_id && f.is_trashed())
            .cloned()
            .collect();
        trashed.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at));
        Ok(trashed)
    }

    async fn find_by_checksum(&self, checksum: &str, exclude: FileId) -> AppResult<Vec<File>> {
        let state = self.state.lock().await;
        let mut matches: Vec<File> = state
            .files
            .values()
            .filter(|f| f.id != exclude && f.checksum.as_deref() == Some(checksum))
            .cloned()
            .collect();
        matches.sort_by_key(|f| f.created_at);
        Ok(matches)
    }
}

#[async_trait]
impl VersionStore for MemoryStore {
    async fn insert_next(
        &self,
        version: &NewVersion,
        at: DateTime<Utc>,
    ) -> AppResult<FileVersion> {
        let mut state = self.state.lock().await;

        if !state.files.contains_key(&version.file_id) {
            return Err(AppError::not_found(format!(
                "File {} not found",
                version.file_id
            )));
        }

        let counter = state.version_counters.entry(version.file_id).or_insert(0);
        *counter += 1;
        let next = *counter;

        let created = FileVersion {
            id: VersionId::new(),
            file_id: version.file_id,
            version_num: next,
            storage_key: version.content.storage_key.clone(),
            size_bytes: version.content.size_bytes,
            checksum: version.content.checksum.clone(),
            uploaded_by: version.uploaded_by,
            comment: version.comment.clone(),
            created_at: at,
        };
        state.versions.push(created.clone());
        Ok(created)
    }

    async fn find_version(&self, id: VersionId) -> AppResult<Option<FileVersion>> {
        let state = self.state.lock().await;
        Ok(state.versions.iter().find(|v| v.id == id).cloned())
    }

    async fn list_versions(&self, file_id: FileId) -> AppResult<Vec<FileVersion>> {
        let state = self.state.lock().await;
        let mut versions: Vec<FileVersion> = state
            .versions
            .iter()
            .filter(|v| v.file_id == file_id)
            .cloned()
            .collect();
        versions.sort_by(|a, b| b.version_num.cmp(&a.version_num));
        Ok(versions)
    }

    async fn delete_version(&self, id: VersionId) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.versions.len();
        state.versions.retain(|v| v.id != id);
        Ok(state.versions.len() < before)
    }

    async fn prune_versions(&self, file_id: FileId, keep: u32) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let mut numbers: Vec<i32> = state
            .versions
            .iter()
            .filter(|v| v.file_id == file_id)
            .map(|v| v.version_num)
            .collect();
        numbers.sort_unstable_by(|a, b| b.cmp(a));

        let Some(&cutoff) = numbers.get(keep as usize) else {
            return Ok(0);
        };

        let before = state.versions.len();
        state
            .versions
            .retain(|v| v.file_id != file_id || v.version_num > cutoff);
        Ok((before - state.versions.len()) as u64)
    }
}

#[async_trait]
impl ShareLinkStore for MemoryStore {
    async fn insert_link(&self, link: &NewShareLink, at: DateTime<Utc>) -> AppResult<ShareLink> {
        let mut state = self.state.lock().await;
        if state.links.iter().any(|l| l.token == link.token) {
            return Err(AppError::conflict("Share token already in use"));
        }
        let created = ShareLink {
            id: ShareLinkId::new(),
            file_id: link.file_id,
            token: link.token.clone(),
            created_by: link.created_by,
            expires_at: link.expires_at,
            max_views: link.max_views,
            views: 0,
            password_hash: link.password_hash.clone(),
            is_active: true,
            created_at: at,
        };
        state.links.push(created.clone());
        Ok(created)
    }

    async fn find_link(&self, id: ShareLinkId) -> AppResult<Option<ShareLink>> {
        let state = self.state.lock().await;
        Ok(state.links.iter().find(|l| l.id == id).cloned())
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<ShareLink>> {
        let state = self.state.lock().await;
        Ok(state.links.iter().find(|l| l.token == token).cloned())
    }

    async fn list_for_file(&self, file_id: FileId) -> AppResult<Vec<ShareLink>> {
        let state = self.state.lock().await;
        Ok(state
            .links
            .iter()
            .rev()
            .filter(|l| l.file_id == file_id)
            .cloned()
            .collect())
    }

    async fn deactivate(&self, id: ShareLinkId) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        match state.links.iter_mut().find(|l| l.id == id) {
            Some(link) => {
                link.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn consume(&self, id: ShareLinkId, now: DateTime<Utc>) -> AppResult<Option<ShareLink>> {
        let mut state = self.state.lock().await;
        Ok(state
            .links
            .iter_mut()
            .find(|l| l.id == id)
            .filter(|l| l.is_usable_at(now))
            .map(|link| {
                link.views += 1;
                link.clone()
            }))
    }
}

#[async_trait]
impl PermissionStore for MemoryStore {
    async fn insert_permission(
        &self,
        grant: &NewPermission,
        at: DateTime<Utc>,
    ) -> AppResult<Permission> {
        let mut state = self.state.lock().await;
        let created = Permission {
            id: PermissionId::new(),
            file_id: grant.file_id,
            user_id: grant.user_id,
            permission: grant.permission,
            granted_by: grant.granted_by,
            expires_at: grant.expires_at,
            created_at: at,
        };
        state.permissions.push(created.clone());
        Ok(created)
    }

    async fn find_permission(&self, id: PermissionId) -> AppResult<Option<Permission>> {
        let state = self.state.lock().await;
        Ok(state.permissions.iter().find(|p| p.id == id).cloned())
    }

    async fn delete_permission(&self, id: PermissionId) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.permissions.len();
        state.permissions.retain(|p| p.id != id);
        Ok(state.permissions.len() < before)
    }

    async fn list_for_file(&self, file_id: FileId) -> AppResult<Vec<Permission>> {
        let state = self.state.lock().await;
        Ok(state
            .permissions
            .iter()
            .filter(|p| p.file_id == file_id)
            .cloned()
            .collect())
    }

    async fn list_for_user(
        &self,
        file_id: FileId,
        user_id: UserId,
    ) -> AppResult<Vec<Permission>> {
        let state = self.state.lock().await;
        Ok(state
            .permissions
            .iter()
            .filter(|p| p.file_id == file_id && p.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AccessRequestStore for MemoryStore {
    async fn insert_request(
        &self,
        request: &NewAccessRequest,
        at: DateTime<Utc>,
    ) -> AppResult<AccessRequest> {
        let mut state = self.state.lock().await;
        let created = AccessRequest {
            id: AccessRequestId::new(),
            file_id: request.file_id,
            requester_id: request.requester_id,
            reason: request.reason.clone(),
            status: AccessRequestStatus::Pending,
            reviewed_by: None,
            created_at: at,
            reviewed_at: None,
        };
        state.access_requests.push(created.clone());
        Ok(created)
    }

    async fn find_request(&self, id: AccessRequestId) -> AppResult<Option<AccessRequest>> {
        let state = self.state.lock().await;
        Ok(state.access_requests.iter().find(|r| r.id == id).cloned())
    }

    async fn list_pending(&self) -> AppResult<Vec<AccessRequest>> {
        let state = self.state.lock().await;
        Ok(state
            .access_requests
            .iter()
            .filter(|r| r.status == AccessRequestStatus::Pending)
            .cloned()
            .collect())
    }

    async fn list_for_file(&self, file_id: FileId) -> AppResult<Vec<AccessRequest>> {
        let state = self.state.lock().await;
        Ok(state
            .access_requests
            .iter()
            .rev()
            .filter(|r| r.file_id == file_id)
            .cloned()
            .collect())
    }

    async fn complete_review(
        &self,
        id: AccessRequestId,
        status: AccessRequestStatus,
        reviewer: UserId,
        at: DateTime<Utc>,
    ) -> AppResult<Option<AccessRequest>> {
        let mut state = self.state.lock().await;
        Ok(state
            .access_requests
            .iter_mut()
            .find(|r| r.id == id && r.status == AccessRequestStatus::Pending)
            .map(|request| {
                request.status = status;
                request.reviewed_by = Some(reviewer);
                request.reviewed_at = Some(at);
                request.clone()
            }))
    }
}

#[async_trait]
impl ActivityStore for MemoryStore {
    async fn record(&self, entry: &NewActivity, at: DateTime<Utc>) -> AppResult<ActivityEntry> {
        let mut state = self.state.lock().await;
        let created = ActivityEntry {
            id: ActivityId::new(),
            file_id: entry.file_id,
            user_id: entry.user_id,
            action: entry.action.as_str().to_string(),
            details: entry.details.clone(),
            created_at: at,
        };
        state.activity.push(created.clone());
        Ok(created)
    }

    async fn list_for_file(&self, file_id: FileId, limit: u32) -> AppResult<Vec<ActivityEntry>> {
        let state = self.state.lock().await;
        Ok(state
            .activity
            .iter()
            .rev()
            .filter(|a| a.file_id == file_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn list_for_user(&self, user_id: UserId, limit: u32) -> AppResult<Vec<ActivityEntry>> {
        let state = self.state.lock().await;
        Ok(state
            .activity
            .iter()
            .rev()
            .filter(|a| a.user_id == Some(user_id))
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl EngagementStore for MemoryStore {
    async fn insert_comment(&self, comment: &NewComment, at: DateTime<Utc>) -> AppResult<Comment> {
        let mut state = self.state.lock().await;
        let created = Comment {
            id: CommentId::new(),
            file_id: comment.file_id,
            user_id: comment.user_id,
            content: comment.content.clone(),
            parent_id: comment.parent_id,
            created_at: at,
        };
        state.comments.push(created.clone());
        Ok(created)
    }

    async fn find_comment(&self, id: CommentId) -> AppResult<Option<Comment>> {
        let state = self.state.lock().await;
        Ok(state.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn list_comments(&self, file_id: FileId) -> AppResult<Vec<Comment>> {
        let state = self.state.lock().await;
        Ok(state
            .comments
            .iter()
            .filter(|c| c.file_id == file_id)
            .cloned()
            .collect())
    }

    async fn delete_comment(&self, id: CommentId) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.comments.len();
        // Replies go with their parent.
        state
            .comments
            .retain(|c| c.id != id && c.parent_id != Some(id));
        Ok(state.comments.len() < before)
    }

    async fn insert_reaction(
        &self,
        reaction: &NewReaction,
        at: DateTime<Utc>,
    ) -> AppResult<Reaction> {
        let mut state = self.state.lock().await;
        if let Some(existing) = state.reactions.iter().find(|r| {
            r.file_id == reaction.file_id
                && r.user_id == reaction.user_id
                && r.emoji == reaction.emoji
        }) {
            return Ok(existing.clone());
        }
        let created = Reaction {
            id: ReactionId::new(),
            file_id: reaction.file_id,
            user_id: reaction.user_id,
            emoji: reaction.emoji.clone(),
            created_at: at,
        };
        state.reactions.push(created.clone());
        Ok(created)
    }

    async fn delete_reaction(
        &self,
        file_id: FileId,
        user_id: UserId,
        emoji: &str,
    ) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.reactions.len();
        state
            .reactions
            .retain(|r| !(r.file_id == file_id && r.user_id == user_id && r.emoji == emoji));
        Ok(state.reactions.len() < before)
    }

    async fn reaction_counts(&self, file_id: FileId) -> AppResult<Vec<ReactionCount>> {
        let state = self.state.lock().await;
        let mut counts: HashMap<&str, i64> = HashMap::new();
        for reaction in state.reactions.iter().filter(|r| r.file_id == file_id) {
            *counts.entry(reaction.emoji.as_str()).or_default() += 1;
        }
        let mut summary: Vec<ReactionCount> = counts
            .into_iter()
            .map(|(emoji, count)| ReactionCount {
                emoji: emoji.to_string(),
                count,
            })
            .collect();
        summary.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.emoji.cmp(&b.emoji)));
        Ok(summary)
    }

    async fn insert_download(
        &self,
        file_id: FileId,
        download: &NewDownload,
        at: DateTime<Utc>,
    ) -> AppResult<DownloadRecord> {
        let mut state = self.state.lock().await;
        let created = DownloadRecord {
            id: DownloadId::new(),
            file_id,
            user_id: download.user_id,
            ip_address: download.ip_address.clone(),
            user_agent: download.user_agent.clone(),
            downloaded_at: at,
        };
        state.downloads.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl StatsStore for MemoryStore {
    async fn quota_totals(&self, workspace_id: WorkspaceId) -> AppResult<QuotaTotals> {
        let state = self.state.lock().await;
        Ok(state
            .files
            .values()
            .filter(|f| f.workspace_id == workspace_id && !f.is_trashed())
            .fold(QuotaTotals::default(), |acc, f| QuotaTotals {
                total_size: acc.total_size + f.size_bytes,
                file_count: acc.file_count + 1,
            }))
    }

    async fn file_stats(&self, file_id: FileId) -> AppResult<FileStats> {
        let state = self.state.lock().await;
        let count = |n: usize| n as i64;
        Ok(FileStats {
            downloads: count(state.downloads.iter().filter(|d| d.file_id == file_id).count()),
            reactions: count(state.reactions.iter().filter(|r| r.file_id == file_id).count()),
            comments: count(state.comments.iter().filter(|c| c.file_id == file_id).count()),
            versions: count(state.versions.iter().filter(|v| v.file_id == file_id).count()),
        })
    }
}
