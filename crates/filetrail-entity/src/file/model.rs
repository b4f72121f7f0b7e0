//! External file record, as far as the engine reads and writes it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use filetrail_core::types::{ChannelId, FileId, UserId, WorkspaceId};

/// A file whose bytes live in the external object store.
///
/// The engine never creates or purges these rows. It reads them for
/// restore, quota and duplicate detection, and writes the content pointer,
/// location fields, and `deleted_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: FileId,
    /// Workspace that owns the file.
    pub workspace_id: WorkspaceId,
    /// Channel the file is posted in, if any.
    pub channel_id: Option<ChannelId>,
    /// Display name.
    pub name: String,
    /// Opaque key of the current content in the object store.
    pub storage_key: String,
    /// Size of the current content in bytes.
    pub size_bytes: i64,
    /// Checksum of the current content.
    pub checksum: Option<String>,
    /// The user who uploaded the file.
    pub uploaded_by: UserId,
    /// Soft-delete marker; set while the file sits in the trash.
    pub deleted_at: Option<DateTime<Utc>>,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
    /// When the file was last modified.
    pub updated_at: DateTime<Utc>,
}

impl File {
    /// The current content pointer.
    pub fn content(&self) -> FileContent {
        FileContent {
            storage_key: self.storage_key.clone(),
            size_bytes: self.size_bytes,
            checksum: self.checksum.clone(),
        }
    }

    /// Whether the file is in the trash.
    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// A content pointer: where the bytes are and how to recognise them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    /// Opaque object-store key.
    pub storage_key: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// Content checksum.
    pub checksum: Option<String>,
}
