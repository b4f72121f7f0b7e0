//! File version entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use filetrail_core::types::{FileId, UserId, VersionId};

use super::model::FileContent;

/// An immutable snapshot of a file's content pointer.
///
/// `version_num` is unique per file and strictly increasing in creation
/// order. Deleting a version leaves a gap; numbers are never reused while a
/// higher one exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FileVersion {
    /// Unique version identifier.
    pub id: VersionId,
    /// The file this version belongs to.
    pub file_id: FileId,
    /// Sequential version number, starting at 1.
    pub version_num: i32,
    /// Object-store key of this version's content.
    pub storage_key: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// Content checksum.
    pub checksum: Option<String>,
    /// User who created this version.
    pub uploaded_by: UserId,
    /// Optional comment describing the change.
    pub comment: Option<String>,
    /// When this version was created.
    pub created_at: DateTime<Utc>,
}

impl FileVersion {
    /// The content pointer captured by this version.
    pub fn content(&self) -> FileContent {
        FileContent {
            storage_key: self.storage_key.clone(),
            size_bytes: self.size_bytes,
            checksum: self.checksum.clone(),
        }
    }
}
