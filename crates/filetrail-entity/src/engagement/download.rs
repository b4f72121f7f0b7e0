//! Download log entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use filetrail_core::types::{DownloadId, FileId, UserId};

/// One recorded download of a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DownloadRecord {
    /// Unique record identifier.
    pub id: DownloadId,
    /// The file downloaded.
    pub file_id: FileId,
    /// The downloading user (None for share-link access).
    pub user_id: Option<UserId>,
    /// Client address.
    pub ip_address: Option<String>,
    /// Client user agent.
    pub user_agent: Option<String>,
    /// When the download happened.
    pub downloaded_at: DateTime<Utc>,
}

/// Data required to record a download.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewDownload {
    /// The downloading user.
    pub user_id: Option<UserId>,
    /// Client address.
    pub ip_address: Option<String>,
    /// Client user agent.
    pub user_agent: Option<String>,
}
