//! Access request entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use filetrail_core::types::{AccessRequestId, FileId, UserId};

use super::status::AccessRequestStatus;

/// A user's request for access to a file, reviewed exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AccessRequest {
    /// Unique request identifier.
    pub id: AccessRequestId,
    /// The file access is requested for.
    pub file_id: FileId,
    /// The requesting user.
    pub requester_id: UserId,
    /// Free-text justification.
    pub reason: String,
    /// Current state.
    pub status: AccessRequestStatus,
    /// Reviewer, once reviewed.
    pub reviewed_by: Option<UserId>,
    /// When the request was created.
    pub created_at: DateTime<Utc>,
    /// When the request was reviewed.
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// Data required to insert a new access request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccessRequest {
    /// The file.
    pub file_id: FileId,
    /// The requester.
    pub requester_id: UserId,
    /// The justification.
    pub reason: String,
}
