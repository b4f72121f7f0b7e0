//! Permission grant entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use filetrail_core::types::{FileId, PermissionId, UserId};

use super::level::PermissionLevel;

/// One grant of a level to a user on a file.
///
/// Grants form an append-only log: several rows may exist for the same
/// `(file_id, user_id)` and each is revoked independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Permission {
    /// Unique grant identifier.
    pub id: PermissionId,
    /// The file the grant applies to.
    pub file_id: FileId,
    /// The grantee.
    pub user_id: UserId,
    /// The granted level.
    pub permission: PermissionLevel,
    /// User who granted it.
    pub granted_by: UserId,
    /// When the grant lapses (None = never).
    pub expires_at: Option<DateTime<Utc>>,
    /// When the grant was created.
    pub created_at: DateTime<Utc>,
}

impl Permission {
    /// Whether the grant is in force at `now`.
    pub fn is_effective_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|exp| exp > now)
    }
}

/// Data required to insert a new grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPermission {
    /// The file.
    pub file_id: FileId,
    /// The grantee.
    pub user_id: UserId,
    /// The level.
    pub permission: PermissionLevel,
    /// The granting user.
    pub granted_by: UserId,
    /// Expiry (None = never).
    pub expires_at: Option<DateTime<Utc>>,
}
