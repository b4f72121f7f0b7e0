//! Share link entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use filetrail_core::types::{FileId, ShareLinkId, UserId};

/// A bearer capability granting access to one file.
///
/// A link is usable iff it is active, not expired, and (when `max_views > 0`)
/// has `views < max_views`. `max_views == 0` means unlimited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ShareLink {
    /// Unique link identifier.
    pub id: ShareLinkId,
    /// The file this link grants access to.
    pub file_id: FileId,
    /// Unguessable bearer token.
    pub token: String,
    /// User who created the link.
    pub created_by: UserId,
    /// When the link stops working (None = never).
    pub expires_at: Option<DateTime<Utc>>,
    /// View quota (0 = unlimited).
    pub max_views: i32,
    /// Successful accesses so far.
    pub views: i32,
    /// Argon2id hash of the link password, if protected.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Cleared by revoke.
    pub is_active: bool,
    /// When the link was created.
    pub created_at: DateTime<Utc>,
}

/// Why a link can or cannot be used at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkState {
    /// The link admits another access.
    Usable,
    /// The link was revoked.
    Revoked,
    /// The link passed its expiry.
    Expired,
    /// The view quota is used up.
    Exhausted,
}

impl LinkState {
    /// Return the state as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Usable => "usable",
            Self::Revoked => "revoked",
            Self::Expired => "expired",
            Self::Exhausted => "exhausted",
        }
    }
}

impl std::fmt::Display for LinkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ShareLink {
    /// Evaluate the link at `now`.
    pub fn state_at(&self, now: DateTime<Utc>) -> LinkState {
        if !self.is_active {
            return LinkState::Revoked;
        }
        if let Some(expires_at) = self.expires_at {
            if expires_at <= now {
                return LinkState::Expired;
            }
        }
        if self.max_views > 0 && self.views >= self.max_views {
            return LinkState::Exhausted;
        }
        LinkState::Usable
    }

    /// Whether the link admits another access at `now`.
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.state_at(now) == LinkState::Usable
    }

    /// Whether a password must be supplied.
    pub fn requires_password(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Accesses left before exhaustion (None = unlimited).
    pub fn remaining_views(&self) -> Option<i32> {
        (self.max_views > 0).then(|| (self.max_views - self.views).max(0))
    }
}

/// Data required to insert a new share link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewShareLink {
    /// The file being shared.
    pub file_id: FileId,
    /// The generated token.
    pub token: String,
    /// The creating user.
    pub created_by: UserId,
    /// Expiry (None = never).
    pub expires_at: Option<DateTime<Utc>>,
    /// View quota (0 = unlimited).
    pub max_views: i32,
    /// Argon2id password hash.
    pub password_hash: Option<String>,
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn link(max_views: i32, views: i32) -> ShareLink {
        ShareLink {
            id: ShareLinkId::new(),
            file_id: FileId::new(),
            token: "tok".to_string(),
            created_by: UserId::new(),
            expires_at: None,
            max_views,
            views,
            password_hash: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_unlimited_link_never_exhausts() {
        let l = link(0, 10_000);
        assert!(l.is_usable_at(Utc::now()));
        assert_eq!(l.remaining_views(), None);
    }

    #[test]
    fn test_exhausted_at_quota() {
        let l = link(3, 3);
        assert_eq!(l.state_at(Utc::now()), LinkState::Exhausted);
        assert_eq!(l.remaining_views(), Some(0));
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let now = Utc::now();
        let mut l = link(0, 0);
        l.expires_at = Some(now);
        assert_eq!(l.state_at(now), LinkState::Expired);
        assert!(l.is_usable_at(now - Duration::milliseconds(1)));
    }

    #[test]
    fn test_revoked_wins_over_other_states() {
        let mut l = link(1, 1);
        l.is_active = false;
        assert_eq!(l.state_at(Utc::now()), LinkState::Revoked);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let mut l = link(0, 0);
        l.password_hash = Some("$argon2id$...".to_string());
        let json = serde_json::to_value(&l).expect("serialize");
        assert!(json.get("password_hash").is_none());
    }
}
