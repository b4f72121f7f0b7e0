//! Permission level enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Level carried by a single grant.
///
/// Ordered by privilege: Manage > Write > Comment > Read. The engine stores
/// levels as granted and never collapses them; callers decide how to combine
/// a user's effective set.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "permission_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    /// View and download.
    Read,
    /// Read plus comments and reactions.
    Comment,
    /// Upload new versions and restore old ones.
    Write,
    /// Grant and revoke access, review access requests.
    Manage,
}

impl PermissionLevel {
    /// Check if this level includes the given one.
    pub fn has_at_least(&self, required: PermissionLevel) -> bool {
        *self >= required
    }

    /// Return the level as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Comment => "comment",
            Self::Write => "write",
            Self::Manage => "manage",
        }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PermissionLevel {
    type Err = filetrail_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "read" | "view" => Ok(Self::Read),
            "comment" => Ok(Self::Comment),
            "write" | "edit" => Ok(Self::Write),
            "manage" | "admin" => Ok(Self::Manage),
            _ => Err(filetrail_core::AppError::validation(format!(
                "Invalid permission level: '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(PermissionLevel::Manage.has_at_least(PermissionLevel::Write));
        assert!(!PermissionLevel::Comment.has_at_least(PermissionLevel::Write));
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("VIEW".parse::<PermissionLevel>().unwrap(), PermissionLevel::Read);
        assert_eq!(" edit ".parse::<PermissionLevel>().unwrap(), PermissionLevel::Write);
        let err = "owner".parse::<PermissionLevel>().unwrap_err();
        assert_eq!(err.kind, filetrail_core::ErrorKind::Validation);
    }
}
