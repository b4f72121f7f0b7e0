//! Typed identifiers.
//!
//! Every record family gets its own UUID newtype so a version ID cannot be
//! passed where a link ID is expected. Parsing failures are `Validation`
//! errors naming the expected kind of ID. With the `sqlx` feature the types
//! bind and decode as PostgreSQL `UUID`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a fresh random ID.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// What this ID refers to, for messages.
            pub const LABEL: &'static str = $label;
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self).map_err(|e| {
                    AppError::with_source(
                        crate::error::ErrorKind::Validation,
                        format!("Invalid {} '{s}'", Self::LABEL),
                        e,
                    )
                })
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        #[cfg(feature = "sqlx")]
        impl sqlx::Type<sqlx::Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <Uuid as sqlx::Type<sqlx::Postgres>>::type_info()
            }
        }

        #[cfg(feature = "sqlx")]
        impl<'q> sqlx::Encode<'q, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut <sqlx::Postgres as sqlx::Database>::ArgumentBuffer<'q>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <Uuid as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }

        #[cfg(feature = "sqlx")]
        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: <sqlx::Postgres as sqlx::Database>::ValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                <Uuid as sqlx::Decode<'r, sqlx::Postgres>>::decode(value).map(Self)
            }
        }
    };
}

id_type!(
    /// A user. Identity is resolved before a call reaches the engine.
    UserId,
    "user id"
);
id_type!(
    /// A file record.
    FileId,
    "file id"
);
id_type!(
    /// A workspace.
    WorkspaceId,
    "workspace id"
);
id_type!(
    /// A channel inside a workspace.
    ChannelId,
    "channel id"
);
id_type!(
    /// One entry of a file's version history.
    VersionId,
    "version id"
);
id_type!(
    /// A share link.
    ShareLinkId,
    "share link id"
);
id_type!(
    /// A per-user permission grant.
    PermissionId,
    "permission id"
);
id_type!(
    /// An access request.
    AccessRequestId,
    "access request id"
);
id_type!(ActivityId, "activity id");
id_type!(CommentId, "comment id");
id_type!(ReactionId, "reaction id");
id_type!(DownloadId, "download id");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_roundtrips_display() {
        let id = VersionId::new();
        let parsed: VersionId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_parse_error_names_the_kind() {
        let err = "v7".parse::<ShareLinkId>().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "Invalid share link id 'v7'");
    }

    #[test]
    fn test_serializes_as_bare_uuid() {
        let id = FileId::new();
        assert_eq!(serde_json::to_string(&id).unwrap(), format!("\"{}\"", id.0));
    }
}
