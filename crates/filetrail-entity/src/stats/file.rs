//! Per-file informational counters.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Counts of records related to one file.
///
/// Each counter is read independently; they are informational and carry no
/// cross-consistency guarantee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FileStats {
    /// Recorded downloads.
    pub downloads: i64,
    /// Reactions.
    pub reactions: i64,
    /// Comments.
    pub comments: i64,
    /// Stored versions.
    pub versions: i64,
}
