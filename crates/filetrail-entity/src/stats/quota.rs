//! Workspace storage usage snapshot.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use filetrail_core::types::WorkspaceId;

/// Raw totals produced by one aggregation pass over live files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct QuotaTotals {
    /// Sum of `size_bytes` over non-deleted files.
    pub total_size: i64,
    /// Number of non-deleted files.
    pub file_count: i64,
}

/// Point-in-time storage usage of a workspace against its ceiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotaSnapshot {
    /// The workspace.
    pub workspace_id: WorkspaceId,
    /// Bytes used by non-deleted files.
    pub total_size: i64,
    /// Number of non-deleted files.
    pub file_count: i64,
    /// Configured ceiling in bytes.
    pub quota_limit: u64,
}

impl QuotaSnapshot {
    /// Combine aggregated totals with the configured ceiling.
    pub fn new(workspace_id: WorkspaceId, totals: QuotaTotals, quota_limit: u64) -> Self {
        Self {
            workspace_id,
            total_size: totals.total_size,
            file_count: totals.file_count,
            quota_limit,
        }
    }

    /// Bytes left before the ceiling (0 when over).
    pub fn remaining(&self) -> u64 {
        self.quota_limit
            .saturating_sub(u64::try_from(self.total_size).unwrap_or(0))
    }

    /// Fraction of the ceiling in use (may exceed 1.0).
    pub fn usage_ratio(&self) -> f64 {
        if self.quota_limit == 0 {
            return 0.0;
        }
        self.total_size as f64 / self.quota_limit as f64
    }

    /// Whether usage is above the ceiling.
    pub fn is_over_limit(&self) -> bool {
        u64::try_from(self.total_size).unwrap_or(0) > self.quota_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_ratio_and_remaining() {
        let totals = QuotaTotals {
            total_size: 250,
            file_count: 3,
        };
        let snapshot = QuotaSnapshot::new(WorkspaceId::new(), totals, 1000);
        assert_eq!(snapshot.remaining(), 750);
        assert!((snapshot.usage_ratio() - 0.25).abs() < f64::EPSILON);
        assert!(!snapshot.is_over_limit());
    }

    #[test]
    fn test_over_limit() {
        let totals = QuotaTotals {
            total_size: 1500,
            file_count: 1,
        };
        let snapshot = QuotaSnapshot::new(WorkspaceId::new(), totals, 1000);
        assert_eq!(snapshot.remaining(), 0);
        assert!(snapshot.is_over_limit());
    }
}
