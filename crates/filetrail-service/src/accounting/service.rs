//! Accounting service: workspace quota, per-file stats, duplicate hints.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use filetrail_core::config::QuotaConfig;
use filetrail_core::result::AppResult;
use filetrail_core::types::{FileId, WorkspaceId};
use filetrail_database::store::{FileStore, StatsStore};
use filetrail_entity::file::File;
use filetrail_entity::stats::{FileStats, QuotaSnapshot};

use crate::file::require_file;

/// Quota snapshot plus derived usage figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceStats {
    /// The underlying snapshot.
    #[serde(flatten)]
    pub quota: QuotaSnapshot,
    /// Bytes left before the ceiling.
    pub remaining_bytes: u64,
    /// Fraction of the ceiling in use.
    pub usage_ratio: f64,
    /// Whether usage exceeds the ceiling.
    pub over_limit: bool,
}

impl From<QuotaSnapshot> for WorkspaceStats {
    fn from(quota: QuotaSnapshot) -> Self {
        Self {
            remaining_bytes: quota.remaining(),
            usage_ratio: quota.usage_ratio(),
            over_limit: quota.is_over_limit(),
            quota,
        }
    }
}

/// Computes storage and engagement rollups.
#[derive(Clone)]
pub struct AccountingService {
    /// File store.
    files: Arc<dyn FileStore>,
    /// Aggregate store.
    stats: Arc<dyn StatsStore>,
    /// Configured ceilings.
    quota: QuotaConfig,
}

impl AccountingService {
    /// Creates a new accounting service.
    pub fn new(files: Arc<dyn FileStore>, stats: Arc<dyn StatsStore>, quota: QuotaConfig) -> Self {
        Self {
            files,
            stats,
            quota,
        }
    }

    /// Usage of non-deleted files against the configured ceiling.
    pub async fn workspace_quota(&self, workspace_id: WorkspaceId) -> AppResult<QuotaSnapshot> {
        let totals = self.stats.quota_totals(workspace_id).await?;
        let snapshot = QuotaSnapshot::new(workspace_id, totals, self.quota.limit_for(&workspace_id));
        debug!(
            workspace_id = %workspace_id,
            total_size = snapshot.total_size,
            file_count = snapshot.file_count,
            "Computed workspace quota"
        );
        Ok(snapshot)
    }

    /// Quota snapshot with remaining bytes and usage ratio.
    pub async fn workspace_stats(&self, workspace_id: WorkspaceId) -> AppResult<WorkspaceStats> {
        self.workspace_quota(workspace_id).await.map(Into::into)
    }

    /// Download, reaction, comment and version counts.
    pub async fn file_stats(&self, file_id: FileId) -> AppResult<FileStats> {
        require_file(self.files.as_ref(), file_id).await?;
        self.stats.file_stats(file_id).await
    }

    /// Other files with the same checksum. Hints only; nothing is merged.
    pub async fn find_duplicates(&self, file_id: FileId) -> AppResult<Vec<File>> {
        let file = require_file(self.files.as_ref(), file_id).await?;
        match file.checksum.as_deref() {
            Some(checksum) if !checksum.is_empty() => {
                self.files.find_by_checksum(checksum, file_id).await
            }
            _ => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use filetrail_core::config::EngineConfig;
    use filetrail_core::types::UserId;

    use super::*;
    use crate::context::RequestContext;
    use crate::testing::TestEngine;

    #[tokio::test]
    async fn test_quota_uses_override_and_skips_trash() {
        let quota = QuotaConfig {
            default_limit_bytes: 1_000,
            ..QuotaConfig::default()
        };
        let env = TestEngine::with_config(EngineConfig::default(), quota).await;
        let a = env.seed_file(300, None).await;
        env.seed_file(200, None).await;
        env.engine.files.trash_file(&env.ctx(), a.id).await.unwrap();

        let snapshot = env
            .engine
            .accounting
            .workspace_quota(env.workspace_id)
            .await
            .unwrap();
        assert_eq!(snapshot.total_size, 200);
        assert_eq!(snapshot.file_count, 1);
        assert_eq!(snapshot.quota_limit, 1_000);

        let stats = env
            .engine
            .accounting
            .workspace_stats(env.workspace_id)
            .await
            .unwrap();
        assert_eq!(stats.remaining_bytes, 800);
        assert!(!stats.over_limit);
    }

    #[tokio::test]
    async fn test_empty_workspace_quota() {
        let env = TestEngine::new().await;
        let snapshot = env
            .engine
            .accounting
            .workspace_quota(WorkspaceId::new())
            .await
            .unwrap();
        assert_eq!(snapshot.total_size, 0);
        assert_eq!(snapshot.file_count, 0);
        assert_eq!(snapshot.quota_limit, 10 * 1024 * 1024 * 1024);
    }

    #[tokio::test]
    async fn test_duplicates_exclude_self() {
        let env = TestEngine::new().await;
        let original = env.seed_file(10, Some("same")).await;
        let copy = env.seed_file(10, Some("same")).await;
        env.seed_file(10, Some("other")).await;
        let unchecked = env.seed_file(10, None).await;

        let dupes = env
            .engine
            .accounting
            .find_duplicates(original.id)
            .await
            .unwrap();
        assert_eq!(dupes.iter().map(|f| f.id).collect::<Vec<_>>(), vec![copy.id]);

        assert!(
            env.engine
                .accounting
                .find_duplicates(unchecked.id)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_file_stats_counts_each_collection() {
        let env = TestEngine::new().await;
        let file = env.seed_file(10, None).await;
        let ctx = RequestContext::new(UserId::new());

        env.engine.versions.create_version(&ctx, file.id, None).await.unwrap();
        env.engine.engagement.add_comment(&ctx, file.id, "nice", None).await.unwrap();
        env.engine.engagement.add_reaction(&ctx, file.id, "🎉").await.unwrap();
        env.engine.engagement.record_download(&ctx, file.id).await.unwrap();
        env.engine.engagement.record_download(&ctx, file.id).await.unwrap();

        let stats = env.engine.accounting.file_stats(file.id).await.unwrap();
        assert_eq!(
            stats,
            FileStats {
                downloads: 2,
                reactions: 1,
                comments: 1,
                versions: 1,
            }
        );
    }
}
