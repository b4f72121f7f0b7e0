//! File versioning service: create, list, restore and prune versions.

use std::sync::Arc;

use tracing::{debug, info, warn};

use filetrail_core::error::{AppError, ErrorKind};
use filetrail_core::result::AppResult;
use filetrail_core::traits::Clock;
use filetrail_core::types::{FileId, VersionId};
use filetrail_database::store::{FileStore, NewVersion, VersionStore};
use filetrail_entity::activity::ActivityAction;
use filetrail_entity::file::{File, FileVersion};

use super::require_file;
use crate::activity::ActivityService;
use crate::context::RequestContext;

/// Manages file version history.
#[derive(Clone)]
pub struct VersionService {
    /// File store.
    files: Arc<dyn FileStore>,
    /// Version store.
    versions: Arc<dyn VersionStore>,
    /// Activity log.
    activity: Arc<ActivityService>,
    /// Time source.
    clock: Arc<dyn Clock>,
    /// Inserts tried before a numbering conflict is surfaced.
    allocation_attempts: u32,
}

impl VersionService {
    /// Creates a new version service.
    pub fn new(
        files: Arc<dyn FileStore>,
        versions: Arc<dyn VersionStore>,
        activity: Arc<ActivityService>,
        clock: Arc<dyn Clock>,
        allocation_attempts: u32,
    ) -> Self {
        Self {
            files,
            versions,
            activity,
            clock,
            allocation_attempts: allocation_attempts.max(1),
        }
    }

    /// Snapshot the file's current content as the next version.
    pub async fn create_version(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        comment: Option<&str>,
    ) -> AppResult<FileVersion> {
        let file = require_file(self.files.as_ref(), file_id).await?;

        let new_version = NewVersion {
            file_id,
            content: file.content(),
            uploaded_by: ctx.user_id,
            comment: comment
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from),
        };

        let mut attempt = 1;
        let version = loop {
            match self
                .versions
                .insert_next(&new_version, self.clock.now())
                .await
            {
                Ok(version) => break version,
                Err(e) if e.kind == ErrorKind::Conflict && attempt < self.allocation_attempts => {
                    warn!(
                        file_id = %file_id,
                        attempt,
                        "Version number taken by a concurrent writer, retrying"
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };

        info!(
            user_id = %ctx.user_id,
            file_id = %file_id,
            version = version.version_num,
            "File version created"
        );

        self.activity
            .log(
                file_id,
                Some(ctx.user_id),
                ActivityAction::VersionCreated,
                version.comment.clone().unwrap_or_default(),
            )
            .await;

        Ok(version)
    }

    /// Fetch one version.
    pub async fn get_version(&self, version_id: VersionId) -> AppResult<FileVersion> {
        self.versions
            .find_version(version_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Version {version_id} not found")))
    }

    /// Lists all versions of a file, newest first.
    pub async fn list_versions(&self, file_id: FileId) -> AppResult<Vec<FileVersion>> {
        require_file(self.files.as_ref(), file_id).await?;
        debug!(file_id = %file_id, "Listing file versions");
        self.versions.list_versions(file_id).await
    }

    /// Delete one version. Sibling numbers are left as they are.
    pub async fn delete_version(&self, ctx: &RequestContext, version_id: VersionId) -> AppResult<()> {
        let version = self.get_version(version_id).await?;

        if !self.versions.delete_version(version_id).await? {
            return Err(AppError::not_found(format!(
                "Version {version_id} not found"
            )));
        }

        info!(
            user_id = %ctx.user_id,
            file_id = %version.file_id,
            version = version.version_num,
            "File version deleted"
        );

        self.activity
            .log(
                version.file_id,
                Some(ctx.user_id),
                ActivityAction::VersionDeleted,
                version.version_num.to_string(),
            )
            .await;

        Ok(())
    }

    /// Point the file back at a version's content.
    ///
    /// The pre-restore content is not captured; use
    /// [`snapshot_and_restore`](Self::snapshot_and_restore) to keep it.
    pub async fn restore_version(
        &self,
        ctx: &RequestContext,
        version_id: VersionId,
    ) -> AppResult<File> {
        let version = self.get_version(version_id).await?;

        let file = self
            .files
            .set_content(version.file_id, &version.content(), self.clock.now())
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {} not found", version.file_id)))?;

        info!(
            user_id = %ctx.user_id,
            file_id = %file.id,
            version = version.version_num,
            "File restored to version"
        );

        self.activity
            .log(
                file.id,
                Some(ctx.user_id),
                ActivityAction::VersionRestored,
                version.version_num.to_string(),
            )
            .await;

        Ok(file)
    }

    /// Version the current content, then restore `version_id`.
    ///
    /// Returns the snapshot taken and the restored file.
    pub async fn snapshot_and_restore(
        &self,
        ctx: &RequestContext,
        version_id: VersionId,
    ) -> AppResult<(FileVersion, File)> {
        let target = self.get_version(version_id).await?;
        let snapshot = self
            .create_version(
                ctx,
                target.file_id,
                Some(&format!("Before restore to version {}", target.version_num)),
            )
            .await?;
        let file = self.restore_version(ctx, version_id).await?;
        Ok((snapshot, file))
    }

    /// Keep only the newest `keep` versions of a file.
    pub async fn prune_versions(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        keep: u32,
    ) -> AppResult<u64> {
        if keep == 0 {
            return Err(AppError::validation("Must keep at least one version"));
        }
        require_file(self.files.as_ref(), file_id).await?;

        let removed = self.versions.prune_versions(file_id, keep).await?;

        if removed > 0 {
            info!(
                user_id = %ctx.user_id,
                file_id = %file_id,
                keep,
                removed,
                "File versions pruned"
            );
            self.activity
                .log(
                    file_id,
                    Some(ctx.user_id),
                    ActivityAction::VersionsPruned,
                    removed.to_string(),
                )
                .await;
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    use filetrail_core::types::UserId;
    use filetrail_database::MemoryStore;

    use super::*;
    use crate::testing::TestEngine;

    /// Loses the numbering race a fixed number of times before delegating.
    struct RacingVersionStore {
        inner: Arc<MemoryStore>,
        conflicts_left: AtomicU32,
    }

    #[async_trait]
    impl VersionStore for RacingVersionStore {
        async fn insert_next(&self, v: &NewVersion, at: DateTime<Utc>) -> AppResult<FileVersion> {
            let left = self.conflicts_left.load(Ordering::SeqCst);
            if left > 0 {
                self.conflicts_left.store(left - 1, Ordering::SeqCst);
                return Err(AppError::conflict("duplicate version number"));
            }
            self.inner.insert_next(v, at).await
        }

        async fn find_version(&self, id: VersionId) -> AppResult<Option<FileVersion>> {
            self.inner.find_version(id).await
        }

        async fn list_versions(&self, file_id: FileId) -> AppResult<Vec<FileVersion>> {
            self.inner.list_versions(file_id).await
        }

        async fn delete_version(&self, id: VersionId) -> AppResult<bool> {
            self.inner.delete_version(id).await
        }

        async fn prune_versions(&self, file_id: FileId, keep: u32) -> AppResult<u64> {
            self.inner.prune_versions(file_id, keep).await
        }
    }

    fn racing_service(env: &TestEngine, conflicts: u32, attempts: u32) -> VersionService {
        VersionService::new(
            env.store.clone(),
            Arc::new(RacingVersionStore {
                inner: env.store.clone(),
                conflicts_left: AtomicU32::new(conflicts),
            }),
            env.engine.activity.clone(),
            Arc::new(env.clock.clone()),
            attempts,
        )
    }

    #[tokio::test]
    async fn test_versions_number_from_one() {
        let env = TestEngine::new().await;
        let file = env.seed_file(10, Some("c1")).await;
        let ctx = env.ctx();

        let v1 = env
            .engine
            .versions
            .create_version(&ctx, file.id, Some("initial"))
            .await
            .unwrap();
        let v2 = env
            .engine
            .versions
            .create_version(&ctx, file.id, None)
            .await
            .unwrap();

        assert_eq!(v1.version_num, 1);
        assert_eq!(v2.version_num, 2);
        assert_eq!(v1.comment.as_deref(), Some("initial"));
        assert_eq!(v1.checksum.as_deref(), Some("c1"));

        let listed = env.engine.versions.list_versions(file.id).await.unwrap();
        assert_eq!(
            listed.iter().map(|v| v.version_num).collect::<Vec<_>>(),
            vec![2, 1]
        );
    }

    #[tokio::test]
    async fn test_create_version_for_missing_file() {
        let env = TestEngine::new().await;
        let err = env
            .engine
            .versions
            .create_version(&env.ctx(), FileId::new(), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_conflict_retried_within_bound() {
        let env = TestEngine::new().await;
        let file = env.seed_file(10, None).await;
        let service = racing_service(&env, 2, 3);

        let version = service.create_version(&env.ctx(), file.id, None).await.unwrap();
        assert_eq!(version.version_num, 1);
    }

    #[tokio::test]
    async fn test_conflict_surfaces_after_bound() {
        let env = TestEngine::new().await;
        let file = env.seed_file(10, None).await;
        let service = racing_service(&env, 5, 2);

        let err = service
            .create_version(&env.ctx(), file.id, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_delete_leaves_gap() {
        let env = TestEngine::new().await;
        let file = env.seed_file(10, None).await;
        let ctx = env.ctx();
        let versions = &env.engine.versions;

        versions.create_version(&ctx, file.id, None).await.unwrap();
        let v2 = versions.create_version(&ctx, file.id, None).await.unwrap();
        versions.delete_version(&ctx, v2.id).await.unwrap();
        let v3 = versions.create_version(&ctx, file.id, None).await.unwrap();

        assert_eq!(v3.version_num, 3);
        let err = versions.get_version(v2.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        let err = versions.delete_version(&ctx, v2.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_restore_missing_version() {
        let env = TestEngine::new().await;
        let err = env
            .engine
            .versions
            .restore_version(&env.ctx(), VersionId::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_snapshot_and_restore_keeps_current_content() {
        let env = TestEngine::new().await;
        let file = env.seed_file(10, Some("first")).await;
        let ctx = env.ctx();
        let versions = &env.engine.versions;

        let v1 = versions.create_version(&ctx, file.id, None).await.unwrap();
        env.replace_content(file.id, "second", 20).await;

        let (snapshot, restored) = versions.snapshot_and_restore(&ctx, v1.id).await.unwrap();
        assert_eq!(snapshot.version_num, 2);
        assert_eq!(snapshot.checksum.as_deref(), Some("second"));
        assert_eq!(restored.checksum.as_deref(), Some("first"));
        assert_eq!(restored.size_bytes, 10);
    }

    #[tokio::test]
    async fn test_prune_validates_and_logs() {
        let env = TestEngine::new().await;
        let file = env.seed_file(10, None).await;
        let ctx = RequestContext::new(UserId::new());
        let versions = &env.engine.versions;
        for _ in 0..4 {
            versions.create_version(&ctx, file.id, None).await.unwrap();
        }

        let err = versions.prune_versions(&ctx, file.id, 0).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        assert_eq!(versions.prune_versions(&ctx, file.id, 1).await.unwrap(), 3);
        let feed = env
            .engine
            .activity
            .list_file_activity(file.id, Some(1))
            .await
            .unwrap();
        assert_eq!(feed[0].action, "versions_pruned");
        assert_eq!(feed[0].details, "3");
    }
}
