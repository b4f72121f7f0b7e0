//! Permission service: grant, revoke, and resolve effective levels.
//!
//! Grants form an append-only log: every grant is its own row, and the
//! effective set is recomputed from the rows and the clock on each call.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use filetrail_core::result::AppResult;
use filetrail_core::traits::Clock;
use filetrail_core::types::{FileId, PermissionId, UserId};
use filetrail_database::store::{FileStore, PermissionStore};
use filetrail_entity::activity::ActivityAction;
use filetrail_entity::permission::{NewPermission, Permission, PermissionLevel};

use crate::activity::ActivityService;
use crate::context::RequestContext;
use crate::file::require_file;

/// Manages explicit grants on files.
#[derive(Clone)]
pub struct PermissionService {
    /// File store.
    files: Arc<dyn FileStore>,
    /// Grant store.
    permissions: Arc<dyn PermissionStore>,
    /// Activity log.
    activity: Arc<ActivityService>,
    /// Time source.
    clock: Arc<dyn Clock>,
}

impl PermissionService {
    /// Creates a new permission service.
    pub fn new(
        files: Arc<dyn FileStore>,
        permissions: Arc<dyn PermissionStore>,
        activity: Arc<ActivityService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            files,
            permissions,
            activity,
            clock,
        }
    }

    /// Add a grant. Existing grants for the same user are left untouched.
    pub async fn grant_permission(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        user_id: UserId,
        level: PermissionLevel,
        expires_at: Option<DateTime<Utc>>,
    ) -> AppResult<Permission> {
        require_file(self.files.as_ref(), file_id).await?;

        let grant = NewPermission {
            file_id,
            user_id,
            permission: level,
            granted_by: ctx.user_id,
            expires_at,
        };
        let permission = self
            .permissions
            .insert_permission(&grant, self.clock.now())
            .await?;

        info!(
            admin_id = %ctx.user_id,
            permission_id = %permission.id,
            file_id = %file_id,
            user_id = %user_id,
            level = %level,
            "Permission granted"
        );

        self.activity
            .log(
                file_id,
                Some(ctx.user_id),
                ActivityAction::PermissionGranted,
                format!("{level} to {user_id}"),
            )
            .await;

        Ok(permission)
    }

    /// Delete a grant. Revoking an unknown grant succeeds.
    pub async fn revoke_permission(
        &self,
        ctx: &RequestContext,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        let Some(permission) = self.permissions.find_permission(permission_id).await? else {
            debug!(permission_id = %permission_id, "Permission already gone");
            return Ok(());
        };

        if self.permissions.delete_permission(permission_id).await? {
            info!(
                admin_id = %ctx.user_id,
                permission_id = %permission_id,
                "Permission revoked"
            );
            self.activity
                .log(
                    permission.file_id,
                    Some(ctx.user_id),
                    ActivityAction::PermissionRevoked,
                    format!("{} from {}", permission.permission, permission.user_id),
                )
                .await;
        }

        Ok(())
    }

    /// Levels held by `user_id` on `file_id` through unexpired grants.
    pub async fn effective_permissions(
        &self,
        file_id: FileId,
        user_id: UserId,
    ) -> AppResult<BTreeSet<PermissionLevel>> {
        let now = self.clock.now();
        let grants = self.permissions.list_for_user(file_id, user_id).await?;
        Ok(grants
            .iter()
            .filter(|g| g.is_effective_at(now))
            .map(|g| g.permission)
            .collect())
    }

    /// Whether any unexpired grant reaches `required`.
    pub async fn has_permission(
        &self,
        file_id: FileId,
        user_id: UserId,
        required: PermissionLevel,
    ) -> AppResult<bool> {
        let levels = self.effective_permissions(file_id, user_id).await?;
        Ok(levels.iter().any(|level| level.has_at_least(required)))
    }

    /// All stored grants on a file, expired ones included.
    pub async fn list_permissions(&self, file_id: FileId) -> AppResult<Vec<Permission>> {
        self.permissions.list_for_file(file_id).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use filetrail_core::ErrorKind;

    use super::*;
    use crate::testing::TestEngine;

    #[tokio::test]
    async fn test_grants_accumulate() {
        let env = TestEngine::new().await;
        let file = env.seed_file(10, None).await;
        let user = UserId::new();
        let perms = &env.engine.permissions;
        let ctx = env.ctx();

        perms
            .grant_permission(&ctx, file.id, user, PermissionLevel::Read, None)
            .await
            .unwrap();
        perms
            .grant_permission(&ctx, file.id, user, PermissionLevel::Read, None)
            .await
            .unwrap();
        perms
            .grant_permission(&ctx, file.id, user, PermissionLevel::Write, None)
            .await
            .unwrap();

        assert_eq!(perms.list_permissions(file.id).await.unwrap().len(), 3);
        let levels = perms.effective_permissions(file.id, user).await.unwrap();
        assert_eq!(
            levels.into_iter().collect::<Vec<_>>(),
            vec![PermissionLevel::Read, PermissionLevel::Write]
        );
        assert!(
            perms
                .has_permission(file.id, user, PermissionLevel::Comment)
                .await
                .unwrap()
        );
        assert!(
            !perms
                .has_permission(file.id, user, PermissionLevel::Manage)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_expiry_boundary_flips_inclusion() {
        let env = TestEngine::new().await;
        let file = env.seed_file(10, None).await;
        let user = UserId::new();
        let perms = &env.engine.permissions;
        let expires_at = env.clock.now() + Duration::minutes(10);

        perms
            .grant_permission(&env.ctx(), file.id, user, PermissionLevel::Write, Some(expires_at))
            .await
            .unwrap();

        env.clock.set(expires_at - Duration::milliseconds(1));
        assert!(
            perms
                .effective_permissions(file.id, user)
                .await
                .unwrap()
                .contains(&PermissionLevel::Write)
        );

        env.clock.set(expires_at);
        assert!(
            perms
                .effective_permissions(file.id, user)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let env = TestEngine::new().await;
        let file = env.seed_file(10, None).await;
        let user = UserId::new();
        let perms = &env.engine.permissions;
        let ctx = env.ctx();

        let grant = perms
            .grant_permission(&ctx, file.id, user, PermissionLevel::Read, None)
            .await
            .unwrap();
        perms.revoke_permission(&ctx, grant.id).await.unwrap();
        perms.revoke_permission(&ctx, grant.id).await.unwrap();

        assert!(perms.effective_permissions(file.id, user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_grant_on_missing_file() {
        let env = TestEngine::new().await;
        let err = env
            .engine
            .permissions
            .grant_permission(&env.ctx(), FileId::new(), UserId::new(), PermissionLevel::Read, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
