//! Activity service: fire-and-forget logging plus feed queries.

use std::sync::Arc;

use tracing::{debug, warn};

use filetrail_core::result::AppResult;
use filetrail_core::traits::Clock;
use filetrail_core::types::{FileId, UserId};
use filetrail_database::store::ActivityStore;
use filetrail_entity::activity::{ActivityAction, ActivityEntry, NewActivity};

/// Feed length used when the caller does not ask for one.
pub const DEFAULT_ACTIVITY_LIMIT: u32 = 50;

/// Records and lists file activity.
#[derive(Clone)]
pub struct ActivityService {
    /// Activity store.
    store: Arc<dyn ActivityStore>,
    /// Time source.
    clock: Arc<dyn Clock>,
}

impl ActivityService {
    /// Creates a new activity service.
    pub fn new(store: Arc<dyn ActivityStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Append an entry. Failures are logged and never reach the caller.
    pub async fn log(
        &self,
        file_id: FileId,
        user_id: Option<UserId>,
        action: ActivityAction,
        details: impl Into<String>,
    ) {
        let entry = NewActivity::new(file_id, user_id, action, details);
        if let Err(e) = self.store.record(&entry, self.clock.now()).await {
            warn!(
                file_id = %file_id,
                action = %action,
                error = %e,
                "Failed to record file activity"
            );
        }
    }

    /// Most recent entries for a file.
    pub async fn list_file_activity(
        &self,
        file_id: FileId,
        limit: Option<u32>,
    ) -> AppResult<Vec<ActivityEntry>> {
        let limit = limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT);
        debug!(file_id = %file_id, limit, "Listing file activity");
        self.store.list_for_file(file_id, limit).await
    }

    /// Most recent entries by a user, across files.
    pub async fn list_user_activity(
        &self,
        user_id: UserId,
        limit: Option<u32>,
    ) -> AppResult<Vec<ActivityEntry>> {
        let limit = limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT);
        debug!(user_id = %user_id, limit, "Listing user activity");
        self.store.list_for_user(user_id, limit).await
    }
}

impl std::fmt::Debug for ActivityService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use failing::FailingActivityStore;

    use super::*;
    use crate::testing::TestEngine;

    /// Store whose writes always fail, to prove logging never propagates.
    mod failing {
        use async_trait::async_trait;
        use chrono::{DateTime, Utc};

        use filetrail_core::error::AppError;
        use filetrail_core::result::AppResult;
        use filetrail_core::types::{FileId, UserId};
        use filetrail_database::store::ActivityStore;
        use filetrail_entity::activity::{ActivityEntry, NewActivity};

        pub struct FailingActivityStore;

        #[async_trait]
        impl ActivityStore for FailingActivityStore {
            async fn record(&self, _: &NewActivity, _: DateTime<Utc>) -> AppResult<ActivityEntry> {
                Err(AppError::transient("activity store offline"))
            }

            async fn list_for_file(&self, _: FileId, _: u32) -> AppResult<Vec<ActivityEntry>> {
                Ok(Vec::new())
            }

            async fn list_for_user(&self, _: UserId, _: u32) -> AppResult<Vec<ActivityEntry>> {
                Ok(Vec::new())
            }
        }
    }

    #[tokio::test]
    async fn test_log_failure_is_swallowed() {
        let service = ActivityService::new(
            Arc::new(FailingActivityStore),
            Arc::new(filetrail_core::traits::SystemClock),
        );
        service
            .log(FileId::new(), None, ActivityAction::LinkAccessed, "")
            .await;
    }

    #[tokio::test]
    async fn test_feeds_are_newest_first_and_limited() {
        let env = TestEngine::new().await;
        let file = env.seed_file(100, Some("abc")).await;
        let user = UserId::new();

        for n in 1..=3 {
            env.engine
                .activity
                .log(file.id, Some(user), ActivityAction::VersionCreated, format!("v{n}"))
                .await;
        }

        let feed = env
            .engine
            .activity
            .list_file_activity(file.id, Some(2))
            .await
            .unwrap();
        let details: Vec<&str> = feed.iter().map(|e| e.details.as_str()).collect();
        assert_eq!(details, vec!["v3", "v2"]);

        let by_user = env
            .engine
            .activity
            .list_user_activity(user, None)
            .await
            .unwrap();
        assert_eq!(by_user.len(), 3);
        assert!(by_user.iter().all(|e| e.action == "version_created"));
    }
}
