//! Wiring of a complete service set over one group of stores.

use std::sync::Arc;

use filetrail_core::config::{EngineConfig, QuotaConfig};
use filetrail_core::traits::{Clock, RandomTokenGenerator, TokenGenerator};
use filetrail_database::Stores;

use crate::access::AccessRequestService;
use crate::accounting::AccountingService;
use crate::activity::ActivityService;
use crate::engagement::EngagementService;
use crate::file::{FileService, VersionService};
use crate::permission::PermissionService;
use crate::share::ShareLinkService;

/// Every engine service, sharing stores, clock and activity log.
#[derive(Clone)]
pub struct Engine {
    /// Version history.
    pub versions: Arc<VersionService>,
    /// Share links.
    pub links: Arc<ShareLinkService>,
    /// Permission grants.
    pub permissions: Arc<PermissionService>,
    /// Access request workflow.
    pub access: Arc<AccessRequestService>,
    /// Quota, stats and duplicates.
    pub accounting: Arc<AccountingService>,
    /// Activity log and feeds.
    pub activity: Arc<ActivityService>,
    /// Trash and relocation.
    pub files: Arc<FileService>,
    /// Comments, reactions and downloads.
    pub engagement: Arc<EngagementService>,
}

impl Engine {
    /// Build the services with random share tokens sized from `engine`.
    pub fn new(
        stores: Stores,
        engine: &EngineConfig,
        quota: &QuotaConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let tokens = Arc::new(RandomTokenGenerator::new(engine.share_token_bytes));
        Self::with_token_generator(stores, engine, quota, clock, tokens)
    }

    /// Build the services with a caller-supplied token source.
    pub fn with_token_generator(
        stores: Stores,
        engine: &EngineConfig,
        quota: &QuotaConfig,
        clock: Arc<dyn Clock>,
        tokens: Arc<dyn TokenGenerator>,
    ) -> Self {
        let activity = Arc::new(ActivityService::new(stores.activity.clone(), clock.clone()));

        Self {
            versions: Arc::new(VersionService::new(
                stores.files.clone(),
                stores.versions.clone(),
                activity.clone(),
                clock.clone(),
                engine.version_allocation_attempts,
            )),
            links: Arc::new(ShareLinkService::new(
                stores.files.clone(),
                stores.links.clone(),
                activity.clone(),
                clock.clone(),
                tokens,
            )),
            permissions: Arc::new(PermissionService::new(
                stores.files.clone(),
                stores.permissions.clone(),
                activity.clone(),
                clock.clone(),
            )),
            access: Arc::new(AccessRequestService::new(
                stores.files.clone(),
                stores.access_requests.clone(),
                activity.clone(),
                clock.clone(),
            )),
            accounting: Arc::new(AccountingService::new(
                stores.files.clone(),
                stores.stats.clone(),
                quota.clone(),
            )),
            files: Arc::new(FileService::new(
                stores.files.clone(),
                activity.clone(),
                clock.clone(),
            )),
            engagement: Arc::new(EngagementService::new(
                stores.files,
                stores.engagement,
                activity.clone(),
                clock,
            )),
            activity,
        }
    }
}
