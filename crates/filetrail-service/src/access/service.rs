//! Access request service: request, review, and list.

use std::sync::Arc;

use tracing::{debug, info, warn};

use filetrail_core::error::AppError;
use filetrail_core::result::AppResult;
use filetrail_core::traits::Clock;
use filetrail_core::types::{AccessRequestId, FileId};
use filetrail_database::store::{AccessRequestStore, FileStore};
use filetrail_entity::access::{AccessRequest, NewAccessRequest, ReviewDecision};
use filetrail_entity::activity::ActivityAction;

use crate::activity::ActivityService;
use crate::context::RequestContext;
use crate::file::require_file;

/// Runs the access request workflow.
///
/// Approval does not grant a permission; callers that want one layer
/// [`PermissionService::grant_permission`](crate::PermissionService::grant_permission) on top.
#[derive(Clone)]
pub struct AccessRequestService {
    /// File store.
    files: Arc<dyn FileStore>,
    /// Request store.
    requests: Arc<dyn AccessRequestStore>,
    /// Activity log.
    activity: Arc<ActivityService>,
    /// Time source.
    clock: Arc<dyn Clock>,
}

impl AccessRequestService {
    /// Creates a new access request service.
    pub fn new(
        files: Arc<dyn FileStore>,
        requests: Arc<dyn AccessRequestStore>,
        activity: Arc<ActivityService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            files,
            requests,
            activity,
            clock,
        }
    }

    /// Open a pending request on behalf of the acting user.
    ///
    /// The reason is trimmed and must not be empty.
    pub async fn request_access(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        reason: &str,
    ) -> AppResult<AccessRequest> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::validation("Access request reason is required"));
        }
        require_file(self.files.as_ref(), file_id).await?;

        let request = self
            .requests
            .insert_request(
                &NewAccessRequest {
                    file_id,
                    requester_id: ctx.user_id,
                    reason: reason.to_string(),
                },
                self.clock.now(),
            )
            .await?;

        info!(
            user_id = %ctx.user_id,
            file_id = %file_id,
            request_id = %request.id,
            "Access requested"
        );

        self.activity
            .log(
                file_id,
                Some(ctx.user_id),
                ActivityAction::AccessRequested,
                request.reason.clone(),
            )
            .await;

        Ok(request)
    }

    /// Approve or deny a pending request. The acting user is the reviewer.
    ///
    /// Fails with `InvalidState` when the request has already been reviewed,
    /// leaving it unchanged, and with `Forbidden` when the reviewer is the
    /// requester.
    pub async fn review_request(
        &self,
        ctx: &RequestContext,
        request_id: AccessRequestId,
        decision: ReviewDecision,
    ) -> AppResult<AccessRequest> {
        let request = self.get_request(request_id).await?;

        if request.requester_id == ctx.user_id {
            warn!(user_id = %ctx.user_id, request_id = %request_id, "Self-review rejected");
            return Err(AppError::forbidden(
                "Requesters cannot review their own access request",
            ));
        }

        let next = request.status.review(decision)?;

        let reviewed = self
            .requests
            .complete_review(request_id, next, ctx.user_id, self.clock.now())
            .await?
            .ok_or_else(|| AppError::invalid_state("Access request has already been reviewed"))?;

        info!(
            reviewer_id = %ctx.user_id,
            request_id = %request_id,
            status = %reviewed.status,
            "Access request reviewed"
        );

        self.activity
            .log(
                reviewed.file_id,
                Some(ctx.user_id),
                ActivityAction::AccessReviewed,
                reviewed.status.as_str(),
            )
            .await;

        Ok(reviewed)
    }

    /// Fetch one request.
    pub async fn get_request(&self, request_id: AccessRequestId) -> AppResult<AccessRequest> {
        self.requests
            .find_request(request_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Access request {request_id} not found")))
    }

    /// Pending requests across all files, oldest first.
    pub async fn list_pending(&self) -> AppResult<Vec<AccessRequest>> {
        debug!("Listing pending access requests");
        self.requests.list_pending().await
    }

    /// Every request for a file, newest first.
    pub async fn list_for_file(&self, file_id: FileId) -> AppResult<Vec<AccessRequest>> {
        self.requests.list_for_file(file_id).await
    }
}

#[cfg(test)]
mod tests {
    use filetrail_core::ErrorKind;
    use filetrail_core::types::UserId;
    use filetrail_entity::access::AccessRequestStatus;

    use super::*;
    use crate::testing::TestEngine;

    #[tokio::test]
    async fn test_request_starts_pending() {
        let env = TestEngine::new().await;
        let file = env.seed_file(10, None).await;
        let requester = RequestContext::new(UserId::new());

        let request = env
            .engine
            .access
            .request_access(&requester, file.id, "  quarterly audit ")
            .await
            .unwrap();
        assert_eq!(request.status, AccessRequestStatus::Pending);
        assert_eq!(request.reason, "quarterly audit");
        assert!(request.reviewed_by.is_none());

        let pending = env.engine.access.list_pending().await.unwrap();
        assert_eq!(pending.len(), 1);
    }

    #[tokio::test]
    async fn test_review_is_terminal() {
        let env = TestEngine::new().await;
        let file = env.seed_file(10, None).await;
        let requester = RequestContext::new(UserId::new());
        let reviewer = RequestContext::new(UserId::new());
        let access = &env.engine.access;

        let request = access
            .request_access(&requester, file.id, "need it")
            .await
            .unwrap();
        let approved = access
            .review_request(&reviewer, request.id, ReviewDecision::Approve)
            .await
            .unwrap();
        assert_eq!(approved.status, AccessRequestStatus::Approved);
        assert_eq!(approved.reviewed_by, Some(reviewer.user_id));
        assert!(approved.reviewed_at.is_some());

        let err = access
            .review_request(&reviewer, request.id, ReviewDecision::Deny)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidState);
        assert_eq!(access.get_request(request.id).await.unwrap(), approved);
        assert!(access.list_pending().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_self_review_forbidden() {
        let env = TestEngine::new().await;
        let file = env.seed_file(10, None).await;
        let requester = RequestContext::new(UserId::new());
        let access = &env.engine.access;

        let request = access
            .request_access(&requester, file.id, "self check")
            .await
            .unwrap();
        let err = access
            .review_request(&requester, request.id, ReviewDecision::Approve)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
        assert_eq!(
            access.get_request(request.id).await.unwrap().status,
            AccessRequestStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_blank_reason_rejected() {
        let env = TestEngine::new().await;
        let file = env.seed_file(10, None).await;
        let requester = RequestContext::new(UserId::new());

        for reason in ["", "   \t"] {
            let err = env
                .engine
                .access
                .request_access(&requester, file.id, reason)
                .await
                .unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation);
        }
        assert!(env.engine.access.list_pending().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_review_unknown_request() {
        let env = TestEngine::new().await;
        let err = env
            .engine
            .access
            .review_request(&env.ctx(), AccessRequestId::new(), ReviewDecision::Deny)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_reviews_apply_once() {
        let env = TestEngine::new().await;
        let file = env.seed_file(10, None).await;
        let request = env
            .engine
            .access
            .request_access(&RequestContext::new(UserId::new()), file.id, "race")
            .await
            .unwrap();

        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let access = env.engine.access.clone();
                let decision = if i % 2 == 0 {
                    ReviewDecision::Approve
                } else {
                    ReviewDecision::Deny
                };
                tokio::spawn(async move {
                    access
                        .review_request(&RequestContext::new(UserId::new()), request.id, decision)
                        .await
                })
            })
            .collect();

        let results: Vec<_> = futures::future::join_all(tasks)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(
            results
                .iter()
                .filter_map(|r| r.as_ref().err())
                .all(|e| e.kind == ErrorKind::InvalidState)
        );
    }
}
