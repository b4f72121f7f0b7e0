//! Integration tests for grants, access requests and workspace accounting.

mod common;

use chrono::Duration;

use filetrail_core::ErrorKind;
use filetrail_core::config::QuotaConfig;
use filetrail_core::traits::Clock;
use filetrail_entity::access::{AccessRequestStatus, ReviewDecision};
use filetrail_entity::permission::PermissionLevel;

#[tokio::test]
async fn test_expired_grant_has_no_effect() {
    let app = common::TestApp::new();
    let owner = app.user();
    let guest = app.user();
    let file = app.create_file(&owner, "k1", 10).await;

    app.engine
        .permissions
        .grant_permission(
            &owner,
            file.id,
            guest.user_id,
            PermissionLevel::Write,
            Some(app.clock.now() - Duration::seconds(1)),
        )
        .await
        .unwrap();

    let levels = app
        .engine
        .permissions
        .effective_permissions(file.id, guest.user_id)
        .await
        .unwrap();
    assert!(levels.is_empty());
    assert!(
        !app.engine
            .permissions
            .has_permission(file.id, guest.user_id, PermissionLevel::Read)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_effective_permissions_merge_live_grants() {
    let app = common::TestApp::new();
    let owner = app.user();
    let guest = app.user();
    let file = app.create_file(&owner, "l1", 10).await;

    app.engine
        .permissions
        .grant_permission(&owner, file.id, guest.user_id, PermissionLevel::Read, None)
        .await
        .unwrap();
    app.engine
        .permissions
        .grant_permission(
            &owner,
            file.id,
            guest.user_id,
            PermissionLevel::Comment,
            Some(app.clock.now() + Duration::minutes(5)),
        )
        .await
        .unwrap();

    let levels = app
        .engine
        .permissions
        .effective_permissions(file.id, guest.user_id)
        .await
        .unwrap();
    assert_eq!(
        levels.into_iter().collect::<Vec<_>>(),
        vec![PermissionLevel::Read, PermissionLevel::Comment]
    );

    app.clock.advance(Duration::minutes(5));
    let levels = app
        .engine
        .permissions
        .effective_permissions(file.id, guest.user_id)
        .await
        .unwrap();
    assert_eq!(levels.into_iter().collect::<Vec<_>>(), vec![PermissionLevel::Read]);
}

#[tokio::test]
async fn test_reviewed_request_cannot_be_reviewed_again() {
    let app = common::TestApp::new();
    let owner = app.user();
    let requester = app.user();
    let file = app.create_file(&owner, "m1", 10).await;

    let request = app
        .engine
        .access
        .request_access(&requester, file.id, "  quarterly audit  ")
        .await
        .unwrap();
    assert_eq!(request.status, AccessRequestStatus::Pending);
    assert_eq!(request.reason, "quarterly audit");

    let approved = app
        .engine
        .access
        .review_request(&owner, request.id, ReviewDecision::Approve)
        .await
        .unwrap();
    assert_eq!(approved.status, AccessRequestStatus::Approved);
    assert_eq!(approved.reviewed_by, Some(owner.user_id));

    let err = app
        .engine
        .access
        .review_request(&owner, request.id, ReviewDecision::Deny)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidState);

    let stored = app.engine.access.get_request(request.id).await.unwrap();
    assert_eq!(stored.status, AccessRequestStatus::Approved);
    assert_eq!(stored.reviewed_at, approved.reviewed_at);
    assert!(app.engine.access.list_pending().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_quota_counts_only_live_files() {
    let app = common::TestApp::with_quota(QuotaConfig {
        default_limit_bytes: 1_000,
        ..QuotaConfig::default()
    });
    let owner = app.user();
    app.create_file(&owner, "n1", 300).await;
    app.create_file(&owner, "n2", 500).await;
    let trashed = app.create_file(&owner, "n3", 900).await;
    app.engine.files.trash_file(&owner, trashed.id).await.unwrap();

    let stats = app.engine.accounting.workspace_stats(app.workspace_id).await.unwrap();
    assert_eq!(stats.quota.total_size, 800);
    assert_eq!(stats.quota.file_count, 2);
    assert_eq!(stats.remaining_bytes, 200);
    assert!(!stats.over_limit);

    app.engine.files.restore_from_trash(&owner, trashed.id).await.unwrap();
    let stats = app.engine.accounting.workspace_stats(app.workspace_id).await.unwrap();
    assert_eq!(stats.quota.total_size, 1_700);
    assert_eq!(stats.remaining_bytes, 0);
    assert!(stats.over_limit);
}

#[tokio::test]
async fn test_duplicates_share_checksum() {
    let app = common::TestApp::new();
    let owner = app.user();
    let original = app.create_file(&owner, "same", 10).await;
    let copy = app.create_file(&owner, "same", 10).await;
    app.create_file(&owner, "other", 10).await;

    let dupes = app.engine.accounting.find_duplicates(original.id).await.unwrap();
    assert_eq!(dupes.len(), 1);
    assert_eq!(dupes[0].id, copy.id);
}
