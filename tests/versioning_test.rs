//! Integration tests for version numbering, restore and pruning.

mod common;

use std::collections::BTreeSet;

use filetrail_core::ErrorKind;
use filetrail_core::types::{FileId, VersionId};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_versions_get_consecutive_numbers() {
    let app = common::TestApp::new();
    let owner = app.user();
    let file = app.create_file(&owner, "a1", 100).await;

    for _ in 0..3 {
        app.engine.versions.create_version(&owner, file.id, None).await.unwrap();
    }

    let file_id = file.id;
    let handles: Vec<_> = (0..20)
        .map(|_| {
            let versions = app.engine.versions.clone();
            let ctx = owner.clone();
            tokio::spawn(async move { versions.create_version(&ctx, file_id, None).await })
        })
        .collect();

    let mut numbers = BTreeSet::new();
    for result in futures::future::join_all(handles).await {
        let version = result.unwrap().unwrap();
        assert!(numbers.insert(version.version_num), "duplicate version number");
    }

    assert_eq!(numbers, (4..=23).collect::<BTreeSet<i32>>());
}

#[tokio::test]
async fn test_versions_listed_newest_first() {
    let app = common::TestApp::new();
    let owner = app.user();
    let file = app.create_file(&owner, "a1", 100).await;

    app.engine.versions.create_version(&owner, file.id, Some("first")).await.unwrap();
    app.upload(file.id, "b2", 200).await;
    app.engine.versions.create_version(&owner, file.id, Some("second")).await.unwrap();

    let versions = app.engine.versions.list_versions(file.id).await.unwrap();
    let numbers: Vec<i32> = versions.iter().map(|v| v.version_num).collect();
    assert_eq!(numbers, vec![2, 1]);
    assert_eq!(versions[0].checksum.as_deref(), Some("b2"));
    assert_eq!(versions[1].comment.as_deref(), Some("first"));
}

#[tokio::test]
async fn test_version_of_missing_file_is_not_found() {
    let app = common::TestApp::new();
    let err = app
        .engine
        .versions
        .create_version(&app.user(), FileId::new(), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_deleted_latest_number_is_never_reused() {
    let app = common::TestApp::new();
    let owner = app.user();
    let file = app.create_file(&owner, "e1", 10).await;

    let mut latest = None;
    for _ in 0..3 {
        latest = Some(app.engine.versions.create_version(&owner, file.id, None).await.unwrap());
    }
    let v3 = latest.unwrap();
    app.engine.versions.delete_version(&owner, v3.id).await.unwrap();

    let v4 = app.engine.versions.create_version(&owner, file.id, None).await.unwrap();
    assert_eq!(v4.version_num, 4);

    let numbers: Vec<i32> = app
        .engine
        .versions
        .list_versions(file.id)
        .await
        .unwrap()
        .iter()
        .map(|v| v.version_num)
        .collect();
    assert_eq!(numbers, vec![4, 2, 1]);

    app.engine.versions.delete_version(&owner, v4.id).await.unwrap();
    let v5 = app.engine.versions.create_version(&owner, file.id, None).await.unwrap();
    assert_eq!(v5.version_num, 5);
}

#[tokio::test]
async fn test_restore_first_version_after_edits() {
    let app = common::TestApp::new();
    let owner = app.user();
    let file = app.create_file(&owner, "c1", 100).await;

    let v1 = app.engine.versions.create_version(&owner, file.id, None).await.unwrap();
    app.upload(file.id, "c2", 250).await;
    app.engine.versions.create_version(&owner, file.id, None).await.unwrap();
    app.upload(file.id, "c3", 400).await;

    let restored = app.engine.versions.restore_version(&owner, v1.id).await.unwrap();
    assert_eq!(restored.checksum.as_deref(), Some("c1"));
    assert_eq!(restored.size_bytes, 100);
    assert_eq!(restored.storage_key, v1.storage_key);

    // Plain restore adds no version.
    assert_eq!(app.engine.versions.list_versions(file.id).await.unwrap().len(), 2);

    let activity = app.engine.activity.list_file_activity(file.id, None).await.unwrap();
    assert_eq!(activity[0].action, "version_restored");
    assert_eq!(activity[0].details, "1");
}

#[tokio::test]
async fn test_snapshot_and_restore_keeps_current_content() {
    let app = common::TestApp::new();
    let owner = app.user();
    let file = app.create_file(&owner, "d1", 10).await;

    let v1 = app.engine.versions.create_version(&owner, file.id, None).await.unwrap();
    app.upload(file.id, "d2", 20).await;

    let (snapshot, restored) = app
        .engine
        .versions
        .snapshot_and_restore(&owner, v1.id)
        .await
        .unwrap();

    assert_eq!(snapshot.version_num, 2);
    assert_eq!(snapshot.checksum.as_deref(), Some("d2"));
    assert_eq!(restored.checksum.as_deref(), Some("d1"));
}

#[tokio::test]
async fn test_restore_unknown_version_is_not_found() {
    let app = common::TestApp::new();
    let err = app
        .engine
        .versions
        .restore_version(&app.user(), VersionId::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_prune_then_number_continues() {
    let app = common::TestApp::new();
    let owner = app.user();
    let file = app.create_file(&owner, "e1", 10).await;

    for _ in 0..5 {
        app.engine.versions.create_version(&owner, file.id, None).await.unwrap();
    }

    let removed = app.engine.versions.prune_versions(&owner, file.id, 2).await.unwrap();
    assert_eq!(removed, 3);

    let next = app.engine.versions.create_version(&owner, file.id, None).await.unwrap();
    assert_eq!(next.version_num, 6);

    let err = app
        .engine
        .versions
        .prune_versions(&owner, file.id, 0)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}
