//! Integration tests for share link issuance and consumption.

mod common;

use chrono::Duration;

use filetrail_core::ErrorKind;
use filetrail_core::traits::Clock;
use filetrail_service::share::CreateLinkRequest;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_opens_never_exceed_max_views() {
    let app = common::TestApp::new();
    let owner = app.user();
    let file = app.create_file(&owner, "f1", 10).await;

    let link = app
        .engine
        .links
        .create_link(
            &owner,
            file.id,
            CreateLinkRequest {
                max_views: 7,
                ..CreateLinkRequest::default()
            },
        )
        .await
        .unwrap();

    let handles: Vec<_> = (0..30)
        .map(|_| {
            let links = app.engine.links.clone();
            let token = link.token.clone();
            tokio::spawn(async move { links.resolve_and_consume(&token, None).await })
        })
        .collect();

    let mut granted = 0;
    for result in futures::future::join_all(handles).await {
        match result.unwrap() {
            Ok(_) => granted += 1,
            Err(e) => assert_eq!(e.kind, ErrorKind::NotFound),
        }
    }
    assert_eq!(granted, 7);

    let links = app.engine.links.list_links(file.id).await.unwrap();
    assert_eq!(links[0].views, 7);
}

#[tokio::test]
async fn test_single_use_link() {
    let app = common::TestApp::new();
    let owner = app.user();
    let file = app.create_file(&owner, "g1", 10).await;

    let link = app
        .engine
        .links
        .create_link(
            &owner,
            file.id,
            CreateLinkRequest {
                max_views: 1,
                ..CreateLinkRequest::default()
            },
        )
        .await
        .unwrap();

    let access = app.engine.links.resolve_and_consume(&link.token, None).await.unwrap();
    assert_eq!(access.file.id, file.id);
    assert_eq!(access.link.views, 1);

    let err = app
        .engine
        .links
        .resolve_and_consume(&link.token, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let links = app.engine.links.list_links(file.id).await.unwrap();
    assert_eq!(links[0].views, 1);
}

#[tokio::test]
async fn test_expired_link_rejects_correct_password() {
    let app = common::TestApp::new();
    let owner = app.user();
    let file = app.create_file(&owner, "h1", 10).await;

    let link = app
        .engine
        .links
        .create_link(
            &owner,
            file.id,
            CreateLinkRequest {
                expires_at: Some(app.clock.now() + Duration::hours(1)),
                password: Some("s3cret".to_string()),
                ..CreateLinkRequest::default()
            },
        )
        .await
        .unwrap();

    let wrong = app
        .engine
        .links
        .resolve_and_consume(&link.token, Some("guess"))
        .await
        .unwrap_err();
    assert_eq!(wrong.kind, ErrorKind::Authorization);

    app.engine
        .links
        .resolve_and_consume(&link.token, Some("s3cret"))
        .await
        .unwrap();

    app.clock.advance(Duration::hours(1));

    let expired = app
        .engine
        .links
        .resolve_and_consume(&link.token, Some("s3cret"))
        .await
        .unwrap_err();
    assert_eq!(expired.kind, ErrorKind::NotFound);

    // Only the successful open counted.
    let links = app.engine.links.list_links(file.id).await.unwrap();
    assert_eq!(links[0].views, 1);
}

#[tokio::test]
async fn test_revoked_link_is_unusable() {
    let app = common::TestApp::new();
    let owner = app.user();
    let file = app.create_file(&owner, "i1", 10).await;

    let link = app
        .engine
        .links
        .create_link(&owner, file.id, CreateLinkRequest::default())
        .await
        .unwrap();
    app.engine.links.revoke_link(&owner, link.id).await.unwrap();

    let err = app
        .engine
        .links
        .resolve_and_consume(&link.token, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    // Second revoke is a no-op.
    app.engine.links.revoke_link(&owner, link.id).await.unwrap();
}

#[tokio::test]
async fn test_link_to_trashed_file_is_unusable() {
    let app = common::TestApp::new();
    let owner = app.user();
    let file = app.create_file(&owner, "j1", 10).await;

    let link = app
        .engine
        .links
        .create_link(&owner, file.id, CreateLinkRequest::default())
        .await
        .unwrap();
    app.engine.files.trash_file(&owner, file.id).await.unwrap();

    let err = app
        .engine
        .links
        .resolve_and_consume(&link.token, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    app.engine.files.restore_from_trash(&owner, file.id).await.unwrap();
    app.engine.links.resolve_and_consume(&link.token, None).await.unwrap();
}
