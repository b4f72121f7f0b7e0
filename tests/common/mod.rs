//! Shared fixtures for the engine integration tests.
//!
//! Everything runs against the in-memory store and a manually driven
//! clock, so no database is needed.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;

use filetrail_core::config::{EngineConfig, QuotaConfig};
use filetrail_core::traits::{Clock, ManualClock};
use filetrail_core::types::{FileId, UserId, WorkspaceId};
use filetrail_database::store::FileStore;
use filetrail_database::{MemoryStore, Stores};
use filetrail_entity::file::{File, FileContent};
use filetrail_service::{Engine, RequestContext};

/// Test application context
pub struct TestApp {
    /// All engine services
    pub engine: Engine,
    /// Backing store, for seeding files
    pub store: Arc<MemoryStore>,
    /// Clock shared with every service
    pub clock: ManualClock,
    /// Workspace seeded files belong to
    pub workspace_id: WorkspaceId,
}

impl TestApp {
    /// Create a new test application with default configuration
    pub fn new() -> Self {
        Self::with_quota(QuotaConfig::default())
    }

    /// Create a new test application with the given quota limits
    pub fn with_quota(quota: QuotaConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let clock = ManualClock::new(Utc::now());
        let engine = Engine::new(
            Stores::memory(store.clone()),
            &EngineConfig::default(),
            &quota,
            Arc::new(clock.clone()),
        );
        Self {
            engine,
            store,
            clock,
            workspace_id: WorkspaceId::new(),
        }
    }

    /// Request context for a fresh user
    pub fn user(&self) -> RequestContext {
        RequestContext::new(UserId::new())
    }

    /// Seed a live file owned by `owner`
    pub async fn create_file(&self, owner: &RequestContext, checksum: &str, size_bytes: i64) -> File {
        let now = self.clock.now();
        let id = FileId::new();
        let file = File {
            id,
            workspace_id: self.workspace_id,
            channel_id: None,
            name: format!("report-{id}.pdf"),
            storage_key: format!("blobs/{id}/{checksum}"),
            size_bytes,
            checksum: Some(checksum.to_string()),
            uploaded_by: owner.user_id,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_file(file.clone()).await;
        file
    }

    /// Replace a file's current content, as an upload would
    pub async fn upload(&self, file_id: FileId, checksum: &str, size_bytes: i64) -> File {
        let content = FileContent {
            storage_key: format!("blobs/{file_id}/{checksum}"),
            size_bytes,
            checksum: Some(checksum.to_string()),
        };
        self.store
            .set_content(file_id, &content, self.clock.now())
            .await
            .expect("memory store never fails")
            .expect("file was seeded")
    }
}
