//! Shared fixtures for service tests.

use std::sync::Arc;

use chrono::Utc;

use filetrail_core::config::{EngineConfig, QuotaConfig};
use filetrail_core::traits::{Clock, ManualClock};
use filetrail_core::types::{FileId, UserId, WorkspaceId};
use filetrail_database::store::FileStore;
use filetrail_database::{MemoryStore, Stores};
use filetrail_entity::file::{File, FileContent};

use crate::context::RequestContext;
use crate::engine::Engine;

/// An engine over a fresh in-memory store and a frozen clock.
pub(crate) struct TestEngine {
    pub engine: Engine,
    pub store: Arc<MemoryStore>,
    pub clock: ManualClock,
    pub workspace_id: WorkspaceId,
    pub user_id: UserId,
}

impl TestEngine {
    pub async fn new() -> Self {
        Self::with_config(EngineConfig::default(), QuotaConfig::default()).await
    }

    pub async fn with_config(engine: EngineConfig, quota: QuotaConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let clock = ManualClock::new(Utc::now());
        Self {
            engine: Engine::new(
                Stores::memory(store.clone()),
                &engine,
                &quota,
                Arc::new(clock.clone()),
            ),
            store,
            clock,
            workspace_id: WorkspaceId::new(),
            user_id: UserId::new(),
        }
    }

    pub fn ctx(&self) -> RequestContext {
        RequestContext::new(self.user_id)
    }

    /// Seed a live file in the default workspace.
    pub async fn seed_file(&self, size_bytes: i64, checksum: Option<&str>) -> File {
        let now = self.clock.now();
        let id = FileId::new();
        let file = File {
            id,
            workspace_id: self.workspace_id,
            channel_id: None,
            name: format!("{id}.bin"),
            storage_key: format!("blobs/{id}"),
            size_bytes,
            checksum: checksum.map(String::from),
            uploaded_by: self.user_id,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_file(file.clone()).await;
        file
    }

    /// Simulate an upload replacing the file's content outside the engine.
    pub async fn replace_content(&self, file_id: FileId, checksum: &str, size_bytes: i64) {
        let content = FileContent {
            storage_key: format!("blobs/{file_id}/{checksum}"),
            size_bytes,
            checksum: Some(checksum.to_string()),
        };
        self.store
            .set_content(file_id, &content, self.clock.now())
            .await
            .unwrap();
    }
}
