//! Workspace storage quota configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::id::WorkspaceId;

/// Static storage ceilings, resolved per workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Ceiling applied to workspaces without an override (default 10 GiB).
    #[serde(default = "default_limit_bytes")]
    pub default_limit_bytes: u64,
    /// Per-workspace overrides keyed by workspace id.
    #[serde(default)]
    pub workspaces: HashMap<String, u64>,
}

impl QuotaConfig {
    /// Resolve the configured ceiling for a workspace.
    pub fn limit_for(&self, workspace_id: &WorkspaceId) -> u64 {
        self.workspaces
            .get(&workspace_id.to_string())
            .copied()
            .unwrap_or(self.default_limit_bytes)
    }
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            default_limit_bytes: default_limit_bytes(),
            workspaces: HashMap::new(),
        }
    }
}

fn default_limit_bytes() -> u64 {
    10 * 1024 * 1024 * 1024
}
