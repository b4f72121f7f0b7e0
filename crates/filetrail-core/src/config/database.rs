//! PostgreSQL pool settings.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Where the stores live and how the pool behaves.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "pool_bounds"))]
pub struct DatabaseConfig {
    /// `postgres://` connection URL.
    #[validate(length(min = 1))]
    pub url: String,
    /// Upper bound on open connections.
    #[serde(default = "default_max_connections")]
    #[validate(range(min = 1))]
    pub max_connections: u32,
    /// Connections kept open while idle.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Seconds to wait for a free connection before failing as `Transient`.
    #[serde(default = "default_connect_timeout")]
    #[validate(range(min = 1))]
    pub connect_timeout_seconds: u64,
    /// Seconds before an idle connection is closed.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
}

fn pool_bounds(config: &DatabaseConfig) -> Result<(), ValidationError> {
    if config.min_connections > config.max_connections {
        return Err(ValidationError::new("min_connections_above_max"));
    }
    Ok(())
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    2
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_idle_timeout() -> u64 {
    300
}
