//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate and checked with `validator` before use. Each
//! sub-module represents a logical configuration section.

pub mod database;
pub mod engine;
pub mod logging;
pub mod quota;

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use self::database::DatabaseConfig;
pub use self::engine::EngineConfig;
pub use self::logging::LoggingConfig;
pub use self::quota::QuotaConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// Deserialization target for the merged configuration sources
/// (base file + environment overlay + `FILETRAIL__*` variables).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    /// Database connection settings.
    #[validate(nested)]
    pub database: DatabaseConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Version, share-link and retry tuning.
    #[serde(default)]
    #[validate(nested)]
    pub engine: EngineConfig,
    /// Per-workspace storage ceilings.
    #[serde(default)]
    pub quota: QuotaConfig,
}

impl AppConfig {
    /// Load configuration from a base file and an optional environment overlay.
    ///
    /// `path` is given without extension handling rules of its own; the
    /// `config` crate resolves `config/default` to `config/default.toml`.
    /// Environment variables prefixed with `FILETRAIL__` override both files.
    pub fn load(path: &str, env: Option<&str>) -> Result<Self, AppError> {
        let mut builder =
            config::Config::builder().add_source(config::File::with_name(path).required(false));

        if let Some(env) = env {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{env}")).required(false));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("FILETRAIL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let app: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        app.validate()?;
        Ok(app)
    }
}
