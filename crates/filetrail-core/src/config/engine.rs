//! Engine tuning: version allocation retries, share tokens, retention.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Tuning knobs for the version, share-link and permission engine.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EngineConfig {
    /// How many times a version insert that lost a numbering race is retried
    /// before the conflict is surfaced to the caller.
    #[serde(default = "default_version_allocation_attempts")]
    #[validate(range(min = 1, max = 10))]
    pub version_allocation_attempts: u32,
    /// Number of random bytes in a share-link token.
    #[serde(default = "default_share_token_bytes")]
    #[validate(range(min = 16, max = 64))]
    pub share_token_bytes: usize,
    /// Versions kept per file by the prune command (`None` = keep all).
    #[serde(default)]
    #[validate(range(min = 1))]
    pub version_retention: Option<u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version_allocation_attempts: default_version_allocation_attempts(),
            share_token_bytes: default_share_token_bytes(),
            version_retention: None,
        }
    }
}

fn default_version_allocation_attempts() -> u32 {
    5
}

fn default_share_token_bytes() -> usize {
    32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_short_tokens_rejected() {
        let config = EngineConfig {
            share_token_bytes: 8,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_retention_rejected() {
        let config = EngineConfig {
            version_retention: Some(0),
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
