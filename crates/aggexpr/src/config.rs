//! Expression service configuration

use aggexpr_eval::{MissingValueStrategy, DEFAULT_MAX_DEPTH};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default bound on indicator chains
pub const DEFAULT_INDICATOR_DEPTH: usize = 64;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Settings for [`crate::ExpressionService`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceConfig {
    /// Cache parsed expressions by (text, usage)
    pub cache_enabled: bool,
    /// Maximum cached expressions, 0 for no limit
    pub cache_capacity: usize,
    /// Bound on evaluation nesting
    pub max_depth: usize,
    /// Bound on `N{..}` chains followed during indicator expansion
    pub max_indicator_depth: usize,
    /// Strategy applied when a caller does not pick one
    pub default_strategy: MissingValueStrategy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            cache_capacity: 10_000,
            max_depth: DEFAULT_MAX_DEPTH,
            max_indicator_depth: DEFAULT_INDICATOR_DEPTH,
            default_strategy: MissingValueStrategy::default(),
        }
    }
}

impl ServiceConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("maxDepth must be at least 1".to_string()));
        }
        if self.max_indicator_depth == 0 {
            return Err(ConfigError::Invalid(
                "maxIndicatorDepth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
