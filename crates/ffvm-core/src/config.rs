//! Engine configuration
//!
//! Configuration is layered:
//! - default values
//! - a configuration file (JSON, YAML or TOML, chosen by extension)
//! - environment variables (`FFVM_MAX_DEPTH`, `FFVM_DISPLAY_NAMES`)

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default recursion limit for nested values
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Runtime settings of an [`Engine`](crate::Engine)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Deepest nesting the traverser will follow before failing
    pub max_depth: usize,

    /// Report issues under display names declared with `as "..."`
    pub use_display_names: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            use_display_names: true,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            other => {
                return Err(Error::ConfigFile {
                    message: format!("unsupported configuration format {:?}", other.unwrap_or("")),
                    path: Some(path.to_path_buf()),
                })
            }
        };

        config.validate().map_err(|err| match err {
            Error::ConfigFile { message, .. } => Error::ConfigFile {
                message,
                path: Some(path.to_path_buf()),
            },
            other => other,
        })?;

        Ok(config)
    }

    /// Apply environment overrides
    pub fn merge_with_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup, keyed like the environment
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(depth) = lookup("FFVM_MAX_DEPTH") {
            match depth.trim().parse::<usize>() {
                Ok(depth) if depth > 0 => self.max_depth = depth,
                _ => tracing::warn!("Invalid FFVM_MAX_DEPTH: {}, keeping {}", depth, self.max_depth),
            }
        }

        if let Some(flag) = lookup("FFVM_DISPLAY_NAMES") {
            match flag.trim().to_lowercase().as_str() {
                "true" | "1" => self.use_display_names = true,
                "false" | "0" => {
                    tracing::warn!("display names disabled, issues will use declared field names");
                    self.use_display_names = false;
                }
                _ => tracing::warn!("Invalid FFVM_DISPLAY_NAMES: {}, using default", flag),
            }
        }
    }

    /// Check the configuration for unusable values
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(Error::ConfigFile {
                message: "max_depth must be positive".to_string(),
                path: None,
            });
        }
        Ok(())
    }
}
