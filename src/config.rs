//! Configuration System
//!
//! Layered configuration: built-in defaults, a global file, a workspace file
//! and `MVCS__*` environment variables, merged with the `config` crate.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::tree::walker::WalkerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod facade;
mod merge {
    pub mod merge_policy;
    pub mod service;
}
mod sources {
    pub mod environment;
    pub mod global_file;
    pub mod workspace_file;
}

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VcsConfig {
    /// Workspace root used when `--workspace` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,

    /// Storage paths
    #[serde(default)]
    pub storage: StorageConfig,

    /// What a workspace-wide commit picks up
    #[serde(default)]
    pub snapshot: SnapshotConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".mvcs/store")
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the commit store (relative to workspace root unless absolute)
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

impl StorageConfig {
    /// Resolve the store path to an actual filesystem location.
    pub fn resolve_store_path(&self, workspace_root: &Path) -> PathBuf {
        if self.store_path.is_absolute() {
            self.store_path.clone()
        } else {
            workspace_root.join(&self.store_path)
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
        }
    }
}

fn default_ignore_patterns() -> Vec<String> {
    WalkerConfig::default().ignore_patterns
}

fn default_message() -> String {
    "Default commit message".to_string()
}

/// Snapshot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// File or directory names skipped when walking the workspace
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,

    /// Include dotfiles and dot-directories
    #[serde(default)]
    pub include_hidden: bool,

    /// Message used when a commit is made without one
    #[serde(default = "default_message")]
    pub default_message: String,
}

impl SnapshotConfig {
    /// Walker settings for a workspace-wide commit
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig {
            ignore_patterns: self.ignore_patterns.clone(),
            include_hidden: self.include_hidden,
            ..WalkerConfig::default()
        }
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            ignore_patterns: default_ignore_patterns(),
            include_hidden: false,
            default_message: default_message(),
        }
    }
}

impl VcsConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.storage.store_path.as_os_str().is_empty() {
            return Err(ApiError::ConfigError(
                "Store path cannot be empty".to_string(),
            ));
        }
        if self.snapshot.default_message.trim().is_empty() {
            return Err(ApiError::ConfigError(
                "Default commit message cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Effective configuration rendered as TOML
    pub fn to_toml(&self) -> Result<String, ApiError> {
        toml::to_string_pretty(self)
            .map_err(|e| ApiError::ConfigError(format!("Failed to render configuration: {}", e)))
    }
}
