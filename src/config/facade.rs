//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::VcsConfig;
use config::ConfigError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from files and environment.
    pub fn load(workspace_root: &Path) -> Result<VcsConfig, ConfigError> {
        MergeService::load(workspace_root)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<VcsConfig, ConfigError> {
        MergeService::load_from_file(path)
    }

    /// Explicit file when given, standard sources otherwise.
    pub fn resolve(
        workspace_root: &Path,
        config_path: Option<&Path>,
    ) -> Result<VcsConfig, ConfigError> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => Self::load(workspace_root),
        }
    }

    /// Create default configuration.
    pub fn default() -> VcsConfig {
        VcsConfig::default()
    }
}
