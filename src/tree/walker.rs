//! Workspace walker: enumerates the files a default commit snapshots

use crate::error::StorageError;
use std::path::PathBuf;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Walker configuration
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Path components to skip (e.g. ".git", "target")
    pub ignore_patterns: Vec<String>,
    /// Whether to include entries whose name starts with '.'
    pub include_hidden: bool,
    /// Paths skipped together with everything beneath them (e.g. the store)
    pub excluded_paths: Vec<PathBuf>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            ignore_patterns: vec![
                ".mvcs".to_string(),
                ".git".to_string(),
                "target".to_string(),
            ],
            include_hidden: false,
            excluded_paths: Vec::new(),
        }
    }
}

/// Filesystem walker
pub struct Walker {
    root: PathBuf,
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given root path
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            config: WalkerConfig::default(),
        }
    }

    /// Create a walker with custom configuration
    pub fn with_config(root: PathBuf, config: WalkerConfig) -> Self {
        Self { root, config }
    }

    /// Walk the workspace and collect all regular files
    ///
    /// Returns paths sorted for determinism.
    pub fn walk(&self) -> Result<Vec<PathBuf>, StorageError> {
        let mut files = Vec::new();

        // Symlinks are never followed
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.should_skip(entry));

        for entry in walker {
            let entry = entry.map_err(|e| {
                StorageError::IoError(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("Failed to walk directory: {}", e),
                ))
            })?;

            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }

        files.sort();
        debug!(root = %self.root.display(), file_count = files.len(), "Walked workspace");
        Ok(files)
    }

    /// Whether an entry (and, for directories, its contents) is skipped
    fn should_skip(&self, entry: &DirEntry) -> bool {
        // Never skip the root itself, whatever its name
        if entry.depth() == 0 {
            return false;
        }

        let name = entry.file_name().to_string_lossy();
        if !self.config.include_hidden && name.starts_with('.') {
            return true;
        }
        if self
            .config
            .ignore_patterns
            .iter()
            .any(|pattern| pattern.as_str() == name)
        {
            return true;
        }

        self.config
            .excluded_paths
            .iter()
            .any(|excluded| entry.path().starts_with(excluded))
    }
}
