//! Shared test utilities for integration tests
//!
//! Each test gets its own workspace directory and store, so tests can run in
//! parallel without sharing sled locks.

use mvcs::config::VcsConfig;
use mvcs::Repository;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary workspace with an open repository
pub struct TestWorkspace {
    pub dir: TempDir,
    pub repo: Repository,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let repo = Repository::open(dir.path(), &VcsConfig::default()).unwrap();
        Self { dir, repo }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` to `rel` inside the workspace, creating parents
    pub fn write(&self, rel: &str, content: &[u8]) -> PathBuf {
        write_file(self.root(), rel, content)
    }
}

pub fn write_file(root: &Path, rel: &str, content: &[u8]) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}
