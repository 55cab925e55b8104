//! Repository: commit, history, revert and proof operations over a commit store
//!
//! A `Repository` owns the open store for its lifetime. `commit` and the
//! revert operations hold an internal guard for their whole duration, so
//! calls from several threads of one process never interleave. Sled locks the
//! store directory, which keeps a second process out.

use crate::config::VcsConfig;
use crate::error::{ApiError, StorageError};
use crate::store::{CommitEntry, CommitRecord, CommitStore, FileMap, SledCommitStore};
use crate::tree::builder::MerkleTree;
use crate::tree::hasher::{compute_content_hash, compute_hash};
use crate::tree::path::{nfc, restore_path, to_store_key};
use crate::tree::proof::{verify_proof, InclusionProof};
use crate::tree::walker::Walker;
use crate::types::{CommitID, Hash};
use chrono::{SecondsFormat, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Input file that could not be read during a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub error: String,
}

/// Result of a successful commit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitSummary {
    pub commit_id: CommitID,
    pub root_hash: Hash,
    pub timestamp: String,
    pub message: String,
    pub file_count: usize,
    /// Inputs left out of the snapshot
    pub skipped: Vec<SkippedFile>,
}

/// A file a revert could not write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreFailure {
    pub filename: String,
    pub path: PathBuf,
    pub error: String,
}

/// Per-file outcome of a revert
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RevertReport {
    pub commit_id: String,
    /// Stored keys written back, in key order
    pub restored: Vec<String>,
    pub failed: Vec<RestoreFailure>,
}

impl RevertReport {
    /// True when every file of the commit was written
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Inclusion proof for one file of a commit, checked against the stored root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofReport {
    pub commit_id: String,
    pub filename: String,
    pub leaf_hash: Hash,
    pub leaf_index: usize,
    pub proof: InclusionProof,
    pub root_hash: Hash,
    pub verified: bool,
}

/// Integrity check of a stored commit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyReport {
    pub commit_id: String,
    pub stored_root: Hash,
    pub computed_root: Option<Hash>,
    pub file_count: usize,
}

impl VerifyReport {
    pub fn is_intact(&self) -> bool {
        self.computed_root.as_ref() == Some(&self.stored_root)
    }
}

/// Snapshot repository rooted at a workspace directory
pub struct Repository {
    workspace_root: PathBuf,
    store_path: PathBuf,
    store: SledCommitStore,
    config: VcsConfig,
    guard: Mutex<()>,
}

impl Repository {
    /// Open the repository for `workspace_root`, creating the store if needed
    pub fn open(workspace_root: &Path, config: &VcsConfig) -> Result<Self, ApiError> {
        config.validate()?;
        let workspace_root = canonical_workspace(workspace_root)?;
        let store_path = config.storage.resolve_store_path(&workspace_root);
        Self::open_store(workspace_root, store_path, config)
    }

    /// Open the repository only if its store already exists
    ///
    /// Returns `None` without touching the filesystem when there is no store.
    pub fn open_existing(
        workspace_root: &Path,
        config: &VcsConfig,
    ) -> Result<Option<Self>, ApiError> {
        config.validate()?;
        let workspace_root = canonical_workspace(workspace_root)?;
        let store_path = config.storage.resolve_store_path(&workspace_root);
        if !store_path.exists() {
            debug!(store = %store_path.display(), "No store yet");
            return Ok(None);
        }
        Self::open_store(workspace_root, store_path, config).map(Some)
    }

    fn open_store(
        workspace_root: PathBuf,
        store_path: PathBuf,
        config: &VcsConfig,
    ) -> Result<Self, ApiError> {
        if let Some(parent) = store_path.parent() {
            std::fs::create_dir_all(parent).map_err(StorageError::from)?;
        }
        let store = SledCommitStore::new(&store_path)?;
        info!(
            workspace = %workspace_root.display(),
            store = %store_path.display(),
            "Opened repository"
        );

        Ok(Self {
            workspace_root,
            store_path,
            store,
            config: config.clone(),
            guard: Mutex::new(()),
        })
    }

    /// Open with default settings and an explicit store location
    pub fn open_at(workspace_root: &Path, store_path: &Path) -> Result<Self, ApiError> {
        let mut config = VcsConfig::default();
        config.storage.store_path = store_path.to_path_buf();
        Self::open(workspace_root, &config)
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    pub fn config(&self) -> &VcsConfig {
        &self.config
    }

    /// Snapshot the given files under `message`
    ///
    /// Unreadable inputs are skipped and listed in the summary. Fails with
    /// `NothingToCommit` when no file could be read; nothing is stored then.
    #[instrument(skip(self, paths), fields(path_count = paths.len()))]
    pub fn commit(&self, paths: &[PathBuf], message: &str) -> Result<CommitSummary, ApiError> {
        let _guard = self.guard.lock();

        let mut files = FileMap::new();
        let mut skipped = Vec::new();
        for path in paths {
            match self.read_input(path) {
                Ok((key, content)) => {
                    debug!(key = %key, bytes = content.len(), "Read file");
                    files.insert(key, content);
                }
                Err(error) => {
                    warn!(path = %path.display(), error = %error, "Skipping unreadable file");
                    skipped.push(SkippedFile {
                        path: path.clone(),
                        error,
                    });
                }
            }
        }

        if files.is_empty() {
            return Err(ApiError::NothingToCommit);
        }

        let leaves: Vec<Hash> = files.values().map(|c| compute_content_hash(c)).collect();
        let tree = MerkleTree::from_leaves(&leaves).ok_or(ApiError::NothingToCommit)?;
        let root_hash = tree.root_hash().clone();

        let now = Utc::now();
        let timestamp = now.to_rfc3339_opts(SecondsFormat::Micros, true);
        let seq = self.store.db().generate_id().map_err(|e| {
            StorageError::IoError(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
        })?;
        let nanos = now.timestamp_nanos_opt().unwrap_or_default();
        let commit_id = compute_hash(format!("{}:{}:{}", root_hash, nanos, seq).as_bytes());

        let record = CommitRecord {
            commit_id: commit_id.clone(),
            timestamp: timestamp.clone(),
            root_hash: root_hash.clone(),
            message: message.to_string(),
            files,
        };
        self.store.put(&record)?;

        info!(
            commit_id = %commit_id,
            root_hash = %root_hash,
            file_count = record.files.len(),
            skipped = skipped.len(),
            "Committed snapshot"
        );

        Ok(CommitSummary {
            commit_id,
            root_hash,
            timestamp,
            message: record.message,
            file_count: record.files.len(),
            skipped,
        })
    }

    /// Snapshot every file the workspace walk yields
    pub fn commit_workspace(&self, message: &str) -> Result<CommitSummary, ApiError> {
        let mut walker_config = self.config.snapshot.walker_config();
        walker_config.excluded_paths.push(self.store_path.clone());
        let paths = Walker::with_config(self.workspace_root.clone(), walker_config).walk()?;
        self.commit(&paths, message)
    }

    /// All commits, oldest first
    pub fn history(&self) -> Result<Vec<CommitEntry>, ApiError> {
        Ok(self.store.list()?)
    }

    /// Look up a commit by its full identifier
    pub fn get_commit(&self, commit_id: &str) -> Result<CommitRecord, ApiError> {
        self.store
            .get(commit_id)?
            .ok_or_else(|| ApiError::CommitNotFound(commit_id.to_string()))
    }

    /// Write every file of a commit back to where it was taken from
    pub fn revert(&self, commit_id: &str) -> Result<RevertReport, ApiError> {
        let _guard = self.guard.lock();
        let record = self.get_commit(commit_id)?;
        Ok(self.restore(&record, &self.workspace_root, false))
    }

    /// Write every file of a commit under `dest`
    ///
    /// Keys outside the workspace are re-rooted below `dest` as well.
    pub fn revert_into(&self, commit_id: &str, dest: &Path) -> Result<RevertReport, ApiError> {
        let _guard = self.guard.lock();
        let record = self.get_commit(commit_id)?;
        Ok(self.restore(&record, dest, true))
    }

    #[instrument(skip(self, record, base), fields(commit_id = %record.commit_id, base = %base.display()))]
    fn restore(&self, record: &CommitRecord, base: &Path, reroot: bool) -> RevertReport {
        let mut report = RevertReport {
            commit_id: record.commit_id.to_string(),
            ..RevertReport::default()
        };

        for (key, content) in &record.files {
            let target = restore_path(key, base, reroot);
            match write_file(&target, content) {
                Ok(()) => {
                    debug!(key = %key, path = %target.display(), "Restored file");
                    report.restored.push(key.clone());
                }
                Err(e) => {
                    warn!(key = %key, path = %target.display(), error = %e, "Failed to restore file");
                    report.failed.push(RestoreFailure {
                        filename: key.clone(),
                        path: target,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            restored = report.restored.len(),
            failed = report.failed.len(),
            "Reverted commit"
        );
        report
    }

    /// Inclusion proof for `filename` within a commit
    ///
    /// `filename` is either a stored key or a path that maps to one.
    pub fn prove(&self, commit_id: &str, filename: &str) -> Result<ProofReport, ApiError> {
        let record = self.get_commit(commit_id)?;
        let key = self.lookup_key(&record, filename).ok_or_else(|| {
            ApiError::FileNotInCommit {
                commit_id: commit_id.to_string(),
                filename: filename.to_string(),
            }
        })?;

        let leaves: Vec<Hash> = record.files.values().map(|c| compute_content_hash(c)).collect();
        let leaf_index = record
            .files
            .keys()
            .position(|k| *k == key)
            .ok_or_else(|| ApiError::FileNotInCommit {
                commit_id: commit_id.to_string(),
                filename: filename.to_string(),
            })?;
        let leaf_hash = leaves[leaf_index].clone();

        let tree = MerkleTree::from_leaves(&leaves).ok_or(ApiError::NothingToCommit)?;
        let proof = tree
            .proof_for_index(leaf_index)
            .ok_or_else(|| ApiError::FileNotInCommit {
                commit_id: commit_id.to_string(),
                filename: filename.to_string(),
            })?;
        let verified = verify_proof(&leaf_hash, &proof, &record.root_hash);
        debug!(key = %key, leaf_index, steps = proof.len(), verified, "Generated proof");

        Ok(ProofReport {
            commit_id: record.commit_id.to_string(),
            filename: key,
            leaf_hash,
            leaf_index,
            proof,
            root_hash: record.root_hash,
            verified,
        })
    }

    /// Re-hash a commit's contents and compare with its stored root
    pub fn verify(&self, commit_id: &str) -> Result<VerifyReport, ApiError> {
        let record = self.get_commit(commit_id)?;
        let computed_root = rebuild_tree(&record).map(|t| t.root_hash().clone());

        let report = VerifyReport {
            commit_id: record.commit_id.to_string(),
            stored_root: record.root_hash,
            computed_root,
            file_count: record.files.len(),
        };
        if !report.is_intact() {
            warn!(commit_id = %report.commit_id, "Stored root does not match contents");
        }
        Ok(report)
    }

    /// Merkle tree rebuilt from a commit's stored contents
    pub fn commit_tree(&self, commit_id: &str) -> Result<MerkleTree, ApiError> {
        let record = self.get_commit(commit_id)?;
        rebuild_tree(&record).ok_or_else(|| ApiError::CommitNotFound(commit_id.to_string()))
    }

    fn read_input(&self, path: &Path) -> Result<(String, Vec<u8>), String> {
        let resolved = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace_root.join(path)
        };
        let content = std::fs::read(&resolved).map_err(|e| e.to_string())?;
        let key = to_store_key(&resolved, &self.workspace_root).map_err(|e| e.to_string())?;
        Ok((key, content))
    }

    /// Exact key, then the key of an existing path, then a key equal under NFC
    fn lookup_key(&self, record: &CommitRecord, filename: &str) -> Option<String> {
        if record.files.contains_key(filename) {
            return Some(filename.to_string());
        }
        if let Ok(key) = to_store_key(Path::new(filename), &self.workspace_root) {
            if record.files.contains_key(&key) {
                return Some(key);
            }
        }
        let wanted = nfc(filename);
        record.files.keys().find(|k| nfc(k) == wanted).cloned()
    }
}

fn canonical_workspace(workspace_root: &Path) -> Result<PathBuf, StorageError> {
    dunce::canonicalize(workspace_root).map_err(|e| {
        StorageError::InvalidPath(format!(
            "Workspace {} is not accessible: {}",
            workspace_root.display(),
            e
        ))
    })
}

fn rebuild_tree(record: &CommitRecord) -> Option<MerkleTree> {
    let leaves: Vec<Hash> = record.files.values().map(|c| compute_content_hash(c)).collect();
    MerkleTree::from_leaves(&leaves)
}

fn write_file(target: &Path, content: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(target, content)
}
