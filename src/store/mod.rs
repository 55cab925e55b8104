//! Commit Store
//!
//! Durable storage of commit records keyed by commit identifier, with an
//! insertion-ordered history index.

pub mod persistence;

pub use persistence::SledCommitStore;

use crate::error::StorageError;
use crate::types::{CommitID, Hash};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Snapshot contents: stored filename key -> full file content
///
/// Iteration order of this map is the leaf order of the commit's tree.
pub type FileMap = BTreeMap<String, Vec<u8>>;

/// CommitRecord: one immutable snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub commit_id: CommitID,
    /// RFC 3339 UTC timestamp
    pub timestamp: String,
    pub root_hash: Hash,
    pub message: String,
    pub files: FileMap,
}

/// CommitEntry: history line for a commit, without file contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitEntry {
    pub commit_id: CommitID,
    pub message: String,
    pub timestamp: String,
    pub root_hash: Hash,
    pub file_count: usize,
}

impl From<&CommitRecord> for CommitEntry {
    fn from(record: &CommitRecord) -> Self {
        Self {
            commit_id: record.commit_id.clone(),
            message: record.message.clone(),
            timestamp: record.timestamp.clone(),
            root_hash: record.root_hash.clone(),
            file_count: record.files.len(),
        }
    }
}

/// Commit Store interface
pub trait CommitStore {
    /// Persist a new record. Fails with `CommitExists` instead of overwriting.
    fn put(&self, record: &CommitRecord) -> Result<(), StorageError>;

    /// Exact-match lookup; `None` when the id is unknown.
    fn get(&self, commit_id: &str) -> Result<Option<CommitRecord>, StorageError>;

    /// All commits in insertion order.
    fn list(&self) -> Result<Vec<CommitEntry>, StorageError>;
}
