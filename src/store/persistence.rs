//! Persistence layer for the Commit Store

use crate::error::StorageError;
use crate::store::{CommitEntry, CommitRecord, CommitStore};
use sled::transaction::{ConflictableTransactionError, TransactionError, TransactionResult};
use sled::{Db, Transactional, Tree};
use std::io;
use std::path::Path;
use tracing::{debug, instrument};

const TREE_COMMITS: &str = "commits";
const TREE_HISTORY: &str = "history";

/// Sled-based implementation of CommitStore
///
/// `commits` maps commit id -> bincode(CommitRecord). `history` maps the
/// big-endian sequence number issued by `Db::generate_id` -> bincode(CommitEntry),
/// so iterating it yields commits in insertion order.
///
/// Sled holds an exclusive lock on its directory: only one process may have
/// a store open at a time.
pub struct SledCommitStore {
    db: Db,
    commits: Tree,
    history: Tree,
}

impl SledCommitStore {
    /// Open (or create) a store at the given directory
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = sled::open(path).map_err(|e| {
            StorageError::IoError(io::Error::new(
                io::ErrorKind::Other,
                format!("Failed to open sled database: {}", e),
            ))
        })?;
        Self::from_db(db)
    }

    /// Wrap an already opened database
    pub fn from_db(db: Db) -> Result<Self, StorageError> {
        let commits = db.open_tree(TREE_COMMITS).map_err(to_storage_io)?;
        let history = db.open_tree(TREE_HISTORY).map_err(to_storage_io)?;
        Ok(Self {
            db,
            commits,
            history,
        })
    }

    /// Get the underlying sled database (for advanced operations)
    pub fn db(&self) -> &Db {
        &self.db
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush().map_err(to_storage_io)?;
        Ok(())
    }
}

impl CommitStore for SledCommitStore {
    #[instrument(skip(self, record), fields(commit_id = %record.commit_id))]
    fn put(&self, record: &CommitRecord) -> Result<(), StorageError> {
        let key = record.commit_id.as_str().as_bytes();
        let value = bincode::serialize(record).map_err(to_storage_data)?;
        let entry = bincode::serialize(&CommitEntry::from(record)).map_err(to_storage_data)?;
        let seq = self.db.generate_id().map_err(to_storage_io)?.to_be_bytes();

        // Record and history entry land together or not at all
        let result: TransactionResult<(), ()> =
            (&self.commits, &self.history).transaction(|(commits, history)| {
                if commits.get(key)?.is_some() {
                    return Err(ConflictableTransactionError::Abort(()));
                }
                commits.insert(key, value.as_slice())?;
                history.insert(&seq[..], entry.as_slice())?;
                Ok(())
            });

        match result {
            Ok(()) => {}
            Err(TransactionError::Abort(())) => {
                return Err(StorageError::CommitExists(record.commit_id.clone()));
            }
            Err(TransactionError::Storage(e)) => return Err(to_storage_io(e)),
        }

        self.flush()?;
        debug!(
            seq = u64::from_be_bytes(seq),
            bytes = value.len(),
            "Stored commit record"
        );
        Ok(())
    }

    fn get(&self, commit_id: &str) -> Result<Option<CommitRecord>, StorageError> {
        let Some(raw) = self
            .commits
            .get(commit_id.as_bytes())
            .map_err(to_storage_io)?
        else {
            return Ok(None);
        };
        let record = bincode::deserialize(&raw).map_err(to_storage_data)?;
        Ok(Some(record))
    }

    fn list(&self) -> Result<Vec<CommitEntry>, StorageError> {
        let mut entries = Vec::new();
        for item in self.history.iter() {
            let (_, value) = item.map_err(to_storage_io)?;
            let entry: CommitEntry = bincode::deserialize(&value).map_err(to_storage_data)?;
            entries.push(entry);
        }
        Ok(entries)
    }
}

fn to_storage_io(err: sled::Error) -> StorageError {
    StorageError::IoError(io::Error::new(io::ErrorKind::Other, err.to_string()))
}

fn to_storage_data(err: bincode::Error) -> StorageError {
    StorageError::Serialization(err.to_string())
}
