//! mvcs: Content-Addressable Snapshots over Merkle Trees
//!
//! Snapshots a set of files, identifies each snapshot by the root of a
//! Merkle tree built over the file contents, and restores snapshots or proves
//! that a file belongs to one.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod repository;
pub mod store;
pub mod tree;
pub mod types;

pub use error::{ApiError, StorageError};
pub use repository::{CommitSummary, ProofReport, Repository, RevertReport, VerifyReport};
pub use types::{CommitID, Hash};
