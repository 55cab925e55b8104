//! Binary Merkle Tree
//!
//! Leaf hashes are the fingerprints of file contents; the root hash
//! content-identifies the ordered set of leaves.

pub mod builder;
pub mod hasher;
pub mod node;
pub mod path;
pub mod proof;
pub mod walker;

pub use builder::MerkleTree;
pub use proof::{generate_proof, verify_proof, InclusionProof, ProofStep, Side};
