//! Hash computation for leaves and internal nodes using BLAKE3

use crate::types::Hash;
use blake3::Hasher;

/// Compute a generic hash of arbitrary data
pub fn compute_hash(data: &[u8]) -> Hash {
    let mut hasher = Hasher::new();
    hasher.update(data);
    Hash::from_digest(hasher.finalize().as_bytes())
}

/// Compute content hash for file bytes
///
/// This is the leaf fingerprint of a file.
pub fn compute_content_hash(content: &[u8]) -> Hash {
    compute_hash(content)
}

/// Compute the hash of an internal node
///
/// hash = H(left_hex || right_hex), concatenating the hex strings of the two
/// children, left first.
pub fn compute_node_hash(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = Hasher::new();
    hasher.update(left.as_str().as_bytes());
    hasher.update(right.as_str().as_bytes());
    Hash::from_digest(hasher.finalize().as_bytes())
}
