//! Merkle tree node types

use crate::types::Hash;

/// Merkle node
///
/// Each internal node exclusively owns its two children. When a level has an
/// odd number of nodes the last one is paired with a deep copy of itself, so
/// no node is ever shared between two parents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MerkleNode {
    /// Wraps one leaf hash
    Leaf { hash: Hash },
    /// hash = H(left.hash || right.hash)
    Internal {
        hash: Hash,
        left: Box<MerkleNode>,
        right: Box<MerkleNode>,
    },
}

impl MerkleNode {
    pub fn leaf(hash: Hash) -> Self {
        MerkleNode::Leaf { hash }
    }

    pub fn hash(&self) -> &Hash {
        match self {
            MerkleNode::Leaf { hash } | MerkleNode::Internal { hash, .. } => hash,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, MerkleNode::Leaf { .. })
    }

    /// Children as (left, right), or None for a leaf
    pub fn children(&self) -> Option<(&MerkleNode, &MerkleNode)> {
        match self {
            MerkleNode::Leaf { .. } => None,
            MerkleNode::Internal { left, right, .. } => Some((left, right)),
        }
    }

    /// Number of edges from this node down to its deepest leaf
    pub fn height(&self) -> usize {
        match self {
            MerkleNode::Leaf { .. } => 0,
            MerkleNode::Internal { left, right, .. } => 1 + left.height().max(right.height()),
        }
    }
}
