//! Inclusion proofs: generation from a built tree and tree-free verification

use crate::tree::hasher;
use crate::tree::node::MerkleNode;
use crate::types::Hash;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the running hash a sibling is concatenated on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Sibling is the left child: computed = H(sibling || computed)
    #[serde(rename = "L")]
    Left,
    /// Sibling is the right child: computed = H(computed || sibling)
    #[serde(rename = "R")]
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("L"),
            Side::Right => f.write_str("R"),
        }
    }
}

/// One level of an inclusion proof
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    pub sibling: Hash,
    pub side: Side,
}

impl ProofStep {
    pub fn new(sibling: Hash, side: Side) -> Self {
        Self { sibling, side }
    }
}

/// Sibling path from a leaf up to the root, ordered leaf first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InclusionProof {
    steps: Vec<ProofStep>,
}

impl InclusionProof {
    pub fn new(steps: Vec<ProofStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[ProofStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Recompute the root implied by this proof for `leaf_hash`
    pub fn compute_root(&self, leaf_hash: &Hash) -> Hash {
        self.steps
            .iter()
            .fold(leaf_hash.clone(), |computed, step| match step.side {
                Side::Left => hasher::compute_node_hash(&step.sibling, &computed),
                Side::Right => hasher::compute_node_hash(&computed, &step.sibling),
            })
    }
}

/// Generate an inclusion proof for `target` under `root`
///
/// Depth-first, left subtree before right. If several leaves carry the same
/// hash, the proof is for the first one reached in that order. Returns `None`
/// when no leaf matches.
pub fn generate_proof(root: &MerkleNode, target: &Hash) -> Option<InclusionProof> {
    let mut steps = Vec::new();
    if find_proof(root, target, &mut steps) {
        Some(InclusionProof::new(steps))
    } else {
        None
    }
}

/// Appends the sibling of each node on the path while unwinding, which
/// yields leaf-to-root order.
fn find_proof(node: &MerkleNode, target: &Hash, steps: &mut Vec<ProofStep>) -> bool {
    match node {
        MerkleNode::Leaf { hash } => hash == target,
        MerkleNode::Internal { left, right, .. } => {
            if find_proof(left, target, steps) {
                steps.push(ProofStep::new(right.hash().clone(), Side::Right));
                return true;
            }
            if find_proof(right, target, steps) {
                steps.push(ProofStep::new(left.hash().clone(), Side::Left));
                return true;
            }
            false
        }
    }
}

/// Check that `leaf_hash` is included under `root_hash`
///
/// Needs only the three inputs; no access to the tree.
pub fn verify_proof(leaf_hash: &Hash, proof: &InclusionProof, root_hash: &Hash) -> bool {
    &proof.compute_root(leaf_hash) == root_hash
}
