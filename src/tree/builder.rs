//! Tree builder for constructing binary Merkle trees over leaf hashes

use crate::tree::hasher;
use crate::tree::node::MerkleNode;
use crate::tree::proof::{self, InclusionProof, ProofStep, Side};
use crate::types::Hash;
use std::fmt;
use std::time::Instant;
use tracing::{debug, instrument, trace};

/// Complete Merkle tree structure
///
/// Built once from an ordered list of leaf hashes and never mutated. A change
/// in the inputs requires building a new tree.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    root: MerkleNode,
    leaf_count: usize,
    height: usize,
}

impl MerkleTree {
    /// Build the tree from an ordered list of leaf hashes
    ///
    /// Adjacent hashes are paired left to right. When a level has an odd
    /// number of nodes, the last node is paired with a copy of itself. Levels
    /// are folded until a single root remains.
    ///
    /// Returns `None` for an empty input. A single leaf is its own root.
    #[instrument(skip(leaves), fields(leaf_count = leaves.len()))]
    pub fn from_leaves(leaves: &[Hash]) -> Option<Self> {
        if leaves.is_empty() {
            debug!("No leaves, no tree");
            return None;
        }

        let start = Instant::now();
        let mut level: Vec<MerkleNode> = leaves.iter().cloned().map(MerkleNode::leaf).collect();
        let mut height = 0;

        while level.len() > 1 {
            let mut next = Vec::with_capacity((level.len() + 1) / 2);
            let mut nodes = level.into_iter();

            while let Some(left) = nodes.next() {
                let right = match nodes.next() {
                    Some(right) => right,
                    // Odd count: duplicate, never drop or promote
                    None => left.clone(),
                };
                let hash = hasher::compute_node_hash(left.hash(), right.hash());
                next.push(MerkleNode::Internal {
                    hash,
                    left: Box::new(left),
                    right: Box::new(right),
                });
            }

            height += 1;
            trace!(level = height, width = next.len(), "Built tree level");
            level = next;
        }

        let root = level.into_iter().next()?;
        debug!(
            root_hash = %root.hash(),
            height,
            duration_us = start.elapsed().as_micros() as u64,
            "Tree build completed"
        );

        Some(Self {
            root,
            leaf_count: leaves.len(),
            height,
        })
    }

    pub fn root(&self) -> &MerkleNode {
        &self.root
    }

    /// Content identifier of the ordered leaf set
    pub fn root_hash(&self) -> &Hash {
        self.root.hash()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// ceil(log2(leaf_count)); 0 for a single leaf
    pub fn height(&self) -> usize {
        self.height
    }

    /// Inclusion proof for the first leaf (depth-first) whose hash matches
    ///
    /// With duplicate leaf hashes the leftmost match wins. Use
    /// [`MerkleTree::proof_for_index`] when the leaf position is known.
    pub fn proof_for(&self, leaf_hash: &Hash) -> Option<InclusionProof> {
        proof::generate_proof(&self.root, leaf_hash)
    }

    /// Inclusion proof for the leaf at `index` in build order
    ///
    /// Descends from the root following the bits of `index`, most significant
    /// first. Every level is padded to an even width by duplication, so bit
    /// `d` of the index selects the child at depth `height - d`.
    pub fn proof_for_index(&self, index: usize) -> Option<InclusionProof> {
        if index >= self.leaf_count {
            return None;
        }

        let mut steps = Vec::with_capacity(self.height);
        let mut node = &self.root;
        for depth in 0..self.height {
            let (left, right) = node.children()?;
            let bit = (index >> (self.height - 1 - depth)) & 1;
            if bit == 0 {
                steps.push(ProofStep::new(right.hash().clone(), Side::Right));
                node = left;
            } else {
                steps.push(ProofStep::new(left.hash().clone(), Side::Left));
                node = right;
            }
        }

        if !node.is_leaf() {
            return None;
        }

        steps.reverse();
        Some(InclusionProof::new(steps))
    }
}

/// Indented dump: one node hash per line, children two spaces deeper than
/// their parent, left before right.
impl fmt::Display for MerkleTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, &self.root, 0)
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &MerkleNode, depth: usize) -> fmt::Result {
    writeln!(f, "{:indent$}{}", "", node.hash(), indent = depth * 2)?;
    if let Some((left, right)) = node.children() {
        write_node(f, left, depth + 1)?;
        write_node(f, right, depth + 1)?;
    }
    Ok(())
}

/// Compute the root hash of an ordered leaf list
///
/// Convenience for callers that only need the content identifier.
pub fn compute_root(leaves: &[Hash]) -> Option<Hash> {
    MerkleTree::from_leaves(leaves).map(|tree| tree.root_hash().clone())
}
