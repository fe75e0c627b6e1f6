//! Construction session tying the subtree stack to the proof tracker.

use log::debug;

use super::{ProofTracker, SubtreeStack};
use crate::{ComputedNode, Hasher, MerkleProof, Sum, TreeError};

const LOG_TARGET: &str = "merkle_sum_tree::tree";

/// Streaming Merkle sum tree.
/// * `H` - Hasher used to combine nodes. It is owned by the session.
///
/// Leaves are pushed in order and never stored: memory stays at one pending
/// subtree per bit of the leaf count. Children are always combined in arrival
/// order, older on the left.
#[derive(Clone, Debug)]
pub struct MerkleSumTree<H: Hasher> {
    hasher: H,
    stack: SubtreeStack,
    tracker: ProofTracker,
}

impl<H: Hasher + Default> Default for MerkleSumTree<H> {
    fn default() -> Self {
        Self::new(H::default())
    }
}

impl<H: Hasher> MerkleSumTree<H> {
    pub fn new(hasher: H) -> Self {
        Self {
            hasher,
            stack: SubtreeStack::new(),
            tracker: ProofTracker::new(),
        }
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Number of leaves pushed so far.
    pub fn num_leaves(&self) -> u64 {
        self.stack.num_leaves()
    }

    /// Index of the leaf the session builds a proof for, if any.
    pub fn index(&self) -> Option<u64> {
        self.tracker.index()
    }

    /// Selects the leaf to build a proof for. Must be called at most once,
    /// before the first [`push`](Self::push).
    pub fn set_index(&mut self, index: u64) -> Result<(), TreeError> {
        if self.stack.num_leaves() > 0 {
            return Err(TreeError::InvalidState(
                "proof index must be set before any leaf is pushed",
            ));
        }
        self.tracker.set_index(index)
    }

    /// Appends a leaf. The hash is used as-is, it is not hashed again.
    ///
    /// Fails with [`TreeError::SumOverflow`] if the total sum would not fit in
    /// a `u64`, and with [`TreeError::InvalidState`] for an empty hash. The
    /// tree is left unchanged in both cases.
    pub fn push(&mut self, hash: impl Into<Vec<u8>>, sum: Sum) -> Result<(), TreeError> {
        let tracker = &mut self.tracker;
        self.stack
            .push(&self.hasher, ComputedNode::new(hash, sum), |event| {
                tracker.observe(event)
            })
    }

    /// Merkle root of the leaves pushed so far, or [`ComputedNode::empty`] when
    /// there are none. The tree is not modified and more leaves can follow.
    pub fn root(&self) -> Result<ComputedNode, TreeError> {
        let root = self.stack.root(&self.hasher)?;
        debug!(
            target: LOG_TARGET,
            "root over {} leaves: {}",
            self.num_leaves(),
            root
        );
        Ok(root)
    }

    /// Same root as [`root`](Self::root), plus the inclusion proof for the
    /// selected index. The proof is `None` when no index was set or when the
    /// index is not below the number of leaves.
    pub fn prove(&self) -> Result<(ComputedNode, Option<MerkleProof>), TreeError> {
        let root = self.root()?;
        let proof =
            self.tracker
                .finish(&self.hasher, self.stack.subtrees(), self.num_leaves())?;
        if proof.is_none() {
            debug!(
                target: LOG_TARGET,
                "no proof for index {:?}, only {} leaves were pushed",
                self.index(),
                self.num_leaves()
            );
        }
        Ok((root, proof))
    }

    /// Drops every leaf and the proof index, keeping the hasher.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.tracker.clear();
    }
}
