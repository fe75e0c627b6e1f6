use bitvec::order::Lsb0;
use bitvec::vec::BitVec;

use super::stack::{fold_subtrees, PendingSubtree, StackEvent};
use crate::{ComputedNode, Hasher, MerkleProof, TreeError};

/// Follows the subtree holding the proof leaf through the merges of a
/// [`SubtreeStack`](super::SubtreeStack) and records its siblings.
///
/// Once the leaf is seen, the tracked subtree always has a height equal to the
/// number of siblings recorded so far.
#[derive(Clone, Debug, Default)]
pub struct ProofTracker {
    index: Option<u64>,
    leaf: Option<ComputedNode>,
    siblings: Vec<ComputedNode>,
    /// One bit per sibling, set when the sibling is the left operand.
    sides: BitVec<u8, Lsb0>,
}

impl ProofTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> Option<u64> {
        self.index
    }

    pub fn set_index(&mut self, index: u64) -> Result<(), TreeError> {
        if self.index.is_some() {
            return Err(TreeError::InvalidState("proof index already set"));
        }
        self.index = Some(index);
        Ok(())
    }

    pub fn observe(&mut self, event: StackEvent<'_>) {
        let Some(index) = self.index else {
            return;
        };
        match event {
            StackEvent::Leaf { position, node } => {
                if position == index {
                    self.leaf = Some(node.clone());
                }
            }
            StackEvent::Merge {
                left,
                right,
                height,
                right_start,
            } => {
                if self.leaf.is_none() || height as usize != self.siblings.len() {
                    return;
                }
                if index < right_start {
                    self.siblings.push(right.clone());
                    self.sides.push(false);
                } else {
                    self.siblings.push(left.clone());
                    self.sides.push(true);
                }
            }
        }
    }

    /// Completes the path with the pending subtrees left on the stack.
    ///
    /// Every subtree shorter than the tracked one is folded into a single right
    /// sibling; every taller one becomes a left sibling. Returns `None` when
    /// no index was set or the index was never reached.
    pub fn finish<H: Hasher>(
        &self,
        hasher: &H,
        subtrees: &[PendingSubtree],
        num_leaves: u64,
    ) -> Result<Option<MerkleProof>, TreeError> {
        let (Some(index), Some(leaf)) = (self.index, &self.leaf) else {
            return Ok(None);
        };
        let tracked = subtrees
            .iter()
            .position(|subtree| subtree.height() as usize == self.siblings.len())
            .ok_or(TreeError::InvalidState("tracked subtree missing from the stack"))?;

        let mut siblings = self.siblings.clone();
        let mut sides = self.sides.clone();
        if let Some(right) = fold_subtrees(hasher, &subtrees[tracked + 1..])? {
            siblings.push(right);
            sides.push(false);
        }
        for left in subtrees[..tracked].iter().rev() {
            siblings.push(left.node().clone());
            sides.push(true);
        }
        Ok(Some(MerkleProof::new(
            leaf.clone(),
            siblings,
            sides,
            index,
            num_leaves,
        )))
    }

    /// Forgets the index and everything recorded for it.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
