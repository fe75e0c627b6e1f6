//! Streaming construction engine.
//!
//! Pending subtrees behave like the digits of a binary counter: pushing a leaf
//! adds a height-0 subtree and every carry merges two subtrees of equal height.
//! After `n` leaves the stack holds one subtree per bit set in `n`, tallest
//! (oldest) at the bottom.

use log::trace;

use crate::{ComputedNode, Hasher, Sum, TreeError};

const LOG_TARGET: &str = "merkle_sum_tree::tree::stack";

/// A complete subtree covering `2^height` consecutive leaves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingSubtree {
    node: ComputedNode,
    height: u32,
}

impl PendingSubtree {
    /// Returns the combined `(hash, sum)` of the subtree.
    pub fn node(&self) -> &ComputedNode {
        &self.node
    }

    /// Returns the height of the subtree (0 for a single leaf).
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Events reported by [`SubtreeStack::push`], in the order they happen.
#[derive(Debug)]
pub enum StackEvent<'a> {
    /// A leaf entered the stack at `position`.
    Leaf { position: u64, node: &'a ComputedNode },
    /// Two subtrees of `height` were merged. `right_start` is the position of
    /// the first leaf covered by `right`.
    Merge {
        left: &'a ComputedNode,
        right: &'a ComputedNode,
        height: u32,
        right_start: u64,
    },
}

#[derive(Clone, Debug, Default)]
pub struct SubtreeStack {
    subtrees: Vec<PendingSubtree>,
    num_leaves: u64,
    total: Sum,
}

impl SubtreeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of leaves pushed so far.
    pub fn num_leaves(&self) -> u64 {
        self.num_leaves
    }

    /// Pending subtrees, tallest first.
    pub fn subtrees(&self) -> &[PendingSubtree] {
        &self.subtrees
    }

    /// Appends a leaf and merges equal-height subtrees until none collide.
    ///
    /// Either the whole cascade is applied or, on error, the stack is left as
    /// it was and `on_event` is never called. Leaves with an empty hash are
    /// rejected.
    pub fn push<H: Hasher>(
        &mut self,
        hasher: &H,
        leaf: ComputedNode,
        mut on_event: impl FnMut(StackEvent<'_>),
    ) -> Result<(), TreeError> {
        // An empty hash would make a one-leaf root look like the empty tree.
        if leaf.is_empty() {
            return Err(TreeError::InvalidState("leaf hash must not be empty"));
        }
        // Every internal sum is bounded by the total, so checking it here rules
        // out overflow in the merges below and in the final fold.
        let total = self
            .total
            .checked_add(leaf.sum())
            .ok_or(TreeError::SumOverflow)?;
        let position = self.num_leaves;
        let num_leaves = position
            .checked_add(1)
            .ok_or(TreeError::InvalidState("leaf count exceeds u64::MAX"))?;

        // Right-hand children, lowest merge first.
        let mut merged = Vec::new();
        let mut current = leaf;
        let mut height = 0;
        for left in self.subtrees.iter().rev() {
            if left.height != height {
                break;
            }
            let parent = ComputedNode::join(hasher, &left.node, &current)?;
            merged.push(std::mem::replace(&mut current, parent));
            height += 1;
        }

        on_event(StackEvent::Leaf {
            position,
            node: merged.first().unwrap_or(&current),
        });
        let keep = self.subtrees.len() - merged.len();
        let mut right_start = position;
        for (right, left) in merged.iter().zip(self.subtrees[keep..].iter().rev()) {
            trace!(
                target: LOG_TARGET,
                "merging two subtrees of height {} (right starts at leaf {})",
                left.height,
                right_start
            );
            on_event(StackEvent::Merge {
                left: &left.node,
                right,
                height: left.height,
                right_start,
            });
            right_start -= 1 << left.height;
        }

        self.subtrees.truncate(keep);
        self.subtrees.push(PendingSubtree {
            node: current,
            height,
        });
        self.num_leaves = num_leaves;
        self.total = total;
        trace!(
            target: LOG_TARGET,
            "leaf {} pushed, {} pending subtrees",
            position,
            self.subtrees.len()
        );
        Ok(())
    }

    /// Folds every pending subtree into the root. Returns the empty sentinel
    /// when no leaf was pushed.
    pub fn root<H: Hasher>(&self, hasher: &H) -> Result<ComputedNode, TreeError> {
        Ok(fold_subtrees(hasher, &self.subtrees)?.unwrap_or_else(ComputedNode::empty))
    }

    pub fn clear(&mut self) {
        self.subtrees.clear();
        self.num_leaves = 0;
        self.total = 0;
    }
}

/// Folds `subtrees` from the shortest (last) towards the tallest (first), each
/// older subtree becoming the left sibling of everything folded so far.
pub(crate) fn fold_subtrees<H: Hasher>(
    hasher: &H,
    subtrees: &[PendingSubtree],
) -> Result<Option<ComputedNode>, TreeError> {
    let mut iter = subtrees.iter().rev();
    let Some(last) = iter.next() else {
        return Ok(None);
    };
    let mut current = last.node.clone();
    for left in iter {
        current = ComputedNode::join(hasher, &left.node, &current)?;
    }
    Ok(Some(current))
}
