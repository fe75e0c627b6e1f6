mod stack;
mod sum_tree;
mod tracker;

pub use stack::{PendingSubtree, StackEvent, SubtreeStack};
pub use sum_tree::MerkleSumTree;
pub use tracker::ProofTracker;
