//! Streaming Merkle sum tree
//!
//! This crate builds a binary Merkle tree over a stream of leaves where every
//! leaf carries a hash and a `u64` sum, and every internal node commits to the
//! sum of the leaves below it.
//!
//! The tree supports:
//! - Streaming construction in `O(log n)` memory
//! - Inclusion proofs for one leaf chosen before construction starts
//! - Stateless proof verification
//! - Pluggable hash functions through the `Hasher` trait
//! - Building trees from two parallel byte streams (hashes and sums)

mod error;
mod node;
mod proof;
mod reader;
mod tree;

pub use error::TreeError;
pub use node::{encode_children, ComputedNode, Hasher, Sum};
#[cfg(feature = "blake3")]
pub use node::Blake3;
pub use proof::{proof_path_sides, verify_merkle_proof, MerkleProof};
pub use reader::{build_reader_proof, reader_root, segment_sum, DEFAULT_SEGMENT_SIZE};
pub use tree::{MerkleSumTree, PendingSubtree, ProofTracker, StackEvent, SubtreeStack};

#[cfg(test)]
mod tests;
