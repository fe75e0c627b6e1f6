//! Inclusion proofs.
//!
//! A proof carries the proven leaf, its siblings from the leaf up to the root,
//! the index of the leaf and the number of leaves in the tree. Which side each
//! sibling sits on only depends on the index and the number of leaves, see
//! [`proof_path_sides`].

use bitvec::order::Lsb0;
use bitvec::vec::BitVec;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{ComputedNode, Hasher, Sum, TreeError};

/// A merkle proof for the leaf at `index`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MerkleProof {
    leaf: ComputedNode,
    siblings: Vec<ComputedNode>,
    sides: BitVec<u8, Lsb0>,
    index: u64,
    num_leaves: u64,
}

impl MerkleProof {
    /// Creates a new proof. A set bit in `sides` marks a sibling that is the
    /// left operand when hashed with the current node.
    pub fn new(
        leaf: ComputedNode,
        siblings: Vec<ComputedNode>,
        sides: BitVec<u8, Lsb0>,
        index: u64,
        num_leaves: u64,
    ) -> Self {
        Self {
            leaf,
            siblings,
            sides,
            index,
            num_leaves,
        }
    }

    /// Returns the proven leaf.
    pub fn leaf(&self) -> &ComputedNode {
        &self.leaf
    }

    /// Returns the siblings, from the leaf to the root.
    pub fn siblings(&self) -> &[ComputedNode] {
        &self.siblings
    }

    pub fn sides(&self) -> &BitVec<u8, Lsb0> {
        &self.sides
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn num_leaves(&self) -> u64 {
        self.num_leaves
    }

    pub fn sibling_hashes(&self) -> Vec<&[u8]> {
        self.siblings.iter().map(ComputedNode::hash).collect()
    }

    pub fn sibling_sums(&self) -> Vec<Sum> {
        self.siblings.iter().map(ComputedNode::sum).collect()
    }

    /// Recomputes the root from the leaf using the recorded sides.
    pub fn root<H: Hasher>(&self, hasher: &H) -> Result<ComputedNode, TreeError> {
        if self.sides.len() != self.siblings.len() {
            return Err(TreeError::InvalidState("one side is needed per sibling"));
        }
        walk_up(hasher, &self.leaf, &self.siblings, self.sides.iter().by_vals())
    }

    /// Verifies the proof against a root. The recorded sides are not trusted,
    /// they are derived again from the index and the number of leaves.
    pub fn verify<H: Hasher>(&self, hasher: &H, root: &ComputedNode) -> bool {
        verify_merkle_proof(
            hasher,
            root.hash(),
            root.sum(),
            &self.leaf,
            &self.siblings,
            self.index,
            self.num_leaves,
        )
    }

    /// Encodes the proof into a byte vector:
    /// `index ‖ num_leaves ‖ leaf ‖ sibling count ‖ siblings`, integers in
    /// big-endian and each node as `hash length (u16) ‖ hash ‖ sum (u64)`.
    pub fn encode(&self) -> Result<Vec<u8>, TreeError> {
        let count = u16::try_from(self.siblings.len())
            .map_err(|_| TreeError::InvalidProofEncoding("too many siblings"))?;
        let mut encoded = Vec::new();
        encoded.extend_from_slice(&self.index.to_be_bytes());
        encoded.extend_from_slice(&self.num_leaves.to_be_bytes());
        encode_node(&mut encoded, &self.leaf)?;
        encoded.extend_from_slice(&count.to_be_bytes());
        for sibling in self.siblings.iter() {
            encode_node(&mut encoded, sibling)?;
        }
        Ok(encoded)
    }

    /// Decodes a proof produced by [`encode`](Self::encode).
    pub fn decode(mut data: &[u8]) -> Result<Self, TreeError> {
        let index = read_u64(&mut data)?;
        let num_leaves = read_u64(&mut data)?;
        let leaf = decode_node(&mut data)?;
        let count = u16::from_be_bytes(take::<2>(&mut data)?);
        let sides = proof_path_sides(index, num_leaves)
            .ok_or(TreeError::InvalidProofEncoding("index out of range"))?;
        if sides.len() != count as usize {
            return Err(TreeError::InvalidProofEncoding(
                "sibling count does not match the tree shape",
            ));
        }
        let siblings = (0..count)
            .map(|_| decode_node(&mut data))
            .collect::<Result<Vec<_>, _>>()?;
        if !data.is_empty() {
            return Err(TreeError::InvalidProofEncoding("trailing bytes"));
        }
        Ok(Self::new(leaf, siblings, sides, index, num_leaves))
    }
}

/// Sides of the siblings on the path of leaf `index` in a tree of
/// `num_leaves` leaves, from the leaf to the root. A set bit means the sibling
/// is the left operand. Returns `None` if `index` is not a leaf of the tree.
///
/// The path goes up the largest complete subtree holding the leaf, then takes
/// one right sibling standing for every shorter subtree after it (if any), then
/// one left sibling per taller subtree before it.
pub fn proof_path_sides(index: u64, num_leaves: u64) -> Option<BitVec<u8, Lsb0>> {
    if index >= num_leaves {
        return None;
    }
    let (leaf, last) = (index as u128, num_leaves as u128 - 1);
    let mut sides = BitVec::new();
    let mut height = 0;
    let mut covered_to = leaf;
    loop {
        let width = 1u128 << (height + 1);
        let end = leaf / width * width + width - 1;
        if end > last {
            break;
        }
        covered_to = end;
        sides.push((index >> height) & 1 == 1);
        height += 1;
    }
    if covered_to != last {
        sides.push(false);
    }
    let taller = num_leaves.checked_shr(height + 1).unwrap_or(0).count_ones();
    sides.extend(std::iter::repeat(true).take(taller as usize));
    Some(sides)
}

/// Verify a merkle proof.
///
/// # Arguments
///
/// * `hasher` - The hash function the tree was built with
/// * `root_hash`, `root_sum` - The expected root
/// * `leaf` - The `(hash, sum)` of the leaf being proven
/// * `siblings` - The siblings from the leaf to the root
/// * `index` - Position of the leaf
/// * `num_leaves` - Number of leaves in the tree
///
/// # Returns
///
/// Returns `true` if replaying the siblings from the leaf gives back exactly
/// `(root_hash, root_sum)`. Malformed proofs simply return `false`.
pub fn verify_merkle_proof<H: Hasher>(
    hasher: &H,
    root_hash: &[u8],
    root_sum: Sum,
    leaf: &ComputedNode,
    siblings: &[ComputedNode],
    index: u64,
    num_leaves: u64,
) -> bool {
    if root_hash.is_empty() {
        return false;
    }
    let Some(sides) = proof_path_sides(index, num_leaves) else {
        return false;
    };
    if sides.len() != siblings.len() {
        return false;
    }
    match walk_up(hasher, leaf, siblings, sides.iter().by_vals()) {
        Ok(root) => root.hash() == root_hash && root.sum() == root_sum,
        Err(_) => false,
    }
}

/// Walk up the tree from `leaf`, combining it with each sibling on the given side.
fn walk_up<H: Hasher>(
    hasher: &H,
    leaf: &ComputedNode,
    siblings: &[ComputedNode],
    sides: impl Iterator<Item = bool>,
) -> Result<ComputedNode, TreeError> {
    let mut current = leaf.clone();
    for (sibling, is_left) in siblings.iter().zip(sides) {
        current = if is_left {
            ComputedNode::join(hasher, sibling, &current)?
        } else {
            ComputedNode::join(hasher, &current, sibling)?
        };
    }
    Ok(current)
}

fn encode_node(encoded: &mut Vec<u8>, node: &ComputedNode) -> Result<(), TreeError> {
    let len = u16::try_from(node.hash().len())
        .map_err(|_| TreeError::InvalidProofEncoding("hash longer than 65535 bytes"))?;
    encoded.extend_from_slice(&len.to_be_bytes());
    encoded.extend_from_slice(node.hash());
    encoded.extend_from_slice(&node.sum().to_be_bytes());
    Ok(())
}

fn decode_node(data: &mut &[u8]) -> Result<ComputedNode, TreeError> {
    let len = u16::from_be_bytes(take::<2>(data)?) as usize;
    if data.len() < len {
        return Err(TreeError::InvalidProofEncoding("truncated hash"));
    }
    let (hash, rest) = data.split_at(len);
    *data = rest;
    let sum = read_u64(data)?;
    Ok(ComputedNode::new(hash, sum))
}

fn read_u64(data: &mut &[u8]) -> Result<u64, TreeError> {
    Ok(u64::from_be_bytes(take::<8>(data)?))
}

fn take<const N: usize>(data: &mut &[u8]) -> Result<[u8; N], TreeError> {
    if data.len() < N {
        return Err(TreeError::InvalidProofEncoding("unexpected end of data"));
    }
    let (head, rest) = data.split_at(N);
    *data = rest;
    let mut bytes = [0u8; N];
    bytes.copy_from_slice(head);
    Ok(bytes)
}
