use std::fmt::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{encode_children, Hasher, Sum};
use crate::TreeError;

/// A `(hash, sum)` pair. Leaves, pending subtrees, proof siblings and roots are
/// all represented by this type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComputedNode {
    node_hash: Vec<u8>,
    sum: Sum,
}

impl ComputedNode {
    pub fn new(node_hash: impl Into<Vec<u8>>, sum: Sum) -> Self {
        Self {
            node_hash: node_hash.into(),
            sum,
        }
    }

    /// Root of a tree that has no leaves: an empty hash and a zero sum.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true for the empty tree root.
    pub fn is_empty(&self) -> bool {
        self.node_hash.is_empty()
    }

    /// Combines two children into their parent. This function performs a hash
    /// and an addition.
    pub fn join<H: Hasher>(hasher: &H, left: &Self, right: &Self) -> Result<Self, TreeError> {
        let sum = left
            .sum
            .checked_add(right.sum)
            .ok_or(TreeError::SumOverflow)?;
        Ok(Self {
            node_hash: hasher.hash(&encode_children(left, right)),
            sum,
        })
    }

    /// Returns the hash of the node.
    pub fn hash(&self) -> &[u8] {
        &self.node_hash
    }

    /// Returns the sum of the node.
    pub fn sum(&self) -> Sum {
        self.sum
    }
}

impl Display for ComputedNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Computed {{ sum: {}, hash: {} }}",
            self.sum(),
            hex::encode(self.hash())
        )
    }
}

#[cfg(test)]
mod test {
    use super::ComputedNode;
    use crate::TreeError;
    use hex_literal::hex;
    use sha2::Sha256;

    #[test]
    fn test_computed_node_new() {
        let computed_node = ComputedNode::new(
            hex!("0000000000000000000000000000000000000000000000000000000000000000"),
            1,
        );
        assert_eq!(
            computed_node.hash(),
            hex!("0000000000000000000000000000000000000000000000000000000000000000")
        );
        assert_eq!(computed_node.sum(), 1);
        assert!(!computed_node.is_empty());
    }

    #[test]
    fn test_computed_node_display() {
        let computed_node = ComputedNode::new(
            hex!("0000000000000000000000000000000000000000000000000000000000000000"),
            1,
        );
        assert_eq!(format!("{}", computed_node), "Computed { sum: 1, hash: 0000000000000000000000000000000000000000000000000000000000000000 }");
        assert_eq!(
            format!("{}", ComputedNode::empty()),
            "Computed { sum: 0, hash:  }"
        );
    }

    #[test]
    fn test_join() {
        let parent = ComputedNode::join(
            &Sha256::default(),
            &ComputedNode::new(b"a".to_vec(), 1),
            &ComputedNode::new(b"b".to_vec(), 2),
        )
        .unwrap();
        assert_eq!(parent.sum(), 3);
        assert_eq!(
            parent.hash(),
            hex!("acfc8d75b1c2fb74bf30eb729f3ea1db3134794608b62e1974e3f16627af1036")
        );
    }

    #[test]
    fn test_join_is_ordered() {
        let a = ComputedNode::new(b"a".to_vec(), 1);
        let b = ComputedNode::new(b"b".to_vec(), 2);
        let hasher = Sha256::default();
        assert_ne!(
            ComputedNode::join(&hasher, &a, &b).unwrap(),
            ComputedNode::join(&hasher, &b, &a).unwrap()
        );
    }

    #[test]
    fn test_join_overflow() {
        let err = ComputedNode::join(
            &Sha256::default(),
            &ComputedNode::new(b"a".to_vec(), u64::MAX),
            &ComputedNode::new(b"b".to_vec(), 1),
        )
        .unwrap_err();
        assert_eq!(err, TreeError::SumOverflow);
        let max = ComputedNode::join(
            &Sha256::default(),
            &ComputedNode::new(b"a".to_vec(), u64::MAX - 1),
            &ComputedNode::new(b"b".to_vec(), 1),
        )
        .unwrap();
        assert_eq!(max.sum(), u64::MAX);
    }
}
