use super::ComputedNode;

/// Bytes hashed to produce the parent of `left` and `right`:
/// `left.hash ‖ left.sum ‖ right.hash ‖ right.sum`, sums as 8 big-endian bytes.
///
/// Hashes are written as-is, without a length prefix, so the layout is only
/// unambiguous when every hash in the tree has the same width.
pub fn encode_children(left: &ComputedNode, right: &ComputedNode) -> Vec<u8> {
    [
        left.hash(),
        left.sum().to_be_bytes().as_slice(),
        right.hash(),
        right.sum().to_be_bytes().as_slice(),
    ]
    .concat()
}

#[cfg(test)]
mod test {
    use super::encode_children;
    use crate::ComputedNode;

    #[test]
    fn test_encode_children_layout() {
        let encoded = encode_children(
            &ComputedNode::new(vec![0xaa; 4], 1),
            &ComputedNode::new(vec![0xbb; 2], 0x0102),
        );
        assert_eq!(
            encoded,
            vec![
                0xaa, 0xaa, 0xaa, 0xaa, 0, 0, 0, 0, 0, 0, 0, 1, 0xbb, 0xbb, 0, 0, 0, 0, 0, 0, 1,
                2
            ]
        );
    }

    #[test]
    fn test_encode_children_is_stable() {
        let left = ComputedNode::new(vec![1; 32], u64::MAX);
        let right = ComputedNode::new(vec![2; 32], 0);
        assert_eq!(encode_children(&left, &right), encode_children(&left, &right));
        assert_eq!(encode_children(&left, &right).len(), 80);
        assert_eq!(&encode_children(&left, &right)[32..40], &[0xff; 8]);
    }
}
