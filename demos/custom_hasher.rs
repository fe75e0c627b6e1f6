//! Example of implementing a custom hasher for the Merkle sum tree
//!
//! This example demonstrates:
//! - Creating a custom hasher implementation
//! - Using it with the tree
//! - Checking that proofs only verify with the hasher the tree was built with

use merkle_sum_tree::{Hasher, MerkleSumTree};
use sha2::{Digest, Sha256};

// Custom hasher that uses SHA256 but adds a prefix to the input
#[derive(Clone)]
struct PrefixedSha256 {
    prefix: Vec<u8>,
}

impl Hasher for PrefixedSha256 {
    fn hash(&self, data: &[u8]) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(&self.prefix);
        hasher.update(data);
        hasher.finalize().to_vec()
    }
}

fn main() {
    let hasher = PrefixedSha256 {
        prefix: b"custom_prefix:".to_vec(),
    };

    // Create a new tree with our custom hasher
    let mut tree = MerkleSumTree::new(hasher.clone());
    tree.set_index(0).unwrap();
    tree.push(vec![1, 2, 3], 100).unwrap();
    tree.push(vec![4, 5, 6], 50).unwrap();
    let (root, proof) = tree.prove().unwrap();
    let proof = proof.expect("leaf 0 was pushed");
    println!("Root hash with custom hasher: {}", hex::encode(root.hash()));

    // Compare with standard SHA256
    let mut standard_tree = MerkleSumTree::new(Sha256::default());
    standard_tree.push(vec![1, 2, 3], 100).unwrap();
    standard_tree.push(vec![4, 5, 6], 50).unwrap();
    let standard_root = standard_tree.root().unwrap();
    println!(
        "Root hash with standard SHA256: {}",
        hex::encode(standard_root.hash())
    );

    println!("Proof verifies with custom hasher: {}", proof.verify(&hasher, &root));
    println!(
        "Proof verifies with standard SHA256: {}",
        proof.verify(&Sha256::default(), &root)
    );
}
