//! Basic example of using the streaming Merkle sum tree
//!
//! This example demonstrates:
//! - Creating a new tree and selecting the leaf to prove
//! - Pushing leaves
//! - Getting the root hash and sum
//! - Verifying the inclusion proof

use merkle_sum_tree::{verify_merkle_proof, MerkleSumTree};
use sha2::Sha256;

fn main() {
    // Create a new tree using SHA256 and ask for a proof of the second leaf
    let mut tree = MerkleSumTree::new(Sha256::default());
    tree.set_index(1).unwrap();

    // Push some leaves with different hashes and sums
    tree.push(b"alice".to_vec(), 100).unwrap();
    tree.push(b"bob".to_vec(), 200).unwrap();
    tree.push(b"carol".to_vec(), 300).unwrap();

    let (root, proof) = tree.prove().unwrap();
    let proof = proof.expect("leaf 1 was pushed");
    println!("Root hash: {}", hex::encode(root.hash()));
    println!("Total sum: {}", root.sum());
    println!("Merkle proof length: {}", proof.siblings().len());

    // Verify the proof with nothing but the root and the proof contents
    let result = verify_merkle_proof(
        &Sha256::default(),
        root.hash(),
        root.sum(),
        proof.leaf(),
        proof.siblings(),
        proof.index(),
        proof.num_leaves(),
    );
    println!("Proof verification: {}", result);
}
