//! Builds a tree from two in-memory streams, one with 32-byte leaf hashes and
//! one with 32-byte sum segments, then proves and verifies leaf 50.

use std::io::Cursor;

use merkle_sum_tree::{build_reader_proof, reader_root, MerkleProof, DEFAULT_SEGMENT_SIZE};
use sha2::Sha256;

fn main() {
    let num_leaves = 100;
    let hashes: Vec<u8> = (0..num_leaves * DEFAULT_SEGMENT_SIZE)
        .map(|_| rand::random())
        .collect();
    // Only the first 8 bytes of each sum segment are used.
    let sums: Vec<u8> = (0..num_leaves)
        .flat_map(|i| {
            let mut segment = [0u8; DEFAULT_SEGMENT_SIZE];
            segment[..8].copy_from_slice(&(i as u64 * 10).to_be_bytes());
            segment
        })
        .collect();

    let root = reader_root(
        Cursor::new(&hashes),
        Cursor::new(&sums),
        Sha256::default(),
        DEFAULT_SEGMENT_SIZE,
    )
    .unwrap();
    println!("Root: {}", root);

    let (proof_root, proof) = build_reader_proof(
        Cursor::new(&hashes),
        Cursor::new(&sums),
        Sha256::default(),
        DEFAULT_SEGMENT_SIZE,
        50,
    )
    .unwrap();
    assert_eq!(root, proof_root);

    // Ship the proof as bytes and verify it on the other side
    let encoded = proof.encode().unwrap();
    println!("Encoded proof: {} bytes", encoded.len());
    let decoded = MerkleProof::decode(&encoded).unwrap();
    println!(
        "Leaf {} with sum {} verifies: {}",
        decoded.index(),
        decoded.leaf().sum(),
        decoded.verify(&Sha256::default(), &root)
    );
}
