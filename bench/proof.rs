use criterion::{black_box, criterion_group, criterion_main, Criterion};
use merkle_sum_tree::{ComputedNode, MerkleProof, MerkleSumTree};
use sha2::Sha256;

pub fn generate_random_leaves(num_leaves: usize) -> Vec<([u8; 32], u64)> {
    (0..num_leaves)
        .map(|_| (rand::random(), rand::random::<u32>() as u64))
        .collect()
}

fn build(leaves: &[([u8; 32], u64)], index: u64) -> (ComputedNode, Option<MerkleProof>) {
    let mut tree = MerkleSumTree::new(Sha256::default());
    tree.set_index(index).unwrap();
    for (hash, sum) in leaves {
        tree.push(hash.to_vec(), *sum).unwrap();
    }
    tree.prove().unwrap()
}

fn bench_proof_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Merkle Sum Tree Proof Generation");

    for num_leaves in [100, 1_000, 10_000] {
        let leaves = generate_random_leaves(num_leaves);
        let index = num_leaves as u64 / 3;
        group.bench_function(format!("{num_leaves} leaves"), |b| {
            b.iter(|| build(black_box(&leaves), index))
        });
    }

    group.finish();
}

fn bench_proof_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("Merkle Sum Tree Proof Verification");

    for num_leaves in [100, 10_000] {
        let leaves = generate_random_leaves(num_leaves);
        let (root, proof) = build(&leaves, num_leaves as u64 - 1);
        let proof = proof.unwrap();
        group.bench_function(format!("{num_leaves} leaves"), |b| {
            b.iter(|| assert!(proof.verify(&Sha256::default(), black_box(&root))))
        });

        let encoded = proof.encode().unwrap();
        group.bench_function(format!("{num_leaves} leaves, decode then verify"), |b| {
            b.iter(|| {
                let proof = MerkleProof::decode(black_box(&encoded)).unwrap();
                assert!(proof.verify(&Sha256::default(), &root))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_proof_generation, bench_proof_verification);
criterion_main!(benches);
