use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use merkle_sum_tree::{reader_root, MerkleSumTree, DEFAULT_SEGMENT_SIZE};
use sha2::Sha256;

pub fn generate_random_leaves(num_leaves: usize) -> Vec<([u8; 32], u64)> {
    (0..num_leaves)
        .map(|_| (rand::random(), rand::random::<u32>() as u64))
        .collect()
}

fn bench_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("Merkle Sum Tree Push");

    for num_leaves in [100, 1_000, 10_000] {
        let leaves = generate_random_leaves(num_leaves);
        group.bench_with_input(
            BenchmarkId::from_parameter(num_leaves),
            &leaves,
            |b, leaves| {
                b.iter(|| {
                    let mut tree = MerkleSumTree::new(Sha256::default());
                    for (hash, sum) in leaves {
                        tree.push(hash.to_vec(), *sum).unwrap();
                    }
                    tree.root().unwrap()
                })
            },
        );
    }

    group.finish();
}

fn bench_reader(c: &mut Criterion) {
    let hashes: Vec<u8> = (0..DEFAULT_SEGMENT_SIZE * 1_000)
        .map(|_| rand::random())
        .collect();
    // Random sums below 2^32, so 1000 of them cannot overflow the total.
    let sums: Vec<u8> = (0..1_000)
        .flat_map(|_| {
            let mut segment = [0u8; DEFAULT_SEGMENT_SIZE];
            segment[4..8].copy_from_slice(&rand::random::<u32>().to_be_bytes());
            segment
        })
        .collect();

    c.bench_function("Reader Root (1000 leaves)", |b| {
        b.iter(|| {
            reader_root(
                &hashes[..],
                &sums[..],
                Sha256::default(),
                DEFAULT_SEGMENT_SIZE,
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, bench_push, bench_reader);
criterion_main!(benches);
