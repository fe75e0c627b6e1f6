use std::io::{self, Cursor, Read};

use rand::{rngs::StdRng, Rng, SeedableRng};
use sha2::Sha256;

use crate::{
    build_reader_proof, reader_root, segment_sum, ComputedNode, MerkleSumTree, TreeError,
    DEFAULT_SEGMENT_SIZE,
};

fn random_streams(leaves: usize) -> (Vec<u8>, Vec<u8>) {
    let mut rng = StdRng::seed_from_u64(leaves as u64);
    let mut hashes = vec![0u8; leaves * DEFAULT_SEGMENT_SIZE];
    let mut sums = vec![0u8; leaves * DEFAULT_SEGMENT_SIZE];
    rng.fill(hashes.as_mut_slice());
    rng.fill(sums.as_mut_slice());
    // Keep every leaf sum below 2^32 so the totals stay far from overflow.
    for segment in sums.chunks_mut(DEFAULT_SEGMENT_SIZE) {
        segment[..4].fill(0);
    }
    (hashes, sums)
}

/// Returns its data 3 bytes at a time, optionally failing at the end, and
/// reports `Interrupted` between chunks.
struct FlakyReader {
    data: Vec<u8>,
    pos: usize,
    interrupt: bool,
    fail_at_end: bool,
}

impl Read for FlakyReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.interrupt {
            self.interrupt = false;
            return Err(io::ErrorKind::Interrupted.into());
        }
        if self.pos == self.data.len() {
            if self.fail_at_end {
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"));
            }
            return Ok(0);
        }
        let n = buf.len().min(3).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        self.interrupt = true;
        Ok(n)
    }
}

#[test]
fn test_reader_root_matches_push() {
    let (hashes, sums) = random_streams(100);
    let root = reader_root(
        Cursor::new(&hashes),
        Cursor::new(&sums),
        Sha256::default(),
        DEFAULT_SEGMENT_SIZE,
    )
    .unwrap();

    let mut tree = MerkleSumTree::new(Sha256::default());
    for (hash, sum) in hashes
        .chunks(DEFAULT_SEGMENT_SIZE)
        .zip(sums.chunks(DEFAULT_SEGMENT_SIZE))
    {
        tree.push(hash, segment_sum(sum)).unwrap();
    }
    assert_eq!(root, tree.root().unwrap());
    assert_eq!(tree.num_leaves(), 100);
}

#[test]
fn test_reader_proof() {
    let (hashes, sums) = random_streams(100);
    let (root, proof) = build_reader_proof(
        Cursor::new(&hashes),
        Cursor::new(&sums),
        Sha256::default(),
        DEFAULT_SEGMENT_SIZE,
        50,
    )
    .unwrap();
    assert_eq!(proof.index(), 50);
    assert_eq!(proof.num_leaves(), 100);
    assert_eq!(proof.leaf().hash(), &hashes[50 * 32..51 * 32]);
    assert_eq!(proof.leaf().sum(), segment_sum(&sums[50 * 32..51 * 32]));
    assert!(proof.verify(&Sha256::default(), &root));
}

#[test]
fn test_reader_is_deterministic() {
    let (hashes, sums) = random_streams(37);
    let first = reader_root(&hashes[..], &sums[..], Sha256::default(), 32).unwrap();
    let second = reader_root(&hashes[..], &sums[..], Sha256::default(), 32).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_short_last_segment() {
    let hashes: Vec<u8> = (0..70).collect();
    let mut sums = vec![0u8; 70];
    sums[64..].copy_from_slice(&[0, 0, 0, 1, 0, 2]);
    let (root, proof) =
        build_reader_proof(&hashes[..], &sums[..], Sha256::default(), 32, 2).unwrap();
    assert_eq!(proof.num_leaves(), 3);
    assert_eq!(proof.leaf(), &ComputedNode::new(&hashes[64..], 0x1_0002));
    assert_eq!(root.sum(), 0x1_0002);
    assert!(proof.verify(&Sha256::default(), &root));
}

#[test]
fn test_small_segments() {
    let hashes = [1u8, 2, 3, 4, 5, 6];
    let sums = [0u8, 1, 0, 2, 0, 3];
    let root = reader_root(&hashes[..], &sums[..], Sha256::default(), 2).unwrap();
    let mut tree = MerkleSumTree::new(Sha256::default());
    tree.push(vec![1, 2], 1).unwrap();
    tree.push(vec![3, 4], 2).unwrap();
    tree.push(vec![5, 6], 3).unwrap();
    assert_eq!(root, tree.root().unwrap());
}

#[test]
fn test_empty_streams() {
    let root = reader_root(io::empty(), io::empty(), Sha256::default(), 32).unwrap();
    assert_eq!(root, ComputedNode::empty());
}

#[test]
fn test_index_unreachable() {
    let (hashes, sums) = random_streams(10);
    let err = build_reader_proof(&hashes[..], &sums[..], Sha256::default(), 32, 10).unwrap_err();
    assert_eq!(
        err,
        TreeError::IndexUnreachable {
            index: 10,
            num_leaves: 10
        }
    );
}

#[test]
fn test_stream_length_mismatch() {
    let (hashes, sums) = random_streams(4);
    assert_eq!(
        reader_root(&hashes[..], &sums[..96], Sha256::default(), 32).unwrap_err(),
        TreeError::StreamLengthMismatch
    );
    assert_eq!(
        reader_root(&hashes[..64], &sums[..], Sha256::default(), 32).unwrap_err(),
        TreeError::StreamLengthMismatch
    );
}

#[test]
fn test_stream_length_mismatch_in_last_segment() {
    let (hashes, sums) = random_streams(2);
    assert_eq!(
        reader_root(&hashes[..40], &sums[..], Sha256::default(), 32).unwrap_err(),
        TreeError::StreamLengthMismatch
    );
    assert_eq!(
        reader_root(&hashes[..], &sums[..33], Sha256::default(), 32).unwrap_err(),
        TreeError::StreamLengthMismatch
    );
    assert_eq!(
        reader_root(&hashes[..40], &sums[..41], Sha256::default(), 32).unwrap_err(),
        TreeError::StreamLengthMismatch
    );
}

#[test]
fn test_sum_overflow_is_returned() {
    let hashes = [7u8; 64];
    let mut sums = [0u8; 64];
    sums[..32].fill(0xff);
    sums[39] = 1;
    assert_eq!(
        reader_root(&hashes[..], &sums[..], Sha256::default(), 32).unwrap_err(),
        TreeError::SumOverflow
    );
    assert_eq!(
        build_reader_proof(&hashes[..], &sums[..], Sha256::default(), 32, 0).unwrap_err(),
        TreeError::SumOverflow
    );
}

#[test]
fn test_invalid_segment_size() {
    assert_eq!(
        reader_root(io::empty(), io::empty(), Sha256::default(), 0).unwrap_err(),
        TreeError::InvalidSegmentSize(0)
    );
}

#[test]
fn test_interrupted_reads_are_retried() {
    let (hashes, sums) = random_streams(9);
    let expected = reader_root(&hashes[..], &sums[..], Sha256::default(), 32).unwrap();
    let flaky = |data: &[u8]| FlakyReader {
        data: data.to_vec(),
        pos: 0,
        interrupt: true,
        fail_at_end: false,
    };
    let root = reader_root(flaky(&hashes[..]), flaky(&sums[..]), Sha256::default(), 32).unwrap();
    assert_eq!(root, expected);
}

#[test]
fn test_read_error_is_returned() {
    let (hashes, sums) = random_streams(3);
    let failing = FlakyReader {
        data: sums,
        pos: 0,
        interrupt: false,
        fail_at_end: true,
    };
    let err = build_reader_proof(&hashes[..], failing, Sha256::default(), 32, 0).unwrap_err();
    match err {
        TreeError::Io(e) => {
            assert_eq!(e.kind(), io::ErrorKind::ConnectionReset);
            assert_eq!(e.to_string(), "reset");
        }
        other => panic!("unexpected error {other}"),
    }
}
