//! Builds trees from two parallel byte streams: one holding the leaf hashes,
//! the other the leaf sums, both cut into segments of the same size.

use std::io::{self, Read};

use log::{debug, warn};

use crate::{ComputedNode, Hasher, MerkleProof, MerkleSumTree, Sum, TreeError};

const LOG_TARGET: &str = "merkle_sum_tree::reader";

/// Segment size used by callers that have no reason to pick another one.
pub const DEFAULT_SEGMENT_SIZE: usize = 32;

impl<H: Hasher> MerkleSumTree<H> {
    /// Reads `segment_size` bytes at a time from both streams and pushes one
    /// leaf per pair of segments until both are exhausted.
    ///
    /// The last segment of a stream may be shorter and is used without
    /// padding. Streams of different byte lengths fail with
    /// [`TreeError::StreamLengthMismatch`]; read errors are returned unchanged.
    pub fn read_all<R1: Read, R2: Read>(
        &mut self,
        mut hashes: R1,
        mut sums: R2,
        segment_size: usize,
    ) -> Result<(), TreeError> {
        if segment_size == 0 {
            return Err(TreeError::InvalidSegmentSize(segment_size));
        }
        let mut sum_segment = vec![0u8; segment_size];
        loop {
            let mut hash_segment = vec![0u8; segment_size];
            let hash_len = read_segment(&mut hashes, &mut hash_segment)?;
            let sum_len = read_segment(&mut sums, &mut sum_segment)?;
            if hash_len != sum_len {
                warn!(
                    target: LOG_TARGET,
                    "stream lengths differ after {} leaves ({} hash bytes, {} sum bytes)",
                    self.num_leaves(),
                    hash_len,
                    sum_len
                );
                return Err(TreeError::StreamLengthMismatch);
            }
            if hash_len == 0 {
                break;
            }
            hash_segment.truncate(hash_len);
            self.push(hash_segment, segment_sum(&sum_segment[..sum_len]))?;
        }
        debug!(
            target: LOG_TARGET,
            "read {} leaves of {} bytes",
            self.num_leaves(),
            segment_size
        );
        Ok(())
    }
}

/// Merkle root of the leaves read from `hashes` and `sums`, see
/// [`MerkleSumTree::read_all`].
pub fn reader_root<H: Hasher, R1: Read, R2: Read>(
    hashes: R1,
    sums: R2,
    hasher: H,
    segment_size: usize,
) -> Result<ComputedNode, TreeError> {
    let mut tree = MerkleSumTree::new(hasher);
    tree.read_all(hashes, sums, segment_size)?;
    tree.root()
}

/// Merkle root and inclusion proof of leaf `index` for the leaves read from
/// `hashes` and `sums`.
///
/// Fails with [`TreeError::IndexUnreachable`] when the streams hold `index`
/// leaves or fewer.
pub fn build_reader_proof<H: Hasher, R1: Read, R2: Read>(
    hashes: R1,
    sums: R2,
    hasher: H,
    segment_size: usize,
    index: u64,
) -> Result<(ComputedNode, MerkleProof), TreeError> {
    let mut tree = MerkleSumTree::new(hasher);
    tree.set_index(index)?;
    tree.read_all(hashes, sums, segment_size)?;
    match tree.prove()? {
        (root, Some(proof)) => Ok((root, proof)),
        (_, None) => Err(TreeError::IndexUnreachable {
            index,
            num_leaves: tree.num_leaves(),
        }),
    }
}

/// Reads the sum carried by a segment: the segment read as a big-endian
/// integer when it is at most 8 bytes long, its first 8 bytes otherwise.
pub fn segment_sum(segment: &[u8]) -> Sum {
    let len = segment.len().min(8);
    let mut bytes = [0u8; 8];
    bytes[8 - len..].copy_from_slice(&segment[..len]);
    u64::from_be_bytes(bytes)
}

/// Fills `buf` from `reader`, stopping early only at end of stream. Returns the
/// number of bytes read, 0 meaning the stream was already exhausted.
fn read_segment(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod test {
    use super::{read_segment, segment_sum};

    #[test]
    fn test_segment_sum() {
        assert_eq!(segment_sum(&[]), 0);
        assert_eq!(segment_sum(&[1]), 1);
        assert_eq!(segment_sum(&[1, 0]), 256);
        assert_eq!(segment_sum(&[0, 0, 0, 0, 0, 0, 0, 42]), 42);
        assert_eq!(segment_sum(&[0, 0, 0, 0, 0, 0, 1, 0, 0xff, 0xff]), 256);
        assert_eq!(segment_sum(&[0xff; 32]), u64::MAX);
    }

    #[test]
    fn test_read_segment_short_reads() {
        // `Chain` returns the first reader's bytes before moving on, so a
        // single `read` never fills the whole buffer here.
        let mut reader = std::io::Read::chain(&[1u8, 2][..], &[3u8, 4, 5][..]);
        let mut buf = [0u8; 4];
        assert_eq!(read_segment(&mut reader, &mut buf).unwrap(), 4);
        assert_eq!(buf, [1, 2, 3, 4]);
        assert_eq!(read_segment(&mut reader, &mut buf).unwrap(), 1);
        assert_eq!(buf[0], 5);
        assert_eq!(read_segment(&mut reader, &mut buf).unwrap(), 0);
    }
}
