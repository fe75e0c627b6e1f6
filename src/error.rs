//! Error types for the Merkle sum tree

use thiserror::Error;

/// Error type for tree construction, proof extraction and proof decoding.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The session is not in a state that allows the requested operation
    #[error("Invalid tree state: {0}")]
    InvalidState(&'static str),
    /// Accumulated sums no longer fit in a `u64`
    #[error("Sum overflow")]
    SumOverflow,
    /// The proof index was never reached while building the tree
    #[error("Index {index} was not reached while creating proof ({num_leaves} leaves)")]
    IndexUnreachable { index: u64, num_leaves: u64 },
    /// Error returned by one of the input streams
    #[error("Read error: {0}")]
    Io(#[from] std::io::Error),
    /// The hash stream and the sum stream do not hold the same number of segments
    #[error("Hash and sum streams have different lengths")]
    StreamLengthMismatch,
    /// Segments must hold at least one byte
    #[error("Invalid segment size: {0}")]
    InvalidSegmentSize(usize),
    /// Encoded proof could not be decoded
    #[error("Invalid proof encoding: {0}")]
    InvalidProofEncoding(&'static str),
}

impl PartialEq for TreeError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidState(a), Self::InvalidState(b)) => a == b,
            (Self::SumOverflow, Self::SumOverflow) => true,
            (
                Self::IndexUnreachable {
                    index: a,
                    num_leaves: n,
                },
                Self::IndexUnreachable {
                    index: b,
                    num_leaves: m,
                },
            ) => a == b && n == m,
            (Self::Io(a), Self::Io(b)) => a.kind() == b.kind(),
            (Self::StreamLengthMismatch, Self::StreamLengthMismatch) => true,
            (Self::InvalidSegmentSize(a), Self::InvalidSegmentSize(b)) => a == b,
            (Self::InvalidProofEncoding(a), Self::InvalidProofEncoding(b)) => a == b,
            _ => false,
        }
    }
}
