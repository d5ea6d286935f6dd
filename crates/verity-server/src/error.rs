//! Error types for the log server

use thiserror::Error;

use crate::publisher::PublishError;
use verity_tree::TreeError;

/// Log server error types
#[derive(Debug, Error)]
pub enum ServerError {
    /// The requested commitment number was never issued
    #[error("Commitment #{number} has not been issued")]
    CommitmentNotFound {
        /// Requested commitment number (1-indexed)
        number: u64,
    },

    /// A consistency proof was requested over an invalid commitment range
    #[error("Invalid proof range: start {start}, end {end}")]
    InvalidProofRange {
        /// Requested starting commitment number
        start: u64,
        /// Requested ending commitment number
        end: u64,
    },

    /// A record proof was requested for a record no commitment covers yet
    #[error(
        "Record #{record_number} has not been committed yet: only {committed} records committed so far"
    )]
    RecordNotCommitted {
        /// Requested record number (1-indexed)
        record_number: u64,
        /// Records covered by commitments so far
        committed: u64,
    },

    /// The digest does not correspond to any issued commitment
    #[error("Unknown commitment hash")]
    UnknownCommitmentHash,

    /// Publishing to the external ledger failed; bookkeeping is untouched
    #[error(transparent)]
    Publish(#[from] PublishError),

    /// The underlying history tree rejected the operation
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Result type for log server operations
pub type Result<T> = std::result::Result<T, ServerError>;
