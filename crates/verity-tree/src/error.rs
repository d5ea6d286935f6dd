//! Error types for the history tree

use thiserror::Error;

/// A stored record payload could not be parsed back from bytes.
///
/// Fatal only for the retrieval path of that record: sibling aggregations
/// were frozen from the in-memory record at append time and remain valid.
#[derive(Debug, Clone, Error)]
#[error("Malformed record: {reason}")]
pub struct MalformedRecord {
    /// Description of the parse failure
    pub reason: String,
}

impl MalformedRecord {
    /// Create a malformed-record error
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// History tree error types
#[derive(Debug, Error)]
pub enum TreeError {
    /// Requested leaf or version index beyond the current tree extent
    #[error("Index {index} out of range: tree holds {limit} leaves")]
    OutOfRange {
        /// Requested index
        index: u64,
        /// Number of leaves currently in the tree
        limit: u64,
    },

    /// A node needed to recompute an aggregation is not retained
    #[error("Missing node at depth {depth}, index {index}")]
    MissingNode {
        /// Depth of the missing node
        depth: u8,
        /// Position of the missing node within its depth
        index: u64,
    },

    /// Two partial copies disagree about a node's aggregation
    #[error("Incompatible copy: conflicting aggregation at depth {depth}, index {index}")]
    IncompatibleCopy {
        /// Depth of the conflicting node
        depth: u8,
        /// Position of the conflicting node within its depth
        index: u64,
    },

    /// A serialized proof could not be decoded or failed verification
    #[error("Malformed proof: {reason}")]
    MalformedProof {
        /// Description of the decode or verification failure
        reason: String,
    },

    /// A record payload could not be parsed
    #[error(transparent)]
    MalformedRecord(#[from] MalformedRecord),
}

impl TreeError {
    /// Create a malformed-proof error
    pub fn malformed_proof(reason: impl Into<String>) -> Self {
        Self::MalformedProof {
            reason: reason.into(),
        }
    }
}

/// Result type for history tree operations
pub type Result<T> = std::result::Result<T, TreeError>;
