//! External ledger publisher seam
//!
//! The server anchors root digests by handing them to a [`LedgerPublisher`].
//! Any failure is non-fatal and retryable; the server never mutates
//! commitment bookkeeping until a publish has succeeded.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use verity_tree::Digest;

/// Opaque identifier of the ledger transaction that anchored a digest
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionRef(pub String);

impl fmt::Display for TransactionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Publisher failure modes
#[derive(Debug, Clone, Error)]
pub enum PublishError {
    /// The ledger lacks the resources to anchor another statement
    #[error("Insufficient ledger resources: {message}")]
    InsufficientResources {
        /// Description from the ledger
        message: String,
    },

    /// The ledger could not be reached or did not respond in time
    #[error("Ledger unavailable: {message}")]
    Unavailable {
        /// Description of the failure
        message: String,
    },
}

impl PublishError {
    /// Create an insufficient-resources error
    pub fn insufficient_resources(message: impl Into<String>) -> Self {
        Self::InsufficientResources {
            message: message.into(),
        }
    }

    /// Create an unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Anchors a digest in an external immutable ledger.
///
/// The publish call is the server's only suspension point; implementations
/// may block on network or fee estimation but must either anchor the digest
/// and return its transaction, or fail without side effects.
#[async_trait]
pub trait LedgerPublisher: Send + Sync {
    /// Anchor `digest` externally, returning the anchoring transaction
    async fn publish(&self, digest: &Digest) -> Result<TransactionRef, PublishError>;
}
