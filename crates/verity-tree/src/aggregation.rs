//! Aggregation values
//!
//! An [`Aggregation`] is the derived summary of a subtree: a cryptographic
//! digest binding structure and content, plus two numeric accumulators (net
//! and total amount) that are folded into every branch digest. Aggregations
//! are immutable; combining two always produces a new value.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TreeError;

/// Digest of a subtree aggregation
///
/// A Blake3 hash (32 bytes) binding subtree content and shape.
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct Digest(pub [u8; 32]);

impl Digest {
    /// Create a digest from a 32-byte array
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create a digest from a slice (must be exactly 32 bytes)
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TreeError> {
        if bytes.len() != 32 {
            return Err(TreeError::malformed_proof(format!(
                "digest must be 32 bytes, got {}",
                bytes.len()
            )));
        }
        let mut array = [0u8; 32];
        array.copy_from_slice(bytes);
        Ok(Self(array))
    }

    /// Get the bytes of this digest
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to a hex string for display
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Create from a hex string
    pub fn from_hex(s: &str) -> Result<Self, TreeError> {
        let bytes = hex::decode(s)
            .map_err(|_| TreeError::malformed_proof("invalid hex digest"))?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({}...)", &self.to_hex()[..8])
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

/// Serialized size of an [`Aggregation`]: digest plus two i64 accumulators.
pub const AGGREGATION_BYTES: usize = 32 + 8 + 8;

/// Immutable summary of a subtree
///
/// Carries the subtree digest together with the net (signed) and total
/// (absolute) amounts of the records below it. Both accumulators feed the
/// branch digest, so tampering with amounts is as detectable as tampering
/// with record bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregation {
    digest: Digest,
    net_amount: i64,
    total_amount: i64,
}

impl Aggregation {
    /// The aggregation of an empty subtree.
    ///
    /// A fixed sentinel: the zero digest is never produced by hashing, so it
    /// cannot collide with any real subtree's aggregation.
    pub const EMPTY: Aggregation = Aggregation {
        digest: Digest([0u8; 32]),
        net_amount: 0,
        total_amount: 0,
    };

    /// Create an aggregation from its parts
    pub fn new(digest: Digest, net_amount: i64, total_amount: i64) -> Self {
        Self {
            digest,
            net_amount,
            total_amount,
        }
    }

    /// The subtree digest
    pub fn digest(&self) -> Digest {
        self.digest
    }

    /// Net (signed) amount of all records in the subtree
    pub fn net_amount(&self) -> i64 {
        self.net_amount
    }

    /// Total (absolute) amount of all records in the subtree
    pub fn total_amount(&self) -> i64 {
        self.total_amount
    }

    /// Serialize to the fixed wire layout: digest, net, total (little-endian)
    pub fn to_bytes(&self) -> [u8; AGGREGATION_BYTES] {
        let mut out = [0u8; AGGREGATION_BYTES];
        out[..32].copy_from_slice(self.digest.as_bytes());
        out[32..40].copy_from_slice(&self.net_amount.to_le_bytes());
        out[40..48].copy_from_slice(&self.total_amount.to_le_bytes());
        out
    }

    /// Parse from the fixed wire layout
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TreeError> {
        if bytes.len() != AGGREGATION_BYTES {
            return Err(TreeError::malformed_proof(format!(
                "aggregation must be {AGGREGATION_BYTES} bytes, got {}",
                bytes.len()
            )));
        }
        let digest = Digest::from_slice(&bytes[..32])?;
        let mut amount = [0u8; 8];
        amount.copy_from_slice(&bytes[32..40]);
        let net_amount = i64::from_le_bytes(amount);
        amount.copy_from_slice(&bytes[40..48]);
        let total_amount = i64::from_le_bytes(amount);
        Ok(Self {
            digest,
            net_amount,
            total_amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_hex_round_trip() {
        let digest = Digest::new([7u8; 32]);
        let hex = digest.to_hex();
        assert_eq!(hex.len(), 64);
        assert_eq!(Digest::from_hex(&hex).unwrap(), digest);
    }

    #[test]
    fn test_digest_from_slice_wrong_length() {
        assert!(Digest::from_slice(&[1u8; 16]).is_err());
    }

    #[test]
    fn test_aggregation_round_trip() {
        let agg = Aggregation::new(Digest::new([9u8; 32]), -42, 42);
        let bytes = agg.to_bytes();
        assert_eq!(Aggregation::from_bytes(&bytes).unwrap(), agg);
    }

    #[test]
    fn test_aggregation_wrong_length() {
        assert!(Aggregation::from_bytes(&[0u8; 47]).is_err());
    }

    #[test]
    fn test_empty_sentinel() {
        assert_eq!(Aggregation::EMPTY.digest(), Digest::new([0u8; 32]));
        assert_eq!(Aggregation::EMPTY.net_amount(), 0);
        assert_eq!(Aggregation::EMPTY.total_amount(), 0);
    }
}
