//! Record payload contract
//!
//! Records are opaque to the tree: an indivisible leaf payload that can be
//! serialized to bytes deterministically and parsed back, identified only by
//! its append position. The numeric contributions feed the aggregation
//! accumulators; everything else about a record is the caller's business.

use crate::error::MalformedRecord;

/// An opaque, serializable leaf payload.
///
/// Serialization must be deterministic: the same record always yields the
/// same bytes, because those bytes are what the leaf digest commits to.
pub trait Record: Clone + std::fmt::Debug + Send + Sync + 'static {
    /// Serialize the record to bytes
    fn to_bytes(&self) -> Vec<u8>;

    /// Parse a record back from bytes
    fn from_bytes(bytes: &[u8]) -> Result<Self, MalformedRecord>
    where
        Self: Sized;

    /// Signed amount this record contributes to subtree net accumulators
    fn net_amount(&self) -> i64;

    /// Absolute amount this record contributes to subtree total accumulators
    fn total_amount(&self) -> i64;
}
