//! Aggregator strategy
//!
//! Defines how a single record becomes a leaf aggregation, how two
//! aggregations combine into a parent, and how aggregations and records
//! (de)serialize. Stateless and swappable; the tree never assumes anything
//! about the scheme beyond these operations.
//!
//! ## Digest scheme of [`Blake3Aggregator`]
//!
//! - Leaf: `H("LEAF", record_bytes)`
//! - Branch: `H("BRANCH", left_digest, left_net, left_total, right_digest, right_net, right_total)`
//!
//! Feeding the left operand before the right makes `combine` order-sensitive,
//! which binds path position into every ancestor digest: reordering records
//! is as detectable as rewriting them.

use std::marker::PhantomData;

use crate::aggregation::Aggregation;
use crate::error::MalformedRecord;
use crate::record::Record;
use crate::Digest;

/// Tag identifying the kind of node being hashed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationTag {
    /// Branch node digest
    Branch,
    /// Leaf node digest
    Leaf,
}

impl AggregationTag {
    /// Get the tag as a byte string
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            AggregationTag::Branch => b"BRANCH",
            AggregationTag::Leaf => b"LEAF",
        }
    }
}

/// Pure strategy turning records into aggregations.
///
/// Implementations must be deterministic and stateless: no I/O, no clocks,
/// no interior mutability. `combine` must be order-sensitive in its inputs.
pub trait Aggregator: Clone + Send + Sync + 'static {
    /// The record payload type this strategy aggregates
    type Record: Record;

    /// Aggregation of a single record leaf
    fn leaf_aggregation(&self, record: &Self::Record) -> Aggregation;

    /// Aggregation of a parent from its two children, left before right
    fn combine(&self, left: &Aggregation, right: &Aggregation) -> Aggregation;

    /// Aggregation of an empty subtree
    fn empty_aggregation(&self) -> Aggregation {
        Aggregation::EMPTY
    }

    /// Serialize an aggregation to its wire layout
    fn serialize_aggregation(&self, aggregation: &Aggregation) -> Vec<u8> {
        aggregation.to_bytes().to_vec()
    }

    /// Parse an aggregation from its wire layout
    fn parse_aggregation(&self, bytes: &[u8]) -> crate::error::Result<Aggregation> {
        Aggregation::from_bytes(bytes)
    }

    /// Serialize a record payload
    fn serialize_record(&self, record: &Self::Record) -> Vec<u8> {
        record.to_bytes()
    }

    /// Parse a record payload
    fn parse_record(&self, bytes: &[u8]) -> Result<Self::Record, MalformedRecord> {
        Self::Record::from_bytes(bytes)
    }
}

/// Blake3-based production aggregator.
///
/// Hashes with ASCII domain tags and little-endian integer feeds; the
/// accumulators of both children are part of every branch digest.
pub struct Blake3Aggregator<R> {
    _record: PhantomData<fn() -> R>,
}

impl<R> Blake3Aggregator<R> {
    /// Create a new aggregator
    pub fn new() -> Self {
        Self {
            _record: PhantomData,
        }
    }
}

impl<R> Default for Blake3Aggregator<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for Blake3Aggregator<R> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<R> std::fmt::Debug for Blake3Aggregator<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Blake3Aggregator")
    }
}

impl<R: Record> Aggregator for Blake3Aggregator<R> {
    type Record = R;

    fn leaf_aggregation(&self, record: &R) -> Aggregation {
        let mut hasher = blake3::Hasher::new();

        // Tag
        hasher.update(AggregationTag::Leaf.as_bytes());

        // Record payload
        hasher.update(&record.to_bytes());

        Aggregation::new(
            Digest(*hasher.finalize().as_bytes()),
            record.net_amount(),
            record.total_amount(),
        )
    }

    fn combine(&self, left: &Aggregation, right: &Aggregation) -> Aggregation {
        let mut hasher = blake3::Hasher::new();

        // Tag
        hasher.update(AggregationTag::Branch.as_bytes());

        // Left child: digest, net, total (8 bytes each, little-endian)
        hasher.update(left.digest().as_bytes());
        hasher.update(&left.net_amount().to_le_bytes());
        hasher.update(&left.total_amount().to_le_bytes());

        // Right child: digest, net, total
        hasher.update(right.digest().as_bytes());
        hasher.update(&right.net_amount().to_le_bytes());
        hasher.update(&right.total_amount().to_le_bytes());

        Aggregation::new(
            Digest(*hasher.finalize().as_bytes()),
            left.net_amount() + right.net_amount(),
            left.total_amount() + right.total_amount(),
        )
    }
}

