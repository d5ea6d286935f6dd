//! Authenticated versioned history tree
//!
//! An append-only binary tree over an ordered record sequence that exposes a
//! distinct, independently hashable version after every append, produces
//! minimal proofs of consistency between versions and of record inclusion,
//! and supports pruned partial copies that omit unrelated record content.
//!
//! # Architecture
//!
//! - **Aggregation**: immutable digest + numeric accumulators summarizing a
//!   subtree
//! - **Aggregator**: stateless strategy defining leaf, combine, and empty
//!   aggregations ([`Blake3Aggregator`] is the production scheme)
//! - **HistoryTree**: the live arena-backed structure; every version's root
//!   stays recoverable
//! - **PrunedTree**: minimal partial copy for proof transmission, with a
//!   deterministic wire codec in [`proof`]

mod aggregation;
mod aggregator;
mod error;
mod history;
mod node;
pub mod proof;
mod pruned;
mod record;

pub use aggregation::{Aggregation, Digest, AGGREGATION_BYTES};
pub use aggregator::{AggregationTag, Aggregator, Blake3Aggregator};
pub use error::{MalformedRecord, Result, TreeError};
pub use history::HistoryTree;
pub use node::NodeId;
pub use pruned::PrunedTree;
pub use record::Record;
