//! Append-only versioned history tree
//!
//! The tree grows one leaf per append and exposes a distinct version after
//! every append: version `v` is the tree as it stood once the `(v + 1)`-th
//! record landed, and its root aggregation stays recoverable forever — the
//! tree retains history, it is not a sliding window.
//!
//! ## Invariants
//!
//! - The root aggregation at version `v` is a pure function of the first
//!   `v + 1` records and the aggregator: rebuilding from scratch reproduces
//!   identical digests at every version.
//! - Left subtrees freeze once complete and are never recomputed; partial
//!   nodes are always recomputed functionally, never mutated in place.

use crate::aggregation::Aggregation;
use crate::aggregator::Aggregator;
use crate::error::{Result, TreeError};
use crate::node::{aggregation_at, NodeEntry, NodeId, NodeStore};
use crate::pruned::PrunedTree;

/// Authenticated append-only history tree
#[derive(Debug, Clone)]
pub struct HistoryTree<A: Aggregator> {
    aggregator: A,
    store: NodeStore<A::Record>,
    leaf_count: u64,
}

impl<A: Aggregator> HistoryTree<A> {
    /// Create an empty tree driven by the given aggregation strategy
    pub fn new(aggregator: A) -> Self {
        Self {
            aggregator,
            store: NodeStore::new(),
            leaf_count: 0,
        }
    }

    /// The aggregation strategy this tree is bound to
    pub fn aggregator(&self) -> &A {
        &self.aggregator
    }

    /// Number of records appended so far
    pub fn len(&self) -> u64 {
        self.leaf_count
    }

    /// Whether any record has been appended
    pub fn is_empty(&self) -> bool {
        self.leaf_count == 0
    }

    /// Current version: `len() - 1`, or `None` before the first append
    pub fn version(&self) -> Option<u64> {
        self.leaf_count.checked_sub(1)
    }

    /// Append one record, returning the new current version.
    ///
    /// Recomputes aggregations only along the path the new leaf completes:
    /// O(log n) work per append.
    pub fn append(&mut self, record: A::Record) -> u64 {
        let index = self.leaf_count;
        let aggregation = self.aggregator.leaf_aggregation(&record);
        self.store.insert(
            NodeId::leaf(index),
            NodeEntry {
                aggregation,
                record: Some(record),
            },
        );
        self.leaf_count += 1;

        // Freeze every ancestor this leaf completes. An ancestor is complete
        // exactly when its last covered leaf is the one just appended; its
        // right child froze one iteration earlier, and its left child froze
        // when that subtree's own last leaf arrived.
        let mut child_aggregation = aggregation;
        let mut depth: u8 = 1;
        loop {
            let node = NodeId {
                depth,
                index: index >> depth,
            };
            if node.last_leaf() != index {
                break;
            }
            #[allow(clippy::expect_used)]
            let left_aggregation = self
                .store
                .get(node.left_child())
                .map(|entry| entry.aggregation)
                .expect("completed subtree is frozen");
            let aggregation = self.aggregator.combine(&left_aggregation, &child_aggregation);
            self.store.insert(
                node,
                NodeEntry {
                    aggregation,
                    record: None,
                },
            );
            child_aggregation = aggregation;
            depth += 1;
        }

        index
    }

    /// Root aggregation of the tree as it stood at `version`.
    ///
    /// Pure read: recomputes through retained frozen nodes without touching
    /// stored history.
    pub fn root_aggregation(&self, version: u64) -> Result<Aggregation> {
        if version >= self.leaf_count {
            return Err(TreeError::OutOfRange {
                index: version,
                limit: self.leaf_count,
            });
        }
        aggregation_at(
            &self.store,
            &self.aggregator,
            NodeId::root_for(version),
            version,
        )
    }

    /// Root aggregation at the current version (the empty sentinel for an
    /// empty tree)
    pub fn current_root_aggregation(&self) -> Result<Aggregation> {
        match self.version() {
            None => Ok(self.aggregator.empty_aggregation()),
            Some(version) => self.root_aggregation(version),
        }
    }

    /// The record stored at leaf `index`
    pub fn leaf(&self, index: u64) -> Result<&A::Record> {
        if index >= self.leaf_count {
            return Err(TreeError::OutOfRange {
                index,
                limit: self.leaf_count,
            });
        }
        self.store
            .get(NodeId::leaf(index))
            .and_then(|entry| entry.record.as_ref())
            .ok_or(TreeError::MissingNode {
                depth: 0,
                index,
            })
    }

    /// Create an empty pruned tree bound to this tree's aggregator, ready to
    /// receive [`PrunedTree::copy_version`] calls
    pub fn make_pruned(&self) -> PrunedTree<A> {
        PrunedTree::new(self.aggregator.clone())
    }

    pub(crate) fn store(&self) -> &NodeStore<A::Record> {
        &self.store
    }
}

