//! Pruned partial copies
//!
//! A [`PrunedTree`] holds only the nodes needed to recompute a target
//! version's root aggregation — frozen sibling subtrees shrink to opaque
//! aggregation stubs, and leaf records appear only where a copy explicitly
//! revealed them. Several versions can be copied into one pruned tree; the
//! overlap of their retained frontiers is what makes a consistency proof.
//!
//! Soundness condition: recomputing a copied version's root from the
//! retained nodes, with the same combine rule, must equal the source tree's
//! root aggregation for that version.

use crate::aggregation::Aggregation;
use crate::aggregator::Aggregator;
use crate::error::{Result, TreeError};
use crate::history::HistoryTree;
use crate::node::{aggregation_at, NodeEntry, NodeId, NodeStore};

/// Minimal partial copy of a [`HistoryTree`]
#[derive(Debug, Clone)]
pub struct PrunedTree<A: Aggregator> {
    aggregator: A,
    store: NodeStore<A::Record>,
    version: Option<u64>,
}

impl<A: Aggregator> PrunedTree<A> {
    /// Create an empty pruned tree bound to an aggregation strategy
    pub fn new(aggregator: A) -> Self {
        Self {
            aggregator,
            store: NodeStore::new(),
            version: None,
        }
    }

    pub(crate) fn from_parts(
        aggregator: A,
        store: NodeStore<A::Record>,
        version: Option<u64>,
    ) -> Self {
        Self {
            aggregator,
            store,
            version,
        }
    }

    /// Highest version copied into this tree so far
    pub fn version(&self) -> Option<u64> {
        self.version
    }

    /// Number of retained nodes
    pub fn retained_nodes(&self) -> usize {
        self.store.len()
    }

    /// The aggregation strategy this tree is bound to
    pub fn aggregator(&self) -> &A {
        &self.aggregator
    }

    /// Copy from `source` the minimal node set needed to recompute the root
    /// aggregation of `version`: the path from that version's root down to
    /// its last leaf, with frozen left siblings retained as stubs.
    ///
    /// With `reveal_leaf`, the destination additionally receives the record
    /// value stored at leaf `version`, exposing the record itself alongside
    /// its sibling path.
    ///
    /// Fails with [`TreeError::OutOfRange`] when `version` has not been
    /// appended to `source`, and [`TreeError::IncompatibleCopy`] when a
    /// copied node disagrees with one already present — two partial copies
    /// of diverging histories cannot share a pruned tree.
    pub fn copy_version(
        &mut self,
        source: &HistoryTree<A>,
        version: u64,
        reveal_leaf: bool,
    ) -> Result<()> {
        if version >= source.len() {
            return Err(TreeError::OutOfRange {
                index: version,
                limit: source.len(),
            });
        }

        let mut id = NodeId::root_for(version);
        while id.depth > 0 {
            if (version >> (id.depth - 1)) & 1 == 1 {
                // The target leaf lies right of here, so the left child is a
                // complete subtree at `version`: retain its frozen
                // aggregation as a stub.
                let left = id.left_child();
                let aggregation =
                    aggregation_at(source.store(), &self.aggregator, left, version)?;
                self.insert_stub(left, aggregation)?;
                id = id.right_child();
            } else {
                // Right of here is empty at `version`; nothing to retain.
                id = id.left_child();
            }
        }

        let aggregation = aggregation_at(source.store(), &self.aggregator, id, version)?;
        let record = if reveal_leaf {
            Some(source.leaf(version)?.clone())
        } else {
            None
        };
        self.insert_leaf(id, aggregation, record)?;

        if self.version.map_or(true, |v| v < version) {
            self.version = Some(version);
        }
        Ok(())
    }

    /// Recompute the root aggregation of a copied version from retained
    /// nodes only.
    pub fn root_aggregation(&self, version: u64) -> Result<Aggregation> {
        aggregation_at(
            &self.store,
            &self.aggregator,
            NodeId::root_for(version),
            version,
        )
    }

    /// The revealed record at leaf `index`.
    ///
    /// Only records explicitly revealed by a copy are available; everything
    /// else is a [`TreeError::MissingNode`].
    pub fn revealed_leaf(&self, index: u64) -> Result<&A::Record> {
        self.store
            .get(NodeId::leaf(index))
            .and_then(|entry| entry.record.as_ref())
            .ok_or(TreeError::MissingNode { depth: 0, index })
    }

    /// Leaf indices whose records this tree reveals, in ascending order
    pub fn revealed_indices(&self) -> Vec<u64> {
        self.store
            .iter()
            .filter(|(id, entry)| id.depth == 0 && entry.record.is_some())
            .map(|(id, _)| id.index)
            .collect()
    }

    pub(crate) fn store(&self) -> &NodeStore<A::Record> {
        &self.store
    }

    fn insert_stub(&mut self, id: NodeId, aggregation: Aggregation) -> Result<()> {
        if let Some(existing) = self.store.get(id) {
            if existing.aggregation != aggregation {
                return Err(TreeError::IncompatibleCopy {
                    depth: id.depth,
                    index: id.index,
                });
            }
            // Already retained, possibly with more detail underneath.
            return Ok(());
        }
        self.store.insert(
            id,
            NodeEntry {
                aggregation,
                record: None,
            },
        );
        Ok(())
    }

    pub(crate) fn insert_leaf(
        &mut self,
        id: NodeId,
        aggregation: Aggregation,
        record: Option<A::Record>,
    ) -> Result<()> {
        match self.store.get_mut(id) {
            Some(existing) => {
                if existing.aggregation != aggregation {
                    return Err(TreeError::IncompatibleCopy {
                        depth: id.depth,
                        index: id.index,
                    });
                }
                if existing.record.is_none() {
                    existing.record = record;
                }
                Ok(())
            }
            None => {
                self.store.insert(id, NodeEntry { aggregation, record });
                Ok(())
            }
        }
    }
}

