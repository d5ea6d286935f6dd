//! Log server orchestration
//!
//! Owns the single live [`HistoryTree`] and [`CommitmentIndex`] behind a
//! reader/writer lock, with a writer gate serializing the append/commit
//! cycle. Appends trigger a commitment once a full batch of records is
//! outstanding: the batch boundary's root digest goes to the external
//! publisher, and only a successful publish advances the bookkeeping.
//!
//! ## Locking discipline
//!
//! The publish call is the only suspension point. It runs while holding the
//! writer gate (two appends are never in flight to the publisher at once)
//! but not the state lock, so readers of already-committed versions proceed
//! concurrently; the mapping update re-acquires the state lock briefly after
//! publish succeeds. Proof construction holds a read guard for its whole
//! walk, so it always observes a version boundary, never a half-applied
//! append.

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::commitments::CommitmentIndex;
use crate::error::{Result, ServerError};
use crate::publisher::LedgerPublisher;
use verity_tree::{Aggregator, Digest, HistoryTree, PrunedTree};

/// Default number of outstanding records that triggers a commitment
pub const DEFAULT_COMMIT_INTERVAL: u64 = 3;

/// Log server configuration.
///
/// Batching is strictly count-based; a time-based fallback would extend this
/// struct rather than the server logic.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Records per commitment batch (must be at least 1)
    pub commit_interval: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            commit_interval: DEFAULT_COMMIT_INTERVAL,
        }
    }
}

#[derive(Debug)]
struct ServerState<A: Aggregator> {
    tree: HistoryTree<A>,
    index: CommitmentIndex,
    total_records: u64,
    total_committed: u64,
}

/// Tamper-evident log server
#[derive(Debug)]
pub struct LogServer<A: Aggregator, P: LedgerPublisher> {
    state: RwLock<ServerState<A>>,
    writer: Mutex<()>,
    publisher: P,
    commit_interval: u64,
}

impl<A: Aggregator, P: LedgerPublisher> LogServer<A, P> {
    /// Create a server with an empty tree
    pub fn new(aggregator: A, publisher: P, config: ServerConfig) -> Self {
        debug_assert!(config.commit_interval >= 1);
        Self {
            state: RwLock::new(ServerState {
                tree: HistoryTree::new(aggregator),
                index: CommitmentIndex::new(),
                total_records: 0,
                total_committed: 0,
            }),
            writer: Mutex::new(()),
            publisher,
            commit_interval: config.commit_interval,
        }
    }

    /// Append one record, publishing a commitment when a batch is due.
    ///
    /// The record is appended unconditionally. If a batch boundary is due
    /// (including one left over from an earlier failed publish), the server
    /// makes at most one publish attempt: on success the commitment mappings
    /// advance, on failure they stay untouched and the error surfaces — the
    /// next append retries the same boundary, so outstanding records are
    /// never dropped or double-counted.
    pub async fn add_record(&self, record: A::Record) -> Result<()> {
        let _writer = self.writer.lock().await;

        let (total, committed) = {
            let mut state = self.state.write().await;
            let version = state.tree.append(record);
            state.total_records += 1;
            debug!(version, total_records = state.total_records, "appended record");
            (state.total_records, state.total_committed)
        };

        if committed + self.commit_interval > total {
            return Ok(());
        }
        self.commit_batch(committed).await
    }

    /// Publish the oldest due batch boundary and record its mappings.
    ///
    /// Caller holds the writer gate.
    async fn commit_batch(&self, committed: u64) -> Result<()> {
        let version = committed + self.commit_interval - 1;
        let aggregation = {
            let state = self.state.read().await;
            state.tree.root_aggregation(version)?
        };
        let digest = aggregation.digest();

        // The only suspension point: no state lock held, so readers of
        // committed history proceed while the ledger works.
        let txn = self.publisher.publish(&digest).await?;

        let mut state = self.state.write().await;
        let number = state.index.record(digest, version);
        state.total_committed = version + 1;
        info!(
            commitment = number,
            version,
            committed_records = state.total_committed,
            txn = %txn,
            "published log commitment"
        );
        Ok(())
    }

    /// The ledger publisher this server anchors through
    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Root digest of the commitment with the given 1-indexed number
    pub async fn get_commitment(&self, number: u64) -> Result<Digest> {
        let state = self.state.read().await;
        let version = state
            .index
            .version_of(number)
            .ok_or(ServerError::CommitmentNotFound { number })?;
        Ok(state.tree.root_aggregation(version)?.digest())
    }

    /// Tree version anchored by a commitment digest
    pub async fn commitment_hash_to_version(&self, digest: &Digest) -> Result<u64> {
        self.state
            .read()
            .await
            .index
            .version_of_hash(digest)
            .ok_or(ServerError::UnknownCommitmentHash)
    }

    /// Commitment number that published a digest
    pub async fn commitment_hash_to_commitment_number(&self, digest: &Digest) -> Result<u64> {
        self.state
            .read()
            .await
            .index
            .number_of_hash(digest)
            .ok_or(ServerError::UnknownCommitmentHash)
    }

    /// Tree version anchored by a commitment number
    pub async fn commitment_number_to_version(&self, number: u64) -> Result<u64> {
        self.state
            .read()
            .await
            .index
            .version_of(number)
            .ok_or(ServerError::CommitmentNotFound { number })
    }

    /// Commitments issued so far
    pub async fn total_commitments(&self) -> u64 {
        self.state.read().await.index.issued()
    }

    /// Records appended so far, committed or not
    pub async fn total_records(&self) -> u64 {
        self.state.read().await.total_records
    }

    /// Records covered by issued commitments
    pub async fn total_committed_records(&self) -> u64 {
        self.state.read().await.total_committed
    }

    /// Build a pruned tree proving that every commitment in
    /// `[start, end]` (inclusive, ascending) is derivable from one growing
    /// history.
    pub async fn construct_consistency_proof(
        &self,
        start: u64,
        end: u64,
    ) -> Result<PrunedTree<A>> {
        if start == 0 || end < start {
            return Err(ServerError::InvalidProofRange { start, end });
        }
        let state = self.state.read().await;
        let mut proof = state.tree.make_pruned();
        for number in start..=end {
            let version = state
                .index
                .version_of(number)
                .ok_or(ServerError::CommitmentNotFound { number })?;
            proof.copy_version(&state.tree, version, false)?;
        }
        debug!(start, end, nodes = proof.retained_nodes(), "built consistency proof");
        Ok(proof)
    }

    /// Build a pruned tree proving inclusion of the record with the given
    /// 1-indexed number under the latest commitment.
    ///
    /// Two copies, in this order: first the latest committed version without
    /// leaf revelation (the externally anchored root context), then the
    /// record's own version with revelation (the record and its sibling
    /// path). Uncommitted records cannot be proved yet.
    pub async fn construct_record_proof(&self, record_number: u64) -> Result<PrunedTree<A>> {
        let state = self.state.read().await;
        if record_number == 0 || record_number > state.total_committed {
            return Err(ServerError::RecordNotCommitted {
                record_number,
                committed: state.total_committed,
            });
        }

        let latest = state.index.issued();
        let latest_version = state
            .index
            .version_of(latest)
            .ok_or(ServerError::CommitmentNotFound { number: latest })?;

        let mut proof = state.tree.make_pruned();
        proof.copy_version(&state.tree, latest_version, false)?;
        proof.copy_version(&state.tree, record_number_to_version(record_number), true)?;
        debug!(record_number, nodes = proof.retained_nodes(), "built record proof");
        Ok(proof)
    }

    /// Rebuild the live tree with one record substituted.
    ///
    /// TESTING ONLY. Historical root digests for already-issued commitments
    /// will no longer match recomputation from scratch — that divergence is
    /// the point: it generates tamper fixtures that verifiers must reject.
    #[cfg(feature = "destructive-rebuild")]
    pub async fn change_record(&self, record_number: u64, new_record: A::Record) -> Result<()> {
        let _writer = self.writer.lock().await;
        let mut state = self.state.write().await;

        if record_number == 0 || record_number > state.total_records {
            return Err(ServerError::Tree(verity_tree::TreeError::OutOfRange {
                index: record_number,
                limit: state.total_records,
            }));
        }

        let mut rebuilt = HistoryTree::new(state.tree.aggregator().clone());
        for index in 0..state.total_records {
            if index == record_number_to_version(record_number) {
                rebuilt.append(new_record.clone());
            } else {
                rebuilt.append(state.tree.leaf(index)?.clone());
            }
        }
        state.tree = rebuilt;
        Ok(())
    }
}

/// Records are 1-indexed; the version after appending record `n` is `n - 1`
fn record_number_to_version(record_number: u64) -> u64 {
    record_number - 1
}
