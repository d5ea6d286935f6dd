//! Deterministic proof wire format
//!
//! A pruned tree serializes to a canonical byte layout so that two
//! independent implementations emit identical encodings for the same proof
//! request:
//!
//! ```text
//! format version (1 byte)
//! target version (8 bytes, little-endian)
//! root digest of the target version (32 bytes)
//! node count (4 bytes, little-endian)
//! per retained node, in ascending (depth, index) order:
//!     depth (1 byte) | index (8 bytes, little-endian) | tag (1 byte)
//!     tag 0: opaque aggregation (48 bytes)
//!     tag 1: revealed leaf record (4-byte length + record bytes)
//! ```
//!
//! Revealed leaves carry only their record bytes; the decoder recomputes the
//! leaf aggregation, then recomputes the target version's root and rejects
//! the proof when it disagrees with the header digest.

use crate::aggregation::{Aggregation, AGGREGATION_BYTES};
use crate::aggregator::Aggregator;
use crate::error::{Result, TreeError};
use crate::node::{NodeId, NodeStore};
use crate::pruned::PrunedTree;

/// Current wire format version
pub const FORMAT_VERSION: u8 = 1;

/// Node carries an opaque aggregation stub
const TAG_STUB: u8 = 0;
/// Node carries a fully revealed leaf record
const TAG_REVEALED: u8 = 1;

/// Encode a pruned tree into the canonical wire layout
pub fn encode_proof<A: Aggregator>(proof: &PrunedTree<A>) -> Result<Vec<u8>> {
    let version = proof
        .version()
        .ok_or_else(|| TreeError::malformed_proof("cannot encode an empty proof"))?;
    let root = proof.root_aggregation(version)?;

    let node_count = u32::try_from(proof.retained_nodes())
        .map_err(|_| TreeError::malformed_proof("too many retained nodes"))?;

    let mut out = Vec::new();
    out.push(FORMAT_VERSION);
    out.extend_from_slice(&version.to_le_bytes());
    out.extend_from_slice(root.digest().as_bytes());
    out.extend_from_slice(&node_count.to_le_bytes());

    for (id, entry) in proof.store().iter() {
        out.push(id.depth);
        out.extend_from_slice(&id.index.to_le_bytes());
        match &entry.record {
            Some(record) => {
                let bytes = proof.aggregator().serialize_record(record);
                let len = u32::try_from(bytes.len())
                    .map_err(|_| TreeError::malformed_proof("record too large"))?;
                out.push(TAG_REVEALED);
                out.extend_from_slice(&len.to_le_bytes());
                out.extend_from_slice(&bytes);
            }
            None => {
                out.push(TAG_STUB);
                out.extend_from_slice(&entry.aggregation.to_bytes());
            }
        }
    }
    Ok(out)
}

/// Decode a proof, verifying its root digest against the retained nodes
pub fn decode_proof<A: Aggregator>(aggregator: A, bytes: &[u8]) -> Result<PrunedTree<A>> {
    let mut reader = Reader::new(bytes);

    let format = reader.read_u8()?;
    if format != FORMAT_VERSION {
        return Err(TreeError::malformed_proof(format!(
            "unsupported format version {format}"
        )));
    }
    let version = reader.read_u64()?;
    let root_digest = reader.take(32)?;
    let node_count = reader.read_u32()?;

    let mut store = NodeStore::new();
    let mut previous: Option<NodeId> = None;
    for _ in 0..node_count {
        let depth = reader.read_u8()?;
        let index = reader.read_u64()?;
        let id = NodeId { depth, index };
        if previous.map_or(false, |p| p >= id) {
            return Err(TreeError::malformed_proof(
                "nodes not in ascending order",
            ));
        }
        previous = Some(id);

        let tag = reader.read_u8()?;
        let entry = match tag {
            TAG_STUB => {
                let aggregation = Aggregation::from_bytes(reader.take(AGGREGATION_BYTES)?)?;
                crate::node::NodeEntry {
                    aggregation,
                    record: None,
                }
            }
            TAG_REVEALED => {
                if depth != 0 {
                    return Err(TreeError::malformed_proof(
                        "revealed node is not a leaf",
                    ));
                }
                let len = reader.read_u32()? as usize;
                let record = aggregator.parse_record(reader.take(len)?)?;
                let aggregation = aggregator.leaf_aggregation(&record);
                crate::node::NodeEntry {
                    aggregation,
                    record: Some(record),
                }
            }
            other => {
                return Err(TreeError::malformed_proof(format!(
                    "unknown node tag {other}"
                )));
            }
        };
        store.insert(id, entry);
    }
    reader.finish()?;

    let proof = PrunedTree::from_parts(aggregator, store, Some(version));
    let recomputed = proof.root_aggregation(version)?;
    if recomputed.digest().as_bytes() != root_digest {
        return Err(TreeError::malformed_proof("root digest mismatch"));
    }
    Ok(proof)
}

/// Bounds-checked cursor over the proof bytes
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| TreeError::malformed_proof("truncated proof"))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(self.take(4)?);
        Ok(u32::from_le_bytes(buf))
    }

    fn read_u64(&mut self) -> Result<u64> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.take(8)?);
        Ok(u64::from_le_bytes(buf))
    }

    fn finish(&self) -> Result<()> {
        if self.pos != self.bytes.len() {
            return Err(TreeError::malformed_proof("trailing bytes after proof"));
        }
        Ok(())
    }
}

