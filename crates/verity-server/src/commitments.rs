//! Commitment bookkeeping
//!
//! Tracks which tree version, and which root digest, corresponds to which
//! sequentially numbered external commitment. Commitments are 1-indexed,
//! never deleted, never renumbered; versions increase strictly with
//! commitment numbers, so the three maps stay bijective over time.

use std::collections::BTreeMap;

use verity_tree::Digest;

/// Bijective maps between commitment numbers, tree versions, and digests
#[derive(Debug, Clone, Default)]
pub struct CommitmentIndex {
    issued: u64,
    hash_to_version: BTreeMap<Digest, u64>,
    hash_to_number: BTreeMap<Digest, u64>,
    number_to_version: BTreeMap<u64, u64>,
}

impl CommitmentIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of commitments issued so far
    pub fn issued(&self) -> u64 {
        self.issued
    }

    /// Record a newly published commitment, returning its number.
    ///
    /// Callers must pass strictly increasing versions; the index is
    /// append-only bookkeeping, not a general map.
    pub fn record(&mut self, digest: Digest, version: u64) -> u64 {
        debug_assert!(
            self.number_to_version
                .values()
                .next_back()
                .map_or(true, |&last| version > last),
            "commitment versions must increase strictly"
        );
        self.issued += 1;
        self.hash_to_version.insert(digest, version);
        self.hash_to_number.insert(digest, self.issued);
        self.number_to_version.insert(self.issued, version);
        self.issued
    }

    /// Tree version a commitment number maps to
    pub fn version_of(&self, number: u64) -> Option<u64> {
        self.number_to_version.get(&number).copied()
    }

    /// Tree version a commitment digest maps to
    pub fn version_of_hash(&self, digest: &Digest) -> Option<u64> {
        self.hash_to_version.get(digest).copied()
    }

    /// Commitment number a digest maps to
    pub fn number_of_hash(&self, digest: &Digest) -> Option<u64> {
        self.hash_to_number.get(digest).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest(fill: u8) -> Digest {
        Digest::new([fill; 32])
    }

    #[test]
    fn test_numbers_start_at_one() {
        let mut index = CommitmentIndex::new();
        assert_eq!(index.record(digest(1), 2), 1);
        assert_eq!(index.record(digest(2), 5), 2);
        assert_eq!(index.issued(), 2);
    }

    #[test]
    fn test_bijection() {
        let mut index = CommitmentIndex::new();
        index.record(digest(1), 2);
        index.record(digest(2), 5);
        index.record(digest(3), 8);

        for (number, fill, version) in [(1, 1, 2), (2, 2, 5), (3, 3, 8)] {
            assert_eq!(index.version_of(number), Some(version));
            assert_eq!(index.version_of_hash(&digest(fill)), Some(version));
            assert_eq!(index.number_of_hash(&digest(fill)), Some(number));
        }
    }

    #[test]
    fn test_unissued_lookups() {
        let index = CommitmentIndex::new();
        assert_eq!(index.version_of(1), None);
        assert_eq!(index.version_of_hash(&digest(9)), None);
        assert_eq!(index.number_of_hash(&digest(9)), None);
    }
}
