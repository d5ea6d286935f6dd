//! Property tests for the history tree
//!
//! Laws under test: rebuild determinism at every version, order sensitivity
//! of the root digest, pruned-proof soundness, and byte-determinism of the
//! proof codec.

use proptest::prelude::*;

use verity_testkit::TestRecord;
use verity_tree::proof::{decode_proof, encode_proof};
use verity_tree::{Blake3Aggregator, HistoryTree};

fn good_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["CORN", "WHEAT", "RICE", "BARLEY"])
}

fn record_strategy() -> impl Strategy<Value = TestRecord> {
    prop_oneof![
        (good_strategy(), 1i64..1_000).prop_map(|(good, amount)| TestRecord::deposit(good, amount)),
        (good_strategy(), 1i64..1_000)
            .prop_map(|(good, amount)| TestRecord::withdrawal(good, amount)),
        (good_strategy(), 1i64..1_000)
            .prop_map(|(good, amount)| TestRecord::transfer(good, amount)),
    ]
}

fn record_sequence() -> impl Strategy<Value = Vec<TestRecord>> {
    prop::collection::vec(record_strategy(), 1..40)
}

fn build(records: &[TestRecord]) -> HistoryTree<Blake3Aggregator<TestRecord>> {
    let mut tree = HistoryTree::new(Blake3Aggregator::new());
    for record in records {
        tree.append(record.clone());
    }
    tree
}

proptest! {
    /// Re-running the whole append sequence from empty state reproduces the
    /// identical root digest at every version.
    #[test]
    fn determinism_across_rebuilds(records in record_sequence()) {
        let first = build(&records);
        let second = build(&records);
        for version in 0..records.len() as u64 {
            prop_assert_eq!(
                first.root_aggregation(version).unwrap(),
                second.root_aggregation(version).unwrap()
            );
        }
    }

    /// Swapping two distinct records changes the final root digest.
    #[test]
    fn order_sensitivity(
        records in prop::collection::vec(record_strategy(), 2..20),
        swap in any::<prop::sample::Index>(),
    ) {
        let i = swap.index(records.len() - 1);
        let j = i + 1;
        prop_assume!(records[i] != records[j]);

        let mut swapped = records.clone();
        swapped.swap(i, j);

        let last = records.len() as u64 - 1;
        prop_assert_ne!(
            build(&records).root_aggregation(last).unwrap().digest(),
            build(&swapped).root_aggregation(last).unwrap().digest()
        );
    }

    /// A pruned copy of any version recomputes the live tree's root for
    /// that version from retained nodes alone.
    #[test]
    fn pruned_proof_soundness(
        records in record_sequence(),
        pick in any::<prop::sample::Index>(),
    ) {
        let tree = build(&records);
        let version = pick.index(records.len()) as u64;

        let mut proof = tree.make_pruned();
        proof.copy_version(&tree, version, false).unwrap();
        prop_assert_eq!(
            proof.root_aggregation(version).unwrap(),
            tree.root_aggregation(version).unwrap()
        );
    }

    /// A revealing copy exposes exactly the requested record, and the codec
    /// round-trips the proof while preserving both copied roots.
    #[test]
    fn record_reveal_and_codec_round_trip(
        records in record_sequence(),
        pick in any::<prop::sample::Index>(),
    ) {
        let tree = build(&records);
        let last = records.len() as u64 - 1;
        let revealed = pick.index(records.len()) as u64;

        let mut proof = tree.make_pruned();
        proof.copy_version(&tree, last, false).unwrap();
        proof.copy_version(&tree, revealed, true).unwrap();
        prop_assert_eq!(proof.revealed_indices(), vec![revealed]);

        let bytes = encode_proof(&proof).unwrap();
        let decoded = decode_proof(Blake3Aggregator::<TestRecord>::new(), &bytes).unwrap();
        prop_assert_eq!(
            decoded.root_aggregation(last).unwrap(),
            tree.root_aggregation(last).unwrap()
        );
        prop_assert_eq!(
            decoded.root_aggregation(revealed).unwrap(),
            tree.root_aggregation(revealed).unwrap()
        );
        prop_assert_eq!(decoded.revealed_leaf(revealed).unwrap(), &records[revealed as usize]);
    }

    /// Encoding the same proof request twice yields identical bytes.
    #[test]
    fn codec_is_deterministic(records in record_sequence()) {
        let tree = build(&records);
        let last = records.len() as u64 - 1;

        let encode_once = || {
            let mut proof = tree.make_pruned();
            proof.copy_version(&tree, last, false).unwrap();
            encode_proof(&proof).unwrap()
        };
        prop_assert_eq!(encode_once(), encode_once());
    }
}
