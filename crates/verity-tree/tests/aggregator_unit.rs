//! Aggregator unit tests (relocated from `src/aggregator.rs` to avoid the
//! dev-dependency cycle with `verity-testkit` under `--cfg test`).

use verity_tree::{Aggregator, Blake3Aggregator};
use verity_testkit::TestRecord;

fn aggregator() -> Blake3Aggregator<TestRecord> {
    Blake3Aggregator::new()
}

#[test]
fn test_leaf_aggregation_deterministic() {
    let record = TestRecord::deposit("CORN", 100);
    let a = aggregator().leaf_aggregation(&record);
    let b = aggregator().leaf_aggregation(&record);
    assert_eq!(a, b);
    assert_eq!(a.net_amount(), 100);
    assert_eq!(a.total_amount(), 100);
}

#[test]
fn test_leaf_aggregation_distinct_records() {
    let a = aggregator().leaf_aggregation(&TestRecord::deposit("CORN", 100));
    let b = aggregator().leaf_aggregation(&TestRecord::deposit("WHEAT", 100));
    assert_ne!(a.digest(), b.digest());
}

#[test]
fn test_combine_order_sensitive() {
    let agg = aggregator();
    let left = agg.leaf_aggregation(&TestRecord::deposit("CORN", 100));
    let right = agg.leaf_aggregation(&TestRecord::withdrawal("CORN", 30));

    let forward = agg.combine(&left, &right);
    let swapped = agg.combine(&right, &left);
    assert_ne!(forward.digest(), swapped.digest());
    // Accumulators commute even though the digest does not
    assert_eq!(forward.net_amount(), swapped.net_amount());
    assert_eq!(forward.total_amount(), swapped.total_amount());
}

#[test]
fn test_combine_accumulators() {
    let agg = aggregator();
    let left = agg.leaf_aggregation(&TestRecord::deposit("CORN", 100));
    let right = agg.leaf_aggregation(&TestRecord::withdrawal("CORN", 30));

    let parent = agg.combine(&left, &right);
    assert_eq!(parent.net_amount(), 70);
    assert_eq!(parent.total_amount(), 130);
}

#[test]
fn test_empty_distinct_from_real() {
    let agg = aggregator();
    let leaf = agg.leaf_aggregation(&TestRecord::transfer("CORN", 10));
    assert_ne!(leaf, agg.empty_aggregation());

    let parent = agg.combine(&leaf, &agg.empty_aggregation());
    assert_ne!(parent, agg.empty_aggregation());
}

#[test]
fn test_aggregation_reparse_reproduces_digest() {
    let agg = aggregator();
    let leaf = agg.leaf_aggregation(&TestRecord::deposit("WHEAT", 55));
    let reparsed = agg
        .parse_aggregation(&agg.serialize_aggregation(&leaf))
        .unwrap();
    assert_eq!(reparsed.digest(), leaf.digest());

    let record = agg
        .parse_record(&agg.serialize_record(&TestRecord::deposit("WHEAT", 55)))
        .unwrap();
    assert_eq!(agg.leaf_aggregation(&record).digest(), leaf.digest());
}
