//! PrunedTree unit tests (relocated from `src/pruned.rs` to avoid the
//! dev-dependency cycle with `verity-testkit` under `--cfg test`).

use verity_tree::{Blake3Aggregator, HistoryTree, TreeError};
use verity_testkit::TestRecord;

fn build(n: u64) -> HistoryTree<Blake3Aggregator<TestRecord>> {
    let mut tree = HistoryTree::new(Blake3Aggregator::new());
    for i in 0..n {
        tree.append(TestRecord::deposit("CORN", i as i64 + 1));
    }
    tree
}

#[test]
fn test_copied_version_root_matches_source() {
    let tree = build(11);
    for version in 0..11 {
        let mut pruned = tree.make_pruned();
        pruned.copy_version(&tree, version, false).unwrap();
        assert_eq!(
            pruned.root_aggregation(version).unwrap(),
            tree.root_aggregation(version).unwrap(),
            "version {version}"
        );
    }
}

#[test]
fn test_multiple_versions_share_one_tree() {
    let tree = build(10);
    let mut pruned = tree.make_pruned();
    for version in [2, 5, 9] {
        pruned.copy_version(&tree, version, false).unwrap();
    }
    for version in [2, 5, 9] {
        assert_eq!(
            pruned.root_aggregation(version).unwrap(),
            tree.root_aggregation(version).unwrap()
        );
    }
    assert_eq!(pruned.version(), Some(9));
}

#[test]
fn test_reveal_exposes_only_requested_leaf() {
    let tree = build(8);
    let mut pruned = tree.make_pruned();
    pruned.copy_version(&tree, 7, false).unwrap();
    pruned.copy_version(&tree, 3, true).unwrap();

    assert_eq!(
        pruned.revealed_leaf(3).unwrap(),
        tree.leaf(3).unwrap()
    );
    assert_eq!(pruned.revealed_indices(), vec![3]);
    assert!(matches!(
        pruned.revealed_leaf(2),
        Err(TreeError::MissingNode { .. })
    ));
}

#[test]
fn test_unappended_version_rejected() {
    let tree = build(3);
    let mut pruned = tree.make_pruned();
    assert!(matches!(
        pruned.copy_version(&tree, 3, false),
        Err(TreeError::OutOfRange { index: 3, limit: 3 })
    ));
}

#[test]
fn test_missing_node_surfaces() {
    let tree = build(6);
    let mut pruned = tree.make_pruned();
    pruned.copy_version(&tree, 5, false).unwrap();
    // The version-5 frontier happens to retain the frozen version-3 root
    // as a stub, so that one stays recomputable...
    assert_eq!(
        pruned.root_aggregation(3).unwrap(),
        tree.root_aggregation(3).unwrap()
    );
    // ...but version 2 needs nodes inside the stubbed subtree, which the
    // pruned tree does not retain.
    assert!(matches!(
        pruned.root_aggregation(2),
        Err(TreeError::MissingNode { .. })
    ));
}

#[test]
fn test_diverging_histories_rejected() {
    let tree = build(5);
    let mut other = HistoryTree::new(Blake3Aggregator::new());
    for i in 0..5 {
        other.append(TestRecord::withdrawal("WHEAT", i + 1));
    }

    let mut pruned = tree.make_pruned();
    pruned.copy_version(&tree, 4, false).unwrap();
    assert!(matches!(
        pruned.copy_version(&other, 4, false),
        Err(TreeError::IncompatibleCopy { .. })
    ));
}
