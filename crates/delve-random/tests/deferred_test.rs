//! Integration tests for deferred random trees.

mod common;

use delve_random::DeferredTree;
use delve_test_support::CountingRng;

#[test]
fn test_verdicts_are_scale_invariant_across_trees() {
    let mut rng = common::seeded_registry();
    for _ in 0..1_000 {
        let mut tree = DeferredTree::new();
        let root = tree.root();
        let quarter = tree.chance_test(root, 1, 4, &mut rng);
        assert_eq!(tree.chance_test(root, 25, 100, &mut rng), quarter);
        assert_eq!(tree.chance_test(root, 250_000, 1_000_000, &mut rng), quarter);
        assert_eq!(tree.random2(root, 4, &mut rng) == 0, quarter);
    }
}

#[test]
fn test_tree_is_independent_of_later_stream_use() {
    // A tree answers the same whatever the stream does after it resolved.
    let mut rng = common::seeded_registry();
    let mut tree = DeferredTree::new();
    let cells: Vec<_> = (0..64).map(|i| tree.path(&[i / 8, i % 8])).collect();
    let first: Vec<i32> = cells.iter().map(|&cell| tree.random2(cell, 1_000, &mut rng)).collect();

    for _ in 0..100 {
        common::raw_draws(&mut rng, 3);
    }
    let again: Vec<i32> = cells.iter().map(|&cell| tree.random2(cell, 1_000, &mut rng)).collect();
    assert_eq!(first, again);
}

#[test]
fn test_same_seed_builds_same_tree() {
    let mut a = common::seeded_registry();
    let mut b = common::seeded_registry();
    let mut left = DeferredTree::new();
    let mut right = DeferredTree::new();

    for key in 0..50 {
        let l = left.path(&[key, 3]);
        let r = right.path(&[key, 3]);
        assert_eq!(left.random_range(l, -10, 10, &mut a), right.random_range(r, -10, 10, &mut b));
    }
}

#[test]
fn test_nodes_draw_only_when_first_resolved() {
    let mut rng = CountingRng::new(common::seeded_registry());
    let mut tree = DeferredTree::new();
    let nodes: Vec<_> = (0..100).map(|i| tree.path(&[i])).collect();
    assert_eq!(rng.draws(), 0);

    for &node in &nodes {
        tree.one_in(node, 3, &mut rng);
    }
    let resolved = rng.draws();
    assert!(resolved >= nodes.len());

    for &node in &nodes {
        tree.chance_test(node, 1, 3, &mut rng);
        tree.random2(node, 3, &mut rng);
    }
    assert_eq!(rng.draws(), resolved);
}

#[test]
fn test_random2_frequencies_across_trees() {
    let mut rng = common::seeded_registry();
    let freq = common::frequencies(5, 30_000, || {
        let mut tree = DeferredTree::new();
        let root = tree.root();
        usize::try_from(tree.random2(root, 5, &mut rng)).unwrap()
    });
    for f in freq {
        common::assert_close(f, 0.2, 0.012);
    }
}
