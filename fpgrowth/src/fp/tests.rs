use super::*;
use ndarray::Array2;
use std::collections::BTreeMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tree::{ALWAYS_ACTIVE, ROOT};

/// Itemsets keyed by their sorted items.
fn collect(levels: &[FrequentLevel]) -> BTreeMap<Vec<usize>, usize> {
    let mut found = BTreeMap::new();
    for level in levels {
        for (itemset, support) in level.iter() {
            let mut key = itemset.to_vec();
            key.sort_unstable();
            assert!(found.insert(key, support).is_none(), "itemset reported twice");
        }
    }
    found
}

fn small_tree() -> FPTree {
    // root → 0 → 1
    //         └→ 2
    //     └→ 1
    FPTree::from_transactions(3, [vec![0, 1], vec![0, 2], vec![1]])
}

#[test]
fn test_itemset_storage() {
    let mut storage = storage::ItemsetStorage::new();

    storage.add_itemset(&[7, 2, 5], 4);
    storage.add_itemset(&[1, 3], 9);
    storage.add_itemset(&[2, 3, 5, 9], 1);

    // Discovery order is kept, not sorted.
    assert_eq!(storage.get_itemset(0), &[7, 2, 5]);
    assert_eq!(storage.get_itemset(1), &[1, 3]);
    assert_eq!(storage.get_itemset(2), &[2, 3, 5, 9]);
    assert_eq!(storage.support(1), 9);
    assert_eq!(storage.len(), 3);
}

#[test]
fn test_frequent_level() {
    let mut level = FrequentLevel::new(2);

    level.add_itemset(&[1, 2], 5);
    level.add_itemset(&[3, 4], 3);

    assert_eq!(level.len(), 2);
    assert_eq!(level.itemset_size, 2);

    let itemsets: Vec<_> = level.iter().collect();
    assert_eq!(itemsets, vec![(&[1, 2][..], 5), (&[3, 4][..], 3)]);
}

#[test]
fn test_fp_tree_insert() {
    let mut tree = FPTree::new(5);

    tree.insert_transaction(&[1, 2, 3]);

    let node1 = tree.child(ROOT, 1).unwrap();
    assert_eq!(tree.node(node1).item, Some(1));
    assert_eq!(tree.node(node1).count, 1);
    assert_eq!(tree.num_nodes(), 3);

    // Shares the [1, 2] prefix with the first transaction.
    tree.insert_transaction(&[1, 2, 4]);

    assert_eq!(tree.num_nodes(), 4);
    assert_eq!(tree.node(node1).count, 2);
    let node2 = tree.child(node1, 2).unwrap();
    assert_eq!(tree.node(node2).count, 2);
    assert!(tree.child(node2, 3).is_some());
    assert!(tree.child(node2, 4).is_some());

    assert_eq!(tree.counts(), &[0, 2, 2, 1, 1]);
    assert!(tree.root().item.is_none());
    assert!((1..=tree.num_nodes()).all(|id| tree.node(id).activation == ALWAYS_ACTIVE));
}

#[test]
fn test_same_item_chain_follows_insertion_order() {
    let tree = FPTree::from_transactions(3, [vec![0, 2], vec![1, 2], vec![2], vec![0, 2]]);

    let chain: Vec<usize> = tree.same_item_nodes(2).collect();
    assert_eq!(chain.len(), 3);
    assert!(chain.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(chain.iter().all(|&id| tree.node(id).item == Some(2)));

    let total: usize = chain.iter().map(|&id| tree.node(id).count).sum();
    assert_eq!(total, tree.item_count(2));
    assert_eq!(tree.same_item_nodes(1).count(), 1);
}

#[test]
#[should_panic(expected = "outside of the tree domain")]
fn test_insert_rejects_item_outside_domain() {
    let mut tree = FPTree::new(2);
    tree.insert_transaction(&[0, 2]);
}

#[test]
fn test_deactivate_keeps_only_paths_to_target() {
    let mut tree = small_tree();
    let node0 = tree.child(ROOT, 0).unwrap();
    let node01 = tree.child(node0, 1).unwrap();
    let node02 = tree.child(node0, 2).unwrap();
    let node1 = tree.child(ROOT, 1).unwrap();

    assert!(tree.deactivate(ROOT, 0, 2));

    assert_eq!(tree.node(node0).activation, ALWAYS_ACTIVE);
    assert_eq!(tree.node(node01).activation, 0);
    assert_eq!(tree.node(node02).activation, 0);
    assert_eq!(tree.node(node1).activation, 0);
    assert_eq!(tree.counts(), &[2, 0, 0]);

    tree.reactivate(ROOT, 0);
    assert_eq!(tree, small_tree());
}

#[test]
fn test_deactivate_hides_target_leaves() {
    let mut tree = FPTree::from_transactions(3, [vec![0, 1, 2], vec![0, 1], vec![1]]);
    let node0 = tree.child(ROOT, 0).unwrap();
    let node01 = tree.child(node0, 1).unwrap();
    let node012 = tree.child(node01, 2).unwrap();
    let node1 = tree.child(ROOT, 1).unwrap();

    assert!(tree.deactivate(ROOT, 0, 1));

    // Both `1` nodes are hidden along with everything below them.
    assert_eq!(tree.node(node0).activation, ALWAYS_ACTIVE);
    assert_eq!(tree.node(node01).activation, 0);
    assert_eq!(tree.node(node012).activation, 0);
    assert_eq!(tree.node(node1).activation, 0);
    assert_eq!(tree.counts(), &[2, 0, 0]);

    tree.recompute_transparency(&MinSupport::at_least(1));
    assert!(tree.is_transparent(1));
}

#[test]
fn test_deactivate_without_target_hides_root() {
    let mut tree = FPTree::from_transactions(3, [vec![0, 1]]);

    assert!(!tree.deactivate(ROOT, 0, 2));
    assert_eq!(tree.root().activation, 0);
    assert_eq!(tree.counts(), &[0, 0, 0]);

    tree.reactivate(ROOT, 0);
    assert_eq!(tree, FPTree::from_transactions(3, [vec![0, 1]]));
}

#[test]
fn test_percolate_and_reestablish() {
    let mut tree = small_tree();
    let node0 = tree.child(ROOT, 0).unwrap();

    tree.deactivate(ROOT, 0, 2);
    let mut undo = UndoLog::new();
    let percolated = tree.percolate_up(ROOT, 0, &mut undo, 2);

    assert_eq!(percolated, 1);
    assert_eq!(undo.len(), 1);
    assert_eq!(tree.node(node0).count, 1);
    assert_eq!(tree.counts(), &[1, 0, 0]);
    assert!(tree.counts_match_active_nodes(1));

    tree.reestablish(&mut undo);
    assert!(undo.is_empty());
    assert_eq!(tree.node(node0).count, 2);
    assert_eq!(tree.counts(), &[2, 0, 0]);

    tree.reactivate(ROOT, 0);
    assert_eq!(tree, small_tree());
}

#[test]
fn test_transparency_follows_policy() {
    let mut tree = small_tree();

    tree.recompute_transparency(&MinSupport::at_least(2));
    assert!(!tree.is_transparent(0));
    assert!(!tree.is_transparent(1));
    assert!(tree.is_transparent(2));

    tree.recompute_transparency(&MinSupport::more_than(1));
    assert!(!tree.is_transparent(0));
    assert!(tree.is_transparent(2));

    tree.recompute_transparency(&MinSupport::more_than(2));
    assert!((0..3).all(|item| tree.is_transparent(item)));
}

#[test]
fn test_projection_guard_restores_tree() {
    let mut tree = small_tree();
    let min_support = MinSupport::at_least(1);
    tree.recompute_transparency(&min_support);
    let before = tree.clone();

    {
        let projected = tree.project(1, 0, min_support);
        assert_eq!(projected.counts(), &[1, 0, 0]);
        assert!(projected.counts_match_active_nodes(1));
        assert!(projected.is_transparent(1));
        assert!(!projected.is_transparent(0));
        assert_eq!(projected.undo_len(), 1);
    }

    assert_eq!(tree, before);
}

#[test]
fn test_projection_restores_tree_when_unwinding() {
    let mut tree = small_tree();
    let min_support = MinSupport::at_least(1);
    tree.recompute_transparency(&min_support);
    let before = tree.clone();

    let outcome: std::thread::Result<()> = catch_unwind(AssertUnwindSafe(|| {
        let projected = tree.project(2, 0, min_support);
        assert_eq!(projected.counts(), &[1, 0, 0]);
        panic!("abandon the branch");
    }));

    assert!(outcome.is_err());
    assert_eq!(tree, before);
}

#[test]
fn test_mining_scenario_inclusive() {
    let mut tree = FPTree::from_transactions(3, [vec![0, 1], vec![0, 1, 2], vec![0]]);

    let levels = mine_tree(&mut tree, MinSupport::at_least(2), None);

    assert_eq!(levels.len(), 2);
    // Items are enumerated from the highest id down.
    let singles: Vec<_> = levels[0].iter().collect();
    assert_eq!(singles, vec![(&[1][..], 2), (&[0][..], 3)]);
    let pairs: Vec<_> = levels[1].iter().collect();
    assert_eq!(pairs, vec![(&[0, 1][..], 2)]);
}

#[test]
fn test_mining_scenario_exclusive() {
    let mut tree = FPTree::from_transactions(3, [vec![0, 1], vec![0, 1, 2], vec![0]]);

    let levels = mine_tree(&mut tree, MinSupport::more_than(2), None);

    assert_eq!(levels.len(), 1);
    let singles: Vec<_> = levels[0].iter().collect();
    assert_eq!(singles, vec![(&[0][..], 3)]);
}

#[test]
fn test_single_transaction_yields_every_subset() {
    let mut tree = FPTree::from_transactions(3, [vec![0, 1, 2]]);

    let found = collect(&mine_tree(&mut tree, MinSupport::at_least(1), None));

    assert_eq!(found.len(), 7);
    assert!(found.values().all(|&support| support == 1));
    assert!(found.contains_key(&vec![0, 1, 2]));
}

#[test]
fn test_single_transaction_powerset_size() {
    for n in 1..=7 {
        let transaction: Vec<usize> = (0..n).collect();
        let mut tree = FPTree::from_transactions(n, [transaction]);

        let levels = mine_tree(&mut tree, MinSupport::at_least(1), None);

        let total: usize = levels.iter().map(FrequentLevel::len).sum();
        assert_eq!(total, (1 << n) - 1);
        assert_eq!(levels.len(), n);
    }
}

#[test]
fn test_empty_tree_yields_nothing() {
    for threshold in 1..5 {
        let mut tree = FPTree::new(4);
        assert!(mine_tree(&mut tree, MinSupport::at_least(threshold), None).is_empty());
    }
}

#[test]
fn test_zero_threshold_skips_absent_items() {
    let mut tree = FPTree::from_transactions(4, [vec![0, 1], vec![1]]);

    let found = collect(&mine_tree(&mut tree, MinSupport::at_least(0), None));

    assert_eq!(found.len(), 3);
    assert!(found.keys().all(|itemset| itemset.iter().all(|&item| item < 2)));
}

#[test]
fn test_mining_leaves_tree_unchanged() {
    let transactions = [
        vec![0, 1, 3],
        vec![0, 2],
        vec![0, 1, 2, 3],
        vec![1, 3],
        vec![0, 1],
        vec![2, 3],
    ];
    let mut tree = FPTree::from_transactions(4, transactions);
    let min_support = MinSupport::at_least(2);
    tree.recompute_transparency(&min_support);
    let before = tree.clone();

    let first = mine_tree(&mut tree, min_support, None);
    assert_eq!(tree, before);

    let second = mine_tree(&mut tree, min_support, None);
    assert_eq!(first, second);
    assert_eq!(tree, before);
}

#[test]
fn test_supersets_extend_a_reported_prefix() {
    let transactions = [
        vec![0, 1, 2, 4],
        vec![0, 1, 3],
        vec![0, 2, 3, 4],
        vec![1, 2],
        vec![0, 1, 2, 3, 4],
        vec![0, 4],
    ];
    let mut tree = FPTree::from_transactions(5, transactions);

    let levels = mine_tree(&mut tree, MinSupport::at_least(2), None);

    for pair in levels.windows(2) {
        let (shorter, longer) = (&pair[0], &pair[1]);
        for (itemset, support) in longer.iter() {
            let prefix = &itemset[1..];
            let parent = shorter
                .iter()
                .find(|(candidate, _)| *candidate == prefix)
                .expect("prefix reported one level up");
            assert!(support <= parent.1);
        }
    }
}

#[test]
fn test_max_len_stops_recursion() {
    let mut tree = FPTree::from_transactions(4, [vec![0, 1, 2, 3]]);

    let levels = mine_tree(&mut tree, MinSupport::at_least(1), Some(2));

    assert_eq!(levels.len(), 2);
    assert_eq!(levels[0].len(), 4);
    assert_eq!(levels[1].len(), 6);
}

#[test]
fn test_support_threshold_resolution() {
    assert_eq!(SupportThreshold::Count(3).resolve(10), Ok(3));
    assert_eq!(SupportThreshold::Fraction(0.5).resolve(5), Ok(3));
    assert_eq!(SupportThreshold::Fraction(0.25).resolve(8), Ok(2));
    assert_eq!(SupportThreshold::Fraction(0.0).resolve(8), Ok(0));
    assert_eq!(
        SupportThreshold::Fraction(1.5).resolve(8),
        Err(MiningError::InvalidSupportFraction(1.5))
    );
    assert!(SupportThreshold::Fraction(f64::NAN).resolve(8).is_err());
}

#[test]
fn test_config_rejects_zero_max_len() {
    let config = MiningConfig::new(SupportThreshold::Count(1)).with_max_len(0);
    assert_eq!(config.resolve(10), Err(MiningError::InvalidMaxLength));

    let config = MiningConfig::default().with_policy(ThresholdPolicy::Exclusive);
    assert_eq!(config.resolve(10), Ok(MinSupport::more_than(1)));
}

#[test]
fn test_vocabulary_orders_by_support_then_item() {
    let transactions = vec![
        vec!["milk", "bread", "milk"],
        vec!["bread", "eggs"],
        vec!["eggs", "bread"],
        vec!["jam"],
    ];

    let vocabulary: Vocabulary<&str> = Vocabulary::fit(&transactions, &MinSupport::at_least(1));

    assert_eq!(vocabulary.len(), 4);
    assert_eq!(vocabulary.decode(&[0, 1, 2, 3]), vec![&"bread", &"eggs", &"jam", &"milk"]);
    assert_eq!(vocabulary.support(0), 3);
    // "milk" appears twice in one transaction but is counted once.
    assert_eq!(vocabulary.support(3), 1);

    assert_eq!(vocabulary.encode(&["milk", "bread", "butter", "bread"]), vec![0, 3]);
}

#[test]
fn test_vocabulary_drops_infrequent_items() {
    let transactions = vec![vec![3, 1], vec![1, 2], vec![1, 3]];

    let vocabulary: Vocabulary<i32> = Vocabulary::fit(&transactions, &MinSupport::at_least(2));

    assert_eq!(vocabulary.len(), 2);
    assert_eq!(vocabulary.id(&1), Some(0));
    assert_eq!(vocabulary.id(&3), Some(1));
    assert_eq!(vocabulary.id(&2), None);
}

#[test]
fn test_fp_growth_simple() {
    // Transactions: [[0,1], [0,1,2], [0,2], [1,2]]
    // Every item has support 3/4, every pair 2/4, the triple 1/4.
    let transactions = Array2::from_shape_vec(
        (4, 3),
        vec![
            1, 1, 0, // Transaction 0: items 0, 1
            1, 1, 1, // Transaction 1: items 0, 1, 2
            1, 0, 1, // Transaction 2: items 0, 2
            0, 1, 1, // Transaction 3: items 1, 2
        ],
    )
    .unwrap();

    let result = fp_growth_algorithm(transactions.view(), 0.5).unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].len(), 3);
    assert_eq!(result[1].len(), 3);
    let found = collect(&result);
    assert_eq!(found[&vec![0]], 3);
    assert_eq!(found[&vec![0, 2]], 2);
    assert!(!found.contains_key(&vec![0, 1, 2]));
}

#[test]
fn test_matrix_to_transactions() {
    let matrix = Array2::from_shape_vec((3, 3), vec![0, 2, 0, 0, 0, 0, 1, 0, -1]).unwrap();

    let transactions = matrix_to_transactions(matrix.view());

    assert_eq!(transactions, vec![vec![1], vec![], vec![0, 2]]);
}

#[test]
fn test_mine_transactions_decodes_items() {
    let transactions = vec![
        vec!["a", "b"],
        vec!["a", "b", "c"],
        vec!["a"],
    ];

    let config = MiningConfig::new(SupportThreshold::Count(2));
    let outcome: MiningOutcome<&str> = mine_transactions(&transactions, &config).unwrap();

    assert_eq!(outcome.len(), 3);
    let mut decoded: Vec<(Vec<&str>, usize)> = outcome
        .iter_decoded()
        .map(|(itemset, support)| {
            let mut names: Vec<&str> = itemset.into_iter().copied().collect();
            names.sort_unstable();
            (names, support)
        })
        .collect();
    decoded.sort();
    assert_eq!(
        decoded,
        vec![(vec!["a"], 3), (vec!["a", "b"], 2), (vec!["b"], 2)]
    );
}
