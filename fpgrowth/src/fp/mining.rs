use super::builder::{Vocabulary, build_fp_tree, matrix_to_transactions};
use super::config::{MinSupport, MiningConfig, SupportThreshold};
use super::error::MiningError;
use super::storage::{FrequentLevel, add_pattern_to_result};
use super::tree::{FPTree, ROOT};
use ndarray::ArrayView2;
use std::hash::Hash;
use tracing::{debug, trace};

/// Mines every frequent itemset of `tree`.
///
/// The tree is projected and restored in place for each branch of the
/// search, so it is left exactly as it was found. `result[d]` holds the
/// itemsets of length `d + 1`, each listed with its most recently added item
/// first. Items are tried from the highest id down at every level.
pub fn mine_tree(
    tree: &mut FPTree,
    min_support: MinSupport,
    max_len: Option<usize>,
) -> Vec<FrequentLevel> {
    debug!(
        nodes = tree.num_nodes(),
        items = tree.max_label(),
        min_count = min_support.count,
        policy = ?min_support.policy,
        "mining frequent itemsets"
    );

    let miner = Miner {
        min_support,
        max_len,
    };
    let mut result = Vec::new();
    tree.recompute_transparency(&min_support);
    miner.mine(tree, &[], 0, &mut result);

    debug!(
        levels = result.len(),
        itemsets = result.iter().map(FrequentLevel::len).sum::<usize>(),
        "mining finished"
    );
    result
}

struct Miner {
    min_support: MinSupport,
    max_len: Option<usize>,
}

impl Miner {
    fn mine(
        &self,
        tree: &mut FPTree,
        prefix: &[usize],
        depth: usize,
        result: &mut Vec<FrequentLevel>,
    ) {
        if !tree.node(ROOT).is_active_at(depth) {
            return;
        }
        debug_assert!(tree.counts_match_active_nodes(depth));
        debug_assert!(tree.transparency_is_current(&self.min_support));

        let mut itemset = Vec::with_capacity(prefix.len() + 1);
        for item in (0..tree.max_label()).rev() {
            if tree.is_transparent(item) {
                continue;
            }

            itemset.clear();
            itemset.push(item);
            itemset.extend_from_slice(prefix);

            if self.can_extend(itemset.len()) {
                trace!(item, depth, "projecting");
                let mut projected = tree.project(item, depth, self.min_support);
                self.mine(&mut projected, &itemset, depth + 1, result);
            }

            add_pattern_to_result(&itemset, tree.item_count(item), result);
        }
    }

    fn can_extend(&self, len: usize) -> bool {
        self.max_len.is_none_or(|max_len| len < max_len)
    }
}

/// Frequent itemsets in dense ids, plus the vocabulary to decode them.
#[derive(Debug, Clone)]
pub struct MiningOutcome<T> {
    pub vocabulary: Vocabulary<T>,
    pub levels: Vec<FrequentLevel>,
}

impl<T> MiningOutcome<T> {
    /// Total number of itemsets over all levels.
    pub fn len(&self) -> usize {
        self.levels.iter().map(FrequentLevel::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter_decoded(&self) -> impl Iterator<Item = (Vec<&T>, usize)> + '_ {
        self.levels.iter().flat_map(move |level| {
            level
                .iter()
                .map(move |(itemset, support)| (self.vocabulary.decode(itemset), support))
        })
    }
}

impl MiningOutcome<usize> {
    /// Levels with dense ids replaced by the original item numbers.
    pub fn into_item_levels(self) -> Vec<FrequentLevel> {
        self.levels
            .iter()
            .map(|level| {
                let mut decoded = FrequentLevel::new(level.itemset_size);
                let mut itemset = Vec::with_capacity(level.itemset_size);
                for (ids, support) in level.iter() {
                    itemset.clear();
                    itemset.extend(ids.iter().map(|&id| *self.vocabulary.item(id)));
                    decoded.add_itemset(&itemset, support);
                }
                decoded
            })
            .collect()
    }
}

/// Mines raw transactions of any hashable, ordered item type.
pub fn mine_transactions<T, S>(
    transactions: &[S],
    config: &MiningConfig,
) -> Result<MiningOutcome<T>, MiningError>
where
    T: Eq + Hash + Ord + Clone,
    S: AsRef<[T]>,
{
    let min_support = config.resolve(transactions.len())?;
    let vocabulary = Vocabulary::fit(transactions, &min_support);
    let mut fp_tree = build_fp_tree(transactions, &vocabulary);
    let levels = mine_tree(&mut fp_tree, min_support, config.max_len);

    Ok(MiningOutcome { vocabulary, levels })
}

/// Mines a binary matrix (rows are transactions, non-zero cells are items).
///
/// `min_support` is a share of the rows; itemsets are reported in column ids.
pub fn fp_growth_algorithm(
    transactions: ArrayView2<i32>,
    min_support: f64,
) -> Result<Vec<FrequentLevel>, MiningError> {
    let config = MiningConfig::new(SupportThreshold::Fraction(min_support));
    fp_growth_with_config(transactions, &config)
}

pub fn fp_growth_with_config(
    transactions: ArrayView2<i32>,
    config: &MiningConfig,
) -> Result<Vec<FrequentLevel>, MiningError> {
    let rows = matrix_to_transactions(transactions);
    let outcome: MiningOutcome<usize> = mine_transactions(&rows, config)?;
    Ok(outcome.into_item_levels())
}
