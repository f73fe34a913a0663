use super::config::MinSupport;
use super::tree::FPTree;
use ndarray::ArrayView2;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Mapping between raw items and the dense ids the tree works with.
///
/// Only frequent items get an id. Ids follow descending support with ties
/// broken by the raw item, so id 0 is the most frequent item and a canonical
/// transaction is just its ids in ascending order.
#[derive(Debug, Clone)]
pub struct Vocabulary<T> {
    items: Vec<T>,
    supports: Vec<usize>,
    index: HashMap<T, usize>,
}

impl<T> Vocabulary<T>
where
    T: Eq + Hash + Ord + Clone,
{
    pub fn fit<S: AsRef<[T]>>(transactions: &[S], min_support: &MinSupport) -> Self {
        let mut item_counts: HashMap<&T, usize> = HashMap::new();
        let mut seen: HashSet<&T> = HashSet::new();

        for transaction in transactions {
            seen.clear();
            for item in transaction.as_ref() {
                if seen.insert(item) {
                    *item_counts.entry(item).or_insert(0) += 1;
                }
            }
        }

        let mut frequent_items: Vec<(&T, usize)> = item_counts
            .into_iter()
            .filter(|&(_, count)| min_support.is_frequent(count))
            .collect();
        frequent_items.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let items: Vec<T> = frequent_items.iter().map(|&(item, _)| item.clone()).collect();
        let supports = frequent_items.iter().map(|&(_, count)| count).collect();
        let index = items
            .iter()
            .enumerate()
            .map(|(id, item)| (item.clone(), id))
            .collect();

        Self {
            items,
            supports,
            index,
        }
    }

    /// Canonical form of `transaction`: known items only, deduplicated, ascending id.
    pub fn encode(&self, transaction: &[T]) -> Vec<usize> {
        let mut ids: Vec<usize> = transaction
            .iter()
            .filter_map(|item| self.index.get(item).copied())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    pub fn id(&self, item: &T) -> Option<usize> {
        self.index.get(item).copied()
    }
}

impl<T> Vocabulary<T> {
    pub fn item(&self, id: usize) -> &T {
        &self.items[id]
    }

    pub fn decode(&self, itemset: &[usize]) -> Vec<&T> {
        itemset.iter().map(|&id| &self.items[id]).collect()
    }

    /// Support of the single item `id` over the whole input.
    pub fn support(&self, id: usize) -> usize {
        self.supports[id]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Builds the tree for `transactions`, encoding each one through `vocabulary`.
pub fn build_fp_tree<T, S>(transactions: &[S], vocabulary: &Vocabulary<T>) -> FPTree
where
    T: Eq + Hash + Ord + Clone,
    S: AsRef<[T]>,
{
    let mut fp_tree = FPTree::new(vocabulary.len());
    for transaction in transactions {
        let tx_items = vocabulary.encode(transaction.as_ref());
        if !tx_items.is_empty() {
            fp_tree.insert_transaction(&tx_items);
        }
    }
    fp_tree
}

/// Convert binary transaction matrix to list of item sets
pub fn matrix_to_transactions(transactions: ArrayView2<i32>) -> Vec<Vec<usize>> {
    transactions
        .rows()
        .into_iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .filter(|&(_, &cell)| cell != 0)
                .map(|(item, _)| item)
                .collect()
        })
        .collect()
}
