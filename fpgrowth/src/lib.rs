//! Frequent itemset mining with FP-Growth on a single, reusable prefix tree.
//!
//! Instead of building a conditional tree for every branch of the search, the
//! miner hides and re-weights nodes of one tree in place (depth-stamped
//! activation plus an undo log of rewritten counts) and restores them on the
//! way back up.
//!
//! ```
//! use fpgrowth::fp::{FPTree, MinSupport, mine_tree};
//!
//! let mut tree = FPTree::from_transactions(3, [vec![0, 1], vec![0, 1, 2], vec![0]]);
//! let levels = mine_tree(&mut tree, MinSupport::at_least(2), None);
//!
//! assert_eq!(levels[0].len(), 2);
//! assert_eq!(levels[1].get_itemset(0), &[0, 1]);
//! assert_eq!(levels[1].support(0), 2);
//! ```

pub mod fp;
#[cfg(feature = "python")]
mod python;

pub use fp::{
    FPTree, FrequentLevel, MinSupport, MiningConfig, MiningError, SupportThreshold,
    ThresholdPolicy, Vocabulary, fp_growth_algorithm, mine_transactions, mine_tree,
};
