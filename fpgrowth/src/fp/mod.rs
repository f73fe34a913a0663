pub mod builder;
pub mod config;
pub mod error;
pub mod mining;
pub mod storage;
pub mod tree;

pub use builder::{Vocabulary, build_fp_tree, matrix_to_transactions};
pub use config::{MinSupport, MiningConfig, SupportThreshold, ThresholdPolicy};
pub use error::MiningError;
pub use mining::{
    MiningOutcome, fp_growth_algorithm, fp_growth_with_config, mine_transactions, mine_tree,
};
pub use storage::{FrequentLevel, ItemsetStorage};
pub use tree::{FPNode, FPTree, Projection, UndoLog};

#[cfg(test)]
mod tests;
