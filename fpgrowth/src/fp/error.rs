use thiserror::Error;

/// Errors raised while preparing a mining run.
///
/// The tree and the miner themselves have no recoverable failures; broken
/// input contracts there are panics.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MiningError {
    /// Support fraction was negative, above one, or not a number.
    #[error("minimum support fraction must be within [0, 1], got {0}")]
    InvalidSupportFraction(f64),

    /// A maximum itemset length of zero would report nothing.
    #[error("maximum itemset length must be at least 1")]
    InvalidMaxLength,
}
