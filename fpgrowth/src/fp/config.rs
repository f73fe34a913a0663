use super::error::MiningError;

/// Whether a count equal to the threshold is frequent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThresholdPolicy {
    /// Frequent iff `count >= min_count`.
    #[default]
    Inclusive,
    /// Frequent iff `count > min_count`.
    Exclusive,
}

/// Minimum support as an absolute transaction count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinSupport {
    pub count: usize,
    pub policy: ThresholdPolicy,
}

impl MinSupport {
    pub fn new(count: usize, policy: ThresholdPolicy) -> Self {
        Self { count, policy }
    }

    pub fn at_least(count: usize) -> Self {
        Self::new(count, ThresholdPolicy::Inclusive)
    }

    pub fn more_than(count: usize) -> Self {
        Self::new(count, ThresholdPolicy::Exclusive)
    }

    /// A zero count is never frequent, whatever the threshold.
    #[inline]
    pub fn is_frequent(&self, count: usize) -> bool {
        count > 0
            && match self.policy {
                ThresholdPolicy::Inclusive => count >= self.count,
                ThresholdPolicy::Exclusive => count > self.count,
            }
    }
}

/// Minimum support as given by the caller, before the transaction count is known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SupportThreshold {
    Count(usize),
    /// Share of transactions in `[0, 1]`, rounded up to a count.
    Fraction(f64),
}

impl SupportThreshold {
    pub fn resolve(&self, num_transactions: usize) -> Result<usize, MiningError> {
        match *self {
            SupportThreshold::Count(count) => Ok(count),
            SupportThreshold::Fraction(fraction) => {
                if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
                    return Err(MiningError::InvalidSupportFraction(fraction));
                }
                Ok((fraction * num_transactions as f64).ceil() as usize)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct MiningConfig {
    pub min_support: SupportThreshold,
    pub policy: ThresholdPolicy,
    /// Longest itemset to report; `None` mines the whole lattice.
    pub max_len: Option<usize>,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            min_support: SupportThreshold::Count(1),
            policy: ThresholdPolicy::Inclusive,
            max_len: None,
        }
    }
}

impl MiningConfig {
    pub fn new(min_support: SupportThreshold) -> Self {
        Self {
            min_support,
            ..Self::default()
        }
    }

    pub fn with_policy(mut self, policy: ThresholdPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    pub fn validate(&self) -> Result<(), MiningError> {
        if self.max_len == Some(0) {
            return Err(MiningError::InvalidMaxLength);
        }
        Ok(())
    }

    pub fn resolve(&self, num_transactions: usize) -> Result<MinSupport, MiningError> {
        self.validate()?;
        let count = self.min_support.resolve(num_transactions)?;
        Ok(MinSupport::new(count, self.policy))
    }
}
