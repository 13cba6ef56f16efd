use thiserror::Error;

/// Errors raised while validating input or mining itemsets and rules.
///
/// Mining is deterministic, so none of these are transient: re-running with
/// the same data and configuration reproduces the same error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MiningError {
    /// The data or the configuration cannot be mined as given.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The itemset ceiling was crossed during growth.
    #[error("too many itemsets ({count}); increase 'support' or 'max_itemsets' (currently {limit})")]
    TooManyItemsets { count: usize, limit: usize },

    /// An itemset that must exist by the Apriori property was not found.
    #[error("internal error in itemset tree: {0}")]
    Inconsistency(String),
}

impl MiningError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        MiningError::InvalidInput(msg.into())
    }

    pub(crate) fn inconsistency(msg: impl Into<String>) -> Self {
        MiningError::Inconsistency(msg.into())
    }

    /// True when the run was aborted by the itemset ceiling, i.e. it may
    /// succeed with a higher `max_itemsets` or a higher `support`.
    pub fn is_resource_exceeded(&self) -> bool {
        matches!(self, MiningError::TooManyItemsets { .. })
    }
}

pub type Result<T> = std::result::Result<T, MiningError>;
