use serde::{Deserialize, Serialize};

use crate::error::{MiningError, Result};

/// Default ceiling on the number of itemsets a single run may produce.
pub const DEFAULT_MAX_ITEMSETS: usize = 15000;

/// Parameters shared by the dense and the sparse inducers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InducerConfig {
    /// Minimal support, as a fraction of the total weight of the data.
    pub support: f64,
    /// Minimal confidence of a rule.
    pub confidence: f64,
    /// Mining fails once more itemsets than this are produced.
    pub max_itemsets: usize,
    /// Whether rules (and itemsets) carry the ids of the rows they match.
    pub store_examples: bool,
    /// Dense data only: put the class, and only the class, on the right.
    pub classification_rules: bool,
}

impl Default for InducerConfig {
    fn default() -> Self {
        Self {
            support: 0.3,
            confidence: 0.5,
            max_itemsets: DEFAULT_MAX_ITEMSETS,
            store_examples: false,
            classification_rules: false,
        }
    }
}

impl InducerConfig {
    pub fn new(support: f64, confidence: f64) -> Self {
        Self {
            support,
            confidence,
            ..Self::default()
        }
    }

    /// Defaults of the sparse inducer, which keeps every rule it can build.
    pub fn sparse() -> Self {
        Self::new(0.3, 0.0)
    }

    pub fn with_support(mut self, support: f64) -> Self {
        self.support = support;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_max_itemsets(mut self, max_itemsets: usize) -> Self {
        self.max_itemsets = max_itemsets;
        self
    }

    pub fn with_stored_examples(mut self, store: bool) -> Self {
        self.store_examples = store;
        self
    }

    pub fn with_classification_rules(mut self, enabled: bool) -> Self {
        self.classification_rules = enabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_fraction("support", self.support)?;
        check_fraction("confidence", self.confidence)?;
        if self.max_itemsets == 0 {
            return Err(MiningError::invalid("'max_itemsets' must be positive"));
        }
        Ok(())
    }
}

fn check_fraction(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(MiningError::invalid(format!(
            "'{}' must be between 0 and 1, got {}",
            name, value
        )));
    }
    Ok(())
}
