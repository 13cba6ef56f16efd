use log::info;

use crate::apriori::dense::{self, ItemsetTree};
use crate::apriori::sparse::{self, ItemsetTrie};
use crate::config::InducerConfig;
use crate::data::{Dataset, DenseDataset, SparseDataset};
use crate::error::{MiningError, Result};
use crate::itemsets::FrequentItemsets;
use crate::rules::RuleSet;

/// Association rules from attribute/value data.
///
/// ```
/// use arules::{AssociationRulesInducer, DenseDataset, Domain, InducerConfig, Variable};
/// use ndarray::array;
///
/// let domain = Domain::new(
///     vec![Variable::discrete("a", ["n", "y"]), Variable::discrete("b", ["n", "y"])],
///     None,
/// );
/// let data = DenseDataset::new(domain, array![[0, 0], [0, 0], [1, 1], [1, 1]]).unwrap();
/// let rules = AssociationRulesInducer::new(InducerConfig::new(0.5, 0.9))
///     .induce(&data)
///     .unwrap();
/// assert_eq!(rules.len(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AssociationRulesInducer {
    config: InducerConfig,
}

impl AssociationRulesInducer {
    pub fn new(config: InducerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InducerConfig {
        &self.config
    }

    /// Builds the tree of frequent itemsets.
    pub fn tree(&self, data: &DenseDataset) -> Result<ItemsetTree> {
        self.config.validate()?;
        if let Some(var) = data.domain().first_continuous() {
            return Err(MiningError::invalid(format!(
                "cannot induce rules from continuous variables ('{}')",
                var.name
            )));
        }
        if self.config.classification_rules && data.domain().class_var().is_none() {
            return Err(MiningError::invalid(
                "cannot induce classification rules on classless data",
            ));
        }
        info!(
            "mining itemsets from {} rows ({} variables), support {}",
            data.n_rows(),
            data.n_variables(),
            self.config.support
        );
        let tree = dense::build_tree(data, &self.config)?;
        info!(
            "found {} itemsets of up to {} items (minimal support {:.3})",
            tree.len(),
            tree.depth(),
            tree.min_support()
        );
        Ok(tree)
    }

    pub fn induce(&self, data: &DenseDataset) -> Result<RuleSet> {
        let tree = self.tree(data)?;
        let rules = if self.config.classification_rules {
            dense::ClassificationRuleGenerator::new(&tree, &self.config)?.generate()
        } else {
            dense::RuleGenerator::new(&tree, &self.config).generate()?
        };
        info!("induced {} rules (confidence {})", rules.len(), self.config.confidence);
        Ok(rules)
    }

    /// All frequent itemsets, with their rows when examples are stored.
    pub fn itemsets(&self, data: &DenseDataset) -> Result<FrequentItemsets> {
        let tree = self.tree(data)?;
        Ok(tree.itemsets(self.config.store_examples))
    }
}

/// Frequent itemsets of sparse data, as a trie.
#[derive(Debug, Clone)]
pub struct SparseItemsetsInducer {
    config: InducerConfig,
}

impl Default for SparseItemsetsInducer {
    fn default() -> Self {
        Self::new(InducerConfig::sparse())
    }
}

impl SparseItemsetsInducer {
    pub fn new(config: InducerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InducerConfig {
        &self.config
    }

    pub fn induce(&self, data: &SparseDataset) -> Result<ItemsetTrie> {
        self.config.validate()?;
        info!(
            "mining itemsets from {} rows ({} distinct items), support {}",
            data.n_rows(),
            data.universe().len(),
            self.config.support
        );
        let trie = sparse::build_trie(data, &self.config)?;
        info!(
            "found {} itemsets of up to {} items (minimal support {:.3})",
            trie.len(),
            trie.depth(),
            trie.min_support()
        );
        Ok(trie)
    }
}

/// Association rules from sparse data.
#[derive(Debug, Clone, Default)]
pub struct SparseAssociationRulesInducer {
    itemsets: SparseItemsetsInducer,
}

impl SparseAssociationRulesInducer {
    pub fn new(config: InducerConfig) -> Self {
        Self {
            itemsets: SparseItemsetsInducer::new(config),
        }
    }

    pub fn config(&self) -> &InducerConfig {
        self.itemsets.config()
    }

    pub fn induce(&self, data: &SparseDataset) -> Result<RuleSet> {
        let trie = self.itemsets.induce(data)?;
        let rules = sparse::SparseRuleGenerator::new(&trie, self.config()).generate()?;
        info!("induced {} rules (confidence {})", rules.len(), self.config().confidence);
        Ok(rules)
    }

    pub fn itemsets(&self, data: &SparseDataset) -> Result<FrequentItemsets> {
        let trie = self.itemsets.induce(data)?;
        Ok(trie.itemsets(self.config().store_examples))
    }
}

/// Mines rules with the engine that fits the shape of the data.
pub fn induce_rules(data: &Dataset, config: &InducerConfig) -> Result<RuleSet> {
    match data {
        Dataset::Dense(data) => AssociationRulesInducer::new(config.clone()).induce(data),
        Dataset::Sparse(data) => SparseAssociationRulesInducer::new(config.clone()).induce(data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Domain, Variable};
    use ndarray::array;

    fn two_attributes() -> Domain {
        Domain::new(
            vec![
                Variable::discrete("a", ["0", "1"]),
                Variable::discrete("b", ["0", "1"]),
            ],
            None,
        )
    }

    #[test]
    fn test_rejects_continuous_variables() {
        let domain = Domain::new(
            vec![Variable::discrete("a", ["0", "1"]), Variable::continuous("age")],
            None,
        );
        let data = DenseDataset::new(domain, array![[0, 1]]).unwrap();
        let err = AssociationRulesInducer::default().induce(&data).unwrap_err();
        assert_eq!(
            err,
            MiningError::InvalidInput("cannot induce rules from continuous variables ('age')".into())
        );
    }

    #[test]
    fn test_rejects_classification_without_class() {
        let data = DenseDataset::new(two_attributes(), array![[0, 1]]).unwrap();
        let config = InducerConfig::default().with_classification_rules(true);
        let err = AssociationRulesInducer::new(config).induce(&data).unwrap_err();
        assert!(matches!(err, MiningError::InvalidInput(msg) if msg.contains("classless")));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let data = DenseDataset::new(two_attributes(), array![[0, 1]]).unwrap();
        let inducer = AssociationRulesInducer::new(InducerConfig::new(2.0, 0.5));
        assert!(matches!(inducer.induce(&data), Err(MiningError::InvalidInput(_))));
    }

    #[test]
    fn test_dispatches_on_data_shape() {
        let config = InducerConfig::new(0.5, 0.9);
        let dense: Dataset = DenseDataset::new(two_attributes(), array![[0, 0], [0, 0], [1, 1], [1, 1]])
            .unwrap()
            .into();
        assert_eq!(induce_rules(&dense, &config).unwrap().len(), 4);

        let sparse: Dataset = SparseDataset::new(vec![vec![1, 2], vec![1, 2], vec![3], vec![3]]).into();
        let rules = induce_rules(&sparse, &config).unwrap();
        let shown: Vec<String> = rules.iter().map(ToString::to_string).collect();
        assert_eq!(shown, vec!["1 -> 2", "2 -> 1"]);
    }

    #[test]
    fn test_itemsets_listing() {
        let data = DenseDataset::new(two_attributes(), array![[0, 0], [0, 0], [1, 1], [1, 0]]).unwrap();
        let inducer = AssociationRulesInducer::new(InducerConfig::new(0.5, 0.5).with_stored_examples(true));
        let itemsets = inducer.itemsets(&data).unwrap();
        assert_eq!(itemsets.level(1).map(|l| l.len()), Some(3));
        assert_eq!(itemsets.level(2).map(|l| l.len()), Some(1));
        let pair = itemsets.level(2).unwrap();
        assert_eq!(pair.rows(0), Some(&[0, 1][..]));

        let sparse = SparseDataset::new(vec![vec![1, 2], vec![1, 2], vec![3], vec![3]]);
        let listed = SparseAssociationRulesInducer::new(InducerConfig::new(0.5, 0.0))
            .itemsets(&sparse)
            .unwrap();
        assert_eq!(listed.len(), 4);
        assert_eq!(listed.levels()[1].get_itemset(0), &[crate::rules::Item::Id(1), crate::rules::Item::Id(2)]);
    }
}
