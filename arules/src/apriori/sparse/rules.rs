use super::trie::{ItemsetTrie, NodeId, ROOT};
use crate::config::InducerConfig;
use crate::error::{MiningError, Result};
use crate::rules::{Item, Rule, RuleSet};

/// Derives association rules from a complete itemset trie.
pub(crate) struct SparseRuleGenerator<'a> {
    trie: &'a ItemsetTrie,
    confidence: f64,
    store_examples: bool,
    rules: RuleSet,
}

impl<'a> SparseRuleGenerator<'a> {
    pub(crate) fn new(trie: &'a ItemsetTrie, config: &InducerConfig) -> Self {
        Self {
            trie,
            confidence: config.confidence,
            store_examples: config.store_examples,
            rules: RuleSet::new(),
        }
    }

    /// Visits itemsets in pre-order and emits the rules of those with at
    /// least two items.
    pub(crate) fn generate(mut self) -> Result<RuleSet> {
        let mut itemset = Vec::new();
        self.visit(ROOT, &mut itemset)?;
        Ok(self.rules)
    }

    fn visit(&mut self, id: NodeId, itemset: &mut Vec<usize>) -> Result<()> {
        let trie = self.trie;
        if itemset.len() > 1 {
            self.itemset_rules(itemset, id)?;
        }
        for (item, child) in trie.children(id) {
            itemset.push(item);
            self.visit(child, itemset)?;
            itemset.pop();
        }
        Ok(())
    }

    fn itemset_rules(&mut self, itemset: &[usize], both: NodeId) -> Result<()> {
        let mut left = Vec::with_capacity(itemset.len());
        self.extend_left(ROOT, 0, itemset, both, &mut left)
    }

    /// Tries as left sides the subsets of `itemset` that extend `left` with
    /// items from position `from` on. A subset whose rule is not confident
    /// is not extended.
    fn extend_left(
        &mut self,
        node: NodeId,
        from: usize,
        itemset: &[usize],
        both: NodeId,
        left: &mut Vec<usize>,
    ) -> Result<()> {
        let trie = self.trie;
        for (i, &item) in itemset.iter().enumerate().skip(from) {
            let Some(child) = trie.child(node, item) else { continue };
            let n_applies_left = trie.node(child).support;
            // a left side of zero support gives NaN and is never confident
            let confident = trie.node(both).support / n_applies_left >= self.confidence;
            if !confident {
                continue;
            }
            left.push(item);
            self.push_rule(left, itemset, child, both)?;
            if left.len() < itemset.len() - 1 {
                self.extend_left(child, i + 1, itemset, both, left)?;
            }
            left.pop();
        }
        Ok(())
    }

    fn push_rule(
        &mut self,
        left: &[usize],
        itemset: &[usize],
        left_node: NodeId,
        both: NodeId,
    ) -> Result<()> {
        let right: Vec<usize> = itemset
            .iter()
            .copied()
            .filter(|item| left.binary_search(item).is_err())
            .collect();
        let right_node = self.trie.find_path(&right).ok_or_else(|| {
            MiningError::inconsistency(format!("itemset {:?} is missing from the trie", right))
        })?;

        let (left_node, right_node, both) = (
            self.trie.node(left_node),
            self.trie.node(right_node),
            self.trie.node(both),
        );
        let mut rule = Rule::new(
            left.iter().map(|&id| Item::Id(id)).collect(),
            right.into_iter().map(Item::Id).collect(),
            left_node.support,
            right_node.support,
            both.support,
            self.trie.n_examples(),
        );
        if self.store_examples {
            rule = rule.with_matches(left_node.rows.clone(), both.rows.clone());
        }
        self.rules.push(rule);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apriori::sparse::build_trie;
    use crate::data::SparseDataset;
    use ndarray::array;

    #[test]
    fn rules_follow_preorder() {
        let data = SparseDataset::new(vec![vec![1, 2], vec![1, 2], vec![1, 2, 3], vec![3]]);
        let config = InducerConfig::new(0.5, 0.0);
        let trie = build_trie(&data, &config).unwrap();
        let rules = SparseRuleGenerator::new(&trie, &config).generate().unwrap();

        let shown: Vec<String> = rules.iter().map(ToString::to_string).collect();
        assert_eq!(shown, vec!["1 -> 2", "2 -> 1"]);
        let rule = &rules.rules()[0];
        assert_eq!((rule.n_applies_left, rule.n_applies_right, rule.n_applies_both), (3.0, 3.0, 3.0));
        assert_eq!(rule.n_examples, 4.0);
    }

    #[test]
    fn zero_support_left_side_makes_no_rule() {
        // column 1 never occurs, yet it is part of the universe
        let data = SparseDataset::from_matrix(array![[1, 0], [1, 0]].view());
        let config = InducerConfig::new(0.0, 0.5);
        let trie = build_trie(&data, &config).unwrap();
        assert_eq!(trie.support_of(&[1]), Some(0.0));
        assert_eq!(trie.support_of(&[0, 1]), Some(0.0));

        let rules = SparseRuleGenerator::new(&trie, &config).generate().unwrap();
        assert!(rules.is_empty());
    }
}
