use super::tree::{ItemsetTree, NodeId, ValueNode};
use crate::config::InducerConfig;
use crate::error::{MiningError, Result};
use crate::rules::{Item, Rule, RuleSet};

/// Derives rules that predict the class, which is always the last variable
/// and therefore always the last attribute of any chain it appears in.
pub(crate) struct ClassificationRuleGenerator<'a> {
    tree: &'a ItemsetTree,
    class_index: usize,
    class_distribution: &'a [f64],
    confidence: f64,
    store_examples: bool,
    rules: RuleSet,
}

impl<'a> ClassificationRuleGenerator<'a> {
    pub(crate) fn new(tree: &'a ItemsetTree, config: &InducerConfig) -> Result<Self> {
        let class_distribution = tree.class_distribution().ok_or_else(|| {
            MiningError::invalid("cannot induce classification rules on classless data")
        })?;
        Ok(Self {
            tree,
            class_index: tree.n_variables().saturating_sub(1),
            class_distribution,
            confidence: config.confidence,
            store_examples: config.store_examples,
            rules: RuleSet::new(),
        })
    }

    pub(crate) fn generate(mut self) -> RuleSet {
        let mut left = Vec::new();
        self.gather(self.tree.root(), &mut left, None);
        self.rules
    }

    fn gather(
        &mut self,
        start: Option<NodeId>,
        left: &mut Vec<Item>,
        left_node: Option<&'a ValueNode>,
    ) {
        let tree = self.tree;
        for id in tree.chain(start) {
            let node = tree.node(id);
            if node.next.is_some() {
                for value in &node.values {
                    if let Some(branch) = value.branch {
                        left.push(Item::Attribute {
                            index: node.attribute,
                            value: value.value,
                        });
                        self.gather(Some(branch), left, Some(value));
                        left.pop();
                    }
                }
                continue;
            }

            // an empty left side makes no rule
            let Some(left_node) = left_node else { continue };
            if node.attribute != self.class_index {
                continue;
            }
            for class in &node.values {
                let confident = class.support / left_node.support >= self.confidence;
                if !confident {
                    continue;
                }
                let right = vec![Item::Attribute {
                    index: self.class_index,
                    value: class.value,
                }];
                let n_applies_right = self
                    .class_distribution
                    .get(class.value)
                    .copied()
                    .unwrap_or_default();
                let mut rule = Rule::new(
                    left.clone(),
                    right,
                    left_node.support,
                    n_applies_right,
                    class.support,
                    tree.n_examples(),
                );
                if self.store_examples {
                    rule = rule.with_matches(left_node.rows.row_ids(), class.rows.row_ids());
                }
                self.rules.push(rule);
            }
        }
    }
}
